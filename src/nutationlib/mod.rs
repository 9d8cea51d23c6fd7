//! Nutation and the equation of the equinoxes
//!
//! Nutation follows the IAU 2000B model: the 77 largest lunisolar terms of
//! IAU 2000A plus fixed offsets standing in for the planetary series. It is
//! good to about 1 mas between 1995 and 2050, far below what an SGP4 state
//! vector can resolve.

mod iau2000b_data;

use crate::constants::{ASEC2RAD, J2000, TAU};
use nalgebra::Matrix3;

use iau2000b_data::{LUNISOLAR_LONGITUDE, LUNISOLAR_OBLIQUITY, NALS_T};

/// 0.1 microarcsecond in radians
const TENTH_USEC_2_RAD: f64 = ASEC2RAD / 1e7;

/// Arcseconds in a full circle
const TURNAS: f64 = 1_296_000.0;

/// Offsets approximating the omitted planetary terms, in arcseconds
const DPSI_PLANETARY: f64 = -0.135e-3;
const DEPS_PLANETARY: f64 = 0.388e-3;

/// Linear Delaunay arguments [constant, rate] in arcseconds, as used by IAU 2000B
const DELAUNAY: [[f64; 2]; 5] = [
    // l, mean anomaly of the Moon
    [485868.249036, 1717915923.2178],
    // l', mean anomaly of the Sun
    [1287104.79305, 129596581.0481],
    // F, mean argument of latitude of the Moon
    [335779.526232, 1739527262.8478],
    // D, mean elongation of the Moon from the Sun
    [1072260.70369, 1602961601.2090],
    // Omega, mean longitude of the Moon's ascending node
    [450160.398036, -6962890.5431],
];

/// Complementary terms of the equation of the equinoxes larger than 0.5 µas
/// (IERS Conventions 2010, Table 5.2e). Each row holds the multipliers of
/// (l, l', F, D, Omega) followed by the sine and cosine amplitudes in µas.
#[rustfmt::skip]
const EQEQ_TERMS: [([i8; 5], f64, f64); 12] = [
    ([0, 0, 0,  0,  1], 2640.96, -0.39),
    ([0, 0, 0,  0,  2],   63.52, -0.02),
    ([0, 0, 2, -2,  3],   11.75,  0.01),
    ([0, 0, 2, -2,  1],   11.21,  0.01),
    ([0, 0, 2, -2,  2],   -4.55,  0.00),
    ([0, 0, 2,  0,  3],    2.02,  0.00),
    ([0, 0, 2,  0,  1],    1.98,  0.00),
    ([0, 0, 0,  0,  3],   -1.72,  0.00),
    ([0, 1, 0,  0,  1],   -1.41, -0.01),
    ([0, 1, 0,  0, -1],   -1.26, -0.01),
    ([1, 0, 0,  0, -1],   -0.63,  0.00),
    ([1, 0, 0,  0,  1],   -0.63,  0.00),
];

/// Secular complementary term: -0.87 µas * t * sin(Omega)
const EQEQ_SECULAR_SIN: f64 = -0.87;

/// Delaunay arguments (l, l', F, D, Omega) in radians
///
/// # Arguments
/// * `t` - TT in Julian centuries since J2000.0
pub fn delaunay_arguments(t: f64) -> [f64; 5] {
    let mut fa = [0.0f64; 5];
    for (arg, &[constant, rate]) in fa.iter_mut().zip(DELAUNAY.iter()) {
        *arg = ((constant + rate * t) % TURNAS) * ASEC2RAD;
    }
    fa
}

fn combine(multipliers: &[i8; 5], fa: &[f64; 5]) -> f64 {
    multipliers
        .iter()
        .zip(fa.iter())
        .map(|(&n, &a)| n as f64 * a)
        .sum::<f64>()
        % TAU
}

/// Nutation in longitude and obliquity (d_psi, d_eps) in radians, IAU 2000B
///
/// # Arguments
/// * `tt_jd` - TT Julian date
pub fn iau2000b_nutation(tt_jd: f64) -> (f64, f64) {
    let t = (tt_jd - J2000) / 36525.0;
    let fa = delaunay_arguments(t);

    let mut d_psi = 0.0;
    let mut d_eps = 0.0;

    // Smallest terms first
    for i in (0..NALS_T.len()).rev() {
        let (sin_arg, cos_arg) = combine(&NALS_T[i], &fa).sin_cos();
        let lon = &LUNISOLAR_LONGITUDE[i];
        let obl = &LUNISOLAR_OBLIQUITY[i];
        d_psi += (lon[0] + lon[1] * t) * sin_arg + lon[2] * cos_arg;
        d_eps += (obl[0] + obl[1] * t) * cos_arg + obl[2] * sin_arg;
    }

    (
        d_psi * TENTH_USEC_2_RAD + DPSI_PLANETARY * ASEC2RAD,
        d_eps * TENTH_USEC_2_RAD + DEPS_PLANETARY * ASEC2RAD,
    )
}

/// Mean obliquity of the ecliptic in radians (Capitaine et al. 2003)
///
/// # Arguments
/// * `tt_jd` - TT Julian date
pub fn mean_obliquity(tt_jd: f64) -> f64 {
    let t = (tt_jd - J2000) / 36525.0;

    let epsilon = ((((-0.0000000434 * t - 0.000000576) * t + 0.00200340) * t - 0.0001831) * t
        - 46.836769)
        * t
        + 84381.406;

    epsilon * ASEC2RAD
}

/// Nutation matrix N = R1(-(eps + d_eps)) * R3(-d_psi) * R1(eps), rotating
/// mean-of-date coordinates to true-of-date.
pub fn build_nutation_matrix(mean_obliquity_rad: f64, d_psi: f64, d_eps: f64) -> Matrix3<f64> {
    let (sobm, cobm) = mean_obliquity_rad.sin_cos();
    let (sobt, cobt) = (mean_obliquity_rad + d_eps).sin_cos();
    let (spsi, cpsi) = d_psi.sin_cos();

    #[rustfmt::skip]
    let n = Matrix3::new(
        cpsi,          -spsi * cobm,                      -spsi * sobm,
        spsi * cobt,    cpsi * cobm * cobt + sobm * sobt,  cpsi * sobm * cobt - cobm * sobt,
        spsi * sobt,    cpsi * cobm * sobt - sobm * cobt,  cpsi * sobm * sobt + cobm * cobt,
    );

    n
}

/// Nutation matrix for a TT Julian date
pub fn nutation_matrix(tt_jd: f64) -> Matrix3<f64> {
    let (d_psi, d_eps) = iau2000b_nutation(tt_jd);
    build_nutation_matrix(mean_obliquity(tt_jd), d_psi, d_eps)
}

/// Complementary terms of the equation of the equinoxes in radians
pub fn equation_of_the_equinoxes_complementary_terms(tt_jd: f64) -> f64 {
    let t = (tt_jd - J2000) / 36525.0;
    let fa = delaunay_arguments(t);

    let mut c_terms = EQEQ_SECULAR_SIN * t * fa[4].sin();
    for (multipliers, sin_amp, cos_amp) in EQEQ_TERMS.iter() {
        let (s, c) = combine(multipliers, &fa).sin_cos();
        c_terms += sin_amp * s + cos_amp * c;
    }

    c_terms * 1e-6 * ASEC2RAD
}

/// Equation of the equinoxes (GAST - GMST) in radians
///
/// `d_psi * cos(eps_mean)` plus the complementary terms. This is the angle
/// between the true equinox and the mean equinox measured along the true
/// equator, which is what separates TEME from true-of-date coordinates.
pub fn equation_of_the_equinoxes(tt_jd: f64) -> f64 {
    let (d_psi, _) = iau2000b_nutation(tt_jd);
    d_psi * mean_obliquity(tt_jd).cos() + equation_of_the_equinoxes_complementary_terms(tt_jd)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_delaunay_arguments_at_j2000() {
        let fa = delaunay_arguments(0.0);
        assert_relative_eq!(fa[0], 485868.249036 * ASEC2RAD, epsilon = 1e-12);
        assert_relative_eq!(fa[4], 450160.398036 * ASEC2RAD, epsilon = 1e-12);
    }

    #[test]
    fn test_nutation_matches_sofa_nut00b() {
        // SOFA t_sofa_c test case for iauNut00b at MJD 53736.0
        let (d_psi, d_eps) = iau2000b_nutation(2400000.5 + 53736.0);
        assert_relative_eq!(d_psi, -0.9632552291148362783e-5, epsilon = 1e-13);
        assert_relative_eq!(d_eps, 0.4063197106621159367e-4, epsilon = 1e-13);
    }

    #[test]
    fn test_mean_obliquity_at_j2000() {
        let eps = mean_obliquity(J2000);
        assert_relative_eq!(eps.to_degrees(), 23.4393, epsilon = 0.001);
    }

    #[test]
    fn test_nutation_matrix_is_rotation() {
        let n = nutation_matrix(2458826.5);
        let product = n.transpose() * n;
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_relative_eq!(product[(i, j)], expected, epsilon = 1e-14);
            }
        }
        assert_relative_eq!(n.determinant(), 1.0, epsilon = 1e-14);
    }

    #[test]
    fn test_equation_of_the_equinoxes_bounded() {
        // |d_psi| stays under 20", so |eqeq| stays under about 1.2 s of time
        for jd in [2378497.0, 2451545.0, 2458826.5, 2524593.0] {
            let ee = equation_of_the_equinoxes(jd) / ASEC2RAD;
            assert!(ee.abs() < 18.5, "eqeq = {ee} arcseconds at {jd}");
        }
    }

    #[test]
    fn test_complementary_terms_small() {
        let c = equation_of_the_equinoxes_complementary_terms(J2000) / ASEC2RAD;
        assert!(c.abs() < 0.003, "complementary terms = {c} arcseconds");
    }
}
