//! Precession from J2000.0 to the mean equator and equinox of date
//!
//! Capitaine et al. (2003) four-angle formulation, Astronomy and
//! Astrophysics 412, 567-586, combined with the ICRS frame bias.

use crate::constants::{ASEC2RAD, J2000};
use crate::framelib::rotation::{rot_x, rot_z};
use crate::framelib::FRAME_BIAS;
use nalgebra::Matrix3;

/// Mean obliquity at J2000.0 in arcseconds
const EPS0: f64 = 84381.406;

/// The precession angles psi_A, omega_A and chi_A in radians
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrecessionAngles {
    pub psi_a: f64,
    pub omega_a: f64,
    pub chi_a: f64,
}

impl PrecessionAngles {
    /// Angles for a TT Julian date
    pub fn at(tt_jd: f64) -> Self {
        let t = (tt_jd - J2000) / 36525.0;

        let psi_a = ((((-0.0000000951 * t + 0.000132851) * t - 0.00114045) * t - 1.0790069)
            * t
            + 5038.481507)
            * t;

        let omega_a = ((((0.0000003337 * t - 0.000000467) * t - 0.00772503) * t + 0.0512623)
            * t
            - 0.025754)
            * t
            + EPS0;

        let chi_a = ((((-0.0000000560 * t + 0.000170663) * t - 0.00121197) * t - 2.3814292)
            * t
            + 10.556403)
            * t;

        PrecessionAngles {
            psi_a: psi_a * ASEC2RAD,
            omega_a: omega_a * ASEC2RAD,
            chi_a: chi_a * ASEC2RAD,
        }
    }

    /// P = R3(chi_A) * R1(-omega_A) * R3(-psi_A) * R1(eps_0)
    pub fn matrix(&self) -> Matrix3<f64> {
        rot_z(self.chi_a) * rot_x(-self.omega_a) * rot_z(-self.psi_a) * rot_x(EPS0 * ASEC2RAD)
    }
}

/// Precession matrix from the J2000 mean frame to the mean frame of date
pub fn precession_matrix(tt_jd: f64) -> Matrix3<f64> {
    PrecessionAngles::at(tt_jd).matrix()
}

/// Bias-precession matrix from GCRS to the mean equator and equinox of date
pub fn bias_precession_matrix(tt_jd: f64) -> Matrix3<f64> {
    precession_matrix(tt_jd) * *FRAME_BIAS
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_precession_at_j2000_is_identity() {
        let p = precession_matrix(J2000);
        assert_relative_eq!(p, Matrix3::identity(), epsilon = 1e-12);
    }

    #[test]
    fn test_precession_is_rotation() {
        let p = precession_matrix(J2000 + 3652.5);
        assert_relative_eq!(p.transpose() * p, Matrix3::identity(), epsilon = 1e-14);
        assert_relative_eq!(p.determinant(), 1.0, epsilon = 1e-14);
    }

    #[test]
    fn test_general_precession_rate() {
        // The pole moves about 20" per year in declination
        let p = precession_matrix(J2000 + 36525.0);
        let pole_shift = p[(2, 0)].abs().max(p[(0, 2)].abs()) / ASEC2RAD;
        assert!((1900.0..2100.0).contains(&pole_shift), "shift = {pole_shift}");
    }
}
