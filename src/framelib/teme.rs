//! TEME (True Equator Mean Equinox) frame rules
//!
//! TEME is the frame SGP4 produces. Its Z axis is the true (nutated) pole of
//! date, while its X axis points at the mean equinox of date measured along
//! the true equator. It therefore sits between two better-defined frames:
//!
//! ```text
//! GCRS --[B, P, N]--> true of date --R3(eqeq)--> TEME --R3(GMST82)--> TIRS
//! ```
//!
//! References: AIAA 2006-6753 (Revisiting Spacetrack Report #3) and Vallado,
//! Fundamentals of Astrodynamics and Applications, 4th ed., section 3.7.

use nalgebra::{Matrix3, Vector3};

use crate::constants::{DAY_S, EARTH_ANGVEL, J2000, TAU};
use crate::framelib::rotation::rot_z;
use crate::nutationlib::{equation_of_the_equinoxes, nutation_matrix};
use crate::precessionlib::bias_precession_matrix;
use crate::time::Time;

/// Greenwich Mean Sidereal Time, 1982 formulation, in radians
///
/// The UT1 Julian date is passed split as `jd_ut1 + frac_ut1`. The whole
/// revolutions per day are carried by the date fraction, so only the
/// remaining polynomial of AIAA 2006-6753 appears in `g`.
pub fn gmst1982(jd_ut1: f64, frac_ut1: f64) -> f64 {
    let t = (jd_ut1 - J2000 + frac_ut1) / 36525.0;
    let g = 67310.54841 + (8640184.812866 + (0.093104 + (-6.2e-6) * t) * t) * t;
    (jd_ut1.rem_euclid(1.0) + frac_ut1 + g / DAY_S).rem_euclid(1.0) * TAU
}

/// Rotation from GCRS to TEME: `R3(eqeq) * N * P * B`
///
/// Celestial pole offsets from the time's Earth orientation move the
/// modelled pole by (dX, dY) in GCRS before the chain is applied.
pub fn gcrs_to_teme_matrix(t: &Time) -> Matrix3<f64> {
    let tt = t.tt();
    let (dx, dy) = t.celestial_pole_offsets();
    rot_z(equation_of_the_equinoxes(tt))
        * nutation_matrix(tt)
        * bias_precession_matrix(tt)
        * pole_offset_matrix(dx, dy)
}

/// First-order rotation taking the modelled celestial pole to the observed one
fn pole_offset_matrix(dx: f64, dy: f64) -> Matrix3<f64> {
    #[rustfmt::skip]
    let m = Matrix3::new(
        1.0, 0.0, -dx,
        0.0, 1.0, -dy,
        dx,  dy,  1.0,
    );
    m
}

/// Rotation from TEME to TIRS: `R3(GMST82(UT1))`
pub fn teme_to_tirs_matrix(t: &Time) -> Matrix3<f64> {
    let (whole, fraction) = t.ut1_parts();
    rot_z(gmst1982(whole, fraction))
}

/// Earth's angular velocity vector in rad/s, in TIRS
fn earth_rotation() -> Vector3<f64> {
    Vector3::new(0.0, 0.0, EARTH_ANGVEL)
}

/// Transform a TEME position (km) and velocity (km/s) to TIRS.
///
/// TIRS rotates with the Earth, so the velocity loses the `omega x r`
/// transport term.
pub fn teme_to_tirs(
    t: &Time,
    pos_teme: &Vector3<f64>,
    vel_teme: Option<&Vector3<f64>>,
) -> (Vector3<f64>, Option<Vector3<f64>>) {
    let r = teme_to_tirs_matrix(t);
    let pos_tirs = r * pos_teme;
    let vel_tirs = vel_teme.map(|v| r * v - earth_rotation().cross(&pos_tirs));
    (pos_tirs, vel_tirs)
}

/// Transform a TIRS position (km) and velocity (km/s) to TEME
pub fn tirs_to_teme(
    t: &Time,
    pos_tirs: &Vector3<f64>,
    vel_tirs: Option<&Vector3<f64>>,
) -> (Vector3<f64>, Option<Vector3<f64>>) {
    let rt = teme_to_tirs_matrix(t).transpose();
    let vel_teme = vel_tirs.map(|v| rt * (v + earth_rotation().cross(pos_tirs)));
    (rt * pos_tirs, vel_teme)
}
