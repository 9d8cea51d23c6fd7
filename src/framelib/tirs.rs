//! TIRS to ITRS: polar motion (IERS Conventions 2010, chapter 5)

use nalgebra::Matrix3;

use crate::constants::ASEC2RAD;
use crate::framelib::rotation::{rot_x, rot_y, rot_z};
use crate::time::Time;

/// TIO locator s' in radians, the slow drift of the terrestrial
/// intermediate origin: -47 µas per century
pub fn tio_locator(t: &Time) -> f64 {
    -47e-6 * ASEC2RAD * t.tt_centuries()
}

/// Polar motion matrix W with `v_itrs = W * v_tirs`:
/// `W = R1(-y_p) * R2(-x_p) * R3(s')`
pub fn polar_motion_matrix(t: &Time) -> Matrix3<f64> {
    let (xp, yp) = t.polar_motion();
    rot_x(-yp) * rot_y(-xp) * rot_z(tio_locator(t))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::{EarthOrientation, Timescale};
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    #[test]
    fn test_zero_polar_motion_is_nearly_identity() {
        let ts = Timescale::default();
        let w = polar_motion_matrix(&ts.utc((2020, 4, 12)));
        assert_relative_eq!(w, Matrix3::identity(), epsilon = 1e-10);
    }

    #[test]
    fn test_polar_motion_tilts_pole() {
        let ts = Timescale::with_earth_orientation(EarthOrientation {
            polar_motion_x_arcsec: 0.2,
            polar_motion_y_arcsec: 0.3,
            ..Default::default()
        });
        let w = polar_motion_matrix(&ts.utc((2020, 4, 12)));
        // The CIP expressed in ITRS sits at (x_p, -y_p)
        let pole = w * Vector3::z();
        assert_relative_eq!(pole.x, 0.2 * ASEC2RAD, epsilon = 1e-12);
        assert_relative_eq!(pole.y, -0.3 * ASEC2RAD, epsilon = 1e-12);
    }
}
