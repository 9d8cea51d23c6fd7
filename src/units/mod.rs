//! Typed quantities built on the `uom` crate
//!
//! The numeric core works in plain `f64` kilometres, km/s and radians.
//! Public accessors that report physical magnitudes (radius, speed, horizon
//! coordinates) return `uom` quantities so the caller picks the unit.

pub use uom::si::f64::Angle;
pub use uom::si::f64::Length;
pub use uom::si::f64::Time as Duration;
pub use uom::si::f64::Velocity;

pub use uom::si::angle::degree;
pub use uom::si::angle::radian;
pub use uom::si::angle::second as arcsecond;
pub use uom::si::length::kilometer;
pub use uom::si::length::meter;
pub use uom::si::time::day;
pub use uom::si::time::minute;
pub use uom::si::time::second;
pub use uom::si::velocity::kilometer_per_second;
pub use uom::si::velocity::meter_per_second;

use crate::constants::{AU_KM, DAY_S};

/// Convert AU to kilometers (IAU 2012 exact AU)
pub fn au_to_km(au: f64) -> f64 {
    au * AU_KM
}

/// Convert kilometers to AU
pub fn km_to_au(km: f64) -> f64 {
    km / AU_KM
}

/// Convert km/day to km/s
pub fn km_per_day_to_km_per_s(km_day: f64) -> f64 {
    km_day / DAY_S
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_exact_au_conversion() {
        assert_relative_eq!(au_to_km(1.0), 149_597_870.700, epsilon = 1e-6);
        assert_relative_eq!(km_to_au(149_597_870.700), 1.0, epsilon = 1e-15);
    }

    #[test]
    fn test_angle_arcseconds() {
        let one_degree = Angle::new::<degree>(1.0);
        assert_relative_eq!(one_degree.get::<arcsecond>(), 3600.0, epsilon = 1e-10);
    }

    #[test]
    fn test_orbital_speed_units() {
        // Low Earth orbit, about 7.66 km/s
        let v = Velocity::new::<kilometer_per_second>(km_per_day_to_km_per_s(661_824.0));
        assert_relative_eq!(v.get::<meter_per_second>(), 7660.0, epsilon = 1e-9);

        let span: Length = v * Duration::new::<minute>(1.0);
        assert_relative_eq!(span.get::<kilometer>(), 459.6, epsilon = 1e-9);
    }
}
