//! Ephemeris providers
//!
//! Anything that can report where a body is at a given instant implements
//! [`EphemerisProvider`]. Providers are handed explicitly to the code that
//! needs them; there is no global ephemeris.

use nalgebra::Vector3;

use crate::constants::{DAYS_PER_CENTURY, DEG2RAD, J2000};
use crate::framelib::{check_epoch, Frame, StateVector};
use crate::precessionlib::bias_precession_matrix;
use crate::time::Time;
use crate::units::au_to_km;
use crate::Result;

/// Earth radius in km used by the almanac lunar parallax series
const LUNAR_PARALLAX_EARTH_RADIUS_KM: f64 = 6378.14;

/// A source of geocentric state vectors
pub trait EphemerisProvider {
    /// State of the body at `t`, in whatever frame the provider works in
    fn state_at(&self, t: &Time) -> Result<StateVector>;

    /// States at each of `times`, failing on the first error
    fn states_at(&self, times: &[Time]) -> Result<Vec<StateVector>> {
        times.iter().map(|t| self.state_at(t)).collect()
    }
}

impl<P: EphemerisProvider + ?Sized> EphemerisProvider for &P {
    fn state_at(&self, t: &Time) -> Result<StateVector> {
        (**self).state_at(t)
    }
}

/// Geocentric Sun from the Astronomical Almanac low-precision formulae
///
/// Good to about 0.01 degrees between 1950 and 2050. The ecliptic longitude
/// is referred to the mean equinox of date, so the vector is rotated back
/// into GCRS with the bias-precession matrix. Positions only.
#[derive(Debug, Clone, Copy, Default)]
pub struct LowPrecisionSun;

impl LowPrecisionSun {
    /// Geocentric position in km on the mean equator and equinox of date
    pub fn mean_of_date_position(tt_jd: f64) -> Vector3<f64> {
        let n = tt_jd - J2000;
        let mean_longitude = (280.460 + 0.985_647_4 * n).rem_euclid(360.0);
        let g = (357.528 + 0.985_600_3 * n).rem_euclid(360.0) * DEG2RAD;
        let lambda = (mean_longitude + 1.915 * g.sin() + 0.020 * (2.0 * g).sin()) * DEG2RAD;
        let epsilon = (23.439 - 0.000_000_4 * n) * DEG2RAD;
        let distance = au_to_km(1.000_14 - 0.016_71 * g.cos() - 0.000_14 * (2.0 * g).cos());

        let (sin_l, cos_l) = lambda.sin_cos();
        Vector3::new(
            distance * cos_l,
            distance * epsilon.cos() * sin_l,
            distance * epsilon.sin() * sin_l,
        )
    }
}

impl EphemerisProvider for LowPrecisionSun {
    fn state_at(&self, t: &Time) -> Result<StateVector> {
        check_epoch(t)?;
        let tt = t.tt();
        let position = bias_precession_matrix(tt).transpose() * Self::mean_of_date_position(tt);
        Ok(StateVector::new(Frame::Gcrs, *t, position, None))
    }
}

/// Geocentric Moon from the Astronomical Almanac low-precision formulae
///
/// Longitude good to about 0.3 degrees, latitude to 0.2 degrees and
/// distance to a few hundred km. Same frame handling as [`LowPrecisionSun`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LowPrecisionMoon;

impl LowPrecisionMoon {
    /// Geocentric position in km on the mean equator and equinox of date
    pub fn mean_of_date_position(tt_jd: f64) -> Vector3<f64> {
        let t = (tt_jd - J2000) / DAYS_PER_CENTURY;
        let sin_deg = |a: f64| (a * DEG2RAD).sin();
        let cos_deg = |a: f64| (a * DEG2RAD).cos();

        // Arguments shared by the longitude and parallax series
        let a1 = 135.0 + 477_198.87 * t;
        let a2 = 259.3 - 413_335.36 * t;
        let a3 = 235.7 + 890_534.22 * t;
        let a4 = 269.9 + 954_397.74 * t;

        let lambda = 218.32 + 481_267.881 * t + 6.29 * sin_deg(a1) - 1.27 * sin_deg(a2)
            + 0.66 * sin_deg(a3)
            + 0.21 * sin_deg(a4)
            - 0.19 * sin_deg(357.5 + 35_999.05 * t)
            - 0.11 * sin_deg(186.5 + 966_404.03 * t);
        let beta = 5.13 * sin_deg(93.3 + 483_202.02 * t) + 0.28 * sin_deg(228.2 + 960_400.89 * t)
            - 0.28 * sin_deg(318.3 + 6_003.15 * t)
            - 0.17 * sin_deg(217.6 - 407_332.21 * t);
        let parallax = 0.9508
            + 0.0518 * cos_deg(a1)
            + 0.0095 * cos_deg(a2)
            + 0.0078 * cos_deg(a3)
            + 0.0028 * cos_deg(a4);

        let distance = LUNAR_PARALLAX_EARTH_RADIUS_KM / sin_deg(parallax);
        let epsilon = (23.439_291 - 0.013_004_2 * t) * DEG2RAD;

        let (sin_l, cos_l) = (lambda.rem_euclid(360.0) * DEG2RAD).sin_cos();
        let (sin_b, cos_b) = (beta * DEG2RAD).sin_cos();
        let ecliptic = Vector3::new(cos_b * cos_l, cos_b * sin_l, sin_b) * distance;
        let (sin_e, cos_e) = epsilon.sin_cos();
        Vector3::new(
            ecliptic.x,
            cos_e * ecliptic.y - sin_e * ecliptic.z,
            sin_e * ecliptic.y + cos_e * ecliptic.z,
        )
    }
}

impl EphemerisProvider for LowPrecisionMoon {
    fn state_at(&self, t: &Time) -> Result<StateVector> {
        check_epoch(t)?;
        let tt = t.tt();
        let position = bias_precession_matrix(tt).transpose() * Self::mean_of_date_position(tt);
        Ok(StateVector::new(Frame::Gcrs, *t, position, None))
    }
}
