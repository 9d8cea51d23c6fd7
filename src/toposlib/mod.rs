//! Geographic observer positions on Earth
//!
//! An observer is fixed in the ITRS, so the horizon coordinates of any state
//! vector follow from transforming it into ITRS and rotating the
//! topocentric offset into the local south/east/up frame:
//! ```text
//! Geographic (lat/lon/elev) -> ITRS xyz (km)
//! target state (any frame) -> ITRS -> minus observer -> south/east/up -> alt/az
//! ```
//!
//! # Example
//!
//! ```ignore
//! use skytrack::toposlib::WGS84;
//!
//! let istanbul = WGS84.latlon(41.015137, 28.979530, 0.0);
//! let sun = LowPrecisionSun.state_at(&t)?;
//! let horizon = istanbul.altaz(&sun)?;
//! println!("{:.2}", horizon.altitude.get::<degree>());
//! ```

use nalgebra::Vector3;
use std::f64::consts::{PI, TAU};

use crate::constants::{DEG2RAD, RAD2DEG, WGS84_INVERSE_FLATTENING, WGS84_RADIUS_KM};
use crate::framelib::{Frame, StateVector};
use crate::units::{kilometer, radian, Angle, Length};
use crate::Result;

/// An Earth ellipsoid model used for geodetic-to-geocentric conversion.
#[derive(Debug, Clone)]
pub struct Geoid {
    /// Name of the geoid model
    pub name: &'static str,
    /// Equatorial radius in km
    pub radius_km: f64,
    /// Inverse flattening (a / (a - b))
    pub inverse_flattening: f64,
    /// (1 - f)^2, precomputed
    one_minus_flattening_squared: f64,
}

impl Geoid {
    pub const fn new(name: &'static str, radius_km: f64, inverse_flattening: f64) -> Self {
        let f = 1.0 / inverse_flattening;
        let omf = 1.0 - f;
        Geoid {
            name,
            radius_km,
            inverse_flattening,
            one_minus_flattening_squared: omf * omf,
        }
    }

    /// Create a geographic position on this ellipsoid.
    ///
    /// # Arguments
    /// * `latitude_degrees` - Geodetic latitude in degrees (positive north)
    /// * `longitude_degrees` - Longitude in degrees (positive east)
    /// * `elevation_m` - Height above the ellipsoid in meters
    pub fn latlon(
        &self,
        latitude_degrees: f64,
        longitude_degrees: f64,
        elevation_m: f64,
    ) -> GeographicPosition {
        let lat = latitude_degrees * DEG2RAD;
        let lon = longitude_degrees * DEG2RAD;

        let (sinphi, cosphi) = lat.sin_cos();

        // Radius of curvature in the prime vertical
        let c =
            1.0 / (cosphi * cosphi + sinphi * sinphi * self.one_minus_flattening_squared).sqrt();
        let s = self.one_minus_flattening_squared * c;

        let elevation_km = elevation_m / 1000.0;
        let xy = (self.radius_km * c + elevation_km) * cosphi;
        let z = (self.radius_km * s + elevation_km) * sinphi;

        GeographicPosition {
            latitude: lat,
            longitude: lon,
            elevation_m,
            itrs_xyz: Vector3::new(xy * lon.cos(), xy * lon.sin(), z),
        }
    }
}

/// WGS84 ellipsoid (GPS standard)
pub const WGS84: Geoid = Geoid::new("WGS84", WGS84_RADIUS_KM, WGS84_INVERSE_FLATTENING);

/// Altitude, azimuth and range of a target seen from an observer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HorizontalCoordinates {
    /// Angle above the horizon (negative below)
    pub altitude: Angle,
    /// Clockwise from north (0 = N, 90 = E)
    pub azimuth: Angle,
    /// Topocentric distance
    pub distance: Length,
}

/// A geographic position on Earth's surface.
///
/// Holds the geodetic coordinates and precomputed ITRS position vector.
#[derive(Debug, Clone)]
pub struct GeographicPosition {
    /// Geodetic latitude in radians
    pub latitude: f64,
    /// Longitude in radians
    pub longitude: f64,
    /// Elevation above ellipsoid in meters
    pub elevation_m: f64,
    /// ITRS position in km
    pub itrs_xyz: Vector3<f64>,
}

impl GeographicPosition {
    /// Horizon coordinates of `target`, which may be in any frame.
    pub fn altaz(&self, target: &StateVector) -> Result<HorizontalCoordinates> {
        let itrs = target.transform_to(Frame::Itrs)?;
        let offset = itrs.position - self.itrs_xyz;
        let (alt, az) = self.itrs_to_horizon(&offset);
        Ok(HorizontalCoordinates {
            altitude: Angle::new::<radian>(alt),
            azimuth: Angle::new::<radian>(az),
            distance: Length::new::<kilometer>(offset.norm()),
        })
    }

    /// Altitude of `target` above the horizon in degrees
    pub fn altitude_degrees(&self, target: &StateVector) -> Result<f64> {
        let itrs = target.transform_to(Frame::Itrs)?;
        let (alt, _) = self.itrs_to_horizon(&(itrs.position - self.itrs_xyz));
        Ok(alt * RAD2DEG)
    }

    /// Rotate an ITRS direction vector into local horizon coordinates.
    ///
    /// Returns (altitude_radians, azimuth_radians).
    pub fn itrs_to_horizon(&self, itrs_direction: &Vector3<f64>) -> (f64, f64) {
        let (slat, clat) = self.latitude.sin_cos();
        let (slon, clon) = self.longitude.sin_cos();

        // Rotation from ITRS to local horizon (south, east, up)
        // R = R_y(90° - lat) × R_z(lon)
        let south = slat * clon * itrs_direction.x + slat * slon * itrs_direction.y
            - clat * itrs_direction.z;
        let east = -slon * itrs_direction.x + clon * itrs_direction.y;
        let up = clat * clon * itrs_direction.x
            + clat * slon * itrs_direction.y
            + slat * itrs_direction.z;

        let alt = up.atan2(south.hypot(east));

        // Clockwise from north, north = -south
        let mut az = east.atan2(-south);
        if az < 0.0 {
            az += TAU;
        }

        (alt, az)
    }
}

impl std::fmt::Display for GeographicPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let lat_d = self.latitude * RAD2DEG;
        let lon_d = self.longitude * RAD2DEG;
        let ns = if lat_d >= 0.0 { "N" } else { "S" };
        let ew = if lon_d >= 0.0 { "E" } else { "W" };
        write!(
            f,
            "{:.4}° {}, {:.4}° {}, {:.1} m",
            lat_d.abs(),
            ns,
            lon_d.abs(),
            ew,
            self.elevation_m
        )
    }
}
