//! Physical and astronomical constants

/// Full circle in radians
pub const TAU: f64 = std::f64::consts::TAU;

/// Julian date of the J2000.0 epoch (TT)
pub const J2000: f64 = 2451545.0;

/// Days per Julian century
pub const DAYS_PER_CENTURY: f64 = 36525.0;

/// Seconds per day
pub const DAY_S: f64 = 86400.0;

/// Minutes per day
pub const DAY_MIN: f64 = 1440.0;

/// Arcseconds to radians
pub const ASEC2RAD: f64 = 4.848136811095359935899141e-6;

/// Degrees to radians
pub const DEG2RAD: f64 = std::f64::consts::PI / 180.0;

/// Radians to degrees
pub const RAD2DEG: f64 = 180.0 / std::f64::consts::PI;

/// Astronomical unit in kilometers (IAU 2012)
pub const AU_KM: f64 = 149_597_870.700;

/// Nominal Earth rotation rate in rad/s (GRS80), used for the TEME/TIRS velocity term
pub const EARTH_ANGVEL: f64 = 7.292115e-5;

/// TT minus TAI in seconds
pub const TT_MINUS_TAI_S: f64 = 32.184;

/// Julian date of the Unix epoch, 1970-01-01T00:00:00 UTC
pub const UNIX_EPOCH_JD: f64 = 2440587.5;

/// WGS84 equatorial radius in kilometers
pub const WGS84_RADIUS_KM: f64 = 6378.137;

/// WGS84 inverse flattening
pub const WGS84_INVERSE_FLATTENING: f64 = 298.257_223_563;
