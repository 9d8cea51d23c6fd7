//! Time scales and the [`Time`] instant type
//!
//! A [`Time`] stores its Terrestrial Time Julian date as a whole part plus a
//! fraction, which keeps sub-millisecond resolution across centuries. UTC,
//! TAI, UT1 and TDB are derived on demand:
//!
//! ```text
//! TAI = UTC + leap seconds
//! TT  = TAI + 32.184 s
//! UT1 = UTC + DUT1            (DUT1 from EarthOrientation, explicit)
//! TDB = TT + periodic terms   (Fairhead & Bretagnon, truncated)
//! ```
//!
//! Earth orientation parameters are never looked up from global state: each
//! [`Timescale`] is built with an [`EarthOrientation`] value and stamps it on
//! every [`Time`] it creates.

pub mod calendar;

use std::fmt::Write as _;

use chrono::{DateTime, Datelike, NaiveDateTime, Timelike, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::constants::{ASEC2RAD, DAYS_PER_CENTURY, DAY_S, J2000, TT_MINUS_TAI_S, UNIX_EPOCH_JD};
use crate::{Result, SkytrackError};

use calendar::{calendar_date, julian_date_at_midnight, split_civil_day};

/// TAI - UTC in seconds, keyed by the UTC date the offset took effect
const LEAP_SECOND_DATES: [(i32, u32, f64); 28] = [
    (1972, 1, 10.0),
    (1972, 7, 11.0),
    (1973, 1, 12.0),
    (1974, 1, 13.0),
    (1975, 1, 14.0),
    (1976, 1, 15.0),
    (1977, 1, 16.0),
    (1978, 1, 17.0),
    (1979, 1, 18.0),
    (1980, 1, 19.0),
    (1981, 7, 20.0),
    (1982, 7, 21.0),
    (1983, 7, 22.0),
    (1985, 7, 23.0),
    (1988, 1, 24.0),
    (1990, 1, 25.0),
    (1991, 1, 26.0),
    (1992, 7, 27.0),
    (1993, 7, 28.0),
    (1994, 7, 29.0),
    (1996, 1, 30.0),
    (1997, 7, 31.0),
    (1999, 1, 32.0),
    (2006, 1, 33.0),
    (2009, 1, 34.0),
    (2012, 7, 35.0),
    (2015, 7, 36.0),
    (2017, 1, 37.0),
];

/// Leap second table as (UTC JD of change, TAI JD of change, TAI - UTC)
static LEAP_SECONDS: Lazy<Vec<(f64, f64, f64)>> = Lazy::new(|| {
    LEAP_SECOND_DATES
        .iter()
        .map(|&(year, month, offset)| {
            let utc_jd = julian_date_at_midnight(year, month, 1);
            (utc_jd, utc_jd + offset / DAY_S, offset)
        })
        .collect()
});

/// TAI - UTC at a UTC Julian date. Dates before 1972 use the first entry.
fn leap_seconds_at_utc(utc_jd: f64) -> f64 {
    let idx = LEAP_SECONDS.partition_point(|&(start, _, _)| start <= utc_jd);
    LEAP_SECONDS[idx.saturating_sub(1)].2
}

/// TAI - UTC at a TAI Julian date
fn leap_seconds_at_tai(tai_jd: f64) -> f64 {
    let idx = LEAP_SECONDS.partition_point(|&(_, start, _)| start <= tai_jd);
    LEAP_SECONDS[idx.saturating_sub(1)].2
}

/// TDB - TT in seconds for a TT (or TDB) Julian date
pub fn tdb_minus_tt(jd: f64) -> f64 {
    let t = (jd - J2000) / 36525.0;
    0.001657 * (628.3076 * t + 6.2401).sin()
        + 0.000022 * (575.3385 * t + 4.2970).sin()
        + 0.000014 * (1256.6152 * t + 6.1969).sin()
        + 0.000005 * (606.9777 * t + 4.0212).sin()
        + 0.000005 * (52.9691 * t + 0.4444).sin()
        + 0.000002 * (21.3299 * t + 5.5431).sin()
        + 0.000010 * t * (628.3076 * t + 4.2490).sin()
}

/// Earth orientation parameters applied by a [`Timescale`].
///
/// Zeros by default, which is adequate for the sub-arcsecond frame work here
/// when no IERS bulletin values are at hand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EarthOrientation {
    /// UT1 - UTC in seconds
    pub dut1_seconds: f64,
    /// Polar motion x_p in arcseconds
    pub polar_motion_x_arcsec: f64,
    /// Polar motion y_p in arcseconds
    pub polar_motion_y_arcsec: f64,
    /// Celestial pole offset dX relative to the IAU 2006/2000A model, arcseconds
    pub celestial_pole_dx_arcsec: f64,
    /// Celestial pole offset dY relative to the IAU 2006/2000A model, arcseconds
    pub celestial_pole_dy_arcsec: f64,
}

impl EarthOrientation {
    /// Parse orientation parameters from a JSON object
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| SkytrackError::ConfigError(format!("Earth orientation: {e}")))
    }
}

/// Calendar components accepted by [`Timescale::utc`]
pub trait CalendarTuple {
    /// (year, month, day, hour, minute, second)
    fn into_components(self) -> (i32, u32, u32, u32, u32, f64);
}

impl CalendarTuple for (i32, u32, u32) {
    fn into_components(self) -> (i32, u32, u32, u32, u32, f64) {
        (self.0, self.1, self.2, 0, 0, 0.0)
    }
}

impl CalendarTuple for (i32, u32, u32, u32, u32, f64) {
    fn into_components(self) -> (i32, u32, u32, u32, u32, f64) {
        self
    }
}

/// Factory for [`Time`] values sharing one set of Earth orientation parameters
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Timescale {
    orientation: EarthOrientation,
}

impl Timescale {
    /// Timescale applying the given Earth orientation parameters
    pub fn with_earth_orientation(orientation: EarthOrientation) -> Self {
        Timescale { orientation }
    }

    pub fn earth_orientation(&self) -> &EarthOrientation {
        &self.orientation
    }

    /// Time from a TT Julian date, optionally split into whole and fraction
    pub fn tt_jd(&self, jd: f64, fraction: Option<f64>) -> Time {
        Time::from_parts(jd, fraction.unwrap_or(0.0), self.orientation)
    }

    /// Time from a TAI Julian date
    pub fn tai_jd(&self, jd: f64) -> Time {
        Time::from_parts(jd, TT_MINUS_TAI_S / DAY_S, self.orientation)
    }

    /// Time from a TDB Julian date
    pub fn tdb_jd(&self, jd: f64) -> Time {
        Time::from_parts(jd, -tdb_minus_tt(jd) / DAY_S, self.orientation)
    }

    /// Time from a UTC Julian date, optionally split into whole and fraction
    pub fn utc_jd(&self, jd: f64, fraction: Option<f64>) -> Time {
        let fraction = fraction.unwrap_or(0.0);
        let leap = leap_seconds_at_utc(jd + fraction);
        Time::from_parts(
            jd,
            fraction + (leap + TT_MINUS_TAI_S) / DAY_S,
            self.orientation,
        )
    }

    /// Time from UTC calendar components, `(y, m, d)` or `(y, m, d, h, mi, s)`
    pub fn utc<C: CalendarTuple>(&self, components: C) -> Time {
        let (year, month, day, hour, minute, second) = components.into_components();
        let midnight = julian_date_at_midnight(year, month, day);
        let seconds = hour as f64 * 3600.0 + minute as f64 * 60.0 + second;
        self.utc_jd(midnight, Some(seconds / DAY_S))
    }

    /// Time from a UTC year and fractional day of year, where 1.0 is the
    /// start of January 1 (the TLE epoch convention)
    pub fn utc_day_of_year(&self, year: i32, day_of_year: f64) -> Time {
        let jan0 = julian_date_at_midnight(year, 1, 1) - 1.0;
        let whole = day_of_year.floor();
        self.utc_jd(jan0 + whole, Some(day_of_year - whole))
    }

    /// Time from seconds since 1970-01-01T00:00:00 UTC
    pub fn from_unix_timestamp(&self, seconds: f64) -> Time {
        let days = (seconds / DAY_S).floor();
        self.utc_jd(UNIX_EPOCH_JD + days, Some((seconds - days * DAY_S) / DAY_S))
    }

    /// Time from a chrono UTC datetime
    pub fn from_datetime(&self, dt: &DateTime<Utc>) -> Time {
        self.from_naive_utc(&dt.naive_utc())
    }

    /// Time from a naive datetime interpreted as UTC
    pub fn from_naive_utc(&self, dt: &NaiveDateTime) -> Time {
        let second = dt.second() as f64 + dt.nanosecond() as f64 / 1e9;
        self.utc((
            dt.year(),
            dt.month(),
            dt.day(),
            dt.hour(),
            dt.minute(),
            second,
        ))
    }
}

/// An instant, stored as a TT Julian date split into whole and fraction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Time {
    whole: f64,
    tt_fraction: f64,
    orientation: EarthOrientation,
}

impl Time {
    fn from_parts(whole: f64, fraction: f64, orientation: EarthOrientation) -> Self {
        let int_part = whole.floor();
        let mut fraction = (whole - int_part) + fraction;
        let carry = fraction.floor();
        fraction -= carry;
        Time {
            whole: int_part + carry,
            tt_fraction: fraction,
            orientation,
        }
    }

    /// Whole part of the TT Julian date
    pub fn whole(&self) -> f64 {
        self.whole
    }

    /// Fractional part of the TT Julian date, in `[0, 1)`
    pub fn tt_fraction(&self) -> f64 {
        self.tt_fraction
    }

    /// TT Julian date
    pub fn tt(&self) -> f64 {
        self.whole + self.tt_fraction
    }

    /// TAI Julian date
    pub fn tai(&self) -> f64 {
        self.whole + (self.tt_fraction - TT_MINUS_TAI_S / DAY_S)
    }

    /// TAI - UTC in effect at this instant
    pub fn leap_seconds(&self) -> f64 {
        leap_seconds_at_tai(self.tai())
    }

    fn utc_fraction(&self) -> f64 {
        self.tt_fraction - (TT_MINUS_TAI_S + self.leap_seconds()) / DAY_S
    }

    /// UTC Julian date
    pub fn utc_jd(&self) -> f64 {
        self.whole + self.utc_fraction()
    }

    /// UT1 Julian date
    pub fn ut1(&self) -> f64 {
        self.whole + (self.utc_fraction() + self.orientation.dut1_seconds / DAY_S)
    }

    /// UT1 Julian date as (whole, fraction), keeping full resolution for
    /// sidereal time
    pub fn ut1_parts(&self) -> (f64, f64) {
        (
            self.whole,
            self.utc_fraction() + self.orientation.dut1_seconds / DAY_S,
        )
    }

    /// TDB Julian date
    pub fn tdb(&self) -> f64 {
        self.whole + (self.tt_fraction + tdb_minus_tt(self.tt()) / DAY_S)
    }

    /// Julian centuries of TT since J2000.0
    pub fn tt_centuries(&self) -> f64 {
        ((self.whole - J2000) + self.tt_fraction) / DAYS_PER_CENTURY
    }

    pub fn earth_orientation(&self) -> &EarthOrientation {
        &self.orientation
    }

    /// Polar motion (x_p, y_p) in radians
    pub fn polar_motion(&self) -> (f64, f64) {
        (
            self.orientation.polar_motion_x_arcsec * ASEC2RAD,
            self.orientation.polar_motion_y_arcsec * ASEC2RAD,
        )
    }

    /// Celestial pole offsets (dX, dY) in radians
    pub fn celestial_pole_offsets(&self) -> (f64, f64) {
        (
            self.orientation.celestial_pole_dx_arcsec * ASEC2RAD,
            self.orientation.celestial_pole_dy_arcsec * ASEC2RAD,
        )
    }

    /// This instant shifted by `days` of TT
    pub fn add_days(&self, days: f64) -> Time {
        Time::from_parts(self.whole, self.tt_fraction + days, self.orientation)
    }

    /// This instant shifted by `seconds` of TT
    pub fn add_seconds(&self, seconds: f64) -> Time {
        self.add_days(seconds / DAY_S)
    }

    /// TT days elapsed since `earlier`
    pub fn days_since(&self, earlier: &Time) -> f64 {
        (self.whole - earlier.whole) + (self.tt_fraction - earlier.tt_fraction)
    }

    /// TT seconds elapsed since `earlier`
    pub fn seconds_since(&self, earlier: &Time) -> f64 {
        self.days_since(earlier) * DAY_S
    }

    /// Seconds since 1970-01-01T00:00:00 UTC, leap seconds excluded
    pub fn unix_timestamp(&self) -> f64 {
        ((self.whole - UNIX_EPOCH_JD) + self.utc_fraction()) * DAY_S
    }

    /// UTC calendar components (year, month, day, hour, minute, second)
    pub fn utc_calendar(&self) -> (i32, u32, u32, u32, u32, f64) {
        let (jdn, day_fraction) = split_civil_day(self.whole, self.utc_fraction());
        let (year, month, day) = calendar_date(jdn);
        let seconds = day_fraction * DAY_S;
        let hour = (seconds / 3600.0).floor();
        let minute = ((seconds - hour * 3600.0) / 60.0).floor();
        let second = seconds - hour * 3600.0 - minute * 60.0;
        (year, month, day, hour as u32, minute as u32, second)
    }

    /// UTC as a chrono datetime
    pub fn utc_datetime(&self) -> Result<DateTime<Utc>> {
        let timestamp = self.unix_timestamp();
        let secs = timestamp.floor();
        let nanos = ((timestamp - secs) * 1e9).round().min(999_999_999.0) as u32;
        DateTime::from_timestamp(secs as i64, nanos).ok_or_else(|| {
            SkytrackError::InvalidTime(format!("TT JD {} is not representable as UTC", self.tt()))
        })
    }

    /// Format the UTC datetime with a chrono `strftime` pattern
    pub fn utc_strftime(&self, format: &str) -> Result<String> {
        let dt = self.utc_datetime()?;
        let mut out = String::new();
        write!(out, "{}", dt.format(format))
            .map_err(|_| SkytrackError::InvalidTime(format!("bad format string {format:?}")))?;
        Ok(out)
    }

    /// ISO 8601 UTC string with millisecond precision
    pub fn utc_iso(&self) -> Result<String> {
        self.utc_strftime("%Y-%m-%dT%H:%M:%S%.3fZ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_j2000_tt() {
        let ts = Timescale::default();
        let t = ts.tt_jd(J2000, None);
        assert_eq!(t.tt(), J2000);
        assert_eq!(t.tt_centuries(), 0.0);
    }

    #[test]
    fn test_utc_to_tt_offset_2020() {
        let ts = Timescale::default();
        let t = ts.utc((2020, 4, 12));
        // 37 leap seconds plus 32.184 s
        assert_relative_eq!(t.tt() - 2458951.5, 69.184 / DAY_S, epsilon = 1e-9);
        assert_eq!(t.leap_seconds(), 37.0);
    }

    #[test]
    fn test_leap_second_boundary() {
        let ts = Timescale::default();
        let before = ts.utc((2016, 12, 31, 23, 59, 59.0));
        let after = ts.utc((2017, 1, 1, 0, 0, 1.0));
        assert_eq!(before.leap_seconds(), 36.0);
        assert_eq!(after.leap_seconds(), 37.0);
        // Two civil seconds apart, plus the inserted 23:59:60
        assert_relative_eq!(after.seconds_since(&before), 3.0, epsilon = 1e-5);
    }

    #[test]
    fn test_pre_1972_uses_first_offset() {
        let ts = Timescale::default();
        let t = ts.utc((1960, 1, 1));
        assert_eq!(t.leap_seconds(), 10.0);
    }

    #[test]
    fn test_utc_calendar_roundtrip() {
        let ts = Timescale::default();
        let t = ts.utc((2019, 12, 9, 16, 38, 29.5));
        let (y, mo, d, h, mi, s) = t.utc_calendar();
        assert_eq!((y, mo, d, h, mi), (2019, 12, 9, 16, 38));
        assert_relative_eq!(s, 29.5, epsilon = 1e-4);
    }

    #[test]
    fn test_day_of_year() {
        let ts = Timescale::default();
        let t = ts.utc_day_of_year(2000, 182.78495062);
        assert_relative_eq!(t.utc_jd(), 2451544.5 + 181.78495062, epsilon = 1e-9);
        let (y, mo, d, h, _, _) = t.utc_calendar();
        assert_eq!((y, mo, d, h), (2000, 6, 30, 18));
    }

    #[test]
    fn test_unix_timestamp_roundtrip() {
        let ts = Timescale::default();
        let t = ts.from_unix_timestamp(1_586_649_600.0);
        assert_relative_eq!(t.utc_jd(), 2458951.5, epsilon = 1e-9);
        assert_relative_eq!(t.unix_timestamp(), 1_586_649_600.0, epsilon = 1e-4);
    }

    #[test]
    fn test_chrono_interop() {
        let ts = Timescale::default();
        let dt = DateTime::from_timestamp(1_586_662_428, 770_000_000).unwrap();
        let t = ts.from_datetime(&dt);
        let back = t.utc_datetime().unwrap();
        assert!((back - dt).num_milliseconds().abs() <= 1);
        assert_eq!(
            t.utc_strftime("%Y-%m-%d %H:%M:%S").unwrap(),
            "2020-04-12 03:33:48"
        );
    }

    #[test]
    fn test_add_and_difference() {
        let ts = Timescale::default();
        let t0 = ts.tt_jd(2458826.0, None);
        let t1 = t0.add_seconds(600.0);
        assert_relative_eq!(t1.seconds_since(&t0), 600.0, epsilon = 1e-6);
        let t2 = t0.add_days(-1.25);
        assert_relative_eq!(t2.tt(), 2458824.75, epsilon = 1e-12);
        assert!(t2.tt_fraction() >= 0.0 && t2.tt_fraction() < 1.0);
    }

    #[test]
    fn test_tdb_roundtrip() {
        let ts = Timescale::default();
        let t = ts.tdb_jd(2458826.5);
        assert_relative_eq!(t.tdb(), 2458826.5, epsilon = 1e-11);
        assert!((t.tdb() - t.tt()).abs() * DAY_S < 0.002);
    }

    #[test]
    fn test_ut1_uses_explicit_dut1() {
        let ts = Timescale::with_earth_orientation(EarthOrientation {
            dut1_seconds: -0.2,
            ..Default::default()
        });
        let t = ts.utc((2020, 1, 1));
        assert_relative_eq!((t.ut1() - t.utc_jd()) * DAY_S, -0.2, epsilon = 1e-5);
    }

    #[test]
    fn test_earth_orientation_from_json() {
        let eop = EarthOrientation::from_json(r#"{"dut1_seconds": 0.1, "polar_motion_x_arcsec": 0.05}"#)
            .unwrap();
        assert_eq!(eop.dut1_seconds, 0.1);
        assert_eq!(eop.polar_motion_y_arcsec, 0.0);
        assert_eq!(eop.celestial_pole_dx_arcsec, 0.0);
        assert!(EarthOrientation::from_json("{").is_err());

        let t = Timescale::with_earth_orientation(
            EarthOrientation::from_json(r#"{"celestial_pole_dx_arcsec": -0.000205, "celestial_pole_dy_arcsec": -0.000136}"#)
                .unwrap(),
        )
        .utc((2004, 4, 6));
        let (dx, dy) = t.celestial_pole_offsets();
        assert_relative_eq!(dx, -0.000205 * ASEC2RAD, epsilon = 1e-18);
        assert_relative_eq!(dy, -0.000136 * ASEC2RAD, epsilon = 1e-18);
    }
}
