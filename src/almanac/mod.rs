//! Rise, set and culmination times from sampled altitude curves
//!
//! A body's altitude above an observer's horizon is sampled at a fixed step
//! (10 minutes by default) and interpolated. Horizon crossings and turning
//! points are then found on the interpolant instead of by repeated direct
//! evaluation, which keeps the number of ephemeris calls fixed.
//!
//! [`discrete_crossings`] finds the same crossings the classic way, by
//! [`find_discrete`] on the direct altitude, and serves as a reference.
//!
//! # Example
//!
//! ```ignore
//! let ts = Timescale::default();
//! let istanbul = WGS84.latlon(41.015137, 28.979530, 0.0);
//! let start = ts.utc((2020, 4, 12));
//! let curve = AltitudeCurve::sample(&LowPrecisionSun, &istanbul, &start, &SamplingConfig::default())?;
//! for event in curve.rise_set() {
//!     println!("{:?} at {}", event.kind, event.time.utc_iso()?);
//! }
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::DAY_S;
use crate::interplib::{Interpolant, InterpolatorConfig};
use crate::planetlib::EphemerisProvider;
use crate::searchlib::{
    find_crossings, find_discrete, find_extrema, EventKind, ExtremumKind, DEFAULT_NUM,
    EPSILON_DISCRETE,
};
use crate::time::Time;
use crate::toposlib::GeographicPosition;
use crate::{Result, SkytrackError};

/// Geometric horizon
pub const HORIZON_DEGREES: f64 = 0.0;

/// How an altitude curve is sampled and interpolated
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    /// Spacing between altitude samples
    pub step_seconds: f64,
    /// Length of the sampled window
    pub duration_seconds: f64,
    pub interpolation: InterpolatorConfig,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        SamplingConfig {
            step_seconds: 600.0,
            duration_seconds: DAY_S,
            interpolation: InterpolatorConfig::akima(),
        }
    }
}

impl SamplingConfig {
    /// Parse a configuration from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let config: SamplingConfig = serde_json::from_str(json)
            .map_err(|e| SkytrackError::ConfigError(format!("sampling: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let positive = |v: f64| v > 0.0 && v.is_finite();
        if !positive(self.step_seconds) || !positive(self.duration_seconds) {
            return Err(SkytrackError::ConfigError(format!(
                "step ({} s) and duration ({} s) must be positive",
                self.step_seconds, self.duration_seconds
            )));
        }
        if self.step_seconds > self.duration_seconds {
            return Err(SkytrackError::ConfigError(format!(
                "step ({} s) exceeds duration ({} s)",
                self.step_seconds, self.duration_seconds
            )));
        }
        Ok(())
    }

    /// Sample offsets from the window start, in days
    fn offsets_days(&self) -> Vec<f64> {
        let count = (self.duration_seconds / self.step_seconds + 1e-9).floor() as usize + 1;
        (0..count)
            .map(|i| i as f64 * self.step_seconds / DAY_S)
            .collect()
    }
}

/// What happened at an almanac event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlmanacEventKind {
    /// Crossing the level upwards
    Rise,
    /// Crossing the level downwards
    Set,
    /// Touching the level with zero vertical rate
    Graze,
    /// Highest altitude
    Culmination,
    /// Lowest altitude
    LowestPoint,
    /// Altitude turning point that is neither highest nor lowest
    Stationary,
}

/// A dated almanac event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlmanacEvent {
    pub time: Time,
    pub kind: AlmanacEventKind,
    /// Altitude at the event in degrees
    pub altitude_deg: f64,
}

/// Interpolated altitude of one body above one observer's horizon
#[derive(Debug, Clone)]
pub struct AltitudeCurve {
    start: Time,
    curve: Interpolant,
}

impl AltitudeCurve {
    /// Sample the altitude of `provider`'s body over the configured window
    /// starting at `start`
    pub fn sample<P: EphemerisProvider + ?Sized>(
        provider: &P,
        observer: &GeographicPosition,
        start: &Time,
        config: &SamplingConfig,
    ) -> Result<Self> {
        config.validate()?;
        let offsets = config.offsets_days();
        let altitudes = offsets
            .iter()
            .map(|&d| {
                let state = provider.state_at(&start.add_days(d))?;
                observer.altitude_degrees(&state)
            })
            .collect::<Result<Vec<f64>>>()?;

        debug!(
            samples = offsets.len(),
            step_seconds = config.step_seconds,
            observer = %observer,
            "sampled altitude curve"
        );

        let curve = Interpolant::new(&offsets, &altitudes, &config.interpolation)?;
        Ok(AltitudeCurve {
            start: *start,
            curve,
        })
    }

    /// Start of the sampled window
    pub fn start(&self) -> &Time {
        &self.start
    }

    /// End of the sampled window
    pub fn end(&self) -> Time {
        self.start.add_days(self.curve.domain().1)
    }

    /// The underlying interpolant, altitude in degrees over days since start
    pub fn interpolant(&self) -> &Interpolant {
        &self.curve
    }

    /// Interpolated altitude in degrees
    pub fn altitude_at(&self, t: &Time) -> Result<f64> {
        Ok(self.curve.evaluate(t.days_since(&self.start))?)
    }

    /// Interpolated altitudes in degrees at each of `times`
    pub fn altitudes_at(&self, times: &[Time]) -> Result<Vec<f64>> {
        let offsets: Vec<f64> = times.iter().map(|t| t.days_since(&self.start)).collect();
        Ok(self.curve.evaluate_many(&offsets)?)
    }

    /// Crossings of the altitude `level_degrees`, in time order
    pub fn crossings(&self, level_degrees: f64) -> Vec<AlmanacEvent> {
        find_crossings(&self.curve, level_degrees)
            .into_iter()
            .map(|event| AlmanacEvent {
                time: self.start.add_days(event.t),
                kind: match event.kind {
                    EventKind::Rising => AlmanacEventKind::Rise,
                    EventKind::Falling => AlmanacEventKind::Set,
                    EventKind::Stationary => AlmanacEventKind::Graze,
                },
                altitude_deg: level_degrees,
            })
            .collect()
    }

    /// Rises and sets over the geometric horizon
    pub fn rise_set(&self) -> Vec<AlmanacEvent> {
        self.crossings(HORIZON_DEGREES)
    }

    /// Highest and lowest points of the curve
    pub fn culminations(&self) -> Vec<AlmanacEvent> {
        find_extrema(&self.curve)
            .into_iter()
            .map(|extremum| AlmanacEvent {
                time: self.start.add_days(extremum.t),
                kind: match extremum.kind {
                    ExtremumKind::Maximum => AlmanacEventKind::Culmination,
                    ExtremumKind::Minimum => AlmanacEventKind::LowestPoint,
                    ExtremumKind::Stationary => AlmanacEventKind::Stationary,
                },
                altitude_deg: extremum.value,
            })
            .collect()
    }
}

/// Crossings of `level_degrees` found by [`find_discrete`] on the directly
/// computed altitude between `start` and `end`, refined to a millisecond
pub fn discrete_crossings<P: EphemerisProvider + ?Sized>(
    provider: &P,
    observer: &GeographicPosition,
    start: &Time,
    end: &Time,
    level_degrees: f64,
    step_seconds: f64,
) -> Result<Vec<AlmanacEvent>> {
    let span = end.days_since(start);
    let mut failure: Option<SkytrackError> = None;

    let mut above = |offsets: &[f64]| -> Vec<i64> {
        offsets
            .iter()
            .map(|&d| {
                if failure.is_some() {
                    return 0;
                }
                let altitude = provider
                    .state_at(&start.add_days(d))
                    .and_then(|state| observer.altitude_degrees(&state));
                match altitude {
                    Ok(alt) => i64::from(alt >= level_degrees),
                    Err(e) => {
                        failure = Some(e);
                        0
                    }
                }
            })
            .collect()
    };

    let transitions = find_discrete(
        0.0,
        span,
        &mut above,
        step_seconds / DAY_S,
        EPSILON_DISCRETE,
        DEFAULT_NUM,
    )?;
    if let Some(e) = failure {
        return Err(e);
    }

    Ok(transitions
        .into_iter()
        .map(|(d, value)| AlmanacEvent {
            time: start.add_days(d),
            kind: if value == 1 {
                AlmanacEventKind::Rise
            } else {
                AlmanacEventKind::Set
            },
            altitude_deg: level_degrees,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interplib::Extrapolation;
    use crate::InterpolationError;
    use crate::planetlib::{LowPrecisionMoon, LowPrecisionSun};
    use crate::time::Timescale;
    use crate::toposlib::WGS84;
    use approx::assert_relative_eq;

    fn istanbul() -> GeographicPosition {
        WGS84.latlon(41.015137, 28.979530, 0.0)
    }

    fn seconds_of_day(t: &Time) -> f64 {
        let (_, _, _, hour, minute, second) = t.utc_calendar();
        hour as f64 * 3600.0 + minute as f64 * 60.0 + second
    }

    #[test]
    fn test_istanbul_sunrise_and_sunset() {
        let ts = Timescale::default();
        let start = ts.utc((2020, 4, 12));
        let observer = istanbul();
        let curve =
            AltitudeCurve::sample(&LowPrecisionSun, &observer, &start, &SamplingConfig::default())
                .unwrap();

        let events = curve.rise_set();
        assert_eq!(events.len(), 2, "{events:?}");
        assert_eq!(events[0].kind, AlmanacEventKind::Rise);
        assert_eq!(events[1].kind, AlmanacEventKind::Set);

        // 03:33:48 and 16:36:28 UTC
        assert!((seconds_of_day(&events[0].time) - 12_828.0).abs() < 60.0);
        assert!((seconds_of_day(&events[1].time) - 59_788.0).abs() < 60.0);

        let reference = discrete_crossings(
            &LowPrecisionSun,
            &observer,
            &start,
            &curve.end(),
            HORIZON_DEGREES,
            600.0,
        )
        .unwrap();
        assert_eq!(reference.len(), 2);
        for (found, exact) in events.iter().zip(&reference) {
            assert_eq!(found.kind, exact.kind);
            let miss = found.time.seconds_since(&exact.time).abs();
            assert!(miss < 60.0, "interpolated event {miss} s from reference");
        }
    }

    #[test]
    fn test_istanbul_culmination() {
        let ts = Timescale::default();
        let start = ts.utc((2020, 4, 12));
        let curve = AltitudeCurve::sample(
            &LowPrecisionSun,
            &istanbul(),
            &start,
            &SamplingConfig::default(),
        )
        .unwrap();

        let turning = curve.culminations();
        assert_eq!(turning.len(), 2, "{turning:?}");
        assert_eq!(turning[0].kind, AlmanacEventKind::Culmination);
        assert_eq!(turning[1].kind, AlmanacEventKind::LowestPoint);

        // Local apparent noon near 10:05 UTC with the Sun about 58 degrees up,
        // lowest near 22:04 UTC
        assert!((seconds_of_day(&turning[0].time) - 36_300.0).abs() < 120.0);
        assert!((turning[0].altitude_deg - 57.9).abs() < 0.5);
        assert!((seconds_of_day(&turning[1].time) - 79_460.0).abs() < 120.0);
        assert!((turning[1].altitude_deg + 39.9).abs() < 0.5);
    }

    #[test]
    fn test_istanbul_moon_above_minimum_elevation() {
        let ts = Timescale::default();
        let start = ts.utc((2020, 4, 12));
        let observer = istanbul();
        let curve = AltitudeCurve::sample(
            &LowPrecisionMoon,
            &observer,
            &start,
            &SamplingConfig::default(),
        )
        .unwrap();

        let min_elevation = 5.0;
        let events = curve.crossings(min_elevation);
        assert_eq!(events.len(), 2, "{events:?}");
        // Waning gibbous: drops below 5 degrees near 05:57 UTC, back above near 22:40
        assert_eq!(events[0].kind, AlmanacEventKind::Set);
        assert_eq!(events[1].kind, AlmanacEventKind::Rise);
        assert!((seconds_of_day(&events[0].time) - 21_420.0).abs() < 180.0);
        assert!((seconds_of_day(&events[1].time) - 81_600.0).abs() < 180.0);

        let reference = discrete_crossings(
            &LowPrecisionMoon,
            &observer,
            &start,
            &curve.end(),
            min_elevation,
            600.0,
        )
        .unwrap();
        assert_eq!(reference.len(), 2);
        for (found, exact) in events.iter().zip(&reference) {
            assert_eq!(found.kind, exact.kind);
            let miss = found.time.seconds_since(&exact.time).abs();
            assert!(miss < 60.0, "interpolated event {miss} s from reference");
        }
    }

    #[test]
    fn test_altitude_curve_respects_domain_policy() {
        let ts = Timescale::default();
        let start = ts.utc((2020, 4, 12));
        let observer = istanbul();
        let strict = AltitudeCurve::sample(
            &LowPrecisionSun,
            &observer,
            &start,
            &SamplingConfig::default(),
        )
        .unwrap();

        let inside = start.add_seconds(3600.0);
        let direct = observer
            .altitude_degrees(&LowPrecisionSun.state_at(&inside).unwrap())
            .unwrap();
        assert!((strict.altitude_at(&inside).unwrap() - direct).abs() < 0.01);

        let after = start.add_days(1.5);
        assert!(matches!(
            strict.altitude_at(&after),
            Err(SkytrackError::Interpolation(InterpolationError::OutOfDomain { .. }))
        ));

        let config = SamplingConfig {
            interpolation: InterpolatorConfig::spline(3).with_extrapolation(Extrapolation::Clamp),
            ..SamplingConfig::default()
        };
        let clamped = AltitudeCurve::sample(&LowPrecisionSun, &observer, &start, &config).unwrap();
        let last = clamped.altitude_at(&clamped.end()).unwrap();
        assert_relative_eq!(clamped.altitude_at(&after).unwrap(), last, epsilon = 1e-6);
    }

    #[test]
    fn test_altitudes_at_many_times() {
        let ts = Timescale::default();
        let start = ts.utc((2020, 4, 12));
        let observer = istanbul();
        let curve =
            AltitudeCurve::sample(&LowPrecisionSun, &observer, &start, &SamplingConfig::default())
                .unwrap();

        // Sample instants are reproduced exactly
        let times: Vec<Time> = (0..6).map(|i| start.add_seconds(i as f64 * 7200.0)).collect();
        let altitudes = curve.altitudes_at(&times).unwrap();
        assert_eq!(altitudes.len(), 6);
        for (t, altitude) in times.iter().zip(&altitudes) {
            let direct = observer
                .altitude_degrees(&LowPrecisionSun.state_at(t).unwrap())
                .unwrap();
            assert_relative_eq!(*altitude, direct, epsilon = 1e-6);
        }

        let mut beyond = times.clone();
        beyond.push(start.add_days(2.0));
        assert!(curve.altitudes_at(&beyond).is_err());
    }

    #[test]
    fn test_sampling_config_json() {
        let config = SamplingConfig::from_json(
            r#"{ "step_seconds": 300, "interpolation": { "method": { "kind": "spline", "degree": 3 } } }"#,
        )
        .unwrap();
        assert_eq!(config.step_seconds, 300.0);
        assert_eq!(config.duration_seconds, DAY_S);
        assert_eq!(config.interpolation, InterpolatorConfig::spline(3));
        assert_eq!(config.offsets_days().len(), 289);

        assert!(matches!(
            SamplingConfig::from_json(r#"{ "step_seconds": 0 }"#),
            Err(SkytrackError::ConfigError(_))
        ));
        assert!(matches!(
            SamplingConfig::from_json(r#"{ "step_seconds": 7200, "duration_seconds": 3600 }"#),
            Err(SkytrackError::ConfigError(_))
        ));
    }

    #[test]
    fn test_default_window_has_145_samples() {
        let offsets = SamplingConfig::default().offsets_days();
        assert_eq!(offsets.len(), 145);
        assert_eq!(offsets[144], 1.0);
    }
}
