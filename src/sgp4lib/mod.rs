//! SGP4 satellite propagation
//!
//! TLE parsing and the SGP4 model itself come from the `sgp4` crate. This
//! module wraps them as an [`EphemerisProvider`] that yields TEME state
//! vectors, ready for [`StateVector::transform_to`] or for trajectory
//! interpolation.
//!
//! Element sets are fitted against the WGS72 geopotential, so the model is
//! initialised in AFSPC compatibility mode, which uses WGS72 constants.
//!
//! # Example
//!
//! ```ignore
//! use skytrack::sgp4lib::Sgp4Satellite;
//! use skytrack::time::Timescale;
//!
//! let ts = Timescale::default();
//! let line1 = "1 25544U 98067A   19343.69339541  .00001764  00000-0  38792-4 0  9991";
//! let line2 = "2 25544  51.6439 211.2001 0007417  17.6667  85.6398 15.50103472202482";
//!
//! let iss = Sgp4Satellite::from_tle(line1, line2, Some("ISS"), &ts)?;
//! let teme = iss.state_at(&ts.utc((2019, 12, 9, 12, 0, 0.0)))?;
//! let gcrs = teme.transform_to(Frame::Gcrs)?;
//! ```

use chrono::{Datelike, Timelike};
use nalgebra::Vector3;
use sgp4::{Constants, Elements, MinutesSinceEpoch};
use tracing::trace;

use crate::constants::DAY_MIN;
use crate::framelib::{Frame, StateVector};
use crate::planetlib::EphemerisProvider;
use crate::time::{Time, Timescale};
use crate::{Result, SkytrackError};

/// An Earth satellite loaded from a TLE and propagated with SGP4.
#[derive(Debug, Clone)]
pub struct Sgp4Satellite {
    /// Satellite name (from line 0 of a 3LE or provided by the caller)
    pub name: Option<String>,

    /// The element set epoch
    pub epoch: Time,

    /// NORAD catalog ID
    pub norad_id: u64,

    /// Mean motion in revolutions per day
    pub revs_per_day: f64,

    model: Constants,
    elements: Elements,
}

impl Sgp4Satellite {
    /// Create a satellite from the two lines of a TLE.
    pub fn from_tle(
        line1: &str,
        line2: &str,
        name: Option<&str>,
        ts: &Timescale,
    ) -> Result<Self> {
        let tle = format!("{}\n{}", line1.trim(), line2.trim());
        let elements = sgp4::parse_2les(&tle)
            .map_err(|e| SkytrackError::DataError(format!("failed to parse TLE: {e:?}")))?
            .into_iter()
            .next()
            .ok_or_else(|| SkytrackError::DataError("no TLE elements found".into()))?;
        Self::from_elements(elements, name.map(String::from), ts)
    }

    /// Create a satellite from an OMM (Orbit Mean-elements Message) JSON string.
    pub fn from_omm(json: &str, ts: &Timescale) -> Result<Self> {
        let elements: Elements = serde_json::from_str(json)
            .map_err(|e| SkytrackError::DataError(format!("failed to parse OMM JSON: {e}")))?;
        let name = elements.object_name.clone();
        Self::from_elements(elements, name, ts)
    }

    /// Create a satellite from parsed SGP4 elements, with WGS72 constants.
    pub fn from_elements(
        elements: Elements,
        name: Option<String>,
        ts: &Timescale,
    ) -> Result<Self> {
        let model = Constants::from_elements_afspc_compatibility_mode(&elements).map_err(|e| {
            SkytrackError::Propagation(format!("SGP4 initialization failed: {e:?}"))
        })?;

        let dt = &elements.datetime;
        let second = dt.second() as f64 + dt.nanosecond() as f64 / 1e9;
        let epoch = ts.utc((dt.year(), dt.month(), dt.day(), dt.hour(), dt.minute(), second));

        Ok(Sgp4Satellite {
            name,
            epoch,
            norad_id: elements.norad_id,
            revs_per_day: elements.mean_motion,
            model,
            elements,
        })
    }

    /// The parsed element set
    pub fn elements(&self) -> &Elements {
        &self.elements
    }

    /// Minutes elapsed from the element epoch to `t`
    pub fn minutes_since_epoch(&self, t: &Time) -> f64 {
        t.days_since(&self.epoch) * DAY_MIN
    }

    /// TEME position (km) and velocity (km/s) at `t`
    pub fn propagate_teme(&self, t: &Time) -> Result<(Vector3<f64>, Vector3<f64>)> {
        let minutes = self.minutes_since_epoch(t);
        trace!(norad_id = self.norad_id, minutes, "propagating SGP4");
        let prediction = self
            .model
            .propagate(MinutesSinceEpoch(minutes))
            .map_err(|e| {
                SkytrackError::Propagation(format!(
                    "SGP4 propagation of #{} failed at {minutes} min: {e:?}",
                    self.norad_id
                ))
            })?;
        Ok((
            Vector3::from(prediction.position),
            Vector3::from(prediction.velocity),
        ))
    }

    /// Formatted display name, e.g. `"ISS catalog #25544 epoch 2019-12-09 16:38:29 UTC"`
    pub fn target_name(&self) -> String {
        let epoch = self
            .epoch
            .utc_strftime("%Y-%m-%d %H:%M:%S UTC")
            .unwrap_or_else(|_| "unknown".to_string());
        match &self.name {
            Some(n) => format!("{} catalog #{} epoch {}", n, self.norad_id, epoch),
            None => format!("catalog #{} epoch {}", self.norad_id, epoch),
        }
    }
}

impl EphemerisProvider for Sgp4Satellite {
    fn state_at(&self, t: &Time) -> Result<StateVector> {
        let (position, velocity) = self.propagate_teme(t)?;
        Ok(StateVector::new(Frame::Teme, *t, position, Some(velocity)))
    }
}

impl std::fmt::Display for Sgp4Satellite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.target_name())
    }
}

/// Parse every satellite in a block of 2-line or 3-line element sets.
pub fn parse_tle_file(tle_data: &str, ts: &Timescale) -> Result<Vec<Sgp4Satellite>> {
    let elements_list = match sgp4::parse_3les(tle_data) {
        Ok(list) if !list.is_empty() => list,
        _ => sgp4::parse_2les(tle_data)
            .map_err(|e| SkytrackError::DataError(format!("failed to parse TLE: {e:?}")))?,
    };

    elements_list
        .into_iter()
        .map(|elements| {
            let name = elements.object_name.clone();
            Sgp4Satellite::from_elements(elements, name, ts)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interplib::{InterpolatorConfig, TrajectoryInterpolator};
    use approx::assert_relative_eq;

    const ISS_LINE1: &str = "1 25544U 98067A   19343.69339541  .00001764  00000-0  38792-4 0  9991";
    const ISS_LINE2: &str = "2 25544  51.6439 211.2001 0007417  17.6667  85.6398 15.50103472202482";

    const VANGUARD_LINE1: &str =
        "1 00005U 58002B   00179.78495062  .00000023  00000-0  28098-4 0  4753";
    const VANGUARD_LINE2: &str =
        "2 00005  34.2682 348.7242 1859667 331.7664  19.3264 10.82419157413667";

    fn iss() -> Sgp4Satellite {
        Sgp4Satellite::from_tle(ISS_LINE1, ISS_LINE2, Some("ISS"), &Timescale::default()).unwrap()
    }

    #[test]
    fn test_parse_tle() {
        let sat = iss();
        assert_eq!(sat.name.as_deref(), Some("ISS"));
        assert_eq!(sat.norad_id, 25544);
        assert_relative_eq!(sat.revs_per_day, 15.50103472, epsilon = 1e-8);

        let (year, month, day, hour, minute, _) = sat.epoch.utc_calendar();
        assert_eq!((year, month, day, hour, minute), (2019, 12, 9, 16, 38));
    }

    #[test]
    fn test_bad_tle_is_data_error() {
        let result = Sgp4Satellite::from_tle("1 garbage", "2 garbage", None, &Timescale::default());
        assert!(matches!(result, Err(SkytrackError::DataError(_))));
    }

    #[test]
    fn test_state_is_teme_low_earth_orbit() {
        let sat = iss();
        let state = sat.state_at(&sat.epoch.add_days(0.5)).unwrap();
        assert_eq!(state.frame, Frame::Teme);

        let r = state.position.norm();
        assert!(r > 6700.0 && r < 6900.0, "radius {r} km");
        let v = state.velocity.map(|v| v.norm()).unwrap_or_default();
        assert!(v > 7.5 && v < 7.8, "speed {v} km/s");
    }

    #[test]
    fn test_vallado_teme_state() {
        // Vallado, Fundamentals of Astrodynamics and Applications, 4th ed., p. 234
        let ts = Timescale::default();
        let sat = Sgp4Satellite::from_tle(VANGUARD_LINE1, VANGUARD_LINE2, None, &ts).unwrap();
        let t = ts.utc_day_of_year(2000, 182.78495062);
        let (r, v) = sat.propagate_teme(&t).unwrap();

        let r_expected = Vector3::new(-9060.47373569, 4658.70952502, 813.68673153);
        let v_expected = Vector3::new(-2.232832783, -4.110453490, -3.157345433);
        let dr_m = (r - r_expected).norm() * 1000.0;
        let dv_mm = (v - v_expected).norm() * 1e6;
        assert!(dr_m < 0.01, "position off by {dr_m} m");
        assert!(dv_mm < 0.1, "velocity off by {dv_mm} mm/s");
    }

    #[test]
    fn test_degree_five_trajectory_matches_propagation() {
        let sat = iss();
        let ts = Timescale::default();
        let start = ts.utc((2019, 12, 9, 12, 0, 0.0));
        let steps = 4000;
        let step_days = 3.0 / steps as f64;

        let epochs: Vec<Time> = (0..steps).map(|i| start.add_days(i as f64 * step_days)).collect();
        let states = sat.states_at(&epochs).unwrap();
        let trajectory =
            TrajectoryInterpolator::from_states(&states, &InterpolatorConfig::spline(5)).unwrap();

        let mut worst_m: f64 = 0.0;
        for s in 0..864 {
            let t = start.add_seconds(s as f64);
            let (truth, _) = sat.propagate_teme(&t).unwrap();
            let interpolated = trajectory.position_at(&t).unwrap();
            worst_m = worst_m.max((interpolated - truth).norm() * 1000.0);
        }
        assert!(worst_m < 1.0, "worst interpolation error {worst_m} m");
    }

    #[test]
    fn test_target_name_and_display() {
        let sat = iss();
        let name = sat.target_name();
        assert!(name.starts_with("ISS catalog #25544 epoch 2019-12-09 16:38"));
        assert_eq!(sat.to_string(), name);

        let unnamed =
            Sgp4Satellite::from_tle(ISS_LINE1, ISS_LINE2, None, &Timescale::default()).unwrap();
        assert!(unnamed.target_name().starts_with("catalog #25544"));
    }

    #[test]
    fn test_parse_tle_file_three_line() {
        let data = format!("ISS (ZARYA)\n{ISS_LINE1}\n{ISS_LINE2}\nVANGUARD 1\n{VANGUARD_LINE1}\n{VANGUARD_LINE2}\n");
        let sats = parse_tle_file(&data, &Timescale::default()).unwrap();
        assert_eq!(sats.len(), 2);
        assert_eq!(sats[0].name.as_deref(), Some("ISS (ZARYA)"));
        assert_eq!(sats[1].norad_id, 5);
    }

    #[test]
    fn test_from_omm_json() {
        let omm = r#"{
            "OBJECT_NAME": "ISS (ZARYA)",
            "OBJECT_ID": "1998-067A",
            "EPOCH": "2019-12-09T16:38:29.363424",
            "MEAN_MOTION": 15.50103472,
            "ECCENTRICITY": 0.0007417,
            "INCLINATION": 51.6439,
            "RA_OF_ASC_NODE": 211.2001,
            "ARG_OF_PERICENTER": 17.6667,
            "MEAN_ANOMALY": 85.6398,
            "EPHEMERIS_TYPE": 0,
            "CLASSIFICATION_TYPE": "U",
            "NORAD_CAT_ID": 25544,
            "ELEMENT_SET_NO": 999,
            "REV_AT_EPOCH": 20248,
            "BSTAR": 0.38792E-4,
            "MEAN_MOTION_DOT": 0.00001764,
            "MEAN_MOTION_DDOT": 0
        }"#;
        let ts = Timescale::default();
        let from_omm = Sgp4Satellite::from_omm(omm, &ts).unwrap();
        assert_eq!(from_omm.name.as_deref(), Some("ISS (ZARYA)"));

        let t = from_omm.epoch.add_days(0.25);
        let (a, _) = from_omm.propagate_teme(&t).unwrap();
        let (b, _) = iss().propagate_teme(&t).unwrap();
        assert!((a - b).norm() < 1.0, "OMM and TLE disagree by {} km", (a - b).norm());

        assert!(matches!(
            Sgp4Satellite::from_omm("not json", &ts),
            Err(SkytrackError::DataError(_))
        ));
    }
}
