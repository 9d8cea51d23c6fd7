//! Position interpolation along a sampled trajectory
//!
//! Each Cartesian axis gets its own [`Interpolant`] over TT days counted from
//! the first sample, so sub-second resolution survives even for multi-day
//! spans. Velocities come from the derivative of the position curves.

use nalgebra::Vector3;

use super::{Interpolant, InterpolatorConfig};
use crate::framelib::{Frame, StateVector};
use crate::time::Time;
use crate::units::km_per_day_to_km_per_s;
use crate::{Result, SkytrackError};

/// Interpolated trajectory of one body in one reference frame
#[derive(Debug, Clone)]
pub struct TrajectoryInterpolator {
    frame: Frame,
    reference_epoch: Time,
    axes: [Interpolant; 3],
    rates: [Interpolant; 3],
}

impl TrajectoryInterpolator {
    /// Fit the positions of `states`, which must share one frame and be in
    /// strictly increasing time order
    pub fn from_states(states: &[StateVector], config: &InterpolatorConfig) -> Result<Self> {
        let first = states.first().ok_or_else(|| {
            SkytrackError::InvalidState("cannot interpolate an empty trajectory".to_string())
        })?;
        if let Some(other) = states.iter().find(|s| s.frame != first.frame) {
            return Err(SkytrackError::FrameMismatch {
                expected: first.frame,
                found: other.frame,
            });
        }
        let epochs: Vec<Time> = states.iter().map(|s| s.epoch).collect();
        let positions: Vec<Vector3<f64>> = states.iter().map(|s| s.position).collect();
        Self::from_times(first.frame, &epochs, &positions, config)
    }

    /// Fit positions in km given alongside their epochs
    pub fn from_times(
        frame: Frame,
        epochs: &[Time],
        positions: &[Vector3<f64>],
        config: &InterpolatorConfig,
    ) -> Result<Self> {
        let reference_epoch = *epochs.first().ok_or_else(|| {
            SkytrackError::InvalidState("cannot interpolate an empty trajectory".to_string())
        })?;
        let days: Vec<f64> = epochs
            .iter()
            .map(|t| t.days_since(&reference_epoch))
            .collect();

        let axis = |i: usize| -> Result<Interpolant> {
            let values: Vec<f64> = positions.iter().map(|p| p[i]).collect();
            Ok(Interpolant::new(&days, &values, config)?)
        };
        let axes = [axis(0)?, axis(1)?, axis(2)?];
        let rates = [
            axes[0].derivative(),
            axes[1].derivative(),
            axes[2].derivative(),
        ];

        Ok(TrajectoryInterpolator {
            frame,
            reference_epoch,
            axes,
            rates,
        })
    }

    pub fn frame(&self) -> Frame {
        self.frame
    }

    /// Epoch of the first sample, the zero of the internal time axis
    pub fn reference_epoch(&self) -> &Time {
        &self.reference_epoch
    }

    /// Covered interval as TT days since the reference epoch
    pub fn domain(&self) -> (f64, f64) {
        self.axes[0].domain()
    }

    /// The interpolant of one axis (0 = x, 1 = y, 2 = z), in km over days
    pub fn axis(&self, index: usize) -> Option<&Interpolant> {
        self.axes.get(index)
    }

    fn sample(curves: &[Interpolant; 3], x: f64) -> Result<Vector3<f64>> {
        Ok(Vector3::new(
            curves[0].evaluate(x)?,
            curves[1].evaluate(x)?,
            curves[2].evaluate(x)?,
        ))
    }

    /// Interpolated position in km
    pub fn position_at(&self, t: &Time) -> Result<Vector3<f64>> {
        Self::sample(&self.axes, t.days_since(&self.reference_epoch))
    }

    /// Interpolated velocity in km/s
    pub fn velocity_at(&self, t: &Time) -> Result<Vector3<f64>> {
        Ok(Self::sample(&self.rates, t.days_since(&self.reference_epoch))?
            .map(km_per_day_to_km_per_s))
    }

    /// Interpolated state vector in the trajectory's frame
    pub fn state_at(&self, t: &Time) -> Result<StateVector> {
        Ok(StateVector::new(
            self.frame,
            *t,
            self.position_at(t)?,
            Some(self.velocity_at(t)?),
        ))
    }
}
