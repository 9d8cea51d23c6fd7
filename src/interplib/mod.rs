//! Curve interpolation over strictly increasing time samples
//!
//! An [`Interpolant`] is built from `(time, value)` samples with either an
//! interpolating B-spline of degree 1 to 5 or an Akima spline. Both are
//! converted to a [`PiecewisePolynomial`], which provides evaluation,
//! derivatives and root isolation. What happens outside the sampled range is
//! always an explicit [`Extrapolation`] choice.
//!
//! # Example
//!
//! ```ignore
//! use skytrack::interplib::{Extrapolation, Interpolant};
//!
//! let t: Vec<f64> = (0..100).map(|i| i as f64 * 0.1).collect();
//! let y: Vec<f64> = t.iter().map(|v| v.sin()).collect();
//! let curve = Interpolant::spline(&t, &y, 3, Extrapolation::Error)?;
//! let crossings = curve.roots(); // near pi, 2 pi, 3 pi
//! ```

pub mod akima;
pub mod bspline;
pub mod errors;
pub mod ppoly;
pub mod trajectory;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::SkytrackError;

use bspline::BSpline;
use errors::{InterpolationError, Result};
pub use ppoly::PiecewisePolynomial;
pub use trajectory::TrajectoryInterpolator;

/// Highest supported spline degree
pub const MAX_DEGREE: usize = 5;

/// Minimum sample count for an Akima spline
pub const AKIMA_MIN_SAMPLES: usize = 3;

/// Behaviour of an interpolant outside `[t_first, t_last]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Extrapolation {
    /// Reject the evaluation with [`InterpolationError::OutOfDomain`]
    #[default]
    #[serde(alias = "raise")]
    Error,
    /// Continue the first or last polynomial piece
    Extrapolate,
    /// Return the value at the nearest end of the domain
    #[serde(alias = "const")]
    Clamp,
    /// Return zero
    Zeros,
}

/// How the curve between samples is built
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InterpolationMethod {
    /// Interpolating B-spline of the given degree (1..=5)
    Spline { degree: usize },
    /// Akima cubic spline
    Akima,
}

impl Default for InterpolationMethod {
    fn default() -> Self {
        InterpolationMethod::Spline { degree: 3 }
    }
}

/// Interpolant settings, loadable from JSON
///
/// ```json
/// { "method": { "kind": "spline", "degree": 5 }, "extrapolation": "raise" }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpolatorConfig {
    pub method: InterpolationMethod,
    pub extrapolation: Extrapolation,
}

impl InterpolatorConfig {
    /// B-spline of `degree` that rejects out-of-domain evaluation
    pub fn spline(degree: usize) -> Self {
        InterpolatorConfig {
            method: InterpolationMethod::Spline { degree },
            extrapolation: Extrapolation::Error,
        }
    }

    /// Akima spline that rejects out-of-domain evaluation
    pub fn akima() -> Self {
        InterpolatorConfig {
            method: InterpolationMethod::Akima,
            extrapolation: Extrapolation::Error,
        }
    }

    pub fn with_extrapolation(mut self, extrapolation: Extrapolation) -> Self {
        self.extrapolation = extrapolation;
        self
    }

    /// Parse a configuration from JSON
    pub fn from_json(json: &str) -> crate::Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| SkytrackError::ConfigError(format!("interpolator: {e}")))
    }
}

/// Check sample arrays before fitting
fn validate_samples(times: &[f64], values: &[f64], min_len: usize) -> Result<()> {
    if times.len() != values.len() {
        return Err(InterpolationError::LengthMismatch {
            times: times.len(),
            values: values.len(),
        });
    }
    if times.len() < min_len {
        return Err(InterpolationError::InsufficientSamples {
            required: min_len,
            got: times.len(),
        });
    }
    if let Some(index) = times
        .iter()
        .zip(values)
        .position(|(t, v)| !t.is_finite() || !v.is_finite())
    {
        return Err(InterpolationError::NonFiniteSample { index });
    }
    if let Some(i) = times.windows(2).position(|w| w[1] <= w[0]) {
        return Err(InterpolationError::NotStrictlyIncreasing { index: i + 1 });
    }
    Ok(())
}

/// A curve through time samples with an explicit extrapolation policy
#[derive(Debug, Clone, PartialEq)]
pub struct Interpolant {
    poly: PiecewisePolynomial,
    extrapolation: Extrapolation,
}

impl Interpolant {
    /// Build an interpolant as described by `config`
    pub fn new(times: &[f64], values: &[f64], config: &InterpolatorConfig) -> Result<Self> {
        match config.method {
            InterpolationMethod::Spline { degree } => {
                Self::spline(times, values, degree, config.extrapolation)
            }
            InterpolationMethod::Akima => Self::akima(times, values, config.extrapolation),
        }
    }

    /// Interpolating B-spline of `degree` through the samples
    pub fn spline(
        times: &[f64],
        values: &[f64],
        degree: usize,
        extrapolation: Extrapolation,
    ) -> Result<Self> {
        if degree == 0 || degree > MAX_DEGREE {
            return Err(InterpolationError::UnsupportedDegree { degree });
        }
        validate_samples(times, values, degree + 1)?;
        let poly = BSpline::interpolate(times, values, degree)?.to_piecewise();
        debug!(samples = times.len(), degree, ?extrapolation, "built spline interpolant");
        Ok(Interpolant {
            poly,
            extrapolation,
        })
    }

    /// Akima spline through the samples
    pub fn akima(times: &[f64], values: &[f64], extrapolation: Extrapolation) -> Result<Self> {
        validate_samples(times, values, AKIMA_MIN_SAMPLES)?;
        let poly = akima::akima_piecewise(times, values);
        debug!(samples = times.len(), ?extrapolation, "built Akima interpolant");
        Ok(Interpolant {
            poly,
            extrapolation,
        })
    }

    /// Wrap an existing piecewise polynomial
    pub fn from_piecewise(poly: PiecewisePolynomial, extrapolation: Extrapolation) -> Self {
        Interpolant {
            poly,
            extrapolation,
        }
    }

    pub fn piecewise(&self) -> &PiecewisePolynomial {
        &self.poly
    }

    /// `(t_first, t_last)`
    pub fn domain(&self) -> (f64, f64) {
        (self.poly.start(), self.poly.end())
    }

    /// Polynomial degree of the pieces
    pub fn degree(&self) -> usize {
        self.poly.degree()
    }

    pub fn extrapolation(&self) -> Extrapolation {
        self.extrapolation
    }

    /// The same curve under another extrapolation policy
    pub fn with_extrapolation(mut self, extrapolation: Extrapolation) -> Self {
        self.extrapolation = extrapolation;
        self
    }

    /// Resolve where `t` should be evaluated, or `None` for the zero policy
    fn locate(&self, t: f64) -> Result<Option<f64>> {
        let (start, end) = self.domain();
        if !t.is_finite() {
            return Err(InterpolationError::OutOfDomain { t, start, end });
        }
        if (start..=end).contains(&t) {
            return Ok(Some(t));
        }
        trace!(t, start, end, policy = ?self.extrapolation, "evaluating outside domain");
        match self.extrapolation {
            Extrapolation::Error => Err(InterpolationError::OutOfDomain { t, start, end }),
            Extrapolation::Extrapolate => Ok(Some(t)),
            Extrapolation::Clamp => Ok(Some(t.clamp(start, end))),
            Extrapolation::Zeros => Ok(None),
        }
    }

    /// Value at `t`
    pub fn evaluate(&self, t: f64) -> Result<f64> {
        Ok(self
            .locate(t)?
            .map_or(0.0, |x| self.poly.evaluate(x)))
    }

    /// Values at each of `ts`, failing on the first rejected time
    pub fn evaluate_many(&self, ts: &[f64]) -> Result<Vec<f64>> {
        ts.iter().map(|&t| self.evaluate(t)).collect()
    }

    /// First derivative at `t`, under the same extrapolation policy.
    /// At a breakpoint the piece starting there is used.
    pub fn derivative_at(&self, t: f64) -> Result<f64> {
        Ok(self
            .locate(t)?
            .map_or(0.0, |x| self.poly.evaluate_derivative(x, 1)))
    }

    /// Second derivative at `t`, under the same extrapolation policy
    pub fn second_derivative_at(&self, t: f64) -> Result<f64> {
        Ok(self
            .locate(t)?
            .map_or(0.0, |x| self.poly.evaluate_derivative(x, 2)))
    }

    /// The derivative curve, one degree lower, with the same policy
    pub fn derivative(&self) -> Interpolant {
        Interpolant {
            poly: self.poly.derivative(),
            extrapolation: self.extrapolation,
        }
    }

    /// This curve minus a constant, for threshold crossings
    pub fn offset(&self, level: f64) -> Interpolant {
        Interpolant {
            poly: self.poly.offset(level),
            extrapolation: self.extrapolation,
        }
    }

    /// Sorted zeros inside the domain
    pub fn roots(&self) -> Vec<f64> {
        self.poly.roots()
    }
}
