//! Error types for the interpolation module

use thiserror::Error;

/// Errors raised while building or evaluating an interpolant
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InterpolationError {
    /// Times and values have different lengths
    #[error("times and values differ in length ({times} vs {values})")]
    LengthMismatch { times: usize, values: usize },

    /// Too few samples for the requested method
    #[error("at least {required} samples are required, got {got}")]
    InsufficientSamples { required: usize, got: usize },

    /// Spline degree outside 1..=5
    #[error("unsupported spline degree {degree} (expected 1..=5)")]
    UnsupportedDegree { degree: usize },

    /// Sample times are not strictly increasing
    #[error("sample times must be strictly increasing (violated at index {index})")]
    NotStrictlyIncreasing { index: usize },

    /// A sample time or value is NaN or infinite
    #[error("sample {index} is not finite")]
    NonFiniteSample { index: usize },

    /// Evaluation outside the sampled range under the `Error` policy
    #[error("t = {t} is outside the interpolation domain [{start}, {end}]")]
    OutOfDomain { t: f64, start: f64, end: f64 },

    /// The spline collocation system could not be solved
    #[error("spline collocation system is singular")]
    SingularSystem,
}

/// Result type for interpolation operations
pub type Result<T> = std::result::Result<T, InterpolationError>;
