//! # skytrack
//!
//! Coordinate-frame conversion for SGP4 output and trajectory interpolation
//! with event root finding.
//!
//! Two engines do the real work:
//!
//! - [`framelib`]: rigid, epoch-keyed rotations between the GCRS, TEME, TIRS
//!   and ITRS frames, applied to [`framelib::StateVector`]s.
//! - [`interplib`] and [`searchlib`]: interpolants over strictly increasing
//!   time samples, with an explicit extrapolation policy, plus zero-crossing
//!   and extremum search on top of them.
//!
//! Around them sit the collaborators needed to run the classic scenarios end
//! to end: [`time`] scales, a [`planetlib::EphemerisProvider`] seam with a
//! low-precision Sun, an [`sgp4lib`] adapter over the `sgp4` crate, a ground
//! observer in [`toposlib`] and rise/set curves in [`almanac`].
//!
//! ```ignore
//! use skytrack::framelib::{Frame, StateVector};
//! use skytrack::time::Timescale;
//! use nalgebra::Vector3;
//!
//! let ts = Timescale::default();
//! let t = ts.utc_day_of_year(2000, 182.78495062);
//! let teme = StateVector::new(
//!     Frame::Teme,
//!     t,
//!     Vector3::new(-9060.47373569, 4658.70952502, 813.68673153),
//!     Some(Vector3::new(-2.232832783, -4.110453490, -3.157345433)),
//! );
//! let gcrs = teme.transform_to(Frame::Gcrs)?;
//! ```

pub mod almanac;
pub mod constants;
pub mod framelib;
pub mod interplib;
pub mod nutationlib;
pub mod planetlib;
pub mod precessionlib;
pub mod searchlib;
pub mod sgp4lib;
pub mod time;
pub mod toposlib;
pub mod units;

use thiserror::Error;

pub use interplib::errors::InterpolationError;

/// Error type for everything outside the interpolator's own construction
/// and evaluation errors, which are wrapped as [`SkytrackError::Interpolation`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SkytrackError {
    /// The epoch lies outside the range the rotation models are valid for
    #[error("Epoch TT JD {jd} is outside the supported range ({start_jd}..{end_jd})")]
    EpochOutOfRange { jd: f64, start_jd: f64, end_jd: f64 },

    /// Error raised by an interpolant
    #[error(transparent)]
    Interpolation(#[from] InterpolationError),

    /// State vectors that must share a frame do not
    #[error("Frame mismatch: expected {expected}, found {found}")]
    FrameMismatch {
        expected: framelib::Frame,
        found: framelib::Frame,
    },

    /// A state vector holds non-finite components
    #[error("Invalid state vector: {0}")]
    InvalidState(String),

    /// A time could not be built or rendered
    #[error("Invalid time: {0}")]
    InvalidTime(String),

    /// The SGP4 propagator rejected the elements or the epoch
    #[error("Propagation error: {0}")]
    Propagation(String),

    /// Input data could not be parsed
    #[error("Data error: {0}")]
    DataError(String),

    /// Configuration could not be parsed or is inconsistent
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for skytrack operations
pub type Result<T> = std::result::Result<T, SkytrackError>;
