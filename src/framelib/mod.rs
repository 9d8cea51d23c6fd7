//! Reference frames and state vector transforms
//!
//! The supported frames form a chain of adjacent pairs, each linked by one
//! epoch-keyed rotation:
//!
//! ```text
//! GCRS <-> TEME <-> TIRS <-> ITRS
//! ```
//!
//! Transforms between non-adjacent frames walk the chain. Position transforms
//! are pure rotations. Velocities crossing the TEME/TIRS boundary also pick up
//! or drop the Earth-rotation term, since TIRS turns with the Earth.

pub mod rotation;
pub mod teme;
pub mod tirs;

use std::fmt;

use nalgebra::{Matrix3, Vector3};
use once_cell::sync::Lazy;
use tracing::debug;

use crate::constants::ASEC2RAD;
use crate::time::Time;
use crate::units::{kilometer, kilometer_per_second, Length, Velocity};
use crate::{Result, SkytrackError};

/// First TT Julian date accepted by frame transforms (1800-01-01)
pub const VALID_START_JD: f64 = 2378496.5;

/// Last TT Julian date accepted by frame transforms (2200-01-01)
pub const VALID_END_JD: f64 = 2524593.5;

/// Frame bias matrix from GCRS (ICRS axes) to the dynamical J2000 mean
/// equator and equinox, IERS (2003) Conventions chapter 5
pub static FRAME_BIAS: Lazy<Matrix3<f64>> = Lazy::new(|| {
    let xi0 = -0.0166170 * ASEC2RAD;
    let eta0 = -0.0068192 * ASEC2RAD;
    let da0 = -0.01460 * ASEC2RAD;

    let yx = -da0;
    let zx = xi0;
    let xy = da0;
    let zy = eta0;
    let xz = -xi0;
    let yz = -eta0;

    let xx = 1.0 - 0.5 * (yx * yx + zx * zx);
    let yy = 1.0 - 0.5 * (yx * yx + zy * zy);
    let zz = 1.0 - 0.5 * (zy * zy + zx * zx);

    Matrix3::new(xx, xy, xz, yx, yy, yz, zx, zy, zz)
});

/// A supported reference frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Frame {
    /// Geocentric Celestial Reference System
    Gcrs,
    /// True Equator Mean Equinox, the SGP4 output frame
    Teme,
    /// Terrestrial Intermediate Reference System
    Tirs,
    /// International Terrestrial Reference System
    Itrs,
}

impl Frame {
    /// Every frame, in chain order
    pub const ALL: [Frame; 4] = [Frame::Gcrs, Frame::Teme, Frame::Tirs, Frame::Itrs];

    fn chain_index(self) -> usize {
        match self {
            Frame::Gcrs => 0,
            Frame::Teme => 1,
            Frame::Tirs => 2,
            Frame::Itrs => 3,
        }
    }

    /// Neighbour one step along the chain towards `target`
    fn next_towards(self, target: Frame) -> Frame {
        let (from, to) = (self.chain_index(), target.chain_index());
        let next = if to > from { from + 1 } else { from - 1 };
        Frame::ALL[next]
    }

    /// Rotation from this frame to the next frame outwards in the chain
    fn outward_matrix(self, t: &Time) -> Matrix3<f64> {
        match self {
            Frame::Gcrs => teme::gcrs_to_teme_matrix(t),
            Frame::Teme => teme::teme_to_tirs_matrix(t),
            Frame::Tirs => tirs::polar_motion_matrix(t),
            Frame::Itrs => Matrix3::identity(),
        }
    }

    /// Position rotation taking coordinates in `self` to `target` at epoch `t`.
    ///
    /// Fails with [`SkytrackError::EpochOutOfRange`] outside
    /// [`VALID_START_JD`]..=[`VALID_END_JD`], even when the frames are equal.
    pub fn rotation_to(self, target: Frame, t: &Time) -> Result<Matrix3<f64>> {
        check_epoch(t)?;
        let (from, to) = (self.chain_index(), target.chain_index());
        let mut m = Matrix3::identity();
        if from < to {
            for frame in &Frame::ALL[from..to] {
                m = frame.outward_matrix(t) * m;
            }
        } else {
            for frame in Frame::ALL[to..from].iter().rev() {
                m = frame.outward_matrix(t).transpose() * m;
            }
        }
        Ok(m)
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Frame::Gcrs => "GCRS",
            Frame::Teme => "TEME",
            Frame::Tirs => "TIRS",
            Frame::Itrs => "ITRS",
        };
        f.write_str(name)
    }
}

pub(crate) fn check_epoch(t: &Time) -> Result<()> {
    let jd = t.tt();
    if !(VALID_START_JD..=VALID_END_JD).contains(&jd) {
        return Err(SkytrackError::EpochOutOfRange {
            jd,
            start_jd: VALID_START_JD,
            end_jd: VALID_END_JD,
        });
    }
    Ok(())
}

/// Position (km) and optional velocity (km/s) tagged with frame and epoch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateVector {
    pub frame: Frame,
    pub epoch: Time,
    pub position: Vector3<f64>,
    pub velocity: Option<Vector3<f64>>,
}

impl StateVector {
    pub fn new(
        frame: Frame,
        epoch: Time,
        position: Vector3<f64>,
        velocity: Option<Vector3<f64>>,
    ) -> Self {
        StateVector {
            frame,
            epoch,
            position,
            velocity,
        }
    }

    /// Distance from the geocenter
    pub fn radius(&self) -> Length {
        Length::new::<kilometer>(self.position.norm())
    }

    /// Speed, when a velocity is present
    pub fn speed(&self) -> Option<Velocity> {
        self.velocity
            .map(|v| Velocity::new::<kilometer_per_second>(v.norm()))
    }

    fn validate(&self) -> Result<()> {
        if self.position.iter().any(|c| !c.is_finite()) {
            return Err(SkytrackError::InvalidState(format!(
                "non-finite position {:?}",
                self.position
            )));
        }
        if let Some(v) = self.velocity {
            if v.iter().any(|c| !c.is_finite()) {
                return Err(SkytrackError::InvalidState(format!(
                    "non-finite velocity {v:?}"
                )));
            }
        }
        Ok(())
    }

    /// The same state expressed in `target`
    pub fn transform_to(&self, target: Frame) -> Result<StateVector> {
        check_epoch(&self.epoch)?;
        self.validate()?;
        debug!(
            from = %self.frame,
            to = %target,
            tt = self.epoch.tt(),
            "transforming state vector"
        );

        let mut state = *self;
        while state.frame != target {
            state = state.step(state.frame.next_towards(target));
        }
        Ok(state)
    }

    /// One hop to an adjacent frame
    fn step(&self, next: Frame) -> StateVector {
        let t = &self.epoch;
        let (position, velocity) = match (self.frame, next) {
            (Frame::Teme, Frame::Tirs) => {
                teme::teme_to_tirs(t, &self.position, self.velocity.as_ref())
            }
            (Frame::Tirs, Frame::Teme) => {
                teme::tirs_to_teme(t, &self.position, self.velocity.as_ref())
            }
            (from, to) if to.chain_index() > from.chain_index() => {
                let m = from.outward_matrix(t);
                (m * self.position, self.velocity.map(|v| m * v))
            }
            (_, to) => {
                let m = to.outward_matrix(t).transpose();
                (m * self.position, self.velocity.map(|v| m * v))
            }
        };
        StateVector::new(next, *t, position, velocity)
    }
}
