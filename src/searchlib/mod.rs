//! Event and extremum search
//!
//! Two families of search live here:
//! - [`find_events`], [`find_crossings`] and [`find_extrema`] work on an
//!   [`Interpolant`] and find zeros, threshold crossings and turning points
//!   exactly on its piecewise polynomial.
//! - [`find_discrete`] samples a directly evaluated function and narrows the
//!   brackets where its discrete value changes. It needs no interpolant, so
//!   it serves as an independent reference.

use tracing::debug;

use crate::constants::DAY_S;
use crate::interplib::{Interpolant, PiecewisePolynomial};
use crate::{Result, SkytrackError};

/// Default epsilon for discrete event finding (0.001 seconds in days)
pub const EPSILON_DISCRETE: f64 = 0.001 / DAY_S;

/// Default number of subdivisions per bracket refinement
pub const DEFAULT_NUM: usize = 12;

/// Direction of a zero crossing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Derivative positive at the root
    Rising,
    /// Derivative negative at the root
    Falling,
    /// Derivative exactly zero at the root, or the curve touches zero at a
    /// breakpoint and turns back without crossing
    Stationary,
}

/// A classified zero of a curve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    pub t: f64,
    pub kind: EventKind,
}

/// Nature of a derivative root
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtremumKind {
    Maximum,
    Minimum,
    /// Second derivative exactly zero, e.g. an inflection with flat slope
    Stationary,
}

/// A classified root of a curve's derivative
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extremum {
    pub t: f64,
    pub value: f64,
    pub kind: ExtremumKind,
}

fn classify_slope(slope: f64) -> EventKind {
    if slope > 0.0 {
        EventKind::Rising
    } else if slope < 0.0 {
        EventKind::Falling
    } else {
        EventKind::Stationary
    }
}

/// Direction of the zero of `poly` at `t`.
///
/// Inside a piece this is the sign of the slope. At an interior breakpoint
/// both neighbouring pieces are consulted: a jump across zero takes the
/// direction of the jump, agreeing one-sided slopes give a crossing, a flat
/// side defers to the other, and opposite slopes mean the curve only touches
/// zero.
fn classify_root(poly: &PiecewisePolynomial, t: f64) -> EventKind {
    let Some(k) = poly.interior_breakpoint(t, poly.root_tolerance()) else {
        return classify_slope(poly.evaluate_derivative(t, 1));
    };
    let b = poly.breakpoints()[k];

    let before = poly.evaluate_piece(k - 1, b, 0);
    let after = poly.evaluate_piece(k, b, 0);
    let scale = poly
        .coefficients()
        .iter()
        .fold(0.0f64, |m, c| m.max(c[0].abs()));
    if before * after < 0.0 && before.abs().min(after.abs()) > 1e-12 * scale {
        return if after > 0.0 {
            EventKind::Rising
        } else {
            EventKind::Falling
        };
    }

    let left = classify_slope(poly.evaluate_piece(k - 1, b, 1));
    let right = classify_slope(poly.evaluate_piece(k, b, 1));
    match (left, right) {
        (l, r) if l == r => l,
        (EventKind::Stationary, side) | (side, EventKind::Stationary) => side,
        _ => EventKind::Stationary,
    }
}

/// Zeros of `curve` inside its domain, in time order, each labelled by the
/// sign of the derivative there
pub fn find_events(curve: &Interpolant) -> Vec<Event> {
    let poly = curve.piecewise();
    let events: Vec<Event> = curve
        .roots()
        .into_iter()
        .map(|t| Event {
            t,
            kind: classify_root(poly, t),
        })
        .collect();
    debug!(count = events.len(), "found curve events");
    events
}

/// Times where `curve` crosses `level`, with direction
pub fn find_crossings(curve: &Interpolant, level: f64) -> Vec<Event> {
    find_events(&curve.offset(level))
}

/// Roots of the derivative of `curve`, labelled by the second derivative.
/// A slope falling through zero is a maximum, a rising one a minimum.
pub fn find_extrema(curve: &Interpolant) -> Vec<Extremum> {
    let poly = curve.piecewise();
    let slope = curve.derivative();
    slope
        .roots()
        .into_iter()
        .map(|t| {
            let kind = match classify_root(slope.piecewise(), t) {
                EventKind::Falling => ExtremumKind::Maximum,
                EventKind::Rising => ExtremumKind::Minimum,
                EventKind::Stationary => ExtremumKind::Stationary,
            };
            Extremum {
                t,
                value: poly.evaluate(t),
                kind,
            }
        })
        .collect()
}

/// Find times at which a discrete function of time changes value.
///
/// The range is sampled every `step` (at least two samples), and each
/// bracket where the value changes is subdivided into `num` points until
/// it is narrower than `epsilon`.
///
/// # Arguments
/// * `start` - Start of the search range
/// * `end` - End of the search range, later than `start`
/// * `f` - Function mapping a slice of times to discrete integer values
/// * `step` - Sampling interval, in the same unit as the range
/// * `epsilon` - Convergence threshold (for days: [`EPSILON_DISCRETE`])
/// * `num` - Number of subdivisions per refinement (default [`DEFAULT_NUM`])
///
/// # Returns
/// `(time, value)` pairs at each transition, where `value` is the new value
pub fn find_discrete<F>(
    start: f64,
    end: f64,
    f: &mut F,
    step: f64,
    epsilon: f64,
    num: usize,
) -> Result<Vec<(f64, i64)>>
where
    F: FnMut(&[f64]) -> Vec<i64>,
{
    if start.is_nan() || end.is_nan() || start >= end {
        return Err(SkytrackError::InvalidTime(format!(
            "search range is empty: start {start} is not before end {end}"
        )));
    }
    let positive = |v: f64| v > 0.0 && v.is_finite();
    if !positive(step) || !positive(epsilon) || num < 3 {
        return Err(SkytrackError::ConfigError(format!(
            "invalid search parameters: step {step}, epsilon {epsilon}, num {num}"
        )));
    }

    let sample_count = ((end - start) / step) as usize + 2;
    let times = linspace(start, end, sample_count);
    Ok(find_discrete_core(&times, f, epsilon, num))
}

fn find_discrete_core<F>(initial: &[f64], f: &mut F, epsilon: f64, num: usize) -> Vec<(f64, i64)>
where
    F: FnMut(&[f64]) -> Vec<i64>,
{
    let end_mask = linspace(0.0, 1.0, num);
    let start_mask: Vec<f64> = end_mask.iter().copied().rev().collect();

    let mut times = initial.to_vec();

    loop {
        let y = f(&times);

        let transitions: Vec<usize> = y
            .windows(2)
            .enumerate()
            .filter(|(_, w)| w[0] != w[1])
            .map(|(i, _)| i)
            .collect();

        if transitions.is_empty() {
            return Vec::new();
        }

        let starts: Vec<f64> = transitions.iter().map(|&i| times[i]).collect();
        let ends: Vec<f64> = transitions.iter().map(|&i| times[i + 1]).collect();

        let max_width = starts
            .iter()
            .zip(&ends)
            .map(|(s, e)| e - s)
            .fold(0.0_f64, f64::max);

        // Stop once brackets are narrow enough or can no longer shrink
        let stalled = starts
            .iter()
            .zip(&ends)
            .all(|(s, e)| 0.5 * (s + e) <= *s || 0.5 * (s + e) >= *e);
        if max_width <= epsilon || stalled {
            let values = transitions.iter().map(|&i| y[i + 1]);
            return ends.into_iter().zip(values).collect();
        }

        times = outer_interp(&starts, &start_mask, &ends, &end_mask);
    }
}

/// Generate `n` evenly spaced values from `start` to `end` (inclusive).
fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    if n <= 1 {
        return vec![start];
    }
    let step = (end - start) / (n - 1) as f64;
    (0..n).map(|i| start + step * i as f64).collect()
}

/// Interpolate between starts and ends using outer product masks.
///
/// For each bracket (start[i], end[i]), generate `num` points by
/// `start[i] * start_mask[j] + end[i] * end_mask[j]`.
fn outer_interp(starts: &[f64], start_mask: &[f64], ends: &[f64], end_mask: &[f64]) -> Vec<f64> {
    starts
        .iter()
        .zip(ends)
        .flat_map(|(s, e)| {
            start_mask
                .iter()
                .zip(end_mask)
                .map(move |(a, b)| s * a + e * b)
        })
        .collect()
}
