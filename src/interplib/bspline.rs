//! Interpolating B-splines of degree 1 to 5
//!
//! Knots follow the FITPACK convention for an interpolating spline
//! (smoothing factor zero): the end knots are repeated `k + 1` times, and
//! the interior knots are the samples themselves for odd `k` or the
//! midpoints between samples for even `k`. The coefficients come from the
//! banded collocation system `B c = y`, which is totally positive and is
//! solved by elimination without pivoting.
//!
//! Reference: de Boor, A Practical Guide to Splines (2001), chapters IX-XIII.

use super::errors::{InterpolationError, Result};
use super::ppoly::PiecewisePolynomial;

/// A B-spline in knot/coefficient form
#[derive(Debug, Clone, PartialEq)]
pub struct BSpline {
    knots: Vec<f64>,
    coefficients: Vec<f64>,
    degree: usize,
}

/// Knot vector for interpolation through `x` with degree `k`
pub fn interpolation_knots(x: &[f64], k: usize) -> Vec<f64> {
    let n = x.len();
    let interior = n - k - 1;
    let mut knots = Vec::with_capacity(n + k + 1);
    knots.extend(std::iter::repeat(x[0]).take(k + 1));
    if k % 2 == 1 {
        let offset = (k + 1) / 2;
        knots.extend((0..interior).map(|j| x[offset + j]));
    } else {
        let offset = k / 2;
        knots.extend((0..interior).map(|j| 0.5 * (x[offset + j] + x[offset + j + 1])));
    }
    knots.extend(std::iter::repeat(x[n - 1]).take(k + 1));
    knots
}

/// Knot span `mu` with `knots[mu] <= x < knots[mu + 1]`, clamped to the
/// valid spans `k..n` for `n` coefficients
fn find_span(knots: &[f64], k: usize, n: usize, x: f64) -> usize {
    if x >= knots[n] {
        return n - 1;
    }
    if x <= knots[k] {
        return k;
    }
    let (mut lo, mut hi) = (k, n);
    while hi - lo > 1 {
        let mid = (lo + hi) / 2;
        if knots[mid] <= x {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    lo
}

/// The `k + 1` nonzero basis functions `B_{mu-k..=mu}` at `x`
/// (Cox-de Boor recurrence)
fn basis_functions(knots: &[f64], k: usize, mu: usize, x: f64) -> Vec<f64> {
    let mut b = vec![0.0; k + 1];
    let mut left = vec![0.0; k + 1];
    let mut right = vec![0.0; k + 1];
    b[0] = 1.0;
    for j in 1..=k {
        left[j] = x - knots[mu + 1 - j];
        right[j] = knots[mu + j] - x;
        let mut saved = 0.0;
        for r in 0..j {
            let tmp = b[r] / (right[r + 1] + left[j - r]);
            b[r] = saved + right[r + 1] * tmp;
            saved = left[j - r] * tmp;
        }
        b[j] = saved;
    }
    b
}

/// Solve a banded system stored row-wise as `band[row][col - row + k]`
/// with half-bandwidth `k`, without pivoting
fn solve_banded(mut band: Vec<Vec<f64>>, mut rhs: Vec<f64>, k: usize) -> Result<Vec<f64>> {
    let n = rhs.len();
    for p in 0..n {
        let pivot = band[p][k];
        if pivot == 0.0 || !pivot.is_finite() {
            return Err(InterpolationError::SingularSystem);
        }
        let last = (p + k).min(n - 1);
        for r in (p + 1)..=last {
            let factor = band[r][p + k - r] / pivot;
            if factor == 0.0 {
                continue;
            }
            for c in p..=last {
                let update = factor * band[p][c + k - p];
                band[r][c + k - r] -= update;
            }
            rhs[r] -= factor * rhs[p];
        }
    }

    let mut solution = vec![0.0; n];
    for p in (0..n).rev() {
        let last = (p + k).min(n - 1);
        let mut s = rhs[p];
        for c in (p + 1)..=last {
            s -= band[p][c + k - p] * solution[c];
        }
        solution[p] = s / band[p][k];
    }
    Ok(solution)
}

impl BSpline {
    /// Interpolating spline of degree `k` through `(x, y)`.
    ///
    /// Callers validate the samples: `x` strictly increasing and finite,
    /// `x.len() == y.len() >= k + 1`.
    pub fn interpolate(x: &[f64], y: &[f64], k: usize) -> Result<Self> {
        let n = x.len();
        let knots = interpolation_knots(x, k);

        let mut band = vec![vec![0.0; 2 * k + 1]; n];
        for (i, &xi) in x.iter().enumerate() {
            let mu = find_span(&knots, k, n, xi);
            let b = basis_functions(&knots, k, mu, xi);
            for (j, &value) in b.iter().enumerate() {
                let col = mu - k + j;
                band[i][col + k - i] = value;
            }
        }

        let coefficients = solve_banded(band, y.to_vec(), k)?;
        if coefficients.iter().any(|c| !c.is_finite()) {
            return Err(InterpolationError::SingularSystem);
        }

        Ok(BSpline {
            knots,
            coefficients,
            degree: k,
        })
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    /// Value at `x` by de Boor's algorithm, using the end spans outside the knots
    pub fn evaluate(&self, x: f64) -> f64 {
        let k = self.degree;
        let n = self.coefficients.len();
        let mu = find_span(&self.knots, k, n, x);
        basis_functions(&self.knots, k, mu, x)
            .iter()
            .enumerate()
            .map(|(j, b)| self.coefficients[mu - k + j] * b)
            .sum()
    }

    /// Derivative spline of degree `k - 1`
    ///
    /// Only meaningful for `k >= 1`.
    pub fn derivative(&self) -> BSpline {
        let k = self.degree;
        let n = self.coefficients.len();
        let coefficients = (0..n - 1)
            .map(|i| {
                let span = self.knots[i + k + 1] - self.knots[i + 1];
                if span > 0.0 {
                    k as f64 * (self.coefficients[i + 1] - self.coefficients[i]) / span
                } else {
                    0.0
                }
            })
            .collect();
        BSpline {
            knots: self.knots[1..self.knots.len() - 1].to_vec(),
            coefficients,
            degree: k - 1,
        }
    }

    /// Local power-basis form. Piece coefficients are the Taylor
    /// coefficients at each breakpoint, `f^(d)(b) / d!`, read off the chain
    /// of derivative splines.
    pub fn to_piecewise(&self) -> PiecewisePolynomial {
        let k = self.degree;
        let n = self.coefficients.len();

        let mut breakpoints: Vec<f64> = self.knots[k..=n].to_vec();
        breakpoints.dedup();

        let mut chain = Vec::with_capacity(k + 1);
        chain.push(self.clone());
        for _ in 0..k {
            let next = chain[chain.len() - 1].derivative();
            chain.push(next);
        }

        let pieces = breakpoints.len() - 1;
        let coefficients = (0..pieces)
            .map(|j| {
                let b = breakpoints[j];
                let mut factorial = 1.0;
                chain
                    .iter()
                    .enumerate()
                    .map(|(d, spline)| {
                        if d > 0 {
                            factorial *= d as f64;
                        }
                        spline.evaluate(b) / factorial
                    })
                    .collect()
            })
            .collect();

        PiecewisePolynomial::new(breakpoints, coefficients, k)
    }
}
