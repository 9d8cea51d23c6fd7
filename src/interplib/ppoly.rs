//! Piecewise polynomials in local power form
//!
//! Every interpolant ends up here: piece `j` covers
//! `[breakpoints[j], breakpoints[j + 1]]` and holds coefficients `c` of
//! `sum_i c[i] * (x - breakpoints[j])^i`. Evaluation, derivatives and root
//! isolation all work piece by piece.

/// Coefficients of the derivative, ascending powers
fn differentiate(coefs: &[f64]) -> Vec<f64> {
    if coefs.len() <= 1 {
        return vec![0.0];
    }
    coefs
        .iter()
        .enumerate()
        .skip(1)
        .map(|(i, &c)| i as f64 * c)
        .collect()
}

/// Horner evaluation, ascending powers
pub(crate) fn horner(coefs: &[f64], s: f64) -> f64 {
    coefs.iter().rev().fold(0.0, |acc, &c| acc * s + c)
}

/// Real roots of a polynomial on `[lo, hi]`, ascending.
///
/// Roots are bracketed between the critical points (the roots of the
/// derivative, found recursively) so each bracket is monotone, then refined
/// by bisection to full floating-point resolution. Exact zeros at bracket
/// ends are reported as roots. Double roots that do not evaluate to exactly
/// zero are not reported.
pub(crate) fn polynomial_roots(coefs: &[f64], lo: f64, hi: f64) -> Vec<f64> {
    let mut len = coefs.len();
    while len > 1 && coefs[len - 1] == 0.0 {
        len -= 1;
    }
    let coefs = &coefs[..len];

    match len {
        0 | 1 => return Vec::new(),
        2 => {
            let r = -coefs[0] / coefs[1];
            return if (lo..=hi).contains(&r) { vec![r] } else { Vec::new() };
        }
        _ => {}
    }

    let mut points = vec![lo];
    points.extend(
        polynomial_roots(&differentiate(coefs), lo, hi)
            .into_iter()
            .filter(|&p| p > lo && p < hi),
    );
    points.push(hi);

    let mut roots = Vec::new();
    for w in points.windows(2) {
        let (mut a, mut b) = (w[0], w[1]);
        let mut fa = horner(coefs, a);
        let fb = horner(coefs, b);
        if fa == 0.0 {
            roots.push(a);
            continue;
        }
        if fa * fb >= 0.0 {
            continue;
        }
        for _ in 0..200 {
            let m = 0.5 * (a + b);
            if m <= a || m >= b {
                break;
            }
            let fm = horner(coefs, m);
            if fm == 0.0 {
                a = m;
                b = m;
                break;
            }
            if (fm < 0.0) == (fa < 0.0) {
                a = m;
                fa = fm;
            } else {
                b = m;
            }
        }
        roots.push(0.5 * (a + b));
    }
    if horner(coefs, hi) == 0.0 {
        roots.push(hi);
    }
    roots.dedup();
    roots
}

/// A piecewise polynomial over strictly increasing breakpoints
#[derive(Debug, Clone, PartialEq)]
pub struct PiecewisePolynomial {
    breakpoints: Vec<f64>,
    coefficients: Vec<Vec<f64>>,
    degree: usize,
}

impl PiecewisePolynomial {
    /// Build from breakpoints and per-piece coefficients.
    ///
    /// Callers guarantee `coefficients.len() + 1 == breakpoints.len()` and a
    /// common coefficient count of `degree + 1`.
    pub(crate) fn new(breakpoints: Vec<f64>, coefficients: Vec<Vec<f64>>, degree: usize) -> Self {
        debug_assert_eq!(coefficients.len() + 1, breakpoints.len());
        PiecewisePolynomial {
            breakpoints,
            coefficients,
            degree,
        }
    }

    pub fn breakpoints(&self) -> &[f64] {
        &self.breakpoints
    }

    pub fn coefficients(&self) -> &[Vec<f64>] {
        &self.coefficients
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn start(&self) -> f64 {
        self.breakpoints[0]
    }

    pub fn end(&self) -> f64 {
        self.breakpoints[self.breakpoints.len() - 1]
    }

    /// Index of the piece used for `x`. Breakpoints belong to the piece on
    /// their right, the last breakpoint to the last piece, and points outside
    /// the range to the nearest end piece.
    pub fn piece_index(&self, x: f64) -> usize {
        let idx = self.breakpoints.partition_point(|&b| b <= x);
        idx.saturating_sub(1).min(self.coefficients.len() - 1)
    }

    /// Value at `x`, continuing the end pieces outside the range
    pub fn evaluate(&self, x: f64) -> f64 {
        let j = self.piece_index(x);
        horner(&self.coefficients[j], x - self.breakpoints[j])
    }

    /// Value of the `order`-th derivative at `x`
    pub fn evaluate_derivative(&self, x: f64, order: usize) -> f64 {
        self.evaluate_piece(self.piece_index(x), x, order)
    }

    /// Value of the `order`-th derivative of piece `j` at `x`, even where
    /// `x` lies outside that piece
    pub(crate) fn evaluate_piece(&self, j: usize, x: f64, order: usize) -> f64 {
        let mut coefs = self.coefficients[j].clone();
        for _ in 0..order {
            coefs = differentiate(&coefs);
        }
        horner(&coefs, x - self.breakpoints[j])
    }

    /// Index of the interior breakpoint within `tolerance` of `x`, if any
    pub(crate) fn interior_breakpoint(&self, x: f64, tolerance: f64) -> Option<usize> {
        let k = self.breakpoints.partition_point(|&b| b < x - tolerance);
        (k > 0 && k + 1 < self.breakpoints.len() && (self.breakpoints[k] - x).abs() <= tolerance)
            .then_some(k)
    }

    /// Tolerance under which two roots count as one
    pub(crate) fn root_tolerance(&self) -> f64 {
        1e-12 * (self.end() - self.start())
    }

    /// The derivative as a new piecewise polynomial, one degree lower
    /// (degree zero stays at zero)
    pub fn derivative(&self) -> PiecewisePolynomial {
        PiecewisePolynomial {
            breakpoints: self.breakpoints.clone(),
            coefficients: self.coefficients.iter().map(|c| differentiate(c)).collect(),
            degree: self.degree.saturating_sub(1),
        }
    }

    /// This polynomial shifted down by `level`
    pub fn offset(&self, level: f64) -> PiecewisePolynomial {
        let mut shifted = self.clone();
        for coefs in shifted.coefficients.iter_mut() {
            coefs[0] -= level;
        }
        shifted
    }

    /// Sorted zeros over the breakpoint range.
    ///
    /// Pieces that are identically zero contribute nothing. Where adjacent
    /// pieces disagree in sign at their shared breakpoint the breakpoint
    /// itself is reported. Roots closer than `1e-12` of the total span are
    /// merged.
    pub fn roots(&self) -> Vec<f64> {
        let tolerance = self.root_tolerance();
        let mut roots: Vec<f64> = Vec::new();
        let push = |x: f64, roots: &mut Vec<f64>| {
            if roots.last().map_or(true, |&last| x - last > tolerance) {
                roots.push(x);
            }
        };

        let pieces = self.coefficients.len();
        for (j, coefs) in self.coefficients.iter().enumerate() {
            let left = self.breakpoints[j];
            let width = self.breakpoints[j + 1] - left;
            for r in polynomial_roots(coefs, 0.0, width) {
                push(left + r, &mut roots);
            }
            if j + 1 < pieces {
                let before = horner(coefs, width);
                let after = self.coefficients[j + 1][0];
                if before * after < 0.0 {
                    push(self.breakpoints[j + 1], &mut roots);
                }
            }
        }
        roots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_horner() {
        // 1 + 2x + 3x^2 at x = 2
        assert_eq!(horner(&[1.0, 2.0, 3.0], 2.0), 17.0);
    }

    #[test]
    fn test_polynomial_roots_cubic() {
        // (x - 1)(x - 2)(x - 3) = -6 + 11x - 6x^2 + x^3
        let roots = polynomial_roots(&[-6.0, 11.0, -6.0, 1.0], 0.0, 4.0);
        assert_eq!(roots.len(), 3);
        for (r, expected) in roots.iter().zip([1.0, 2.0, 3.0]) {
            assert_relative_eq!(*r, expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_polynomial_roots_respects_interval() {
        let roots = polynomial_roots(&[-6.0, 11.0, -6.0, 1.0], 1.5, 2.5);
        assert_eq!(roots.len(), 1);
        assert_relative_eq!(roots[0], 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_polynomial_roots_exact_zero_at_end() {
        // x^2 - x on [0, 1] is zero at both ends
        let roots = polynomial_roots(&[0.0, -1.0, 1.0], 0.0, 1.0);
        assert_eq!(roots, vec![0.0, 1.0]);
    }

    #[test]
    fn test_zero_polynomial_has_no_roots() {
        assert!(polynomial_roots(&[0.0, 0.0, 0.0], 0.0, 1.0).is_empty());
        assert!(polynomial_roots(&[2.0], 0.0, 1.0).is_empty());
    }

    #[test]
    fn test_piece_index_takes_right_piece_at_breakpoints() {
        let pp = PiecewisePolynomial::new(
            vec![0.0, 1.0, 2.0],
            vec![vec![0.0, 1.0], vec![1.0, -1.0]],
            1,
        );
        assert_eq!(pp.piece_index(-1.0), 0);
        assert_eq!(pp.piece_index(0.5), 0);
        assert_eq!(pp.piece_index(1.0), 1);
        assert_eq!(pp.piece_index(2.0), 1);
        assert_eq!(pp.piece_index(3.0), 1);
        assert_eq!(pp.evaluate_derivative(1.0, 1), -1.0);
        assert_eq!(pp.evaluate_piece(0, 1.0, 1), 1.0);
    }

    #[test]
    fn test_interior_breakpoint_lookup() {
        let pp = PiecewisePolynomial::new(
            vec![0.0, 1.0, 2.0, 3.0],
            vec![vec![0.0, 1.0], vec![1.0, 0.0], vec![1.0, -1.0]],
            1,
        );
        let tol = pp.root_tolerance();
        assert_eq!(pp.interior_breakpoint(1.0, tol), Some(1));
        assert_eq!(pp.interior_breakpoint(2.0 + 1e-13, tol), Some(2));
        assert_eq!(pp.interior_breakpoint(1.5, tol), None);
        // Domain ends are not interior
        assert_eq!(pp.interior_breakpoint(0.0, tol), None);
        assert_eq!(pp.interior_breakpoint(3.0, tol), None);
    }

    #[test]
    fn test_shared_breakpoint_root_is_reported_once() {
        // Hat function shifted down so it crosses zero exactly at x = 1
        let pp = PiecewisePolynomial::new(
            vec![0.0, 1.0, 2.0],
            vec![vec![-1.0, 1.0], vec![0.0, 1.0]],
            1,
        );
        assert_eq!(pp.roots(), vec![1.0]);
    }

    #[test]
    fn test_jump_across_zero_at_breakpoint() {
        let pp = PiecewisePolynomial::new(
            vec![0.0, 1.0, 2.0],
            vec![vec![1.0, 0.0], vec![-1.0, 0.0]],
            1,
        );
        assert_eq!(pp.roots(), vec![1.0]);
    }

    #[test]
    fn test_derivative_and_offset() {
        let pp = PiecewisePolynomial::new(vec![0.0, 2.0], vec![vec![1.0, 0.0, 1.0]], 2);
        let d = pp.derivative();
        assert_eq!(d.degree(), 1);
        assert_eq!(d.evaluate(1.5), 3.0);
        let shifted = pp.offset(2.0);
        assert_eq!(shifted.roots(), vec![1.0]);
    }
}
