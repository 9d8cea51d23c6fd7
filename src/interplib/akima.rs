//! Akima spline
//!
//! A local cubic Hermite interpolant whose node slopes are weighted averages
//! of neighbouring secant slopes (Akima 1970). It resists the overshoot of
//! global splines near abrupt changes, and each sample only influences the
//! pieces within two intervals of it.

use super::ppoly::PiecewisePolynomial;

/// Build the Akima piecewise cubic through `(x, y)`.
///
/// Callers validate the samples: at least three, `x` strictly increasing.
pub fn akima_piecewise(x: &[f64], y: &[f64]) -> PiecewisePolynomial {
    let n = x.len();
    let secants: Vec<f64> = x
        .windows(2)
        .zip(y.windows(2))
        .map(|(xs, ys)| (ys[1] - ys[0]) / (xs[1] - xs[0]))
        .collect();

    // Two extra secants on each side by linear extrapolation of the slopes
    let mut m = vec![0.0; n + 3];
    m[2..n + 1].copy_from_slice(&secants);
    m[1] = 2.0 * secants[0] - secants[1];
    m[0] = 3.0 * secants[0] - 2.0 * secants[1];
    m[n + 1] = 2.0 * secants[n - 2] - secants[n - 3];
    m[n + 2] = 3.0 * secants[n - 2] - 2.0 * secants[n - 3];

    let weights: Vec<f64> = m.windows(2).map(|w| (w[1] - w[0]).abs()).collect();
    let largest = (0..n)
        .map(|i| weights[i + 2] + weights[i])
        .fold(0.0_f64, f64::max);

    let slopes: Vec<f64> = (0..n)
        .map(|i| {
            let (w1, w2) = (weights[i + 2], weights[i]);
            if w1 + w2 > 1e-9 * largest {
                (w1 * m[i + 1] + w2 * m[i + 2]) / (w1 + w2)
            } else {
                0.5 * (m[i + 1] + m[i + 2])
            }
        })
        .collect();

    let coefficients = (0..n - 1)
        .map(|i| {
            let h = x[i + 1] - x[i];
            let s = secants[i];
            vec![
                y[i],
                slopes[i],
                (3.0 * s - 2.0 * slopes[i] - slopes[i + 1]) / h,
                (slopes[i] + slopes[i + 1] - 2.0 * s) / (h * h),
            ]
        })
        .collect();

    PiecewisePolynomial::new(x.to_vec(), coefficients, 3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_akima_passes_through_samples() {
        let x: Vec<f64> = (0..50).map(|i| i as f64 * 0.2).collect();
        let y: Vec<f64> = x.iter().map(|v| v.cos()).collect();
        let pp = akima_piecewise(&x, &y);
        for (xi, yi) in x.iter().zip(&y) {
            assert_relative_eq!(pp.evaluate(*xi), *yi, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_akima_reproduces_lines() {
        let x = [0.0, 1.0, 2.5, 3.0, 4.0];
        let y: Vec<f64> = x.iter().map(|v| 2.0 * v - 1.0).collect();
        let pp = akima_piecewise(&x, &y);
        assert_relative_eq!(pp.evaluate(1.7), 2.4, epsilon = 1e-12);
        assert_relative_eq!(pp.evaluate_derivative(3.3, 1), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_akima_no_overshoot_on_step() {
        let x: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let y = [0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0, 1.0];
        let pp = akima_piecewise(&x, &y);
        for i in 0..=90 {
            let v = pp.evaluate(i as f64 * 0.1);
            assert!((-1e-12..=1.0 + 1e-12).contains(&v), "overshoot {v}");
        }
    }

    #[test]
    fn test_three_samples() {
        let pp = akima_piecewise(&[0.0, 1.0, 2.0], &[0.0, 1.0, 0.0]);
        assert_relative_eq!(pp.evaluate(1.0), 1.0, epsilon = 1e-15);
        assert_eq!(pp.coefficients().len(), 2);
    }
}
