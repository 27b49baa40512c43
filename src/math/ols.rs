//! Least-squares solver for the lag regressions in the seasonal model.
//!
//! The autoregressive terms are linear in the coefficients given the lagged
//! values, so each estimation step reduces to one small least-squares solve.
//!
//! Implementation choices:
//! - SVD rather than QR so tall (more rows than columns) systems solve
//!   without panicking.
//! - Lagged revenue columns can be nearly collinear on short, smooth series,
//!   so we retry with progressively looser tolerances before giving up.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn least_squares_solves_simple_system() {
        // Fit y = 2 + 3x on x = [0,1,2]
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let beta = solve_least_squares(&x, &y).unwrap();
        assert!((beta[0] - 2.0).abs() < 1e-10);
        assert!((beta[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn recovers_a_lag_coefficient() {
        // w[t] = 0.5 * w[t-1] exactly.
        let w = [8.0, 4.0, 2.0, 1.0, 0.5];
        let rows = w.len() - 1;
        let x = DMatrix::from_fn(rows, 1, |i, _| w[i]);
        let y = DVector::from_fn(rows, |i, _| w[i + 1]);

        let beta = solve_least_squares(&x, &y).unwrap();
        assert!((beta[0] - 0.5).abs() < 1e-10);
    }
}
