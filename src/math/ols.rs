//! Weighted, ridge-penalized least squares.
//!
//! Each IRLS step of the logistic solver is a problem of the form:
//!
//! ```text
//! minimize Σ w_i (z_i - x_i^T β)^2 + Σ λ_j β_j^2
//! ```
//!
//! Implementation choices:
//! - Rows are scaled by `sqrt(w_i)` and the penalty is appended as `sqrt(λ_j)`
//!   pseudo-rows with target 0, turning the problem into plain OLS.
//! - OLS is solved by SVD so tall, rank-deficient designs (one-hot blocks that
//!   sum to the intercept column) still produce a finite answer.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Try progressively looser tolerances if strict solve fails.
    for &tol in &[1e-12, 1e-10, 1e-8] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Solve `min Σ w_i (z_i - x_i β)^2 + Σ ridge_j β_j^2`.
///
/// `ridge` holds one non-negative penalty per column; zero leaves the column free.
///
/// # Panics
/// Panics if `z`, `w` and `ridge` are not sized to match `x`.
pub fn solve_weighted_ridge(
    x: &DMatrix<f64>,
    z: &DVector<f64>,
    w: &DVector<f64>,
    ridge: &[f64],
) -> Option<DVector<f64>> {
    let (n, p) = x.shape();
    assert_eq!(z.len(), n);
    assert_eq!(w.len(), n);
    assert_eq!(ridge.len(), p);

    let penalized: Vec<(usize, f64)> = ridge
        .iter()
        .enumerate()
        .filter(|(_, l)| **l > 0.0)
        .map(|(j, l)| (j, l.sqrt()))
        .collect();

    let rows = n + penalized.len();
    let mut xa = DMatrix::<f64>::zeros(rows, p);
    let mut za = DVector::<f64>::zeros(rows);

    for i in 0..n {
        let sw = w[i].max(0.0).sqrt();
        for j in 0..p {
            xa[(i, j)] = x[(i, j)] * sw;
        }
        za[i] = z[i] * sw;
    }
    for (k, (j, sl)) in penalized.iter().enumerate() {
        xa[(n + k, *j)] = *sl;
    }

    solve_least_squares(&xa, &za)
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
    fn zero_ridge_unit_weights_is_ols() {
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let z = DVector::from_row_slice(&[2.0, 5.0, 8.0]);
        let w = DVector::from_element(3, 1.0);

        let beta = solve_weighted_ridge(&x, &z, &w, &[0.0, 0.0]).unwrap();
        assert!((beta[0] - 2.0).abs() < 1e-10);
        assert!((beta[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn ridge_shrinks_penalized_column_only() {
        // Single free column with weight 1 and penalty λ: β = Σxz / (Σx² + λ).
        let x = DMatrix::from_row_slice(2, 1, &[1.0, 1.0]);
        let z = DVector::from_row_slice(&[1.0, 1.0]);
        let w = DVector::from_element(2, 1.0);

        let beta = solve_weighted_ridge(&x, &z, &w, &[2.0]).unwrap();
        assert!((beta[0] - 0.5).abs() < 1e-10);
    }

    #[test]
    fn collinear_design_still_solves_with_ridge() {
        // Intercept column equals the sum of two one-hot columns.
        let x = DMatrix::from_row_slice(4, 3, &[
            1.0, 1.0, 0.0, //
            1.0, 1.0, 0.0, //
            1.0, 0.0, 1.0, //
            1.0, 0.0, 1.0,
        ]);
        let z = DVector::from_row_slice(&[1.0, 1.0, -1.0, -1.0]);
        let w = DVector::from_element(4, 1.0);

        let beta = solve_weighted_ridge(&x, &z, &w, &[0.0, 1.0, 1.0]).unwrap();
        assert!(beta.iter().all(|v| v.is_finite()));
        assert!(beta[1] > 0.0 && beta[2] < 0.0);
    }
}
