//! Binary logistic regression.
//!
//! The trainer only relies on the [`LinearClassifier`] capability; any solver
//! that returns a linear decision boundary minimizing a (regularized) logistic
//! loss fits behind it.
//!
//! The shipped solver is Newton's method written as iteratively reweighted
//! least squares (IRLS):
//!
//! ```text
//! η = Xβ,  p = σ(η),  w = p(1 - p),  z = η + (y - p) / w
//! β ← argmin Σ w_i (z_i - x_i β)^2 + (1/C) Σ_{j>0} β_j^2
//! ```
//!
//! Column 0 is the intercept and is left unpenalized. Every step is a weighted
//! ridge problem solved by SVD (`math::solve_weighted_ridge`), so collinear
//! one-hot blocks do not break the solve.

use nalgebra::{DMatrix, DVector};

use crate::domain::{LinearFit, SolverConfig};
use crate::error::AppError;
use crate::math::solve_weighted_ridge;

/// Floor on IRLS weights so the working response stays finite.
const MIN_WEIGHT: f64 = 1e-10;

/// Anything that can fit a linear binary classifier.
pub trait LinearClassifier {
    /// Fit on `x` (rows = samples) and `y` (0/1 per row).
    fn fit(&self, x: &DMatrix<f64>, y: &[u8]) -> Result<LinearFit, AppError>;
}

/// L2-regularized logistic regression solved by IRLS.
#[derive(Debug, Clone)]
pub struct IrlsLogistic {
    config: SolverConfig,
}

impl IrlsLogistic {
    pub fn new(config: SolverConfig) -> Result<Self, AppError> {
        if !(config.c.is_finite() && config.c > 0.0) {
            return Err(AppError::input(format!(
                "Invalid regularization C={}: must be finite and > 0.",
                config.c
            )));
        }
        if config.max_iter == 0 {
            return Err(AppError::input("Solver max_iter must be > 0."));
        }
        if !(config.tol.is_finite() && config.tol > 0.0) {
            return Err(AppError::input(format!(
                "Invalid solver tolerance {}: must be finite and > 0.",
                config.tol
            )));
        }
        Ok(Self { config })
    }
}

impl LinearClassifier for IrlsLogistic {
    fn fit(&self, x: &DMatrix<f64>, y: &[u8]) -> Result<LinearFit, AppError> {
        let (n, p) = x.shape();
        if n == 0 {
            return Err(AppError::degenerate("No training rows to fit."));
        }
        if y.len() != n {
            return Err(AppError::fit(format!(
                "Label count {} does not match row count {n}.",
                y.len()
            )));
        }

        // Design with a leading intercept column.
        let mut design = DMatrix::<f64>::from_element(n, p + 1, 1.0);
        design.view_mut((0, 1), (n, p)).copy_from(x);

        let targets = DVector::<f64>::from_iterator(n, y.iter().map(|&v| f64::from(v)));

        let lambda = 1.0 / self.config.c;
        let mut ridge = vec![lambda; p + 1];
        ridge[0] = 0.0;

        let mut beta = DVector::<f64>::zeros(p + 1);
        let mut converged = false;

        for iter in 0..self.config.max_iter {
            let eta = &design * &beta;
            let mut w = DVector::<f64>::zeros(n);
            let mut z = DVector::<f64>::zeros(n);
            for i in 0..n {
                let pi = 1.0 / (1.0 + (-eta[i]).exp());
                let wi = (pi * (1.0 - pi)).max(MIN_WEIGHT);
                w[i] = wi;
                z[i] = eta[i] + (targets[i] - pi) / wi;
            }

            let next = solve_weighted_ridge(&design, &z, &w, &ridge)
                .ok_or_else(|| AppError::fit(format!("IRLS step {iter} failed to solve.")))?;

            let step = (&next - &beta).amax();
            beta = next;
            log::debug!("irls iter {iter}: max_step={step:.3e}");

            if step < self.config.tol {
                converged = true;
                log::debug!("irls converged after {} iterations", iter + 1);
                break;
            }
        }

        if !converged {
            log::warn!(
                "logistic solver did not converge within {} iterations",
                self.config.max_iter
            );
        }
        if beta.iter().any(|v| !v.is_finite()) {
            return Err(AppError::fit("Logistic fit produced non-finite parameters."));
        }

        Ok(LinearFit {
            intercept: beta[0],
            weights: beta.iter().skip(1).copied().collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{linear_score, sigmoid};

    fn solver() -> IrlsLogistic {
        IrlsLogistic::new(SolverConfig::default()).unwrap()
    }

    #[test]
    fn rejects_bad_config() {
        for cfg in [
            SolverConfig { c: 0.0, ..SolverConfig::default() },
            SolverConfig { max_iter: 0, ..SolverConfig::default() },
            SolverConfig { tol: -1.0, ..SolverConfig::default() },
        ] {
            assert_eq!(
                IrlsLogistic::new(cfg).unwrap_err().exit_code(),
                crate::error::EXIT_INPUT
            );
        }
    }

    #[test]
    fn learns_direction_of_signal() {
        // y = 1 when x > 0, with some overlap near zero.
        let xs: Vec<f64> = (-20..=20).map(|i| i as f64 / 4.0).collect();
        let y: Vec<u8> = xs
            .iter()
            .enumerate()
            .map(|(i, &x)| u8::from(x > 0.0 || (x > -1.0 && i % 2 == 0)))
            .collect();
        let x = DMatrix::from_column_slice(xs.len(), 1, &xs);

        let fit = solver().fit(&x, &y).unwrap();
        assert_eq!(fit.weights.len(), 1);
        assert!(fit.weights[0] > 0.0);
        assert!(sigmoid(linear_score(&fit.weights, fit.intercept, &[4.0])) > 0.9);
        assert!(sigmoid(linear_score(&fit.weights, fit.intercept, &[-4.0])) < 0.1);
    }

    #[test]
    fn intercept_only_matches_base_rate() {
        // No features: the unpenalized intercept converges to logit(mean(y)).
        let y = [1u8, 0, 0, 0];
        let x = DMatrix::<f64>::zeros(4, 0);
        let fit = solver().fit(&x, &y).unwrap();
        assert!(fit.weights.is_empty());
        assert!((sigmoid(fit.intercept) - 0.25).abs() < 1e-9);
    }

    #[test]
    fn separable_data_stays_finite_under_ridge() {
        let x = DMatrix::from_column_slice(4, 1, &[-2.0, -1.0, 1.0, 2.0]);
        let fit = solver().fit(&x, &[0, 0, 1, 1]).unwrap();
        assert!(fit.weights[0].is_finite() && fit.weights[0] > 0.0);
    }

    #[test]
    fn label_length_mismatch_is_contract_error() {
        let x = DMatrix::<f64>::zeros(3, 1);
        let err = solver().fit(&x, &[0, 1]).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_FIT);
    }
}
