//! Logistic link and linear scoring primitives.

/// Beyond this magnitude the logistic curve is treated as saturated.
pub const SIGMOID_CLAMP: f64 = 20.0;

/// Logistic function with hard saturation at `±SIGMOID_CLAMP`.
///
/// Saturating to exactly `0.0` / `1.0` keeps scores identical to the runtime
/// that consumes exported models.
pub fn sigmoid(x: f64) -> f64 {
    if x > SIGMOID_CLAMP {
        return 1.0;
    }
    if x < -SIGMOID_CLAMP {
        return 0.0;
    }
    1.0 / (1.0 + (-x).exp())
}

/// `intercept + Σ w_i x_i`, accumulated left to right.
///
/// # Panics
/// Panics if `weights` and `features` differ in length.
pub fn linear_score(weights: &[f64], intercept: f64, features: &[f64]) -> f64 {
    assert_eq!(weights.len(), features.len());
    let mut s = intercept;
    for (w, x) in weights.iter().zip(features) {
        s += w * x;
    }
    s
}
