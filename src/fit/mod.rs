//! Model training.
//!
//! Responsibilities:
//!
//! - deterministic train/test split (`split`)
//! - logistic solver behind the `LinearClassifier` seam (`logistic`)
//! - held-out AUC / accuracy (`metrics`)
//! - orchestration of the above (`trainer`)

pub mod logistic;
pub mod metrics;
pub mod split;
pub mod trainer;

pub use logistic::*;
pub use metrics::*;
pub use split::*;
pub use trainer::*;
