//! Mathematical utilities: logistic link and weighted least squares.

pub mod link;
pub mod ols;

pub use link::*;
pub use ols::*;
