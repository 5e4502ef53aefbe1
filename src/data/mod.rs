//! Dataset acquisition and cleaning.

pub mod clean;
pub mod fetch;

pub use clean::*;
pub use fetch::*;
