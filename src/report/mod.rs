//! Reporting utilities: run summaries, artifact layouts and score tables.

pub mod format;

pub use format::*;
