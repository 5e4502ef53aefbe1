//! Input/output helpers.
//!
//! - CSV ingest + type inference (`ingest`)
//! - model artifact JSON read/write (`artifact`)

pub mod artifact;
pub mod ingest;

pub use artifact::*;
pub use ingest::*;
