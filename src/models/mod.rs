//! Portable model representation.
//!
//! - the serialized artifact schema and its validation (`artifact`)
//! - the reference scorer consuming it (`score`)

pub mod artifact;
pub mod score;

pub use artifact::*;
pub use score::*;
