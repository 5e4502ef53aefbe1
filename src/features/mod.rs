//! Feature encoding contract.
//!
//! - derive the recipe from a cleaned dataset (`spec`)
//! - turn rows into fixed-order numeric vectors (`encoder`)

pub mod encoder;
pub mod spec;

pub use encoder::*;
pub use spec::*;
