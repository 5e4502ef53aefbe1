//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - raw data (`Value`, `Row`, `Dataset`)
//! - the encoding recipe (`FeatureSpec`) and encoded output (`FeatureMatrix`)
//! - fit outputs (`LinearFit`, `FittedModel`, `Metrics`)
//! - run configuration (`TrainConfig` and its parts)

pub mod types;

pub use types::*;
