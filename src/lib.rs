//! `churn-model` library crate.
//!
//! The binary (`churn`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the feature encoder and scorer can be reused by other runtimes' test harnesses

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod features;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod report;
