//! Crate-wide error type.
//!
//! Every failure carries the process exit code it maps to:
//!
//! - `2`: input errors (files, HTTP, CSV headers, config, artifacts)
//! - `3`: degenerate data (empty dataset, single-class partitions)
//! - `4`: fit or contract violations (solver failure, length mismatches)

pub const EXIT_INPUT: u8 = 2;
pub const EXIT_DEGENERATE: u8 = 3;
pub const EXIT_FIT: u8 = 4;

#[derive(Clone, PartialEq, Eq)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn input(message: impl Into<String>) -> Self {
        Self::new(EXIT_INPUT, message)
    }

    pub fn degenerate(message: impl Into<String>) -> Self {
        Self::new(EXIT_DEGENERATE, message)
    }

    pub fn fit(message: impl Into<String>) -> Self {
        Self::new(EXIT_FIT, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
