//! Command-line parsing for the churn model trainer.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! pipeline code. `app` turns these args into plain config structs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::data::DEFAULT_DATA_URL;

pub const DEFAULT_OUTPUT: &str = "public/models/churn-model.json";

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "churn", version, about = "Churn logistic-regression trainer and scorer")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load, clean, encode, fit and evaluate, then write the model artifact.
    Train(TrainArgs),
    /// Score rows against a saved artifact.
    Score(ScoreArgs),
    /// Validate a saved artifact and print its feature layout.
    Inspect(InspectArgs),
}

/// Options for `churn train`.
#[derive(Debug, Parser, Clone)]
pub struct TrainArgs {
    /// Local CSV to read. Falls back to `--url` if the file does not exist.
    #[arg(short = 'i', long, value_name = "CSV")]
    pub input: Option<PathBuf>,

    /// Dataset URL used when no local file is available.
    #[arg(long, env = "CHURN_DATA_URL", default_value = DEFAULT_DATA_URL)]
    pub url: String,

    /// HTTP timeout in seconds.
    #[arg(long, default_value_t = 60)]
    pub timeout_secs: u64,

    /// Where to write the model artifact JSON.
    #[arg(short = 'o', long, env = "CHURN_MODEL_PATH", default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Share of rows held out for evaluation.
    #[arg(long, default_value_t = 0.2)]
    pub test_fraction: f64,

    /// Random seed for the train/test split.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Shuffle without preserving class proportions.
    #[arg(long)]
    pub no_stratify: bool,

    /// Inverse L2 regularization strength.
    #[arg(long = "c", default_value_t = 1.0)]
    pub c: f64,

    /// Maximum solver iterations.
    #[arg(long, default_value_t = 100)]
    pub max_iter: usize,

    /// Solver convergence tolerance.
    #[arg(long, default_value_t = 1e-8)]
    pub tol: f64,

    /// Label column.
    #[arg(long, default_value = "Churn")]
    pub target: String,

    /// Raw label value treated as the positive class (case-insensitive).
    #[arg(long, default_value = "Yes")]
    pub positive_label: String,

    /// Identifier column excluded from features.
    #[arg(long, default_value = "customerID")]
    pub id_column: String,

    /// Columns coerced to numeric; rows that fail coercion are dropped.
    #[arg(long = "coerce-numeric", value_name = "COL", default_values_t = [String::from("TotalCharges")])]
    pub coerce_numeric: Vec<String>,
}

/// Rows to score: inline or from a file.
#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct ScoreInput {
    /// A single JSON object, e.g. `{"tenure": 5, "Contract": "One year"}`.
    #[arg(long, value_name = "JSON")]
    pub row: Option<String>,

    /// File holding a JSON object or an array of objects.
    #[arg(long, value_name = "PATH")]
    pub rows: Option<PathBuf>,
}

/// Options for `churn score`.
#[derive(Debug, Parser)]
pub struct ScoreArgs {
    /// Model artifact JSON produced by `churn train`.
    #[arg(short = 'm', long, value_name = "JSON")]
    pub model: PathBuf,

    #[command(flatten)]
    pub input: ScoreInput,
}

/// Options for `churn inspect`.
#[derive(Debug, Parser)]
pub struct InspectArgs {
    /// Model artifact JSON produced by `churn train`.
    #[arg(short = 'm', long, value_name = "JSON")]
    pub model: PathBuf,
}
