//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - converts them into plain config structs
//! - runs training or scoring
//! - prints reports

use std::time::Duration;

use clap::Parser;

use crate::cli::{Command, InspectArgs, ScoreArgs, TrainArgs};
use crate::domain::{
    ArtifactConfig, CleaningConfig, DatasetSource, SolverConfig, SplitConfig, TargetSpec, TrainConfig,
};
use crate::error::AppError;
use crate::io::artifact::read_artifact;
use crate::models::{rows_from_json, score_row};

pub mod pipeline;

/// Entry point for the `churn` binary.
pub fn run() -> Result<(), AppError> {
    // A missing `.env` is fine; flags and defaults still apply.
    match dotenvy::dotenv() {
        Err(e) if !e.not_found() => log::warn!("ignoring unreadable .env: {e}"),
        _ => {}
    }

    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Train(args) => handle_train(&args),
        Command::Score(args) => handle_score(&args),
        Command::Inspect(args) => handle_inspect(&args),
    }
}

fn handle_train(args: &TrainArgs) -> Result<(), AppError> {
    let config = train_config_from_args(args);
    let run = pipeline::run_train(&config)?;
    println!("{}", crate::report::format_run_summary(&run, &config));
    Ok(())
}

fn handle_score(args: &ScoreArgs) -> Result<(), AppError> {
    let model = read_artifact(&args.model)?.to_model()?;

    let text = match (&args.input.row, &args.input.rows) {
        (Some(row), _) => row.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .map_err(|e| AppError::input(format!("Failed to read rows from '{}': {e}", path.display())))?,
        (None, None) => return Err(AppError::input("Provide --row or --rows.")),
    };
    let rows = rows_from_json(&text)?;
    let probabilities: Vec<f64> = rows.iter().map(|row| score_row(&model, row)).collect();

    println!("{}", crate::report::format_scores(&probabilities));
    Ok(())
}

fn handle_inspect(args: &InspectArgs) -> Result<(), AppError> {
    let artifact = read_artifact(&args.model)?;
    println!("{}", crate::report::format_artifact_layout(&artifact));
    Ok(())
}

pub fn train_config_from_args(args: &TrainArgs) -> TrainConfig {
    TrainConfig {
        source: DatasetSource {
            input: args.input.clone(),
            url: args.url.clone(),
            timeout: Duration::from_secs(args.timeout_secs),
        },
        cleaning: CleaningConfig {
            target: TargetSpec::new(&args.target, &args.positive_label, &args.id_column),
            coerce_numeric: args.coerce_numeric.clone(),
        },
        split: SplitConfig {
            test_fraction: args.test_fraction,
            seed: args.seed,
            stratify: !args.no_stratify,
        },
        solver: SolverConfig {
            c: args.c,
            max_iter: args.max_iter,
            tol: args.tol,
        },
        artifact: ArtifactConfig {
            output_path: args.output.clone(),
        },
    }
}
