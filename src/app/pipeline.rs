//! Shared training pipeline.
//!
//! load -> clean -> feature spec -> encode -> split/fit/evaluate -> serialize -> write
//!
//! The artifact is only written once every earlier step has succeeded.

use crate::data::{CleanedData, clean_dataset, load_dataset};
use crate::domain::{Dataset, TrainConfig};
use crate::error::AppError;
use crate::features::{build_spec, encode_rows};
use crate::fit::{IrlsLogistic, TrainOutput, train};
use crate::io::artifact::write_artifact;
use crate::io::ingest::RowError;
use crate::models::{ModelArtifact, serialize};

/// All computed outputs of a single `churn train` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub rows_read: usize,
    pub row_errors: Vec<RowError>,
    pub cleaned: CleanedData,
    pub training: TrainOutput,
    pub artifact: ModelArtifact,
}

/// Execute the full pipeline: acquire the dataset, then train on it.
pub fn run_train(config: &TrainConfig) -> Result<RunOutput, AppError> {
    let ingest = load_dataset(&config.source)?;
    if ingest.dataset.is_empty() {
        return Err(AppError::degenerate("Dataset contains no rows."));
    }

    let mut run = run_train_with_dataset(config, &ingest.dataset)?;
    run.rows_read = ingest.rows_read;
    run.row_errors = ingest.row_errors;
    Ok(run)
}

/// Execute the pipeline on an already-loaded raw dataset.
pub fn run_train_with_dataset(config: &TrainConfig, raw: &Dataset) -> Result<RunOutput, AppError> {
    let cleaned = clean_dataset(raw, &config.cleaning)?;
    let target = &config.cleaning.target;

    let spec = build_spec(&cleaned.dataset, &target.ignored_columns());
    log::info!(
        "feature spec: {} numeric + {} categorical columns -> {} features",
        spec.numeric_columns.len(),
        spec.categorical.len(),
        spec.feature_count()
    );

    let matrix = encode_rows(&cleaned.dataset.rows, &spec);
    let classifier = IrlsLogistic::new(config.solver)?;
    let training = train(&spec, &matrix, &cleaned.labels, &config.split, &classifier)?;
    log::info!(
        "held-out metrics: auc={:.4} accuracy={:.4}",
        training.metrics.auc,
        training.metrics.accuracy
    );

    let artifact = serialize(&training.model, &training.metrics, target)?;
    write_artifact(&config.artifact.output_path, &artifact)?;
    log::info!("saved model to {}", config.artifact.output_path.display());

    Ok(RunOutput {
        rows_read: raw.len(),
        row_errors: Vec::new(),
        cleaned,
        training,
        artifact,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ArtifactConfig, CleaningConfig, DatasetSource, SolverConfig, SplitConfig};
    use crate::io::artifact::read_artifact;
    use crate::io::ingest::read_dataset;
    use crate::models::score_row;
    use std::fmt::Write as _;
    use std::path::Path;

    /// Synthetic Telco-shaped CSV: short tenure on month-to-month churns more.
    fn telco_csv(n: usize) -> String {
        let contracts = ["Month-to-month", "One year", "Two year"];
        let mut csv = String::from("customerID,tenure,Contract,MonthlyCharges,TotalCharges,Churn\n");
        for i in 0..n {
            let tenure = (i * 7) % 72;
            let contract = contracts[(i * 5) % 3];
            let monthly = 20.0 + ((i * 13) % 90) as f64;
            let total = if i % 97 == 0 {
                " ".to_string()
            } else {
                format!("{:.2}", monthly * tenure as f64)
            };
            let churn = (contract == "Month-to-month" && tenure < 24) || (i % 11 == 0);
            let label = if churn { "Yes" } else { "No" };
            writeln!(csv, "C{i:04},{tenure},{contract},{monthly:.2},{total},{label}").unwrap();
        }
        csv
    }

    fn config(output: &Path) -> TrainConfig {
        TrainConfig {
            source: DatasetSource {
                input: None,
                url: String::new(),
                timeout: crate::data::DEFAULT_TIMEOUT,
            },
            cleaning: CleaningConfig::default(),
            split: SplitConfig::default(),
            solver: SolverConfig::default(),
            artifact: ArtifactConfig {
                output_path: output.to_path_buf(),
            },
        }
    }

    #[test]
    fn end_to_end_writes_a_scoreable_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("public/models/churn-model.json");
        let raw = read_dataset(telco_csv(600).as_bytes()).unwrap().dataset;

        let run = run_train_with_dataset(&config(&path), &raw).unwrap();

        // i % 97 == 0 for i in 0..600 -> 7 rows with blank TotalCharges.
        assert_eq!(run.cleaned.dropped, 7);
        assert_eq!(run.training.n_train + run.training.n_test, 593);
        assert!(run.training.metrics.auc > 0.7);

        let artifact = read_artifact(&path).unwrap();
        assert_eq!(artifact, run.artifact);
        assert_eq!(artifact.numeric_cols, vec!["tenure", "MonthlyCharges", "TotalCharges"]);
        assert_eq!(
            artifact.feature_names[3..],
            ["Contract__Month-to-month", "Contract__One year", "Contract__Two year"]
        );
        assert!(!artifact.feature_names.iter().any(|n| n.starts_with("Churn") || n == "customerID"));

        let model = artifact.to_model().unwrap();
        let row = raw.rows[1].clone();
        let p = score_row(&model, &row);
        assert!((0.0..=1.0).contains(&p));
        assert_eq!(p, score_row(&model, &row));
    }

    #[test]
    fn same_config_same_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let raw = read_dataset(telco_csv(300).as_bytes()).unwrap().dataset;

        let a = run_train_with_dataset(&config(&dir.path().join("a.json")), &raw).unwrap();
        let b = run_train_with_dataset(&config(&dir.path().join("b.json")), &raw).unwrap();
        assert_eq!(a.artifact, b.artifact);
    }

    #[test]
    fn single_class_dataset_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("churn-model.json");
        let raw = read_dataset(
            "customerID,tenure,TotalCharges,Churn\nA,1,10,No\nB,2,20,No\nC,3,30,No\nD,4,40,No\nE,5,50,No\n"
                .as_bytes(),
        )
        .unwrap()
        .dataset;

        let err = run_train_with_dataset(&config(&path), &raw).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_DEGENERATE);
        assert!(!path.exists());
    }
}
