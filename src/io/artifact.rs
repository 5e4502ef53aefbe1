//! Read/write model artifact JSON files.
//!
//! Writes go to a sibling temporary file that is renamed over the destination,
//! so readers never observe a half-written artifact.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::AppError;
use crate::models::ModelArtifact;

/// Write an artifact, replacing any previous file at `path`.
pub fn write_artifact(path: &Path, artifact: &ModelArtifact) -> Result<(), AppError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            AppError::input(format!("Failed to create output directory '{}': {e}", parent.display()))
        })?;
    }

    let tmp = temp_path(path);
    let result = write_to(&tmp, artifact).and_then(|()| {
        fs::rename(&tmp, path).map_err(|e| {
            AppError::input(format!("Failed to move artifact into place at '{}': {e}", path.display()))
        })
    });
    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}

/// Read and validate an artifact.
pub fn read_artifact(path: &Path) -> Result<ModelArtifact, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::input(format!("Failed to open model artifact '{}': {e}", path.display())))?;
    let artifact: ModelArtifact = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| AppError::input(format!("Invalid model artifact JSON: {e}")))?;
    artifact.validate()?;
    Ok(artifact)
}

fn write_to(path: &Path, artifact: &ModelArtifact) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::input(format!("Failed to create '{}': {e}", path.display())))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, artifact)
        .map_err(|e| AppError::input(format!("Failed to write model artifact: {e}")))?;
    writer
        .write_all(b"\n")
        .and_then(|()| writer.flush())
        .map_err(|e| AppError::input(format!("Failed to write model artifact: {e}")))?;
    writer
        .get_ref()
        .sync_all()
        .map_err(|e| AppError::input(format!("Failed to sync model artifact: {e}")))?;
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "artifact".into());
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CategoricalColumn, FeatureSpec, FittedModel, LinearFit, Metrics, TargetSpec};
    use crate::models::serialize;

    fn artifact(intercept: f64) -> ModelArtifact {
        let model = FittedModel::new(
            FeatureSpec {
                numeric_columns: vec!["tenure".into()],
                categorical: vec![CategoricalColumn {
                    name: "Contract".into(),
                    vocabulary: vec!["Month-to-month".into(), "One year".into()],
                }],
            },
            LinearFit {
                weights: vec![-0.04, 0.9, -0.7],
                intercept,
            },
        )
        .unwrap();
        serialize(
            &model,
            &Metrics {
                auc: 0.81,
                accuracy: 0.79,
            },
            &TargetSpec::default(),
        )
        .unwrap()
    }

    #[test]
    fn write_then_read_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("public").join("models").join("churn-model.json");

        write_artifact(&path, &artifact(-0.3)).unwrap();
        let back = read_artifact(&path).unwrap();
        assert_eq!(back, artifact(-0.3));
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn rewrite_overwrites_in_full() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("churn-model.json");

        write_artifact(&path, &artifact(1.0)).unwrap();
        write_artifact(&path, &artifact(2.0)).unwrap();
        assert_eq!(read_artifact(&path).unwrap().intercept, 2.0);
    }

    #[test]
    fn read_rejects_missing_and_malformed_files() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert_eq!(read_artifact(&missing).unwrap_err().exit_code(), crate::error::EXIT_INPUT);

        let bad = dir.path().join("bad.json");
        fs::write(&bad, "{\"model_type\": \"logistic_regression\"}").unwrap();
        assert_eq!(read_artifact(&bad).unwrap_err().exit_code(), crate::error::EXIT_INPUT);
    }
}
