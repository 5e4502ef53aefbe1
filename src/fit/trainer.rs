//! Split → fit → evaluate.
//!
//! Guardrails (all fatal):
//! - matrix width / label length must agree with the feature spec (contract error)
//! - the training partition must contain both classes (degenerate data)
//! - the test partition must contain both classes, otherwise AUC is undefined

use nalgebra::DMatrix;

use crate::domain::{FeatureMatrix, FeatureSpec, FittedModel, Metrics, SplitConfig};
use crate::error::AppError;
use crate::fit::logistic::LinearClassifier;
use crate::fit::metrics::{accuracy, roc_auc};
use crate::fit::split::split_indices;
use crate::math::{linear_score, sigmoid};

/// Everything a training run produces.
#[derive(Debug, Clone)]
pub struct TrainOutput {
    pub model: FittedModel,
    pub metrics: Metrics,
    pub n_train: usize,
    pub n_test: usize,
    /// Positive-class share of the full label vector.
    pub positive_rate: f64,
}

/// Train and evaluate a linear classifier on an encoded matrix.
pub fn train<C: LinearClassifier + ?Sized>(
    spec: &FeatureSpec,
    matrix: &FeatureMatrix,
    labels: &[u8],
    split: &SplitConfig,
    classifier: &C,
) -> Result<TrainOutput, AppError> {
    check_inputs(spec, matrix, labels)?;

    let partition = split_indices(labels, split)?;
    let y_train: Vec<u8> = partition.train.iter().map(|&i| labels[i]).collect();
    let y_test: Vec<u8> = partition.test.iter().map(|&i| labels[i]).collect();

    if !has_both_classes(&y_train) {
        return Err(AppError::degenerate(
            "Training partition contains a single class; refusing to fit a degenerate model.",
        ));
    }
    if !has_both_classes(&y_test) {
        return Err(AppError::degenerate(
            "Test partition contains a single class; AUC is undefined.",
        ));
    }

    log::info!(
        "split: train={} test={} (test_fraction={}, seed={}, stratify={})",
        partition.train.len(),
        partition.test.len(),
        split.test_fraction,
        split.seed,
        split.stratify
    );

    let x_train = to_design(matrix, &partition.train);
    let fit = classifier.fit(&x_train, &y_train)?;
    let model = FittedModel::new(spec.clone(), fit)?;

    // AUC ranks raw margins: the saturating sigmoid would tie large scores.
    let margins: Vec<f64> = partition
        .test
        .iter()
        .map(|&i| linear_score(model.weights(), model.intercept(), &matrix.rows[i]))
        .collect();
    let probabilities: Vec<f64> = margins.iter().map(|&m| sigmoid(m)).collect();

    let auc = roc_auc(&margins, &y_test)
        .ok_or_else(|| AppError::degenerate("Test partition contains a single class; AUC is undefined."))?;
    let metrics = Metrics {
        auc,
        accuracy: accuracy(&probabilities, &y_test),
    };

    let positives = labels.iter().filter(|&&y| y == 1).count();
    Ok(TrainOutput {
        model,
        metrics,
        n_train: partition.train.len(),
        n_test: partition.test.len(),
        positive_rate: positives as f64 / labels.len() as f64,
    })
}

fn check_inputs(spec: &FeatureSpec, matrix: &FeatureMatrix, labels: &[u8]) -> Result<(), AppError> {
    if matrix.n_rows() == 0 {
        return Err(AppError::degenerate("Cannot train on an empty dataset."));
    }
    if matrix.n_features != spec.feature_count() {
        return Err(AppError::fit(format!(
            "Matrix has {} features but the feature spec declares {}.",
            matrix.n_features,
            spec.feature_count()
        )));
    }
    if let Some(i) = matrix.rows.iter().position(|r| r.len() != matrix.n_features) {
        return Err(AppError::fit(format!(
            "Row {i} has {} features, expected {}.",
            matrix.rows[i].len(),
            matrix.n_features
        )));
    }
    if labels.len() != matrix.n_rows() {
        return Err(AppError::fit(format!(
            "Label count {} does not match row count {}.",
            labels.len(),
            matrix.n_rows()
        )));
    }
    if let Some(bad) = labels.iter().find(|&&y| y > 1) {
        return Err(AppError::fit(format!("Labels must be 0/1, found {bad}.")));
    }
    Ok(())
}

fn has_both_classes(labels: &[u8]) -> bool {
    labels.contains(&0) && labels.contains(&1)
}

fn to_design(matrix: &FeatureMatrix, rows: &[usize]) -> DMatrix<f64> {
    DMatrix::from_fn(rows.len(), matrix.n_features, |i, j| matrix.rows[rows[i]][j])
}
