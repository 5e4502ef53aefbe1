//! Formatted terminal output.
//!
//! We keep formatting code in one place so the training and scoring code stays
//! free of presentation concerns.

use crate::app::pipeline::RunOutput;
use crate::domain::TrainConfig;
use crate::models::ModelArtifact;

/// Format the summary printed after `churn train`.
pub fn format_run_summary(run: &RunOutput, config: &TrainConfig) -> String {
    let mut out = String::new();
    let target = &config.cleaning.target;
    let training = &run.training;

    out.push_str("=== churn - logistic regression ===\n");
    out.push_str(&format!(
        "Target: {} (positive = {:?})\n",
        target.column, target.positive_label
    ));
    out.push_str(&format!(
        "Rows: read={} | skipped={} | dropped={} | used={}\n",
        run.rows_read,
        run.row_errors.len(),
        run.cleaned.dropped,
        run.cleaned.dataset.len(),
    ));
    out.push_str(&format!(
        "Split: train={} | test={} | positive rate={:.3} | seed={} | stratify={}\n",
        training.n_train, training.n_test, training.positive_rate, config.split.seed, config.split.stratify,
    ));
    out.push_str(&format!(
        "Solver: C={} | max_iter={} | tol={:e}\n",
        config.solver.c, config.solver.max_iter, config.solver.tol
    ));

    out.push_str("\nHeld-out metrics:\n");
    out.push_str(&format!("- auc     : {:.4}\n", training.metrics.auc));
    out.push_str(&format!("- accuracy: {:.4}\n", training.metrics.accuracy));

    out.push('\n');
    out.push_str(&format_top_weights(&run.artifact, 10));
    out.push_str(&format!("\nModel written to {}\n", config.artifact.output_path.display()));

    out
}

/// Format the feature layout of an artifact (`churn inspect`).
pub fn format_artifact_layout(artifact: &ModelArtifact) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "Model: {:?} | target={} | positive={:?}\n",
        artifact.model_type, artifact.target, artifact.positive_label
    ));
    out.push_str(&format!(
        "Training metrics: auc={:.4} accuracy={:.4}\n",
        artifact.training_metrics.auc, artifact.training_metrics.accuracy
    ));
    out.push_str(&format!(
        "Features: {} ({} numeric, {} categorical columns)\n",
        artifact.feature_names.len(),
        artifact.numeric_cols.len(),
        artifact.categorical_cols.len()
    ));
    out.push_str(&format!("Intercept: {:.6}\n\n", artifact.intercept));

    out.push_str(&format!("{:>5} {:<40} {:>12}\n", "#", "feature", "coef"));
    out.push_str(&format!("{:-<5} {:-<40} {:-<12}\n", "", "", ""));
    for (i, (name, coef)) in artifact.feature_names.iter().zip(&artifact.coef).enumerate() {
        out.push_str(&format!("{i:>5} {:<40} {coef:>12.6}\n", truncate(name, 40)));
    }

    out
}

/// One probability per scored row.
pub fn format_scores(probabilities: &[f64]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:>5} {:>12}\n", "row", "p(positive)"));
    for (i, p) in probabilities.iter().enumerate() {
        out.push_str(&format!("{i:>5} {p:>12.6}\n"));
    }
    out
}

/// Largest coefficients by magnitude.
fn format_top_weights(artifact: &ModelArtifact, top_n: usize) -> String {
    let mut ranked: Vec<(&String, f64)> = artifact.feature_names.iter().zip(artifact.coef.iter().copied()).collect();
    ranked.sort_by(|a, b| b.1.abs().total_cmp(&a.1.abs()));

    let mut out = format!("Top {} coefficients by |coef|:\n", top_n.min(ranked.len()));
    for (name, coef) in ranked.into_iter().take(top_n) {
        out.push_str(&format!("  {:<40} {coef:>+10.4}\n", truncate(name, 40)));
    }
    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}
