//! Shared domain types.
//!
//! These types are intentionally kept lightweight so they can be:
//!
//! - produced by ingest/cleaning
//! - consumed by the feature builder, encoder and trainer
//! - mapped onto the portable artifact schema

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// A raw cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
    Missing,
}

impl Value {
    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    /// String form used for categorical matching, trimmed.
    ///
    /// Returns `None` for missing values and for text that is blank after trimming.
    pub fn category_key(&self) -> Option<String> {
        let key = match self {
            Value::Missing => return None,
            Value::Number(v) => format!("{v}"),
            Value::Text(s) => s.trim().to_string(),
        };
        if key.is_empty() { None } else { Some(key) }
    }
}

static MISSING: Value = Value::Missing;

/// One dataset row: column name -> raw value.
///
/// Columns the row does not carry read as [`Value::Missing`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    values: HashMap<String, Value>,
}

impl Row {
    pub fn get(&self, column: &str) -> &Value {
        self.values.get(column).unwrap_or(&MISSING)
    }

    pub fn set(&mut self, column: impl Into<String>, value: Value) {
        self.values.insert(column.into(), value);
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Row {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Rows plus the column order they were read in.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Dataset {
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }
}

/// One categorical column and its sorted vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoricalColumn {
    pub name: String,
    pub vocabulary: Vec<String>,
}

/// The frozen encoding recipe.
///
/// Layout: all numeric columns first, then one one-hot block per categorical
/// column in `categorical` order, each block in vocabulary order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureSpec {
    pub numeric_columns: Vec<String>,
    pub categorical: Vec<CategoricalColumn>,
}

impl FeatureSpec {
    pub fn feature_count(&self) -> usize {
        self.numeric_columns.len()
            + self
                .categorical
                .iter()
                .map(|c| c.vocabulary.len())
                .sum::<usize>()
    }

    /// Feature names in encoder order: numeric names, then `<col>__<category>`.
    pub fn feature_names(&self) -> Vec<String> {
        let mut names = Vec::with_capacity(self.feature_count());
        names.extend(self.numeric_columns.iter().cloned());
        for col in &self.categorical {
            for cat in &col.vocabulary {
                names.push(format!("{}__{}", col.name, cat));
            }
        }
        names
    }

    pub fn vocabulary(&self, column: &str) -> Option<&[String]> {
        self.categorical
            .iter()
            .find(|c| c.name == column)
            .map(|c| c.vocabulary.as_slice())
    }
}

/// Dense encoded rows, all of length `n_features`.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    pub n_features: usize,
    pub rows: Vec<Vec<f64>>,
}

impl FeatureMatrix {
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }
}

/// Label semantics recorded alongside the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSpec {
    /// Raw label column.
    pub column: String,
    /// Raw label value mapped to class `1` (compared case-insensitively).
    pub positive_label: String,
    /// Row identifier column, never a feature.
    pub id_column: String,
    /// Derived 0/1 label column appended by cleaning.
    pub numeric_column: String,
}

impl TargetSpec {
    pub fn new(column: impl Into<String>, positive_label: impl Into<String>, id_column: impl Into<String>) -> Self {
        let column = column.into();
        let numeric_column = format!("{column}Numeric");
        Self {
            column,
            positive_label: positive_label.into(),
            id_column: id_column.into(),
            numeric_column,
        }
    }

    /// Columns the feature builder must skip.
    pub fn ignored_columns(&self) -> Vec<String> {
        vec![
            self.id_column.clone(),
            self.column.clone(),
            self.numeric_column.clone(),
        ]
    }
}

impl Default for TargetSpec {
    fn default() -> Self {
        Self::new("Churn", "Yes", "customerID")
    }
}

/// Train/test split settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitConfig {
    pub test_fraction: f64,
    pub seed: u64,
    pub stratify: bool,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            test_fraction: 0.2,
            seed: 42,
            stratify: true,
        }
    }
}

/// Logistic solver settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    /// Inverse L2 strength (larger = weaker penalty). The intercept is not penalized.
    pub c: f64,
    pub max_iter: usize,
    /// Stop once the largest parameter change is below this.
    pub tol: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            c: 1.0,
            max_iter: 100,
            tol: 1e-8,
        }
    }
}

/// Output of a linear classifier fit.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearFit {
    pub weights: Vec<f64>,
    pub intercept: f64,
}

/// Weights + intercept + the spec that produced the features they apply to.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedModel {
    spec: FeatureSpec,
    weights: Vec<f64>,
    intercept: f64,
}

impl FittedModel {
    /// Bind a fit to its spec; rejects a weight vector of the wrong length.
    pub fn new(spec: FeatureSpec, fit: LinearFit) -> Result<Self, crate::error::AppError> {
        if fit.weights.len() != spec.feature_count() {
            return Err(crate::error::AppError::fit(format!(
                "Model has {} weights but the feature spec declares {} features.",
                fit.weights.len(),
                spec.feature_count()
            )));
        }
        Ok(Self {
            spec,
            weights: fit.weights,
            intercept: fit.intercept,
        })
    }

    pub fn spec(&self) -> &FeatureSpec {
        &self.spec
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }
}

/// Held-out evaluation metrics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub auc: f64,
    pub accuracy: f64,
}

/// Where the dataset comes from.
#[derive(Debug, Clone)]
pub struct DatasetSource {
    /// Local CSV, preferred when it exists.
    pub input: Option<PathBuf>,
    /// Fallback URL.
    pub url: String,
    pub timeout: Duration,
}

/// Cleaning policy applied between ingest and feature building.
#[derive(Debug, Clone)]
pub struct CleaningConfig {
    pub target: TargetSpec,
    /// Columns coerced to numeric; rows where coercion fails are dropped.
    pub coerce_numeric: Vec<String>,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            target: TargetSpec::default(),
            coerce_numeric: vec!["TotalCharges".to_string()],
        }
    }
}

/// Where the artifact is written.
#[derive(Debug, Clone)]
pub struct ArtifactConfig {
    pub output_path: PathBuf,
}

/// A full training run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct TrainConfig {
    pub source: DatasetSource,
    pub cleaning: CleaningConfig,
    pub split: SplitConfig,
    pub solver: SolverConfig,
    pub artifact: ArtifactConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contract_spec() -> FeatureSpec {
        FeatureSpec {
            numeric_columns: vec!["tenure".to_string()],
            categorical: vec![CategoricalColumn {
                name: "Contract".to_string(),
                vocabulary: vec![
                    "Month-to-month".to_string(),
                    "One year".to_string(),
                    "Two year".to_string(),
                ],
            }],
        }
    }

    #[test]
    fn feature_names_follow_encoder_layout() {
        let spec = contract_spec();
        assert_eq!(spec.feature_count(), 4);
        assert_eq!(
            spec.feature_names(),
            vec![
                "tenure",
                "Contract__Month-to-month",
                "Contract__One year",
                "Contract__Two year"
            ]
        );
    }

    #[test]
    fn category_key_trims_and_skips_blank() {
        assert_eq!(Value::Text("  One year ".into()).category_key().as_deref(), Some("One year"));
        assert_eq!(Value::Text("   ".into()).category_key(), None);
        assert_eq!(Value::Missing.category_key(), None);
        assert_eq!(Value::Number(1.0).category_key().as_deref(), Some("1"));
        assert_eq!(Value::Number(2.5).category_key().as_deref(), Some("2.5"));
    }

    #[test]
    fn absent_column_reads_as_missing() {
        let row: Row = [("tenure", Value::Number(3.0))].into_iter().collect();
        assert_eq!(row.get("tenure"), &Value::Number(3.0));
        assert!(row.get("Contract").is_missing());
    }

    #[test]
    fn fitted_model_rejects_length_mismatch() {
        let fit = LinearFit {
            weights: vec![0.1, 0.2],
            intercept: 0.0,
        };
        let err = FittedModel::new(contract_spec(), fit).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_FIT);
    }
}
