//! Derive the encoding recipe from a cleaned dataset.
//!
//! Classification rules:
//! - a column whose values are all numbers (or missing) is numeric
//! - a column carrying any text is categorical
//!
//! Both lists keep the dataset's column order. Vocabularies are sorted by code
//! point (Rust `String` ordering), so the recipe is byte-identical across runs
//! and platforms.

use std::collections::BTreeSet;

use crate::domain::{CategoricalColumn, Dataset, FeatureSpec, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Numeric,
    Categorical,
}

/// Build the feature spec, skipping `ignored_columns`.
pub fn build_spec<S: AsRef<str>>(dataset: &Dataset, ignored_columns: &[S]) -> FeatureSpec {
    let mut spec = FeatureSpec::default();

    for column in &dataset.columns {
        if ignored_columns.iter().any(|c| c.as_ref() == column) {
            continue;
        }
        match classify(dataset, column) {
            ColumnKind::Numeric => spec.numeric_columns.push(column.clone()),
            ColumnKind::Categorical => spec.categorical.push(CategoricalColumn {
                name: column.clone(),
                vocabulary: vocabulary(dataset, column),
            }),
        }
    }

    log::debug!(
        "feature spec: {} numeric, {} categorical, {} features",
        spec.numeric_columns.len(),
        spec.categorical.len(),
        spec.feature_count()
    );
    spec
}

fn classify(dataset: &Dataset, column: &str) -> ColumnKind {
    let has_text = dataset
        .rows
        .iter()
        .any(|row| matches!(row.get(column), Value::Text(_)));
    if has_text {
        ColumnKind::Categorical
    } else {
        ColumnKind::Numeric
    }
}

fn vocabulary(dataset: &Dataset, column: &str) -> Vec<String> {
    let distinct: BTreeSet<String> = dataset
        .rows
        .iter()
        .filter_map(|row| row.get(column).category_key())
        .collect();
    distinct.into_iter().collect()
}
