//! Apply a frozen [`FeatureSpec`] to raw rows.
//!
//! Policy for values the feature spec cannot place:
//! - numeric: missing, blank or unparseable values encode as `0.0`
//! - categorical: missing, blank or unseen values encode as an all-zero block
//!
//! Encoding a row never looks at any other row, so `encode_rows` is free to
//! run in parallel.

use rayon::prelude::*;

use crate::domain::{FeatureMatrix, FeatureSpec, Row, Value};

/// Encode a single row. The result always has `spec.feature_count()` entries.
pub fn encode_row(row: &Row, spec: &FeatureSpec) -> Vec<f64> {
    let mut out = vec![0.0; spec.feature_count()];
    let mut idx = 0;

    for col in &spec.numeric_columns {
        out[idx] = numeric_value(row.get(col));
        idx += 1;
    }

    for col in &spec.categorical {
        if let Some(key) = row.get(&col.name).category_key() {
            if let Some(pos) = col.vocabulary.iter().position(|cat| *cat == key) {
                out[idx + pos] = 1.0;
            }
        }
        idx += col.vocabulary.len();
    }

    out
}

/// Encode many rows, preserving their order.
pub fn encode_rows(rows: &[Row], spec: &FeatureSpec) -> FeatureMatrix {
    let encoded: Vec<Vec<f64>> = rows.par_iter().map(|row| encode_row(row, spec)).collect();
    FeatureMatrix {
        n_features: spec.feature_count(),
        rows: encoded,
    }
}

fn numeric_value(value: &Value) -> f64 {
    let v = match value {
        Value::Number(v) => *v,
        Value::Text(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        Value::Missing => 0.0,
    };
    if v.is_nan() { 0.0 } else { v }
}
