//! Cleaning policy between ingest and feature building.
//!
//! Steps, in order:
//! 1. coerce configured columns to numeric; rows where that fails are dropped
//! 2. normalize the label column to 0/1 (case-insensitive match on the
//!    positive label) and append it as the derived numeric label column
//!
//! The output is the "cleaned dataset" the feature builder expects, plus the
//! label vector aligned with its rows.

use crate::domain::{CleaningConfig, Dataset, Row, Value};
use crate::error::AppError;
use crate::io::ingest::parse_number;

/// Cleaned rows and their binary labels.
#[derive(Debug, Clone)]
pub struct CleanedData {
    pub dataset: Dataset,
    pub labels: Vec<u8>,
    /// Rows removed by numeric coercion.
    pub dropped: usize,
}

pub fn clean_dataset(raw: &Dataset, config: &CleaningConfig) -> Result<CleanedData, AppError> {
    let target = &config.target;
    if !raw.has_column(&target.column) {
        return Err(AppError::input(format!(
            "Missing label column `{}` in dataset.",
            target.column
        )));
    }
    for col in &config.coerce_numeric {
        if !raw.has_column(col) {
            return Err(AppError::input(format!(
                "Column `{col}` configured for numeric coercion is not in the dataset."
            )));
        }
    }

    let mut rows = Vec::with_capacity(raw.len());
    let mut labels = Vec::with_capacity(raw.len());
    let mut dropped = 0usize;

    'rows: for row in &raw.rows {
        let mut row: Row = row.clone();
        for col in &config.coerce_numeric {
            match coerce_numeric(row.get(col)) {
                Some(v) => row.set(col.as_str(), Value::Number(v)),
                None => {
                    dropped += 1;
                    continue 'rows;
                }
            }
        }

        let label = u8::from(is_positive(row.get(&target.column), &target.positive_label));
        row.set(target.numeric_column.as_str(), Value::Number(f64::from(label)));
        rows.push(row);
        labels.push(label);
    }

    if dropped > 0 {
        log::info!(
            "dropped {dropped} rows with non-numeric {}",
            config.coerce_numeric.join("/")
        );
    }
    if rows.is_empty() {
        return Err(AppError::degenerate("No rows remain after cleaning."));
    }

    let mut columns = raw.columns.clone();
    if !columns.contains(&target.numeric_column) {
        columns.push(target.numeric_column.clone());
    }

    Ok(CleanedData {
        dataset: Dataset::new(columns, rows),
        labels,
        dropped,
    })
}

fn coerce_numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(v) if v.is_finite() => Some(*v),
        Value::Text(s) => parse_number(s).filter(|v| v.is_finite()),
        _ => None,
    }
}

fn is_positive(value: &Value, positive_label: &str) -> bool {
    let raw = match value {
        Value::Text(s) => s.trim().to_string(),
        Value::Number(v) => format!("{v}"),
        Value::Missing => return false,
    };
    raw.to_lowercase() == positive_label.trim().to_lowercase()
}
