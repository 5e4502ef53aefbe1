//! CSV ingest and type inference.
//!
//! This module is responsible for turning raw CSV bytes into a typed
//! [`Dataset`]. It does not apply any cleaning policy.
//!
//! Typing rules:
//! - a cell in the NA set (empty, `NA`, `NaN`, `null`, ...) is missing
//! - a column whose every non-missing cell parses as `f64` is numeric
//! - any other column keeps its non-missing cells as text, untouched
//!
//! Cells are not trimmed here: whitespace-only cells stay text so the cleaning
//! stage can decide what they mean.

use std::io::Read;

use csv::StringRecord;

use crate::domain::{Dataset, Row, Value};
use crate::error::AppError;

/// Cell spellings read as missing.
const NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN", "<NA>", "N/A",
    "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: typed dataset + what was skipped.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub dataset: Dataset,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

/// Parse CSV from any reader.
pub fn read_dataset<R: Read>(reader: R) -> Result<IngestedData, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::None)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::input(format!("Failed to read CSV headers: {e}")))?
        .clone();
    let columns = header_names(&headers)?;

    let mut cells: Vec<Vec<Option<String>>> = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2: records start after the header and lines are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        if record.len() != columns.len() {
            row_errors.push(RowError {
                line,
                message: format!("Expected {} fields, found {}.", columns.len(), record.len()),
            });
            continue;
        }

        cells.push(record.iter().map(parse_cell).collect());
    }

    let numeric: Vec<bool> = (0..columns.len())
        .map(|j| {
            cells
                .iter()
                .filter_map(|r| r[j].as_deref())
                .all(|s| parse_number(s).is_some())
        })
        .collect();

    let rows = cells
        .into_iter()
        .map(|r| {
            r.into_iter()
                .enumerate()
                .map(|(j, cell)| {
                    let value = match cell {
                        None => Value::Missing,
                        Some(s) if numeric[j] => parse_number(&s).map_or(Value::Missing, Value::Number),
                        Some(s) => Value::Text(s),
                    };
                    (columns[j].clone(), value)
                })
                .collect::<Row>()
        })
        .collect();

    Ok(IngestedData {
        dataset: Dataset::new(columns, rows),
        row_errors,
        rows_read,
    })
}

fn header_names(headers: &StringRecord) -> Result<Vec<String>, AppError> {
    let mut names: Vec<String> = Vec::with_capacity(headers.len());
    for name in headers.iter() {
        let name = normalize_header_name(name);
        if name.is_empty() {
            return Err(AppError::input("CSV header contains an empty column name."));
        }
        if names.contains(&name) {
            return Err(AppError::input(format!("Duplicate CSV column: `{name}`")));
        }
        names.push(name);
    }
    if names.is_empty() {
        return Err(AppError::input("CSV has no columns."));
    }
    Ok(names)
}

fn normalize_header_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on the
    // first header. If we don't strip it, the id column would not be found.
    name.trim_start_matches('\u{feff}').trim().to_string()
}

fn parse_cell(raw: &str) -> Option<String> {
    if NA_VALUES.contains(&raw) {
        None
    } else {
        Some(raw.to_string())
    }
}

/// Numeric parse used for column typing; accepts surrounding spaces.
pub(crate) fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok()
}
