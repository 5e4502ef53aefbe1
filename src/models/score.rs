//! Reference scorer: artifact + raw row → probability.
//!
//! This is the whole inference contract an external runtime has to reproduce:
//! encode with the embedded spec, take the linear score, apply the saturating
//! sigmoid.

use crate::domain::{FittedModel, Row, Value};
use crate::error::AppError;
use crate::features::encode_row;
use crate::math::{linear_score, sigmoid};

/// `sigmoid(intercept + coef · features)`.
pub fn predict_probability(features: &[f64], model: &FittedModel) -> f64 {
    sigmoid(linear_score(model.weights(), model.intercept(), features))
}

/// Encode `row` with the model's own spec and score it.
pub fn score_row(model: &FittedModel, row: &Row) -> f64 {
    predict_probability(&encode_row(row, model.spec()), model)
}

/// Convert a JSON object into a raw row.
///
/// `null` is missing, numbers stay numeric, strings and booleans become text.
pub fn row_from_json(value: &serde_json::Value) -> Result<Row, AppError> {
    let obj = value
        .as_object()
        .ok_or_else(|| AppError::input("Each row must be a JSON object of column -> value."))?;

    obj.iter()
        .map(|(k, v)| {
            let cell = match v {
                serde_json::Value::Null => Value::Missing,
                serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
                serde_json::Value::String(s) => Value::Text(s.clone()),
                serde_json::Value::Bool(b) => Value::Text(b.to_string()),
                other => {
                    return Err(AppError::input(format!(
                        "Unsupported value for column `{k}`: {other}"
                    )));
                }
            };
            Ok((k.clone(), cell))
        })
        .collect()
}

/// Parse either a single JSON object or an array of objects.
pub fn rows_from_json(text: &str) -> Result<Vec<Row>, AppError> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| AppError::input(format!("Invalid row JSON: {e}")))?;
    match &value {
        serde_json::Value::Array(items) => items.iter().map(row_from_json).collect(),
        _ => Ok(vec![row_from_json(&value)?]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CategoricalColumn, FeatureSpec, LinearFit};

    fn model() -> FittedModel {
        FittedModel::new(
            FeatureSpec {
                numeric_columns: vec!["tenure".into()],
                categorical: vec![CategoricalColumn {
                    name: "Contract".into(),
                    vocabulary: vec!["Month-to-month".into(), "One year".into(), "Two year".into()],
                }],
            },
            LinearFit {
                weights: vec![-0.05, 1.0, -0.5, -1.5],
                intercept: 0.25,
            },
        )
        .unwrap()
    }

    #[test]
    fn scores_known_row() {
        let row = row_from_json(&serde_json::json!({"tenure": 5, "Contract": "One year"})).unwrap();
        let p = score_row(&model(), &row);
        let expected = 1.0 / (1.0 + (-(0.25 - 0.25 - 0.5_f64)).exp());
        assert!((p - expected).abs() < 1e-15);
    }

    #[test]
    fn unseen_category_scores_like_all_zero_block() {
        let m = model();
        let unseen = row_from_json(&serde_json::json!({"tenure": 5, "Contract": "Unknown"})).unwrap();
        let absent = row_from_json(&serde_json::json!({"tenure": 5})).unwrap();
        assert_eq!(score_row(&m, &unseen).to_bits(), score_row(&m, &absent).to_bits());
    }

    #[test]
    fn repeated_scoring_is_stable() {
        let m = model();
        let row = row_from_json(&serde_json::json!({"tenure": "17", "Contract": null})).unwrap();
        let a = score_row(&m, &row);
        let b = score_row(&m, &row);
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn parses_single_object_or_array() {
        assert_eq!(rows_from_json(r#"{"tenure": 1}"#).unwrap().len(), 1);
        assert_eq!(rows_from_json(r#"[{"tenure": 1}, {"tenure": 2}]"#).unwrap().len(), 2);
        assert!(rows_from_json("[1, 2]").is_err());
        assert!(rows_from_json("not json").is_err());
        assert!(rows_from_json(r#"{"tenure": [1]}"#).is_err());
    }
}
