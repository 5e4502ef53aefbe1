//! Portable model artifact.
//!
//! The artifact is the only thing an external scorer needs: the encoding
//! recipe, the weights in encoder order, the intercept, and label semantics.
//! Floats are written by serde_json's shortest round-trip formatter, so every
//! `f64` reads back bit-identical.
//!
//! `categorical_cols` is a JSON object whose key order *is* the one-hot block
//! order, so it is (de)serialized through an order-preserving visitor rather
//! than a hash map.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::domain::{CategoricalColumn, FeatureSpec, FittedModel, LinearFit, Metrics, TargetSpec};
use crate::error::AppError;

pub const LAYOUT_NOTES: &str = "Features are numeric columns followed by one-hot vectors for each categorical column in the order specified.";

/// Model kind tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelType {
    LogisticRegression,
}

/// The serialized artifact (JSON).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub model_type: ModelType,
    pub target: String,
    pub positive_label: String,
    pub numeric_cols: Vec<String>,
    #[serde(with = "ordered_vocabulary")]
    pub categorical_cols: Vec<CategoricalColumn>,
    pub feature_names: Vec<String>,
    pub coef: Vec<f64>,
    pub intercept: f64,
    pub training_metrics: Metrics,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Build the artifact for a fitted model.
pub fn serialize(model: &FittedModel, metrics: &Metrics, target: &TargetSpec) -> Result<ModelArtifact, AppError> {
    if let Some(i) = model.weights().iter().position(|w| !w.is_finite()) {
        return Err(AppError::fit(format!("Refusing to export non-finite coefficient at index {i}.")));
    }
    if !model.intercept().is_finite() {
        return Err(AppError::fit("Refusing to export a non-finite intercept."));
    }
    if !(metrics.auc.is_finite() && metrics.accuracy.is_finite()) {
        return Err(AppError::fit("Refusing to export non-finite training metrics."));
    }

    let spec = model.spec();
    Ok(ModelArtifact {
        model_type: ModelType::LogisticRegression,
        target: target.column.clone(),
        positive_label: target.positive_label.clone(),
        numeric_cols: spec.numeric_columns.clone(),
        categorical_cols: spec.categorical.clone(),
        feature_names: spec.feature_names(),
        coef: model.weights().to_vec(),
        intercept: model.intercept(),
        training_metrics: *metrics,
        notes: Some(LAYOUT_NOTES.to_string()),
    })
}

impl ModelArtifact {
    /// The embedded encoding recipe.
    pub fn spec(&self) -> FeatureSpec {
        FeatureSpec {
            numeric_columns: self.numeric_cols.clone(),
            categorical: self.categorical_cols.clone(),
        }
    }

    /// Check the artifact's internal consistency.
    pub fn validate(&self) -> Result<(), AppError> {
        let spec = self.spec();

        let mut seen = HashSet::new();
        if let Some(dup) = self.numeric_cols.iter().find(|c| !seen.insert(c.as_str())) {
            return Err(AppError::input(format!(
                "Invalid model artifact: numeric column `{dup}` is listed twice."
            )));
        }

        for col in &self.categorical_cols {
            if self.numeric_cols.contains(&col.name) {
                return Err(AppError::input(format!(
                    "Invalid model artifact: column `{}` is both numeric and categorical.",
                    col.name
                )));
            }
            if col.vocabulary.iter().any(|c| c.trim().is_empty()) {
                return Err(AppError::input(format!(
                    "Invalid model artifact: vocabulary of `{}` contains a blank category.",
                    col.name
                )));
            }
            if col.vocabulary.windows(2).any(|w| w[0] >= w[1]) {
                return Err(AppError::input(format!(
                    "Invalid model artifact: vocabulary of `{}` must be sorted without duplicates.",
                    col.name
                )));
            }
        }

        let expected = spec.feature_count();
        if self.coef.len() != expected || self.feature_names.len() != expected {
            return Err(AppError::input(format!(
                "Invalid model artifact: {} coefficients and {} feature names, but the feature spec declares {expected} features.",
                self.coef.len(),
                self.feature_names.len()
            )));
        }
        if self.feature_names != spec.feature_names() {
            return Err(AppError::input(
                "Invalid model artifact: feature_names do not match the encoder layout of numeric_cols/categorical_cols.",
            ));
        }
        if !self.intercept.is_finite() || self.coef.iter().any(|c| !c.is_finite()) {
            return Err(AppError::input("Invalid model artifact: non-finite parameters."));
        }
        Ok(())
    }

    /// Validate and split into `(spec, weights, intercept)`.
    pub fn into_parts(self) -> Result<(FeatureSpec, Vec<f64>, f64), AppError> {
        self.validate()?;
        Ok((self.spec(), self.coef, self.intercept))
    }

    /// Validate and rebuild the fitted model.
    pub fn to_model(&self) -> Result<FittedModel, AppError> {
        self.validate()?;
        FittedModel::new(
            self.spec(),
            LinearFit {
                weights: self.coef.clone(),
                intercept: self.intercept,
            },
        )
    }
}

mod ordered_vocabulary {
    use std::fmt;

    use serde::de::{Error, MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserializer, Serializer};

    use crate::domain::CategoricalColumn;

    pub fn serialize<S: Serializer>(cols: &[CategoricalColumn], serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(cols.len()))?;
        for col in cols {
            map.serialize_entry(&col.name, &col.vocabulary)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<CategoricalColumn>, D::Error> {
        deserializer.deserialize_map(OrderedVisitor)
    }

    struct OrderedVisitor;

    impl<'de> Visitor<'de> for OrderedVisitor {
        type Value = Vec<CategoricalColumn>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of column name to category list")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
            let mut out: Vec<CategoricalColumn> = Vec::with_capacity(access.size_hint().unwrap_or(0));
            while let Some((name, vocabulary)) = access.next_entry::<String, Vec<String>>()? {
                if out.iter().any(|c| c.name == name) {
                    return Err(A::Error::custom(format!("duplicate categorical column `{name}`")));
                }
                out.push(CategoricalColumn { name, vocabulary });
            }
            Ok(out)
        }
    }
}
