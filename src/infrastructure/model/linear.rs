//! Linear regression pipeline loaded from a JSON artifact.
//!
//! The artifact mirrors a standard-scaled numeric block plus a one-hot
//! categorical block feeding a single linear layer:
//!
//! ```json
//! {
//!   "name": "best_salary_regressor",
//!   "intercept": 25000.0,
//!   "numeric": [{ "column": "Age", "mean": 35.0, "scale": 10.0, "weight": 4000.0 }],
//!   "categorical": [{ "column": "Gender", "weights": { "Male": 100.0 } }],
//!   "target": "identity"
//! }
//! ```
//!
//! Categories absent from `weights` contribute nothing.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

use super::SalaryModel;
use crate::domain::error::{AppError, Result};
use crate::domain::table::DataTable;
use crate::infrastructure::artifact_store::{read_artifact, sha256_hex};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumericFeature {
    pub column: String,
    #[serde(default)]
    pub mean: f64,
    #[serde(default = "default_scale")]
    pub scale: f64,
    pub weight: f64,
}

fn default_scale() -> f64 {
    1.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoricalFeature {
    pub column: String,
    #[serde(default)]
    pub weights: HashMap<String, f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetTransform {
    #[default]
    Identity,
    /// Trained on `ln(1 + salary)`
    Log1p,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearPipelineArtifact {
    #[serde(default = "default_name")]
    pub name: String,
    pub intercept: f64,
    #[serde(default)]
    pub numeric: Vec<NumericFeature>,
    #[serde(default)]
    pub categorical: Vec<CategoricalFeature>,
    #[serde(default)]
    pub target: TargetTransform,
}

fn default_name() -> String {
    "salary_regressor".to_string()
}

pub struct LinearPipelineModel {
    artifact: LinearPipelineArtifact,
    fingerprint: Option<String>,
}

impl LinearPipelineModel {
    pub fn new(artifact: LinearPipelineArtifact) -> Result<Self> {
        Self::check(&artifact)?;
        Ok(Self {
            artifact,
            fingerprint: None,
        })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let artifact: LinearPipelineArtifact = serde_json::from_str(json)
            .map_err(|e| AppError::ParseError(format!("Invalid model artifact: {}", e)))?;
        Self::new(artifact)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = read_artifact(path)?;
        let json = std::str::from_utf8(&bytes).map_err(|e| {
            AppError::ParseError(format!(
                "Model artifact {} is not UTF-8: {}",
                path.display(),
                e
            ))
        })?;

        let mut model = Self::from_json(json)?;
        let fingerprint = sha256_hex(&bytes);
        info!(
            model = %model.artifact.name,
            path = %path.display(),
            sha256 = %fingerprint,
            numeric_features = model.artifact.numeric.len(),
            categorical_features = model.artifact.categorical.len(),
            "Loaded salary model"
        );
        model.fingerprint = Some(fingerprint);
        Ok(model)
    }

    pub fn fingerprint(&self) -> Option<&str> {
        self.fingerprint.as_deref()
    }

    fn check(artifact: &LinearPipelineArtifact) -> Result<()> {
        if !artifact.intercept.is_finite() {
            return Err(AppError::ValidationError(
                "model intercept must be finite".to_string(),
            ));
        }
        for feature in &artifact.numeric {
            if feature.scale == 0.0 || !feature.scale.is_finite() {
                return Err(AppError::ValidationError(format!(
                    "numeric feature {} has invalid scale {}",
                    feature.column, feature.scale
                )));
            }
            if !feature.mean.is_finite() || !feature.weight.is_finite() {
                return Err(AppError::ValidationError(format!(
                    "numeric feature {} has non-finite parameters",
                    feature.column
                )));
            }
        }
        Ok(())
    }

    fn feature_index(table: &DataTable, column: &str) -> Result<usize> {
        table.column_index(column).ok_or_else(|| {
            AppError::PredictionError(format!("columns are missing: {{'{}'}}", column))
        })
    }
}

impl SalaryModel for LinearPipelineModel {
    fn name(&self) -> &str {
        &self.artifact.name
    }

    fn predict(&self, table: &DataTable) -> Result<Vec<f64>> {
        let numeric = self
            .artifact
            .numeric
            .iter()
            .map(|f| Self::feature_index(table, &f.column).map(|col| (f, col)))
            .collect::<Result<Vec<_>>>()?;
        let categorical = self
            .artifact
            .categorical
            .iter()
            .map(|f| Self::feature_index(table, &f.column).map(|col| (f, col)))
            .collect::<Result<Vec<_>>>()?;

        let mut predictions = Vec::with_capacity(table.len());
        for (row_idx, row) in table.rows.iter().enumerate() {
            let mut y = self.artifact.intercept;

            for (feature, col) in &numeric {
                let raw = row.get(*col).map(|s| s.trim()).unwrap_or("");
                let value: f64 = raw.parse().map_err(|_| {
                    AppError::PredictionError(format!(
                        "could not convert {:?} to a number in column {} (row {})",
                        raw,
                        feature.column,
                        row_idx + 1
                    ))
                })?;
                y += feature.weight * (value - feature.mean) / feature.scale;
            }

            for (feature, col) in &categorical {
                let raw = row.get(*col).map(String::as_str).unwrap_or("");
                y += feature.weights.get(raw).copied().unwrap_or(0.0);
            }

            let y = match self.artifact.target {
                TargetTransform::Identity => y,
                TargetTransform::Log1p => y.exp_m1(),
            };
            predictions.push(y);
        }

        Ok(predictions)
    }
}
