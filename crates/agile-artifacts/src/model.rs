//! Trained model wrapper for batch inference.
//!
//! The regression model is an opaque collaborator: this crate never trains
//! anything, it only loads pre-computed parameters and evaluates them. The
//! [`Estimator`] trait is the capability interface the pipeline depends on:
//!
//! - **Feature contract** via [`feature_names()`](Estimator::feature_names):
//!   the exact, ordered column set the model consumes. The contract is data,
//!   declared by the artifact, not hard-coded in the pipeline.
//! - **Batch prediction** via [`predict_batch()`](Estimator::predict_batch):
//!   one real number per input row.
//!
//! # Shape strictness
//!
//! A frame whose columns differ from the declared contract in name, order,
//! or count is rejected with [`ArtifactError::ShapeMismatch`]. The model was
//! trained on a fixed-width, fixed-order vector; silently accepting a
//! reshaped frame would produce confidently wrong predictions.
//!
//! # Example
//!
//! ```rust,ignore
//! use agile_artifacts::{Estimator, LinearEstimator};
//!
//! let model = LinearEstimator::load("artifacts/model.json")?;
//! let predictions = model.predict_batch(&feature_frame)?;
//! assert_eq!(predictions.len(), feature_frame.height());
//! ```

use crate::error::{ArtifactError, Result};
use polars::prelude::*;
use serde::Deserialize;
use std::path::Path;

/// Capability interface for the opaque productivity model.
///
/// Implementations must be `Send + Sync`: the loaded model is process-wide
/// read-only state, shared across sessions after initialization.
pub trait Estimator: Send + Sync {
    /// The exact, ordered feature columns this model consumes.
    fn feature_names(&self) -> &[String];

    /// Predict one value per row of `features`.
    ///
    /// # Errors
    ///
    /// - [`ArtifactError::ShapeMismatch`] if the frame's columns do not
    ///   match [`feature_names()`](Self::feature_names) exactly, in order.
    /// - [`ArtifactError::InvalidInput`] if a feature value is null or not
    ///   castable to a number.
    fn predict_batch(&self, features: &DataFrame) -> Result<Vec<f64>>;

    /// The artifact version string.
    fn version(&self) -> &str;
}

/// On-disk layout of a linear model artifact.
#[derive(Debug, Clone, Deserialize)]
struct LinearEstimatorBlob {
    version: String,
    feature_names: Vec<String>,
    intercept: f64,
    coefficients: Vec<f64>,
}

/// The deployed regression model: a linear form over the feature vector.
///
/// `prediction = intercept + sum(coefficients[j] * features[j])`, evaluated
/// per row. Coefficients are positional against `feature_names`, which is
/// why the feature contract is order-sensitive.
#[derive(Debug, Clone)]
pub struct LinearEstimator {
    version: String,
    feature_names: Vec<String>,
    intercept: f64,
    coefficients: Vec<f64>,
}

impl LinearEstimator {
    /// Build an estimator from explicit parameters.
    ///
    /// Fails if the coefficient count does not match the feature count, if
    /// the feature list is empty, or if any parameter is non-finite.
    pub fn from_params(
        version: impl Into<String>,
        feature_names: Vec<String>,
        intercept: f64,
        coefficients: Vec<f64>,
    ) -> Result<Self> {
        let version = version.into();

        if feature_names.is_empty() {
            return Err(ArtifactError::MalformedArtifact {
                origin: version,
                reason: "model declares no features".to_string(),
            });
        }
        if feature_names.len() != coefficients.len() {
            return Err(ArtifactError::MalformedArtifact {
                origin: version,
                reason: format!(
                    "{} feature names but {} coefficients",
                    feature_names.len(),
                    coefficients.len()
                ),
            });
        }
        if !intercept.is_finite() || coefficients.iter().any(|c| !c.is_finite()) {
            return Err(ArtifactError::MalformedArtifact {
                origin: version,
                reason: "model parameters must be finite".to_string(),
            });
        }

        Ok(Self {
            version,
            feature_names,
            intercept,
            coefficients,
        })
    }

    /// Parse a model from a JSON string.
    pub fn from_json_str(json: &str, origin: &str) -> Result<Self> {
        let blob: LinearEstimatorBlob =
            serde_json::from_str(json).map_err(|e| ArtifactError::MalformedArtifact {
                origin: origin.to_string(),
                reason: e.to_string(),
            })?;
        Self::from_params(
            blob.version,
            blob.feature_names,
            blob.intercept,
            blob.coefficients,
        )
    }

    /// Load a model from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ArtifactError::ArtifactNotFound {
                path: path.display().to_string(),
            });
        }
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json, &path.display().to_string())
    }

    /// Verify the frame's columns match the declared contract exactly.
    fn check_shape(&self, features: &DataFrame) -> Result<()> {
        let actual: Vec<&str> = features
            .get_column_names()
            .iter()
            .map(|s| s.as_str())
            .collect();
        let expected: Vec<&str> = self.feature_names.iter().map(|s| s.as_str()).collect();

        if actual != expected {
            return Err(ArtifactError::ShapeMismatch {
                expected: expected.join(", "),
                actual: actual.join(", "),
            });
        }
        Ok(())
    }
}

impl Estimator for LinearEstimator {
    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn predict_batch(&self, features: &DataFrame) -> Result<Vec<f64>> {
        self.check_shape(features)?;

        let height = features.height();
        let mut predictions = vec![self.intercept; height];

        for (name, coefficient) in self.feature_names.iter().zip(&self.coefficients) {
            let series = features
                .column(name)?
                .as_materialized_series()
                .cast(&DataType::Float64)
                .map_err(|e| ArtifactError::InvalidInput {
                    column: name.clone(),
                    reason: e.to_string(),
                })?;
            let values = series.f64()?;

            for (row, value) in values.into_iter().enumerate() {
                let value = value.ok_or_else(|| ArtifactError::InvalidInput {
                    column: name.clone(),
                    reason: format!("null value at row {}", row),
                })?;
                predictions[row] += coefficient * value;
            }
        }

        Ok(predictions)
    }

    fn version(&self) -> &str {
        &self.version
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn two_feature_model() -> LinearEstimator {
        LinearEstimator::from_params(
            "1.0.0",
            vec!["a".to_string(), "b".to_string()],
            10.0,
            vec![2.0, -1.0],
        )
        .unwrap()
    }

    fn frame(a: &[f64], b: &[f64]) -> DataFrame {
        DataFrame::new(vec![
            Series::new("a".into(), a).into(),
            Series::new("b".into(), b).into(),
        ])
        .unwrap()
    }

    #[test]
    fn test_predict_batch_linear_form() {
        let model = two_feature_model();
        let df = frame(&[1.0, 2.0], &[3.0, 0.0]);

        let predictions = model.predict_batch(&df).unwrap();
        // 10 + 2*1 - 3 = 9; 10 + 2*2 - 0 = 14
        assert_eq!(predictions, vec![9.0, 14.0]);
    }

    #[test]
    fn test_predict_batch_integer_columns_cast() {
        let model = two_feature_model();
        let df = DataFrame::new(vec![
            Series::new("a".into(), &[1i64, 2]).into(),
            Series::new("b".into(), &[3i64, 0]).into(),
        ])
        .unwrap();

        let predictions = model.predict_batch(&df).unwrap();
        assert_eq!(predictions, vec![9.0, 14.0]);
    }

    #[test]
    fn test_predict_batch_wrong_column_order() {
        let model = two_feature_model();
        let df = DataFrame::new(vec![
            Series::new("b".into(), &[3.0]).into(),
            Series::new("a".into(), &[1.0]).into(),
        ])
        .unwrap();

        let result = model.predict_batch(&df);
        assert!(matches!(
            result.unwrap_err(),
            ArtifactError::ShapeMismatch { .. }
        ));
    }

    #[test]
    fn test_predict_batch_missing_column() {
        let model = two_feature_model();
        let df = DataFrame::new(vec![Series::new("a".into(), &[1.0]).into()]).unwrap();

        let result = model.predict_batch(&df);
        assert!(matches!(
            result.unwrap_err(),
            ArtifactError::ShapeMismatch { .. }
        ));
    }

    #[test]
    fn test_predict_batch_null_value() {
        let model = two_feature_model();
        let df = DataFrame::new(vec![
            Series::new("a".into(), &[Some(1.0), None]).into(),
            Series::new("b".into(), &[Some(3.0), Some(4.0)]).into(),
        ])
        .unwrap();

        let result = model.predict_batch(&df);
        assert!(matches!(
            result.unwrap_err(),
            ArtifactError::InvalidInput { .. }
        ));
    }

    #[test]
    fn test_arity_mismatch_rejected_at_load() {
        let result = LinearEstimator::from_params(
            "1.0.0",
            vec!["a".to_string(), "b".to_string()],
            0.0,
            vec![1.0],
        );
        assert!(matches!(
            result.unwrap_err(),
            ArtifactError::MalformedArtifact { .. }
        ));
    }

    #[test]
    fn test_empty_feature_list_rejected() {
        let result = LinearEstimator::from_params("1.0.0", vec![], 0.0, vec![]);
        assert!(result.is_err());
    }

    #[test]
    fn test_from_json_str() {
        let json = r#"{
            "version": "2024.1",
            "feature_names": ["produtividade_estimada", "tipo_dominio"],
            "intercept": 5.5,
            "coefficients": [1.2, -0.3]
        }"#;
        let model = LinearEstimator::from_json_str(json, "<inline>").unwrap();
        assert_eq!(model.version(), "2024.1");
        assert_eq!(model.feature_names().len(), 2);
    }
}
