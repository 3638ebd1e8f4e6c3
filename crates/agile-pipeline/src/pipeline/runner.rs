//! Main inference pipeline module.
//!
//! This module provides the core [`Pipeline`] struct and builder for
//! orchestrating one estimation run: encode, scale, derive, assemble the
//! model's feature frame, predict, and append the prediction column.
//!
//! # Ordering and strictness
//!
//! The five steps run in a fixed order, short-circuiting on the first
//! failure. Two properties of the trained representation are preserved
//! exactly:
//!
//! - Only `produtividade_estimada` and `story_points_previstos` are scaled,
//!   even though more numeric columns exist — the model was trained on this
//!   specific mixed representation.
//! - The feature frame is assembled in the exact column order the model
//!   artifact declares; any column the working frame cannot supply fails
//!   with a [`FeatureShape`](crate::error::EstimatorError::FeatureShape)
//!   error rather than passing a differently-shaped vector.
//!
//! # All-or-nothing
//!
//! Every step operates on working copies. On failure the caller's frame is
//! untouched and no partial column additions survive; on success a new
//! frame is returned that holds the original upload's columns plus
//! `produtividade_prevista`.

use crate::error::{EstimatorError, Result, ResultExt};
use crate::features::FeatureEngineer;
use crate::schema;
use crate::transform::{CategoryEncoder, StandardScalerAdapter};
use agile_artifacts::{ArtifactBundle, ArtifactError};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

/// The main inference pipeline.
///
/// Use [`Pipeline::builder()`] to create a pipeline over a loaded artifact
/// bundle.
///
/// # Example
///
/// ```rust,ignore
/// use agile_pipeline::Pipeline;
/// use agile_artifacts::ArtifactBundle;
/// use std::sync::Arc;
///
/// let bundle = Arc::new(ArtifactBundle::load("artifacts/")?);
///
/// let pipeline = Pipeline::builder()
///     .artifacts(bundle)
///     .build()?;
///
/// let (predicted, summary) = pipeline.run(&uploaded)?;
/// println!("{} rows estimated in {}ms", summary.rows, summary.duration_ms);
/// ```
pub struct Pipeline {
    artifacts: Arc<ArtifactBundle>,
}

// The pipeline is shared read-only state after construction; sessions on
// different threads may hold references to the same instance.
static_assertions::assert_impl_all!(Pipeline: Send, Sync);

/// Summary of one successful pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Number of rows estimated.
    pub rows: usize,
    /// Total execution time in milliseconds.
    pub duration_ms: u64,
    /// Smallest predicted value.
    pub prediction_min: f64,
    /// Largest predicted value.
    pub prediction_max: f64,
    /// Mean predicted value.
    pub prediction_mean: f64,
    /// Version of the model artifact that produced the predictions.
    pub model_version: String,
}

impl Pipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    /// Run the full estimation pass over `raw`.
    ///
    /// Returns a new frame holding `raw`'s columns plus
    /// `produtividade_prevista`, and a [`RunSummary`]. `raw` itself is
    /// never modified.
    ///
    /// # Errors
    ///
    /// Any step failure aborts the run; the error carries the failing step
    /// as context and the working state is discarded.
    pub fn run(&self, raw: &DataFrame) -> Result<(DataFrame, RunSummary)> {
        match self.run_internal(raw) {
            Ok(result) => {
                info!(
                    "Estimation complete: {} rows in {}ms",
                    result.1.rows, result.1.duration_ms
                );
                Ok(result)
            }
            Err(e) => {
                error!("Estimation failed [{}]: {}", e.error_code(), e);
                Err(e)
            }
        }
    }

    fn run_internal(&self, raw: &DataFrame) -> Result<(DataFrame, RunSummary)> {
        let start_time = Instant::now();

        info!("Starting estimation pipeline ({} rows)...", raw.height());

        // Step 1: encode the domain column with the trained vocabulary.
        let domain_column = self.artifacts.encoder().column().to_string();
        debug!("Step 1: encoding '{}'...", domain_column);
        let working = CategoryEncoder::encode(raw, self.artifacts.encoder(), &domain_column)
            .context("encoding domain labels")?;

        // Step 2: scale the trained column pair, nothing else.
        debug!("Step 2: scaling {:?}...", schema::SCALED_COLUMNS);
        let working =
            StandardScalerAdapter::scale(&working, self.artifacts.scaler(), &schema::SCALED_COLUMNS)
                .context("scaling numeric columns")?;

        // Step 3: derive the sprint feature columns.
        debug!("Step 3: deriving sprint features...");
        let working = FeatureEngineer::derive(&working).context("deriving sprint features")?;

        // Step 4: assemble the feature frame the model contract declares.
        debug!("Step 4: assembling feature frame...");
        let features = self.assemble_features(&working)?;

        // Step 5: predict and append to a copy of the raw upload.
        debug!("Step 5: running model inference...");
        let predictions = self
            .artifacts
            .model()
            .predict_batch(&features)
            .map_err(|e| match e {
                ArtifactError::ShapeMismatch { expected, actual } => {
                    EstimatorError::FeatureShape(format!(
                        "model expects [{}], assembled [{}]",
                        expected, actual
                    ))
                }
                other => EstimatorError::Artifact(other),
            })
            .map_err(|e| e.with_context("running model inference"))?;

        let mut output = raw.clone();
        let predicted = Float64Chunked::from_vec(
            schema::PRODUTIVIDADE_PREVISTA.into(),
            predictions.clone(),
        )
        .into_series();
        output.with_column(predicted)?;

        let summary = Self::summarize(
            &predictions,
            start_time.elapsed().as_millis() as u64,
            self.artifacts.model().version(),
        );

        Ok((output, summary))
    }

    /// Select the model's declared feature columns, in declared order.
    ///
    /// The contract is data owned by the model artifact; a name the working
    /// frame cannot supply is a loud failure, never a silent reshape.
    fn assemble_features(&self, working: &DataFrame) -> Result<DataFrame> {
        let expected = self.artifacts.model().feature_names();
        let available: Vec<&str> = working
            .get_column_names()
            .iter()
            .map(|s| s.as_str())
            .collect();

        let missing: Vec<&str> = expected
            .iter()
            .map(|s| s.as_str())
            .filter(|name| !available.contains(name))
            .collect();
        if !missing.is_empty() {
            return Err(EstimatorError::FeatureShape(format!(
                "model expects column(s) [{}] not present after feature engineering",
                missing.join(", ")
            )));
        }

        working
            .select(expected.iter().map(|s| s.as_str()))
            .map_err(EstimatorError::Polars)
    }

    fn summarize(predictions: &[f64], duration_ms: u64, model_version: &str) -> RunSummary {
        let rows = predictions.len();
        let (min, max, sum) = predictions.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY, 0.0),
            |(min, max, sum), &v| (min.min(v), max.max(v), sum + v),
        );

        RunSummary {
            rows,
            duration_ms,
            prediction_min: if rows == 0 { 0.0 } else { min },
            prediction_max: if rows == 0 { 0.0 } else { max },
            prediction_mean: if rows == 0 { 0.0 } else { sum / rows as f64 },
            model_version: model_version.to_string(),
        }
    }
}

/// Builder for creating a [`Pipeline`] instance.
///
/// Use [`Pipeline::builder()`] to get started.
#[derive(Default)]
pub struct PipelineBuilder {
    artifacts: Option<Arc<ArtifactBundle>>,
}

impl PipelineBuilder {
    /// Set the artifact bundle the pipeline runs against.
    ///
    /// The bundle is shared by `Arc`: load it once at process start and
    /// reuse it across pipelines and sessions.
    pub fn artifacts(mut self, artifacts: Arc<ArtifactBundle>) -> Self {
        self.artifacts = Some(artifacts);
        self
    }

    /// Build the pipeline.
    ///
    /// Fails if no artifact bundle was provided.
    pub fn build(self) -> Result<Pipeline> {
        let artifacts = self.artifacts.ok_or_else(|| {
            EstimatorError::InvalidConfig(
                "no artifact bundle provided to the pipeline builder".to_string(),
            )
        })?;

        Ok(Pipeline { artifacts })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agile_artifacts::{LabelEncoding, LinearEstimator, StandardScaler};
    use pretty_assertions::assert_eq;

    const TOLERANCE: f64 = 1e-9;

    /// Bundle matching the deployed six-column contract, with parameters
    /// simple enough to verify predictions by hand.
    fn test_bundle() -> Arc<ArtifactBundle> {
        let model = LinearEstimator::from_params(
            "test-model",
            schema::COMPACT_FEATURE_SET
                .iter()
                .map(|s| s.to_string())
                .collect(),
            10.0,
            vec![2.0, 1.0, 0.5, 0.1, 0.1, 0.25],
        )
        .unwrap();
        let scaler = StandardScaler::from_params(
            "test-scaler",
            vec![
                (schema::PRODUTIVIDADE_ESTIMADA.to_string(), 40.0, 10.0),
                (schema::STORY_POINTS_PREVISTOS.to_string(), 100.0, 50.0),
            ],
        )
        .unwrap();
        let encoder = LabelEncoding::from_classes(
            "test-encoder",
            schema::TIPO_DOMINIO,
            vec![
                "API".to_string(),
                "Dados".to_string(),
                "Mobile".to_string(),
                "Web".to_string(),
            ],
        )
        .unwrap();

        Arc::new(ArtifactBundle::from_parts(Box::new(model), scaler, encoder))
    }

    fn pipeline() -> Pipeline {
        Pipeline::builder().artifacts(test_bundle()).build().unwrap()
    }

    /// The worked example row: derived values 2.0 / 1.0 / 4.0, scaled
    /// inputs both 0.0, "Web" encoding to 3.
    fn example_frame() -> DataFrame {
        DataFrame::new(vec![
            Series::new(schema::SPRINT_ID.into(), &["Sprint_01"]).into(),
            Series::new(schema::QTD_MEMBROS.into(), &[5i64]).into(),
            Series::new(schema::CARTOES_PREVISTOS.into(), &[20i64]).into(),
            Series::new(schema::PERCENTUAL_BUGS.into(), &[0.1f64]).into(),
            Series::new(schema::PERCENTUAL_RETRABALHO.into(), &[0.05f64]).into(),
            Series::new(schema::TIPO_DOMINIO.into(), &["Web"]).into(),
            Series::new(schema::COMPLEXIDADE_MEDIA.into(), &[3.0f64]).into(),
            Series::new(schema::PRODUTIVIDADE_ESTIMADA.into(), &[40.0f64]).into(),
            Series::new(schema::STORY_POINTS_PREVISTOS.into(), &[100i64]).into(),
        ])
        .unwrap()
    }

    #[test]
    fn test_end_to_end_example_row() {
        let raw = example_frame();
        let (output, summary) = pipeline().run(&raw).unwrap();

        // 10 + 2*0 + 1*3 + 0.5*3.0 + 0.1*2.0 + 0.1*1.0 + 0.25*4.0 = 15.8
        let prediction = output
            .column(schema::PRODUTIVIDADE_PREVISTA)
            .unwrap()
            .as_materialized_series()
            .f64()
            .unwrap()
            .get(0)
            .unwrap();
        assert!((prediction - 15.8).abs() < TOLERANCE);
        assert_eq!(summary.rows, 1);
        assert_eq!(summary.model_version, "test-model");
    }

    #[test]
    fn test_output_keeps_raw_columns() {
        let raw = example_frame();
        let (output, _) = pipeline().run(&raw).unwrap();

        // One appended column; everything else is the raw upload,
        // untransformed: tipo_dominio is still a string, inputs unscaled.
        assert_eq!(output.width(), raw.width() + 1);
        let domain = output
            .column(schema::TIPO_DOMINIO)
            .unwrap()
            .as_materialized_series()
            .str()
            .unwrap()
            .get(0)
            .unwrap()
            .to_string();
        assert_eq!(domain, "Web");
        let estimate = output
            .column(schema::PRODUTIVIDADE_ESTIMADA)
            .unwrap()
            .as_materialized_series()
            .f64()
            .unwrap()
            .get(0)
            .unwrap();
        assert_eq!(estimate, 40.0);
    }

    #[test]
    fn test_raw_frame_never_mutated() {
        let raw = example_frame();
        let width_before = raw.width();

        pipeline().run(&raw).unwrap();

        assert_eq!(raw.width(), width_before);
        assert!(raw.column(schema::PRODUTIVIDADE_PREVISTA).is_err());
    }

    #[test]
    fn test_unknown_domain_aborts_with_context() {
        let raw = example_frame();
        let raw = {
            let mut df = raw.clone();
            df.replace(
                schema::TIPO_DOMINIO,
                Series::new(schema::TIPO_DOMINIO.into(), &["Desktop"]),
            )
            .unwrap();
            df
        };

        let err = pipeline().run(&raw).unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_CATEGORY");
        assert!(err.to_string().contains("encoding domain labels"));
    }

    #[test]
    fn test_zero_members_aborts_with_context() {
        let mut raw = example_frame();
        raw.replace(
            schema::QTD_MEMBROS,
            Series::new(schema::QTD_MEMBROS.into(), &[0i64]),
        )
        .unwrap();

        let err = pipeline().run(&raw).unwrap_err();
        assert_eq!(err.error_code(), "DIVISION_BY_ZERO");
        assert!(err.to_string().contains("deriving sprint features"));
    }

    #[test]
    fn test_feature_shape_error_on_unsupplied_contract_column() {
        // A model declaring a column the pipeline never produces (the
        // upstream deployment once shipped exactly this misspelling).
        let model = LinearEstimator::from_params(
            "bad-contract",
            vec![
                "produtividade_estimativa".to_string(),
                schema::COMPLEXIDADE_MEDIA.to_string(),
            ],
            0.0,
            vec![1.0, 1.0],
        )
        .unwrap();
        let bundle = test_bundle();
        let bundle = ArtifactBundle::from_parts(
            Box::new(model),
            bundle.scaler().clone(),
            bundle.encoder().clone(),
        );
        let pipeline = Pipeline::builder()
            .artifacts(Arc::new(bundle))
            .build()
            .unwrap();

        let err = pipeline.run(&example_frame()).unwrap_err();
        assert_eq!(err.error_code(), "FEATURE_SHAPE");
        assert!(err.to_string().contains("produtividade_estimativa"));
    }

    #[test]
    fn test_missing_raw_column_aborts() {
        let raw = example_frame()
            .drop(schema::PERCENTUAL_BUGS)
            .unwrap();

        let err = pipeline().run(&raw).unwrap_err();
        assert_eq!(err.error_code(), "MISSING_COLUMN");
    }

    #[test]
    fn test_summary_statistics() {
        let raw = {
            let single = example_frame();
            // Stack the example row with a higher-complexity variant.
            let mut second = single.clone();
            second
                .replace(
                    schema::COMPLEXIDADE_MEDIA,
                    Series::new(schema::COMPLEXIDADE_MEDIA.into(), &[5.0f64]),
                )
                .unwrap();
            single.vstack(&second).unwrap()
        };

        let (_, summary) = pipeline().run(&raw).unwrap();
        assert_eq!(summary.rows, 2);
        assert!((summary.prediction_min - 15.8).abs() < TOLERANCE);
        assert!((summary.prediction_max - 16.8).abs() < TOLERANCE);
        assert!((summary.prediction_mean - 16.3).abs() < TOLERANCE);
    }

    #[test]
    fn test_builder_requires_artifacts() {
        let result = Pipeline::builder().build();
        assert!(result.is_err());
    }
}
