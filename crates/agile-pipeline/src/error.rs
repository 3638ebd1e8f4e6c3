//! Custom error types for the estimation pipeline.
//!
//! This module provides the error hierarchy using `thiserror` for better
//! error handling and context throughout the pipeline.
//!
//! Errors are serializable so they can be handed to a UI or machine-readable
//! report as `{code, message}` pairs. Every failure in one pipeline run is
//! recovered at the run boundary: nothing here is fatal to the process, and
//! nothing is silently defaulted.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the estimation pipeline.
#[derive(Error, Debug)]
pub enum EstimatorError {
    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The uploaded byte stream could not be parsed as delimited tabular text.
    #[error("Failed to load dataset: {0}")]
    DatasetLoad(String),

    /// A required column is absent from the dataset.
    #[error("Column '{0}' not found in dataset")]
    MissingColumn(String),

    /// A row would force a division by zero (zero team size).
    #[error("Division by zero: column '{column}' is zero at row {row}")]
    DivisionByZero { column: String, row: usize },

    /// A categorical value is outside the encoder's trained vocabulary.
    #[error("Unknown category '{value}' in column '{column}'")]
    UnknownCategory { column: String, value: String },

    /// Scaling was requested for a column with no registered parameters.
    #[error("No scaling parameters registered for column '{0}'")]
    UnknownScalerColumn(String),

    /// The assembled feature frame does not match the model's contract.
    #[error("Feature vector mismatch: {0}")]
    FeatureShape(String),

    /// Artifact error wrapper.
    #[error("Artifact error: {0}")]
    Artifact(#[from] agile_artifacts::ArtifactError),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<EstimatorError>,
    },
}

impl EstimatorError {
    /// Add context to an error.
    ///
    /// The pipeline uses this to attach the failing step, so one user-facing
    /// message names both the step and the underlying reason.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        EstimatorError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get a stable error code for frontend/CLI handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::DatasetLoad(_) => "DATASET_LOAD",
            Self::MissingColumn(_) => "MISSING_COLUMN",
            Self::DivisionByZero { .. } => "DIVISION_BY_ZERO",
            Self::UnknownCategory { .. } => "UNKNOWN_CATEGORY",
            Self::UnknownScalerColumn(_) => "UNKNOWN_SCALER_COLUMN",
            Self::FeatureShape(_) => "FEATURE_SHAPE",
            Self::Artifact(_) => "ARTIFACT_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for EstimatorError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("EstimatorError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, EstimatorError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| EstimatorError::Polars(e).with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, agile_artifacts::ArtifactError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| EstimatorError::Artifact(e).with_context(context))
    }
}
