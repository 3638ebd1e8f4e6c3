//! Error types for artifact loading and inference.
//!
//! All public API functions in this crate return `Result<T, ArtifactError>`.
//! Artifact blobs are validated eagerly at load time so that a process that
//! starts successfully holds a coherent, usable bundle; inference-time errors
//! are limited to input-shape and input-value problems.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for artifact operations.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new variants
/// in future versions without breaking downstream code.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ArtifactError {
    /// An artifact file does not exist at the expected path.
    #[error("Artifact not found: {path}")]
    ArtifactNotFound {
        /// The path that was not found.
        path: String,
    },

    /// An artifact blob was read but does not satisfy its contract
    /// (unparseable JSON, duplicate classes, zero scale, arity mismatch).
    #[error("Malformed artifact '{origin}': {reason}")]
    MalformedArtifact { origin: String, reason: String },

    /// The feature frame handed to the model does not match the
    /// fixed-order column set the model was trained on.
    #[error("Feature shape mismatch: model expects [{expected}], got [{actual}]")]
    ShapeMismatch { expected: String, actual: String },

    /// A feature value could not be used for inference (null or
    /// non-castable to a number).
    #[error("Invalid feature value in column '{column}': {reason}")]
    InvalidInput { column: String, reason: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON deserialization error wrapper.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),
}

impl ArtifactError {
    /// Get a stable error code for frontend/CLI handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ArtifactNotFound { .. } => "ARTIFACT_NOT_FOUND",
            Self::MalformedArtifact { .. } => "MALFORMED_ARTIFACT",
            Self::ShapeMismatch { .. } => "SHAPE_MISMATCH",
            Self::InvalidInput { .. } => "INVALID_INPUT",
            Self::Io(_) => "IO_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
        }
    }
}

/// Errors are serialized as a struct with `code` and `message` fields,
/// making them easy to surface in a UI or machine-readable report.
impl Serialize for ArtifactError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("ArtifactError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for artifact operations.
pub type Result<T> = std::result::Result<T, ArtifactError>;
