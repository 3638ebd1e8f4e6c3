//! Artifact Boundary for the Agile Productivity Estimator
//!
//! This crate owns the three pre-trained collaborator artifacts the
//! inference pipeline consumes, each loaded from a versioned, immutable
//! JSON parameter blob at process start:
//!
//! - **Model** ([`Estimator`] / [`LinearEstimator`]): batch prediction over
//!   a fixed-order numeric feature frame, one real number per row.
//! - **Scaler** ([`StandardScaler`]): fixed per-column `(mean, scale)`
//!   pairs for the affine transform `(v - mean) / scale`.
//! - **Encoder** ([`LabelEncoding`]): a closed string-to-integer vocabulary
//!   for the categorical domain column.
//!
//! None of these are trained or fit here — they are consumed as opaque
//! parameter sets with documented shape contracts. [`ArtifactBundle`] loads
//! all three from one directory and is shared read-only across sessions.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use agile_artifacts::ArtifactBundle;
//! use std::sync::Arc;
//!
//! let bundle = Arc::new(ArtifactBundle::load("artifacts/")?);
//!
//! let code = bundle.encoder().code_of("Web");
//! let (mean, scale) = bundle.scaler().params_for("produtividade_estimada").unwrap();
//! let predictions = bundle.model().predict_batch(&feature_frame)?;
//! ```
//!
//! # Validation
//!
//! Blobs are validated eagerly at load: empty or duplicated vocabularies,
//! zero/non-finite scaling parameters, and coefficient arity mismatches are
//! all rejected before the process accepts work, so inference-time failures
//! are limited to input problems.

pub mod bundle;
pub mod encoder;
pub mod error;
pub mod model;
pub mod scaler;

// Re-exports for convenient access
pub use bundle::{ArtifactBundle, ENCODER_FILE, MODEL_FILE, SCALER_FILE};
pub use encoder::LabelEncoding;
pub use error::{ArtifactError, Result as ArtifactResult};
pub use model::{Estimator, LinearEstimator};
pub use scaler::StandardScaler;
