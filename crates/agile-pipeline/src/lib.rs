//! Agile Sprint Productivity Estimation Pipeline
//!
//! A Polars-based feature-engineering and inference pipeline for estimating
//! agile team productivity from sprint history tables.
//!
//! # Overview
//!
//! The pipeline turns an uploaded sprint CSV into a predicted table in one
//! strictly ordered, all-or-nothing pass:
//!
//! - **Loading**: parse the CSV byte stream into a DataFrame ([`loader`])
//! - **Encoding**: map the domain category through the trained closed
//!   vocabulary ([`transform::CategoryEncoder`])
//! - **Scaling**: standardize exactly the trained column pair
//!   ([`transform::StandardScalerAdapter`])
//! - **Feature engineering**: derive bug, rework, and per-member load
//!   columns ([`features::FeatureEngineer`])
//! - **Inference**: assemble the model's declared feature frame and append
//!   `produtividade_prevista` ([`pipeline::Pipeline`])
//! - **Filtering**: conjunctive range/domain/sprint filters with a
//!   deterministic chart-bound sample ([`filter::FilterEngine`])
//!
//! The trained model, scaler, and encoder are opaque collaborators loaded
//! once from versioned parameter blobs by the `agile-artifacts` crate and
//! shared read-only across sessions.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use agile_artifacts::ArtifactBundle;
//! use agile_pipeline::{loader, EstimatorConfig, FilterEngine, FilterSpec, Pipeline, Session};
//! use std::sync::Arc;
//!
//! let config = EstimatorConfig::builder()
//!     .artifact_dir("artifacts/")
//!     .build()?;
//! let bundle = Arc::new(ArtifactBundle::load(&config.artifact_dir)?);
//!
//! let upload = loader::load_csv_path("sprints.csv")?;
//! let mut session = Session::new(upload);
//!
//! let pipeline = Pipeline::builder().artifacts(bundle).build()?;
//! let summary = session.estimate(&pipeline)?;
//! println!("Estimated {} sprints", summary.rows);
//!
//! let spec = FilterSpec::matching_all(session.working())?;
//! let view = FilterEngine::new(&config).apply(session.working(), &spec)?;
//! println!("{} records after filters", view.total_matching);
//! ```
//!
//! # Failure semantics
//!
//! Any step failure aborts the whole run and surfaces one
//! [`EstimatorError`] naming the failing step and reason; the session's
//! working table is left unchanged. A failed run never prevents a
//! subsequent upload or run in the same process.

pub mod config;
pub mod error;
pub mod features;
pub mod filter;
pub mod loader;
pub mod pipeline;
pub mod schema;
pub mod session;
pub mod synth;
pub mod transform;

// Re-exports for convenient access
pub use config::{ConfigValidationError, EstimatorConfig, EstimatorConfigBuilder};
pub use error::{EstimatorError, Result as EstimatorResult, ResultExt};
pub use features::FeatureEngineer;
pub use filter::{FilterEngine, FilterSpec, FilteredView};
pub use pipeline::{Pipeline, PipelineBuilder, RunSummary};
pub use session::Session;
pub use transform::{CategoryEncoder, StandardScalerAdapter};
