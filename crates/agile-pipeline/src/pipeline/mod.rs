//! Pipeline module.
//!
//! This module provides the main inference pipeline and its run summary.

mod runner;

pub use runner::{Pipeline, PipelineBuilder, RunSummary};
