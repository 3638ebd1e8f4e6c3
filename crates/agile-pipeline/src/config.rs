//! Configuration for the estimation pipeline.
//!
//! The single-load-at-startup artifact pattern becomes an explicit immutable
//! configuration object: constructed once, validated, and passed by
//! reference into every pipeline invocation. There are no ambient globals.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default row cap for chart-bound samples.
pub const DEFAULT_CHART_ROW_CAP: usize = 500;
/// Default seed for the deterministic chart sample.
pub const DEFAULT_CHART_SAMPLE_SEED: u64 = 42;

/// Configuration for one estimator process.
///
/// Use [`EstimatorConfig::builder()`] for fluent construction.
///
/// # Example
///
/// ```rust,ignore
/// use agile_pipeline::config::EstimatorConfig;
///
/// let config = EstimatorConfig::builder()
///     .artifact_dir("artifacts/")
///     .chart_row_cap(500)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimatorConfig {
    /// Directory holding `model.json`, `scaler.json`, and `encoder.json`.
    /// Default: "artifacts"
    pub artifact_dir: PathBuf,

    /// Maximum number of rows handed to chart rendering. Filtered sets
    /// larger than this are down-sampled to exactly this many rows; the
    /// reported filtered count is never affected.
    /// Default: 500
    pub chart_row_cap: usize,

    /// Seed for the chart down-sampling, making the sample deterministic
    /// across runs over the same data.
    /// Default: 42
    pub chart_sample_seed: u64,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            artifact_dir: PathBuf::from("artifacts"),
            chart_row_cap: DEFAULT_CHART_ROW_CAP,
            chart_sample_seed: DEFAULT_CHART_SAMPLE_SEED,
        }
    }
}

impl EstimatorConfig {
    /// Create a new configuration builder.
    pub fn builder() -> EstimatorConfigBuilder {
        EstimatorConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.chart_row_cap == 0 {
            return Err(ConfigValidationError::InvalidChartRowCap(
                self.chart_row_cap,
            ));
        }
        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid chart row cap: {0} (must be at least 1)")]
    InvalidChartRowCap(usize),
}

/// Builder for [`EstimatorConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct EstimatorConfigBuilder {
    artifact_dir: Option<PathBuf>,
    chart_row_cap: Option<usize>,
    chart_sample_seed: Option<u64>,
}

impl EstimatorConfigBuilder {
    /// Set the artifact bundle directory.
    pub fn artifact_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.artifact_dir = Some(dir.into());
        self
    }

    /// Set the chart row cap.
    pub fn chart_row_cap(mut self, cap: usize) -> Self {
        self.chart_row_cap = Some(cap);
        self
    }

    /// Set the chart sampling seed.
    pub fn chart_sample_seed(mut self, seed: u64) -> Self {
        self.chart_sample_seed = Some(seed);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `EstimatorConfig` or an error if validation fails.
    pub fn build(self) -> Result<EstimatorConfig, ConfigValidationError> {
        let config = EstimatorConfig {
            artifact_dir: self
                .artifact_dir
                .unwrap_or_else(|| PathBuf::from("artifacts")),
            chart_row_cap: self.chart_row_cap.unwrap_or(DEFAULT_CHART_ROW_CAP),
            chart_sample_seed: self.chart_sample_seed.unwrap_or(DEFAULT_CHART_SAMPLE_SEED),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EstimatorConfig::default();
        assert_eq!(config.chart_row_cap, 500);
        assert_eq!(config.chart_sample_seed, 42);
        assert_eq!(config.artifact_dir, PathBuf::from("artifacts"));
    }

    #[test]
    fn test_builder_defaults() {
        let config = EstimatorConfig::builder().build().unwrap();
        assert_eq!(config.chart_row_cap, 500);
    }

    #[test]
    fn test_builder_custom_values() {
        let config = EstimatorConfig::builder()
            .artifact_dir("/opt/models")
            .chart_row_cap(100)
            .chart_sample_seed(7)
            .build()
            .unwrap();

        assert_eq!(config.artifact_dir, PathBuf::from("/opt/models"));
        assert_eq!(config.chart_row_cap, 100);
        assert_eq!(config.chart_sample_seed, 7);
    }

    #[test]
    fn test_validation_zero_cap() {
        let result = EstimatorConfig::builder().chart_row_cap(0).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidChartRowCap(0)
        ));
    }

    #[test]
    fn test_config_serialization() {
        let config = EstimatorConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: EstimatorConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config.chart_row_cap, deserialized.chart_row_cap);
        assert_eq!(config.chart_sample_seed, deserialized.chart_sample_seed);
    }
}
