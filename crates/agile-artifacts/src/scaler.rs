//! Standard-scaling artifact: fixed per-column `(mean, scale)` pairs.
//!
//! The parameters were computed at training time over the training
//! distribution. Scaling at inference applies the same affine transform
//! `(v - mean) / scale`; this crate only owns the parameters, the actual
//! column transform lives with the pipeline's scaler adapter.

use crate::error::{ArtifactError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// One column's scaling parameters, as stored on disk.
#[derive(Debug, Clone, Deserialize)]
struct ColumnScaleBlob {
    name: String,
    mean: f64,
    scale: f64,
}

/// On-disk layout of a scaler artifact.
#[derive(Debug, Clone, Deserialize)]
struct StandardScalerBlob {
    version: String,
    columns: Vec<ColumnScaleBlob>,
}

/// Fixed mean/scale parameters for a set of numeric columns.
#[derive(Debug, Clone)]
pub struct StandardScaler {
    version: String,
    columns: Vec<String>,
    params: HashMap<String, (f64, f64)>,
}

impl StandardScaler {
    /// Build a scaler from explicit `(column, mean, scale)` triples.
    ///
    /// A zero or non-finite `scale` would turn the affine transform into a
    /// division by zero (or propagate NaN into every downstream value), so
    /// such parameters are rejected here rather than detected mid-inference.
    pub fn from_params(
        version: impl Into<String>,
        triples: Vec<(String, f64, f64)>,
    ) -> Result<Self> {
        let version = version.into();
        let mut columns = Vec::with_capacity(triples.len());
        let mut params = HashMap::with_capacity(triples.len());

        for (name, mean, scale) in triples {
            if !mean.is_finite() || !scale.is_finite() {
                return Err(ArtifactError::MalformedArtifact {
                    origin: name,
                    reason: "scaling parameters must be finite".to_string(),
                });
            }
            if scale == 0.0 {
                return Err(ArtifactError::MalformedArtifact {
                    origin: name,
                    reason: "scale must be non-zero".to_string(),
                });
            }
            if params.insert(name.clone(), (mean, scale)).is_some() {
                return Err(ArtifactError::MalformedArtifact {
                    origin: name,
                    reason: "duplicate column in scaler artifact".to_string(),
                });
            }
            columns.push(name);
        }

        Ok(Self {
            version,
            columns,
            params,
        })
    }

    /// Parse a scaler from a JSON string.
    pub fn from_json_str(json: &str, origin: &str) -> Result<Self> {
        let blob: StandardScalerBlob =
            serde_json::from_str(json).map_err(|e| ArtifactError::MalformedArtifact {
                origin: origin.to_string(),
                reason: e.to_string(),
            })?;
        Self::from_params(
            blob.version,
            blob.columns
                .into_iter()
                .map(|c| (c.name, c.mean, c.scale))
                .collect(),
        )
    }

    /// Load a scaler from a JSON file.
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

    /// Look up `(mean, scale)` for a column.
    ///
    /// Returns `None` for columns the scaler was not fit on.
    pub fn params_for(&self, column: &str) -> Option<(f64, f64)> {
        self.params.get(column).copied()
    }

    /// The artifact version string.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// The registered column names, in artifact order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }
}
