//! The artifact bundle: everything the inference pipeline needs, loaded once.
//!
//! A bundle is constructed at process start, then treated as immutable,
//! process-wide read-only state — typically wrapped in an `Arc` and shared
//! by reference into every pipeline invocation. Nothing in the bundle is
//! ever mutated during inference.

use crate::encoder::LabelEncoding;
use crate::error::Result;
use crate::model::{Estimator, LinearEstimator};
use crate::scaler::StandardScaler;
use std::path::Path;
use tracing::info;

/// File name of the model artifact inside a bundle directory.
pub const MODEL_FILE: &str = "model.json";
/// File name of the scaler artifact inside a bundle directory.
pub const SCALER_FILE: &str = "scaler.json";
/// File name of the encoder artifact inside a bundle directory.
pub const ENCODER_FILE: &str = "encoder.json";

/// The three collaborator artifacts the pipeline depends on.
pub struct ArtifactBundle {
    model: Box<dyn Estimator>,
    scaler: StandardScaler,
    encoder: LabelEncoding,
}

impl ArtifactBundle {
    /// Load a bundle from a directory containing `model.json`,
    /// `scaler.json`, and `encoder.json`.
    ///
    /// Every blob is validated eagerly; a process that gets a bundle back
    /// holds a coherent set of parameters.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();

        let model = LinearEstimator::load(dir.join(MODEL_FILE))?;
        let scaler = StandardScaler::load(dir.join(SCALER_FILE))?;
        let encoder = LabelEncoding::load(dir.join(ENCODER_FILE))?;

        info!(
            "Loaded artifact bundle from {}: model v{} ({} features), scaler v{}, encoder v{} ({} classes)",
            dir.display(),
            model.version(),
            model.feature_names().len(),
            scaler.version(),
            encoder.version(),
            encoder.len()
        );

        Ok(Self {
            model: Box::new(model),
            scaler,
            encoder,
        })
    }

    /// Assemble a bundle from already-constructed parts.
    ///
    /// This is the dependency-injection seam used by tests and by callers
    /// that manage artifact storage themselves.
    pub fn from_parts(
        model: Box<dyn Estimator>,
        scaler: StandardScaler,
        encoder: LabelEncoding,
    ) -> Self {
        Self {
            model,
            scaler,
            encoder,
        }
    }

    /// The opaque prediction model.
    pub fn model(&self) -> &dyn Estimator {
        self.model.as_ref()
    }

    /// The numeric scaling parameters.
    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    /// The categorical vocabulary.
    pub fn encoder(&self) -> &LabelEncoding {
        &self.encoder
    }
}

impl std::fmt::Debug for ArtifactBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArtifactBundle")
            .field("model_version", &self.model.version())
            .field("scaler_version", &self.scaler.version())
            .field("encoder_version", &self.encoder.version())
            .finish()
    }
}
