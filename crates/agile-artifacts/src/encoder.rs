//! Label-encoding artifact for the categorical domain column.
//!
//! The encoding is a fixed, closed string-to-integer vocabulary established
//! at training time. It is loaded read-only and never extended: a value
//! outside the vocabulary has no code, and callers must treat that as a
//! hard error rather than assigning a placeholder.

use crate::error::{ArtifactError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// On-disk layout of an encoder artifact.
#[derive(Debug, Clone, Deserialize)]
struct LabelEncodingBlob {
    version: String,
    column: String,
    classes: Vec<String>,
}

/// A fixed string-to-integer vocabulary for one categorical column.
///
/// Codes are assigned by position in the `classes` list, matching the
/// ordering the model artifact was trained against.
#[derive(Debug, Clone)]
pub struct LabelEncoding {
    version: String,
    column: String,
    classes: Vec<String>,
    codes: HashMap<String, u32>,
}

impl LabelEncoding {
    /// Build an encoding from an explicit class list.
    ///
    /// Fails if the list is empty or contains duplicates — either would make
    /// the code assignment ambiguous.
    pub fn from_classes(
        version: impl Into<String>,
        column: impl Into<String>,
        classes: Vec<String>,
    ) -> Result<Self> {
        let version = version.into();
        let column = column.into();

        if classes.is_empty() {
            return Err(ArtifactError::MalformedArtifact {
                origin: column,
                reason: "encoder vocabulary is empty".to_string(),
            });
        }

        let mut codes = HashMap::with_capacity(classes.len());
        for (code, class) in classes.iter().enumerate() {
            if codes.insert(class.clone(), code as u32).is_some() {
                return Err(ArtifactError::MalformedArtifact {
                    origin: column,
                    reason: format!("duplicate class '{}' in encoder vocabulary", class),
                });
            }
        }

        Ok(Self {
            version,
            column,
            classes,
            codes,
        })
    }

    /// Parse an encoding from a JSON string.
    pub fn from_json_str(json: &str, origin: &str) -> Result<Self> {
        let blob: LabelEncodingBlob =
            serde_json::from_str(json).map_err(|e| ArtifactError::MalformedArtifact {
                origin: origin.to_string(),
                reason: e.to_string(),
            })?;
        Self::from_classes(blob.version, blob.column, blob.classes)
    }

    /// Load an encoding from a JSON file.
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

    /// Look up the integer code for a value.
    ///
    /// Returns `None` for values outside the trained vocabulary.
    pub fn code_of(&self, value: &str) -> Option<u32> {
        self.codes.get(value).copied()
    }

    /// The column this encoding was fit on.
    pub fn column(&self) -> &str {
        &self.column
    }

    /// The artifact version string.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// The vocabulary, in code order.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Number of classes in the vocabulary.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// True if the vocabulary is empty (never the case for a valid artifact).
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
