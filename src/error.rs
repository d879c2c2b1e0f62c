//! Error taxonomy for artifact loading, feature encoding, and inference

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the churn prediction pipeline.
///
/// Artifact failures mean no prediction is possible for the session;
/// the remaining variants describe a single rejected request and leave
/// the loaded context usable.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChurnError {
    #[error("model artifact not found: {}", path.display())]
    ArtifactMissing { path: PathBuf },

    #[error("model artifact {} could not be loaded: {detail}", path.display())]
    ArtifactCorrupt { path: PathBuf, detail: String },

    #[error("unrecognized {field} category: '{value}'")]
    UnrecognizedCategory { field: &'static str, value: String },

    #[error("{field} value {value} is outside the supported range [{min}, {max}]")]
    ValueOutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("feature width mismatch: expected {expected} columns, got {actual}")]
    FeatureShape { expected: usize, actual: usize },
}

impl ChurnError {
    /// Whether the error ends the session rather than a single request.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ChurnError::ArtifactMissing { .. } | ChurnError::ArtifactCorrupt { .. }
        )
    }
}
