//! Artifact loading and the shared model context

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::ChurnError;
use crate::features::{FEATURE_ORDER, NUMERIC_FIELDS};
use crate::model::ChurnClassifier;
use crate::scaler::StandardScaler;

/// Default path of the fitted scaler artifact.
pub const SCALER_PATH: &str = "scaler.json";

/// Default path of the fitted classifier artifact.
pub const MODEL_PATH: &str = "churn_model.json";

/// The two loaded artifacts, constructed once at process start and passed
/// by reference to every prediction. Immutable after construction, so
/// sharing across threads needs no locking.
#[derive(Debug, Clone)]
pub struct ModelContext {
    scaler: StandardScaler,
    classifier: ChurnClassifier,
}

impl ModelContext {
    /// Load and validate both artifacts from disk.
    ///
    /// Fails soft: a missing or unreadable file becomes a `ChurnError`
    /// instead of a panic, and no partially-initialized context is ever
    /// produced. If this returns an error, no inference is possible for
    /// the session.
    pub fn load(scaler_path: &Path, model_path: &Path) -> Result<Self, ChurnError> {
        let scaler: StandardScaler = load_artifact(scaler_path)?;
        scaler
            .validate(NUMERIC_FIELDS)
            .map_err(|detail| ChurnError::ArtifactCorrupt {
                path: scaler_path.to_path_buf(),
                detail,
            })?;

        let classifier: ChurnClassifier = load_artifact(model_path)?;
        classifier
            .validate()
            .map_err(|detail| ChurnError::ArtifactCorrupt {
                path: model_path.to_path_buf(),
                detail,
            })?;

        log::debug!(
            "artifacts loaded: scaler width {}, classifier width {}, {} trees",
            scaler.n_features(),
            classifier.n_features,
            classifier.trees.len()
        );
        Self::from_parts(scaler, classifier)
    }

    /// Assemble a context from already-deserialized artifacts, checking
    /// their widths against the training-time feature order. Lets tests
    /// inject fake artifacts without touching the filesystem.
    pub fn from_parts(
        scaler: StandardScaler,
        classifier: ChurnClassifier,
    ) -> Result<Self, ChurnError> {
        if scaler.n_features() != NUMERIC_FIELDS {
            return Err(ChurnError::FeatureShape {
                expected: NUMERIC_FIELDS,
                actual: scaler.n_features(),
            });
        }
        if classifier.n_features != FEATURE_ORDER.len() {
            return Err(ChurnError::FeatureShape {
                expected: FEATURE_ORDER.len(),
                actual: classifier.n_features,
            });
        }
        Ok(Self { scaler, classifier })
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    pub fn classifier(&self) -> &ChurnClassifier {
        &self.classifier
    }
}

/// Read and deserialize one artifact file.
fn load_artifact<T: DeserializeOwned>(path: &Path) -> Result<T, ChurnError> {
    if !path.exists() {
        return Err(ChurnError::ArtifactMissing {
            path: path.to_path_buf(),
        });
    }
    let bytes = fs::read(path).map_err(|err| ChurnError::ArtifactCorrupt {
        path: path.to_path_buf(),
        detail: err.to_string(),
    })?;
    serde_json::from_slice(&bytes).map_err(|err| ChurnError::ArtifactCorrupt {
        path: path.to_path_buf(),
        detail: err.to_string(),
    })
}
