//! Fitted standard-scaling transform loaded from a persisted artifact

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::ChurnError;

/// Per-feature standardization parameters learned at training time.
///
/// `transform` applies `(x - mean) / scale` column-wise. The parameters are
/// fixed once fitted; this type never refits them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl StandardScaler {
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Self {
        Self { mean, scale }
    }

    /// Number of feature columns the scaler was fitted on.
    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    /// Check internal consistency of deserialized parameters.
    pub(crate) fn validate(&self, expected_width: usize) -> Result<(), String> {
        if self.mean.len() != self.scale.len() {
            return Err(format!(
                "scaler has {} means but {} scales",
                self.mean.len(),
                self.scale.len()
            ));
        }
        if self.mean.len() != expected_width {
            return Err(format!(
                "scaler covers {} features, expected {}",
                self.mean.len(),
                expected_width
            ));
        }
        if self.mean.iter().any(|m| !m.is_finite()) {
            return Err("scaler mean contains a non-finite value".to_string());
        }
        if self.scale.iter().any(|s| !s.is_finite() || *s <= 0.0) {
            return Err("scaler scale entries must be finite and positive".to_string());
        }
        Ok(())
    }

    /// Standardize each column of an `(n, width)` matrix.
    pub fn transform(&self, features: &Array2<f64>) -> Result<Array2<f64>, ChurnError> {
        if features.ncols() != self.mean.len() {
            return Err(ChurnError::FeatureShape {
                expected: self.mean.len(),
                actual: features.ncols(),
            });
        }

        let mut scaled = features.clone();
        for (j, mut column) in scaled.columns_mut().into_iter().enumerate() {
            let (mean, scale) = (self.mean[j], self.scale[j]);
            column.mapv_inplace(|x| (x - mean) / scale);
        }
        Ok(scaled)
    }
}
