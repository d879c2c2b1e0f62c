//! ChurnForge: customer churn prediction over pre-fitted model artifacts
//!
//! This library loads a fitted standard scaler and a boosted-tree binary
//! classifier, encodes raw customer fields into the fixed training-time
//! feature order, and reports the predicted churn label with its
//! probability.

pub mod cli;
pub mod context;
pub mod error;
pub mod features;
pub mod model;
pub mod scaler;

// Re-export public items for easier access
pub use cli::Args;
pub use context::{ModelContext, MODEL_PATH, SCALER_PATH};
pub use error::ChurnError;
pub use features::{CustomerRecord, EncodedRecord, FEATURE_ORDER};
pub use model::{predict_churn, ChurnClassifier, ChurnLabel, Prediction};
pub use scaler::StandardScaler;

/// Common result type used throughout the application
pub type Result<T> = anyhow::Result<T>;
