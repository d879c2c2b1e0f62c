//! Gradient-boosted churn classifier and the prediction entry point

use std::fmt;

use ndarray::{arr2, Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::context::ModelContext;
use crate::error::ChurnError;
use crate::features::{CustomerRecord, CATEGORICAL_FIELDS, FEATURE_ORDER};

/// Churn probability at or above this threshold yields the churn label.
const CHURN_THRESHOLD: f64 = 0.5;

/// One node of a decision tree: an internal split or a terminal leaf.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

/// A single regression tree; node 0 is the root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<TreeNode>,
}

impl Tree {
    /// Route one feature row from the root to a leaf value.
    fn score(&self, row: ArrayView1<'_, f64>) -> f64 {
        // Node indices are bounds-checked and forward-only at load time,
        // so traversal always terminates at a leaf.
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                TreeNode::Leaf { value } => return *value,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if row[*feature] < *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    fn validate(&self, n_features: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }
        for (index, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Leaf { value } => {
                    if !value.is_finite() {
                        return Err(format!("leaf {} has a non-finite value", index));
                    }
                }
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature >= n_features {
                        return Err(format!(
                            "node {} splits on feature {} but the model expects {} features",
                            index, feature, n_features
                        ));
                    }
                    if !threshold.is_finite() {
                        return Err(format!("node {} has a non-finite threshold", index));
                    }
                    // Children must point forward so the tree cannot cycle.
                    for child in [*left, *right] {
                        if child <= index || child >= self.nodes.len() {
                            return Err(format!(
                                "node {} has an invalid child index {}",
                                index, child
                            ));
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

/// Pre-fitted boosted-tree binary classifier.
///
/// Each tree contributes a margin term; the summed margin plus `base_score`
/// passes through a sigmoid to give the churn probability. The artifact is
/// fitted elsewhere; this type only evaluates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChurnClassifier {
    /// Input width the ensemble was trained on.
    pub n_features: usize,
    /// Margin-space intercept.
    #[serde(default)]
    pub base_score: f64,
    pub trees: Vec<Tree>,
}

impl ChurnClassifier {
    /// Check internal consistency of a deserialized ensemble.
    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.n_features == 0 {
            return Err("model expects zero features".to_string());
        }
        if self.trees.is_empty() {
            return Err("model has no trees".to_string());
        }
        if !self.base_score.is_finite() {
            return Err("base_score is not finite".to_string());
        }
        for (index, tree) in self.trees.iter().enumerate() {
            tree.validate(self.n_features)
                .map_err(|detail| format!("tree {}: {}", index, detail))?;
        }
        Ok(())
    }

    fn check_width(&self, features: &Array2<f64>) -> Result<(), ChurnError> {
        if features.ncols() != self.n_features {
            return Err(ChurnError::FeatureShape {
                expected: self.n_features,
                actual: features.ncols(),
            });
        }
        Ok(())
    }

    fn margin(&self, row: ArrayView1<'_, f64>) -> f64 {
        self.base_score + self.trees.iter().map(|tree| tree.score(row)).sum::<f64>()
    }

    /// Hard class labels for each row: 1 = churn, 0 = stay.
    pub fn predict(&self, features: &Array2<f64>) -> Result<Array1<u8>, ChurnError> {
        self.check_width(features)?;
        Ok(features
            .rows()
            .into_iter()
            .map(|row| u8::from(sigmoid(self.margin(row)) >= CHURN_THRESHOLD))
            .collect())
    }

    /// Class probabilities for each row as `[P(stay), P(churn)]`.
    pub fn predict_proba(&self, features: &Array2<f64>) -> Result<Array2<f64>, ChurnError> {
        self.check_width(features)?;
        let mut proba = Array2::zeros((features.nrows(), 2));
        for (i, row) in features.rows().into_iter().enumerate() {
            let churn = sigmoid(self.margin(row));
            proba[[i, 0]] = 1.0 - churn;
            proba[[i, 1]] = churn;
        }
        Ok(proba)
    }
}

/// Predicted class for one customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChurnLabel {
    Stay,
    Churn,
}

impl ChurnLabel {
    fn from_class(class: u8) -> Self {
        if class == 1 {
            ChurnLabel::Churn
        } else {
            ChurnLabel::Stay
        }
    }
}

impl fmt::Display for ChurnLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChurnLabel::Stay => write!(f, "STAY"),
            ChurnLabel::Churn => write!(f, "CHURN"),
        }
    }
}

/// Outcome of one inference request. Derived, never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub label: ChurnLabel,
    /// P(churn) in [0, 1].
    pub churn_probability: f64,
}

impl Prediction {
    pub fn stay_probability(&self) -> f64 {
        1.0 - self.churn_probability
    }

    /// Probability of the predicted class.
    pub fn confidence(&self) -> f64 {
        self.churn_probability.max(self.stay_probability())
    }
}

/// Predict churn for one customer record.
///
/// Encodes the record, standardizes the numeric block with the context's
/// scaler, concatenates `[categorical | scaled numeric]` in training order,
/// and evaluates the classifier on the single-row matrix.
///
/// # Arguments
/// * `context` - Loaded scaler and classifier artifacts
/// * `record` - Raw field values for one customer
///
/// # Returns
/// * `Prediction` with the hard label and churn probability
pub fn predict_churn(
    context: &ModelContext,
    record: &CustomerRecord,
) -> Result<Prediction, ChurnError> {
    let encoded = record.encode()?;

    let numeric = arr2(&[encoded.numeric]);
    let scaled = context.scaler().transform(&numeric)?;

    let mut row = [0.0_f64; FEATURE_ORDER.len()];
    row[..CATEGORICAL_FIELDS].copy_from_slice(&encoded.categorical);
    for (slot, value) in row[CATEGORICAL_FIELDS..].iter_mut().zip(scaled.row(0)) {
        *slot = *value;
    }
    let features = arr2(&[row]);

    let classes = context.classifier().predict(&features)?;
    let proba = context.classifier().predict_proba(&features)?;

    let prediction = Prediction {
        label: ChurnLabel::from_class(classes[0]),
        churn_probability: proba[[0, 1]],
    };
    log::debug!(
        "prediction: label={} churn_probability={:.4}",
        prediction.label,
        prediction.churn_probability
    );
    Ok(prediction)
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}
