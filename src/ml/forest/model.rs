use serde::{Deserialize, Serialize};

use super::tree::DecisionTree;

/// Classifier artifact format version.
pub const MODEL_FORMAT_VERSION: u32 = 1;

/// Bagged ensemble of CART trees for classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForestModel {
    /// Model format version.
    pub format_version: u32,
    /// Ordered feature names the model was trained on.
    pub feature_names: Vec<String>,
    /// Number of classes; labels are `0..n_classes`.
    pub n_classes: usize,
    pub trees: Vec<DecisionTree>,
}

impl RandomForestModel {
    /// Validate structural invariants of the model.
    pub fn validate(&self) -> Result<(), String> {
        if self.n_classes < 2 {
            return Err("Model must contain at least 2 classes".to_string());
        }
        if self.feature_names.is_empty() {
            return Err("Model has no feature names".to_string());
        }
        if self.trees.is_empty() {
            return Err("Model has no trees".to_string());
        }
        for (tree_idx, tree) in self.trees.iter().enumerate() {
            tree.validate(self.n_classes, self.feature_names.len())
                .map_err(|err| format!("Tree {tree_idx}: {err}"))?;
        }
        Ok(())
    }

    pub fn feature_len(&self) -> usize {
        self.feature_names.len()
    }

    /// Mean of the per-tree leaf distributions.
    pub fn predict_proba(&self, features: &[f32]) -> Vec<f32> {
        let mut sum = vec![0.0f32; self.n_classes];
        for tree in &self.trees {
            for (acc, p) in sum.iter_mut().zip(tree.predict_proba(features)) {
                *acc += p;
            }
        }
        let count = self.trees.len().max(1) as f32;
        for value in &mut sum {
            *value /= count;
        }
        sum
    }

    /// Predict the most probable class label; ties go to the lower label.
    pub fn predict(&self, features: &[f32]) -> usize {
        argmax(&self.predict_proba(features))
    }
}

fn argmax(values: &[f32]) -> usize {
    let mut best_idx = 0usize;
    let mut best_val = f32::NEG_INFINITY;
    for (idx, &v) in values.iter().enumerate() {
        if v > best_val {
            best_val = v;
            best_idx = idx;
        }
    }
    best_idx
}
