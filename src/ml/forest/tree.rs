use serde::{Deserialize, Serialize};

/// Flattened decision-tree node. Children always sit after their parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    Split {
        /// Feature index used for the split.
        feature_index: u16,
        /// `feature <= threshold` goes left.
        threshold: f32,
        left: u32,
        right: u32,
    },
    Leaf {
        /// Class probabilities at this leaf.
        proba: Vec<f32>,
    },
}

/// Single CART tree stored as a node arena rooted at index 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<Node>,
}

impl DecisionTree {
    /// Walk the tree and return the leaf distribution for a feature vector.
    ///
    /// Returns an empty slice only for a malformed tree; [`Self::validate`]
    /// rules that out for loaded models.
    pub fn predict_proba(&self, features: &[f32]) -> &[f32] {
        let mut idx = 0usize;
        while let Some(node) = self.nodes.get(idx) {
            match node {
                Node::Leaf { proba } => return proba,
                Node::Split {
                    feature_index,
                    threshold,
                    left,
                    right,
                } => {
                    let value = features.get(*feature_index as usize).copied().unwrap_or(0.0);
                    let next = (if value <= *threshold { *left } else { *right }) as usize;
                    if next <= idx {
                        break;
                    }
                    idx = next;
                }
            }
        }
        &[]
    }

    /// Longest root-to-leaf path, counted in splits.
    pub fn depth(&self) -> usize {
        let mut depths = vec![0usize; self.nodes.len()];
        let mut max_depth = 0;
        for (idx, node) in self.nodes.iter().enumerate() {
            if let Node::Split { left, right, .. } = node {
                let child_depth = depths[idx] + 1;
                for child in [*left as usize, *right as usize] {
                    if let Some(slot) = depths.get_mut(child) {
                        *slot = child_depth;
                    }
                }
                max_depth = max_depth.max(child_depth);
            }
        }
        max_depth
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| matches!(node, Node::Leaf { .. }))
            .count()
    }

    pub fn validate(&self, n_classes: usize, feature_len: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("Tree has no nodes".to_string());
        }
        for (idx, node) in self.nodes.iter().enumerate() {
            match node {
                Node::Leaf { proba } => {
                    if proba.len() != n_classes {
                        return Err(format!(
                            "Leaf {idx} has {} probabilities but expected {n_classes}",
                            proba.len()
                        ));
                    }
                }
                Node::Split {
                    feature_index,
                    left,
                    right,
                    ..
                } => {
                    if *feature_index as usize >= feature_len {
                        return Err(format!(
                            "Node {idx} splits on feature {feature_index} of {feature_len}"
                        ));
                    }
                    for child in [*left as usize, *right as usize] {
                        if child <= idx || child >= self.nodes.len() {
                            return Err(format!("Node {idx} has invalid child {child}"));
                        }
                    }
                }
            }
        }
        Ok(())
    }
}
