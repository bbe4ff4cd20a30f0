//! Evaluation metrics for classification models.

use super::forest::RandomForestModel;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Confusion matrix for a `K`-class classifier.
pub struct ConfusionMatrix {
    /// Number of classes.
    pub n_classes: usize,
    /// Row-major `KxK` counts (`truth * K + predicted`).
    pub counts: Vec<u32>,
}

impl ConfusionMatrix {
    /// Create an empty `KxK` confusion matrix.
    pub fn new(n_classes: usize) -> Self {
        Self {
            n_classes,
            counts: vec![0; n_classes * n_classes],
        }
    }

    pub fn add(&mut self, truth: usize, predicted: usize) {
        if truth >= self.n_classes || predicted >= self.n_classes {
            return;
        }
        let idx = truth * self.n_classes + predicted;
        self.counts[idx] = self.counts[idx].saturating_add(1);
    }

    pub fn get(&self, truth: usize, predicted: usize) -> u32 {
        self.counts[truth * self.n_classes + predicted]
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| u64::from(c)).sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Precision/recall statistics for a single class.
pub struct PerClassStats {
    /// `TP / (TP + FP)`.
    pub precision: f32,
    /// `TP / (TP + FN)`.
    pub recall: f32,
    /// Total number of true examples for the class.
    pub support: u32,
}

/// Held-out evaluation of a trained classifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub confusion: ConfusionMatrix,
    pub accuracy: f32,
    pub per_class: Vec<PerClassStats>,
}

/// Score `model` on labelled rows.
pub fn evaluate(model: &RandomForestModel, x: &[Vec<f32>], y: &[usize]) -> Evaluation {
    let mut confusion = ConfusionMatrix::new(model.n_classes);
    for (row, &truth) in x.iter().zip(y) {
        confusion.add(truth, model.predict(row));
    }
    Evaluation {
        accuracy: accuracy(&confusion),
        per_class: precision_recall_by_class(&confusion),
        confusion,
    }
}

/// Compute per-class precision and recall from a confusion matrix.
pub fn precision_recall_by_class(cm: &ConfusionMatrix) -> Vec<PerClassStats> {
    (0..cm.n_classes)
        .map(|class_idx| {
            let tp = cm.get(class_idx, class_idx) as f32;
            let support: u32 = (0..cm.n_classes).map(|j| cm.get(class_idx, j)).sum();
            let predicted: u32 = (0..cm.n_classes).map(|i| cm.get(i, class_idx)).sum();
            let fn_ = support as f32 - tp;
            let fp = predicted as f32 - tp;
            PerClassStats {
                precision: if tp + fp == 0.0 { 0.0 } else { tp / (tp + fp) },
                recall: if tp + fn_ == 0.0 { 0.0 } else { tp / (tp + fn_) },
                support,
            }
        })
        .collect()
}

/// Compute overall accuracy from a confusion matrix.
pub fn accuracy(cm: &ConfusionMatrix) -> f32 {
    let total = cm.total();
    if total == 0 {
        return 0.0;
    }
    let correct: u64 = (0..cm.n_classes).map(|k| u64::from(cm.get(k, k))).sum();
    correct as f32 / total as f32
}
