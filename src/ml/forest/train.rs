use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use super::model::{MODEL_FORMAT_VERSION, RandomForestModel};
use super::tree::{DecisionTree, Node};

/// Training hyperparameters for the forest.
#[derive(Debug, Clone, PartialEq)]
pub struct ForestOptions {
    /// Number of trees in the ensemble.
    pub trees: usize,
    /// Maximum tree depth; `None` grows until leaves are pure.
    pub max_depth: Option<usize>,
    /// Minimum samples a node needs before it may split.
    pub min_samples_split: usize,
    /// Minimum samples on each side of a split.
    pub min_samples_leaf: usize,
    /// Features considered per split; `None` uses `ceil(sqrt(n_features))`.
    pub max_features: Option<usize>,
    /// Draw a bootstrap sample per tree.
    pub bootstrap: bool,
    /// Weight samples inversely to their class frequency.
    pub balance_classes: bool,
    pub seed: u64,
}

impl Default for ForestOptions {
    fn default() -> Self {
        Self {
            trees: 100,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
            bootstrap: true,
            balance_classes: true,
            seed: 42,
        }
    }
}

/// In-memory dataset used for training and evaluation.
#[derive(Debug, Clone)]
pub struct TrainDataset {
    /// Ordered feature names; every row has this many values.
    pub feature_names: Vec<String>,
    pub n_classes: usize,
    /// Feature matrix, row-major.
    pub x: Vec<Vec<f32>>,
    /// Class labels aligned with `x`.
    pub y: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrainError {
    #[error("Empty training set")]
    Empty,
    #[error("Mismatched training inputs/labels ({rows} rows, {labels} labels)")]
    MismatchedLengths { rows: usize, labels: usize },
    #[error("Row {row} has {actual} features but expected {expected}")]
    RowLength {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("Need at least 2 distinct classes in the training rows, got {0}")]
    TooFewClasses(usize),
    #[error("Label {label} on row {row} is outside 0..{n_classes}")]
    LabelOutOfRange {
        row: usize,
        label: usize,
        n_classes: usize,
    },
    #[error("Invalid forest options: {0}")]
    InvalidOptions(String),
}

/// Train a random-forest classifier with bagging and Gini splits.
pub fn train_random_forest(
    dataset: &TrainDataset,
    options: &ForestOptions,
) -> Result<RandomForestModel, TrainError> {
    validate_inputs(dataset, options)?;
    let n = dataset.x.len();
    let n_features = dataset.feature_names.len();
    let max_features = options
        .max_features
        .unwrap_or_else(|| default_max_features(n_features))
        .clamp(1, n_features);
    let weights = class_weights(&dataset.y, dataset.n_classes, options.balance_classes);

    let mut rng = StdRng::seed_from_u64(options.seed);
    let mut trees = Vec::with_capacity(options.trees);
    for _ in 0..options.trees {
        let mut tree_rng = StdRng::seed_from_u64(rng.random::<u64>());
        let samples = draw_samples(n, options.bootstrap, &mut tree_rng, &dataset.y, &weights);
        let mut builder = TreeBuilder {
            x: &dataset.x,
            y: &dataset.y,
            n_classes: dataset.n_classes,
            n_features,
            max_features,
            options,
            rng: tree_rng,
            nodes: Vec::new(),
        };
        builder.grow(samples, 0);
        trees.push(DecisionTree {
            nodes: builder.nodes,
        });
    }

    Ok(RandomForestModel {
        format_version: MODEL_FORMAT_VERSION,
        feature_names: dataset.feature_names.clone(),
        n_classes: dataset.n_classes,
        trees,
    })
}

/// Per-class sample weights; balanced weights are `n / (k * count_c)`.
pub fn class_weights(y: &[usize], n_classes: usize, balance: bool) -> Vec<f64> {
    if !balance {
        return vec![1.0; n_classes];
    }
    let mut counts = vec![0f64; n_classes];
    for &label in y {
        if label < n_classes {
            counts[label] += 1.0;
        }
    }
    let total: f64 = counts.iter().sum();
    let present = counts.iter().filter(|&&count| count > 0.0).count() as f64;
    counts
        .into_iter()
        .map(|count| {
            if count == 0.0 {
                0.0
            } else {
                total / (present * count)
            }
        })
        .collect()
}

fn default_max_features(n_features: usize) -> usize {
    ((n_features as f64).sqrt().ceil() as usize).max(1)
}

fn validate_inputs(dataset: &TrainDataset, options: &ForestOptions) -> Result<(), TrainError> {
    if dataset.x.is_empty() || dataset.y.is_empty() {
        return Err(TrainError::Empty);
    }
    if dataset.x.len() != dataset.y.len() {
        return Err(TrainError::MismatchedLengths {
            rows: dataset.x.len(),
            labels: dataset.y.len(),
        });
    }
    if dataset.n_classes < 2 {
        return Err(TrainError::TooFewClasses(dataset.n_classes));
    }
    let expected = dataset.feature_names.len();
    if expected == 0 || expected > u16::MAX as usize {
        return Err(TrainError::InvalidOptions(format!(
            "unsupported feature count {expected}"
        )));
    }
    for (row, values) in dataset.x.iter().enumerate() {
        if values.len() != expected {
            return Err(TrainError::RowLength {
                row,
                expected,
                actual: values.len(),
            });
        }
    }
    let mut seen = vec![false; dataset.n_classes];
    for (row, &label) in dataset.y.iter().enumerate() {
        if label >= dataset.n_classes {
            return Err(TrainError::LabelOutOfRange {
                row,
                label,
                n_classes: dataset.n_classes,
            });
        }
        seen[label] = true;
    }
    let distinct = seen.iter().filter(|&&present| present).count();
    if distinct < 2 {
        return Err(TrainError::TooFewClasses(distinct));
    }
    if options.trees == 0 {
        return Err(TrainError::InvalidOptions("trees must be at least 1".into()));
    }
    if options.min_samples_split < 2 {
        return Err(TrainError::InvalidOptions(
            "min_samples_split must be at least 2".into(),
        ));
    }
    if options.min_samples_leaf == 0 {
        return Err(TrainError::InvalidOptions(
            "min_samples_leaf must be at least 1".into(),
        ));
    }
    if options.max_features == Some(0) {
        return Err(TrainError::InvalidOptions(
            "max_features must be at least 1".into(),
        ));
    }
    Ok(())
}

/// Training row with its bootstrap multiplicity and class weight folded in.
#[derive(Debug, Clone, Copy)]
struct WeightedSample {
    row: usize,
    count: u32,
    weight: f64,
}

fn draw_samples(
    n: usize,
    bootstrap: bool,
    rng: &mut StdRng,
    y: &[usize],
    class_weights: &[f64],
) -> Vec<WeightedSample> {
    let mut counts = vec![0u32; n];
    if bootstrap {
        for _ in 0..n {
            counts[rng.random_range(0..n)] += 1;
        }
    } else {
        counts.fill(1);
    }
    counts
        .into_iter()
        .enumerate()
        .filter(|(_, count)| *count > 0)
        .map(|(row, count)| WeightedSample {
            row,
            count,
            weight: f64::from(count) * class_weights[y[row]],
        })
        .collect()
}

#[derive(Debug, Clone, Copy)]
struct SplitCandidate {
    feature: usize,
    threshold: f32,
    score: f64,
}

struct TreeBuilder<'a> {
    x: &'a [Vec<f32>],
    y: &'a [usize],
    n_classes: usize,
    n_features: usize,
    max_features: usize,
    options: &'a ForestOptions,
    rng: StdRng,
    nodes: Vec<Node>,
}

impl TreeBuilder<'_> {
    /// Grow the subtree for `samples` depth-first and return its node index.
    fn grow(&mut self, samples: Vec<WeightedSample>, depth: usize) -> u32 {
        let node_idx = self.nodes.len();
        self.nodes.push(Node::Leaf { proba: Vec::new() });

        let distribution = self.class_distribution(&samples);
        let count: u64 = samples.iter().map(|s| u64::from(s.count)).sum();
        let depth_reached = self.options.max_depth.is_some_and(|max| depth >= max);
        let pure = distribution.iter().filter(|&&w| w > 0.0).count() <= 1;
        let splittable = !depth_reached && !pure && count >= self.options.min_samples_split as u64;

        if splittable && let Some(split) = self.best_split(&samples) {
            let x = self.x;
            let (left, right): (Vec<_>, Vec<_>) = samples
                .into_iter()
                .partition(|s| x[s.row][split.feature] <= split.threshold);
            let left_idx = self.grow(left, depth + 1);
            let right_idx = self.grow(right, depth + 1);
            self.nodes[node_idx] = Node::Split {
                feature_index: split.feature as u16,
                threshold: split.threshold,
                left: left_idx,
                right: right_idx,
            };
            return node_idx as u32;
        }

        self.nodes[node_idx] = Node::Leaf {
            proba: normalize(&distribution),
        };
        node_idx as u32
    }

    fn class_distribution(&self, samples: &[WeightedSample]) -> Vec<f64> {
        let mut distribution = vec![0.0f64; self.n_classes];
        for sample in samples {
            distribution[self.y[sample.row]] += sample.weight;
        }
        distribution
    }

    /// Lowest weighted-Gini split over a random feature subset.
    ///
    /// When no sampled feature separates the node, the remaining features are
    /// tried before the node becomes a leaf.
    fn best_split(&mut self, samples: &[WeightedSample]) -> Option<SplitCandidate> {
        let sampled = index::sample(&mut self.rng, self.n_features, self.max_features).into_vec();
        if let Some(split) = self.best_split_over(samples, &sampled) {
            return Some(split);
        }
        let remaining: Vec<usize> = (0..self.n_features)
            .filter(|feature| !sampled.contains(feature))
            .collect();
        self.best_split_over(samples, &remaining)
    }

    fn best_split_over(
        &self,
        samples: &[WeightedSample],
        features: &[usize],
    ) -> Option<SplitCandidate> {
        if features.is_empty() {
            return None;
        }
        let total = self.class_distribution(samples);
        let total_count: u64 = samples.iter().map(|s| u64::from(s.count)).sum();
        let min_leaf = self.options.min_samples_leaf as u64;

        let mut best: Option<SplitCandidate> = None;
        let mut column: Vec<(f32, WeightedSample)> = Vec::with_capacity(samples.len());
        let mut left = vec![0.0f64; self.n_classes];
        let mut right = vec![0.0f64; self.n_classes];
        for &feature in features {
            column.clear();
            column.extend(samples.iter().map(|s| (self.x[s.row][feature], *s)));
            column.sort_by(|a, b| a.0.total_cmp(&b.0));

            left.iter_mut().for_each(|w| *w = 0.0);
            let mut left_count = 0u64;
            for pair in column.windows(2) {
                let (value, sample) = pair[0];
                let next_value = pair[1].0;
                left[self.y[sample.row]] += sample.weight;
                left_count += u64::from(sample.count);
                if next_value <= value {
                    continue;
                }
                let right_count = total_count - left_count;
                if left_count < min_leaf || right_count < min_leaf {
                    continue;
                }
                for (r, (t, l)) in right.iter_mut().zip(total.iter().zip(&left)) {
                    *r = t - l;
                }
                let score = weighted_gini(&left) + weighted_gini(&right);
                if best.is_none_or(|b| score < b.score) {
                    best = Some(SplitCandidate {
                        feature,
                        threshold: midpoint(value, next_value),
                        score,
                    });
                }
            }
        }
        best
    }
}

/// Gini impurity scaled by the node weight: `W - sum(w_c^2) / W`.
fn weighted_gini(distribution: &[f64]) -> f64 {
    let total: f64 = distribution.iter().sum();
    if total <= 0.0 {
        return 0.0;
    }
    let sum_sq: f64 = distribution.iter().map(|w| w * w).sum();
    total - sum_sq / total
}

/// Threshold strictly between two sorted values, never equal to `high`.
fn midpoint(low: f32, high: f32) -> f32 {
    let mid = low + (high - low) / 2.0;
    if mid.is_finite() && mid >= low && mid < high {
        mid
    } else {
        low
    }
}

fn normalize(distribution: &[f64]) -> Vec<f32> {
    let total: f64 = distribution.iter().sum();
    if total <= 0.0 {
        return vec![1.0 / distribution.len().max(1) as f32; distribution.len()];
    }
    distribution.iter().map(|w| (w / total) as f32).collect()
}
