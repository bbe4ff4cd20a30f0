//! Deterministic random-forest classifier.
//!
//! Bagged CART trees with Gini splits over a random feature subset per node.
//! Everything downstream of the seed is reproducible, so retraining on the same
//! rows yields the same JSON artifact byte for byte.

mod model;
mod train;
mod tree;

pub use model::{MODEL_FORMAT_VERSION, RandomForestModel};
pub use train::{ForestOptions, TrainDataset, TrainError, class_weights, train_random_forest};
pub use tree::{DecisionTree, Node};
