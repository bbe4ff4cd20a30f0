//! Exam-performance dataset: record layout, CSV loading and partitioning.

pub mod loader;
pub mod record;
pub mod split;

pub use loader::{Dataset, DatasetError, load_dataset, load_dataset_from_reader};
pub use record::{FEATURE_LEN, FEATURE_NAMES, Outcome, Record};
pub use split::{Split, train_test_split};
