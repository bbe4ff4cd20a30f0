//! Machine learning building blocks for training and inference.
//!
//! The encoder and the forest are plain serde types so they can be persisted as
//! JSON artifacts and shared read-only between predictors.

pub mod artifacts;
pub mod encoder;
pub mod forest;
pub mod metrics;
