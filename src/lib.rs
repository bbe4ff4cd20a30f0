//! Library exports for reuse in binaries, benchmarks and tests.
/// Application directory resolution.
pub mod app_dirs;
/// `config.toml` loading.
pub mod config;
/// Student records, CSV loading and the train/test split.
pub mod dataset;
/// egui dashboard.
pub mod egui_app;
/// Tracing setup.
pub mod logging;
/// Encoder, random forest, metrics and artifact persistence.
pub mod ml;
/// Identifier to verdict pipeline.
pub mod pipeline;
/// Encoder and forest fitting from a dataset.
pub mod training;
