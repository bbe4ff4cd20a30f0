//! `config.toml` settings shared by the trainer, the predictor and the dashboard.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::app_dirs;
use crate::ml::forest::ForestOptions;

/// Default filename used to store the app configuration.
pub const CONFIG_FILE_NAME: &str = "config.toml";

const MIN_TEST_FRACTION: f32 = 0.05;
const MAX_TEST_FRACTION: f32 = 0.5;

/// Errors that may occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No usable config directory found.
    #[error("Config directory unavailable: {0}")]
    Dir(#[from] app_dirs::AppDirError),
    /// Failed to read a config file.
    #[error("Failed to read {path}: {source}")]
    Read {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
    /// Failed to parse TOML config.
    #[error("Invalid config at {path}: {source}")]
    ParseToml {
        /// TOML file path.
        path: PathBuf,
        /// TOML parse error.
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub paths: PathSettings,
    pub training: TrainingSettings,
}

/// Input dataset and artifact locations.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PathSettings {
    pub dataset: PathBuf,
    pub model: PathBuf,
    pub encoder: PathBuf,
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            dataset: PathBuf::from("online_exam_performance_data.csv"),
            model: PathBuf::from("model.json"),
            encoder: PathBuf::from("label_encoder.json"),
        }
    }
}

/// Trainer settings; see [`ForestOptions`] for the forest knobs.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TrainingSettings {
    pub seed: u64,
    /// Share of rows held out for evaluation.
    pub test_fraction: f32,
    pub trees: usize,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    pub balance_classes: bool,
}

impl Default for TrainingSettings {
    fn default() -> Self {
        let forest = ForestOptions::default();
        Self {
            seed: forest.seed,
            test_fraction: 0.2,
            trees: forest.trees,
            max_depth: forest.max_depth,
            min_samples_split: forest.min_samples_split,
            min_samples_leaf: forest.min_samples_leaf,
            balance_classes: forest.balance_classes,
        }
    }
}

impl TrainingSettings {
    /// Clamp values into ranges the trainer accepts.
    pub fn normalized(mut self) -> Self {
        self.test_fraction = if self.test_fraction.is_finite() {
            self.test_fraction.clamp(MIN_TEST_FRACTION, MAX_TEST_FRACTION)
        } else {
            Self::default().test_fraction
        };
        self.trees = self.trees.max(1);
        self.min_samples_split = self.min_samples_split.max(2);
        self.min_samples_leaf = self.min_samples_leaf.max(1);
        self
    }

    pub fn forest_options(&self) -> ForestOptions {
        ForestOptions {
            trees: self.trees,
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
            min_samples_leaf: self.min_samples_leaf,
            balance_classes: self.balance_classes,
            seed: self.seed,
            ..ForestOptions::default()
        }
    }
}

impl AppConfig {
    fn normalized(mut self) -> Self {
        self.training = self.training.normalized();
        self
    }
}

/// Resolve the configuration file path inside the app directory.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    Ok(app_dirs::app_root_dir()?.join(CONFIG_FILE_NAME))
}

/// Load `config.toml` from the app directory, returning defaults if missing.
pub fn load_or_default() -> Result<AppConfig, ConfigError> {
    load_from(&config_path()?)
}

/// Load a config file, returning defaults if it does not exist.
pub fn load_from(path: &Path) -> Result<AppConfig, ConfigError> {
    if !path.exists() {
        info!("No config at {}; using defaults", path.display());
        return Ok(AppConfig::default());
    }
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config: AppConfig = toml::from_str(&text).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Loaded config from {}", path.display());
    Ok(config.normalized())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let config = load_from(&dir.path().join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.training.seed, 42);
        assert_eq!(config.training.test_fraction, 0.2);
        assert_eq!(config.paths.model, PathBuf::from("model.json"));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(
            &path,
            "[paths]\ndataset = \"data/exams.csv\"\n\n[training]\ntrees = 25\nmax_depth = 6\n",
        )
        .unwrap();
        let config = load_from(&path).unwrap();
        assert_eq!(config.paths.dataset, PathBuf::from("data/exams.csv"));
        assert_eq!(config.paths.encoder, PathBuf::from("label_encoder.json"));
        assert_eq!(config.training.trees, 25);
        assert_eq!(config.training.max_depth, Some(6));
        assert!(config.training.balance_classes);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(
            &path,
            "[training]\ntest_fraction = 0.9\ntrees = 0\nmin_samples_split = 1\nmin_samples_leaf = 0\n",
        )
        .unwrap();
        let training = load_from(&path).unwrap().training;
        assert_eq!(training.test_fraction, MAX_TEST_FRACTION);
        assert_eq!(training.trees, 1);
        assert_eq!(training.min_samples_split, 2);
        assert_eq!(training.min_samples_leaf, 1);
    }

    #[test]
    fn malformed_toml_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[training\nseed = ").unwrap();
        assert!(matches!(
            load_from(&path),
            Err(ConfigError::ParseToml { .. })
        ));
    }

    #[test]
    fn forest_options_follow_settings() {
        let settings = TrainingSettings {
            seed: 7,
            trees: 12,
            balance_classes: false,
            ..TrainingSettings::default()
        };
        let options = settings.forest_options();
        assert_eq!(options.seed, 7);
        assert_eq!(options.trees, 12);
        assert!(!options.balance_classes);
        assert!(options.bootstrap);
    }
}
