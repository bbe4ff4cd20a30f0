//! Persisted encoder/classifier artifacts.
//!
//! Both artifacts are JSON documents carrying a `format_version`. Writes go
//! through a temp file in the target directory and are renamed into place.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::info;

use super::encoder::{CategoryEncoder, ENCODER_FORMAT_VERSION};
use super::forest::{MODEL_FORMAT_VERSION, RandomForestModel};
use crate::dataset::FEATURE_NAMES;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("Failed to read artifact {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Artifact {path} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Artifact {path} has format version {found} (expected {expected})")]
    Version {
        path: PathBuf,
        found: u32,
        expected: u32,
    },
    #[error("Artifact {path} is invalid: {reason}")]
    Invalid { path: PathBuf, reason: String },
    #[error("Failed to serialize artifact {path}: {source}")]
    Serialize {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Failed to write artifact {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Fitted encoder and classifier, immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifacts {
    pub encoder: CategoryEncoder,
    pub model: RandomForestModel,
}

impl Artifacts {
    /// Load both artifacts and check they fit the dataset feature layout.
    pub fn load(model_path: &Path, encoder_path: &Path) -> Result<Self, ArtifactError> {
        let encoder = load_encoder(encoder_path)?;
        let model = load_model(model_path)?;
        info!(
            trees = model.trees.len(),
            categories = encoder.classes().len(),
            "Loaded artifacts from {} and {}",
            model_path.display(),
            encoder_path.display()
        );
        Ok(Self { encoder, model })
    }

    /// Persist both artifacts, replacing existing files.
    pub fn save(&self, model_path: &Path, encoder_path: &Path) -> Result<(), ArtifactError> {
        write_json(encoder_path, &self.encoder)?;
        write_json(model_path, &self.model)?;
        info!(
            "Saved model to {} and encoder to {}",
            model_path.display(),
            encoder_path.display()
        );
        Ok(())
    }
}

pub fn load_encoder(path: &Path) -> Result<CategoryEncoder, ArtifactError> {
    let encoder: CategoryEncoder = read_versioned(path, ENCODER_FORMAT_VERSION)?;
    encoder.validate().map_err(|reason| ArtifactError::Invalid {
        path: path.to_path_buf(),
        reason,
    })?;
    Ok(encoder)
}

pub fn load_model(path: &Path) -> Result<RandomForestModel, ArtifactError> {
    let model: RandomForestModel = read_versioned(path, MODEL_FORMAT_VERSION)?;
    let invalid = |reason: String| ArtifactError::Invalid {
        path: path.to_path_buf(),
        reason,
    };
    model.validate().map_err(invalid)?;
    if model.feature_names != FEATURE_NAMES {
        return Err(invalid(format!(
            "model features {:?} do not match {:?}",
            model.feature_names, FEATURE_NAMES
        )));
    }
    Ok(model)
}

#[derive(serde::Deserialize)]
struct VersionProbe {
    format_version: u32,
}

fn read_versioned<T: DeserializeOwned>(path: &Path, expected: u32) -> Result<T, ArtifactError> {
    let bytes = std::fs::read(path).map_err(|source| ArtifactError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parse_error = |source| ArtifactError::Parse {
        path: path.to_path_buf(),
        source,
    };
    let probe: VersionProbe = serde_json::from_slice(&bytes).map_err(parse_error)?;
    if probe.format_version != expected {
        return Err(ArtifactError::Version {
            path: path.to_path_buf(),
            found: probe.format_version,
            expected,
        });
    }
    serde_json::from_slice(&bytes).map_err(parse_error)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), ArtifactError> {
    let write_error = |source| ArtifactError::Write {
        path: path.to_path_buf(),
        source,
    };
    let bytes = serde_json::to_vec_pretty(value).map_err(|source| ArtifactError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir).map_err(write_error)?;
    let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(write_error)?;
    tmp.write_all(&bytes).map_err(write_error)?;
    tmp.as_file().sync_all().map_err(write_error)?;
    tmp.persist(path).map_err(|err| write_error(err.error))?;
    Ok(())
}
