//! Categorical label encoder for the internet-usage column.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Encoder artifact format version.
pub const ENCODER_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncoderError {
    #[error("Unknown internet usage category {category:?} (known: {known})")]
    UnknownCategory { category: String, known: String },
    #[error("Code {code} is outside the {len} known categories")]
    UnknownCode { code: usize, len: usize },
    #[error("Cannot fit an encoder without any category values")]
    Empty,
}

/// Fitted mapping from category labels to integer codes.
///
/// Codes follow the sorted order of the distinct labels seen during fitting,
/// so `High`, `Low`, `Medium` map to `0`, `1`, `2`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryEncoder {
    pub format_version: u32,
    classes: Vec<String>,
}

impl CategoryEncoder {
    /// Learn the category set from observed values.
    pub fn fit<'a, I>(values: I) -> Result<Self, EncoderError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let classes: BTreeSet<&str> = values.into_iter().collect();
        if classes.is_empty() {
            return Err(EncoderError::Empty);
        }
        Ok(Self {
            format_version: ENCODER_FORMAT_VERSION,
            classes: classes.into_iter().map(str::to_string).collect(),
        })
    }

    /// Known categories, indexed by code.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn transform(&self, category: &str) -> Result<usize, EncoderError> {
        self.classes
            .binary_search_by(|known| known.as_str().cmp(category))
            .map_err(|_| EncoderError::UnknownCategory {
                category: category.to_string(),
                known: self.classes.join(", "),
            })
    }

    pub fn inverse_transform(&self, code: usize) -> Result<&str, EncoderError> {
        self.classes
            .get(code)
            .map(String::as_str)
            .ok_or(EncoderError::UnknownCode {
                code,
                len: self.classes.len(),
            })
    }

    /// Validate structural invariants after deserialization.
    pub fn validate(&self) -> Result<(), String> {
        if self.classes.is_empty() {
            return Err("Encoder has no categories".to_string());
        }
        if self.classes.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err("Encoder categories must be sorted and unique".to_string());
        }
        Ok(())
    }
}
