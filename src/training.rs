//! Trainer: fit the encoder and the forest from a loaded dataset.

use thiserror::Error;
use tracing::info;

use crate::config::TrainingSettings;
use crate::dataset::{Dataset, FEATURE_NAMES, Outcome, train_test_split};
use crate::ml::artifacts::Artifacts;
use crate::ml::encoder::{CategoryEncoder, EncoderError};
use crate::ml::forest::{TrainDataset, TrainError, train_random_forest};
use crate::ml::metrics::{Evaluation, evaluate};

#[derive(Debug, Error)]
pub enum TrainingError {
    #[error("Dataset contains no rows")]
    EmptyDataset,
    #[error("Failed to fit the internet usage encoder: {0}")]
    Encoder(#[from] EncoderError),
    #[error("Failed to train the classifier: {0}")]
    Forest(#[from] TrainError),
}

/// Output of one training run.
#[derive(Debug, Clone)]
pub struct TrainingRun {
    pub artifacts: Artifacts,
    /// Held-out scores; `None` when every row went to training.
    pub evaluation: Option<Evaluation>,
    pub train_rows: usize,
    pub test_rows: usize,
}

/// Encode, split, fit and score. Deterministic for a given seed.
pub fn train(dataset: &Dataset, settings: &TrainingSettings) -> Result<TrainingRun, TrainingError> {
    if dataset.is_empty() {
        return Err(TrainingError::EmptyDataset);
    }
    let encoder = CategoryEncoder::fit(dataset.internet_usage_values())?;
    let (x, y) = encode_rows(dataset, &encoder)?;

    let split = train_test_split(x.len(), settings.test_fraction, settings.seed);
    let pick = |indices: &[usize]| TrainDataset {
        feature_names: FEATURE_NAMES.iter().map(|name| name.to_string()).collect(),
        n_classes: Outcome::CLASS_NAMES.len(),
        x: indices.iter().map(|&i| x[i].clone()).collect(),
        y: indices.iter().map(|&i| y[i]).collect(),
    };
    let train_set = pick(&split.train);
    let test_set = pick(&split.test);
    info!(
        train_rows = train_set.x.len(),
        test_rows = test_set.x.len(),
        categories = ?encoder.classes(),
        "Training random forest"
    );

    let model = train_random_forest(&train_set, &settings.forest_options())?;
    let evaluation = (!test_set.x.is_empty()).then(|| evaluate(&model, &test_set.x, &test_set.y));
    if let Some(evaluation) = &evaluation {
        info!(accuracy = evaluation.accuracy, "Held-out evaluation complete");
    }

    Ok(TrainingRun {
        artifacts: Artifacts { encoder, model },
        evaluation,
        train_rows: train_set.x.len(),
        test_rows: test_set.x.len(),
    })
}

/// Feature matrix and labels for every record, in file order.
pub fn encode_rows(
    dataset: &Dataset,
    encoder: &CategoryEncoder,
) -> Result<(Vec<Vec<f32>>, Vec<usize>), EncoderError> {
    let mut x = Vec::with_capacity(dataset.len());
    let mut y = Vec::with_capacity(dataset.len());
    for record in dataset.records() {
        let code = encoder.transform(&record.internet_usage)?;
        x.push(record.feature_row(code).to_vec());
        y.push(record.result.label());
    }
    Ok((x, y))
}
