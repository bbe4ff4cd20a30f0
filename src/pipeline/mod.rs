//! Prediction pipeline: parse identifier → look up → encode → predict → interpret.
//!
//! A [`Predictor`] owns shared, read-only handles to the dataset and the
//! artifacts. Cloning one is cheap, and clones never observe each other, so a
//! front end can hand a predictor to every request.

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::dataset::{Dataset, FEATURE_LEN, Record};
use crate::ml::artifacts::Artifacts;
use crate::ml::encoder::{CategoryEncoder, EncoderError};

pub mod interpret;

pub use interpret::{
    ChartValue, PredictionReport, PredictionResult, Severity, USAGE_INTENSITY_SCALE,
    usage_intensity,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PredictionError {
    #[error("Please enter a valid numeric Roll Number.")]
    InvalidInput { input: String },
    #[error("No student found with Roll No {roll_no}.")]
    NotFound { roll_no: i64 },
    #[error(transparent)]
    Encoding(#[from] EncoderError),
}

/// Parse a free-text identifier; surrounding whitespace is ignored.
pub fn parse_roll_no(input: &str) -> Result<i64, PredictionError> {
    input
        .trim()
        .parse::<i64>()
        .map_err(|_| PredictionError::InvalidInput {
            input: input.to_string(),
        })
}

/// Model input for a record, with internet usage encoded by `encoder`.
pub fn prepare_features(
    record: &Record,
    encoder: &CategoryEncoder,
) -> Result<[f32; FEATURE_LEN], EncoderError> {
    let usage_code = encoder.transform(&record.internet_usage)?;
    Ok(record.feature_row(usage_code))
}

#[derive(Debug, Clone)]
pub struct Predictor {
    artifacts: Arc<Artifacts>,
    dataset: Arc<Dataset>,
}

impl Predictor {
    pub fn new(artifacts: Arc<Artifacts>, dataset: Arc<Dataset>) -> Self {
        Self { artifacts, dataset }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn artifacts(&self) -> &Artifacts {
        &self.artifacts
    }

    /// Run the whole pipeline for user-supplied text.
    pub fn predict_input(&self, input: &str) -> Result<PredictionReport, PredictionError> {
        let roll_no = parse_roll_no(input)?;
        self.predict_roll_no(roll_no)
    }

    pub fn predict_roll_no(&self, roll_no: i64) -> Result<PredictionReport, PredictionError> {
        let record = self
            .dataset
            .find(roll_no)
            .ok_or(PredictionError::NotFound { roll_no })?;
        let result = self.predict_record(record)?;
        debug!(roll_no, verdict = result.text(), "Prediction complete");
        Ok(PredictionReport::new(record.clone(), result))
    }

    /// Classify a single record without the lookup step.
    pub fn predict_record(&self, record: &Record) -> Result<PredictionResult, PredictionError> {
        let features = prepare_features(record, &self.artifacts.encoder)?;
        let label = self.artifacts.model.predict(&features);
        Ok(PredictionResult::from_label(label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{FEATURE_NAMES, Outcome, load_dataset_from_reader};
    use crate::ml::forest::{DecisionTree, MODEL_FORMAT_VERSION, Node, RandomForestModel};

    const CSV: &str = "\
Roll_No,Name,Hours_Studied,Sleep_Hours,Attendance,Internet_Usage,Score,Result
1,Asha,6,7,95,Low,82,Pass
2,Ben,1,5,55,High,30,Fail
3,Cara,2,6,60,Unheard,35,Fail
";

    /// Passes anyone scoring above 50.
    fn score_model() -> RandomForestModel {
        RandomForestModel {
            format_version: MODEL_FORMAT_VERSION,
            feature_names: FEATURE_NAMES.iter().map(|name| name.to_string()).collect(),
            n_classes: 2,
            trees: vec![DecisionTree {
                nodes: vec![
                    Node::Split {
                        feature_index: 4,
                        threshold: 50.0,
                        left: 1,
                        right: 2,
                    },
                    Node::Leaf {
                        proba: vec![1.0, 0.0],
                    },
                    Node::Leaf {
                        proba: vec![0.0, 1.0],
                    },
                ],
            }],
        }
    }

    fn predictor() -> Predictor {
        let dataset = load_dataset_from_reader(CSV.as_bytes()).unwrap();
        let artifacts = Artifacts {
            encoder: CategoryEncoder::fit(["Low", "Medium", "High"]).unwrap(),
            model: score_model(),
        };
        Predictor::new(Arc::new(artifacts), Arc::new(dataset))
    }

    #[test]
    fn known_ids_produce_verdicts() {
        let predictor = predictor();
        let pass = predictor.predict_input("1").unwrap();
        assert_eq!(pass.result.outcome, Outcome::Pass);
        assert_eq!(pass.result.text(), "PASS");
        assert_eq!(pass.record.name, "Asha");
        assert_eq!(pass.usage_intensity, 30.0);

        let fail = predictor.predict_input(" 2 ").unwrap();
        assert_eq!(fail.result.text(), "FAIL");
        assert_eq!(fail.result.severity(), Severity::Negative);
    }

    #[test]
    fn non_numeric_input_is_rejected_before_lookup() {
        let err = predictor().predict_input("abc").unwrap_err();
        assert_eq!(
            err,
            PredictionError::InvalidInput {
                input: "abc".into()
            }
        );
        assert!(parse_roll_no("4.5").is_err());
        assert!(parse_roll_no("").is_err());
    }

    #[test]
    fn unknown_id_is_not_found() {
        assert_eq!(
            predictor().predict_input("9999").unwrap_err(),
            PredictionError::NotFound { roll_no: 9999 }
        );
    }

    #[test]
    fn unseen_category_surfaces_encoder_error() {
        let err = predictor().predict_roll_no(3).unwrap_err();
        assert!(matches!(
            err,
            PredictionError::Encoding(EncoderError::UnknownCategory { ref category, .. })
                if category == "Unheard"
        ));
    }

    #[test]
    fn features_use_encoder_codes() {
        let predictor = predictor();
        let record = predictor.dataset().find(2).unwrap();
        let features = prepare_features(record, &predictor.artifacts().encoder).unwrap();
        assert_eq!(features, [1.0, 5.0, 55.0, 0.0, 30.0]);
    }

    #[test]
    fn cloned_predictors_share_artifacts() {
        let predictor = predictor();
        let clone = predictor.clone();
        assert!(std::ptr::eq(predictor.artifacts(), clone.artifacts()));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let worker = predictor.clone();
                std::thread::spawn(move || worker.predict_roll_no(1).map(|r| r.result.outcome))
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), Ok(Outcome::Pass));
        }
    }
}
