mod support;

use std::sync::Arc;

use gradecast::config::TrainingSettings;
use gradecast::dataset::{Dataset, load_dataset};
use gradecast::ml::artifacts::{ArtifactError, Artifacts, load_model};
use gradecast::pipeline::{PredictionError, Predictor};
use gradecast::training::train;
use support::fixture::write_student_csv;
use tempfile::TempDir;

struct Harness {
    temp: TempDir,
    dataset: Arc<Dataset>,
}

impl Harness {
    fn new(rows: i64) -> Self {
        let temp = tempfile::tempdir().expect("create tempdir");
        let path = write_student_csv(temp.path(), rows);
        let dataset = load_dataset(&path).expect("load dataset");
        Self {
            temp,
            dataset: Arc::new(dataset),
        }
    }

    fn settings() -> TrainingSettings {
        TrainingSettings {
            trees: 25,
            ..TrainingSettings::default()
        }
    }

    fn trained_predictor(&self) -> Predictor {
        let run = train(&self.dataset, &Self::settings()).expect("train");
        Predictor::new(Arc::new(run.artifacts), Arc::clone(&self.dataset))
    }
}

#[test]
fn every_known_id_gets_a_verdict() {
    let harness = Harness::new(50);
    let predictor = harness.trained_predictor();
    for roll_no in 1..=50 {
        let report = predictor
            .predict_input(&roll_no.to_string())
            .expect("known id predicts");
        assert!(matches!(report.result.text(), "PASS" | "FAIL"));
        assert_eq!(report.record.roll_no, roll_no);
    }
}

#[test]
fn unknown_and_malformed_ids_are_reported() {
    let harness = Harness::new(50);
    let predictor = harness.trained_predictor();
    assert_eq!(
        predictor.predict_input("9999").unwrap_err(),
        PredictionError::NotFound { roll_no: 9999 }
    );
    assert!(matches!(
        predictor.predict_input("abc").unwrap_err(),
        PredictionError::InvalidInput { .. }
    ));
}

#[test]
fn same_seed_gives_same_predictions() {
    let harness = Harness::new(50);
    let first = harness.trained_predictor();
    let second = harness.trained_predictor();
    for record in harness.dataset.records() {
        assert_eq!(
            first.predict_record(record).unwrap(),
            second.predict_record(record).unwrap()
        );
    }
}

#[test]
fn encoder_round_trips_training_categories() {
    let harness = Harness::new(30);
    let run = train(&harness.dataset, &Harness::settings()).unwrap();
    let encoder = &run.artifacts.encoder;
    for category in harness.dataset.internet_usage_values() {
        let code = encoder.transform(category).unwrap();
        assert_eq!(encoder.inverse_transform(code).unwrap(), category);
    }
}

#[test]
fn saved_artifacts_predict_like_the_trained_ones() {
    let harness = Harness::new(50);
    let run = train(&harness.dataset, &Harness::settings()).unwrap();
    let model_path = harness.temp.path().join("model.json");
    let encoder_path = harness.temp.path().join("label_encoder.json");
    run.artifacts.save(&model_path, &encoder_path).unwrap();

    let loaded = Artifacts::load(&model_path, &encoder_path).unwrap();
    let fresh = Predictor::new(Arc::new(run.artifacts), Arc::clone(&harness.dataset));
    let reloaded = Predictor::new(Arc::new(loaded), Arc::clone(&harness.dataset));
    for roll_no in [1, 17, 33, 50] {
        assert_eq!(
            fresh.predict_roll_no(roll_no).unwrap(),
            reloaded.predict_roll_no(roll_no).unwrap()
        );
    }
}

#[test]
fn corrupt_model_fails_to_load() {
    let harness = Harness::new(10);
    let path = harness.temp.path().join("model.json");
    std::fs::write(&path, r#"{"format_version":1,"trees":"#).unwrap();
    assert!(matches!(load_model(&path), Err(ArtifactError::Parse { .. })));
}
