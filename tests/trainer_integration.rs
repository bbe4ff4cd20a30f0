mod support;

use gradecast::config;
use gradecast::dataset::{DatasetError, load_dataset, train_test_split};
use gradecast::training::train;
use support::fixture::{student_csv, write_student_csv};
use support::gradecast_env::GradecastEnvGuard;

#[test]
fn missing_column_names_the_column() {
    let temp = tempfile::tempdir().unwrap();
    let csv = student_csv(5).replace("Internet_Usage", "Screen_Time");
    let path = temp.path().join("data.csv");
    std::fs::write(&path, csv).unwrap();
    let err = load_dataset(&path).unwrap_err();
    assert!(matches!(
        err,
        DatasetError::MissingColumn {
            column: "Internet_Usage"
        }
    ));
    assert!(err.to_string().contains("Internet_Usage"));
}

#[test]
fn split_is_eighty_twenty_and_seeded() {
    let first = train_test_split(50, 0.2, 42);
    assert_eq!(first.train.len(), 40);
    assert_eq!(first.test.len(), 10);
    assert_eq!(first, train_test_split(50, 0.2, 42));
    assert_ne!(first, train_test_split(50, 0.2, 7));
}

#[test]
fn training_uses_config_from_app_dir() {
    let temp = tempfile::tempdir().unwrap();
    let _env = GradecastEnvGuard::set_config_home(temp.path().to_path_buf());
    let config_path = config::config_path().unwrap();
    std::fs::write(&config_path, "[training]\ntrees = 5\ntest_fraction = 0.25\n").unwrap();

    let config = config::load_or_default().unwrap();
    assert!(config_path.starts_with(temp.path()));
    assert_eq!(config.training.trees, 5);

    let dataset = load_dataset(&write_student_csv(temp.path(), 40)).unwrap();
    let run = train(&dataset, &config.training).unwrap();
    assert_eq!(run.artifacts.model.trees.len(), 5);
    assert_eq!(run.test_rows, 10);
    assert_eq!(run.train_rows, 30);
}
