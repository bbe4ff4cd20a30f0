//! UI-agnostic dashboard state; the egui layer only renders it.

use tracing::{info, warn};

use crate::ml::encoder::EncoderError;
use crate::pipeline::{PredictionError, PredictionReport, Predictor};

pub const INVALID_INPUT_MESSAGE: &str = "Please enter a valid numeric Roll Number.";
pub const NOT_FOUND_MESSAGE: &str = "No student found with that Roll No.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub tone: StatusTone,
}

impl StatusMessage {
    fn new(text: impl Into<String>, tone: StatusTone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }
}

pub struct DashboardController {
    predictor: Predictor,
    /// Contents of the roll number field.
    pub input: String,
    report: Option<PredictionReport>,
    status: Option<StatusMessage>,
}

impl DashboardController {
    pub fn new(predictor: Predictor) -> Self {
        let status = StatusMessage::new(
            format!("{} students loaded", predictor.dataset().len()),
            StatusTone::Info,
        );
        Self {
            predictor,
            input: String::new(),
            report: None,
            status: Some(status),
        }
    }

    pub fn report(&self) -> Option<&PredictionReport> {
        self.report.as_ref()
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    /// Run a prediction for the current input. Blank input is ignored.
    pub fn submit(&mut self) {
        if self.input.trim().is_empty() {
            return;
        }
        match self.predictor.predict_input(&self.input) {
            Ok(report) => {
                info!(
                    roll_no = report.record.roll_no,
                    verdict = report.result.text(),
                    "Dashboard prediction"
                );
                self.status = Some(StatusMessage::new(
                    format!("Showing performance for Roll No: {}", report.record.roll_no),
                    StatusTone::Info,
                ));
                self.report = Some(report);
            }
            Err(err) => {
                warn!("Prediction failed: {err}");
                self.report = None;
                self.status = Some(status_for_error(&err));
            }
        }
    }
}

fn status_for_error(err: &PredictionError) -> StatusMessage {
    match err {
        PredictionError::InvalidInput { .. } => {
            StatusMessage::new(INVALID_INPUT_MESSAGE, StatusTone::Error)
        }
        PredictionError::NotFound { .. } => {
            StatusMessage::new(NOT_FOUND_MESSAGE, StatusTone::Warning)
        }
        PredictionError::Encoding(EncoderError::UnknownCategory { category, .. }) => {
            StatusMessage::new(
                format!("Unknown Internet_Usage category '{category}' for this student."),
                StatusTone::Error,
            )
        }
        PredictionError::Encoding(other) => StatusMessage::new(other.to_string(), StatusTone::Error),
    }
}
