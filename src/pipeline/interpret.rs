//! Mapping from model output to display values.

use serde::Serialize;

use crate::dataset::{
    Outcome, Record,
    record::{COL_ATTENDANCE, COL_HOURS_STUDIED, COL_INTERNET_USAGE, COL_SCORE, COL_SLEEP_HOURS},
};

/// Factor applied to the usage level so it is visible next to attendance.
pub const USAGE_INTENSITY_SCALE: f32 = 30.0;

/// Display-only usage levels; the model never sees these numbers.
const USAGE_LEVELS: [(&str, f32); 3] = [("Low", 1.0), ("Medium", 2.0), ("High", 3.0)];
const DEFAULT_USAGE_LEVEL: f32 = 2.0;

/// Tone attached to a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    Positive,
    Negative,
}

/// Interpreted classifier output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PredictionResult {
    pub label: usize,
    pub outcome: Outcome,
}

impl PredictionResult {
    /// Label `1` reads as a pass; every other label reads as a fail.
    pub fn from_label(label: usize) -> Self {
        let outcome = if label == Outcome::Pass.label() {
            Outcome::Pass
        } else {
            Outcome::Fail
        };
        Self { label, outcome }
    }

    pub fn text(&self) -> &'static str {
        match self.outcome {
            Outcome::Pass => "PASS",
            Outcome::Fail => "FAIL",
        }
    }

    pub fn severity(&self) -> Severity {
        match self.outcome {
            Outcome::Pass => Severity::Positive,
            Outcome::Fail => Severity::Negative,
        }
    }
}

/// One labelled value of a chart series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartValue {
    pub category: &'static str,
    pub value: f32,
}

impl ChartValue {
    fn new(category: &'static str, value: f32) -> Self {
        Self { category, value }
    }
}

/// Everything a front end needs to render one prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionReport {
    pub record: Record,
    pub result: PredictionResult,
    /// Scaled internet-usage level for chart sizing.
    pub usage_intensity: f32,
    /// Hours studied next to score.
    pub study_vs_score: [ChartValue; 2],
    /// Usage intensity, attendance and sleep hours.
    pub category_mix: [ChartValue; 3],
}

impl PredictionReport {
    pub fn new(record: Record, result: PredictionResult) -> Self {
        let usage_intensity = usage_intensity(&record.internet_usage);
        let study_vs_score = [
            ChartValue::new(COL_HOURS_STUDIED, record.hours_studied),
            ChartValue::new(COL_SCORE, record.score),
        ];
        let category_mix = [
            ChartValue::new(COL_INTERNET_USAGE, usage_intensity),
            ChartValue::new(COL_ATTENDANCE, record.attendance),
            ChartValue::new(COL_SLEEP_HOURS, record.sleep_hours),
        ];
        Self {
            record,
            result,
            usage_intensity,
            study_vs_score,
            category_mix,
        }
    }
}

/// Scaled usage level for a raw label; unknown labels count as `Medium`.
pub fn usage_intensity(raw: &str) -> f32 {
    let normalized = capitalize(raw.trim());
    let level = USAGE_LEVELS
        .iter()
        .find(|(name, _)| *name == normalized)
        .map(|(_, level)| *level)
        .unwrap_or(DEFAULT_USAGE_LEVEL);
    level * USAGE_INTENSITY_SCALE
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(usage: &str) -> Record {
        Record {
            roll_no: 3,
            name: "Chen".into(),
            hours_studied: 3.0,
            sleep_hours: 6.5,
            attendance: 75.0,
            internet_usage: usage.into(),
            score: 55.0,
            result: Outcome::Pass,
        }
    }

    #[test]
    fn labels_map_to_fixed_verdicts() {
        let pass = PredictionResult::from_label(1);
        assert_eq!(pass.text(), "PASS");
        assert_eq!(pass.severity(), Severity::Positive);
        let fail = PredictionResult::from_label(0);
        assert_eq!(fail.text(), "FAIL");
        assert_eq!(fail.severity(), Severity::Negative);
    }

    #[test]
    fn usage_intensity_uses_scaled_levels() {
        assert_eq!(usage_intensity("Low"), 30.0);
        assert_eq!(usage_intensity("Medium"), 60.0);
        assert_eq!(usage_intensity("High"), 90.0);
        assert_eq!(usage_intensity("Extreme"), 60.0);
        assert_eq!(usage_intensity(""), 60.0);
    }

    #[test]
    fn usage_intensity_normalizes_case_and_whitespace() {
        assert_eq!(usage_intensity(" high "), 90.0);
        assert_eq!(usage_intensity("LOW"), 30.0);
    }

    #[test]
    fn report_collects_chart_series() {
        let report = PredictionReport::new(record("High"), PredictionResult::from_label(1));
        assert_eq!(report.usage_intensity, 90.0);
        assert_eq!(
            report.study_vs_score,
            [
                ChartValue::new("Hours_Studied", 3.0),
                ChartValue::new("Score", 55.0)
            ]
        );
        assert_eq!(
            report.category_mix,
            [
                ChartValue::new("Internet_Usage", 90.0),
                ChartValue::new("Attendance", 75.0),
                ChartValue::new("Sleep_Hours", 6.5)
            ]
        );
    }
}
