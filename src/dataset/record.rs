use serde::{Deserialize, Serialize};

/// Student identifier column.
pub const COL_ROLL_NO: &str = "Roll_No";
/// Student name column.
pub const COL_NAME: &str = "Name";
/// Weekly hours studied.
pub const COL_HOURS_STUDIED: &str = "Hours_Studied";
/// Average nightly sleep hours.
pub const COL_SLEEP_HOURS: &str = "Sleep_Hours";
/// Attendance percentage.
pub const COL_ATTENDANCE: &str = "Attendance";
/// Categorical internet-usage level.
pub const COL_INTERNET_USAGE: &str = "Internet_Usage";
/// Exam score.
pub const COL_SCORE: &str = "Score";
/// Pass/fail training target.
pub const COL_RESULT: &str = "Result";

/// Columns every dataset file must carry.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    COL_ROLL_NO,
    COL_NAME,
    COL_HOURS_STUDIED,
    COL_SLEEP_HOURS,
    COL_ATTENDANCE,
    COL_INTERNET_USAGE,
    COL_SCORE,
    COL_RESULT,
];

/// Number of `f32` values in a model feature vector.
pub const FEATURE_LEN: usize = 5;

/// Feature columns in model input order.
pub const FEATURE_NAMES: [&str; FEATURE_LEN] = [
    COL_HOURS_STUDIED,
    COL_SLEEP_HOURS,
    COL_ATTENDANCE,
    COL_INTERNET_USAGE,
    COL_SCORE,
];

/// Position of the encoded internet-usage value inside a feature vector.
pub const INTERNET_USAGE_FEATURE_INDEX: usize = 3;

/// Binary exam outcome. The discriminant is the model's class index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Fail = 0,
    Pass = 1,
}

impl Outcome {
    /// Class names indexed by label.
    pub const CLASS_NAMES: [&'static str; 2] = ["Fail", "Pass"];

    /// Class index used by the classifier.
    pub fn label(self) -> usize {
        self as usize
    }

    pub fn from_label(label: usize) -> Option<Self> {
        match label {
            0 => Some(Self::Fail),
            1 => Some(Self::Pass),
            _ => None,
        }
    }

    /// Parse a `Result` cell (`Pass`/`Fail`, `P`/`F`, `1`/`0`, any case).
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pass" | "p" | "1" => Some(Self::Pass),
            "fail" | "f" | "0" => Some(Self::Fail),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        Self::CLASS_NAMES[self.label()]
    }
}

/// One student row of the exam-performance dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub roll_no: i64,
    pub name: String,
    pub hours_studied: f32,
    pub sleep_hours: f32,
    /// Attendance percentage.
    pub attendance: f32,
    /// Raw category label, e.g. `Low`, `Medium` or `High`.
    pub internet_usage: String,
    pub score: f32,
    /// Training target; never part of the model input.
    pub result: Outcome,
}

impl Record {
    /// Build the model input, substituting the encoded internet-usage code.
    pub fn feature_row(&self, usage_code: usize) -> [f32; FEATURE_LEN] {
        [
            self.hours_studied,
            self.sleep_hours,
            self.attendance,
            usage_code as f32,
            self.score,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_parse_accepts_common_spellings() {
        assert_eq!(Outcome::parse("Pass"), Some(Outcome::Pass));
        assert_eq!(Outcome::parse(" FAIL "), Some(Outcome::Fail));
        assert_eq!(Outcome::parse("1"), Some(Outcome::Pass));
        assert_eq!(Outcome::parse("f"), Some(Outcome::Fail));
        assert_eq!(Outcome::parse("maybe"), None);
    }

    #[test]
    fn outcome_label_matches_class_names() {
        assert_eq!(Outcome::Fail.label(), 0);
        assert_eq!(Outcome::Pass.label(), 1);
        assert_eq!(Outcome::from_label(1), Some(Outcome::Pass));
        assert_eq!(Outcome::from_label(2), None);
        assert_eq!(Outcome::Pass.name(), "Pass");
    }

    #[test]
    fn feature_row_places_usage_code() {
        let record = Record {
            roll_no: 7,
            name: "Asha".into(),
            hours_studied: 4.5,
            sleep_hours: 7.0,
            attendance: 92.0,
            internet_usage: "Low".into(),
            score: 81.0,
            result: Outcome::Pass,
        };
        let row = record.feature_row(1);
        assert_eq!(row, [4.5, 7.0, 92.0, 1.0, 81.0]);
        assert_eq!(FEATURE_NAMES[INTERNET_USAGE_FEATURE_INDEX], COL_INTERNET_USAGE);
    }
}
