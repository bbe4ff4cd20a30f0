//! CSV loader for exam-performance datasets.

use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use csv::StringRecord;
use thiserror::Error;
use tracing::{info, warn};

use super::record::{
    COL_ATTENDANCE, COL_HOURS_STUDIED, COL_INTERNET_USAGE, COL_NAME, COL_RESULT, COL_ROLL_NO,
    COL_SCORE, COL_SLEEP_HOURS, Outcome, REQUIRED_COLUMNS, Record,
};

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Failed to open dataset {path}: {source}")]
    Open { path: PathBuf, source: csv::Error },
    #[error("Failed to read dataset header: {0}")]
    Header(csv::Error),
    #[error("Dataset is missing required column `{column}`")]
    MissingColumn { column: &'static str },
    #[error("Malformed row on line {line}: {source}")]
    Row { line: u64, source: csv::Error },
    #[error("Invalid value {value:?} for `{column}` on line {line}")]
    InvalidValue {
        line: u64,
        column: &'static str,
        value: String,
    },
    #[error("Dataset contains no rows")]
    Empty,
}

/// Immutable, loaded dataset with an identifier index.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<Record>,
    index: HashMap<i64, usize>,
    duplicate_ids: Vec<i64>,
}

impl Dataset {
    /// Index records by identifier; the first row wins for duplicated ids.
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut index = HashMap::with_capacity(records.len());
        let mut duplicate_ids = Vec::new();
        for (row, record) in records.iter().enumerate() {
            if index.contains_key(&record.roll_no) {
                warn!(
                    roll_no = record.roll_no,
                    row, "Duplicate Roll_No; keeping the first occurrence"
                );
                duplicate_ids.push(record.roll_no);
                continue;
            }
            index.insert(record.roll_no, row);
        }
        Self {
            records,
            index,
            duplicate_ids,
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Find the record with an exactly matching identifier.
    pub fn find(&self, roll_no: i64) -> Option<&Record> {
        self.index.get(&roll_no).map(|&row| &self.records[row])
    }

    /// Identifiers that appeared more than once, in file order.
    pub fn duplicate_ids(&self) -> &[i64] {
        &self.duplicate_ids
    }

    /// Internet-usage labels of every row, in file order.
    pub fn internet_usage_values(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|record| record.internet_usage.as_str())
    }
}

/// Load a dataset CSV file from disk.
pub fn load_dataset(path: &Path) -> Result<Dataset, DatasetError> {
    let reader = csv_builder()
        .from_path(path)
        .map_err(|source| DatasetError::Open {
            path: path.to_path_buf(),
            source,
        })?;
    let dataset = read_records(reader)?;
    info!(
        "Loaded {} records from {}",
        dataset.len(),
        path.display()
    );
    Ok(dataset)
}

/// Load a dataset from any CSV byte stream.
pub fn load_dataset_from_reader<R: Read>(reader: R) -> Result<Dataset, DatasetError> {
    read_records(csv_builder().from_reader(reader))
}

fn csv_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder.trim(csv::Trim::All).has_headers(true);
    builder
}

fn read_records<R: Read>(mut reader: csv::Reader<R>) -> Result<Dataset, DatasetError> {
    let headers = reader.headers().map_err(DatasetError::Header)?.clone();
    let columns = ColumnIndex::resolve(&headers)?;

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|source| DatasetError::Row {
            line: source.position().map(|pos| pos.line()).unwrap_or(0),
            source,
        })?;
        records.push(columns.parse_row(&row)?);
    }
    if records.is_empty() {
        return Err(DatasetError::Empty);
    }
    Ok(Dataset::from_records(records))
}

/// Header positions of the required columns; extra columns are ignored.
struct ColumnIndex {
    positions: [usize; REQUIRED_COLUMNS.len()],
}

impl ColumnIndex {
    fn resolve(headers: &StringRecord) -> Result<Self, DatasetError> {
        let mut positions = [0usize; REQUIRED_COLUMNS.len()];
        for (slot, column) in positions.iter_mut().zip(REQUIRED_COLUMNS) {
            *slot = headers
                .iter()
                .position(|header| header == column)
                .ok_or(DatasetError::MissingColumn { column })?;
        }
        Ok(Self { positions })
    }

    fn cell<'r>(&self, row: &'r StringRecord, column: &'static str) -> &'r str {
        let slot = REQUIRED_COLUMNS
            .iter()
            .position(|name| *name == column)
            .unwrap_or(0);
        row.get(self.positions[slot]).unwrap_or("")
    }

    fn parse_row(&self, row: &StringRecord) -> Result<Record, DatasetError> {
        let line = row.position().map(|pos| pos.line()).unwrap_or(0);
        let result_raw = self.cell(row, COL_RESULT);
        let result = Outcome::parse(result_raw).ok_or_else(|| DatasetError::InvalidValue {
            line,
            column: COL_RESULT,
            value: result_raw.to_string(),
        })?;
        let internet_usage = self.cell(row, COL_INTERNET_USAGE);
        if internet_usage.is_empty() {
            return Err(DatasetError::InvalidValue {
                line,
                column: COL_INTERNET_USAGE,
                value: String::new(),
            });
        }
        Ok(Record {
            roll_no: parse_cell(self.cell(row, COL_ROLL_NO), COL_ROLL_NO, line)?,
            name: self.cell(row, COL_NAME).to_string(),
            hours_studied: parse_number(self.cell(row, COL_HOURS_STUDIED), COL_HOURS_STUDIED, line)?,
            sleep_hours: parse_number(self.cell(row, COL_SLEEP_HOURS), COL_SLEEP_HOURS, line)?,
            attendance: parse_number(self.cell(row, COL_ATTENDANCE), COL_ATTENDANCE, line)?,
            internet_usage: internet_usage.to_string(),
            score: parse_number(self.cell(row, COL_SCORE), COL_SCORE, line)?,
            result,
        })
    }
}

fn parse_cell<T: FromStr>(raw: &str, column: &'static str, line: u64) -> Result<T, DatasetError> {
    raw.parse::<T>().map_err(|_| DatasetError::InvalidValue {
        line,
        column,
        value: raw.to_string(),
    })
}

fn parse_number(raw: &str, column: &'static str, line: u64) -> Result<f32, DatasetError> {
    let value: f32 = parse_cell(raw, column, line)?;
    if !value.is_finite() {
        return Err(DatasetError::InvalidValue {
            line,
            column,
            value: raw.to_string(),
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const SAMPLE: &str = "\
Roll_No,Name,Hours_Studied,Sleep_Hours,Attendance,Internet_Usage,Score,Result
1,Asha,5.5,7,91,Low,78,Pass
2,Ben,1.0,5.5,60,High,32,Fail
3,Chen,3.0,6,75,Medium,55,Pass
";

    #[test]
    fn loads_rows_and_indexes_ids() {
        let dataset = load_dataset_from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(dataset.len(), 3);
        let ben = dataset.find(2).unwrap();
        assert_eq!(ben.name, "Ben");
        assert_eq!(ben.internet_usage, "High");
        assert_eq!(ben.result, Outcome::Fail);
        assert!(dataset.find(99).is_none());
    }

    #[test]
    fn column_order_is_free_and_extra_columns_are_ignored() {
        let csv = "\
Result,Score,Internet_Usage,Attendance,Sleep_Hours,Hours_Studied,Name,Roll_No,Notes
Pass, 80 , Low ,90,8,6,Dee,4,ignored
";
        let dataset = load_dataset_from_reader(csv.as_bytes()).unwrap();
        let dee = dataset.find(4).unwrap();
        assert_eq!(dee.score, 80.0);
        assert_eq!(dee.internet_usage, "Low");
        assert_eq!(dee.hours_studied, 6.0);
    }

    #[test]
    fn missing_column_is_reported_by_name() {
        let csv = "Roll_No,Name,Hours_Studied,Sleep_Hours,Attendance,Score,Result\n1,A,1,1,1,1,Pass\n";
        let err = load_dataset_from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            DatasetError::MissingColumn {
                column: COL_INTERNET_USAGE
            }
        ));
    }

    #[test]
    fn invalid_cells_report_line_and_column() {
        let csv = "\
Roll_No,Name,Hours_Studied,Sleep_Hours,Attendance,Internet_Usage,Score,Result
1,A,lots,7,90,Low,70,Pass
";
        match load_dataset_from_reader(csv.as_bytes()).unwrap_err() {
            DatasetError::InvalidValue {
                line,
                column,
                value,
            } => {
                assert_eq!(line, 2);
                assert_eq!(column, COL_HOURS_STUDIED);
                assert_eq!(value, "lots");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_finite_numbers_and_unknown_results_are_rejected() {
        let nan = "\
Roll_No,Name,Hours_Studied,Sleep_Hours,Attendance,Internet_Usage,Score,Result
1,A,NaN,7,90,Low,70,Pass
";
        assert!(matches!(
            load_dataset_from_reader(nan.as_bytes()),
            Err(DatasetError::InvalidValue { .. })
        ));
        let result = "\
Roll_No,Name,Hours_Studied,Sleep_Hours,Attendance,Internet_Usage,Score,Result
1,A,1,7,90,Low,70,Absent
";
        assert!(matches!(
            load_dataset_from_reader(result.as_bytes()),
            Err(DatasetError::InvalidValue {
                column: COL_RESULT,
                ..
            })
        ));
    }

    #[test]
    fn header_only_file_is_empty() {
        let csv = "Roll_No,Name,Hours_Studied,Sleep_Hours,Attendance,Internet_Usage,Score,Result\n";
        assert!(matches!(
            load_dataset_from_reader(csv.as_bytes()),
            Err(DatasetError::Empty)
        ));
    }

    #[test]
    fn duplicate_ids_keep_first_row() {
        let csv = "\
Roll_No,Name,Hours_Studied,Sleep_Hours,Attendance,Internet_Usage,Score,Result
5,First,1,7,90,Low,70,Pass
5,Second,2,6,80,High,40,Fail
";
        let dataset = load_dataset_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.find(5).unwrap().name, "First");
        assert_eq!(dataset.duplicate_ids(), &[5]);
    }

    #[test]
    fn load_from_path_and_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.csv");
        std::fs::write(&path, SAMPLE).unwrap();
        assert_eq!(load_dataset(&path).unwrap().len(), 3);
        assert!(matches!(
            load_dataset(&dir.path().join("missing.csv")),
            Err(DatasetError::Open { .. })
        ));
    }
}
