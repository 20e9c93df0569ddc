//! Labelled lifestyle samples read from CSV.
//!
//! Required columns (any order, extra columns ignored): `sleep_hours`,
//! `physical_activity`, `work_hours`, `social_interaction`, `stress_level`.
//! `bmi` is optional because the classifier never looks at it; rows without
//! one get [`DEFAULT_BMI`].

use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::encoder::{Level, LifestyleSample};
use crate::error::{HealthError, Result};

/// BMI used for rows that do not provide one.
pub const DEFAULT_BMI: f32 = 22.0;

const REQUIRED_COLUMNS: [&str; 5] = [
    "sleep_hours",
    "physical_activity",
    "work_hours",
    "social_interaction",
    "stress_level",
];

/// One training example.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "UncheckedLabeledSample")]
pub struct LabeledSample {
    /// Lifestyle inputs
    pub sample: LifestyleSample,
    /// Stress label as written in the data, trimmed and lowercased
    pub label: String,
}

#[derive(Deserialize)]
struct UncheckedLabeledSample {
    sample: LifestyleSample,
    label: String,
}

impl From<UncheckedLabeledSample> for LabeledSample {
    fn from(raw: UncheckedLabeledSample) -> Self {
        Self::new(raw.sample, raw.label)
    }
}

impl LabeledSample {
    /// Pairs a sample with its label.
    #[must_use]
    pub fn new(sample: LifestyleSample, label: impl Into<String>) -> Self {
        Self {
            sample,
            label: label.into().trim().to_ascii_lowercase(),
        }
    }

    /// Convenience for labels that are stress levels.
    #[must_use]
    pub fn with_level(sample: LifestyleSample, level: Level) -> Self {
        Self::new(sample, level.as_str())
    }
}

/// Column positions resolved from the header row.
struct Columns {
    sleep: usize,
    activity: usize,
    work: usize,
    social: usize,
    stress: usize,
    bmi: Option<usize>,
}

impl Columns {
    fn resolve(headers: &csv::StringRecord) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        let mut found = [0usize; REQUIRED_COLUMNS.len()];
        for (slot, name) in found.iter_mut().zip(REQUIRED_COLUMNS) {
            *slot = find(name).ok_or_else(|| HealthError::Dataset {
                line: 1,
                message: format!(
                    "missing column '{name}' (found: {})",
                    headers.iter().collect::<Vec<_>>().join(", ")
                ),
            })?;
        }
        Ok(Self {
            sleep: found[0],
            activity: found[1],
            work: found[2],
            social: found[3],
            stress: found[4],
            bmi: find("bmi"),
        })
    }
}

fn field<'r>(record: &'r csv::StringRecord, idx: usize, line: usize, name: &str) -> Result<&'r str> {
    record
        .get(idx)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| HealthError::Dataset {
            line,
            message: format!("empty value for '{name}'"),
        })
}

fn number(record: &csv::StringRecord, idx: usize, line: usize, name: &str) -> Result<f32> {
    let raw = field(record, idx, line, name)?;
    raw.parse::<f32>().map_err(|e| HealthError::Dataset {
        line,
        message: format!("'{name}' = '{raw}': {e}"),
    })
}

fn parse_row(record: &csv::StringRecord, cols: &Columns, line: usize) -> Result<LabeledSample> {
    let sleep = number(record, cols.sleep, line, "sleep_hours")?;
    let work = number(record, cols.work, line, "work_hours")?;
    let bmi = match cols.bmi {
        Some(idx) => number(record, idx, line, "bmi")?,
        None => DEFAULT_BMI,
    };
    let activity = field(record, cols.activity, line, "physical_activity")?;
    let social = field(record, cols.social, line, "social_interaction")?;
    let label = field(record, cols.stress, line, "stress_level")?;

    let sample = LifestyleSample::from_raw(sleep, bmi, activity, work, social).map_err(|e| {
        HealthError::Dataset {
            line,
            message: e.to_string(),
        }
    })?;
    Ok(LabeledSample::new(sample, label))
}

/// Reads labelled samples from any CSV source.
///
/// # Errors
///
/// Returns [`HealthError::Dataset`] with the 1-based line of the first bad
/// row, or when the header lacks a required column or no rows follow it.
pub fn read_samples<R: Read>(reader: R) -> Result<Vec<LabeledSample>> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = reader
        .headers()
        .map_err(|e| HealthError::Dataset {
            line: 1,
            message: format!("failed to read header: {e}"),
        })?
        .clone();
    let cols = Columns::resolve(&headers)?;

    let mut samples = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let line = i + 2;
        let record = result.map_err(|e| HealthError::Dataset {
            line,
            message: format!("failed to read row: {e}"),
        })?;
        samples.push(parse_row(&record, &cols, line)?);
    }

    if samples.is_empty() {
        return Err(HealthError::Dataset {
            line: 1,
            message: "no data rows after header".to_string(),
        });
    }
    tracing::debug!(rows = samples.len(), "dataset parsed");
    Ok(samples)
}

/// Loads labelled samples from a CSV file.
///
/// # Errors
///
/// Returns [`HealthError::Io`] if the file cannot be opened, otherwise as
/// [`read_samples`].
pub fn load_csv(path: impl AsRef<Path>) -> Result<Vec<LabeledSample>> {
    let file = std::fs::File::open(path.as_ref())?;
    read_samples(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "sleep_hours,bmi,physical_activity,work_hours,social_interaction,stress_level";

    #[test]
    fn test_read_samples() {
        let data = format!("{HEADER}\n7.5,22.0,high,8,medium,Low\n4.0,31.0,low,12,low,high\n");
        let samples = read_samples(data.as_bytes()).expect("parse");
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].label, "low");
        assert!((samples[1].sample.bmi() - 31.0).abs() < 1e-6);
        assert_eq!(samples[1].sample.physical_activity(), Level::Low);
    }

    #[test]
    fn test_deserialize_normalizes_label() {
        let json = r#"{"sample":{"sleep_hours":5.0,"bmi":27.0,"physical_activity":"low","work_hours":11.0,"social_interaction":"low"},"label":"  High "}"#;
        let sample: LabeledSample = serde_json::from_str(json).expect("deserialize");
        assert_eq!(sample.label, "high");

        let bad = json.replace("\"sleep_hours\":5.0", "\"sleep_hours\":-3.0");
        assert!(serde_json::from_str::<LabeledSample>(&bad).is_err());
    }

    #[test]
    fn test_bmi_column_optional() {
        let data = "stress_level,work_hours,sleep_hours,social_interaction,physical_activity\n\
                    medium,9,6.5,high,medium\n";
        let samples = read_samples(data.as_bytes()).expect("parse");
        assert!((samples[0].sample.bmi() - DEFAULT_BMI).abs() < 1e-6);
        assert!((samples[0].sample.work_hours() - 9.0).abs() < 1e-6);
    }

    #[test]
    fn test_missing_column() {
        let data = "sleep_hours,physical_activity,work_hours,stress_level\n7,low,8,low\n";
        let err = read_samples(data.as_bytes()).unwrap_err();
        assert!(matches!(err, HealthError::Dataset { line: 1, .. }));
        assert!(err.to_string().contains("social_interaction"));
    }

    #[test]
    fn test_bad_category_reports_line() {
        let data = format!("{HEADER}\n7,22,high,8,low,low\n7,22,extreme,8,low,low\n");
        match read_samples(data.as_bytes()) {
            Err(HealthError::Dataset { line, message }) => {
                assert_eq!(line, 3);
                assert!(message.contains("extreme"));
            }
            other => panic!("expected dataset error, got {other:?}"),
        }
    }

    #[test]
    fn test_bad_number_and_range() {
        let data = format!("{HEADER}\nseven,22,high,8,low,low\n");
        assert!(matches!(
            read_samples(data.as_bytes()),
            Err(HealthError::Dataset { line: 2, .. })
        ));

        let data = format!("{HEADER}\n30,22,high,8,low,low\n");
        let err = read_samples(data.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("sleep_hours"));
    }

    #[test]
    fn test_empty_dataset() {
        let err = read_samples(format!("{HEADER}\n").as_bytes()).unwrap_err();
        assert!(err.to_string().contains("no data rows"));
    }

    #[test]
    fn test_load_csv_file() {
        let mut file = NamedTempFile::new().expect("temp file");
        writeln!(file, "{HEADER}").expect("write header");
        writeln!(file, "8,24,medium,7,high,low").expect("write row");
        let samples = load_csv(file.path()).expect("load");
        assert_eq!(samples.len(), 1);

        assert!(matches!(
            load_csv("/definitely/not/here.csv"),
            Err(HealthError::Io(_))
        ));
    }
}
