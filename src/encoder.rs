//! Lifestyle feature encoding.
//!
//! Turns a validated lifestyle record into the fixed four-column feature
//! vector every classifier is trained on:
//!
//! ```text
//! [sleep_hours, physical_activity_code, work_hours, social_interaction_code]
//! ```
//!
//! BMI is deliberately not a classifier feature. It only feeds the risk engine.
//!
//! # Example
//!
//! ```
//! use stress2health::encoder::{encode, LifestyleSample, Level};
//!
//! let sample = LifestyleSample::new(7.5, 23.0, Level::Medium, 8.0, Level::High)
//!     .expect("values are in range");
//! assert_eq!(encode(&sample), [7.5, 1.0, 8.0, 2.0]);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{HealthError, Result};

/// Number of classifier input features.
pub const N_FEATURES: usize = 4;

/// Column names in encoding order.
pub const FEATURE_NAMES: [&str; N_FEATURES] = [
    "sleep_hours",
    "physical_activity",
    "work_hours",
    "social_interaction",
];

/// Encoded classifier input, in [`FEATURE_NAMES`] order.
pub type FeatureVector = [f32; N_FEATURES];

/// Accepted sleep range in hours per night.
pub const SLEEP_HOURS_RANGE: (f32, f32) = (0.0, 24.0);
/// Accepted BMI range.
pub const BMI_RANGE: (f32, f32) = (10.0, 50.0);
/// Accepted work range in hours per day.
pub const WORK_HOURS_RANGE: (f32, f32) = (0.0, 24.0);

/// Three-step ordinal scale shared by physical activity, social interaction
/// and stress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    /// Low
    Low,
    /// Medium
    Medium,
    /// High
    High,
}

impl Level {
    /// All levels in ordinal order.
    pub const ALL: [Level; 3] = [Level::Low, Level::Medium, Level::High];

    /// Parses a level for the named field, trimming and ignoring case.
    ///
    /// # Errors
    ///
    /// Returns [`HealthError::InvalidCategory`] naming `field` when the value
    /// is not low, medium or high.
    pub fn parse_field(field: &str, value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Level::Low),
            "medium" => Ok(Level::Medium),
            "high" => Ok(Level::High),
            _ => Err(HealthError::InvalidCategory {
                field: field.to_string(),
                value: value.to_string(),
            }),
        }
    }

    /// Parses a level without a field name attached.
    ///
    /// # Errors
    ///
    /// Returns [`HealthError::InvalidCategory`] for unknown values.
    pub fn parse(value: &str) -> Result<Self> {
        Self::parse_field("level", value)
    }

    /// Ordinal code: low = 0, medium = 1, high = 2.
    #[must_use]
    pub fn code(self) -> f32 {
        match self {
            Level::Low => 0.0,
            Level::Medium => 1.0,
            Level::High => 2.0,
        }
    }

    /// Lowercase name as used in data files and labels.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Low => "low",
            Level::Medium => "medium",
            Level::High => "high",
        }
    }
}

impl FromStr for Level {
    type Err = HealthError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn check_range(field: &str, value: f32, (min, max): (f32, f32)) -> Result<f32> {
    // NaN fails both comparisons, so test the accepted interval positively
    if value.is_finite() && value >= min && value <= max {
        Ok(value)
    } else {
        Err(HealthError::OutOfRange {
            field: field.to_string(),
            value,
            min,
            max,
        })
    }
}

/// Validates hours of sleep per night.
///
/// # Errors
///
/// Returns [`HealthError::OutOfRange`] outside `0..=24` or for non-finite input.
pub fn validate_sleep_hours(value: f32) -> Result<f32> {
    check_range("sleep_hours", value, SLEEP_HOURS_RANGE)
}

/// Validates body mass index.
///
/// # Errors
///
/// Returns [`HealthError::OutOfRange`] outside `10..=50` or for non-finite input.
pub fn validate_bmi(value: f32) -> Result<f32> {
    check_range("bmi", value, BMI_RANGE)
}

/// Validates work hours per day.
///
/// # Errors
///
/// Returns [`HealthError::OutOfRange`] outside `0..=24` or for non-finite input.
pub fn validate_work_hours(value: f32) -> Result<f32> {
    check_range("work_hours", value, WORK_HOURS_RANGE)
}

/// One user's self-reported lifestyle record.
///
/// Fields are private so a sample can only be built through the validating
/// constructors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "UncheckedSample")]
pub struct LifestyleSample {
    sleep_hours: f32,
    bmi: f32,
    physical_activity: Level,
    work_hours: f32,
    social_interaction: Level,
}

/// Wire shape of [`LifestyleSample`] before range checks.
#[derive(Deserialize)]
struct UncheckedSample {
    sleep_hours: f32,
    bmi: f32,
    physical_activity: Level,
    work_hours: f32,
    social_interaction: Level,
}

impl TryFrom<UncheckedSample> for LifestyleSample {
    type Error = HealthError;

    fn try_from(raw: UncheckedSample) -> Result<Self> {
        Self::new(
            raw.sleep_hours,
            raw.bmi,
            raw.physical_activity,
            raw.work_hours,
            raw.social_interaction,
        )
    }
}

impl LifestyleSample {
    /// Builds a validated sample.
    ///
    /// # Errors
    ///
    /// Returns [`HealthError::OutOfRange`] for the first numeric field outside
    /// its accepted range.
    pub fn new(
        sleep_hours: f32,
        bmi: f32,
        physical_activity: Level,
        work_hours: f32,
        social_interaction: Level,
    ) -> Result<Self> {
        Ok(Self {
            sleep_hours: validate_sleep_hours(sleep_hours)?,
            bmi: validate_bmi(bmi)?,
            physical_activity,
            work_hours: validate_work_hours(work_hours)?,
            social_interaction,
        })
    }

    /// Builds a sample from free-text categories.
    ///
    /// # Errors
    ///
    /// Returns [`HealthError::InvalidCategory`] or [`HealthError::OutOfRange`].
    pub fn from_raw(
        sleep_hours: f32,
        bmi: f32,
        physical_activity: &str,
        work_hours: f32,
        social_interaction: &str,
    ) -> Result<Self> {
        let physical_activity = Level::parse_field("physical_activity", physical_activity)?;
        let social_interaction = Level::parse_field("social_interaction", social_interaction)?;
        Self::new(
            sleep_hours,
            bmi,
            physical_activity,
            work_hours,
            social_interaction,
        )
    }

    /// Hours of sleep per night.
    #[must_use]
    pub fn sleep_hours(&self) -> f32 {
        self.sleep_hours
    }

    /// Body mass index.
    #[must_use]
    pub fn bmi(&self) -> f32 {
        self.bmi
    }

    /// Physical activity level.
    #[must_use]
    pub fn physical_activity(&self) -> Level {
        self.physical_activity
    }

    /// Work hours per day.
    #[must_use]
    pub fn work_hours(&self) -> f32 {
        self.work_hours
    }

    /// Social interaction level.
    #[must_use]
    pub fn social_interaction(&self) -> Level {
        self.social_interaction
    }
}

/// Encodes a sample into the classifier feature vector.
#[must_use]
pub fn encode(sample: &LifestyleSample) -> FeatureVector {
    [
        sample.sleep_hours,
        sample.physical_activity.code(),
        sample.work_hours,
        sample.social_interaction.code(),
    ]
}

/// Encodes raw values with string categories.
///
/// # Errors
///
/// Returns [`HealthError::OutOfRange`] for sleep or work hours outside
/// `0..=24` (including NaN), or [`HealthError::InvalidCategory`] for an
/// unknown category.
pub fn encode_raw(
    sleep_hours: f32,
    physical_activity: &str,
    work_hours: f32,
    social_interaction: &str,
) -> Result<FeatureVector> {
    Ok([
        validate_sleep_hours(sleep_hours)?,
        Level::parse_field("physical_activity", physical_activity)?.code(),
        validate_work_hours(work_hours)?,
        Level::parse_field("social_interaction", social_interaction)?.code(),
    ])
}
