//! Error types for stress2health operations.
//!
//! Input validation errors (`InvalidCategory`, `OutOfRange`) are recoverable
//! and meant to be surfaced to the caller for a re-prompt. `ModelNotLoaded`
//! and `ArtifactMismatch` are fatal for the request that hit them.

use thiserror::Error;

/// Main error type for stress2health operations.
///
/// # Examples
///
/// ```
/// use stress2health::error::HealthError;
///
/// let err = HealthError::InvalidCategory {
///     field: "physical_activity".to_string(),
///     value: "extreme".to_string(),
/// };
/// assert!(err.to_string().contains("physical_activity"));
/// ```
#[derive(Debug, Error)]
pub enum HealthError {
    /// A categorical field is not one of low / medium / high.
    #[error("Invalid category for {field}: '{value}' (expected low, medium or high)")]
    InvalidCategory {
        /// Field name
        field: String,
        /// Rejected raw value
        value: String,
    },

    /// A numeric field falls outside its sane bound.
    #[error("Value out of range for {field}: {value} (expected {min}..={max})")]
    OutOfRange {
        /// Field name
        field: String,
        /// Rejected value
        value: f32,
        /// Inclusive lower bound
        min: f32,
        /// Inclusive upper bound
        max: f32,
    },

    /// The classifier was used before a model, scaler and label encoder were
    /// trained or loaded.
    #[error("Stress model not loaded: train or load an artifact bundle first")]
    ModelNotLoaded,

    /// Bundle artifacts disagree with each other.
    #[error("Artifact mismatch: {reason}")]
    ArtifactMismatch {
        /// What disagreed
        reason: String,
    },

    /// Stored checksum does not match the payload.
    #[error("Checksum mismatch in {artifact}: expected 0x{expected:08X}, got 0x{actual:08X}")]
    ChecksumMismatch {
        /// Artifact file name
        artifact: String,
        /// Stored checksum
        expected: u32,
        /// Recomputed checksum
        actual: u32,
    },

    /// Unsupported artifact format version.
    #[error("Unsupported artifact version: found {found}, supported {supported}")]
    UnsupportedVersion {
        /// Version found in the file
        found: u32,
        /// Version this build writes and reads
        supported: u32,
    },

    /// Matrix/vector dimensions don't match for the operation.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimensions description
        expected: String,
        /// Actual dimensions found
        actual: String,
    },

    /// Invalid hyperparameter value provided.
    #[error("Invalid hyperparameter: {param} = {value}, expected {constraint}")]
    InvalidHyperparameter {
        /// Parameter name
        param: String,
        /// Provided value
        value: String,
        /// Constraint description
        constraint: String,
    },

    /// Training data could not be parsed.
    #[error("Dataset error at line {line}: {message}")]
    Dataset {
        /// 1-based line number (header is line 1)
        line: usize,
        /// What went wrong
        message: String,
    },

    /// Configuration file could not be read, parsed or validated.
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// I/O error (file not found, permission denied, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic error with string message.
    #[error("{0}")]
    Other(String),
}

impl From<&str> for HealthError {
    fn from(msg: &str) -> Self {
        HealthError::Other(msg.to_string())
    }
}

impl From<String> for HealthError {
    fn from(msg: String) -> Self {
        HealthError::Other(msg)
    }
}

impl From<serde_json::Error> for HealthError {
    fn from(err: serde_json::Error) -> Self {
        HealthError::Serialization(err.to_string())
    }
}

impl From<bincode::Error> for HealthError {
    fn from(err: bincode::Error) -> Self {
        HealthError::Serialization(err.to_string())
    }
}

impl HealthError {
    /// Create a dimension mismatch error with descriptive context
    #[must_use]
    pub fn dimension_mismatch(context: &str, expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch {
            expected: format!("{context}={expected}"),
            actual: format!("{actual}"),
        }
    }

    /// Create an artifact mismatch error
    #[must_use]
    pub fn mismatch(reason: impl Into<String>) -> Self {
        Self::ArtifactMismatch {
            reason: reason.into(),
        }
    }

    /// Returns true for errors caused by user input that can be re-prompted.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            HealthError::InvalidCategory { .. } | HealthError::OutOfRange { .. }
        )
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, HealthError>;
