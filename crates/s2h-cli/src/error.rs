//! Error types for s2h.

use std::path::PathBuf;
use std::process::ExitCode;

use stress2health::HealthError;
use thiserror::Error;

/// Result type alias for CLI operations
pub(crate) type Result<T> = std::result::Result<T, CliError>;

/// CLI error types
#[derive(Error, Debug)]
pub(crate) enum CliError {
    /// Input file does not exist
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// A user-supplied value was rejected
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Training data could not be parsed
    #[error("Invalid dataset: {0}")]
    Dataset(String),

    /// Configuration could not be loaded
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Bundle is missing, corrupted or inconsistent
    #[error("Invalid model bundle: {0}")]
    Bundle(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Output encoding failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Anything else from the library
    #[error("{0}")]
    Health(String),
}

impl CliError {
    /// Get exit code for this error
    pub(crate) fn exit_code(&self) -> ExitCode {
        match self {
            Self::Health(_) => ExitCode::from(1),
            Self::InvalidInput(_) => ExitCode::from(2),
            Self::FileNotFound(_) => ExitCode::from(3),
            Self::Dataset(_) => ExitCode::from(4),
            Self::Config(_) => ExitCode::from(5),
            Self::Bundle(_) => ExitCode::from(6),
            Self::Io(_) => ExitCode::from(7),
            Self::Json(_) => ExitCode::from(8),
        }
    }
}

impl From<HealthError> for CliError {
    fn from(e: HealthError) -> Self {
        match e {
            HealthError::InvalidCategory { .. }
            | HealthError::OutOfRange { .. }
            | HealthError::InvalidHyperparameter { .. } => Self::InvalidInput(e.to_string()),
            HealthError::Dataset { .. } => Self::Dataset(e.to_string()),
            HealthError::Config { .. } => Self::Config(e.to_string()),
            HealthError::ModelNotLoaded
            | HealthError::ArtifactMismatch { .. }
            | HealthError::ChecksumMismatch { .. }
            | HealthError::UnsupportedVersion { .. } => Self::Bundle(e.to_string()),
            HealthError::Io(io) => Self::Io(io),
            other => Self::Health(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct() {
        let errors = [
            CliError::Health("x".into()),
            CliError::InvalidInput("x".into()),
            CliError::FileNotFound(PathBuf::from("x")),
            CliError::Dataset("x".into()),
            CliError::Config("x".into()),
            CliError::Bundle("x".into()),
        ];
        let codes: Vec<String> = errors.iter().map(|e| format!("{:?}", e.exit_code())).collect();
        for (i, a) in codes.iter().enumerate() {
            for b in &codes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_health_error_mapping() {
        let e: CliError = HealthError::InvalidCategory {
            field: "physical_activity".into(),
            value: "lots".into(),
        }
        .into();
        assert!(matches!(e, CliError::InvalidInput(_)));

        let e: CliError = HealthError::mismatch("missing model.s2h").into();
        assert!(matches!(e, CliError::Bundle(_)));
        assert!(e.to_string().contains("model.s2h"));

        let e: CliError = HealthError::Dataset {
            line: 3,
            message: "bad".into(),
        }
        .into();
        assert!(matches!(e, CliError::Dataset(_)));
    }
}
