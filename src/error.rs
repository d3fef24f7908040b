//! Error handling for the resume checker

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResumeCheckerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Could not decode file: {0}")]
    CorruptFile(String),

    #[error("Text extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("File is too large: {size} bytes (limit {limit} bytes)")]
    FileTooLarge { size: u64, limit: u64 },

    #[error("Missing required fields: {0}")]
    MissingRequiredFields(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Document generation error: {0}")]
    DocumentGeneration(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl ResumeCheckerError {
    /// Errors scoped to a single analysis session; retrying with new input recovers.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, ResumeCheckerError::Io(_) | ResumeCheckerError::Configuration(_))
    }
}

pub type Result<T> = std::result::Result<T, ResumeCheckerError>;

/// Convert anyhow errors to our custom error type
impl From<anyhow::Error> for ResumeCheckerError {
    fn from(err: anyhow::Error) -> Self {
        ResumeCheckerError::InvalidInput(err.to_string())
    }
}

/// Convert printpdf errors to our custom error type
impl From<printpdf::Error> for ResumeCheckerError {
    fn from(err: printpdf::Error) -> Self {
        ResumeCheckerError::DocumentGeneration(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_classification() {
        assert!(ResumeCheckerError::UnsupportedFormat("x.txt".into()).is_recoverable());
        assert!(ResumeCheckerError::MissingRequiredFields("name".into()).is_recoverable());
        assert!(!ResumeCheckerError::Configuration("bad".into()).is_recoverable());
    }

    #[test]
    fn test_file_too_large_message() {
        let err = ResumeCheckerError::FileTooLarge { size: 20, limit: 10 };
        assert_eq!(err.to_string(), "File is too large: 20 bytes (limit 10 bytes)");
    }
}
