//! Extraction error types.

use autoland_core::FailureKind;
use thiserror::Error;

/// Errors that can occur during text extraction.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// The caller handed over something that cannot be a document.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The extractor is missing settings or credentials.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Remote OCR service failure.
    #[error("Service error: {0}")]
    Service(String),

    /// PDF-specific extraction error.
    #[error("PDF extraction error: {0}")]
    Pdf(String),

    /// Task join error from spawn_blocking.
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl ExtractError {
    /// Classification reported on a failed pipeline run.
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            Self::InvalidInput(_) => FailureKind::InvalidInput,
            Self::Configuration(_) => FailureKind::Configuration,
            Self::Service(_) | Self::Pdf(_) | Self::TaskJoin(_) => FailureKind::ExtractionFailure,
        }
    }
}

/// Result type for extraction operations.
pub type ExtractResult<T> = Result<T, ExtractError>;
