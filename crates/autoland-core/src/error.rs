//! Error types for autoland operations.
//!
//! [`AutolandError`] covers configuration loading failures raised by this
//! crate. [`FailureKind`] is the classification attached to pipeline outcomes
//! so callers can tell a bad document apart from a misconfigured system.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for autoland operations.
pub type AutolandResult<T> = Result<T, AutolandError>;

/// Main error type for the core crate.
#[derive(Error, Debug)]
pub enum AutolandError {
    /// A configuration value is missing or out of range.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A configuration file in a format that cannot be loaded.
    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error codes for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Configuration (CFG_xxx)
    CfgInvalidFormat,
    CfgInvalidValue,

    // IO
    Io,
}

impl ErrorCode {
    /// Get the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::CfgInvalidFormat => "CFG_001",
            ErrorCode::CfgInvalidValue => "CFG_002",
            ErrorCode::Io => "IO_001",
        }
    }
}

impl AutolandError {
    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Configuration(_) => ErrorCode::CfgInvalidValue,
            Self::UnsupportedFormat(_) => ErrorCode::CfgInvalidFormat,
            Self::Io(_) => ErrorCode::Io,
        }
    }

    /// Get a user-friendly suggestion for resolving this error.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::Configuration(_) => {
                Some("Check DOCUMENT_AI_PROCESSOR_ID and the autoland configuration file")
            }
            Self::UnsupportedFormat(_) => Some("Use a .toml, .json, .yaml or .yml file"),
            Self::Io(_) => None,
        }
    }
}

/// Why a pipeline stage or a whole pipeline run failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Empty input handed to an extractor.
    InvalidInput,
    /// An extractor could not produce text.
    ExtractionFailure,
    /// Text was extracted but is too short to be worth parsing.
    NotViable,
    /// Required fields were missing after every pattern was tried.
    ParseFailure,
    /// The OCR path is not configured.
    Configuration,
}

impl FailureKind {
    /// Whether an operator has to act before a resubmission can succeed.
    pub fn is_operator_error(&self) -> bool {
        matches!(self, FailureKind::Configuration)
    }
}
