//! Raw extractor output and extraction provenance.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Text produced by one extractor for one PDF.
///
/// Transient: consumed by the viability check or the parser and never
/// persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawExtraction {
    /// Whether the extractor produced any text at all.
    pub success: bool,
    /// Extracted text (empty on failure).
    pub text: String,
    /// Number of pages the extractor saw.
    pub page_count: usize,
    /// Failure reason, if any.
    pub error: Option<String>,
}

impl RawExtraction {
    /// Successful extraction.
    pub fn ok(text: impl Into<String>, page_count: usize) -> Self {
        Self {
            success: true,
            text: text.into(),
            page_count,
            error: None,
        }
    }

    /// Failed extraction with a reason.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            text: String::new(),
            page_count: 0,
            error: Some(error.into()),
        }
    }

    /// Length of the trimmed text in characters.
    pub fn trimmed_len(&self) -> usize {
        self.text.trim().chars().count()
    }
}

/// Which extraction path produced the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExtractionMethod {
    /// Free text-layer extraction on the local machine.
    #[serde(rename = "local")]
    Local,
    /// Paid cloud OCR (Document AI).
    #[serde(rename = "cloud-ocr")]
    CloudOcr,
}

impl ExtractionMethod {
    /// Wire name of the method.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionMethod::Local => "local",
            ExtractionMethod::CloudOcr => "cloud-ocr",
        }
    }

    /// Whether documents handled by this method cost money.
    pub fn is_paid(&self) -> bool {
        matches!(self, ExtractionMethod::CloudOcr)
    }
}

impl fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
