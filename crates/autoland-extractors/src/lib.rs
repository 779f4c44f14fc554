//! autoland-extractors - Text extraction for autoland report PDFs.
//!
//! Provides a local text-layer extractor (pdf-extract), a Google Document AI
//! OCR extractor, and the [`HybridParser`] that tries the free path first and
//! only pays for OCR when the local text is unusable.
//!
//! # Example
//!
//! ```ignore
//! use autoland_core::AutolandConfig;
//! use autoland_extractors::ExtractorFactory;
//!
//! let config = AutolandConfig::from_env()?;
//! let parser = ExtractorFactory::hybrid(&config);
//!
//! let result = parser.parse_with_fallback(&pdf_bytes).await;
//! println!("{} via {}", result.success, result.method);
//! ```

mod error;
mod factory;

pub mod document_ai;
pub mod hybrid;
pub mod metrics;
pub mod pdf;

pub use document_ai::DocumentAiExtractor;
pub use error::{ExtractError, ExtractResult};
pub use factory::ExtractorFactory;
pub use hybrid::{
    CostMetrics, FallbackAttempt, HybridParseResult, HybridParser, ParsingAttempts, StageAttempt,
};
pub use metrics::{calculate_cost_savings, CostSavingsMetrics};
pub use pdf::{clean_extracted_text, PdfTextExtractor};

use async_trait::async_trait;
use autoland_core::{ExtractionMethod, RawExtraction};

/// Source of report text - all extractors implement this.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Extract text from PDF bytes.
    ///
    /// `Ok` with an unsuccessful [`RawExtraction`] means the document was read
    /// but carried no usable text. `Err` means the extractor itself failed.
    async fn extract(&self, content: &[u8]) -> ExtractResult<RawExtraction>;

    /// Which pipeline path this extractor represents.
    fn method(&self) -> ExtractionMethod;
}
