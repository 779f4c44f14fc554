//! Factory for creating extractors and hybrid parsers.

use std::sync::Arc;

use autoland_core::{AutolandConfig, DocumentAiConfig, ReportParser};

use crate::document_ai::DocumentAiExtractor;
use crate::hybrid::HybridParser;
use crate::pdf::PdfTextExtractor;
use crate::TextExtractor;

/// Factory for creating text extractors.
pub struct ExtractorFactory;

impl ExtractorFactory {
    /// Create the free local text-layer extractor.
    pub fn local() -> Arc<dyn TextExtractor> {
        Arc::new(PdfTextExtractor::new())
    }

    /// Create the Document AI OCR extractor.
    pub fn cloud_ocr(config: &DocumentAiConfig) -> Arc<dyn TextExtractor> {
        Arc::new(DocumentAiExtractor::new(config))
    }

    /// Create a hybrid parser wired from the full configuration.
    pub fn hybrid(config: &AutolandConfig) -> HybridParser {
        HybridParser::new(
            Self::local(),
            Self::cloud_ocr(&config.document_ai),
            ReportParser::from_config(&config.parser),
            config.pipeline.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autoland_core::{ExtractionMethod, FailureKind};

    #[test]
    fn test_factory_methods() {
        assert_eq!(ExtractorFactory::local().method(), ExtractionMethod::Local);
        assert_eq!(
            ExtractorFactory::cloud_ocr(&DocumentAiConfig::default()).method(),
            ExtractionMethod::CloudOcr
        );
    }

    #[test]
    fn test_hybrid_uses_pipeline_config() {
        let config = AutolandConfig::builder()
            .min_text_length(42)
            .ocr_cost_per_document(0.02)
            .build();
        let hybrid = ExtractorFactory::hybrid(&config);
        assert_eq!(hybrid.config().min_text_length, 42);
        assert_eq!(hybrid.config().ocr_cost_per_document, 0.02);
    }

    #[tokio::test]
    async fn test_hybrid_empty_input() {
        let hybrid = ExtractorFactory::hybrid(&AutolandConfig::default());
        let result = hybrid.parse_with_fallback(&[]).await;

        assert!(!result.success);
        assert_eq!(result.failure, Some(FailureKind::InvalidInput));
        assert_eq!(result.errors.len(), 2);
    }

    #[tokio::test]
    async fn test_hybrid_without_ocr_reports_configuration() {
        let hybrid = ExtractorFactory::hybrid(&AutolandConfig::default());
        let result = hybrid.parse_with_fallback(b"not a pdf").await;

        assert!(!result.success);
        assert_eq!(
            result.parsing_attempts.first.failure,
            Some(FailureKind::ExtractionFailure)
        );
        assert_eq!(result.failure, Some(FailureKind::Configuration));
    }
}
