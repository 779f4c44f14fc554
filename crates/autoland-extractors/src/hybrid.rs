//! Hybrid parser: free local extraction first, paid OCR only as fallback.
//!
//! Stages run strictly in order and at most once each:
//!
//! 1. local text extraction, checked for viability;
//! 2. field parsing of the local text;
//! 3. cloud OCR extraction, reached only when stage 1 or 2 failed;
//! 4. field parsing of the OCR text.
//!
//! Extractor errors never escape. They end up in the attempt log of the
//! returned [`HybridParseResult`].

use std::sync::Arc;

use autoland_core::{
    is_viable_with, ExtractionMethod, FailureKind, ParsedReport, PipelineConfig, RawExtraction,
    ReportParser,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::TextExtractor;

const LOCAL_PARSE_FALLBACK_WARNING: &str =
    "Free extraction (local) succeeded but parsing failed - falling back to cloud OCR";

/// Outcome of one extraction + parse stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageAttempt {
    pub method: ExtractionMethod,
    pub extraction_success: bool,
    pub parsing_success: bool,
    /// Why this stage did not produce a report.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureKind>,
}

impl StageAttempt {
    fn new(method: ExtractionMethod) -> Self {
        Self {
            method,
            extraction_success: false,
            parsing_success: false,
            failure: None,
        }
    }
}

/// Outcome of the OCR stage, which may never run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FallbackAttempt {
    pub method: ExtractionMethod,
    pub extraction_success: bool,
    pub parsing_success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureKind>,
    pub used: bool,
}

impl FallbackAttempt {
    fn unused(method: ExtractionMethod) -> Self {
        Self {
            method,
            extraction_success: false,
            parsing_success: false,
            failure: None,
            used: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsingAttempts {
    pub first: StageAttempt,
    pub fallback: FallbackAttempt,
}

/// Cost of one document, in the configured OCR cost unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostMetrics {
    pub free_attempt: bool,
    pub paid_fallback: bool,
    pub cost_saved: f64,
    pub actual_cost: f64,
}

impl CostMetrics {
    fn free(unit_cost: f64) -> Self {
        Self {
            free_attempt: true,
            paid_fallback: false,
            cost_saved: unit_cost,
            actual_cost: 0.0,
        }
    }

    fn paid(unit_cost: f64) -> Self {
        Self {
            free_attempt: true,
            paid_fallback: true,
            cost_saved: 0.0,
            actual_cost: unit_cost,
        }
    }
}

/// Result of one hybrid pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HybridParseResult {
    pub success: bool,
    pub data: Option<ParsedReport>,
    /// Path that produced the final outcome.
    pub method: ExtractionMethod,
    pub parsing_attempts: ParsingAttempts,
    pub metrics: CostMetrics,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    /// Classification of the stage that decided a failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureKind>,
    /// Start of the last extracted text, attached to failures for review.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_preview: Option<String>,
}

/// Orchestrates local extraction, OCR fallback, and field parsing.
pub struct HybridParser {
    local: Arc<dyn TextExtractor>,
    ocr: Arc<dyn TextExtractor>,
    parser: ReportParser,
    config: PipelineConfig,
}

impl HybridParser {
    pub fn new(
        local: Arc<dyn TextExtractor>,
        ocr: Arc<dyn TextExtractor>,
        parser: ReportParser,
        config: PipelineConfig,
    ) -> Self {
        Self {
            local,
            ocr,
            parser,
            config,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the pipeline on one PDF.
    pub async fn parse_with_fallback(&self, content: &[u8]) -> HybridParseResult {
        let unit_cost = self.config.ocr_cost_per_document;
        let mut run = Run::new(self.local.method(), self.ocr.method());

        debug!(bytes = content.len(), "Starting local extraction");
        match self.local.extract(content).await {
            Ok(raw) if is_viable_with(&raw, self.config.min_text_length) => {
                run.first.extraction_success = true;
                debug!(chars = raw.trimmed_len(), pages = raw.page_count, "Local text is viable");

                let parsed = self.parser.parse(&raw.text);
                match parsed.data.filter(|_| parsed.success) {
                    Some(report) => {
                        run.first.parsing_success = true;
                        let result = HybridParseResult {
                            success: true,
                            data: Some(report),
                            method: run.first.method,
                            parsing_attempts: ParsingAttempts {
                                first: run.first,
                                fallback: run.fallback,
                            },
                            metrics: CostMetrics::free(unit_cost),
                            errors: Vec::new(),
                            warnings: parsed.warnings,
                            failure: None,
                            text_preview: None,
                        };
                        info!(method = %result.method, success = true, "Report parsed");
                        return result;
                    }
                    None => {
                        run.first.failure = Some(FailureKind::ParseFailure);
                        run.errors.extend(parsed.errors);
                        run.warnings.extend(parsed.warnings);
                        run.warnings.push(LOCAL_PARSE_FALLBACK_WARNING.to_string());
                        run.last_text = Some(raw.text);
                    }
                }
            }
            Ok(raw) => {
                run.first.extraction_success = raw.success;
                run.first.failure = Some(local_failure_kind(&raw));
                run.errors.push(match &raw.error {
                    Some(error) => format!("Local extraction failed: {}", error),
                    None => format!(
                        "Local extraction not viable ({} characters, minimum {})",
                        raw.trimmed_len(),
                        self.config.min_text_length
                    ),
                });
                if !raw.text.trim().is_empty() {
                    run.last_text = Some(raw.text);
                }
            }
            Err(err) => {
                run.first.failure = Some(err.failure_kind());
                run.errors.push(format!("Local extraction failed: {}", err));
            }
        }

        warn!(
            reason = ?run.first.failure,
            "Local path unusable, falling back to cloud OCR"
        );
        run.fallback.used = true;

        let raw = match self.ocr.extract(content).await {
            Ok(raw) if raw.success && !raw.text.trim().is_empty() => raw,
            Ok(raw) => {
                let error = raw
                    .error
                    .unwrap_or_else(|| "Cloud OCR returned no text".to_string());
                warn!(error = %error, "Cloud OCR extraction failed");
                run.errors.push(format!("Cloud OCR extraction failed: {}", error));
                return self.failed(run, FailureKind::ExtractionFailure);
            }
            Err(err) => {
                warn!(error = %err, "Cloud OCR extraction failed");
                run.errors.push(format!("Cloud OCR extraction failed: {}", err));
                return self.failed(run, err.failure_kind());
            }
        };
        run.fallback.extraction_success = true;
        debug!(chars = raw.trimmed_len(), pages = raw.page_count, "Cloud OCR text received");

        let parsed = self.parser.parse(&raw.text);
        match parsed.data.filter(|_| parsed.success) {
            Some(report) => {
                run.fallback.parsing_success = true;
                let result = HybridParseResult {
                    success: true,
                    data: Some(report),
                    method: run.fallback.method,
                    parsing_attempts: ParsingAttempts {
                        first: run.first,
                        fallback: run.fallback,
                    },
                    metrics: CostMetrics::paid(unit_cost),
                    errors: Vec::new(),
                    warnings: parsed.warnings,
                    failure: None,
                    text_preview: None,
                };
                info!(method = %result.method, success = true, "Report parsed");
                result
            }
            None => {
                run.errors.extend(parsed.errors);
                run.warnings.extend(parsed.warnings);
                run.last_text = Some(raw.text);
                self.failed(run, FailureKind::ParseFailure)
            }
        }
    }

    fn failed(&self, mut run: Run, kind: FailureKind) -> HybridParseResult {
        run.fallback.failure = Some(kind);
        let preview = run.last_text.as_deref().map(|text| {
            text.chars()
                .take(self.config.preview_chars)
                .collect::<String>()
        });

        info!(
            method = %run.fallback.method,
            success = false,
            failure = ?kind,
            errors = run.errors.len(),
            "Report could not be parsed"
        );

        HybridParseResult {
            success: false,
            data: None,
            method: run.fallback.method,
            parsing_attempts: ParsingAttempts {
                first: run.first,
                fallback: run.fallback,
            },
            metrics: CostMetrics::paid(self.config.ocr_cost_per_document),
            errors: run.errors,
            warnings: run.warnings,
            failure: Some(kind),
            text_preview: preview,
        }
    }
}

/// Attempt log accumulated across stages.
struct Run {
    first: StageAttempt,
    fallback: FallbackAttempt,
    errors: Vec<String>,
    warnings: Vec<String>,
    last_text: Option<String>,
}

impl Run {
    fn new(local: ExtractionMethod, ocr: ExtractionMethod) -> Self {
        Self {
            first: StageAttempt::new(local),
            fallback: FallbackAttempt::unused(ocr),
            errors: Vec::new(),
            warnings: Vec::new(),
            last_text: None,
        }
    }
}

fn local_failure_kind(raw: &RawExtraction) -> FailureKind {
    if raw.success && raw.error.is_none() {
        FailureKind::NotViable
    } else {
        FailureKind::ExtractionFailure
    }
}
