//! Local PDF text extraction using pdf-extract.
//!
//! Reads the embedded text layer only. Scanned reports come back without
//! text and have to go through OCR instead.

use async_trait::async_trait;
use autoland_core::{ExtractionMethod, RawExtraction};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::error::{ExtractError, ExtractResult};
use crate::TextExtractor;

const PAGE_BREAK: char = '\x0C';

static SPACE_AFTER_HYPHEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"-[ \t]+").unwrap());
static SPACE_AROUND_SLASH: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]*/[ \t]*").unwrap());
static INLINE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\S\n]{2,}").unwrap());
static INDENTED_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s+").unwrap());

/// Repair the spacing artefacts text layers put into report identifiers.
///
/// Order matters: `"VN- A546"` becomes `"VN-A546"` and `"A/ C"` becomes
/// `"A/C"` before whitespace runs are squeezed.
pub fn clean_extracted_text(text: &str) -> String {
    let text = SPACE_AFTER_HYPHEN.replace_all(text, "-");
    let text = SPACE_AROUND_SLASH.replace_all(&text, "/");
    let text = INLINE_WHITESPACE.replace_all(&text, " ");
    let text = INDENTED_LINE.replace_all(&text, "\n");
    text.trim().to_string()
}

/// Pages seen in pdf-extract output, blank ones included.
///
/// Form feeds separate pages; a trailing one closes the last page rather
/// than opening a new one.
fn page_count(text: &str) -> usize {
    let breaks = text.matches(PAGE_BREAK).count();
    if text.ends_with(PAGE_BREAK) {
        breaks
    } else {
        breaks + 1
    }
}

/// PDF text-layer extractor using the pdf-extract library.
///
/// The synchronous pdf-extract call runs inside `spawn_blocking` so it never
/// stalls the async runtime.
#[derive(Debug, Clone, Default)]
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TextExtractor for PdfTextExtractor {
    async fn extract(&self, content: &[u8]) -> ExtractResult<RawExtraction> {
        if content.is_empty() {
            return Err(ExtractError::InvalidInput("PDF buffer is empty".to_string()));
        }

        let bytes = content.to_vec();
        let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
            .await?
            .map_err(|e| ExtractError::Pdf(e.to_string()))?;

        let page_count = page_count(&text);
        let pages: Vec<&str> = text
            .split(PAGE_BREAK)
            .map(str::trim)
            .filter(|page| !page.is_empty())
            .collect();
        let cleaned = clean_extracted_text(&pages.join("\n"));

        debug!(
            bytes = content.len(),
            pages = page_count,
            chars = cleaned.chars().count(),
            "Local text extraction finished"
        );

        if cleaned.is_empty() {
            return Ok(RawExtraction::failed("no text extracted"));
        }

        Ok(RawExtraction::ok(cleaned, page_count))
    }

    fn method(&self) -> ExtractionMethod {
        ExtractionMethod::Local
    }
}
