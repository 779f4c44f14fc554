//! Guard deciding whether extracted text is worth handing to the parser.

use crate::config::MIN_VIABLE_TEXT_LENGTH;
use crate::types::RawExtraction;

/// Check an extraction against the default length threshold.
pub fn is_viable(extraction: &RawExtraction) -> bool {
    is_viable_with(extraction, MIN_VIABLE_TEXT_LENGTH)
}

/// Check an extraction against a custom length threshold.
///
/// Failed extractions, extractions carrying an error, and extractions whose
/// trimmed text is shorter than `min_length` characters are not viable.
pub fn is_viable_with(extraction: &RawExtraction, min_length: usize) -> bool {
    if !extraction.success || extraction.error.is_some() {
        return false;
    }
    extraction.trimmed_len() >= min_length
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_extraction_not_viable() {
        assert!(!is_viable(&RawExtraction::failed("no text extracted")));
    }

    #[test]
    fn test_error_field_blocks_viability() {
        let mut raw = RawExtraction::ok("x".repeat(200), 1);
        raw.error = Some("partial read".to_string());
        assert!(!is_viable(&raw));
    }

    #[test]
    fn test_threshold_uses_trimmed_text() {
        let padded = format!("   {}   ", "a".repeat(99));
        assert!(!is_viable(&RawExtraction::ok(padded, 1)));
        assert!(is_viable(&RawExtraction::ok("a".repeat(100), 1)));
    }

    #[test]
    fn test_custom_threshold() {
        let raw = RawExtraction::ok("short text", 1);
        assert!(is_viable_with(&raw, 5));
        assert!(!is_viable_with(&raw, 50));
    }
}
