//! autoland-core - Core library for autoland report parsing.
//!
//! This crate provides the report data model, configuration, error types,
//! the extraction viability check, and the heuristic field parser that turns
//! extracted PDF text into a [`ParsedReport`].
//!
//! # Example
//!
//! ```ignore
//! use autoland_core::{parse_report, ReportParser};
//!
//! let result = parse_report(&extracted_text);
//! if result.success {
//!     let report = result.data.unwrap();
//!     println!("{} landed on {}", report.flight_number, report.runway);
//! } else {
//!     eprintln!("{:?}", result.errors);
//! }
//! ```

pub mod config;
pub mod error;
pub mod parser;
pub mod types;
pub mod viability;

// Re-export commonly used types
pub use config::{AutolandConfig, DocumentAiConfig, ParserConfig, PipelineConfig};
pub use error::{AutolandError, AutolandResult, ErrorCode, FailureKind};
pub use parser::{normalize_text, parse_report, ParserOptions, ReportParser};
pub use types::{ExtractionMethod, ParseResult, ParsedReport, RawExtraction, ReportOutcome};
pub use viability::{is_viable, is_viable_with};
