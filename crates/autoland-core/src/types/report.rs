//! Parsed autoland report record and parser output.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;

/// Outcome recorded on the report form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReportOutcome {
    #[default]
    Successful,
    Unsuccessful,
}

impl ReportOutcome {
    /// Column value stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportOutcome::Successful => "SUCCESSFUL",
            ReportOutcome::Unsuccessful => "UNSUCCESSFUL",
        }
    }

    /// Parse the literal token from a report, ignoring case.
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_uppercase().as_str() {
            "SUCCESSFUL" => Some(ReportOutcome::Successful),
            "UNSUCCESSFUL" => Some(ReportOutcome::Unsuccessful),
            _ => None,
        }
    }
}

impl fmt::Display for ReportOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured autoland report reconstructed from extracted text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedReport {
    // Identification
    /// Report number, e.g. `VN-A525-VJ442-23122025`. Unique per report.
    pub report_number: String,
    /// Aircraft registration, e.g. `VN-A525`.
    pub aircraft_reg: String,
    /// Flight number, e.g. `VJ442`.
    pub flight_number: String,

    // General information
    /// Three-letter airport code.
    pub airport: String,
    /// Runway designator, e.g. `06` or `25R`.
    pub runway: String,
    pub captain: Option<String>,
    pub first_officer: Option<String>,
    pub date_utc: NaiveDate,
    /// `HH:MM` or `HH:MM:SS` as printed on the report.
    pub time_utc: String,
    pub datetime_utc: NaiveDateTime,

    // Data section
    pub wind_velocity: Option<String>,
    pub td_point: Option<String>,
    pub tracking: Option<String>,
    pub qnh: Option<i32>,
    pub alignment: Option<String>,
    pub speed_control: Option<String>,
    pub temperature: Option<i32>,
    pub landing: Option<String>,
    pub aircraft_dropout: Option<String>,
    /// Numeric visibility kept as text, or `CAVOK`.
    pub visibility_rvr: Option<String>,
    pub other: Option<String>,

    // Result
    pub result: ReportOutcome,
    /// Only set when `result` is unsuccessful.
    pub reasons: Option<String>,
    pub captain_signature: Option<String>,
}

impl ParsedReport {
    /// Column names in insert order.
    pub const COLUMNS: [&'static str; 23] = [
        "report_number",
        "aircraft_reg",
        "flight_number",
        "airport",
        "runway",
        "captain",
        "first_officer",
        "date_utc",
        "time_utc",
        "wind_velocity",
        "td_point",
        "tracking",
        "qnh",
        "alignment",
        "speed_control",
        "temperature",
        "landing",
        "aircraft_dropout",
        "visibility_rvr",
        "other",
        "result",
        "reasons",
        "captain_signature",
    ];

    /// Flat column/value record, in [`Self::COLUMNS`] order, for
    /// parameterized inserts.
    pub fn to_record(&self) -> Vec<(&'static str, Value)> {
        let values = [
            json!(self.report_number),
            json!(self.aircraft_reg),
            json!(self.flight_number),
            json!(self.airport),
            json!(self.runway),
            json!(self.captain),
            json!(self.first_officer),
            json!(self.date_utc.format("%Y-%m-%d").to_string()),
            json!(self.time_utc),
            json!(self.wind_velocity),
            json!(self.td_point),
            json!(self.tracking),
            json!(self.qnh),
            json!(self.alignment),
            json!(self.speed_control),
            json!(self.temperature),
            json!(self.landing),
            json!(self.aircraft_dropout),
            json!(self.visibility_rvr),
            json!(self.other),
            json!(self.result.as_str()),
            json!(self.reasons),
            json!(self.captain_signature),
        ];

        Self::COLUMNS.iter().copied().zip(values).collect()
    }
}

/// Output of the field parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseResult {
    pub success: bool,
    pub data: Option<ParsedReport>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ParseResult {
    /// Successful parse.
    pub fn parsed(report: ParsedReport, warnings: Vec<String>) -> Self {
        Self {
            success: true,
            data: Some(report),
            errors: Vec::new(),
            warnings,
        }
    }

    /// Failed parse with every error found.
    pub fn failed(errors: Vec<String>, warnings: Vec<String>) -> Self {
        Self {
            success: false,
            data: None,
            errors,
            warnings,
        }
    }
}
