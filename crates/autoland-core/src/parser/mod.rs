//! Field parser turning extracted report text into a [`ParsedReport`].
//!
//! Text coming out of a PDF text layer or OCR rarely keeps the form's
//! geometry: values drift onto the next line, labels run into each other,
//! and case is inconsistent. Every field is therefore resolved through an
//! ordered list of candidate patterns (see `fields`), and only the five
//! identity/location fields are mandatory.

mod datetime;
mod fields;
mod matcher;

pub use datetime::{combine_date_time, parse_date, parse_time, DEFAULT_TIME};
pub use fields::normalize_qualitative;

use chrono::{NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::config::{ParserConfig, DEFAULT_KNOWN_AIRPORTS};
use crate::types::{ParseResult, ParsedReport, ReportOutcome};

static LINE_ENDINGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r\n?").unwrap());
static BLANK_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Unify line endings, squeeze blank-line runs and trim.
pub fn normalize_text(text: &str) -> String {
    let unified = LINE_ENDINGS.replace_all(text, "\n");
    BLANK_RUNS.replace_all(&unified, "\n\n").trim().to_string()
}

/// Options controlling the parser.
#[derive(Debug, Clone, PartialEq)]
pub struct ParserOptions {
    /// Codes accepted when the airport has to be found as a bare token.
    pub known_airports: Vec<String>,
    /// Date used when the report carries none. `None` means today (UTC).
    pub reference_date: Option<NaiveDate>,
    /// Report a missing date as an error instead of defaulting it.
    pub strict_dates: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            known_airports: DEFAULT_KNOWN_AIRPORTS.iter().map(|s| s.to_string()).collect(),
            reference_date: None,
            strict_dates: false,
        }
    }
}

impl From<&ParserConfig> for ParserOptions {
    fn from(config: &ParserConfig) -> Self {
        Self {
            known_airports: config.known_airports.clone(),
            reference_date: None,
            strict_dates: config.strict_dates,
        }
    }
}

/// Autoland report parser.
#[derive(Debug, Clone, Default)]
pub struct ReportParser {
    options: ParserOptions,
}

impl ReportParser {
    pub fn new(options: ParserOptions) -> Self {
        Self { options }
    }

    /// Parser configured from the `[parser]` configuration section.
    pub fn from_config(config: &ParserConfig) -> Self {
        Self::new(ParserOptions::from(config))
    }

    /// Pin the date used when a report has none.
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.options.reference_date = Some(date);
        self
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Parse extracted text into a report.
    ///
    /// Fails only when a required field (report number, aircraft
    /// registration, flight number, airport, runway) is missing, or when the
    /// date is missing and strict dates are enabled. Every missing field is
    /// listed in `errors`. Defaults applied along the way are listed in
    /// `warnings`.
    pub fn parse(&self, text: &str) -> ParseResult {
        let text = normalize_text(text);
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        let report_number = fields::report_number(&text);
        let aircraft_reg = fields::aircraft_reg(&text);
        let flight_number = fields::flight_number(&text);
        let (airport, runway) = fields::airport_and_runway(&text, &self.options.known_airports);

        for (name, value) in [
            ("report_number", &report_number),
            ("aircraft_reg", &aircraft_reg),
            ("flight_number", &flight_number),
            ("airport", &airport),
            ("runway", &runway),
        ] {
            if value.is_none() {
                errors.push(format!("Missing {}", name));
            }
        }

        let date_utc = match datetime::extract_date(&text) {
            Some(date) => Some(date),
            None if self.options.strict_dates => {
                errors.push("Missing date_utc".to_string());
                None
            }
            None => {
                let fallback = self
                    .options
                    .reference_date
                    .unwrap_or_else(|| Utc::now().date_naive());
                warnings.push(format!(
                    "Date not found, using {}",
                    fallback.format("%Y-%m-%d")
                ));
                Some(fallback)
            }
        };

        let (
            Some(report_number),
            Some(aircraft_reg),
            Some(flight_number),
            Some(airport),
            Some(runway),
            Some(date_utc),
        ) = (report_number, aircraft_reg, flight_number, airport, runway, date_utc)
        else {
            debug!(errors = errors.len(), "Report is missing required fields");
            return ParseResult::failed(errors, warnings);
        };

        let time_utc = datetime::extract_time(&text).unwrap_or_else(|| {
            warnings.push(format!("Time not found, using {}", DEFAULT_TIME));
            DEFAULT_TIME.to_string()
        });
        let datetime_utc = combine_date_time(date_utc, &time_utc);

        let result = fields::result(&text).unwrap_or_else(|| {
            warnings.push("Result not found, assuming SUCCESSFUL".to_string());
            ReportOutcome::Successful
        });

        let reasons = match (result, fields::reasons(&text)) {
            (ReportOutcome::Unsuccessful, Some(reasons)) => Some(reasons),
            (ReportOutcome::Unsuccessful, None) => {
                warnings.push("Result is UNSUCCESSFUL but no reasons were found".to_string());
                None
            }
            (ReportOutcome::Successful, Some(_)) => {
                warnings.push("Ignoring reasons on a SUCCESSFUL report".to_string());
                None
            }
            (ReportOutcome::Successful, None) => None,
        };

        let captain = fields::captain(&text);
        let captain_signature = fields::captain_signature(&text).or_else(|| captain.clone());
        let (temperature, landing) = fields::temperature_and_landing(&text);

        let report = ParsedReport {
            report_number,
            aircraft_reg,
            flight_number,
            airport,
            runway,
            captain,
            first_officer: fields::first_officer(&text),
            date_utc,
            time_utc,
            datetime_utc,
            wind_velocity: fields::wind_velocity(&text),
            td_point: fields::td_point(&text),
            tracking: fields::tracking(&text),
            qnh: fields::qnh(&text),
            alignment: fields::alignment(&text),
            speed_control: fields::speed_control(&text),
            temperature,
            landing,
            aircraft_dropout: fields::aircraft_dropout(&text),
            visibility_rvr: fields::visibility_rvr(&text),
            other: fields::other(&text),
            result,
            reasons,
            captain_signature,
        };

        debug!(
            report_number = %report.report_number,
            warnings = warnings.len(),
            "Parsed autoland report"
        );

        ParseResult::parsed(report, warnings)
    }
}

/// Parse with default options.
pub fn parse_report(text: &str) -> ParseResult {
    ReportParser::default().parse(text)
}
