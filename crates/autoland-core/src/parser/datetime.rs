//! Date and time fields of the report.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;

use super::matcher::first_match_map;

// Candidate locations of the report date, most specific first
static DATE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        // Labelled: DATE(Z): 23 Dec 2025 or DATE(Z): 23/12/2025
        Regex::new(r"(?i)DATE\s*\(Z\)[:\s]*(\d{1,2}[\s/-](?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)[a-z]*[\s/-]\d{4}|\d{1,2}[/-]\d{1,2}[/-]\d{4})").unwrap(),
        // Bare month-name date anywhere
        Regex::new(r"(?i)\b(\d{1,2}[\s/-](?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)[a-z]*[\s/-]\d{4})\b").unwrap(),
        // Bare numeric date anywhere
        Regex::new(r"\b(\d{1,2}[/-]\d{1,2}[/-]\d{4})\b").unwrap(),
    ]
});

static TIME_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)TIME\s*\(Z\)[:\s]*(\d{1,2}:\d{2}(?::\d{2})?)").unwrap(),
        Regex::new(r"\b(\d{1,2}:\d{2}(?::\d{2})?)\b").unwrap(),
    ]
});

static MONTH_NAME_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,2})[\s/-]+([A-Za-z]{3})[A-Za-z]*[\s/-]+(\d{4})$").unwrap()
});

static NUMERIC_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2})[/-](\d{1,2})[/-](\d{4})$").unwrap());

/// Printed time when the report carries none.
pub const DEFAULT_TIME: &str = "00:00";

/// Find and parse the report date.
pub(crate) fn extract_date(text: &str) -> Option<NaiveDate> {
    first_match_map(text, &DATE_PATTERNS, parse_date)
}

/// Find the report time as printed (`HH:MM` or `HH:MM:SS`).
pub(crate) fn extract_time(text: &str) -> Option<String> {
    first_match_map(text, &TIME_PATTERNS, |value| {
        parse_time(value).map(|_| value.to_string())
    })
}

/// Parse `23 Dec 2025`, `23-Dec-2025`, `23/12/2025` or `23-12-2025`.
///
/// Impossible calendar dates yield `None`.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();

    if let Some(cap) = MONTH_NAME_DATE.captures(value) {
        let day = cap[1].parse::<u32>().ok()?;
        let month = month_number(&cap[2])?;
        let year = cap[3].parse::<i32>().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    if let Some(cap) = NUMERIC_DATE.captures(value) {
        let day = cap[1].parse::<u32>().ok()?;
        let month = cap[2].parse::<u32>().ok()?;
        let year = cap[3].parse::<i32>().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    None
}

/// Parse `HH:MM` or `HH:MM:SS` into a valid time of day.
pub fn parse_time(value: &str) -> Option<NaiveTime> {
    let mut parts = value.trim().split(':').map(|p| p.parse::<u32>().ok());
    let hour = parts.next()??;
    let minute = parts.next()??;
    let second = match parts.next() {
        Some(second) => second?,
        None => 0,
    };
    if parts.next().is_some() {
        return None;
    }
    NaiveTime::from_hms_opt(hour, minute, second)
}

/// Apply the printed hour, minute and second onto `date`.
///
/// Parts that are missing or out of range count as zero.
pub fn combine_date_time(date: NaiveDate, time: &str) -> NaiveDateTime {
    let mut parts = time.split(':').map(|p| p.trim().parse::<u32>().unwrap_or(0));
    let hour = parts.next().filter(|h| *h < 24).unwrap_or(0);
    let minute = parts.next().filter(|m| *m < 60).unwrap_or(0);
    let second = parts.next().filter(|s| *s < 60).unwrap_or(0);

    date.and_time(NaiveTime::from_hms_opt(hour, minute, second).unwrap_or(NaiveTime::MIN))
}

fn month_number(name: &str) -> Option<u32> {
    let month = match name.to_ascii_lowercase().as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}
