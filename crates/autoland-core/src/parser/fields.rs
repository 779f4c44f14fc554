//! Per-field pattern tables and value normalization.
//!
//! Each table is ordered from the most specific layout to the most
//! permissive one. Free-text captures end at a newline, at the label that
//! usually follows the field, or at the end of the text.

use once_cell::sync::Lazy;
use regex::Regex;

use super::matcher::{first_match, first_match_map, first_pair, is_label};
use crate::types::ReportOutcome;

// Identification

static REPORT_NUMBER: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        // N° VN-A525-VJ442-23122025
        Regex::new(r"(?i)N[°º\s]*:?\s*([A-Z]{2}-[A-Z]\d{3}-[A-Z]{2,3}\d{1,4}-?\d{0,8})").unwrap(),
        // Report number shape without its label
        Regex::new(r"(?i)(VN-A\d{3,4}-[A-Z]{2,3}\d{1,4}-?\d{0,8})").unwrap(),
    ]
});

static AIRCRAFT_REG: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)A/C\s*REG[:\s]*([A-Z]{2}-[A-Z]\d{3,4})").unwrap(),
        Regex::new(r"(?i)(VN-A\d{3,4})").unwrap(),
    ]
});

static FLIGHT_NUMBER: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)FLT\s*N[°º\s]*:?\s*([A-Z]{2,3}\d{1,4})").unwrap(),
        Regex::new(r"(?i)(VJ\d{3,4}|VN\d{3,4})").unwrap(),
    ]
});

// Location

static AIRPORT_RUNWAY: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        // AIRPORT/RWY\nHGH/06
        Regex::new(r"(?i)AIRPORT[/\s]*RWY[:\s]*\n\s*([A-Z]{3})/(\d{1,2}[LRC]?)\b").unwrap(),
        // AIRPORT/RWY: HGH/06
        Regex::new(r"(?i)AIRPORT[/\s]*RWY[:\s]*([A-Z]{3})/(\d{1,2}[LRC]?)\b").unwrap(),
    ]
});

static AIRPORT: Lazy<Vec<Regex>> =
    Lazy::new(|| vec![Regex::new(r"(?i)AIRPORT[:\s]*([A-Z]{3})\b").unwrap()]);

static RUNWAY: Lazy<Vec<Regex>> =
    Lazy::new(|| vec![Regex::new(r"(?i)\bRWY[:\s]*(\d{1,2}[LRC]?)\b").unwrap()]);

static BARE_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b([A-Z]{3})\b").unwrap());

// Crew

static CAPTAIN: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)CAPTAIN[:\s]*([A-Za-z\s]+?)(?:\n|F/O|$)").unwrap(),
        Regex::new(r"(?i)CAPT[:\s]*([A-Za-z\s]+?)(?:\n|F/O|$)").unwrap(),
    ]
});

static FIRST_OFFICER: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![Regex::new(r"(?i)F/O[:\s]*([A-Za-z\s]+?)(?:\n|DATE|$)").unwrap()]
});

static CAPTAIN_SIGNATURE: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![Regex::new(r"(?i)CAPT['’]?S\s*SIGNATURE[:\s]*([A-Za-z\s]+?)(?:\n|$)").unwrap()]
});

// Data section

static WIND_VELOCITY: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)W/V[:\s]*\n\s*(\d{3}/\d{1,2})").unwrap(),
        Regex::new(r"(?i)W/V[:\s]+(\d{3}/\d{1,2})").unwrap(),
        Regex::new(r"(?i)W/V[:\s]*(\d{3}/\d{1,2})").unwrap(),
    ]
});

static TD_POINT: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)T/D\s*POINT[:\s]*\n\s*([^\n]+?)(?:\n|ALIGNMENT|QNH|$)").unwrap(),
        Regex::new(r"(?i)T/D\s*POINT[:\s]+([^\n]+?)(?:\n|ALIGNMENT|QNH|$)").unwrap(),
        Regex::new(r"(?i)T/D\s*POINT[:\s]*([^\n]+?)(?:\n|ALIGNMENT|QNH|$)").unwrap(),
    ]
});

static TRACKING: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)TRACKING[:\s]*\n\s*([^\n]+?)(?:\n|SPEED|A/C|VIS|$)").unwrap(),
        Regex::new(r"(?i)TRACKING[:\s]+([^\n]+?)(?:\n|SPEED|A/C|VIS|$)").unwrap(),
        Regex::new(r"(?i)TRACKING[:\s]*([^\n]+?)(?:\n|SPEED|A/C|VIS|$)").unwrap(),
    ]
});

static QNH: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)\bQNH[:\s]*\n\s*(\d{3,4})(?:\s*hPa)?[ \t]*(?:\n|ALIGNMENT|TEMP|$)").unwrap(),
        Regex::new(r"(?i)\bQNH[:\s]+(\d{3,4})(?:\s*hPa)?[ \t]*(?:\n|ALIGNMENT|TEMP|$)").unwrap(),
        Regex::new(r"(?i)\bQNH[:\s]*(\d{3,4})(?:\s*hPa)?[ \t]*(?:\n|ALIGNMENT|TEMP|$)").unwrap(),
    ]
});

static ALIGNMENT: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)ALIGNMENT[:\s]*\n\s*([^\n]+?)(?:\n|TEMP|SPEED|QNH|$)").unwrap(),
        Regex::new(r"(?i)ALIGNMENT[:\s]+([^\n]+?)(?:\n|TEMP|SPEED|QNH|$)").unwrap(),
        Regex::new(r"(?i)ALIGNMENT[:\s]*([^\n]+?)(?:\n|TEMP|SPEED|QNH|$)").unwrap(),
    ]
});

static SPEED_CONTROL: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)SPEED\s*CONTROL[:\s]*\n\s*([^\n]+?)(?:\n|A/C|VIS|TRACKING|$)").unwrap(),
        Regex::new(r"(?i)SPEED\s*CONTROL[:\s]+([^\n]+?)(?:\n|A/C|VIS|TRACKING|$)").unwrap(),
        Regex::new(r"(?i)SPEED\s*CONTROL[:\s]*([^\n]+?)(?:\n|A/C|VIS|TRACKING|$)").unwrap(),
    ]
});

// TEMP label, LANDING label, temperature value, then an optional landing value
static TEMP_LANDING_COMPOUND: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![Regex::new(
        r"(?i)\bTEMP[:\s]*\n\s*LANDING[:\s]*\n\s*(-?\d{1,2})[ \t:]*(?:\n\s*([^\n]+?)(?:\n|A/C|VIS|$)|\n|$)",
    )
    .unwrap()]
});

static TEMPERATURE: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)\bTEMP[:\s]*\n\s*(-?\d{1,2})[ \t]*(?:\n|LANDING|$)").unwrap(),
        Regex::new(r"(?i)\bTEMP[:\s]+(-?\d{1,2})[ \t]*(?:\n|LANDING|$)").unwrap(),
        Regex::new(r"(?i)\bTEMP[:\s]*(-?\d{1,2})[ \t]*(?:\n|LANDING|$)").unwrap(),
    ]
});

static LANDING: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)\bLANDING[:\s]*\n\s*([^\n]+?)(?:\n|A/C|VIS|TEMP|$)").unwrap(),
        Regex::new(r"(?i)\bLANDING[:\s]+([^\n]+?)(?:\n|A/C|VIS|TEMP|$)").unwrap(),
        Regex::new(r"(?i)\bLANDING[:\s]*([^\n]+?)(?:\n|A/C|VIS|TEMP|$)").unwrap(),
    ]
});

static AIRCRAFT_DROPOUT: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)A/C\s*DROPOUT[:\s]*\n\s*([^\n]+?)(?:\n|VIS|OTHER|$)").unwrap(),
        Regex::new(r"(?i)A/C\s*DROPOUT[:\s]+([^\n]+?)(?:\n|VIS|OTHER|$)").unwrap(),
        Regex::new(r"(?i)A/C\s*DROPOUT[:\s]*([^\n]+?)(?:\n|VIS|OTHER|$)").unwrap(),
    ]
});

static VISIBILITY: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)VIS/RVR[:\s]*\n\s*([^\n]+?)(?:\n|TRACKING|OTHER|RESULT|$)").unwrap(),
        Regex::new(r"(?i)VIS/RVR[:\s]+([^\n]+?)(?:\n|TRACKING|OTHER|RESULT|$)").unwrap(),
        Regex::new(r"(?i)VIS/RVR[:\s]*([^\n]+?)(?:\n|TRACKING|OTHER|RESULT|$)").unwrap(),
    ]
});

static FIRST_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d{1,4})").unwrap());

static OTHER: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)\bOTHER\b[:\s]*\n\s*([^\n]+?)(?:\n|RESULT|$)").unwrap(),
        Regex::new(r"(?i)\bOTHER\b[:\s]*([^\n]+?)(?:\n|RESULT|$)").unwrap(),
    ]
});

// Result

static RESULT: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![Regex::new(r"(?i)RESULT[:\s]*(SUCCESSFUL|UNSUCCESSFUL)\b").unwrap()]
});

static REASONS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![Regex::new(r"(?i)REASONS?\s*FOR\s*UNSUCCESSFUL\s*AUTOLAND[:\s]*(.+?)(?:\n|CAPT|$)").unwrap()]
});

/// Collapse the usual "fine" answers to `ok`; lowercase anything else.
pub fn normalize_qualitative(value: &str) -> String {
    let value = value.trim().to_lowercase();
    match value.as_str() {
        "ok" | "okay" | "good" => "ok".to_string(),
        _ => value,
    }
}

fn is_number(value: &str) -> bool {
    let digits = value.strip_prefix('-').unwrap_or(value);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

fn qualitative(text: &str, patterns: &[Regex]) -> Option<String> {
    first_match(text, patterns).map(normalize_qualitative)
}

fn person(text: &str, patterns: &[Regex]) -> Option<String> {
    first_match(text, patterns).map(|name| name.split_whitespace().collect::<Vec<_>>().join(" "))
}

pub(crate) fn report_number(text: &str) -> Option<String> {
    first_match(text, &REPORT_NUMBER).map(|v| v.trim_end_matches('-').to_ascii_uppercase())
}

pub(crate) fn aircraft_reg(text: &str) -> Option<String> {
    first_match(text, &AIRCRAFT_REG).map(str::to_ascii_uppercase)
}

pub(crate) fn flight_number(text: &str) -> Option<String> {
    first_match(text, &FLIGHT_NUMBER).map(str::to_ascii_uppercase)
}

/// Airport and runway, trying the combined layouts before the separate
/// labels and finally the known-airport whitelist.
pub(crate) fn airport_and_runway(
    text: &str,
    known_airports: &[String],
) -> (Option<String>, Option<String>) {
    if let Some((airport, runway)) = first_pair(text, &AIRPORT_RUNWAY) {
        return (
            Some(airport.to_ascii_uppercase()),
            Some(runway.to_ascii_uppercase()),
        );
    }

    let airport = first_match(text, &AIRPORT)
        .map(str::to_ascii_uppercase)
        .or_else(|| known_airport(text, known_airports));
    let runway = first_match(text, &RUNWAY).map(str::to_ascii_uppercase);

    (airport, runway)
}

fn known_airport(text: &str, known_airports: &[String]) -> Option<String> {
    BARE_CODE
        .captures_iter(text)
        .filter_map(|cap| cap.get(1))
        .map(|code| code.as_str())
        .find(|code| known_airports.iter().any(|known| known.eq_ignore_ascii_case(code)))
        .map(str::to_string)
}

pub(crate) fn captain(text: &str) -> Option<String> {
    person(text, &CAPTAIN)
}

pub(crate) fn first_officer(text: &str) -> Option<String> {
    person(text, &FIRST_OFFICER)
}

pub(crate) fn captain_signature(text: &str) -> Option<String> {
    person(text, &CAPTAIN_SIGNATURE)
}

pub(crate) fn wind_velocity(text: &str) -> Option<String> {
    first_match(text, &WIND_VELOCITY).map(str::to_string)
}

pub(crate) fn td_point(text: &str) -> Option<String> {
    qualitative(text, &TD_POINT)
}

pub(crate) fn tracking(text: &str) -> Option<String> {
    qualitative(text, &TRACKING)
}

pub(crate) fn qnh(text: &str) -> Option<i32> {
    first_match_map(text, &QNH, |v| v.parse().ok())
}

pub(crate) fn alignment(text: &str) -> Option<String> {
    qualitative(text, &ALIGNMENT)
}

pub(crate) fn speed_control(text: &str) -> Option<String> {
    qualitative(text, &SPEED_CONTROL)
}

/// Temperature and landing, which share one block of the form.
///
/// The stacked `TEMP / LANDING / <number> / <word>` layout is resolved first
/// so the temperature reading can never be read as the landing value.
pub(crate) fn temperature_and_landing(text: &str) -> (Option<i32>, Option<String>) {
    for pattern in TEMP_LANDING_COMPOUND.iter() {
        if let Some(caps) = pattern.captures(text) {
            let temperature = caps.get(1).and_then(|m| m.as_str().parse().ok());
            let landing = caps
                .get(2)
                .map(|m| m.as_str().trim())
                .filter(|v| !v.is_empty() && !is_number(v) && !is_label(v))
                .map(normalize_qualitative);
            if temperature.is_some() {
                return (temperature, landing);
            }
        }
    }

    let temperature = first_match_map(text, &TEMPERATURE, |v| v.parse().ok());
    let landing = first_match_map(text, &LANDING, |v| {
        (!is_number(v)).then(|| normalize_qualitative(v))
    });
    (temperature, landing)
}

pub(crate) fn aircraft_dropout(text: &str) -> Option<String> {
    qualitative(text, &AIRCRAFT_DROPOUT)
}

/// `CAVOK` is kept verbatim; otherwise the first number, as text.
pub(crate) fn visibility_rvr(text: &str) -> Option<String> {
    first_match_map(text, &VISIBILITY, |value| {
        let first_word = value.split_whitespace().next().unwrap_or_default();
        if first_word.eq_ignore_ascii_case("CAVOK") {
            Some("CAVOK".to_string())
        } else {
            FIRST_NUMBER
                .captures(value)
                .and_then(|cap| cap.get(1))
                .map(|m| m.as_str().to_string())
        }
    })
}

pub(crate) fn other(text: &str) -> Option<String> {
    first_match(text, &OTHER).map(str::to_string)
}

pub(crate) fn result(text: &str) -> Option<ReportOutcome> {
    first_match_map(text, &RESULT, ReportOutcome::from_token)
}

pub(crate) fn reasons(text: &str) -> Option<String> {
    first_match(text, &REASONS).map(str::to_string)
}
