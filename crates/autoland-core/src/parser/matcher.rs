//! Ordered candidate matching.
//!
//! Every field owns a list of regexes ordered from most specific to most
//! permissive. Capture group 1 of the first pattern that yields an accepted
//! value wins.

use once_cell::sync::Lazy;
use regex::Regex;

// A capture that is nothing but a form label, optionally followed by its own
// value, means the real value was missing and the capture ran into the next
// field. Values that merely start with a label word are kept.
static LABEL_ONLY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(?:A/C\s*REG|A/C\s*DROPOUT|FLT\s*N|AIRPORT|RWY|CAPT|F/O|DATE|TIME|W/V|T/D\s*POINT|TRACKING|QNH|ALIGNMENT|SPEED\s*CONTROL|TEMP|LANDING|VIS/RVR|OTHER|RESULT|REASONS)\b\s*(?:\(Z\)|[°º])?\s*(?::.*)?$",
    )
    .unwrap()
});

/// Whether `value` is a field label rather than a field value.
pub(crate) fn is_label(value: &str) -> bool {
    LABEL_ONLY.is_match(value.trim())
}

/// Trimmed capture group 1 of `pattern`, if non-empty and not a label.
pub(crate) fn capture<'t>(pattern: &Regex, text: &'t str) -> Option<&'t str> {
    let value = pattern.captures(text)?.get(1)?.as_str().trim();
    if value.is_empty() || is_label(value) {
        None
    } else {
        Some(value)
    }
}

/// First accepted capture across `patterns`, in order.
pub(crate) fn first_match<'t>(text: &'t str, patterns: &[Regex]) -> Option<&'t str> {
    patterns.iter().find_map(|pattern| capture(pattern, text))
}

/// First capture across `patterns` that `convert` turns into a value.
///
/// A capture rejected by `convert` lets the next pattern try.
pub(crate) fn first_match_map<T, F>(text: &str, patterns: &[Regex], convert: F) -> Option<T>
where
    F: Fn(&str) -> Option<T>,
{
    patterns
        .iter()
        .filter_map(|pattern| capture(pattern, text))
        .find_map(convert)
}

/// Both capture groups of the first pattern that fills them.
pub(crate) fn first_pair<'t>(text: &'t str, patterns: &[Regex]) -> Option<(&'t str, &'t str)> {
    patterns.iter().find_map(|pattern| {
        let caps = pattern.captures(text)?;
        let first = caps.get(1)?.as_str().trim();
        let second = caps.get(2)?.as_str().trim();
        (!first.is_empty() && !second.is_empty()).then_some((first, second))
    })
}
