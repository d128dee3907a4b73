//! Empty value detection rule.

use crate::{
    core::data::{AllLocaleData, LocaleValue},
    issues::{EmptyValueReason, EmptyValueViolation},
};

/// Classify a single value. `None` means the value is acceptable.
///
/// Markers are compared case-insensitively against the trimmed value.
pub fn classify_empty_value(value: &LocaleValue, markers: &[String]) -> Option<EmptyValueReason> {
    let LocaleValue::Text(text) = value else {
        return Some(EmptyValueReason::Null);
    };
    if text.is_empty() {
        return Some(EmptyValueReason::Empty);
    }
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Some(EmptyValueReason::Whitespace);
    }
    markers
        .iter()
        .any(|marker| marker.trim().eq_ignore_ascii_case(trimmed))
        .then_some(EmptyValueReason::PlaceholderMarker)
}

/// Find empty values in every locale except the source locale.
///
/// # Returns
/// Violations sorted by locale, then key
pub fn find_empty_values(
    source_locale: &str,
    locales: &AllLocaleData,
    markers: &[String],
) -> Vec<EmptyValueViolation> {
    locales
        .iter()
        .filter(|(locale, _)| *locale != source_locale)
        .flat_map(|(locale, data)| {
            data.iter().filter_map(move |(key, value)| {
                classify_empty_value(value, markers).map(|reason| EmptyValueViolation {
                    key: key.clone(),
                    locale: locale.clone(),
                    value: value.as_text().map(str::to_string),
                    reason,
                })
            })
        })
        .collect()
}
