//! Suspicious key detection.
//!
//! A key is suspicious when its shape suggests a mistake, typically raw
//! sentence text passed to the translation function instead of a structured
//! identifier. Rules are checked in a fixed order and the first match is the
//! reported reason.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Rule toggles, configurable through `keyValidation` in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyValidationRules {
    #[serde(default = "enabled")]
    pub contains_spaces: bool,
    #[serde(default = "enabled")]
    pub equals_value: bool,
    #[serde(default = "enabled")]
    pub empty_segment: bool,
    #[serde(default = "enabled")]
    pub sentence_punctuation: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_key_length: Option<usize>,
}

fn enabled() -> bool {
    true
}

impl Default for KeyValidationRules {
    fn default() -> Self {
        Self {
            contains_spaces: true,
            equals_value: true,
            empty_segment: true,
            sentence_punctuation: true,
            max_key_length: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SuspiciousReason {
    ContainsSpaces,
    EqualsValue,
    EmptySegment,
    SentencePunctuation,
    TooLong,
}

impl SuspiciousReason {
    pub fn description(&self) -> &'static str {
        match self {
            SuspiciousReason::ContainsSpaces => "key contains whitespace",
            SuspiciousReason::EqualsValue => "key is identical to its value",
            SuspiciousReason::EmptySegment => "key has an empty segment",
            SuspiciousReason::SentencePunctuation => "key contains sentence punctuation",
            SuspiciousReason::TooLong => "key exceeds the maximum length",
        }
    }
}

impl fmt::Display for SuspiciousReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SuspiciousReason::ContainsSpaces => "contains-spaces",
            SuspiciousReason::EqualsValue => "equals-value",
            SuspiciousReason::EmptySegment => "empty-segment",
            SuspiciousReason::SentencePunctuation => "sentence-punctuation",
            SuspiciousReason::TooLong => "too-long",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyValidation {
    pub suspicious: bool,
    pub reason: Option<SuspiciousReason>,
}

impl KeyValidation {
    fn flagged(reason: SuspiciousReason) -> Self {
        Self {
            suspicious: true,
            reason: Some(reason),
        }
    }
}

const SENTENCE_PUNCTUATION: &[char] = &['?', '!', ','];

#[derive(Debug, Clone)]
pub struct KeyValidator {
    rules: KeyValidationRules,
    delimiter: String,
}

impl KeyValidator {
    pub fn new(rules: KeyValidationRules, delimiter: impl Into<String>) -> Self {
        Self {
            rules,
            delimiter: delimiter.into(),
        }
    }

    /// Classify `key`. `value` enables the equals-value rule.
    pub fn validate(&self, key: &str, value: Option<&str>) -> KeyValidation {
        let rules = &self.rules;

        if rules.contains_spaces && key.chars().any(char::is_whitespace) {
            return KeyValidation::flagged(SuspiciousReason::ContainsSpaces);
        }

        if rules.equals_value && value == Some(key) {
            return KeyValidation::flagged(SuspiciousReason::EqualsValue);
        }

        if rules.empty_segment && self.has_empty_segment(key) {
            return KeyValidation::flagged(SuspiciousReason::EmptySegment);
        }

        if rules.sentence_punctuation && key.contains(SENTENCE_PUNCTUATION) {
            return KeyValidation::flagged(SuspiciousReason::SentencePunctuation);
        }

        if let Some(max) = rules.max_key_length
            && key.chars().count() > max
        {
            return KeyValidation::flagged(SuspiciousReason::TooLong);
        }

        KeyValidation::default()
    }

    fn has_empty_segment(&self, key: &str) -> bool {
        if key.is_empty() {
            return true;
        }
        if self.delimiter.is_empty() {
            return false;
        }
        key.split(self.delimiter.as_str()).any(str::is_empty)
    }
}

impl Default for KeyValidator {
    fn default() -> Self {
        Self::new(KeyValidationRules::default(), ".")
    }
}
