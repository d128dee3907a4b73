use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

/// A flattened locale value.
///
/// Locale files hold strings almost everywhere, but an explicit `null` is
/// meaningful (it is reported as an empty value), so it is kept distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocaleValue {
    Text(String),
    Null,
}

impl LocaleValue {
    pub fn text(value: impl Into<String>) -> Self {
        LocaleValue::Text(value.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            LocaleValue::Text(s) => Some(s),
            LocaleValue::Null => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, LocaleValue::Null)
    }
}

impl fmt::Display for LocaleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocaleValue::Text(s) => write!(f, "{}", s),
            LocaleValue::Null => write!(f, "null"),
        }
    }
}

/// Flat key → value map for one locale, addressed with the configured delimiter.
pub type LocaleData = BTreeMap<String, LocaleValue>;

/// Locale code → data for every loaded locale.
pub type AllLocaleData = BTreeMap<String, LocaleData>;
