//! Key glob patterns for assumed keys.
//!
//! Patterns are compiled to anchored regexes with key-oriented semantics:
//!
//! - `*` matches any run of characters except `.` (stays within one segment)
//! - `**` matches anything, including `.`
//! - `?` matches exactly one character
//!
//! Everything else is matched literally.

use std::collections::HashSet;

use regex::Regex;

/// Check if a pattern contains wildcards.
pub fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// Translate a key glob into an anchored regex source string.
pub fn glob_to_regex(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 8);
    out.push('^');

    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' => {
                if chars.peek() == Some(&'*') {
                    chars.next();
                    out.push_str(".*");
                } else {
                    out.push_str("[^.]*");
                }
            }
            '?' => out.push('.'),
            other => out.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
        }
    }

    out.push('$');
    out
}

/// An assumed-key pattern: either a literal key or a compiled glob.
#[derive(Debug, Clone)]
pub enum KeyPattern {
    Literal(String),
    Glob { source: String, regex: Regex },
}

impl KeyPattern {
    /// Compile a pattern. Literal keys never fail.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        if !is_glob_pattern(pattern) {
            return Ok(KeyPattern::Literal(pattern.to_string()));
        }
        let regex = Regex::new(&glob_to_regex(pattern))?;
        Ok(KeyPattern::Glob {
            source: pattern.to_string(),
            regex,
        })
    }

    pub fn as_str(&self) -> &str {
        match self {
            KeyPattern::Literal(key) => key,
            KeyPattern::Glob { source, .. } => source,
        }
    }

    pub fn is_glob(&self) -> bool {
        matches!(self, KeyPattern::Glob { .. })
    }

    pub fn matches(&self, key: &str) -> bool {
        match self {
            KeyPattern::Literal(literal) => literal == key,
            KeyPattern::Glob { regex, .. } => regex.is_match(key),
        }
    }
}

/// Expand a glob pattern against a set of available keys.
///
/// Literal patterns expand to themselves only when present.
pub fn expand_glob_pattern(pattern: &KeyPattern, available_keys: &HashSet<String>) -> Vec<String> {
    let mut keys: Vec<String> = available_keys
        .iter()
        .filter(|key| pattern.matches(key))
        .cloned()
        .collect();
    keys.sort();
    keys
}
