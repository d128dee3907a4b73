//! Parser collaborator interface.
//!
//! Extraction does not look at syntax trees itself. A `CallEnumerator` reports
//! every call expression in a file along with a classification of its first
//! argument, and the extractor decides which calls are translation calls.

use crate::core::data::{DynamicKeyReason, SourcePosition};

/// First argument of a call, classified by syntax.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallArgument {
    /// String literal or template without substitutions. Holds the value.
    Literal(String),
    /// Template with substitutions. Holds the source text.
    Template(String),
    /// String concatenation. Holds the source text.
    Binary(String),
    /// Anything else. Holds the source text.
    Other(String),
}

impl CallArgument {
    /// Why this argument cannot be resolved, or `None` for literals.
    pub fn dynamic_reason(&self) -> Option<DynamicKeyReason> {
        match self {
            CallArgument::Literal(_) => None,
            CallArgument::Template(_) => Some(DynamicKeyReason::Template),
            CallArgument::Binary(_) => Some(DynamicKeyReason::Binary),
            CallArgument::Other(_) => Some(DynamicKeyReason::Expression),
        }
    }

    pub fn text(&self) -> &str {
        match self {
            CallArgument::Literal(s)
            | CallArgument::Template(s)
            | CallArgument::Binary(s)
            | CallArgument::Other(s) => s,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCall {
    /// `t` for `t(...)`, `i18n.t` for `i18n.t(...)`.
    pub callee: String,
    /// `None` for calls without arguments.
    pub argument: Option<CallArgument>,
    pub position: SourcePosition,
}

/// Locates call expressions in one source file.
pub trait CallEnumerator: Send + Sync {
    /// Identifies the parser and classification rules.
    ///
    /// Stored in cache metadata; a change discards the reference cache.
    fn signature(&self) -> &str;

    /// Enumerate every call in `source`. An `Err` is a parse failure message.
    fn enumerate(&self, source: String, file_path: &str) -> Result<Vec<ParsedCall>, String>;
}

/// Whether `callee` invokes the translation function `identifier`.
///
/// A bare identifier such as `t` also matches member calls ending in `.t`
/// (`i18n.t`); a dotted identifier must match exactly.
pub fn callee_matches(callee: &str, identifier: &str) -> bool {
    if callee == identifier {
        return true;
    }
    !identifier.contains('.')
        && callee
            .strip_suffix(identifier)
            .is_some_and(|prefix| prefix.ends_with('.'))
}
