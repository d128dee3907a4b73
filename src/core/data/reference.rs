//! Reference types produced by extraction.
//!
//! A `TranslationReference` is one literal key found in source code. A
//! `DynamicKeyWarning` is a translation call whose key argument could not be
//! resolved to a literal. Both are serialized verbatim into the reference cache.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Position in a source file. Both fields are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SourcePosition {
    pub line: usize,
    pub column: usize,
}

impl SourcePosition {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl Default for SourcePosition {
    fn default() -> Self {
        Self { line: 1, column: 1 }
    }
}

/// One textual occurrence of a literal translation key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationReference {
    pub key: String,
    /// Path relative to the workspace root, `/`-separated.
    pub file_path: String,
    pub position: SourcePosition,
}

impl TranslationReference {
    pub fn new(
        key: impl Into<String>,
        file_path: impl Into<String>,
        position: SourcePosition,
    ) -> Self {
        Self {
            key: key.into(),
            file_path: file_path.into(),
            position,
        }
    }
}

/// Why a translation call argument could not be resolved statically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DynamicKeyReason {
    /// Template literal with substitutions: `` t(`a.${b}`) ``
    Template,
    /// String concatenation: `t("a." + b)`
    Binary,
    /// Any other expression: `t(key)`, `t(getKey())`
    Expression,
}

impl fmt::Display for DynamicKeyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DynamicKeyReason::Template => write!(f, "template"),
            DynamicKeyReason::Binary => write!(f, "binary"),
            DynamicKeyReason::Expression => write!(f, "expression"),
        }
    }
}

/// A translation call whose key is not statically resolvable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamicKeyWarning {
    pub file_path: String,
    pub position: SourcePosition,
    /// Source text of the argument expression.
    pub expression: String,
    pub reason: DynamicKeyReason,
}

/// A source file that could not be parsed. Not cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseFailure {
    pub file_path: String,
    pub error: String,
}

/// Deterministic ordering used for every extraction output.
pub(crate) fn compare_references(
    a: &TranslationReference,
    b: &TranslationReference,
) -> std::cmp::Ordering {
    a.file_path
        .cmp(&b.file_path)
        .then_with(|| a.position.cmp(&b.position))
        .then_with(|| a.key.cmp(&b.key))
}

pub(crate) fn compare_warnings(
    a: &DynamicKeyWarning,
    b: &DynamicKeyWarning,
) -> std::cmp::Ordering {
    a.file_path
        .cmp(&b.file_path)
        .then_with(|| a.position.cmp(&b.position))
        .then_with(|| a.expression.cmp(&b.expression))
}
