//! Findings produced by a reconciliation run.
//!
//! Each record is self-contained. Every record converts into a renderer
//! agnostic `ActionableItem` through the `Actionable` trait; severities that
//! depend on run policy are decided by a `SeverityPolicy`.

use std::fmt;

use enum_dispatch::enum_dispatch;
use serde::Serialize;

use crate::core::{
    data::{DynamicKeyWarning, ParseFailure, SourcePosition, TranslationReference},
    sync::options::{EmptyValuePolicy, SuspiciousKeyPolicy},
    validate::SuspiciousReason,
};

// ============================================================
// Severity and Kind
// ============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ItemKind {
    MissingKey,
    UnusedKey,
    PlaceholderMismatch,
    EmptyValue,
    DynamicKey,
    SuspiciousKey,
    AssumedKey,
    ParseError,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ItemKind::MissingKey => "missing-key",
            ItemKind::UnusedKey => "unused-key",
            ItemKind::PlaceholderMismatch => "placeholder-mismatch",
            ItemKind::EmptyValue => "empty-value",
            ItemKind::DynamicKey => "dynamic-key",
            ItemKind::SuspiciousKey => "suspicious-key",
            ItemKind::AssumedKey => "assumed-key",
            ItemKind::ParseError => "parse-error",
        };
        write!(f, "{}", s)
    }
}

/// One finding, ready for any renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionableItem {
    pub kind: ItemKind,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

// ============================================================
// Records
// ============================================================

/// Key referenced in code but absent from the source locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingKeyRecord {
    pub key: String,
    pub references: Vec<TranslationReference>,
    pub suspicious: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suspicious_reason: Option<SuspiciousReason>,
    /// Existing key the insertion would overwrite; such keys are never added.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflict: Option<String>,
    /// Selected for insertion in this run.
    pub applied: bool,
}

/// Key present in at least one locale but referenced nowhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnusedKeyRecord {
    pub key: String,
    pub locales: Vec<String>,
    /// Selected for removal in this run.
    pub applied: bool,
}

/// Placeholder token sets differ between source and target values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceholderIssue {
    pub key: String,
    pub locale: String,
    /// Tokens in the source value but not in the target value.
    pub missing: Vec<String>,
    /// Tokens in the target value but not in the source value.
    pub extra: Vec<String>,
    pub references: Vec<TranslationReference>,
    pub source_value: String,
    pub target_value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmptyValueReason {
    Empty,
    Whitespace,
    PlaceholderMarker,
    Null,
}

impl fmt::Display for EmptyValueReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmptyValueReason::Empty => write!(f, "empty string"),
            EmptyValueReason::Whitespace => write!(f, "whitespace only"),
            EmptyValueReason::PlaceholderMarker => write!(f, "placeholder marker"),
            EmptyValueReason::Null => write!(f, "null"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmptyValueViolation {
    pub key: String,
    pub locale: String,
    /// `None` for `null` values.
    pub value: Option<String>,
    pub reason: EmptyValueReason,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuspiciousKeyWarning {
    pub key: String,
    pub file_path: String,
    pub position: SourcePosition,
    pub reason: SuspiciousReason,
}

/// Key treated as used because it is configured as assumed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssumedKeyNotice {
    /// Literal key or glob pattern as configured.
    pub pattern: String,
    /// Locale keys matched by the pattern.
    pub matched: Vec<String>,
}

// ============================================================
// Actionable trait
// ============================================================

/// Run settings that decide policy-dependent severities.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeverityPolicy {
    /// Changes were written to disk.
    pub write: bool,
    pub strict: bool,
    pub empty_value: EmptyValuePolicy,
    pub suspicious: SuspiciousKeyPolicy,
}

#[enum_dispatch]
pub trait Actionable {
    fn kind(&self) -> ItemKind;

    fn severity(&self, policy: &SeverityPolicy) -> Severity;

    fn message(&self, policy: &SeverityPolicy) -> String;

    fn key(&self) -> Option<&str> {
        None
    }

    /// File and position the finding points at.
    fn location(&self) -> Option<(&str, SourcePosition)> {
        None
    }

    fn details(&self) -> Option<String> {
        None
    }

    fn to_item(&self, policy: &SeverityPolicy) -> ActionableItem {
        let location = self.location();
        ActionableItem {
            kind: self.kind(),
            severity: self.severity(policy),
            key: self.key().map(str::to_string),
            file_path: location.map(|(path, _)| path.to_string()),
            line: location.map(|(_, pos)| pos.line),
            column: location.map(|(_, pos)| pos.column),
            message: self.message(policy),
            details: self.details(),
        }
    }
}

#[enum_dispatch(Actionable)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Finding {
    MissingKey(MissingKeyRecord),
    UnusedKey(UnusedKeyRecord),
    Placeholder(PlaceholderIssue),
    EmptyValue(EmptyValueViolation),
    DynamicKey(DynamicKeyWarning),
    SuspiciousKey(SuspiciousKeyWarning),
    AssumedKey(AssumedKeyNotice),
    ParseError(ParseFailure),
}

impl Actionable for MissingKeyRecord {
    fn kind(&self) -> ItemKind {
        ItemKind::MissingKey
    }

    fn severity(&self, policy: &SeverityPolicy) -> Severity {
        if self.conflict.is_some() {
            Severity::Error
        } else if self.applied && policy.write {
            Severity::Info
        } else if self.suspicious && policy.suspicious != SuspiciousKeyPolicy::Error {
            Severity::Warning
        } else {
            Severity::Error
        }
    }

    fn message(&self, policy: &SeverityPolicy) -> String {
        if let Some(existing) = &self.conflict {
            return format!(
                "missing key \"{}\" was not added: conflicts with existing key \"{}\"",
                self.key, existing
            );
        }
        match (self.applied, self.suspicious_reason) {
            (true, _) if policy.write => format!("added missing key \"{}\"", self.key),
            (true, _) => format!("missing key \"{}\" would be added", self.key),
            (false, Some(reason)) => format!(
                "missing key \"{}\" was not added: {}",
                self.key,
                reason.description()
            ),
            (false, None) => format!("missing key \"{}\"", self.key),
        }
    }

    fn key(&self) -> Option<&str> {
        Some(&self.key)
    }

    fn location(&self) -> Option<(&str, SourcePosition)> {
        self.references
            .first()
            .map(|r| (r.file_path.as_str(), r.position))
    }

    fn details(&self) -> Option<String> {
        (self.references.len() > 1)
            .then(|| format!("referenced {} times", self.references.len()))
    }
}

impl Actionable for UnusedKeyRecord {
    fn kind(&self) -> ItemKind {
        ItemKind::UnusedKey
    }

    fn severity(&self, policy: &SeverityPolicy) -> Severity {
        if self.applied && policy.write {
            Severity::Info
        } else {
            Severity::Warning
        }
    }

    fn message(&self, policy: &SeverityPolicy) -> String {
        match (self.applied, policy.write) {
            (true, true) => format!("removed unused key \"{}\"", self.key),
            (true, false) => format!("unused key \"{}\" would be removed", self.key),
            (false, _) => format!("unused key \"{}\"", self.key),
        }
    }

    fn key(&self) -> Option<&str> {
        Some(&self.key)
    }

    fn details(&self) -> Option<String> {
        Some(format!("in {}", self.locales.join(", ")))
    }
}

impl Actionable for PlaceholderIssue {
    fn kind(&self) -> ItemKind {
        ItemKind::PlaceholderMismatch
    }

    fn severity(&self, policy: &SeverityPolicy) -> Severity {
        if policy.strict {
            Severity::Error
        } else {
            Severity::Warning
        }
    }

    fn message(&self, _policy: &SeverityPolicy) -> String {
        format!("placeholder mismatch for \"{}\" in {}", self.key, self.locale)
    }

    fn key(&self) -> Option<&str> {
        Some(&self.key)
    }

    fn location(&self) -> Option<(&str, SourcePosition)> {
        self.references
            .first()
            .map(|r| (r.file_path.as_str(), r.position))
    }

    fn details(&self) -> Option<String> {
        let mut parts = Vec::new();
        if !self.missing.is_empty() {
            parts.push(format!("missing: {}", self.missing.join(", ")));
        }
        if !self.extra.is_empty() {
            parts.push(format!("extra: {}", self.extra.join(", ")));
        }
        Some(parts.join("; "))
    }
}

impl Actionable for EmptyValueViolation {
    fn kind(&self) -> ItemKind {
        ItemKind::EmptyValue
    }

    fn severity(&self, policy: &SeverityPolicy) -> Severity {
        match policy.empty_value {
            EmptyValuePolicy::Fail => Severity::Error,
            EmptyValuePolicy::Warn | EmptyValuePolicy::Ignore => Severity::Warning,
        }
    }

    fn message(&self, _policy: &SeverityPolicy) -> String {
        format!("empty value for \"{}\" in {}", self.key, self.locale)
    }

    fn key(&self) -> Option<&str> {
        Some(&self.key)
    }

    fn details(&self) -> Option<String> {
        Some(self.reason.to_string())
    }
}

impl Actionable for DynamicKeyWarning {
    fn kind(&self) -> ItemKind {
        ItemKind::DynamicKey
    }

    fn severity(&self, _policy: &SeverityPolicy) -> Severity {
        Severity::Warning
    }

    fn message(&self, _policy: &SeverityPolicy) -> String {
        format!("dynamic translation key ({}): {}", self.reason, self.expression)
    }

    fn location(&self) -> Option<(&str, SourcePosition)> {
        Some((self.file_path.as_str(), self.position))
    }
}

impl Actionable for SuspiciousKeyWarning {
    fn kind(&self) -> ItemKind {
        ItemKind::SuspiciousKey
    }

    fn severity(&self, policy: &SeverityPolicy) -> Severity {
        if policy.suspicious == SuspiciousKeyPolicy::Error {
            Severity::Error
        } else {
            Severity::Warning
        }
    }

    fn message(&self, _policy: &SeverityPolicy) -> String {
        format!("suspicious key \"{}\"", self.key)
    }

    fn key(&self) -> Option<&str> {
        Some(&self.key)
    }

    fn location(&self) -> Option<(&str, SourcePosition)> {
        Some((self.file_path.as_str(), self.position))
    }

    fn details(&self) -> Option<String> {
        Some(self.reason.description().to_string())
    }
}

impl Actionable for AssumedKeyNotice {
    fn kind(&self) -> ItemKind {
        ItemKind::AssumedKey
    }

    fn severity(&self, _policy: &SeverityPolicy) -> Severity {
        Severity::Info
    }

    fn message(&self, _policy: &SeverityPolicy) -> String {
        format!("\"{}\" is assumed to be used", self.pattern)
    }

    fn details(&self) -> Option<String> {
        match self.matched.len() {
            0 => Some("matches no locale key".to_string()),
            1 if self.matched[0] == self.pattern => None,
            n => Some(format!("matches {} locale keys", n)),
        }
    }
}

impl Actionable for ParseFailure {
    fn kind(&self) -> ItemKind {
        ItemKind::ParseError
    }

    fn severity(&self, _policy: &SeverityPolicy) -> Severity {
        Severity::Error
    }

    fn message(&self, _policy: &SeverityPolicy) -> String {
        format!("failed to parse: {}", self.error)
    }

    fn location(&self) -> Option<(&str, SourcePosition)> {
        Some((self.file_path.as_str(), SourcePosition::default()))
    }
}
