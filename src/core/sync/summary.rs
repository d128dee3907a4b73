use std::{collections::BTreeMap, path::PathBuf};

use serde::Serialize;

use crate::{
    core::data::{DynamicKeyWarning, ParseFailure},
    issues::{
        ActionableItem, EmptyValueViolation, MissingKeyRecord, PlaceholderIssue, Severity,
        SuspiciousKeyWarning, UnusedKeyRecord,
    },
};

/// Keys added and removed per locale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedChanges {
    pub added: BTreeMap<String, Vec<String>>,
    pub removed: BTreeMap<String, Vec<String>>,
}

impl AppliedChanges {
    pub fn is_empty(&self) -> bool {
        self.added.values().all(Vec::is_empty) && self.removed.values().all(Vec::is_empty)
    }

    pub fn added_count(&self) -> usize {
        self.added.values().map(Vec::len).sum()
    }

    pub fn removed_count(&self) -> usize {
        self.removed.values().map(Vec::len).sum()
    }
}

/// One locale file before and after the projected changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleSnapshot {
    pub locale: String,
    /// Relative to the workspace root.
    pub path: String,
    /// `None` when the file does not exist yet.
    pub before: Option<String>,
    pub after: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncSummary {
    pub files_scanned: usize,
    pub references: usize,
    pub cache_hits: usize,
    pub cache_misses: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_invalidated: Option<String>,
    pub source_locale: String,
    pub target_locales: Vec<String>,
    pub missing_keys: Vec<MissingKeyRecord>,
    pub unused_keys: Vec<UnusedKeyRecord>,
    /// Unused keys were not computed because the scan was narrowed.
    pub unused_analysis_skipped: bool,
    pub placeholder_issues: Vec<PlaceholderIssue>,
    pub empty_values: Vec<EmptyValueViolation>,
    pub dynamic_key_warnings: Vec<DynamicKeyWarning>,
    pub suspicious_keys: Vec<SuspiciousKeyWarning>,
    pub parse_errors: Vec<ParseFailure>,
    pub assumed_keys: Vec<String>,
    pub changes: AppliedChanges,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup_path: Option<PathBuf>,
    pub written: bool,
    pub items: Vec<ActionableItem>,
    /// Locale files the changes touch.
    #[serde(skip)]
    pub projection: Vec<LocaleSnapshot>,
}

impl SyncSummary {
    /// Whether any item is an error.
    pub fn has_blocking(&self) -> bool {
        self.items.iter().any(|i| i.severity == Severity::Error)
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.items.iter().filter(|i| i.severity == severity).count()
    }
}
