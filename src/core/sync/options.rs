use std::{collections::BTreeSet, path::PathBuf};

use serde::{Deserialize, Serialize};

/// How empty target-locale values are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EmptyValuePolicy {
    /// Not computed.
    Ignore,
    #[default]
    Warn,
    Fail,
}

/// What to do with missing keys that look suspicious.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SuspiciousKeyPolicy {
    /// Report, never insert unless selected.
    #[default]
    Skip,
    /// Insert like any other key.
    Allow,
    /// Report as blocking.
    Error,
}

/// Keys explicitly chosen by the caller.
///
/// A `Some` set restricts that kind of change to its members. `None` leaves
/// the decision to the run policy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeySelection {
    pub missing: Option<BTreeSet<String>>,
    pub unused: Option<BTreeSet<String>>,
}

impl KeySelection {
    pub fn missing_selected(&self, key: &str) -> Option<bool> {
        self.missing.as_ref().map(|keys| keys.contains(key))
    }

    pub fn unused_selected(&self, key: &str) -> Option<bool> {
        self.unused.as_ref().map(|keys| keys.contains(key))
    }
}

/// Per-run options. `None` fields fall back to the configuration.
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    pub write: bool,
    pub prune: bool,
    pub validate_interpolations: bool,
    pub empty_value_policy: Option<EmptyValuePolicy>,
    /// Added to the configured assumed keys.
    pub assumed_keys: Vec<String>,
    pub selection: KeySelection,
    /// Files or directories narrowing the scan. Empty means no filter.
    pub target_files: Vec<PathBuf>,
    pub invalidate_cache: bool,
    pub backup: Option<bool>,
    pub seed_target_locales: Option<bool>,
    /// Escalate placeholder mismatches to errors.
    pub strict: bool,
}
