//! Missing translation key detection rule.
//!
//! Detects keys referenced in code (or assumed) that the source locale does
//! not define, and decides which of them the run may insert.

use std::collections::{BTreeMap, BTreeSet};

use crate::{
    core::{
        data::{LocaleData, TranslationReference},
        sync::options::{KeySelection, SuspiciousKeyPolicy},
        validate::KeyValidator,
    },
    issues::MissingKeyRecord,
};

/// Find keys missing from the source locale.
///
/// # Arguments
/// * `key_set` - Referenced keys plus assumed literal keys
/// * `references_by_key` - Where each key is referenced
/// * `source_data` - Flattened source locale
/// * `validator` - Flags suspicious key names
/// * `policy` - Whether suspicious keys may be inserted
/// * `selection` - Explicit caller choice, overrides the policy when present
///
/// # Returns
/// One record per missing key, sorted by key
pub fn find_missing_keys(
    key_set: &BTreeSet<String>,
    references_by_key: &BTreeMap<String, Vec<TranslationReference>>,
    source_data: &LocaleData,
    validator: &KeyValidator,
    policy: SuspiciousKeyPolicy,
    selection: &KeySelection,
) -> Vec<MissingKeyRecord> {
    key_set
        .iter()
        .filter(|key| !source_data.contains_key(*key))
        .map(|key| {
            let validation = validator.validate(key, None);
            let applied = match selection.missing_selected(key) {
                Some(selected) => selected,
                None => !validation.suspicious || policy == SuspiciousKeyPolicy::Allow,
            };
            MissingKeyRecord {
                key: key.clone(),
                references: references_by_key.get(key).cloned().unwrap_or_default(),
                suspicious: validation.suspicious,
                suspicious_reason: validation.reason,
                conflict: None,
                applied,
            }
        })
        .collect()
}
