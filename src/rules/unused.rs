//! Unused translation key detection rule.
//!
//! Detects keys defined in any locale that no source file references and no
//! assumed key or pattern covers.

use std::collections::{BTreeMap, BTreeSet};

use crate::{
    core::{data::AllLocaleData, sync::options::KeySelection, utils::KeyPattern},
    issues::UnusedKeyRecord,
};

/// Find unused keys across every loaded locale.
///
/// # Arguments
/// * `key_set` - Referenced keys plus assumed literal keys
/// * `assumed` - Assumed keys and glob patterns
/// * `locales` - Flattened data for every locale
/// * `prune` - Remove unused keys when no selection is given
/// * `selection` - Explicit caller choice, overrides `prune` when present
///
/// # Returns
/// One record per key, listing the locales that contain it, sorted by key
pub fn find_unused_keys(
    key_set: &BTreeSet<String>,
    assumed: &[KeyPattern],
    locales: &AllLocaleData,
    prune: bool,
    selection: &KeySelection,
) -> Vec<UnusedKeyRecord> {
    let mut containing: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for (locale, data) in locales {
        for key in data.keys() {
            if key_set.contains(key) || assumed.iter().any(|p| p.matches(key)) {
                continue;
            }
            containing.entry(key).or_default().push(locale.clone());
        }
    }

    containing
        .into_iter()
        .map(|(key, locales)| UnusedKeyRecord {
            key: key.to_string(),
            locales,
            applied: selection.unused_selected(key).unwrap_or(prune),
        })
        .collect()
}
