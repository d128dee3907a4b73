//! Per-file reference cache.
//!
//! Maps a workspace-relative source path to the references and dynamic-key
//! warnings extracted from it, guarded by the file's fingerprint. A missing,
//! corrupt or mismatched cache file is simply "no cache".

use std::{
    collections::BTreeMap,
    fs, io,
    path::Path,
    time::UNIX_EPOCH,
};

use serde::{Deserialize, Serialize};

use crate::core::{
    data::{DynamicKeyWarning, TranslationReference},
    utils::atomic_write,
};

/// Bumped whenever the on-disk layout changes.
pub const CACHE_VERSION: u32 = 1;

/// Modification time (ms since the epoch) and byte size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fingerprint {
    pub mtime_ms: u64,
    pub size: u64,
}

impl Fingerprint {
    pub fn of(path: &Path) -> io::Result<Self> {
        let metadata = fs::metadata(path)?;
        let mtime_ms = metadata
            .modified()?
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        Ok(Self {
            mtime_ms,
            size: metadata.len(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceCacheEntry {
    pub fingerprint: Fingerprint,
    pub references: Vec<TranslationReference>,
    pub dynamic_key_warnings: Vec<DynamicKeyWarning>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceCacheFile {
    pub version: u32,
    pub translation_identifier: String,
    pub files: BTreeMap<String, ReferenceCacheEntry>,
}

impl ReferenceCacheFile {
    pub fn new(translation_identifier: impl Into<String>) -> Self {
        Self {
            version: CACHE_VERSION,
            translation_identifier: translation_identifier.into(),
            files: BTreeMap::new(),
        }
    }

    /// Load a cache file usable for `translation_identifier`.
    pub fn load(path: &Path, translation_identifier: &str) -> Option<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "no reference cache");
                return None;
            }
        };

        let cache: Self = match serde_json::from_str(&content) {
            Ok(cache) => cache,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "ignoring corrupt cache");
                return None;
            }
        };

        if cache.version != CACHE_VERSION {
            tracing::debug!(
                found = cache.version,
                expected = CACHE_VERSION,
                "cache version mismatch"
            );
            return None;
        }
        if cache.translation_identifier != translation_identifier {
            tracing::debug!(
                found = %cache.translation_identifier,
                expected = %translation_identifier,
                "cache translation identifier mismatch"
            );
            return None;
        }

        Some(cache)
    }

    /// Entry for `relative_path`, only if its fingerprint is current.
    pub fn lookup(
        &self,
        relative_path: &str,
        fingerprint: &Fingerprint,
    ) -> Option<&ReferenceCacheEntry> {
        self.files
            .get(relative_path)
            .filter(|entry| entry.fingerprint == *fingerprint)
    }

    pub fn insert(&mut self, relative_path: impl Into<String>, entry: ReferenceCacheEntry) {
        self.files.insert(relative_path.into(), entry);
    }

    pub fn save(&self, path: &Path) -> io::Result<()> {
        let json = serde_json::to_string(self).map_err(io::Error::other)?;
        atomic_write(path, json.as_bytes())
    }
}
