//! Wholesale cache invalidation.
//!
//! The reference cache is only valid for the tool version, configuration and
//! parser that produced it. `meta.json` records all three next to the cache;
//! any difference (or an explicit request) wipes the cache directory before
//! extraction starts.

use std::{
    fmt, fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{
    config::Config,
    core::{cache::reference_cache::ReferenceCacheFile, utils::atomic_write},
};

const REFERENCES_FILE: &str = "references.json";
const META_FILE: &str = "meta.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheMetadata {
    pub tool_version: String,
    pub config_hash: String,
    pub parser_signature: String,
}

impl CacheMetadata {
    pub fn current(config: &Config, parser_signature: &str) -> Self {
        Self {
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            config_hash: config_hash(config),
            parser_signature: parser_signature.to_string(),
        }
    }
}

/// SHA-256 over the canonical JSON form of the configuration.
pub fn config_hash(config: &Config) -> String {
    let json = serde_json::to_string(config).unwrap_or_default();
    format!("{:x}", Sha256::digest(json.as_bytes()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidationReason {
    Requested,
    MissingMetadata,
    ToolVersion,
    ConfigHash,
    ParserSignature,
}

impl fmt::Display for InvalidationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InvalidationReason::Requested => "invalidation requested",
            InvalidationReason::MissingMetadata => "cache metadata missing or unreadable",
            InvalidationReason::ToolVersion => "tool version changed",
            InvalidationReason::ConfigHash => "configuration changed",
            InvalidationReason::ParserSignature => "parser changed",
        };
        write!(f, "{}", s)
    }
}

/// Outcome of preparing the cache for a run.
#[derive(Debug, Default)]
pub struct PreparedCache {
    /// Usable cache contents, if any survived validation.
    pub cache: Option<ReferenceCacheFile>,
    pub invalidated: Option<InvalidationReason>,
}

#[derive(Debug, Clone)]
pub struct CacheManager {
    dir: PathBuf,
    enabled: bool,
}

impl CacheManager {
    pub fn new(dir: impl Into<PathBuf>, enabled: bool) -> Self {
        Self {
            dir: dir.into(),
            enabled,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn references_path(&self) -> PathBuf {
        self.dir.join(REFERENCES_FILE)
    }

    pub fn meta_path(&self) -> PathBuf {
        self.dir.join(META_FILE)
    }

    /// Validate the on-disk cache and load it.
    ///
    /// A stale cache is deleted. The returned cache is `None` when caching is
    /// disabled, nothing was cached yet, or the cache was just invalidated.
    pub fn prepare(
        &self,
        metadata: &CacheMetadata,
        translation_identifier: &str,
        invalidate: bool,
    ) -> PreparedCache {
        if !self.enabled {
            return PreparedCache::default();
        }

        let references_path = self.references_path();
        if !references_path.exists() && !invalidate {
            return PreparedCache::default();
        }

        if let Some(reason) = self.stale_reason(metadata, invalidate) {
            tracing::debug!(dir = %self.dir.display(), %reason, "invalidating reference cache");
            if let Err(e) = self.clear() {
                tracing::warn!(dir = %self.dir.display(), error = %e, "failed to clear cache");
            }
            return PreparedCache {
                cache: None,
                invalidated: Some(reason),
            };
        }

        PreparedCache {
            cache: ReferenceCacheFile::load(&references_path, translation_identifier),
            invalidated: None,
        }
    }

    fn stale_reason(
        &self,
        metadata: &CacheMetadata,
        invalidate: bool,
    ) -> Option<InvalidationReason> {
        if invalidate {
            return Some(InvalidationReason::Requested);
        }

        let stored: Option<CacheMetadata> = fs::read_to_string(self.meta_path())
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok());
        let Some(stored) = stored else {
            return Some(InvalidationReason::MissingMetadata);
        };

        if stored.tool_version != metadata.tool_version {
            Some(InvalidationReason::ToolVersion)
        } else if stored.config_hash != metadata.config_hash {
            Some(InvalidationReason::ConfigHash)
        } else if stored.parser_signature != metadata.parser_signature {
            Some(InvalidationReason::ParserSignature)
        } else {
            None
        }
    }

    /// Write the cache snapshot and its metadata.
    ///
    /// Failures are logged and otherwise ignored: a lost cache only costs a
    /// slower next run.
    pub fn persist(&self, metadata: &CacheMetadata, cache: &ReferenceCacheFile) {
        if !self.enabled {
            return;
        }
        if let Err(e) = self.try_persist(metadata, cache) {
            tracing::warn!(
                dir = %self.dir.display(),
                error = %e,
                "failed to persist reference cache"
            );
        }
    }

    fn try_persist(&self, metadata: &CacheMetadata, cache: &ReferenceCacheFile) -> io::Result<()> {
        cache.save(&self.references_path())?;
        let meta = serde_json::to_string_pretty(metadata).map_err(io::Error::other)?;
        atomic_write(&self.meta_path(), meta.as_bytes())
    }

    pub fn clear(&self) -> io::Result<()> {
        match fs::remove_dir_all(&self.dir) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}
