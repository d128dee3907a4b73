//! Reference cache and its invalidation.
//!
//! - `reference_cache`: fingerprint-guarded per-file extraction results
//! - `manager`: tool/config/parser metadata and wholesale invalidation

pub mod manager;
pub mod reference_cache;

pub use manager::{CacheManager, CacheMetadata, InvalidationReason, PreparedCache, config_hash};
pub use reference_cache::{CACHE_VERSION, Fingerprint, ReferenceCacheEntry, ReferenceCacheFile};
