//! Core reconciliation engine.
//!
//! A run moves through four phases:
//!
//! 1. **Extract**: parse source files and collect translation references (cached)
//! 2. **Load**: read and flatten the locale files
//! 3. **Analyze**: compare references against locale keys (see `crate::rules`)
//! 4. **Apply**: project the changes, then diff or write them
//!
//! ## Module Structure
//!
//! - `cache`: Fingerprint-guarded reference cache
//! - `data`: Shared data types
//! - `diff`: Unified diffs, preview payloads and patch files
//! - `edits`: Conflict-aware text edits
//! - `error`: Engine error types
//! - `extract`: Translation reference extraction
//! - `locale`: Locale file repository
//! - `parsers`: Source and locale file parsers
//! - `sync`: Run orchestration
//! - `utils`: File discovery, atomic writes and key globs
//! - `validate`: Key validation and placeholder extraction

pub mod cache;
pub mod data;
pub mod diff;
pub mod edits;
pub mod error;
pub mod extract;
pub mod locale;
pub mod parsers;
pub mod sync;
pub mod utils;
pub mod validate;
