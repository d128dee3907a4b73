//! Reconciliation engine.
//!
//! - `options`: per-run options and policies
//! - `syncer`: the run itself
//! - `summary`: run output and projected locale files
//! - `defaults`: default source values for new keys
//! - `backup`: locale directory snapshots before destructive writes

pub mod backup;
pub mod defaults;
pub mod options;
pub mod summary;
pub mod syncer;

pub use options::{EmptyValuePolicy, KeySelection, SuspiciousKeyPolicy, SyncOptions};
pub use summary::{AppliedChanges, LocaleSnapshot, SyncSummary};
pub use syncer::Syncer;
