//! Shared helpers for the core engine.
//!
//! ## Module Structure
//!
//! - `file_scanner`: Source file discovery from include/ignore patterns
//! - `fs`: Atomic file writes
//! - `glob_matcher`: Key glob patterns for assumed keys

pub mod file_scanner;
pub mod fs;
pub mod glob_matcher;

pub use file_scanner::{ScanResult, filter_targets, relative_path, scan_files};
pub use fs::atomic_write;
pub use glob_matcher::{KeyPattern, expand_glob_pattern, is_glob_pattern};
