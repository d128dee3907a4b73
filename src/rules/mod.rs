//! Reconciliation rules.
//!
//! Pure functions that each take only the inputs they need and return their
//! own record type. They never touch the file system.
//!
//! ## Module Structure
//!
//! - `missing`: Referenced keys absent from the source locale
//! - `unused`: Locale keys nothing references
//! - `placeholders`: Interpolation token mismatches between locales
//! - `empty_values`: Empty, blank, marker or null target values
//! - `suspicious`: Risky key names from code references and locale data

pub mod empty_values;
pub mod missing;
pub mod placeholders;
pub mod suspicious;
pub mod unused;

pub use empty_values::{classify_empty_value, find_empty_values};
pub use missing::find_missing_keys;
pub use placeholders::find_placeholder_issues;
pub use suspicious::find_suspicious_keys;
pub use unused::find_unused_keys;
