//! Stateless classification helpers.
//!
//! - `key_validator`: suspicious key detection
//! - `placeholder`: interpolation token extraction

pub mod key_validator;
pub mod placeholder;

pub use key_validator::{KeyValidation, KeyValidationRules, KeyValidator, SuspiciousReason};
pub use placeholder::{PlaceholderGrammar, PlaceholderMatcher};
