//! Core data types shared by extraction, reconciliation and reporting.
//!
//! ## Module Structure
//!
//! - `locale`: Flattened locale values (LocaleValue, LocaleData)
//! - `reference`: Source references and dynamic-key warnings

pub mod locale;
pub mod reference;

pub use locale::{AllLocaleData, LocaleData, LocaleValue};
pub use reference::{
    DynamicKeyReason, DynamicKeyWarning, ParseFailure, SourcePosition, TranslationReference,
};
