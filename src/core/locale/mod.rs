//! Locale file repository.

pub mod store;

pub use store::{KeyAction, KeyStyle, LocaleStore};
