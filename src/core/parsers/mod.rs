//! File parsers for source code and locale files.
//!
//! - `json`: locale file flattening and key line lookup
//! - `jsx`: JS/TS/JSX/TSX source parsing (swc)

pub mod json;
pub mod jsx;
