//! keysync - keep translation keys in sync with source code
//!
//! keysync scans JavaScript and TypeScript sources for translation calls,
//! compares the keys they reference with the project's JSON locale files, and
//! reports or applies the difference: missing keys are added with generated
//! defaults, unused keys are pruned, and placeholder or empty-value problems
//! are reported.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer
//! - `config`: Configuration file loading and parsing
//! - `core`: Extraction, locale storage, reconciliation and the edit engine
//! - `issues`: Findings and their actionable, severity-ranked form
//! - `rules`: Detection rules run during reconciliation
//! - `telemetry`: Tracing subscriber setup

pub mod cli;
pub mod config;
pub mod core;
pub mod issues;
pub mod rules;
pub mod telemetry;
