pub mod init;
pub mod project;
pub mod rewrite;
pub mod sync;

use std::path::PathBuf;

use crate::core::{diff::LocaleDiff, edits::RewriteOutcome, sync::SyncSummary};

#[derive(Debug)]
pub enum CommandSummary {
    Sync(SyncReport),
    Init(InitSummary),
    Rewrite(RewriteReport),
}

#[derive(Debug)]
pub struct SyncReport {
    pub summary: SyncSummary,
    pub diffs: Vec<LocaleDiff>,
    /// Locale files found, source locale included.
    pub locale_files: usize,
    pub show_diff: bool,
    pub json: bool,
    pub preview_path: Option<PathBuf>,
    pub patch_path: Option<PathBuf>,
}

#[derive(Debug)]
pub struct InitSummary {
    pub path: PathBuf,
    /// Set when the file could not be created.
    pub error: Option<String>,
}

#[derive(Debug)]
pub struct RewriteReport {
    pub path: PathBuf,
    pub outcome: RewriteOutcome,
    pub rollback_path: Option<PathBuf>,
}

/// Result of running a keysync command.
#[derive(Debug)]
pub struct CommandResult {
    pub summary: CommandSummary,
    /// Blocking findings. Any makes the command fail.
    pub error_count: usize,
    pub warning_count: usize,
}

impl CommandResult {
    pub fn new(summary: CommandSummary) -> Self {
        let (error_count, warning_count) = match &summary {
            CommandSummary::Sync(report) => (
                report.summary.count(crate::issues::Severity::Error),
                report.summary.count(crate::issues::Severity::Warning),
            ),
            CommandSummary::Init(init) => (usize::from(init.error.is_some()), 0),
            CommandSummary::Rewrite(report) => (0, report.outcome.warnings.len()),
        };
        Self {
            summary,
            error_count,
            warning_count,
        }
    }
}
