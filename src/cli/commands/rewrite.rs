use std::fs;

use anyhow::{Context, Result};

use super::{CommandResult, CommandSummary, RewriteReport};
use crate::{
    cli::args::RewriteCommand,
    core::{
        edits::{DetectorConfig, EditOperation, rewrite_file},
        utils::atomic_write,
    },
};

pub fn rewrite(cmd: RewriteCommand) -> Result<CommandResult> {
    let cwd = std::env::current_dir().context("Failed to read the current directory")?;
    let edits_path = cwd.join(&cmd.edits);
    let content = fs::read_to_string(&edits_path)
        .with_context(|| format!("Failed to read edits file: {}", edits_path.display()))?;
    let edits: Vec<EditOperation> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse edits file: {}", edits_path.display()))?;

    let config = DetectorConfig {
        allow_adjacent: !cmd.strict_adjacency,
        auto_resolve_containment: !cmd.keep_nested,
        ..Default::default()
    };
    let path = cwd.join(&cmd.file);
    let outcome = rewrite_file(&path, edits, &config)?;

    let rollback_path = cmd.rollback_output.as_ref().map(|p| cwd.join(p));
    if let Some(rollback_path) = &rollback_path {
        let json = serde_json::to_string_pretty(&outcome.rollback)?;
        atomic_write(rollback_path, format!("{}\n", json).as_bytes()).with_context(|| {
            format!("Failed to write rollback file: {}", rollback_path.display())
        })?;
    }

    Ok(CommandResult::new(CommandSummary::Rewrite(RewriteReport {
        path: cmd.file,
        outcome,
        rollback_path,
    })))
}
