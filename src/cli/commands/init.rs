use std::{fs, path::Path};

use anyhow::{Context, Result};

use super::{CommandResult, CommandSummary, InitSummary};
use crate::config::{CONFIG_FILE_NAME, default_config_json};

/// Write a default `.keysyncrc.json` into `dir` unless one already exists.
pub fn init(dir: &Path) -> Result<CommandResult> {
    let path = dir.join(CONFIG_FILE_NAME);

    let error = if path.exists() {
        Some(format!("{} already exists", CONFIG_FILE_NAME))
    } else {
        fs::write(&path, default_config_json()?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!(path = %path.display(), "created config file");
        None
    };

    Ok(CommandResult::new(CommandSummary::Init(InitSummary {
        path,
        error,
    })))
}
