use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::{
    cli::args::CommonArgs,
    config::{CONFIG_FILE_NAME, Config, load_config},
};

/// A loaded project: its root directory and effective configuration.
#[derive(Debug)]
pub struct Project {
    /// Directory holding the config file, or the search start without one.
    pub root: PathBuf,
    pub config: Config,
}

impl Project {
    /// Load the project seen from `cwd`.
    ///
    /// Precedence is CLI arguments, then the config file, then defaults.
    pub fn load(common: &CommonArgs, cwd: &Path) -> Result<Self> {
        let start = match &common.root {
            Some(root) => cwd.join(root),
            None => cwd.to_path_buf(),
        };
        let start = start
            .canonicalize()
            .with_context(|| format!("Invalid root directory: {}", start.display()))?;

        let loaded = load_config(&start)?;
        if common.verbose && !loaded.from_file() {
            eprintln!("Note: No {} found, using default configuration", CONFIG_FILE_NAME);
        }
        let root = loaded
            .path
            .as_deref()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .unwrap_or(start);

        let mut config = loaded.config;
        if let Some(locale) = &common.source_locale {
            config.source_locale = locale.clone();
        }
        if let Some(dir) = &common.locales_dir {
            config.locales_dir = dir.to_string_lossy().to_string();
        }
        if let Some(dir) = &common.source_root {
            config.source_root = dir.to_string_lossy().to_string();
        }

        Ok(Self { root, config })
    }
}
