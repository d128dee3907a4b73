//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `sync`: Reconcile locale files with the keys referenced in source code
//! - `init`: Initialize a keysync configuration file
//! - `rewrite`: Apply a batch of text edits to one file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

use crate::core::sync::{EmptyValuePolicy, SuspiciousKeyPolicy};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Sync(cmd)) => cmd.args.common.verbose,
            Some(Command::Rewrite(cmd)) => cmd.verbose,
            Some(Command::Init) | None => false,
        }
    }
}

/// Arguments overriding the configuration file.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Directory to start the config file search from (default: current directory)
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Source locale (overrides config file)
    #[arg(long)]
    pub source_locale: Option<String>,

    /// Locales directory (overrides config file)
    #[arg(long)]
    pub locales_dir: Option<PathBuf>,

    /// Source code root directory (overrides config file)
    #[arg(long)]
    pub source_root: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Parser)]
pub struct SyncArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Write the changes to the locale files (default is dry-run)
    #[arg(long, visible_alias = "apply")]
    pub write: bool,

    /// Remove keys no source file references
    #[arg(long)]
    pub prune: bool,

    /// Compare placeholders between source and target values
    #[arg(long)]
    pub validate_interpolations: bool,

    /// Treat placeholder mismatches as errors
    #[arg(long)]
    pub strict: bool,

    /// How to treat empty target values (overrides config file)
    #[arg(long, value_enum)]
    pub empty_value_policy: Option<EmptyValuePolicy>,

    /// What to do with suspicious missing keys (overrides config file)
    #[arg(long, value_enum)]
    pub suspicious_key_policy: Option<SuspiciousKeyPolicy>,

    /// Key or key glob to treat as used. Can be specified multiple times
    #[arg(long = "assume", value_name = "KEY")]
    pub assume: Vec<String>,

    /// Only add these missing keys. Can be specified multiple times
    #[arg(long = "select-missing", value_name = "KEY")]
    pub select_missing: Vec<String>,

    /// Only remove these unused keys. Can be specified multiple times
    #[arg(long = "select-unused", value_name = "KEY")]
    pub select_unused: Vec<String>,

    /// Discard the reference cache before scanning
    #[arg(long)]
    pub invalidate_cache: bool,

    /// Back up the locales directory before writing
    #[arg(long, conflicts_with = "no_backup")]
    pub backup: bool,

    /// Never back up the locales directory
    #[arg(long)]
    pub no_backup: bool,

    /// Add missing keys to target locales as well
    #[arg(long)]
    pub seed_targets: bool,

    /// Print unified diffs of the locale files
    #[arg(long)]
    pub diff: bool,

    /// Print the run summary as JSON instead of the report
    #[arg(long)]
    pub json: bool,

    /// Write a JSON preview of the run to this path
    #[arg(long, value_name = "PATH")]
    pub preview_output: Option<PathBuf>,

    /// Write the locale changes as a patch file to this path
    #[arg(long, value_name = "PATH")]
    pub patch_output: Option<PathBuf>,

    /// Files or directories to scan instead of the whole source root
    #[arg(value_name = "PATH")]
    pub targets: Vec<PathBuf>,
}

#[derive(Debug, Args)]
pub struct SyncCommand {
    #[command(flatten)]
    pub args: SyncArgs,
}

#[derive(Debug, Args)]
pub struct RewriteCommand {
    /// File to rewrite
    pub file: PathBuf,

    /// JSON file holding an array of edit operations
    #[arg(long, value_name = "PATH")]
    pub edits: PathBuf,

    /// Report conflicts between edits that only touch
    #[arg(long)]
    pub strict_adjacency: bool,

    /// Keep edits nested in another edit instead of dropping them
    #[arg(long)]
    pub keep_nested: bool,

    /// Write the rollback edits as JSON to this path
    #[arg(long, value_name = "PATH")]
    pub rollback_output: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Reconcile locale files with the translation keys used in source code
    Sync(SyncCommand),
    /// Initialize a new .keysyncrc.json configuration file
    Init,
    /// Apply a batch of non-conflicting text edits to a file
    Rewrite(RewriteCommand),
}
