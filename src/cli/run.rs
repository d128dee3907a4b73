use anyhow::{Context, Result};

use super::{
    args::{Arguments, Command},
    commands::{CommandResult, init::init, rewrite::rewrite, sync::sync},
};

/// Dispatch to the command handler.
///
/// # Returns
/// - `Ok(CommandResult)` with the findings of the command
/// - `Err` if the command could not complete (config, I/O or parse errors)
pub fn run(Arguments { command }: Arguments) -> Result<CommandResult> {
    match command {
        Some(Command::Sync(cmd)) => sync(cmd),
        Some(Command::Rewrite(cmd)) => rewrite(cmd),
        Some(Command::Init) => {
            let cwd = std::env::current_dir().context("Failed to read the current directory")?;
            init(&cwd)
        }
        None => {
            anyhow::bail!("No command provided. Use --help to see available commands.")
        }
    }
}
