use std::{collections::BTreeSet, path::Path};

use anyhow::{Context, Result};

use super::{CommandResult, CommandSummary, SyncReport, project::Project};
use crate::{
    cli::args::{SyncArgs, SyncCommand},
    core::{
        diff::{PreviewPayload, build_locale_diffs, write_patch_file, write_preview},
        sync::{KeySelection, SyncOptions, Syncer},
    },
};

fn selection(keys: &[String]) -> Option<BTreeSet<String>> {
    (!keys.is_empty()).then(|| keys.iter().cloned().collect())
}

/// Translate command-line flags into run options.
///
/// Relative target paths are resolved against `cwd`.
pub fn sync_options(args: &SyncArgs, cwd: &Path) -> SyncOptions {
    let backup = match (args.backup, args.no_backup) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    };
    SyncOptions {
        write: args.write,
        prune: args.prune,
        validate_interpolations: args.validate_interpolations,
        empty_value_policy: args.empty_value_policy,
        assumed_keys: args.assume.clone(),
        selection: KeySelection {
            missing: selection(&args.select_missing),
            unused: selection(&args.select_unused),
        },
        target_files: args.targets.iter().map(|t| cwd.join(t)).collect(),
        invalidate_cache: args.invalidate_cache,
        backup,
        seed_target_locales: args.seed_targets.then_some(true),
        strict: args.strict,
    }
}

pub fn sync(cmd: SyncCommand) -> Result<CommandResult> {
    let args = cmd.args;
    let cwd = std::env::current_dir().context("Failed to read the current directory")?;
    let mut project = Project::load(&args.common, &cwd)?;
    if let Some(policy) = args.suspicious_key_policy {
        project.config.suspicious_key_policy = policy;
    }
    let delimiter = project.config.key_delimiter.clone();

    let options = sync_options(&args, &cwd);
    let summary = Syncer::new(&project.root, project.config).run(&options)?;
    let diffs = build_locale_diffs(&summary.projection, &delimiter);

    let preview_path = args.preview_output.as_ref().map(|p| cwd.join(p));
    if let Some(path) = &preview_path {
        let argv: Vec<String> = std::env::args().skip(2).collect();
        let payload = PreviewPayload::new("sync", argv, &summary, diffs.clone());
        write_preview(path, &payload)?;
    }
    let patch_path = args.patch_output.as_ref().map(|p| cwd.join(p));
    if let Some(path) = &patch_path {
        write_patch_file(path, &diffs)?;
    }

    let locale_files = summary.target_locales.len() + 1;
    Ok(CommandResult::new(CommandSummary::Sync(SyncReport {
        summary,
        diffs,
        locale_files,
        show_diff: args.diff,
        json: args.json,
        preview_path,
        patch_path,
    })))
}
