//! Report formatting and printing.
//!
//! Findings are printed cargo-style, followed by a summary of the locale
//! changes a run made or would make.

use std::io::{self, Write};

use colored::{ColoredString, Colorize};

use super::commands::{CommandResult, CommandSummary, InitSummary, RewriteReport, SyncReport};
use crate::{
    core::sync::AppliedChanges,
    issues::{ActionableItem, Severity},
};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

fn severity_label(severity: Severity) -> ColoredString {
    match severity {
        Severity::Error => "error".bold().red(),
        Severity::Warning => "warning".bold().yellow(),
        Severity::Info => "info".bold().cyan(),
    }
}

fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        format!("{} {}", count, word)
    } else {
        format!("{} {}s", count, word)
    }
}

/// Print findings to a custom writer, in the order given.
pub fn report_items_to<W: Write>(items: &[ActionableItem], writer: &mut W) {
    for item in items {
        print_item(item, writer);
    }

    let errors = items.iter().filter(|i| i.severity == Severity::Error).count();
    let warnings = items.iter().filter(|i| i.severity == Severity::Warning).count();
    if errors + warnings > 0 {
        let _ = writeln!(
            writer,
            "{} {} ({}, {})",
            FAILURE_MARK.red(),
            plural(errors + warnings, "problem"),
            plural(errors, "error").red(),
            plural(warnings, "warning").yellow()
        );
    }
}

fn print_item<W: Write>(item: &ActionableItem, writer: &mut W) {
    let _ = writeln!(
        writer,
        "{}: {}  {}",
        severity_label(item.severity),
        item.message,
        item.kind.to_string().dimmed().cyan()
    );

    if let Some(path) = &item.file_path {
        let _ = writeln!(
            writer,
            "  {} {}:{}:{}",
            "-->".blue(),
            path,
            item.line.unwrap_or(1),
            item.column.unwrap_or(1)
        );
    }
    if let Some(details) = &item.details {
        let _ = writeln!(writer, "  {} {} {}", "=".blue(), "note:".bold(), details);
    }

    let _ = writeln!(writer);
}

fn touched_locales(changes: &AppliedChanges) -> usize {
    let mut locales: Vec<&String> = changes
        .added
        .iter()
        .chain(&changes.removed)
        .filter(|(_, keys)| !keys.is_empty())
        .map(|(locale, _)| locale)
        .collect();
    locales.sort();
    locales.dedup();
    locales.len()
}

/// Print the locale change summary of a sync run.
pub fn print_changes_to<W: Write>(report: &SyncReport, writer: &mut W) {
    let summary = &report.summary;
    let changes = &summary.changes;
    if changes.is_empty() {
        return;
    }

    let counts = format!(
        "{}: {} added, {} removed",
        plural(touched_locales(changes), "locale file"),
        plural(changes.added_count(), "key"),
        changes.removed_count()
    );
    if summary.written {
        let _ = writeln!(writer, "{} {}", "Updated".green().bold(), counts);
        if let Some(backup) = &summary.backup_path {
            let _ = writeln!(writer, "  - backup: {}", backup.display());
        }
    } else {
        let _ = writeln!(writer, "{} {}", "Would update".yellow().bold(), counts);
        let _ = writeln!(writer, "Run with {} to apply these changes.", "--write".cyan());
    }
}

fn print_diff_to<W: Write>(diff: &str, writer: &mut W) {
    for line in diff.lines() {
        let line = if line.starts_with("+++") || line.starts_with("---") {
            line.bold()
        } else if line.starts_with('+') {
            line.green()
        } else if line.starts_with('-') {
            line.red()
        } else if line.starts_with("@@") {
            line.cyan()
        } else {
            line.normal()
        };
        let _ = writeln!(writer, "{}", line);
    }
    let _ = writeln!(writer);
}

fn print_sync_to<W: Write>(report: &SyncReport, verbose: bool, writer: &mut W) {
    let summary = &report.summary;
    if report.json {
        match serde_json::to_string_pretty(summary) {
            Ok(json) => {
                let _ = writeln!(writer, "{}", json);
            }
            Err(err) => eprintln!("Error: failed to serialize summary: {}", err),
        }
        return;
    }

    if verbose {
        eprintln!(
            "Scanned {} ({} cache hits, {} misses), found {}",
            plural(summary.files_scanned, "source file"),
            summary.cache_hits,
            summary.cache_misses,
            plural(summary.references, "reference")
        );
        if let Some(reason) = &summary.cache_invalidated {
            eprintln!("Cache invalidated: {}", reason);
        }
    }

    report_items_to(&summary.items, writer);

    if report.show_diff {
        for diff in &report.diffs {
            print_diff_to(&diff.diff, writer);
        }
    }

    let problems = summary.count(Severity::Error) + summary.count(Severity::Warning);
    if problems == 0 {
        let _ = writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            format!(
                "Checked {}, {} - no issues found",
                plural(summary.files_scanned, "source file"),
                plural(report.locale_files, "locale file")
            )
            .green()
        );
    }
    print_changes_to(report, writer);

    if let Some(path) = &report.preview_path {
        let _ = writeln!(writer, "Preview written to {}", path.display());
    }
    if let Some(path) = &report.patch_path {
        let _ = writeln!(writer, "Patch written to {}", path.display());
    }
}

fn print_init(summary: &InitSummary) {
    match &summary.error {
        Some(error) => eprintln!("Error: {}", error),
        None => println!(
            "{} {}",
            SUCCESS_MARK.green(),
            format!("Created {}", summary.path.display()).green()
        ),
    }
}

fn print_rewrite_to<W: Write>(report: &RewriteReport, writer: &mut W) {
    let outcome = &report.outcome;
    for warning in &outcome.warnings {
        let _ = writeln!(writer, "{}: {}", severity_label(Severity::Warning), warning.message);
    }
    for dropped in &outcome.dropped {
        let _ = writeln!(
            writer,
            "  - dropped '{}' (replaced by '{}')",
            dropped.id, dropped.parent_id
        );
    }

    if outcome.changed {
        let _ = writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            format!(
                "Applied {} to {}",
                plural(outcome.applied.len(), "edit"),
                report.path.display()
            )
            .green()
        );
    } else {
        let _ = writeln!(writer, "No changes to {}", report.path.display());
    }
    if let Some(path) = &report.rollback_path {
        let _ = writeln!(writer, "Rollback edits written to {}", path.display());
    }
}

pub fn print(result: &CommandResult, verbose: bool) {
    let mut stdout = io::stdout().lock();
    match &result.summary {
        CommandSummary::Sync(report) => print_sync_to(report, verbose, &mut stdout),
        CommandSummary::Init(summary) => print_init(summary),
        CommandSummary::Rewrite(report) => print_rewrite_to(report, &mut stdout),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use insta::assert_snapshot;
    use pretty_assertions::assert_eq;

    use crate::{cli::report::*, core::sync::SyncSummary, issues::ItemKind};

    fn render(f: impl FnOnce(&mut Vec<u8>)) -> String {
        colored::control::set_override(false);
        let mut out = Vec::new();
        f(&mut out);
        String::from_utf8(out).unwrap()
    }

    fn missing_item() -> ActionableItem {
        ActionableItem {
            kind: ItemKind::MissingKey,
            severity: Severity::Error,
            key: Some("greeting".to_string()),
            file_path: Some("src/app.tsx".to_string()),
            line: Some(3),
            column: Some(14),
            message: "missing key \"greeting\" would be added".to_string(),
            details: Some("referenced 2 times".to_string()),
        }
    }

    fn report(summary: SyncSummary) -> SyncReport {
        SyncReport {
            summary,
            diffs: Vec::new(),
            locale_files: 2,
            show_diff: false,
            json: false,
            preview_path: None,
            patch_path: None,
        }
    }

    #[test]
    fn test_item_format() {
        let output = render(|out| report_items_to(&[missing_item()], out));
        let first = output.lines().next().unwrap_or_default();

        assert_snapshot!(first, @r#"error: missing key "greeting" would be added  missing-key"#);
        assert!(output.contains("  --> src/app.tsx:3:14\n"));
        assert!(output.contains("  = note: referenced 2 times\n"));
        assert!(output.ends_with("✘ 1 problem (1 error, 0 warnings)\n"));
    }

    #[test]
    fn test_info_items_are_not_problems() {
        let item = ActionableItem {
            severity: Severity::Info,
            ..missing_item()
        };
        let output = render(|out| report_items_to(&[item], out));
        assert!(output.starts_with("info: "));
        assert!(!output.contains("problem"));
    }

    #[test]
    fn test_dry_run_change_summary() {
        let mut summary = SyncSummary::default();
        summary.changes.added = BTreeMap::from([
            ("en".to_string(), vec!["greeting".to_string()]),
            ("fr".to_string(), vec!["greeting".to_string()]),
        ]);
        let output = render(|out| print_changes_to(&report(summary), out));

        assert_eq!(
            output,
            "Would update 2 locale files: 2 keys added, 0 removed\n\
             Run with --write to apply these changes.\n"
        );
    }

    #[test]
    fn test_clean_run_prints_success() {
        let summary = SyncSummary {
            files_scanned: 1,
            ..Default::default()
        };
        let output = render(|out| print_sync_to(&report(summary), false, out));

        assert_snapshot!(
            output.trim_end(),
            @"✓ Checked 1 source file, 2 locale files - no issues found"
        );
    }
}
