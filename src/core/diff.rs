//! Reviewable output for a reconciliation run: unified diffs per locale
//! file, a JSON preview payload and a patch file.

use std::{collections::BTreeSet, path::Path};

use serde::Serialize;
use serde_json::Value;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::core::{
    error::{SyncError, SyncResult},
    parsers::json::flatten_locale,
    sync::{LocaleSnapshot, SyncSummary},
    utils::atomic_write,
};

pub const PREVIEW_TYPE: &str = "keysync-preview";
pub const PREVIEW_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocaleDiff {
    pub locale: String,
    pub path: String,
    pub diff: String,
    pub added: usize,
    pub updated: usize,
    pub removed: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DiffTotals {
    pub added: usize,
    pub updated: usize,
    pub removed: usize,
}

/// Unified diff with `a/` and `b/` headers. Empty when nothing changed.
///
/// A file that does not exist yet is diffed against `/dev/null`.
pub fn unified_diff(path: &str, before: Option<&str>, after: &str) -> String {
    let original = before.unwrap_or("");
    if original == after {
        return String::new();
    }

    let patch = diffy::create_patch(original, after).to_string();
    let hunks: String = patch
        .lines()
        .skip_while(|line| line.starts_with("--- ") || line.starts_with("+++ "))
        .flat_map(|line| [line, "\n"])
        .collect();

    let old_header = match before {
        Some(_) => format!("a/{}", path),
        None => "/dev/null".to_string(),
    };
    format!("--- {}\n+++ b/{}\n{}", old_header, path, hunks)
}

/// Diff every projected locale file and count its key changes.
pub fn build_locale_diffs(projection: &[LocaleSnapshot], delimiter: &str) -> Vec<LocaleDiff> {
    projection
        .iter()
        .filter_map(|snapshot| {
            let diff = unified_diff(&snapshot.path, snapshot.before.as_deref(), &snapshot.after);
            if diff.is_empty() {
                return None;
            }
            let (added, updated, removed) =
                count_changes(snapshot.before.as_deref(), &snapshot.after, delimiter);
            Some(LocaleDiff {
                locale: snapshot.locale.clone(),
                path: snapshot.path.clone(),
                diff,
                added,
                updated,
                removed,
            })
        })
        .collect()
}

/// Added, updated and removed flattened keys between two locale files.
fn count_changes(before: Option<&str>, after: &str, delimiter: &str) -> (usize, usize, usize) {
    let parse = |text: &str| {
        serde_json::from_str::<Value>(text)
            .map(|value| flatten_locale(&value, delimiter))
            .unwrap_or_default()
    };
    let old = before.map(&parse).unwrap_or_default();
    let new = parse(after);

    let keys: BTreeSet<&String> = old.keys().chain(new.keys()).collect();
    keys.into_iter()
        .fold((0, 0, 0), |(added, updated, removed), key| {
            match (old.get(key), new.get(key)) {
                (None, Some(_)) => (added + 1, updated, removed),
                (Some(_), None) => (added, updated, removed + 1),
                (Some(a), Some(b)) if a != b => (added, updated + 1, removed),
                _ => (added, updated, removed),
            }
        })
}

/// Concatenated diffs, ready for `git apply`.
pub fn render_patch(diffs: &[LocaleDiff]) -> String {
    diffs.iter().map(|d| d.diff.as_str()).collect()
}

pub fn write_patch_file(path: &Path, diffs: &[LocaleDiff]) -> SyncResult<()> {
    atomic_write(path, render_patch(diffs).as_bytes()).map_err(|e| SyncError::write(path, e))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewSummary<'a> {
    #[serde(flatten)]
    pub result: &'a SyncSummary,
    pub diffs: Vec<LocaleDiff>,
    pub totals: DiffTotals,
}

/// Machine-readable description of a run, for review before applying.
#[derive(Debug, Serialize)]
pub struct PreviewPayload<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub version: u32,
    pub command: String,
    pub args: Vec<String>,
    pub timestamp: String,
    pub summary: PreviewSummary<'a>,
}

impl<'a> PreviewPayload<'a> {
    pub fn new(
        command: impl Into<String>,
        args: Vec<String>,
        summary: &'a SyncSummary,
        diffs: Vec<LocaleDiff>,
    ) -> Self {
        let totals = diffs.iter().fold(DiffTotals::default(), |acc, d| DiffTotals {
            added: acc.added + d.added,
            updated: acc.updated + d.updated,
            removed: acc.removed + d.removed,
        });
        Self {
            kind: PREVIEW_TYPE,
            version: PREVIEW_VERSION,
            command: command.into(),
            args,
            timestamp: OffsetDateTime::now_utc()
                .format(&Rfc3339)
                .unwrap_or_default(),
            summary: PreviewSummary {
                result: summary,
                diffs,
                totals,
            },
        }
    }
}

pub fn write_preview(path: &Path, payload: &PreviewPayload<'_>) -> SyncResult<()> {
    let json = serde_json::to_string_pretty(payload).map_err(|source| SyncError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;
    atomic_write(path, format!("{}\n", json).as_bytes()).map_err(|e| SyncError::write(path, e))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use crate::core::diff::*;

    fn snapshot(before: Option<&str>, after: &str) -> LocaleSnapshot {
        LocaleSnapshot {
            locale: "en".to_string(),
            path: "locales/en.json".to_string(),
            before: before.map(str::to_string),
            after: after.to_string(),
        }
    }

    #[test]
    fn test_unified_diff_headers() {
        let diff = unified_diff(
            "locales/en.json",
            Some("{}\n"),
            "{\n  \"greeting\": \"Greeting\"\n}\n",
        );
        assert!(diff.starts_with("--- a/locales/en.json\n+++ b/locales/en.json\n@@ "));
        assert!(diff.contains("\n-{}\n"));
        assert!(diff.contains("\n+  \"greeting\": \"Greeting\"\n"));
    }

    #[test]
    fn test_unified_diff_new_file_and_no_change() {
        let diff = unified_diff("locales/fr.json", None, "{}\n");
        assert!(diff.starts_with("--- /dev/null\n+++ b/locales/fr.json\n"));
        assert_eq!(unified_diff("x.json", Some("{}\n"), "{}\n"), "");
    }

    #[test]
    fn test_build_locale_diffs_counts() {
        let before = r#"{"a": "A", "b": "B", "nested": {"x": "X"}}"#;
        let after = r#"{"a": "A2", "c": "C", "nested": {"x": "X"}}"#;

        let diffs = build_locale_diffs(&[snapshot(Some(before), after)], ".");
        assert_eq!(diffs.len(), 1);
        assert_eq!((diffs[0].added, diffs[0].updated, diffs[0].removed), (1, 1, 1));
        assert_eq!(render_patch(&diffs), diffs[0].diff);
    }

    #[test]
    fn test_preview_payload_shape() {
        let summary = SyncSummary {
            source_locale: "en".to_string(),
            ..Default::default()
        };
        let diffs = build_locale_diffs(&[snapshot(None, "{\n  \"a\": \"A\"\n}\n")], ".");
        let payload = PreviewPayload::new("sync", vec!["--prune".to_string()], &summary, diffs);

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["type"], "keysync-preview");
        assert_eq!(json["version"], 1);
        assert_eq!(json["args"], serde_json::json!(["--prune"]));
        assert_eq!(json["summary"]["sourceLocale"], "en");
        assert_eq!(json["summary"]["totals"]["added"], 1);
        assert!(json["timestamp"].as_str().unwrap().contains('T'));
    }

    #[test]
    fn test_write_preview_and_patch() {
        let dir = tempdir().unwrap();
        let summary = SyncSummary::default();
        let diffs = build_locale_diffs(&[snapshot(Some("{}\n"), "{\n  \"a\": \"A\"\n}\n")], ".");

        let patch_path = dir.path().join("out/changes.patch");
        write_patch_file(&patch_path, &diffs).unwrap();
        let patch = std::fs::read_to_string(&patch_path).unwrap();
        assert!(patch.starts_with("--- a/locales/en.json"));

        let preview_path = dir.path().join("preview.json");
        write_preview(&preview_path, &PreviewPayload::new("sync", Vec::new(), &summary, diffs))
            .unwrap();
        let written: Value =
            serde_json::from_str(&std::fs::read_to_string(&preview_path).unwrap()).unwrap();
        assert_eq!(written["summary"]["diffs"][0]["locale"], "en");
    }
}
