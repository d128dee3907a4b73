use std::{fs, path::Path};

use serde::Serialize;

use crate::core::{
    edits::{
        conflict::DetectorConfig, detector::EditConflictDetector, operation::EditOperation,
        planner::{DroppedEdit, PlanIssue},
    },
    error::{SyncError, SyncResult},
    utils::atomic_write,
};

/// What `rewrite_file` did to one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RewriteOutcome {
    pub applied: Vec<String>,
    pub dropped: Vec<DroppedEdit>,
    pub warnings: Vec<PlanIssue>,
    /// Inverse edits against the rewritten file.
    pub rollback: Vec<EditOperation>,
    pub changed: bool,
}

/// Apply a batch of edits to a file on disk.
///
/// The batch is all or nothing: on any blocking issue the file is left as it
/// was and the error names the offending edits.
pub fn rewrite_file(
    path: &Path,
    edits: Vec<EditOperation>,
    config: &DetectorConfig,
) -> SyncResult<RewriteOutcome> {
    let source = fs::read_to_string(path).map_err(|e| SyncError::read(path, e))?;

    let mut detector = EditConflictDetector::new(*config);
    detector.extend(edits);
    let batch = detector.apply(&source).map_err(|source| SyncError::Edit {
        path: path.to_path_buf(),
        source,
    })?;

    let changed = batch.text != source;
    if changed {
        atomic_write(path, batch.text.as_bytes()).map_err(|e| SyncError::write(path, e))?;
        tracing::info!(path = %path.display(), edits = batch.applied.len(), "rewrote file");
    }

    Ok(RewriteOutcome {
        applied: batch.applied,
        dropped: batch.dropped,
        warnings: batch.warnings,
        rollback: batch.rollback,
        changed,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use crate::core::edits::{planner::apply_edits, rewrite::*};

    #[test]
    fn test_rewrite_file_applies_and_rolls_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("page.tsx");
        fs::write(&path, "<h1>Hello</h1>").unwrap();

        let outcome = rewrite_file(
            &path,
            vec![EditOperation::new("title", 4, 9, "{t('title')}")],
            &DetectorConfig::default(),
        )
        .unwrap();

        let rewritten = fs::read_to_string(&path).unwrap();
        assert_eq!(rewritten, "<h1>{t('title')}</h1>");
        assert!(outcome.changed);
        assert_eq!(outcome.applied, vec!["title"]);
        assert_eq!(apply_edits(&rewritten, &outcome.rollback).unwrap(), "<h1>Hello</h1>");
    }

    #[test]
    fn test_rewrite_file_leaves_file_on_conflict() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("page.tsx");
        fs::write(&path, "abcdefgh").unwrap();

        let config = DetectorConfig {
            auto_resolve_containment: false,
            ..Default::default()
        };
        let edits = vec![
            EditOperation::new("outer", 0, 8, "x"),
            EditOperation::new("inner", 2, 4, "y"),
        ];
        let err = rewrite_file(&path, edits, &config).unwrap_err();

        match &err {
            SyncError::Edit { source, .. } => {
                assert_eq!(source.edit_ids(), vec!["outer", "inner"]);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!err.is_fatal());
        assert_eq!(fs::read_to_string(&path).unwrap(), "abcdefgh");
    }

    #[test]
    fn test_rewrite_file_out_of_bounds() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.ts");
        fs::write(&path, "abc").unwrap();

        let err = rewrite_file(
            &path,
            vec![EditOperation::new("far", 2, 10, "")],
            &DetectorConfig::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("out of bounds"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "abc");
    }
}
