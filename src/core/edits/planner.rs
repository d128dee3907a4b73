//! Planning, validation, application and rollback of edit batches.

use std::{cmp::Reverse, collections::HashMap};

use serde::Serialize;

use crate::core::{
    edits::{
        conflict::{ConflictKind, DetectorConfig, EditConflict, detect_conflicts},
        operation::EditOperation,
    },
    error::EditError,
};

/// An edit removed from a plan because its parent edit replaces it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DroppedEdit {
    pub id: String,
    pub parent_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditPlan {
    /// Kept edits in application order.
    pub ordered: Vec<EditOperation>,
    pub dropped: Vec<DroppedEdit>,
    /// Conflicts among the kept edits.
    pub conflicts: Vec<EditConflict>,
}

/// Parent of every edit nested in another edit of the batch.
///
/// An explicit `parent_id` wins when that edit is in the batch and its range
/// contains the child. Otherwise the parent is the smallest edit containing it.
fn exact_parents(edits: &[EditOperation]) -> HashMap<&str, &str> {
    let mut parents = HashMap::new();
    for edit in edits {
        let explicit = edit.parent_id.as_deref().filter(|parent| {
            *parent != edit.id
                && edits
                    .iter()
                    .any(|e| e.id == *parent && e.range.contains(&edit.range))
        });
        let parent = explicit.or_else(|| {
            edits
                .iter()
                .filter(|outer| outer.id != edit.id && outer.range.contains(&edit.range))
                .min_by(|a, b| {
                    a.range
                        .len()
                        .cmp(&b.range.len())
                        .then_with(|| b.range.start.cmp(&a.range.start))
                        .then_with(|| a.id.cmp(&b.id))
                })
                .map(|outer| outer.id.as_str())
        });
        if let Some(parent) = parent {
            parents.insert(edit.id.as_str(), parent);
        }
    }
    parents
}

/// Resolve containment and order a batch of edits.
///
/// With `auto_resolve_containment`, every edit whose parent is in the batch
/// is dropped. Kept edits are ordered by descending priority, then
/// descending start, then descending end, then id.
pub fn plan_edits(edits: &[EditOperation], config: &DetectorConfig) -> EditPlan {
    let mut dropped = Vec::new();
    let mut kept: Vec<EditOperation> = Vec::with_capacity(edits.len());

    let parents = if config.auto_resolve_containment {
        exact_parents(edits)
    } else {
        HashMap::new()
    };
    for edit in edits {
        match parents.get(edit.id.as_str()) {
            Some(parent) => dropped.push(DroppedEdit {
                id: edit.id.clone(),
                parent_id: parent.to_string(),
            }),
            None => kept.push(edit.clone()),
        }
    }

    let conflicts = detect_conflicts(&kept, config);
    kept.sort_by(|a, b| {
        b.effective_priority()
            .cmp(&a.effective_priority())
            .then_with(|| b.range.start.cmp(&a.range.start))
            .then_with(|| b.range.end.cmp(&a.range.end))
            .then_with(|| a.id.cmp(&b.id))
    });

    EditPlan {
        ordered: kept,
        dropped,
        conflicts,
    }
}

fn check_range(edit: &EditOperation, source: Option<&str>, len: usize) -> Result<(), EditError> {
    let range = edit.range;
    if range.start > range.end {
        return Err(EditError::InvertedRange {
            id: edit.id.clone(),
            start: range.start,
            end: range.end,
        });
    }
    if range.end > len {
        return Err(EditError::OutOfBounds {
            id: edit.id.clone(),
            start: range.start,
            end: range.end,
            len,
        });
    }
    if let Some(source) = source {
        for offset in [range.start, range.end] {
            if !source.is_char_boundary(offset) {
                return Err(EditError::NotCharBoundary {
                    id: edit.id.clone(),
                    offset,
                });
            }
        }
    }
    Ok(())
}

/// Apply edits to `source`.
///
/// Every range is validated before anything is spliced. Edits are applied
/// from the end of the buffer backwards; insertions at the same offset keep
/// their input order. Overlapping ranges are rejected.
pub fn apply_edits(source: &str, edits: &[EditOperation]) -> Result<String, EditError> {
    for edit in edits {
        check_range(edit, Some(source), source.len())?;
    }

    let mut order: Vec<(usize, &EditOperation)> = edits.iter().enumerate().collect();
    order.sort_by_key(|(index, edit)| {
        (Reverse(edit.range.start), Reverse(edit.range.end), Reverse(*index))
    });

    let mut lowest: Option<&EditOperation> = None;
    for (_, edit) in &order {
        if let Some(prev) = lowest
            && edit.range.end > prev.range.start
        {
            return Err(EditError::InvalidPlan {
                ids: vec![edit.id.clone(), prev.id.clone()],
                reasons: vec![format!("ranges {} and {} overlap", edit.range, prev.range)],
            });
        }
        lowest = Some(edit);
    }

    let mut text = source.to_string();
    for (_, edit) in order {
        text.replace_range(edit.range.start..edit.range.end, &edit.replacement);
    }
    Ok(text)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanIssue {
    pub edit_ids: Vec<String>,
    pub message: String,
}

/// Outcome of checking a plan against a buffer length.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlanValidation {
    pub errors: Vec<PlanIssue>,
    pub warnings: Vec<PlanIssue>,
}

impl PlanValidation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// The blocking issues as one error, if any.
    pub fn into_error(self) -> Option<EditError> {
        if self.errors.is_empty() {
            return None;
        }
        let mut ids = Vec::new();
        let mut reasons = Vec::new();
        for issue in self.errors {
            for id in issue.edit_ids {
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
            reasons.push(issue.message);
        }
        Some(EditError::InvalidPlan { ids, reasons })
    }

    fn push_conflict(&mut self, conflict: &EditConflict) {
        let issue = PlanIssue {
            edit_ids: vec![conflict.first.clone(), conflict.second.clone()],
            message: conflict.to_string(),
        };
        if conflict.kind.is_blocking() {
            self.errors.push(issue);
        } else {
            self.warnings.push(issue);
        }
    }
}

/// Check a plan: range errors, duplicates, containment and overlap are
/// blocking; adjacency is a warning.
pub fn validate_edit_plan(edits: &[EditOperation], len: usize) -> PlanValidation {
    validate_edit_plan_with(edits, len, &DetectorConfig::default())
}

/// `validate_edit_plan` with the adjacency gap taken from `config`.
pub fn validate_edit_plan_with(
    edits: &[EditOperation],
    len: usize,
    config: &DetectorConfig,
) -> PlanValidation {
    let mut validation = PlanValidation::default();
    for edit in edits {
        if let Err(e) = check_range(edit, None, len) {
            validation.errors.push(PlanIssue {
                edit_ids: vec![edit.id.clone()],
                message: e.to_string(),
            });
        }
    }

    let config = DetectorConfig {
        allow_adjacent: false,
        ..*config
    };
    for conflict in detect_conflicts(edits, &config) {
        validation.push_conflict(&conflict);
    }
    validation
}

/// Inverse edits that turn the edited buffer back into `original`.
///
/// `applied` are the edits that were applied to `original`. The returned
/// edits address the edited buffer and carry ids `rollback:<id>`.
pub fn create_rollback_plan(
    original: &str,
    applied: &[EditOperation],
) -> Result<Vec<EditOperation>, EditError> {
    for edit in applied {
        check_range(edit, Some(original), original.len())?;
    }

    let mut order: Vec<(usize, &EditOperation)> = applied.iter().enumerate().collect();
    order.sort_by_key(|(index, edit)| (edit.range.start, edit.range.end, *index));

    let mut delta: isize = 0;
    let mut inverse = Vec::with_capacity(applied.len());
    for (_, edit) in order {
        let start = edit.range.start.saturating_add_signed(delta);
        let end = start + edit.replacement.len();
        let restored = &original[edit.range.start..edit.range.end];
        inverse.push(EditOperation::new(
            format!("rollback:{}", edit.id),
            start,
            end,
            restored,
        ));
        delta += edit.replacement.len() as isize - edit.range.len() as isize;
    }
    Ok(inverse)
}

/// Blocking conflict kinds present in `conflicts`.
pub fn blocking_kinds(conflicts: &[EditConflict]) -> Vec<ConflictKind> {
    let mut kinds: Vec<ConflictKind> = conflicts
        .iter()
        .map(|c| c.kind)
        .filter(ConflictKind::is_blocking)
        .collect();
    kinds.sort();
    kinds.dedup();
    kinds
}
