use serde::Serialize;

use crate::core::{
    edits::{
        conflict::DetectorConfig,
        operation::EditOperation,
        planner::{
            DroppedEdit, PlanIssue, PlanValidation, apply_edits, create_rollback_plan, plan_edits,
            validate_edit_plan_with,
        },
    },
    error::EditError,
};

/// Result of one successful `EditConflictDetector::apply`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedBatch {
    #[serde(skip)]
    pub text: String,
    /// Ids of the applied edits, in application order.
    pub applied: Vec<String>,
    pub dropped: Vec<DroppedEdit>,
    /// Non-blocking findings, such as adjacent edits.
    pub warnings: Vec<PlanIssue>,
    /// Inverse edits against `text`.
    pub rollback: Vec<EditOperation>,
}

/// Collects edits for one buffer and applies them as a single transaction.
///
/// A failed `apply` leaves both the buffer and the detector untouched.
#[derive(Debug, Clone, Default)]
pub struct EditConflictDetector {
    config: DetectorConfig,
    pending: Vec<EditOperation>,
    completed: Vec<EditOperation>,
}

impl EditConflictDetector {
    pub fn new(config: DetectorConfig) -> Self {
        Self {
            config,
            pending: Vec::new(),
            completed: Vec::new(),
        }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    pub fn add(&mut self, edit: EditOperation) {
        self.pending.push(edit);
    }

    pub fn extend(&mut self, edits: impl IntoIterator<Item = EditOperation>) {
        self.pending.extend(edits);
    }

    pub fn pending(&self) -> &[EditOperation] {
        &self.pending
    }

    pub fn completed(&self) -> &[EditOperation] {
        &self.completed
    }

    pub fn clear_pending(&mut self) {
        self.pending.clear();
    }

    /// Plan and validate the pending edits without applying them.
    pub fn check(&self, len: usize) -> PlanValidation {
        let plan = plan_edits(&self.pending, &self.config);
        validate_edit_plan_with(&plan.ordered, len, &self.config)
    }

    /// Apply every pending edit to `source`.
    ///
    /// Blocking issues fail the whole batch. On success the pending edits
    /// move to the completed list.
    pub fn apply(&mut self, source: &str) -> Result<AppliedBatch, EditError> {
        let plan = plan_edits(&self.pending, &self.config);
        let validation = validate_edit_plan_with(&plan.ordered, source.len(), &self.config);
        let warnings = validation.warnings.clone();
        if let Some(err) = validation.into_error() {
            tracing::debug!(error = %err, "rejected edit batch");
            return Err(err);
        }

        let text = apply_edits(source, &plan.ordered)?;
        let rollback = create_rollback_plan(source, &plan.ordered)?;

        tracing::debug!(
            applied = plan.ordered.len(),
            dropped = plan.dropped.len(),
            "applied edit batch"
        );
        let applied = plan.ordered.iter().map(|e| e.id.clone()).collect();
        self.completed.extend(plan.ordered);
        self.pending.clear();

        Ok(AppliedBatch {
            text,
            applied,
            dropped: plan.dropped,
            warnings,
            rollback,
        })
    }
}
