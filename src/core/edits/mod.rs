//! Conflict-aware text edits.
//!
//! ## Module Structure
//!
//! - `operation`: Edit operations and byte ranges
//! - `conflict`: Pairwise conflict classification
//! - `planner`: Containment resolution, ordering, validation, application and rollback
//! - `detector`: Transactional batch application
//! - `rewrite`: Applying a batch to a file on disk

pub mod conflict;
pub mod detector;
pub mod operation;
pub mod planner;
pub mod rewrite;

pub use conflict::{ConflictKind, DetectorConfig, EditConflict, classify_pair, detect_conflicts};
pub use detector::{AppliedBatch, EditConflictDetector};
pub use operation::{EditOperation, TextRange};
pub use planner::{
    DroppedEdit, EditPlan, PlanIssue, PlanValidation, apply_edits, blocking_kinds,
    create_rollback_plan, plan_edits, validate_edit_plan, validate_edit_plan_with,
};
pub use rewrite::{RewriteOutcome, rewrite_file};
