//! Pairwise conflict detection between text edits.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::edits::operation::EditOperation;

/// Conflict kinds, in priority order. A pair gets at most one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConflictKind {
    /// Identical ranges.
    Duplicate,
    /// One range lies inside the other.
    Containment,
    /// Ranges partially overlap.
    Overlap,
    /// Disjoint ranges closer than the configured gap.
    Adjacent,
}

impl ConflictKind {
    /// Whether the pair cannot be applied together.
    pub fn is_blocking(&self) -> bool {
        !matches!(self, ConflictKind::Adjacent)
    }
}

impl fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConflictKind::Duplicate => write!(f, "duplicate"),
            ConflictKind::Containment => write!(f, "containment"),
            ConflictKind::Overlap => write!(f, "overlap"),
            ConflictKind::Adjacent => write!(f, "adjacent"),
        }
    }
}

/// A conflict between two edits.
///
/// For `Containment`, `first` is the outer edit. Otherwise the ids keep the
/// input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditConflict {
    pub kind: ConflictKind,
    pub first: String,
    pub second: String,
}

impl fmt::Display for EditConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ConflictKind::Containment => {
                write!(f, "edit '{}' contains '{}'", self.first, self.second)
            }
            kind => write!(f, "edits '{}' and '{}': {}", self.first, self.second, kind),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectorConfig {
    /// Do not report adjacent pairs.
    pub allow_adjacent: bool,
    /// Largest gap in bytes at which disjoint edits count as adjacent.
    pub min_gap: usize,
    /// Drop edits nested in another edit of the same batch.
    pub auto_resolve_containment: bool,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            allow_adjacent: true,
            min_gap: 0,
            auto_resolve_containment: true,
        }
    }
}

/// Classify one pair.
pub fn classify_pair(
    a: &EditOperation,
    b: &EditOperation,
    config: &DetectorConfig,
) -> Option<EditConflict> {
    let conflict = |kind, first: &EditOperation, second: &EditOperation| EditConflict {
        kind,
        first: first.id.clone(),
        second: second.id.clone(),
    };

    if a.range == b.range {
        return Some(conflict(ConflictKind::Duplicate, a, b));
    }
    if a.range.contains(&b.range) {
        return Some(conflict(ConflictKind::Containment, a, b));
    }
    if b.range.contains(&a.range) {
        return Some(conflict(ConflictKind::Containment, b, a));
    }
    if a.range.overlaps(&b.range) {
        return Some(conflict(ConflictKind::Overlap, a, b));
    }
    match a.range.gap(&b.range) {
        Some(gap) if gap <= config.min_gap && !config.allow_adjacent => {
            Some(conflict(ConflictKind::Adjacent, a, b))
        }
        _ => None,
    }
}

/// Every conflicting pair, in input order.
pub fn detect_conflicts(edits: &[EditOperation], config: &DetectorConfig) -> Vec<EditConflict> {
    let mut conflicts = Vec::new();
    for (i, a) in edits.iter().enumerate() {
        for b in &edits[i + 1..] {
            if let Some(conflict) = classify_pair(a, b, config) {
                conflicts.push(conflict);
            }
        }
    }
    conflicts
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::core::edits::conflict::*;

    fn edit(id: &str, start: usize, end: usize) -> EditOperation {
        EditOperation::new(id, start, end, "x")
    }

    #[test]
    fn test_disjoint_edits_do_not_conflict() {
        let edits = vec![edit("a", 0, 5), edit("b", 10, 15), edit("c", 20, 20)];
        assert!(detect_conflicts(&edits, &DetectorConfig::default()).is_empty());
    }

    #[test]
    fn test_equal_ranges_are_one_duplicate_per_pair() {
        let edits = vec![edit("a", 3, 8), edit("b", 3, 8), edit("c", 3, 8)];
        let conflicts = detect_conflicts(&edits, &DetectorConfig::default());

        assert_eq!(conflicts.len(), 3);
        assert!(conflicts.iter().all(|c| c.kind == ConflictKind::Duplicate));
        assert_eq!((conflicts[0].first.as_str(), conflicts[0].second.as_str()), ("a", "b"));
    }

    #[test]
    fn test_containment_names_outer_first() {
        let edits = vec![edit("inner", 10, 20), edit("outer", 0, 50)];
        let conflicts = detect_conflicts(&edits, &DetectorConfig::default());
        assert_eq!(
            conflicts,
            vec![EditConflict {
                kind: ConflictKind::Containment,
                first: "outer".to_string(),
                second: "inner".to_string(),
            }]
        );
        assert_eq!(conflicts[0].to_string(), "edit 'outer' contains 'inner'");
    }

    #[test]
    fn test_overlap() {
        let edits = [edit("a", 0, 10), edit("b", 5, 15)];
        let conflicts = detect_conflicts(&edits, &DetectorConfig::default());
        assert_eq!(conflicts[0].kind, ConflictKind::Overlap);
        assert!(conflicts[0].kind.is_blocking());
    }

    #[test]
    fn test_adjacent_only_when_disallowed() {
        let edits = vec![edit("a", 0, 10), edit("b", 10, 12), edit("c", 14, 16)];
        assert!(detect_conflicts(&edits, &DetectorConfig::default()).is_empty());

        let strict = DetectorConfig {
            allow_adjacent: false,
            ..Default::default()
        };
        let conflicts = detect_conflicts(&edits, &strict);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].kind, ConflictKind::Adjacent);
        assert!(!conflicts[0].kind.is_blocking());

        let wide = DetectorConfig {
            min_gap: 2,
            ..strict
        };
        assert_eq!(detect_conflicts(&edits, &wide).len(), 2);
    }

    #[test]
    fn test_zero_width_edits() {
        let strict = DetectorConfig {
            allow_adjacent: false,
            ..Default::default()
        };
        let inside = detect_conflicts(&[edit("r", 0, 10), edit("z", 5, 5)], &strict);
        assert_eq!(inside[0].kind, ConflictKind::Containment);

        let boundary = detect_conflicts(&[edit("r", 0, 10), edit("z", 10, 10)], &strict);
        assert_eq!(boundary[0].kind, ConflictKind::Adjacent);
    }
}
