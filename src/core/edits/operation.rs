use std::fmt;

use serde::{Deserialize, Serialize};

/// Half-open byte range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TextRange {
    pub start: usize,
    pub end: usize,
}

impl TextRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Whether `other` lies within `self` without being equal to it.
    ///
    /// A zero-width range is contained only when strictly inside; on a
    /// boundary it merely touches.
    pub fn contains(&self, other: &TextRange) -> bool {
        if self == other || self.is_empty() {
            return false;
        }
        if other.is_empty() {
            return self.start < other.start && other.start < self.end;
        }
        self.start <= other.start && other.end <= self.end
    }

    /// Whether two non-empty ranges share at least one byte.
    pub fn overlaps(&self, other: &TextRange) -> bool {
        !self.is_empty() && !other.is_empty() && self.start < other.end && other.start < self.end
    }

    /// Bytes between two disjoint ranges, `None` if they overlap.
    pub fn gap(&self, other: &TextRange) -> Option<usize> {
        if self.end <= other.start {
            Some(other.start - self.end)
        } else if other.end <= self.start {
            Some(self.start - other.end)
        } else {
            None
        }
    }
}

impl fmt::Display for TextRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// A proposed replacement of one byte range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditOperation {
    pub id: String,
    pub range: TextRange,
    pub replacement: String,
    /// Edit this one is nested in; dropped with auto-resolution when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    /// Higher priority edits are ordered first. Defaults to 0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl EditOperation {
    pub fn new(
        id: impl Into<String>,
        start: usize,
        end: usize,
        replacement: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            range: TextRange::new(start, end),
            replacement: replacement.into(),
            parent_id: None,
            priority: None,
            metadata: None,
        }
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn effective_priority(&self) -> i32 {
        self.priority.unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use crate::core::edits::operation::*;

    #[test]
    fn test_containment_rules() {
        let outer = TextRange::new(0, 50);
        assert!(outer.contains(&TextRange::new(10, 20)));
        assert!(outer.contains(&TextRange::new(0, 20)));
        assert!(!outer.contains(&outer));
        assert!(!outer.contains(&TextRange::new(40, 60)));

        assert!(outer.contains(&TextRange::new(25, 25)));
        assert!(!outer.contains(&TextRange::new(0, 0)));
        assert!(!outer.contains(&TextRange::new(50, 50)));
        assert!(!TextRange::new(5, 5).contains(&TextRange::new(5, 5)));
    }

    #[test]
    fn test_overlap_and_gap() {
        let a = TextRange::new(0, 10);
        let b = TextRange::new(5, 15);
        assert!(a.overlaps(&b));
        assert_eq!(a.gap(&b), None);

        let c = TextRange::new(10, 12);
        assert!(!a.overlaps(&c));
        assert_eq!(a.gap(&c), Some(0));
        assert_eq!(TextRange::new(14, 20).gap(&a), Some(4));
    }

    #[test]
    fn test_deserialize_operation() {
        let json = r#"{"id": "e1", "range": {"start": 3, "end": 8}, "replacement": "t('k')",
            "priority": 2}"#;
        let op: EditOperation = serde_json::from_str(json).unwrap();
        assert_eq!(op.range, TextRange::new(3, 8));
        assert_eq!(op.effective_priority(), 2);
        assert_eq!(op.parent_id, None);
    }
}
