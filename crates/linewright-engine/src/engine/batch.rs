use serde::Serialize;

use crate::accessor::LineAccessor;
use crate::document::Range;
use crate::rules::{EditDecision, EditKind, Priority, Rule};

/// A validated decision wrapped with the declaring rule's edit kind and tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingEdit {
    pub rule: &'static str,
    pub kind: EditKind,
    pub priority: Option<Priority>,
    /// The text the edit will touch: an insertion point for inserts, the
    /// whole line span for line clears, the decision's range otherwise.
    pub range: Range,
    pub text: Option<String>,
    pub line_skip: Vec<usize>,
}

impl PendingEdit {
    pub fn new(rule: &Rule, decision: EditDecision, lines: &LineAccessor<'_>) -> Self {
        let range = match rule.edit_kind {
            EditKind::Insert => Range::point(decision.range.start),
            EditKind::ClearLine => lines.full_line_range(decision.range.start.line),
            EditKind::Replace | EditKind::Delete => decision.range,
        };
        Self {
            rule: rule.name(),
            kind: rule.edit_kind,
            priority: rule.priority,
            range,
            text: decision.text,
            line_skip: decision.line_skip,
        }
    }
}

/// What happened to an edit offered to a [`PendingEditBatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Added,
    /// Added after evicting this many lower-tier edits.
    Displaced(usize),
    /// Lost to an existing edit of the same or a higher tier.
    Dropped,
}

impl Admission {
    pub fn accepted(self) -> bool {
        !matches!(self, Admission::Dropped)
    }
}

/// Ordered edits with no two ranges overlapping.
///
/// Every insertion goes through the conflict policy: an edit that overlaps
/// others is admitted only if it outranks all of them, in which case they are
/// evicted. Between equal tiers the edit that arrived first stays.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PendingEditBatch {
    edits: Vec<PendingEdit>,
}

impl PendingEditBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, edit: PendingEdit) -> Admission {
        let conflicts: Vec<usize> = self
            .edits
            .iter()
            .enumerate()
            .filter(|(_, existing)| existing.range.overlaps(edit.range))
            .map(|(idx, _)| idx)
            .collect();

        if conflicts.is_empty() {
            self.edits.push(edit);
            return Admission::Added;
        }
        if conflicts
            .iter()
            .any(|&idx| self.edits[idx].priority >= edit.priority)
        {
            return Admission::Dropped;
        }
        for &idx in conflicts.iter().rev() {
            self.edits.remove(idx);
        }
        self.edits.push(edit);
        Admission::Displaced(conflicts.len())
    }

    pub fn clear(&mut self) {
        self.edits.clear();
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    pub fn edits(&self) -> &[PendingEdit] {
        &self.edits
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PendingEdit> {
        self.edits.iter()
    }

    pub fn into_vec(self) -> Vec<PendingEdit> {
        self.edits
    }
}

impl<'a> IntoIterator for &'a PendingEditBatch {
    type Item = &'a PendingEdit;
    type IntoIter = std::slice::Iter<'a, PendingEdit>;

    fn into_iter(self) -> Self::IntoIter {
        self.edits.iter()
    }
}
