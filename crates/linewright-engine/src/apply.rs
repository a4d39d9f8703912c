//! Edit Applier: turns a pending batch into one host transaction.

use serde::Serialize;
use thiserror::Error;

use crate::document::{Position, Range};
use crate::engine::{PendingEdit, PendingEditBatch};
use crate::host::{EditorHost, HostError};
use crate::rules::EditKind;

/// Host-level edit operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PrimitiveEdit {
    Insert { at: Position, text: String },
    Delete { range: Range },
    Replace { range: Range, text: String },
}

impl PrimitiveEdit {
    pub fn range(&self) -> Range {
        match self {
            PrimitiveEdit::Insert { at, .. } => Range::point(*at),
            PrimitiveEdit::Delete { range } | PrimitiveEdit::Replace { range, .. } => *range,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            PrimitiveEdit::Insert { text, .. } | PrimitiveEdit::Replace { text, .. } => Some(text),
            PrimitiveEdit::Delete { .. } => None,
        }
    }
}

impl From<&PendingEdit> for PrimitiveEdit {
    fn from(edit: &PendingEdit) -> Self {
        let text = edit.text.clone().unwrap_or_default();
        match edit.kind {
            EditKind::Insert => PrimitiveEdit::Insert {
                at: edit.range.start,
                text,
            },
            EditKind::Replace => PrimitiveEdit::Replace {
                range: edit.range,
                text,
            },
            // The effective range of a line clear already spans the line's text.
            EditKind::Delete | EditKind::ClearLine => PrimitiveEdit::Delete { range: edit.range },
        }
    }
}

/// Result of a transaction the host accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Applied {
    pub count: usize,
}

#[derive(Debug, Error)]
pub enum EditFailure {
    #[error("host declined the edit transaction")]
    Rejected,
    #[error(transparent)]
    Host(#[from] HostError),
}

/// Maps every pending edit to a primitive and submits them as one
/// transaction. Nothing is retried; an empty batch never reaches the host.
pub fn apply_batch<H: EditorHost>(
    host: &mut H,
    batch: &PendingEditBatch,
) -> Result<Applied, EditFailure> {
    if batch.is_empty() {
        return Ok(Applied { count: 0 });
    }
    let edits: Vec<PrimitiveEdit> = batch.iter().map(PrimitiveEdit::from).collect();
    log::debug!("Submitting {} edits", edits.len());
    if host.apply_edit_transaction(&edits)? {
        Ok(Applied { count: edits.len() })
    } else {
        Err(EditFailure::Rejected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accessor::LineAccessor;
    use crate::document::RopeDocument;
    use crate::host::MemoryEditor;
    use crate::rules::{EditDecision, Rule, RuleContext};
    use crate::tests::options;
    use pretty_assertions::assert_eq;

    fn at(line: usize, column: usize) -> Position {
        Position::new(line, column)
    }

    fn pending(kind: EditKind, range: Range, text: Option<&str>) -> PendingEdit {
        PendingEdit {
            rule: "test",
            kind,
            priority: None,
            range,
            text: text.map(str::to_string),
            line_skip: Vec::new(),
        }
    }

    #[test]
    fn maps_each_kind_to_a_primitive() {
        let span = Range::new(at(0, 1), at(0, 3));
        assert_eq!(
            PrimitiveEdit::from(&pending(EditKind::Insert, span, Some("x"))),
            PrimitiveEdit::Insert {
                at: at(0, 1),
                text: "x".into()
            }
        );
        assert_eq!(
            PrimitiveEdit::from(&pending(EditKind::Replace, span, None)),
            PrimitiveEdit::Replace {
                range: span,
                text: String::new()
            }
        );
        assert_eq!(
            PrimitiveEdit::from(&pending(EditKind::ClearLine, span, None)),
            PrimitiveEdit::Delete { range: span }
        );
    }

    #[test]
    fn clear_line_keeps_the_terminator() {
        fn clear(_: &RuleContext<'_>, line: usize) -> Option<EditDecision> {
            Some(EditDecision::new(Range::point(Position::new(line, 0))))
        }
        let rule = Rule::custom("clear", EditKind::ClearLine, clear);
        let doc = RopeDocument::from_lines(&["first", "second", "third"]);
        let opts = options();
        let cx = RuleContext::new(LineAccessor::new(&doc), &opts);
        let mut batch = PendingEditBatch::new();
        let decision = rule.evaluate(&cx, 1).unwrap();
        batch.push(PendingEdit::new(&rule, decision, &cx.lines));

        let mut host = MemoryEditor::new(doc.clone());
        let applied = apply_batch(&mut host, &batch).unwrap();
        assert_eq!(applied.count, 1);
        assert_eq!(host.text().unwrap(), "first\n\nthird");
    }

    #[test]
    fn empty_batch_skips_the_host() {
        let mut host = MemoryEditor::new(RopeDocument::from_text("abc"));
        let applied = apply_batch(&mut host, &PendingEditBatch::new()).unwrap();
        assert_eq!(applied.count, 0);
        assert_eq!(host.transactions(), 0);
    }

    #[test]
    fn declined_transaction_is_reported() {
        let mut host = MemoryEditor::new(RopeDocument::from_text("abc"));
        let mut batch = PendingEditBatch::new();
        batch.push(pending(
            EditKind::Delete,
            Range::new(at(0, 0), at(0, 9)),
            None,
        ));
        let err = apply_batch(&mut host, &batch).unwrap_err();
        assert!(matches!(err, EditFailure::Rejected));
        assert_eq!(host.text().unwrap(), "abc");
    }
}
