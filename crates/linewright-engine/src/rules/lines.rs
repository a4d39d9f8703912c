use crate::document::{Position, Range};

use super::text::is_line_commented;
use super::{EditDecision, RuleContext};

fn is_blank(cx: &RuleContext<'_>, line: usize) -> bool {
    cx.lines.line_at(line, 0).is_empty_or_whitespace
}

/// Last line of the blank run that starts at `line`, looking no further than
/// `bound`.
fn blank_run_end(cx: &RuleContext<'_>, line: usize, bound: usize) -> usize {
    let mut last = line;
    while last < bound && cx.lines.contains_line(last + 1) && is_blank(cx, last + 1) {
        last += 1;
    }
    last
}

/// Removes the blank lines the document opens with, as one deletion.
pub(super) fn remove_document_starting_empty_lines(
    cx: &RuleContext<'_>,
    line: usize,
) -> Option<EditDecision> {
    if !(0..=line).all(|n| is_blank(cx, n)) {
        return None;
    }
    let last = blank_run_end(cx, line, cx.limit);
    let end = if cx.lines.contains_line(last + 1) {
        Position::new(last + 1, 0)
    } else {
        cx.lines.full_line_range(last).end
    };
    let range = Range::new(Position::new(line, 0), end);
    (!range.is_empty()).then(|| EditDecision::new(range).skipping(line + 1..=last))
}

/// Collapses a run of blank lines into the last one of the run.
///
/// The whole run is one deletion from the start of `line` to the start of the
/// run's last line, and the lines it covers are skipped for the rest of the
/// pass. The kept line may sit just past the walk's limit; nothing after the
/// limit is removed.
pub(super) fn remove_multiple_empty_lines(
    cx: &RuleContext<'_>,
    line: usize,
) -> Option<EditDecision> {
    if !is_blank(cx, line) {
        return None;
    }
    let last = blank_run_end(cx, line, cx.limit + 1);
    if last == line {
        return None;
    }
    Some(
        EditDecision::new(Range::new(Position::new(line, 0), Position::new(last, 0)))
            .skipping(line + 1..=last)
            .blocking(),
    )
}

pub(super) fn remove_empty_lines(cx: &RuleContext<'_>, line: usize) -> Option<EditDecision> {
    let range = cx.lines.full_line_range_with_terminator(line);
    // an empty last line has nothing left to delete
    (is_blank(cx, line) && !range.is_empty()).then(|| EditDecision::new(range).blocking())
}

pub(super) fn remove_commented_lines(cx: &RuleContext<'_>, line: usize) -> Option<EditDecision> {
    let info = cx.lines.line_at(line, 0);
    is_line_commented(&info.text, &cx.options.comment_prefixes)
        .then(|| EditDecision::new(cx.lines.full_line_range_with_terminator(line)))
}

/// Deletes the line when the next line has exactly the same text.
pub(super) fn remove_duplicate_lines(cx: &RuleContext<'_>, line: usize) -> Option<EditDecision> {
    let current = cx.lines.line_at(line, 0);
    let next = cx.lines.line_at(line, 1);
    (next.line_number != current.line_number && next.text == current.text)
        .then(|| EditDecision::new(cx.lines.full_line_range_with_terminator(line)))
}
