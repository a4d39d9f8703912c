//! Tidying rules for `/** ... */` style block comments.

use crate::document::{Position, Range};

use super::text::{
    block_comment_prefix, is_block_comment, is_block_comment_end, is_block_comment_start,
    is_empty_block_comment,
};
use super::{EditDecision, RuleContext};

/// The line before `line`, if there is one.
fn previous_text(cx: &RuleContext<'_>, line: usize) -> Option<String> {
    let previous = cx.lines.line_at(line, -1);
    (previous.line_number != line).then_some(previous.text)
}

/// The line after `line`, if there is one.
fn next_text(cx: &RuleContext<'_>, line: usize) -> Option<String> {
    let next = cx.lines.line_at(line, 1);
    (next.line_number != line).then_some(next.text)
}

/// Last line, starting at `line`, for which `keep_going` holds.
fn run_end(cx: &RuleContext<'_>, line: usize, keep_going: impl Fn(&str) -> bool) -> usize {
    let mut last = line;
    while cx.lines.contains_line(last + 1) && keep_going(&cx.lines.line_at(last + 1, 0).text) {
        last += 1;
    }
    last
}

/// Deletes lines `first..=last` including the terminator of `last`, never
/// past the walk's limit.
fn delete_lines(cx: &RuleContext<'_>, first: usize, last: usize) -> EditDecision {
    let last = last.min(cx.limit).max(first);
    let end = cx.lines.full_line_range_with_terminator(last).end;
    EditDecision::new(Range::new(Position::new(first, 0), end)).skipping(first + 1..=last)
}

/// Removes empty `*` lines directly under the comment opener.
pub(super) fn remove_empty_line_on_start(
    cx: &RuleContext<'_>,
    line: usize,
) -> Option<EditDecision> {
    let opener = previous_text(cx, line)?;
    let current = cx.lines.line_at(line, 0);
    if !is_block_comment_start(&opener) || !is_empty_block_comment(&current.text) {
        return None;
    }
    let last = run_end(cx, line, is_empty_block_comment);
    Some(delete_lines(cx, line, last))
}

/// Removes an empty `*` line that is followed by another one.
pub(super) fn remove_multiple_empty_lines(
    cx: &RuleContext<'_>,
    line: usize,
) -> Option<EditDecision> {
    let current = cx.lines.line_at(line, 0);
    let next = next_text(cx, line)?;
    (is_empty_block_comment(&current.text) && is_empty_block_comment(&next))
        .then(|| EditDecision::new(cx.lines.full_line_range_with_terminator(line)))
}

/// Adds an empty `*` line between the last line of comment text and the
/// closer.
pub(super) fn insert_empty_line_on_end(cx: &RuleContext<'_>, line: usize) -> Option<EditDecision> {
    let current = cx.lines.line_at(line, 0);
    let next = next_text(cx, line)?;
    if !is_block_comment_end(&next)
        || !is_block_comment(&current.text)
        || is_empty_block_comment(&current.text)
        || is_block_comment_end(&current.text)
    {
        return None;
    }
    let end_of_line = Position::new(line, current.text.len());
    let text = format!(
        "{}{}",
        cx.lines.line_ending().as_str(),
        block_comment_prefix(&current.text)
    );
    Some(EditDecision::new(Range::point(end_of_line)).with_text(text))
}

/// Removes blank lines between a comment closer and the code it documents.
pub(super) fn remove_empty_lines_before_code(
    cx: &RuleContext<'_>,
    line: usize,
) -> Option<EditDecision> {
    let closer = previous_text(cx, line)?;
    if !is_block_comment_end(&closer) || !cx.lines.line_at(line, 0).is_empty_or_whitespace {
        return None;
    }
    let last = run_end(cx, line, |text| text.trim().is_empty());
    // blank lines running to the end of the document have no code to join
    cx.lines
        .contains_line(last + 1)
        .then(|| delete_lines(cx, line, last))
}
