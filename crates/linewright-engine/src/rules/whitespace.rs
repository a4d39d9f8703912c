use super::text::{
    collapse_whitespace_runs, inline_comment_start, is_line_commented, trailing_whitespace_start,
};
use super::{EditDecision, RuleContext};

/// Deletes whitespace after the last non-whitespace character. A line made
/// only of whitespace loses all of it.
pub(super) fn remove_trailing_whitespace(
    cx: &RuleContext<'_>,
    line: usize,
) -> Option<EditDecision> {
    let info = cx.lines.line_at(line, 0);
    let start = trailing_whitespace_start(&info.text)?;
    Some(EditDecision::new(cx.lines.zero_based_range(
        line,
        start,
        info.text.len(),
    )))
}

/// Collapses interior whitespace runs to one space.
///
/// Indentation is kept, trailing whitespace is left to its own rule, and the
/// text of an inline comment is never touched: only the code in front of it
/// is collapsed. Whole-line comments are skipped.
pub(super) fn remove_multiple_whitespace(
    cx: &RuleContext<'_>,
    line: usize,
) -> Option<EditDecision> {
    let info = cx.lines.line_at(line, 0);
    let prefixes = &cx.options.comment_prefixes;
    if info.is_empty_or_whitespace || is_line_commented(&info.text, prefixes) {
        return None;
    }

    let start = info.first_non_whitespace_index;
    let end = match inline_comment_start(&info.text, prefixes) {
        Some(comment) => comment,
        None => info.text.trim_end().len(),
    };
    let collapsed = collapse_whitespace_runs(&info.text[start..end])?;
    Some(EditDecision::new(cx.lines.zero_based_range(line, start, end)).with_text(collapsed))
}
