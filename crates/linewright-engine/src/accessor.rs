//! Stateless line-level reads over a document snapshot.

use serde::Serialize;

use crate::document::{LineEnding, Position, Range, TextDocument};

/// Metadata for one line of the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineInfo {
    pub line_number: usize,
    pub text: String,
    pub is_empty_or_whitespace: bool,
    /// Byte index of the first non-whitespace character, or the text length
    /// when the line is all whitespace.
    pub first_non_whitespace_index: usize,
}

impl LineInfo {
    pub fn new(line_number: usize, text: String) -> Self {
        let first_non_whitespace_index = text
            .char_indices()
            .find(|(_, c)| !c.is_whitespace())
            .map_or(text.len(), |(idx, _)| idx);
        Self {
            line_number,
            is_empty_or_whitespace: first_non_whitespace_index == text.len(),
            first_non_whitespace_index,
            text,
        }
    }
}

/// A line addressed either directly or through the start of a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineTarget {
    Number(usize),
    Range(Range),
}

impl LineTarget {
    fn line(self) -> usize {
        match self {
            LineTarget::Number(n) => n,
            LineTarget::Range(range) => range.start.line,
        }
    }
}

impl From<usize> for LineTarget {
    fn from(n: usize) -> Self {
        LineTarget::Number(n)
    }
}

impl From<Range> for LineTarget {
    fn from(range: Range) -> Self {
        LineTarget::Range(range)
    }
}

/// Facade over a [`TextDocument`] that rules read through.
///
/// Lookups never fault: a line number past the end of the document resolves
/// to the last line, and an offset that would leave the document falls back
/// to the un-offset line.
#[derive(Clone, Copy)]
pub struct LineAccessor<'a> {
    document: &'a dyn TextDocument,
}

impl<'a> LineAccessor<'a> {
    pub fn new(document: &'a dyn TextDocument) -> Self {
        Self { document }
    }

    pub fn line_count(&self) -> usize {
        self.document.line_count()
    }

    pub fn line_ending(&self) -> LineEnding {
        self.document.line_ending()
    }

    /// Exact text in `range`, no normalization.
    pub fn text_of(&self, range: Range) -> String {
        self.document.text_in(range)
    }

    /// Resolves `target` shifted by `delta` lines.
    pub fn line_at(&self, target: impl Into<LineTarget>, delta: isize) -> LineInfo {
        let base = self.clamp_line(target.into().line());
        let resolved = base
            .checked_add_signed(delta)
            .filter(|n| *n < self.line_count())
            .unwrap_or(base);
        self.info(resolved)
    }

    /// The line's span, terminator excluded.
    pub fn full_line_range(&self, target: impl Into<LineTarget>) -> Range {
        let line = self.clamp_line(target.into().line());
        let len = self.document.line_text(line).len();
        Range::new(Position::new(line, 0), Position::new(line, len))
    }

    /// The line's span including its terminator, so deleting it does not
    /// leave a blank line behind. The last line has no terminator and gets
    /// its plain span.
    pub fn full_line_range_with_terminator(&self, target: impl Into<LineTarget>) -> Range {
        let line = self.clamp_line(target.into().line());
        if line + 1 < self.line_count() {
            Range::new(Position::new(line, 0), Position::new(line + 1, 0))
        } else {
            self.full_line_range(line)
        }
    }

    pub fn zero_based_range(&self, line: usize, start: usize, end: usize) -> Range {
        Range::new(Position::new(line, start), Position::new(line, end))
    }

    /// Whether both ends of `range` name positions that exist in the snapshot
    /// and can be edited without splitting a character.
    pub fn contains(&self, range: Range) -> bool {
        self.contains_position(range.start) && self.contains_position(range.end)
    }

    pub fn contains_line(&self, line: usize) -> bool {
        line < self.line_count()
    }

    /// The line exists and the column is a character boundary within it.
    fn contains_position(&self, position: Position) -> bool {
        self.contains_line(position.line)
            && self
                .document
                .line_text(position.line)
                .is_char_boundary(position.column)
    }

    fn clamp_line(&self, line: usize) -> usize {
        line.min(self.line_count().saturating_sub(1))
    }

    fn info(&self, line: usize) -> LineInfo {
        LineInfo::new(line, self.document.line_text(line).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::RopeDocument;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn at(line: usize, column: usize) -> Position {
        Position::new(line, column)
    }

    #[test]
    fn line_info_reports_whitespace_and_indent() {
        let info = LineInfo::new(3, "    a    b".to_string());
        assert_eq!(info.first_non_whitespace_index, 4);
        assert!(!info.is_empty_or_whitespace);

        let blank = LineInfo::new(0, " \t ".to_string());
        assert!(blank.is_empty_or_whitespace);
        assert_eq!(blank.first_non_whitespace_index, 3);
    }

    #[rstest]
    #[case(1, 1, 2)]
    #[case(1, -1, 0)]
    #[case(2, 1, 2)]
    #[case(0, -1, 0)]
    #[case(0, 7, 0)]
    #[case(9, 0, 2)]
    fn line_at_falls_back_when_offset_leaves_document(
        #[case] line: usize,
        #[case] delta: isize,
        #[case] expected: usize,
    ) {
        let doc = RopeDocument::from_lines(&["zero", "one", "two"]);
        let lines = LineAccessor::new(&doc);
        assert_eq!(lines.line_at(line, delta).line_number, expected);
    }

    #[test]
    fn line_at_accepts_ranges() {
        let doc = RopeDocument::from_lines(&["zero", "one", "two"]);
        let lines = LineAccessor::new(&doc);
        let info = lines.line_at(Range::new(at(1, 2), at(2, 1)), 0);
        assert_eq!(info.text, "one");
    }

    #[test]
    fn terminator_inclusive_range_stops_at_last_line() {
        let doc = RopeDocument::from_lines(&["a", "bb"]);
        let lines = LineAccessor::new(&doc);
        assert_eq!(
            lines.full_line_range_with_terminator(0),
            Range::new(at(0, 0), at(1, 0))
        );
        assert_eq!(
            lines.full_line_range_with_terminator(1),
            Range::new(at(1, 0), at(1, 2))
        );
        assert_eq!(lines.full_line_range(1), Range::new(at(1, 0), at(1, 2)));
    }

    #[test]
    fn text_of_is_verbatim() {
        let doc = RopeDocument::from_text("a  \r\nb");
        let lines = LineAccessor::new(&doc);
        assert_eq!(lines.text_of(Range::new(at(0, 0), at(1, 0))), "a  \r\n");
        assert_eq!(lines.text_of(lines.zero_based_range(0, 1, 3)), "  ");
    }

    #[test]
    fn contains_checks_both_ends() {
        let doc = RopeDocument::from_lines(&["abc", "d"]);
        let lines = LineAccessor::new(&doc);
        assert!(lines.contains(Range::new(at(0, 0), at(1, 1))));
        assert!(!lines.contains(Range::new(at(0, 0), at(1, 2))));
        assert!(!lines.contains(Range::new(at(2, 0), at(2, 0))));
    }

    #[test]
    fn contains_refuses_columns_inside_a_character() {
        let doc = RopeDocument::from_lines(&["héllo"]);
        let lines = LineAccessor::new(&doc);
        assert!(lines.contains(Range::new(at(0, 0), at(0, 3))));
        assert!(!lines.contains(Range::new(at(0, 0), at(0, 2))));
    }
}
