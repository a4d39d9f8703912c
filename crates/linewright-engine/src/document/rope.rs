use std::borrow::Cow;
use std::ops::Range as ByteRange;

use xi_rope::delta::Builder;
use xi_rope::{LinesMetric, Rope};

use super::{LineEnding, Position, Range, TextDocument};
use crate::apply::PrimitiveEdit;

/// In-memory document backed by an `xi_rope::Rope`.
///
/// This is what the CLI edits and what tests hand to the engine in place of a
/// live editor buffer. Edits arrive as whole transactions through
/// [`RopeDocument::apply`] and either all land or none do.
#[derive(Clone)]
pub struct RopeDocument {
    buffer: Rope,
    line_ending: LineEnding,
    version: u64,
}

impl RopeDocument {
    /// Create a document from raw bytes, which must be valid UTF-8.
    pub fn from_bytes(bytes: &[u8]) -> anyhow::Result<Self> {
        let text = std::str::from_utf8(bytes)?;
        Ok(Self::from_text(text))
    }

    pub fn from_text(text: &str) -> Self {
        Self {
            buffer: Rope::from(text),
            line_ending: LineEnding::detect(text),
            version: 0,
        }
    }

    /// Builds a document by joining `lines` with `\n`.
    pub fn from_lines(lines: &[&str]) -> Self {
        Self::from_text(&lines.join("\n"))
    }

    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    /// Number of transactions applied so far.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn lines(&self) -> Vec<String> {
        (0..self.line_count())
            .map(|n| self.line_text(n).into_owned())
            .collect()
    }

    /// Apply a batch of edits atomically.
    ///
    /// Every edit is checked first: positions must exist, land on character
    /// boundaries, and no two edits may overlap. If any check fails nothing is
    /// changed and `false` is returned. Otherwise the batch is compiled into a
    /// single delta against the current buffer, so all ranges refer to the
    /// text as it was before the transaction.
    pub fn apply(&mut self, edits: &[PrimitiveEdit]) -> bool {
        let mut spans: Vec<(ByteRange<usize>, &str)> = Vec::with_capacity(edits.len());
        for edit in edits {
            let range = edit.range();
            let (Some(start), Some(end)) = (self.offset_of(range.start), self.offset_of(range.end))
            else {
                return false;
            };
            if start > end {
                return false;
            }
            spans.push((start..end, edit.text().unwrap_or("")));
        }

        spans.sort_by_key(|(span, _)| (span.start, span.end));
        let collides = spans.windows(2).any(|pair| {
            let (a, b) = (&pair[0].0, &pair[1].0);
            a.end > b.start || (a.is_empty() && b.is_empty() && a.start == b.start)
        });
        if collides {
            return false;
        }

        let mut builder = Builder::new(self.buffer.len());
        for (span, text) in spans {
            if text.is_empty() {
                if !span.is_empty() {
                    builder.delete(span);
                }
            } else {
                builder.replace(span, Rope::from(text));
            }
        }
        self.buffer = builder.build().apply(&self.buffer);
        self.version += 1;
        true
    }

    /// Byte offset of `position`, or `None` when it does not exist.
    fn offset_of(&self, position: Position) -> Option<usize> {
        if position.line >= self.line_count() {
            return None;
        }
        let text = self.line_text(position.line);
        if position.column > text.len() || !text.is_char_boundary(position.column) {
            return None;
        }
        Some(self.buffer.offset_of_line(position.line) + position.column)
    }

    /// Clamping variant used for reads, which never fail.
    fn clamped_offset(&self, position: Position) -> usize {
        let last = self.line_count() - 1;
        if position.line > last {
            return self.buffer.len();
        }
        let text = self.line_text(position.line);
        let mut column = position.column.min(text.len());
        while !text.is_char_boundary(column) {
            column -= 1;
        }
        self.buffer.offset_of_line(position.line) + column
    }
}

impl TextDocument for RopeDocument {
    fn line_count(&self) -> usize {
        self.buffer.measure::<LinesMetric>() + 1
    }

    fn line_text(&self, number: usize) -> Cow<'_, str> {
        let start = self.buffer.offset_of_line(number);
        let end = if number + 1 < self.line_count() {
            self.buffer.offset_of_line(number + 1)
        } else {
            self.buffer.len()
        };
        match self.buffer.slice_to_cow(start..end) {
            Cow::Borrowed(raw) => Cow::Borrowed(strip_terminator(raw)),
            Cow::Owned(raw) => Cow::Owned(strip_terminator(&raw).to_string()),
        }
    }

    fn text_in(&self, range: Range) -> String {
        let start = self.clamped_offset(range.start);
        let end = self.clamped_offset(range.end).max(start);
        self.buffer.slice_to_cow(start..end).into_owned()
    }

    fn line_ending(&self) -> LineEnding {
        self.line_ending
    }
}

impl std::fmt::Debug for RopeDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RopeDocument")
            .field("text", &self.text())
            .field("line_ending", &self.line_ending)
            .field("version", &self.version)
            .finish()
    }
}

fn strip_terminator(raw: &str) -> &str {
    let raw = raw.strip_suffix('\n').unwrap_or(raw);
    raw.strip_suffix('\r').unwrap_or(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn at(line: usize, column: usize) -> Position {
        Position::new(line, column)
    }

    #[test]
    fn counts_trailing_empty_line() {
        let doc = RopeDocument::from_text("a\nb\n");
        assert_eq!(doc.line_count(), 3);
        assert_eq!(doc.lines(), vec!["a", "b", ""]);
    }

    #[test]
    fn empty_document_has_one_line() {
        let doc = RopeDocument::from_text("");
        assert_eq!(doc.line_count(), 1);
        assert_eq!(doc.line_text(0), "");
    }

    #[test]
    fn strips_crlf_terminators() {
        let doc = RopeDocument::from_text("one\r\ntwo\r\n");
        assert_eq!(doc.line_ending(), LineEnding::Crlf);
        assert_eq!(doc.lines(), vec!["one", "two", ""]);
        assert_eq!(doc.text_in(Range::new(at(0, 0), at(1, 0))), "one\r\n");
    }

    #[test]
    fn text_in_clamps_out_of_range_reads() {
        let doc = RopeDocument::from_text("abc\nde");
        assert_eq!(doc.text_in(Range::new(at(1, 0), at(9, 9))), "de");
        assert_eq!(doc.text_in(Range::new(at(0, 1), at(0, 99))), "bc");
    }

    #[test]
    fn applies_a_batch_against_pre_edit_positions() {
        let mut doc = RopeDocument::from_text("foo   \nbar\nbaz");
        let applied = doc.apply(&[
            PrimitiveEdit::Delete {
                range: Range::new(at(0, 3), at(0, 6)),
            },
            PrimitiveEdit::Replace {
                range: Range::new(at(2, 0), at(2, 3)),
                text: "qux".to_string(),
            },
            PrimitiveEdit::Insert {
                at: at(1, 0),
                text: "> ".to_string(),
            },
        ]);
        assert!(applied);
        assert_eq!(doc.text(), "foo\n> bar\nqux");
        assert_eq!(doc.version(), 1);
    }

    #[test]
    fn rejects_overlapping_batches_without_changing_anything() {
        let mut doc = RopeDocument::from_text("hello world");
        let applied = doc.apply(&[
            PrimitiveEdit::Delete {
                range: Range::new(at(0, 0), at(0, 6)),
            },
            PrimitiveEdit::Delete {
                range: Range::new(at(0, 4), at(0, 8)),
            },
        ]);
        assert!(!applied);
        assert_eq!(doc.text(), "hello world");
        assert_eq!(doc.version(), 0);
    }

    #[test]
    fn rejects_two_inserts_at_the_same_point() {
        let mut doc = RopeDocument::from_text("x");
        let insert = PrimitiveEdit::Insert {
            at: at(0, 0),
            text: "y".to_string(),
        };
        assert!(!doc.apply(&[insert.clone(), insert]));
    }

    #[test]
    fn rejects_positions_outside_the_document() {
        let mut doc = RopeDocument::from_text("abc");
        assert!(!doc.apply(&[PrimitiveEdit::Delete {
            range: Range::new(at(0, 0), at(1, 0)),
        }]));
        assert!(!doc.apply(&[PrimitiveEdit::Delete {
            range: Range::new(at(0, 0), at(0, 4)),
        }]));
    }

    #[test]
    fn rejects_columns_inside_a_character() {
        let mut doc = RopeDocument::from_text("héllo");
        assert!(!doc.apply(&[PrimitiveEdit::Delete {
            range: Range::new(at(0, 0), at(0, 2)),
        }]));
    }

    #[test]
    fn from_bytes_rejects_invalid_utf8() {
        assert!(RopeDocument::from_bytes(&[0xff, 0xfe]).is_err());
        assert!(RopeDocument::from_bytes(b"ok").is_ok());
    }
}
