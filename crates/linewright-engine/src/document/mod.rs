//! Positions, ranges, selections and the read side of a host document.
//!
//! Every accessor and rule works against an explicit [`TextDocument`] handle
//! rather than an ambient "active editor", so tests can hand the engine a
//! synthetic in-memory document.

pub mod rope;

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

pub use rope::RopeDocument;

/// A zero-based `(line, column)` location.
///
/// Columns count UTF-8 bytes of the line text, so they can be used to slice
/// the `&str` a rule inspected without any conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// A half-open `[start, end)` range between two positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// An empty range at `position`, used for insertions.
    pub const fn point(position: Position) -> Self {
        Self {
            start: position,
            end: position,
        }
    }

    pub fn is_empty(self) -> bool {
        self.start == self.end
    }

    pub fn is_single_line(self) -> bool {
        self.start.line == self.end.line
    }

    /// True when `start` comes after `end`. Rules must never produce these.
    pub fn is_inverted(self) -> bool {
        self.start > self.end
    }

    /// Whether two ranges claim the same stretch of text.
    ///
    /// Two insertion points collide only when they sit at the same position.
    /// An insertion point collides with a non-empty range only when it falls
    /// strictly inside it; touching either edge is fine.
    pub fn overlaps(self, other: Range) -> bool {
        match (self.is_empty(), other.is_empty()) {
            (true, true) => self.start == other.start,
            (true, false) => other.start < self.start && self.start < other.end,
            (false, true) => self.start < other.start && other.start < self.end,
            (false, false) => self.start < other.end && other.start < self.end,
        }
    }
}

/// A user selection as reported by the host.
///
/// `anchor` is where the selection started and `active` is where the caret is,
/// so `active` may come before `anchor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub anchor: Position,
    pub active: Position,
}

impl Selection {
    pub const fn new(anchor: Position, active: Position) -> Self {
        Self { anchor, active }
    }

    /// A caret with nothing selected.
    pub const fn caret(position: Position) -> Self {
        Self::new(position, position)
    }

    /// Selects whole lines `first..=last`, ending at column 0 of `last`.
    pub const fn lines(first: usize, last: usize) -> Self {
        Self::new(Position::new(first, 0), Position::new(last, 0))
    }

    /// The selection as an ordered range.
    pub fn range(&self) -> Range {
        if self.anchor <= self.active {
            Range::new(self.anchor, self.active)
        } else {
            Range::new(self.active, self.anchor)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.anchor == self.active
    }
}

/// Line terminator convention of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineEnding {
    #[default]
    Lf,
    Crlf,
}

impl LineEnding {
    pub const fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::Crlf => "\r\n",
        }
    }

    /// Detects the convention from the first line break in `text`.
    pub fn detect(text: &str) -> Self {
        match text.find('\n') {
            Some(idx) if idx > 0 && text.as_bytes()[idx - 1] == b'\r' => LineEnding::Crlf,
            _ => LineEnding::Lf,
        }
    }
}

/// Read-only view of the document a command runs against.
///
/// A document always has at least one line; text ending in a terminator has
/// an empty final line after it.
pub trait TextDocument {
    fn line_count(&self) -> usize;

    /// Text of line `number` without its terminator. `number` must be below
    /// [`line_count`](TextDocument::line_count).
    fn line_text(&self, number: usize) -> Cow<'_, str>;

    /// Exact text covered by `range`, terminators included.
    fn text_in(&self, range: Range) -> String;

    fn line_ending(&self) -> LineEnding;
}
