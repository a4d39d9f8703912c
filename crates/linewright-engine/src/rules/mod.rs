//! Rule descriptors and the built-in rule catalog.
//!
//! A [`Rule`] pairs a predicate with the kind of edit its decisions perform
//! and an optional priority tier. Predicates look at one line through a
//! [`RuleContext`] and either return nothing or an [`EditDecision`]; the
//! engine does the rest.
//!
//! The catalog is a closed enum, [`RuleId`]. Embedders and tests that need a
//! one-off rule use [`Rule::custom`] with a plain function pointer.

mod block_comment;
mod lines;
pub mod set;
pub mod text;
pub mod timestamp;
mod whitespace;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::accessor::LineAccessor;
use crate::document::Range;

pub use set::{RuleSet, RuleSetId};
pub use timestamp::DEFAULT_TIMESTAMP_FORMAT;

/// Primitive operation a rule's decisions map onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditKind {
    /// Insert the decision's text at the start of its range.
    Insert,
    /// Overwrite the range with the decision's text.
    Replace,
    /// Remove the range verbatim.
    Delete,
    /// Remove the text of the range's first line, keeping its terminator.
    ClearLine,
}

/// Conflict tier. A decision without a tier ranks below `Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Mid,
    High,
    VeryHigh,
}

/// What a rule wants done to a line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditDecision {
    pub range: Range,
    /// Text for insertions and replacements.
    pub text: Option<String>,
    /// No later rule is evaluated for this line.
    pub stops_further_rules: bool,
    /// Decisions already accumulated for this line are discarded.
    pub supersedes_prior_decisions: bool,
    /// Lines this decision already accounts for; the walk will not visit
    /// them again in the same pass.
    pub line_skip: Vec<usize>,
}

impl EditDecision {
    pub fn new(range: Range) -> Self {
        Self {
            range,
            text: None,
            stops_further_rules: false,
            supersedes_prior_decisions: false,
            line_skip: Vec::new(),
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Stops further rules and supersedes earlier decisions on the line.
    pub fn blocking(self) -> Self {
        self.stopping().superseding()
    }

    pub fn stopping(mut self) -> Self {
        self.stops_further_rules = true;
        self
    }

    pub fn superseding(mut self) -> Self {
        self.supersedes_prior_decisions = true;
        self
    }

    pub fn skipping(mut self, lines: impl IntoIterator<Item = usize>) -> Self {
        self.line_skip.extend(lines);
        self
    }
}

/// Configurable inputs shared by every rule in one invocation.
#[derive(Debug, Clone)]
pub struct RuleOptions {
    /// Markers that start a line comment, e.g. `//` or `#`.
    pub comment_prefixes: Vec<String>,
    /// Enables [`RuleId::InsertEmptyBlockCommentLineOnEnd`] in rule sets.
    pub add_extra_line_at_end_on_block_comment: bool,
    /// Text inserted by [`RuleId::PrintNowDateTime`], fixed for the whole pass.
    pub timestamp: String,
}

impl RuleOptions {
    /// Stamps the options with the current local time in `format`.
    pub fn stamped_now(mut self, format: &str) -> Self {
        self.timestamp = timestamp::now(format);
        self
    }
}

impl Default for RuleOptions {
    fn default() -> Self {
        Self {
            comment_prefixes: vec!["//".to_string()],
            add_extra_line_at_end_on_block_comment: false,
            timestamp: timestamp::now(DEFAULT_TIMESTAMP_FORMAT),
        }
    }
}

/// Everything a predicate may read.
#[derive(Clone, Copy)]
pub struct RuleContext<'a> {
    pub lines: LineAccessor<'a>,
    pub options: &'a RuleOptions,
    /// Last line of the selection being walked. Rules may look past it but
    /// must not remove any line after it.
    pub limit: usize,
}

impl<'a> RuleContext<'a> {
    /// A context whose walk covers the whole document.
    pub fn new(lines: LineAccessor<'a>, options: &'a RuleOptions) -> Self {
        let limit = lines.line_count().saturating_sub(1);
        Self {
            lines,
            options,
            limit,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit.min(self.lines.line_count().saturating_sub(1));
        self
    }
}

pub type RulePredicate = fn(&RuleContext<'_>, usize) -> Option<EditDecision>;

#[derive(Debug, Clone, Copy)]
pub enum Predicate {
    Builtin(RuleId),
    Custom {
        name: &'static str,
        evaluate: RulePredicate,
    },
}

/// An immutable rule descriptor.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub predicate: Predicate,
    pub edit_kind: EditKind,
    pub priority: Option<Priority>,
}

impl Rule {
    /// A catalog rule with its declared edit kind and priority.
    pub const fn builtin(id: RuleId) -> Self {
        Self {
            predicate: Predicate::Builtin(id),
            edit_kind: id.edit_kind(),
            priority: id.priority(),
        }
    }

    pub const fn custom(name: &'static str, edit_kind: EditKind, evaluate: RulePredicate) -> Self {
        Self {
            predicate: Predicate::Custom { name, evaluate },
            edit_kind,
            priority: None,
        }
    }

    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn name(&self) -> &'static str {
        match self.predicate {
            Predicate::Builtin(id) => id.name(),
            Predicate::Custom { name, .. } => name,
        }
    }

    pub fn evaluate(&self, cx: &RuleContext<'_>, line: usize) -> Option<EditDecision> {
        match self.predicate {
            Predicate::Builtin(id) => id.evaluate(cx, line),
            Predicate::Custom { evaluate, .. } => evaluate(cx, line),
        }
    }
}

impl From<RuleId> for Rule {
    fn from(id: RuleId) -> Self {
        Rule::builtin(id)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown rule '{0}'")]
pub struct RuleNameError(pub String);

/// The built-in rule catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleId {
    RemoveDocumentStartingEmptyLines,
    RemoveTrailingWhitespace,
    RemoveMultipleEmptyLines,
    RemoveMultipleWhitespace,
    RemoveEmptyLines,
    RemoveCommentedLines,
    RemoveDuplicateLines,
    RemoveEmptyBlockCommentLineOnStart,
    RemoveMultipleEmptyBlockCommentLines,
    InsertEmptyBlockCommentLineOnEnd,
    RemoveEmptyLinesBetweenBlockCommentAndCode,
    PrintNowDateTime,
}

impl RuleId {
    pub const ALL: [RuleId; 12] = [
        RuleId::RemoveDocumentStartingEmptyLines,
        RuleId::RemoveTrailingWhitespace,
        RuleId::RemoveMultipleEmptyLines,
        RuleId::RemoveMultipleWhitespace,
        RuleId::RemoveEmptyLines,
        RuleId::RemoveCommentedLines,
        RuleId::RemoveDuplicateLines,
        RuleId::RemoveEmptyBlockCommentLineOnStart,
        RuleId::RemoveMultipleEmptyBlockCommentLines,
        RuleId::InsertEmptyBlockCommentLineOnEnd,
        RuleId::RemoveEmptyLinesBetweenBlockCommentAndCode,
        RuleId::PrintNowDateTime,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            RuleId::RemoveDocumentStartingEmptyLines => "remove-document-starting-empty-lines",
            RuleId::RemoveTrailingWhitespace => "remove-trailing-whitespace",
            RuleId::RemoveMultipleEmptyLines => "remove-multiple-empty-lines",
            RuleId::RemoveMultipleWhitespace => "remove-multiple-whitespace",
            RuleId::RemoveEmptyLines => "remove-empty-lines",
            RuleId::RemoveCommentedLines => "remove-commented-lines",
            RuleId::RemoveDuplicateLines => "remove-duplicate-lines",
            RuleId::RemoveEmptyBlockCommentLineOnStart => {
                "remove-empty-block-comment-line-on-start"
            }
            RuleId::RemoveMultipleEmptyBlockCommentLines => {
                "remove-multiple-empty-block-comment-lines"
            }
            RuleId::InsertEmptyBlockCommentLineOnEnd => "insert-empty-block-comment-line-on-end",
            RuleId::RemoveEmptyLinesBetweenBlockCommentAndCode => {
                "remove-empty-lines-between-block-comment-and-code"
            }
            RuleId::PrintNowDateTime => "print-now-date-time",
        }
    }

    pub const fn edit_kind(self) -> EditKind {
        match self {
            RuleId::RemoveMultipleWhitespace => EditKind::Replace,
            RuleId::InsertEmptyBlockCommentLineOnEnd | RuleId::PrintNowDateTime => EditKind::Insert,
            _ => EditKind::Delete,
        }
    }

    pub const fn priority(self) -> Option<Priority> {
        match self {
            RuleId::RemoveDocumentStartingEmptyLines
            | RuleId::RemoveEmptyBlockCommentLineOnStart => Some(Priority::VeryHigh),
            RuleId::RemoveMultipleEmptyBlockCommentLines
            | RuleId::RemoveEmptyLinesBetweenBlockCommentAndCode => Some(Priority::High),
            RuleId::RemoveMultipleEmptyLines => Some(Priority::Mid),
            RuleId::RemoveEmptyLines
            | RuleId::RemoveDuplicateLines
            | RuleId::InsertEmptyBlockCommentLineOnEnd => Some(Priority::Low),
            RuleId::RemoveTrailingWhitespace
            | RuleId::RemoveMultipleWhitespace
            | RuleId::RemoveCommentedLines
            | RuleId::PrintNowDateTime => None,
        }
    }

    fn evaluate(self, cx: &RuleContext<'_>, line: usize) -> Option<EditDecision> {
        match self {
            RuleId::RemoveDocumentStartingEmptyLines => {
                lines::remove_document_starting_empty_lines(cx, line)
            }
            RuleId::RemoveTrailingWhitespace => whitespace::remove_trailing_whitespace(cx, line),
            RuleId::RemoveMultipleEmptyLines => lines::remove_multiple_empty_lines(cx, line),
            RuleId::RemoveMultipleWhitespace => whitespace::remove_multiple_whitespace(cx, line),
            RuleId::RemoveEmptyLines => lines::remove_empty_lines(cx, line),
            RuleId::RemoveCommentedLines => lines::remove_commented_lines(cx, line),
            RuleId::RemoveDuplicateLines => lines::remove_duplicate_lines(cx, line),
            RuleId::RemoveEmptyBlockCommentLineOnStart => {
                block_comment::remove_empty_line_on_start(cx, line)
            }
            RuleId::RemoveMultipleEmptyBlockCommentLines => {
                block_comment::remove_multiple_empty_lines(cx, line)
            }
            RuleId::InsertEmptyBlockCommentLineOnEnd => {
                block_comment::insert_empty_line_on_end(cx, line)
            }
            RuleId::RemoveEmptyLinesBetweenBlockCommentAndCode => {
                block_comment::remove_empty_lines_before_code(cx, line)
            }
            RuleId::PrintNowDateTime => timestamp::print_now_date_time(cx, line),
        }
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RuleId {
    type Err = RuleNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RuleId::ALL
            .into_iter()
            .find(|id| id.name() == s)
            .ok_or_else(|| RuleNameError(s.to_string()))
    }
}
