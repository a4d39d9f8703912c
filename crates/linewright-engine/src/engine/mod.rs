/*!
 * # Rule Evaluation Engine
 *
 * Walks selections line by line, runs the ordered rules against each line and
 * folds their decisions into one [`PendingEditBatch`] with no overlapping
 * ranges.
 *
 * ## Per-line fold
 *
 * Rules run in registration order. A rule with nothing to say returns `None`.
 * Each decision is validated, wrapped with its rule's edit kind and tier, and
 * offered to the line's accumulator:
 *
 * - `supersedes_prior_decisions` empties the accumulator first
 * - `stops_further_rules` ends evaluation of the line after this decision
 * - otherwise decisions compose, subject to the priority policy in
 *   [`PendingEditBatch::push`]
 *
 * ## Selection walk
 *
 * A caret or single-line selection evaluates that one line. Anything larger
 * is an explicit loop from the first to the last selected line, inclusive.
 * The last selected line becomes the context's `limit`, so rules that scan
 * runs of lines never remove text below the selection.
 *
 * Lines an earlier selection already covered are not evaluated again, and
 * neither are lines named in the `line_skip` of an edit still in the batch.
 * When an edit is evicted its skips are released, but only lines the walk has
 * not yet passed get evaluated.
 */

mod batch;

use std::collections::BTreeSet;

use serde::Serialize;
use thiserror::Error;

use crate::accessor::LineAccessor;
use crate::document::{Range, Selection};
use crate::rules::{EditDecision, Rule, RuleContext};

pub use batch::{Admission, PendingEdit, PendingEditBatch};

/// Why a decision was refused before reaching the batch.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidDecision {
    #[error("range starts after it ends: {0:?}")]
    Inverted(Range),
    #[error("range is outside the document: {0:?}")]
    OutOfBounds(Range),
    #[error("skipped line {0} is outside the document")]
    SkipOutOfBounds(usize),
}

/// Checks that a decision only names text that exists in the snapshot.
pub fn validate(lines: &LineAccessor<'_>, decision: &EditDecision) -> Result<(), InvalidDecision> {
    if decision.range.is_inverted() {
        return Err(InvalidDecision::Inverted(decision.range));
    }
    if !lines.contains(decision.range) {
        return Err(InvalidDecision::OutOfBounds(decision.range));
    }
    match decision.line_skip.iter().find(|&&n| !lines.contains_line(n)) {
        Some(&line) => Err(InvalidDecision::SkipOutOfBounds(line)),
        None => Ok(()),
    }
}

/// Counters for one evaluation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EvaluationStats {
    pub lines_evaluated: usize,
    /// Valid decisions produced by rules.
    pub decisions: usize,
    /// Decisions refused as malformed.
    pub rejected: usize,
    /// Valid decisions discarded by blocking or priority.
    pub dropped: usize,
}

/// One evaluation pass over a snapshot.
pub struct Evaluator<'r, 'a> {
    cx: RuleContext<'a>,
    rules: &'r [Rule],
    batch: PendingEditBatch,
    evaluated: BTreeSet<usize>,
    /// Lines claimed by the `line_skip` of edits in the batch.
    skipped: BTreeSet<usize>,
    stats: EvaluationStats,
}

impl<'r, 'a> Evaluator<'r, 'a> {
    pub fn new(cx: RuleContext<'a>, rules: &'r [Rule]) -> Self {
        Self {
            cx,
            rules,
            batch: PendingEditBatch::new(),
            evaluated: BTreeSet::new(),
            skipped: BTreeSet::new(),
            stats: EvaluationStats::default(),
        }
    }

    /// Runs every rule against `line` and folds the results.
    pub fn evaluate_line(&mut self, line: usize) -> Vec<PendingEdit> {
        self.stats.lines_evaluated += 1;
        let mut accumulated = PendingEditBatch::new();

        for rule in self.rules {
            let Some(decision) = rule.evaluate(&self.cx, line) else {
                continue;
            };
            if let Err(reason) = validate(&self.cx.lines, &decision) {
                self.stats.rejected += 1;
                log::warn!(
                    "Rejected decision from rule '{}' on line {line}: {reason}",
                    rule.name()
                );
                continue;
            }
            self.stats.decisions += 1;

            let stops = decision.stops_further_rules;
            if decision.supersedes_prior_decisions {
                self.stats.dropped += accumulated.len();
                accumulated.clear();
            }
            let edit = PendingEdit::new(rule, decision, &self.cx.lines);
            self.record(accumulated.push(edit));
            if stops {
                break;
            }
        }

        accumulated.into_vec()
    }

    /// Evaluates every line `selection` touches and adds the results to the
    /// pass's batch.
    pub fn expand_selection(&mut self, selection: Selection) {
        let range = selection.range();
        let line_count = self.cx.lines.line_count();
        if range.start.line >= line_count {
            log::debug!("Selection {range:?} starts past the end of the document");
            return;
        }

        if range.is_empty() || range.is_single_line() {
            self.cx = self.cx.with_limit(range.start.line);
            self.visit(range.start.line);
            return;
        }

        let last = range.end.line.min(line_count - 1);
        self.cx = self.cx.with_limit(last);
        let mut line = range.start.line;
        while line <= last {
            self.visit(line);
            line += 1;
        }
    }

    /// Evaluates the whole document as one selection.
    pub fn expand_document(&mut self) {
        self.cx = self.cx.with_limit(self.cx.lines.line_count().saturating_sub(1));
        let mut line = 0;
        while line < self.cx.lines.line_count() {
            self.visit(line);
            line += 1;
        }
    }

    /// Edits admitted so far.
    pub fn batch(&self) -> &PendingEditBatch {
        &self.batch
    }

    pub fn finish(self) -> (PendingEditBatch, EvaluationStats) {
        (self.batch, self.stats)
    }

    fn visit(&mut self, line: usize) {
        if self.skipped.contains(&line) || !self.evaluated.insert(line) {
            return;
        }
        for edit in self.evaluate_line(line) {
            let skip = edit.line_skip.clone();
            let admission = self.batch.push(edit);
            self.record(admission);
            match admission {
                Admission::Added => self.skipped.extend(skip),
                Admission::Displaced(_) => {
                    self.skipped = self
                        .batch
                        .iter()
                        .flat_map(|edit| edit.line_skip.iter().copied())
                        .collect();
                }
                Admission::Dropped => {}
            }
        }
    }

    fn record(&mut self, admission: Admission) {
        match admission {
            Admission::Added => {}
            Admission::Displaced(evicted) => self.stats.dropped += evicted,
            Admission::Dropped => self.stats.dropped += 1,
        }
    }
}

/// Decisions for a single line.
pub fn evaluate_line(cx: RuleContext<'_>, line: usize, rules: &[Rule]) -> Vec<PendingEdit> {
    Evaluator::new(cx, rules).evaluate_line(line)
}

/// Decisions for every line of one selection.
pub fn expand_selection(cx: RuleContext<'_>, selection: Selection, rules: &[Rule]) -> Vec<PendingEdit> {
    let mut evaluator = Evaluator::new(cx, rules);
    evaluator.expand_selection(selection);
    evaluator.finish().0.into_vec()
}
