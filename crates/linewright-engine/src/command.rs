//! The command entry point: snapshot, evaluate, apply.

use serde::{Deserialize, Serialize};

use crate::accessor::LineAccessor;
use crate::apply::{Applied, EditFailure, apply_batch};
use crate::engine::{EvaluationStats, Evaluator, PendingEditBatch};
use crate::host::EditorHost;
use crate::rules::{RuleContext, RuleOptions, RuleSet, RuleSetId};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandOptions {
    /// Evaluate the whole document instead of the current selections.
    pub include_every_line: bool,
    /// Ask the host to save after a transaction that changed something.
    pub auto_save_after_edit: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CommandOutcome {
    /// No document was open; nothing was evaluated.
    NoDocument,
    /// Evaluation produced no edits, so no transaction was submitted.
    NothingToDo,
    Applied(Applied),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CommandReport {
    pub outcome: CommandOutcome,
    pub stats: EvaluationStats,
}

impl CommandReport {
    /// Number of edits the host applied.
    pub fn applied(&self) -> usize {
        match self.outcome {
            CommandOutcome::Applied(applied) => applied.count,
            CommandOutcome::NoDocument | CommandOutcome::NothingToDo => 0,
        }
    }
}

/// Runs `rule_set` over the host's selections and submits the result as one
/// transaction.
pub fn execute<H: EditorHost>(
    host: &mut H,
    rule_set: &RuleSet,
    rule_options: &RuleOptions,
    options: CommandOptions,
) -> Result<CommandReport, EditFailure> {
    let Some((batch, stats)) = evaluate(host, rule_set, rule_options, options) else {
        log::debug!("'{}' skipped: no active document", rule_set.name);
        return Ok(CommandReport {
            outcome: CommandOutcome::NoDocument,
            stats: EvaluationStats::default(),
        });
    };
    log::debug!(
        "'{}' evaluated {} lines: {} decisions, {} rejected, {} dropped",
        rule_set.name,
        stats.lines_evaluated,
        stats.decisions,
        stats.rejected,
        stats.dropped
    );

    if batch.is_empty() {
        return Ok(CommandReport {
            outcome: CommandOutcome::NothingToDo,
            stats,
        });
    }

    let applied = apply_batch(host, &batch)?;
    if options.auto_save_after_edit {
        match host.save() {
            Ok(true) => {}
            Ok(false) => log::warn!("Host did not save after '{}'", rule_set.name),
            Err(e) => log::warn!("Saving after '{}' failed: {e}", rule_set.name),
        }
    }
    Ok(CommandReport {
        outcome: CommandOutcome::Applied(applied),
        stats,
    })
}

/// Host-facing entry point. The outcome is logged; callers observe the
/// document.
pub fn run_command<H: EditorHost>(
    host: &mut H,
    rule_set: &RuleSet,
    rule_options: &RuleOptions,
    options: CommandOptions,
) {
    match execute(host, rule_set, rule_options, options) {
        Ok(report) => match report.outcome {
            CommandOutcome::Applied(applied) => {
                log::info!("'{}' applied {} edits", rule_set.name, applied.count)
            }
            CommandOutcome::NothingToDo => log::info!("'{}' made no changes", rule_set.name),
            CommandOutcome::NoDocument => {}
        },
        Err(e) => log::warn!("'{}' failed: {e}", rule_set.name),
    }
}

/// Runs the built-in command `id`.
pub fn run_builtin_command<H: EditorHost>(
    host: &mut H,
    id: RuleSetId,
    rule_options: &RuleOptions,
    options: CommandOptions,
) {
    run_command(host, &RuleSet::builtin(id, rule_options), rule_options, options);
}

/// The read half of a command; the borrow of the document ends here.
fn evaluate<H: EditorHost>(
    host: &H,
    rule_set: &RuleSet,
    rule_options: &RuleOptions,
    options: CommandOptions,
) -> Option<(PendingEditBatch, EvaluationStats)> {
    let document = host.document()?;
    let cx = RuleContext::new(LineAccessor::new(document), rule_options);
    let mut evaluator = Evaluator::new(cx, &rule_set.rules);
    if options.include_every_line {
        evaluator.expand_document();
    } else {
        for selection in host.selections() {
            evaluator.expand_selection(selection);
        }
    }
    Some(evaluator.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Position, RopeDocument, Selection};
    use crate::host::MemoryEditor;
    use crate::rules::RuleId;
    use crate::tests::options;
    use pretty_assertions::assert_eq;

    fn set(id: RuleId) -> RuleSet {
        RuleSet::builtin(RuleSetId::Single(id), &options())
    }

    #[test]
    fn caret_only_touches_its_line() {
        let mut host = MemoryEditor::new(RopeDocument::from_lines(&["foo   ", "bar  "]));
        let report = execute(
            &mut host,
            &set(RuleId::RemoveTrailingWhitespace),
            &options(),
            CommandOptions::default(),
        )
        .unwrap();
        assert_eq!(report.applied(), 1);
        assert_eq!(host.text().unwrap(), "foo\nbar  ");
    }

    #[test]
    fn every_line_ignores_selections() {
        let mut host = MemoryEditor::new(RopeDocument::from_lines(&["foo   ", "bar  "]))
            .with_selections(vec![Selection::caret(Position::new(1, 0))]);
        let opts = CommandOptions {
            include_every_line: true,
            ..CommandOptions::default()
        };
        execute(&mut host, &set(RuleId::RemoveTrailingWhitespace), &options(), opts).unwrap();
        assert_eq!(host.text().unwrap(), "foo\nbar");
    }

    #[test]
    fn no_document_is_a_no_op() {
        let mut host = MemoryEditor::empty();
        let report = execute(
            &mut host,
            &set(RuleId::RemoveEmptyLines),
            &options(),
            CommandOptions::default(),
        )
        .unwrap();
        assert_eq!(report.outcome, CommandOutcome::NoDocument);
        assert_eq!(host.transactions(), 0);
    }

    #[test]
    fn nothing_to_do_submits_nothing() {
        let mut host = MemoryEditor::new(RopeDocument::from_lines(&["clean"]));
        let opts = CommandOptions {
            include_every_line: true,
            auto_save_after_edit: true,
        };
        let report =
            execute(&mut host, &set(RuleId::RemoveTrailingWhitespace), &options(), opts).unwrap();
        assert_eq!(report.outcome, CommandOutcome::NothingToDo);
        assert_eq!(host.transactions(), 0);
        assert_eq!(host.save_count(), 0);
    }

    #[test]
    fn saves_after_a_successful_edit() {
        let mut host = MemoryEditor::new(RopeDocument::from_lines(&["a  "]));
        let opts = CommandOptions {
            include_every_line: false,
            auto_save_after_edit: true,
        };
        execute(&mut host, &set(RuleId::RemoveTrailingWhitespace), &options(), opts).unwrap();
        assert_eq!(host.save_count(), 1);
    }

    #[test]
    fn overlapping_selections_evaluate_each_line_once() {
        let mut host = MemoryEditor::new(RopeDocument::from_lines(&["a ", "b ", "c "]))
            .with_selections(vec![Selection::lines(0, 1), Selection::lines(1, 2)]);
        let report = execute(
            &mut host,
            &set(RuleId::RemoveTrailingWhitespace),
            &options(),
            CommandOptions::default(),
        )
        .unwrap();
        assert_eq!(report.stats.lines_evaluated, 3);
        assert_eq!(host.text().unwrap(), "a\nb\nc");
    }

    #[test]
    fn builtin_commands_are_run_by_id() {
        let mut host = MemoryEditor::new(RopeDocument::from_lines(&["/**", " *", " * Hi.", " */"]));
        let opts = CommandOptions {
            include_every_line: true,
            ..CommandOptions::default()
        };
        run_builtin_command(&mut host, RuleSetId::CleanUpBlockComments, &options(), opts);
        assert_eq!(host.text().unwrap(), "/**\n * Hi.\n */");
    }
}
