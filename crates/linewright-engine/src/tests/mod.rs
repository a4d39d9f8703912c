//! Shared fixtures for unit tests.

use crate::accessor::LineAccessor;
use crate::command::{CommandOptions, execute};
use crate::document::RopeDocument;
use crate::host::MemoryEditor;
use crate::rules::{EditDecision, Rule, RuleContext, RuleId, RuleOptions, RuleSet};

pub const FIXED_TIMESTAMP: &str = "2024-01-15 09:30:00";

/// Default options with a pinned timestamp.
pub fn options() -> RuleOptions {
    RuleOptions {
        comment_prefixes: vec!["//".to_string()],
        add_extra_line_at_end_on_block_comment: false,
        timestamp: FIXED_TIMESTAMP.to_string(),
    }
}

/// What `id` decides for `line` of a document made of `lines`.
pub fn decision_for(lines: &[&str], id: RuleId, line: usize) -> Option<EditDecision> {
    let doc = RopeDocument::from_lines(lines);
    let opts = options();
    Rule::builtin(id).evaluate(&RuleContext::new(LineAccessor::new(&doc), &opts), line)
}

/// Runs `id` alone over every line once and returns the resulting text.
pub fn apply_rule_once(lines: &[&str], id: RuleId) -> String {
    let mut host = MemoryEditor::new(RopeDocument::from_lines(lines));
    let rule_set = RuleSet::new(id.name(), vec![Rule::builtin(id)]);
    let command = CommandOptions {
        include_every_line: true,
        auto_save_after_edit: false,
    };
    execute(&mut host, &rule_set, &options(), command).expect("transaction applies");
    host.text().unwrap_or_default()
}
