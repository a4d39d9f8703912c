use std::fmt;
use std::str::FromStr;

use super::{Rule, RuleId, RuleNameError, RuleOptions};

/// Commands with a built-in rule list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleSetId {
    /// A command that runs exactly one catalog rule.
    Single(RuleId),
    /// Every block-comment tidying rule at once.
    CleanUpBlockComments,
}

impl RuleSetId {
    const CLEAN_UP_BLOCK_COMMENTS: &'static str = "clean-up-block-comments";

    pub fn name(self) -> &'static str {
        match self {
            RuleSetId::Single(id) => id.name(),
            RuleSetId::CleanUpBlockComments => Self::CLEAN_UP_BLOCK_COMMENTS,
        }
    }

    fn rule_ids(self) -> Vec<RuleId> {
        match self {
            RuleSetId::Single(id) => vec![id],
            RuleSetId::CleanUpBlockComments => vec![
                RuleId::RemoveEmptyBlockCommentLineOnStart,
                RuleId::RemoveMultipleEmptyBlockCommentLines,
                RuleId::InsertEmptyBlockCommentLineOnEnd,
                RuleId::RemoveEmptyLinesBetweenBlockCommentAndCode,
            ],
        }
    }
}

impl fmt::Display for RuleSetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RuleSetId {
    type Err = RuleNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == Self::CLEAN_UP_BLOCK_COMMENTS {
            return Ok(RuleSetId::CleanUpBlockComments);
        }
        s.parse().map(RuleSetId::Single)
    }
}

/// An ordered list of rules run by one command. Order is the tie-break when
/// two decisions of the same priority collide.
#[derive(Debug, Clone)]
pub struct RuleSet {
    pub name: String,
    pub rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(name: impl Into<String>, rules: Vec<Rule>) -> Self {
        Self {
            name: name.into(),
            rules,
        }
    }

    /// The rule list for a built-in command. Rules switched off in `options`
    /// are left out.
    pub fn builtin(id: RuleSetId, options: &RuleOptions) -> Self {
        Self::from_ids(id.name(), id.rule_ids(), options)
    }

    /// A user-defined rule set from catalog rule names.
    pub fn from_names<S: AsRef<str>>(
        name: impl Into<String>,
        rule_names: &[S],
        options: &RuleOptions,
    ) -> Result<Self, RuleNameError> {
        let ids = rule_names
            .iter()
            .map(|rule| rule.as_ref().parse::<RuleId>())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_ids(name, ids, options))
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    fn from_ids(name: impl Into<String>, ids: Vec<RuleId>, options: &RuleOptions) -> Self {
        let rules = ids
            .into_iter()
            .filter(|id| enabled(*id, options))
            .map(Rule::builtin)
            .collect();
        Self::new(name, rules)
    }
}

fn enabled(id: RuleId, options: &RuleOptions) -> bool {
    match id {
        RuleId::InsertEmptyBlockCommentLineOnEnd => options.add_extra_line_at_end_on_block_comment,
        _ => true,
    }
}
