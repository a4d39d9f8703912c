pub mod accessor;
pub mod apply;
pub mod command;
pub mod document;
pub mod engine;
pub mod host;
pub mod io;
pub mod rules;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use accessor::{LineAccessor, LineInfo, LineTarget};
pub use apply::{Applied, EditFailure, PrimitiveEdit, apply_batch};
pub use command::{
    CommandOptions, CommandOutcome, CommandReport, execute, run_builtin_command, run_command,
};
pub use document::{LineEnding, Position, Range, RopeDocument, Selection, TextDocument};
pub use engine::{EvaluationStats, Evaluator, PendingEdit, PendingEditBatch};
pub use host::{EditorHost, HostError, MemoryEditor};
pub use io::*;
pub use rules::{
    DEFAULT_TIMESTAMP_FORMAT, EditDecision, EditKind, Priority, Rule, RuleContext, RuleId,
    RuleNameError, RuleOptions, RuleSet, RuleSetId,
};
