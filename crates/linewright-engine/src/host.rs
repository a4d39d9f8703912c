//! The editor surface the engine runs against.

use thiserror::Error;

use crate::apply::PrimitiveEdit;
use crate::document::{Position, RopeDocument, Selection, TextDocument};

#[derive(Debug, Error)]
#[error("Editor host error: {0}")]
pub struct HostError(pub String);

/// An editor that can hand out the active document and apply edits to it.
///
/// The engine holds `&mut` access for a whole invocation, so a transaction
/// always completes before the next one starts.
pub trait EditorHost {
    type Document: TextDocument;

    /// The active document, if any.
    fn document(&self) -> Option<&Self::Document>;

    /// Selections in the active document, in the editor's order.
    fn selections(&self) -> Vec<Selection>;

    /// Applies every edit or none. `Ok(false)` means the host declined.
    fn apply_edit_transaction(&mut self, edits: &[PrimitiveEdit]) -> Result<bool, HostError>;

    fn save(&mut self) -> Result<bool, HostError> {
        Ok(true)
    }
}

/// In-memory host backed by a [`RopeDocument`].
#[derive(Debug, Clone, Default)]
pub struct MemoryEditor {
    document: Option<RopeDocument>,
    selections: Vec<Selection>,
    transactions: usize,
    saves: usize,
}

impl MemoryEditor {
    /// Opens `document` with a caret at its start.
    pub fn new(document: RopeDocument) -> Self {
        Self {
            document: Some(document),
            selections: vec![Selection::caret(Position::new(0, 0))],
            ..Self::default()
        }
    }

    /// A host with no open document.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_selections(mut self, selections: Vec<Selection>) -> Self {
        self.selections = selections;
        self
    }

    pub fn set_selections(&mut self, selections: Vec<Selection>) {
        self.selections = selections;
    }

    pub fn text(&self) -> Option<String> {
        self.document.as_ref().map(RopeDocument::text)
    }

    /// Transactions submitted so far, accepted or not.
    pub fn transactions(&self) -> usize {
        self.transactions
    }

    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl EditorHost for MemoryEditor {
    type Document = RopeDocument;

    fn document(&self) -> Option<&RopeDocument> {
        self.document.as_ref()
    }

    fn selections(&self) -> Vec<Selection> {
        self.selections.clone()
    }

    fn apply_edit_transaction(&mut self, edits: &[PrimitiveEdit]) -> Result<bool, HostError> {
        self.transactions += 1;
        let document = self
            .document
            .as_mut()
            .ok_or_else(|| HostError("no document is open".to_string()))?;
        Ok(document.apply(edits))
    }

    fn save(&mut self) -> Result<bool, HostError> {
        if self.document.is_none() {
            return Ok(false);
        }
        self.saves += 1;
        Ok(true)
    }
}
