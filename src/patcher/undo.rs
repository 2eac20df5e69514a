//! Snapshot-based undo journal.
//!
//! Every destructive operation records the patch document taken just before
//! the mutation; undoing restores that document wholesale and forces a
//! rescan. One drag gesture or menu action produces exactly one entry, so
//! a re-route (disconnect + connect) undoes as a unit.

use crate::persistence::PatchDocument;

/// Default cap on journal depth.
const DEFAULT_UNDO_LIMIT: usize = 64;

/// One recorded restore point.
#[derive(Debug, Clone)]
pub struct UndoEntry {
    /// What the recorded operation did (e.g. "Connect", "Delete Node").
    pub label: String,
    /// The patch state immediately before the operation.
    pub document: PatchDocument,
}

/// The undo/redo journal.
pub struct UndoStack {
    undo: Vec<UndoEntry>,
    redo: Vec<UndoEntry>,
    limit: usize,
}

impl UndoStack {
    /// Creates an empty journal with the default depth limit.
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_UNDO_LIMIT)
    }

    /// Creates an empty journal with a custom depth limit.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            undo: Vec::new(),
            redo: Vec::new(),
            limit: limit.max(1),
        }
    }

    /// Records a restore point for an operation that is about to happen.
    ///
    /// Call this only after the operation is known to succeed; a failed
    /// connect must leave the journal untouched. Recording clears the redo
    /// branch.
    pub fn push(&mut self, label: impl Into<String>, before: PatchDocument) {
        self.undo.push(UndoEntry {
            label: label.into(),
            document: before,
        });
        self.redo.clear();
        if self.undo.len() > self.limit {
            self.undo.remove(0);
        }
    }

    /// Undoes the most recent operation.
    ///
    /// `current` is the live state, pushed onto the redo branch. Returns
    /// the entry to restore, or `None` if there is nothing to undo.
    pub fn undo(&mut self, current: PatchDocument) -> Option<UndoEntry> {
        let entry = self.undo.pop()?;
        self.redo.push(UndoEntry {
            label: entry.label.clone(),
            document: current,
        });
        Some(entry)
    }

    /// Redoes the most recently undone operation.
    pub fn redo(&mut self, current: PatchDocument) -> Option<UndoEntry> {
        let entry = self.redo.pop()?;
        self.undo.push(UndoEntry {
            label: entry.label.clone(),
            document: current,
        });
        Some(entry)
    }

    /// Returns true if there is an operation to undo.
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    /// Returns true if there is an operation to redo.
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// The label of the next undoable operation.
    pub fn undo_label(&self) -> Option<&str> {
        self.undo.last().map(|e| e.label.as_str())
    }

    /// The label of the next redoable operation.
    pub fn redo_label(&self) -> Option<&str> {
        self.redo.last().map(|e| e.label.as_str())
    }

    /// Drops all history (e.g. after loading a file).
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(name: &str) -> PatchDocument {
        PatchDocument::new(name)
    }

    #[test]
    fn test_empty_stack() {
        let mut stack = UndoStack::new();
        assert!(!stack.can_undo());
        assert!(!stack.can_redo());
        assert!(stack.undo(doc("live")).is_none());
        assert!(stack.redo(doc("live")).is_none());
    }

    #[test]
    fn test_undo_redo_round_trip() {
        let mut stack = UndoStack::new();
        stack.push("Connect", doc("before"));
        assert_eq!(stack.undo_label(), Some("Connect"));

        let restored = stack.undo(doc("after")).unwrap();
        assert_eq!(restored.label, "Connect");
        assert_eq!(restored.document.name, "before");
        assert!(stack.can_redo());
        assert_eq!(stack.redo_label(), Some("Connect"));

        let redone = stack.redo(doc("before")).unwrap();
        assert_eq!(redone.document.name, "after");
        assert!(stack.can_undo());
        assert!(!stack.can_redo());
    }

    #[test]
    fn test_push_clears_redo_branch() {
        let mut stack = UndoStack::new();
        stack.push("A", doc("1"));
        stack.undo(doc("2"));
        assert!(stack.can_redo());

        stack.push("B", doc("3"));
        assert!(!stack.can_redo());
    }

    #[test]
    fn test_depth_limit_drops_oldest() {
        let mut stack = UndoStack::with_limit(2);
        stack.push("A", doc("1"));
        stack.push("B", doc("2"));
        stack.push("C", doc("3"));

        assert_eq!(stack.undo(doc("live")).unwrap().document.name, "3");
        assert_eq!(stack.undo(doc("live")).unwrap().document.name, "2");
        assert!(!stack.can_undo());
    }

    #[test]
    fn test_clear() {
        let mut stack = UndoStack::new();
        stack.push("A", doc("1"));
        stack.undo(doc("2"));
        stack.clear();
        assert!(!stack.can_undo());
        assert!(!stack.can_redo());
    }
}
