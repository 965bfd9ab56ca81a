//! Snapshot-based undo/redo.
//!
//! - Undo and redo stacks hold full copies of the timeline
//! - Pushing a new entry clears the redo stack (no branching history)
//! - An optional depth cap drops the oldest entries first
//!
//! `Timeline` owns all of its data, so a clone shares nothing with the live
//! state and later edits cannot reach back into a stored snapshot.

use crate::types::timeline::Timeline;

#[derive(Debug, Clone)]
pub struct HistoryEntry {
    /// Name of the operation this snapshot precedes (e.g. "Split clip").
    pub label: String,
    pub snapshot: Timeline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryState {
    /// Nothing to redo.
    Clean,
    /// At least one undo is waiting to be redone.
    PostUndo,
}

#[derive(Debug, Clone, Default)]
pub struct History {
    undo_stack: Vec<HistoryEntry>,
    redo_stack: Vec<HistoryEntry>,
    max_entries: Option<usize>,
}

impl History {
    pub fn new(max_entries: Option<usize>) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_entries,
        }
    }

    /// Record the state *before* an operation and fork away any redo branch.
    pub fn push(&mut self, label: &str, snapshot: Timeline) {
        self.redo_stack.clear();
        self.undo_stack.push(HistoryEntry {
            label: label.to_string(),
            snapshot,
        });
        self.enforce_limit();

        tracing::debug!(
            label,
            undo_depth = self.undo_stack.len(),
            "History entry pushed"
        );
    }

    /// Step back: `current` goes onto the redo stack and the previous
    /// snapshot is returned for the caller to install.
    pub fn undo(&mut self, current: Timeline) -> Option<Timeline> {
        let entry = self.undo_stack.pop()?;
        tracing::debug!(
            label = %entry.label,
            undo_remaining = self.undo_stack.len(),
            "Undo"
        );
        self.redo_stack.push(HistoryEntry {
            label: entry.label,
            snapshot: current,
        });
        Some(entry.snapshot)
    }

    /// Step forward again: `current` goes back onto the undo stack.
    pub fn redo(&mut self, current: Timeline) -> Option<Timeline> {
        let entry = self.redo_stack.pop()?;
        tracing::debug!(
            label = %entry.label,
            redo_remaining = self.redo_stack.len(),
            "Redo"
        );
        self.undo_stack.push(HistoryEntry {
            label: entry.label,
            snapshot: current,
        });
        Some(entry.snapshot)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn state(&self) -> HistoryState {
        if self.redo_stack.is_empty() {
            HistoryState::Clean
        } else {
            HistoryState::PostUndo
        }
    }

    /// Label of the action that would be undone next.
    pub fn undo_label(&self) -> Option<&str> {
        self.undo_stack.last().map(|e| e.label.as_str())
    }

    /// Label of the action that would be redone next.
    pub fn redo_label(&self) -> Option<&str> {
        self.redo_stack.last().map(|e| e.label.as_str())
    }

    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        tracing::debug!("History cleared");
    }

    pub fn max_entries(&self) -> Option<usize> {
        self.max_entries
    }

    /// Change the depth cap, trimming the oldest entries if needed.
    pub fn set_max_entries(&mut self, max: Option<usize>) {
        self.max_entries = max;
        self.enforce_limit();
    }

    fn enforce_limit(&mut self) {
        if let Some(max) = self.max_entries {
            if self.undo_stack.len() > max {
                let excess = self.undo_stack.len() - max;
                self.undo_stack.drain(..excess);
            }
        }
    }
}
