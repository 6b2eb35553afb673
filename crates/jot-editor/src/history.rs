//! Undo/redo history: snapshot-based edit tracking.
//!
//! Before every mutating command the session hands the history a
//! [`Snapshot`] of the buffer (content and cursor). Undo swaps the buffer
//! back to the most recent snapshot and parks the current state on the redo
//! stack; redo does the reverse.
//!
//! # Usage
//!
//! ```text
//! history.record_before(buffer.snapshot());
//! // mutate the buffer
//! if let Some(prev) = history.undo(buffer.snapshot()) {
//!     buffer.restore(prev);
//! }
//! ```
//!
//! Recording clears the redo stack: once a new edit lands after an undo,
//! the undone branch is unreachable (no branching history).
//!
//! Snapshots hold rope clones, which share structure with the live buffer,
//! so keeping many of them is cheap. An optional depth limit drops the
//! oldest entries for very long sessions.

use std::collections::VecDeque;

use ropey::Rope;
use tracing::trace;

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Buffer content and cursor captured at one point in time.
#[derive(Debug, Clone)]
pub struct Snapshot {
    rope: Rope,
    cursor: usize,
}

impl Snapshot {
    pub(crate) fn new(rope: Rope, cursor: usize) -> Self {
        Self { rope, cursor }
    }

    pub(crate) fn into_parts(self) -> (Rope, usize) {
        (self.rope, self.cursor)
    }

    /// The captured text.
    #[must_use]
    pub fn contents(&self) -> String {
        self.rope.to_string()
    }

    /// The captured cursor offset.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

/// Undo/redo history for one buffer.
///
/// Two stacks, most recent last. `limit` caps the undo stack; `None` means
/// unbounded. The undo stack is a deque so the oldest entry can be dropped
/// in O(1) once the cap is reached.
#[derive(Debug, Default)]
pub struct History {
    undo_stack: VecDeque<Snapshot>,
    redo_stack: Vec<Snapshot>,
    limit: Option<usize>,
}

impl History {
    /// Create an empty, unbounded history.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            limit: None,
        }
    }

    /// Create an empty history keeping at most `limit` undo entries.
    /// `None` and `Some(0)` both mean unbounded.
    #[must_use]
    pub const fn with_limit(limit: Option<usize>) -> Self {
        let limit = match limit {
            Some(0) => None,
            other => other,
        };
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            limit,
        }
    }

    /// Record the state immediately before a mutation.
    ///
    /// Clears the redo stack. When a limit is set and exceeded, the oldest
    /// undo entry is dropped.
    pub fn record_before(&mut self, snapshot: Snapshot) {
        self.undo_stack.push_back(snapshot);
        if let Some(limit) = self.limit {
            if self.undo_stack.len() > limit {
                self.undo_stack.pop_front();
                trace!(target: "history", limit, "undo_stack_trimmed");
            }
        }
        if !self.redo_stack.is_empty() {
            self.redo_stack.clear();
            trace!(target: "history", "redo_stack_cleared_on_new_edit");
        }
        trace!(target: "history", undo_depth = self.undo_stack.len(), "record_before");
    }

    /// Step back one edit. `current` is the live buffer state, which moves to
    /// the redo stack. Returns the state to restore, or `None` if there's
    /// nothing to undo (in which case `current` is discarded and nothing
    /// changes).
    pub fn undo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let prev = self.undo_stack.pop_back()?;
        self.redo_stack.push(current);
        trace!(target: "history", undo_depth = self.undo_stack.len(), redo_depth = self.redo_stack.len(), "undo");
        Some(prev)
    }

    /// Step forward one undone edit. Symmetric to [`undo`](Self::undo).
    pub fn redo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let next = self.redo_stack.pop()?;
        self.undo_stack.push_back(current);
        trace!(target: "history", undo_depth = self.undo_stack.len(), redo_depth = self.redo_stack.len(), "redo");
        Some(next)
    }

    /// Drop both stacks (used when a new document is loaded).
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// True if there are edits that can be undone.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// True if there are edits that can be redone.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of entries on the undo stack.
    #[must_use]
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Number of entries on the redo stack.
    #[must_use]
    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
