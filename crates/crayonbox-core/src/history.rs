//! Bounded undo history of ink-layer snapshots.

use crate::color::Rgba;
use crate::raster::{RasterBuffer, RasterError, Snapshot};

/// Default number of undo states to keep.
pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

/// Result of an undo request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndoOutcome {
    /// History was empty; the ink is untouched.
    NothingToUndo,
    /// The first recorded action was undone; the ink is blank again.
    ResetToBlank,
    /// The ink now holds the most recent snapshot.
    Restored,
}

/// A capped stack of snapshots taken before each undoable mutation.
///
/// Pushing past capacity evicts the oldest entry. Undo pops the newest.
#[derive(Debug, Clone)]
pub struct HistoryManager {
    stack: Vec<Snapshot>,
    capacity: usize,
    background: Rgba,
    /// Whether the bottom of the stack is still the snapshot before the
    /// first action since the last clear.
    anchored: bool,
}

impl HistoryManager {
    pub fn new(capacity: usize, background: Rgba) -> Self {
        Self {
            stack: Vec::with_capacity(capacity),
            capacity: capacity.max(1),
            background: background.with_full_alpha(),
            anchored: true,
        }
    }

    /// Record the ink state before a mutation.
    pub fn snapshot(&mut self, ink: &RasterBuffer) {
        if self.stack.len() >= self.capacity {
            self.stack.remove(0);
            self.anchored = false;
        }
        self.stack.push(ink.snapshot());
        log::debug!("History depth {}/{}", self.stack.len(), self.capacity);
    }

    /// Undo the most recent action.
    ///
    /// Undoing the first action since the last clear resets the ink to the
    /// background. Once older entries have been evicted, the oldest retained
    /// snapshot is restored instead, and further undos are no-ops.
    pub fn undo(&mut self, ink: &mut RasterBuffer) -> Result<UndoOutcome, RasterError> {
        let Some(snapshot) = self.stack.pop() else {
            return Ok(UndoOutcome::NothingToUndo);
        };

        if self.stack.is_empty() && self.anchored {
            ink.fill(self.background);
            return Ok(UndoOutcome::ResetToBlank);
        }

        ink.restore(&snapshot)?;
        Ok(UndoOutcome::Restored)
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.stack.clear();
        self.anchored = true;
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        !self.stack.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY, Rgba::WHITE)
    }
}
