//! Snapshot timeline resource for tracking undo/redo state.

use bevy::prelude::*;

use super::snapshot::SketchSnapshot;
use super::MAX_HISTORY_SIZE;

/// Resource holding the snapshot timeline. `entries[cursor]` is always the
/// state the live resources currently mirror; undo moves the cursor back,
/// a fresh commit truncates everything past it.
#[derive(Resource)]
pub struct SketchHistory {
    entries: Vec<SketchSnapshot>,
    cursor: usize,
}

impl Default for SketchHistory {
    fn default() -> Self {
        Self {
            entries: vec![SketchSnapshot::default()],
            cursor: 0,
        }
    }
}

impl SketchHistory {
    /// Record a new state. Returns false when the snapshot equals the
    /// current entry and nothing was recorded.
    pub fn push(&mut self, snapshot: SketchSnapshot) -> bool {
        if self.entries[self.cursor] == snapshot {
            return false;
        }

        self.entries.truncate(self.cursor + 1);
        self.entries.push(snapshot);
        self.cursor += 1;

        // Trim the oldest entries past capacity.
        while self.entries.len() > MAX_HISTORY_SIZE {
            self.entries.remove(0);
            self.cursor -= 1;
        }
        true
    }

    /// Step back one state; returns the snapshot to restore.
    pub fn undo(&mut self) -> Option<&SketchSnapshot> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(&self.entries[self.cursor])
    }

    /// Step forward one state; returns the snapshot to restore.
    pub fn redo(&mut self) -> Option<&SketchSnapshot> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        Some(&self.entries[self.cursor])
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    pub fn current(&self) -> &SketchSnapshot {
        &self.entries[self.cursor]
    }

    /// Restart the timeline from a known state, as after loading a file.
    pub fn reset_baseline(&mut self, snapshot: SketchSnapshot) {
        self.entries = vec![snapshot];
        self.cursor = 0;
    }
}
