//! Snapshot undo/redo and the per-frame commit pipeline.
//!
//! Mutating systems announce each commit with a `SketchMutated` message.
//! Once per frame, after derived data has refreshed, the capture system
//! folds that frame's commits into a single history snapshot and publishes
//! a sequence-numbered [`SketchChanged`]. Undo and redo restore whole
//! snapshots rather than replaying inverse operations, so a restored state
//! is exact down to annotation and pin contents.
//!
//! ## Shortcuts
//!
//! - **Ctrl+Z**: undo
//! - **Ctrl+Y** or **Ctrl+Shift+Z**: redo

mod snapshot;
mod store;
mod systems;

#[cfg(test)]
mod tests;

pub use snapshot::SketchSnapshot;
pub use store::SketchHistory;

use bevy::prelude::*;

/// Maximum number of snapshots to keep on the timeline.
pub(crate) const MAX_HISTORY_SIZE: usize = 100;

/// Frame ordering for everything that touches the sketch: interactive
/// systems mutate, derived data recomputes, then history captures the
/// settled state.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommitSet {
    Mutate,
    Derive,
    Capture,
}

/// Announces that authoritative sketch state advanced. `seq` increases by
/// one per commit (including undo/redo); consumers remember the last value
/// they processed.
#[derive(Message)]
pub struct SketchChanged {
    pub seq: u64,
}

/// Wholesale state replacement arriving from outside the editing loop,
/// such as a file load. `echo_of` names the emitted sequence the sender is
/// reacting to, so a round-tripped copy of our own state can be recognized
/// and dropped.
#[derive(Message)]
pub struct ApplyExternalSketch {
    pub snapshot: SketchSnapshot,
    pub echo_of: Option<u64>,
}

/// Request one undo step. Written by the keyboard shortcut and the toolbar.
#[derive(Message)]
pub struct UndoRequest;

/// Request one redo step.
#[derive(Message)]
pub struct RedoRequest;

/// Monotonic sequence counter behind [`SketchChanged`].
#[derive(Resource, Default)]
pub struct ChangeTracker {
    last_seq: u64,
}

impl ChangeTracker {
    pub fn advance(&mut self) -> u64 {
        self.last_seq += 1;
        self.last_seq
    }

    pub fn last_seq(&self) -> u64 {
        self.last_seq
    }

    /// True when an incoming apply only echoes our latest emission.
    pub fn is_echo(&self, echo_of: Option<u64>) -> bool {
        echo_of == Some(self.last_seq)
    }
}

pub struct HistoryPlugin;

impl Plugin for HistoryPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SketchHistory>()
            .init_resource::<ChangeTracker>()
            .add_message::<SketchChanged>()
            .add_message::<ApplyExternalSketch>()
            .add_message::<UndoRequest>()
            .add_message::<RedoRequest>()
            .configure_sets(
                Update,
                (CommitSet::Mutate, CommitSet::Derive, CommitSet::Capture).chain(),
            )
            .add_systems(
                Update,
                (
                    systems::request_undo_redo_shortcuts,
                    systems::apply_undo,
                    systems::apply_redo,
                    systems::apply_external,
                )
                    .chain()
                    .in_set(CommitSet::Mutate),
            )
            .add_systems(Update, systems::capture_history.in_set(CommitSet::Capture));
    }
}
