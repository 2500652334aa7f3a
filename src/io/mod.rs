//! Sketch persistence: JSON save/load with async task pooling, new-sketch
//! handling, and unsaved-changes tracking.
//!
//! - [`format`] - on-disk DTOs and conversion to/from live state
//! - [`messages`] - request messages for file operations
//! - [`resources`] - operation state, errors, task components
//! - [`save`] - save system and task polling
//! - [`load`] - load/new systems and task polling

pub mod format;
mod load;
mod messages;
mod resources;
mod save;

pub use format::{SavedSketch, SKETCH_FORMAT_VERSION};
pub use messages::{LoadSketchRequest, NewSketchRequest, SaveSketchRequest};
pub use resources::{
    AsyncFileOperation, CurrentSketchFile, SketchDirtyState, SketchFileError,
};

use bevy::prelude::*;

use crate::history::CommitSet;

pub struct SketchFilePlugin;

impl Plugin for SketchFilePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CurrentSketchFile>()
            .init_resource::<SketchFileError>()
            .init_resource::<AsyncFileOperation>()
            .init_resource::<SketchDirtyState>()
            .add_message::<SaveSketchRequest>()
            .add_message::<LoadSketchRequest>()
            .add_message::<NewSketchRequest>()
            .add_systems(
                Update,
                (
                    // Captures after the frame's commits so the file and its
                    // sequence number describe the same state.
                    save::save_sketch_system
                        .run_if(on_message::<SaveSketchRequest>)
                        .after(CommitSet::Capture),
                    load::load_sketch_system.run_if(on_message::<LoadSketchRequest>),
                    load::new_sketch_system.run_if(on_message::<NewSketchRequest>),
                    save::poll_save_tasks,
                    load::poll_load_tasks,
                    load::detect_dirty_state,
                ),
            );
    }
}
