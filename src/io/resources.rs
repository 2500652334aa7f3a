//! Resource and task types for sketch file state.

use std::path::PathBuf;

use bevy::prelude::*;
use bevy::tasks::Task;

use super::format::SavedSketch;

/// Path of the file the sketch was last saved to or loaded from.
#[derive(Resource, Default)]
pub struct CurrentSketchFile {
    pub path: Option<PathBuf>,
}

/// Last file operation failure, shown in the UI until the next attempt.
#[derive(Resource, Default)]
pub struct SketchFileError {
    pub message: Option<String>,
}

/// In-flight async file I/O, used to block overlapping operations and to
/// drive the busy indicator.
#[derive(Resource, Default)]
pub struct AsyncFileOperation {
    pub is_saving: bool,
    pub is_loading: bool,
    pub operation_description: Option<String>,
}

impl AsyncFileOperation {
    pub fn is_busy(&self) -> bool {
        self.is_saving || self.is_loading
    }
}

/// Unsaved-changes tracking, keyed off the commit sequence so any committed
/// mutation counts.
#[derive(Resource, Default)]
pub struct SketchDirtyState {
    pub is_dirty: bool,
    pub last_saved_seq: u64,
    /// Set by load/new; the change they emit is the new clean point, since
    /// its sequence number is not known until the apply lands.
    pub mark_clean_on_next_change: bool,
}

pub struct SaveResult {
    pub path: PathBuf,
    /// Commit sequence the capture reflects; the new clean point on success.
    pub seq: u64,
    pub error: Option<String>,
}

pub struct LoadResult {
    pub path: PathBuf,
    pub saved_sketch: Option<SavedSketch>,
    pub error: Option<String>,
}

#[derive(Component)]
pub struct SaveSketchTask(pub Task<SaveResult>);

#[derive(Component)]
pub struct LoadSketchTask(pub Task<LoadResult>);
