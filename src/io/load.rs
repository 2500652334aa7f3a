//! Sketch load / new-sketch systems and task polling.
//!
//! Loading never mutates the live state directly: the parsed file becomes a
//! snapshot and goes through [`ApplyExternalSketch`], the same wholesale
//! apply path the host uses, so the history baseline resets consistently.

use bevy::prelude::*;
use bevy::tasks::IoTaskPool;
use futures_lite::future;

use crate::config::UpdateLastSketchPathRequest;
use crate::history::{ApplyExternalSketch, SketchSnapshot};
use crate::viewport::MapViewport;

use super::format::{SavedSketch, SKETCH_FORMAT_VERSION};
use super::messages::{LoadSketchRequest, NewSketchRequest};
use super::resources::{
    AsyncFileOperation, CurrentSketchFile, LoadResult, LoadSketchTask, SketchDirtyState,
    SketchFileError,
};

/// Reads and parses the file on the I/O pool.
pub fn load_sketch_system(
    mut commands: Commands,
    mut requests: MessageReader<LoadSketchRequest>,
    mut async_op: ResMut<AsyncFileOperation>,
) {
    for request in requests.read() {
        if async_op.is_busy() {
            warn!("file operation already in progress, load skipped");
            continue;
        }

        let path = request.path.clone();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("sketch")
            .to_string();

        async_op.is_loading = true;
        async_op.operation_description = Some(format!("Loading {file_name}..."));

        let task = IoTaskPool::get().spawn(async move {
            let json = match std::fs::read_to_string(&path) {
                Ok(content) => content,
                Err(e) => {
                    return LoadResult {
                        path,
                        saved_sketch: None,
                        error: Some(format!("Failed to read file: {e}")),
                    };
                }
            };
            match serde_json::from_str::<SavedSketch>(&json) {
                Ok(saved) if saved.version > SKETCH_FORMAT_VERSION => LoadResult {
                    path,
                    saved_sketch: None,
                    error: Some(format!(
                        "Sketch format version {} is newer than this build understands",
                        saved.version
                    )),
                },
                Ok(saved) => LoadResult {
                    path,
                    saved_sketch: Some(saved),
                    error: None,
                },
                Err(e) => LoadResult {
                    path,
                    saved_sketch: None,
                    error: Some(format!("Failed to parse sketch file: {e}")),
                },
            }
        });

        commands.spawn(LoadSketchTask(task));
    }
}

#[allow(clippy::too_many_arguments)]
pub fn poll_load_tasks(
    mut commands: Commands,
    mut tasks: Query<(Entity, &mut LoadSketchTask)>,
    mut async_op: ResMut<AsyncFileOperation>,
    mut viewport: ResMut<MapViewport>,
    mut current_file: ResMut<CurrentSketchFile>,
    mut file_error: ResMut<SketchFileError>,
    mut dirty: ResMut<SketchDirtyState>,
    mut applies: MessageWriter<ApplyExternalSketch>,
    mut last_path: MessageWriter<UpdateLastSketchPathRequest>,
) {
    for (entity, mut task) in tasks.iter_mut() {
        let Some(result) = future::block_on(future::poll_once(&mut task.0)) else {
            continue;
        };

        async_op.is_loading = false;
        async_op.operation_description = None;

        if let Some(error) = result.error {
            error!("{error}");
            file_error.message = Some(error);
            commands.entity(entity).despawn();
            continue;
        }

        let Some(saved) = result.saved_sketch else {
            commands.entity(entity).despawn();
            continue;
        };

        if let Some(view) = saved.viewport {
            viewport.center = view.center;
            viewport.zoom = view.zoom;
            viewport.bearing_deg = view.bearing_deg;
        }

        file_error.message = None;
        current_file.path = Some(result.path.clone());
        last_path.write(UpdateLastSketchPathRequest {
            path: result.path.clone(),
        });

        info!("sketch loaded from {:?}", result.path);
        dirty.mark_clean_on_next_change = true;
        applies.write(ApplyExternalSketch {
            snapshot: saved.into_snapshot(),
            echo_of: None,
        });

        commands.entity(entity).despawn();
    }
}

/// Blank sketch: an empty snapshot through the wholesale apply path. The
/// viewport stays put so the user can re-trace the same roof.
pub fn new_sketch_system(
    mut requests: MessageReader<NewSketchRequest>,
    mut current_file: ResMut<CurrentSketchFile>,
    mut file_error: ResMut<SketchFileError>,
    mut dirty: ResMut<SketchDirtyState>,
    mut applies: MessageWriter<ApplyExternalSketch>,
) {
    for _ in requests.read() {
        current_file.path = None;
        file_error.message = None;
        dirty.mark_clean_on_next_change = true;
        applies.write(ApplyExternalSketch {
            snapshot: SketchSnapshot::default(),
            echo_of: None,
        });
        info!("started new sketch");
    }
}

/// Marks the sketch dirty whenever the commit sequence has advanced past the
/// last save.
pub fn detect_dirty_state(
    mut changes: MessageReader<crate::history::SketchChanged>,
    mut dirty: ResMut<SketchDirtyState>,
) {
    for change in changes.read() {
        if dirty.mark_clean_on_next_change {
            dirty.mark_clean_on_next_change = false;
            dirty.last_saved_seq = change.seq;
            dirty.is_dirty = false;
        } else {
            dirty.is_dirty = change.seq != dirty.last_saved_seq;
        }
    }
}
