//! Sketch save system and task polling.

use bevy::prelude::*;
use bevy::tasks::IoTaskPool;
use futures_lite::future;

use crate::annotations::{FacetLabels, FacetPitches, Pins};
use crate::config::{AddRecentSketchRequest, UpdateLastSketchPathRequest};
use crate::facets::DetectedFacets;
use crate::history::ChangeTracker;
use crate::sketch::Sketch;
use crate::viewport::MapViewport;

use super::format::SavedSketch;
use super::messages::SaveSketchRequest;
use super::resources::{
    AsyncFileOperation, CurrentSketchFile, SaveResult, SaveSketchTask, SketchDirtyState,
    SketchFileError,
};

/// Captures the sketch and writes it on the I/O pool.
#[allow(clippy::too_many_arguments)]
pub fn save_sketch_system(
    mut commands: Commands,
    mut requests: MessageReader<SaveSketchRequest>,
    viewport: Res<MapViewport>,
    sketch: Res<Sketch>,
    detected: Res<DetectedFacets>,
    labels: Res<FacetLabels>,
    pitches: Res<FacetPitches>,
    pins: Res<Pins>,
    tracker: Res<ChangeTracker>,
    mut async_op: ResMut<AsyncFileOperation>,
) {
    for request in requests.read() {
        if async_op.is_busy() {
            warn!("file operation already in progress, save skipped");
            continue;
        }

        let saved = SavedSketch::capture(&viewport, &sketch, &detected, &labels, &pitches, &pins);
        let seq = tracker.last_seq();
        let path = request.path.clone();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("sketch")
            .to_string();

        async_op.is_saving = true;
        async_op.operation_description = Some(format!("Saving {file_name}..."));

        let task = IoTaskPool::get().spawn(async move {
            let json = match serde_json::to_string_pretty(&saved) {
                Ok(json) => json,
                Err(e) => {
                    return SaveResult {
                        path,
                        seq,
                        error: Some(format!("Failed to serialize sketch: {e}")),
                    };
                }
            };
            match std::fs::write(&path, json) {
                Ok(()) => SaveResult {
                    path,
                    seq,
                    error: None,
                },
                Err(e) => SaveResult {
                    path,
                    seq,
                    error: Some(format!("Failed to write file: {e}")),
                },
            }
        });

        commands.spawn(SaveSketchTask(task));
    }
}

#[allow(clippy::too_many_arguments)]
pub fn poll_save_tasks(
    mut commands: Commands,
    mut tasks: Query<(Entity, &mut SaveSketchTask)>,
    mut async_op: ResMut<AsyncFileOperation>,
    mut current_file: ResMut<CurrentSketchFile>,
    mut file_error: ResMut<SketchFileError>,
    mut dirty: ResMut<SketchDirtyState>,
    tracker: Res<ChangeTracker>,
    mut last_path: MessageWriter<UpdateLastSketchPathRequest>,
    mut recents: MessageWriter<AddRecentSketchRequest>,
) {
    for (entity, mut task) in tasks.iter_mut() {
        let Some(result) = future::block_on(future::poll_once(&mut task.0)) else {
            continue;
        };

        async_op.is_saving = false;
        async_op.operation_description = None;

        match result.error {
            None => {
                info!("sketch saved to {:?}", result.path);
                file_error.message = None;
                current_file.path = Some(result.path.clone());
                // Mutations that landed while the file was writing stay dirty.
                dirty.last_saved_seq = result.seq;
                dirty.is_dirty = tracker.last_seq() != result.seq;
                last_path.write(UpdateLastSketchPathRequest {
                    path: result.path.clone(),
                });
                recents.write(AddRecentSketchRequest { path: result.path });
            }
            Some(error) => {
                error!("{error}");
                file_error.message = Some(error);
            }
        }

        commands.entity(entity).despawn();
    }
}
