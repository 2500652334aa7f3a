//! AI roof detection: posts the visible map box to a configured service and
//! merges returned segments into the sketch as a single undoable batch.
//!
//! - [`client`] - wire types and the blocking HTTP call
//! - [`apply`] - snapping detected segments onto the sketch
//! - [`state`] - run state and the task component

pub mod apply;
pub mod client;
mod state;

pub use state::DetectionState;

use bevy::prelude::*;
use bevy::tasks::AsyncComputeTaskPool;
use futures_lite::future;

use crate::config::AppConfig;
use crate::history::CommitSet;
use crate::sketch::{Sketch, SketchMutated, SketchMutation};
use crate::viewport::MapViewport;

use client::DetectionQuery;
use state::RoofDetectionTask;

#[derive(Message)]
pub struct DetectRoofRequest;

fn request_roof_detection(
    mut commands: Commands,
    mut requests: MessageReader<DetectRoofRequest>,
    config: Res<AppConfig>,
    viewport: Res<MapViewport>,
    mut state: ResMut<DetectionState>,
) {
    for _ in requests.read() {
        if state.is_running {
            warn!("detection already in progress, request skipped");
            continue;
        }

        let Some(endpoint) = config.data.detection_endpoint.clone() else {
            state.error = Some("No detection endpoint configured".into());
            warn!("roof detection requested but no endpoint is configured");
            continue;
        };

        let query = DetectionQuery::new(viewport.bounds(), viewport.zoom);
        debug!(
            "requesting roof detection for [{:.5}, {:.5}] x [{:.5}, {:.5}]",
            query.west, query.south, query.east, query.north
        );

        state.is_running = true;
        state.error = None;

        let task = AsyncComputeTaskPool::get()
            .spawn(async move { client::fetch_detection(endpoint, query) });
        commands.spawn(RoofDetectionTask(task));
    }
}

fn poll_roof_detection(
    mut commands: Commands,
    mut tasks: Query<(Entity, &mut RoofDetectionTask)>,
    mut state: ResMut<DetectionState>,
    mut sketch: ResMut<Sketch>,
    viewport: Res<MapViewport>,
    mut mutations: MessageWriter<SketchMutated>,
) {
    for (entity, mut task) in tasks.iter_mut() {
        let Some(outcome) = future::block_on(future::poll_once(&mut task.0)) else {
            continue;
        };
        commands.entity(entity).despawn();
        state.is_running = false;

        if let Some(error) = outcome.error {
            error!("{error}");
            state.error = Some(error);
            continue;
        }

        let added = apply::apply_detected_edges(&mut sketch, &viewport, &outcome.edges);
        state.error = None;
        state.last_added_count = Some(added);
        info!(
            "detection returned {} segments, {} added",
            outcome.edges.len(),
            added
        );

        // One mutation for the whole batch, so undo removes it wholesale.
        if added > 0 {
            mutations.write(SketchMutated {
                mutation: SketchMutation::BatchApplied,
            });
        }
    }
}

pub struct DetectionPlugin;

impl Plugin for DetectionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DetectionState>()
            .add_message::<DetectRoofRequest>()
            .add_systems(
                Update,
                (
                    request_roof_detection.run_if(on_message::<DetectRoofRequest>),
                    poll_roof_detection.in_set(CommitSet::Mutate),
                ),
            );
    }
}
