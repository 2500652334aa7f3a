//! Detection state resource and task component.

use bevy::prelude::*;
use bevy::tasks::Task;

use super::client::DetectedEdge;

#[derive(Resource, Default)]
pub struct DetectionState {
    /// A detection request is in flight.
    pub is_running: bool,
    /// Last failure, shown in the panel until the next attempt.
    pub error: Option<String>,
    /// How many segments the last successful run added.
    pub last_added_count: Option<usize>,
}

pub struct DetectionOutcome {
    pub edges: Vec<DetectedEdge>,
    pub error: Option<String>,
}

#[derive(Component)]
pub struct RoofDetectionTask(pub Task<DetectionOutcome>);
