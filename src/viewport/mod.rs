mod control;
mod projection;

pub use projection::{MapViewport, ViewportBounds};

use bevy::prelude::*;

use crate::history::CommitSet;

pub struct ViewportPlugin;

impl Plugin for ViewportPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MapViewport>()
            .add_systems(
                Update,
                (
                    control::begin_viewport_frame,
                    control::viewport_pan,
                    control::viewport_zoom,
                    control::viewport_rotate,
                    control::sync_viewport_size,
                )
                    .chain()
                    .before(CommitSet::Mutate),
            );
    }
}
