//! Static 2D camera for the sketch overlay. Pan, zoom, and rotation act on
//! the viewport projection, not the camera, so the camera never moves.

use bevy::camera::visibility::RenderLayers;
use bevy::prelude::*;

pub fn spawn_camera(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        Transform::from_translation(Vec3::new(0.0, 0.0, 1000.0)),
        // Layer 0 for the map underlay, layer 1 for sketch gizmos.
        RenderLayers::from_layers(&[0, 1]),
    ));
}
