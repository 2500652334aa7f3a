//! Host-side viewport input: pan, zoom, rotate, and window-size tracking.
//!
//! These systems stand in for the embedding map component. They mutate
//! [`MapViewport`] directly; the `moving` flag keeps editing input suppressed
//! for the duration of a camera gesture.

use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_egui::EguiContexts;

use crate::constants::{BEARING_STEP_DEG, ZOOM_STEP};

use super::projection::MapViewport;

/// Resets the per-frame moving flag. A held middle button counts as moving
/// even between motion events so editing stays suppressed for the whole drag.
pub fn begin_viewport_frame(
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut viewport: ResMut<MapViewport>,
) {
    viewport.moving = mouse_button.pressed(MouseButton::Middle);
}

/// Middle-drag pans the map.
pub fn viewport_pan(
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: MessageReader<MouseMotion>,
    mut viewport: ResMut<MapViewport>,
) {
    if !mouse_button.pressed(MouseButton::Middle) {
        mouse_motion.clear();
        return;
    }

    let mut delta = Vec2::ZERO;
    for event in mouse_motion.read() {
        delta += event.delta;
    }

    if delta != Vec2::ZERO {
        viewport.pan_by_screen(delta);
    }
}

/// Mouse wheel zooms around the viewport center.
pub fn viewport_zoom(
    mut scroll_events: MessageReader<MouseWheel>,
    mut viewport: ResMut<MapViewport>,
) {
    let mut delta = 0.0;
    for event in scroll_events.read() {
        delta += match event.unit {
            MouseScrollUnit::Line => event.y as f64 * ZOOM_STEP,
            MouseScrollUnit::Pixel => event.y as f64 * 0.002,
        };
    }

    if delta != 0.0 {
        viewport.zoom_by(delta);
        viewport.moving = true;
    }
}

/// Q/E rotate the map bearing in fixed steps.
pub fn viewport_rotate(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut viewport: ResMut<MapViewport>,
    mut contexts: EguiContexts,
) {
    // Don't rotate if typing in a text field
    if let Ok(ctx) = contexts.ctx_mut()
        && ctx.wants_keyboard_input()
    {
        return;
    }

    let mut delta = 0.0;
    if keyboard.just_pressed(KeyCode::KeyQ) {
        delta += BEARING_STEP_DEG;
    }
    if keyboard.just_pressed(KeyCode::KeyE) {
        delta -= BEARING_STEP_DEG;
    }

    if delta != 0.0 {
        viewport.rotate_by(delta);
        viewport.moving = true;
    }
}

/// Keeps the viewport size in sync with the window.
pub fn sync_viewport_size(
    window_query: Query<&Window, With<PrimaryWindow>>,
    mut viewport: ResMut<MapViewport>,
) {
    let Ok(window) = window_query.single() else {
        return;
    };

    let size = Vec2::new(window.width(), window.height());
    if size != viewport.size_px && size.x > 0.0 && size.y > 0.0 {
        viewport.size_px = size;
    }
}
