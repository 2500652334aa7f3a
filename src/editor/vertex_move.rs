//! Non-destructive vertex editing: grab a vertex with a right-button
//! release, drag it, commit with a left click. Dropping within snap range of
//! another vertex merges the two, rewriting every edge that referenced the
//! original coordinate.

use std::time::{Duration, Instant};

use bevy::prelude::*;
use bevy_egui::EguiContexts;

use crate::constants::{VERTEX_CANCEL_COOLDOWN_MS, VERTEX_EDIT_SNAP_THRESHOLD_PX};
use crate::geo::GeoPoint;
use crate::sketch::{Sketch, SketchMutated, SketchMutation};
use crate::viewport::MapViewport;

use super::drawing::DrawState;
use super::params::{is_cursor_over_ui, CursorParams};
use super::snapping::snap_to_nearest_vertex;
use super::tools::{CurrentTool, EditorTool};

/// An in-progress vertex drag.
#[derive(Debug, Clone, Copy)]
pub struct VertexDrag {
    /// Coordinate the vertex had when grabbed; every matching endpoint is
    /// rewritten on commit.
    pub original: GeoPoint,
    /// Where the vertex currently hovers.
    pub current: GeoPoint,
    /// Merge target when the drag is within snap range of another vertex.
    pub snap: Option<GeoPoint>,
}

#[derive(Resource, Default)]
pub struct VertexMoveState {
    pub drag: Option<VertexDrag>,
    /// Set when this frame's click ended a drag, so the draw tool (which
    /// runs afterwards) does not treat the same click as a new anchor.
    pub click_consumed: bool,
    cooldown_until: Option<Instant>,
}

impl VertexMoveState {
    pub fn is_idle(&self) -> bool {
        self.drag.is_none()
    }

    fn in_cooldown(&self) -> bool {
        self.cooldown_until.is_some_and(|until| Instant::now() < until)
    }

    /// Cancel the drag and block re-entry briefly, so the button release
    /// that ended this drag cannot immediately grab again.
    fn cancel(&mut self) {
        if self.drag.take().is_some() {
            self.cooldown_until =
                Some(Instant::now() + Duration::from_millis(VERTEX_CANCEL_COOLDOWN_MS));
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub fn handle_vertex_move(
    mouse_button: Res<ButtonInput<MouseButton>>,
    keyboard: Res<ButtonInput<KeyCode>>,
    current_tool: Res<CurrentTool>,
    viewport: Res<MapViewport>,
    draw_state: Res<DrawState>,
    mut state: ResMut<VertexMoveState>,
    mut sketch: ResMut<Sketch>,
    mut mutations: MessageWriter<SketchMutated>,
    cursor: CursorParams,
    mut contexts: EguiContexts,
) {
    state.click_consumed = false;

    // Vertex editing belongs to the draw tool; an active chain owns the
    // pointer.
    if current_tool.tool != EditorTool::Draw || !draw_state.is_idle() {
        state.cancel();
        return;
    }

    if viewport.is_moving() {
        state.cancel();
        return;
    }

    if keyboard.just_pressed(KeyCode::Escape)
        || (state.drag.is_some() && mouse_button.just_pressed(MouseButton::Right))
    {
        state.cancel();
        return;
    }

    if is_cursor_over_ui(&mut contexts) {
        return;
    }

    let Some(cursor_px) = cursor.cursor_screen_pos() else {
        state.cancel();
        return;
    };

    if state.drag.is_none() {
        if mouse_button.just_released(MouseButton::Right)
            && !state.in_cooldown()
            && let Some(vertex) = snap_to_nearest_vertex(
                &viewport,
                &sketch,
                cursor_px,
                None,
                VERTEX_EDIT_SNAP_THRESHOLD_PX,
            )
        {
            state.drag = Some(VertexDrag {
                original: vertex,
                current: vertex,
                snap: None,
            });
            debug!("vertex grabbed at ({:.7}, {:.7})", vertex.lng, vertex.lat);
        }
        return;
    }

    let (original, target) = {
        let Some(drag) = state.drag.as_mut() else {
            return;
        };
        drag.current = viewport.unproject(cursor_px);
        drag.snap = snap_to_nearest_vertex(
            &viewport,
            &sketch,
            cursor_px,
            Some(drag.original),
            VERTEX_EDIT_SNAP_THRESHOLD_PX,
        );
        (drag.original, drag.snap.unwrap_or(drag.current))
    };

    if mouse_button.just_released(MouseButton::Left) {
        state.drag = None;
        state.click_consumed = true;
        let rewritten = sketch.replace_vertex(original, target);
        if rewritten > 0 {
            mutations.write(SketchMutated {
                mutation: SketchMutation::VertexMoved,
            });
            debug!(
                "vertex moved to ({:.7}, {:.7}), {} endpoints rewritten",
                target.lng, target.lat, rewritten
            );
        }
    }
}
