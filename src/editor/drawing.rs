//! The segment drawing tool: click-to-click chained edges with vertex and
//! angle snapping, plus relabel and delete on existing edges.

use bevy::prelude::*;
use bevy_egui::EguiContexts;

use crate::config::SnapSettings;
use crate::constants::{
    EDGE_HIT_THRESHOLD_PX, VERTEX_EDIT_SNAP_THRESHOLD_PX, VERTEX_SNAP_THRESHOLD_PX,
};
use crate::geo::GeoPoint;
use crate::sketch::{Sketch, SketchMutated, SketchMutation};
use crate::theme;
use crate::viewport::MapViewport;

use super::params::{is_cursor_over_ui, CursorParams};
use super::snapping::{snap_angle, snap_to_nearest_vertex};
use super::tools::{CurrentTool, EditorTool};
use super::vertex_move::VertexMoveState;

/// Drawing progress. `anchor` is the committed start of the segment under
/// construction; `prev_edge` is the last committed segment, kept for
/// perpendicular angle candidates.
#[derive(Resource, Default)]
pub struct DrawState {
    pub anchor: Option<GeoPoint>,
    pub prev_edge: Option<(GeoPoint, GeoPoint)>,
}

impl DrawState {
    pub fn is_idle(&self) -> bool {
        self.anchor.is_none()
    }

    pub fn cancel(&mut self) {
        self.anchor = None;
        self.prev_edge = None;
    }
}

/// Label applied to newly drawn (or relabeled) edges.
#[derive(Resource, Default)]
pub struct DrawSettings {
    pub label: Option<String>,
}

impl DrawSettings {
    pub fn stroke_color(&self) -> Color {
        match &self.label {
            Some(label) => theme::color_for_edge_label(label),
            None => theme::EDGE_DEFAULT,
        }
    }

    pub fn labels_vec(&self) -> Vec<String> {
        self.label.iter().cloned().collect()
    }
}

/// Resolve the free endpoint the way a commit would: stored vertices win,
/// then angle candidates, then the raw cursor position. Rendering uses the
/// same resolution for the preview so what the user sees is what commits.
pub fn resolve_endpoint(
    viewport: &MapViewport,
    sketch: &Sketch,
    anchor: GeoPoint,
    prev_edge: Option<(GeoPoint, GeoPoint)>,
    cursor_px: Vec2,
    angle_snap_enabled: bool,
) -> GeoPoint {
    if let Some(vertex) =
        snap_to_nearest_vertex(viewport, sketch, cursor_px, None, VERTEX_SNAP_THRESHOLD_PX)
    {
        return vertex;
    }
    snap_angle(
        viewport,
        anchor,
        viewport.unproject(cursor_px),
        prev_edge,
        angle_snap_enabled,
    )
}

/// Screen-space distance from a point to a segment.
pub fn point_segment_distance(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f32::EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Edge whose stroke passes within the hit threshold of the cursor.
pub fn edge_at_cursor(viewport: &MapViewport, sketch: &Sketch, cursor_px: Vec2) -> Option<u64> {
    let mut best: Option<(f32, u64)> = None;
    for edge in sketch.edges() {
        let a = viewport.project(edge.start);
        let b = viewport.project(edge.end);
        let dist = point_segment_distance(cursor_px, a, b);
        if dist <= EDGE_HIT_THRESHOLD_PX && best.is_none_or(|(d, _)| dist < d) {
            best = Some((dist, edge.id));
        }
    }
    best.map(|(_, id)| id)
}

#[allow(clippy::too_many_arguments)]
pub fn handle_draw(
    mouse_button: Res<ButtonInput<MouseButton>>,
    keyboard: Res<ButtonInput<KeyCode>>,
    current_tool: Res<CurrentTool>,
    viewport: Res<MapViewport>,
    snap_settings: Res<SnapSettings>,
    settings: Res<DrawSettings>,
    vertex_move: Res<VertexMoveState>,
    mut draw_state: ResMut<DrawState>,
    mut sketch: ResMut<Sketch>,
    mut mutations: MessageWriter<SketchMutated>,
    cursor: CursorParams,
    mut contexts: EguiContexts,
) {
    if current_tool.tool != EditorTool::Draw {
        draw_state.cancel();
        return;
    }

    // The map moving underneath invalidates the interaction.
    if viewport.is_moving() {
        draw_state.cancel();
        return;
    }

    if keyboard.just_pressed(KeyCode::Escape) {
        draw_state.cancel();
        return;
    }

    // An active vertex drag owns the pointer, and the click that commits
    // one must not double as a draw click.
    if !vertex_move.is_idle() || vertex_move.click_consumed {
        return;
    }

    if is_cursor_over_ui(&mut contexts) {
        return;
    }

    let Some(cursor_px) = cursor.cursor_screen_pos() else {
        draw_state.cancel();
        return;
    };

    // Right button: cancel an active chain, otherwise delete the edge under
    // the cursor. Clicks near a vertex are left for the vertex editor.
    if mouse_button.just_pressed(MouseButton::Right) {
        if !draw_state.is_idle() {
            draw_state.cancel();
        } else if snap_to_nearest_vertex(
            &viewport,
            &sketch,
            cursor_px,
            None,
            VERTEX_EDIT_SNAP_THRESHOLD_PX,
        )
        .is_none()
            && let Some(edge_id) = edge_at_cursor(&viewport, &sketch, cursor_px)
            && sketch.remove_edge(edge_id)
        {
            mutations.write(SketchMutated {
                mutation: SketchMutation::EdgeRemoved,
            });
            debug!("edge {} deleted", edge_id);
        }
        return;
    }

    if !mouse_button.just_released(MouseButton::Left) {
        return;
    }

    match draw_state.anchor {
        None => {
            // First click: an endpoint hit anchors there, an edge interior
            // hit relabels, anything else anchors at the raw coordinate.
            if let Some(vertex) = snap_to_nearest_vertex(
                &viewport,
                &sketch,
                cursor_px,
                None,
                VERTEX_SNAP_THRESHOLD_PX,
            ) {
                draw_state.anchor = Some(vertex);
            } else if let Some(edge_id) = edge_at_cursor(&viewport, &sketch, cursor_px) {
                if sketch.relabel_edge(edge_id, settings.labels_vec(), settings.stroke_color()) {
                    mutations.write(SketchMutated {
                        mutation: SketchMutation::EdgeRelabeled,
                    });
                    debug!("edge {} relabeled", edge_id);
                }
            } else {
                draw_state.anchor = Some(viewport.unproject(cursor_px));
            }
        }
        Some(anchor) => {
            let end = resolve_endpoint(
                &viewport,
                &sketch,
                anchor,
                draw_state.prev_edge,
                cursor_px,
                snap_settings.angle_snap,
            );
            // Same-vertex clicks are skipped without dropping the chain.
            if let Some(id) = sketch.add_edge(anchor, end, settings.labels_vec(), settings.stroke_color())
            {
                draw_state.prev_edge = Some((anchor, end));
                draw_state.anchor = Some(end);
                mutations.write(SketchMutated {
                    mutation: SketchMutation::EdgeAdded,
                });
                debug!("edge {} committed", id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_segment_distance() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 0.0);
        assert!((point_segment_distance(Vec2::new(5.0, 3.0), a, b) - 3.0).abs() < 1e-5);
        // Beyond the endpoints the distance is to the nearest endpoint.
        assert!((point_segment_distance(Vec2::new(14.0, 3.0), a, b) - 5.0).abs() < 1e-5);
        // Degenerate segment.
        assert!((point_segment_distance(Vec2::new(3.0, 4.0), a, a) - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_edge_at_cursor_prefers_closest() {
        let viewport = MapViewport::default();
        let mut sketch = Sketch::default();
        let center_px = viewport.size_px * 0.5;
        let a = viewport.unproject(center_px);
        let b = viewport.unproject(center_px + Vec2::new(200.0, 0.0));
        let c = viewport.unproject(center_px + Vec2::new(0.0, 30.0));
        let d = viewport.unproject(center_px + Vec2::new(200.0, 30.0));
        let first = sketch.add_edge(a, b, Vec::new(), Color::WHITE).unwrap();
        let second = sketch.add_edge(c, d, Vec::new(), Color::WHITE).unwrap();

        let near_first = center_px + Vec2::new(100.0, 4.0);
        assert_eq!(edge_at_cursor(&viewport, &sketch, near_first), Some(first));
        let near_second = center_px + Vec2::new(100.0, 27.0);
        assert_eq!(edge_at_cursor(&viewport, &sketch, near_second), Some(second));
        let far = center_px + Vec2::new(100.0, 16.0);
        assert_eq!(edge_at_cursor(&viewport, &sketch, far), None);
    }

    #[test]
    fn test_resolve_endpoint_prefers_stored_vertex() {
        let viewport = MapViewport::default();
        let mut sketch = Sketch::default();
        let center_px = viewport.size_px * 0.5;
        let existing = viewport.unproject(center_px + Vec2::new(100.0, 50.0));
        sketch.add_edge(
            existing,
            viewport.unproject(center_px + Vec2::new(300.0, 50.0)),
            Vec::new(),
            Color::WHITE,
        );

        let anchor = viewport.unproject(center_px);
        // Click lands a few pixels from the stored vertex.
        let resolved = resolve_endpoint(
            &viewport,
            &sketch,
            anchor,
            None,
            center_px + Vec2::new(104.0, 47.0),
            true,
        );
        assert!(resolved.approx_eq(&existing));
    }
}
