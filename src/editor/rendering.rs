//! Sketch overlay rendering: gizmo passes for edges, vertices, facets, and
//! pins, plus egui text overlays for measurements. Gizmos draw in world
//! coordinates through the viewport projection so the overlay tracks the map
//! under pan, zoom, and rotation without touching the camera.

use bevy::camera::visibility::RenderLayers;
use bevy::gizmos::config::{GizmoConfigGroup, GizmoConfigStore};
use bevy::gizmos::prelude::*;
use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::annotations::{FacetLabels, FacetPitches, Pins, LABEL_LOW_SLOPE, LABEL_REMOVED};
use crate::config::SnapSettings;
use crate::facets::DetectedFacets;
use crate::geo::metrics::distance_feet;
use crate::geo::GeoPoint;
use crate::sketch::Sketch;
use crate::theme;
use crate::viewport::MapViewport;

use super::drawing::{resolve_endpoint, DrawSettings, DrawState};
use super::params::{is_cursor_over_ui, CursorParams};
use super::tools::{CurrentTool, EditorTool};
use super::vertex_move::{VertexDrag, VertexMoveState};

const VERTEX_RADIUS_PX: f32 = 3.5;
const SNAP_RING_RADIUS_PX: f32 = 9.0;
const CENTROID_RADIUS_PX: f32 = 2.5;
const PIN_RADIUS_PX: f32 = 5.0;
const PIN_STEM_PX: f32 = 14.0;

const MEASUREMENT_TEXT_SIZE: f32 = 12.0;
const AREA_TEXT_SIZE: f32 = 13.0;
/// Segments shorter than this on screen get no length label; the labels
/// would crowd each other at low zoom.
const MIN_LABELED_EDGE_PX: f32 = 24.0;

/// Custom gizmo group for the sketch overlay (layer 1, above the map).
#[derive(Default, Reflect, GizmoConfigGroup)]
pub struct SketchGizmoGroup;

pub fn configure_sketch_gizmos(mut config_store: ResMut<GizmoConfigStore>) {
    let (config, _) = config_store.config_mut::<SketchGizmoGroup>();
    config.render_layers = RenderLayers::layer(1);
}

/// Substitute the dragged vertex so edges and measurements follow the drag
/// before it commits.
fn display_endpoint(p: GeoPoint, drag: Option<&VertexDrag>) -> GeoPoint {
    match drag {
        Some(d) if p.approx_eq(&d.original) => d.snap.unwrap_or(d.current),
        _ => p,
    }
}

pub fn render_sketch(
    mut gizmos: Gizmos<SketchGizmoGroup>,
    sketch: Res<Sketch>,
    vertex_move: Res<VertexMoveState>,
    viewport: Res<MapViewport>,
) {
    let drag = vertex_move.drag.as_ref();

    for edge in sketch.edges() {
        let a = display_endpoint(edge.start, drag);
        let b = display_endpoint(edge.end, drag);
        gizmos.line_2d(
            viewport.project_world(a),
            viewport.project_world(b),
            edge.color,
        );
    }

    for vertex in sketch.distinct_vertices() {
        let dragged = drag.is_some_and(|d| vertex.approx_eq(&d.original));
        let color = if dragged {
            theme::VERTEX_DRAG
        } else {
            theme::VERTEX_MARKER
        };
        let shown = display_endpoint(vertex, drag);
        gizmos.circle_2d(
            Isometry2d::from_translation(viewport.project_world(shown)),
            VERTEX_RADIUS_PX,
            color,
        );
    }

    // Ring around the merge target while a drag hovers in snap range.
    if let Some(d) = drag
        && let Some(snap) = d.snap
    {
        gizmos.circle_2d(
            Isometry2d::from_translation(viewport.project_world(snap)),
            SNAP_RING_RADIUS_PX,
            theme::SNAP_TARGET,
        );
    }
}

pub fn render_facets(
    mut gizmos: Gizmos<SketchGizmoGroup>,
    detected: Res<DetectedFacets>,
    labels: Res<FacetLabels>,
    viewport: Res<MapViewport>,
) {
    for facet in &detected.facets {
        let color = if labels.has(facet.key, LABEL_REMOVED) {
            theme::FACET_REMOVED
        } else if labels.has(facet.key, LABEL_LOW_SLOPE) {
            theme::FACET_LOW_SLOPE
        } else {
            theme::FACET_OUTLINE
        };

        let ring = &facet.ring;
        for i in 0..ring.len() {
            let a = viewport.project_world(ring[i]);
            let b = viewport.project_world(ring[(i + 1) % ring.len()]);
            gizmos.line_2d(a, b, color);
        }

        gizmos.circle_2d(
            Isometry2d::from_translation(viewport.project_world(facet.centroid)),
            CENTROID_RADIUS_PX,
            theme::FACET_CENTROID,
        );
    }
}

pub fn render_draw_preview(
    mut gizmos: Gizmos<SketchGizmoGroup>,
    current_tool: Res<CurrentTool>,
    draw_state: Res<DrawState>,
    settings: Res<DrawSettings>,
    snap_settings: Res<SnapSettings>,
    sketch: Res<Sketch>,
    viewport: Res<MapViewport>,
    cursor: CursorParams,
    mut contexts: EguiContexts,
) {
    if current_tool.tool != EditorTool::Draw {
        return;
    }
    let Some(anchor) = draw_state.anchor else {
        return;
    };
    if viewport.is_moving() || is_cursor_over_ui(&mut contexts) {
        return;
    }
    let Some(cursor_px) = cursor.cursor_screen_pos() else {
        return;
    };

    let end = resolve_endpoint(
        &viewport,
        &sketch,
        anchor,
        draw_state.prev_edge,
        cursor_px,
        snap_settings.angle_snap,
    );

    let preview_color = settings.stroke_color().with_alpha(0.5);
    gizmos.line_2d(
        viewport.project_world(anchor),
        viewport.project_world(end),
        preview_color,
    );
    gizmos.circle_2d(
        Isometry2d::from_translation(viewport.project_world(anchor)),
        VERTEX_RADIUS_PX,
        theme::VERTEX_DRAG,
    );
}

pub fn render_pins(
    mut gizmos: Gizmos<SketchGizmoGroup>,
    pins: Res<Pins>,
    viewport: Res<MapViewport>,
) {
    for pin in pins.pins() {
        let foot = viewport.project_world(pin.position);
        let head = foot + Vec2::new(0.0, PIN_STEM_PX);
        gizmos.line_2d(foot, head - Vec2::new(0.0, PIN_RADIUS_PX), theme::PIN_MARKER);
        gizmos.circle_2d(
            Isometry2d::from_translation(head),
            PIN_RADIUS_PX,
            theme::PIN_MARKER,
        );
    }
}

pub fn edge_measurement_labels(
    mut contexts: EguiContexts,
    sketch: Res<Sketch>,
    vertex_move: Res<VertexMoveState>,
    viewport: Res<MapViewport>,
) {
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };
    let drag = vertex_move.drag.as_ref();

    for edge in sketch.edges() {
        let a = display_endpoint(edge.start, drag);
        let b = display_endpoint(edge.end, drag);
        let a_px = viewport.project(a);
        let b_px = viewport.project(b);
        if a_px.distance(b_px) < MIN_LABELED_EDGE_PX {
            continue;
        }

        // Stored length unless an endpoint is mid-drag.
        let length_ft = if drag.is_some() && (a != edge.start || b != edge.end) {
            distance_feet(a, b)
        } else {
            edge.length_ft
        };

        let mid = a_px.lerp(b_px, 0.5);
        egui::Area::new(egui::Id::new(format!("edge_len_{}", edge.id)))
            .fixed_pos(egui::pos2(mid.x, mid.y))
            .pivot(egui::Align2::CENTER_CENTER)
            .interactable(false)
            .show(ctx, |ui| {
                ui.label(
                    egui::RichText::new(format!("{:.1} ft", length_ft))
                        .color(theme::ui::MEASUREMENT_TEXT)
                        .size(MEASUREMENT_TEXT_SIZE),
                );
            });
    }
}

pub fn preview_measurement_label(
    mut contexts: EguiContexts,
    current_tool: Res<CurrentTool>,
    draw_state: Res<DrawState>,
    snap_settings: Res<SnapSettings>,
    sketch: Res<Sketch>,
    viewport: Res<MapViewport>,
    cursor: CursorParams,
) {
    if current_tool.tool != EditorTool::Draw {
        return;
    }
    let Some(anchor) = draw_state.anchor else {
        return;
    };
    if viewport.is_moving() {
        return;
    }
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };
    if ctx.is_pointer_over_area() {
        return;
    }
    let Some(cursor_px) = cursor.cursor_screen_pos() else {
        return;
    };

    let end = resolve_endpoint(
        &viewport,
        &sketch,
        anchor,
        draw_state.prev_edge,
        cursor_px,
        snap_settings.angle_snap,
    );
    let mid = viewport.project(anchor).lerp(viewport.project(end), 0.5);

    egui::Area::new(egui::Id::new("draw_preview_len"))
        .fixed_pos(egui::pos2(mid.x, mid.y))
        .pivot(egui::Align2::CENTER_CENTER)
        .interactable(false)
        .show(ctx, |ui| {
            ui.label(
                egui::RichText::new(format!("{:.1} ft", distance_feet(anchor, end)))
                    .color(theme::ui::MEASUREMENT_TEXT)
                    .size(MEASUREMENT_TEXT_SIZE),
            );
        });
}

pub fn facet_area_labels(
    mut contexts: EguiContexts,
    detected: Res<DetectedFacets>,
    labels: Res<FacetLabels>,
    pitches: Res<FacetPitches>,
    viewport: Res<MapViewport>,
) {
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    for facet in &detected.facets {
        let removed = labels.has(facet.key, LABEL_REMOVED);
        let color = if removed {
            theme::ui::HINT_TEXT
        } else {
            theme::ui::FACET_AREA_TEXT
        };
        let pos = viewport.project(facet.centroid);

        egui::Area::new(egui::Id::new(format!("facet_area_{:016x}", facet.key.0)))
            .fixed_pos(egui::pos2(pos.x, pos.y))
            .pivot(egui::Align2::CENTER_CENTER)
            .interactable(false)
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.label(
                        egui::RichText::new(format!("{:.0} sqft", facet.area_sqft))
                            .color(color)
                            .size(AREA_TEXT_SIZE),
                    );
                    if let Some(pitch) = pitches.get(facet.key) {
                        ui.label(
                            egui::RichText::new(pitch.to_string())
                                .color(color)
                                .size(MEASUREMENT_TEXT_SIZE),
                        );
                    }
                });
            });
    }
}

pub fn pin_labels(
    mut contexts: EguiContexts,
    pins: Res<Pins>,
    viewport: Res<MapViewport>,
) {
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    for pin in pins.pins() {
        let pos = viewport.project(pin.position);
        let text = if pin.label.is_empty() {
            pin.category.display_name().to_string()
        } else {
            pin.label.clone()
        };

        egui::Area::new(egui::Id::new(format!("pin_label_{}", pin.id)))
            .fixed_pos(egui::pos2(pos.x, pos.y + PIN_RADIUS_PX))
            .pivot(egui::Align2::CENTER_TOP)
            .interactable(false)
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.label(
                        egui::RichText::new(text)
                            .color(theme::ui::LABEL_TEXT)
                            .size(MEASUREMENT_TEXT_SIZE),
                    );
                    if let Some(material) = &pin.material {
                        ui.label(
                            egui::RichText::new(&material.name)
                                .color(theme::ui::HINT_TEXT)
                                .size(10.0),
                        );
                    }
                });
            });
    }
}
