//! Merging detected segments into the sketch.

use crate::constants::VERTEX_SNAP_THRESHOLD_PX;
use crate::editor::snapping::snap_to_nearest_vertex;
use crate::geo::GeoPoint;
use crate::sketch::Sketch;
use crate::theme;
use crate::viewport::MapViewport;

use super::client::DetectedEdge;

/// Add every detected segment, snapping endpoints onto existing sketch
/// vertices within the drawing snap radius and skipping segments the sketch
/// already has. Returns how many were added; the caller commits the batch as
/// one mutation.
pub fn apply_detected_edges(
    sketch: &mut Sketch,
    viewport: &MapViewport,
    edges: &[DetectedEdge],
) -> usize {
    let mut added = 0;

    for detected in edges {
        let start = resolve_onto_sketch(sketch, viewport, detected.start_point());
        let end = resolve_onto_sketch(sketch, viewport, detected.end_point());

        if has_equivalent_edge(sketch, start, end) {
            continue;
        }

        let labels: Vec<String> = detected.label.clone().into_iter().collect();
        let color = detected
            .label
            .as_deref()
            .map(theme::color_for_edge_label)
            .unwrap_or(theme::EDGE_DEFAULT);

        if sketch.add_edge(start, end, labels, color).is_some() {
            added += 1;
        }
    }

    added
}

fn resolve_onto_sketch(sketch: &Sketch, viewport: &MapViewport, p: GeoPoint) -> GeoPoint {
    snap_to_nearest_vertex(
        viewport,
        sketch,
        viewport.project(p),
        None,
        VERTEX_SNAP_THRESHOLD_PX,
    )
    .unwrap_or(p)
}

fn has_equivalent_edge(sketch: &Sketch, a: GeoPoint, b: GeoPoint) -> bool {
    sketch.edges().iter().any(|e| {
        (e.start.approx_eq(&a) && e.end.approx_eq(&b))
            || (e.start.approx_eq(&b) && e.end.approx_eq(&a))
    })
}
