//! Stateless snapping helpers over the viewport projection.
//!
//! Angle snapping works in screen space so "horizontal" means what the user
//! sees, bearing included. Both functions return stored coordinates or the
//! raw input; they never invent positions away from the cursor ray.

use bevy::prelude::*;

use crate::constants::{ANGLE_SNAP_TOLERANCE_DEG, MIN_SNAP_SEGMENT_PX};
use crate::geo::GeoPoint;
use crate::sketch::Sketch;
use crate::viewport::MapViewport;

/// Snap the free endpoint of an in-progress segment toward the nearest
/// preferred angle: the screen axes, plus the perpendiculars of the previous
/// edge in the chain. The snapped point keeps the raw endpoint's screen
/// distance from `start`; outside the tolerance the raw coordinate passes
/// through untouched.
pub fn snap_angle(
    viewport: &MapViewport,
    start: GeoPoint,
    raw_end: GeoPoint,
    prev_edge: Option<(GeoPoint, GeoPoint)>,
    enabled: bool,
) -> GeoPoint {
    if !enabled {
        return raw_end;
    }

    let start_px = viewport.project(start);
    let end_px = viewport.project(raw_end);
    let delta = end_px - start_px;
    let len = delta.length();
    // Tiny segments have no meaningful direction yet.
    if len < MIN_SNAP_SEGMENT_PX {
        return raw_end;
    }

    let raw_angle = delta.y.atan2(delta.x).to_degrees();

    let mut candidates: Vec<f32> = vec![0.0, 90.0, 180.0, 270.0];
    if let Some((a, b)) = prev_edge {
        let prev = viewport.project(b) - viewport.project(a);
        if prev.length() >= MIN_SNAP_SEGMENT_PX {
            let prev_angle = prev.y.atan2(prev.x).to_degrees();
            candidates.push(prev_angle + 90.0);
            candidates.push(prev_angle - 90.0);
        }
    }

    let mut best: Option<(f32, f32)> = None;
    for candidate in candidates {
        let diff = angle_difference(raw_angle, candidate).abs();
        if diff <= ANGLE_SNAP_TOLERANCE_DEG && best.is_none_or(|(d, _)| diff < d) {
            best = Some((diff, candidate));
        }
    }

    match best {
        Some((_, angle)) => {
            let rad = angle.to_radians();
            let snapped_px = start_px + Vec2::new(rad.cos(), rad.sin()) * len;
            viewport.unproject(snapped_px)
        }
        None => raw_end,
    }
}

/// Smallest absolute-value difference between two angles, in degrees.
fn angle_difference(a: f32, b: f32) -> f32 {
    let mut diff = (a - b) % 360.0;
    if diff > 180.0 {
        diff -= 360.0;
    }
    if diff < -180.0 {
        diff += 360.0;
    }
    diff
}

/// Nearest stored vertex within `threshold_px` of a screen position, or
/// `None`. `exclude` drops one vertex from consideration, used while that
/// vertex is being dragged so it cannot snap to itself.
pub fn snap_to_nearest_vertex(
    viewport: &MapViewport,
    sketch: &Sketch,
    cursor_px: Vec2,
    exclude: Option<GeoPoint>,
    threshold_px: f32,
) -> Option<GeoPoint> {
    let mut best: Option<(f32, GeoPoint)> = None;
    for vertex in sketch.distinct_vertices() {
        if exclude.is_some_and(|e| e.approx_eq(&vertex)) {
            continue;
        }
        let dist = viewport.project(vertex).distance(cursor_px);
        if dist <= threshold_px && best.is_none_or(|(d, _)| dist < d) {
            best = Some((dist, vertex));
        }
    }
    best.map(|(_, v)| v)
}
