//! Polygon intersection areas.
//!
//! Overlap between two facet rings is measured by triangulating one ring and
//! clipping the other against each triangle. Triangles are convex, so the
//! clip is a plain Sutherland-Hodgman pass, and the triangle areas partition
//! the first ring, so the clipped pieces sum to the true intersection even
//! for concave rings.

use super::coord::GeoPoint;
use super::metrics::{ring_to_local_meters, signed_area, FEET_PER_METER};

/// Intersection area of two rings in square feet.
///
/// Returns 0 for degenerate inputs or rings earcut cannot triangulate.
pub fn intersection_area_sqft(a: &[GeoPoint], b: &[GeoPoint]) -> f64 {
    if a.len() < 3 || b.len() < 3 {
        return 0.0;
    }

    // Both rings share one local frame so triangle and subject coordinates
    // are directly comparable.
    let origin = a[0];
    let local_a = ring_to_local_meters(a, origin);
    let local_b = ring_to_local_meters(b, origin);

    let flat: Vec<f64> = local_a.iter().flat_map(|p| [p[0], p[1]]).collect();
    let holes: Vec<usize> = Vec::new();
    let triangles = match earcutr::earcut(&flat, &holes, 2) {
        Ok(indices) => indices,
        Err(_) => return 0.0,
    };

    let mut total_m2 = 0.0;
    for tri in triangles.chunks_exact(3) {
        let t = [local_a[tri[0]], local_a[tri[1]], local_a[tri[2]]];
        let clipped = clip_to_triangle(&local_b, t);
        total_m2 += signed_area(&clipped).abs();
    }

    total_m2 * FEET_PER_METER * FEET_PER_METER
}

/// Clip a polygon against one triangle, returning the intersection polygon.
fn clip_to_triangle(subject: &[[f64; 2]], tri: [[f64; 2]; 3]) -> Vec<[f64; 2]> {
    let mut tri = tri;
    if signed_area(&tri) < 0.0 {
        tri.swap(1, 2);
    }

    let mut output = subject.to_vec();
    for i in 0..3 {
        let a = tri[i];
        let b = tri[(i + 1) % 3];
        let input = std::mem::take(&mut output);
        if input.is_empty() {
            break;
        }
        for j in 0..input.len() {
            let prev = input[(j + input.len() - 1) % input.len()];
            let cur = input[j];
            let prev_in = cross(a, b, prev) >= 0.0;
            let cur_in = cross(a, b, cur) >= 0.0;
            if cur_in {
                if !prev_in {
                    output.push(line_intersection(prev, cur, a, b));
                }
                output.push(cur);
            } else if prev_in {
                output.push(line_intersection(prev, cur, a, b));
            }
        }
    }
    output
}

fn cross(a: [f64; 2], b: [f64; 2], p: [f64; 2]) -> f64 {
    (b[0] - a[0]) * (p[1] - a[1]) - (b[1] - a[1]) * (p[0] - a[0])
}

/// Intersection of segment p1..p2 with the infinite line through a and b.
/// Callers only invoke this when p1 and p2 straddle the line.
fn line_intersection(p1: [f64; 2], p2: [f64; 2], a: [f64; 2], b: [f64; 2]) -> [f64; 2] {
    let d1 = cross(a, b, p1);
    let d2 = cross(a, b, p2);
    let t = d1 / (d1 - d2);
    [p1[0] + t * (p2[0] - p1[0]), p1[1] + t * (p2[1] - p1[1])]
}
