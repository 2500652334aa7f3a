//! Closed-facet detection from the segment graph.
//!
//! Faces of the planar subdivision are enumerated with an angular half-edge
//! walk: outgoing half-edges at each vertex are sorted by angle, and the walk
//! leaves a vertex on the edge immediately clockwise of the one it arrived
//! on. Every interior face is traced exactly once counter-clockwise; the
//! unbounded face of each component comes out clockwise and is discarded by
//! the signed-area test.

use crate::geo::{metrics, GeoPoint};
use crate::sketch::Sketch;

use super::fingerprint::FacetKey;
use super::graph::SegmentGraph;

/// A closed region bounded by sketch edges.
#[derive(Debug, Clone, PartialEq)]
pub struct Facet {
    /// Boundary vertices in counter-clockwise order, not explicitly closed.
    pub ring: Vec<GeoPoint>,
    pub centroid: GeoPoint,
    pub area_sqft: f64,
    pub key: FacetKey,
}

/// Rings below this signed area in the scaled degree plane are walk
/// degeneracies, not facets. Far below any area a user could draw.
const MIN_RING_AREA: f64 = 1e-16;

/// Recompute every facet from scratch. Output is sorted by fingerprint so
/// repeated runs over equal geometry produce identical orderings.
pub fn detect_facets(sketch: &Sketch) -> Vec<Facet> {
    let mut graph = SegmentGraph::from_edges(sketch.edges());
    graph.prune_dangling();
    walk_faces(&graph)
}

fn walk_faces(graph: &SegmentGraph) -> Vec<Facet> {
    let vertices = graph.vertices();
    let edges = graph.edges();
    if edges.is_empty() {
        return Vec::new();
    }

    // Work in a locally scaled plane so angles between edges are true ground
    // angles rather than being stretched by latitude.
    let lat0 = vertices.iter().map(|v| v.lat).sum::<f64>() / vertices.len() as f64;
    let lng_scale = lat0.to_radians().cos();
    let plane: Vec<(f64, f64)> = vertices
        .iter()
        .map(|v| (v.lng * lng_scale, v.lat))
        .collect();

    // Each undirected edge becomes two half-edges; twin(i) == i ^ 1.
    let mut halfedges: Vec<(usize, usize)> = Vec::with_capacity(edges.len() * 2);
    for &(a, b) in edges {
        halfedges.push((a, b));
        halfedges.push((b, a));
    }

    let mut outgoing: Vec<Vec<usize>> = vec![Vec::new(); vertices.len()];
    for (i, &(from, _)) in halfedges.iter().enumerate() {
        outgoing[from].push(i);
    }
    for (v, list) in outgoing.iter_mut().enumerate() {
        list.sort_by(|&h1, &h2| {
            let a1 = angle_of(plane[v], plane[halfedges[h1].1]);
            let a2 = angle_of(plane[v], plane[halfedges[h2].1]);
            a1.partial_cmp(&a2).unwrap_or(std::cmp::Ordering::Equal)
        });
    }

    let mut visited = vec![false; halfedges.len()];
    let mut facets = Vec::new();

    for start in 0..halfedges.len() {
        if visited[start] {
            continue;
        }

        let mut ring_indices: Vec<usize> = Vec::new();
        let mut current = start;
        // Each face consumes at least one fresh half-edge per step, so a
        // longer walk means the structure is inconsistent; bail out.
        let mut guard = halfedges.len() + 1;
        loop {
            guard -= 1;
            if guard == 0 {
                ring_indices.clear();
                break;
            }

            visited[current] = true;
            let (from, to) = halfedges[current];
            ring_indices.push(from);

            let twin = current ^ 1;
            let list = &outgoing[to];
            let idx = list.iter().position(|&h| h == twin).unwrap_or(0);
            current = list[(idx + list.len() - 1) % list.len()];
            if current == start {
                break;
            }
        }

        if ring_indices.len() < 3 {
            continue;
        }

        let ring_plane: Vec<[f64; 2]> = ring_indices
            .iter()
            .map(|&v| [plane[v].0, plane[v].1])
            .collect();
        if metrics::signed_area(&ring_plane) <= MIN_RING_AREA {
            continue;
        }

        let ring: Vec<GeoPoint> = ring_indices.iter().map(|&v| vertices[v]).collect();
        facets.push(Facet {
            centroid: metrics::ring_centroid(&ring),
            area_sqft: metrics::ring_area_sqft(&ring),
            key: FacetKey::from_ring(&ring),
            ring,
        });
    }

    facets.sort_by_key(|f| f.key);
    facets
}

fn angle_of(from: (f64, f64), to: (f64, f64)) -> f64 {
    (to.1 - from.1).atan2(to.0 - from.0)
}
