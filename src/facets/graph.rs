//! Planar graph construction from the raw edge collection.
//!
//! Endpoints are interned into canonical vertices under the coordinate
//! identity, parallel duplicates collapse, and dangling chains are pruned
//! before the face walk ever sees the graph.

use crate::geo::GeoPoint;
use crate::sketch::Edge;

pub struct SegmentGraph {
    vertices: Vec<GeoPoint>,
    /// Undirected edges as canonical vertex index pairs, low index first.
    edges: Vec<(usize, usize)>,
}

impl SegmentGraph {
    pub fn from_edges(edges: &[Edge]) -> Self {
        let mut graph = Self {
            vertices: Vec::new(),
            edges: Vec::new(),
        };
        for edge in edges {
            let a = graph.intern(edge.start);
            let b = graph.intern(edge.end);
            if a == b {
                continue;
            }
            let key = (a.min(b), a.max(b));
            if !graph.edges.contains(&key) {
                graph.edges.push(key);
            }
        }
        graph
    }

    pub fn vertices(&self) -> &[GeoPoint] {
        &self.vertices
    }

    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    pub fn degree(&self, vertex: usize) -> usize {
        self.edges
            .iter()
            .filter(|&&(a, b)| a == vertex || b == vertex)
            .count()
    }

    /// Remove edges with an endpoint of degree < 2, repeating until stable.
    ///
    /// A dangling chain cannot bound a face, and removing its tip exposes the
    /// next link, so the whole chain unravels here.
    pub fn prune_dangling(&mut self) {
        loop {
            let mut degrees = vec![0usize; self.vertices.len()];
            for &(a, b) in &self.edges {
                degrees[a] += 1;
                degrees[b] += 1;
            }
            let before = self.edges.len();
            self.edges
                .retain(|&(a, b)| degrees[a] >= 2 && degrees[b] >= 2);
            if self.edges.len() == before {
                break;
            }
        }
    }

    fn intern(&mut self, p: GeoPoint) -> usize {
        if let Some(i) = self.vertices.iter().position(|v| v.approx_eq(&p)) {
            i
        } else {
            self.vertices.push(p);
            self.vertices.len() - 1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::prelude::Color;
    use crate::sketch::Sketch;

    fn sketch_with(segments: &[((f64, f64), (f64, f64))]) -> Sketch {
        let mut sketch = Sketch::default();
        for &((lng1, lat1), (lng2, lat2)) in segments {
            sketch.add_edge(
                GeoPoint::new(lng1, lat1),
                GeoPoint::new(lng2, lat2),
                Vec::new(),
                Color::WHITE,
            );
        }
        sketch
    }

    #[test]
    fn test_interning_merges_epsilon_equal_endpoints() {
        let sketch = sketch_with(&[
            ((0.0, 0.0), (0.001, 0.0)),
            ((0.001 + 3e-9, 0.0), (0.001, 0.001)),
        ]);
        let graph = SegmentGraph::from_edges(sketch.edges());
        assert_eq!(graph.vertices().len(), 3);
        assert_eq!(graph.edges().len(), 2);
    }

    #[test]
    fn test_parallel_duplicates_collapse() {
        let sketch = sketch_with(&[
            ((0.0, 0.0), (0.001, 0.0)),
            ((0.001, 0.0), (0.0, 0.0)),
        ]);
        let graph = SegmentGraph::from_edges(sketch.edges());
        assert_eq!(graph.edges().len(), 1);
    }

    #[test]
    fn test_prune_removes_entire_chain() {
        // An open three-segment polyline has no cycle at all.
        let sketch = sketch_with(&[
            ((0.0, 0.0), (0.001, 0.0)),
            ((0.001, 0.0), (0.002, 0.0)),
            ((0.002, 0.0), (0.003, 0.001)),
        ]);
        let mut graph = SegmentGraph::from_edges(sketch.edges());
        graph.prune_dangling();
        assert!(graph.edges().is_empty());
    }

    #[test]
    fn test_prune_keeps_cycle_drops_spur() {
        let sketch = sketch_with(&[
            ((0.0, 0.0), (0.001, 0.0)),
            ((0.001, 0.0), (0.001, 0.001)),
            ((0.001, 0.001), (0.0, 0.001)),
            ((0.0, 0.001), (0.0, 0.0)),
            // Spur hanging off one corner.
            ((0.001, 0.001), (0.002, 0.002)),
        ]);
        let mut graph = SegmentGraph::from_edges(sketch.edges());
        assert_eq!(graph.edges().len(), 5);
        graph.prune_dangling();
        assert_eq!(graph.edges().len(), 4);
        for &(a, b) in graph.edges() {
            assert!(graph.degree(a) >= 2 && graph.degree(b) >= 2);
        }
    }
}
