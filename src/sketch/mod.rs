//! The segment sketch: the authoritative collection of drawn roof edges.
//!
//! Edges are plain data in a resource; systems mutate them through the
//! methods here and announce each commit with a [`SketchMutated`] message so
//! the derive/capture pipeline can recompute facets and push history exactly
//! once per user action.

use bevy::prelude::*;

use crate::geo::{metrics, GeoPoint};

/// One drawn roof edge.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub id: u64,
    pub start: GeoPoint,
    pub end: GeoPoint,
    /// Classification labels. The first entry is the primary label and
    /// drives the stroke color.
    pub labels: Vec<String>,
    pub color: Color,
    /// Geodesic length in feet, refreshed whenever an endpoint changes.
    pub length_ft: f64,
}

impl Edge {
    pub fn primary_label(&self) -> Option<&str> {
        self.labels.first().map(String::as_str)
    }
}

/// What kind of commit a [`SketchMutated`] message announces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SketchMutation {
    EdgeAdded,
    EdgeRemoved,
    EdgeRelabeled,
    VertexMoved,
    AnnotationChanged,
    PinChanged,
    BatchApplied,
}

/// Written by every mutating system after it commits a change.
#[derive(Message)]
pub struct SketchMutated {
    pub mutation: SketchMutation,
}

/// The edge collection. Derived data (facets, areas) lives elsewhere and is
/// recomputed from this after every structural change.
#[derive(Resource, Default, Debug)]
pub struct Sketch {
    edges: Vec<Edge>,
    next_edge_id: u64,
}

impl Sketch {
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Add an edge. Rejects segments whose endpoints are the same vertex;
    /// returns the new edge id otherwise.
    pub fn add_edge(
        &mut self,
        start: GeoPoint,
        end: GeoPoint,
        labels: Vec<String>,
        color: Color,
    ) -> Option<u64> {
        if start.approx_eq(&end) {
            return None;
        }

        let id = self.next_edge_id;
        self.next_edge_id += 1;
        self.edges.push(Edge {
            id,
            start,
            end,
            labels,
            color,
            length_ft: metrics::distance_feet(start, end),
        });
        Some(id)
    }

    pub fn remove_edge(&mut self, id: u64) -> bool {
        let before = self.edges.len();
        self.edges.retain(|e| e.id != id);
        self.edges.len() != before
    }

    /// Replace an edge's classification without touching its geometry.
    pub fn relabel_edge(&mut self, id: u64, labels: Vec<String>, color: Color) -> bool {
        if let Some(edge) = self.edges.iter_mut().find(|e| e.id == id) {
            edge.labels = labels;
            edge.color = color;
            true
        } else {
            false
        }
    }

    /// Rewrite every endpoint that is the same vertex as `from` to `to`.
    ///
    /// Edges that collapse to zero length afterwards are dropped. Returns the
    /// number of endpoints rewritten.
    pub fn replace_vertex(&mut self, from: GeoPoint, to: GeoPoint) -> usize {
        let mut rewritten = 0;
        for edge in &mut self.edges {
            let mut touched = false;
            if edge.start.approx_eq(&from) {
                edge.start = to;
                touched = true;
                rewritten += 1;
            }
            if edge.end.approx_eq(&from) {
                edge.end = to;
                touched = true;
                rewritten += 1;
            }
            if touched {
                edge.length_ft = metrics::distance_feet(edge.start, edge.end);
            }
        }
        self.edges.retain(|e| !e.start.approx_eq(&e.end));
        rewritten
    }

    /// All distinct vertices under the coordinate identity, in first-seen
    /// order.
    pub fn distinct_vertices(&self) -> Vec<GeoPoint> {
        let mut vertices: Vec<GeoPoint> = Vec::new();
        for edge in &self.edges {
            for p in [edge.start, edge.end] {
                if !vertices.iter().any(|v| v.approx_eq(&p)) {
                    vertices.push(p);
                }
            }
        }
        vertices
    }

    /// Wholesale replacement, used by history restore and file load. The id
    /// counter stays monotonic so undo can never recycle an id.
    pub fn set_edges(&mut self, edges: Vec<Edge>) {
        let max_id = edges.iter().map(|e| e.id).max();
        if let Some(max_id) = max_id {
            self.next_edge_id = self.next_edge_id.max(max_id + 1);
        }
        self.edges = edges;
    }
}

pub struct SketchPlugin;

impl Plugin for SketchPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Sketch>().add_message::<SketchMutated>();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lng_lat(lng: f64, lat: f64) -> GeoPoint {
        GeoPoint::new(lng, lat)
    }

    #[test]
    fn test_add_edge_assigns_ids_and_length() {
        let mut sketch = Sketch::default();
        let a = sketch
            .add_edge(
                lng_lat(0.0, 0.0),
                lng_lat(0.001, 0.0),
                vec!["eave".into()],
                Color::WHITE,
            )
            .unwrap();
        let b = sketch
            .add_edge(
                lng_lat(0.001, 0.0),
                lng_lat(0.001, 0.001),
                vec!["rake".into()],
                Color::WHITE,
            )
            .unwrap();
        assert_ne!(a, b);
        assert_eq!(sketch.len(), 2);
        let edge = &sketch.edges()[0];
        assert!(edge.length_ft > 360.0 && edge.length_ft < 370.0);
        assert_eq!(edge.primary_label(), Some("eave"));
    }

    #[test]
    fn test_add_edge_rejects_zero_length() {
        let mut sketch = Sketch::default();
        let p = lng_lat(10.0, 10.0);
        let q = lng_lat(10.0 + 5e-9, 10.0);
        assert!(sketch.add_edge(p, q, Vec::new(), Color::WHITE).is_none());
        assert!(sketch.is_empty());
    }

    #[test]
    fn test_replace_vertex_rewrites_all_references() {
        let mut sketch = Sketch::default();
        let shared = lng_lat(0.0, 0.0);
        sketch.add_edge(shared, lng_lat(0.001, 0.0), Vec::new(), Color::WHITE);
        sketch.add_edge(shared, lng_lat(0.0, 0.001), Vec::new(), Color::WHITE);
        sketch.add_edge(
            lng_lat(0.001, 0.0),
            lng_lat(0.001, 0.001),
            Vec::new(),
            Color::WHITE,
        );

        let target = lng_lat(0.0002, 0.0002);
        let rewritten = sketch.replace_vertex(shared, target);
        assert_eq!(rewritten, 2);
        let refs = sketch
            .edges()
            .iter()
            .flat_map(|e| [e.start, e.end])
            .filter(|p| p.approx_eq(&target))
            .count();
        assert_eq!(refs, 2, "both rewritten endpoints carry the new coordinate");
        assert!(
            !sketch
                .edges()
                .iter()
                .any(|e| e.start.approx_eq(&shared) || e.end.approx_eq(&shared)),
            "no endpoint references the old vertex"
        );
    }

    #[test]
    fn test_replace_vertex_merge_reduces_distinct_count() {
        let mut sketch = Sketch::default();
        let a = lng_lat(0.0, 0.0);
        let b = lng_lat(0.001, 0.0);
        let c = lng_lat(0.002, 0.0);
        sketch.add_edge(a, b, Vec::new(), Color::WHITE);
        sketch.add_edge(b, c, Vec::new(), Color::WHITE);
        assert_eq!(sketch.distinct_vertices().len(), 3);

        // Merging c onto a leaves two distinct vertices.
        sketch.replace_vertex(c, a);
        assert_eq!(sketch.distinct_vertices().len(), 2);
    }

    #[test]
    fn test_replace_vertex_drops_collapsed_edges() {
        let mut sketch = Sketch::default();
        let a = lng_lat(0.0, 0.0);
        let b = lng_lat(0.001, 0.0);
        sketch.add_edge(a, b, Vec::new(), Color::WHITE);
        sketch.add_edge(b, lng_lat(0.001, 0.001), Vec::new(), Color::WHITE);

        // Moving b onto a collapses the first edge entirely.
        sketch.replace_vertex(b, a);
        assert_eq!(sketch.len(), 1);
        assert!(sketch.edges()[0].start.approx_eq(&a));
    }

    #[test]
    fn test_replace_vertex_refreshes_length() {
        let mut sketch = Sketch::default();
        let a = lng_lat(0.0, 0.0);
        let b = lng_lat(0.001, 0.0);
        sketch.add_edge(a, b, Vec::new(), Color::WHITE).unwrap();
        let before = sketch.edges()[0].length_ft;

        sketch.replace_vertex(b, lng_lat(0.002, 0.0));
        let after = sketch.edges()[0].length_ft;
        assert!(
            (after - before * 2.0).abs() < 0.1,
            "doubling the segment should double its length"
        );
    }

    #[test]
    fn test_relabel_edge() {
        let mut sketch = Sketch::default();
        let id = sketch
            .add_edge(
                lng_lat(0.0, 0.0),
                lng_lat(0.001, 0.0),
                vec!["eave".into()],
                Color::WHITE,
            )
            .unwrap();
        assert!(sketch.relabel_edge(id, vec!["ridge".into()], Color::BLACK));
        assert_eq!(sketch.edges()[0].primary_label(), Some("ridge"));
        assert!(!sketch.relabel_edge(9999, Vec::new(), Color::WHITE));
    }

    #[test]
    fn test_set_edges_keeps_id_counter_monotonic() {
        let mut sketch = Sketch::default();
        let id = sketch
            .add_edge(lng_lat(0.0, 0.0), lng_lat(0.001, 0.0), Vec::new(), Color::WHITE)
            .unwrap();
        let edges = sketch.edges().to_vec();
        sketch.set_edges(Vec::new());
        sketch.set_edges(edges);
        let next = sketch
            .add_edge(lng_lat(0.0, 0.0), lng_lat(0.0, 0.001), Vec::new(), Color::WHITE)
            .unwrap();
        assert!(next > id, "restored sketches must not recycle edge ids");
    }
}
