//! On-disk sketch format.
//!
//! Geometry is stored losslessly as f64 coordinate pairs; everything derived
//! from it (edge colors, lengths, facets) is recomputed on load. Facet
//! annotations are stored under the facet fingerprint, which recomputes
//! identically from the saved geometry.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::annotations::{FacetLabels, FacetPitches, Pin, PinCategory, Pins, Pitch};
use crate::facets::{DetectedFacets, FacetKey};
use crate::geo::metrics::distance_feet;
use crate::geo::GeoPoint;
use crate::history::SketchSnapshot;
use crate::materials::MaterialRef;
use crate::sketch::{Edge, Sketch};
use crate::theme;
use crate::viewport::MapViewport;

pub const SKETCH_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedSketch {
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub viewport: Option<SavedViewport>,
    #[serde(default)]
    pub edges: Vec<SavedEdge>,
    #[serde(default)]
    pub facet_labels: Vec<SavedFacetLabels>,
    #[serde(default)]
    pub facet_pitches: Vec<SavedFacetPitch>,
    #[serde(default)]
    pub pins: Vec<SavedPin>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SavedViewport {
    pub center: GeoPoint,
    pub zoom: f64,
    pub bearing_deg: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedEdge {
    pub start: GeoPoint,
    pub end: GeoPoint,
    #[serde(default)]
    pub labels: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedFacetLabels {
    pub key: u64,
    pub labels: Vec<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SavedFacetPitch {
    pub key: u64,
    pub rise: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedPin {
    pub position: GeoPoint,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub category: PinCategory,
    #[serde(default)]
    pub material: Option<MaterialRef>,
    #[serde(default)]
    pub unit_cost: Option<f64>,
}

impl SavedSketch {
    /// Snapshot the live state for writing. Facet annotations whose facet no
    /// longer exists are dropped here, not carried forward as dead weight.
    pub fn capture(
        viewport: &MapViewport,
        sketch: &Sketch,
        detected: &DetectedFacets,
        labels: &FacetLabels,
        pitches: &FacetPitches,
        pins: &Pins,
    ) -> Self {
        let live_keys: std::collections::BTreeSet<FacetKey> =
            detected.facets.iter().map(|f| f.key).collect();

        let edges = sketch
            .edges()
            .iter()
            .map(|e| SavedEdge {
                start: e.start,
                end: e.end,
                labels: e.labels.clone(),
            })
            .collect();

        let facet_labels = labels
            .entries()
            .iter()
            .filter(|(key, codes)| live_keys.contains(key) && !codes.is_empty())
            .map(|(key, codes)| SavedFacetLabels {
                key: key.0,
                labels: codes.iter().cloned().collect(),
            })
            .collect();

        let facet_pitches = pitches
            .entries()
            .iter()
            .filter(|(key, _)| live_keys.contains(key))
            .map(|(key, pitch)| SavedFacetPitch {
                key: key.0,
                rise: pitch.rise,
            })
            .collect();

        let pins = pins
            .pins()
            .iter()
            .map(|p| SavedPin {
                position: p.position,
                label: p.label.clone(),
                category: p.category,
                material: p.material.clone(),
                unit_cost: p.unit_cost,
            })
            .collect();

        Self {
            version: SKETCH_FORMAT_VERSION,
            viewport: Some(SavedViewport {
                center: viewport.center,
                zoom: viewport.zoom,
                bearing_deg: viewport.bearing_deg,
            }),
            edges,
            facet_labels,
            facet_pitches,
            pins,
        }
    }

    /// Rebuild live state from the file. Ids are reassigned sequentially;
    /// degenerate zero-length edges are skipped rather than rejected so one
    /// bad record cannot sink the whole file.
    pub fn into_snapshot(self) -> SketchSnapshot {
        let mut edges: Vec<Edge> = Vec::with_capacity(self.edges.len());
        for saved in self.edges {
            if saved.start.approx_eq(&saved.end) {
                continue;
            }
            let color = saved
                .labels
                .first()
                .map(|l| theme::color_for_edge_label(l))
                .unwrap_or(theme::EDGE_DEFAULT);
            edges.push(Edge {
                id: edges.len() as u64 + 1,
                start: saved.start,
                end: saved.end,
                labels: saved.labels,
                color,
                length_ft: distance_feet(saved.start, saved.end),
            });
        }

        let labels: BTreeMap<_, _> = self
            .facet_labels
            .into_iter()
            .map(|e| (FacetKey(e.key), e.labels.into_iter().collect()))
            .collect();

        let pitches: BTreeMap<_, _> = self
            .facet_pitches
            .into_iter()
            .map(|e| (FacetKey(e.key), Pitch::new(e.rise)))
            .collect();

        let pins = self
            .pins
            .into_iter()
            .enumerate()
            .map(|(i, p)| Pin {
                id: i as u64 + 1,
                position: p.position,
                label: p.label,
                category: p.category,
                material: p.material,
                unit_cost: p.unit_cost,
            })
            .collect();

        SketchSnapshot {
            edges,
            labels,
            pitches,
            pins,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facets::detect_facets;

    fn square_sketch() -> Sketch {
        let mut sketch = Sketch::default();
        let corners = [
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.001, 0.0),
            GeoPoint::new(0.001, 0.001),
            GeoPoint::new(0.0, 0.001),
        ];
        for i in 0..4 {
            sketch.add_edge(
                corners[i],
                corners[(i + 1) % 4],
                vec!["eave".into()],
                theme::color_for_edge_label("eave"),
            );
        }
        sketch
    }

    #[test]
    fn test_round_trip_preserves_state() {
        let sketch = square_sketch();
        let facets = detect_facets(&sketch);
        assert_eq!(facets.len(), 1);
        let key = facets[0].key;
        let area = facets[0].area_sqft;

        let mut detected = DetectedFacets::default();
        detected.facets = facets;

        let mut labels = FacetLabels::default();
        labels.toggle(key, "low-slope");
        let mut pitches = FacetPitches::default();
        pitches.toggle(key, Pitch::new(6));
        let mut pins = Pins::default();
        pins.add(GeoPoint::new(0.0005, 0.0005), "vent".into(), PinCategory::Vent);

        let saved = SavedSketch::capture(
            &MapViewport::default(),
            &sketch,
            &detected,
            &labels,
            &pitches,
            &pins,
        );
        let json = serde_json::to_string(&saved).unwrap();
        let parsed: SavedSketch = serde_json::from_str(&json).unwrap();
        let snapshot = parsed.into_snapshot();

        assert_eq!(snapshot.edges.len(), 4);
        assert_eq!(snapshot.labels.get(&key).map(|s| s.len()), Some(1));
        assert_eq!(snapshot.pitches.get(&key), Some(&Pitch::new(6)));
        assert_eq!(snapshot.pins.len(), 1);
        assert_eq!(snapshot.pins[0].label, "vent");

        // The reloaded geometry detects the same facet, so the stored
        // annotation keys still resolve.
        let mut restored = Sketch::default();
        restored.set_edges(snapshot.edges.clone());
        let refound = detect_facets(&restored);
        assert_eq!(refound.len(), 1);
        assert_eq!(refound[0].key, key);
        assert!((refound[0].area_sqft - area).abs() < 1e-6);
    }

    #[test]
    fn test_orphaned_annotations_dropped_at_capture() {
        let sketch = square_sketch();
        let mut detected = DetectedFacets::default();
        detected.facets = detect_facets(&sketch);

        let mut labels = FacetLabels::default();
        labels.toggle(FacetKey(0xdead_beef), "removed");

        let saved = SavedSketch::capture(
            &MapViewport::default(),
            &sketch,
            &detected,
            &labels,
            &FacetPitches::default(),
            &Pins::default(),
        );
        assert!(saved.facet_labels.is_empty());
    }

    #[test]
    fn test_minimal_file_parses_with_defaults() {
        let parsed: SavedSketch = serde_json::from_str(r#"{"edges": []}"#).unwrap();
        assert_eq!(parsed.version, 0);
        assert!(parsed.viewport.is_none());
        assert!(parsed.pins.is_empty());
    }

    #[test]
    fn test_degenerate_edges_skipped_on_load() {
        let saved = SavedSketch {
            version: SKETCH_FORMAT_VERSION,
            viewport: None,
            edges: vec![
                SavedEdge {
                    start: GeoPoint::new(0.0, 0.0),
                    end: GeoPoint::new(0.0, 0.0),
                    labels: vec![],
                },
                SavedEdge {
                    start: GeoPoint::new(0.0, 0.0),
                    end: GeoPoint::new(0.001, 0.0),
                    labels: vec![],
                },
            ],
            facet_labels: vec![],
            facet_pitches: vec![],
            pins: vec![],
        };
        let snapshot = saved.into_snapshot();
        assert_eq!(snapshot.edges.len(), 1);
        assert!(snapshot.edges[0].length_ft > 0.0);
    }
}
