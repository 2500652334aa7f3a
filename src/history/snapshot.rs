//! Deep-copy snapshots of everything undo must bring back.

use std::collections::{BTreeMap, BTreeSet};

use crate::annotations::{FacetLabels, FacetPitches, Pin, Pins, Pitch};
use crate::facets::FacetKey;
use crate::sketch::{Edge, Sketch};

/// One entry on the history timeline. Compared as a whole so a mutation
/// that ends up changing nothing never grows history.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SketchSnapshot {
    pub edges: Vec<Edge>,
    pub labels: BTreeMap<FacetKey, BTreeSet<String>>,
    pub pitches: BTreeMap<FacetKey, Pitch>,
    pub pins: Vec<Pin>,
}

impl SketchSnapshot {
    pub fn capture(
        sketch: &Sketch,
        labels: &FacetLabels,
        pitches: &FacetPitches,
        pins: &Pins,
    ) -> Self {
        Self {
            edges: sketch.edges().to_vec(),
            labels: labels.entries().clone(),
            pitches: pitches.entries().clone(),
            pins: pins.pins().to_vec(),
        }
    }

    /// Overwrite the live resources with this snapshot's state.
    pub fn restore(
        &self,
        sketch: &mut Sketch,
        labels: &mut FacetLabels,
        pitches: &mut FacetPitches,
        pins: &mut Pins,
    ) {
        sketch.set_edges(self.edges.clone());
        labels.set_entries(self.labels.clone());
        pitches.set_entries(self.pitches.clone());
        pins.set_pins(self.pins.clone());
    }
}
