//! Closed-facet detection over the segment sketch.
//!
//! Every time the sketch changes, the detector rebuilds the planar graph,
//! prunes dangling chains, walks the bounded faces, and recomputes pairwise
//! relations. Downstream consumers (annotations, measurement panel, save
//! files) address facets by their stable [`FacetKey`] fingerprint so results
//! survive re-detection and edits elsewhere in the sketch.

pub mod analyze;
pub mod detect;
pub mod fingerprint;
pub mod graph;
pub mod report;

#[cfg(test)]
mod tests;

pub use analyze::{analyze_relations, FacetPair, FacetRelation};
pub use detect::{detect_facets, Facet};
pub use fingerprint::FacetKey;
pub use report::MeasurementReport;

use bevy::prelude::*;

use crate::geo::{metrics, GeoPoint};
use crate::history::CommitSet;
use crate::sketch::Sketch;

/// Latest detection results, refreshed whenever the sketch mutates.
#[derive(Resource, Default)]
pub struct DetectedFacets {
    pub facets: Vec<Facet>,
    pub pairs: Vec<FacetPair>,
}

impl DetectedFacets {
    pub fn key_for_index(&self, index: usize) -> Option<FacetKey> {
        self.facets.get(index).map(|f| f.key)
    }

    /// Hit test for the annotation tools. Prefers the smallest containing
    /// facet so a dormer nested inside a larger plane stays clickable.
    pub fn facet_at(&self, point: GeoPoint) -> Option<usize> {
        self.facets
            .iter()
            .enumerate()
            .filter(|(_, f)| metrics::point_in_ring(point, &f.ring))
            .min_by(|(_, a), (_, b)| a.area_sqft.total_cmp(&b.area_sqft))
            .map(|(i, _)| i)
    }
}

fn refresh_detected_facets(sketch: Res<Sketch>, mut detected: ResMut<DetectedFacets>) {
    if !sketch.is_changed() {
        return;
    }
    let facets = detect_facets(&sketch);
    let pairs = analyze_relations(&facets);
    debug!(
        "facet detection refreshed: {} facets, {} relations",
        facets.len(),
        pairs.len()
    );
    detected.facets = facets;
    detected.pairs = pairs;
}

pub struct FacetPlugin;

impl Plugin for FacetPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DetectedFacets>()
            .add_systems(Update, refresh_detected_facets.in_set(CommitSet::Derive));
    }
}
