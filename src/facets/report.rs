//! Roll-up of detected facets into the numbers a contractor quotes from:
//! per-facet flat and pitch-corrected areas, waste-relevant deductions, and
//! edge length totals grouped by label.

use std::collections::BTreeMap;

use crate::annotations::{FacetLabels, FacetPitches, Pitch, LABEL_DORMER, LABEL_REMOVED};
use crate::sketch::Sketch;

use super::analyze::{FacetPair, FacetRelation};
use super::detect::Facet;

/// Bucket for edges that were never labeled.
pub const UNLABELED_EDGE_BUCKET: &str = "unlabeled";

#[derive(Debug, Clone, PartialEq)]
pub struct FacetLine {
    pub index: usize,
    pub area_sqft: f64,
    /// Flat area after exclusion and dormer deduction.
    pub effective_sqft: f64,
    /// Effective area scaled by the pitch multiplier.
    pub pitched_sqft: f64,
    pub pitch: Option<Pitch>,
    pub labels: Vec<String>,
    pub excluded: bool,
    pub dormer_deduction_sqft: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeasurementReport {
    pub facets: Vec<FacetLine>,
    pub total_flat_sqft: f64,
    pub total_pitched_sqft: f64,
    /// Area counted twice by overlapping facets, reported so totals can be
    /// corrected once. Deducted at flat rate since the shared region has no
    /// single pitch.
    pub overlap_deduction_sqft: f64,
    pub edge_totals_ft: BTreeMap<String, f64>,
    pub total_edge_ft: f64,
}

impl MeasurementReport {
    pub fn build(
        sketch: &Sketch,
        facets: &[Facet],
        pairs: &[FacetPair],
        labels: &FacetLabels,
        pitches: &FacetPitches,
    ) -> Self {
        let mut lines: Vec<FacetLine> = facets
            .iter()
            .enumerate()
            .map(|(index, facet)| {
                let codes: Vec<String> = labels.codes(facet.key).cloned().collect();
                let excluded = codes.iter().any(|c| c == LABEL_REMOVED);
                FacetLine {
                    index,
                    area_sqft: facet.area_sqft,
                    effective_sqft: 0.0,
                    pitched_sqft: 0.0,
                    pitch: pitches.get(facet.key),
                    labels: codes,
                    excluded,
                    dormer_deduction_sqft: 0.0,
                }
            })
            .collect();

        // A dormer facet sits on top of a larger plane; its footprint is
        // deducted from the plane that contains it while the dormer's own
        // surface still counts.
        for pair in pairs {
            if let FacetRelation::Contains { area_sqft } = pair.relation {
                let dormer = lines[pair.b].labels.iter().any(|c| c == LABEL_DORMER);
                if dormer && !lines[pair.a].excluded && !lines[pair.b].excluded {
                    lines[pair.a].dormer_deduction_sqft += area_sqft;
                }
            }
        }

        for line in &mut lines {
            line.effective_sqft = if line.excluded {
                0.0
            } else {
                (line.area_sqft - line.dormer_deduction_sqft).max(0.0)
            };
            let multiplier = line.pitch.map_or(1.0, Pitch::multiplier);
            line.pitched_sqft = line.effective_sqft * multiplier;
        }

        let overlap_deduction_sqft: f64 = pairs
            .iter()
            .filter_map(|pair| match pair.relation {
                FacetRelation::Overlap { area_sqft }
                    if !lines[pair.a].excluded && !lines[pair.b].excluded =>
                {
                    Some(area_sqft)
                }
                _ => None,
            })
            .sum();

        let flat_sum: f64 = lines.iter().map(|l| l.effective_sqft).sum();
        let pitched_sum: f64 = lines.iter().map(|l| l.pitched_sqft).sum();

        let mut edge_totals_ft: BTreeMap<String, f64> = BTreeMap::new();
        let mut total_edge_ft = 0.0;
        for edge in sketch.edges() {
            let bucket = edge
                .primary_label()
                .unwrap_or(UNLABELED_EDGE_BUCKET)
                .to_string();
            *edge_totals_ft.entry(bucket).or_insert(0.0) += edge.length_ft;
            total_edge_ft += edge.length_ft;
        }

        MeasurementReport {
            facets: lines,
            total_flat_sqft: (flat_sum - overlap_deduction_sqft).max(0.0),
            total_pitched_sqft: (pitched_sum - overlap_deduction_sqft).max(0.0),
            overlap_deduction_sqft,
            edge_totals_ft,
            total_edge_ft,
        }
    }
}
