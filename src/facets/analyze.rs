//! Pairwise facet relations.
//!
//! Adjacency (a fully shared boundary edge) means two independent roof
//! planes and contributes nothing to overlap. Crossing boundaries mean real
//! overlap, measured so the shared area can be attributed once in totals.
//! Strict containment is reported separately because the dormer deduction in
//! the report layer keys off it.

use std::collections::BTreeSet;

use crate::geo::{clip, metrics, GeoPoint};

use super::detect::Facet;

#[derive(Debug, Clone, PartialEq)]
pub enum FacetRelation {
    /// The rings share at least one complete boundary edge.
    Adjacent,
    /// Boundaries cross; `area_sqft` is the shared region.
    Overlap { area_sqft: f64 },
    /// Facet `a` strictly contains facet `b`; `area_sqft` is the contained
    /// facet's area.
    Contains { area_sqft: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FacetPair {
    pub a: usize,
    pub b: usize,
    pub relation: FacetRelation,
}

pub fn analyze_relations(facets: &[Facet]) -> Vec<FacetPair> {
    let mut pairs = Vec::new();
    for a in 0..facets.len() {
        for b in (a + 1)..facets.len() {
            if let Some(pair) = relate(facets, a, b) {
                pairs.push(pair);
            }
        }
    }
    pairs
}

fn relate(facets: &[Facet], a: usize, b: usize) -> Option<FacetPair> {
    let fa = &facets[a];
    let fb = &facets[b];

    if shares_boundary_edge(&fa.ring, &fb.ring) {
        return Some(FacetPair {
            a,
            b,
            relation: FacetRelation::Adjacent,
        });
    }

    if boundaries_cross(&fa.ring, &fb.ring) {
        let area_sqft = clip::intersection_area_sqft(&fa.ring, &fb.ring);
        return Some(FacetPair {
            a,
            b,
            relation: FacetRelation::Overlap { area_sqft },
        });
    }

    if ring_contains(&fa.ring, &fb.ring) {
        return Some(FacetPair {
            a,
            b,
            relation: FacetRelation::Contains {
                area_sqft: fb.area_sqft,
            },
        });
    }
    if ring_contains(&fb.ring, &fa.ring) {
        return Some(FacetPair {
            a: b,
            b: a,
            relation: FacetRelation::Contains {
                area_sqft: fa.area_sqft,
            },
        });
    }

    None
}

fn ring_edge_keys(ring: &[GeoPoint]) -> BTreeSet<((i64, i64), (i64, i64))> {
    let mut keys = BTreeSet::new();
    for i in 0..ring.len() {
        let p = ring[i].quantized();
        let q = ring[(i + 1) % ring.len()].quantized();
        keys.insert((p.min(q), p.max(q)));
    }
    keys
}

fn shares_boundary_edge(a: &[GeoPoint], b: &[GeoPoint]) -> bool {
    let keys_a = ring_edge_keys(a);
    ring_edge_keys(b).iter().any(|k| keys_a.contains(k))
}

fn boundaries_cross(a: &[GeoPoint], b: &[GeoPoint]) -> bool {
    for i in 0..a.len() {
        let p1 = a[i];
        let p2 = a[(i + 1) % a.len()];
        for j in 0..b.len() {
            let q1 = b[j];
            let q2 = b[(j + 1) % b.len()];
            if segments_properly_cross(p1, p2, q1, q2) {
                return true;
            }
        }
    }
    false
}

/// Strict crossing: each segment's endpoints land on opposite sides of the
/// other. Touching at an endpoint does not count; facets meeting at a single
/// vertex are simply unrelated.
fn segments_properly_cross(p1: GeoPoint, p2: GeoPoint, q1: GeoPoint, q2: GeoPoint) -> bool {
    let d1 = orient(q1, q2, p1);
    let d2 = orient(q1, q2, p2);
    let d3 = orient(p1, p2, q1);
    let d4 = orient(p1, p2, q2);
    ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
}

fn orient(a: GeoPoint, b: GeoPoint, p: GeoPoint) -> f64 {
    (b.lng - a.lng) * (p.lat - a.lat) - (b.lat - a.lat) * (p.lng - a.lng)
}

fn ring_contains(outer: &[GeoPoint], inner: &[GeoPoint]) -> bool {
    inner.iter().all(|p| metrics::point_in_ring(*p, outer))
}
