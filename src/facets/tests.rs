use bevy::prelude::*;

use crate::annotations::{FacetLabels, FacetPitches, Pitch, LABEL_DORMER, LABEL_REMOVED};
use crate::geo::{metrics, GeoPoint};
use crate::sketch::Sketch;

use super::analyze::{analyze_relations, FacetRelation};
use super::detect::detect_facets;
use super::report::MeasurementReport;

/// Test coordinates are laid out on a millidegree grid near the equator,
/// where one unit is roughly 365 feet.
const UNIT: f64 = 0.001;

fn pt(x: f64, y: f64) -> GeoPoint {
    GeoPoint::new(x * UNIT, y * UNIT)
}

fn add_square(sketch: &mut Sketch, x: f64, y: f64, size: f64) {
    let corners = [
        pt(x, y),
        pt(x + size, y),
        pt(x + size, y + size),
        pt(x, y + size),
    ];
    for i in 0..4 {
        sketch.add_edge(corners[i], corners[(i + 1) % 4], Vec::new(), Color::WHITE);
    }
}

fn assert_close(actual: f64, expected: f64, rel_tol: f64) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= expected.abs() * rel_tol,
        "expected {} within {}% of {}, diff {}",
        actual,
        rel_tol * 100.0,
        expected,
        diff
    );
}

fn square_area_sqft(size: f64) -> f64 {
    metrics::ring_area_sqft(&[pt(0.0, 0.0), pt(size, 0.0), pt(size, size), pt(0.0, size)])
}

#[test]
fn test_square_yields_one_facet() {
    let mut sketch = Sketch::default();
    add_square(&mut sketch, 0.0, 0.0, 1.0);

    let facets = detect_facets(&sketch);
    assert_eq!(facets.len(), 1);
    assert_eq!(facets[0].ring.len(), 4);
    // A millidegree square at the equator is about 365 ft on a side.
    assert_close(facets[0].area_sqft, 365.0 * 365.0, 0.01);
}

#[test]
fn test_open_chain_yields_nothing() {
    let mut sketch = Sketch::default();
    sketch.add_edge(pt(0.0, 0.0), pt(1.0, 0.0), Vec::new(), Color::WHITE);
    sketch.add_edge(pt(1.0, 0.0), pt(2.0, 0.5), Vec::new(), Color::WHITE);
    sketch.add_edge(pt(2.0, 0.5), pt(3.0, 0.0), Vec::new(), Color::WHITE);

    assert!(detect_facets(&sketch).is_empty());
}

#[test]
fn test_spur_does_not_disturb_the_loop() {
    let mut sketch = Sketch::default();
    add_square(&mut sketch, 0.0, 0.0, 1.0);
    // Dangling edge off one corner, as when a user starts a wing and stops.
    sketch.add_edge(pt(1.0, 1.0), pt(2.0, 2.0), Vec::new(), Color::WHITE);

    let facets = detect_facets(&sketch);
    assert_eq!(facets.len(), 1);
    assert_eq!(facets[0].ring.len(), 4);
}

#[test]
fn test_adjacent_squares_share_an_edge() {
    let mut sketch = Sketch::default();
    // Two unit squares sharing the vertical edge at x = 1.
    for (a, b) in [
        (pt(0.0, 0.0), pt(1.0, 0.0)),
        (pt(1.0, 0.0), pt(2.0, 0.0)),
        (pt(2.0, 0.0), pt(2.0, 1.0)),
        (pt(2.0, 1.0), pt(1.0, 1.0)),
        (pt(1.0, 1.0), pt(0.0, 1.0)),
        (pt(0.0, 1.0), pt(0.0, 0.0)),
        (pt(1.0, 0.0), pt(1.0, 1.0)),
    ] {
        sketch.add_edge(a, b, Vec::new(), Color::WHITE);
    }

    let facets = detect_facets(&sketch);
    assert_eq!(facets.len(), 2);

    let pairs = analyze_relations(&facets);
    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0].relation, FacetRelation::Adjacent);
}

#[test]
fn test_crossing_squares_measure_their_overlap() {
    let mut sketch = Sketch::default();
    add_square(&mut sketch, 0.0, 0.0, 2.0);
    add_square(&mut sketch, 1.0, 1.0, 2.0);

    let facets = detect_facets(&sketch);
    assert_eq!(facets.len(), 2);

    let pairs = analyze_relations(&facets);
    assert_eq!(pairs.len(), 1);
    match pairs[0].relation {
        FacetRelation::Overlap { area_sqft } => {
            // The shared region is the unit square from (1,1) to (2,2).
            assert_close(area_sqft, square_area_sqft(1.0), 0.01);
        }
        ref other => panic!("expected overlap, got {:?}", other),
    }
}

#[test]
fn test_nested_squares_report_containment() {
    let mut sketch = Sketch::default();
    add_square(&mut sketch, 0.0, 0.0, 4.0);
    add_square(&mut sketch, 1.0, 1.0, 1.0);

    let facets = detect_facets(&sketch);
    assert_eq!(facets.len(), 2);
    let outer = if facets[0].area_sqft > facets[1].area_sqft {
        0
    } else {
        1
    };
    let inner = 1 - outer;

    let pairs = analyze_relations(&facets);
    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0].a, outer);
    assert_eq!(pairs[0].b, inner);
    match pairs[0].relation {
        FacetRelation::Contains { area_sqft } => {
            assert_close(area_sqft, facets[inner].area_sqft, 1e-9);
        }
        ref other => panic!("expected containment, got {:?}", other),
    }
}

#[test]
fn test_dormer_footprint_deducted_from_containing_plane() {
    let mut sketch = Sketch::default();
    add_square(&mut sketch, 0.0, 0.0, 4.0);
    add_square(&mut sketch, 1.0, 1.0, 1.0);

    let facets = detect_facets(&sketch);
    let pairs = analyze_relations(&facets);
    let outer = if facets[0].area_sqft > facets[1].area_sqft {
        0
    } else {
        1
    };
    let inner = 1 - outer;

    let mut labels = FacetLabels::default();
    labels.toggle(facets[inner].key, LABEL_DORMER);

    let report = MeasurementReport::build(
        &sketch,
        &facets,
        &pairs,
        &labels,
        &FacetPitches::default(),
    );
    assert_close(
        report.facets[outer].dormer_deduction_sqft,
        facets[inner].area_sqft,
        1e-9,
    );
    assert_close(
        report.facets[outer].effective_sqft,
        facets[outer].area_sqft - facets[inner].area_sqft,
        1e-9,
    );
    // The dormer surface itself still counts, so the total is the outer area.
    assert_close(report.total_flat_sqft, facets[outer].area_sqft, 1e-9);
}

#[test]
fn test_removed_facet_drops_out_of_totals() {
    let mut sketch = Sketch::default();
    add_square(&mut sketch, 0.0, 0.0, 1.0);
    add_square(&mut sketch, 3.0, 0.0, 1.0);

    let facets = detect_facets(&sketch);
    assert_eq!(facets.len(), 2);

    let mut labels = FacetLabels::default();
    labels.toggle(facets[0].key, LABEL_REMOVED);

    let report = MeasurementReport::build(
        &sketch,
        &facets,
        &[],
        &labels,
        &FacetPitches::default(),
    );
    assert!(report.facets[0].excluded);
    assert_eq!(report.facets[0].effective_sqft, 0.0);
    assert_close(report.total_flat_sqft, facets[1].area_sqft, 1e-9);
}

#[test]
fn test_pitch_multiplier_scales_effective_area() {
    let mut sketch = Sketch::default();
    add_square(&mut sketch, 0.0, 0.0, 1.0);

    let facets = detect_facets(&sketch);
    let mut pitches = FacetPitches::default();
    pitches.toggle(facets[0].key, Pitch::new(12));

    let report = MeasurementReport::build(
        &sketch,
        &facets,
        &[],
        &FacetLabels::default(),
        &pitches,
    );
    // A 12/12 pitch stretches flat area by sqrt(2).
    assert_close(
        report.facets[0].pitched_sqft,
        facets[0].area_sqft * std::f64::consts::SQRT_2,
        1e-9,
    );
    assert_close(
        report.total_pitched_sqft,
        facets[0].area_sqft * std::f64::consts::SQRT_2,
        1e-9,
    );
}

#[test]
fn test_edge_totals_grouped_by_primary_label() {
    let mut sketch = Sketch::default();
    sketch.add_edge(
        pt(0.0, 0.0),
        pt(1.0, 0.0),
        vec!["eave".into()],
        Color::WHITE,
    );
    sketch.add_edge(
        pt(0.0, 1.0),
        pt(1.0, 1.0),
        vec!["eave".into()],
        Color::WHITE,
    );
    sketch.add_edge(
        pt(0.0, 2.0),
        pt(1.0, 2.0),
        vec!["ridge".into()],
        Color::WHITE,
    );
    sketch.add_edge(pt(0.0, 3.0), pt(1.0, 3.0), Vec::new(), Color::WHITE);

    let report = MeasurementReport::build(
        &sketch,
        &[],
        &[],
        &FacetLabels::default(),
        &FacetPitches::default(),
    );
    let eave = report.edge_totals_ft.get("eave").copied().unwrap_or(0.0);
    let ridge = report.edge_totals_ft.get("ridge").copied().unwrap_or(0.0);
    let unlabeled = report
        .edge_totals_ft
        .get(super::report::UNLABELED_EDGE_BUCKET)
        .copied()
        .unwrap_or(0.0);
    assert_close(eave, ridge * 2.0, 1e-9);
    assert_close(unlabeled, ridge, 1e-9);
    assert_close(report.total_edge_ft, eave + ridge + unlabeled, 1e-9);
}

#[test]
fn test_detection_is_deterministic_across_insertion_order() {
    let mut forward = Sketch::default();
    add_square(&mut forward, 0.0, 0.0, 1.0);
    add_square(&mut forward, 3.0, 0.0, 2.0);

    let mut reversed = Sketch::default();
    add_square(&mut reversed, 3.0, 0.0, 2.0);
    add_square(&mut reversed, 0.0, 0.0, 1.0);

    let keys_a: Vec<_> = detect_facets(&forward).iter().map(|f| f.key).collect();
    let keys_b: Vec<_> = detect_facets(&reversed).iter().map(|f| f.key).collect();
    assert_eq!(keys_a, keys_b);
}

#[test]
fn test_facet_key_survives_unrelated_edits() {
    let mut sketch = Sketch::default();
    add_square(&mut sketch, 0.0, 0.0, 1.0);
    let before = detect_facets(&sketch);
    assert_eq!(before.len(), 1);

    // Drawing elsewhere must not disturb the existing facet's identity.
    sketch.add_edge(pt(5.0, 5.0), pt(6.0, 5.0), Vec::new(), Color::WHITE);
    add_square(&mut sketch, 8.0, 8.0, 1.0);
    let after = detect_facets(&sketch);

    assert!(after.iter().any(|f| f.key == before[0].key));
}
