use bevy::prelude::*;

use crate::annotations::{FacetLabels, FacetPitches, PinCategory, Pins, Pitch};
use crate::facets::FacetKey;
use crate::geo::GeoPoint;
use crate::sketch::Sketch;

use super::store::SketchHistory;
use super::{ChangeTracker, SketchSnapshot, MAX_HISTORY_SIZE};

fn snapshot_with_edges(count: usize) -> SketchSnapshot {
    let mut sketch = Sketch::default();
    for i in 0..count {
        let x = i as f64 * 0.001;
        sketch.add_edge(
            GeoPoint::new(x, 0.0),
            GeoPoint::new(x + 0.001, 0.0),
            Vec::new(),
            Color::WHITE,
        );
    }
    SketchSnapshot::capture(
        &sketch,
        &FacetLabels::default(),
        &FacetPitches::default(),
        &Pins::default(),
    )
}

#[test]
fn test_timeline_starts_at_empty_baseline() {
    let history = SketchHistory::default();
    assert!(!history.can_undo());
    assert!(!history.can_redo());
    assert!(history.current().edges.is_empty());
}

#[test]
fn test_duplicate_push_does_not_grow_history() {
    let mut history = SketchHistory::default();
    assert!(history.push(snapshot_with_edges(1)));
    assert!(!history.push(snapshot_with_edges(1)));
    assert!(history.can_undo());
    history.undo();
    assert!(!history.can_undo(), "only one real state was recorded");
}

#[test]
fn test_undo_then_new_commit_discards_redo_branch() {
    let mut history = SketchHistory::default();
    history.push(snapshot_with_edges(1));
    history.push(snapshot_with_edges(2));
    history.undo();
    assert!(history.can_redo());

    history.push(snapshot_with_edges(3));
    assert!(!history.can_redo(), "new commit replaces the undone branch");
    assert_eq!(history.current().edges.len(), 3);
}

#[test]
fn test_undo_redo_restore_deeply() {
    let mut sketch = Sketch::default();
    let mut labels = FacetLabels::default();
    let mut pitches = FacetPitches::default();
    let mut pins = Pins::default();

    sketch.add_edge(
        GeoPoint::new(0.0, 0.0),
        GeoPoint::new(0.001, 0.0),
        vec!["eave".into()],
        Color::WHITE,
    );
    labels.toggle(FacetKey(11), "porch");
    pitches.toggle(FacetKey(11), Pitch::new(6));
    pins.add(GeoPoint::new(0.0005, 0.0), "vent".into(), PinCategory::Vent);

    let mut history = SketchHistory::default();
    history.push(SketchSnapshot::capture(&sketch, &labels, &pitches, &pins));

    // Second commit: an empty state, the way a new sketch lands.
    SketchSnapshot::default().restore(&mut sketch, &mut labels, &mut pitches, &mut pins);
    history.push(SketchSnapshot::capture(&sketch, &labels, &pitches, &pins));

    let restored = history.undo().cloned().unwrap();
    restored.restore(&mut sketch, &mut labels, &mut pitches, &mut pins);
    assert_eq!(sketch.len(), 1);
    assert_eq!(sketch.edges()[0].primary_label(), Some("eave"));
    assert!(labels.has(FacetKey(11), "porch"));
    assert_eq!(pitches.get(FacetKey(11)), Some(Pitch::new(6)));
    assert_eq!(pins.pins().len(), 1);

    let redone = history.redo().cloned().unwrap();
    redone.restore(&mut sketch, &mut labels, &mut pitches, &mut pins);
    assert!(sketch.is_empty());
    assert!(pins.is_empty());
}

#[test]
fn test_capacity_trims_oldest_entries() {
    let mut history = SketchHistory::default();
    for i in 1..=(MAX_HISTORY_SIZE + 10) {
        history.push(snapshot_with_edges(i));
    }

    let mut undos = 0;
    while history.undo().is_some() {
        undos += 1;
    }
    assert!(undos < MAX_HISTORY_SIZE);
    // The oldest reachable state is no longer the empty baseline.
    assert!(!history.current().edges.is_empty());
}

#[test]
fn test_echo_suppression_matches_last_seq_only() {
    let mut tracker = ChangeTracker::default();
    assert_eq!(tracker.advance(), 1);
    assert_eq!(tracker.advance(), 2);

    assert!(tracker.is_echo(Some(2)));
    assert!(!tracker.is_echo(Some(1)), "stale echoes are real changes");
    assert!(!tracker.is_echo(None));
    assert_eq!(tracker.last_seq(), 2);
}

#[test]
fn test_restored_sketch_keeps_ids_monotonic() {
    let mut sketch = Sketch::default();
    let first = sketch
        .add_edge(
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.001, 0.0),
            Vec::new(),
            Color::WHITE,
        )
        .unwrap();
    let snapshot = SketchSnapshot::capture(
        &sketch,
        &FacetLabels::default(),
        &FacetPitches::default(),
        &Pins::default(),
    );

    sketch.set_edges(Vec::new());
    snapshot.restore(
        &mut sketch,
        &mut FacetLabels::default(),
        &mut FacetPitches::default(),
        &mut Pins::default(),
    );
    let next = sketch
        .add_edge(
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0, 0.001),
            Vec::new(),
            Color::WHITE,
        )
        .unwrap();
    assert!(next > first);
}
