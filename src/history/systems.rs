//! Bevy systems for the commit pipeline: keyboard shortcuts, snapshot
//! capture, and state restoration.

use bevy::prelude::*;
use bevy_egui::EguiContexts;

use crate::annotations::{FacetLabels, FacetPitches, Pins};
use crate::sketch::{Sketch, SketchMutated, SketchMutation};

use super::snapshot::SketchSnapshot;
use super::store::SketchHistory;
use super::{ApplyExternalSketch, ChangeTracker, RedoRequest, SketchChanged, UndoRequest};

/// Keyboard shortcuts (Ctrl+Z undo, Ctrl+Y or Ctrl+Shift+Z redo). Both go
/// through request messages so the toolbar buttons share one apply path.
pub fn request_undo_redo_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut contexts: EguiContexts,
    mut undo: MessageWriter<UndoRequest>,
    mut redo: MessageWriter<RedoRequest>,
) {
    // Don't trigger while typing in a text field
    if let Ok(ctx) = contexts.ctx_mut()
        && ctx.wants_keyboard_input()
    {
        return;
    }

    let ctrl = keyboard.pressed(KeyCode::ControlLeft) || keyboard.pressed(KeyCode::ControlRight);
    let shift = keyboard.pressed(KeyCode::ShiftLeft) || keyboard.pressed(KeyCode::ShiftRight);

    if ctrl && !shift && keyboard.just_pressed(KeyCode::KeyZ) {
        undo.write(UndoRequest);
    }

    let redo_pressed = (ctrl && keyboard.just_pressed(KeyCode::KeyY))
        || (ctrl && shift && keyboard.just_pressed(KeyCode::KeyZ));
    if redo_pressed {
        redo.write(RedoRequest);
    }
}

/// Folds every commit announced this frame into one history entry and
/// publishes the advanced sequence number.
pub fn capture_history(
    mut mutations: MessageReader<SketchMutated>,
    sketch: Res<Sketch>,
    labels: Res<FacetLabels>,
    pitches: Res<FacetPitches>,
    pins: Res<Pins>,
    mut history: ResMut<SketchHistory>,
    mut tracker: ResMut<ChangeTracker>,
    mut changes: MessageWriter<SketchChanged>,
) {
    let kinds: Vec<SketchMutation> = mutations.read().map(|m| m.mutation).collect();
    if kinds.is_empty() {
        return;
    }

    let snapshot = SketchSnapshot::capture(&sketch, &labels, &pitches, &pins);
    if history.push(snapshot) {
        let seq = tracker.advance();
        changes.write(SketchChanged { seq });
        debug!("commit captured, seq {} ({:?})", seq, kinds);
    }
}

pub fn apply_undo(
    mut requests: MessageReader<UndoRequest>,
    mut history: ResMut<SketchHistory>,
    mut sketch: ResMut<Sketch>,
    mut labels: ResMut<FacetLabels>,
    mut pitches: ResMut<FacetPitches>,
    mut pins: ResMut<Pins>,
    mut tracker: ResMut<ChangeTracker>,
    mut changes: MessageWriter<SketchChanged>,
) {
    for _ in requests.read() {
        if let Some(snapshot) = history.undo() {
            snapshot.restore(&mut sketch, &mut labels, &mut pitches, &mut pins);
            let seq = tracker.advance();
            changes.write(SketchChanged { seq });
            debug!("undo applied, seq {}", seq);
        }
    }
}

pub fn apply_redo(
    mut requests: MessageReader<RedoRequest>,
    mut history: ResMut<SketchHistory>,
    mut sketch: ResMut<Sketch>,
    mut labels: ResMut<FacetLabels>,
    mut pitches: ResMut<FacetPitches>,
    mut pins: ResMut<Pins>,
    mut tracker: ResMut<ChangeTracker>,
    mut changes: MessageWriter<SketchChanged>,
) {
    for _ in requests.read() {
        if let Some(snapshot) = history.redo() {
            snapshot.restore(&mut sketch, &mut labels, &mut pitches, &mut pins);
            let seq = tracker.advance();
            changes.write(SketchChanged { seq });
            debug!("redo applied, seq {}", seq);
        }
    }
}

/// Applies a wholesale state replacement pushed from outside the editor.
/// An apply that merely echoes our own last emission is dropped; a genuine
/// one restarts the history baseline.
pub fn apply_external(
    mut applies: MessageReader<ApplyExternalSketch>,
    mut history: ResMut<SketchHistory>,
    mut sketch: ResMut<Sketch>,
    mut labels: ResMut<FacetLabels>,
    mut pitches: ResMut<FacetPitches>,
    mut pins: ResMut<Pins>,
    mut tracker: ResMut<ChangeTracker>,
    mut changes: MessageWriter<SketchChanged>,
) {
    for apply in applies.read() {
        if tracker.is_echo(apply.echo_of) {
            debug!("dropped state apply echoing seq {:?}", apply.echo_of);
            continue;
        }

        apply
            .snapshot
            .restore(&mut sketch, &mut labels, &mut pitches, &mut pins);
        history.reset_baseline(apply.snapshot.clone());
        let seq = tracker.advance();
        changes.write(SketchChanged { seq });
        info!("external sketch state applied, seq {}", seq);
    }
}
