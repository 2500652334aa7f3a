//! Annotation tools: toggling facet label codes, assigning pitches, and
//! dropping pins. All three resolve clicks through the current detection
//! output and commit through the standard mutation pipeline.

use bevy::prelude::*;
use bevy_egui::EguiContexts;

use crate::annotations::{FacetLabels, FacetPitches, PinCategory, Pins, Pitch, LABEL_REMOVED};
use crate::constants::PIN_HIT_THRESHOLD_PX;
use crate::facets::DetectedFacets;
use crate::materials::MaterialMatchRequest;
use crate::sketch::{SketchMutated, SketchMutation};
use crate::viewport::MapViewport;

use super::params::{is_cursor_over_ui, CursorParams};
use super::tools::{CurrentTool, EditorTool};

/// Which label code the next label-tool click toggles.
#[derive(Resource)]
pub struct LabelSettings {
    pub code: String,
}

impl Default for LabelSettings {
    fn default() -> Self {
        Self {
            code: LABEL_REMOVED.to_string(),
        }
    }
}

/// Which pitch the next pitch-tool click assigns.
#[derive(Resource)]
pub struct PitchSettings {
    pub pitch: Pitch,
}

impl Default for PitchSettings {
    fn default() -> Self {
        Self {
            pitch: Pitch::new(6),
        }
    }
}

/// Category and label for the next dropped pin.
#[derive(Resource, Default)]
pub struct PinSettings {
    pub category: PinCategory,
    pub label: String,
}

/// Toolbar request: assign the selected pitch to every facet without one.
#[derive(Message)]
pub struct ApplyPitchToUnset;

pub fn handle_facet_label(
    mouse_button: Res<ButtonInput<MouseButton>>,
    current_tool: Res<CurrentTool>,
    viewport: Res<MapViewport>,
    detected: Res<DetectedFacets>,
    settings: Res<LabelSettings>,
    mut labels: ResMut<FacetLabels>,
    mut mutations: MessageWriter<SketchMutated>,
    cursor: CursorParams,
    mut contexts: EguiContexts,
) {
    if current_tool.tool != EditorTool::Label {
        return;
    }
    if viewport.is_moving() || is_cursor_over_ui(&mut contexts) {
        return;
    }
    if !mouse_button.just_released(MouseButton::Left) {
        return;
    }
    let Some(cursor_px) = cursor.cursor_screen_pos() else {
        return;
    };

    let code = settings.code.trim();
    if code.is_empty() {
        return;
    }

    let point = viewport.unproject(cursor_px);
    if let Some(index) = detected.facet_at(point)
        && let Some(key) = detected.key_for_index(index)
    {
        let present = labels.toggle(key, code);
        mutations.write(SketchMutated {
            mutation: SketchMutation::AnnotationChanged,
        });
        debug!("facet {} label '{}' now {}", index, code, present);
    }
}

pub fn handle_facet_pitch(
    mouse_button: Res<ButtonInput<MouseButton>>,
    current_tool: Res<CurrentTool>,
    viewport: Res<MapViewport>,
    detected: Res<DetectedFacets>,
    settings: Res<PitchSettings>,
    mut pitches: ResMut<FacetPitches>,
    mut mutations: MessageWriter<SketchMutated>,
    cursor: CursorParams,
    mut contexts: EguiContexts,
) {
    if current_tool.tool != EditorTool::Pitch {
        return;
    }
    if viewport.is_moving() || is_cursor_over_ui(&mut contexts) {
        return;
    }
    if !mouse_button.just_released(MouseButton::Left) {
        return;
    }
    let Some(cursor_px) = cursor.cursor_screen_pos() else {
        return;
    };

    let point = viewport.unproject(cursor_px);
    if let Some(index) = detected.facet_at(point)
        && let Some(key) = detected.key_for_index(index)
    {
        let now = pitches.toggle(key, settings.pitch);
        mutations.write(SketchMutated {
            mutation: SketchMutation::AnnotationChanged,
        });
        match now {
            Some(pitch) => debug!("facet {} pitch set to {}", index, pitch),
            None => debug!("facet {} pitch cleared", index),
        }
    }
}

pub fn apply_pitch_to_unset(
    mut requests: MessageReader<ApplyPitchToUnset>,
    detected: Res<DetectedFacets>,
    settings: Res<PitchSettings>,
    mut pitches: ResMut<FacetPitches>,
    mut mutations: MessageWriter<SketchMutated>,
) {
    for _ in requests.read() {
        let keys = detected.facets.iter().map(|f| f.key);
        let applied = pitches.apply_to_unset(keys, settings.pitch);
        if applied > 0 {
            mutations.write(SketchMutated {
                mutation: SketchMutation::AnnotationChanged,
            });
            info!("pitch {} applied to {} facets", settings.pitch, applied);
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub fn handle_pin(
    mouse_button: Res<ButtonInput<MouseButton>>,
    current_tool: Res<CurrentTool>,
    viewport: Res<MapViewport>,
    settings: Res<PinSettings>,
    mut pins: ResMut<Pins>,
    mut mutations: MessageWriter<SketchMutated>,
    mut match_requests: MessageWriter<MaterialMatchRequest>,
    cursor: CursorParams,
    mut contexts: EguiContexts,
) {
    if current_tool.tool != EditorTool::Pin {
        return;
    }
    if viewport.is_moving() || is_cursor_over_ui(&mut contexts) {
        return;
    }
    let Some(cursor_px) = cursor.cursor_screen_pos() else {
        return;
    };

    if mouse_button.just_released(MouseButton::Left) {
        let position = viewport.unproject(cursor_px);
        let id = pins.add(
            position,
            settings.label.trim().to_string(),
            settings.category,
        );
        mutations.write(SketchMutated {
            mutation: SketchMutation::PinChanged,
        });
        match_requests.write(MaterialMatchRequest { pin_id: id });
        debug!("pin {} dropped ({})", id, settings.category.display_name());
    }

    if mouse_button.just_released(MouseButton::Right) {
        let mut nearest: Option<(f32, u64)> = None;
        for pin in pins.pins() {
            let dist = viewport.project(pin.position).distance(cursor_px);
            if dist <= PIN_HIT_THRESHOLD_PX && nearest.is_none_or(|(d, _)| dist < d) {
                nearest = Some((dist, pin.id));
            }
        }
        if let Some((_, id)) = nearest
            && pins.remove(id)
        {
            mutations.write(SketchMutated {
                mutation: SketchMutation::PinChanged,
            });
            debug!("pin {} removed", id);
        }
    }
}
