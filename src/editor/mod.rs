//! Interactive editing over the sketch: tool selection, segment drawing,
//! vertex moves, facet annotation, pin placement, and overlay rendering.

pub mod annotate;
mod camera;
pub mod drawing;
pub mod params;
mod rendering;
pub mod snapping;
pub mod tools;
pub mod vertex_move;

pub use annotate::{ApplyPitchToUnset, LabelSettings, PinSettings, PitchSettings};
pub use drawing::{DrawSettings, DrawState};
pub use tools::{CurrentTool, EditorTool};
pub use vertex_move::VertexMoveState;

use bevy::prelude::*;
use bevy_egui::EguiPrimaryContextPass;

use crate::history::CommitSet;

pub struct EditorPlugin;

impl Plugin for EditorPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<tools::CurrentTool>()
            .init_resource::<drawing::DrawState>()
            .init_resource::<drawing::DrawSettings>()
            .init_resource::<vertex_move::VertexMoveState>()
            .init_resource::<annotate::LabelSettings>()
            .init_resource::<annotate::PitchSettings>()
            .init_resource::<annotate::PinSettings>()
            .add_message::<annotate::ApplyPitchToUnset>()
            .init_gizmo_group::<rendering::SketchGizmoGroup>()
            .add_systems(
                Startup,
                (camera::spawn_camera, rendering::configure_sketch_gizmos),
            )
            .add_systems(
                Update,
                (
                    tools::handle_tool_shortcuts,
                    // Vertex editing runs before drawing so a click that
                    // ends a drag is consumed before the draw tool sees it.
                    vertex_move::handle_vertex_move,
                    drawing::handle_draw,
                    annotate::handle_facet_label,
                    annotate::handle_facet_pitch,
                    annotate::apply_pitch_to_unset,
                    annotate::handle_pin,
                )
                    .chain()
                    .run_if(params::no_dialog_open)
                    .in_set(CommitSet::Mutate),
            )
            .add_systems(Update, tools::update_cursor_icon)
            .add_systems(
                Update,
                (
                    rendering::render_facets,
                    rendering::render_sketch,
                    rendering::render_draw_preview,
                    rendering::render_pins,
                )
                    .after(CommitSet::Derive),
            )
            .add_systems(
                EguiPrimaryContextPass,
                (
                    rendering::edge_measurement_labels,
                    rendering::preview_measurement_label,
                    rendering::facet_area_labels,
                    rendering::pin_labels,
                ),
            );
    }
}
