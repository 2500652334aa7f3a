pub mod file_menu;
mod takeoff_panel;
mod toolbar;

use bevy::prelude::*;
use bevy_egui::EguiPrimaryContextPass;

use crate::config::{ConfigResetNotification, MissingSketchWarning};
use crate::io::{AsyncFileOperation, SketchFileError};

/// Resource that tracks whether any modal dialog is currently open.
/// Editor input handlers should check this to avoid processing input
/// when the user is interacting with a dialog.
#[derive(Resource, Default)]
pub struct DialogState {
    /// True when any modal dialog is open that should block editor input
    pub any_modal_open: bool,
}

/// System to aggregate all dialog open states into a single resource.
/// Runs in First schedule before input handlers.
fn update_dialog_state(
    file_menu: Res<file_menu::FileMenuState>,
    missing_sketch: Res<MissingSketchWarning>,
    config_reset: Res<ConfigResetNotification>,
    file_error: Res<SketchFileError>,
    async_op: Res<AsyncFileOperation>,
    mut dialog_state: ResMut<DialogState>,
) {
    dialog_state.any_modal_open = file_menu.show_new_confirmation
        || missing_sketch.show
        || config_reset.show
        || file_error.message.is_some()
        || async_op.is_busy();
}

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DialogState>()
            .init_resource::<file_menu::FileMenuState>()
            // The menu bar claims the full window width, then the side panel
            // takes the remaining right edge, then the toolbars fit between.
            // Use chain() to enforce ordering
            .add_systems(
                EguiPrimaryContextPass,
                (
                    file_menu::file_menu_bar_ui,
                    takeoff_panel::takeoff_panel_ui,
                )
                    .chain(),
            )
            .add_systems(
                EguiPrimaryContextPass,
                (toolbar::toolbar_ui, toolbar::tool_settings_ui)
                    .chain()
                    .after(takeoff_panel::takeoff_panel_ui),
            )
            .add_systems(
                EguiPrimaryContextPass,
                (
                    // Last: dialogs/overlays
                    file_menu::file_menu_ui,
                    file_menu::missing_sketch_warning_ui,
                    file_menu::async_operation_modal_ui,
                    file_menu::config_reset_notification_ui,
                )
                    .after(toolbar::toolbar_ui),
            )
            // Update dialog state at the start of each frame
            .add_systems(First, update_dialog_state);
    }
}
