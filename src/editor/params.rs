//! Common SystemParam bundles for the editing tools.
//!
//! Every tool needs the cursor position and the UI-hover check; bundling
//! them keeps the tool systems' parameter lists readable.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_egui::EguiContexts;

/// Bundled window access for cursor handling.
#[derive(SystemParam)]
pub struct CursorParams<'w, 's> {
    pub window: Query<'w, 's, &'static Window, With<PrimaryWindow>>,
}

impl CursorParams<'_, '_> {
    /// Cursor position in window pixels (top-left origin, y down), matching
    /// the viewport projection's screen space.
    pub fn cursor_screen_pos(&self) -> Option<Vec2> {
        self.window.single().ok()?.cursor_position()
    }
}

/// Check if the cursor is over egui UI
pub fn is_cursor_over_ui(contexts: &mut EguiContexts) -> bool {
    contexts
        .ctx_mut()
        .map(|ctx| ctx.is_pointer_over_area())
        .unwrap_or(false)
}

/// Run condition: returns true when no modal dialog is open.
///
/// Usage: `.run_if(no_dialog_open)`
pub fn no_dialog_open(dialog_state: Res<crate::ui::DialogState>) -> bool {
    !dialog_state.any_modal_open
}
