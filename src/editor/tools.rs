use bevy::prelude::*;
use bevy::window::{CursorIcon, PrimaryWindow, SystemCursorIcon};
use bevy_egui::EguiContexts;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorTool {
    #[default]
    Draw,
    Label,
    Pitch,
    Pin,
}

impl EditorTool {
    pub fn display_name(&self) -> &'static str {
        match self {
            EditorTool::Draw => "Draw (D)",
            EditorTool::Label => "Label (L)",
            EditorTool::Pitch => "Pitch (P)",
            EditorTool::Pin => "Pin (N)",
        }
    }

    pub fn cursor_icon(&self) -> CursorIcon {
        match self {
            EditorTool::Draw => CursorIcon::System(SystemCursorIcon::Crosshair),
            EditorTool::Label => CursorIcon::System(SystemCursorIcon::Pointer),
            EditorTool::Pitch => CursorIcon::System(SystemCursorIcon::Pointer),
            EditorTool::Pin => CursorIcon::System(SystemCursorIcon::Crosshair),
        }
    }

    pub fn all() -> &'static [EditorTool] {
        &[
            EditorTool::Draw,
            EditorTool::Label,
            EditorTool::Pitch,
            EditorTool::Pin,
        ]
    }
}

#[derive(Resource, Default)]
pub struct CurrentTool {
    pub tool: EditorTool,
}

pub fn handle_tool_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut current_tool: ResMut<CurrentTool>,
    mut contexts: EguiContexts,
) {
    // Don't change tools if typing in a text field
    if let Ok(ctx) = contexts.ctx_mut()
        && ctx.wants_keyboard_input()
    {
        return;
    }

    let new_tool = if keyboard.just_pressed(KeyCode::KeyD) {
        Some(EditorTool::Draw)
    } else if keyboard.just_pressed(KeyCode::KeyL) {
        Some(EditorTool::Label)
    } else if keyboard.just_pressed(KeyCode::KeyP) {
        Some(EditorTool::Pitch)
    } else if keyboard.just_pressed(KeyCode::KeyN) {
        Some(EditorTool::Pin)
    } else {
        None
    };

    if let Some(tool) = new_tool {
        current_tool.tool = tool;
    }
}

pub fn update_cursor_icon(
    current_tool: Res<CurrentTool>,
    mut window_query: Query<(Entity, &Window), With<PrimaryWindow>>,
    mut commands: Commands,
    mut contexts: EguiContexts,
) {
    let Ok((entity, _window)) = window_query.single_mut() else {
        return;
    };

    // Use default cursor over UI, tool cursor over the map
    if let Ok(ctx) = contexts.ctx_mut()
        && ctx.is_pointer_over_area()
    {
        commands
            .entity(entity)
            .insert(CursorIcon::System(SystemCursorIcon::Default));
        return;
    }

    commands.entity(entity).insert(current_tool.tool.cursor_icon());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_contain_shortcuts() {
        for tool in EditorTool::all() {
            let name = tool.display_name();
            assert!(name.contains('('), "missing shortcut hint: {}", name);
            assert!(name.contains(')'), "missing shortcut hint: {}", name);
        }
    }

    #[test]
    fn test_all_returns_every_tool() {
        assert_eq!(EditorTool::all().len(), 4);
        assert_eq!(EditorTool::default(), EditorTool::Draw);
    }
}
