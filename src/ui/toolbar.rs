use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::annotations::{PinCategory, RESERVED_CODES};
use crate::config::{AppConfig, SnapSettings};
use crate::detection::{DetectRoofRequest, DetectionState};
use crate::editor::{
    ApplyPitchToUnset, CurrentTool, DrawSettings, EditorTool, LabelSettings, PinSettings,
    PitchSettings,
};
use crate::history::{RedoRequest, SketchHistory, UndoRequest};
use crate::io::{CurrentSketchFile, SketchDirtyState};
use crate::theme;

/// Main toolbar showing tools, undo/redo, and detection controls
#[allow(clippy::too_many_arguments)]
pub fn toolbar_ui(
    mut contexts: EguiContexts,
    mut current_tool: ResMut<CurrentTool>,
    mut snap: ResMut<SnapSettings>,
    history: Res<SketchHistory>,
    mut undo_events: MessageWriter<UndoRequest>,
    mut redo_events: MessageWriter<RedoRequest>,
    config: Res<AppConfig>,
    detection: Res<DetectionState>,
    mut detect_events: MessageWriter<DetectRoofRequest>,
    current_file: Res<CurrentSketchFile>,
    dirty: Res<SketchDirtyState>,
) -> Result {
    egui::TopBottomPanel::top("main_toolbar")
        .frame(
            egui::Frame::side_top_panel(&contexts.ctx_mut()?.style())
                .inner_margin(egui::Margin::symmetric(12, 8)),
        )
        .show(contexts.ctx_mut()?, |ui| {
            ui.horizontal(|ui| {
                ui.spacing_mut().item_spacing.x = 4.0;

                // Tool buttons with keyboard shortcuts
                for tool in EditorTool::all() {
                    let selected = current_tool.tool == *tool;
                    let button_text = tool_button_label(tool);

                    let button = egui::Button::new(
                        egui::RichText::new(button_text).size(14.0).strong(),
                    )
                    .min_size(egui::vec2(0.0, 28.0))
                    .selected(selected);

                    let response = ui.add(button);
                    if response.clicked() {
                        current_tool.tool = *tool;
                    }
                    response.on_hover_text(tool.display_name());
                }

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                // Undo/redo mirror Ctrl+Z / Ctrl+Y
                if ui
                    .add_enabled(
                        history.can_undo(),
                        egui::Button::new("Undo").min_size(egui::vec2(0.0, 24.0)),
                    )
                    .clicked()
                {
                    undo_events.write(UndoRequest);
                }
                if ui
                    .add_enabled(
                        history.can_redo(),
                        egui::Button::new("Redo").min_size(egui::vec2(0.0, 24.0)),
                    )
                    .clicked()
                {
                    redo_events.write(RedoRequest);
                }

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                // Angle snap toggle, persisted through config
                ui.checkbox(&mut snap.angle_snap, "Snap angles");

                // Right-aligned file status and detection controls
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let file_name = current_file
                        .path
                        .as_ref()
                        .and_then(|p| p.file_name())
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "Untitled".to_string());
                    let display = if dirty.is_dirty {
                        format!("{} *", file_name)
                    } else {
                        file_name
                    };
                    ui.label(egui::RichText::new(display).color(theme::ui::LABEL_TEXT));

                    ui.add_space(12.0);

                    if detection.is_running {
                        ui.colored_label(theme::ui::HINT_TEXT, "Detecting...");
                        ui.spinner();
                    } else {
                        let can_detect = config.data.detection_endpoint.is_some();
                        let response = ui.add_enabled(
                            can_detect,
                            egui::Button::new("Detect Roof").min_size(egui::vec2(0.0, 24.0)),
                        );
                        if response.clicked() {
                            detect_events.write(DetectRoofRequest);
                        }
                        if !can_detect {
                            response.on_hover_text(
                                "Set detection_endpoint in the config file to enable",
                            );
                        }
                    }
                });
            });
        });
    Ok(())
}

/// Secondary toolbar showing settings for the active tool
pub fn tool_settings_ui(
    mut contexts: EguiContexts,
    current_tool: Res<CurrentTool>,
    mut draw_settings: ResMut<DrawSettings>,
    mut label_settings: ResMut<LabelSettings>,
    mut pitch_settings: ResMut<PitchSettings>,
    mut pin_settings: ResMut<PinSettings>,
    mut apply_events: MessageWriter<ApplyPitchToUnset>,
) -> Result {
    egui::TopBottomPanel::top("tool_settings")
        .frame(
            egui::Frame::side_top_panel(&contexts.ctx_mut()?.style())
                .inner_margin(egui::Margin::symmetric(12, 6))
                .fill(theme::ui::PANEL_BACKGROUND),
        )
        .show(contexts.ctx_mut()?, |ui| {
            ui.horizontal(|ui| {
                ui.spacing_mut().item_spacing.x = 6.0;

                match current_tool.tool {
                    EditorTool::Draw => {
                        ui.label(
                            egui::RichText::new("Draw Settings:").color(theme::ui::LABEL_TEXT),
                        );

                        ui.add_space(8.0);

                        // Edge classification selection
                        ui.label("Edge type:");

                        let none_selected = draw_settings.label.is_none();
                        let response = ui.add(
                            egui::Button::new(egui::RichText::new("plain").size(11.0))
                                .selected(none_selected),
                        );
                        if response.clicked() {
                            draw_settings.label = None;
                        }
                        response.on_hover_text("No classification");

                        for (_, code, swatch) in theme::edge_label_colors() {
                            let is_selected = draw_settings.label.as_deref() == Some(code);
                            let button = egui::Button::new(
                                egui::RichText::new(code)
                                    .size(11.0)
                                    .color(egui::Color32::WHITE),
                            )
                            .fill(swatch)
                            .stroke(if is_selected {
                                egui::Stroke::new(2.0, theme::ui::SELECTED_BORDER)
                            } else {
                                egui::Stroke::new(1.0, theme::ui::UNSELECTED_BORDER)
                            });
                            if ui.add(button).clicked() {
                                draw_settings.label = Some(code.to_string());
                            }
                        }

                        ui.add_space(12.0);
                        ui.label(
                            egui::RichText::new(
                                "Esc: cancel chain | Right-click: delete edge, drag vertex",
                            )
                            .color(theme::ui::HINT_TEXT)
                            .size(11.0),
                        );
                    }
                    EditorTool::Label => {
                        ui.label(
                            egui::RichText::new("Label Settings:").color(theme::ui::LABEL_TEXT),
                        );

                        ui.add_space(8.0);

                        // Reserved codes change how a facet is measured
                        ui.label("Code:");
                        for code in RESERVED_CODES {
                            let is_selected = label_settings.code == code;
                            let response = ui.add(
                                egui::Button::new(egui::RichText::new(code).size(11.0))
                                    .selected(is_selected),
                            );
                            if response.clicked() {
                                label_settings.code = code.to_string();
                            }
                        }

                        ui.add_space(8.0);
                        ui.label("Custom:");
                        let mut custom = if RESERVED_CODES.contains(&label_settings.code.as_str())
                        {
                            String::new()
                        } else {
                            label_settings.code.clone()
                        };
                        let response = ui.add(
                            egui::TextEdit::singleline(&mut custom)
                                .hint_text("code")
                                .desired_width(100.0),
                        );
                        if response.changed() && !custom.trim().is_empty() {
                            label_settings.code = custom.trim().to_string();
                        }

                        ui.add_space(12.0);
                        ui.label(
                            egui::RichText::new("Click a facet to toggle the code")
                                .color(theme::ui::HINT_TEXT)
                                .size(11.0),
                        );
                    }
                    EditorTool::Pitch => {
                        ui.label(
                            egui::RichText::new("Pitch Settings:").color(theme::ui::LABEL_TEXT),
                        );

                        ui.add_space(8.0);

                        ui.label("Rise:");
                        ui.add(
                            egui::DragValue::new(&mut pitch_settings.pitch.rise)
                                .range(0..=24)
                                .speed(0.1)
                                .custom_formatter(|v, _| format!("{}/12", v as u8)),
                        );

                        ui.add_space(8.0);
                        if ui.button("Apply to unset facets").clicked() {
                            apply_events.write(ApplyPitchToUnset);
                        }

                        ui.add_space(12.0);
                        ui.label(
                            egui::RichText::new("Click a facet to set its pitch, again to clear")
                                .color(theme::ui::HINT_TEXT)
                                .size(11.0),
                        );
                    }
                    EditorTool::Pin => {
                        ui.label(
                            egui::RichText::new("Pin Settings:").color(theme::ui::LABEL_TEXT),
                        );

                        ui.add_space(8.0);

                        ui.label("Category:");
                        egui::ComboBox::from_id_salt("pin_category_select")
                            .selected_text(pin_settings.category.display_name())
                            .width(100.0)
                            .show_ui(ui, |ui| {
                                for category in PinCategory::all() {
                                    let is_selected = pin_settings.category == *category;
                                    if ui
                                        .selectable_label(is_selected, category.display_name())
                                        .clicked()
                                    {
                                        pin_settings.category = *category;
                                    }
                                }
                            });

                        ui.add_space(8.0);
                        ui.label("Label:");
                        ui.add(
                            egui::TextEdit::singleline(&mut pin_settings.label)
                                .hint_text("optional")
                                .desired_width(140.0),
                        );

                        ui.add_space(12.0);
                        ui.label(
                            egui::RichText::new("Click to drop a pin, right-click to remove")
                                .color(theme::ui::HINT_TEXT)
                                .size(11.0),
                        );
                    }
                }
            });
        });
    Ok(())
}

/// Get the button label for a tool (with keyboard shortcut)
fn tool_button_label(tool: &EditorTool) -> &'static str {
    match tool {
        EditorTool::Draw => "Draw [D]",
        EditorTool::Label => "Label [L]",
        EditorTool::Pitch => "Pitch [P]",
        EditorTool::Pin => "Pin [N]",
    }
}
