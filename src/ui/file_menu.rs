use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::config::{AppConfig, ConfigResetNotification, MissingSketchWarning, SaveConfigRequest};
use crate::io::{
    AsyncFileOperation, CurrentSketchFile, LoadSketchRequest, NewSketchRequest, SaveSketchRequest,
    SketchDirtyState, SketchFileError,
};
use crate::theme;

#[derive(Resource, Default)]
pub struct FileMenuState {
    pub show_new_confirmation: bool,
}

/// Renders the menu bar with file operations
#[allow(clippy::too_many_arguments)]
pub fn file_menu_bar_ui(
    mut contexts: EguiContexts,
    mut menu_state: ResMut<FileMenuState>,
    current_file: Res<CurrentSketchFile>,
    dirty: Res<SketchDirtyState>,
    config: Res<AppConfig>,
    mut save_events: MessageWriter<SaveSketchRequest>,
    mut load_events: MessageWriter<LoadSketchRequest>,
    mut new_events: MessageWriter<NewSketchRequest>,
) -> Result {
    egui::TopBottomPanel::top("menu_bar").show(contexts.ctx_mut()?, |ui| {
        ui.horizontal(|ui| {
            ui.menu_button("File", |ui| {
                if ui.button("New Sketch").clicked() {
                    if dirty.is_dirty {
                        menu_state.show_new_confirmation = true;
                    } else {
                        new_events.write(NewSketchRequest);
                    }
                    ui.close();
                }

                ui.separator();

                if ui.button("Open...").clicked() {
                    let dir = current_file
                        .path
                        .as_ref()
                        .and_then(|p| p.parent().map(|d| d.to_path_buf()))
                        .unwrap_or_else(crate::paths::sketches_dir);
                    if let Some(path) = rfd::FileDialog::new()
                        .add_filter("Sketch Files", &["json"])
                        .set_directory(dir)
                        .set_title("Open Sketch")
                        .pick_file()
                    {
                        load_events.write(LoadSketchRequest { path });
                    }
                    ui.close();
                }

                ui.menu_button("Open Recent", |ui| {
                    if config.data.recent_sketches.is_empty() {
                        ui.add_enabled(false, egui::Button::new("No recent sketches"));
                    }
                    for path in &config.data.recent_sketches {
                        let name = path
                            .file_name()
                            .map(|n| n.to_string_lossy().to_string())
                            .unwrap_or_else(|| path.to_string_lossy().to_string());
                        if ui.button(name).clicked() {
                            load_events.write(LoadSketchRequest { path: path.clone() });
                            ui.close();
                        }
                    }
                });

                ui.separator();

                if ui.button("Save").clicked() {
                    match &current_file.path {
                        Some(path) => {
                            save_events.write(SaveSketchRequest { path: path.clone() });
                        }
                        None => {
                            if let Some(path) = save_dialog(&current_file).save_file() {
                                save_events.write(SaveSketchRequest { path });
                            }
                        }
                    }
                    ui.close();
                }

                if ui.button("Save As...").clicked() {
                    if let Some(path) = save_dialog(&current_file).save_file() {
                        save_events.write(SaveSketchRequest { path });
                    }
                    ui.close();
                }
            });
        });
    });
    Ok(())
}

fn save_dialog(current_file: &CurrentSketchFile) -> rfd::FileDialog {
    let mut dialog = rfd::FileDialog::new()
        .add_filter("Sketch Files", &["json"])
        .set_title("Save Sketch");
    match &current_file.path {
        Some(path) => {
            if let Some(dir) = path.parent() {
                dialog = dialog.set_directory(dir);
            }
            if let Some(name) = path.file_name() {
                dialog = dialog.set_file_name(name.to_string_lossy());
            }
        }
        None => {
            dialog = dialog
                .set_directory(crate::paths::sketches_dir())
                .set_file_name("roof.json");
        }
    }
    dialog
}

/// Renders the dialog windows for file operations
pub fn file_menu_ui(
    mut contexts: EguiContexts,
    mut menu_state: ResMut<FileMenuState>,
    mut new_events: MessageWriter<NewSketchRequest>,
    mut file_error: ResMut<SketchFileError>,
) -> Result {
    // New sketch confirmation dialog
    if menu_state.show_new_confirmation {
        egui::Window::new("New Sketch")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(contexts.ctx_mut()?, |ui| {
                ui.label("Start a new sketch? Unsaved changes will be lost.");
                ui.horizontal(|ui| {
                    if ui.button("Discard and Start New").clicked() {
                        new_events.write(NewSketchRequest);
                        menu_state.show_new_confirmation = false;
                    }
                    if ui.button("Cancel").clicked() {
                        menu_state.show_new_confirmation = false;
                    }
                });
            });
    }

    // Save/load error dialog
    let mut dismissed = false;
    if let Some(error) = &file_error.message {
        egui::Window::new("File Error")
            .collapsible(false)
            .resizable(true)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(contexts.ctx_mut()?, |ui| {
                egui::ScrollArea::vertical().max_height(200.0).show(ui, |ui| {
                    ui.colored_label(theme::ui::ERROR_TEXT, error);
                });
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });
    }
    if dismissed {
        file_error.message = None;
    }

    Ok(())
}

/// Modal shown while a save or load task is running
pub fn async_operation_modal_ui(
    mut contexts: EguiContexts,
    async_op: Res<AsyncFileOperation>,
) -> Result {
    if !async_op.is_busy() {
        return Ok(());
    }

    egui::Window::new("Working")
        .collapsible(false)
        .resizable(false)
        .title_bar(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(contexts.ctx_mut()?, |ui| {
            ui.horizontal(|ui| {
                ui.spinner();
                let description = async_op
                    .operation_description
                    .as_deref()
                    .unwrap_or("Working...");
                ui.label(description);
            });
        });

    Ok(())
}

/// Renders the missing sketch warning dialog (shown at startup if the last
/// sketch file doesn't exist)
pub fn missing_sketch_warning_ui(
    mut contexts: EguiContexts,
    mut warning: ResMut<MissingSketchWarning>,
    mut config: ResMut<AppConfig>,
    mut save_events: MessageWriter<SaveConfigRequest>,
) -> Result {
    if !warning.show {
        return Ok(());
    }

    egui::Window::new("Sketch Not Found")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(contexts.ctx_mut()?, |ui| {
            ui.label("The last opened sketch file no longer exists:");

            if let Some(ref path) = warning.path {
                ui.add_space(5.0);
                let path_str = path.to_string_lossy();
                let display_path = if path_str.len() > 50 {
                    format!("...{}", &path_str[path_str.len() - 47..])
                } else {
                    path_str.to_string()
                };
                ui.label(egui::RichText::new(display_path).weak())
                    .on_hover_text(path_str.as_ref());
                ui.add_space(10.0);
            }

            ui.horizontal(|ui| {
                if ui.button("OK").clicked() {
                    warning.show = false;
                }

                if ui.button("Clear from history").clicked() {
                    config.data.last_sketch_path = None;
                    config.dirty = true;
                    save_events.write(SaveConfigRequest);
                    warning.show = false;
                }
            });
        });

    Ok(())
}

/// Notification shown when the config file could not be read and defaults
/// were applied instead
pub fn config_reset_notification_ui(
    mut contexts: EguiContexts,
    mut notification: ResMut<ConfigResetNotification>,
) -> Result {
    if !notification.show {
        return Ok(());
    }

    egui::Window::new("Settings Reset")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(contexts.ctx_mut()?, |ui| {
            ui.label("The settings file could not be read, so defaults were applied.");
            if let Some(reason) = &notification.reason {
                ui.add_space(5.0);
                ui.label(egui::RichText::new(reason).weak());
            }
            ui.add_space(10.0);
            if ui.button("OK").clicked() {
                notification.show = false;
            }
        });

    Ok(())
}
