use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::annotations::{FacetLabels, FacetPitches, Pins};
use crate::detection::DetectionState;
use crate::facets::{DetectedFacets, MeasurementReport};
use crate::io::AsyncFileOperation;
use crate::materials::EstimateSheet;
use crate::sketch::Sketch;
use crate::theme;

#[allow(clippy::too_many_arguments)]
pub fn takeoff_panel_ui(
    mut contexts: EguiContexts,
    sketch: Res<Sketch>,
    detected: Res<DetectedFacets>,
    labels: Res<FacetLabels>,
    pitches: Res<FacetPitches>,
    pins: Res<Pins>,
    detection: Res<DetectionState>,
    async_op: Res<AsyncFileOperation>,
) -> Result {
    egui::SidePanel::right("takeoff_panel")
        .default_width(250.0)
        .show(contexts.ctx_mut()?, |ui| {
            // =========================================
            // MEASUREMENTS SECTION
            // =========================================
            ui.add_space(4.0);
            ui.label(egui::RichText::new("Measurements").heading().size(18.0));
            ui.add_space(4.0);
            ui.separator();
            ui.add_space(4.0);

            let report = MeasurementReport::build(
                &sketch,
                &detected.facets,
                &detected.pairs,
                &labels,
                &pitches,
            );

            if report.facets.is_empty() {
                ui.label(
                    egui::RichText::new("Close a loop of segments to measure a facet.")
                        .color(theme::ui::HINT_TEXT)
                        .size(11.0),
                );
            } else {
                egui::ScrollArea::vertical()
                    .id_salt("facet_scroll")
                    .max_height(260.0)
                    .show(ui, |ui| {
                        egui::Grid::new("facet_grid")
                            .num_columns(3)
                            .striped(true)
                            .show(ui, |ui| {
                                grid_header(ui, &["Facet", "Pitch", "Area"]);
                                for line in &report.facets {
                                    let mut name = format!("#{}", line.index + 1);
                                    if !line.labels.is_empty() {
                                        name.push(' ');
                                        name.push_str(&line.labels.join(","));
                                    }
                                    let text_color = if line.excluded {
                                        theme::ui::HINT_TEXT
                                    } else {
                                        theme::ui::LABEL_TEXT
                                    };
                                    ui.label(
                                        egui::RichText::new(name).size(11.0).color(text_color),
                                    );
                                    let pitch_text = line
                                        .pitch
                                        .map(|p| p.to_string())
                                        .unwrap_or_else(|| "-".to_string());
                                    ui.label(
                                        egui::RichText::new(pitch_text)
                                            .size(11.0)
                                            .color(text_color),
                                    );
                                    let area_text = if line.excluded {
                                        "excl".to_string()
                                    } else {
                                        format!("{:.0} sqft", line.pitched_sqft)
                                    };
                                    let response = ui.label(
                                        egui::RichText::new(area_text)
                                            .size(11.0)
                                            .color(text_color),
                                    );
                                    if line.dormer_deduction_sqft > 0.0 {
                                        response.on_hover_text(format!(
                                            "{:.0} sqft dormer footprint deducted",
                                            line.dormer_deduction_sqft
                                        ));
                                    }
                                    ui.end_row();
                                }
                            });
                    });

                ui.add_space(4.0);
                ui.separator();
                ui.add_space(4.0);

                ui.label(
                    egui::RichText::new(format!("Flat: {:.0} sqft", report.total_flat_sqft))
                        .size(12.0),
                );
                ui.label(
                    egui::RichText::new(format!(
                        "Pitched: {:.0} sqft",
                        report.total_pitched_sqft
                    ))
                    .size(12.0)
                    .strong()
                    .color(theme::ui::FACET_AREA_TEXT),
                );
                if report.overlap_deduction_sqft > 0.0 {
                    ui.label(
                        egui::RichText::new(format!(
                            "Overlap deducted: {:.0} sqft",
                            report.overlap_deduction_sqft
                        ))
                        .color(theme::ui::HINT_TEXT)
                        .size(11.0),
                    );
                }
            }

            // =========================================
            // EDGE LENGTHS SECTION
            // =========================================
            ui.add_space(12.0);
            ui.label(egui::RichText::new("Edge Lengths").heading().size(18.0));
            ui.add_space(4.0);
            ui.separator();
            ui.add_space(4.0);

            if report.edge_totals_ft.is_empty() {
                ui.label(
                    egui::RichText::new("No segments drawn yet.")
                        .color(theme::ui::HINT_TEXT)
                        .size(11.0),
                );
            } else {
                egui::Grid::new("edge_totals_grid")
                    .num_columns(2)
                    .striped(true)
                    .show(ui, |ui| {
                        for (label, total) in &report.edge_totals_ft {
                            ui.label(
                                egui::RichText::new(label)
                                    .size(11.0)
                                    .color(theme::bevy_to_egui_opaque(
                                        theme::color_for_edge_label(label),
                                    )),
                            );
                            ui.label(egui::RichText::new(format!("{:.1} ft", total)).size(11.0));
                            ui.end_row();
                        }
                    });
                ui.add_space(4.0);
                ui.label(
                    egui::RichText::new(format!("Total: {:.1} ft", report.total_edge_ft))
                        .size(12.0)
                        .strong(),
                );
            }

            // =========================================
            // ESTIMATE SECTION
            // =========================================
            ui.add_space(12.0);
            ui.label(egui::RichText::new("Estimate").heading().size(18.0));
            ui.add_space(4.0);
            ui.separator();
            ui.add_space(4.0);

            let estimate = EstimateSheet::build(&pins);
            if estimate.is_empty() && estimate.unmatched_pins == 0 {
                ui.label(
                    egui::RichText::new("Drop pins to collect materials.")
                        .color(theme::ui::HINT_TEXT)
                        .size(11.0),
                );
            } else {
                egui::Grid::new("estimate_grid")
                    .num_columns(3)
                    .striped(true)
                    .show(ui, |ui| {
                        grid_header(ui, &["Item", "Qty", "Total"]);
                        for line in &estimate.lines {
                            ui.label(egui::RichText::new(&line.name).size(11.0))
                                .on_hover_text(format!(
                                    "{} @ ${:.2}",
                                    line.sku, line.unit_cost
                                ));
                            ui.label(egui::RichText::new(line.quantity.to_string()).size(11.0));
                            ui.label(
                                egui::RichText::new(format!("${:.2}", line.line_total()))
                                    .size(11.0),
                            );
                            ui.end_row();
                        }
                    });
                ui.add_space(4.0);
                ui.label(
                    egui::RichText::new(format!("Materials: ${:.2}", estimate.total()))
                        .size(12.0)
                        .strong(),
                );
                if estimate.unmatched_pins > 0 {
                    ui.label(
                        egui::RichText::new(format!(
                            "{} pin(s) without a material",
                            estimate.unmatched_pins
                        ))
                        .color(theme::ui::HINT_TEXT)
                        .size(11.0),
                    );
                }
            }

            // =========================================
            // STATUS SECTION
            // =========================================
            let has_status = detection.error.is_some()
                || detection.last_added_count.is_some()
                || async_op.is_busy();
            if has_status {
                ui.add_space(12.0);
                ui.separator();
                ui.add_space(4.0);

                if let Some(error) = &detection.error {
                    ui.label(
                        egui::RichText::new(error)
                            .color(theme::ui::ERROR_TEXT)
                            .size(11.0),
                    );
                } else if let Some(count) = detection.last_added_count {
                    ui.label(
                        egui::RichText::new(format!("Detection added {} segments", count))
                            .color(theme::ui::SUCCESS_TEXT)
                            .size(11.0),
                    );
                }

                if async_op.is_busy() {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        if let Some(desc) = &async_op.operation_description {
                            ui.label(
                                egui::RichText::new(desc)
                                    .color(theme::ui::HINT_TEXT)
                                    .size(11.0),
                            );
                        }
                    });
                }
            }
        });
    Ok(())
}

fn grid_header(ui: &mut egui::Ui, columns: &[&str]) {
    for column in columns {
        ui.label(
            egui::RichText::new(*column)
                .size(11.0)
                .strong()
                .color(theme::ui::LABEL_TEXT),
        );
    }
    ui.end_row();
}
