//! Centralized color theme for the application.
//!
//! This module provides all colors used throughout the editor UI and rendering.
//! Modify values here to change the application's color scheme.

use bevy::prelude::Color;
use bevy_egui::egui;

// ============================================================================
// Edge Colors
// ============================================================================

/// Default stroke color for unclassified edges (red)
pub const EDGE_DEFAULT: Color = Color::srgb(0.9, 0.1, 0.1);

/// Edge classification palette for the toolbar picker.
///
/// Each entry is (stroke color, label code, egui swatch color). The label code
/// is stored as the edge's primary label.
pub fn edge_label_colors() -> [(Color, &'static str, egui::Color32); 6] {
    [
        (Color::srgb(0.9, 0.1, 0.1), "eave", egui::Color32::RED),
        (
            Color::srgb(0.1, 0.3, 0.9),
            "ridge",
            egui::Color32::from_rgb(30, 80, 230),
        ),
        (
            Color::srgb(0.0, 0.7, 0.2),
            "hip",
            egui::Color32::from_rgb(0, 180, 50),
        ),
        (
            Color::srgb(0.8, 0.5, 0.0),
            "valley",
            egui::Color32::from_rgb(205, 130, 0),
        ),
        (
            Color::srgb(0.6, 0.1, 0.7),
            "rake",
            egui::Color32::from_rgb(155, 30, 180),
        ),
        (
            Color::srgb(0.1, 0.7, 0.7),
            "flashing",
            egui::Color32::from_rgb(30, 180, 180),
        ),
    ]
}

/// Stroke color for a primary edge label, falling back to the default
pub fn color_for_edge_label(label: &str) -> Color {
    edge_label_colors()
        .iter()
        .find(|(_, code, _)| *code == label)
        .map(|(color, _, _)| *color)
        .unwrap_or(EDGE_DEFAULT)
}

// ============================================================================
// Vertex / Snap Colors
// ============================================================================

/// Small markers on every distinct sketch vertex
pub const VERTEX_MARKER: Color = Color::srgba(1.0, 1.0, 1.0, 0.9);

/// Highlight ring for the vertex currently being dragged
pub const VERTEX_DRAG: Color = Color::srgb(1.0, 0.85, 0.2);

/// Highlight ring for an active merge-snap target
pub const SNAP_TARGET: Color = Color::srgb(0.2, 1.0, 0.4);

// ============================================================================
// Facet Colors
// ============================================================================

/// Outline for detected roof facets
pub const FACET_OUTLINE: Color = Color::srgba(0.25, 0.55, 1.0, 0.9);

/// Outline variant for facets annotated as low-slope
pub const FACET_LOW_SLOPE: Color = Color::srgba(0.2, 0.85, 0.85, 0.9);

/// Dim outline for facets annotated as removed (excluded from totals)
pub const FACET_REMOVED: Color = Color::srgba(0.5, 0.5, 0.5, 0.5);

/// Centroid marker inside each detected facet
pub const FACET_CENTROID: Color = Color::srgba(0.25, 0.55, 1.0, 0.6);

// ============================================================================
// Pin Colors
// ============================================================================

/// Marker circle for placed pins
pub const PIN_MARKER: Color = Color::srgb(1.0, 0.45, 0.1);

// ============================================================================
// UI Colors (egui)
// ============================================================================

pub mod ui {
    use bevy_egui::egui;

    /// Dark grey panel background (tool settings bar)
    pub const PANEL_BACKGROUND: egui::Color32 = egui::Color32::from_rgb(45, 45, 48);

    /// Light grey for label text
    pub const LABEL_TEXT: egui::Color32 = egui::Color32::LIGHT_GRAY;

    /// Grey for help/hint text
    pub const HINT_TEXT: egui::Color32 = egui::Color32::GRAY;

    /// White for selected button borders
    pub const SELECTED_BORDER: egui::Color32 = egui::Color32::WHITE;

    /// Dark grey for unselected button borders
    pub const UNSELECTED_BORDER: egui::Color32 = egui::Color32::DARK_GRAY;

    /// Red for error messages
    pub const ERROR_TEXT: egui::Color32 = egui::Color32::RED;

    /// Green for completed async operations
    pub const SUCCESS_TEXT: egui::Color32 = egui::Color32::from_rgb(100, 200, 100);

    /// Measurement readouts drawn over the canvas
    pub const MEASUREMENT_TEXT: egui::Color32 = egui::Color32::from_rgb(255, 235, 160);

    /// Facet area readouts drawn at facet centroids
    pub const FACET_AREA_TEXT: egui::Color32 = egui::Color32::from_rgb(160, 210, 255);
}

// ============================================================================
// Color Conversion Utilities
// ============================================================================

/// Convert a Bevy Color to egui Color32 (fully opaque)
pub fn bevy_to_egui_opaque(color: Color) -> egui::Color32 {
    let srgba = color.to_srgba();
    egui::Color32::from_rgba_unmultiplied(
        (srgba.red * 255.0) as u8,
        (srgba.green * 255.0) as u8,
        (srgba.blue * 255.0) as u8,
        255,
    )
}
