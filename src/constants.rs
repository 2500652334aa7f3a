//! Centralized constants used across the application.
//!
//! This module contains magic numbers and configuration values that are used
//! in multiple places or would benefit from being named constants.

/// Default window width in pixels (also the initial viewport width)
pub const DEFAULT_WINDOW_WIDTH: f32 = 1600.0;

/// Default window height in pixels (also the initial viewport height)
pub const DEFAULT_WINDOW_HEIGHT: f32 = 900.0;

/// Screen-space radius for resolving a click onto an existing vertex while drawing
pub const VERTEX_SNAP_THRESHOLD_PX: f32 = 15.0;

/// Screen-space radius for picking up and merging vertices in vertex-edit mode
pub const VERTEX_EDIT_SNAP_THRESHOLD_PX: f32 = 12.0;

/// Maximum deviation from a snap candidate angle before the raw angle is kept
pub const ANGLE_SNAP_TOLERANCE_DEG: f32 = 15.0;

/// Segments shorter than this on screen skip angle snapping entirely
pub const MIN_SNAP_SEGMENT_PX: f32 = 4.0;

/// Screen-space distance for hitting an edge interior (relabel clicks)
pub const EDGE_HIT_THRESHOLD_PX: f32 = 8.0;

/// Delay before vertex-edit mode can be re-entered after a cancel
pub const VERTEX_CANCEL_COOLDOWN_MS: u64 = 200;

/// Screen-space radius for clicking a pin marker
pub const PIN_HIT_THRESHOLD_PX: f32 = 12.0;

/// Maximum number of recent sketch files to remember in config
pub const MAX_RECENT_SKETCHES: usize = 5;

/// Web Mercator tile edge length in pixels at integer zoom levels
pub const TILE_SIZE_PX: f64 = 512.0;

/// Zoom bounds for the map viewport
pub const MIN_ZOOM: f64 = 1.0;
pub const MAX_ZOOM: f64 = 22.0;

/// Mouse wheel zoom step per scroll line
pub const ZOOM_STEP: f64 = 0.25;

/// Bearing change per rotate keypress, in degrees
pub const BEARING_STEP_DEG: f64 = 15.0;
