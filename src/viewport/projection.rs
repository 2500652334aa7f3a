//! Web Mercator viewport state and projection math.
//!
//! [`MapViewport`] is the single source of truth for where the slippy map is
//! looking: center, zoom, bearing, and canvas size. Everything that crosses
//! between geographic coordinates and the screen (drawing, snapping, hit
//! testing, rendering) goes through `project`/`unproject` so the whole editor
//! agrees on one transform.
//!
//! Screen coordinates are pixels with the origin at the top-left and y down,
//! matching window cursor positions. The rendering camera sits at the world
//! origin, so [`MapViewport::to_world`] recenters screen pixels into Bevy
//! world space.

use bevy::math::DVec2;
use bevy::prelude::*;
use std::f64::consts::PI;

use crate::constants::{
    DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_WIDTH, MAX_ZOOM, MIN_ZOOM, TILE_SIZE_PX,
};
use crate::geo::GeoPoint;

/// Geographic extent currently visible, as a lat/lng box.
#[derive(Debug, Clone, Copy)]
pub struct ViewportBounds {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

/// The slippy-map viewport the sketch is drawn over.
#[derive(Resource, Debug, Clone)]
pub struct MapViewport {
    pub center: GeoPoint,
    pub zoom: f64,
    pub bearing_deg: f64,
    pub size_px: Vec2,
    /// True while the host is panning/zooming/rotating the map. Editing
    /// input is suppressed while set.
    pub moving: bool,
}

impl Default for MapViewport {
    fn default() -> Self {
        Self {
            center: GeoPoint::new(-98.5795, 39.8283),
            zoom: 19.0,
            bearing_deg: 0.0,
            size_px: Vec2::new(DEFAULT_WINDOW_WIDTH, DEFAULT_WINDOW_HEIGHT),
            moving: false,
        }
    }
}

impl MapViewport {
    /// Pixels per Mercator unit at the current zoom.
    pub fn scale(&self) -> f64 {
        TILE_SIZE_PX * 2f64.powf(self.zoom)
    }

    pub fn is_moving(&self) -> bool {
        self.moving
    }

    /// Geographic point to screen pixels (origin top-left, y down).
    pub fn project(&self, p: GeoPoint) -> Vec2 {
        let delta = (mercator(p) - mercator(self.center)) * self.scale();
        let rotated = rotate(delta, -self.bearing_deg.to_radians());
        Vec2::new(
            (rotated.x + self.size_px.x as f64 / 2.0) as f32,
            (rotated.y + self.size_px.y as f64 / 2.0) as f32,
        )
    }

    /// Screen pixels back to a geographic point.
    pub fn unproject(&self, px: Vec2) -> GeoPoint {
        let delta = DVec2::new(
            px.x as f64 - self.size_px.x as f64 / 2.0,
            px.y as f64 - self.size_px.y as f64 / 2.0,
        );
        let rotated = rotate(delta, self.bearing_deg.to_radians());
        unmercator(mercator(self.center) + rotated / self.scale())
    }

    /// Screen pixels to Bevy world coordinates (camera at origin, y up).
    pub fn to_world(&self, px: Vec2) -> Vec2 {
        Vec2::new(px.x - self.size_px.x / 2.0, self.size_px.y / 2.0 - px.y)
    }

    /// Geographic point straight to world coordinates, for gizmo rendering.
    pub fn project_world(&self, p: GeoPoint) -> Vec2 {
        let px = self.project(p);
        self.to_world(px)
    }

    /// Pan so the map content shifts by `delta_px` on screen.
    pub fn pan_by_screen(&mut self, delta_px: Vec2) {
        let anchor = Vec2::new(
            self.size_px.x / 2.0 - delta_px.x,
            self.size_px.y / 2.0 - delta_px.y,
        );
        self.center = self.unproject(anchor);
    }

    /// Zoom in or out, clamped to the supported range.
    pub fn zoom_by(&mut self, delta: f64) {
        self.zoom = (self.zoom + delta).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Rotate the map, keeping the bearing in [0, 360).
    pub fn rotate_by(&mut self, delta_deg: f64) {
        self.bearing_deg = (self.bearing_deg + delta_deg).rem_euclid(360.0);
    }

    /// Geographic box covering the visible canvas, bearing included.
    pub fn bounds(&self) -> ViewportBounds {
        let corners = [
            Vec2::new(0.0, 0.0),
            Vec2::new(self.size_px.x, 0.0),
            Vec2::new(self.size_px.x, self.size_px.y),
            Vec2::new(0.0, self.size_px.y),
        ];
        let mut bounds = ViewportBounds {
            west: f64::INFINITY,
            south: f64::INFINITY,
            east: f64::NEG_INFINITY,
            north: f64::NEG_INFINITY,
        };
        for corner in corners {
            let p = self.unproject(corner);
            bounds.west = bounds.west.min(p.lng);
            bounds.east = bounds.east.max(p.lng);
            bounds.south = bounds.south.min(p.lat);
            bounds.north = bounds.north.max(p.lat);
        }
        bounds
    }
}

/// Longitude/latitude to Mercator unit square coordinates ([0,1) each axis,
/// y increasing southward).
fn mercator(p: GeoPoint) -> DVec2 {
    let lat_rad = p.lat.to_radians();
    DVec2::new(
        (p.lng + 180.0) / 360.0,
        (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0,
    )
}

fn unmercator(m: DVec2) -> GeoPoint {
    let n = PI * (1.0 - 2.0 * m.y);
    GeoPoint::new(m.x * 360.0 - 180.0, n.sinh().atan().to_degrees())
}

fn rotate(v: DVec2, rad: f64) -> DVec2 {
    let (sin, cos) = rad.sin_cos();
    DVec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport_at(lng: f64, lat: f64, zoom: f64, bearing: f64) -> MapViewport {
        MapViewport {
            center: GeoPoint::new(lng, lat),
            zoom,
            bearing_deg: bearing,
            size_px: Vec2::new(1600.0, 900.0),
            moving: false,
        }
    }

    #[test]
    fn test_center_projects_to_screen_center() {
        let vp = viewport_at(-122.4194, 37.7749, 19.0, 0.0);
        let px = vp.project(vp.center);
        assert!((px.x - 800.0).abs() < 1e-3);
        assert!((px.y - 450.0).abs() < 1e-3);
        let world = vp.to_world(px);
        assert!(world.length() < 1e-3);
    }

    #[test]
    fn test_north_is_up_without_bearing() {
        let vp = viewport_at(-122.4194, 37.7749, 19.0, 0.0);
        let north = GeoPoint::new(-122.4194, 37.7750);
        let px = vp.project(north);
        assert!(px.y < 450.0, "higher latitude should be above center");
        assert!((px.x - 800.0).abs() < 1e-3);
    }

    #[test]
    fn test_project_unproject_round_trip_with_bearing() {
        let vp = viewport_at(151.2093, -33.8688, 19.0, 37.0);
        let p = GeoPoint::new(151.2095, -33.8690);
        let back = vp.unproject(vp.project(p));
        assert!((back.lng - p.lng).abs() < 1e-7, "lng drifted: {}", back.lng);
        assert!((back.lat - p.lat).abs() < 1e-7, "lat drifted: {}", back.lat);
    }

    #[test]
    fn test_unproject_project_round_trip() {
        let vp = viewport_at(2.3522, 48.8566, 18.0, 120.0);
        let px = Vec2::new(312.0, 77.0);
        let round = vp.project(vp.unproject(px));
        assert!((round.x - px.x).abs() < 0.01);
        assert!((round.y - px.y).abs() < 0.01);
    }

    #[test]
    fn test_zoom_preserves_center() {
        let mut vp = viewport_at(-87.6298, 41.8781, 17.0, 0.0);
        let before = vp.center;
        vp.zoom_by(2.0);
        assert_eq!(vp.center, before);
        assert_eq!(vp.zoom, 19.0);
    }

    #[test]
    fn test_zoom_clamps_to_range() {
        let mut vp = viewport_at(0.0, 0.0, 20.0, 0.0);
        vp.zoom_by(100.0);
        assert_eq!(vp.zoom, MAX_ZOOM);
        vp.zoom_by(-100.0);
        assert_eq!(vp.zoom, MIN_ZOOM);
    }

    #[test]
    fn test_pan_shifts_center() {
        let mut vp = viewport_at(-122.4194, 37.7749, 19.0, 0.0);
        let before = vp.center;
        // Dragging content to the right moves the center west.
        vp.pan_by_screen(Vec2::new(100.0, 0.0));
        assert!(vp.center.lng < before.lng);
        assert!((vp.center.lat - before.lat).abs() < 1e-9);
    }

    #[test]
    fn test_rotate_wraps_bearing() {
        let mut vp = viewport_at(0.0, 0.0, 10.0, 350.0);
        vp.rotate_by(15.0);
        assert!((vp.bearing_deg - 5.0).abs() < 1e-9);
        vp.rotate_by(-15.0);
        assert!((vp.bearing_deg - 350.0).abs() < 1e-9);
    }

    #[test]
    fn test_bounds_contain_center() {
        let vp = viewport_at(-0.1278, 51.5074, 16.0, 45.0);
        let b = vp.bounds();
        assert!(b.west < vp.center.lng && vp.center.lng < b.east);
        assert!(b.south < vp.center.lat && vp.center.lat < b.north);
    }

    #[test]
    fn test_screen_distance_scales_with_zoom() {
        let near = viewport_at(0.0, 0.0, 18.0, 0.0);
        let far = viewport_at(0.0, 0.0, 17.0, 0.0);
        let p = GeoPoint::new(0.0002, 0.0);
        let d_near = (near.project(p) - near.project(near.center)).length();
        let d_far = (far.project(p) - far.project(far.center)).length();
        assert!(
            (d_near / d_far - 2.0).abs() < 1e-3,
            "one zoom level should double screen distance"
        );
    }
}
