//! Geographic coordinate type and identity rules.
//!
//! All vertex-identity decisions in the sketch (snap merging, graph
//! connectivity, polygon closure, vertex substitution) go through the single
//! tolerance defined here. Coordinates closer than [`COORD_EPSILON_DEG`] on
//! both axes are the same vertex.

use serde::{Deserialize, Serialize};

/// Tolerance, in degrees, under which two coordinates are the same vertex.
///
/// At mid latitudes this is well under a millimeter of ground distance, far
/// below anything a user can express by clicking a map.
pub const COORD_EPSILON_DEG: f64 = 1e-8;

/// A WGS84 longitude/latitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lng: f64,
    pub lat: f64,
}

impl GeoPoint {
    pub const fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    /// Same-vertex test: both components within [`COORD_EPSILON_DEG`].
    pub fn approx_eq(&self, other: &GeoPoint) -> bool {
        (self.lng - other.lng).abs() < COORD_EPSILON_DEG
            && (self.lat - other.lat).abs() < COORD_EPSILON_DEG
    }

    /// Integer key at epsilon granularity, for hashing and set membership.
    pub fn quantized(&self) -> (i64, i64) {
        (
            (self.lng / COORD_EPSILON_DEG).round() as i64,
            (self.lat / COORD_EPSILON_DEG).round() as i64,
        )
    }
}
