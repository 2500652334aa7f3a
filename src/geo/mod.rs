//! Geographic primitives: the coordinate type, geodesic metrics, and polygon
//! clipping. Everything downstream (sketch, facets, viewport) builds on the
//! identity and unit rules defined here.

pub mod clip;
pub mod coord;
pub mod metrics;

pub use coord::{GeoPoint, COORD_EPSILON_DEG};
