//! Geodesic length and area math.
//!
//! Distances use the Haversine great-circle formula. Areas use a planar
//! shoelace over coordinates scaled by the local meters-per-degree factors,
//! which is accurate to well under a percent at roof scale (tens of meters).
//! Results are reported in feet and square feet, the units the roofing trade
//! actually works in.

use super::coord::GeoPoint;

/// Mean Earth radius in meters
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// International foot
pub const FEET_PER_METER: f64 = 3.28084;

/// Meters per degree of latitude (and of longitude at the equator)
const METERS_PER_DEG: f64 = EARTH_RADIUS_M * std::f64::consts::PI / 180.0;

/// Great-circle distance between two points in feet.
pub fn distance_feet(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlng = (b.lng - a.lng).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().asin();

    EARTH_RADIUS_M * c * FEET_PER_METER
}

/// Project a ring into a local tangent plane, in meters, relative to `origin`.
///
/// Longitude is scaled by the cosine of the origin latitude so that both axes
/// carry true ground distance. The sketch never spans more than a property
/// lot, so a single scale factor per ring is plenty.
pub fn ring_to_local_meters(ring: &[GeoPoint], origin: GeoPoint) -> Vec<[f64; 2]> {
    let lng_scale = METERS_PER_DEG * origin.lat.to_radians().cos();
    ring.iter()
        .map(|p| {
            [
                (p.lng - origin.lng) * lng_scale,
                (p.lat - origin.lat) * METERS_PER_DEG,
            ]
        })
        .collect()
}

/// Signed shoelace area of a planar ring in the units of its coordinates
/// squared. Positive for counter-clockwise winding. The ring is implicitly
/// closed.
pub fn signed_area(ring: &[[f64; 2]]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..ring.len() {
        let [x1, y1] = ring[i];
        let [x2, y2] = ring[(i + 1) % ring.len()];
        sum += x1 * y2 - x2 * y1;
    }
    sum / 2.0
}

/// Geodesic area of a ring in square feet. Winding direction does not matter.
pub fn ring_area_sqft(ring: &[GeoPoint]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    let origin = vertex_mean(ring);
    let local = ring_to_local_meters(ring, origin);
    signed_area(&local).abs() * FEET_PER_METER * FEET_PER_METER
}

/// Area-weighted centroid of a ring. Falls back to the vertex mean for rings
/// too thin to carry a meaningful area.
pub fn ring_centroid(ring: &[GeoPoint]) -> GeoPoint {
    let mean = vertex_mean(ring);
    if ring.len() < 3 {
        return mean;
    }

    let lng_scale = METERS_PER_DEG * mean.lat.to_radians().cos();
    let local = ring_to_local_meters(ring, mean);
    let area = signed_area(&local);
    if area.abs() < 1e-6 {
        return mean;
    }

    let mut cx = 0.0;
    let mut cy = 0.0;
    for i in 0..local.len() {
        let [x1, y1] = local[i];
        let [x2, y2] = local[(i + 1) % local.len()];
        let cross = x1 * y2 - x2 * y1;
        cx += (x1 + x2) * cross;
        cy += (y1 + y2) * cross;
    }
    cx /= 6.0 * area;
    cy /= 6.0 * area;

    GeoPoint::new(mean.lng + cx / lng_scale, mean.lat + cy / METERS_PER_DEG)
}

/// Even-odd ray cast. Points exactly on the boundary may land either way;
/// callers that care route through the epsilon identity first.
pub fn point_in_ring(p: GeoPoint, ring: &[GeoPoint]) -> bool {
    if ring.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let (xi, yi) = (ring[i].lng, ring[i].lat);
        let (xj, yj) = (ring[j].lng, ring[j].lat);
        if ((yi > p.lat) != (yj > p.lat))
            && (p.lng < (xj - xi) * (p.lat - yi) / (yj - yi) + xi)
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

fn vertex_mean(ring: &[GeoPoint]) -> GeoPoint {
    let n = ring.len().max(1) as f64;
    let lng = ring.iter().map(|p| p.lng).sum::<f64>() / n;
    let lat = ring.iter().map(|p| p.lat).sum::<f64>() / n;
    GeoPoint::new(lng, lat)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64, rel_tol: f64) {
        let diff = (actual - expected).abs();
        assert!(
            diff <= expected.abs() * rel_tol,
            "expected {} within {}% of {}, diff {}",
            actual,
            rel_tol * 100.0,
            expected,
            diff
        );
    }

    #[test]
    fn test_equator_latitude_step_in_feet() {
        // One millidegree of latitude at the equator is about 364.96 feet.
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(0.0, 0.001);
        assert_close(distance_feet(a, b), 364.96, 0.001);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = GeoPoint::new(-122.4194, 37.7749);
        let b = GeoPoint::new(-122.4180, 37.7755);
        assert!((distance_feet(a, b) - distance_feet(b, a)).abs() < 1e-9);
    }

    #[test]
    fn test_zero_distance() {
        let a = GeoPoint::new(12.5, 41.9);
        assert_eq!(distance_feet(a, a), 0.0);
    }

    #[test]
    fn test_longitude_shrinks_with_latitude() {
        let equator = distance_feet(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.001, 0.0));
        let north = distance_feet(GeoPoint::new(0.0, 60.0), GeoPoint::new(0.001, 60.0));
        // cos(60 deg) = 0.5
        assert_close(north, equator * 0.5, 0.001);
    }

    #[test]
    fn test_square_ring_area_matches_side_product() {
        // A millidegree square at the equator: area should equal the product
        // of its geodesic side lengths to well under a percent.
        let ring = [
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.001, 0.0),
            GeoPoint::new(0.001, 0.001),
            GeoPoint::new(0.0, 0.001),
        ];
        let side_ns = distance_feet(ring[1], ring[2]);
        let side_ew = distance_feet(ring[0], ring[1]);
        assert_close(ring_area_sqft(&ring), side_ns * side_ew, 0.005);
    }

    #[test]
    fn test_area_ignores_winding() {
        let ccw = [
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.001, 0.0),
            GeoPoint::new(0.001, 0.001),
            GeoPoint::new(0.0, 0.001),
        ];
        let cw: Vec<GeoPoint> = ccw.iter().rev().copied().collect();
        assert!((ring_area_sqft(&ccw) - ring_area_sqft(&cw)).abs() < 1e-6);
    }

    #[test]
    fn test_degenerate_rings_have_zero_area() {
        assert_eq!(ring_area_sqft(&[]), 0.0);
        assert_eq!(ring_area_sqft(&[GeoPoint::new(1.0, 1.0)]), 0.0);
        assert_eq!(
            ring_area_sqft(&[GeoPoint::new(1.0, 1.0), GeoPoint::new(2.0, 2.0)]),
            0.0
        );
    }

    #[test]
    fn test_centroid_of_square() {
        let ring = [
            GeoPoint::new(10.0, 45.0),
            GeoPoint::new(10.001, 45.0),
            GeoPoint::new(10.001, 45.001),
            GeoPoint::new(10.0, 45.001),
        ];
        let c = ring_centroid(&ring);
        assert!((c.lng - 10.0005).abs() < 1e-7);
        assert!((c.lat - 45.0005).abs() < 1e-7);
    }

    #[test]
    fn test_point_in_ring() {
        let ring = [
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(1.0, 0.0),
            GeoPoint::new(1.0, 1.0),
            GeoPoint::new(0.0, 1.0),
        ];
        assert!(point_in_ring(GeoPoint::new(0.5, 0.5), &ring));
        assert!(!point_in_ring(GeoPoint::new(1.5, 0.5), &ring));
        assert!(!point_in_ring(GeoPoint::new(0.5, -0.1), &ring));
    }

    #[test]
    fn test_point_in_concave_ring() {
        // L-shape: the notch at the top-right is outside.
        let ring = [
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(2.0, 0.0),
            GeoPoint::new(2.0, 1.0),
            GeoPoint::new(1.0, 1.0),
            GeoPoint::new(1.0, 2.0),
            GeoPoint::new(0.0, 2.0),
        ];
        assert!(point_in_ring(GeoPoint::new(0.5, 1.5), &ring));
        assert!(!point_in_ring(GeoPoint::new(1.5, 1.5), &ring));
    }
}
