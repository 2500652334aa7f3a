//! Stable facet identity across recomputation.

use crate::geo::GeoPoint;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Identity of a facet: an FNV-1a hash over its sorted, epsilon-quantized
/// vertex set.
///
/// Any recomputation that reproduces the same vertex set, in any rotation or
/// winding, yields the same key. That is what lets annotations survive edits
/// elsewhere in the sketch: facets that were not touched re-emerge with the
/// same fingerprint and pick their annotations back up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FacetKey(pub u64);

impl FacetKey {
    pub fn from_ring(ring: &[GeoPoint]) -> Self {
        let mut quantized: Vec<(i64, i64)> = ring.iter().map(|p| p.quantized()).collect();
        quantized.sort_unstable();
        quantized.dedup();

        let mut hash = FNV_OFFSET;
        for (x, y) in quantized {
            for byte in x.to_le_bytes().into_iter().chain(y.to_le_bytes()) {
                hash ^= byte as u64;
                hash = hash.wrapping_mul(FNV_PRIME);
            }
        }
        FacetKey(hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> Vec<GeoPoint> {
        vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.001, 0.0),
            GeoPoint::new(0.001, 0.001),
            GeoPoint::new(0.0, 0.001),
        ]
    }

    #[test]
    fn test_key_ignores_rotation_and_winding() {
        let ring = unit_square();
        let rotated: Vec<GeoPoint> = ring[2..].iter().chain(&ring[..2]).copied().collect();
        let reversed: Vec<GeoPoint> = ring.iter().rev().copied().collect();
        let key = FacetKey::from_ring(&ring);
        assert_eq!(key, FacetKey::from_ring(&rotated));
        assert_eq!(key, FacetKey::from_ring(&reversed));
    }

    #[test]
    fn test_key_ignores_duplicated_closing_vertex() {
        let mut closed = unit_square();
        closed.push(closed[0]);
        assert_eq!(
            FacetKey::from_ring(&unit_square()),
            FacetKey::from_ring(&closed)
        );
    }

    #[test]
    fn test_different_rings_have_different_keys() {
        let a = unit_square();
        let mut b = unit_square();
        b[2] = GeoPoint::new(0.002, 0.002);
        assert_ne!(FacetKey::from_ring(&a), FacetKey::from_ring(&b));
    }

    #[test]
    fn test_key_is_stable_under_epsilon_noise() {
        let a = unit_square();
        let b: Vec<GeoPoint> = a
            .iter()
            .map(|p| GeoPoint::new(p.lng + 2e-9, p.lat - 2e-9))
            .collect();
        assert_eq!(FacetKey::from_ring(&a), FacetKey::from_ring(&b));
    }
}
