use std::collections::BTreeMap;
use std::fmt;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::facets::FacetKey;

/// Roof slope expressed the trade way, as inches of rise per foot of run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pitch {
    pub rise: u8,
}

impl Pitch {
    pub const fn new(rise: u8) -> Self {
        Self { rise }
    }

    /// Factor by which the sloped surface exceeds its flat footprint.
    pub fn multiplier(self) -> f64 {
        let rise = f64::from(self.rise);
        (144.0 + rise * rise).sqrt() / 12.0
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/12", self.rise)
    }
}

/// Pitch assignments per facet, keyed by fingerprint so they follow the
/// facet through unrelated edits.
#[derive(Resource, Default, Debug, Clone, PartialEq)]
pub struct FacetPitches {
    map: BTreeMap<FacetKey, Pitch>,
}

impl FacetPitches {
    pub fn get(&self, key: FacetKey) -> Option<Pitch> {
        self.map.get(&key).copied()
    }

    /// Assign a pitch; assigning the facet's current pitch clears it.
    /// Returns the pitch now in effect.
    pub fn toggle(&mut self, key: FacetKey, pitch: Pitch) -> Option<Pitch> {
        if self.map.get(&key) == Some(&pitch) {
            self.map.remove(&key);
            None
        } else {
            self.map.insert(key, pitch);
            Some(pitch)
        }
    }

    /// Assign `pitch` to every listed facet that has none yet. Returns how
    /// many assignments were made.
    pub fn apply_to_unset(
        &mut self,
        keys: impl IntoIterator<Item = FacetKey>,
        pitch: Pitch,
    ) -> usize {
        let mut applied = 0;
        for key in keys {
            if let std::collections::btree_map::Entry::Vacant(slot) = self.map.entry(key) {
                slot.insert(pitch);
                applied += 1;
            }
        }
        applied
    }

    pub fn entries(&self) -> &BTreeMap<FacetKey, Pitch> {
        &self.map
    }

    pub fn set_entries(&mut self, entries: BTreeMap<FacetKey, Pitch>) {
        self.map = entries;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiplier_for_common_pitches() {
        assert!((Pitch::new(0).multiplier() - 1.0).abs() < 1e-12);
        // 4/12 and 12/12 are the values printed on every pitch card.
        assert!((Pitch::new(4).multiplier() - 1.0541).abs() < 1e-4);
        assert!((Pitch::new(12).multiplier() - std::f64::consts::SQRT_2).abs() < 1e-12);
    }

    #[test]
    fn test_display_reads_rise_over_twelve() {
        assert_eq!(Pitch::new(6).to_string(), "6/12");
    }

    #[test]
    fn test_toggle_same_pitch_clears() {
        let key = FacetKey(42);
        let mut pitches = FacetPitches::default();
        assert_eq!(pitches.toggle(key, Pitch::new(6)), Some(Pitch::new(6)));
        assert_eq!(pitches.get(key), Some(Pitch::new(6)));
        assert_eq!(pitches.toggle(key, Pitch::new(8)), Some(Pitch::new(8)));
        assert_eq!(pitches.toggle(key, Pitch::new(8)), None);
        assert_eq!(pitches.get(key), None);
    }

    #[test]
    fn test_apply_to_unset_skips_assigned_facets() {
        let mut pitches = FacetPitches::default();
        pitches.toggle(FacetKey(1), Pitch::new(4));
        let applied =
            pitches.apply_to_unset([FacetKey(1), FacetKey(2), FacetKey(3)], Pitch::new(8));
        assert_eq!(applied, 2);
        assert_eq!(pitches.get(FacetKey(1)), Some(Pitch::new(4)));
        assert_eq!(pitches.get(FacetKey(2)), Some(Pitch::new(8)));
        assert_eq!(pitches.get(FacetKey(3)), Some(Pitch::new(8)));
    }
}
