use std::collections::{BTreeMap, BTreeSet};

use bevy::prelude::*;

use crate::facets::FacetKey;

/// Facet is struck from the job entirely.
pub const LABEL_REMOVED: &str = "removed";
/// Flat or near-flat surface quoted with different material.
pub const LABEL_LOW_SLOPE: &str = "low-slope";
/// Facet sits on top of a larger plane and deducts its footprint from it.
pub const LABEL_DORMER: &str = "dormer";

/// Codes with built-in meaning, offered first in the label tool.
pub const RESERVED_CODES: [&str; 3] = [LABEL_REMOVED, LABEL_LOW_SLOPE, LABEL_DORMER];

/// Free-form label codes per facet. Arbitrary codes are allowed alongside
/// the reserved ones; only the reserved codes change how areas roll up.
#[derive(Resource, Default, Debug, Clone, PartialEq)]
pub struct FacetLabels {
    map: BTreeMap<FacetKey, BTreeSet<String>>,
}

impl FacetLabels {
    pub fn codes(&self, key: FacetKey) -> impl Iterator<Item = &String> {
        self.map.get(&key).into_iter().flatten()
    }

    pub fn has(&self, key: FacetKey, code: &str) -> bool {
        self.map.get(&key).is_some_and(|set| set.contains(code))
    }

    /// Toggle a code on a facet. Returns true when the code is present
    /// afterwards.
    pub fn toggle(&mut self, key: FacetKey, code: &str) -> bool {
        let set = self.map.entry(key).or_default();
        let present = if set.contains(code) {
            set.remove(code);
            false
        } else {
            set.insert(code.to_string());
            true
        };
        if set.is_empty() {
            self.map.remove(&key);
        }
        present
    }

    pub fn entries(&self) -> &BTreeMap<FacetKey, BTreeSet<String>> {
        &self.map
    }

    pub fn set_entries(&mut self, entries: BTreeMap<FacetKey, BTreeSet<String>>) {
        self.map = entries;
    }
}
