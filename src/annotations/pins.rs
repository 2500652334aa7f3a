use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;
use crate::materials::MaterialRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PinCategory {
    Vent,
    Skylight,
    Chimney,
    Hazard,
    #[default]
    Note,
}

impl PinCategory {
    pub fn display_name(&self) -> &'static str {
        match self {
            PinCategory::Vent => "Vent",
            PinCategory::Skylight => "Skylight",
            PinCategory::Chimney => "Chimney",
            PinCategory::Hazard => "Hazard",
            PinCategory::Note => "Note",
        }
    }

    pub fn all() -> &'static [PinCategory] {
        &[
            PinCategory::Vent,
            PinCategory::Skylight,
            PinCategory::Chimney,
            PinCategory::Hazard,
            PinCategory::Note,
        ]
    }
}

/// A point of interest dropped on the roof: a penetration, an obstacle, or
/// a plain note. Material matching may later attach a catalog item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pin {
    pub id: u64,
    pub position: GeoPoint,
    pub label: String,
    pub category: PinCategory,
    #[serde(default)]
    pub material: Option<MaterialRef>,
    #[serde(default)]
    pub unit_cost: Option<f64>,
}

#[derive(Resource, Default, Debug, Clone, PartialEq)]
pub struct Pins {
    pins: Vec<Pin>,
    next_pin_id: u64,
}

impl Pins {
    pub fn pins(&self) -> &[Pin] {
        &self.pins
    }

    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }

    pub fn add(&mut self, position: GeoPoint, label: String, category: PinCategory) -> u64 {
        let id = self.next_pin_id;
        self.next_pin_id += 1;
        self.pins.push(Pin {
            id,
            position,
            label,
            category,
            material: None,
            unit_cost: None,
        });
        id
    }

    pub fn remove(&mut self, id: u64) -> bool {
        let before = self.pins.len();
        self.pins.retain(|p| p.id != id);
        self.pins.len() != before
    }

    pub fn pin_mut(&mut self, id: u64) -> Option<&mut Pin> {
        self.pins.iter_mut().find(|p| p.id == id)
    }

    /// Wholesale replacement for history restore and file load; the id
    /// counter stays monotonic.
    pub fn set_pins(&mut self, pins: Vec<Pin>) {
        if let Some(max_id) = pins.iter().map(|p| p.id).max() {
            self.next_pin_id = self.next_pin_id.max(max_id + 1);
        }
        self.pins = pins;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_remove() {
        let mut pins = Pins::default();
        let a = pins.add(GeoPoint::new(0.0, 0.0), "vent A".into(), PinCategory::Vent);
        let b = pins.add(GeoPoint::new(0.1, 0.1), String::new(), PinCategory::Note);
        assert_ne!(a, b);
        assert_eq!(pins.pins().len(), 2);
        assert!(pins.remove(a));
        assert!(!pins.remove(a));
        assert_eq!(pins.pins().len(), 1);
        assert_eq!(pins.pins()[0].id, b);
    }

    #[test]
    fn test_set_pins_keeps_id_counter_monotonic() {
        let mut pins = Pins::default();
        let id = pins.add(GeoPoint::new(0.0, 0.0), String::new(), PinCategory::Note);
        let saved = pins.pins().to_vec();
        pins.set_pins(Vec::new());
        pins.set_pins(saved);
        let next = pins.add(GeoPoint::new(1.0, 1.0), String::new(), PinCategory::Note);
        assert!(next > id);
    }
}
