//! Estimate sheet derived from pinned materials.

use std::collections::BTreeMap;

use crate::annotations::Pins;

#[derive(Debug, Clone, PartialEq)]
pub struct EstimateLine {
    pub sku: String,
    pub name: String,
    pub quantity: usize,
    pub unit_cost: f64,
}

impl EstimateLine {
    pub fn line_total(&self) -> f64 {
        self.unit_cost * self.quantity as f64
    }
}

/// Per-sku rollup of every pin with a matched material. Rebuilt by the UI
/// each frame; cheap at pin counts a roof can hold.
#[derive(Debug, Clone, Default)]
pub struct EstimateSheet {
    pub lines: Vec<EstimateLine>,
    /// Pins with no material attached, surfaced so nothing silently drops
    /// out of a bid.
    pub unmatched_pins: usize,
}

impl EstimateSheet {
    pub fn build(pins: &Pins) -> Self {
        let mut grouped: BTreeMap<&str, EstimateLine> = BTreeMap::new();
        let mut unmatched_pins = 0;

        for pin in pins.pins() {
            let Some(material) = &pin.material else {
                unmatched_pins += 1;
                continue;
            };
            grouped
                .entry(material.sku.as_str())
                .and_modify(|line| line.quantity += 1)
                .or_insert_with(|| EstimateLine {
                    sku: material.sku.clone(),
                    name: material.name.clone(),
                    quantity: 1,
                    unit_cost: pin.unit_cost.unwrap_or(0.0),
                });
        }

        Self {
            lines: grouped.into_values().collect(),
            unmatched_pins,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.lines.iter().map(EstimateLine::line_total).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::PinCategory;
    use crate::geo::GeoPoint;
    use crate::materials::MaterialRef;

    fn pin_with_material(pins: &mut Pins, sku: &str, cost: f64) {
        let id = pins.add(GeoPoint::new(0.0, 0.0), sku.into(), PinCategory::Vent);
        let pin = pins.pin_mut(id).unwrap();
        pin.material = Some(MaterialRef {
            sku: sku.into(),
            name: format!("{sku} item"),
        });
        pin.unit_cost = Some(cost);
    }

    #[test]
    fn test_same_sku_pins_roll_up() {
        let mut pins = Pins::default();
        pin_with_material(&mut pins, "RF-1003", 14.75);
        pin_with_material(&mut pins, "RF-1003", 14.75);
        pin_with_material(&mut pins, "RF-1001", 24.50);

        let sheet = EstimateSheet::build(&pins);
        assert_eq!(sheet.lines.len(), 2);
        let boots = sheet.lines.iter().find(|l| l.sku == "RF-1003").unwrap();
        assert_eq!(boots.quantity, 2);
        assert!((sheet.total() - (2.0 * 14.75 + 24.50)).abs() < 1e-9);
    }

    #[test]
    fn test_unmatched_pins_are_counted_not_priced() {
        let mut pins = Pins::default();
        pins.add(GeoPoint::new(0.0, 0.0), "note".into(), PinCategory::Note);
        pin_with_material(&mut pins, "RF-0000", 10.00);

        let sheet = EstimateSheet::build(&pins);
        assert_eq!(sheet.unmatched_pins, 1);
        assert_eq!(sheet.lines.len(), 1);
    }
}
