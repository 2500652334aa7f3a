//! Material catalog: the entry list, its JSON loading, and keyword matching.

use std::path::PathBuf;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::annotations::PinCategory;
use crate::config::AppConfig;

/// A catalog entry attached to a pin once matched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialRef {
    pub sku: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub sku: String,
    pub name: String,
    /// Pin category this entry belongs to, by category name.
    pub category: String,
    /// Free-text terms matched against pin labels.
    #[serde(default)]
    pub keywords: Vec<String>,
    pub unit_cost: f64,
    /// Unit the cost applies to ("each", "bundle", "roll").
    pub unit: String,
}

impl CatalogEntry {
    pub fn material_ref(&self) -> MaterialRef {
        MaterialRef {
            sku: self.sku.clone(),
            name: self.name.clone(),
        }
    }
}

#[derive(Resource, Debug, Clone)]
pub struct MaterialCatalog {
    pub entries: Vec<CatalogEntry>,
    pub loaded_from: Option<PathBuf>,
}

impl Default for MaterialCatalog {
    fn default() -> Self {
        Self {
            entries: default_entries(),
            loaded_from: None,
        }
    }
}

impl MaterialCatalog {
    pub fn entry_by_sku(&self, sku: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.sku == sku)
    }

    /// Every entry that scores for a pin, ranked best first.
    ///
    /// Keyword hits in the label outweigh the category fallback, so a
    /// "turbine" pin ranks above the generic vent entry even though both
    /// match the Vent category. Ties keep catalog order.
    pub fn match_materials(&self, label: &str, category: PinCategory) -> Vec<MaterialRef> {
        let label = label.to_lowercase();
        let tokens: Vec<&str> = label
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .collect();
        let category_name = category.display_name().to_lowercase();

        let mut scored: Vec<(&CatalogEntry, u32)> = self
            .entries
            .iter()
            .map(|entry| (entry, score_entry(entry, &label, &tokens, &category_name)))
            .filter(|(_, score)| *score > 0)
            .collect();
        scored.sort_by_key(|(_, score)| std::cmp::Reverse(*score));
        scored
            .into_iter()
            .map(|(entry, _)| entry.material_ref())
            .collect()
    }
}

fn score_entry(entry: &CatalogEntry, label: &str, tokens: &[&str], category_name: &str) -> u32 {
    let mut score = 0;
    for keyword in &entry.keywords {
        let keyword = keyword.to_lowercase();
        if tokens.contains(&keyword.as_str()) {
            score += 3;
        } else if !label.is_empty() && label.contains(&keyword) {
            score += 1;
        }
    }
    if entry.category.eq_ignore_ascii_case(category_name) {
        score += 2;
    }
    score
}

/// Built-in catalog used when no catalog file is configured.
pub fn default_entries() -> Vec<CatalogEntry> {
    let entry = |sku: &str, name: &str, category: &str, keywords: &[&str], cost: f64, unit: &str| {
        CatalogEntry {
            sku: sku.into(),
            name: name.into(),
            category: category.into(),
            keywords: keywords.iter().map(|k| (*k).into()).collect(),
            unit_cost: cost,
            unit: unit.into(),
        }
    };

    vec![
        entry("RF-1001", "Box Vent, Galvanized", "Vent", &["box", "static"], 24.50, "each"),
        entry("RF-1002", "Turbine Vent 12\"", "Vent", &["turbine", "whirlybird"], 58.00, "each"),
        entry("RF-1003", "Pipe Boot Flashing 3\"", "Vent", &["pipe", "boot", "plumbing"], 14.75, "each"),
        entry("RF-1004", "Ridge Vent, 4 ft Section", "Vent", &["ridge"], 21.00, "each"),
        entry("RF-2001", "Skylight Flashing Kit", "Skylight", &["flashing", "kit"], 96.00, "each"),
        entry("RF-2002", "Curb Mount Skylight 2x4", "Skylight", &["curb", "replacement"], 412.00, "each"),
        entry("RF-3001", "Chimney Flashing Set", "Chimney", &["flashing", "counter"], 88.50, "each"),
        entry("RF-3002", "Chimney Cricket Kit", "Chimney", &["cricket", "saddle"], 142.00, "each"),
        entry("RF-4001", "Plywood Decking 1/2\" 4x8", "Hazard", &["rot", "soft", "decking", "plywood"], 38.25, "each"),
        entry("RF-4002", "Ice & Water Shield Roll", "Hazard", &["ice", "leak", "shield"], 104.00, "roll"),
    ]
}

/// Startup system: load the configured catalog file, or the bundled one if
/// present, falling back to the built-in entries otherwise.
pub fn load_catalog_system(config: Res<AppConfig>, mut catalog: ResMut<MaterialCatalog>) {
    let path = match config.data.catalog_path.clone() {
        Some(path) => path,
        None => {
            let bundled = crate::paths::default_catalog_file();
            if !bundled.exists() {
                info!(
                    "No material catalog configured, using {} built-in entries",
                    catalog.entries.len()
                );
                return;
            }
            bundled
        }
    };

    match std::fs::read_to_string(&path) {
        Ok(json) => match serde_json::from_str::<Vec<CatalogEntry>>(&json) {
            Ok(entries) if entries.is_empty() => {
                warn!("Material catalog {:?} is empty, keeping built-in entries", path);
            }
            Ok(entries) => {
                info!("Loaded {} catalog entries from {:?}", entries.len(), path);
                catalog.entries = entries;
                catalog.loaded_from = Some(path);
            }
            Err(e) => {
                warn!("Failed to parse material catalog {:?}: {}", path, e);
            }
        },
        Err(e) => {
            warn!("Failed to read material catalog {:?}: {}", path, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_match_ranks_above_category_fallback() {
        let catalog = MaterialCatalog::default();
        let matches = catalog.match_materials("turbine vent NE corner", PinCategory::Vent);
        assert_eq!(matches.first().map(|m| m.sku.as_str()), Some("RF-1002"));
        // Every vent entry scores at least on category.
        assert!(matches.len() >= 4);
    }

    #[test]
    fn test_category_fallback_without_keywords() {
        let catalog = MaterialCatalog::default();
        let matches = catalog.match_materials("", PinCategory::Skylight);
        assert_eq!(matches.len(), 2);
        assert!(catalog
            .entry_by_sku(&matches[0].sku)
            .is_some_and(|e| e.category == "Skylight"));
    }

    #[test]
    fn test_note_pins_match_nothing() {
        let catalog = MaterialCatalog::default();
        assert!(catalog
            .match_materials("call homeowner", PinCategory::Note)
            .is_empty());
    }

    #[test]
    fn test_match_is_case_insensitive() {
        let catalog = MaterialCatalog::default();
        let matches = catalog.match_materials("TURBINE", PinCategory::Note);
        assert_eq!(matches.first().map(|m| m.sku.as_str()), Some("RF-1002"));
    }

    #[test]
    fn test_catalog_entry_round_trip() {
        let entries = default_entries();
        let json = serde_json::to_string(&entries).unwrap();
        let parsed: Vec<CatalogEntry> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.len(), entries.len());
        assert_eq!(parsed[0].sku, entries[0].sku);
    }
}
