//! Material catalog and pin-to-material matching.
//!
//! - [`catalog`] - entry list, JSON loading, keyword scoring
//! - [`matching`] - async suggestion tasks triggered by pin placement
//! - [`estimate`] - per-sku estimate rollup for the side panel

pub mod catalog;
pub mod estimate;
mod matching;

pub use catalog::{CatalogEntry, MaterialCatalog, MaterialRef};
pub use estimate::{EstimateLine, EstimateSheet};
pub use matching::MaterialMatchRequest;

use bevy::prelude::*;

use crate::config::ConfigLoaded;
use crate::history::CommitSet;

pub struct MaterialsPlugin;

impl Plugin for MaterialsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MaterialCatalog>()
            .add_message::<MaterialMatchRequest>()
            .add_systems(Startup, catalog::load_catalog_system.after(ConfigLoaded))
            .add_systems(
                Update,
                (
                    matching::request_material_match
                        .run_if(on_message::<MaterialMatchRequest>),
                    // Applying a result mutates pins, so it commits like any
                    // other mutation.
                    matching::poll_material_match_tasks.in_set(CommitSet::Mutate),
                ),
            );
    }
}
