//! Async material suggestion for pins.
//!
//! Matching runs off the main schedule and lands as its own commit when the
//! result arrives, so a slow catalog never stalls pin placement. A pin that
//! was deleted before its result lands is simply skipped.

use bevy::prelude::*;
use bevy::tasks::{AsyncComputeTaskPool, Task};
use futures_lite::future;

use crate::annotations::{PinCategory, Pins};
use crate::sketch::{SketchMutated, SketchMutation};

use super::catalog::{MaterialCatalog, MaterialRef};

#[derive(Message)]
pub struct MaterialMatchRequest {
    pub pin_id: u64,
}

pub struct MatchResult {
    pub pin_id: u64,
    pub material: Option<MaterialRef>,
    pub unit_cost: Option<f64>,
}

#[derive(Component)]
pub struct MaterialMatchTask(pub Task<MatchResult>);

/// Spawns a match task per requested pin against a catalog snapshot.
pub fn request_material_match(
    mut commands: Commands,
    mut requests: MessageReader<MaterialMatchRequest>,
    pins: Res<Pins>,
    catalog: Res<MaterialCatalog>,
) {
    for request in requests.read() {
        let Some(pin) = pins.pins().iter().find(|p| p.id == request.pin_id) else {
            continue;
        };

        let pin_id = pin.id;
        let label = pin.label.clone();
        let category = pin.category;
        let catalog = catalog.clone();

        let task = AsyncComputeTaskPool::get().spawn(async move {
            match_against_catalog(&catalog, pin_id, &label, category)
        });
        commands.spawn(MaterialMatchTask(task));
    }
}

fn match_against_catalog(
    catalog: &MaterialCatalog,
    pin_id: u64,
    label: &str,
    category: PinCategory,
) -> MatchResult {
    let mut candidates = catalog.match_materials(label, category);
    if candidates.is_empty() {
        return MatchResult {
            pin_id,
            material: None,
            unit_cost: None,
        };
    }
    let best = candidates.remove(0);
    let unit_cost = catalog.entry_by_sku(&best.sku).map(|e| e.unit_cost);
    MatchResult {
        pin_id,
        material: Some(best),
        unit_cost,
    }
}

pub fn poll_material_match_tasks(
    mut commands: Commands,
    mut tasks: Query<(Entity, &mut MaterialMatchTask)>,
    mut pins: ResMut<Pins>,
    mut mutations: MessageWriter<SketchMutated>,
) {
    for (entity, mut task) in tasks.iter_mut() {
        let Some(result) = future::block_on(future::poll_once(&mut task.0)) else {
            continue;
        };
        commands.entity(entity).despawn();

        let Some(material) = result.material else {
            debug!("pin {} matched nothing in the catalog", result.pin_id);
            continue;
        };
        let Some(pin) = pins.pin_mut(result.pin_id) else {
            continue;
        };
        // A hand-picked material wins over a late suggestion.
        if pin.material.is_some() {
            continue;
        }

        debug!("pin {} matched material {}", result.pin_id, material.sku);
        pin.material = Some(material);
        pin.unit_cost = result.unit_cost;
        mutations.write(SketchMutated {
            mutation: SketchMutation::PinChanged,
        });
    }
}
