//! Metabolism system - livers consume reagents through registered effects

use hecs::{Entity, World};

use crate::components::Liver;
use crate::registry::ReagentRegistry;
use reagent_logic::ReagentUnit;

/// Run one metabolism pass over a liver. Returns the units removed.
///
/// Deltas are computed against the reagent list as it stands, then
/// applied in a second pass. When a reagent has several effects only the
/// last one's result counts.
pub fn metabolize(
    liver: &mut Liver,
    owner: Entity,
    registry: &ReagentRegistry,
    elapsed: f32,
) -> ReagentUnit {
    if liver.internal().is_empty() {
        return 0;
    }

    // Collect deltas while the solution is only borrowed immutably
    let mut deltas: Vec<(String, ReagentUnit)> = Vec::new();
    for reagent in liver.internal().reagents() {
        let Some(prototype) = registry.lookup(&reagent.reagent_id) else {
            continue;
        };

        let mut delta = None;
        for effect in prototype.metabolism() {
            delta = Some(effect.metabolize(owner, &reagent.reagent_id, elapsed));
        }
        if let Some(delta) = delta {
            deltas.push((reagent.reagent_id.clone(), delta));
        }
    }

    // Apply changes afterwards
    let solution = liver.internal_mut();
    let mut removed = 0;
    for (reagent_id, delta) in &deltas {
        let taken = solution.remove_reagent(reagent_id, *delta);
        log::trace!("{:?} metabolized {}u of {}", owner, taken, reagent_id);
        removed += taken;
    }
    removed
}

/// Same as [`metabolize`]; the per-tick entry point for a single liver
pub fn on_update(
    liver: &mut Liver,
    owner: Entity,
    registry: &ReagentRegistry,
    elapsed: f32,
) -> ReagentUnit {
    metabolize(liver, owner, registry, elapsed)
}

/// Metabolize every liver in the world
pub fn metabolism_system(world: &mut World, registry: &ReagentRegistry, elapsed: f32) -> ReagentUnit {
    let mut removed = 0;
    for (entity, liver) in world.query_mut::<&mut Liver>() {
        removed += on_update(liver, entity, registry, elapsed);
    }
    removed
}
