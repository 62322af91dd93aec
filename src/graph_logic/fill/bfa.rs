//! The backward-fill algorithm (C9): shuffles progression items, assigns
//! each one to an accessible empty location (or swaps it into an
//! occupied one and recurses on the evicted item), then fills may-be
//! items and finally duplicable junk. Every randomized choice goes
//! through the single injected `rng`, per §4.9's determinism
//! requirement.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::RandoError;
use crate::graph_logic::logic::facade::Logic;
use crate::graph_logic::solver::aggregate::aggregate_required_items;
use crate::utils::prelude::*;

pub struct BackwardFillAlgorithm;

impl BackwardFillAlgorithm {
    /// Runs the full four-step algorithm against `logic`, which must
    /// already have the world, runtime requirements, bans, and any
    /// vanilla pre-placements installed.
    pub fn run(
        logic: &mut Logic,
        must_be_placed_items: &[String],
        may_be_placed_items: &[String],
        duplicable_items: &[String],
        rng: &mut impl Rng,
    ) -> Result<()> {
        // Step 1: the truly-progress subset, shuffled. Per the "assumed
        // fill" style (grounded in
        // `examples/original_source/logic/randomize.py`'s `start_inventory`
        // construction), every item that does not already have a concrete
        // location is pretended to be in hand so `aggregate_required_items`
        // can reveal which of them some other reachable bit actually
        // depends on.
        let mut assumed = logic.inventory().clone();
        for bits in logic.world().item_copy_bits.values() {
            for &bit in bits {
                let name = logic.world().registry.name(bit);
                if !logic.placement().item_to_location().contains_key(name) {
                    assumed.insert(bit);
                }
            }
        }
        let aggregate = aggregate_required_items(logic.requirements(), &assumed);
        let must_be_set: HashSet<&str> = must_be_placed_items.iter().map(String::as_str).collect();
        let mut progress: Vec<String> = aggregate
            .iter()
            .map(|bit| logic.world().registry.name(bit).to_string())
            .filter(|name| must_be_set.contains(name.as_str()))
            .collect();
        progress.shuffle(rng);

        // Step 2: place each progress item, removing it from the
        // inventory first so downstream reachability checks see it as
        // not yet obtained.
        for item in progress {
            place_one(logic, &item, true, rng)
                .with_context(|| format!("placing progression item '{item}'"))?;
        }

        // Step 3: open up banned locations, then place everything left in
        // `must_be_placed_items` (none of these may fail), then may-be
        // items best-effort.
        let banned_name = logic.world().registry.name(logic.world().registry.banned()).to_string();
        logic.add_item(&banned_name).ok();
        let already_placed: HashSet<String> = logic.placement().item_to_location().keys().cloned().collect();
        for item in must_be_placed_items {
            if already_placed.contains(item) || logic.placement().unplaced_items().contains(item) {
                continue;
            }
            place_one(logic, item, false, rng)
                .with_context(|| format!("placing remaining must-be item '{item}'"))?;
        }

        let mut maybes: Vec<String> = may_be_placed_items.to_vec();
        maybes.shuffle(rng);
        for item in maybes {
            if logic.placement().item_to_location().contains_key(&item) {
                continue;
            }
            let _ = place_one(logic, &item, false, rng);
        }

        // Step 4: fill every still-empty accessible location from the
        // duplicable bag, with replacement.
        if !duplicable_items.is_empty() {
            loop {
                let empty = empty_accessible(logic, "");
                let Some(loc) = empty.first() else { break };
                let item = duplicable_items.choose(rng).expect("non-empty duplicable bag");
                logic.place_item(loc, item)?;
            }
        }

        Ok(())
    }
}

fn empty_accessible(logic: &Logic, prefix: &str) -> Vec<String> {
    logic
        .accessible_checks(prefix)
        .into_iter()
        .filter(|loc| logic.placement().item_at(loc).is_none())
        .collect()
}

/// Places `item` into an accessible empty location if one exists;
/// otherwise swaps it into a random accessible occupied location and
/// recurses on the evicted occupant. Fails only when no location — empty
/// or occupied — is accessible at all.
fn place_one(logic: &mut Logic, item: &str, remove_after_place: bool, rng: &mut impl Rng) -> Result<()> {
    let prefix = logic.placement().placement_limit(item).unwrap_or("").to_string();
    let accessible = logic.accessible_checks(&prefix);
    let empty: Vec<String> =
        accessible.iter().filter(|loc| logic.placement().item_at(loc).is_none()).cloned().collect();

    if let Some(loc) = empty.choose(rng) {
        logic.place_item(loc, item)?;
        if remove_after_place {
            logic.remove_item(item)?;
        }
        return Ok(());
    }

    let Some(loc) = accessible.choose(rng) else {
        return Err(RandoError::generation_failed(format!(
            "item '{item}' has neither an empty nor an accessible occupied location"
        )));
    };
    let evicted = logic.replace_item(loc, item)?;
    if remove_after_place {
        logic.remove_item(item)?;
    }
    if let Some(old) = evicted {
        place_one(logic, &old, false, rng)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph_logic::logic::settings::LogicSettings;
    use crate::graph_logic::placement::store::Placement;
    use crate::graph_logic::world::area::Area;
    use crate::graph_logic::world::builder::World;
    use crate::graph_logic::world::catalog::{Catalog, CheckEntry};
    use rand::SeedableRng;

    fn three_check_world() -> World {
        let mut root = Area::abstract_area("root");
        let mut region = Area::abstract_area("Region");
        for i in 1..=3 {
            region.locations.insert(format!("Chest {i}"), "Nothing".to_string());
        }
        root.sub_areas.insert("Region".to_string(), region);

        let mut catalog = Catalog::default();
        for i in 1..=3 {
            catalog
                .checks
                .push(CheckEntry {
                    full_name: format!("Region - Chest {i}"),
                    hint_region: "Region".to_string(),
                    kind: String::new(),
                });
        }
        catalog.item_counts.insert("Sword".to_string(), 1);
        catalog.item_counts.insert("Shield".to_string(), 1);
        World::build(&root, &catalog).unwrap()
    }

    #[test]
    fn places_every_must_be_item_when_enough_locations_exist() {
        let world = three_check_world();
        let n = world.registry.len();
        let mut settings = LogicSettings::new(n);
        settings.starting_inventory.insert(world.registry.hint_bypass());
        let mut logic = Logic::new(world, &settings, Placement::new()).unwrap();

        let must_be = vec!["Sword".to_string(), "Shield".to_string()];
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        BackwardFillAlgorithm::run(&mut logic, &must_be, &[], &["Rupee".to_string()], &mut rng).unwrap();

        assert!(logic.placement().location_of("Sword").is_some());
        assert!(logic.placement().location_of("Shield").is_some());
    }

    #[test]
    fn fills_remaining_empty_locations_with_duplicable_junk() {
        let world = three_check_world();
        let n = world.registry.len();
        let mut settings = LogicSettings::new(n);
        settings.starting_inventory.insert(world.registry.hint_bypass());
        let mut logic = Logic::new(world, &settings, Placement::new()).unwrap();

        let must_be = vec!["Sword".to_string()];
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        BackwardFillAlgorithm::run(&mut logic, &must_be, &[], &["Rupee".to_string()], &mut rng).unwrap();

        for i in 1..=3 {
            assert!(logic.placement().item_at(&format!("Region - Chest {i}")).is_some());
        }
    }
}
