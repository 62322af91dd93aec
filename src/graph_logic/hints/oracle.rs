//! The hint oracle (C10): pure read-side queries over a finished
//! placement. Grounded in `examples/original_source/graph_logic/hints.py`'s
//! `get_sots_items`/`get_useful_items`/`get_barren_regions`/
//! `calculate_playthrough_progression_spheres`, reworked against this
//! crate's `aggregate_required_items` and `restricted_test` instead of the
//! original's ad hoc item-removal loop.

use std::collections::{BTreeMap, HashSet};

use crate::error::RandoError;
use crate::graph_logic::bits::inventory::Inventory;
use crate::graph_logic::bits::registry::BitId;
use crate::graph_logic::logic::facade::Logic;
use crate::graph_logic::requirement::vector::RequirementVector;
use crate::graph_logic::solver::aggregate::aggregate_required_items;
use crate::utils::prelude::*;

/// Wraps a finished `Logic`, adding `HintBypass` to its inventory once up
/// front — per the Open Question resolution, every hint query runs as if
/// the solver has bypassed hint-gated checks, not just the SotS test.
pub struct HintOracle {
    logic: Logic,
}

impl HintOracle {
    pub fn new(mut logic: Logic) -> Result<HintOracle> {
        logic.add_item("HintBypass")?;
        Ok(HintOracle { logic })
    }

    pub fn logic(&self) -> &Logic {
        &self.logic
    }

    fn bit(&self, name: &str) -> Result<BitId> {
        self.logic
            .world()
            .registry
            .get(name)
            .ok_or_else(|| RandoError::config(format!("unknown bit name '{name}'")))
    }

    /// Every inventory item whose removal (with no other bans) makes
    /// `target` unreachable.
    pub fn get_sots_items(&mut self, target: &str) -> Result<Vec<String>> {
        let target_bit = self.bit(target)?;
        let item_copy_bits = self.logic.world().item_copy_bits.clone();
        let mut sots = Vec::new();
        for bits in item_copy_bits.values() {
            for &bit in bits {
                if !self.logic.full_inventory().contains(bit) {
                    continue;
                }
                if !self.logic.restricted_test(&[bit], target_bit) {
                    sots.push(self.logic.world().registry.name(bit).to_string());
                }
            }
        }
        Ok(sots)
    }

    /// The aggregate union of conjuncts that witness `target`'s reachable
    /// closure, intersected with the item catalog.
    pub fn get_useful_items(&mut self, target: &str) -> Result<Vec<String>> {
        let target_bit = self.bit(target)?;
        if !self.logic.full_inventory().contains(target_bit) {
            return Ok(Vec::new());
        }
        let aggregate = aggregate_required_items(self.logic.requirements(), self.logic.full_inventory());
        let item_copy_bits = self.logic.world().item_copy_bits.clone();
        let mut useful = Vec::new();
        for bits in item_copy_bits.values() {
            for &bit in bits {
                if aggregate.contains(bit) {
                    useful.push(self.logic.world().registry.name(bit).to_string());
                }
            }
        }
        Ok(useful)
    }

    /// Splits hint regions into `(barren-but-reachable, inaccessible)`:
    /// a region is barren if at least one of its checks is reachable but
    /// none holds a useful item for `target`; inaccessible regions hold
    /// no reachable check at all.
    pub fn get_barren_regions(&mut self, target: &str) -> Result<(Vec<String>, Vec<String>)> {
        let useful: HashSet<String> = self.get_useful_items(target)?.into_iter().collect();
        let hint_regions = self.logic.world().hint_regions.clone();
        let location_bits = self.logic.world().location_bits.clone();

        let mut region_reachable: BTreeMap<String, bool> = BTreeMap::new();
        let mut region_useful: BTreeMap<String, bool> = BTreeMap::new();

        for (location, region) in &hint_regions {
            let Some(&bit) = location_bits.get(location) else { continue };
            region_reachable.entry(region.clone()).or_insert(false);
            region_useful.entry(region.clone()).or_insert(false);
            if !self.logic.full_inventory().contains(bit) {
                continue;
            }
            *region_reachable.get_mut(region).unwrap() = true;
            if let Some(item) = self.logic.placement().item_at(location) {
                if useful.contains(item) {
                    *region_useful.get_mut(region).unwrap() = true;
                }
            }
        }

        let mut barren = Vec::new();
        let mut inaccessible = Vec::new();
        for (region, reachable) in region_reachable {
            if !reachable {
                inaccessible.push(region);
            } else if !region_useful[&region] {
                barren.push(region);
            }
        }
        Ok((barren, inaccessible))
    }

    /// Advances a fresh copy of the starting inventory one relaxation
    /// wave at a time (never to full saturation in one step) and records,
    /// per wave, which checks newly became reachable. Stops once a wave
    /// adds nothing.
    pub fn calculate_playthrough_progression_spheres(&self) -> Vec<Vec<String>> {
        let requirements = self.logic.requirements().clone();
        let location_bits = self.logic.world().location_bits.clone();
        let mut inventory = self.logic.inventory().clone();
        let mut spheres = Vec::new();

        loop {
            let next = relax_one_wave(&requirements, &inventory);
            if next == inventory {
                break;
            }
            let mut sphere: Vec<String> = location_bits
                .iter()
                .filter(|(_, &bit)| !inventory.contains(bit) && next.contains(bit))
                .map(|(name, _)| name.clone())
                .collect();
            sphere.sort();
            if !sphere.is_empty() {
                spheres.push(sphere);
            }
            inventory = next;
        }
        spheres
    }
}

/// One non-transitive relaxation pass: every bit whose requirement is
/// satisfied by `inventory` (not by bits this same pass already added)
/// gets added. Distinct from `fill_inventory`, which saturates to the
/// fixed point in a single call.
fn relax_one_wave(requirements: &RequirementVector, inventory: &Inventory) -> Inventory {
    let mut next = inventory.clone();
    for i in 0..requirements.n_bits() {
        let bit = BitId(i);
        if inventory.contains(bit) {
            continue;
        }
        if requirements.get(bit).eval(inventory) {
            next.insert(bit);
        }
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph_logic::logic::settings::LogicSettings;
    use crate::graph_logic::placement::store::Placement;
    use crate::graph_logic::world::area::Area;
    use crate::graph_logic::world::builder::World;
    use crate::graph_logic::world::catalog::{Catalog, CheckEntry};

    fn two_check_world() -> World {
        let mut root = Area::abstract_area("root");
        let mut region = Area::abstract_area("Region");
        region.locations.insert("Chest A".to_string(), "Nothing".to_string());
        region.locations.insert("Chest B".to_string(), "Sword".to_string());
        root.sub_areas.insert("Region".to_string(), region);

        let mut catalog = Catalog::default();
        catalog.checks.push(CheckEntry { full_name: "Region - Chest A".to_string(), hint_region: "Region".to_string(), kind: String::new() });
        catalog.checks.push(CheckEntry { full_name: "Region - Chest B".to_string(), hint_region: "Region".to_string(), kind: String::new() });
        catalog.item_counts.insert("Sword".to_string(), 1);
        catalog.item_counts.insert("Bug Net".to_string(), 1);
        World::build(&root, &catalog).unwrap()
    }

    fn logic_with(world: World, placement: Placement) -> Logic {
        let settings = LogicSettings::new(world.registry.len());
        Logic::new(world, &settings, placement).unwrap()
    }

    #[test]
    fn sword_gating_chest_b_makes_it_sots_for_chest_b() {
        let world = two_check_world();
        let mut placement = Placement::new();
        placement.place_item("Region - Chest A", "Sword").unwrap();
        placement.place_item("Region - Chest B", "Bug Net").unwrap();
        let logic = logic_with(world, placement);
        let mut oracle = HintOracle::new(logic).unwrap();
        let sots = oracle.get_sots_items("Region - Chest B").unwrap();
        assert!(sots.contains(&"Sword".to_string()));
    }

    #[test]
    fn barren_region_has_no_reachable_useful_item() {
        let world = two_check_world();
        let mut placement = Placement::new();
        placement.place_item("Region - Chest A", "Bug Net").unwrap();
        placement.place_item("Region - Chest B", "Sword").unwrap();
        let logic = logic_with(world, placement);
        let mut oracle = HintOracle::new(logic).unwrap();
        let (barren, inaccessible) = oracle.get_barren_regions("Region - Chest B").unwrap();
        assert!(inaccessible.is_empty());
        assert!(!barren.contains(&"Region".to_string()));
    }

    #[test]
    fn progression_spheres_advance_in_non_decreasing_waves() {
        let world = two_check_world();
        let mut placement = Placement::new();
        placement.place_item("Region - Chest A", "Sword").unwrap();
        placement.place_item("Region - Chest B", "Bug Net").unwrap();
        let logic = logic_with(world, placement);
        let oracle = HintOracle::new(logic).unwrap();
        let spheres = oracle.calculate_playthrough_progression_spheres();
        let total: usize = spheres.iter().map(Vec::len).sum();
        assert!(total <= 2);
    }
}
