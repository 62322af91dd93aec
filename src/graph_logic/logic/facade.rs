//! The logic façade (C6): couples the requirement algebra, the solver,
//! and the placement store behind a small set of mutators that keep the
//! three in lock-step, plus the accessibility queries the backward-fill
//! algorithm and entrance randomizer use as their oracle.

use crate::error::RandoError;
use crate::graph_logic::bits::inventory::Inventory;
use crate::graph_logic::bits::registry::BitId;
use crate::graph_logic::requirement::dnf::DnfRequirement;
use crate::graph_logic::requirement::vector::RequirementVector;
use crate::graph_logic::solver::fill::fill_inventory;
use crate::graph_logic::solver::restricted::RestrictedTestCache;
use crate::graph_logic::world::area::TimeOfDay;
use crate::graph_logic::world::builder::{AreaBits, World};
use crate::graph_logic::placement::store::Placement;
use crate::utils::prelude::*;

use super::settings::LogicSettings;

pub struct Logic {
    world: World,
    requirements: RequirementVector,
    inventory: Inventory,
    full_inventory: Inventory,
    placement: Placement,
    restricted_cache: RestrictedTestCache,
}

impl Logic {
    /// Builds a façade around `world`, overlaying `settings`' runtime
    /// requirements and bans, then installing every edge already present
    /// in `placement` (vanilla pre-placements, starting items) before the
    /// first saturation.
    pub fn new(world: World, settings: &LogicSettings, placement: Placement) -> Result<Logic> {
        let mut requirements = world.requirements.clone();

        for (bit, req) in &settings.runtime_requirements {
            requirements.or_into(*bit, req);
        }

        for &bit in &settings.banned {
            ban_bit(&mut requirements, bit, world.registry.banned());
        }

        let inventory = settings.starting_inventory.union(&settings.frees);

        let mut logic = Logic {
            world,
            requirements,
            inventory,
            full_inventory: Inventory::empty(0),
            placement: Placement::new(),
            restricted_cache: RestrictedTestCache::new(),
        };

        for (location, item) in placement.location_to_item().clone() {
            logic.place_item(&location, &item)?;
        }
        for (exit, entrance) in placement.exit_to_entrance().clone() {
            logic.link_exit(&exit, &entrance)?;
        }
        for item in placement.starting_items().clone() {
            logic.placement.add_starting_item(item);
        }
        for item in placement.unplaced_items().clone() {
            logic.placement.add_unplaced_item(item);
        }

        logic.resaturate();
        Ok(logic)
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn requirements(&self) -> &RequirementVector {
        &self.requirements
    }

    pub fn placement(&self) -> &Placement {
        &self.placement
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn full_inventory(&self) -> &Inventory {
        &self.full_inventory
    }

    fn resaturate(&mut self) {
        self.full_inventory = fill_inventory(&self.requirements, &self.inventory);
        self.restricted_cache.clear();
    }

    fn bit(&self, name: &str) -> Result<BitId> {
        self.world
            .registry
            .get(name)
            .ok_or_else(|| RandoError::config(format!("unknown bit name '{name}'")))
    }

    /// Adds `bit` to the current inventory and re-saturates.
    pub fn add_item(&mut self, item: &str) -> Result<()> {
        let bit = self.bit(item)?;
        self.inventory.insert(bit);
        self.resaturate();
        Ok(())
    }

    /// Removes `bit` from the current inventory and re-saturates. Used by
    /// the backward-fill algorithm: a progression item is removed before
    /// being placed so downstream reachability checks do not treat it as
    /// already in hand.
    pub fn remove_item(&mut self, item: &str) -> Result<()> {
        let bit = self.bit(item)?;
        self.inventory.remove(bit);
        self.resaturate();
        Ok(())
    }

    /// Installs a location assignment: `R[item] = {{loc}}`, clears the
    /// item's opaque flag, records the edge, and re-saturates.
    pub fn place_item(&mut self, location: &str, item: &str) -> Result<()> {
        let loc_bit = self.bit(location)?;
        let item_bit = self.bit(item)?;
        self.placement.place_item(location, item)?;
        self.requirements.set(item_bit, DnfRequirement::single(loc_bit, self.requirements.n_bits()));
        self.requirements.set_opaque(item_bit, false);
        self.resaturate();
        Ok(())
    }

    /// Evicts whatever occupies `location` (restoring its requirement to
    /// `Impossible` first, per §4.6), installs `item`, and returns
    /// the evicted item name (if any) so the caller can recurse on it.
    pub fn replace_item(&mut self, location: &str, item: &str) -> Result<Option<String>> {
        let loc_bit = self.bit(location)?;
        let item_bit = self.bit(item)?;
        let evicted = self.placement.replace_item(location, item)?;
        if let Some(old) = &evicted {
            if let Ok(old_bit) = self.bit(old) {
                self.requirements.set(old_bit, DnfRequirement::impossible());
                self.requirements.set_opaque(old_bit, true);
            }
        }
        self.requirements.set(item_bit, DnfRequirement::single(loc_bit, self.requirements.n_bits()));
        self.requirements.set_opaque(item_bit, false);
        self.resaturate();
        Ok(evicted)
    }

    /// Installs an `exit -> entrance` pairing per the time-of-day matrix
    /// of §4.6, ORing the computed disjunct(s) into the entrance's
    /// bit requirement(s) and recording the pairing.
    pub fn link_exit(&mut self, exit: &str, entrance: &str) -> Result<()> {
        self.placement.link_exit(exit, entrance)?;

        let exit_bits = *self
            .world
            .map_exit_bits
            .get(exit)
            .ok_or_else(|| RandoError::config(format!("unknown exit '{exit}'")))?;
        let entrance_bits = *self
            .world
            .entrance_bits
            .get(entrance)
            .ok_or_else(|| RandoError::config(format!("unknown entrance '{entrance}'")))?;
        let area_name = self.world.exit_to_area.get(exit).cloned();
        let entrance_time = self
            .world
            .entrance_allowed_time
            .get(entrance)
            .copied()
            .unwrap_or(TimeOfDay::Both);

        let area_bits = area_name.as_deref().and_then(|a| self.world.area_bits.get(a)).copied();
        let area_time = area_name.as_deref().and_then(|a| self.world.area_time_of_day.get(a)).copied();

        for (entrance_bit, disjunct) in
            time_matrix_disjuncts(area_bits, area_time, exit_bits, entrance_bits, entrance_time, self.requirements.n_bits())
        {
            self.requirements.set_opaque(entrance_bit, false);
            self.requirements.or_into(entrance_bit, &disjunct);
        }

        self.resaturate();
        Ok(())
    }

    /// ANDs `R[bit]` with `{{Banned}}` so it is reachable only once the
    /// solver's inventory explicitly includes `Banned`.
    pub fn ban_location(&mut self, location: &str) -> Result<()> {
        let bit = self.bit(location)?;
        ban_bit(&mut self.requirements, bit, self.world.registry.banned());
        self.resaturate();
        Ok(())
    }

    /// Every check bit whose full name starts with `area_prefix` and is
    /// currently reachable.
    pub fn accessible_checks(&self, area_prefix: &str) -> Vec<String> {
        self.world
            .location_bits
            .iter()
            .filter(|(name, _)| name.starts_with(area_prefix))
            .filter(|(_, &bit)| self.full_inventory.contains(bit))
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Every map-exit in `pool` that is currently reachable.
    pub fn accessible_exits<'a>(&self, pool: impl IntoIterator<Item = &'a str>) -> Vec<String> {
        pool.into_iter()
            .filter(|exit| {
                self.world
                    .map_exit_bits
                    .get(*exit)
                    .map(|bits| bits.iter().any(|b| self.full_inventory.contains(b)))
                    .unwrap_or(false)
            })
            .map(|s| s.to_string())
            .collect()
    }

    pub fn restricted_test(&mut self, banned: &[BitId], target: BitId) -> bool {
        self.restricted_cache.restricted_test(&self.requirements, &self.inventory, banned, target)
    }

    pub fn restricted_fill(&mut self, banned: &[BitId]) -> Inventory {
        self.restricted_cache.restricted_fill(&self.requirements, &self.inventory, banned)
    }
}

fn ban_bit(requirements: &mut RequirementVector, bit: BitId, banned_bit: BitId) {
    let current = requirements.get(bit).clone();
    let mut gate = Inventory::empty(requirements.n_bits());
    gate.insert(banned_bit);
    let gated = current.and(&DnfRequirement::from_conjunct(gate));
    requirements.set(bit, gated);
}

/// The four-case time-of-day matrix of §4.6: returns the
/// `(entrance_bit, disjunct)` pairs to OR in, one per applicable entrance
/// time-half. Abstract areas (`area_bits`/`area_time` both `None`) skip
/// the time conjunct entirely, contributing just the bare exit bit.
fn time_matrix_disjuncts(
    area_bits: Option<AreaBits>,
    area_time: Option<TimeOfDay>,
    exit_bits: AreaBits,
    entrance_bits: AreaBits,
    entrance_time: TimeOfDay,
    n_bits: usize,
) -> Vec<(BitId, DnfRequirement)> {
    let conjunct = |area_gate: Option<BitId>, exit_bit: BitId| -> DnfRequirement {
        let mut c = Inventory::empty(n_bits);
        c.insert(exit_bit);
        if let Some(gate) = area_gate {
            c.insert(gate);
        }
        DnfRequirement::from_conjunct(c)
    };

    let (Some(area_bits), Some(area_time)) = (area_bits, area_time) else {
        // Abstract area: no time conjunct, one disjunct per entrance half.
        return match entrance_bits {
            AreaBits::Single(eb) => vec![(eb, conjunct(None, exit_half(exit_bits, true)))],
            AreaBits::DayNight { day, night } => vec![
                (day, conjunct(None, exit_half(exit_bits, true))),
                (night, conjunct(None, exit_half(exit_bits, false))),
            ],
        };
    };

    match (area_time, area_bits, entrance_bits) {
        (TimeOfDay::Both, AreaBits::DayNight { day, night }, AreaBits::Single(eb)) => match entrance_time {
            TimeOfDay::DayOnly => vec![(eb, conjunct(Some(day), exit_half(exit_bits, true)))],
            TimeOfDay::NightOnly => vec![(eb, conjunct(Some(night), exit_half(exit_bits, false)))],
            TimeOfDay::Both => unreachable!("Both-time entrance always yields two entrance bits"),
        },
        (TimeOfDay::Both, AreaBits::DayNight { day, night }, AreaBits::DayNight { day: ed, night: en }) => {
            vec![
                (ed, conjunct(Some(day), exit_half(exit_bits, true))),
                (en, conjunct(Some(night), exit_half(exit_bits, false))),
            ]
        }
        (TimeOfDay::DayOnly, AreaBits::Single(area_bit), AreaBits::Single(eb))
            if matches!(entrance_time, TimeOfDay::DayOnly) =>
        {
            vec![(eb, conjunct(Some(area_bit), exit_half(exit_bits, true)))]
        }
        (TimeOfDay::DayOnly, AreaBits::Single(_), AreaBits::Single(_))
            if matches!(entrance_time, TimeOfDay::NightOnly) =>
        {
            vec![] // area day-only, entrance night-only -> impossible.
        }
        (TimeOfDay::DayOnly, AreaBits::Single(area_bit), AreaBits::DayNight { day: ed, night: _ }) => {
            vec![(ed, conjunct(Some(area_bit), exit_half(exit_bits, true)))]
        }
        (TimeOfDay::NightOnly, AreaBits::Single(area_bit), AreaBits::Single(eb))
            if matches!(entrance_time, TimeOfDay::NightOnly) =>
        {
            vec![(eb, conjunct(Some(area_bit), exit_half(exit_bits, false)))]
        }
        (TimeOfDay::NightOnly, AreaBits::Single(_), AreaBits::Single(_))
            if matches!(entrance_time, TimeOfDay::DayOnly) =>
        {
            vec![] // area night-only, entrance day-only -> impossible.
        }
        (TimeOfDay::NightOnly, AreaBits::Single(area_bit), AreaBits::DayNight { day: _, night: en }) => {
            vec![(en, conjunct(Some(area_bit), exit_half(exit_bits, false)))]
        }
        _ => vec![],
    }
}

fn exit_half(exit_bits: AreaBits, day: bool) -> BitId {
    match exit_bits {
        AreaBits::Single(b) => b,
        AreaBits::DayNight { day: d, night: n } => {
            if day {
                d
            } else {
                n
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph_logic::world::area::Area;
    use crate::graph_logic::world::catalog::{Catalog, CheckEntry, TransitionEntry};

    fn tiny_world() -> World {
        let mut root = Area::abstract_area("root");
        let mut skyloft = Area::abstract_area("Skyloft");
        skyloft.locations.insert("Chest".to_string(), "Nothing".to_string());
        root.sub_areas.insert("Skyloft".to_string(), skyloft);

        let mut catalog = Catalog::default();
        catalog.checks.push(CheckEntry { full_name: "Skyloft - Chest".to_string(), hint_region: "Skyloft".to_string(), kind: String::new() });
        catalog.map_exits.push(TransitionEntry {
            full_name: "Skyloft Exit".to_string(),
            area: "Skyloft".to_string(),
            allowed_time_of_day: TimeOfDay::Both,
            pool: "".to_string(),
        });
        catalog.entrances.push(TransitionEntry {
            full_name: "Faron Woods Entrance".to_string(),
            area: "Faron Woods".to_string(),
            allowed_time_of_day: TimeOfDay::DayOnly,
            pool: "".to_string(),
        });
        catalog.item_counts.insert("Longshot".to_string(), 1);

        World::build(&root, &catalog).unwrap()
    }

    #[test]
    fn place_item_makes_the_check_reflect_in_accessible_checks() {
        let world = tiny_world();
        let n = world.registry.len();
        let settings = LogicSettings::new(n);
        let mut logic = Logic::new(world, &settings, Placement::new()).unwrap();
        logic.place_item("Skyloft - Chest", "Longshot").unwrap();
        assert!(logic.full_inventory().contains(logic.bit("Longshot").unwrap()));
        assert!(logic.accessible_checks("Skyloft").contains(&"Skyloft - Chest".to_string()));
    }

    #[test]
    fn link_exit_day_only_entrance_sets_the_day_disjunct() {
        let world = tiny_world();
        let n = world.registry.len();
        let settings = LogicSettings::new(n);
        let mut logic = Logic::new(world, &settings, Placement::new()).unwrap();
        logic.link_exit("Skyloft Exit", "Faron Woods Entrance").unwrap();
        assert_eq!(logic.placement().exit_for("Faron Woods Entrance"), Some("Skyloft Exit"));
    }

    #[test]
    fn replace_item_with_no_prior_occupant_behaves_like_place_item() {
        let world = tiny_world();
        let n = world.registry.len();
        let settings = LogicSettings::new(n);
        let mut logic = Logic::new(world, &settings, Placement::new()).unwrap();
        let evicted = logic.replace_item("Skyloft - Chest", "Longshot").unwrap();
        assert_eq!(evicted, None);
        assert_eq!(logic.placement().item_at("Skyloft - Chest"), Some("Longshot"));
    }
}
