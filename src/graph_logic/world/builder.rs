//! Turns the parsed area tree plus catalogs into the frozen bit registry
//! and its flat per-bit `RequirementVector`, per the build order and
//! per-area rules of the world builder.

use crate::error::RandoError;
use crate::graph_logic::bits::inventory::Inventory;
use crate::graph_logic::bits::registry::{BitId, BitRegistry};
use crate::graph_logic::requirement::dnf::DnfRequirement;
use crate::graph_logic::requirement::parse::{parse_requirement, BitResolver};
use crate::graph_logic::requirement::vector::RequirementVector;
use crate::graph_logic::world::area::{Area, TimeOfDay};
use crate::graph_logic::world::catalog::Catalog;
use crate::graph_logic::world::names;
use crate::utils::prelude::*;

/// Either a single accessibility bit (area is DayOnly/NightOnly, or an
/// abstract area) or a day/night pair (area is `Both`).
#[derive(Clone, Copy, Debug)]
pub enum AreaBits {
    Single(BitId),
    DayNight { day: BitId, night: BitId },
}

/// The frozen, read-only result of a successful build: the registry, the
/// computed requirements, opaque flags, and the lookup tables the rest of
/// the system needs (entrance/exit area ownership, item copy bits, check
/// addresses).
#[derive(Clone)]
pub struct World {
    pub registry: BitRegistry,
    pub requirements: RequirementVector,
    pub item_copy_bits: BTreeMap<String, Vec<BitId>>,
    pub location_bits: BTreeMap<String, BitId>,
    pub area_bits: BTreeMap<String, AreaBits>,
    /// Each non-abstract area's own time-of-day mode. `AreaBits` alone
    /// cannot tell a `DayOnly` area from a `NightOnly` one (both are a
    /// single bit), so entrance/exit linkage (§4.6's time-of-day matrix)
    /// needs this alongside `area_bits`.
    pub area_time_of_day: BTreeMap<String, TimeOfDay>,
    pub exit_to_area: BTreeMap<String, String>,
    pub entrance_to_area: BTreeMap<String, String>,
    pub entrance_allowed_time: BTreeMap<String, TimeOfDay>,
    pub entrance_bits: BTreeMap<String, AreaBits>,
    pub map_exit_bits: BTreeMap<String, AreaBits>,
    pub hint_regions: BTreeMap<String, String>,
    /// Each check's comma-separated `kind` tags, split and trimmed, keyed
    /// by full address — the axis `banned-types` matches against,
    /// distinct from `hint_regions`.
    pub location_types: BTreeMap<String, Vec<String>>,
    /// Non-empty `pool` tags from the catalog's transitions, grouped into
    /// `(exit full names, entrance full names)` — the raw material the
    /// entrance randomizer (C8) filters through `EntrancePool::build`.
    pub pools: BTreeMap<String, (Vec<String>, Vec<String>)>,
}

struct WorldResolver<'a> {
    registry: &'a BitRegistry,
    item_copy_bits: &'a BTreeMap<String, Vec<BitId>>,
}

impl<'a> BitResolver for WorldResolver<'a> {
    fn resolve_single(&self, name: &str) -> Result<BitId> {
        if let Some(id) = self.registry.get(name) {
            return Ok(id);
        }
        if let Some(id) = self.registry.get(&format!("[Option] {name}")) {
            return Ok(id);
        }
        if let Some(id) = self.registry.get(&format!("[Trick] {name}")) {
            return Ok(id);
        }
        Err(RandoError::config(format!("requirement text references unknown name '{name}'")))
    }

    fn copy_bits(&self, item_name: &str) -> Option<&[BitId]> {
        self.item_copy_bits.get(item_name).map(|v| v.as_slice())
    }

    fn n_bits(&self) -> usize {
        self.registry.len()
    }
}

impl World {
    pub fn build(root: &Area, catalog: &Catalog) -> Result<World> {
        let mut registry = BitRegistry::new();

        // Step 2: item copies.
        let mut item_copy_bits: BTreeMap<String, Vec<BitId>> = BTreeMap::new();
        for (item, &count) in &catalog.item_counts {
            let count = count.max(1);
            let bits: Vec<BitId> = if count == 1 {
                vec![registry.intern(item)]
            } else {
                (1..=count).map(|i| registry.intern(format!("{item} #{i}"))).collect()
            };
            item_copy_bits.insert(item.clone(), bits);
        }

        // Step 3: options and tricks.
        for name in &catalog.option_names {
            registry.intern(format!("[Option] {name}"));
        }
        for name in &catalog.trick_names {
            registry.intern(format!("[Trick] {name}"));
        }

        // Step 4: every location (check or event) gets a bit, named by its
        // full dash-joined address.
        let mut location_bits: BTreeMap<String, BitId> = BTreeMap::new();
        collect_location_bits(root, &[], &mut registry, &mut location_bits);

        // Step 5: area time bits.
        let mut area_bits: BTreeMap<String, AreaBits> = BTreeMap::new();
        let mut area_time_of_day: BTreeMap<String, TimeOfDay> = BTreeMap::new();
        collect_area_bits(root, &[], &mut registry, &mut area_bits, &mut area_time_of_day);

        // Step 6: map-exits and entrances.
        let mut map_exit_bits = BTreeMap::new();
        let mut exit_to_area = BTreeMap::new();
        for entry in &catalog.map_exits {
            let bits = intern_transition_bits(&mut registry, &entry.full_name, entry.allowed_time_of_day);
            map_exit_bits.insert(entry.full_name.clone(), bits);
            exit_to_area.insert(entry.full_name.clone(), entry.area.clone());
        }
        let mut entrance_bits = BTreeMap::new();
        let mut entrance_to_area = BTreeMap::new();
        let mut entrance_allowed_time = BTreeMap::new();
        for entry in &catalog.entrances {
            let bits = intern_transition_bits(&mut registry, &entry.full_name, entry.allowed_time_of_day);
            entrance_bits.insert(entry.full_name.clone(), bits);
            entrance_to_area.insert(entry.full_name.clone(), entry.area.clone());
            entrance_allowed_time.insert(entry.full_name.clone(), entry.allowed_time_of_day);
        }

        registry.freeze();

        let mut requirements = RequirementVector::new(registry.len());

        // Entrances and location/item bits are opaque until placement
        // assigns them something concrete.
        for bit in item_copy_bits.values().flat_map(|v| v.iter()) {
            requirements.set_opaque(*bit, true);
        }
        for bits in entrance_bits.values() {
            for b in bits.iter() {
                requirements.set_opaque(b, true);
            }
        }

        let resolver = WorldResolver { registry: &registry, item_copy_bits: &item_copy_bits };

        let global_day = registry.day();
        let global_night = registry.night();

        build_area_requirements(
            root,
            &[],
            &registry,
            &resolver,
            &location_bits,
            &area_bits,
            &mut requirements,
            global_day,
            global_night,
        )?;

        // Entrances feed their rooted area's time bit(s).
        for (entrance, area_name) in &entrance_to_area {
            let Some(&area_bit) = area_bits.get(area_name) else { continue };
            let entrance_bit = entrance_bits[entrance];
            or_into_matching_time(&mut requirements, area_bit, entrance_bit);
        }

        // Map-exits get the rooting area's access requirement baked in,
        // same shape as a location.
        for entry in &catalog.map_exits {
            let Some(&area_bit) = area_bits.get(&entry.area) else { continue };
            let exit_bit = map_exit_bits[&entry.full_name];
            let trivial = DnfRequirement::trivial(registry.len());
            let contribution = time_gated(&trivial, area_bit, global_day, global_night);
            match exit_bit {
                AreaBits::Single(b) => requirements.or_into(b, &contribution),
                AreaBits::DayNight { day, night } => {
                    requirements.or_into(day, &contribution);
                    requirements.or_into(night, &contribution);
                }
            }
        }

        let mut pools: BTreeMap<String, (Vec<String>, Vec<String>)> = BTreeMap::new();
        for entry in &catalog.map_exits {
            if entry.pool.is_empty() {
                continue;
            }
            pools.entry(entry.pool.clone()).or_default().0.push(entry.full_name.clone());
        }
        for entry in &catalog.entrances {
            if entry.pool.is_empty() {
                continue;
            }
            pools.entry(entry.pool.clone()).or_default().1.push(entry.full_name.clone());
        }

        Ok(World {
            registry,
            requirements,
            item_copy_bits,
            location_bits,
            area_bits,
            area_time_of_day,
            exit_to_area,
            entrance_to_area,
            entrance_allowed_time,
            entrance_bits,
            map_exit_bits,
            hint_regions: catalog
                .checks
                .iter()
                .map(|c| (c.full_name.clone(), c.hint_region.clone()))
                .collect(),
            location_types: catalog
                .checks
                .iter()
                .map(|c| {
                    let tags = c.kind.split(',').map(str::trim).filter(|t| !t.is_empty()).map(str::to_string).collect();
                    (c.full_name.clone(), tags)
                })
                .collect(),
            pools,
        })
    }

    pub fn resolver(&self) -> impl BitResolver + '_ {
        WorldResolver { registry: &self.registry, item_copy_bits: &self.item_copy_bits }
    }

    pub fn search(&self, root: &Area, base: &str, partial: &str) -> Result<(String, Vec<String>)> {
        names::search_area(root, base, partial)
    }
}

/// `path` is already `area`'s own full address (empty for the tree's
/// outermost root, which is never itself addressable). Children's
/// addresses are built by appending their own name, so the root's name
/// never appears in any bit name.
fn collect_location_bits(
    area: &Area,
    path: &[String],
    registry: &mut BitRegistry,
    out: &mut BTreeMap<String, BitId>,
) {
    for loc in area.locations.keys() {
        let full = if path.is_empty() { loc.clone() } else { format!("{}{}{}", path.join(names::SEP), names::SEP, loc) };
        out.insert(full.clone(), registry.intern(full));
    }
    for sub in area.sub_areas.values() {
        let mut sub_path = path.to_vec();
        sub_path.push(sub.name.clone());
        collect_location_bits(sub, &sub_path, registry, out);
    }
}

/// Same addressing convention as `collect_location_bits`.
fn collect_area_bits(
    area: &Area,
    path: &[String],
    registry: &mut BitRegistry,
    out: &mut BTreeMap<String, AreaBits>,
    time_out: &mut BTreeMap<String, TimeOfDay>,
) {
    let full = path.join(names::SEP);
    if !area.is_abstract {
        let bits = if area.time_of_day().is_both() {
            AreaBits::DayNight {
                day: registry.intern(format!("{full}::make_day")),
                night: registry.intern(format!("{full}::make_night")),
            }
        } else {
            AreaBits::Single(registry.intern(full.clone()))
        };
        time_out.insert(full.clone(), area.time_of_day());
        out.insert(full, bits);
    }
    for sub in area.sub_areas.values() {
        let mut sub_path = path.to_vec();
        sub_path.push(sub.name.clone());
        collect_area_bits(sub, &sub_path, registry, out, time_out);
    }
}

fn intern_transition_bits(registry: &mut BitRegistry, full_name: &str, time: TimeOfDay) -> AreaBits {
    if time.is_both() {
        AreaBits::DayNight {
            day: registry.intern(format!("{full_name}::day")),
            night: registry.intern(format!("{full_name}::night")),
        }
    } else {
        AreaBits::Single(registry.intern(full_name))
    }
}

impl AreaBits {
    pub fn iter(self) -> impl Iterator<Item = BitId> {
        match self {
            AreaBits::Single(b) => vec![b].into_iter(),
            AreaBits::DayNight { day, night } => vec![day, night].into_iter(),
        }
    }
}

/// Projects `raw` to day/night halves per `area_bits`' time mode and ANDs
/// each half with the matching area-time bit, then ORs the halves back
/// together (a no-op split for single-time areas).
fn time_gated(
    raw: &DnfRequirement,
    area_bits: AreaBits,
    global_day: BitId,
    global_night: BitId,
) -> DnfRequirement {
    match area_bits {
        AreaBits::Single(b) => {
            let mut gate = Inventory::empty(0);
            gate.insert(b);
            raw.and(&DnfRequirement::from_conjunct(gate))
        }
        AreaBits::DayNight { day, night } => {
            let day_part = raw.day_only(global_day, global_night);
            let night_part = raw.night_only(global_night, global_day);
            let mut day_gate = Inventory::empty(0);
            day_gate.insert(day);
            let mut night_gate = Inventory::empty(0);
            night_gate.insert(night);
            day_part
                .and(&DnfRequirement::from_conjunct(day_gate))
                .or(&night_part.and(&DnfRequirement::from_conjunct(night_gate)))
        }
    }
}

fn or_into_matching_time(requirements: &mut RequirementVector, area_bit: AreaBits, source_bit: AreaBits) {
    match (area_bit, source_bit) {
        (AreaBits::Single(a), AreaBits::Single(s)) => {
            requirements.or_into(a, &DnfRequirement::single(s, 0.max(requirements.n_bits())))
        }
        (AreaBits::DayNight { day, night }, AreaBits::DayNight { day: sd, night: sn }) => {
            requirements.or_into(day, &DnfRequirement::single(sd, requirements.n_bits()));
            requirements.or_into(night, &DnfRequirement::single(sn, requirements.n_bits()));
        }
        (AreaBits::DayNight { day, night }, AreaBits::Single(s)) => {
            requirements.or_into(day, &DnfRequirement::single(s, requirements.n_bits()));
            requirements.or_into(night, &DnfRequirement::single(s, requirements.n_bits()));
        }
        (AreaBits::Single(a), AreaBits::DayNight { day: sd, night: sn }) => {
            requirements.or_into(a, &DnfRequirement::single(sd, requirements.n_bits()));
            requirements.or_into(a, &DnfRequirement::single(sn, requirements.n_bits()));
        }
    }
}

/// `path` is `area`'s own full address, per the convention established by
/// `collect_location_bits`/`collect_area_bits` (empty for the outermost
/// root).
#[allow(clippy::too_many_arguments)]
fn build_area_requirements(
    area: &Area,
    path: &[String],
    registry: &BitRegistry,
    resolver: &dyn BitResolver,
    location_bits: &BTreeMap<String, BitId>,
    area_bits: &BTreeMap<String, AreaBits>,
    requirements: &mut RequirementVector,
    global_day: BitId,
    global_night: BitId,
) -> Result<()> {
    let full = path.join(names::SEP);

    let this_area_bits = if area.is_abstract { None } else { area_bits.get(&full).copied() };

    if area.can_sleep && area.time_of_day().is_both() {
        if let Some(AreaBits::DayNight { day, night }) = this_area_bits {
            requirements.or_into(day, &DnfRequirement::single(night, registry.len()));
            requirements.or_into(night, &DnfRequirement::single(day, registry.len()));
        }
    }

    for (loc, text) in &area.locations {
        let raw = parse_requirement(text, resolver)?;
        let full_loc = if full.is_empty() { loc.clone() } else { format!("{full}{}{loc}", names::SEP) };
        let Some(&loc_bit) = location_bits.get(&full_loc) else { continue };
        let gated = match this_area_bits {
            Some(ab) => time_gated(&raw, ab, global_day, global_night),
            None => raw,
        };
        requirements.or_into(loc_bit, &gated);
    }

    for (_, spec) in &area.exits {
        let raw = parse_requirement(&spec.requirement, resolver)?;
        let gated = match this_area_bits {
            Some(ab) => time_gated(&raw, ab, global_day, global_night),
            None => raw,
        };
        if let Some(&target_bits) = area_bits.get(&spec.target) {
            match target_bits {
                AreaBits::Single(b) => requirements.or_into(b, &gated),
                AreaBits::DayNight { day, night } => {
                    requirements.or_into(day, &gated);
                    requirements.or_into(night, &gated);
                }
            }
        }
    }

    for sub in area.sub_areas.values() {
        let mut sub_path = path.to_vec();
        sub_path.push(sub.name.clone());
        build_area_requirements(
            sub,
            &sub_path,
            registry,
            resolver,
            location_bits,
            area_bits,
            requirements,
            global_day,
            global_night,
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph_logic::bits::inventory::Inventory;
    use crate::graph_logic::world::area::ExitSpec;
    use crate::graph_logic::world::catalog::{Catalog, CheckEntry, TransitionEntry};
    use crate::graph_logic::world::catalog::GossipStoneEntry;

    #[test]
    fn sleeping_both_way_area_links_day_and_night_bidirectionally() {
        let mut root = Area::abstract_area("root");
        let mut inn = Area::new("Inn");
        inn.can_sleep = true;
        inn.locations.insert("Bed".to_string(), "Nothing".to_string());
        root.sub_areas.insert("Inn".to_string(), inn);

        let mut catalog = Catalog::default();
        catalog.checks.push(CheckEntry { full_name: "Inn - Bed".to_string(), hint_region: "Inn".to_string(), kind: String::new() });
        let world = World::build(&root, &catalog).unwrap();

        let AreaBits::DayNight { day, night } = world.area_bits["Inn"] else { panic!("expected day/night area") };
        let mut only_day = Inventory::empty(world.registry.len());
        only_day.insert(day);
        let fill_from_day = crate::graph_logic::solver::fill::fill_inventory(&world.requirements, &only_day);
        assert!(fill_from_day.contains(night));

        let mut only_night = Inventory::empty(world.registry.len());
        only_night.insert(night);
        let fill_from_night = crate::graph_logic::solver::fill::fill_inventory(&world.requirements, &only_night);
        assert!(fill_from_night.contains(day));
    }

    #[test]
    fn logical_exit_requirement_is_gated_by_the_source_areas_time() {
        let mut root = Area::abstract_area("root");
        let mut a = Area::new("A");
        a.allowed_time_of_day = Some(TimeOfDay::DayOnly);
        let mut b = Area::new("B");
        b.allowed_time_of_day = Some(TimeOfDay::DayOnly);
        b.locations.insert("Chest".to_string(), "Nothing".to_string());
        a.exits.insert("toB".to_string(), ExitSpec { target: "B".to_string(), requirement: "Nothing".to_string() });
        root.sub_areas.insert("A".to_string(), a);
        root.sub_areas.insert("B".to_string(), b);

        let mut catalog = Catalog::default();
        catalog.checks.push(CheckEntry { full_name: "B - Chest".to_string(), hint_region: "B".to_string(), kind: String::new() });
        let world = World::build(&root, &catalog).unwrap();

        let AreaBits::Single(a_bit) = world.area_bits["A"] else { panic!("A should be single-time") };
        let mut inv = Inventory::empty(world.registry.len());
        inv.insert(a_bit);
        let full = crate::graph_logic::solver::fill::fill_inventory(&world.requirements, &inv);
        let AreaBits::Single(b_bit) = world.area_bits["B"] else { panic!("B should be single-time") };
        assert!(full.contains(b_bit));
    }

    #[test]
    fn transitions_with_a_pool_tag_are_grouped_by_pool() {
        let root = Area::abstract_area("root");
        let mut catalog = Catalog::default();
        catalog.map_exits.push(TransitionEntry {
            full_name: "Skyview Exit".to_string(),
            area: "root".to_string(),
            allowed_time_of_day: TimeOfDay::Both,
            pool: "dungeons".to_string(),
        });
        catalog.entrances.push(TransitionEntry {
            full_name: "Skyview Entrance".to_string(),
            area: "root".to_string(),
            allowed_time_of_day: TimeOfDay::Both,
            pool: "dungeons".to_string(),
        });
        catalog.entrances.push(TransitionEntry {
            full_name: "Unpooled Entrance".to_string(),
            area: "root".to_string(),
            allowed_time_of_day: TimeOfDay::Both,
            pool: "".to_string(),
        });
        let world = World::build(&root, &catalog).unwrap();

        let (exits, entrances) = &world.pools["dungeons"];
        assert_eq!(exits, &vec!["Skyview Exit".to_string()]);
        assert_eq!(entrances, &vec!["Skyview Entrance".to_string()]);
        assert!(world.pools.values().all(|(_, e)| !e.contains(&"Unpooled Entrance".to_string())));
    }

    #[test]
    fn gossip_stone_entries_deserialize_round_trip() {
        let entry = GossipStoneEntry { full_name: "Skyloft Stone".to_string(), hint_region: "Skyloft".to_string() };
        let json = serde_json::to_string(&entry).unwrap();
        let back: GossipStoneEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back.full_name, "Skyloft Stone");
    }
}
