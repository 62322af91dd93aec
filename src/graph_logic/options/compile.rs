//! The option/banlist compiler (C7): turns a `RandoOptions` plus the
//! built `World` into everything `Logic::new` and the backward-fill
//! algorithm need — a `LogicSettings`, a seeded `Placement`, and the
//! three item lists BFA consumes. Grounded in
//! `examples/original_source/logic/randomize.py`'s option-handling
//! section of `Rando.__init__`, which does the same translation before
//! constructing its logic graph.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::graph_logic::bits::inventory::Inventory;
use crate::graph_logic::bits::registry::BitId;
use crate::graph_logic::logic::settings::LogicSettings;
use crate::graph_logic::placement::store::Placement;
use crate::graph_logic::requirement::dnf::DnfRequirement;
use crate::graph_logic::requirement::parse::parse_requirement;
use crate::graph_logic::world::builder::World;
use crate::utils::prelude::*;

use super::surface::{
    BossKeyMode, GotDungeonRequirement, GotSwordRequirement, MapMode, PreplacementKind, RandoOptions, RupoorMode,
    ShopMode, SmallKeyMode, TriforceShuffle,
};

/// Everything the rest of the pipeline needs out of compiling the
/// options against a built world.
pub struct CompiledOptions {
    pub settings: LogicSettings,
    pub placement: Placement,
    pub required_dungeons: Vec<String>,
    pub must_be_placed_items: Vec<String>,
    pub may_be_placed_items: Vec<String>,
    pub duplicable_items: Vec<String>,
}

impl CompiledOptions {
    pub fn compile(options: &RandoOptions, world: &World, rng: &mut impl Rng) -> Result<CompiledOptions> {
        let n = world.registry.len();
        let mut settings = LogicSettings::new(n);
        let mut placement = Placement::new();

        set_option_bit(world, &mut settings, "OpenThunderhead", options.open_thunderhead);
        set_option_bit(world, &mut settings, "OpenLMF", options.open_lmf);
        set_option_bit(world, &mut settings, "OpenLakeFloria", options.open_lake_floria);
        set_option_bit(world, &mut settings, "OpenET", options.open_et);
        set_option_bit(world, &mut settings, "GoTStart", options.got_start);

        for trick in &options.enabled_tricks_bitless {
            if let Some(bit) = world.registry.get(&format!("[Trick] {trick}")) {
                settings.frees.insert(bit);
            }
        }

        let required_dungeons = pick_required_dungeons(options, rng);

        ban_excluded_locations(world, &mut settings, options);
        ban_unrequired_dungeons(world, &mut settings, options, &required_dungeons);

        add_starting_items(world, &mut settings, options, rng);

        install_vanilla_placements(world, &mut placement, options)?;
        restrict_triforces(&mut placement, options);
        mark_unplaced_items(world, &mut placement, options, &required_dungeons);
        install_endgame_requirements(world, &mut settings, options, &required_dungeons)?;

        if matches!(options.rupoor_mode, RupoorMode::Off) {
            if let Some(bits) = world.item_copy_bits.get("Rupoor") {
                for &bit in bits {
                    placement.add_unplaced_item(world.registry.name(bit).to_string());
                }
            }
        }

        let excluded: std::collections::HashSet<&str> = placement
            .starting_items()
            .iter()
            .map(String::as_str)
            .chain(placement.unplaced_items().iter().map(String::as_str))
            .chain(options.may_be_placed_items.iter().map(String::as_str))
            .chain(options.duplicable_items.iter().map(String::as_str))
            .collect();
        let must_be_placed_items: Vec<String> = world
            .item_copy_bits
            .values()
            .flat_map(|bits| bits.iter())
            .map(|&bit| world.registry.name(bit).to_string())
            .filter(|name| !excluded.contains(name.as_str()) && placement.location_of(name).is_none())
            .collect();

        Ok(CompiledOptions {
            settings,
            placement,
            required_dungeons,
            must_be_placed_items,
            may_be_placed_items: options.may_be_placed_items.clone(),
            duplicable_items: options.duplicable_items.clone(),
        })
    }
}

fn set_option_bit(world: &World, settings: &mut LogicSettings, name: &str, enabled: bool) {
    if !enabled {
        return;
    }
    if let Some(bit) = world.registry.get(&format!("[Option] {name}")) {
        settings.frees.insert(bit);
    }
}

fn pick_required_dungeons(options: &RandoOptions, rng: &mut impl Rng) -> Vec<String> {
    if !matches!(options.got_dungeon_requirement, GotDungeonRequirement::Required) {
        return Vec::new();
    }
    let mut pool = options.dungeon_names.clone();
    pool.shuffle(rng);
    let count = (options.required_dungeon_count as usize).min(pool.len());
    pool.into_iter().take(count).collect()
}

fn ban_excluded_locations(world: &World, settings: &mut LogicSettings, options: &RandoOptions) {
    for location in &options.excluded_locations {
        if let Some(&bit) = world.location_bits.get(location) {
            settings.banned.push(bit);
        }
    }
    // `banned_types` matches a check's `kind` tags, a distinct axis from
    // `hint_region` (graph_logic/randomize.py's `checks[loc]["type"]`).
    for tagged_type in &options.banned_types {
        for (location, types) in &world.location_types {
            if types.iter().any(|t| t == tagged_type) {
                if let Some(&bit) = world.location_bits.get(location) {
                    settings.banned.push(bit);
                }
            }
        }
    }
}

/// Bans the *entrances* of unrequired dungeons, not their interior checks
/// (§4.7, Scenario C) — the entrance is what keeps the dungeon out of
/// logic when it is emptied, mirroring
/// `graph_logic/randomize.py`'s `self.banned.extend(DUNGEON_ENTRANCES[dungeon] ...)`.
/// A dungeon's entrances are identified as every entrance rooted in an
/// area named after the dungeon.
fn ban_unrequired_dungeons(
    world: &World,
    settings: &mut LogicSettings,
    options: &RandoOptions,
    required_dungeons: &[String],
) {
    if !options.empty_unrequired_dungeons {
        return;
    }
    for dungeon in &options.dungeon_names {
        if required_dungeons.contains(dungeon) {
            continue;
        }
        for (entrance, area) in &world.entrance_to_area {
            if area != dungeon {
                continue;
            }
            if let Some(bits) = world.entrance_bits.get(entrance) {
                for bit in bits.iter() {
                    settings.banned.push(bit);
                }
            }
        }
    }
}

fn add_starting_items(world: &World, settings: &mut LogicSettings, options: &RandoOptions, rng: &mut impl Rng) {
    add_copies(world, settings, "Progressive Sword", options.starting_sword as usize);
    add_copies(world, settings, "Heart Container", options.starting_heart_containers as usize);
    add_copies(world, settings, "Heart Piece", options.starting_heart_pieces as usize);
    add_copies(world, settings, "Gratitude Crystal Pack", options.starting_crystal_packs as usize);
    add_copies(world, settings, "Bottle", options.starting_bottles as usize);
    add_copies(world, settings, "Group of Tadtones", options.starting_tadtones as usize);

    let mut tablets: Vec<BitId> =
        world.item_copy_bits.iter().filter(|(name, _)| name.ends_with("Tablet")).flat_map(|(_, b)| b.iter().copied()).collect();
    tablets.shuffle(rng);
    for &bit in tablets.iter().take(options.starting_tablet_count as usize) {
        settings.frees.insert(bit);
    }
}

fn add_copies(world: &World, settings: &mut LogicSettings, item: &str, count: usize) {
    let Some(bits) = world.item_copy_bits.get(item) else { return };
    for &bit in bits.iter().take(count) {
        settings.frees.insert(bit);
    }
}

fn install_vanilla_placements(world: &World, placement: &mut Placement, options: &RandoOptions) -> Result<()> {
    for (item, location, kind) in &options.vanilla_placements {
        let install = match kind {
            PreplacementKind::Crystal => true,
            PreplacementKind::ShopItem => matches!(options.shop_mode, ShopMode::Vanilla),
            PreplacementKind::SmallKey => matches!(options.small_key_mode, SmallKeyMode::Vanilla),
            PreplacementKind::BossKey => matches!(options.boss_key_mode, BossKeyMode::Vanilla),
            PreplacementKind::Map => matches!(options.map_mode, MapMode::Vanilla),
            PreplacementKind::Tadtones => !options.tadtonesanity,
        };
        if !install || world.location_bits.get(location).is_none() {
            continue;
        }
        placement.place_item(location, item)?;
    }
    Ok(())
}

fn restrict_triforces(placement: &mut Placement, options: &RandoOptions) {
    if matches!(options.triforce_shuffle, TriforceShuffle::Anywhere) {
        return;
    }
    for item in &options.triforce_item_names {
        placement.set_placement_limit(item, "Sky Keep");
    }
}

fn mark_unplaced_items(
    world: &World,
    placement: &mut Placement,
    options: &RandoOptions,
    required_dungeons: &[String],
) {
    if matches!(options.map_mode, MapMode::Removed) {
        for dungeon in &options.dungeon_names {
            if let Some(bits) = world.item_copy_bits.get(&format!("{dungeon} Map")) {
                for &bit in bits {
                    placement.add_unplaced_item(world.registry.name(bit).to_string());
                }
            }
        }
    }
    if options.tadtonesanity {
        return;
    }
    if let Some(bits) = world.item_copy_bits.get("Group of Tadtones") {
        for &bit in bits {
            placement.add_unplaced_item(world.registry.name(bit).to_string());
        }
    }
    let _ = required_dungeons;
}

/// Installs the four end-game requirements of §4.7 as
/// `runtime_requirements` overrides: three on named abstract bits the
/// world data is expected to declare ("GoT Raising Requirement", "GoT
/// Opening Requirement", "Horde Door Requirement"), plus the reserved
/// `Everything` bit, which every world has. Grounded in
/// `examples/original_source/graph_logic/randomize.py`'s
/// `get_endgame_requirements`, whose `everything_list = {check bits} |
/// {Demise}` becomes `Everything`'s own requirement there. A named bit
/// that the world does not declare is silently skipped — not every world
/// model wires up every check.
fn install_endgame_requirements(
    world: &World,
    settings: &mut LogicSettings,
    options: &RandoOptions,
    required_dungeons: &[String],
) -> Result<()> {
    let n = world.registry.len();

    if let Some(bit) = world.registry.get("[Option] GoT Raising Requirement") {
        let req = if options.got_start {
            location_requirement(world, &options.got_start_check, n)
        } else {
            DnfRequirement::trivial(n)
        };
        settings.runtime_requirements.push((bit, req));
    }

    let dungeons_conjunct = required_dungeons_conjunct(world, options, required_dungeons, n);

    if let Some(bit) = world.registry.get("[Option] GoT Opening Requirement") {
        let mut req = parse_requirement(&format!("Progressive Sword x{}", options.got_sword_requirement.sword_count()), &world.resolver())?;
        if matches!(options.got_dungeon_requirement, GotDungeonRequirement::Required) {
            req = req.and(&dungeons_conjunct);
        }
        settings.runtime_requirements.push((bit, req));
    }

    if let Some(bit) = world.registry.get("[Option] Horde Door Requirement") {
        let mut req = location_requirement(world, &options.sky_keep_final_check, n);
        if matches!(options.got_dungeon_requirement, GotDungeonRequirement::Unrequired) {
            req = req.and(&dungeons_conjunct);
        }
        settings.runtime_requirements.push((bit, req));
    }

    settings.runtime_requirements.push((world.registry.everything(), everything_requirement(world)));

    Ok(())
}

/// One conjunct requiring every check bit the catalog declares plus
/// `Demise`, mirroring `everything_list = {check bits} | {Demise}` being
/// assigned directly as `Everything`'s requirement in the original.
fn everything_requirement(world: &World) -> DnfRequirement {
    let n = world.registry.len();
    let mut conjunct = Inventory::empty(n);
    for location in world.hint_regions.keys() {
        if let Some(&bit) = world.location_bits.get(location) {
            conjunct.insert(bit);
        }
    }
    if let Some(demise) = world.registry.get("Demise") {
        conjunct.insert(demise);
    }
    DnfRequirement::from_conjunct(conjunct)
}

fn location_requirement(world: &World, location: &str, n: usize) -> DnfRequirement {
    match world.location_bits.get(location) {
        Some(&bit) => DnfRequirement::single(bit, n),
        None => DnfRequirement::trivial(n),
    }
}

/// One conjunct gathering every required dungeon's final-check bit,
/// mirroring the original's `dungeons_req |= Inventory(final_check)` loop
/// (a plain `Inventory` union there is this crate's single conjunct).
fn required_dungeons_conjunct(
    world: &World,
    options: &RandoOptions,
    required_dungeons: &[String],
    n: usize,
) -> DnfRequirement {
    let mut conjunct = Inventory::empty(n);
    for dungeon in required_dungeons {
        if let Some(check) = options.dungeon_final_checks.get(dungeon) {
            if let Some(&bit) = world.location_bits.get(check) {
                conjunct.insert(bit);
            }
        }
    }
    DnfRequirement::from_conjunct(conjunct)
}
