//! The top-level orchestrator: wires the option compiler (C7), the
//! entrance randomizer (C8), the logic façade (C6), and the backward-fill
//! algorithm (C9) into the single `randomize` call the CLI/GUI (out of
//! scope here) actually drives. Grounded in
//! `examples/original_source/graph_logic/randomize.py`'s `Rando` class,
//! which owns exactly this pipeline end to end around one seeded RNG.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::RandoError;
use crate::graph_logic::entrance::pools::EntrancePool;
use crate::graph_logic::entrance::randomizer::EntranceRandomizer;
use crate::graph_logic::fill::bfa::BackwardFillAlgorithm;
use crate::graph_logic::logic::facade::Logic;
use crate::graph_logic::options::compile::CompiledOptions;
use crate::graph_logic::options::surface::{RandoOptions, RandomizeDungeonEntrances};
use crate::graph_logic::world::builder::World;
use crate::utils::prelude::*;

/// The conventional pool names `World::build` groups catalog transitions
/// under (§4.8's "dungeons, silent-realm trials, optional start").
/// A world with no entry under a given name simply contributes an empty
/// pool, so none of this is mandatory world data.
const DUNGEON_POOL: &str = "dungeons";
const SKY_KEEP_POOL: &str = "sky_keep";
const TRIALS_POOL: &str = "trials";
const START_POOL: &str = "start";

/// Everything a finished run hands back to its caller: the instantiated
/// `Logic` (which the hint oracle and spoiler log both read from
/// without mutating), the required-dungeon roster, and the concrete seed
/// actually used (meaningful when the caller passed `-1`).
pub struct RandoOutcome {
    pub logic: Logic,
    pub required_dungeons: Vec<String>,
    pub seed: u64,
}

pub struct Rando;

impl Rando {
    /// Runs the full pipeline once against `seed`. `world` is cloned
    /// internally — per §5, no two `Logic` instances may share
    /// mutable state, and a caller retrying with a new seed must start
    /// from the same immutable world every time.
    pub fn randomize(world: &World, options: &RandoOptions, seed: u64) -> Result<RandoOutcome> {
        let mut rng = StdRng::seed_from_u64(seed);
        let world = world.clone();

        let compiled = CompiledOptions::compile(options, &world, &mut rng)?;
        let start_check =
            if options.got_start_check.is_empty() { None } else { Some(options.got_start_check.as_str()) };

        let mut logic = Logic::new(world, &compiled.settings, compiled.placement)?;

        let pools = Self::build_pools(logic.world(), options)?;
        EntranceRandomizer::randomize(&mut logic, &pools, &mut rng, start_check)?;

        BackwardFillAlgorithm::run(
            &mut logic,
            &compiled.must_be_placed_items,
            &compiled.may_be_placed_items,
            &compiled.duplicable_items,
            &mut rng,
        )?;

        Self::check_invariants(&logic)?;

        Ok(RandoOutcome { logic, required_dungeons: compiled.required_dungeons, seed })
    }

    /// Runs `randomize` up to `max_retries + 1` times, incrementing the
    /// seed on every `GenerationFailed` (the only error the fill
    /// algorithm or entrance randomizer raise that §7 marks retryable).
    /// Any other error propagates immediately as fatal.
    pub fn randomize_with_retries(
        world: &World,
        options: &RandoOptions,
        seed: u64,
        max_retries: u32,
    ) -> Result<RandoOutcome> {
        let mut last_err = None;
        for attempt in 0..=max_retries {
            let attempt_seed = seed.wrapping_add(attempt as u64);
            match Self::randomize(world, options, attempt_seed) {
                Ok(outcome) => return Ok(outcome),
                Err(e) => {
                    let retryable =
                        e.downcast_ref::<RandoError>().map(RandoError::is_retryable).unwrap_or(false);
                    if !retryable {
                        return Err(e);
                    }
                    last_err = Some(e);
                }
            }
        }
        Err(last_err.unwrap_or_else(|| RandoError::generation_failed("exhausted retries with no attempts made")))
    }

    /// Builds the entrance pools this run actually shuffles, per the
    /// option flags of §4.8. A pool name with no catalog entries is
    /// simply empty and contributes nothing.
    fn build_pools(world: &World, options: &RandoOptions) -> Result<Vec<EntrancePool>> {
        let mut pools = Vec::new();

        let want_dungeons = !matches!(options.randomize_dungeon_entrances, RandomizeDungeonEntrances::None);
        if want_dungeons {
            if let Some(pool) = Self::pool_from(world, DUNGEON_POOL)? {
                pools.push(pool);
            }
        }
        if matches!(options.randomize_dungeon_entrances, RandomizeDungeonEntrances::DungeonsAndSkyKeep) {
            if let Some(pool) = Self::pool_from(world, SKY_KEEP_POOL)? {
                pools.push(pool);
            }
        }
        if options.randomize_trials {
            if let Some(pool) = Self::pool_from(world, TRIALS_POOL)? {
                pools.push(pool);
            }
        }
        if options.random_start_entrance {
            if let Some(pool) = Self::pool_from(world, START_POOL)? {
                pools.push(pool);
            }
        }

        Ok(pools)
    }

    fn pool_from(world: &World, name: &str) -> Result<Option<EntrancePool>> {
        let Some((exits, entrances)) = world.pools.get(name) else { return Ok(None) };
        if exits.is_empty() && entrances.is_empty() {
            return Ok(None);
        }
        let pool = EntrancePool::build(name, exits.clone(), entrances.clone(), |_| true)?;
        Ok(Some(pool))
    }

    /// Post-fill completeness check, lifted from
    /// `examples/original_source/logic/logic_utils.py`'s `check()` (A3
    /// point 4): `Everything` must be reachable, `Demise` must be
    /// reachable when the world names one, and every check the catalog
    /// knows about must carry an item unless it was explicitly marked
    /// unplaced.
    fn check_invariants(logic: &Logic) -> Result<()> {
        let everything = logic.world().registry.everything();
        if !logic.full_inventory().contains(everything) {
            return Err(RandoError::invariant("Everything is unreachable after a completed fill"));
        }

        if let Some(demise) = logic.world().registry.get("Demise") {
            if !logic.full_inventory().contains(demise) {
                return Err(RandoError::invariant("Demise is unreachable after a completed fill"));
            }
        }

        for location in logic.accessible_checks("") {
            if logic.placement().item_at(&location).is_none() {
                return Err(RandoError::invariant(format!("location '{location}' was never given an item")));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph_logic::world::area::Area;
    use crate::graph_logic::world::catalog::{Catalog, CheckEntry};

    fn tiny_world() -> World {
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
        World::build(&root, &catalog).unwrap()
    }

    #[test]
    fn randomize_runs_the_full_pipeline_and_places_every_item() {
        let world = tiny_world();
        let mut options = RandoOptions::default();
        options.duplicable_items = vec!["Rupee".to_string()];
        let outcome = Rando::randomize(&world, &options, 7).unwrap();
        assert!(outcome.logic.placement().location_of("Sword").is_some());
        for i in 1..=3 {
            assert!(outcome.logic.placement().item_at(&format!("Region - Chest {i}")).is_some());
        }
    }

    /// §8 Completeness: `Everything` must actually be reachable, not just
    /// unreachable-but-excused by an empty requirement — `check_invariants`
    /// only accepts a run where `Everything`'s installed requirement (every
    /// check bit) is genuinely satisfied by the finished fill.
    #[test]
    fn completed_run_actually_reaches_everything() {
        let world = tiny_world();
        let mut options = RandoOptions::default();
        options.duplicable_items = vec!["Rupee".to_string()];
        let outcome = Rando::randomize(&world, &options, 7).unwrap();
        assert!(outcome.logic.full_inventory().contains(world.registry.everything()));
    }

    #[test]
    fn randomize_is_deterministic_for_the_same_seed() {
        let world = tiny_world();
        let mut options = RandoOptions::default();
        options.duplicable_items = vec!["Rupee".to_string()];
        let a = Rando::randomize(&world, &options, 99).unwrap();
        let b = Rando::randomize(&world, &options, 99).unwrap();
        assert_eq!(a.logic.placement().location_to_item(), b.logic.placement().location_to_item());
    }

    #[test]
    fn randomize_with_retries_succeeds_on_the_first_attempt() {
        let world = tiny_world();
        let mut options = RandoOptions::default();
        options.duplicable_items = vec!["Rupee".to_string()];
        let outcome = Rando::randomize_with_retries(&world, &options, 5, 3).unwrap();
        assert_eq!(outcome.seed, 5);
    }
}
