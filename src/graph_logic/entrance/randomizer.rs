//! The entrance randomizer (C8): for each pool, shuffles the exit list
//! and pairs it in order with the pool's entrances, installing every
//! pairing through the logic façade's `link_exit`. No on-line
//! swap/backtrack is attempted, per §4.8 — a pairing that leaves the
//! start unreachable is surfaced as `GenerationFailed` for the caller to
//! retry with a new seed.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::RandoError;
use crate::graph_logic::logic::facade::Logic;
use crate::utils::prelude::*;

use super::pools::EntrancePool;

pub struct EntranceRandomizer;

impl EntranceRandomizer {
    /// Installs every pool's pairings in turn. `start_check`, if given, is
    /// re-evaluated after every pool and must remain reachable — this
    /// models "if a later pairing cannot satisfy start-reachability, the
    /// run fails" without requiring a full invariant check after each
    /// individual link.
    pub fn randomize(
        logic: &mut Logic,
        pools: &[EntrancePool],
        rng: &mut impl Rng,
        start_check: Option<&str>,
    ) -> Result<()> {
        for pool in pools {
            Self::randomize_pool(logic, pool, rng)?;
            if let Some(start) = start_check {
                let Some(bit) = logic.world().registry.get(start) else {
                    continue;
                };
                if !logic.full_inventory().contains(bit) {
                    return Err(RandoError::generation_failed(format!(
                        "start location '{start}' unreachable after shuffling pool '{}'",
                        pool.name
                    )));
                }
            }
        }
        Ok(())
    }

    fn randomize_pool(logic: &mut Logic, pool: &EntrancePool, rng: &mut impl Rng) -> Result<()> {
        let mut exits = pool.exits.clone();
        exits.shuffle(rng);
        for (entrance, exit) in pool.entrances.iter().zip(exits.iter()) {
            logic.link_exit(exit, entrance)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph_logic::logic::settings::LogicSettings;
    use crate::graph_logic::placement::store::Placement;
    use crate::graph_logic::world::area::{Area, TimeOfDay};
    use crate::graph_logic::world::builder::World;
    use crate::graph_logic::world::catalog::{Catalog, TransitionEntry};
    use rand::SeedableRng;

    fn two_pool_world() -> World {
        let root = Area::abstract_area("root");
        let mut catalog = Catalog::default();
        for i in 1..=2 {
            catalog.map_exits.push(TransitionEntry {
                full_name: format!("Exit {i}"),
                area: "root".to_string(),
                allowed_time_of_day: TimeOfDay::Both,
                pool: "dungeons".to_string(),
            });
            catalog.entrances.push(TransitionEntry {
                full_name: format!("Entrance {i}"),
                area: "root".to_string(),
                allowed_time_of_day: TimeOfDay::Both,
                pool: "dungeons".to_string(),
            });
        }
        World::build(&root, &catalog).unwrap()
    }

    #[test]
    fn randomize_links_every_entrance_to_exactly_one_exit() {
        let world = two_pool_world();
        let n = world.registry.len();
        let settings = LogicSettings::new(n);
        let mut logic = Logic::new(world, &settings, Placement::new()).unwrap();
        let pool = EntrancePool::build(
            "dungeons",
            vec!["Exit 1".to_string(), "Exit 2".to_string()],
            vec!["Entrance 1".to_string(), "Entrance 2".to_string()],
            |_| true,
        )
        .unwrap();
        let mut rng = rand::rngs::StdRng::seed_from_u64(0);
        EntranceRandomizer::randomize(&mut logic, &[pool], &mut rng, None).unwrap();

        for i in 1..=2 {
            let entrance = format!("Entrance {i}");
            let exit = logic.placement().exit_for(&entrance).unwrap().to_string();
            assert_eq!(logic.placement().entrance_for(&exit), Some(entrance.as_str()));
        }
    }
}
