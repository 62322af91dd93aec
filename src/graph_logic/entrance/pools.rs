//! Exit pool partitioning (C8): groups exits and entrances that are
//! shuffled together — the dungeon pool, the trials pool, the optional
//! start-entrance pool. Per §9's first Open Question, pool
//! constraints (which exits/entrances are even eligible for a pool) are
//! enforced here, at construction time, never later during the fill.

use crate::utils::prelude::*;

/// One shuffle-together group of exits and entrances. Built once per
/// randomization and never mutated after `build` returns; the entrance
/// randomizer only reads `exits`/`entrances` off of it.
#[derive(Clone, Debug)]
pub struct EntrancePool {
    pub name: String,
    pub exits: Vec<String>,
    pub entrances: Vec<String>,
}

impl EntrancePool {
    /// Filters `candidate_exits`/`candidate_entrances` down to the subset
    /// actually eligible for this pool, per `is_eligible`. A pool with an
    /// unequal number of eligible exits and entrances is a configuration
    /// error — the entrance randomizer's "one exit per entrance" pairing
    /// assumes equal counts up front rather than discovering the mismatch
    /// mid-shuffle.
    pub fn build(
        name: impl Into<String>,
        candidate_exits: impl IntoIterator<Item = String>,
        candidate_entrances: impl IntoIterator<Item = String>,
        mut is_eligible: impl FnMut(&str) -> bool,
    ) -> Result<EntrancePool> {
        let exits: Vec<String> = candidate_exits.into_iter().filter(|e| is_eligible(e)).collect();
        let entrances: Vec<String> = candidate_entrances.into_iter().filter(|e| is_eligible(e)).collect();
        if exits.len() != entrances.len() {
            return Err(anyhow!(
                "entrance pool '{}' has {} exits but {} entrances",
                name.into(),
                exits.len(),
                entrances.len()
            ));
        }
        Ok(EntrancePool { name: name.into(), exits, entrances })
    }

    pub fn len(&self) -> usize {
        self.exits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exits.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_filters_to_eligible_members_on_both_sides() {
        let pool = EntrancePool::build(
            "dungeons",
            vec!["Skyview Exit".to_string(), "Lanayru Mining Facility Exit".to_string()],
            vec!["Skyview Entrance".to_string(), "Lanayru Mining Facility Entrance".to_string()],
            |_| true,
        )
        .unwrap();
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn unequal_eligible_counts_is_an_error() {
        let err = EntrancePool::build(
            "dungeons",
            vec!["A".to_string(), "B".to_string()],
            vec!["X".to_string()],
            |_| true,
        )
        .unwrap_err();
        assert!(err.to_string().contains("dungeons"));
    }
}
