//! Restricted reachability: re-run the fixed-point solver with a set of
//! bits forced to `Impossible`, used by hint generation to ask "is `target`
//! still reachable if these checks/areas did not exist". Results are
//! cached keyed on `(banned-set, starting inventory)` per §4.4,
//! mirroring the original's `@cache`d `_fill_for_test` (see
//! `examples/original_source/graph_logic/logic_utils.py`) as an explicit
//! `HashMap` rather than a blanket memoization decorator.

use std::collections::HashMap;

use crate::graph_logic::bits::inventory::Inventory;
use crate::graph_logic::bits::registry::BitId;
use crate::graph_logic::requirement::dnf::DnfRequirement;
use crate::graph_logic::requirement::vector::RequirementVector;

use super::fill::fill_inventory;

/// A hashable, order-independent key for a ban set plus a starting
/// inventory. Bans are sorted so two calls with the same set in a
/// different order hit the same cache entry.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct RestrictedKey {
    banned: Vec<usize>,
    start: Inventory,
}

fn make_key(banned: &[BitId], start: &Inventory) -> RestrictedKey {
    let mut banned: Vec<usize> = banned.iter().map(|b| b.index()).collect();
    banned.sort_unstable();
    banned.dedup();
    RestrictedKey { banned, start: start.clone() }
}

/// Caches full saturated inventories for a given ban set / starting
/// inventory pair, so repeated `restricted_test` calls against the same
/// hint query don't re-saturate from scratch.
#[derive(Default)]
pub struct RestrictedTestCache {
    fills: HashMap<RestrictedKey, Inventory>,
}

impl RestrictedTestCache {
    pub fn new() -> Self {
        RestrictedTestCache::default()
    }

    pub fn clear(&mut self) {
        self.fills.clear();
    }

    /// The saturated inventory with every bit in `banned` forced
    /// unreachable, computed once per distinct `(banned, start)` pair.
    pub fn restricted_fill(
        &mut self,
        requirements: &RequirementVector,
        start: &Inventory,
        banned: &[BitId],
    ) -> Inventory {
        let key = make_key(banned, start);
        if let Some(cached) = self.fills.get(&key) {
            return cached.clone();
        }
        let mut restricted = requirements.clone();
        for &bit in banned {
            restricted.set(bit, DnfRequirement::impossible());
        }
        let result = fill_inventory(&restricted, start);
        self.fills.insert(key, result.clone());
        result
    }

    /// Whether `target` is reachable once every bit in `banned` is forced
    /// `Impossible`.
    pub fn restricted_test(
        &mut self,
        requirements: &RequirementVector,
        start: &Inventory,
        banned: &[BitId],
        target: BitId,
    ) -> bool {
        self.restricted_fill(requirements, start, banned).contains(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph_logic::requirement::dnf::DnfRequirement;

    #[test]
    fn banning_a_prerequisite_blocks_the_target() {
        let mut rv = RequirementVector::new(3);
        rv.set(BitId(2), DnfRequirement::single(BitId(0), 3));
        let start = {
            let mut i = Inventory::empty(3);
            i.insert(BitId(0));
            i
        };
        let mut cache = RestrictedTestCache::new();
        assert!(cache.restricted_test(&rv, &start, &[], BitId(2)));
        assert!(!cache.restricted_test(&rv, &start, &[BitId(0)], BitId(2)));
    }

    #[test]
    fn result_is_served_from_cache_on_repeat_queries() {
        let rv = RequirementVector::new(2);
        let start = Inventory::empty(2);
        let mut cache = RestrictedTestCache::new();
        cache.restricted_fill(&rv, &start, &[]);
        assert_eq!(cache.fills.len(), 1);
        cache.restricted_fill(&rv, &start, &[]);
        assert_eq!(cache.fills.len(), 1);
    }

    #[test]
    fn ban_order_does_not_affect_cache_key() {
        let rv = RequirementVector::new(4);
        let start = Inventory::empty(4);
        let mut cache = RestrictedTestCache::new();
        cache.restricted_fill(&rv, &start, &[BitId(1), BitId(2)]);
        cache.restricted_fill(&rv, &start, &[BitId(2), BitId(1)]);
        assert_eq!(cache.fills.len(), 1);
    }
}
