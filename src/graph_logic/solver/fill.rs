//! The fixed-point reachability solver: from a starting inventory,
//! saturate with everything derivable from the requirement vector.

use crate::graph_logic::bits::inventory::Inventory;
use crate::graph_logic::bits::registry::BitId;
use crate::graph_logic::requirement::vector::RequirementVector;

/// Repeat until a pass makes no change: for every bit not yet in the
/// inventory, if its requirement is satisfied, add it. Monotone: the
/// result is the least fixed point above `start`.
///
/// Maintains a dirty worklist seeded with every bit and refilled with the
/// newly-added bits each pass, rather than the naive "scan every bit every
/// pass" loop — equivalent result, fewer redundant `eval` calls once the
/// inventory is mostly saturated.
pub fn fill_inventory(requirements: &RequirementVector, start: &Inventory) -> Inventory {
    let mut inventory = start.clone();
    let n = requirements.n_bits();
    let mut dirty: Vec<bool> = vec![true; n];
    let mut queue: std::collections::VecDeque<usize> = (0..n).collect();

    while let Some(i) = queue.pop_front() {
        dirty[i] = false;
        let bit = BitId(i);
        if inventory.contains(bit) {
            continue;
        }
        if requirements.get(bit).eval(&inventory) {
            inventory.insert(bit);
            for j in 0..n {
                if !dirty[j] && !inventory.contains(BitId(j)) {
                    dirty[j] = true;
                    queue.push_back(j);
                }
            }
        }
    }
    inventory
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph_logic::requirement::dnf::DnfRequirement;

    #[test]
    fn saturates_a_simple_chain() {
        // bit 2 requires bit 0 & bit 1; bit 3 requires bit 2.
        let mut rv = RequirementVector::new(4);
        rv.set(BitId(2), DnfRequirement::trivial(4).and(&DnfRequirement::single(BitId(0), 4)).and(&DnfRequirement::single(BitId(1), 4)));
        rv.set(BitId(3), DnfRequirement::single(BitId(2), 4));
        let mut start = Inventory::empty(4);
        start.insert(BitId(0));
        start.insert(BitId(1));
        let result = fill_inventory(&rv, &start);
        assert!(result.contains(BitId(2)));
        assert!(result.contains(BitId(3)));
    }

    #[test]
    fn is_idempotent_on_a_saturated_inventory() {
        let rv = RequirementVector::new(2);
        let start = Inventory::empty(2);
        let once = fill_inventory(&rv, &start);
        let twice = fill_inventory(&rv, &once);
        assert_eq!(once, twice);
    }

    #[test]
    fn is_monotone() {
        let mut rv = RequirementVector::new(3);
        rv.set(BitId(2), DnfRequirement::single(BitId(0), 3));
        let mut i = Inventory::empty(3);
        i.insert(BitId(0));
        let mut j = i.clone();
        j.insert(BitId(1));
        let fi = fill_inventory(&rv, &i);
        let fj = fill_inventory(&rv, &j);
        assert!(fi.is_subset_of(&fj));
    }
}
