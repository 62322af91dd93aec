//! Aggregation of the conjuncts actually used to reach a saturated
//! inventory — used both to detect whether a specific item influences
//! reachability (§4.4) and as the backbone of the hint oracle's "useful
//! items" query.

use crate::graph_logic::bits::inventory::Inventory;
use crate::graph_logic::bits::registry::BitId;
use crate::graph_logic::requirement::vector::RequirementVector;

use super::fill::fill_inventory;

/// `aggregate_required_items(R, I) = ⋃{c : i ∈ fill(R, I) ∧ c ∈ R[i]}` —
/// the union, over every bit the saturated inventory contains, of every
/// conjunct in that bit's requirement that is itself satisfied by the
/// saturated inventory (the conjuncts that actually witness each bit).
pub fn aggregate_required_items(requirements: &RequirementVector, start: &Inventory) -> Inventory {
    let full = fill_inventory(requirements, start);
    let mut aggregate = Inventory::empty(0);
    for i in 0..requirements.n_bits() {
        let bit = BitId(i);
        if !full.contains(bit) {
            continue;
        }
        for conjunct in requirements.get(bit).disjuncts() {
            if conjunct.is_subset_of(&full) {
                aggregate.union_inplace(conjunct);
            }
        }
    }
    aggregate
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph_logic::requirement::dnf::DnfRequirement;

    #[test]
    fn aggregate_includes_witnessing_conjuncts_only() {
        let mut rv = RequirementVector::new(3);
        // bit 2 reachable two ways: via bit 0, or via bit 1 (never true here).
        rv.set(BitId(2), DnfRequirement::single(BitId(0), 3).or(&DnfRequirement::single(BitId(1), 3)));
        let mut start = Inventory::empty(3);
        start.insert(BitId(0));
        let agg = aggregate_required_items(&rv, &start);
        assert!(agg.contains(BitId(0)));
        assert!(!agg.contains(BitId(1)));
    }
}
