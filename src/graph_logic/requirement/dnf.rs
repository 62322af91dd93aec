//! Disjunctive-normal-form requirements: a set of inventories (the
//! disjuncts/conjunctions), satisfied by any inventory that is a superset
//! of one of them.

use crate::graph_logic::bits::inventory::Inventory;
use crate::graph_logic::bits::registry::BitId;

/// `Impossible` is the empty set of disjuncts; `Nothing`/trivial is the
/// singleton set containing the empty inventory. Both are ordinary values
/// of this type, not special cases.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DnfRequirement {
    disjuncts: Vec<Inventory>,
}

impl DnfRequirement {
    /// Never satisfied.
    pub fn impossible() -> Self {
        DnfRequirement { disjuncts: Vec::new() }
    }

    /// Always satisfied — `{∅}`.
    pub fn trivial(n_bits: usize) -> Self {
        DnfRequirement { disjuncts: vec![Inventory::empty(n_bits)] }
    }

    /// A single disjunct requiring exactly the given bit.
    pub fn single(bit: BitId, n_bits: usize) -> Self {
        let mut conjunct = Inventory::empty(n_bits);
        conjunct.insert(bit);
        DnfRequirement { disjuncts: vec![conjunct] }
    }

    /// A single disjunct that is already an arbitrary conjunction.
    pub fn from_conjunct(conjunct: Inventory) -> Self {
        DnfRequirement { disjuncts: vec![conjunct] }
    }

    pub fn disjuncts(&self) -> &[Inventory] {
        &self.disjuncts
    }

    pub fn is_impossible(&self) -> bool {
        self.disjuncts.is_empty()
    }

    /// Satisfied iff some disjunct is a subset of `inventory`.
    pub fn eval(&self, inventory: &Inventory) -> bool {
        self.disjuncts.iter().any(|c| c.is_subset_of(inventory))
    }

    /// Set union of disjuncts, with absorption: if `a ⊆ b` both present,
    /// `b` is dropped.
    pub fn or(&self, other: &DnfRequirement) -> DnfRequirement {
        let mut merged = self.disjuncts.clone();
        merged.extend(other.disjuncts.iter().cloned());
        DnfRequirement { disjuncts: absorb(merged) }
    }

    /// Distribute over `|`: the Cartesian product of conjunctions, one
    /// from each operand, unioned pairwise, then absorbed.
    pub fn and(&self, other: &DnfRequirement) -> DnfRequirement {
        if self.is_impossible() || other.is_impossible() {
            return DnfRequirement::impossible();
        }
        let mut product = Vec::with_capacity(self.disjuncts.len() * other.disjuncts.len());
        for a in &self.disjuncts {
            for b in &other.disjuncts {
                product.push(a.union(b));
            }
        }
        DnfRequirement { disjuncts: absorb(product) }
    }

    /// Drops every disjunct that mentions `bit` — used when an item is
    /// removed from consideration (e.g. the old occupant of a location
    /// being replaced).
    pub fn remove(&self, bit: BitId) -> DnfRequirement {
        DnfRequirement {
            disjuncts: self.disjuncts.iter().filter(|c| !c.contains(bit)).cloned().collect(),
        }
    }

    /// Drops disjuncts mentioning `opposite_time`, then strips `own_time`
    /// from the survivors. Used to project a requirement computed inside
    /// a `Both`-time area down into just its day or night half.
    pub fn project_time(&self, own_time: BitId, opposite_time: BitId) -> DnfRequirement {
        let disjuncts = self
            .disjuncts
            .iter()
            .filter(|c| !c.contains(opposite_time))
            .map(|c| {
                let mut c = c.clone();
                c.remove(own_time);
                c
            })
            .collect();
        DnfRequirement { disjuncts }
    }

    pub fn day_only(&self, day: BitId, night: BitId) -> DnfRequirement {
        self.project_time(day, night)
    }

    pub fn night_only(&self, night: BitId, day: BitId) -> DnfRequirement {
        self.project_time(night, day)
    }
}

/// Removes dominated disjuncts: if `a ⊆ b` for distinct `a`, `b`, drop `b`.
/// O(n²) in the disjunct count, acceptable for the small working sets
/// involved here.
fn absorb(mut disjuncts: Vec<Inventory>) -> Vec<Inventory> {
    disjuncts.sort_by_key(Inventory::len);
    let mut kept: Vec<Inventory> = Vec::with_capacity(disjuncts.len());
    'outer: for candidate in disjuncts {
        for existing in &kept {
            if existing.is_subset_of(&candidate) {
                // existing is no bigger than candidate and implies it; candidate is redundant.
                continue 'outer;
            }
        }
        kept.push(candidate);
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph_logic::bits::registry::BitId;

    const N: usize = 8;

    fn inv(bits: &[usize]) -> Inventory {
        let mut inv = Inventory::empty(N);
        for &b in bits {
            inv.insert(BitId(b));
        }
        inv
    }

    fn req(conjuncts: Vec<&[usize]>) -> DnfRequirement {
        DnfRequirement { disjuncts: conjuncts.into_iter().map(inv).collect() }
    }

    #[test]
    fn impossible_is_never_satisfied() {
        let r = DnfRequirement::impossible();
        assert!(!r.eval(&inv(&[0, 1, 2])));
    }

    #[test]
    fn trivial_is_always_satisfied() {
        let r = DnfRequirement::trivial(N);
        assert!(r.eval(&Inventory::empty(N)));
    }

    #[test]
    fn or_applies_absorption() {
        let a = req(vec![&[0]]);
        let b = req(vec![&[0, 1]]);
        let combined = a.or(&b);
        assert_eq!(combined.disjuncts().len(), 1);
        assert_eq!(combined.disjuncts()[0], inv(&[0]));
    }

    #[test]
    fn and_distributes_then_absorbs() {
        // R1 = {{a},{b}}, R2 = {{b},{c}} -> {{a,b},{a,c},{b},{b,c}} -> {{b},{a,c}}
        let r1 = req(vec![&[0], &[1]]);
        let r2 = req(vec![&[1], &[2]]);
        let got = r1.and(&r2);
        let mut disjuncts: Vec<Vec<usize>> =
            got.disjuncts().iter().map(|c| c.iter().map(|b| b.0).collect()).collect();
        disjuncts.sort();
        assert_eq!(disjuncts, vec![vec![0, 2], vec![1]]);
    }

    #[test]
    fn remove_drops_disjuncts_mentioning_bit() {
        let r = req(vec![&[0], &[0, 1], &[2]]);
        let got = r.remove(BitId(0));
        assert_eq!(got.disjuncts().len(), 1);
        assert_eq!(got.disjuncts()[0], inv(&[2]));
    }

    #[test]
    fn project_time_strips_own_bit_and_drops_opposite() {
        let day = BitId(0);
        let night = BitId(1);
        let r = req(vec![&[0, 2], &[1, 3]]);
        let got = r.day_only(day, night);
        assert_eq!(got.disjuncts().len(), 1);
        assert_eq!(got.disjuncts()[0], inv(&[2]));
    }

    #[test]
    fn eval_matches_disjunct_subset_semantics() {
        let r = req(vec![&[0, 1], &[2]]);
        assert!(r.eval(&inv(&[2, 5])));
        assert!(!r.eval(&inv(&[0])));
        assert!(r.eval(&inv(&[0, 1, 9])));
    }
}
