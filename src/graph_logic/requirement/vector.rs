//! The per-bit requirement vector: for each bit, one `DnfRequirement`
//! describing how it becomes true, plus an opaque flag marking bits the
//! solver must never expand (unplaced locations, unlinked entrances).

use super::dnf::DnfRequirement;
use crate::graph_logic::bits::registry::BitId;

/// A hard cap on deep-simplification visits per run. Exceeding it aborts
/// simplification for the offending bit rather than looping — deep
/// simplification is an optimization, never a correctness prerequisite.
pub const MAX_DEEP_SIMPLIFY_VISITS: usize = 4;

#[derive(Clone, Debug)]
pub struct RequirementVector {
    n_bits: usize,
    requirements: Vec<DnfRequirement>,
    opaque: Vec<bool>,
}

impl RequirementVector {
    pub fn new(n_bits: usize) -> Self {
        RequirementVector {
            n_bits,
            requirements: vec![DnfRequirement::impossible(); n_bits],
            opaque: vec![false; n_bits],
        }
    }

    pub fn n_bits(&self) -> usize {
        self.n_bits
    }

    pub fn get(&self, bit: BitId) -> &DnfRequirement {
        &self.requirements[bit.index()]
    }

    pub fn set(&mut self, bit: BitId, req: DnfRequirement) {
        self.requirements[bit.index()] = req;
    }

    /// OR-extends the existing requirement for `bit` with `req` — used for
    /// the option compiler's runtime requirement overrides, and by the
    /// world builder when several clauses independently contribute a
    /// disjunct to the same bit (sleeping, incoming exits, entrances).
    pub fn or_into(&mut self, bit: BitId, req: &DnfRequirement) {
        let combined = self.requirements[bit.index()].or(req);
        self.requirements[bit.index()] = combined;
    }

    pub fn is_opaque(&self, bit: BitId) -> bool {
        self.opaque[bit.index()]
    }

    pub fn set_opaque(&mut self, bit: BitId, opaque: bool) {
        self.opaque[bit.index()] = opaque;
    }

    /// Inlines every bit whose requirement is a single-conjunct disjunction
    /// (a forced implication chain) into any conjunct that mentions it,
    /// skipping opaque bits and skipping a substitution that would make a
    /// requirement mention itself. Bounded cost: one pass over all bits.
    pub fn shallow_simplify(&mut self) {
        let forced: Vec<(BitId, crate::graph_logic::bits::inventory::Inventory)> = (0..self.n_bits)
            .filter_map(|i| {
                let bit = BitId(i);
                if self.opaque[i] {
                    return None;
                }
                let disjuncts = self.requirements[i].disjuncts();
                if disjuncts.len() == 1 {
                    Some((bit, disjuncts[0].clone()))
                } else {
                    None
                }
            })
            .collect();

        for i in 0..self.n_bits {
            if self.opaque[i] {
                continue;
            }
            let mut changed = false;
            let mut new_disjuncts = Vec::with_capacity(self.requirements[i].disjuncts().len());
            for conjunct in self.requirements[i].disjuncts() {
                let mut conjunct = conjunct.clone();
                for (forced_bit, forced_conjunct) in &forced {
                    if forced_bit.index() == i {
                        continue; // never substitute a bit's own forced form into itself
                    }
                    if conjunct.contains(*forced_bit) && !forced_conjunct.contains(BitId(i)) {
                        conjunct.remove(*forced_bit);
                        conjunct.union_inplace(forced_conjunct);
                        changed = true;
                    }
                }
                new_disjuncts.push(conjunct);
            }
            if changed {
                let mut rebuilt = DnfRequirement::impossible();
                for d in new_disjuncts {
                    rebuilt = rebuilt.or(&DnfRequirement::from_conjunct(d));
                }
                self.requirements[i] = rebuilt;
            }
        }
    }

    /// Repeats `shallow_simplify` until it stops changing anything or the
    /// visit cap is hit, whichever comes first. Each pass only ever
    /// inlines *forced* (single-disjunct) bits, which preserves `eval`
    /// semantics by construction, so iterating it further is always safe
    /// — a cycle of mutually-forced bits just stops changing once both
    /// sides have already been inlined into each other, rather than
    /// looping forever chasing a fixed point that does not exist.
    pub fn deep_simplify(&mut self) {
        for _ in 0..MAX_DEEP_SIMPLIFY_VISITS {
            let before = self.requirements.clone();
            self.shallow_simplify();
            if self.requirements == before {
                break;
            }
        }
    }
}
