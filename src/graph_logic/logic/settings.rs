//! `LogicSettings`: the option-compiler's output, consumed once by
//! `Logic::new` to seed the façade's mutable requirement vector and
//! inventory before any placement happens.

use crate::graph_logic::bits::inventory::Inventory;
use crate::graph_logic::bits::registry::BitId;
use crate::graph_logic::requirement::dnf::DnfRequirement;

/// `{ starting_inventory, frees, runtime_requirements, banned }` from
/// §3. Grounded in `examples/original_source/logic/randomize.py`'s
/// `Rando.__init__`: under the "assumed fill" style this crate's
/// backward-fill algorithm implements, `starting_inventory` is every
/// not-yet-placed inventory item plus `HintBypass` (the solver is run as
/// if every unplaced item were already obtained, so the fill algorithm
/// can test "is this item ever actually needed"), while `frees` is the
/// narrower set of items the options guarantee the player starts with
/// (progressive swords, starting tablets, ...) regardless of placement.
#[derive(Clone, Debug, Default)]
pub struct LogicSettings {
    /// Every inventory item not yet assigned a location, plus
    /// `HintBypass` — the "assume you already have it" starting point
    /// the backward-fill algorithm's progress analysis runs against.
    pub starting_inventory: Inventory,
    /// Items the player is guaranteed to start with no matter what,
    /// independent of fill progress (option-derived starting items).
    pub frees: Inventory,
    /// Per-bit OR-extensions applied after world build, e.g. "Thunderhead
    /// open" being wired to the corresponding option bit, or an
    /// end-game requirement pointing at `Everything`/`Demise`.
    pub runtime_requirements: Vec<(BitId, DnfRequirement)>,
    /// Locations/areas banned from holding progression — ANDed with the
    /// `Banned` bit rather than removed from the graph.
    pub banned: Vec<BitId>,
}

impl LogicSettings {
    pub fn new(n_bits: usize) -> Self {
        LogicSettings {
            starting_inventory: Inventory::empty(n_bits),
            frees: Inventory::empty(n_bits),
            runtime_requirements: Vec::new(),
            banned: Vec::new(),
        }
    }
}
