//! External-data shapes the world builder consumes. Parsing these from
//! data files is out of scope — callers construct them (typically by
//! deserializing the game's static data) and hand them to `World::build`.

use serde::{Deserialize, Serialize};

use crate::graph_logic::world::area::TimeOfDay;
use crate::utils::prelude::*;

/// A named in-game slot with a full address, a hint-region tag used by
/// `get_barren_regions`, and a location-type tag distinct from the hint
/// region (e.g. `"tingle"`, `"minigame"`) used by `banned-types`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CheckEntry {
    pub full_name: String,
    pub hint_region: String,
    /// Comma-separated type tags, mirroring the original catalog's `type`
    /// field (`checks[loc]["type"].split(",")` in
    /// `examples/original_source/graph_logic/randomize.py`).
    #[serde(default)]
    pub kind: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GossipStoneEntry {
    pub full_name: String,
    pub hint_region: String,
}

/// One half of a map transition: a map-exit or an entrance, rooted in a
/// named area, with its own time-of-day restriction independent of its
/// area's.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransitionEntry {
    pub full_name: String,
    pub area: String,
    pub allowed_time_of_day: TimeOfDay,
    /// The shuffle pool this transition belongs to, e.g. `"dungeons"` or
    /// `"trials"`. Empty string for transitions that are never shuffled.
    #[serde(default)]
    pub pool: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub checks: Vec<CheckEntry>,
    #[serde(default)]
    pub gossip_stones: Vec<GossipStoneEntry>,
    #[serde(default)]
    pub map_exits: Vec<TransitionEntry>,
    #[serde(default)]
    pub entrances: Vec<TransitionEntry>,
    /// item name -> copy count (1 for ordinary items)
    #[serde(default)]
    pub item_counts: BTreeMap<String, usize>,
    #[serde(default)]
    pub option_names: Vec<String>,
    #[serde(default)]
    pub trick_names: Vec<String>,
}
