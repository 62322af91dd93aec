//! The parsed-area tree. Areas exist only to be resolved by name and
//! walked once at build time; after `World::build` runs, all reachability
//! questions go through the flat per-bit `RequirementVector` instead.

use serde::{Deserialize, Serialize};

use crate::utils::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeOfDay {
    DayOnly,
    NightOnly,
    Both,
}

impl TimeOfDay {
    pub fn is_both(self) -> bool {
        matches!(self, TimeOfDay::Both)
    }
}

/// One exit leaving an area: either to another area (a logical exit) or
/// to a map-exit bit registered by the catalog.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExitSpec {
    pub target: String,
    pub requirement: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Area {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub allowed_time_of_day: Option<TimeOfDay>,
    #[serde(default)]
    pub can_sleep: bool,
    /// `Abstract` areas (logic-only groupings) do not generate their own
    /// time bits.
    #[serde(default)]
    pub is_abstract: bool,
    /// local location name -> raw requirement text
    #[serde(default)]
    pub locations: BTreeMap<String, String>,
    /// local exit name -> target + raw requirement text
    #[serde(default)]
    pub exits: BTreeMap<String, ExitSpec>,
    /// entrance names rooted in this area
    #[serde(default)]
    pub entrances: Vec<String>,
    /// map-exit names rooted in this area
    #[serde(default)]
    pub map_exits: Vec<String>,
    #[serde(default)]
    pub sub_areas: BTreeMap<String, Area>,
}

impl Area {
    pub fn new(name: impl Into<String>) -> Self {
        Area { name: name.into(), allowed_time_of_day: Some(TimeOfDay::Both), ..Default::default() }
    }

    pub fn abstract_area(name: impl Into<String>) -> Self {
        let mut area = Area::new(name);
        area.is_abstract = true;
        area.allowed_time_of_day = None;
        area
    }

    pub fn time_of_day(&self) -> TimeOfDay {
        self.allowed_time_of_day.unwrap_or(TimeOfDay::Both)
    }
}
