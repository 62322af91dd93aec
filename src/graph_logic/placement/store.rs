//! The placement store: the six directional maps that record every
//! decision the fill algorithm and entrance randomizer make, kept in
//! lock-step so that location<->item and exit<->entrance are always
//! inverse bijections on their domains.

use crate::error::RandoError;
use crate::utils::prelude::*;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Placement {
    location_to_item: BTreeMap<String, String>,
    item_to_location: BTreeMap<String, String>,
    exit_to_entrance: BTreeMap<String, String>,
    entrance_to_exit: BTreeMap<String, String>,
    /// item -> area-address prefix it must be placed under.
    item_placement_limit: BTreeMap<String, String>,
    starting_items: BTreeSet<String>,
    /// items the current options forbid from appearing anywhere (e.g.
    /// maps, when map-mode is Removed).
    unplaced_items: BTreeSet<String>,
}

impl Placement {
    pub fn new() -> Self {
        Placement::default()
    }

    pub fn location_to_item(&self) -> &BTreeMap<String, String> {
        &self.location_to_item
    }

    pub fn item_to_location(&self) -> &BTreeMap<String, String> {
        &self.item_to_location
    }

    pub fn exit_to_entrance(&self) -> &BTreeMap<String, String> {
        &self.exit_to_entrance
    }

    pub fn entrance_to_exit(&self) -> &BTreeMap<String, String> {
        &self.entrance_to_exit
    }

    pub fn starting_items(&self) -> &BTreeSet<String> {
        &self.starting_items
    }

    pub fn unplaced_items(&self) -> &BTreeSet<String> {
        &self.unplaced_items
    }

    pub fn item_at(&self, location: &str) -> Option<&str> {
        self.location_to_item.get(location).map(String::as_str)
    }

    pub fn location_of(&self, item: &str) -> Option<&str> {
        self.item_to_location.get(item).map(String::as_str)
    }

    pub fn entrance_for(&self, exit: &str) -> Option<&str> {
        self.exit_to_entrance.get(exit).map(String::as_str)
    }

    pub fn exit_for(&self, entrance: &str) -> Option<&str> {
        self.entrance_to_exit.get(entrance).map(String::as_str)
    }

    pub fn add_starting_item(&mut self, item: impl Into<String>) {
        self.starting_items.insert(item.into());
    }

    pub fn add_unplaced_item(&mut self, item: impl Into<String>) {
        self.unplaced_items.insert(item.into());
    }

    pub fn set_placement_limit(&mut self, item: impl Into<String>, area_prefix: impl Into<String>) {
        self.item_placement_limit.insert(item.into(), area_prefix.into());
    }

    pub fn placement_limit(&self, item: &str) -> Option<&str> {
        self.item_placement_limit.get(item).map(String::as_str)
    }

    /// Whether `location`'s full address honors `item`'s placement limit,
    /// if it has one — items without a limit accept every location.
    pub fn honors_limit(&self, item: &str, location: &str) -> bool {
        match self.placement_limit(item) {
            Some(prefix) => location.starts_with(prefix),
            None => true,
        }
    }

    /// Assigns `item` to `location`. Fails if the location already holds
    /// an item or the item is already placed elsewhere.
    pub fn place_item(&mut self, location: &str, item: &str) -> Result<()> {
        if self.location_to_item.contains_key(location) {
            return Err(RandoError::conflict(format!("location '{location}' is already taken")));
        }
        if self.item_to_location.contains_key(item) {
            return Err(RandoError::conflict(format!("item '{item}' is already placed")));
        }
        self.location_to_item.insert(location.to_string(), item.to_string());
        self.item_to_location.insert(item.to_string(), location.to_string());
        Ok(())
    }

    /// Atomically evicts whatever occupies `location` (if anything) and
    /// installs `item` there, returning the evicted item (if any) so the
    /// caller (the backward-fill algorithm) can recurse on it.
    pub fn replace_item(&mut self, location: &str, item: &str) -> Result<Option<String>> {
        if self.item_to_location.contains_key(item) {
            return Err(RandoError::conflict(format!("item '{item}' is already placed")));
        }
        let evicted = self.location_to_item.remove(location);
        if let Some(old) = &evicted {
            self.item_to_location.remove(old);
        }
        self.location_to_item.insert(location.to_string(), item.to_string());
        self.item_to_location.insert(item.to_string(), location.to_string());
        Ok(evicted)
    }

    /// Pairs `exit` with `entrance`. Fails if either half is already
    /// paired.
    pub fn link_exit(&mut self, exit: &str, entrance: &str) -> Result<()> {
        if self.exit_to_entrance.contains_key(exit) {
            return Err(RandoError::conflict(format!("exit '{exit}' is already linked")));
        }
        if self.entrance_to_exit.contains_key(entrance) {
            return Err(RandoError::conflict(format!("entrance '{entrance}' is already linked")));
        }
        self.exit_to_entrance.insert(exit.to_string(), entrance.to_string());
        self.entrance_to_exit.insert(entrance.to_string(), exit.to_string());
        Ok(())
    }

    /// Monotone union: succeeds only if the two placements agree on every
    /// key they share. Used when composing a vanilla pre-placement pass
    /// (from the option compiler) with the result of the fill algorithm.
    pub fn union(&self, other: &Placement) -> Result<Placement> {
        let mut merged = self.clone();
        for (loc, item) in &other.location_to_item {
            match merged.location_to_item.get(loc) {
                Some(existing) if existing != item => {
                    return Err(RandoError::conflict(format!(
                        "location '{loc}' assigned '{existing}' in one placement and '{item}' in the other"
                    )));
                }
                Some(_) => {}
                None => {
                    merged.place_item(loc, item)?;
                }
            }
        }
        for (exit, entrance) in &other.exit_to_entrance {
            match merged.exit_to_entrance.get(exit) {
                Some(existing) if existing != entrance => {
                    return Err(RandoError::conflict(format!(
                        "exit '{exit}' linked to '{existing}' in one placement and '{entrance}' in the other"
                    )));
                }
                Some(_) => {}
                None => {
                    merged.link_exit(exit, entrance)?;
                }
            }
        }
        merged.starting_items.extend(other.starting_items.iter().cloned());
        merged.unplaced_items.extend(other.unplaced_items.iter().cloned());
        for (item, prefix) in &other.item_placement_limit {
            merged.item_placement_limit.entry(item.clone()).or_insert_with(|| prefix.clone());
        }
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn place_item_is_a_bijection() {
        let mut p = Placement::new();
        p.place_item("Skyloft - Knight Academy - Chest", "Longshot").unwrap();
        assert_eq!(p.item_at("Skyloft - Knight Academy - Chest"), Some("Longshot"));
        assert_eq!(p.location_of("Longshot"), Some("Skyloft - Knight Academy - Chest"));
    }

    #[test]
    fn placing_into_a_taken_location_fails() {
        let mut p = Placement::new();
        p.place_item("Chest A", "Longshot").unwrap();
        let err = p.place_item("Chest A", "Clawshots").unwrap_err();
        assert!(err.downcast_ref::<RandoError>().is_some());
    }

    #[test]
    fn placing_an_already_placed_item_fails() {
        let mut p = Placement::new();
        p.place_item("Chest A", "Longshot").unwrap();
        let err = p.place_item("Chest B", "Longshot").unwrap_err();
        assert!(err.downcast_ref::<RandoError>().is_some());
    }

    #[test]
    fn replace_item_evicts_the_prior_occupant() {
        let mut p = Placement::new();
        p.place_item("Chest A", "Rupee").unwrap();
        let evicted = p.replace_item("Chest A", "Longshot").unwrap();
        assert_eq!(evicted.as_deref(), Some("Rupee"));
        assert_eq!(p.item_at("Chest A"), Some("Longshot"));
        assert_eq!(p.location_of("Rupee"), None);
    }

    #[test]
    fn link_exit_is_a_bijection() {
        let mut p = Placement::new();
        p.link_exit("Faron Woods Exit", "Skyloft Entrance").unwrap();
        assert_eq!(p.entrance_for("Faron Woods Exit"), Some("Skyloft Entrance"));
        assert_eq!(p.exit_for("Skyloft Entrance"), Some("Faron Woods Exit"));
    }

    #[test]
    fn honors_limit_checks_the_area_prefix() {
        let mut p = Placement::new();
        p.set_placement_limit("Triforce of Courage", "Sky Keep");
        assert!(p.honors_limit("Triforce of Courage", "Sky Keep - Chest"));
        assert!(!p.honors_limit("Triforce of Courage", "Skyloft - Chest"));
        assert!(p.honors_limit("Longshot", "Anywhere At All"));
    }

    #[test]
    fn union_fails_on_disagreeing_assignments() {
        let mut a = Placement::new();
        a.place_item("Chest A", "Longshot").unwrap();
        let mut b = Placement::new();
        b.place_item("Chest A", "Clawshots").unwrap();
        assert!(a.union(&b).is_err());
    }

    #[test]
    fn union_merges_disjoint_placements() {
        let mut a = Placement::new();
        a.place_item("Chest A", "Longshot").unwrap();
        let mut b = Placement::new();
        b.place_item("Chest B", "Clawshots").unwrap();
        let merged = a.union(&b).unwrap();
        assert_eq!(merged.item_at("Chest A"), Some("Longshot"));
        assert_eq!(merged.item_at("Chest B"), Some("Clawshots"));
    }
}
