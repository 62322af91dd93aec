//! Dense bit identifiers and the name registry that assigns them.
//!
//! The build order is fixed (reserved bits, item copies, options/tricks,
//! events, area time-bits, map-exits/entrances) and is the caller's
//! responsibility to respect — the registry itself only guarantees that
//! a name interned once keeps the same id forever.

use crate::utils::prelude::*;

/// A densely assigned, non-negative integer identifying one boolean fact
/// the reachability system tracks. Cheap to copy, ordered by insertion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BitId(pub usize);

impl BitId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Reserved bits present in every registry, in build order.
pub const RESERVED_NAMES: [&str; 5] = ["Day", "Night", "Banned", "Everything", "HintBypass"];

#[derive(Clone, Debug, Default)]
pub struct BitRegistry {
    names: Vec<String>,
    by_name: HashMap<String, BitId>,
    frozen: bool,
}

impl BitRegistry {
    /// Builds a fresh registry with just the five reserved bits interned.
    pub fn new() -> Self {
        let mut registry = BitRegistry { names: Vec::new(), by_name: HashMap::new(), frozen: false };
        for name in RESERVED_NAMES {
            registry.intern(name);
        }
        registry
    }

    /// Assigns a new id to `name` if it has not been seen before, else
    /// returns its existing id. Panics if called after `freeze`.
    pub fn intern(&mut self, name: impl AsRef<str>) -> BitId {
        assert!(!self.frozen, "cannot intern '{}' into a frozen bit registry", name.as_ref());
        if let Some(&id) = self.by_name.get(name.as_ref()) {
            return id;
        }
        let id = BitId(self.names.len());
        self.names.push(name.as_ref().to_string());
        self.by_name.insert(name.as_ref().to_string(), id);
        id
    }

    /// Freezes the registry: `intern` panics thereafter. Called once the
    /// world builder has finished registering every bit.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn get(&self, name: &str) -> Option<BitId> {
        self.by_name.get(name).copied()
    }

    pub fn name(&self, id: BitId) -> &str {
        &self.names[id.0]
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn day(&self) -> BitId {
        self.by_name["Day"]
    }

    pub fn night(&self) -> BitId {
        self.by_name["Night"]
    }

    pub fn banned(&self) -> BitId {
        self.by_name["Banned"]
    }

    pub fn everything(&self) -> BitId {
        self.by_name["Everything"]
    }

    pub fn hint_bypass(&self) -> BitId {
        self.by_name["HintBypass"]
    }

    /// All bits whose name starts with `prefix`, in registration order.
    /// Not required on the hot path — used for unique-item grouping and
    /// diagnostics.
    pub fn all_bits_with_name_prefix(&self, prefix: &str) -> Vec<BitId> {
        self.names
            .iter()
            .enumerate()
            .filter(|(_, name)| name.starts_with(prefix))
            .map(|(idx, _)| BitId(idx))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_bits_come_first_in_fixed_order() {
        let registry = BitRegistry::new();
        assert_eq!(registry.day(), BitId(0));
        assert_eq!(registry.night(), BitId(1));
        assert_eq!(registry.banned(), BitId(2));
        assert_eq!(registry.everything(), BitId(3));
        assert_eq!(registry.hint_bypass(), BitId(4));
        assert_eq!(registry.len(), 5);
    }

    #[test]
    fn interning_the_same_name_twice_returns_the_same_id() {
        let mut registry = BitRegistry::new();
        let a = registry.intern("Gratitude Crystal x1");
        let b = registry.intern("Gratitude Crystal x1");
        assert_eq!(a, b);
        assert_eq!(registry.len(), 6);
    }

    #[test]
    fn prefix_search_preserves_insertion_order() {
        let mut registry = BitRegistry::new();
        registry.intern("Faron Woods - Deep Woods - Chest");
        registry.intern("Skyloft - Bazaar - Chest");
        registry.intern("Faron Woods - Inside the Great Tree - Chest");
        let hits = registry.all_bits_with_name_prefix("Faron Woods");
        assert_eq!(hits.len(), 2);
        assert!(registry.name(hits[0]).contains("Deep Woods"));
        assert!(registry.name(hits[1]).contains("Great Tree"));
    }

    #[test]
    #[should_panic]
    fn interning_after_freeze_panics() {
        let mut registry = BitRegistry::new();
        registry.freeze();
        registry.intern("Longshot");
    }
}
