//! The placement file (§6): the JSON document handed to the game-patcher
//! external collaborator. Field names are kebab-case on the wire via
//! `serde(rename)` rather than relying on Rust's own field casing.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::utils::prelude::*;

/// A representative, fixed set of in-game names the hash string draws
/// three tokens from. The exact roster is cosmetic (it only has to be
/// stable and seed-derived); §6 does not name one, so this stands in for
/// the canonical list a data file would normally supply.
const HASH_NAME_LIST: &[&str] = &[
    "Deku Baba", "Skyward Strike", "Goddess Cube", "Blessed Butterfly", "Kikwi", "Ancient Flower",
    "Gratitude Crystal", "Water Dragon", "Thunder Dragon", "Fire Dragon", "Whip", "Beetle", "Clawshot",
    "Gust Bellows", "Bug Net", "Slingshot", "Bomb Bag", "Harp", "Mogma Mitts", "Sea Chart",
];

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PlacementFile {
    pub version: String,
    pub permalink: String,
    pub hash: String,
    #[serde(rename = "starting-items")]
    pub starting_items: Vec<String>,
    #[serde(rename = "required-dungeons")]
    pub required_dungeons: Vec<String>,
    #[serde(rename = "item-locations")]
    pub item_locations: BTreeMap<String, String>,
    #[serde(rename = "gossip-stone-hints")]
    pub gossip_stone_hints: BTreeMap<String, String>,
    #[serde(rename = "trial-hints")]
    pub trial_hints: BTreeMap<String, String>,
    #[serde(rename = "entrance-connections")]
    pub entrance_connections: BTreeMap<String, String>,
    #[serde(rename = "trial-connections")]
    pub trial_connections: BTreeMap<String, String>,
}

impl PlacementFile {
    pub fn encode(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn decode(text: &str) -> Result<PlacementFile> {
        Ok(serde_json::from_str(text)?)
    }
}

/// `md5(seed ∥ permalink ∥ version)`, seeding a secondary PRNG that picks
/// three tokens (with repetition allowed, matching a simple `choose`
/// loop) from `HASH_NAME_LIST`, space-joined.
pub fn compute_hash(seed: u64, permalink: &str, version: &str) -> String {
    let payload = format!("{seed}{permalink}{version}");
    let digest = md5::compute(payload.as_bytes());
    let mut seed_bytes = [0u8; 8];
    seed_bytes.copy_from_slice(&digest.0[0..8]);
    let mut rng = rand::rngs::StdRng::seed_from_u64(u64::from_le_bytes(seed_bytes));
    (0..3)
        .map(|_| *HASH_NAME_LIST.choose(&mut rng).expect("HASH_NAME_LIST is non-empty"))
        .collect::<Vec<_>>()
        .join(" ")
}
