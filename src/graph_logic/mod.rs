pub mod bits;
pub mod entrance;
pub mod fill;
pub mod hints;
pub mod logic;
pub mod options;
pub mod placement;
pub mod placement_file;
pub mod rando;
pub mod requirement;
pub mod solver;
pub mod world;

pub mod prelude {
    pub use super::bits::inventory::Inventory;
    pub use super::bits::registry::{BitId, BitRegistry};
    pub use super::entrance::pools::EntrancePool;
    pub use super::entrance::randomizer::EntranceRandomizer;
    pub use super::fill::bfa::BackwardFillAlgorithm;
    pub use super::hints::oracle::HintOracle;
    pub use super::logic::facade::Logic;
    pub use super::logic::settings::LogicSettings;
    pub use super::options::compile::CompiledOptions;
    pub use super::options::surface::RandoOptions;
    pub use super::placement::store::Placement;
    pub use super::placement_file::PlacementFile;
    pub use super::rando::{Rando, RandoOutcome};
    pub use super::requirement::dnf::DnfRequirement;
    pub use super::requirement::vector::RequirementVector;
    pub use super::solver::fill::fill_inventory;
    pub use super::world::area::Area;
    pub use super::world::builder::World;
}
