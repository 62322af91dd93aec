#![allow(dead_code)]

pub mod cli;
pub mod error;
pub mod graph_logic;

pub mod utils {
    pub mod prelude {
        pub use anyhow::{anyhow, Context, Error};
        pub type Result<T> = anyhow::Result<T, Error>;

        pub use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
    }
}

pub mod prelude {
    pub use super::error::RandoError;
    pub use super::graph_logic::prelude::*;
    pub use super::utils::prelude::*;
}
