//! CLI entry option surface: the handful of flags that only make sense
//! for the binary driver (where world data comes from, where the
//! placement file goes, the retry budget, logging verbosity) flattened
//! together with the library's own `RandoOptions`.

use std::path::PathBuf;

use clap::Parser;

use crate::graph_logic::options::surface::RandoOptions;

#[derive(Clone, Debug, Parser)]
#[command(
    author,
    version,
    about = "Generates a logic-aware randomized item and entrance placement for a fixed adventure-game world"
)]
pub struct Cli {
    /// Path to the world data file: the area tree, catalog, and the
    /// handful of world-derived option fields (`dungeon_names`,
    /// `vanilla_placements`, ...) bundled as one JSON document.
    #[arg(long)]
    pub world: PathBuf,

    /// Where to write the resulting placement file. Printed to stdout
    /// when omitted.
    #[arg(long)]
    pub output: Option<PathBuf>,

    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Recorded verbatim in the placement file and folded into its hash.
    #[arg(long, default_value = "")]
    pub permalink: String,

    /// Recorded verbatim in the placement file and folded into its hash.
    #[arg(long, default_value = env!("CARGO_PKG_VERSION"))]
    pub version: String,

    /// Additional seeds to try, incrementing from the resolved seed,
    /// before giving up on a run that keeps hitting `GenerationFailed`.
    #[arg(long, default_value_t = 10)]
    pub max_retries: u32,

    #[command(flatten)]
    pub options: RandoOptions,
}
