use std::fs;

use clap::Parser;
use flexi_logger::{AdaptiveFormat, Logger, WriteMode};
use serde::Deserialize;

use sslogic::cli::Cli;
use sslogic::graph_logic::options::surface::PreplacementKind;
use sslogic::graph_logic::world::area::Area;
use sslogic::graph_logic::world::catalog::Catalog;
use sslogic::prelude::*;

/// The JSON shape a world data file carries: the area tree and catalog
/// `World::build` consumes, plus the handful of world-derived option
/// fields §6 treats as "parsed from data files" rather than CLI flags
/// (`dungeon_names`, `vanilla_placements`, ...).
#[derive(Deserialize)]
struct WorldData {
    root: Area,
    catalog: Catalog,
    #[serde(default)]
    dungeon_names: Vec<String>,
    #[serde(default)]
    triforce_item_names: Vec<String>,
    #[serde(default)]
    vanilla_placements: Vec<(String, String, PreplacementKind)>,
    #[serde(default)]
    may_be_placed_items: Vec<String>,
    #[serde(default)]
    duplicable_items: Vec<String>,
    #[serde(default)]
    got_start_check: String,
    #[serde(default)]
    dungeon_final_checks: BTreeMap<String, String>,
    #[serde(default)]
    sky_keep_final_check: String,
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let _logger = Logger::try_with_env_or_str(cli.log_level.clone().unwrap_or("info".into()).as_str())?
        .write_mode(WriteMode::BufferAndFlush)
        .log_to_stderr()
        .adaptive_format_for_stderr(match cfg!(debug_assertions) {
            true => AdaptiveFormat::WithThread,
            _ => AdaptiveFormat::Default,
        })
        .set_palette("b196;208;195;111;67".to_owned())
        .start()?;

    let text = fs::read_to_string(&cli.world)
        .with_context(|| format!("reading world data file '{}'", cli.world.display()))?;
    let data: WorldData =
        serde_json::from_str(&text).with_context(|| format!("parsing world data file '{}'", cli.world.display()))?;

    let mut options = cli.options;
    options.dungeon_names = data.dungeon_names;
    options.triforce_item_names = data.triforce_item_names;
    options.vanilla_placements = data.vanilla_placements;
    options.may_be_placed_items = data.may_be_placed_items;
    options.duplicable_items = data.duplicable_items;
    options.got_start_check = data.got_start_check;
    options.dungeon_final_checks = data.dungeon_final_checks;
    options.sky_keep_final_check = data.sky_keep_final_check;

    let world = World::build(&data.root, &data.catalog)?;

    let seed = options.resolve_seed(rand::random());
    log::info!("randomizing with seed {seed}");

    let outcome = Rando::randomize_with_retries(&world, &options, seed, cli.max_retries)?;

    let hash = sslogic::graph_logic::placement_file::compute_hash(outcome.seed, &cli.permalink, &cli.version);
    let placement = outcome.logic.placement();
    let file = PlacementFile {
        version: cli.version.clone(),
        permalink: cli.permalink.clone(),
        hash,
        starting_items: placement.starting_items().iter().cloned().collect(),
        required_dungeons: outcome.required_dungeons.clone(),
        item_locations: placement.location_to_item().clone(),
        gossip_stone_hints: BTreeMap::new(),
        trial_hints: BTreeMap::new(),
        entrance_connections: placement.entrance_to_exit().clone(),
        trial_connections: BTreeMap::new(),
    };

    let encoded = file.encode()?;
    match &cli.output {
        Some(path) => {
            fs::write(path, encoded).with_context(|| format!("writing placement file '{}'", path.display()))?
        }
        None => println!("{encoded}"),
    }

    Ok(())
}

fn main() {
    if let Err(e) = run() {
        log::error!("fatal error: {e}");
        std::process::exit(1);
    }
}
