//! Headless wildfire driver: generate a world, light it, tick until the fire
//! burns out, and print what happened.

use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use wildfire_core::{
    BurnState, FireConfig, FireSpreadSimulation, GeneratorConfig, SeededRandom, Simulation, TilePos, World,
    WorldGenerator,
};

#[derive(Parser, Debug)]
#[command(name = "wildfire-run", about = "Generate terrain and run a fire-spread simulation")]
struct Args {
    /// JSON file with `generator` and `fire` sections.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long)]
    width: Option<usize>,

    #[arg(long)]
    depth: Option<usize>,

    /// World seed; the fire uses `seed + 1`.
    #[arg(short, long)]
    seed: Option<u64>,

    #[arg(long)]
    lake_threshold: Option<f32>,

    #[arg(long)]
    rivers: Option<u32>,

    #[arg(long)]
    wind_speed: Option<f32>,

    /// Degrees, 0 = towards +x.
    #[arg(long)]
    wind_direction: Option<i32>,

    /// Starting tile as `x,y`; repeat for several. Defaults to the centre.
    #[arg(short, long = "ignite", value_parser = parse_pos)]
    ignite: Vec<TilePos>,

    /// Stop after this many ticks even if the fire is still burning.
    #[arg(long, default_value_t = 10_000)]
    max_ticks: u32,

    /// Print the final burn map.
    #[arg(long)]
    map: bool,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct RunConfig {
    generator: GeneratorConfig,
    fire: FireConfig,
}

fn parse_pos(s: &str) -> Result<TilePos, String> {
    let (x, y) = s.split_once(',').ok_or_else(|| format!("expected `x,y`, got `{s}`"))?;
    let x = x.trim().parse().map_err(|e| format!("bad x in `{s}`: {e}"))?;
    let y = y.trim().parse().map_err(|e| format!("bad y in `{s}`: {e}"))?;
    Ok(TilePos::new(x, y))
}

impl Args {
    fn run_config(&self) -> Result<RunConfig> {
        let mut cfg = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
                serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?
            }
            None => RunConfig::default(),
        };
        let g = &mut cfg.generator;
        if let Some(v) = self.width {
            g.width = v;
        }
        if let Some(v) = self.depth {
            g.depth = v;
        }
        if let Some(v) = self.lake_threshold {
            g.lake_threshold = v;
        }
        if let Some(v) = self.rivers {
            g.river_count = v;
        }
        if self.seed.is_some() {
            g.seed = self.seed;
        }
        if let Some(v) = self.wind_speed {
            cfg.fire.wind_speed = v;
        }
        if let Some(v) = self.wind_direction {
            cfg.fire.wind_direction = v;
        }
        Ok(cfg)
    }
}

/// The requested tiles, or the non-water tile closest to the centre.
fn starting_tiles(world: &World, requested: &[TilePos], prohibited: &HashSet<TilePos>) -> Result<Vec<TilePos>> {
    if !requested.is_empty() {
        for pos in requested {
            if prohibited.contains(pos) {
                bail!("tile ({}, {}) is water and cannot be ignited", pos.x, pos.y);
            }
        }
        return Ok(requested.to_vec());
    }
    let (cx, cy) = (world.width() as i64 / 2, world.depth() as i64 / 2);
    world
        .tiles()
        .iter()
        .map(|t| t.pos())
        .filter(|p| !prohibited.contains(p))
        .min_by_key(|p| (p.x as i64 - cx).abs() + (p.y as i64 - cy).abs())
        .map(|p| vec![p])
        .context("world has no flammable tile")
}

fn render<R: wildfire_core::RandomSource>(sim: &FireSpreadSimulation<R>) -> Result<String> {
    let world = sim.world();
    let mut out = String::with_capacity(world.len() + world.depth());
    for y in 0..world.depth() {
        for x in 0..world.width() {
            let pos = TilePos::new(x, y);
            let tile = world.tile(pos)?;
            let c = match sim.tile_state(pos)? {
                BurnState::Burning => '*',
                BurnState::Burnt => '#',
                BurnState::Unburnt if tile.is_water() => '~',
                BurnState::Unburnt => tile.vegetation().glyph(),
            };
            out.push(c);
        }
        out.push('\n');
    }
    Ok(out)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_target(false)
        .init();

    let cfg = args.run_config()?;
    let fire_seed = cfg.generator.seed.map(|s| s.wrapping_add(1));
    let world = WorldGenerator::new(cfg.generator.clone()).generate().context("generating world")?;

    let rng = fire_seed.map(SeededRandom::new).unwrap_or_else(SeededRandom::from_time);
    info!(seed = rng.seed(), "fire seed");
    let mut sim = FireSpreadSimulation::new(world, cfg.fire, rng);
    sim.verify_parameters()?;

    let prohibited: HashSet<TilePos> = sim.prohibited_tiles().iter().copied().collect();
    let start = starting_tiles(sim.world(), &args.ignite, &prohibited)?;
    sim.initialize(&start)?;

    let mut burnt_total = 0usize;
    while !sim.has_ended() {
        if sim.current_time() >= args.max_ticks {
            warn!(ticks = args.max_ticks, burning = sim.burning_tiles().len(), "tick limit reached");
            break;
        }
        sim.update()?;
        let changed = sim.last_changed_tiles();
        let burnt = changed
            .iter()
            .filter(|&&p| matches!(sim.tile_state(p), Ok(BurnState::Burnt)))
            .count();
        burnt_total += burnt;
        println!(
            "tick {:>4}: {:>5} burning, {:>4} ignited, {:>4} burnt out",
            sim.current_time(),
            sim.burning_tiles().len(),
            changed.len() - burnt,
            burnt
        );
    }

    let total = sim.world().len();
    info!(
        ticks = sim.current_time(),
        burnt = burnt_total,
        share = burnt_total as f32 / total as f32,
        "run finished"
    );

    if args.map {
        print!("{}", render(&sim)?);
    }
    Ok(())
}
