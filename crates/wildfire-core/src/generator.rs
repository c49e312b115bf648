//! World generation pipeline: height → lakes → rivers → moisture →
//! vegetation → assembled tiles.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::hydrology::{lake_map, moisture_map, river_map, MoistureParams, WATER_MOISTURE};
use crate::map::Map;
use crate::noise::layered::LayeredNoise;
use crate::noise::LatticeNoise;
use crate::rng::{RandomSource, SeededRandom};
use crate::vegetation::{vegetation_map, Vegetation};
use crate::world::{Tile, World};

/// Height given to water tiles regardless of the generated terrain.
pub const WATER_HEIGHT: f32 = 0.01;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub width: usize,
    pub depth: usize,
    /// Normalised height below which a cell is lake.
    pub lake_threshold: f32,
    pub river_count: u32,
    pub octaves: u32,
    pub persistence: f32,
    pub scale: f32,
    pub moisture_scale: f32,
    pub moisture_radius: u32,
    /// `None` seeds from the wall clock.
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            width: 64,
            depth: 64,
            lake_threshold: 0.15,
            river_count: 3,
            octaves: 5,
            persistence: 0.4,
            scale: 5.0,
            moisture_scale: 5.0,
            moisture_radius: 2,
            seed: None,
        }
    }
}

impl GeneratorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.depth == 0 {
            return Err(Error::EmptyWorld { width: self.width, depth: self.depth });
        }
        if !(0.0..=1.0).contains(&self.lake_threshold) {
            return Err(Error::InvalidConfig(format!(
                "lake_threshold must lie in [0, 1], got {}",
                self.lake_threshold
            )));
        }
        for (name, v) in [("scale", self.scale), ("moisture_scale", self.moisture_scale)] {
            if !(v.is_finite() && v > 0.0) {
                return Err(Error::InvalidConfig(format!("{name} must be positive, got {v}")));
            }
        }
        if !self.persistence.is_finite() {
            return Err(Error::InvalidConfig(format!(
                "persistence must be finite, got {}",
                self.persistence
            )));
        }
        Ok(())
    }

    fn layers(&self) -> LayeredNoise {
        LayeredNoise { octaves: self.octaves, persistence: self.persistence, scale: self.scale }
    }

    fn moisture(&self) -> MoistureParams {
        MoistureParams { radius: self.moisture_radius, scale: self.moisture_scale }
    }
}

/// Intermediate fields, kept for inspection before assembly.
#[derive(Debug, Clone)]
pub struct TerrainMaps {
    pub height: Map<f32>,
    pub lakes: Map<bool>,
    pub rivers: Map<bool>,
    pub moisture: Map<u8>,
    pub vegetation: Map<Vegetation>,
}

#[derive(Debug, Clone, Default)]
pub struct WorldGenerator {
    pub config: GeneratorConfig,
}

impl WorldGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    /// Generate with the configured seed, or a wall-clock seed if none is set.
    pub fn generate(&self) -> Result<World> {
        let mut rng = match self.config.seed {
            Some(seed) => SeededRandom::new(seed),
            None => SeededRandom::from_time(),
        };
        info!(seed = rng.seed(), "generating world");
        self.generate_with(&mut rng)
    }

    pub fn generate_with(&self, rng: &mut dyn RandomSource) -> Result<World> {
        let maps = self.generate_maps(rng)?;
        assemble(&maps)
    }

    /// Run every derivation stage without assembling tiles.
    pub fn generate_maps(&self, rng: &mut dyn RandomSource) -> Result<TerrainMaps> {
        let cfg = &self.config;
        cfg.validate()?;
        let source = LatticeNoise::new();

        let height = cfg.layers().build(cfg.width, cfg.depth, &source, rng);
        debug!(min = height.min_value(), max = height.max_value(), "height field built");

        let lakes = lake_map(&height, cfg.lake_threshold);
        let rivers = river_map(&lakes, cfg.river_count, rng);
        debug!(lake_cells = lakes.count(), river_cells = rivers.count(), "hydrology derived");

        let moisture = moisture_map(&lakes, &rivers, cfg.moisture(), &source, rng);
        let mean = moisture.data.iter().map(|&m| m as f32).sum::<f32>() / moisture.data.len() as f32;
        debug!(mean_moisture = mean, "moisture spread");

        let vegetation = vegetation_map(&moisture, rng);
        Ok(TerrainMaps { height, lakes, rivers, moisture, vegetation })
    }
}

/// Build one tile per cell. Water cells (moisture 100) sit at [`WATER_HEIGHT`].
pub fn assemble(maps: &TerrainMaps) -> Result<World> {
    let (width, depth) = (maps.height.width, maps.height.depth);
    let world = World::from_fn(width, depth, |pos| {
        let (x, y) = (pos.x as i32, pos.y as i32);
        let moisture = maps.moisture.get(x, y);
        let height = if moisture == WATER_MOISTURE { WATER_HEIGHT } else { maps.height.get(x, y) };
        Tile::new(pos, height, moisture, maps.vegetation.get(x, y))
    })?;
    let water = world.tiles().iter().filter(|t| t.is_water()).count();
    info!(width, depth, water_tiles = water, "world assembled");
    Ok(world)
}

/// Generate a `width × depth` world with default noise settings.
pub fn generate_world(
    width: usize,
    depth: usize,
    lake_threshold: f32,
    river_count: u32,
    rng: &mut dyn RandomSource,
) -> Result<World> {
    let config = GeneratorConfig { width, depth, lake_threshold, river_count, ..GeneratorConfig::default() };
    WorldGenerator::new(config).generate_with(rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::TilePos;

    fn config(seed: u64) -> GeneratorConfig {
        GeneratorConfig { width: 32, depth: 32, seed: Some(seed), ..GeneratorConfig::default() }
    }

    #[test]
    fn same_seed_same_world() {
        let a = WorldGenerator::new(config(42)).generate().unwrap();
        let b = WorldGenerator::new(config(42)).generate().unwrap();
        assert_eq!(a.tiles(), b.tiles());
    }

    #[test]
    fn different_seeds_differ() {
        let a = WorldGenerator::new(config(1)).generate().unwrap();
        let b = WorldGenerator::new(config(2)).generate().unwrap();
        assert_ne!(a.tiles(), b.tiles());
    }

    #[test]
    fn every_cell_is_populated() {
        let w = WorldGenerator::new(config(7)).generate().unwrap();
        assert_eq!(w.len(), 32 * 32);
        for x in 0..32 {
            for y in 0..32 {
                assert_eq!(w.tile_at(x, y).unwrap().pos(), TilePos::new(x as usize, y as usize));
            }
        }
    }

    #[test]
    fn water_tiles_are_low() {
        let w = WorldGenerator::new(config(3)).generate().unwrap();
        for t in w.tiles() {
            if t.is_water() {
                assert_eq!(t.height(), WATER_HEIGHT);
            } else {
                assert!((0.0..=1.0).contains(&t.height()), "land height {} out of range", t.height());
            }
        }
    }

    #[test]
    fn lakes_are_water_in_the_world() {
        let gen = WorldGenerator::new(config(11));
        let maps = gen.generate_maps(&mut SeededRandom::new(11)).unwrap();
        let world = assemble(&maps).unwrap();
        for (x, y, lake) in maps.lakes.cells() {
            if lake {
                assert!(world.tile_at(x as i64, y as i64).unwrap().is_water());
            }
        }
    }

    #[test]
    fn zero_size_is_rejected() {
        let cfg = GeneratorConfig { width: 0, ..config(1) };
        assert!(matches!(WorldGenerator::new(cfg).generate(), Err(Error::EmptyWorld { .. })));
    }

    #[test]
    fn bad_scale_is_rejected() {
        let cfg = GeneratorConfig { scale: 0.0, ..config(1) };
        assert!(matches!(cfg.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn partial_json_config_fills_defaults() {
        let cfg: GeneratorConfig = serde_json::from_str(r#"{ "width": 20, "seed": 8 }"#).unwrap();
        assert_eq!(cfg.width, 20);
        assert_eq!(cfg.depth, 64);
        assert_eq!(cfg.seed, Some(8));
        assert_eq!(cfg.lake_threshold, 0.15);
        cfg.validate().unwrap();
    }

    #[test]
    fn convenience_entry_point_uses_arguments() {
        let w = generate_world(10, 12, 0.2, 1, &mut SeededRandom::new(5)).unwrap();
        assert_eq!((w.width(), w.depth()), (10, 12));
    }
}
