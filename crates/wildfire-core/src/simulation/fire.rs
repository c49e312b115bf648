//! Fire spread: a probabilistic cellular automaton over the world's tiles.
//!
//! Each tile is Unburnt, Burning or Burnt. Every tick, each tile in the
//! burning set runs an ignition trial against every Unburnt Moore neighbour,
//! then advances its own burn counter and burns out once the counter reaches
//! its vegetation's burn time. The next burning set is built from a snapshot
//! of the current one, so a tile ignited this tick first spreads next tick.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::{info, trace};

use super::calibrate::step_probability;
use super::factors::{combine, moisture_factor, slope_factor, vegetation_factor, wind_factor};
use super::Simulation;
use crate::error::{Error, Result};
use crate::params::{Parameter, VectorParameter};
use crate::rng::{RandomSource, SeededRandom};
use crate::vegetation::Vegetation;
use crate::world::{TilePos, World};

pub const WIND_SPEED: &str = "wind_speed";
pub const WIND_DIRECTION: &str = "wind_direction";

pub const MAX_WIND_SPEED: f32 = 50.0;
pub const MAX_WIND_DIRECTION: i32 = 360;

/// Burn time for fuel without a specific entry, and the ceiling of every burn counter.
pub const DEFAULT_BURN_TIME: i32 = 5;

/// Ticks a tile of this vegetation stays Burning.
pub fn burn_time(vegetation: Vegetation) -> i32 {
    match vegetation {
        Vegetation::Grass => 1,
        Vegetation::Sparse => 2,
        Vegetation::Swamp => 3,
        Vegetation::Forest => 4,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FireConfig {
    /// Initial wind speed, clamped to `[0, 50]`.
    pub wind_speed: f32,
    /// Initial wind direction in degrees, clamped to `[0, 360]`.
    pub wind_direction: i32,
}

impl Default for FireConfig {
    fn default() -> Self {
        Self { wind_speed: 5.0, wind_direction: 0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BurnState {
    Unburnt,
    Burning,
    Burnt,
}

/// Per-tile fire state, one entry per flat tile index.
#[derive(Debug, Clone)]
struct FireTiles {
    is_burning: VectorParameter<bool>,
    has_burned: VectorParameter<bool>,
    burning_for: VectorParameter<i32>,
    burn_time: VectorParameter<i32>,
}

impl FireTiles {
    fn for_world(world: &World) -> Self {
        let n = world.len();
        let burn_times: Vec<i32> = world.tiles().iter().map(|t| burn_time(t.vegetation())).collect();
        Self {
            is_burning: VectorParameter::new(n, false, false, true),
            has_burned: VectorParameter::new(n, false, false, true),
            burning_for: VectorParameter::new(n, 0, 0, DEFAULT_BURN_TIME),
            burn_time: VectorParameter::from_values(burn_times, 0, DEFAULT_BURN_TIME),
        }
    }

    fn reset(&mut self) {
        self.is_burning.reset();
        self.has_burned.reset();
        self.burning_for.reset();
        self.burn_time.reset();
    }

    fn state(&self, index: usize) -> Result<BurnState> {
        Ok(if self.is_burning.get(index)? {
            BurnState::Burning
        } else if self.has_burned.get(index)? {
            BurnState::Burnt
        } else {
            BurnState::Unburnt
        })
    }
}

pub struct FireSpreadSimulation<R: RandomSource = SeededRandom> {
    world: World,
    rng: R,
    tiles: FireTiles,
    current_time: u32,
    burning: Vec<TilePos>,
    prohibited: Vec<TilePos>,
    changes_over_time: BTreeMap<u32, Vec<TilePos>>,
}

impl<R: RandomSource> FireSpreadSimulation<R> {
    /// Take ownership of `world` and attach wind and per-tile fire parameters.
    pub fn new(mut world: World, config: FireConfig, rng: R) -> Self {
        let params = world.params_mut();
        params.add(WIND_SPEED, Parameter::new(config.wind_speed, 0.0, MAX_WIND_SPEED));
        params.add(WIND_DIRECTION, Parameter::new(config.wind_direction, 0, MAX_WIND_DIRECTION));

        let tiles = FireTiles::for_world(&world);
        let mut sim = Self {
            world,
            rng,
            tiles,
            current_time: 0,
            burning: Vec::new(),
            prohibited: Vec::new(),
            changes_over_time: BTreeMap::new(),
        };
        sim.collect_prohibited();
        sim
    }

    fn collect_prohibited(&mut self) {
        self.prohibited = self.world.tiles().iter().filter(|t| t.is_water()).map(|t| t.pos()).collect();
    }

    /// Confirm the world still carries the wind parameters this simulation reads.
    pub fn verify_parameters(&self) -> Result<()> {
        let params = self.world.params();
        if params.get::<f32>(WIND_SPEED).is_none() {
            return Err(Error::MissingParameter(WIND_SPEED.to_string()));
        }
        if params.get::<i32>(WIND_DIRECTION).is_none() {
            return Err(Error::MissingParameter(WIND_DIRECTION.to_string()));
        }
        let n = self.world.len();
        for (name, len) in [
            ("is_burning", self.tiles.is_burning.len()),
            ("has_burned", self.tiles.has_burned.len()),
            ("burning_for", self.tiles.burning_for.len()),
            ("burn_time", self.tiles.burn_time.len()),
        ] {
            if len != n {
                return Err(Error::MissingParameter(format!("{name} ({len} of {n} tiles)")));
            }
        }
        Ok(())
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn rng(&self) -> &R {
        &self.rng
    }

    /// Release the world, dropping the simulation state.
    pub fn into_world(self) -> World {
        self.world
    }

    pub fn current_time(&self) -> u32 {
        self.current_time
    }

    pub fn burning_tiles(&self) -> &[TilePos] {
        &self.burning
    }

    /// Tiles that changed at `tick`; empty if none did.
    pub fn changes_at(&self, tick: u32) -> &[TilePos] {
        self.changes_over_time.get(&tick).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Current `(speed, direction)`. An unconfigured wind reads as calm from 0°.
    pub fn wind(&self) -> (f32, i32) {
        let params = self.world.params();
        (
            params.value::<f32>(WIND_SPEED).unwrap_or(0.0),
            params.value::<i32>(WIND_DIRECTION).unwrap_or(0),
        )
    }

    /// Set wind speed and direction, clamped to their ranges.
    pub fn set_wind(&mut self, speed: f32, direction: i32) -> Result<()> {
        let params = self.world.params_mut();
        if !params.set(WIND_SPEED, speed) {
            return Err(Error::MissingParameter(WIND_SPEED.to_string()));
        }
        if !params.set(WIND_DIRECTION, direction) {
            return Err(Error::MissingParameter(WIND_DIRECTION.to_string()));
        }
        Ok(())
    }

    pub fn tile_state(&self, pos: TilePos) -> Result<BurnState> {
        self.tiles.state(self.world.tile_index(pos)?)
    }

    pub fn is_burning(&self, pos: TilePos) -> Result<bool> {
        self.tiles.is_burning.get(self.world.tile_index(pos)?)
    }

    /// Consecutive ticks `pos` has spent burning.
    pub fn burning_for(&self, pos: TilePos) -> Result<i32> {
        self.tiles.burning_for.get(self.world.tile_index(pos)?)
    }

    pub fn burn_time(&self, pos: TilePos) -> Result<i32> {
        self.tiles.burn_time.get(self.world.tile_index(pos)?)
    }

    /// Per-tick probability that burning `source` ignites `target`.
    ///
    /// The combined vegetation, slope, moisture and wind factors are read as
    /// the total chance over the source's burn time and calibrated down to a
    /// single tick.
    pub fn spread_probability(&self, source: TilePos, target: TilePos) -> Result<f32> {
        let from = self.world.tile(source)?;
        let to = self.world.tile(target)?;

        let moisture = moisture_factor(to.moisture());
        if moisture == 0.0 {
            return Ok(0.0);
        }
        let (speed, direction) = self.wind();
        let adjusted = combine(
            vegetation_factor(to.vegetation()),
            slope_factor(from.height(), to.height()),
            moisture,
            wind_factor(speed, direction as f32, source, target),
        );
        let steps = self.tiles.burn_time.get(self.world.tile_index(source)?)?;
        Ok(step_probability(adjusted, steps.max(0) as u32))
    }

    fn try_ignite(&mut self, source: TilePos, target: TilePos) -> Result<bool> {
        let p = self.spread_probability(source, target)?;
        Ok(self.rng.next_unit() < p)
    }

    /// Map the current state of `pos` to one of two caller colours.
    pub fn tile_color<C: Copy>(&self, pos: TilePos, burning: C, idle: C) -> Result<C> {
        Ok(if self.is_burning(pos)? { burning } else { idle })
    }

    /// Colour for every tile changed in the last tick, keyed by flat index.
    pub fn changed_tile_colors<C: Copy>(&self, burning: C, burnt: C) -> HashMap<usize, C> {
        self.last_changed_tiles()
            .iter()
            .filter_map(|&pos| {
                let index = self.world.tile_index(pos).ok()?;
                let lit = self.tiles.is_burning.get(index).ok()?;
                Some((index, if lit { burning } else { burnt }))
            })
            .collect()
    }
}

impl<R: RandomSource> Simulation for FireSpreadSimulation<R> {
    fn initialize(&mut self, starting: &[TilePos]) -> Result<()> {
        let mut seeds = Vec::with_capacity(starting.len());
        for &pos in starting {
            let index = self.world.tile_index(pos)?;
            if self.world.tile(pos)?.is_water() {
                return Err(Error::Prohibited { x: pos.x, y: pos.y });
            }
            if self.tiles.has_burned.get(index)? {
                return Err(Error::AlreadyBurnt { x: pos.x, y: pos.y });
            }
            if !seeds.iter().any(|&(p, _)| p == pos) {
                seeds.push((pos, index));
            }
        }

        if self.prohibited.is_empty() {
            self.collect_prohibited();
        }
        self.current_time = 0;
        self.changes_over_time.clear();
        // Tiles still lit from an earlier start go back to Unburnt.
        for pos in std::mem::take(&mut self.burning) {
            let index = self.world.tile_index(pos)?;
            self.tiles.is_burning.set(index, false)?;
            self.tiles.burning_for.set(index, 0)?;
        }

        for &(pos, index) in &seeds {
            self.tiles.is_burning.set(index, true)?;
            self.burning.push(pos);
        }
        if !self.burning.is_empty() {
            self.changes_over_time.insert(0, self.burning.clone());
        }
        info!(starting = self.burning.len(), "fire initialized");
        Ok(())
    }

    fn update(&mut self) -> Result<()> {
        self.current_time += 1;
        let current = std::mem::take(&mut self.burning);
        let mut next = Vec::with_capacity(current.len() * 2);
        let mut changed = Vec::new();

        for &pos in &current {
            let index = self.world.tile_index(pos)?;
            for neighbor in self.world.neighbors(pos, 1)? {
                let ni = self.world.tile_index(neighbor)?;
                if self.tiles.is_burning.get(ni)? || self.tiles.has_burned.get(ni)? {
                    continue;
                }
                if self.try_ignite(pos, neighbor)? {
                    self.tiles.is_burning.set(ni, true)?;
                    next.push(neighbor);
                    changed.push(neighbor);
                }
            }

            let burning_for = self.tiles.burning_for.get(index)? + 1;
            self.tiles.burning_for.set(index, burning_for)?;
            if burning_for >= self.tiles.burn_time.get(index)? {
                self.tiles.is_burning.set(index, false)?;
                self.tiles.has_burned.set(index, true)?;
                changed.push(pos);
            } else {
                next.push(pos);
            }
        }

        trace!(tick = self.current_time, burning = next.len(), changed = changed.len(), "fire tick");
        if !changed.is_empty() {
            self.changes_over_time.insert(self.current_time, changed);
        }
        if next.is_empty() && !current.is_empty() {
            info!(tick = self.current_time, "fire burnt out");
        }
        self.burning = next;
        Ok(())
    }

    fn has_ended(&self) -> bool {
        self.burning.is_empty()
    }

    fn reset(&mut self) {
        self.current_time = 0;
        self.changes_over_time.clear();
        self.burning.clear();
        self.prohibited.clear();
        self.world.params_mut().reset();
        self.tiles.reset();
        info!("fire simulation reset");
    }

    fn last_changed_tiles(&self) -> &[TilePos] {
        self.changes_at(self.current_time)
    }

    fn prohibited_tiles(&self) -> &[TilePos] {
        &self.prohibited
    }
}
