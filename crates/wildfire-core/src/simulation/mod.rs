//! Cellular-automaton simulations over a generated [`World`](crate::world::World).
//!
//! [`Simulation`] is the capability a driver needs: seed, tick, detect the
//! end, reset, and read back which tiles changed for incremental redraws.
//! Fire spread is the one implementation.

pub mod calibrate;
pub mod factors;
pub mod fire;

use crate::error::Result;
use crate::world::TilePos;

pub use fire::{BurnState, FireConfig, FireSpreadSimulation};

pub trait Simulation {
    /// Start a run at time 0 from `starting` tiles.
    fn initialize(&mut self, starting: &[TilePos]) -> Result<()>;

    /// Advance exactly one tick.
    fn update(&mut self) -> Result<()>;

    fn has_ended(&self) -> bool;

    /// Return the world and every attached parameter to its initial state.
    fn reset(&mut self);

    /// Tiles whose state changed in the most recent tick.
    fn last_changed_tiles(&self) -> &[TilePos];

    /// Tiles a driver must not let users pick as starting tiles.
    fn prohibited_tiles(&self) -> &[TilePos];
}
