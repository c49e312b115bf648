//! Procedural terrain generation and wildfire spread over a 2D tile grid.
//!
//! [`generator`] turns layered gradient noise into height, water, moisture
//! and vegetation, and assembles a [`World`]. [`simulation`] runs fire over
//! that world one tick at a time.

pub mod error;
pub mod generator;
pub mod hydrology;
pub mod map;
pub mod noise;
pub mod params;
pub mod rng;
pub mod simulation;
pub mod vegetation;
pub mod world;

pub use error::{Error, Result};
pub use generator::{generate_world, GeneratorConfig, WorldGenerator};
pub use rng::{RandomSource, SeededRandom};
pub use simulation::{BurnState, FireConfig, FireSpreadSimulation, Simulation};
pub use vegetation::Vegetation;
pub use world::{Tile, TilePos, World};
