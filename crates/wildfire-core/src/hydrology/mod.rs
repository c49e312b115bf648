//! Water features derived from the height field: lake → river → moisture.

pub mod lakes;
pub mod moisture;
pub mod rivers;

pub use lakes::lake_map;
pub use moisture::{moisture_map, MoistureParams, WATER_MOISTURE};
pub use rivers::river_map;
