use thiserror::Error;

/// Failures surfaced by world generation, grid access and the simulation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("coordinates ({x}, {y}) are outside the {width}×{depth} grid")]
    OutOfBounds { x: i64, y: i64, width: usize, depth: usize },

    #[error("index {index} is out of range for {len} values")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("world sides differ ({width}×{depth}); a square grid is required")]
    NotSquare { width: usize, depth: usize },

    #[error("cannot build an empty {width}×{depth} world")]
    EmptyWorld { width: usize, depth: usize },

    #[error("expected {expected} tiles, got {actual}")]
    TileCount { expected: usize, actual: usize },

    #[error("invalid generator configuration: {0}")]
    InvalidConfig(String),

    #[error("required parameter `{0}` is missing")]
    MissingParameter(String),

    #[error("tile ({x}, {y}) has already burnt and cannot be ignited")]
    AlreadyBurnt { x: usize, y: usize },

    #[error("tile ({x}, {y}) is water and cannot be ignited")]
    Prohibited { x: usize, y: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
