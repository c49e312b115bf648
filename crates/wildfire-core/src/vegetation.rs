//! Moisture-banded vegetation with a deliberate random share of plain grass,
//! which keeps vegetation boundaries from looking ruled.

use serde::{Deserialize, Serialize};

use crate::map::Map;
use crate::rng::RandomSource;

/// Probability that a cell follows the moisture bands instead of staying grass.
pub const BANDED_SHARE: f32 = 0.85;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Vegetation {
    #[default]
    Grass,
    Sparse,
    Forest,
    Swamp,
}

impl Vegetation {
    /// Band lookup: `<30` sparse, `<50` grass, `<70` forest, otherwise swamp.
    pub fn from_moisture(moisture: u8) -> Self {
        match moisture {
            0..=29 => Vegetation::Sparse,
            30..=49 => Vegetation::Grass,
            50..=69 => Vegetation::Forest,
            _ => Vegetation::Swamp,
        }
    }

    /// One-character symbol for text dumps.
    pub fn glyph(self) -> char {
        match self {
            Vegetation::Grass => '"',
            Vegetation::Sparse => '.',
            Vegetation::Forest => '♣',
            Vegetation::Swamp => '%',
        }
    }
}

pub fn vegetation_map(moisture: &Map<u8>, rng: &mut dyn RandomSource) -> Map<Vegetation> {
    let mut vegetation = Map::new(moisture.width, moisture.depth);
    for (cell, &m) in vegetation.data.iter_mut().zip(&moisture.data) {
        if rng.chance(BANDED_SHARE) {
            *cell = Vegetation::from_moisture(m);
        }
    }
    vegetation
}
