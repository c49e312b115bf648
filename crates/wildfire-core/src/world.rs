//! Tile grid and global parameters.
//!
//! The world owns its tiles in one contiguous buffer addressed by
//! `x * depth + y`. Tiles are immutable once assembled; everything a
//! simulation mutates lives in parameters.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::params::ParameterStore;
use crate::vegetation::Vegetation;

/// Grid position; the handle callers use to refer to a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TilePos {
    pub x: usize,
    pub y: usize,
}

impl TilePos {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pos: TilePos,
    height: f32,
    moisture: u8,
    vegetation: Vegetation,
}

impl Tile {
    /// Moisture is capped at 100 and height floored at 0.
    pub fn new(pos: TilePos, height: f32, moisture: u8, vegetation: Vegetation) -> Self {
        Self { pos, height: height.max(0.0), moisture: moisture.min(100), vegetation }
    }

    pub fn pos(&self) -> TilePos {
        self.pos
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn moisture(&self) -> u8 {
        self.moisture
    }

    pub fn vegetation(&self) -> Vegetation {
        self.vegetation
    }

    pub fn is_water(&self) -> bool {
        self.moisture == 100
    }
}

#[derive(Debug, Clone)]
pub struct World {
    width: usize,
    depth: usize,
    tiles: Vec<Tile>,
    params: ParameterStore,
}

impl World {
    /// Take ownership of a complete tile set in flat-index order.
    ///
    /// Each tile's position must match its slot.
    pub fn from_tiles(width: usize, depth: usize, tiles: Vec<Tile>) -> Result<Self> {
        if width == 0 || depth == 0 {
            return Err(Error::EmptyWorld { width, depth });
        }
        let expected = width * depth;
        if tiles.len() != expected {
            return Err(Error::TileCount { expected, actual: tiles.len() });
        }
        for (i, tile) in tiles.iter().enumerate() {
            let want = TilePos::new(i / depth, i % depth);
            if tile.pos != want {
                return Err(Error::InvalidConfig(format!(
                    "tile at slot ({}, {}) reports position ({}, {})",
                    want.x, want.y, tile.pos.x, tile.pos.y
                )));
            }
        }
        Ok(Self { width, depth, tiles, params: ParameterStore::new() })
    }

    /// Build every tile from its position.
    pub fn from_fn(width: usize, depth: usize, mut f: impl FnMut(TilePos) -> Tile) -> Result<Self> {
        let tiles = (0..width)
            .flat_map(|x| (0..depth).map(move |y| TilePos::new(x, y)))
            .map(|pos| {
                let tile = f(pos);
                Tile { pos, ..tile }
            })
            .collect();
        Self::from_tiles(width, depth, tiles)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Side length of a square world.
    pub fn tiles_on_side(&self) -> Result<usize> {
        if self.width != self.depth {
            return Err(Error::NotSquare { width: self.width, depth: self.depth });
        }
        Ok(self.width)
    }

    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.depth
    }

    fn check(&self, x: i64, y: i64) -> Result<()> {
        if self.contains(x, y) {
            Ok(())
        } else {
            Err(Error::OutOfBounds { x, y, width: self.width, depth: self.depth })
        }
    }

    pub fn tile_index(&self, pos: TilePos) -> Result<usize> {
        self.check(pos.x as i64, pos.y as i64)?;
        Ok(pos.x * self.depth + pos.y)
    }

    pub fn position_of(&self, index: usize) -> Result<TilePos> {
        self.tiles
            .get(index)
            .map(Tile::pos)
            .ok_or(Error::IndexOutOfRange { index, len: self.tiles.len() })
    }

    pub fn tile_at(&self, x: i64, y: i64) -> Result<&Tile> {
        self.check(x, y)?;
        Ok(&self.tiles[x as usize * self.depth + y as usize])
    }

    pub fn tile(&self, pos: TilePos) -> Result<&Tile> {
        self.tile_at(pos.x as i64, pos.y as i64)
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Signed `(dx, dy)` from `b` to `a`.
    pub fn tiles_distance_xy(a: TilePos, b: TilePos) -> (i64, i64) {
        (a.x as i64 - b.x as i64, a.y as i64 - b.y as i64)
    }

    /// Moore neighbourhood of `pos` within `radius`, clipped to the grid.
    pub fn neighbors(&self, pos: TilePos, radius: usize) -> Result<Vec<TilePos>> {
        self.check(pos.x as i64, pos.y as i64)?;
        let r = radius as i64;
        let (x, y) = (pos.x as i64, pos.y as i64);
        let mut out = Vec::with_capacity(((2 * radius + 1).pow(2)).saturating_sub(1));
        for i in -r..=r {
            for j in -r..=r {
                let (nx, ny) = (x + i, y + j);
                if (i != 0 || j != 0) && self.contains(nx, ny) {
                    out.push(TilePos::new(nx as usize, ny as usize));
                }
            }
        }
        Ok(out)
    }

    /// The up-to-four tiles sharing an edge with `pos`.
    pub fn edge_neighbors(&self, pos: TilePos) -> Result<Vec<TilePos>> {
        self.check(pos.x as i64, pos.y as i64)?;
        let (x, y) = (pos.x as i64, pos.y as i64);
        Ok([(1, 0), (-1, 0), (0, 1), (0, -1)]
            .into_iter()
            .map(|(dx, dy)| (x + dx, y + dy))
            .filter(|&(nx, ny)| self.contains(nx, ny))
            .map(|(nx, ny)| TilePos::new(nx as usize, ny as usize))
            .collect())
    }

    pub fn params(&self) -> &ParameterStore {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut ParameterStore {
        &mut self.params
    }
}
