//! Moisture field: water features at 100, decaying spread around them, and a
//! secondary noise layer for everything else.

use noise::NoiseFn;
use serde::{Deserialize, Serialize};

use crate::map::Map;
use crate::noise::layered::MAX_OFFSET;
use crate::rng::RandomSource;

/// Moisture of lake and river cells. No other cell ever reaches it.
pub const WATER_MOISTURE: u8 = 100;
const LAND_MAX: u8 = WATER_MOISTURE - 1;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoistureParams {
    /// Manhattan radius of the spread around water cells.
    pub radius: u32,
    /// Spatial frequency denominator of the background noise.
    pub scale: f32,
}

impl Default for MoistureParams {
    fn default() -> Self {
        Self { radius: 2, scale: 5.0 }
    }
}

pub fn moisture_map<N: NoiseFn<f64, 2>>(
    lakes: &Map<bool>,
    rivers: &Map<bool>,
    params: MoistureParams,
    source: &N,
    rng: &mut dyn RandomSource,
) -> Map<u8> {
    let (width, depth) = (lakes.width, lakes.depth);
    let mut moisture: Map<u8> = Map::new(width, depth);
    let is_water = |x: i32, y: i32| lakes.get(x, y) || rivers.get(x, y);

    for x in 0..width as i32 {
        for y in 0..depth as i32 {
            if is_water(x, y) {
                spread_from(&mut moisture, x, y, params.radius, &is_water);
            }
        }
    }

    let offset = (rng.range(0.0, MAX_OFFSET) as f64, rng.range(0.0, MAX_OFFSET) as f64);
    let scale = params.scale as f64;
    for x in 0..width as i32 {
        for y in 0..depth as i32 {
            if is_water(x, y) {
                continue;
            }
            let n = source.get([(x as f64 + offset.0) / scale, (y as f64 + offset.1) / scale]);
            let background = ((n + 1.0) * 50.0).clamp(0.0, LAND_MAX as f64) as u8;
            moisture.set(x, y, moisture.get(x, y).max(background));
        }
    }
    moisture
}

/// Mark `(x, y)` as water and add `100 − d·(100 / radius)` to land cells at
/// Manhattan distance `d ≤ radius`. Land never accumulates past 99.
fn spread_from(moisture: &mut Map<u8>, x: i32, y: i32, radius: u32, is_water: &impl Fn(i32, i32) -> bool) {
    moisture.set(x, y, WATER_MOISTURE);
    if radius == 0 {
        return;
    }
    let r = radius as i32;
    let step = 100.0 / radius as f32;
    for dx in -r..=r {
        for dy in -r..=r {
            let d = dx.abs() + dy.abs();
            let (nx, ny) = (x + dx, y + dy);
            if d == 0 || d > r || !moisture.contains(nx, ny) || is_water(nx, ny) {
                continue;
            }
            let influence = (100.0 - d as f32 * step).max(0.0) as u32;
            let current = moisture.get(nx, ny) as u32;
            moisture.set(nx, ny, (current + influence).min(LAND_MAX as u32) as u8);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SeededRandom;

    struct Constant(f64);

    impl NoiseFn<f64, 2> for Constant {
        fn get(&self, _point: [f64; 2]) -> f64 {
            self.0
        }
    }

    fn dry(w: usize, d: usize) -> Map<bool> {
        Map::new(w, d)
    }

    #[test]
    fn water_cells_are_saturated() {
        let mut lakes = dry(5, 5);
        lakes.set(1, 1, true);
        let mut rivers = dry(5, 5);
        rivers.set(3, 3, true);
        let m = moisture_map(&lakes, &rivers, MoistureParams::default(), &Constant(-1.0), &mut SeededRandom::new(1));
        assert_eq!(m.get(1, 1), WATER_MOISTURE);
        assert_eq!(m.get(3, 3), WATER_MOISTURE);
    }

    #[test]
    fn spread_decays_with_distance() {
        let mut lakes = dry(7, 7);
        lakes.set(3, 3, true);
        let params = MoistureParams { radius: 4, scale: 5.0 };
        let m = moisture_map(&lakes, &dry(7, 7), params, &Constant(-1.0), &mut SeededRandom::new(1));
        assert_eq!(m.get(4, 3), 75);
        assert_eq!(m.get(5, 3), 50);
        assert_eq!(m.get(4, 4), 50);
        assert_eq!(m.get(6, 3), 25);
        assert_eq!(m.get(6, 6), 0);
    }

    #[test]
    fn only_water_reaches_100() {
        let mut lakes = dry(6, 6);
        for (x, y) in [(0, 0), (2, 0), (0, 2), (2, 2)] {
            lakes.set(x, y, true);
        }
        let m = moisture_map(&lakes, &dry(6, 6), MoistureParams::default(), &Constant(-1.0), &mut SeededRandom::new(4));
        for (x, y, v) in m.cells() {
            let water = lakes.get(x, y);
            assert_eq!(v == WATER_MOISTURE, water, "cell ({x}, {y}) = {v}, water = {water}");
        }
        assert_eq!(m.get(1, 0), LAND_MAX, "overlapping spread is capped below water");
    }

    #[test]
    fn background_noise_is_remapped() {
        let m = moisture_map(&dry(3, 3), &dry(3, 3), MoistureParams::default(), &Constant(0.0), &mut SeededRandom::new(2));
        assert!(m.data.iter().all(|&v| v == 50));
    }

    #[test]
    fn spread_wins_over_lower_background() {
        let mut rivers = dry(5, 5);
        rivers.set(2, 2, true);
        let m = moisture_map(&dry(5, 5), &rivers, MoistureParams::default(), &Constant(-0.6), &mut SeededRandom::new(2));
        assert_eq!(m.get(2, 3), 50);
        assert_eq!(m.get(0, 0), 20);
    }
}
