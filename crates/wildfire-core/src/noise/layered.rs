//! Octave-layered noise field (terrain height).
//!
//! Each octave samples the base noise at `(coord + offset) / scale * frequency`.
//! Amplitude starts at 1.3 and decays by `persistence`, frequency starts at
//! 1.1 and doubles, and the accumulator starts at 0.2.

use noise::NoiseFn;
use serde::{Deserialize, Serialize};

use crate::map::Map;
use crate::rng::RandomSource;

const START_AMPLITUDE: f64 = 1.3;
const START_FREQUENCY: f64 = 1.1;
const START_ACCUMULATOR: f64 = 0.2;
const LACUNARITY: f64 = 2.0;

/// Upper bound of the random sampling offset on each axis.
pub const MAX_OFFSET: f32 = 10_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayeredNoise {
    pub octaves: u32,
    /// Amplitude decay per octave.
    pub persistence: f32,
    /// Spatial frequency denominator.
    pub scale: f32,
}

impl Default for LayeredNoise {
    fn default() -> Self {
        Self { octaves: 5, persistence: 0.4, scale: 5.0 }
    }
}

impl LayeredNoise {
    /// Layered value at one grid cell for a fixed sampling offset.
    pub fn sample<N: NoiseFn<f64, 2>>(&self, source: &N, x: f64, y: f64, offset: (f64, f64)) -> f32 {
        let scale = self.scale as f64;
        let persistence = self.persistence as f64;
        let mut amplitude = START_AMPLITUDE;
        let mut frequency = START_FREQUENCY;
        let mut value = START_ACCUMULATOR;
        for _ in 0..self.octaves {
            let sx = (x + offset.0) / scale * frequency;
            let sy = (y + offset.1) / scale * frequency;
            value += source.get([sx, sy]) * amplitude;
            amplitude *= persistence;
            frequency *= LACUNARITY;
        }
        value as f32
    }

    /// Fill a `width × depth` map and normalise it to `[0, 1]`.
    ///
    /// One offset pair is drawn from `rng` for the whole map, so successive
    /// builds from the same stream differ while a fixed seed reproduces them.
    pub fn build<N>(&self, width: usize, depth: usize, source: &N, rng: &mut dyn RandomSource) -> Map<f32>
    where
        N: NoiseFn<f64, 2> + Sync,
    {
        let offset = (rng.range(0.0, MAX_OFFSET) as f64, rng.range(0.0, MAX_OFFSET) as f64);
        let mut map = Map::new(width, depth);
        self.fill(&mut map, source, offset);
        map.normalize();
        map
    }

    #[cfg(not(feature = "threading"))]
    fn fill<N: NoiseFn<f64, 2> + Sync>(&self, map: &mut Map<f32>, source: &N, offset: (f64, f64)) {
        let depth = map.depth.max(1);
        for (x, column) in map.data.chunks_mut(depth).enumerate() {
            for (y, cell) in column.iter_mut().enumerate() {
                *cell = self.sample(source, x as f64, y as f64, offset);
            }
        }
    }

    #[cfg(feature = "threading")]
    fn fill<N: NoiseFn<f64, 2> + Sync>(&self, map: &mut Map<f32>, source: &N, offset: (f64, f64)) {
        use rayon::prelude::*;
        let depth = map.depth.max(1);
        map.data.par_chunks_mut(depth).enumerate().for_each(|(x, column)| {
            for (y, cell) in column.iter_mut().enumerate() {
                *cell = self.sample(source, x as f64, y as f64, offset);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::LatticeNoise;
    use crate::rng::SeededRandom;

    struct Constant(f64);

    impl NoiseFn<f64, 2> for Constant {
        fn get(&self, _point: [f64; 2]) -> f64 {
            self.0
        }
    }

    #[test]
    fn built_map_is_normalized() {
        let mut rng = SeededRandom::new(42);
        let map = LayeredNoise::default().build(32, 32, &LatticeNoise, &mut rng);
        assert_eq!(map.data.len(), 32 * 32);
        assert!((map.min_value() - 0.0).abs() < 1e-6);
        assert!((map.max_value() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn same_seed_same_field() {
        let layers = LayeredNoise::default();
        let a = layers.build(16, 16, &LatticeNoise, &mut SeededRandom::new(9));
        let b = layers.build(16, 16, &LatticeNoise, &mut SeededRandom::new(9));
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_differ() {
        let layers = LayeredNoise::default();
        let a = layers.build(16, 16, &LatticeNoise, &mut SeededRandom::new(1));
        let b = layers.build(16, 16, &LatticeNoise, &mut SeededRandom::new(2));
        assert!(a.data.iter().zip(&b.data).any(|(x, y)| (x - y).abs() > 1e-4));
    }

    #[test]
    fn accumulator_and_amplitude_biases_apply() {
        // With a constant source of 1.0 and two octaves: 0.2 + 1.3 + 1.3·0.4.
        let layers = LayeredNoise { octaves: 2, persistence: 0.4, scale: 5.0 };
        let v = layers.sample(&Constant(1.0), 3.0, 4.0, (0.0, 0.0));
        assert!((v - 2.02).abs() < 1e-6, "got {v}");
    }

    #[test]
    fn constant_source_is_left_unnormalized() {
        let layers = LayeredNoise { octaves: 1, persistence: 0.4, scale: 5.0 };
        let map = layers.build(4, 4, &Constant(0.0), &mut SeededRandom::new(3));
        assert!(map.data.iter().all(|&v| (v - 0.2).abs() < 1e-6));
    }
}
