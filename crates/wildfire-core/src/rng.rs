//! Seedable uniform random source shared by world generation and ignition trials.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Uniform random draws.
///
/// Generation and simulation take the source explicitly, so every caller (and
/// every test) owns its own stream instead of sharing process-wide state.
pub trait RandomSource {
    /// A uniform value in `[0, 1)`.
    fn next_unit(&mut self) -> f32;

    /// A uniform value in `[min, max)`.
    fn range(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_unit() * (max - min)
    }

    /// A uniform index in `0..upper`. `upper` must be non-zero.
    fn index(&mut self, upper: usize) -> usize {
        ((self.next_unit() * upper as f32) as usize).min(upper.saturating_sub(1))
    }

    /// `true` with probability `p`.
    fn chance(&mut self, p: f32) -> bool {
        self.next_unit() < p
    }
}

/// `StdRng`-backed source. Identical seeds yield identical streams.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    seed: u64,
    rng: StdRng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self { seed, rng: StdRng::seed_from_u64(seed) }
    }

    /// Seed from the wall clock; the chosen seed is kept so a run can be replayed.
    pub fn from_time() -> Self {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0);
        Self::new(seed)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for SeededRandom {
    fn next_unit(&mut self) -> f32 {
        self.rng.gen::<f32>()
    }

    fn range(&mut self, min: f32, max: f32) -> f32 {
        if max <= min {
            return min;
        }
        self.rng.gen_range(min..max)
    }

    fn index(&mut self, upper: usize) -> usize {
        self.rng.gen_range(0..upper.max(1))
    }
}
