//! Deterministic 2D gradient noise and the octave-layered field builder on top of it.
//!
//! Gradients come from hashing the integer lattice coordinates, so the field
//! is a pure function of position: no seed, no global state. Variation
//! between generated worlds comes from the random sampling offset chosen by
//! [`layered::LayeredNoise`].

pub mod layered;

use std::f64::consts::PI;

use noise::NoiseFn;

/// Hash-based gradient noise on the unit lattice.
///
/// Output is approximately in `[-1, 1]` and exactly zero on lattice points.
#[derive(Debug, Clone, Copy, Default)]
pub struct LatticeNoise;

impl LatticeNoise {
    pub fn new() -> Self {
        Self
    }

    /// Unit-length pseudo-gradient for lattice corner `(ix, iy)`.
    pub fn gradient(ix: i64, iy: i64) -> (f64, f64) {
        let mut a = ix as u32;
        let mut b = iy as u32;
        a = a.wrapping_mul(3_284_157_443);
        b ^= a.rotate_left(16);
        b = b.wrapping_mul(1_911_520_717);
        a ^= b.rotate_left(16);
        a = a.wrapping_mul(2_048_419_325);
        // Map the full u32 range onto [0, 2π).
        let angle = a as f64 * (PI / 2_147_483_648.0);
        (angle.cos(), angle.sin())
    }

    /// Dot product of the corner gradient with the offset from that corner to `(x, y)`.
    fn dot_grid_gradient(ix: i64, iy: i64, x: f64, y: f64) -> f64 {
        let (gx, gy) = Self::gradient(ix, iy);
        (x - ix as f64) * gx + (y - iy as f64) * gy
    }

    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let x0 = x.floor() as i64;
        let y0 = y.floor() as i64;
        let x1 = x0 + 1;
        let y1 = y0 + 1;

        let sx = x - x0 as f64;
        let sy = y - y0 as f64;

        let n0 = Self::dot_grid_gradient(x0, y0, x, y);
        let n1 = Self::dot_grid_gradient(x1, y0, x, y);
        let ix0 = smoothstep_interp(n0, n1, sx);

        let n0 = Self::dot_grid_gradient(x0, y1, x, y);
        let n1 = Self::dot_grid_gradient(x1, y1, x, y);
        let ix1 = smoothstep_interp(n0, n1, sx);

        smoothstep_interp(ix0, ix1, sy)
    }
}

/// Interpolate `a0 → a1` with weight `3w² − 2w³`.
#[inline]
fn smoothstep_interp(a0: f64, a1: f64, w: f64) -> f64 {
    (a1 - a0) * (3.0 - 2.0 * w) * w * w + a0
}

impl NoiseFn<f64, 2> for LatticeNoise {
    fn get(&self, point: [f64; 2]) -> f64 {
        self.sample(point[0], point[1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gradients_are_unit_length() {
        for ix in -20..20 {
            for iy in -20..20 {
                let (gx, gy) = LatticeNoise::gradient(ix, iy);
                let len = (gx * gx + gy * gy).sqrt();
                assert!((len - 1.0).abs() < 1e-9, "gradient at ({ix}, {iy}) has length {len}");
            }
        }
    }

    #[test]
    fn zero_on_lattice_points() {
        let n = LatticeNoise::new();
        for ix in -5..5 {
            for iy in -5..5 {
                assert!(n.get([ix as f64, iy as f64]).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn pure_function_of_position() {
        let a = LatticeNoise::new();
        let b = LatticeNoise::new();
        for i in 0..200 {
            let p = [i as f64 * 0.137, i as f64 * 0.291 - 7.0];
            assert_eq!(a.get(p), b.get(p));
        }
    }

    #[test]
    fn output_roughly_bounded_and_varied() {
        let n = LatticeNoise::new();
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for i in 0..100 {
            for j in 0..100 {
                let v = n.get([i as f64 * 0.173, j as f64 * 0.219]);
                lo = lo.min(v);
                hi = hi.max(v);
            }
        }
        assert!(lo >= -1.5 && hi <= 1.5, "noise range [{lo:.3}, {hi:.3}] too wide");
        assert!(hi - lo > 0.3, "noise should vary, got range {:.3}", hi - lo);
    }

    #[test]
    fn continuous_across_cell_borders() {
        let n = LatticeNoise::new();
        let eps = 1e-7;
        for k in -3..3 {
            let x = k as f64;
            let left = n.get([x - eps, 0.37]);
            let right = n.get([x + eps, 0.37]);
            assert!((left - right).abs() < 1e-5, "discontinuity at x={x}");
        }
    }
}
