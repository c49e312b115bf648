//! Per-step probability from a cumulative target.
//!
//! A tile that burns for `n` ticks gets `n` independent chances to ignite
//! each neighbour. For the union of those trials to equal a desired total `P`,
//! each trial needs `p` with `1 − (1 − p)ⁿ = P`. The inverse is found by
//! bisection on `[0, 1]`.

const ITERATIONS: usize = 100;

/// Probability that at least one of `steps` trials at `p` succeeds.
pub fn total_probability(p: f64, steps: u32) -> f64 {
    1.0 - (1.0 - p).powi(steps as i32)
}

/// Per-step probability whose `steps`-fold union equals `total`.
///
/// Targets at or below 0 give exactly 0 and targets at or above 1 give
/// exactly 1. With `steps == 0` there is no window to spread over, so the
/// clamped target is returned as a single-shot probability.
pub fn step_probability(total: f32, steps: u32) -> f32 {
    if total.is_nan() || total <= 0.0 {
        return 0.0;
    }
    if total >= 1.0 {
        return 1.0;
    }
    if steps == 0 {
        return total;
    }

    let target = total as f64;
    let mut lower = 0.0f64;
    let mut upper = 1.0f64;
    for _ in 0..ITERATIONS {
        let p = (lower + upper) / 2.0;
        if total_probability(p, steps) > target {
            upper = p;
        } else {
            lower = p;
        }
    }
    ((lower + upper) / 2.0) as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn single_step_is_identity() {
        for &p in &[0.01f32, 0.2332, 0.5, 0.99] {
            assert_abs_diff_eq!(step_probability(p, 1), p, epsilon = 1e-6);
        }
    }

    #[test]
    fn round_trip_reproduces_total() {
        for steps in 1..=5 {
            for i in 1..20 {
                let total = i as f32 / 20.0;
                let p = step_probability(total, steps);
                let back = total_probability(p as f64, steps) as f32;
                assert!(
                    (back - total).abs() < 1e-4,
                    "steps={steps} total={total}: p={p}, recomputed {back}"
                );
            }
        }
    }

    #[test]
    fn more_steps_means_smaller_step_probability() {
        let p2 = step_probability(0.4, 2);
        let p4 = step_probability(0.4, 4);
        assert!(p4 < p2 && p2 < 0.4);
    }

    #[test]
    fn degenerate_inputs_stay_in_unit_range() {
        assert_eq!(step_probability(0.0, 3), 0.0);
        assert_eq!(step_probability(-2.0, 3), 0.0);
        assert_eq!(step_probability(f32::NAN, 3), 0.0);
        assert_eq!(step_probability(1.0, 3), 1.0);
        assert_eq!(step_probability(7.5, 3), 1.0);
        assert_eq!(step_probability(0.3, 0), 0.3);
    }
}
