//! Environmental factors feeding the fire-spread probability.

use crate::vegetation::Vegetation;
use crate::world::TilePos;

/// Cap on the wind multiplier.
pub const MAX_WIND_EFFECT: f32 = 1.5;

/// Flammability of the fuel.
pub fn vegetation_factor(vegetation: Vegetation) -> f32 {
    match vegetation {
        Vegetation::Grass => 0.18,
        Vegetation::Sparse => 0.25,
        Vegetation::Swamp => 0.22,
        Vegetation::Forest => 0.40,
    }
}

/// Dampening by the target's moisture. Water (100) never ignites.
pub fn moisture_factor(moisture: u8) -> f32 {
    match moisture {
        100.. => 0.0,
        86..=99 => 0.5,
        66..=85 => 0.7,
        _ => 0.88,
    }
}

/// Bearing from `source` to `target` in degrees, `[0, 360)`.
pub fn bearing(source: TilePos, target: TilePos) -> f32 {
    let dx = target.x as f32 - source.x as f32;
    let dy = target.y as f32 - source.y as f32;
    let angle = dy.atan2(dx).to_degrees();
    if angle < 0.0 {
        angle + 360.0
    } else {
        angle
    }
}

/// Boost for spreading with the wind: `+speed·0.03` within 45° of the wind
/// direction, `+speed·0.015` within 90°, capped at [`MAX_WIND_EFFECT`].
pub fn wind_factor(speed: f32, direction: f32, source: TilePos, target: TilePos) -> f32 {
    let mut difference = (direction - bearing(source, target)).abs();
    if difference > 180.0 {
        difference = 360.0 - difference;
    }
    let mut effect = 1.0;
    if difference <= 45.0 {
        effect += speed * 0.03;
    } else if difference <= 90.0 {
        effect += speed * 0.015;
    }
    effect.min(MAX_WIND_EFFECT)
}

/// Upslope and level spread is favoured.
pub fn slope_factor(source_height: f32, target_height: f32) -> f32 {
    if target_height - source_height >= 0.0 {
        0.35
    } else {
        0.25
    }
}

/// Total ignition probability over the source's burn window.
pub fn combine(vegetation: f32, slope: f32, moisture: f32, wind: f32) -> f32 {
    (vegetation + slope) / 2.0 * moisture * wind
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const O: TilePos = TilePos::new(5, 5);

    #[test]
    fn moisture_bands() {
        assert_eq!(moisture_factor(100), 0.0);
        assert_eq!(moisture_factor(99), 0.5);
        assert_eq!(moisture_factor(86), 0.5);
        assert_eq!(moisture_factor(85), 0.7);
        assert_eq!(moisture_factor(66), 0.7);
        assert_eq!(moisture_factor(65), 0.88);
        assert_eq!(moisture_factor(0), 0.88);
    }

    #[test]
    fn bearings_cover_the_compass() {
        assert_abs_diff_eq!(bearing(O, TilePos::new(6, 5)), 0.0);
        assert_abs_diff_eq!(bearing(O, TilePos::new(5, 6)), 90.0);
        assert_abs_diff_eq!(bearing(O, TilePos::new(4, 5)), 180.0);
        assert_abs_diff_eq!(bearing(O, TilePos::new(5, 4)), 270.0);
        assert_abs_diff_eq!(bearing(O, TilePos::new(4, 4)), 225.0, epsilon = 1e-4);
    }

    #[test]
    fn wind_boost_by_alignment() {
        let east = TilePos::new(6, 5);
        assert_abs_diff_eq!(wind_factor(10.0, 0.0, O, east), 1.3, epsilon = 1e-6);
        assert_abs_diff_eq!(wind_factor(10.0, 60.0, O, east), 1.15, epsilon = 1e-6);
        assert_abs_diff_eq!(wind_factor(10.0, 180.0, O, east), 1.0);
        // Folding: 350° is 10° from east.
        assert_abs_diff_eq!(wind_factor(10.0, 350.0, O, east), 1.3, epsilon = 1e-6);
    }

    #[test]
    fn wind_is_capped() {
        assert_eq!(wind_factor(50.0, 0.0, O, TilePos::new(6, 5)), MAX_WIND_EFFECT);
    }

    #[test]
    fn calm_air_is_neutral() {
        for t in [TilePos::new(6, 5), TilePos::new(4, 6), TilePos::new(5, 4)] {
            assert_eq!(wind_factor(0.0, 123.0, O, t), 1.0);
        }
    }

    #[test]
    fn slope_prefers_uphill_and_level() {
        assert_eq!(slope_factor(0.3, 0.3), 0.35);
        assert_eq!(slope_factor(0.3, 0.8), 0.35);
        assert_eq!(slope_factor(0.8, 0.3), 0.25);
    }

    #[test]
    fn combined_dry_grass_on_level_ground() {
        let p = combine(vegetation_factor(Vegetation::Grass), 0.35, moisture_factor(0), 1.0);
        assert_abs_diff_eq!(p, 0.2332, epsilon = 1e-6);
    }
}
