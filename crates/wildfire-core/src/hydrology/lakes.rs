use crate::map::Map;

/// `true` wherever the normalised height lies below `threshold`.
pub fn lake_map(height: &Map<f32>, threshold: f32) -> Map<bool> {
    height.map(|h| h < threshold)
}
