//! Height synthesis and global landmass shaping.

use crate::noise_source::{CellularReturn, FractalParams, NoiseSource, WarpParams};
use crate::settings::HeightModifier;
use crate::tilemap::Tilemap;

// =============================================================================
// SYNTHESIS PARAMETERS
// =============================================================================

/// Simplex fBm layer: soft, cloud-like height variation
const SIMPLEX_LAYER: FractalParams = FractalParams {
    frequency: 0.01,
    octaves: 5,
    lacunarity: 1.5,
    gain: 0.6,
};

/// Second-nearest cellular layer: ridges and basin structure
const CELLULAR_FREQUENCY: f64 = 0.008;

/// Fractal warp shared by both layers. Cellular edges are straight without it.
pub const HEIGHT_WARP: WarpParams = WarpParams {
    frequency: 0.02,
    octaves: 5,
    lacunarity: 2.0,
    gain: 0.7,
    amplitude: 20.0,
};

const SIMPLEX_WEIGHT: f32 = 0.3;
const CELLULAR_WEIGHT: f32 = 0.7;

// =============================================================================
// HEIGHT SYNTHESIS
// =============================================================================

/// Build a normalized elevation field by blending warped simplex fBm (30%)
/// with warped second-nearest cellular noise (70%).
pub fn synthesize_height(size: usize, noise: &impl NoiseSource) -> Tilemap<f32> {
    let mut simplex = Tilemap::new_with(size, 0.0f32);
    let mut cellular = Tilemap::new_with(size, 0.0f32);

    for y in 0..size {
        for x in 0..size {
            let (wx, wy) = noise.warp(x as f64, y as f64, &HEIGHT_WARP);
            simplex.set(x, y, noise.fractal(wx, wy, &SIMPLEX_LAYER) as f32);
            cellular.set(
                x,
                y,
                noise.cellular(wx, wy, CELLULAR_FREQUENCY, CellularReturn::Distance2) as f32,
            );
        }
    }

    simplex.normalize();
    cellular.normalize();

    let mut height = simplex;
    for (x, y, h) in height.iter_mut() {
        *h = *h * SIMPLEX_WEIGHT + *cellular.get(x, y) * CELLULAR_WEIGHT;
    }

    // Blend can drift off [0, 1] through rounding; pin it back
    height.normalize();
    height
}

// =============================================================================
// LANDMASS SHAPING
// =============================================================================

/// Mask as a function of the normalized distances from the centre along
/// x and y (each 0 at the centre, 1 at the border).
type ShapeMask = fn(f32, f32) -> f32;

fn pangaea_mask(dx: f32, dy: f32) -> f32 {
    (1.0 - dx.powf(2.0)) * (1.0 - dy.powf(2.0))
}

fn inverse_pangaea_mask(dx: f32, dy: f32) -> f32 {
    dx.powf(0.3) * dy.powf(0.3)
}

fn band_mask(_dx: f32, dy: f32) -> f32 {
    dy.powf(0.3)
}

fn shape_mask(modifier: HeightModifier) -> Option<ShapeMask> {
    match modifier {
        HeightModifier::None => None,
        HeightModifier::Pangaea => Some(pangaea_mask),
        HeightModifier::InversePangaea => Some(inverse_pangaea_mask),
        HeightModifier::Band => Some(band_mask),
    }
}

/// Multiply the height field by the modifier's mask.
pub fn apply_height_modifier(height: &mut Tilemap<f32>, modifier: HeightModifier) {
    let Some(mask) = shape_mask(modifier) else {
        return;
    };
    log::info!("Running {} height modifier", modifier);

    let half = height.size as f32 / 2.0;
    for (x, y, h) in height.iter_mut() {
        let dx = (x as f32 - half).abs() / half;
        let dy = (y as f32 - half).abs() / half;
        *h *= mask(dx, dy);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise_source::SeededNoise;

    #[test]
    fn test_synthesized_height_is_normalized() {
        let noise = SeededNoise::new(42);
        let height = synthesize_height(32, &noise);
        let (min_h, max_h) = height.min_max();
        assert_eq!(min_h, 0.0);
        assert_eq!(max_h, 1.0);
    }

    #[test]
    fn test_synthesis_is_deterministic() {
        let a = synthesize_height(24, &SeededNoise::new(9));
        let b = synthesize_height(24, &SeededNoise::new(9));
        assert_eq!(a, b);
    }

    #[test]
    fn test_none_modifier_is_identity() {
        let noise = SeededNoise::new(3);
        let original = synthesize_height(16, &noise);
        let mut shaped = original.clone();
        apply_height_modifier(&mut shaped, HeightModifier::None);
        assert_eq!(shaped, original);
    }

    #[test]
    fn test_pangaea_sinks_edges_keeps_centre() {
        let mut height = Tilemap::new_with(20, 1.0f32);
        apply_height_modifier(&mut height, HeightModifier::Pangaea);
        assert_eq!(*height.get(10, 10), 1.0);
        // x = 0 sits exactly one half-size from the centre
        assert_eq!(*height.get(0, 10), 0.0);
        assert!(*height.get(5, 5) < 1.0 && *height.get(5, 5) > 0.0);
    }

    #[test]
    fn test_inverse_pangaea_sinks_centre() {
        let mut height = Tilemap::new_with(20, 1.0f32);
        apply_height_modifier(&mut height, HeightModifier::InversePangaea);
        assert_eq!(*height.get(10, 10), 0.0);
        assert_eq!(*height.get(10, 3), 0.0);
        assert!(*height.get(0, 0) > 0.99);
    }

    #[test]
    fn test_band_only_varies_with_y() {
        let mut height = Tilemap::new_with(20, 1.0f32);
        apply_height_modifier(&mut height, HeightModifier::Band);
        for x in 0..20 {
            assert_eq!(*height.get(x, 10), 0.0);
            assert_eq!(*height.get(x, 4), *height.get(0, 4));
        }
        assert!(*height.get(7, 0) > 0.99);
    }

    #[test]
    fn test_modifiers_never_raise_normalized_height() {
        let noise = SeededNoise::new(21);
        let original = synthesize_height(16, &noise);
        for &modifier in HeightModifier::all() {
            let mut shaped = original.clone();
            apply_height_modifier(&mut shaped, modifier);
            for (x, y, &h) in shaped.iter() {
                assert!(h >= 0.0 && h <= *original.get(x, y) + 1e-6);
            }
        }
    }
}
