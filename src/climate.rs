//! Moisture and temperature fields.
//!
//! Moisture is posterized cellular noise and ignores terrain entirely.
//! Temperature mixes a latitude band (hot in the middle row, cold at the top
//! and bottom) with an elevation term, then blurs the result.

use crate::noise_source::{CellularReturn, NoiseSource, WarpParams};
use crate::settings::ClimateStencil;
use crate::tilemap::Tilemap;
use crate::water_bodies::Water;

// =============================================================================
// MOISTURE
// =============================================================================

const MOISTURE_FREQUENCY: f64 = 0.01;

/// Single-layer gradient warp for the moisture lookup
const MOISTURE_WARP: WarpParams = WarpParams {
    frequency: 0.02,
    octaves: 1,
    lacunarity: 2.0,
    gain: 0.7,
    amplitude: 20.0,
};

/// Sample warped cell-value noise and normalize it to [0, 1].
///
/// The generator passes a fresh noise source built from the world seed, so
/// the moisture warp lines up with the height warp.
pub fn generate_moisture(size: usize, noise: &impl NoiseSource) -> Tilemap<f32> {
    log::info!("Calculating moisture...");
    let mut moisture = Tilemap::new_with(size, 0.0f32);
    for (x, y, m) in moisture.iter_mut() {
        let (wx, wy) = noise.warp(x as f64, y as f64, &MOISTURE_WARP);
        *m = noise.cellular(wx, wy, MOISTURE_FREQUENCY, CellularReturn::CellValue) as f32;
    }
    moisture.normalize();
    moisture
}

// =============================================================================
// TEMPERATURE
// =============================================================================

/// Blur passes applied after the raw temperature is computed
pub const SMOOTHING_PASSES: usize = 100;

/// Latitude band: 1.0 on the middle row, 0.0 on the top row.
pub fn latitude_band(y: usize, size: usize) -> f32 {
    let half = (size / 2).max(1) as i32;
    1.0 - (y as i32 - half).abs() as f32 / half as f32
}

/// Compute temperature (1 = hot, 0 = cold) and smooth it.
pub fn generate_temperature(
    heightmap: &Tilemap<f32>,
    water: &Tilemap<Water>,
    sea_level: f32,
    stencil: ClimateStencil,
) -> Tilemap<f32> {
    log::info!("Calculating climate temperature...");
    let mut temperature = raw_temperature(heightmap, water, sea_level);
    smooth_temperature(&mut temperature, stencil, SMOOTHING_PASSES);
    temperature
}

/// Latitude plus elevation influence, clamped to [0, 1]. Ocean height is ignored.
fn raw_temperature(heightmap: &Tilemap<f32>, water: &Tilemap<Water>, sea_level: f32) -> Tilemap<f32> {
    let size = heightmap.size;
    let mut temperature = Tilemap::new_with(size, 0.0f32);
    for (x, y, t) in temperature.iter_mut() {
        let band = latitude_band(y, size);
        let elevation_influence = if *water.get(x, y) == Water::Ocean {
            0.0
        } else {
            // Land above sea level cools, land below it warms
            sea_level - *heightmap.get(x, y)
        };
        *t = (band + elevation_influence).clamp(0.0, 1.0);
    }
    temperature
}

/// Blend each cell halfway toward the mean of itself and its stencil
/// neighbours, in place, row by row, with toroidal wrap.
pub fn smooth_temperature(temperature: &mut Tilemap<f32>, stencil: ClimateStencil, passes: usize) {
    let size = temperature.size;
    let offsets = stencil.offsets();
    for _ in 0..passes {
        for y in 0..size {
            for x in 0..size {
                let (xi, yi) = (x as i32, y as i32);
                let current = *temperature.get(x, y);
                let neighbors: f32 = offsets
                    .iter()
                    .map(|&(dx, dy)| *temperature.get_wrapped(xi + dx, yi + dy))
                    .sum();
                let avg = (current + neighbors) / 5.0;
                temperature.set(x, y, current * 0.5 + avg * 0.5);
            }
        }
    }
}
