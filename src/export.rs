use std::path::{Path, PathBuf};

use image::{ImageBuffer, Rgb, RgbImage};

use crate::biomes::Biome;
use crate::error::Result;
use crate::tilemap::Tilemap;
use crate::water_bodies::Water;
use crate::world::WorldData;

const OCEAN_COLOR: [u8; 3] = [0, 0, 128];
const RIVER_COLOR: [u8; 3] = [0, 0, 255];
/// Rivers on the compound map get a touch of green to stand out from ocean
const COMPOUND_RIVER_COLOR: [u8; 3] = [0, 64, 255];

/// Hue span used for temperature: 0 (red, hot) to 250 (blue, cold)
const TEMPERATURE_HUE_RANGE: f32 = 250.0;

/// Convert HSV to RGB. `h` in degrees, `s` and `v` in 0.0-1.0.
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> (u8, u8, u8) {
    let h = h.rem_euclid(360.0);
    let s = s.clamp(0.0, 1.0);
    let v = v.clamp(0.0, 1.0);
    let c = v * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = v - c;

    let (r, g, b) = if h < 60.0 {
        (c, x, 0.0)
    } else if h < 120.0 {
        (x, c, 0.0)
    } else if h < 180.0 {
        (0.0, c, x)
    } else if h < 240.0 {
        (0.0, x, c)
    } else if h < 300.0 {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };

    (unit_to_byte(r + m), unit_to_byte(g + m), unit_to_byte(b + m))
}

fn unit_to_byte(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).floor() as u8
}

fn temperature_hue(temperature: f32) -> f32 {
    (1.0 - temperature) * TEMPERATURE_HUE_RANGE
}

fn render_grid<T>(grid: &Tilemap<T>, color: impl Fn(usize, usize, &T) -> [u8; 3]) -> RgbImage
where
    T: Clone,
{
    let mut img: RgbImage = ImageBuffer::new(grid.size as u32, grid.size as u32);
    for (x, y, value) in grid.iter() {
        img.put_pixel(x as u32, y as u32, Rgb(color(x, y, value)));
    }
    img
}

// =============================================================================
// RENDERERS
// =============================================================================

/// Grayscale elevation.
pub fn render_heightmap(heightmap: &Tilemap<f32>) -> RgbImage {
    render_grid(heightmap, |_, _, &h| {
        let gray = unit_to_byte(h);
        [gray, gray, gray]
    })
}

/// Ocean dark blue, rivers/lakes bright blue, land black.
pub fn render_water_map(water: &Tilemap<Water>) -> RgbImage {
    render_grid(water, |_, _, w| match w {
        Water::Land => [0, 0, 0],
        Water::Ocean => OCEAN_COLOR,
        Water::River => RIVER_COLOR,
    })
}

/// Moisture in the blue channel.
pub fn render_moisture_map(moisture: &Tilemap<f32>) -> RgbImage {
    render_grid(moisture, |_, _, &m| [0, 0, unit_to_byte(m)])
}

/// Temperature as hue, brightened by elevation.
pub fn render_temperature_map(temperature: &Tilemap<f32>, heightmap: &Tilemap<f32>) -> RgbImage {
    render_grid(temperature, |x, y, &t| {
        let value = 0.5 + *heightmap.get(x, y) * 0.5;
        let (r, g, b) = hsv_to_rgb(temperature_hue(t), 1.0, value);
        [r, g, b]
    })
}

/// Biome palette.
pub fn render_biome_map(biomes: &Tilemap<Biome>) -> RgbImage {
    render_grid(biomes, |_, _, biome| {
        let (r, g, b) = biome.color();
        [r, g, b]
    })
}

/// Water colors over a temperature-hued land shaded by elevation.
pub fn render_compound_map(world: &WorldData) -> RgbImage {
    render_grid(&world.water, |x, y, w| match w {
        Water::Ocean => OCEAN_COLOR,
        Water::River => COMPOUND_RIVER_COLOR,
        Water::Land => {
            let hue = temperature_hue(*world.temperature.get(x, y));
            let (r, g, b) = hsv_to_rgb(hue, 1.0, *world.heightmap.get(x, y));
            [r, g, b]
        }
    })
}

// =============================================================================
// FILE EXPORT
// =============================================================================

pub fn export_heightmap(world: &WorldData, path: &Path) -> Result<()> {
    render_heightmap(&world.heightmap).save(path)?;
    Ok(())
}

pub fn export_water_map(world: &WorldData, path: &Path) -> Result<()> {
    render_water_map(&world.water).save(path)?;
    Ok(())
}

pub fn export_moisture_map(world: &WorldData, path: &Path) -> Result<()> {
    render_moisture_map(&world.moisture).save(path)?;
    Ok(())
}

pub fn export_temperature_map(world: &WorldData, path: &Path) -> Result<()> {
    render_temperature_map(&world.temperature, &world.heightmap).save(path)?;
    Ok(())
}

pub fn export_biome_map(world: &WorldData, path: &Path) -> Result<()> {
    render_biome_map(&world.biomes).save(path)?;
    Ok(())
}

pub fn export_compound_map(world: &WorldData, path: &Path) -> Result<()> {
    render_compound_map(world).save(path)?;
    Ok(())
}

/// Write all six maps as `<dir>/<prefix><name>.png`. Returns the paths written.
pub fn export_all(world: &WorldData, dir: &Path, prefix: &str) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;

    let exporters: [(&str, fn(&WorldData, &Path) -> Result<()>); 6] = [
        ("height", export_heightmap),
        ("water", export_water_map),
        ("temperature", export_temperature_map),
        ("moisture", export_moisture_map),
        ("biomes", export_biome_map),
        ("compound", export_compound_map),
    ];

    let mut written = Vec::with_capacity(exporters.len());
    for (name, export) in exporters {
        let path = dir.join(format!("{}{}.png", prefix, name));
        export(world, &path)?;
        log::info!("Saved {}", path.display());
        written.push(path);
    }
    Ok(written)
}
