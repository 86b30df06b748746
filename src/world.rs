//! World generation pipeline and its results
//!
//! [`Generator`] owns the settings and runs the fixed stage order once per
//! [`Generator::generate`] call. The finished grids are bundled into a
//! [`WorldData`], which is the only way to read them.

use crate::biomes::{self, Biome};
use crate::climate;
use crate::erosion::{hydraulic, thermal, ErosionStats};
use crate::error::Result;
use crate::heightmap;
use crate::noise_source::SeededNoise;
use crate::settings::Settings;
use crate::tilemap::Tilemap;
use crate::water_bodies::{self, Water, WaterStats};

/// All generated world data bundled together
#[derive(Clone, Debug, PartialEq)]
pub struct WorldData {
    /// Settings the world was generated from (allows recreation)
    pub settings: Settings,
    /// Elevation (0.0-1.0)
    pub heightmap: Tilemap<f32>,
    /// Temperature (1.0 = hot, 0.0 = cold)
    pub temperature: Tilemap<f32>,
    /// Moisture (0.0-1.0)
    pub moisture: Tilemap<f32>,
    /// Land / ocean / river classification
    pub water: Tilemap<Water>,
    pub biomes: Tilemap<Biome>,
    pub thermal_stats: ErosionStats,
    pub hydraulic_stats: ErosionStats,
}

impl WorldData {
    pub fn size(&self) -> usize {
        self.heightmap.size
    }

    pub fn seed(&self) -> u32 {
        self.settings.seed
    }

    /// Get information about a specific tile
    pub fn get_tile_info(&self, x: usize, y: usize) -> TileInfo {
        TileInfo {
            x,
            y,
            elevation: *self.heightmap.get(x, y),
            temperature: *self.temperature.get(x, y),
            moisture: *self.moisture.get(x, y),
            water: *self.water.get(x, y),
            biome: *self.biomes.get(x, y),
        }
    }

    pub fn summary(&self) -> WorldSummary {
        WorldSummary::from_world(self)
    }
}

/// Information about a single tile for display
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileInfo {
    pub x: usize,
    pub y: usize,
    pub elevation: f32,
    pub temperature: f32,
    pub moisture: f32,
    pub water: Water,
    pub biome: Biome,
}

impl TileInfo {
    pub fn temperature_str(&self) -> String {
        let label = match biomes::temperature_scale(self.temperature) {
            0 => "Hot",
            1 => "Warm",
            2 => "Cool",
            _ => "Cold",
        };
        format!("{:.2} ({})", self.temperature, label)
    }

    pub fn moisture_str(&self) -> String {
        let label = match biomes::moisture_scale(self.moisture) {
            0 => "Arid",
            1 | 2 => "Dry",
            3 => "Moderate",
            4 => "Humid",
            _ => "Wet",
        };
        format!("{:.2} ({})", self.moisture, label)
    }
}

impl std::fmt::Display for TileInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({}, {}) {} | {} | elevation {:.3} | temperature {} | moisture {}",
            self.x,
            self.y,
            self.biome,
            self.water.display_name(),
            self.elevation,
            self.temperature_str(),
            self.moisture_str()
        )
    }
}

// =============================================================================
// GENERATOR
// =============================================================================

/// Runs the generation pipeline for one validated [`Settings`].
pub struct Generator {
    settings: Settings,
    world: Option<WorldData>,
}

impl Generator {
    /// Validate the settings. Invalid settings never reach the pipeline.
    pub fn new(settings: Settings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            settings,
            world: None,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Run every stage and keep the result. Calling it again regenerates the
    /// same world from scratch.
    pub fn generate(&mut self) -> &WorldData {
        let world = run_pipeline(&self.settings);
        self.world.insert(world)
    }

    /// The finished world, `None` until [`Generator::generate`] has run.
    pub fn world(&self) -> Option<&WorldData> {
        self.world.as_ref()
    }

    pub fn into_world(self) -> Option<WorldData> {
        self.world
    }

    pub fn height(&self) -> Option<&Tilemap<f32>> {
        self.world.as_ref().map(|w| &w.heightmap)
    }

    pub fn temperature(&self) -> Option<&Tilemap<f32>> {
        self.world.as_ref().map(|w| &w.temperature)
    }

    pub fn moisture(&self) -> Option<&Tilemap<f32>> {
        self.world.as_ref().map(|w| &w.moisture)
    }

    pub fn water(&self) -> Option<&Tilemap<Water>> {
        self.world.as_ref().map(|w| &w.water)
    }

    pub fn biomes(&self) -> Option<&Tilemap<Biome>> {
        self.world.as_ref().map(|w| &w.biomes)
    }
}

/// Generate a complete world in one call.
pub fn generate_world(settings: Settings) -> Result<WorldData> {
    settings.validate()?;
    Ok(run_pipeline(&settings))
}

fn run_pipeline(settings: &Settings) -> WorldData {
    let size = settings.world_size;
    log::info!(
        "Generating {}x{} world with seed {}",
        size,
        size,
        settings.seed
    );

    log::info!("Generating heightmap...");
    let mut heightmap = heightmap::synthesize_height(size, &SeededNoise::new(settings.seed));
    heightmap::apply_height_modifier(&mut heightmap, settings.height_modifier);

    let thermal_stats = if settings.thermal_erosion_iterations > 0 {
        log::info!(
            "Running thermal erosion ({} iterations)...",
            settings.thermal_erosion_iterations
        );
        thermal::simulate(
            &mut heightmap,
            settings.thermal_erosion_iterations,
            settings.thermal_erosion_threshold,
            settings.thermal_erosion_coefficient,
            settings.thermal_transfer,
        )
    } else {
        ErosionStats::default()
    };

    let mut water = water_bodies::classify_saltwater(&heightmap, settings.sea_level);

    // Fresh source from the same seed: the moisture warp matches the height warp
    let moisture = climate::generate_moisture(size, &SeededNoise::new(settings.seed));

    let hydraulic_stats = if settings.hydraulic_erosion_iterations > 0 {
        log::info!(
            "Running hydraulic erosion ({} iterations)...",
            settings.hydraulic_erosion_iterations
        );
        hydraulic::simulate(
            &mut heightmap,
            &moisture,
            &mut water,
            settings.hydraulic_erosion_iterations,
        )
    } else {
        ErosionStats::default()
    };

    let temperature = climate::generate_temperature(
        &heightmap,
        &water,
        settings.sea_level,
        settings.climate_stencil,
    );
    let biomes = biomes::generate_biomes(&water, &temperature, &moisture);

    log::info!("World generation complete");
    WorldData {
        settings: settings.clone(),
        heightmap,
        temperature,
        moisture,
        water,
        biomes,
        thermal_stats,
        hydraulic_stats,
    }
}

// =============================================================================
// SUMMARY
// =============================================================================

/// Aggregate statistics of a finished world
#[derive(Clone, Debug, PartialEq)]
pub struct WorldSummary {
    pub size: usize,
    pub seed: u32,
    pub min_height: f32,
    pub max_height: f32,
    pub mean_height: f32,
    pub water: WaterStats,
    /// Cell count per biome, in biome id order, zero counts included
    pub biome_counts: Vec<(Biome, usize)>,
}

impl WorldSummary {
    pub fn from_world(world: &WorldData) -> Self {
        let (min_height, max_height) = world.heightmap.min_max();
        let cells = world.size() * world.size();
        let mean_height = (world.heightmap.sum() / cells as f64) as f32;

        let mut counts = [0usize; 14];
        for &biome in world.biomes.values() {
            counts[biome.as_u8() as usize] += 1;
        }
        let biome_counts = Biome::all()
            .iter()
            .map(|&b| (b, counts[b.as_u8() as usize]))
            .collect();

        Self {
            size: world.size(),
            seed: world.seed(),
            min_height,
            max_height,
            mean_height,
            water: water_bodies::water_stats(&world.water),
            biome_counts,
        }
    }

    /// Most common non-ocean biome
    pub fn dominant_land_biome(&self) -> Option<Biome> {
        self.biome_counts
            .iter()
            .filter(|(b, count)| *b != Biome::Ocean && *count > 0)
            .max_by_key(|(_, count)| *count)
            .map(|(b, _)| *b)
    }
}

impl std::fmt::Display for WorldSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "World {}x{} (seed {})", self.size, self.size, self.seed)?;
        writeln!(
            f,
            "  Height: min {:.3}, max {:.3}, mean {:.3}",
            self.min_height, self.max_height, self.mean_height
        )?;
        writeln!(
            f,
            "  Land {:.1}% | Ocean {:.1}% | River/Lake {:.1}%",
            self.water.land_percent(),
            self.water.ocean_percent(),
            self.water.river_percent()
        )?;
        write!(f, "  Biomes:")?;
        for (biome, count) in self.biome_counts.iter().filter(|(_, c)| *c > 0) {
            write!(f, "\n    {:<22} {}", biome.display_name(), count)?;
        }
        Ok(())
    }
}
