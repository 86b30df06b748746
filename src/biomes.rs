//! Whittaker-style biome classification.
//!
//! Temperature and moisture are cut into coarse bands and looked up in a
//! fixed 6x4 table. Ocean cells bypass the table.

use crate::tilemap::Tilemap;
use crate::water_bodies::Water;

/// Biome category of one cell
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[repr(u8)]
pub enum Biome {
    #[default]
    Ocean = 0,
    SubtropicalDesert = 1,
    Grassland = 2,
    TropicalForest = 3,
    TropicalRainForest = 4,
    TemperateDesert = 5,
    DeciduousForest = 6,
    TemperateRainForest = 7,
    Shrubland = 8,
    Taiga = 9,
    Scorched = 10,
    Bare = 11,
    Tundra = 12,
    Arctic = 13,
}

impl Biome {
    pub fn all() -> &'static [Biome] {
        &[
            Biome::Ocean,
            Biome::SubtropicalDesert,
            Biome::Grassland,
            Biome::TropicalForest,
            Biome::TropicalRainForest,
            Biome::TemperateDesert,
            Biome::DeciduousForest,
            Biome::TemperateRainForest,
            Biome::Shrubland,
            Biome::Taiga,
            Biome::Scorched,
            Biome::Bare,
            Biome::Tundra,
            Biome::Arctic,
        ]
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Map color (RGB)
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            Biome::Ocean => (0, 64, 255),
            Biome::SubtropicalDesert => (226, 99, 5),
            Biome::Grassland => (99, 210, 64),
            Biome::TropicalForest => (99, 211, 111),
            Biome::TropicalRainForest => (2, 196, 114),
            Biome::TemperateDesert => (232, 185, 23),
            Biome::DeciduousForest => (40, 176, 26),
            Biome::TemperateRainForest => (3, 222, 14),
            Biome::Shrubland => (85, 193, 131),
            Biome::Taiga => (40, 88, 33),
            Biome::Scorched => (46, 75, 72),
            Biome::Bare => (105, 139, 82),
            Biome::Tundra => (149, 176, 164),
            Biome::Arctic => (255, 255, 255),
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Biome::Ocean => "Ocean",
            Biome::SubtropicalDesert => "Subtropical Desert",
            Biome::Grassland => "Grassland",
            Biome::TropicalForest => "Tropical Forest",
            Biome::TropicalRainForest => "Tropical Rain Forest",
            Biome::TemperateDesert => "Temperate Desert",
            Biome::DeciduousForest => "Deciduous Forest",
            Biome::TemperateRainForest => "Temperate Rain Forest",
            Biome::Shrubland => "Shrubland",
            Biome::Taiga => "Taiga",
            Biome::Scorched => "Scorched",
            Biome::Bare => "Bare",
            Biome::Tundra => "Tundra",
            Biome::Arctic => "Arctic",
        }
    }
}

impl std::fmt::Display for Biome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Returned when a band pair misses the table
const FALLBACK_BIOME: Biome = Biome::Scorched;

/// Temperature band, 0 (hottest) to 3 (coldest).
///
/// Rounds after inverting, so a half-way value falls into the colder band.
pub fn temperature_scale(temperature: f32) -> i32 {
    (3.0 - temperature * 3.0).round().clamp(0.0, 3.0) as i32
}

/// Moisture band, 0 (driest) to 5 (wettest).
pub fn moisture_scale(moisture: f32) -> i32 {
    (moisture * 5.0).round().clamp(0.0, 5.0) as i32
}

/// Table lookup by (temperature band, moisture band). `None` outside the table.
pub fn lookup_biome(temp_scale: i32, moist_scale: i32) -> Option<Biome> {
    use Biome::*;
    let biome = match (moist_scale, temp_scale) {
        (0, 0) => SubtropicalDesert,
        (0, 1) | (0, 2) => TemperateDesert,
        (0, 3) => Scorched,

        (1, 0) | (1, 1) => Grassland,
        (1, 2) => TemperateDesert,
        (1, 3) => Bare,

        (2, 0) => TropicalForest,
        (2, 1) => Grassland,
        (2, 2) => Shrubland,
        (2, 3) => Tundra,

        (3, 0) => TropicalForest,
        (3, 1) => DeciduousForest,
        (3, 2) => Shrubland,
        (3, 3) => Arctic,

        (4, 0) => TropicalRainForest,
        (4, 1) => DeciduousForest,
        (4, 2) => Taiga,
        (4, 3) => Arctic,

        (5, 0) => TropicalRainForest,
        (5, 1) => TemperateRainForest,
        (5, 2) => Taiga,
        (5, 3) => Arctic,

        _ => return None,
    };
    Some(biome)
}

/// Table lookup that never fails: a miss logs a warning and yields Scorched.
pub fn biome_for_scales(temp_scale: i32, moist_scale: i32) -> Biome {
    lookup_biome(temp_scale, moist_scale).unwrap_or_else(|| {
        log::warn!(
            "No biome for temperature band {} / moisture band {}, using {}",
            temp_scale,
            moist_scale,
            FALLBACK_BIOME
        );
        FALLBACK_BIOME
    })
}

/// Classify a land cell from its temperature and moisture.
pub fn classify_biome(temperature: f32, moisture: f32) -> Biome {
    biome_for_scales(temperature_scale(temperature), moisture_scale(moisture))
}

/// Classify every cell. Ocean cells are Ocean; rivers and lakes keep a land biome.
pub fn generate_biomes(
    water: &Tilemap<Water>,
    temperature: &Tilemap<f32>,
    moisture: &Tilemap<f32>,
) -> Tilemap<Biome> {
    log::info!("Calculating biome data...");
    let mut biomes = Tilemap::new_with(water.size, Biome::Ocean);
    for (x, y, biome) in biomes.iter_mut() {
        if *water.get(x, y) != Water::Ocean {
            *biome = classify_biome(*temperature.get(x, y), *moisture.get(x, y));
        }
    }
    biomes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_covers_every_band_pair() {
        for t in 0..=3 {
            for m in 0..=5 {
                let biome = lookup_biome(t, m);
                assert!(biome.is_some(), "missing biome for t={} m={}", t, m);
                assert_ne!(biome, Some(Biome::Ocean));
            }
        }
    }

    #[test]
    fn test_scorched_only_dry_and_cold() {
        for t in 0..=3 {
            for m in 0..=5 {
                if lookup_biome(t, m) == Some(Biome::Scorched) {
                    assert_eq!((t, m), (3, 0));
                }
            }
        }
    }

    #[test]
    fn test_out_of_table_falls_back() {
        assert_eq!(lookup_biome(4, 0), None);
        assert_eq!(lookup_biome(0, -1), None);
        assert_eq!(biome_for_scales(7, 9), Biome::Scorched);
    }

    #[test]
    fn test_scales() {
        assert_eq!(temperature_scale(1.0), 0);
        assert_eq!(temperature_scale(0.0), 3);
        assert_eq!(temperature_scale(1.7), 0);
        assert_eq!(temperature_scale(-0.4), 3);
        assert_eq!(moisture_scale(0.0), 0);
        assert_eq!(moisture_scale(1.0), 5);
        assert_eq!(moisture_scale(0.5), 3);
        assert_eq!(moisture_scale(-0.2), 0);
    }

    #[test]
    fn test_temperature_scale_rounds_after_inverting() {
        // 3 - 1.5 = 1.5 rounds away from zero to 2
        assert_eq!(temperature_scale(0.5), 2);
        assert_eq!(temperature_scale(0.49), 2);
        assert_eq!(temperature_scale(0.51), 1);
        assert_eq!(classify_biome(0.5, 0.0), Biome::TemperateDesert);
        assert_eq!(classify_biome(0.5, 0.4), Biome::Shrubland);
    }

    #[test]
    fn test_classify_corners() {
        assert_eq!(classify_biome(1.0, 0.0), Biome::SubtropicalDesert);
        assert_eq!(classify_biome(1.0, 1.0), Biome::TropicalRainForest);
        assert_eq!(classify_biome(0.0, 1.0), Biome::Arctic);
        assert_eq!(classify_biome(0.0, 0.0), Biome::Scorched);
    }

    #[test]
    fn test_generate_biomes_respects_water() {
        let mut water = Tilemap::new_with(3, Water::Land);
        water.set(0, 0, Water::Ocean);
        water.set(1, 0, Water::River);
        let temperature = Tilemap::new_with(3, 1.0f32);
        let moisture = Tilemap::new_with(3, 1.0f32);

        let biomes = generate_biomes(&water, &temperature, &moisture);

        assert_eq!(*biomes.get(0, 0), Biome::Ocean);
        assert_eq!(*biomes.get(1, 0), Biome::TropicalRainForest);
        assert_eq!(*biomes.get(2, 2), Biome::TropicalRainForest);
    }

    #[test]
    fn test_ids_are_stable() {
        for (i, biome) in Biome::all().iter().enumerate() {
            assert_eq!(biome.as_u8() as usize, i);
        }
    }
}
