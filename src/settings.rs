//! Generator configuration.
//!
//! `Settings` is plain data, fixed for the lifetime of a generator. It can be
//! round-tripped through JSON so a world can be reproduced from a file.

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WorldGenError};

/// Global shaping applied to the synthesized height field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeightModifier {
    /// Leave the noise untouched
    None,
    /// Pull the borders down so land gathers in the middle
    #[default]
    Pangaea,
    /// Sink the middle into a central sea
    InversePangaea,
    /// Lower a horizontal band across the map
    Band,
}

impl HeightModifier {
    pub fn all() -> &'static [Self] {
        &[Self::None, Self::Pangaea, Self::InversePangaea, Self::Band]
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::None => "Raw noise, no global shaping",
            Self::Pangaea => "Single central continent ringed by ocean",
            Self::InversePangaea => "Land around a large central sea",
            Self::Band => "Horizontal lowland strip through the middle",
        }
    }
}

impl std::fmt::Display for HeightModifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Pangaea => write!(f, "pangaea"),
            Self::InversePangaea => write!(f, "inverse-pangaea"),
            Self::Band => write!(f, "band"),
        }
    }
}

impl FromStr for HeightModifier {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "pangaea" => Ok(Self::Pangaea),
            "inverse-pangaea" | "inverse_pangaea" | "inv-pangaea" => Ok(Self::InversePangaea),
            "band" | "straight" => Ok(Self::Band),
            other => Err(format!(
                "unknown height modifier '{}' (expected one of: none, pangaea, inverse-pangaea, band)",
                other
            )),
        }
    }
}

/// Neighbourhood used when smoothing the temperature field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClimateStencil {
    /// Average with the north, east, south and west neighbours
    #[default]
    Cardinal,
    /// Sample the northern neighbour twice and skip the southern one,
    /// matching maps produced by the first version of this generator
    LegacyNorthTwice,
}

impl ClimateStencil {
    pub fn all() -> &'static [Self] {
        &[Self::Cardinal, Self::LegacyNorthTwice]
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Cardinal => "Four distinct neighbours (N, E, S, W)",
            Self::LegacyNorthTwice => "Legacy stencil (N, E, N, W)",
        }
    }

    /// Offsets sampled around a cell, in (dx, dy) form.
    pub fn offsets(&self) -> [(i32, i32); 4] {
        match self {
            Self::Cardinal => [(0, -1), (1, 0), (0, 1), (-1, 0)],
            Self::LegacyNorthTwice => [(0, -1), (1, 0), (0, -1), (-1, 0)],
        }
    }
}

impl std::fmt::Display for ClimateStencil {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cardinal => write!(f, "cardinal"),
            Self::LegacyNorthTwice => write!(f, "legacy"),
        }
    }
}

impl FromStr for ClimateStencil {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cardinal" => Ok(Self::Cardinal),
            "legacy" | "legacy-north-twice" | "legacy_north_twice" => Ok(Self::LegacyNorthTwice),
            other => Err(format!(
                "unknown climate stencil '{}' (expected cardinal or legacy)",
                other
            )),
        }
    }
}

/// How thermal erosion accounts for the material it moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThermalTransfer {
    /// The sliding cell loses exactly what its neighbours gain
    #[default]
    Conserving,
    /// Neighbours gain material but the source cell keeps its height,
    /// matching maps produced by the first version of this generator
    Additive,
}

impl ThermalTransfer {
    pub fn all() -> &'static [Self] {
        &[Self::Conserving, Self::Additive]
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Conserving => "Material moves from the cell to its lower neighbours",
            Self::Additive => "Legacy transfer: lower neighbours grow, the cell is not lowered",
        }
    }
}

impl std::fmt::Display for ThermalTransfer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Conserving => write!(f, "conserving"),
            Self::Additive => write!(f, "additive"),
        }
    }
}

impl FromStr for ThermalTransfer {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "conserving" => Ok(Self::Conserving),
            "additive" | "legacy" => Ok(Self::Additive),
            other => Err(format!(
                "unknown thermal transfer '{}' (expected conserving or additive)",
                other
            )),
        }
    }
}

/// Everything a generator needs to produce a world.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Side length of every output grid, in cells
    pub world_size: usize,
    /// Seed shared by all noise stages
    pub seed: u32,
    /// Global landmass shaping
    pub height_modifier: HeightModifier,
    /// Cells at or below this height become ocean (0.0-1.0)
    pub sea_level: f32,

    /// Number of thermal erosion sweeps (0 disables the stage)
    pub thermal_erosion_iterations: usize,
    /// Height difference a slope must exceed before material slides
    pub thermal_erosion_threshold: f32,
    /// Fraction of the excess slope moved per step (0.0-1.0)
    pub thermal_erosion_coefficient: f32,
    /// Whether the sliding cell is debited
    #[serde(default)]
    pub thermal_transfer: ThermalTransfer,

    /// Number of hydraulic erosion sweeps (0 disables the stage)
    pub hydraulic_erosion_iterations: usize,

    /// Temperature smoothing neighbourhood
    #[serde(default)]
    pub climate_stencil: ClimateStencil,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            world_size: 512,
            seed: 1337,
            height_modifier: HeightModifier::Pangaea,
            sea_level: 0.15,
            thermal_erosion_iterations: 5,
            thermal_erosion_threshold: 0.0005,
            thermal_erosion_coefficient: 0.5,
            thermal_transfer: ThermalTransfer::Conserving,
            hydraulic_erosion_iterations: 0,
            climate_stencil: ClimateStencil::Cardinal,
        }
    }
}

impl Settings {
    /// Small, fast configuration for tests and previews (no erosion).
    pub fn preview(world_size: usize, seed: u32) -> Self {
        Self {
            world_size,
            seed,
            height_modifier: HeightModifier::None,
            thermal_erosion_iterations: 0,
            hydraulic_erosion_iterations: 0,
            ..Default::default()
        }
    }

    /// Check that every value is usable by the pipeline.
    ///
    /// Beyond the world size, thermal erosion needs a non-negative threshold
    /// and a coefficient in [0, 1]: with those a cell never gives away more
    /// than its largest drop, so heights stay in range.
    pub fn validate(&self) -> Result<()> {
        if self.world_size == 0 {
            return Err(WorldGenError::InvalidWorldSize(self.world_size));
        }
        if !self.sea_level.is_finite() || !(0.0..=1.0).contains(&self.sea_level) {
            return Err(WorldGenError::InvalidSetting {
                name: "sea_level",
                reason: format!("must lie in [0, 1], got {}", self.sea_level),
            });
        }
        if !self.thermal_erosion_threshold.is_finite() || self.thermal_erosion_threshold < 0.0 {
            return Err(WorldGenError::InvalidSetting {
                name: "thermal_erosion_threshold",
                reason: format!("must be a non-negative number, got {}", self.thermal_erosion_threshold),
            });
        }
        if !self.thermal_erosion_coefficient.is_finite()
            || !(0.0..=1.0).contains(&self.thermal_erosion_coefficient)
        {
            return Err(WorldGenError::InvalidSetting {
                name: "thermal_erosion_coefficient",
                reason: format!("must lie in [0, 1], got {}", self.thermal_erosion_coefficient),
            });
        }
        Ok(())
    }

    /// Load settings from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| WorldGenError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Settings =
            serde_json::from_str(&contents).map_err(|source| WorldGenError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Save settings as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let serialized = serde_json::to_string_pretty(self).map_err(|e| WorldGenError::ConfigWrite {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        std::fs::write(path, serialized).map_err(|e| WorldGenError::ConfigWrite {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_zero_world_size_rejected() {
        let settings = Settings {
            world_size: 0,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(WorldGenError::InvalidWorldSize(0))
        ));
    }

    #[test]
    fn test_out_of_range_values_rejected() {
        let bad_sea = Settings {
            sea_level: 1.5,
            ..Default::default()
        };
        assert!(bad_sea.validate().is_err());

        let bad_coeff = Settings {
            thermal_erosion_coefficient: f32::NAN,
            ..Default::default()
        };
        assert!(bad_coeff.validate().is_err());

        let bad_threshold = Settings {
            thermal_erosion_threshold: -0.1,
            ..Default::default()
        };
        assert!(bad_threshold.validate().is_err());
    }

    #[test]
    fn test_modifier_parsing() {
        for modifier in HeightModifier::all() {
            let parsed: HeightModifier = modifier.to_string().parse().unwrap();
            assert_eq!(parsed, *modifier);
        }
        assert_eq!("straight".parse::<HeightModifier>().unwrap(), HeightModifier::Band);
        assert!("sideways".parse::<HeightModifier>().is_err());
    }

    #[test]
    fn test_stencil_parsing_and_offsets() {
        for stencil in ClimateStencil::all() {
            let parsed: ClimateStencil = stencil.to_string().parse().unwrap();
            assert_eq!(parsed, *stencil);
        }
        let legacy = ClimateStencil::LegacyNorthTwice.offsets();
        assert_eq!(legacy[0], legacy[2]);
        let cardinal = ClimateStencil::Cardinal.offsets();
        let sum = cardinal.iter().fold((0, 0), |acc, o| (acc.0 + o.0, acc.1 + o.1));
        assert_eq!(sum, (0, 0));
    }

    #[test]
    fn test_thermal_transfer_parsing() {
        for transfer in ThermalTransfer::all() {
            let parsed: ThermalTransfer = transfer.to_string().parse().unwrap();
            assert_eq!(parsed, *transfer);
        }
        assert_eq!("legacy".parse::<ThermalTransfer>().unwrap(), ThermalTransfer::Additive);
        assert!("lossy".parse::<ThermalTransfer>().is_err());
        assert_eq!(
            serde_json::to_string(&ThermalTransfer::Additive).unwrap(),
            "\"additive\""
        );
    }

    #[test]
    fn test_json_without_stencil_uses_default() {
        let json = r#"{
            "world_size": 64,
            "seed": 7,
            "height_modifier": "band",
            "sea_level": 0.2,
            "thermal_erosion_iterations": 1,
            "thermal_erosion_threshold": 0.001,
            "thermal_erosion_coefficient": 0.5,
            "hydraulic_erosion_iterations": 2
        }"#;
        let settings: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.height_modifier, HeightModifier::Band);
        assert_eq!(settings.climate_stencil, ClimateStencil::Cardinal);
        assert_eq!(settings.thermal_transfer, ThermalTransfer::Conserving);
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("worldgen_settings_{}.json", std::process::id()));
        let settings = Settings {
            seed: 99,
            climate_stencil: ClimateStencil::LegacyNorthTwice,
            ..Settings::preview(32, 99)
        };
        settings.save(&path).unwrap();
        let loaded = Settings::load(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_load_missing_file_reports_path() {
        let path = Path::new("/definitely/not/here/settings.json");
        let err = Settings::load(path).unwrap_err();
        assert!(err.to_string().contains("settings.json"));
    }
}
