//! Water classification: sea-level thresholding and isolated-sea pruning.
//!
//! Rivers and lakes are not found here. Hydraulic erosion marks them later
//! on the same grid.

use crate::tilemap::Tilemap;

/// Number of pruning sweeps after thresholding
const PRUNE_PASSES: usize = 25;
/// Distance along each axis at which pruning looks for more ocean
const PRUNE_PROBE_DISTANCE: i32 = 3;

/// Water category of one cell
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[repr(u8)]
pub enum Water {
    #[default]
    Land = 0,
    Ocean = 1,
    /// River or lake, marked by hydraulic erosion
    River = 2,
}

impl Water {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Water::Land => "Land",
            Water::Ocean => "Ocean",
            Water::River => "River/Lake",
        }
    }
}

/// Mark every cell at or below `sea_level` as ocean, then drop isolated seas.
pub fn classify_saltwater(heightmap: &Tilemap<f32>, sea_level: f32) -> Tilemap<Water> {
    log::info!("Claiming saltwater ocean...");
    let mut water = Tilemap::new_with(heightmap.size, Water::Land);
    for (x, y, &h) in heightmap.iter() {
        if h <= sea_level {
            water.set(x, y, Water::Ocean);
        }
    }

    prune_isolated_seas(&mut water, PRUNE_PASSES);
    water
}

/// Dry up small seas: an ocean cell turns to land when none of the cells
/// three steps away along each axis (clamped at the border) is ocean.
///
/// This only removes bodies narrower than the probe distance. An enclosed sea
/// wider than that survives even with no path to open ocean.
pub fn prune_isolated_seas(water: &mut Tilemap<Water>, passes: usize) {
    let size = water.size;
    let d = PRUNE_PROBE_DISTANCE;
    for _ in 0..passes {
        for y in 0..size {
            for x in 0..size {
                if *water.get(x, y) != Water::Ocean {
                    continue;
                }
                let (xi, yi) = (x as i32, y as i32);
                let supported = [(xi - d, yi), (xi + d, yi), (xi, yi - d), (xi, yi + d)]
                    .iter()
                    .any(|&(px, py)| *water.get_clamped(px, py) == Water::Ocean);
                if !supported {
                    water.set(x, y, Water::Land);
                }
            }
        }
    }
}

/// Cell counts per water category
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WaterStats {
    pub land: usize,
    pub ocean: usize,
    pub river: usize,
}

impl WaterStats {
    pub fn total(&self) -> usize {
        self.land + self.ocean + self.river
    }

    fn percent(&self, count: usize) -> f32 {
        if self.total() == 0 {
            0.0
        } else {
            count as f32 * 100.0 / self.total() as f32
        }
    }

    pub fn land_percent(&self) -> f32 {
        self.percent(self.land)
    }

    pub fn ocean_percent(&self) -> f32 {
        self.percent(self.ocean)
    }

    pub fn river_percent(&self) -> f32 {
        self.percent(self.river)
    }
}

/// Count cells per water category.
pub fn water_stats(water: &Tilemap<Water>) -> WaterStats {
    let mut stats = WaterStats::default();
    for &w in water.values() {
        match w {
            Water::Land => stats.land += 1,
            Water::Ocean => stats.ocean += 1,
            Water::River => stats.river += 1,
        }
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heightmap::synthesize_height;
    use crate::noise_source::SeededNoise;

    fn lake(size: usize, from: usize, to: usize) -> Tilemap<Water> {
        let mut water = Tilemap::new_with(size, Water::Land);
        for y in from..=to {
            for x in from..=to {
                water.set(x, y, Water::Ocean);
            }
        }
        water
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let mut heightmap = Tilemap::new_with(8, 0.5f32);
        heightmap.set(0, 0, 0.15);
        heightmap.set(1, 0, 0.1501);
        let water = classify_saltwater(&heightmap, 0.15);
        // (0, 0) probes itself through clamping, so it survives pruning
        assert_eq!(*water.get(0, 0), Water::Ocean);
        assert_eq!(*water.get(1, 0), Water::Land);
    }

    #[test]
    fn test_single_cell_sea_is_removed() {
        let mut water = lake(12, 6, 6);
        prune_isolated_seas(&mut water, PRUNE_PASSES);
        assert!(water.values().iter().all(|&w| w == Water::Land));
    }

    #[test]
    fn test_small_enclosed_sea_is_removed() {
        let mut water = lake(16, 7, 9);
        prune_isolated_seas(&mut water, PRUNE_PASSES);
        assert_eq!(water_stats(&water).ocean, 0);
    }

    #[test]
    fn test_wide_enclosed_sea_survives() {
        let mut water = lake(16, 5, 11);
        prune_isolated_seas(&mut water, PRUNE_PASSES);
        assert_eq!(water_stats(&water).ocean, 49);
    }

    #[test]
    fn test_land_never_becomes_ocean() {
        let mut water = lake(10, 2, 4);
        let before = water.clone();
        prune_isolated_seas(&mut water, 3);
        for (x, y, &w) in water.iter() {
            if *before.get(x, y) == Water::Land {
                assert_eq!(w, Water::Land);
            }
        }
    }

    #[test]
    fn test_pruned_oceans_keep_a_probe() {
        let heightmap = synthesize_height(32, &SeededNoise::new(42));
        let sea_level = 0.3;
        let water = classify_saltwater(&heightmap, sea_level);
        for (x, y, &w) in water.iter() {
            if w != Water::Ocean {
                continue;
            }
            assert!(*heightmap.get(x, y) <= sea_level);
            let (xi, yi) = (x as i32, y as i32);
            let probes = [(xi - 3, yi), (xi + 3, yi), (xi, yi - 3), (xi, yi + 3)];
            assert!(probes
                .iter()
                .any(|&(px, py)| *water.get_clamped(px, py) == Water::Ocean));
        }
    }

    #[test]
    fn test_water_stats_percentages() {
        let mut water = Tilemap::new_with(2, Water::Land);
        water.set(0, 0, Water::Ocean);
        water.set(1, 1, Water::River);
        let stats = water_stats(&water);
        assert_eq!(stats, WaterStats { land: 2, ocean: 1, river: 1 });
        assert_eq!(stats.land_percent(), 50.0);
        assert_eq!(stats.ocean_percent(), 25.0);
        assert_eq!(Water::River.as_u8(), 2);
    }
}
