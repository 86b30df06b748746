//! Erosion simulation module
//!
//! Two grid-sweeping passes reshape the height field:
//! - **Thermal erosion**: 4-neighbour slope relaxation, material slides downhill
//!   once a slope exceeds a talus threshold
//! - **Hydraulic erosion**: 8-neighbour water/sediment transport seeded from the
//!   moisture field, marking river and lake cells where water collects
//!
//! Both sweep the grid row by row and update it in place, so a cell sees the
//! writes of every cell processed before it in the same sweep. Replacing either
//! with a double-buffered or parallel version changes the output.

pub mod hydraulic;
pub mod thermal;

pub use hydraulic::WaterCell;

/// Statistics from erosion simulation
#[derive(Debug, Clone, PartialEq)]
pub struct ErosionStats {
    /// Number of full sweeps performed
    pub iterations: usize,
    /// Total material removed from source cells (in height units)
    pub total_eroded: f64,
    /// Total material added back onto the grid
    pub total_deposited: f64,
    /// Largest single removal from one cell in one step
    pub max_erosion: f32,
    /// Cells marked as river/lake at the end of the pass
    pub river_cells: usize,
}

impl Default for ErosionStats {
    fn default() -> Self {
        Self {
            iterations: 0,
            total_eroded: 0.0,
            total_deposited: 0.0,
            max_erosion: 0.0,
            river_cells: 0,
        }
    }
}

impl ErosionStats {
    pub(crate) fn record_erosion(&mut self, amount: f32) {
        self.total_eroded += amount as f64;
        if amount > self.max_erosion {
            self.max_erosion = amount;
        }
    }
}
