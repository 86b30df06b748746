//! Thermal erosion: talus-angle relaxation over the 4-neighbourhood.
//!
//! For each cell, every lower neighbour whose drop exceeds `threshold` takes a
//! share of `coefficient * (max_drop - threshold)`, proportional to its own
//! drop. With [`ThermalTransfer::Conserving`] the cell gives up exactly what
//! its neighbours receive, so a sweep moves height around without creating or
//! destroying it. [`ThermalTransfer::Additive`] only raises the neighbours and
//! can push heights above 1.0.

use crate::erosion::ErosionStats;
use crate::settings::ThermalTransfer;
use crate::tilemap::Tilemap;

/// West, north, east, south.
const NEIGHBORS_4: [(i32, i32); 4] = [(-1, 0), (0, -1), (1, 0), (0, 1)];

/// Run `iterations` in-place sweeps of thermal erosion.
pub fn simulate(
    heightmap: &mut Tilemap<f32>,
    iterations: usize,
    threshold: f32,
    coefficient: f32,
    transfer: ThermalTransfer,
) -> ErosionStats {
    let size = heightmap.size;
    let mut stats = ErosionStats {
        iterations,
        ..Default::default()
    };

    for i in 0..iterations {
        log::debug!("Running thermal erosion - iteration {}", i);
        for y in 0..size {
            for x in 0..size {
                let moved = relax_cell(heightmap, x, y, threshold, coefficient, transfer);
                if moved > 0.0 {
                    if transfer == ThermalTransfer::Conserving {
                        stats.record_erosion(moved);
                    }
                    stats.total_deposited += moved as f64;
                }
            }
        }
    }

    stats
}

/// Slide material off one cell. Returns the amount its neighbours received.
fn relax_cell(
    heightmap: &mut Tilemap<f32>,
    x: usize,
    y: usize,
    threshold: f32,
    coefficient: f32,
    transfer: ThermalTransfer,
) -> f32 {
    let (xi, yi) = (x as i32, y as i32);
    let current = *heightmap.get(x, y);

    let mut drops = [0.0f32; 4];
    let mut total_drop = 0.0f32;
    let mut max_drop = f32::MIN;
    for (j, &(dx, dy)) in NEIGHBORS_4.iter().enumerate() {
        let drop = current - *heightmap.get_clamped(xi + dx, yi + dy);
        drops[j] = drop;
        if drop > threshold {
            total_drop += drop;
            max_drop = max_drop.max(drop);
        }
    }

    if total_drop <= 0.0 {
        return 0.0;
    }

    let excess = coefficient * (max_drop - threshold);
    let mut moved = 0.0f32;
    for (j, &(dx, dy)) in NEIGHBORS_4.iter().enumerate() {
        if drops[j] <= threshold {
            continue;
        }
        let share = excess * (drops[j] / total_drop);
        let (nx, ny) = (xi + dx, yi + dy);
        let neighbor = *heightmap.get_clamped(nx, ny);
        heightmap.set_clamped(nx, ny, neighbor + share);
        moved += share;
    }

    if transfer == ThermalTransfer::Conserving {
        let remaining = *heightmap.get(x, y) - moved;
        heightmap.set(x, y, remaining);
    }
    moved
}
