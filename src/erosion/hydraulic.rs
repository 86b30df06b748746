//! Hydraulic erosion as a cellular water/sediment transport.
//!
//! Every cell holds a bucket of water seeded from the moisture map. Each sweep:
//! 1. rain tops the bucket up (unless it is nearly full)
//! 2. if the cell has lower neighbours, water picks up sediment in proportion
//!    to the total downhill drop and hands it to those neighbours
//! 3. most of the water evaporates and suspended sediment above a cap settles
//!
//! Neighbours are taken on the torus. Whatever sediment is still suspended at
//! the end settles where it is, and cells still holding a lot of water become
//! rivers or lakes.

use crate::erosion::ErosionStats;
use crate::tilemap::Tilemap;
use crate::water_bodies::Water;

/// Direction offsets for 8-neighbour transport (dx, dy)
/// Order: N, NE, E, SE, S, SW, W, NW
const DIR_OFFSETS: [(i32, i32); 8] = [
    (0, -1),  // N
    (1, -1),  // NE
    (1, 0),   // E
    (1, 1),   // SE
    (0, 1),   // S
    (-1, 1),  // SW
    (-1, 0),  // W
    (-1, -1), // NW
];

const INITIAL_WATER_FACTOR: f32 = 0.1;
const RAIN_FACTOR: f32 = 0.01;
/// Buckets at or above this level get no more rain
const RAIN_CUTOFF: f32 = 0.9;
/// Smallest total downhill drop that moves anything
const MIN_TOTAL_DROP: f32 = 0.001;
const MAX_DROP: f32 = 0.9;
/// Share of a cell's height that one step may remove
const MAX_PICKUP_FRACTION: f32 = 0.5;
const PICKUP_FACTOR: f32 = 0.25;
/// Fraction of water left after evaporation
const EVAPORATION_KEEP: f32 = 0.1;
const SEDIMENT_CAP: f32 = 0.1;
/// Water level above which a cell is marked river/lake
const RIVER_THRESHOLD: f32 = 0.2;

/// Per-cell transport state, alive only during the simulation.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WaterCell {
    pub water: f32,
    pub sediment: f32,
}

/// Run hydraulic erosion over the whole grid.
///
/// `moisture` drives both the initial water and the rain. Cells left holding
/// more than the river threshold are marked [`Water::River`] in `water`.
pub fn simulate(
    heightmap: &mut Tilemap<f32>,
    moisture: &Tilemap<f32>,
    water: &mut Tilemap<Water>,
    iterations: usize,
) -> ErosionStats {
    let size = heightmap.size;
    let mut stats = ErosionStats {
        iterations,
        ..Default::default()
    };

    let mut cells: Tilemap<WaterCell> = Tilemap::new(size);
    for (x, y, cell) in cells.iter_mut() {
        cell.water = *moisture.get(x, y) * INITIAL_WATER_FACTOR;
    }

    for i in 0..iterations {
        log::debug!("Running hydraulic erosion - iteration {}", i);
        for y in 0..size {
            for x in 0..size {
                step_cell(heightmap, moisture, &mut cells, x, y, &mut stats);
            }
        }
    }

    stats.total_deposited += deposit_remaining(heightmap, &cells);
    stats.river_cells = mark_rivers(&cells, water);
    log::debug!(
        "Hydraulic erosion moved {:.3} units, {} river cells",
        stats.total_eroded,
        stats.river_cells
    );

    stats
}

fn step_cell(
    heightmap: &mut Tilemap<f32>,
    moisture: &Tilemap<f32>,
    cells: &mut Tilemap<WaterCell>,
    x: usize,
    y: usize,
    stats: &mut ErosionStats,
) {
    let (xi, yi) = (x as i32, y as i32);

    // Rain
    {
        let cell = cells.get_mut(x, y);
        if cell.water < RAIN_CUTOFF {
            cell.water += *moisture.get(x, y) * RAIN_FACTOR;
        }
    }

    let center = *heightmap.get(x, y);
    let mut deltas = [0.0f32; 8];
    let mut total_drop = 0.0f32;
    for (i, &(dx, dy)) in DIR_OFFSETS.iter().enumerate() {
        let delta = *heightmap.get_wrapped(xi + dx, yi + dy) - center;
        deltas[i] = delta;
        if delta < 0.0 {
            total_drop -= delta;
        }
    }

    // Pick up and hand sediment downhill
    if total_drop > MIN_TOTAL_DROP {
        let drop = total_drop.min(MAX_DROP);
        let bucket = cells.get(x, y).water;
        let sediment = (center * MAX_PICKUP_FRACTION).min(bucket * drop * PICKUP_FACTOR);

        heightmap.set(x, y, center - sediment);
        cells.get_mut(x, y).water -= bucket * drop;
        stats.record_erosion(sediment);

        for (i, &(dx, dy)) in DIR_OFFSETS.iter().enumerate() {
            if deltas[i] >= 0.0 {
                continue;
            }
            let share = sediment * (-deltas[i] / total_drop);
            let (nx, ny) = cells.wrap_coords(xi + dx, yi + dy);
            let neighbor = cells.get_mut(nx, ny);
            neighbor.sediment += share;
            neighbor.water += share;
        }
    }

    // Evaporate and settle
    let cell = cells.get_mut(x, y);
    cell.water *= EVAPORATION_KEEP;
    if cell.sediment > SEDIMENT_CAP {
        let settled = cell.sediment - SEDIMENT_CAP;
        cell.sediment = SEDIMENT_CAP;
        let h = *heightmap.get(x, y);
        heightmap.set(x, y, h + settled);
        stats.total_deposited += settled as f64;
    }
}

/// Settle all suspended sediment. Returns the total deposited.
fn deposit_remaining(heightmap: &mut Tilemap<f32>, cells: &Tilemap<WaterCell>) -> f64 {
    let mut deposited = 0.0f64;
    for (x, y, h) in heightmap.iter_mut() {
        let sediment = cells.get(x, y).sediment;
        *h += sediment;
        deposited += sediment as f64;
    }
    deposited
}

/// Mark cells still holding water as rivers/lakes. Returns how many were marked.
fn mark_rivers(cells: &Tilemap<WaterCell>, water: &mut Tilemap<Water>) -> usize {
    let mut marked = 0;
    for (x, y, cell) in cells.iter() {
        if cell.water > RIVER_THRESHOLD {
            water.set(x, y, Water::River);
            marked += 1;
        }
    }
    marked
}
