//! Neighbourhood count checks (slope, roughness).

use crate::core::GridCoord;
use crate::grid::{DiscIter, GridMap};

use super::{AdmissibilityConfig, Stage};

/// Largest tolerated number of failing cells in a search window.
///
/// `floor(count_factor · window · critical_length / resolution²)`
pub fn critical_count(config: &AdmissibilityConfig, resolution: f32, count_factor: f32) -> usize {
    let resolution = f64::from(resolution);
    let window = f64::from(config.window_factor) * resolution;
    let critical_length = f64::from(config.max_gap_width) / f64::from(config.critical_length_divisor);
    (f64::from(count_factor) * window * critical_length / (resolution * resolution))
        .floor()
        .max(0.0) as usize
}

/// A cell whose base value is 0 passes only while few neighbours are 0 too.
pub(super) fn check_window(
    config: &AdmissibilityConfig,
    stage: Stage,
    count_factor: f32,
    map: &mut GridMap,
    cell: GridCoord,
) -> bool {
    let base = stage.base_layer();
    if map.get(base, cell) != 0.0 {
        return true;
    }

    let cache = stage.cache_layer();
    let cached = map.get(cache, cell);
    if cached.is_finite() {
        return cached != 0.0;
    }

    let resolution = map.resolution();
    let critical = critical_count(config, resolution, count_factor);
    let center = map.position_of(cell);

    let mut failing = 0usize;
    let admissible = DiscIter::new(map, center, config.window_factor * resolution).all(|neighbour| {
        if map.get(base, neighbour) == 0.0 {
            failing += 1;
        }
        failing <= critical
    });

    map.set(cache, cell, if admissible { 1.0 } else { 0.0 });
    admissible
}
