//! Step check: can the robot step down onto, or across, lower terrain?
//!
//! For a cell flagged by the step filter the check looks at every higher
//! neighbour (or the cell itself if there is none). From each such
//! candidate it follows the drops around it for at most `max_gap_width`
//! and traces the elevation profile:
//!
//! ```text
//!   candidate
//!      ●───┐                 ┌─────    gap closes: descendable / bridgeable
//!          │                 │
//!          └──── gap ────────┘
//!
//!      ●───┐
//!          │                            gap never closes: inadmissible
//!          └──── gap ─────────────▶|
//! ```
//!
//! Anything rising more than the critical height above the candidate is a
//! wall and fails immediately.

use log::debug;

use crate::core::{GridCoord, WorldPoint};
use crate::grid::layers::{ELEVATION, STEP, STEP_FOOTPRINT};
use crate::grid::{DiscIter, GridMap, LineIter};

use super::AdmissibilityConfig;

pub(super) fn check_step(config: &AdmissibilityConfig, map: &mut GridMap, cell: GridCoord) -> bool {
    if map.get(STEP, cell) != 0.0 {
        return true;
    }

    let cached = map.get(STEP_FOOTPRINT, cell);
    if cached.is_finite() {
        return cached != 0.0;
    }

    let admissible = step_is_passable(config, map, cell);
    map.set(STEP_FOOTPRINT, cell, if admissible { 1.0 } else { 0.0 });
    admissible
}

fn step_is_passable(config: &AdmissibilityConfig, map: &GridMap, cell: GridCoord) -> bool {
    let window_radius = config.step_window_factor * map.resolution();
    let center = map.position_of(cell);
    let height = map.get(ELEVATION, cell);

    let mut candidates: Vec<GridCoord> = DiscIter::new(map, center, window_radius)
        .filter(|&neighbour| {
            map.get(ELEVATION, neighbour) > height + config.critical_step_height
                && map.get(STEP, neighbour) == 0.0
        })
        .collect();
    if candidates.is_empty() {
        candidates.push(cell);
    }

    let window = WorldPoint::new(window_radius, window_radius);
    candidates
        .into_iter()
        .all(|candidate| candidate_is_passable(config, map, center, candidate, window))
}

fn candidate_is_passable(
    config: &AdmissibilityConfig,
    map: &GridMap,
    center: WorldPoint,
    candidate: GridCoord,
    window_length: WorldPoint,
) -> bool {
    let origin = map.position_of(candidate);
    let Some(window) = map.window(origin, window_length) else {
        debug!("Step window around {candidate:?} does not fit in the map");
        return false;
    };

    let height = map.get(ELEVATION, candidate);
    let low = height - config.critical_step_height;
    let to_center = center - origin;

    window.cells().all(|neighbour| {
        // Only drops flagged by the step filter matter.
        if map.get(STEP, neighbour) != 0.0 || !(map.get(ELEVATION, neighbour) < low) {
            return true;
        }

        let direction = map.position_of(neighbour) - origin;
        if direction.norm() < config.min_direction_norm {
            return true;
        }
        if to_center.norm() > config.min_direction_norm && to_center.dot(&direction) < 0.0 {
            return true;
        }

        let mut probe = origin + direction;
        while (probe - origin + direction).norm() < config.max_gap_width
            && map.is_inside(probe + direction)
        {
            probe += direction;
        }

        match map.index_of(probe) {
            Some(end) => profile_is_passable(map, candidate, end, height, config.critical_step_height),
            None => true,
        }
    })
}

/// Walk the line and fail on a wall or on a gap that never closes.
fn profile_is_passable(
    map: &GridMap,
    start: GridCoord,
    end: GridCoord,
    height: f32,
    critical_step_height: f32,
) -> bool {
    let mut gap_open = false;
    for cell in LineIter::new(map, start, end) {
        let elevation = map.get(ELEVATION, cell);
        if elevation > height + critical_step_height {
            return false;
        }
        if elevation < height - critical_step_height || !elevation.is_finite() {
            gap_open = true;
        } else if gap_open {
            return true;
        }
    }
    !gap_open
}
