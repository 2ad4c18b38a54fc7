//! Outward spiral from a centre cell.
//!
//! Cells are visited in non-decreasing distance from the centre cell, so a
//! search can stop as soon as the radius it cares about has been passed:
//!
//! ```text
//!       2 1 2
//!     2 1 0 1 2      0: r = 0
//!       2 1 2        1: r = res, 2: r = √2·res, ...
//! ```
//!
//! Each column of the search box is split into an upward and a downward
//! half; distance grows monotonically along a half-column, so a min-heap
//! holding the next cell of every half-column yields the rings lazily. The
//! box is clipped to the grid, so the work is bounded by the cells visited.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::core::{GridCoord, WorldPoint};
use crate::grid::GridMap;

/// Next cell of one half-column: squared distance, then row-major offset.
type Cursor = Reverse<(i32, i32, i32, i32)>;

/// Radius-ordered cells within `radius_max` of the centre cell.
#[derive(Clone, Debug)]
pub struct SpiralIter {
    center: GridCoord,
    frontier: BinaryHeap<Cursor>,
    /// Largest offset upwards / downwards that stays on the grid
    up: i32,
    down: i32,
    resolution: f32,
    radius_max: f32,
    current_radius: f32,
}

impl SpiralIter {
    /// Spiral around the cell containing `center`; empty if it is outside the grid.
    pub fn new(map: &GridMap, center: WorldPoint, radius_max: f32) -> Self {
        let mut spiral = Self {
            center: map.world_to_grid(center),
            frontier: BinaryHeap::new(),
            up: 0,
            down: 0,
            resolution: map.resolution(),
            radius_max,
            current_radius: 0.0,
        };
        if map.index_of(center).is_none() {
            return spiral;
        }

        let (width, height) = (map.width() as i32, map.height() as i32);
        let extent = width.max(height) as f32;
        let n = (radius_max / spiral.resolution).ceil().clamp(0.0, extent) as i32;
        let c = spiral.center;
        spiral.up = n.min(height - 1 - c.y);
        spiral.down = n.min(c.y);
        for dx in -n.min(c.x)..=n.min(width - 1 - c.x) {
            spiral.push(dx, 0, 1);
            spiral.push(dx, -1, -1);
        }
        spiral
    }

    /// Distance of the most recently yielded cell from the centre cell.
    #[inline]
    pub fn current_radius(&self) -> f32 {
        self.current_radius
    }

    #[inline]
    fn radius(&self, d2: i32) -> f32 {
        (d2 as f32).sqrt() * self.resolution
    }

    fn push(&mut self, dx: i32, dy: i32, step: i32) {
        let on_grid = if step > 0 { dy <= self.up } else { -dy <= self.down };
        if !on_grid {
            return;
        }
        let d2 = dx * dx + dy * dy;
        if d2 == 0 || self.radius(d2) <= self.radius_max {
            self.frontier.push(Reverse((d2, dy, dx, step)));
        }
    }
}

impl Iterator for SpiralIter {
    type Item = GridCoord;

    fn next(&mut self) -> Option<Self::Item> {
        let Reverse((d2, dy, dx, step)) = self.frontier.pop()?;
        self.current_radius = self.radius(d2);
        self.push(dx, dy + step, step);
        Some(self.center + GridCoord::new(dx, dy))
    }
}
