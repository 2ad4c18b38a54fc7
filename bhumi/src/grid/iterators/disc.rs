//! Cells whose centre lies within a radius of a position.

use crate::core::{GridCoord, WorldPoint};
use crate::grid::{GridMap, Lattice};

/// Disc of cells around a world position, row-major within its bounding box.
#[derive(Clone, Debug)]
pub struct DiscIter {
    lattice: Lattice,
    center: WorldPoint,
    radius_sq: f32,
    min: GridCoord,
    max: GridCoord,
    cursor: GridCoord,
}

impl DiscIter {
    pub fn new(map: &GridMap, center: WorldPoint, radius: f32) -> Self {
        let lattice = map.lattice();
        let half = WorldPoint::new(radius, radius);
        let (min, max) = lattice.clipped_box(center - half, center + half);
        Self {
            lattice,
            center,
            radius_sq: radius * radius,
            min,
            max,
            cursor: min,
        }
    }
}

impl Iterator for DiscIter {
    type Item = GridCoord;

    fn next(&mut self) -> Option<Self::Item> {
        while self.cursor.y <= self.max.y && self.min.x <= self.max.x {
            let cell = self.cursor;
            self.cursor.x += 1;
            if self.cursor.x > self.max.x {
                self.cursor.x = self.min.x;
                self.cursor.y += 1;
            }
            if self.lattice.position_of(cell).distance_squared(&self.center) <= self.radius_sq {
                return Some(cell);
            }
        }
        None
    }
}
