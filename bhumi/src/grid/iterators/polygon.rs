//! Cells whose centre lies inside a polygon.
//!
//! Membership uses [`Polygon::contains`], an even-odd test with half-open
//! edges, so two polygons sharing an edge never both claim a cell.

use crate::core::GridCoord;
use crate::geometry::Polygon;
use crate::grid::{GridMap, Lattice};

/// Interior cells of a polygon, row-major within its clipped bounding box.
#[derive(Clone, Debug)]
pub struct PolygonIter<'a> {
    lattice: Lattice,
    polygon: &'a Polygon,
    min: GridCoord,
    max: GridCoord,
    cursor: GridCoord,
}

impl<'a> PolygonIter<'a> {
    pub fn new(map: &GridMap, polygon: &'a Polygon) -> Self {
        let lattice = map.lattice();
        let (min, max) = match polygon.bounding_box() {
            Some((lo, hi)) if polygon.len() >= 3 => lattice.clipped_box(lo, hi),
            // Empty range
            _ => (GridCoord::new(0, 0), GridCoord::new(-1, -1)),
        };
        Self {
            lattice,
            polygon,
            min,
            max,
            cursor: min,
        }
    }
}

impl Iterator for PolygonIter<'_> {
    type Item = GridCoord;

    fn next(&mut self) -> Option<Self::Item> {
        while self.cursor.y <= self.max.y && self.min.x <= self.max.x {
            let cell = self.cursor;
            self.cursor.x += 1;
            if self.cursor.x > self.max.x {
                self.cursor.x = self.min.x;
                self.cursor.y += 1;
            }
            if self.polygon.contains(self.lattice.position_of(cell)) {
                return Some(cell);
            }
        }
        None
    }
}
