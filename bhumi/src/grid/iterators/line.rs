//! Bresenham line between two cells.
//!
//! ```text
//! From (0,0) to (7,3):
//!
//!     3 │        ●
//!     2 │     ●●
//!     1 │  ●●
//!     0 ●●
//!       └──────────
//!        0 1 2 3 4 5 6 7
//! ```
//!
//! Both endpoints are included. Cells outside the grid are skipped.

use crate::core::GridCoord;
use crate::grid::GridMap;

/// Cells on the discrete line from `start` to `end`, inclusive.
#[derive(Clone, Debug)]
pub struct LineIter {
    x: i32,
    y: i32,
    dx: i32,
    dy: i32,
    x_inc: i32,
    y_inc: i32,
    error: i32,
    steep: bool,
    end_x: i32,
    end_y: i32,
    done: bool,
    width: i32,
    height: i32,
}

impl LineIter {
    pub fn new(map: &GridMap, start: GridCoord, end: GridCoord) -> Self {
        let dx = (end.x - start.x).abs();
        let dy = (end.y - start.y).abs();
        let steep = dy > dx;

        let (x, y, end_x, end_y, dx, dy) = if steep {
            (start.y, start.x, end.y, end.x, dy, dx)
        } else {
            (start.x, start.y, end.x, end.y, dx, dy)
        };

        Self {
            x,
            y,
            dx,
            dy,
            x_inc: if end_x > x { 1 } else { -1 },
            y_inc: if end_y > y { 1 } else { -1 },
            error: dx / 2,
            steep,
            end_x,
            end_y,
            done: false,
            width: map.width() as i32,
            height: map.height() as i32,
        }
    }

    fn step(&mut self) -> Option<GridCoord> {
        if self.done {
            return None;
        }

        let cell = if self.steep {
            GridCoord::new(self.y, self.x)
        } else {
            GridCoord::new(self.x, self.y)
        };

        if self.x == self.end_x && self.y == self.end_y {
            self.done = true;
            return Some(cell);
        }

        self.error -= self.dy;
        if self.error < 0 {
            self.y += self.y_inc;
            self.error += self.dx;
        }
        self.x += self.x_inc;

        Some(cell)
    }
}

impl Iterator for LineIter {
    type Item = GridCoord;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(cell) = self.step() {
            if cell.x >= 0 && cell.y >= 0 && cell.x < self.width && cell.y < self.height {
                return Some(cell);
            }
        }
        None
    }
}
