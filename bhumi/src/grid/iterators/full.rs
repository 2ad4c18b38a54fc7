//! Row-major scan over every cell.

use crate::core::GridCoord;
use crate::grid::GridMap;

/// Every cell of a grid, row by row.
#[derive(Clone, Debug)]
pub struct FullIter {
    width: usize,
    remaining: usize,
    next: usize,
}

impl FullIter {
    pub fn new(map: &GridMap) -> Self {
        Self {
            width: map.width(),
            remaining: map.cell_count(),
            next: 0,
        }
    }
}

impl Iterator for FullIter {
    type Item = GridCoord;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let idx = self.next;
        self.next += 1;
        self.remaining -= 1;
        Some(GridCoord::new(
            (idx % self.width) as i32,
            (idx / self.width) as i32,
        ))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for FullIter {}
