//! Cell lattice geometry (no layer data).

use crate::core::{GridCoord, WorldPoint};

/// Size, resolution and placement of a grid.
///
/// Cheap to copy; iterators keep one instead of borrowing the map so the
/// map stays writable while they run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lattice {
    width: usize,
    height: usize,
    resolution: f32,
    /// Pre-computed 1.0 / resolution
    inv_resolution: f32,
    origin: WorldPoint,
}

impl Lattice {
    pub fn new(width: usize, height: usize, resolution: f32, origin: WorldPoint) -> Self {
        Self {
            width,
            height,
            resolution,
            inv_resolution: 1.0 / resolution,
            origin,
        }
    }

    /// Grid width in cells.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in cells.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Cell edge length in meters.
    #[inline]
    pub fn resolution(&self) -> f32 {
        self.resolution
    }

    /// Lower-left corner of cell (0, 0).
    #[inline]
    pub fn origin(&self) -> WorldPoint {
        self.origin
    }

    /// Total number of cells.
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    /// Physical extent in meters.
    pub fn length(&self) -> WorldPoint {
        WorldPoint::new(
            self.width as f32 * self.resolution,
            self.height as f32 * self.resolution,
        )
    }

    /// World bounds: (min_point, max_point).
    pub fn bounds(&self) -> (WorldPoint, WorldPoint) {
        (self.origin, self.origin + self.length())
    }

    // === Coordinate Conversion ===

    /// Cell containing `point`, without bounds checking.
    #[inline]
    pub fn world_to_grid(&self, point: WorldPoint) -> GridCoord {
        let x = ((point.x - self.origin.x) * self.inv_resolution).floor() as i32;
        let y = ((point.y - self.origin.y) * self.inv_resolution).floor() as i32;
        GridCoord::new(x, y)
    }

    /// Cell containing `point`, or `None` outside the grid.
    #[inline]
    pub fn index_of(&self, point: WorldPoint) -> Option<GridCoord> {
        if !self.is_inside(point) {
            return None;
        }
        let cell = self.world_to_grid(point);
        self.is_valid_coord(cell).then_some(cell)
    }

    /// Centre of `cell` in world coordinates.
    #[inline]
    pub fn position_of(&self, cell: GridCoord) -> WorldPoint {
        WorldPoint::new(
            self.origin.x + (cell.x as f32 + 0.5) * self.resolution,
            self.origin.y + (cell.y as f32 + 0.5) * self.resolution,
        )
    }

    /// Whether `point` lies within the grid (max edges excluded).
    #[inline]
    pub fn is_inside(&self, point: WorldPoint) -> bool {
        let (min, max) = self.bounds();
        point.x >= min.x && point.x < max.x && point.y >= min.y && point.y < max.y
    }

    /// Whether `cell` is a valid index.
    #[inline]
    pub fn is_valid_coord(&self, cell: GridCoord) -> bool {
        cell.x >= 0
            && cell.y >= 0
            && (cell.x as usize) < self.width
            && (cell.y as usize) < self.height
    }

    /// Row-major linear index of `cell`.
    #[inline]
    pub fn coord_to_index(&self, cell: GridCoord) -> Option<usize> {
        self.is_valid_coord(cell)
            .then(|| cell.y as usize * self.width + cell.x as usize)
    }

    /// Cell range covering the world box `lo..=hi`, clipped to the grid.
    ///
    /// The range is inverted (min > max) when the box misses the grid.
    pub fn clipped_box(&self, lo: WorldPoint, hi: WorldPoint) -> (GridCoord, GridCoord) {
        let lo = self.world_to_grid(lo);
        let hi = self.world_to_grid(hi);
        (
            GridCoord::new(lo.x.max(0), lo.y.max(0)),
            GridCoord::new(
                hi.x.min(self.width as i32 - 1),
                hi.y.min(self.height as i32 - 1),
            ),
        )
    }
}
