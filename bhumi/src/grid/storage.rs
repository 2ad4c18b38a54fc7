//! Layered grid storage.

use crate::core::{GridCoord, WorldPoint};

use super::iterators::FullIter;
use super::lattice::Lattice;

/// One named float field, co-extensive with the grid.
#[derive(Clone, Debug, PartialEq)]
struct Layer {
    name: String,
    data: Vec<f32>,
}

/// Inclusive rectangle of cell indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellWindow {
    /// Lowest (x, y) corner
    pub min: GridCoord,
    /// Highest (x, y) corner, inclusive
    pub max: GridCoord,
}

impl CellWindow {
    /// Number of columns.
    #[inline]
    pub fn width(&self) -> usize {
        (self.max.x - self.min.x + 1).max(0) as usize
    }

    /// Number of rows.
    #[inline]
    pub fn height(&self) -> usize {
        (self.max.y - self.min.y + 1).max(0) as usize
    }

    /// Cells of the window in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = GridCoord> + use<> {
        let (min, max) = (self.min, self.max);
        (min.y..=max.y).flat_map(move |y| (min.x..=max.x).map(move |x| GridCoord::new(x, y)))
    }
}

/// Layered 2D grid over a planar region.
///
/// The grid uses a coordinate system where:
/// - cell (0, 0) has its lower-left corner at `origin`
/// - cell (x, y) covers `origin + [x, x+1) * resolution` by `origin + [y, y+1) * resolution`
/// - every layer stores one `f32` per cell in row-major order
///
/// `NaN` marks an invalid (unknown) value. Adding a layer, or adding it
/// again, fills it with `NaN`.
#[derive(Clone, Debug, PartialEq)]
pub struct GridMap {
    // === Layer Data ===
    layers: Vec<Layer>,

    // === Grid Metadata ===
    lattice: Lattice,
    frame_id: String,
    timestamp_ns: u64,
}

impl Default for GridMap {
    fn default() -> Self {
        Self::new(0, 0, 1.0, WorldPoint::ZERO)
    }
}

impl GridMap {
    // === Constructors ===

    /// Create a grid without layers.
    pub fn new(width: usize, height: usize, resolution: f32, origin: WorldPoint) -> Self {
        Self {
            layers: Vec::new(),
            lattice: Lattice::new(width, height, resolution, origin),
            frame_id: String::new(),
            timestamp_ns: 0,
        }
    }

    /// Create a grid of the given physical size centred on `center`.
    pub fn from_length(length: WorldPoint, resolution: f32, center: WorldPoint) -> Self {
        let width = (length.x / resolution).round().max(0.0) as usize;
        let height = (length.y / resolution).round().max(0.0) as usize;
        let half = WorldPoint::new(
            width as f32 * resolution / 2.0,
            height as f32 * resolution / 2.0,
        );
        Self::new(width, height, resolution, center - half)
    }

    /// Builder-style frame assignment.
    pub fn with_frame(mut self, frame_id: impl Into<String>) -> Self {
        self.frame_id = frame_id.into();
        self
    }

    // === Basic Properties ===

    /// Geometry of the cell lattice.
    #[inline]
    pub fn lattice(&self) -> Lattice {
        self.lattice
    }

    /// Grid width in cells.
    #[inline]
    pub fn width(&self) -> usize {
        self.lattice.width()
    }

    /// Grid height in cells.
    #[inline]
    pub fn height(&self) -> usize {
        self.lattice.height()
    }

    /// Cell edge length in meters.
    #[inline]
    pub fn resolution(&self) -> f32 {
        self.lattice.resolution()
    }

    /// Lower-left corner of cell (0, 0).
    #[inline]
    pub fn origin(&self) -> WorldPoint {
        self.lattice.origin()
    }

    /// Total number of cells.
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.lattice.cell_count()
    }

    /// True when the grid has no cells.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cell_count() == 0
    }

    /// Physical extent in meters.
    pub fn length(&self) -> WorldPoint {
        self.lattice.length()
    }

    /// Centre of the covered region.
    pub fn center(&self) -> WorldPoint {
        self.origin() + self.length() * 0.5
    }

    /// World bounds: (min_point, max_point).
    pub fn bounds(&self) -> (WorldPoint, WorldPoint) {
        self.lattice.bounds()
    }

    pub fn frame_id(&self) -> &str {
        &self.frame_id
    }

    pub fn set_frame_id(&mut self, frame_id: impl Into<String>) {
        self.frame_id = frame_id.into();
    }

    pub fn timestamp_ns(&self) -> u64 {
        self.timestamp_ns
    }

    pub fn set_timestamp_ns(&mut self, timestamp_ns: u64) {
        self.timestamp_ns = timestamp_ns;
    }

    // === Layers ===

    /// Names of all layers, in insertion order.
    pub fn layer_names(&self) -> impl Iterator<Item = &str> {
        self.layers.iter().map(|layer| layer.name.as_str())
    }

    #[inline]
    pub fn has_layer(&self, name: &str) -> bool {
        self.slot(name).is_some()
    }

    /// First name in `names` that is not a layer of this grid.
    pub fn missing_layer<'a>(&self, names: &[&'a str]) -> Option<&'a str> {
        names.iter().copied().find(|name| !self.has_layer(name))
    }

    /// Add a layer filled with `NaN`, resetting it if it already exists.
    pub fn add_layer(&mut self, name: &str) {
        self.add_layer_with(name, f32::NAN);
    }

    /// Add a layer filled with `value`, resetting it if it already exists.
    pub fn add_layer_with(&mut self, name: &str, value: f32) {
        let size = self.cell_count();
        match self.slot(name) {
            Some(slot) => self.layers[slot].data.fill(value),
            None => self.layers.push(Layer {
                name: name.to_string(),
                data: vec![value; size],
            }),
        }
    }

    /// Add a layer only if it is missing.
    pub fn ensure_layer(&mut self, name: &str) {
        if !self.has_layer(name) {
            self.add_layer(name);
        }
    }

    /// Invalidate every value of a layer, keeping the layer itself.
    ///
    /// Returns false if the layer does not exist.
    pub fn clear_layer(&mut self, name: &str) -> bool {
        match self.slot(name) {
            Some(slot) => {
                self.layers[slot].data.fill(f32::NAN);
                true
            }
            None => false,
        }
    }

    /// Raw row-major values of a layer.
    pub fn layer(&self, name: &str) -> Option<&[f32]> {
        self.slot(name).map(|slot| self.layers[slot].data.as_slice())
    }

    /// Mutable raw row-major values of a layer.
    pub fn layer_mut(&mut self, name: &str) -> Option<&mut [f32]> {
        self.slot(name)
            .map(move |slot| self.layers[slot].data.as_mut_slice())
    }

    #[inline]
    fn slot(&self, name: &str) -> Option<usize> {
        self.layers.iter().position(|layer| layer.name == name)
    }

    // === Cell Access ===

    /// Value of `layer` at `cell`, `NaN` if invalid, missing or out of bounds.
    #[inline]
    pub fn get(&self, layer: &str, cell: GridCoord) -> f32 {
        match (self.slot(layer), self.coord_to_index(cell)) {
            (Some(slot), Some(idx)) => self.layers[slot].data[idx],
            _ => f32::NAN,
        }
    }

    /// Set `layer` at `cell`. Returns false if the layer or cell does not exist.
    #[inline]
    pub fn set(&mut self, layer: &str, cell: GridCoord, value: f32) -> bool {
        match (self.slot(layer), self.coord_to_index(cell)) {
            (Some(slot), Some(idx)) => {
                self.layers[slot].data[idx] = value;
                true
            }
            _ => false,
        }
    }

    /// True when `layer` holds a finite value at `cell`.
    #[inline]
    pub fn is_valid(&self, layer: &str, cell: GridCoord) -> bool {
        self.get(layer, cell).is_finite()
    }

    /// Value of `layer` in the cell containing `point`.
    pub fn get_at(&self, layer: &str, point: WorldPoint) -> f32 {
        self.index_of(point)
            .map_or(f32::NAN, |cell| self.get(layer, cell))
    }

    // === Coordinate Conversion ===

    /// Cell containing `point`, without bounds checking.
    #[inline]
    pub fn world_to_grid(&self, point: WorldPoint) -> GridCoord {
        self.lattice.world_to_grid(point)
    }

    /// Cell containing `point`, or `None` outside the grid.
    #[inline]
    pub fn index_of(&self, point: WorldPoint) -> Option<GridCoord> {
        self.lattice.index_of(point)
    }

    /// Centre of `cell` in world coordinates.
    #[inline]
    pub fn position_of(&self, cell: GridCoord) -> WorldPoint {
        self.lattice.position_of(cell)
    }

    /// Whether `point` lies within the grid (max edges excluded).
    #[inline]
    pub fn is_inside(&self, point: WorldPoint) -> bool {
        self.lattice.is_inside(point)
    }

    /// Whether `cell` is a valid index.
    #[inline]
    pub fn is_valid_coord(&self, cell: GridCoord) -> bool {
        self.lattice.is_valid_coord(cell)
    }

    /// Row-major linear index of `cell`.
    #[inline]
    pub fn coord_to_index(&self, cell: GridCoord) -> Option<usize> {
        self.lattice.coord_to_index(cell)
    }

    /// Every cell in row-major order.
    pub fn cells(&self) -> FullIter {
        FullIter::new(self)
    }

    // === Sub-regions ===

    /// Cells covered by a `length` sized window centred on `center`.
    ///
    /// `None` when either window corner falls outside the grid.
    pub fn window(&self, center: WorldPoint, length: WorldPoint) -> Option<CellWindow> {
        let half = length * 0.5;
        let min = self.index_of(center - half)?;
        let max = self.index_of(center + half)?;
        Some(CellWindow { min, max })
    }

    /// Copy of the `length` sized window centred on `center`, with all layers.
    ///
    /// `None` when the window does not fit inside the grid.
    pub fn subregion(&self, center: WorldPoint, length: WorldPoint) -> Option<GridMap> {
        let window = self.window(center, length)?;
        let resolution = self.resolution();
        let origin = self.position_of(window.min) - WorldPoint::new(0.5, 0.5) * resolution;
        let mut sub = GridMap::new(window.width(), window.height(), resolution, origin);
        sub.frame_id.clone_from(&self.frame_id);
        sub.timestamp_ns = self.timestamp_ns;

        for layer in &self.layers {
            let mut data = Vec::with_capacity(sub.cell_count());
            for cell in window.cells() {
                if let Some(idx) = self.coord_to_index(cell) {
                    data.push(layer.data[idx]);
                }
            }
            sub.layers.push(Layer {
                name: layer.name.clone(),
                data,
            });
        }
        Some(sub)
    }
}
