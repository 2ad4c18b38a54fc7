//! Per-cell terrain classes from a colour-segmented image.

use log::debug;

use crate::grid::GridMap;
use crate::grid::layers::{COLOR, ELEVATION, TERRAIN_TRAVERSABILITY};

use super::camera::CameraFrame;

/// Terrain class of one segmentation colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TerrainClass {
    /// Floor grey (155, 155, 155)
    Floor,
    /// Pure blue in BGR order (255, 0, 0)
    Marked,
    Other,
}

const FLOOR_BGR: [u8; 3] = [155, 155, 155];
const MARKED_BGR: [u8; 3] = [255, 0, 0];

impl TerrainClass {
    pub fn from_bgr(bgr: [u8; 3]) -> Self {
        match bgr {
            FLOOR_BGR => TerrainClass::Floor,
            MARKED_BGR => TerrainClass::Marked,
            _ => TerrainClass::Other,
        }
    }

    /// Traversability score written to `terrain_traversability`.
    pub fn cost(self) -> f32 {
        match self {
            TerrainClass::Floor => 1.0,
            TerrainClass::Marked => 0.5,
            TerrainClass::Other => 0.35,
        }
    }

    /// Display colour (RGB) written to the `color` layer.
    pub fn display_rgb(self) -> [u8; 3] {
        match self {
            TerrainClass::Floor | TerrainClass::Marked => [155, 155, 155],
            TerrainClass::Other => [255, 0, 0],
        }
    }
}

/// Pack an RGB colour into the bits of an f32 (`0x00RRGGBB`).
#[inline]
pub fn pack_rgb([r, g, b]: [u8; 3]) -> f32 {
    f32::from_bits(u32::from(r) << 16 | u32::from(g) << 8 | u32::from(b))
}

#[inline]
pub fn unpack_rgb(value: f32) -> [u8; 3] {
    let bits = value.to_bits();
    [(bits >> 16) as u8, (bits >> 8) as u8, bits as u8]
}

/// Colour `map` from the segmentation image in `frame`.
///
/// Resets the `terrain_traversability` and `color` layers, then projects
/// every cell with a valid elevation into the image. Cells that land in
/// front of the camera and inside the image get their class cost and
/// display colour. Returns the number of classified cells.
pub fn assign_terrain_cost(map: &mut GridMap, frame: &CameraFrame) -> usize {
    map.add_layer(TERRAIN_TRAVERSABILITY);
    map.add_layer(COLOR);

    let mut classified = 0;
    for cell in map.cells() {
        let z = map.get(ELEVATION, cell);
        if !z.is_finite() {
            continue;
        }
        let position = map.position_of(cell);
        let in_camera = frame.world_to_camera.apply([position.x, position.y, z]);
        let Some((u, v)) = frame.camera.project(in_camera) else {
            continue;
        };
        let Some(bgr) = frame.image.pixel(u, v) else {
            continue;
        };

        let class = TerrainClass::from_bgr(bgr);
        map.set(TERRAIN_TRAVERSABILITY, cell, class.cost());
        map.set(COLOR, cell, pack_rgb(class.display_rgb()));
        classified += 1;
    }

    debug!(
        "Terrain colouring: {classified} of {} cells classified",
        map.cell_count()
    );
    classified
}
