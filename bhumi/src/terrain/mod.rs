//! Terrain colouring from a segmented camera image.
//!
//! Calibration, camera pose and image travel together in a [`CameraFrame`]
//! handed to [`assign_terrain_cost`]; nothing here keeps state between
//! frames.

mod camera;
mod classify;

pub use camera::{CameraFrame, ColorImage, PinholeCamera, RigidTransform};
pub use classify::{TerrainClass, assign_terrain_cost, pack_rgb, unpack_rgb};
