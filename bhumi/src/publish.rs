//! Publish seam for maps and polygons.
//!
//! Transport and message encoding live outside this crate. Every method has
//! a no-op default so a sink only implements what it forwards.

use crate::geometry::Polygon;
use crate::grid::GridMap;

/// Sink for maps and visualization polygons.
///
/// `z_offset` is the vertical position supplied with the elevation map.
pub trait MapPublisher: Send + Sync {
    /// Called after every successful update cycle.
    fn publish_traversability(&self, _map: &GridMap, _z_offset: f32) {}

    /// Called after every terrain map update.
    fn publish_terrain(&self, _map: &GridMap, _z_offset: f32) {}

    /// Footprint or swept polygon of one evaluated path step.
    fn publish_footprint_polygon(&self, _polygon: &Polygon, _z_offset: f32) {}

    /// Hull of the inadmissible cells found by a path check. Never empty.
    fn publish_untraversable_polygon(&self, _polygon: &Polygon, _z_offset: f32) {}
}

/// Publisher that drops everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullPublisher;

impl MapPublisher for NullPublisher {}
