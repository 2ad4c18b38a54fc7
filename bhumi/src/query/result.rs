//! Query and path check results.

use serde::{Deserialize, Serialize};

use crate::geometry::Polygon;

/// Outcome of a single disc or polygon query.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryOutcome {
    pub traversable: bool,
    /// Mean traversability of the admissible cells (0 when not traversable)
    pub traversability: f32,
    /// Hull of inadmissible cells; empty unless requested and found
    pub untraversable_polygon: Polygon,
}

/// Aggregate safety verdict for a footprint path.
///
/// The default value is the "unsafe" result every failed check returns.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TraversabilityResult {
    pub is_safe: bool,
    /// Length- or area-weighted mean traversability
    pub traversability: f32,
    /// Swept area (polygonal footprints only)
    pub area: f32,
    /// Footprint or swept polygon of every evaluated step, for visualization
    pub footprint_polygons: Vec<Polygon>,
    /// Hull of the inadmissible cells found, when requested
    pub untraversable_polygon: Polygon,
}
