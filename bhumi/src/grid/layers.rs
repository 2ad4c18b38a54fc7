//! Well-known layer names.
//!
//! Base layers are produced by the filter chain; `*_footprint` layers are
//! memo caches owned by the traversability map and reset once per update
//! cycle.

/// Terrain height.
pub const ELEVATION: &str = "elevation";
/// Upper confidence bound of the elevation.
pub const UPPER_BOUND: &str = "upper_bound";
/// Lower confidence bound of the elevation.
pub const LOWER_BOUND: &str = "lower_bound";
/// Elevation variance (raw maps).
pub const VARIANCE: &str = "variance";
/// Horizontal variance along x (raw maps).
pub const HORIZONTAL_VARIANCE_X: &str = "horizontal_variance_x";
/// Horizontal variance along y (raw maps).
pub const HORIZONTAL_VARIANCE_Y: &str = "horizontal_variance_y";
/// Horizontal covariance xy (raw maps).
pub const HORIZONTAL_VARIANCE_XY: &str = "horizontal_variance_xy";
/// Measurement time (raw maps).
pub const TIME: &str = "time";
/// Published on the elevation copy when both bounds exist.
pub const UNCERTAINTY_RANGE: &str = "uncertainty_range";

/// Combined per-cell traversability score in [0, 1].
pub const TRAVERSABILITY: &str = "traversability";
/// Slope score; 0 marks a cell that is too steep.
pub const SLOPE: &str = "slope";
/// Step score; 0 marks a cell next to a step.
pub const STEP: &str = "step";
/// Roughness score; 0 marks a cell that is too rough.
pub const ROUGHNESS: &str = "roughness";
/// Slope relevant to robot inclination; 0 vetoes a pose.
pub const ROBOT_SLOPE: &str = "robot_slope";

pub const SLOPE_FOOTPRINT: &str = "slope_footprint";
pub const STEP_FOOTPRINT: &str = "step_footprint";
pub const ROUGHNESS_FOOTPRINT: &str = "roughness_footprint";
pub const TRAVERSABILITY_FOOTPRINT: &str = "traversability_footprint";

/// Footprint score at identity orientation.
pub const TRAVERSABILITY_X: &str = "traversability_x";
/// Footprint score at the probe yaw.
pub const TRAVERSABILITY_ROT: &str = "traversability_rot";

/// Terrain class score from camera colouring.
pub const TERRAIN_TRAVERSABILITY: &str = "terrain_traversability";
/// Packed RGB colour (bits stored in the float).
pub const COLOR: &str = "color";

/// Layers every traversability map must carry.
pub const TRAVERSABILITY_LAYERS: [&str; 4] = [TRAVERSABILITY, SLOPE, STEP, ROUGHNESS];

/// Memo caches cleared at the start of every update cycle.
pub const FOOTPRINT_CACHE_LAYERS: [&str; 4] = [
    STEP_FOOTPRINT,
    SLOPE_FOOTPRINT,
    ROUGHNESS_FOOTPRINT,
    TRAVERSABILITY_FOOTPRINT,
];

const BOUNDED_ELEVATION_LAYERS: [&str; 3] = [ELEVATION, UPPER_BOUND, LOWER_BOUND];

const RAW_ELEVATION_LAYERS: [&str; 6] = [
    ELEVATION,
    VARIANCE,
    HORIZONTAL_VARIANCE_X,
    HORIZONTAL_VARIANCE_Y,
    HORIZONTAL_VARIANCE_XY,
    TIME,
];

/// Layers an incoming elevation map must carry.
pub fn elevation_layers(use_raw_map: bool) -> &'static [&'static str] {
    if use_raw_map {
        &RAW_ELEVATION_LAYERS
    } else {
        &BOUNDED_ELEVATION_LAYERS
    }
}
