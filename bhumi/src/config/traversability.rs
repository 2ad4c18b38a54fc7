//! Main TraversabilityConfig and conversion methods.

use std::path::Path;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::admissibility::AdmissibilityConfig;
use crate::core::WorldPoint;

use super::defaults;
use super::error::ConfigLoadError;

/// Full traversability configuration loaded from YAML
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TraversabilityConfig {
    /// Frame every incoming map must be expressed in
    #[serde(default = "defaults::map_frame_id")]
    pub map_frame_id: String,

    /// Frame of the footprint points
    #[serde(default = "defaults::robot_frame_id")]
    pub robot_frame_id: String,

    /// Footprint and scoring policy
    #[serde(default)]
    pub footprint: FootprintSection,

    /// Widest gap the robot can bridge (meters)
    #[serde(default = "defaults::max_gap_width")]
    pub max_gap_width: f32,

    /// Highest step the robot can climb or descend (meters)
    #[serde(default = "defaults::critical_step_height")]
    pub critical_step_height: f32,

    /// Expect variance/time elevation layers instead of bounds
    #[serde(default)]
    pub use_raw_map: bool,

    /// Size of the derived terrain map around the robot (meters)
    #[serde(default = "defaults::terrain_submap_length")]
    pub terrain_submap_length: [f32; 2],

    /// Empirical search constants
    #[serde(default)]
    pub tunables: Tunables,
}

impl Default for TraversabilityConfig {
    fn default() -> Self {
        Self {
            map_frame_id: defaults::map_frame_id(),
            robot_frame_id: defaults::robot_frame_id(),
            footprint: FootprintSection::default(),
            max_gap_width: defaults::max_gap_width(),
            critical_step_height: defaults::critical_step_height(),
            use_raw_map: false,
            terrain_submap_length: defaults::terrain_submap_length(),
            tunables: Tunables::default(),
        }
    }
}

/// Footprint configuration section
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FootprintSection {
    /// Robot outline in the robot frame; fewer than 3 points is discarded
    #[serde(default)]
    pub polygon: Vec<WorldPoint>,

    /// Score used where the map cannot tell, in [0, 1]
    #[serde(default = "defaults::traversability_default")]
    pub traversability_default: f32,

    /// Run the roughness stage of the admissibility check
    #[serde(default)]
    pub verify_roughness_footprint: bool,

    /// Veto path segments that cross a zero `robot_slope`
    #[serde(default)]
    pub check_robot_inclination: bool,
}

impl Default for FootprintSection {
    fn default() -> Self {
        Self {
            polygon: Vec::new(),
            traversability_default: defaults::traversability_default(),
            verify_roughness_footprint: false,
            check_robot_inclination: false,
        }
    }
}

/// Empirical constants of the neighbourhood searches and path sampling.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tunables {
    /// Slope/roughness search radius, in cells
    #[serde(default = "defaults::window_factor")]
    pub window_factor: f32,

    #[serde(default = "defaults::slope_count_factor")]
    pub slope_count_factor: f32,

    #[serde(default = "defaults::roughness_count_factor")]
    pub roughness_count_factor: f32,

    /// Critical length is `max_gap_width / critical_length_divisor`
    #[serde(default = "defaults::critical_length_divisor")]
    pub critical_length_divisor: f32,

    /// Step search radius and step window edge, in cells
    #[serde(default = "defaults::step_window_factor")]
    pub step_window_factor: f32,

    /// Shortest direction vector considered by the step search (meters)
    #[serde(default = "defaults::min_direction_norm")]
    pub min_direction_norm: f32,

    /// Cells skipped after each sample on a circular path segment
    #[serde(default = "defaults::path_skip_stride")]
    pub path_skip_stride: usize,

    /// Margin added to the path radius for the disc query (meters)
    #[serde(default = "defaults::circle_radius_offset")]
    pub circle_radius_offset: f32,

    /// Vertex count of circle polygons
    #[serde(default = "defaults::circle_polygon_vertices")]
    pub circle_polygon_vertices: usize,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            window_factor: defaults::window_factor(),
            slope_count_factor: defaults::slope_count_factor(),
            roughness_count_factor: defaults::roughness_count_factor(),
            critical_length_divisor: defaults::critical_length_divisor(),
            step_window_factor: defaults::step_window_factor(),
            min_direction_norm: defaults::min_direction_norm(),
            path_skip_stride: defaults::path_skip_stride(),
            circle_radius_offset: defaults::circle_radius_offset(),
            circle_polygon_vertices: defaults::circle_polygon_vertices(),
        }
    }
}

/// Clamp a default traversability to [0, 1], warning when it had to move.
pub fn clamp_traversability(value: f32) -> f32 {
    if value.is_nan() {
        warn!("Default traversability is NaN, using 0.0");
        return 0.0;
    }
    if value > 1.0 {
        warn!("Default traversability {value} is larger than 1.0, clamped to 1.0");
        1.0
    } else if value < 0.0 {
        warn!("Default traversability {value} is smaller than 0.0, clamped to 0.0");
        0.0
    } else {
        value
    }
}

impl TraversabilityConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self, ConfigLoadError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigLoadError::Io(e.to_string()))?;
        Self::from_yaml(&contents)
    }

    /// Load from default config path (configs/traversability.yaml)
    pub fn load_default() -> Result<Self, ConfigLoadError> {
        let path = Path::new("configs/traversability.yaml");
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigLoadError::Parse(e.to_string()))
    }

    /// Serialize to a YAML string
    pub fn to_yaml(&self) -> Result<String, ConfigLoadError> {
        serde_yaml::to_string(self).map_err(|e| ConfigLoadError::Parse(e.to_string()))
    }

    /// Repair values that would leave the map misconfigured.
    ///
    /// A footprint with fewer than 3 points is dropped (circular paths still
    /// work) and the default traversability is clamped to [0, 1].
    pub fn validated(mut self) -> Self {
        let n_points = self.footprint.polygon.len();
        if n_points > 0 && n_points < 3 {
            warn!(
                "Footprint polygon needs at least 3 points, got {n_points}; using an empty footprint"
            );
            self.footprint.polygon.clear();
        }
        self.footprint.traversability_default =
            clamp_traversability(self.footprint.traversability_default);
        self
    }

    /// Convert to the admissibility evaluator's parameters
    pub fn to_admissibility_config(&self) -> AdmissibilityConfig {
        AdmissibilityConfig {
            critical_step_height: self.critical_step_height,
            max_gap_width: self.max_gap_width,
            check_roughness: self.footprint.verify_roughness_footprint,
            window_factor: self.tunables.window_factor,
            slope_count_factor: self.tunables.slope_count_factor,
            roughness_count_factor: self.tunables.roughness_count_factor,
            critical_length_divisor: self.tunables.critical_length_divisor,
            step_window_factor: self.tunables.step_window_factor,
            min_direction_norm: self.tunables.min_direction_norm,
        }
    }

    /// Terrain submap size as a vector
    pub fn terrain_length(&self) -> WorldPoint {
        WorldPoint::new(self.terrain_submap_length[0], self.terrain_submap_length[1])
    }
}
