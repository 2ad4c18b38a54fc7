//! Default value functions for serde deserialization.

pub fn map_frame_id() -> String {
    "map".to_string()
}

pub fn robot_frame_id() -> String {
    "base".to_string()
}

pub fn traversability_default() -> f32 {
    0.5
}

pub fn max_gap_width() -> f32 {
    0.3
}

pub fn critical_step_height() -> f32 {
    0.12
}

pub fn terrain_submap_length() -> [f32; 2] {
    [2.5, 1.5]
}

pub fn window_factor() -> f32 {
    3.0
}

pub fn slope_count_factor() -> f32 {
    2.0
}

pub fn roughness_count_factor() -> f32 {
    1.5
}

pub fn critical_length_divisor() -> f32 {
    3.0
}

pub fn step_window_factor() -> f32 {
    2.5
}

pub fn min_direction_norm() -> f32 {
    0.025
}

pub fn path_skip_stride() -> usize {
    3
}

pub fn circle_radius_offset() -> f32 {
    0.15
}

pub fn circle_polygon_vertices() -> usize {
    20
}
