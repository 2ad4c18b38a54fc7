//! Test utilities for Bhumi integration tests.
//!
//! Synthetic terrains carry the elevation layers and precomputed base
//! layers, so the pass-through filter chain can forward them directly.

#![allow(dead_code)]

use std::sync::Arc;

use bhumi::grid::layers::{
    ELEVATION, LOWER_BOUND, ROBOT_SLOPE, ROUGHNESS, SLOPE, STEP, TRAVERSABILITY, UPPER_BOUND,
};
use bhumi::{
    FilterChain, GridCoord, GridMap, MapPublisher, Polygon, Pose2D, TraversabilityConfig,
    TraversabilityError, TraversabilityMap, WorldPoint,
};
use parking_lot::Mutex;

pub const RESOLUTION: f32 = 0.1;
pub const MAP_FRAME: &str = "map";

/// Install a test logger once.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// 6 m x 4 m flat terrain at 0.1 m, origin (0, 0), every cell admissible.
pub fn flat_terrain(traversability: f32) -> GridMap {
    let mut map = GridMap::new(60, 40, RESOLUTION, WorldPoint::ZERO).with_frame(MAP_FRAME);
    map.add_layer_with(ELEVATION, 0.0);
    map.add_layer_with(UPPER_BOUND, 0.02);
    map.add_layer_with(LOWER_BOUND, -0.01);
    map.add_layer_with(TRAVERSABILITY, traversability);
    for layer in [SLOPE, STEP, ROUGHNESS, ROBOT_SLOPE] {
        map.add_layer_with(layer, 1.0);
    }
    map
}

/// Too-steep band across the full height, cells `x_min..=x_max`.
pub fn add_wall(map: &mut GridMap, x_min: i32, x_max: i32) {
    let height = map.height() as i32;
    for y in 0..height {
        for x in x_min..=x_max {
            map.set(SLOPE, GridCoord::new(x, y), 0.0);
            map.set(ELEVATION, GridCoord::new(x, y), 1.0);
        }
    }
}

/// Straight path along +x.
pub fn straight_path(start: WorldPoint, n: usize, spacing: f32) -> Vec<Pose2D> {
    (0..n)
        .map(|i| Pose2D::new(start.x + i as f32 * spacing, start.y, 0.0))
        .collect()
}

/// Rectangular footprint of `length` x `width` centred on the robot.
pub fn box_footprint(length: f32, width: f32) -> Vec<WorldPoint> {
    let (hx, hy) = (length / 2.0, width / 2.0);
    vec![
        WorldPoint::new(hx, hy),
        WorldPoint::new(-hx, hy),
        WorldPoint::new(-hx, -hy),
        WorldPoint::new(hx, -hy),
    ]
}

/// Map with the default configuration and a recording publisher.
pub fn recorded_map(config: TraversabilityConfig) -> (TraversabilityMap, Arc<RecordingPublisher>) {
    let publisher = Arc::new(RecordingPublisher::default());
    let map = TraversabilityMap::new(config).with_publisher(publisher.clone());
    (map, publisher)
}

/// Publisher that keeps everything it receives.
#[derive(Default)]
pub struct RecordingPublisher {
    pub traversability: Mutex<Vec<GridMap>>,
    pub terrain: Mutex<Vec<GridMap>>,
    pub footprints: Mutex<Vec<Polygon>>,
    pub untraversable: Mutex<Vec<Polygon>>,
}

impl MapPublisher for RecordingPublisher {
    fn publish_traversability(&self, map: &GridMap, _z_offset: f32) {
        self.traversability.lock().push(map.clone());
    }

    fn publish_terrain(&self, map: &GridMap, _z_offset: f32) {
        self.terrain.lock().push(map.clone());
    }

    fn publish_footprint_polygon(&self, polygon: &Polygon, _z_offset: f32) {
        self.footprints.lock().push(polygon.clone());
    }

    fn publish_untraversable_polygon(&self, polygon: &Polygon, _z_offset: f32) {
        self.untraversable.lock().push(polygon.clone());
    }
}

/// Filter chain that always fails.
pub struct FailingFilter;

impl FilterChain for FailingFilter {
    fn update(&self, _elevation: &GridMap, _previous: &GridMap) -> bhumi::Result<GridMap> {
        Err(TraversabilityError::FilterChain("sensor dropout".to_string()))
    }

    fn name(&self) -> &'static str {
        "FailingFilter"
    }
}
