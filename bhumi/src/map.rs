//! Traversability map: shared state and the update cycle.
//!
//! ```text
//!  set_elevation_map ──► [elevation] ──┐
//!                                      ▼
//!                        compute_traversability
//!                        (filter chain, cache reset)
//!                                      │
//!  set_traversability_map ──► [traversability] ──► terrain window ──► [terrain]
//!                                      │                                  │
//!                         check_footprint_path              classify_terrain
//!                         is_traversable_*
//! ```
//!
//! Every grid sits in its own [`MapStore`]. Queries work on a checked-out
//! copy and commit it back; the memo caches and derived layers they fill are
//! merged into the stored map unless a newer map was published meanwhile.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use log::{debug, error, info, warn};
use parking_lot::RwLock;

use crate::admissibility::AdmissibilityEvaluator;
use crate::config::{TraversabilityConfig, clamp_traversability};
use crate::core::{Pose2D, WorldPoint};
use crate::error::{Result, TraversabilityError};
use crate::filter::{FilterChain, PassThroughFilter};
use crate::geometry::Polygon;
use crate::grid::GridMap;
use crate::grid::layers::{
    COLOR, LOWER_BOUND, TERRAIN_TRAVERSABILITY, TRAVERSABILITY, TRAVERSABILITY_LAYERS,
    TRAVERSABILITY_ROT, TRAVERSABILITY_X, UNCERTAINTY_RANGE, UPPER_BOUND, elevation_layers,
};
use crate::publish::{MapPublisher, NullPublisher};
use crate::query::{FootprintPath, QueryEngine, QueryOutcome, QuerySettings, TraversabilityResult};
use crate::store::{AtomicF32, Checkout, MapStore};
use crate::terrain::{CameraFrame, assign_terrain_cost};

/// Shared traversability state for concurrent updaters and query callers.
///
/// All methods take `&self`; wrap the map in an `Arc` to share it between
/// threads.
pub struct TraversabilityMap {
    config: TraversabilityConfig,
    evaluator: AdmissibilityEvaluator,

    // === Grids ===
    elevation: MapStore,
    traversability: MapStore,
    terrain: MapStore,

    // === Flags and scalars ===
    elevation_initialized: AtomicBool,
    traversability_initialized: AtomicBool,
    default_traversability: AtomicF32,
    elevation_offset: AtomicF32,
    robot_position: RwLock<WorldPoint>,

    // === Collaborators ===
    filter: Box<dyn FilterChain>,
    publisher: Arc<dyn MapPublisher>,
}

impl TraversabilityMap {
    /// Create a map with a pass-through filter chain and no publisher.
    ///
    /// The configuration is validated first: a footprint with fewer than
    /// 3 points is dropped and the default traversability clamped.
    pub fn new(config: TraversabilityConfig) -> Self {
        let config = config.validated();
        let evaluator = AdmissibilityEvaluator::new(config.to_admissibility_config());
        let default_traversability = config.footprint.traversability_default;
        if config.footprint.polygon.is_empty() {
            info!("No footprint polygon defined, only circular footprints available");
        }

        Self {
            config,
            evaluator,
            elevation: MapStore::new("elevation"),
            traversability: MapStore::new("traversability"),
            terrain: MapStore::new("terrain"),
            elevation_initialized: AtomicBool::new(false),
            traversability_initialized: AtomicBool::new(false),
            default_traversability: AtomicF32::new(default_traversability),
            elevation_offset: AtomicF32::new(0.0),
            robot_position: RwLock::new(WorldPoint::ZERO),
            filter: Box::new(PassThroughFilter),
            publisher: Arc::new(NullPublisher),
        }
    }

    /// Load the configuration from a YAML file and create the map.
    pub fn from_config_file(path: &Path) -> Result<Self> {
        Ok(Self::new(TraversabilityConfig::load(path)?))
    }

    /// Replace the filter chain.
    pub fn with_filter(mut self, filter: Box<dyn FilterChain>) -> Self {
        self.filter = filter;
        self
    }

    /// Replace the publisher.
    pub fn with_publisher(mut self, publisher: Arc<dyn MapPublisher>) -> Self {
        self.publisher = publisher;
        self
    }

    // =========================================================================
    // Map input
    // =========================================================================

    /// Accept a new elevation map.
    ///
    /// Rejected (keeping the previous map) when the frame differs from the
    /// configured map frame or a required elevation layer is missing.
    pub fn set_elevation_map(&self, map: GridMap, z_offset: f32) -> Result<()> {
        self.check_frame(&map, "elevation")?;
        if let Some(layer) = map.missing_layer(elevation_layers(self.config.use_raw_map)) {
            warn!("Can't set elevation map because there is no layer '{layer}'");
            return Err(TraversabilityError::MissingLayer(layer.to_string()));
        }

        self.elevation.publish(map);
        self.elevation_offset.store(z_offset, Ordering::Release);
        self.elevation_initialized.store(true, Ordering::Release);
        Ok(())
    }

    /// Accept a precomputed traversability map, bypassing the filter chain.
    pub fn set_traversability_map(&self, mut map: GridMap, z_offset: f32) -> Result<()> {
        self.check_frame(&map, "traversability")?;
        if let Some(layer) = map.missing_layer(&TRAVERSABILITY_LAYERS) {
            warn!("Can't set traversability map because there is no layer '{layer}'");
            return Err(TraversabilityError::MissingLayer(layer.to_string()));
        }

        AdmissibilityEvaluator::reset_caches(&mut map);
        self.traversability.publish(map);
        self.elevation_offset.store(z_offset, Ordering::Release);
        self.traversability_initialized.store(true, Ordering::Release);
        Ok(())
    }

    fn check_frame(&self, map: &GridMap, kind: &str) -> Result<()> {
        if map.frame_id() == self.config.map_frame_id {
            return Ok(());
        }
        error!(
            "Received {kind} map has frame_id '{}', but '{}' is expected",
            map.frame_id(),
            self.config.map_frame_id
        );
        Err(TraversabilityError::FrameMismatch {
            expected: self.config.map_frame_id.clone(),
            actual: map.frame_id().to_string(),
        })
    }

    // =========================================================================
    // Update cycle
    // =========================================================================

    /// Run one update cycle.
    ///
    /// Filter chain, footprint cache reset, terrain window around the robot,
    /// then publish. A failure leaves the traversability map uninitialized.
    pub fn compute_traversability(&self) -> Result<()> {
        let start = Instant::now();

        if !self.elevation_initialized.load(Ordering::Acquire) {
            error!("Elevation map is not initialized, no traversability computed");
            self.traversability_initialized
                .store(false, Ordering::Release);
            return Err(TraversabilityError::ElevationMapUninitialized);
        }

        let elevation = self.elevation.snapshot();
        let previous = self.traversability.snapshot();
        let mut traversability = match self.filter.update(&elevation, &previous) {
            Ok(map) => map,
            Err(e) => {
                error!(
                    "Could not update the filter chain '{}', no traversability computed: {e}",
                    self.filter.name()
                );
                self.traversability_initialized
                    .store(false, Ordering::Release);
                return Err(e);
            }
        };
        if let Some(layer) = traversability.missing_layer(&TRAVERSABILITY_LAYERS) {
            error!(
                "Filter chain '{}' produced no '{layer}' layer",
                self.filter.name()
            );
            self.traversability_initialized
                .store(false, Ordering::Release);
            return Err(TraversabilityError::FilterChain(format!(
                "{}: output has no '{layer}' layer",
                self.filter.name()
            )));
        }

        AdmissibilityEvaluator::reset_caches(&mut traversability);
        let terrain = self.terrain_window(&traversability);

        let published = with_uncertainty_range(&traversability);
        self.traversability.publish(traversability);
        self.traversability_initialized
            .store(true, Ordering::Release);

        let z_offset = self.elevation_offset();
        self.publisher.publish_traversability(&published, z_offset);
        if let Some(terrain) = terrain {
            self.publisher
                .publish_terrain(&with_uncertainty_range(&terrain), z_offset);
            self.terrain.publish(terrain);
        }

        debug!(
            "Traversability map has been updated in {:.3} s",
            start.elapsed().as_secs_f64()
        );
        Ok(())
    }

    /// Window of `terrain_submap_length` around the robot, if it fits.
    fn terrain_window(&self, traversability: &GridMap) -> Option<GridMap> {
        let center = *self.robot_position.read();
        let length = self.config.terrain_length();
        let window = traversability.subregion(center, length);
        match &window {
            Some(map) => debug!(
                "Terrain map created with size {:.2} x {:.2} m ({} x {} cells)",
                map.length().x,
                map.length().y,
                map.width(),
                map.height()
            ),
            None => debug!(
                "Terrain window {:.2} x {:.2} m at ({:.2}, {:.2}) does not fit, keeping previous",
                length.x, length.y, center.x, center.y
            ),
        }
        window
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Check a footprint path against the current traversability map.
    ///
    /// An uninitialized map yields an unsafe result; a path without poses is
    /// an error. Evaluated footprints and the untraversable hull are handed
    /// to the publisher.
    pub fn check_footprint_path(&self, path: &FootprintPath) -> Result<TraversabilityResult> {
        if !self.is_initialized() {
            warn!("Check footprint path: traversability map not yet initialized");
            return Ok(TraversabilityResult::default());
        }
        if path.poses.is_empty() {
            warn!("This path has no poses to check");
            return Err(TraversabilityError::EmptyPath);
        }

        let mut snapshot = self.traversability.checkout();
        let result = QueryEngine::new(&mut snapshot, &self.evaluator, self.query_settings())
            .check_path(path)?;
        self.traversability.commit(snapshot);

        let z_offset = self.elevation_offset();
        for polygon in &result.footprint_polygons {
            self.publisher.publish_footprint_polygon(polygon, z_offset);
        }
        if path.compute_untraversable_polygon && !result.untraversable_polygon.is_empty() {
            self.publisher
                .publish_untraversable_polygon(&result.untraversable_polygon, z_offset);
        }
        Ok(result)
    }

    /// Disc query on the current traversability map.
    ///
    /// Not traversable while the map is uninitialized.
    pub fn is_traversable_disc(
        &self,
        center: WorldPoint,
        radius_max: f32,
        radius_min: f32,
        collect_untraversable: bool,
    ) -> QueryOutcome {
        if !self.is_initialized() {
            warn!("Disc query: traversability map not yet initialized");
            return QueryOutcome::default();
        }
        let mut snapshot = self.traversability.checkout();
        let outcome = QueryEngine::new(&mut snapshot, &self.evaluator, self.query_settings())
            .disc(center, radius_max, radius_min, collect_untraversable);
        self.traversability.commit(snapshot);
        outcome
    }

    /// Polygon query on the current traversability map.
    ///
    /// Not traversable while the map is uninitialized.
    pub fn is_traversable_polygon(&self, polygon: &Polygon, collect_untraversable: bool) -> QueryOutcome {
        if !self.is_initialized() {
            warn!("Polygon query: traversability map not yet initialized");
            return QueryOutcome::default();
        }
        let mut snapshot = self.traversability.checkout();
        let outcome = QueryEngine::new(&mut snapshot, &self.evaluator, self.query_settings())
            .polygon(polygon, collect_untraversable);
        self.traversability.commit(snapshot);
        outcome
    }

    /// Score the configured footprint at every cell.
    ///
    /// Fills `traversability_x` (footprint unrotated) and
    /// `traversability_rot` (footprint rotated by `yaw`), 0 where the
    /// footprint is not traversable.
    pub fn compute_footprint_layers(&self, yaw: f32) -> Result<()> {
        if !self.is_initialized() {
            return Err(TraversabilityError::TraversabilityMapUninitialized);
        }
        let start = Instant::now();
        debug!("Footprint yaw: {yaw}");

        let points = &self.config.footprint.polygon;
        let mut snapshot = self.traversability.checkout();
        let cells: Vec<_> = snapshot.cells().collect();
        let scores: Vec<(f32, f32)> = {
            let mut engine =
                QueryEngine::new(&mut snapshot, &self.evaluator, self.query_settings());
            cells
                .iter()
                .map(|&cell| {
                    let position = engine.map().position_of(cell);
                    let mut score = |theta: f32| {
                        let pose = Pose2D::from_position(position, theta);
                        let footprint =
                            Polygon::new(points.iter().map(|&p| pose.transform_point(p)).collect());
                        let outcome = engine.polygon(&footprint, false);
                        if outcome.traversable {
                            outcome.traversability
                        } else {
                            0.0
                        }
                    };
                    (score(0.0), score(yaw))
                })
                .collect()
        };

        snapshot.add_layer(TRAVERSABILITY_X);
        snapshot.add_layer(TRAVERSABILITY_ROT);
        for (&cell, &(straight, rotated)) in cells.iter().zip(&scores) {
            snapshot.set(TRAVERSABILITY_X, cell, straight);
            snapshot.set(TRAVERSABILITY_ROT, cell, rotated);
        }
        self.commit_and_publish(snapshot, &[TRAVERSABILITY_X, TRAVERSABILITY_ROT])?;

        info!(
            "Traversability of footprint has been computed in {:.3} s",
            start.elapsed().as_secs_f64()
        );
        Ok(())
    }

    /// Run the disc query at every cell, filling `traversability_footprint`.
    ///
    /// Uses `radius + offset` as the outer and `radius` as the inner radius.
    pub fn compute_disc_footprint_layer(&self, radius: f32, offset: f32) -> Result<()> {
        if !self.is_initialized() {
            return Err(TraversabilityError::TraversabilityMapUninitialized);
        }
        let mut snapshot = self.traversability.checkout();
        let cells: Vec<_> = snapshot.cells().collect();
        {
            let mut engine =
                QueryEngine::new(&mut snapshot, &self.evaluator, self.query_settings());
            for cell in cells {
                let center = engine.map().position_of(cell);
                engine.disc(center, radius + offset, radius, false);
            }
        }
        self.commit_and_publish(snapshot, &[])
    }

    /// Commit a full-map computation and publish the merged map.
    fn commit_and_publish(&self, snapshot: Checkout, replaced: &[&str]) -> Result<()> {
        if !self.traversability.commit_layers(snapshot, replaced) {
            warn!("Traversability map replaced during footprint computation, result dropped");
            return Err(TraversabilityError::MapReplaced);
        }
        let published = with_uncertainty_range(&self.traversability.snapshot());
        self.publisher
            .publish_traversability(&published, self.elevation_offset());
        Ok(())
    }

    fn query_settings(&self) -> QuerySettings {
        QuerySettings {
            default_traversability: self.default_traversability(),
            ..QuerySettings::from_config(&self.config)
        }
    }

    // =========================================================================
    // Terrain
    // =========================================================================

    /// Colour the current terrain map from one camera frame.
    ///
    /// Returns the number of classified cells (0 when no terrain map exists
    /// yet).
    pub fn classify_terrain(&self, frame: &CameraFrame) -> usize {
        let mut snapshot = self.terrain.checkout();
        if snapshot.is_empty() {
            return 0;
        }
        let classified = assign_terrain_cost(&mut snapshot, frame);
        if self
            .terrain
            .commit_layers(snapshot, &[TERRAIN_TRAVERSABILITY, COLOR])
        {
            let published = with_uncertainty_range(&self.terrain.snapshot());
            self.publisher
                .publish_terrain(&published, self.elevation_offset());
        }
        classified
    }

    /// Centre of the terrain window for the next update cycle.
    pub fn set_robot_position(&self, position: WorldPoint) {
        *self.robot_position.write() = position;
    }

    pub fn robot_position(&self) -> WorldPoint {
        *self.robot_position.read()
    }

    // =========================================================================
    // Default traversability
    // =========================================================================

    /// Score used for regions the map cannot answer for.
    pub fn default_traversability(&self) -> f32 {
        self.default_traversability.load(Ordering::Acquire)
    }

    /// Set the default score, clamped to [0, 1].
    pub fn set_default_traversability(&self, value: f32) {
        self.default_traversability
            .store(clamp_traversability(value), Ordering::Release);
    }

    /// Go back to the configured default score.
    pub fn restore_default_traversability(&self) {
        self.set_default_traversability(self.config.footprint.traversability_default);
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Whether (x, y) lies on the map and has a valid `traversability` value.
    pub fn has_valid_traversability_at(&self, x: f32, y: f32) -> bool {
        let map = self.traversability.snapshot();
        match map.index_of(WorldPoint::new(x, y)) {
            Some(cell) => map.is_valid(TRAVERSABILITY, cell),
            None => {
                error!("Position ({x:.3}, {y:.3}) is outside the traversability map");
                false
            }
        }
    }

    pub fn traversability_map(&self) -> Arc<GridMap> {
        self.traversability.snapshot()
    }

    pub fn elevation_map(&self) -> Arc<GridMap> {
        self.elevation.snapshot()
    }

    pub fn terrain_map(&self) -> Arc<GridMap> {
        self.terrain.snapshot()
    }

    /// Whether a traversability map is available for queries.
    pub fn is_initialized(&self) -> bool {
        self.traversability_initialized.load(Ordering::Acquire)
    }

    pub fn is_elevation_initialized(&self) -> bool {
        self.elevation_initialized.load(Ordering::Acquire)
    }

    /// Vertical position supplied with the last map.
    pub fn elevation_offset(&self) -> f32 {
        self.elevation_offset.load(Ordering::Acquire)
    }

    pub fn map_frame_id(&self) -> &str {
        &self.config.map_frame_id
    }

    pub fn config(&self) -> &TraversabilityConfig {
        &self.config
    }

    pub fn evaluator(&self) -> &AdmissibilityEvaluator {
        &self.evaluator
    }
}

/// Copy of `map` with `uncertainty_range = upper_bound - lower_bound` when
/// both bounds exist.
fn with_uncertainty_range(map: &GridMap) -> GridMap {
    let mut copy = map.clone();
    let (Some(upper), Some(lower)) = (map.layer(UPPER_BOUND), map.layer(LOWER_BOUND)) else {
        return copy;
    };
    copy.add_layer(UNCERTAINTY_RANGE);
    if let Some(range) = copy.layer_mut(UNCERTAINTY_RANGE) {
        for ((value, u), l) in range.iter_mut().zip(upper).zip(lower) {
            *value = u - l;
        }
    }
    copy
}
