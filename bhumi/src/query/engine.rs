//! Disc and polygon traversability queries.

use log::debug;

use crate::admissibility::AdmissibilityEvaluator;
use crate::config::TraversabilityConfig;
use crate::core::{GridCoord, WorldPoint};
use crate::geometry::{Polygon, convex_hull};
use crate::grid::layers::{ROBOT_SLOPE, TRAVERSABILITY, TRAVERSABILITY_FOOTPRINT};
use crate::grid::{GridMap, LineIter, PolygonIter, SpiralIter};

use super::result::QueryOutcome;

/// Scoring policy shared by all queries.
#[derive(Clone, Debug, PartialEq)]
pub struct QuerySettings {
    /// Score used where the map cannot tell
    pub default_traversability: f32,
    /// Veto poses and segments crossing a zero `robot_slope`
    pub check_inclination: bool,
    /// Cells skipped after each sample on a circular path segment
    pub path_skip_stride: usize,
    /// Margin added to the path radius for the disc query
    pub circle_radius_offset: f32,
    pub circle_polygon_vertices: usize,
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self::from_config(&TraversabilityConfig::default())
    }
}

impl QuerySettings {
    pub fn from_config(config: &TraversabilityConfig) -> Self {
        Self {
            default_traversability: config.footprint.traversability_default,
            check_inclination: config.footprint.check_robot_inclination,
            path_skip_stride: config.tunables.path_skip_stride,
            circle_radius_offset: config.tunables.circle_radius_offset,
            circle_polygon_vertices: config.tunables.circle_polygon_vertices,
        }
    }
}

/// Traversability queries against one grid snapshot.
///
/// Queries memoize into the snapshot's `*_footprint` layers, hence the
/// mutable borrow. Callers own the snapshot and decide whether to publish
/// it back.
pub struct QueryEngine<'a> {
    pub(super) map: &'a mut GridMap,
    pub(super) evaluator: &'a AdmissibilityEvaluator,
    pub(super) settings: QuerySettings,
}

impl<'a> QueryEngine<'a> {
    pub fn new(
        map: &'a mut GridMap,
        evaluator: &'a AdmissibilityEvaluator,
        settings: QuerySettings,
    ) -> Self {
        Self {
            map,
            evaluator,
            settings,
        }
    }

    pub fn settings(&self) -> &QuerySettings {
        &self.settings
    }

    /// The snapshot being queried.
    pub fn map(&self) -> &GridMap {
        self.map
    }

    // =========================================================================
    // Disc query
    // =========================================================================

    /// Is the disc of `radius_max` around `center` traversable?
    ///
    /// Cells are visited in a spiral. An inadmissible cell within
    /// `radius_min` (or anywhere, when `radius_min` is 0) fails the disc.
    /// The first one found beyond `radius_min` only discounts the mean by
    /// `((r - radius_min) / (radius_max - radius_min) + 1) / 2` and ends the
    /// search.
    ///
    /// The result is cached per centre cell in `traversability_footprint`,
    /// independent of the radii.
    pub fn disc(
        &mut self,
        center: WorldPoint,
        radius_max: f32,
        radius_min: f32,
        collect_untraversable: bool,
    ) -> QueryOutcome {
        let Some(center_cell) = self.map.index_of(center) else {
            return self.unknown_disc(center, radius_max, collect_untraversable);
        };

        let cached = self.map.get(TRAVERSABILITY_FOOTPRINT, center_cell);
        if cached.is_finite() {
            let traversable = cached != 0.0;
            return QueryOutcome {
                traversable,
                traversability: cached,
                untraversable_polygon: self.disc_polygon(
                    center,
                    radius_max,
                    collect_untraversable && !traversable,
                ),
            };
        }

        let mut sum = 0.0f32;
        let mut n_cells = 0usize;
        let mut traversable = true;
        let mut discount = 1.0f32;
        let mut blocked: Vec<WorldPoint> = Vec::new();

        let mut spiral = SpiralIter::new(self.map, center, radius_max);
        while let Some(cell) = spiral.next() {
            if self.evaluator.is_admissible(self.map, cell) {
                n_cells += 1;
                sum += self.cell_traversability(cell);
                continue;
            }

            let radius = spiral.current_radius();
            if traversable && radius_min > 0.0 && radius > radius_min {
                discount = ((radius - radius_min) / (radius_max - radius_min) + 1.0) / 2.0;
                break;
            }

            traversable = false;
            blocked.push(self.map.position_of(cell));
            if !collect_untraversable {
                break;
            }
        }

        let traversability = if !traversable {
            0.0
        } else if n_cells == 0 {
            traversable = self.settings.default_traversability != 0.0;
            self.settings.default_traversability
        } else {
            sum / n_cells as f32 * discount
        };
        self.map
            .set(TRAVERSABILITY_FOOTPRINT, center_cell, traversability);

        let untraversable_polygon = if collect_untraversable && !traversable {
            self.stamp(convex_hull(&blocked))
        } else {
            self.stamp(Polygon::default())
        };

        QueryOutcome {
            traversable,
            traversability,
            untraversable_polygon,
        }
    }

    /// Fallback for a disc centred outside the map.
    fn unknown_disc(&self, center: WorldPoint, radius_max: f32, collect: bool) -> QueryOutcome {
        let default = self.settings.default_traversability;
        let traversable = default != 0.0;
        QueryOutcome {
            traversable,
            traversability: default,
            untraversable_polygon: self.disc_polygon(center, radius_max, collect && !traversable),
        }
    }

    fn disc_polygon(&self, center: WorldPoint, radius: f32, whole_disc: bool) -> Polygon {
        if whole_disc {
            self.circle(center, radius)
        } else {
            self.stamp(Polygon::default())
        }
    }

    // =========================================================================
    // Polygon query
    // =========================================================================

    /// Is every cell inside `polygon` admissible?
    ///
    /// Without `collect_untraversable` the scan stops at the first
    /// inadmissible cell. A polygon covering no cell falls back to the
    /// default traversability.
    pub fn polygon(&mut self, polygon: &Polygon, collect_untraversable: bool) -> QueryOutcome {
        let mut sum = 0.0f32;
        let mut n_cells = 0usize;
        let mut traversable = true;
        let mut blocked: Vec<WorldPoint> = Vec::new();

        for cell in PolygonIter::new(self.map, polygon) {
            if self.evaluator.is_admissible(self.map, cell) {
                n_cells += 1;
                sum += self.cell_traversability(cell);
                continue;
            }
            traversable = false;
            if !collect_untraversable {
                break;
            }
            blocked.push(self.map.position_of(cell));
        }

        let traversability = if !traversable {
            0.0
        } else if n_cells == 0 {
            debug!("No cells within polygon, using default traversability");
            traversable = self.settings.default_traversability != 0.0;
            self.settings.default_traversability
        } else {
            sum / n_cells as f32
        };

        QueryOutcome {
            traversable,
            traversability,
            untraversable_polygon: self.stamp(convex_hull(&blocked)),
        }
    }

    // =========================================================================
    // Inclination
    // =========================================================================

    /// Every `robot_slope` sample on the line from `start` to `end` is valid
    /// and non-zero. Endpoints outside the map fail.
    pub fn check_inclination(&self, start: WorldPoint, end: WorldPoint) -> bool {
        let (Some(from), Some(to)) = (self.map.index_of(start), self.map.index_of(end)) else {
            return false;
        };
        LineIter::new(self.map, from, to).all(|cell| {
            let slope = self.map.get(ROBOT_SLOPE, cell);
            slope.is_finite() && slope != 0.0
        })
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    /// Base traversability of an admissible cell, default where unknown.
    #[inline]
    fn cell_traversability(&self, cell: GridCoord) -> f32 {
        let value = self.map.get(TRAVERSABILITY, cell);
        if value.is_finite() {
            value
        } else {
            self.settings.default_traversability
        }
    }

    pub(super) fn circle(&self, center: WorldPoint, radius: f32) -> Polygon {
        self.stamp(Polygon::from_circle(
            center,
            radius,
            self.settings.circle_polygon_vertices,
        ))
    }

    pub(super) fn stamp(&self, polygon: Polygon) -> Polygon {
        polygon.stamped(self.map.frame_id(), self.map.timestamp_ns())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::testing::{MAP_FRAME, add_obstacle, uniform_map};
    use approx::assert_relative_eq;

    fn settings(default_traversability: f32) -> QuerySettings {
        QuerySettings {
            default_traversability,
            ..Default::default()
        }
    }

    #[test]
    fn test_disc_outside_map_uses_default() {
        let evaluator = AdmissibilityEvaluator::default();
        let mut map = uniform_map(0.8);
        let edge = WorldPoint::new(map.bounds().1.x, 1.0);

        let mut engine = QueryEngine::new(&mut map, &evaluator, settings(0.6));
        let outcome = engine.disc(edge, 0.3, 0.0, true);
        assert!(outcome.traversable);
        assert_relative_eq!(outcome.traversability, 0.6);
        assert!(outcome.untraversable_polygon.is_empty());

        let mut engine = QueryEngine::new(&mut map, &evaluator, settings(0.0));
        let outcome = engine.disc(edge, 0.3, 0.0, true);
        assert!(!outcome.traversable);
        assert_relative_eq!(outcome.traversability, 0.0);
        assert_eq!(outcome.untraversable_polygon.len(), 20);
        assert_eq!(outcome.untraversable_polygon.frame_id(), MAP_FRAME);
    }

    #[test]
    fn test_disc_on_uniform_map() {
        let evaluator = AdmissibilityEvaluator::default();
        let mut map = uniform_map(0.8);
        let center = map.position_of(GridCoord::new(20, 20));

        let mut engine = QueryEngine::new(&mut map, &evaluator, settings(0.5));
        let outcome = engine.disc(center, 0.45, 0.3, false);
        assert!(outcome.traversable);
        assert_relative_eq!(outcome.traversability, 0.8, epsilon = 1e-5);
        assert_relative_eq!(
            map.get(TRAVERSABILITY_FOOTPRINT, GridCoord::new(20, 20)),
            0.8,
            epsilon = 1e-5
        );
    }

    #[test]
    fn test_disc_is_idempotent() {
        let evaluator = AdmissibilityEvaluator::default();
        let mut map = uniform_map(0.7);
        map.set(TRAVERSABILITY, GridCoord::new(21, 20), 0.1);
        let center = map.position_of(GridCoord::new(20, 20));

        let mut engine = QueryEngine::new(&mut map, &evaluator, settings(0.5));
        let first = engine.disc(center, 0.45, 0.3, false);
        let second = engine.disc(center, 0.45, 0.3, false);
        assert_eq!(first, second);
        assert!(first.traversability < 0.7);
    }

    #[test]
    fn test_disc_unknown_cells_use_default() {
        let evaluator = AdmissibilityEvaluator::default();
        let mut map = uniform_map(0.8);
        map.clear_layer(TRAVERSABILITY);
        let center = map.position_of(GridCoord::new(20, 20));

        let mut engine = QueryEngine::new(&mut map, &evaluator, settings(0.4));
        let outcome = engine.disc(center, 0.3, 0.0, false);
        assert!(outcome.traversable);
        assert_relative_eq!(outcome.traversability, 0.4, epsilon = 1e-5);
    }

    #[test]
    fn test_disc_fails_on_obstacle_without_min_radius() {
        let evaluator = AdmissibilityEvaluator::default();
        let mut map = uniform_map(0.8);
        add_obstacle(&mut map, GridCoord::new(25, 20));
        let center = map.position_of(GridCoord::new(20, 20));

        let mut engine = QueryEngine::new(&mut map, &evaluator, settings(0.5));
        let outcome = engine.disc(center, 0.8, 0.0, false);
        assert!(!outcome.traversable);
        assert_relative_eq!(outcome.traversability, 0.0);
        assert_eq!(map.get(TRAVERSABILITY_FOOTPRINT, GridCoord::new(20, 20)), 0.0);
    }

    #[test]
    fn test_disc_collects_untraversable_hull() {
        let evaluator = AdmissibilityEvaluator::default();
        let mut map = uniform_map(0.8);
        add_obstacle(&mut map, GridCoord::new(25, 20));
        let center = map.position_of(GridCoord::new(20, 20));

        let mut engine = QueryEngine::new(&mut map, &evaluator, settings(0.5));
        let outcome = engine.disc(center, 0.8, 0.0, true);
        assert!(!outcome.traversable);
        // 3 x 3 obstacle, hull through the outer cell centres
        assert_eq!(outcome.untraversable_polygon.len(), 4);
        assert_relative_eq!(outcome.untraversable_polygon.area(), 0.04, epsilon = 1e-4);
        assert_eq!(outcome.untraversable_polygon.frame_id(), MAP_FRAME);

        // Cache hit reports the whole disc
        let again = engine.disc(center, 0.8, 0.0, true);
        assert!(!again.traversable);
        assert_eq!(again.untraversable_polygon.len(), 20);
    }

    #[test]
    fn test_disc_obstacle_beyond_min_radius_discounts() {
        let evaluator = AdmissibilityEvaluator::default();
        let cell = GridCoord::new(20, 20);

        let mut hard_map = uniform_map(0.8);
        add_obstacle(&mut hard_map, GridCoord::new(26, 20));
        let center = hard_map.position_of(cell);
        let hard = QueryEngine::new(&mut hard_map, &evaluator, settings(0.5)).disc(center, 0.8, 0.0, false);

        let mut soft_map = uniform_map(0.8);
        add_obstacle(&mut soft_map, GridCoord::new(26, 20));
        let soft = QueryEngine::new(&mut soft_map, &evaluator, settings(0.5)).disc(center, 0.8, 0.3, false);

        assert!(!hard.traversable);
        assert!(soft.traversable);
        assert!(soft.traversability >= hard.traversability);
        assert!(soft.traversability < 1.0);
        // Nearest obstacle cell at r = 0.5: factor ((0.5 - 0.3) / 0.5 + 1) / 2 = 0.7
        assert_relative_eq!(soft.traversability, 0.8 * 0.7, epsilon = 1e-4);
    }

    #[test]
    fn test_disc_obstacle_within_min_radius_fails() {
        let evaluator = AdmissibilityEvaluator::default();
        let mut map = uniform_map(0.8);
        add_obstacle(&mut map, GridCoord::new(23, 20));
        let center = map.position_of(GridCoord::new(20, 20));

        let outcome = QueryEngine::new(&mut map, &evaluator, settings(0.5)).disc(center, 0.8, 0.3, false);
        assert!(!outcome.traversable);
    }

    #[test]
    fn test_cache_reset_reflects_new_base_layers() {
        let evaluator = AdmissibilityEvaluator::default();
        let mut map = uniform_map(0.8);
        let cell = GridCoord::new(20, 20);
        let center = map.position_of(cell);

        let before = QueryEngine::new(&mut map, &evaluator, settings(0.5)).disc(center, 0.3, 0.0, false);
        assert_relative_eq!(before.traversability, 0.8, epsilon = 1e-5);

        map.add_layer_with(TRAVERSABILITY, 0.2);
        let stale = QueryEngine::new(&mut map, &evaluator, settings(0.5)).disc(center, 0.3, 0.0, false);
        assert_relative_eq!(stale.traversability, 0.8, epsilon = 1e-5);

        AdmissibilityEvaluator::reset_caches(&mut map);
        let fresh = QueryEngine::new(&mut map, &evaluator, settings(0.5)).disc(center, 0.3, 0.0, false);
        assert_relative_eq!(fresh.traversability, 0.2, epsilon = 1e-5);
    }

    #[test]
    fn test_single_cell_polygon_matches_cell() {
        let evaluator = AdmissibilityEvaluator::default();
        let mut map = uniform_map(0.8);
        let cell = GridCoord::new(12, 30);
        map.set(TRAVERSABILITY, cell, 0.35);

        let c = map.position_of(cell);
        let h = map.resolution() / 2.0;
        let square = Polygon::new(vec![
            WorldPoint::new(c.x - h, c.y - h),
            WorldPoint::new(c.x + h, c.y - h),
            WorldPoint::new(c.x + h, c.y + h),
            WorldPoint::new(c.x - h, c.y + h),
        ]);

        let outcome = QueryEngine::new(&mut map, &evaluator, settings(0.5)).polygon(&square, false);
        assert!(outcome.traversable);
        assert_relative_eq!(outcome.traversability, 0.35, epsilon = 1e-5);
    }

    #[test]
    fn test_polygon_with_obstacle() {
        let evaluator = AdmissibilityEvaluator::default();
        let mut map = uniform_map(0.8);
        add_obstacle(&mut map, GridCoord::new(20, 20));
        let square = Polygon::new(vec![
            WorldPoint::new(1.5, 1.5),
            WorldPoint::new(2.5, 1.5),
            WorldPoint::new(2.5, 2.5),
            WorldPoint::new(1.5, 2.5),
        ]);

        let mut engine = QueryEngine::new(&mut map, &evaluator, settings(0.5));
        let quick = engine.polygon(&square, false);
        assert!(!quick.traversable);
        assert_relative_eq!(quick.traversability, 0.0);
        assert!(quick.untraversable_polygon.is_empty());

        let full = engine.polygon(&square, true);
        assert!(!full.traversable);
        assert_relative_eq!(full.untraversable_polygon.area(), 0.04, epsilon = 1e-4);
    }

    #[test]
    fn test_polygon_outside_map_uses_default() {
        let evaluator = AdmissibilityEvaluator::default();
        let mut map = uniform_map(0.8);
        let far = Polygon::new(vec![
            WorldPoint::new(10.0, 10.0),
            WorldPoint::new(11.0, 10.0),
            WorldPoint::new(11.0, 11.0),
        ]);

        let outcome = QueryEngine::new(&mut map, &evaluator, settings(0.6)).polygon(&far, true);
        assert!(outcome.traversable);
        assert_relative_eq!(outcome.traversability, 0.6);

        let outcome = QueryEngine::new(&mut map, &evaluator, settings(0.0)).polygon(&far, true);
        assert!(!outcome.traversable);
        assert!(outcome.untraversable_polygon.is_empty());
    }

    #[test]
    fn test_inclination() {
        let evaluator = AdmissibilityEvaluator::default();
        let mut map = uniform_map(0.8);
        let a = map.position_of(GridCoord::new(5, 5));
        let b = map.position_of(GridCoord::new(15, 5));
        let engine = QueryEngine::new(&mut map, &evaluator, settings(0.5));
        assert!(engine.check_inclination(a, b));
        assert!(engine.check_inclination(a, a));
        assert!(!engine.check_inclination(a, WorldPoint::new(-1.0, 0.0)));

        map.set(ROBOT_SLOPE, GridCoord::new(10, 5), 0.0);
        let engine = QueryEngine::new(&mut map, &evaluator, settings(0.5));
        assert!(!engine.check_inclination(a, b));
        assert!(engine.check_inclination(a, a));

        map.set(ROBOT_SLOPE, GridCoord::new(10, 5), f32::NAN);
        let engine = QueryEngine::new(&mut map, &evaluator, settings(0.5));
        assert!(!engine.check_inclination(b, a));
    }
}
