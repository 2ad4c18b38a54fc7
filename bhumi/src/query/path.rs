//! Footprint path checks.
//!
//! A path is evaluated segment by segment:
//!
//! ```text
//! START ─► inclination ─► footprint ─► accumulate ─► ... ─► DONE(safe)
//!               │             │
//!               └─────────────┴──────────────────────────► DONE(unsafe)
//! ```
//!
//! Any failing segment ends the check with the zeroed result; the footprint
//! polygons evaluated so far are kept for visualization.

use crate::core::{Pose2D, WorldPoint};
use crate::error::{Result, TraversabilityError};
use crate::geometry::{Polygon, convex_hull, convex_hull_of_polygons};
use crate::grid::LineIter;

use super::engine::QueryEngine;
use super::footprint::{Footprint, FootprintPath};
use super::result::TraversabilityResult;

/// Running weighted mean of segment scores.
#[derive(Clone, Copy, Debug, Default)]
struct WeightedMean {
    value: f32,
    weight: f32,
}

impl WeightedMean {
    fn push(&mut self, value: f32, weight: f32) {
        let total = self.weight + weight;
        self.value = if total > 0.0 {
            (value * weight + self.value * self.weight) / total
        } else {
            value
        };
        self.weight = total;
    }
}

impl QueryEngine<'_> {
    /// Check a footprint swept along `path`.
    ///
    /// Returns `Err(EmptyPath)` for a path without poses. Everything else,
    /// including poses outside the map, yields an `Ok` verdict.
    pub fn check_path(&mut self, path: &FootprintPath) -> Result<TraversabilityResult> {
        if path.poses.is_empty() {
            return Err(TraversabilityError::EmptyPath);
        }
        Ok(match &path.footprint {
            Footprint::Circle { radius } => self.circular_path(path, *radius),
            Footprint::Polygon(points) => self.polygonal_path(path, points),
        })
    }

    fn circular_path(&mut self, path: &FootprintPath, radius: f32) -> TraversabilityResult {
        let collect = path.compute_untraversable_polygon;
        let radius_max = radius + self.settings.circle_radius_offset;
        let mut verdict = Verdict::default();

        if let [pose] = path.poses.as_slice() {
            let center = pose.position();
            if !self.inclination_ok(center, center) {
                return verdict.unsafe_result();
            }
            let outcome = self.disc(center, radius_max, radius, collect);
            verdict.footprints.push(self.circle(center, radius_max));
            if !outcome.traversable {
                verdict.merge_untraversable(&outcome.untraversable_polygon);
                return verdict.unsafe_result();
            }
            verdict.mean.value = outcome.traversability;
            return verdict.safe_result(0.0);
        }

        let stride = self.settings.path_skip_stride + 1;
        for pair in path.poses.windows(2) {
            let (start, end) = (pair[0].position(), pair[1].position());
            if !self.inclination_ok(start, end) {
                return verdict.unsafe_result();
            }

            let from = self.map.world_to_grid(end);
            let to = self.map.world_to_grid(start);
            let mut sum = 0.0f32;
            let mut n_samples = 0usize;
            let mut segment_ok = true;
            for cell in LineIter::new(self.map, from, to).step_by(stride) {
                let center = self.map.position_of(cell);
                let outcome = self.disc(center, radius_max, radius, collect);
                if !outcome.traversable {
                    verdict.merge_untraversable(&outcome.untraversable_polygon);
                    segment_ok = false;
                    break;
                }
                sum += outcome.traversability;
                n_samples += 1;
            }
            verdict.footprints.push(self.circle(end, radius_max));

            if !segment_ok {
                return verdict.unsafe_result();
            }
            let segment = if n_samples == 0 {
                let default = self.settings.default_traversability;
                if default == 0.0 {
                    return verdict.unsafe_result();
                }
                default
            } else {
                sum / n_samples as f32
            };
            verdict.mean.push(segment, (end - start).norm());
        }

        verdict.safe_result(0.0)
    }

    fn polygonal_path(&mut self, path: &FootprintPath, points: &[WorldPoint]) -> TraversabilityResult {
        let collect = path.compute_untraversable_polygon;
        let mut verdict = Verdict::default();

        if let [pose] = path.poses.as_slice() {
            let footprint = self.footprint_at(points, *pose);
            let center = pose.position();
            if !self.inclination_ok(center, center) {
                return verdict.unsafe_result();
            }
            let outcome = self.polygon(&footprint, collect);
            let area = footprint.area();
            verdict.footprints.push(footprint);
            if !outcome.traversable {
                verdict.merge_untraversable(&outcome.untraversable_polygon);
                return verdict.unsafe_result();
            }
            verdict.mean.value = outcome.traversability;
            return verdict.safe_result(area);
        }

        let mut previous = self.footprint_at(points, path.poses[0]);
        let mut area = 0.0f32;
        for (i, pair) in path.poses.windows(2).enumerate() {
            let (start, end) = (pair[0].position(), pair[1].position());
            let mut from = previous;
            let mut to = self.footprint_at(points, pair[1]);

            if path.conservative {
                let motion = end - start;
                let from_vertices = from.vertices().to_vec();
                let to_vertices = to.vertices().to_vec();
                for &vertex in &from_vertices {
                    to.add_vertex(vertex + motion);
                }
                for &vertex in &to_vertices {
                    from.add_vertex(vertex - motion);
                }
            }

            let swept = self.stamp(convex_hull_of_polygons(&from, &to));
            if !self.inclination_ok(start, end) {
                return verdict.unsafe_result();
            }
            let outcome = self.polygon(&swept, collect);
            let swept_area = swept.area();
            verdict.footprints.push(swept);
            if !outcome.traversable {
                verdict.merge_untraversable(&outcome.untraversable_polygon);
                return verdict.unsafe_result();
            }

            // Only the area not already covered by the previous footprint
            // counts toward the weight after the first segment.
            let segment_area = if i == 0 {
                swept_area
            } else {
                let from_area = if path.conservative {
                    convex_hull(from.vertices()).area()
                } else {
                    from.area()
                };
                swept_area - from_area
            };
            area += segment_area;
            verdict.mean.push(outcome.traversability, segment_area);
            previous = to;
        }

        verdict.safe_result(area)
    }

    /// `footprint` points placed at `pose`, stamped with the map frame.
    fn footprint_at(&self, points: &[WorldPoint], pose: Pose2D) -> Polygon {
        let vertices = points.iter().map(|&p| pose.transform_point(p)).collect();
        self.stamp(Polygon::new(vertices))
    }

    fn inclination_ok(&self, start: WorldPoint, end: WorldPoint) -> bool {
        !self.settings.check_inclination || self.check_inclination(start, end)
    }
}

/// Partial path result carried through the segments.
#[derive(Default)]
struct Verdict {
    mean: WeightedMean,
    footprints: Vec<Polygon>,
    untraversable: Polygon,
}

impl Verdict {
    fn merge_untraversable(&mut self, polygon: &Polygon) {
        if polygon.is_empty() {
            return;
        }
        let mut merged = convex_hull_of_polygons(polygon, &self.untraversable);
        merged.set_stamp(polygon.frame_id(), polygon.timestamp_ns());
        self.untraversable = merged;
    }

    fn unsafe_result(self) -> TraversabilityResult {
        TraversabilityResult {
            footprint_polygons: self.footprints,
            untraversable_polygon: self.untraversable,
            ..Default::default()
        }
    }

    fn safe_result(self, area: f32) -> TraversabilityResult {
        TraversabilityResult {
            is_safe: true,
            traversability: self.mean.value,
            area,
            footprint_polygons: self.footprints,
            untraversable_polygon: self.untraversable,
        }
    }
}
