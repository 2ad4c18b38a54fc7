//! Planar polygon with frame and timestamp.

use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use crate::core::{Pose2D, WorldPoint};

/// Ordered, implicitly closed vertex list.
///
/// Fewer than three vertices encloses no area; an empty polygon means
/// "no obstruction" wherever one is reported.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    vertices: Vec<WorldPoint>,
    #[serde(default)]
    frame_id: String,
    #[serde(default)]
    timestamp_ns: u64,
}

impl Polygon {
    pub fn new(vertices: Vec<WorldPoint>) -> Self {
        Self {
            vertices,
            ..Self::default()
        }
    }

    /// Regular `n_vertices`-gon inscribed in the circle around `center`.
    pub fn from_circle(center: WorldPoint, radius: f32, n_vertices: usize) -> Self {
        let step = TAU / n_vertices as f32;
        let vertices = (0..n_vertices)
            .map(|i| {
                let (sin, cos) = (i as f32 * step).sin_cos();
                center + WorldPoint::new(cos, sin) * radius
            })
            .collect();
        Self::new(vertices)
    }

    /// Builder-style frame and timestamp.
    pub fn stamped(mut self, frame_id: &str, timestamp_ns: u64) -> Self {
        self.set_stamp(frame_id, timestamp_ns);
        self
    }

    pub fn set_stamp(&mut self, frame_id: &str, timestamp_ns: u64) {
        frame_id.clone_into(&mut self.frame_id);
        self.timestamp_ns = timestamp_ns;
    }

    pub fn frame_id(&self) -> &str {
        &self.frame_id
    }

    pub fn timestamp_ns(&self) -> u64 {
        self.timestamp_ns
    }

    #[inline]
    pub fn vertices(&self) -> &[WorldPoint] {
        &self.vertices
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn add_vertex(&mut self, vertex: WorldPoint) {
        self.vertices.push(vertex);
    }

    /// Enclosed area (shoelace formula); 0 for fewer than three vertices.
    pub fn area(&self) -> f32 {
        if self.vertices.len() < 3 {
            return 0.0;
        }
        let twice: f32 = self
            .vertices
            .iter()
            .zip(self.vertices.iter().cycle().skip(1))
            .map(|(a, b)| a.cross(b))
            .sum();
        twice.abs() / 2.0
    }

    /// Even-odd point membership.
    ///
    /// Edges are half-open in y and points exactly on a right-hand edge fall
    /// outside, so tiled polygons partition the plane.
    pub fn contains(&self, point: WorldPoint) -> bool {
        let n = self.vertices.len();
        if n < 3 {
            return false;
        }
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let vi = self.vertices[i];
            let vj = self.vertices[j];
            if (vi.y > point.y) != (vj.y > point.y)
                && point.x < (vj.x - vi.x) * (point.y - vi.y) / (vj.y - vi.y) + vi.x
            {
                inside = !inside;
            }
            j = i;
        }
        inside
    }

    /// Axis-aligned bounds (min, max), `None` when empty.
    pub fn bounding_box(&self) -> Option<(WorldPoint, WorldPoint)> {
        let first = *self.vertices.first()?;
        Some(self.vertices.iter().fold((first, first), |(lo, hi), v| {
            (
                WorldPoint::new(lo.x.min(v.x), lo.y.min(v.y)),
                WorldPoint::new(hi.x.max(v.x), hi.y.max(v.y)),
            )
        }))
    }

    /// Copy with every vertex mapped from `pose`'s local frame to the map frame.
    pub fn transformed(&self, pose: Pose2D) -> Polygon {
        Polygon {
            vertices: self
                .vertices
                .iter()
                .map(|&v| pose.transform_point(v))
                .collect(),
            frame_id: self.frame_id.clone(),
            timestamp_ns: self.timestamp_ns,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::{FRAC_PI_2, PI};

    fn unit_square() -> Polygon {
        Polygon::new(vec![
            WorldPoint::new(0.0, 0.0),
            WorldPoint::new(1.0, 0.0),
            WorldPoint::new(1.0, 1.0),
            WorldPoint::new(0.0, 1.0),
        ])
    }

    #[test]
    fn test_area() {
        assert_relative_eq!(unit_square().area(), 1.0);
        let mut reversed = unit_square().vertices().to_vec();
        reversed.reverse();
        assert_relative_eq!(Polygon::new(reversed).area(), 1.0);
        assert_relative_eq!(Polygon::default().area(), 0.0);
        let segment = Polygon::new(vec![WorldPoint::ZERO, WorldPoint::new(1.0, 1.0)]);
        assert_relative_eq!(segment.area(), 0.0);
    }

    #[test]
    fn test_circle_approximation() {
        let circle = Polygon::from_circle(WorldPoint::new(1.0, -1.0), 0.5, 20);
        assert_eq!(circle.len(), 20);
        for v in circle.vertices() {
            assert_relative_eq!(v.distance(&WorldPoint::new(1.0, -1.0)), 0.5, epsilon = 1e-5);
        }
        // Inscribed 20-gon area: n/2 · r² · sin(2π/n)
        let expected = 10.0 * 0.25 * (TAU / 20.0).sin();
        assert_relative_eq!(circle.area(), expected, epsilon = 1e-4);
        assert!(circle.area() < PI * 0.25);
    }

    #[test]
    fn test_contains() {
        let square = unit_square();
        assert!(square.contains(WorldPoint::new(0.5, 0.5)));
        assert!(!square.contains(WorldPoint::new(1.5, 0.5)));
        assert!(!square.contains(WorldPoint::new(0.5, -0.1)));
        assert!(!Polygon::default().contains(WorldPoint::ZERO));
    }

    #[test]
    fn test_bounding_box() {
        let (lo, hi) = unit_square().bounding_box().expect("non-empty");
        assert_eq!(lo, WorldPoint::ZERO);
        assert_eq!(hi, WorldPoint::new(1.0, 1.0));
        assert!(Polygon::default().bounding_box().is_none());
    }

    #[test]
    fn test_transformed() {
        let moved = unit_square()
            .stamped("map", 7)
            .transformed(Pose2D::new(2.0, 0.0, FRAC_PI_2));
        let v = moved.vertices()[1];
        assert_relative_eq!(v.x, 2.0, epsilon = 1e-6);
        assert_relative_eq!(v.y, 1.0, epsilon = 1e-6);
        assert_relative_eq!(moved.area(), 1.0, epsilon = 1e-5);
        assert_eq!(moved.frame_id(), "map");
        assert_eq!(moved.timestamp_ns(), 7);
    }
}
