//! Convex hulls (Andrew's monotone chain).

use crate::core::WorldPoint;

use super::polygon::Polygon;

/// Convex hull of a point set, counter-clockwise.
///
/// Duplicate and collinear points are dropped, so fewer than three distinct
/// non-collinear inputs give a degenerate polygon of 0 to 2 vertices.
pub fn convex_hull(points: &[WorldPoint]) -> Polygon {
    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    sorted.dedup();

    if sorted.len() < 3 {
        return Polygon::new(sorted);
    }

    let turn = |o: WorldPoint, a: WorldPoint, b: WorldPoint| (a - o).cross(&(b - o));

    let mut hull: Vec<WorldPoint> = Vec::with_capacity(sorted.len() * 2);
    // Lower chain
    for &p in &sorted {
        while hull.len() >= 2 && turn(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0.0 {
            hull.pop();
        }
        hull.push(p);
    }
    // Upper chain
    let lower_len = hull.len() + 1;
    for &p in sorted.iter().rev().skip(1) {
        while hull.len() >= lower_len && turn(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0.0 {
            hull.pop();
        }
        hull.push(p);
    }
    // Last point repeats the first
    hull.pop();

    Polygon::new(hull)
}

/// Hull of the union of both vertex sets, stamped like `a`.
pub fn convex_hull_of_polygons(a: &Polygon, b: &Polygon) -> Polygon {
    let points: Vec<WorldPoint> = a.vertices().iter().chain(b.vertices()).copied().collect();
    convex_hull(&points).stamped(a.frame_id(), a.timestamp_ns())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn square() -> Vec<WorldPoint> {
        vec![
            WorldPoint::new(0.0, 0.0),
            WorldPoint::new(1.0, 0.0),
            WorldPoint::new(1.0, 1.0),
            WorldPoint::new(0.0, 1.0),
        ]
    }

    #[test]
    fn test_hull_of_square_corners() {
        let mut points = square();
        points.reverse();
        let hull = convex_hull(&points);
        assert_eq!(hull.len(), 4);
        for corner in square() {
            assert!(hull.vertices().contains(&corner));
        }
        assert_relative_eq!(hull.area(), 1.0);
    }

    #[test]
    fn test_hull_drops_interior_and_collinear_points() {
        let mut points = square();
        points.push(WorldPoint::new(0.5, 0.5));
        points.push(WorldPoint::new(0.5, 0.0));
        points.push(WorldPoint::new(1.0, 1.0));
        let hull = convex_hull(&points);
        assert_eq!(hull.len(), 4);
        assert_relative_eq!(hull.area(), 1.0);
    }

    #[test]
    fn test_degenerate_hulls() {
        assert!(convex_hull(&[]).is_empty());

        let single = convex_hull(&[WorldPoint::new(1.0, 2.0)]);
        assert_eq!(single.len(), 1);
        assert_relative_eq!(single.area(), 0.0);

        let pair = convex_hull(&[WorldPoint::new(0.0, 0.0), WorldPoint::new(1.0, 2.0)]);
        assert_eq!(pair.len(), 2);
        assert_relative_eq!(pair.area(), 0.0);

        let line = convex_hull(&[
            WorldPoint::new(0.0, 0.0),
            WorldPoint::new(1.0, 1.0),
            WorldPoint::new(2.0, 2.0),
        ]);
        assert!(line.len() <= 2);
        assert_relative_eq!(line.area(), 0.0);
    }

    #[test]
    fn test_hull_of_two_polygons() {
        let a = Polygon::new(square()).stamped("map", 3);
        let b = a.transformed(crate::core::Pose2D::new(2.0, 0.0, 0.0));
        let hull = convex_hull_of_polygons(&a, &b);
        assert_eq!(hull.len(), 4);
        assert_relative_eq!(hull.area(), 3.0, epsilon = 1e-6);
        assert_eq!(hull.frame_id(), "map");
    }

    #[test]
    fn test_random_points_inside_hull() {
        let mut rng = StdRng::seed_from_u64(42);
        let points: Vec<WorldPoint> = (0..200)
            .map(|_| WorldPoint::new(rng.random_range(-1.0..1.0), rng.random_range(-1.0..1.0)))
            .collect();
        let hull = convex_hull(&points);
        assert!(hull.len() >= 3);

        // Counter-clockwise and convex: every point is left of or on every edge
        let v = hull.vertices();
        for i in 0..v.len() {
            let a = v[i];
            let b = v[(i + 1) % v.len()];
            for p in &points {
                assert!((b - a).cross(&(*p - a)) >= -1e-5);
            }
        }
        assert!(hull.area() <= 4.0);
    }
}
