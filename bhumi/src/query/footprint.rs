//! Robot footprint and footprint path definitions.

use serde::{Deserialize, Serialize};

use crate::core::{Pose2D, WorldPoint};

/// Robot extent used for a traversability check.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Footprint {
    /// Disc of the given radius around the pose position (meters)
    Circle { radius: f32 },
    /// Outline in the robot frame
    Polygon(Vec<WorldPoint>),
}

impl Footprint {
    /// Polygonal footprint, or a circle when no outline is given.
    pub fn from_points(points: Vec<WorldPoint>, radius: f32) -> Self {
        if points.is_empty() {
            Footprint::Circle { radius }
        } else {
            Footprint::Polygon(points)
        }
    }
}

/// Ordered poses swept by one footprint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FootprintPath {
    pub poses: Vec<Pose2D>,
    pub footprint: Footprint,
    /// Grow each swept polygon by the motion between poses
    #[serde(default)]
    pub conservative: bool,
    /// Report the hull of the inadmissible cells found
    #[serde(default)]
    pub compute_untraversable_polygon: bool,
}

impl FootprintPath {
    pub fn new(poses: Vec<Pose2D>, footprint: Footprint) -> Self {
        Self {
            poses,
            footprint,
            conservative: false,
            compute_untraversable_polygon: false,
        }
    }

    /// Path checked with a disc of `radius` at each pose.
    pub fn circular(poses: Vec<Pose2D>, radius: f32) -> Self {
        Self::new(poses, Footprint::Circle { radius })
    }

    /// Path checked with the outline `points` transformed by each pose.
    pub fn polygonal(poses: Vec<Pose2D>, points: Vec<WorldPoint>) -> Self {
        Self::new(poses, Footprint::Polygon(points))
    }

    pub fn with_conservative(mut self, conservative: bool) -> Self {
        self.conservative = conservative;
        self
    }

    pub fn with_untraversable_polygon(mut self, compute: bool) -> Self {
        self.compute_untraversable_polygon = compute;
        self
    }
}
