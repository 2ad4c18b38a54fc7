//! Planar robot pose.
//!
//! Right-handed frame, counter-clockwise positive heading.

use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};

use super::point::WorldPoint;

/// Normalize an angle to [-π, π).
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped >= PI { wrapped - TAU } else { wrapped }
}

/// Position and heading of the robot in the map frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose2D {
    /// X position in meters.
    pub x: f32,
    /// Y position in meters.
    pub y: f32,
    /// Heading in radians [-π, π), CCW positive from X-axis.
    pub theta: f32,
}

impl Pose2D {
    /// Create a new pose (heading is normalized).
    #[inline]
    pub fn new(x: f32, y: f32, theta: f32) -> Self {
        Self {
            x,
            y,
            theta: normalize_angle(theta),
        }
    }

    /// Origin, facing +X.
    #[inline]
    pub const fn identity() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            theta: 0.0,
        }
    }

    /// Pose at `position` with heading `theta`.
    #[inline]
    pub fn from_position(position: WorldPoint, theta: f32) -> Self {
        Self::new(position.x, position.y, theta)
    }

    /// Position part of the pose.
    #[inline]
    pub fn position(self) -> WorldPoint {
        WorldPoint::new(self.x, self.y)
    }

    /// Transform a point from this pose's local frame to the map frame.
    #[inline]
    pub fn transform_point(self, point: WorldPoint) -> WorldPoint {
        let (sin, cos) = self.theta.sin_cos();
        WorldPoint {
            x: self.x + point.x * cos - point.y * sin,
            y: self.y + point.x * sin + point.y * cos,
        }
    }
}
