//! Core value types shared by every layer of the crate.
//!
//! - [`GridCoord`]: integer cell index
//! - [`WorldPoint`]: planar position in meters
//! - [`Pose2D`]: planar pose (position + heading)

mod point;
mod pose;

pub use point::{GridCoord, WorldPoint};
pub use pose::{Pose2D, normalize_angle};
