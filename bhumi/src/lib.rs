//! # Bhumi
//!
//! Terrain traversability assessment over layered elevation grids.
//!
//! ## Overview
//!
//! Bhumi answers three questions about a robot's surroundings:
//!
//! - **Disc** - is the area around a point traversable?
//! - **Polygon** - is a footprint placed on the map traversable?
//! - **Path** - is a footprint swept along a pose sequence traversable?
//!
//! Each answer carries a score in [0, 1], a safety flag and optionally the
//! convex outline of the obstructing cells.
//!
//! A cell is *admissible* when it passes the slope, step and (optionally)
//! roughness checks. Each check inspects a neighbourhood of base layers
//! supplied by a filter chain and memoizes its verdict in a `*_footprint`
//! cache layer.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use bhumi::{FootprintPath, Pose2D, TraversabilityConfig, TraversabilityMap};
//!
//! let map = TraversabilityMap::new(TraversabilityConfig::load_default()?);
//! map.set_elevation_map(elevation, 0.0)?;
//! map.compute_traversability()?;
//!
//! let path = FootprintPath::circular(
//!     vec![Pose2D::new(0.0, 0.0, 0.0), Pose2D::new(1.0, 0.0, 0.0)],
//!     0.25,
//! );
//! let result = map.check_footprint_path(&path)?;
//! println!("safe: {}, score: {:.2}", result.is_safe, result.traversability);
//! ```
//!
//! ## Concurrency
//!
//! [`TraversabilityMap`] is shared by reference between an updater and any
//! number of query callers. Grids are copied out of their [`MapStore`],
//! worked on without a lock and committed back.
//!
//! ## Coordinate System
//!
//! Uses ROS REP-103 convention:
//! - X: Forward (positive ahead of robot)
//! - Y: Left (positive to robot's left)
//! - Theta: Rotation in radians, CCW positive from +X axis

pub mod admissibility;
pub mod config;
pub mod core;
pub mod error;
pub mod filter;
pub mod geometry;
pub mod grid;
pub mod map;
pub mod publish;
pub mod query;
pub mod store;
pub mod terrain;

// Re-export commonly used types
pub use admissibility::{AdmissibilityConfig, AdmissibilityEvaluator, Stage};
pub use config::{ConfigLoadError, TraversabilityConfig};
pub use core::{GridCoord, Pose2D, WorldPoint};
pub use error::{Result, TraversabilityError};
pub use filter::{FilterChain, PassThroughFilter};
pub use geometry::{Polygon, convex_hull, convex_hull_of_polygons};
pub use grid::GridMap;
pub use map::TraversabilityMap;
pub use publish::{MapPublisher, NullPublisher};
pub use query::{
    Footprint, FootprintPath, QueryEngine, QueryOutcome, QuerySettings, TraversabilityResult,
};
pub use store::{Checkout, MapStore};
pub use terrain::CameraFrame;
