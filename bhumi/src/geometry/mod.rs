//! Polygon construction and measurement.
//!
//! - [`Polygon`]: vertex list with frame id and timestamp
//! - [`convex_hull`]: hull of a point set
//! - [`convex_hull_of_polygons`]: hull of two footprints, used to sweep a
//!   footprint between consecutive path poses

mod hull;
mod polygon;

pub use hull::{convex_hull, convex_hull_of_polygons};
pub use polygon::Polygon;
