//! Lazy cell sequences over a grid.
//!
//! | Iterator | Order | Membership |
//! |----------|-------|------------|
//! | [`FullIter`] | row-major | every cell |
//! | [`LineIter`] | start → end | Bresenham trace, both ends included |
//! | [`DiscIter`] | row-major | cell centre within radius of a position |
//! | [`SpiralIter`] | non-decreasing radius | within radius of the centre cell |
//! | [`PolygonIter`] | row-major | cell centre inside a polygon |
//!
//! All iterators are finite and can be dropped early. Apart from the
//! polygon they iterate over, none of them borrows the grid, so layers can be
//! written while a search is in progress.

mod disc;
mod full;
mod line;
mod polygon;
mod spiral;

pub use disc::DiscIter;
pub use full::FullIter;
pub use line::LineIter;
pub use polygon::PolygonIter;
pub use spiral::SpiralIter;
