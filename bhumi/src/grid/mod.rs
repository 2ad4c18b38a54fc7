//! Layered spatial grid.
//!
//! A [`GridMap`] stores any number of named `f32` layers over the same
//! rectangular cell lattice:
//!
//! ```text
//!   y ▲
//!     │ ┌───┬───┬───┐  elevation      [e e e e e e ...]
//!     │ │6,1│7,1│8,1│  slope          [s s s s s s ...]
//!     │ ├───┼───┼───┤  step           [t t t t t t ...]
//!     │ │6,0│7,0│8,0│  traversability [v v v v v v ...]
//!     │ └───┴───┴───┘
//!   origin ──────────▶ x
//! ```
//!
//! - [`layers`]: well-known layer names
//! - [`iterators`]: full, line, disc, spiral and polygon cell sequences
//!
//! Invalid values are `NaN`. Positions outside the grid are reported as
//! `None` / invalid rather than as errors.

pub mod iterators;
pub mod layers;
mod lattice;
mod storage;

pub use iterators::{DiscIter, FullIter, LineIter, PolygonIter, SpiralIter};
pub use lattice::Lattice;
pub use storage::{CellWindow, GridMap};
