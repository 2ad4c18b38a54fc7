//! Traversability queries over a grid snapshot.
//!
//! | Query | Region | Score |
//! |-------|--------|-------|
//! | [`QueryEngine::disc`] | spiral out to `radius_max` | mean, discounted past `radius_min` |
//! | [`QueryEngine::polygon`] | polygon interior | mean |
//! | [`QueryEngine::check_path`] | swept footprint | length or area weighted mean |
//!
//! Cells that fail admissibility make a query untraversable with score 0.
//! Regions the map cannot answer for fall back to the default traversability.

mod engine;
mod footprint;
mod path;
mod result;

pub use engine::{QueryEngine, QuerySettings};
pub use footprint::{Footprint, FootprintPath};
pub use result::{QueryOutcome, TraversabilityResult};
