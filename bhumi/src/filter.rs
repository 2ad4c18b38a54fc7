//! Filter chain seam.
//!
//! The filter chain turns an elevation map into the base traversability
//! layers (`traversability`, `slope`, `step`, `roughness`). The algorithms
//! themselves live outside this crate; [`PassThroughFilter`] forwards layers
//! that were already computed upstream.

use crate::error::{Result, TraversabilityError};
use crate::grid::GridMap;
use crate::grid::layers::TRAVERSABILITY_LAYERS;

/// Trait for elevation to traversability filter pipelines.
///
/// # Example
///
/// ```rust,ignore
/// use bhumi::filter::{FilterChain, PassThroughFilter};
///
/// let chain = PassThroughFilter;
/// let traversability = chain.update(&elevation, &previous)?;
/// ```
pub trait FilterChain: Send + Sync {
    /// Compute a new traversability map.
    ///
    /// `previous` is the last published traversability map (possibly empty).
    /// The result must carry every layer in [`TRAVERSABILITY_LAYERS`].
    fn update(&self, elevation: &GridMap, previous: &GridMap) -> Result<GridMap>;

    /// Get the name of this filter chain for diagnostics.
    fn name(&self) -> &'static str;
}

/// Forwards precomputed base layers.
///
/// Uses the elevation map itself when it already carries the base layers,
/// otherwise keeps the previous traversability map.
#[derive(Clone, Copy, Debug, Default)]
pub struct PassThroughFilter;

impl FilterChain for PassThroughFilter {
    fn update(&self, elevation: &GridMap, previous: &GridMap) -> Result<GridMap> {
        let Some(missing) = elevation.missing_layer(&TRAVERSABILITY_LAYERS) else {
            return Ok(elevation.clone());
        };
        if previous.missing_layer(&TRAVERSABILITY_LAYERS).is_none() {
            return Ok(previous.clone());
        }
        Err(TraversabilityError::FilterChain(format!(
            "{}: elevation map has no '{missing}' layer",
            self.name()
        )))
    }

    fn name(&self) -> &'static str {
        "PassThroughFilter"
    }
}
