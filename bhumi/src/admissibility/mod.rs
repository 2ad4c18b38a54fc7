//! Per-cell admissibility: may the robot stand on this cell?
//!
//! A cell is admissible when every configured stage passes. Stages run in a
//! fixed order and the first failure ends the evaluation:
//!
//! ```text
//!   cell ──▶ Slope ──▶ Step ──▶ Roughness (optional) ──▶ admissible
//!              │         │          │
//!              └─────────┴──────────┴──▶ inadmissible
//! ```
//!
//! Each stage only does work when its base layer is exactly 0 at the cell.
//! The verdict is then memoized as 0.0 / 1.0 in the stage's `*_footprint`
//! layer, so a repeated query is a single lookup. Callers reset the caches
//! with [`AdmissibilityEvaluator::reset_caches`] once per new set of base
//! layers, never in the middle of a query.
//!
//! ## Stages
//!
//! | Stage | Base layer | Cache layer | Search |
//! |-------|------------|-------------|--------|
//! | [`Stage::Slope`] | `slope` | `slope_footprint` | count zero-slope cells in a disc |
//! | [`Stage::Step`] | `step` | `step_footprint` | trace drops for walls and open gaps |
//! | [`Stage::Roughness`] | `roughness` | `roughness_footprint` | count zero-roughness cells in a disc |

mod step;
mod window;

pub use window::critical_count;

use crate::config::TraversabilityConfig;
use crate::core::GridCoord;
use crate::grid::GridMap;
use crate::grid::layers::{
    FOOTPRINT_CACHE_LAYERS, ROUGHNESS, ROUGHNESS_FOOTPRINT, SLOPE, SLOPE_FOOTPRINT, STEP,
    STEP_FOOTPRINT,
};

/// One admissibility criterion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    Slope,
    Step,
    Roughness,
}

impl Stage {
    /// Filter-supplied layer the stage reads.
    pub fn base_layer(self) -> &'static str {
        match self {
            Stage::Slope => SLOPE,
            Stage::Step => STEP,
            Stage::Roughness => ROUGHNESS,
        }
    }

    /// Layer the stage memoizes its verdict in.
    pub fn cache_layer(self) -> &'static str {
        match self {
            Stage::Slope => SLOPE_FOOTPRINT,
            Stage::Step => STEP_FOOTPRINT,
            Stage::Roughness => ROUGHNESS_FOOTPRINT,
        }
    }
}

/// Parameters of the admissibility stages.
#[derive(Clone, Debug, PartialEq)]
pub struct AdmissibilityConfig {
    /// Highest climbable / descendable step (meters)
    pub critical_step_height: f32,
    /// Widest bridgeable gap (meters)
    pub max_gap_width: f32,
    /// Enable the roughness stage
    pub check_roughness: bool,
    /// Slope/roughness search radius in cells
    pub window_factor: f32,
    pub slope_count_factor: f32,
    pub roughness_count_factor: f32,
    pub critical_length_divisor: f32,
    /// Step search radius and window edge in cells
    pub step_window_factor: f32,
    /// Shortest direction vector the step search follows (meters)
    pub min_direction_norm: f32,
}

impl Default for AdmissibilityConfig {
    fn default() -> Self {
        TraversabilityConfig::default().to_admissibility_config()
    }
}

/// Ordered, short-circuiting admissibility check with memo caches.
#[derive(Clone, Debug)]
pub struct AdmissibilityEvaluator {
    config: AdmissibilityConfig,
    stages: Vec<Stage>,
}

impl Default for AdmissibilityEvaluator {
    fn default() -> Self {
        Self::new(AdmissibilityConfig::default())
    }
}

impl AdmissibilityEvaluator {
    /// Slope and step always run; roughness only when enabled.
    pub fn new(config: AdmissibilityConfig) -> Self {
        let mut stages = vec![Stage::Slope, Stage::Step];
        if config.check_roughness {
            stages.push(Stage::Roughness);
        }
        Self { config, stages }
    }

    pub fn config(&self) -> &AdmissibilityConfig {
        &self.config
    }

    /// Stages in evaluation order.
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Whether the robot may stand on `cell`.
    ///
    /// May write the `*_footprint` caches of `map`.
    pub fn is_admissible(&self, map: &mut GridMap, cell: GridCoord) -> bool {
        self.stages.iter().all(|&stage| self.passes(stage, map, cell))
    }

    /// Evaluate a single stage.
    pub fn passes(&self, stage: Stage, map: &mut GridMap, cell: GridCoord) -> bool {
        match stage {
            Stage::Slope => {
                window::check_window(&self.config, stage, self.config.slope_count_factor, map, cell)
            }
            Stage::Roughness => window::check_window(
                &self.config,
                stage,
                self.config.roughness_count_factor,
                map,
                cell,
            ),
            Stage::Step => step::check_step(&self.config, map, cell),
        }
    }

    /// Invalidate all footprint caches, creating the layers if needed.
    pub fn reset_caches(map: &mut GridMap) {
        for layer in FOOTPRINT_CACHE_LAYERS {
            map.add_layer(layer);
        }
    }
}
