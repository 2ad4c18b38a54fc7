//! Error types for Bhumi

use thiserror::Error;

use crate::config::ConfigLoadError;

/// Structural failures reported to the caller.
///
/// Geometric edge cases (positions outside the map, empty regions, windows
/// that do not fit) are not errors; they resolve to the default
/// traversability.
#[derive(Error, Debug)]
pub enum TraversabilityError {
    #[error("Frame mismatch: expected '{expected}', got '{actual}'")]
    FrameMismatch { expected: String, actual: String },

    #[error("Missing layer: {0}")]
    MissingLayer(String),

    #[error("Elevation map not initialized")]
    ElevationMapUninitialized,

    #[error("Traversability map not initialized")]
    TraversabilityMapUninitialized,

    #[error("Filter chain failed: {0}")]
    FilterChain(String),

    #[error("Traversability map replaced during computation")]
    MapReplaced,

    #[error("Path has no poses")]
    EmptyPath,

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigLoadError),
}

pub type Result<T> = std::result::Result<T, TraversabilityError>;
