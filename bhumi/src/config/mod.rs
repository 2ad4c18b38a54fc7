//! Configuration loading for the traversability map.
//!
//! Everything has a default, so an empty file (or no file) is valid.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use bhumi::config::TraversabilityConfig;
//!
//! // Load from default path (configs/traversability.yaml)
//! let config = TraversabilityConfig::load_default()?.validated();
//!
//! // Convert to runtime configs
//! let admissibility = config.to_admissibility_config();
//! ```
//!
//! ## Configuration Sections
//!
//! | Section | Description |
//! |---------|-------------|
//! | top level | frames, gap width, step height, elevation layer variant |
//! | [`FootprintSection`] | footprint polygon, default score, optional stages |
//! | [`Tunables`] | search window multipliers, path sampling, circle shape |
//!
//! ## Example YAML
//!
//! ```yaml
//! map_frame_id: map
//! max_gap_width: 0.3
//! critical_step_height: 0.12
//! footprint:
//!   traversability_default: 0.5
//!   verify_roughness_footprint: true
//!   polygon:
//!     - { x: 0.3, y: 0.2 }
//!     - { x: -0.3, y: 0.2 }
//!     - { x: -0.3, y: -0.2 }
//!     - { x: 0.3, y: -0.2 }
//! tunables:
//!   path_skip_stride: 3
//! ```

mod defaults;
mod error;
mod traversability;

pub use error::ConfigLoadError;
pub use traversability::{FootprintSection, TraversabilityConfig, Tunables, clamp_traversability};

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = TraversabilityConfig::default();
        assert_eq!(config.map_frame_id, "map");
        assert_relative_eq!(config.max_gap_width, 0.3);
        assert_relative_eq!(config.footprint.traversability_default, 0.5);
        assert!(!config.footprint.verify_roughness_footprint);
        assert!(!config.footprint.check_robot_inclination);
        assert_eq!(config.tunables.path_skip_stride, 3);
        assert_relative_eq!(config.tunables.circle_radius_offset, 0.15);
        assert_eq!(config.tunables.circle_polygon_vertices, 20);
    }

    #[test]
    fn test_empty_yaml_gives_defaults() {
        let config = TraversabilityConfig::from_yaml("{}").unwrap();
        assert_eq!(config, TraversabilityConfig::default());
    }

    #[test]
    fn test_partial_yaml() {
        let yaml = r#"
map_frame_id: odom
critical_step_height: 0.2
footprint:
  check_robot_inclination: true
  polygon:
    - { x: 0.3, y: 0.2 }
    - { x: -0.3, y: 0.2 }
    - { x: -0.3, y: -0.2 }
tunables:
  path_skip_stride: 1
"#;
        let config = TraversabilityConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.map_frame_id, "odom");
        assert_relative_eq!(config.critical_step_height, 0.2);
        assert!(config.footprint.check_robot_inclination);
        assert_eq!(config.footprint.polygon.len(), 3);
        assert_relative_eq!(config.footprint.traversability_default, 0.5);
        assert_eq!(config.tunables.path_skip_stride, 1);
        assert_relative_eq!(config.tunables.window_factor, 3.0);
    }

    #[test]
    fn test_invalid_yaml() {
        let err = TraversabilityConfig::from_yaml("max_gap_width: [1, 2").unwrap_err();
        assert!(matches!(err, ConfigLoadError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let mut config = TraversabilityConfig::default();
        config.max_gap_width = 0.45;
        config.use_raw_map = true;
        file.write_all(config.to_yaml().unwrap().as_bytes()).unwrap();

        let loaded = TraversabilityConfig::load(file.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = TraversabilityConfig::load(&dir.path().join("missing.yaml")).unwrap_err();
        assert!(matches!(err, ConfigLoadError::Io(_)));
    }

    #[test]
    fn test_validated_drops_short_footprint() {
        let mut config = TraversabilityConfig::default();
        config.footprint.polygon = vec![Default::default(), Default::default()];
        config.footprint.traversability_default = 1.7;

        let config = config.validated();
        assert!(config.footprint.polygon.is_empty());
        assert_relative_eq!(config.footprint.traversability_default, 1.0);
    }

    #[test]
    fn test_clamp_traversability() {
        assert_relative_eq!(clamp_traversability(0.6), 0.6);
        assert_relative_eq!(clamp_traversability(-0.2), 0.0);
        assert_relative_eq!(clamp_traversability(3.0), 1.0);
        assert_relative_eq!(clamp_traversability(f32::NAN), 0.0);
    }

    #[test]
    fn test_to_admissibility_config() {
        let mut config = TraversabilityConfig::default();
        config.footprint.verify_roughness_footprint = true;
        let adm = config.to_admissibility_config();
        assert!(adm.check_roughness);
        assert_relative_eq!(adm.max_gap_width, 0.3);
        assert_relative_eq!(adm.step_window_factor, 2.5);
    }
}
