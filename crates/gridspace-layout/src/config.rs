#![forbid(unsafe_code)]

//! File-backed configuration for the detector and the separation engine.
//!
//! ```toml
//! # gridspace.toml
//! [detector]
//! minSpacingThreshold = 1.5
//! ignoreDiagonalTouching = false
//!
//! [separation]
//! gapSize = 2
//! boundaryHandling = "strict"
//! ```
//!
//! Missing tables and fields fall back to the defaults of
//! [`DetectorOptions`] and [`SeparationOptions`], so an empty file is valid.

use std::path::Path;

use serde::{Deserialize, Serialize};

use gridspace_core::{DetectorOptions, SeparationOptions};

/// Deepest cascade a configuration may request.
pub const MAX_CONFIGURED_CASCADE_DEPTH: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GridspaceConfig {
    pub detector: DetectorOptions,
    pub separation: SeparationOptions,
}

impl GridspaceConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Load by extension: `.json` is JSON, anything else is TOML.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let config = if is_json {
            Self::from_json_file(path)?
        } else {
            Self::from_toml_file(path)?
        };
        let errors = config.validate();
        if errors.is_empty() {
            Ok(config)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Returns every problem found; an empty list means the config is usable.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let threshold = self.detector.min_spacing_threshold;
        if !threshold.is_finite() || threshold < 0.0 {
            errors.push(format!(
                "detector.minSpacingThreshold must be a non-negative number, got {threshold}"
            ));
        }
        if !self.separation.conservative_mode && self.separation.gap_size == 0 {
            errors.push("separation.gapSize must be at least 1 outside conservative mode".into());
        }
        if self.separation.max_cascade_depth > MAX_CONFIGURED_CASCADE_DEPTH {
            errors.push(format!(
                "separation.maxCascadeDepth must be at most {MAX_CONFIGURED_CASCADE_DEPTH}, got {}",
                self.separation.max_cascade_depth
            ));
        }
        errors
    }
}

/// Errors that can occur when loading a configuration.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Toml(toml::de::Error),
    Json(serde_json::Error),
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => write!(f, "validation errors: {}", errors.join("; ")),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Toml(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridspace_core::BoundaryHandling;

    #[test]
    fn empty_toml_is_default() {
        let config = GridspaceConfig::from_toml_str("").expect("parse");
        assert_eq!(config, GridspaceConfig::default());
        assert!(config.validate().is_empty());
    }

    #[test]
    fn toml_tables_override_fields() {
        let config = GridspaceConfig::from_toml_str(
            r#"
                [detector]
                minSpacingThreshold = 1.5
                ignoreDiagonalTouching = false

                [separation]
                gapSize = 2
                boundaryHandling = "strict"
            "#,
        )
        .expect("parse");
        assert_eq!(config.detector.min_spacing_threshold, 1.5);
        assert!(!config.detector.ignore_diagonal_touching);
        assert!(config.detector.consider_visual_spacing);
        assert_eq!(config.separation.gap_size, 2);
        assert_eq!(config.separation.boundary_handling, BoundaryHandling::Strict);
        assert_eq!(config.separation.max_cascade_depth, 2);
    }

    #[test]
    fn json_is_accepted() {
        let config = GridspaceConfig::from_json_str(
            r#"{"separation":{"conservativeMode":false,"maxCascadeDepth":3}}"#,
        )
        .expect("parse");
        assert!(!config.separation.conservative_mode);
        assert_eq!(config.separation.max_cascade_depth, 3);
    }

    #[test]
    fn validation_collects_every_problem() {
        let mut config = GridspaceConfig::default();
        config.detector.min_spacing_threshold = -1.0;
        config.separation.conservative_mode = false;
        config.separation.gap_size = 0;
        config.separation.max_cascade_depth = 40;
        assert_eq!(config.validate().len(), 3);
    }

    #[test]
    fn bad_toml_reports_parse_error() {
        let err = GridspaceConfig::from_toml_str("[separation]\ngapSize = \"wide\"")
            .expect_err("type mismatch");
        assert!(matches!(err, ConfigError::Toml(_)));
        assert!(err.to_string().starts_with("TOML parse error"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = GridspaceConfig::from_path("/nonexistent/gridspace.toml").expect_err("missing");
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
