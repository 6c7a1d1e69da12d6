//! Session configuration.

use crate::{gesture::GestureConfig, headless::HeadlessCameraConfig, io};
use anyhow::{Context, Result};
use planedrop_physics::PhysicsConfig;
use planedrop_scene::PlaneVisualConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration parameters for a session. Every section falls back to its
/// defaults when omitted from a configuration file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub tracking: TrackingConfig,
    pub display: DisplayConfig,
    pub physics: PhysicsConfig,
    pub planes: PlaneVisualConfig,
    pub gestures: GestureConfig,
    /// Camera used for hit testing when running without an AR engine.
    pub headless_camera: HeadlessCameraConfig,
}

/// Configuration parameters for world tracking.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    /// Whether horizontal planes are detected when the session starts.
    pub plane_detection: bool,
}

/// Debug overlays and lighting for the host's view.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub show_statistics: bool,
    pub show_world_origin: bool,
    pub show_feature_points: bool,
    pub default_lighting: bool,
}

impl SessionConfig {
    /// Parses the configuration from the RON file at the given path and
    /// validates it.
    pub fn from_ron_file(file_path: impl AsRef<Path>) -> Result<Self> {
        let file_path = file_path.as_ref();
        let config: Self = io::parse_ron_file(file_path)?;
        config
            .validate()
            .with_context(|| format!("Invalid configuration in {}", file_path.display()))?;
        Ok(config)
    }

    /// Checks that all parameters are within their valid ranges.
    pub fn validate(&self) -> Result<()> {
        self.physics.validate()?;
        self.gestures.validate()?;
        self.headless_camera.validate()
    }
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            plane_detection: true,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_statistics: true,
            show_world_origin: true,
            show_feature_points: true,
            default_lighting: true,
        }
    }
}
