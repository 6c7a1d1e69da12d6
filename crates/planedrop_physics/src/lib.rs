//! Dynamic bodies and explosion impulses.

pub mod body;
pub mod collision;
pub mod explosion;
pub mod quantities;

pub use body::{DynamicBody, DynamicBodyCollection, DynamicBodyID, InsertionConfig};
pub use collision::{CollisionCategory, SurfaceCollider};
pub use explosion::{Explosion, ExplosionConfig, ExplosionError, ExplosionSolver, FalloffMetric};

use thiserror::Error;

/// Floating point type used for physics quantities.
#[allow(non_camel_case_types)]
pub type fph = f32;

/// Configuration parameters for physics.
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PhysicsConfig {
    /// How new dynamic bodies are placed and set up.
    pub insertion: InsertionConfig,
    /// How explosion impulses are computed and applied.
    pub explosion: ExplosionConfig,
}

/// An invalid physics configuration parameter.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid {parameter}: {value} (must be positive)")]
    NotPositive { parameter: &'static str, value: fph },

    #[error("Invalid {parameter}: {value} (must not be negative)")]
    Negative { parameter: &'static str, value: fph },

    #[error("Invalid {parameter}: {value} (must be finite)")]
    NotFinite { parameter: &'static str, value: fph },
}

impl PhysicsConfig {
    /// Checks that all parameters are within their valid ranges.
    ///
    /// # Errors
    /// Returns the first invalid parameter encountered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.insertion.validate()?;
        self.explosion.validate()
    }
}

pub(crate) fn require_positive(parameter: &'static str, value: fph) -> Result<(), ConfigError> {
    require_finite(parameter, value)?;
    if value <= 0.0 {
        return Err(ConfigError::NotPositive { parameter, value });
    }
    Ok(())
}

pub(crate) fn require_non_negative(
    parameter: &'static str,
    value: fph,
) -> Result<(), ConfigError> {
    require_finite(parameter, value)?;
    if value < 0.0 {
        return Err(ConfigError::Negative { parameter, value });
    }
    Ok(())
}

pub(crate) fn require_finite(parameter: &'static str, value: fph) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NotFinite { parameter, value });
    }
    Ok(())
}
