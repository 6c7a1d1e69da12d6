//! Explosion impulses on dynamic bodies.
//!
//! An explosion pushes every dynamic body within a fixed range away from the
//! explosion origin. The strength falls off quadratically with the distance
//! from the origin and vanishes at the maximum distance. The impulse is meant
//! to be applied off-center on each body so that it starts spinning as well
//! as moving.

use crate::{
    ConfigError, DynamicBodyID, fph,
    quantities::{Displacement, Impulse, Position},
    require_finite, require_non_negative, require_positive,
};
use nalgebra::{point, vector};
use thiserror::Error;

/// How the distance between an explosion origin and a body is measured.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum FalloffMetric {
    /// `sqrt(dx² + dy² + 2 dz²)`. The depth axis counts twice as much as the
    /// others.
    #[default]
    Asymmetric,
    /// The ordinary Euclidean norm, `sqrt(dx² + dy² + dz²)`.
    Euclidean,
    /// `sqrt(dx² + dy² + 2 dz)`, where the depth component enters linearly.
    /// The radicand can become negative for bodies in front of the origin, in
    /// which case the distance is undefined.
    UnsquaredDepth,
}

/// Configuration parameters for explosions.
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
#[derive(Clone, Debug, PartialEq)]
pub struct ExplosionConfig {
    /// Bodies at or beyond this distance from the origin are unaffected.
    pub max_distance: fph,
    /// Multiplier for the squared falloff term.
    pub strength: fph,
    /// How far below the hit point the explosion origin is placed, so that
    /// bodies resting on the surface are pushed upwards.
    pub origin_depth: fph,
    /// The point in each body's local frame where the impulse is applied.
    pub application_point: [fph; 3],
    /// How distances from the origin are measured.
    pub metric: FalloffMetric,
}

/// A single explosion, located at its world-space origin.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Explosion {
    pub origin: Position,
}

/// Computes explosion impulses for dynamic bodies.
#[derive(Clone, Debug)]
pub struct ExplosionSolver {
    config: ExplosionConfig,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExplosionError {
    #[error("Body {body} is at the explosion origin, so the impulse direction is undefined")]
    DegenerateDistance { body: DynamicBodyID },
}

impl FalloffMetric {
    /// Computes the distance corresponding to the given displacement from the
    /// explosion origin. Returns [`None`] if the distance is zero or
    /// undefined.
    pub fn distance(&self, displacement: &Displacement) -> Option<fph> {
        let (x, y, z) = (displacement.x, displacement.y, displacement.z);
        let radicand = match self {
            Self::Asymmetric => x * x + y * y + 2.0 * z * z,
            Self::Euclidean => x * x + y * y + z * z,
            Self::UnsquaredDepth => x * x + y * y + 2.0 * z,
        };
        let distance = radicand.sqrt();
        (distance.is_finite() && distance > 0.0).then_some(distance)
    }
}

impl ExplosionConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        require_positive("explosion max distance", self.max_distance)?;
        require_non_negative("explosion strength", self.strength)?;
        require_non_negative("explosion origin depth", self.origin_depth)?;
        for coord in self.application_point {
            require_finite("impulse application point coordinate", coord)?;
        }
        Ok(())
    }
}

impl Default for ExplosionConfig {
    fn default() -> Self {
        Self {
            max_distance: 2.0,
            strength: 2.0,
            origin_depth: 0.1,
            application_point: [0.05, 0.05, 0.05],
            metric: FalloffMetric::default(),
        }
    }
}

impl Explosion {
    /// Creates an explosion located the given depth below the given point on
    /// a surface.
    pub fn below_surface_point(surface_point: &Position, depth: fph) -> Self {
        Self {
            origin: surface_point - vector![0.0, depth, 0.0],
        }
    }
}

impl ExplosionSolver {
    pub fn new(config: ExplosionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExplosionConfig {
        &self.config
    }

    /// Creates an explosion below the given hit point on a surface, using the
    /// configured origin depth.
    pub fn explosion_at_hit_point(&self, hit_point: &Position) -> Explosion {
        Explosion::below_surface_point(hit_point, self.config.origin_depth)
    }

    /// The point in a body's local frame where explosion impulses should be
    /// applied.
    pub fn application_point(&self) -> Position {
        let [x, y, z] = self.config.application_point;
        point![x, y, z]
    }

    /// Computes the impulse the explosion at `origin` imparts on the body with
    /// the given ID at the given position.
    ///
    /// The falloff is evaluated at the distance given by the configured
    /// metric, while the impulse points along the Euclidean unit direction
    /// away from the origin. The magnitude of the impulse is thus exactly the
    /// falloff factor.
    ///
    /// # Errors
    /// Returns [`ExplosionError::DegenerateDistance`] if the distance between
    /// the body and the origin is zero or undefined.
    pub fn compute_impulse(
        &self,
        origin: &Position,
        body: DynamicBodyID,
        body_position: &Position,
    ) -> Result<Impulse, ExplosionError> {
        let displacement = body_position - origin;

        let distance = self
            .config
            .metric
            .distance(&displacement)
            .ok_or(ExplosionError::DegenerateDistance { body })?;

        let scale = fph::max(0.0, self.config.max_distance - distance);
        let magnitude_factor = scale * scale * self.config.strength;

        Ok(displacement.normalize() * magnitude_factor)
    }

    /// Computes the impulse for each of the given bodies.
    ///
    /// # Errors
    /// Returns [`ExplosionError::DegenerateDistance`] for the first body whose
    /// distance to the origin is zero or undefined.
    pub fn compute_impulses(
        &self,
        origin: &Position,
        bodies: impl IntoIterator<Item = (DynamicBodyID, Position)>,
    ) -> Result<Vec<(DynamicBodyID, Impulse)>, ExplosionError> {
        bodies
            .into_iter()
            .map(|(body, position)| {
                self.compute_impulse(origin, body, &position)
                    .map(|impulse| (body, impulse))
            })
            .collect()
    }
}
