//! User-inserted dynamic bodies.

use crate::{
    ConfigError, collision::CollisionCategory, fph, quantities::Position, require_non_negative,
    require_positive,
};
use nalgebra::vector;
use std::fmt;

/// Identifier for a [`DynamicBody`].
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DynamicBodyID(u64);

/// A physics-simulated cube inserted by the user.
///
/// The position is the world position at insertion. Once the body is handed
/// to the host, the host's simulation owns its motion.
#[derive(Clone, Debug, PartialEq)]
pub struct DynamicBody {
    id: DynamicBodyID,
    position: Position,
    mass: fph,
    dimension: fph,
    collision_category: CollisionCategory,
}

/// Configuration parameters for inserting dynamic bodies.
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
#[derive(Clone, Debug, PartialEq)]
pub struct InsertionConfig {
    /// How far above the hit point a new body is placed, so that it drops
    /// onto the surface.
    pub height_offset: fph,
    /// The mass of each new body.
    pub mass: fph,
    /// The side length of each new cube.
    pub cube_dimension: fph,
}

/// Append-only collection of the dynamic bodies inserted during a session.
///
/// Bodies are never removed while the session runs, so the collection grows
/// by one for every insertion.
#[derive(Clone, Debug)]
pub struct DynamicBodyCollection {
    config: InsertionConfig,
    bodies: Vec<DynamicBody>,
    id_counter: u64,
}

impl DynamicBodyID {
    /// Converts the given `u64` into a body ID. Should only be called with
    /// values returned from [`Self::as_u64`].
    pub const fn from_u64(value: u64) -> Self {
        Self(value)
    }

    /// Returns the `u64` value of the ID.
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for DynamicBodyID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl DynamicBody {
    pub fn id(&self) -> DynamicBodyID {
        self.id
    }

    /// The world position of the body when it was inserted.
    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn mass(&self) -> fph {
        self.mass
    }

    /// The side length of the cube.
    pub fn dimension(&self) -> fph {
        self.dimension
    }

    pub fn collision_category(&self) -> CollisionCategory {
        self.collision_category
    }
}

impl InsertionConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        require_non_negative("insertion height offset", self.height_offset)?;
        require_positive("body mass", self.mass)?;
        require_positive("cube dimension", self.cube_dimension)
    }
}

impl Default for InsertionConfig {
    fn default() -> Self {
        Self {
            height_offset: 0.1,
            mass: 2.0,
            cube_dimension: 0.1,
        }
    }
}

impl DynamicBodyCollection {
    /// Creates a new empty collection that will insert bodies according to
    /// the given configuration.
    pub fn new(config: InsertionConfig) -> Self {
        Self {
            config,
            bodies: Vec::new(),
            id_counter: 0,
        }
    }

    pub fn config(&self) -> &InsertionConfig {
        &self.config
    }

    /// Creates a new cube slightly above the given point, registers it in the
    /// collection and returns its ID.
    pub fn insert_body(&mut self, origin: &Position) -> DynamicBodyID {
        let id = self.create_new_id();

        let body = DynamicBody {
            id,
            position: origin + vector![0.0, self.config.height_offset, 0.0],
            mass: self.config.mass,
            dimension: self.config.cube_dimension,
            collision_category: CollisionCategory::CUBE,
        };

        planedrop_log::debug!(
            "Inserted dynamic body {} at ({:.3}, {:.3}, {:.3})",
            id,
            body.position.x,
            body.position.y,
            body.position.z
        );

        self.bodies.push(body);
        id
    }

    /// Returns the body with the given ID, or [`None`] if it does not exist.
    pub fn get(&self, id: DynamicBodyID) -> Option<&DynamicBody> {
        // IDs are handed out in increasing order and bodies are only appended
        let idx = self
            .bodies
            .binary_search_by_key(&id, DynamicBody::id)
            .ok()?;
        Some(&self.bodies[idx])
    }

    /// The number of bodies in the collection.
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Returns an iterator over all bodies, in insertion order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &DynamicBody> {
        self.bodies.iter()
    }

    /// Removes all bodies. IDs handed out before the call are not reused.
    pub fn clear(&mut self) {
        self.bodies.clear();
    }

    fn create_new_id(&mut self) -> DynamicBodyID {
        let id = DynamicBodyID(self.id_counter);
        self.id_counter += 1;
        id
    }
}
