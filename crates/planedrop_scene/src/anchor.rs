//! Plane anchors reported by the tracking engine.

use nalgebra::{Point3, Vector2, Vector3};
use std::fmt;
use uuid::Uuid;

/// Opaque identifier the tracking engine assigns to an anchor.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AnchorID(Uuid);

/// The latest estimate of a tracked plane, in the frame of its anchor.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct PlaneAnchor {
    /// Center of the plane relative to the anchor.
    pub center: Point3<f32>,
    /// Extent of the plane. The x- and z-components are the width and depth of
    /// the surface, the y-component its vertical extent (zero for an ideal
    /// horizontal plane).
    pub extent: Vector3<f32>,
}

impl AnchorID {
    /// Creates a new random anchor ID.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }

    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for AnchorID {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for AnchorID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl PlaneAnchor {
    pub fn new(center: Point3<f32>, extent: Vector3<f32>) -> Self {
        Self { center, extent }
    }

    /// The width and depth of the surface.
    pub fn surface_extent(&self) -> Vector2<f32> {
        Vector2::new(self.extent.x, self.extent.z)
    }

    /// The vertical extent of the plane.
    pub fn vertical_extent(&self) -> f32 {
        self.extent.y
    }
}
