//! Collision categories and surface colliders.

use crate::fph;
use bitflags::bitflags;

bitflags! {
    /// Bitflags identifying which collision categories a body belongs to.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    pub struct CollisionCategory: u32 {
        /// Static or kinematic surfaces, such as detected planes.
        const PLANE = 1 << 0;
        /// Dynamic cubes inserted by the user.
        const CUBE = 1 << 1;
    }
}

/// A flat box collider for a tracked surface. The host attaches it to the
/// surface's node as a kinematic body, so that dynamic bodies come to rest on
/// the surface without the surface being moved by them.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SurfaceCollider {
    width: fph,
    depth: fph,
    category: CollisionCategory,
}

impl CollisionCategory {
    /// Whether bodies in this category are moved by the physics simulation.
    pub fn is_dynamic(&self) -> bool {
        self.contains(Self::CUBE)
    }
}

impl SurfaceCollider {
    /// Creates a collider covering a surface of the given width and depth.
    /// Negative extents are clamped to zero.
    pub fn for_surface(width: fph, depth: fph) -> Self {
        Self {
            width: width.max(0.0),
            depth: depth.max(0.0),
            category: CollisionCategory::PLANE,
        }
    }

    /// Extent of the collider along the x-axis of the surface node.
    pub fn width(&self) -> fph {
        self.width
    }

    /// Extent of the collider along the z-axis of the surface node.
    pub fn depth(&self) -> fph {
        self.depth
    }

    pub fn category(&self) -> CollisionCategory {
        self.category
    }

    /// Whether the host should drive the collider's body kinematically
    /// rather than simulating it.
    pub fn is_kinematic(&self) -> bool {
        !self.category.is_dynamic()
    }
}
