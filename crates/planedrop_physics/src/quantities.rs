//! Physical quantities.

use crate::fph;
use nalgebra::{Point3, Vector3};

/// A position in 3D space.
pub type Position = Point3<fph>;

/// A displacement between two positions in 3D space.
pub type Displacement = Vector3<fph>;

/// A 3D impulse (change in momentum).
pub type Impulse = Vector3<fph>;
