//! Texture scaling for tiled plane textures.

/// How texture coordinates outside the [0, 1] range are handled.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextureAddressing {
    /// Coordinates are clamped to the edge of the texture.
    #[default]
    Clamped,
    /// The texture repeats.
    Repeating,
}

/// Number of times a texture repeats along the U and V axes of a surface.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TextureScale {
    pub u_repeats: f32,
    pub v_repeats: f32,
}

impl TextureScale {
    /// A single copy of the texture covering the surface.
    pub const UNIT: Self = Self {
        u_repeats: 1.0,
        v_repeats: 1.0,
    };

    /// Computes the scale for a surface with the given width and depth in
    /// meters, so that one copy of the texture covers one square meter.
    ///
    /// A surface larger than one meter along an axis repeats the texture
    /// along that axis. A smaller surface shows only part of the texture
    /// rather than squashing the whole texture into it, so the repeat count
    /// never exceeds one for sub-meter extents.
    pub fn for_extent(width: f32, depth: f32) -> Self {
        Self {
            u_repeats: width.max(0.0),
            v_repeats: depth.max(0.0),
        }
    }
}
