//! Materials for plane visuals.

use crate::texture::{TextureAddressing, TextureScale};
use std::sync::Arc;

/// A linear RGBA color.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RGBAColor {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
    pub alpha: f32,
}

/// The material applied to one face of a plane's geometry.
#[derive(Clone, Debug, PartialEq)]
pub enum PlaneMaterial {
    /// A grid texture tiled across the surface.
    Grid {
        texture: Arc<str>,
        scale: TextureScale,
        addressing_u: TextureAddressing,
        addressing_v: TextureAddressing,
    },
    /// A uniform color that does not depend on lighting.
    Uniform { color: RGBAColor },
}

impl RGBAColor {
    /// Fully transparent white.
    pub const CLEAR: Self = Self::new(1.0, 1.0, 1.0, 0.0);

    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    pub fn is_transparent(&self) -> bool {
        self.alpha <= 0.0
    }
}

impl PlaneMaterial {
    /// Creates a grid material that repeats the given texture according to
    /// the given scale.
    pub fn grid(texture: Arc<str>, scale: TextureScale) -> Self {
        Self::Grid {
            texture,
            scale,
            addressing_u: TextureAddressing::Repeating,
            addressing_v: TextureAddressing::Repeating,
        }
    }

    pub fn uniform(color: RGBAColor) -> Self {
        Self::Uniform { color }
    }

    /// Whether nothing of a surface with this material is visible.
    pub fn is_transparent(&self) -> bool {
        match self {
            Self::Grid { .. } => false,
            Self::Uniform { color } => color.is_transparent(),
        }
    }

    /// Updates the texture scale if this is a grid material.
    pub fn rescale_texture(&mut self, new_scale: TextureScale) {
        if let Self::Grid { scale, .. } = self {
            *scale = new_scale;
        }
    }
}

impl Default for PlaneMaterial {
    fn default() -> Self {
        Self::uniform(RGBAColor::CLEAR)
    }
}
