//! Bookkeeping of tracked plane anchors and their visual representation.

pub mod anchor;
pub mod material;
pub mod mesh;
pub mod plane;
pub mod registry;
pub mod texture;

pub use anchor::{AnchorID, PlaneAnchor};
pub use material::{PlaneMaterial, RGBAColor};
pub use mesh::{PlaneMesh, PlaneVertex};
pub use plane::{Plane, PlaneGeometry, PlaneVisibility};
pub use registry::{PlaneRegistry, RegistryError};
pub use texture::{TextureAddressing, TextureScale};

/// Configuration parameters for how planes are visualized.
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
#[derive(Clone, Debug, PartialEq)]
pub struct PlaneVisualConfig {
    /// Name of the grid texture tiled across visible planes.
    pub grid_texture: String,
    /// Color applied to every face of a hidden plane.
    pub hidden_color: RGBAColor,
}

impl Default for PlaneVisualConfig {
    fn default() -> Self {
        Self {
            grid_texture: "tron-grid".to_string(),
            hidden_color: RGBAColor::CLEAR,
        }
    }
}
