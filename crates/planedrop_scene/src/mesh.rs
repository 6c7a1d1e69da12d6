//! Rectangle meshes for plane visuals.

use crate::texture::TextureScale;
use bytemuck::{Pod, Zeroable};

/// A vertex of a plane mesh, laid out so that a host can upload the vertex
/// buffer directly.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Zeroable, Pod)]
pub struct PlaneVertex {
    pub position: [f32; 3],
    pub texture_coords: [f32; 2],
}

/// A horizontal rectangle mesh with texture coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct PlaneMesh {
    vertices: Vec<PlaneVertex>,
    indices: Vec<u16>,
}

impl PlaneMesh {
    /// Creates a mesh representing a rectangle with the given extents,
    /// centered at the origin and lying in the xz-plane with the front face
    /// pointing along the positive y-direction.
    ///
    /// The texture coordinates run from zero at the `(-x, -z)` corner to the
    /// repeat counts of the given scale at the `(+x, +z)` corner.
    ///
    /// # Panics
    /// If any of the given extents are negative.
    pub fn create_rectangle(extent_x: f32, extent_z: f32, texture_scale: TextureScale) -> Self {
        assert!(
            extent_x >= 0.0,
            "Tried to create rectangle mesh with negative x-extent"
        );
        assert!(
            extent_z >= 0.0,
            "Tried to create rectangle mesh with negative z-extent"
        );

        let hex = extent_x * 0.5;
        let hez = extent_z * 0.5;

        let TextureScale {
            u_repeats: u,
            v_repeats: v,
        } = texture_scale;

        let vertices = vec![
            vertex([-hex, 0.0, -hez], [0.0, 0.0]),
            vertex([hex, 0.0, -hez], [u, 0.0]),
            vertex([hex, 0.0, hez], [u, v]),
            vertex([-hex, 0.0, hez], [0.0, v]),
        ];

        let indices = vec![0, 3, 1, 1, 3, 2];

        Self { vertices, indices }
    }

    pub fn vertices(&self) -> &[PlaneVertex] {
        &self.vertices
    }

    /// Triangle indices into the vertex list, in counter-clockwise order when
    /// seen from the front.
    pub fn indices(&self) -> &[u16] {
        &self.indices
    }

    /// The raw bytes of the vertex buffer.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn n_triangles(&self) -> usize {
        self.indices.len() / 3
    }
}

fn vertex(position: [f32; 3], texture_coords: [f32; 2]) -> PlaneVertex {
    PlaneVertex {
        position,
        texture_coords,
    }
}
