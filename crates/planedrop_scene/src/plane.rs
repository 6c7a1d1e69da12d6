//! Visual planes mirroring tracked plane anchors.

use crate::{
    PlaneVisualConfig,
    anchor::{AnchorID, PlaneAnchor},
    material::PlaneMaterial,
    mesh::PlaneMesh,
    texture::TextureScale,
};
use nalgebra::{Point3, Vector2, point};
use planedrop_physics::SurfaceCollider;
use std::sync::Arc;
use tinyvec::TinyVec;

/// Number of faces a plane's material list covers. The rectangle itself only
/// uses the first, but hosts that give planes a thickness use all six.
pub const N_PLANE_FACES: usize = 6;

/// Materials for the faces of a plane's geometry.
pub type PlaneFaceMaterials = TinyVec<[PlaneMaterial; N_PLANE_FACES]>;

/// Whether a plane is drawn.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PlaneVisibility {
    Visible,
    Hidden,
}

/// A detected flat surface and its derived visual representation.
#[derive(Clone, Debug)]
pub struct Plane {
    anchor_id: AnchorID,
    center: Point3<f32>,
    extent: Vector2<f32>,
    visibility: PlaneVisibility,
    geometry: PlaneGeometry,
}

/// The data a host needs to draw a plane: the mesh, where to put it relative
/// to the anchor node, and which materials to use. Also carries the kinematic
/// collider bodies rest on.
#[derive(Clone, Debug, PartialEq)]
pub struct PlaneGeometry {
    node_position: Point3<f32>,
    mesh: PlaneMesh,
    collider: SurfaceCollider,
    texture_scale: TextureScale,
    materials: PlaneFaceMaterials,
}

impl Plane {
    /// Creates a visible plane for the given newly detected anchor.
    ///
    /// The node is placed at the horizontal center of the anchor and lifted by
    /// the anchor's vertical extent. Later updates only move the node
    /// horizontally, since the anchor node it is attached to carries the
    /// tracked vertical pose.
    pub fn new(anchor_id: AnchorID, anchor: &PlaneAnchor, config: &PlaneVisualConfig) -> Self {
        let extent = clamped_surface_extent(anchor);
        let texture_scale = TextureScale::for_extent(extent.x, extent.y);

        let grid_texture: Arc<str> = Arc::from(config.grid_texture.as_str());
        let mut materials = PlaneFaceMaterials::new();
        materials.push(PlaneMaterial::grid(grid_texture, texture_scale));

        let geometry = PlaneGeometry {
            node_position: point![
                anchor.center.x,
                anchor.vertical_extent(),
                anchor.center.z
            ],
            mesh: PlaneMesh::create_rectangle(extent.x, extent.y, texture_scale),
            collider: SurfaceCollider::for_surface(extent.x, extent.y),
            texture_scale,
            materials,
        };

        Self {
            anchor_id,
            center: anchor.center,
            extent,
            visibility: PlaneVisibility::Visible,
            geometry,
        }
    }

    pub fn anchor_id(&self) -> AnchorID {
        self.anchor_id
    }

    /// The center of the plane relative to its anchor.
    pub fn center(&self) -> &Point3<f32> {
        &self.center
    }

    /// The width and depth of the plane.
    pub fn extent(&self) -> &Vector2<f32> {
        &self.extent
    }

    pub fn visibility(&self) -> PlaneVisibility {
        self.visibility
    }

    pub fn is_visible(&self) -> bool {
        self.visibility == PlaneVisibility::Visible
    }

    pub fn geometry(&self) -> &PlaneGeometry {
        &self.geometry
    }

    /// Updates the plane to the refined estimate in the given anchor and
    /// recomputes the geometry and texture scale.
    ///
    /// The vertical node position is pinned to zero. The materials are kept,
    /// so a hidden plane stays hidden.
    pub fn update(&mut self, anchor: &PlaneAnchor) {
        let extent = clamped_surface_extent(anchor);
        let texture_scale = TextureScale::for_extent(extent.x, extent.y);

        self.center = anchor.center;
        self.extent = extent;

        self.geometry.node_position = point![anchor.center.x, 0.0, anchor.center.z];
        self.geometry.mesh = PlaneMesh::create_rectangle(extent.x, extent.y, texture_scale);
        self.geometry.collider = SurfaceCollider::for_surface(extent.x, extent.y);
        self.geometry.texture_scale = texture_scale;
        for material in self.geometry.materials.iter_mut() {
            material.rescale_texture(texture_scale);
        }
    }

    /// Hides the plane by giving every face a uniform material with the given
    /// transparent color.
    pub fn hide(&mut self, config: &PlaneVisualConfig) {
        self.visibility = PlaneVisibility::Hidden;
        self.geometry.materials = (0..N_PLANE_FACES)
            .map(|_| PlaneMaterial::uniform(config.hidden_color))
            .collect();
    }

    /// Whether the given point, expressed in the frame of the anchor node,
    /// lies within the horizontal bounds of the plane.
    pub fn contains_anchor_local_point(&self, point: &Point3<f32>) -> bool {
        let node_position = &self.geometry.node_position;
        (point.x - node_position.x).abs() <= 0.5 * self.extent.x
            && (point.z - node_position.z).abs() <= 0.5 * self.extent.y
    }
}

impl PlaneGeometry {
    /// Position of the plane node relative to the anchor node.
    pub fn node_position(&self) -> &Point3<f32> {
        &self.node_position
    }

    pub fn mesh(&self) -> &PlaneMesh {
        &self.mesh
    }

    /// The collider the host should attach to the plane node as a kinematic
    /// body, shaped after the mesh.
    pub fn collider(&self) -> &SurfaceCollider {
        &self.collider
    }

    pub fn texture_scale(&self) -> TextureScale {
        self.texture_scale
    }

    pub fn materials(&self) -> &[PlaneMaterial] {
        &self.materials
    }
}

fn clamped_surface_extent(anchor: &PlaneAnchor) -> Vector2<f32> {
    anchor.surface_extent().map(|extent| extent.max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::RGBAColor;
    use planedrop_physics::CollisionCategory;
    use approx::assert_abs_diff_eq;
    use nalgebra::vector;

    fn anchor(center: Point3<f32>, width: f32, height: f32, depth: f32) -> PlaneAnchor {
        PlaneAnchor::new(center, vector![width, height, depth])
    }

    fn new_plane(anchor: &PlaneAnchor) -> Plane {
        Plane::new(AnchorID::new_random(), anchor, &PlaneVisualConfig::default())
    }

    #[test]
    fn new_plane_should_be_visible_with_one_grid_material() {
        let plane = new_plane(&anchor(Point3::origin(), 1.0, 0.0, 1.0));
        assert!(plane.is_visible());
        assert_eq!(plane.geometry().materials().len(), 1);
        assert!(matches!(
            &plane.geometry().materials()[0],
            PlaneMaterial::Grid { texture, .. } if &**texture == "tron-grid"
        ));
    }

    #[test]
    fn new_plane_should_be_raised_by_vertical_extent() {
        let plane = new_plane(&anchor(point![0.5, 0.3, -1.0], 2.0, 0.2, 3.0));
        assert_abs_diff_eq!(
            plane.geometry().node_position(),
            &point![0.5, 0.2, -1.0]
        );
    }

    #[test]
    fn new_plane_should_scale_texture_to_extent() {
        let plane = new_plane(&anchor(Point3::origin(), 2.0, 0.0, 0.5));
        let scale = plane.geometry().texture_scale();
        assert_abs_diff_eq!(scale.u_repeats, 2.0);
        assert_abs_diff_eq!(scale.v_repeats, 0.5);
    }

    #[test]
    fn updated_plane_should_pin_vertical_position_to_zero() {
        let mut plane = new_plane(&anchor(point![0.0, 0.0, 0.0], 1.0, 0.2, 1.0));
        plane.update(&anchor(point![0.4, 0.7, 0.1], 1.5, 0.2, 1.0));
        assert_abs_diff_eq!(
            plane.geometry().node_position(),
            &point![0.4, 0.0, 0.1]
        );
        assert_abs_diff_eq!(plane.center(), &point![0.4, 0.7, 0.1]);
    }

    #[test]
    fn updated_plane_should_rescale_grid_texture() {
        let mut plane = new_plane(&anchor(Point3::origin(), 1.0, 0.0, 1.0));
        plane.update(&anchor(Point3::origin(), 3.0, 0.0, 2.0));

        let expected = TextureScale::for_extent(3.0, 2.0);
        assert_eq!(plane.geometry().texture_scale(), expected);
        assert!(matches!(
            &plane.geometry().materials()[0],
            PlaneMaterial::Grid { scale, .. } if *scale == expected
        ));
        assert_abs_diff_eq!(plane.extent(), &vector![3.0, 2.0]);
    }

    #[test]
    fn plane_collider_should_follow_refined_extent() {
        let mut plane = new_plane(&anchor(Point3::origin(), 1.0, 0.0, 1.0));
        let collider = plane.geometry().collider();
        assert!(collider.is_kinematic());
        assert_eq!(collider.category(), CollisionCategory::PLANE);
        assert_eq!((collider.width(), collider.depth()), (1.0, 1.0));

        plane.update(&anchor(Point3::origin(), 2.5, 0.0, 0.5));
        let collider = plane.geometry().collider();
        assert_eq!((collider.width(), collider.depth()), (2.5, 0.5));
    }

    #[test]
    fn hidden_plane_should_get_transparent_material_on_every_face() {
        let config = PlaneVisualConfig::default();
        let mut plane = new_plane(&anchor(Point3::origin(), 1.0, 0.0, 1.0));
        plane.hide(&config);

        assert_eq!(plane.visibility(), PlaneVisibility::Hidden);
        assert_eq!(plane.geometry().materials().len(), N_PLANE_FACES);
        assert!(
            plane
                .geometry()
                .materials()
                .iter()
                .all(|material| *material == PlaneMaterial::uniform(RGBAColor::CLEAR))
        );
    }

    #[test]
    fn hidden_plane_should_stay_hidden_after_update() {
        let mut plane = new_plane(&anchor(Point3::origin(), 1.0, 0.0, 1.0));
        plane.hide(&PlaneVisualConfig::default());
        plane.update(&anchor(point![1.0, 0.0, 1.0], 4.0, 0.0, 4.0));

        assert!(!plane.is_visible());
        assert!(
            plane
                .geometry()
                .materials()
                .iter()
                .all(PlaneMaterial::is_transparent)
        );
    }

    #[test]
    fn negative_extents_should_be_clamped_to_zero() {
        let plane = new_plane(&anchor(Point3::origin(), -1.0, 0.0, 2.0));
        assert_abs_diff_eq!(plane.extent(), &vector![0.0, 2.0]);
    }

    #[test]
    fn should_contain_points_within_horizontal_bounds() {
        let plane = new_plane(&anchor(point![1.0, 0.0, 0.0], 2.0, 0.0, 1.0));
        assert!(plane.contains_anchor_local_point(&point![1.9, 0.0, 0.4]));
        assert!(plane.contains_anchor_local_point(&point![0.1, 5.0, -0.4]));
        assert!(!plane.contains_anchor_local_point(&point![2.1, 0.0, 0.0]));
        assert!(!plane.contains_anchor_local_point(&point![1.0, 0.0, 0.6]));
    }
}
