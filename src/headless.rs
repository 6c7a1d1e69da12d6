//! Host that runs a session without an AR engine, for replays and tests.

use crate::{
    config::DisplayConfig,
    gesture::{GestureConfig, ScreenPoint},
    host::{HitTester, SceneHost},
};
use anyhow::{Result, bail};
use nalgebra::{Point3, UnitQuaternion, UnitVector3, Vector2, Vector3, point, vector};
use planedrop_physics::{
    DynamicBody, DynamicBodyID,
    quantities::{Impulse, Position},
};
use planedrop_scene::{AnchorID, Plane, PlaneVisibility};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Configuration parameters for the pinhole camera of a [`HeadlessHost`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadlessCameraConfig {
    /// World position of the camera.
    pub position: [f32; 3],
    /// Rotation about the x-axis, in degrees. Negative values tilt the camera
    /// down from looking along the negative z-axis.
    pub pitch_degrees: f32,
    pub vertical_field_of_view_degrees: f32,
    /// Width and height of the viewport, in screen points.
    pub viewport_size: [f32; 2],
}

/// Pinhole camera turning screen points into world rays.
#[derive(Clone, Debug)]
pub struct HeadlessCamera {
    position: Point3<f32>,
    orientation: UnitQuaternion<f32>,
    tan_half_vertical_fov: f32,
    viewport_size: Vector2<f32>,
}

/// An outbound call the session made on a [`HeadlessHost`].
#[derive(Clone, Debug, PartialEq)]
pub enum HostCall {
    ConfigureDisplay(DisplayConfig),
    InstallGestureRecognizers(GestureConfig),
    SetPlaneDetection(bool),
    RegisterVisualNode {
        anchor_id: AnchorID,
        visibility: PlaneVisibility,
    },
    UpdateVisualNode {
        anchor_id: AnchorID,
        visibility: PlaneVisibility,
    },
    RemoveVisualNode {
        anchor_id: AnchorID,
    },
    AddBody {
        body: DynamicBodyID,
        position: Position,
    },
    ApplyImpulse {
        body: DynamicBodyID,
        impulse: Impulse,
        application_point: Position,
    },
}

/// A [`SceneHost`] and [`HitTester`] that records every call and keeps just
/// enough of the scene to answer hit tests.
///
/// Anchor nodes are only translated, never rotated. A driver places an anchor
/// with [`Self::place_anchor`] before reporting it to the session; anchors
/// that were never placed sit at the world origin. Bodies stay where they
/// were inserted unless moved with [`Self::move_body`].
#[derive(Debug)]
pub struct HeadlessHost {
    camera: HeadlessCamera,
    anchor_origins: FxHashMap<AnchorID, Position>,
    planes: FxHashMap<AnchorID, Plane>,
    body_positions: FxHashMap<DynamicBodyID, Position>,
    plane_detection: bool,
    calls: Vec<HostCall>,
}

impl HeadlessCameraConfig {
    pub fn validate(&self) -> Result<()> {
        let fov = self.vertical_field_of_view_degrees;
        if !(fov > 0.0 && fov < 180.0) {
            bail!("Vertical field of view must be between 0 and 180 degrees, got {fov}");
        }
        let [width, height] = self.viewport_size;
        if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
            bail!("Invalid viewport size: {width} x {height}");
        }
        if !self.pitch_degrees.is_finite() || self.position.iter().any(|c| !c.is_finite()) {
            bail!("Camera pose must be finite");
        }
        Ok(())
    }
}

impl Default for HeadlessCameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 1.5, 0.0],
            pitch_degrees: -60.0,
            vertical_field_of_view_degrees: 60.0,
            viewport_size: [750.0, 1334.0],
        }
    }
}

impl HeadlessCamera {
    pub fn new(config: &HeadlessCameraConfig) -> Self {
        let [x, y, z] = config.position;
        let [width, height] = config.viewport_size;
        Self {
            position: point![x, y, z],
            orientation: UnitQuaternion::from_axis_angle(
                &Vector3::x_axis(),
                config.pitch_degrees.to_radians(),
            ),
            tan_half_vertical_fov: (0.5 * config.vertical_field_of_view_degrees.to_radians())
                .tan(),
            viewport_size: vector![width, height],
        }
    }

    pub fn position(&self) -> &Point3<f32> {
        &self.position
    }

    /// Returns the origin and direction of the world ray passing through the
    /// given screen point.
    pub fn ray_through(&self, screen_point: &ScreenPoint) -> (Position, UnitVector3<f32>) {
        let aspect_ratio = self.viewport_size.x / self.viewport_size.y;
        let ndc_x = 2.0 * screen_point.x / self.viewport_size.x - 1.0;
        let ndc_y = 1.0 - 2.0 * screen_point.y / self.viewport_size.y;

        let camera_space_direction = vector![
            ndc_x * self.tan_half_vertical_fov * aspect_ratio,
            ndc_y * self.tan_half_vertical_fov,
            -1.0
        ];

        (
            self.position,
            UnitVector3::new_normalize(self.orientation * camera_space_direction),
        )
    }
}

impl HeadlessHost {
    pub fn new(camera: HeadlessCamera) -> Self {
        Self {
            camera,
            anchor_origins: FxHashMap::default(),
            planes: FxHashMap::default(),
            body_positions: FxHashMap::default(),
            plane_detection: false,
            calls: Vec::new(),
        }
    }

    pub fn camera(&self) -> &HeadlessCamera {
        &self.camera
    }

    /// Sets the world position of the node for the anchor with the given ID.
    pub fn place_anchor(&mut self, anchor_id: AnchorID, origin: Position) {
        self.anchor_origins.insert(anchor_id, origin);
    }

    /// Sets the world position of the given body, as if the simulation had
    /// moved it. Does nothing if the body was never added to the scene.
    pub fn move_body(&mut self, body: DynamicBodyID, position: Position) {
        if let Some(current_position) = self.body_positions.get_mut(&body) {
            *current_position = position;
        }
    }

    /// The calls made on the host so far, in order.
    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }

    pub fn plane_detection_enabled(&self) -> bool {
        self.plane_detection
    }

    /// The number of plane nodes currently attached to anchors.
    pub fn n_visual_nodes(&self) -> usize {
        self.planes.len()
    }

    /// The plane last shown for the anchor with the given ID.
    pub fn visual_node(&self, anchor_id: AnchorID) -> Option<&Plane> {
        self.planes.get(&anchor_id)
    }

    /// The number of bodies added to the scene.
    pub fn n_bodies(&self) -> usize {
        self.body_positions.len()
    }

    fn anchor_origin(&self, anchor_id: AnchorID) -> Position {
        self.anchor_origins
            .get(&anchor_id)
            .copied()
            .unwrap_or_else(Position::origin)
    }
}

impl SceneHost for HeadlessHost {
    fn configure_display(&mut self, config: &DisplayConfig) {
        self.calls.push(HostCall::ConfigureDisplay(config.clone()));
    }

    fn install_gesture_recognizers(&mut self, config: &GestureConfig) {
        self.calls.push(HostCall::InstallGestureRecognizers(config.clone()));
    }

    fn set_plane_detection(&mut self, enabled: bool) {
        self.plane_detection = enabled;
        self.calls.push(HostCall::SetPlaneDetection(enabled));
    }

    fn register_visual_node(&mut self, plane: &Plane) {
        self.planes.insert(plane.anchor_id(), plane.clone());
        self.calls.push(HostCall::RegisterVisualNode {
            anchor_id: plane.anchor_id(),
            visibility: plane.visibility(),
        });
    }

    fn update_visual_node(&mut self, plane: &Plane) {
        self.planes.insert(plane.anchor_id(), plane.clone());
        self.calls.push(HostCall::UpdateVisualNode {
            anchor_id: plane.anchor_id(),
            visibility: plane.visibility(),
        });
    }

    fn remove_visual_node(&mut self, anchor_id: AnchorID) {
        self.planes.remove(&anchor_id);
        self.anchor_origins.remove(&anchor_id);
        self.calls.push(HostCall::RemoveVisualNode { anchor_id });
    }

    fn add_body_to_scene(&mut self, body: &DynamicBody) {
        self.body_positions.insert(body.id(), *body.position());
        self.calls.push(HostCall::AddBody {
            body: body.id(),
            position: *body.position(),
        });
    }

    fn body_world_position(&self, body: DynamicBodyID) -> Option<Position> {
        self.body_positions.get(&body).copied()
    }

    fn apply_impulse(
        &mut self,
        body: DynamicBodyID,
        impulse: &Impulse,
        application_point: &Position,
    ) {
        self.calls.push(HostCall::ApplyImpulse {
            body,
            impulse: *impulse,
            application_point: *application_point,
        });
    }
}

impl HitTester for HeadlessHost {
    fn hit_test(&self, screen_point: &ScreenPoint) -> Option<Position> {
        let (ray_origin, ray_direction) = self.camera.ray_through(screen_point);
        if ray_direction.y.abs() < f32::EPSILON {
            return None;
        }

        self.planes
            .iter()
            .filter_map(|(&anchor_id, plane)| {
                let anchor_origin = self.anchor_origin(anchor_id);
                let plane_height = anchor_origin.y + plane.geometry().node_position().y;

                let distance = (plane_height - ray_origin.y) / ray_direction.y;
                if distance <= 0.0 {
                    return None;
                }

                let hit_point = ray_origin + ray_direction.into_inner() * distance;
                let anchor_local_point = Point3::from(hit_point - anchor_origin);

                plane
                    .contains_anchor_local_point(&anchor_local_point)
                    .then_some((distance, hit_point))
            })
            .min_by(|(distance_a, _), (distance_b, _)| distance_a.total_cmp(distance_b))
            .map(|(_, hit_point)| hit_point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use planedrop_physics::{CollisionCategory, DynamicBodyCollection, InsertionConfig};
    use planedrop_scene::{PlaneAnchor, PlaneVisualConfig};

    fn downward_camera() -> HeadlessCamera {
        HeadlessCamera::new(&HeadlessCameraConfig {
            position: [0.0, 1.5, 0.0],
            pitch_degrees: -90.0,
            vertical_field_of_view_degrees: 60.0,
            viewport_size: [100.0, 100.0],
        })
    }

    const CENTER: ScreenPoint = ScreenPoint { x: 50.0, y: 50.0 };

    fn show_plane(host: &mut HeadlessHost, origin: Position, width: f32, depth: f32) -> AnchorID {
        let id = AnchorID::new_random();
        host.place_anchor(id, origin);
        let anchor = PlaneAnchor::new(Position::origin(), vector![width, 0.0, depth]);
        host.register_visual_node(&Plane::new(id, &anchor, &PlaneVisualConfig::default()));
        id
    }

    #[test]
    fn center_ray_should_follow_pitch() {
        let camera = HeadlessCamera::new(&HeadlessCameraConfig {
            viewport_size: [100.0, 200.0],
            ..HeadlessCameraConfig::default()
        });
        let (origin, direction) = camera.ray_through(&ScreenPoint { x: 50.0, y: 100.0 });
        assert_abs_diff_eq!(origin, point![0.0, 1.5, 0.0]);
        let angle = 60.0_f32.to_radians();
        assert_abs_diff_eq!(
            direction.into_inner(),
            vector![0.0, -angle.sin(), -angle.cos()],
            epsilon = 1e-6
        );
    }

    #[test]
    fn upper_screen_points_should_look_higher() {
        let camera = HeadlessCamera::new(&HeadlessCameraConfig::default());
        let (_, center) = camera.ray_through(&ScreenPoint { x: 375.0, y: 667.0 });
        let (_, top) = camera.ray_through(&ScreenPoint { x: 375.0, y: 0.0 });
        assert!(top.y > center.y);
    }

    #[test]
    fn should_hit_plane_below_camera() {
        let mut host = HeadlessHost::new(downward_camera());
        show_plane(&mut host, Position::origin(), 1.0, 1.0);
        let hit = host.hit_test(&CENTER).unwrap();
        assert_abs_diff_eq!(hit, point![0.0, 0.0, 0.0], epsilon = 1e-5);
    }

    #[test]
    fn should_hit_plane_ahead_of_pitched_camera() {
        let mut host = HeadlessHost::new(HeadlessCamera::new(&HeadlessCameraConfig {
            viewport_size: [100.0, 100.0],
            ..HeadlessCameraConfig::default()
        }));
        let depth = -1.5 / 60.0_f32.to_radians().tan();
        show_plane(&mut host, point![0.0, 0.0, depth], 1.0, 1.0);
        let hit = host.hit_test(&CENTER).unwrap();
        assert_abs_diff_eq!(hit, point![0.0, 0.0, depth], epsilon = 1e-4);
    }

    #[test]
    fn should_miss_outside_plane_extent() {
        let mut host = HeadlessHost::new(downward_camera());
        show_plane(&mut host, point![2.0, 0.0, 0.0], 1.0, 1.0);
        assert!(host.hit_test(&CENTER).is_none());
    }

    #[test]
    fn should_miss_plane_above_camera() {
        let mut host = HeadlessHost::new(downward_camera());
        show_plane(&mut host, point![0.0, 2.0, 0.0], 1.0, 1.0);
        assert!(host.hit_test(&CENTER).is_none());
    }

    #[test]
    fn should_return_nearest_hit() {
        let mut host = HeadlessHost::new(downward_camera());
        show_plane(&mut host, Position::origin(), 2.0, 2.0);
        show_plane(&mut host, point![0.0, 0.5, 0.0], 1.0, 1.0);
        let hit = host.hit_test(&CENTER).unwrap();
        assert_abs_diff_eq!(hit.y, 0.5, epsilon = 1e-5);
    }

    #[test]
    fn registered_plane_node_should_carry_kinematic_collider() {
        let mut host = HeadlessHost::new(downward_camera());
        let id = show_plane(&mut host, Position::origin(), 1.2, 0.8);
        let collider = *host.visual_node(id).unwrap().geometry().collider();
        assert!(collider.is_kinematic());
        assert_eq!(collider.category(), CollisionCategory::PLANE);
        assert_abs_diff_eq!(collider.width(), 1.2);
        assert_abs_diff_eq!(collider.depth(), 0.8);
    }

    #[test]
    fn removed_plane_should_not_be_hit() {
        let mut host = HeadlessHost::new(downward_camera());
        let id = show_plane(&mut host, Position::origin(), 1.0, 1.0);
        host.remove_visual_node(id);
        assert!(host.hit_test(&CENTER).is_none());
        assert_eq!(host.n_visual_nodes(), 0);
    }

    #[test]
    fn should_record_calls_in_order() {
        let mut host = HeadlessHost::new(downward_camera());
        host.set_plane_detection(true);
        let id = show_plane(&mut host, Position::origin(), 1.0, 1.0);
        host.remove_visual_node(id);

        assert_eq!(
            host.calls(),
            &[
                HostCall::SetPlaneDetection(true),
                HostCall::RegisterVisualNode {
                    anchor_id: id,
                    visibility: PlaneVisibility::Visible
                },
                HostCall::RemoveVisualNode { anchor_id: id },
            ]
        );
        assert!(host.plane_detection_enabled());
    }

    #[test]
    fn moved_body_should_report_new_position() {
        let mut host = HeadlessHost::new(downward_camera());
        let mut bodies = DynamicBodyCollection::new(InsertionConfig::default());
        let body = bodies.insert_body(&Position::origin());
        host.add_body_to_scene(bodies.get(body).unwrap());

        host.move_body(body, point![1.0, 2.0, 3.0]);
        assert_eq!(host.body_world_position(body), Some(point![1.0, 2.0, 3.0]));
    }

    #[test]
    fn moving_unknown_body_should_do_nothing() {
        let mut host = HeadlessHost::new(downward_camera());
        let body = DynamicBodyID::from_u64(3);
        host.move_body(body, point![1.0, 2.0, 3.0]);
        assert!(host.body_world_position(body).is_none());
        assert_eq!(host.n_bodies(), 0);
    }

    #[test]
    fn default_camera_config_should_be_valid() {
        HeadlessCameraConfig::default().validate().unwrap();
    }

    #[test]
    fn zero_viewport_should_be_invalid() {
        let config = HeadlessCameraConfig {
            viewport_size: [0.0, 100.0],
            ..HeadlessCameraConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
