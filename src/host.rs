//! Interfaces to the AR engine hosting the session.
//!
//! The host owns tracking, rendering and rigid body simulation. The session
//! controller only tells it what to show and which bodies to push, and asks it
//! where taps land in the world.

use crate::{config::DisplayConfig, gesture::GestureConfig, gesture::ScreenPoint};
use planedrop_physics::{
    DynamicBody, DynamicBodyID,
    quantities::{Impulse, Position},
};
use planedrop_scene::{AnchorID, Plane};

/// Scene operations the session controller requests from the host.
pub trait SceneHost {
    /// Applies the display options to the host's view. Called once when the
    /// session starts.
    fn configure_display(&mut self, _config: &DisplayConfig) {}

    /// Installs recognizers for the gestures the session responds to. Called
    /// once when the session starts.
    fn install_gesture_recognizers(&mut self, _config: &GestureConfig) {}

    /// Enables or disables detection of new horizontal planes.
    fn set_plane_detection(&mut self, enabled: bool);

    /// Attaches a visual node for the given plane to the node of its anchor.
    fn register_visual_node(&mut self, plane: &Plane);

    /// Replaces the geometry and materials of the visual node for the given
    /// plane.
    fn update_visual_node(&mut self, plane: &Plane);

    /// Detaches the visual node for the plane with the given anchor.
    fn remove_visual_node(&mut self, anchor_id: AnchorID);

    /// Adds the given body to the scene and to the host's rigid body
    /// simulation.
    fn add_body_to_scene(&mut self, body: &DynamicBody);

    /// Returns the current world position of the given body as simulated by
    /// the host, or [`None`] if the host does not know it.
    fn body_world_position(&self, body: DynamicBodyID) -> Option<Position>;

    /// Applies the given impulse to the body at the given point in the body's
    /// local frame.
    fn apply_impulse(&mut self, body: DynamicBodyID, impulse: &Impulse, application_point: &Position);
}

/// Resolves screen points to world points on tracked planes.
pub trait HitTester {
    /// Returns the world position where the ray through the given screen
    /// point first hits a tracked plane within its extent, or [`None`] if it
    /// hits nothing.
    fn hit_test(&self, screen_point: &ScreenPoint) -> Option<Position>;
}
