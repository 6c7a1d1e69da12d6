//! Session controller tying tracked planes, dynamic bodies and explosions
//! together.

use crate::{
    command::{CommandQueue, SessionCommand},
    config::SessionConfig,
    gesture::{Gesture, GestureAction, ScreenPoint},
    host::{HitTester, SceneHost},
    observer::{AnchorObserver, SessionObserver},
};
use planedrop_log::{debug, error, info, warn};
use planedrop_physics::{DynamicBodyCollection, DynamicBodyID, Explosion, ExplosionSolver};
use planedrop_scene::{AnchorID, PlaneAnchor, PlaneRegistry};
use std::error::Error;

/// Lifecycle state of a tracking session.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SessionState {
    Stopped,
    Running,
    Interrupted,
    Failed,
}

/// Running counts of what happened during a session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub bodies_inserted: usize,
    pub missed_hit_tests: usize,
    pub explosions: usize,
    pub impulses_applied: usize,
    pub bodies_skipped: usize,
}

/// Owns the state of a session and reacts to anchor, gesture and session
/// events reported by the host.
///
/// Explosions requested by gestures are queued and only take effect on the
/// next call to [`Self::update`], which the host should make once per frame.
#[derive(Debug)]
pub struct SessionController {
    config: SessionConfig,
    state: SessionState,
    planes: PlaneRegistry,
    bodies: DynamicBodyCollection,
    explosion_solver: ExplosionSolver,
    commands: CommandQueue<SessionCommand>,
    stats: SessionStats,
}

impl SessionController {
    /// Creates a stopped session controller with the given configuration.
    pub fn new(config: SessionConfig) -> Self {
        let planes = PlaneRegistry::new(config.planes.clone());
        let bodies = DynamicBodyCollection::new(config.physics.insertion.clone());
        let explosion_solver = ExplosionSolver::new(config.physics.explosion.clone());
        Self {
            config,
            state: SessionState::Stopped,
            planes,
            bodies,
            explosion_solver,
            commands: CommandQueue::new(),
            stats: SessionStats::default(),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn planes(&self) -> &PlaneRegistry {
        &self.planes
    }

    pub fn bodies(&self) -> &DynamicBodyCollection {
        &self.bodies
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// The number of commands waiting for the next update.
    pub fn n_pending_commands(&self) -> usize {
        self.commands.len()
    }

    /// Starts the session, setting up the host's view and gesture
    /// recognizers and enabling plane detection if configured.
    pub fn start<H>(&mut self, host: &mut H)
    where
        H: SceneHost + ?Sized,
    {
        if self.state == SessionState::Running {
            warn!("Tried to start a session that is already running");
            return;
        }
        info!("Starting session");
        host.configure_display(&self.config.display);
        host.install_gesture_recognizers(&self.config.gestures);
        host.set_plane_detection(self.config.tracking.plane_detection);
        self.state = SessionState::Running;
    }

    /// Stops the session and discards all planes, bodies and pending
    /// commands. The visual nodes of the discarded planes are removed from
    /// the host and plane detection is turned off.
    pub fn stop<H>(&mut self, host: &mut H)
    where
        H: SceneHost + ?Sized,
    {
        info!(
            "Stopping session with {} planes and {} bodies",
            self.planes.len(),
            self.bodies.len()
        );
        for anchor_id in self.planes.anchor_ids() {
            host.remove_visual_node(anchor_id);
        }
        host.set_plane_detection(false);
        self.planes.clear();
        self.bodies.clear();
        self.commands.clear();
        self.state = SessionState::Stopped;
    }

    /// Responds to the given gesture. Gestures are ignored unless the session
    /// is running.
    pub fn handle_gesture<H>(&mut self, host: &mut H, gesture: &Gesture)
    where
        H: SceneHost + HitTester + ?Sized,
    {
        if self.state != SessionState::Running {
            debug!("Ignoring {:?} in {:?} session", gesture, self.state);
            return;
        }
        match gesture.action() {
            Some(GestureAction::InsertBody { at }) => self.insert_body(host, &at),
            Some(GestureAction::Explode { at }) => self.queue_explosion(host, &at),
            Some(GestureAction::HidePlanes) => self.hide_planes(host),
            None => {}
        }
    }

    /// Executes all commands queued since the previous update.
    pub fn update<H>(&mut self, host: &mut H)
    where
        H: SceneHost + ?Sized,
    {
        let commands: Vec<_> = self.commands.drain_commands().collect();
        for command in commands {
            match command {
                SessionCommand::Explode(explosion) => self.explode(host, &explosion),
            }
        }
    }

    fn insert_body<H>(&mut self, host: &mut H, screen_point: &ScreenPoint)
    where
        H: SceneHost + HitTester + ?Sized,
    {
        let Some(hit_point) = host.hit_test(screen_point) else {
            debug!("Tap at ({}, {}) hit no plane", screen_point.x, screen_point.y);
            self.stats.missed_hit_tests += 1;
            return;
        };
        let id = self.bodies.insert_body(&hit_point);
        if let Some(body) = self.bodies.get(id) {
            host.add_body_to_scene(body);
            self.stats.bodies_inserted += 1;
        }
    }

    fn queue_explosion<H>(&mut self, host: &mut H, screen_point: &ScreenPoint)
    where
        H: HitTester + ?Sized,
    {
        let Some(hit_point) = host.hit_test(screen_point) else {
            debug!(
                "Long press at ({}, {}) hit no plane",
                screen_point.x, screen_point.y
            );
            self.stats.missed_hit_tests += 1;
            return;
        };
        let explosion = self.explosion_solver.explosion_at_hit_point(&hit_point);
        debug!(
            "Queueing explosion at ({:.3}, {:.3}, {:.3})",
            explosion.origin.x, explosion.origin.y, explosion.origin.z
        );
        self.commands.enqueue_command(SessionCommand::Explode(explosion));
    }

    fn hide_planes<H>(&mut self, host: &mut H)
    where
        H: SceneHost + ?Sized,
    {
        self.planes.hide_all();
        for plane in self.planes.iter() {
            host.update_visual_node(plane);
        }
        host.set_plane_detection(false);
    }

    fn explode<H>(&mut self, host: &mut H, explosion: &Explosion)
    where
        H: SceneHost + ?Sized,
    {
        let application_point = self.explosion_solver.application_point();

        let bodies: Vec<(DynamicBodyID, _)> = self
            .bodies
            .iter()
            .map(|body| {
                let position = host
                    .body_world_position(body.id())
                    .unwrap_or(*body.position());
                (body.id(), position)
            })
            .collect();

        let n_bodies = bodies.len();

        planedrop_log::with_timing_debug_logging!(
            "Applying explosion to {} bodies", n_bodies; {
            for (id, position) in bodies {
                match self
                    .explosion_solver
                    .compute_impulse(&explosion.origin, id, &position)
                {
                    Ok(impulse) if impulse.iter().all(|&component| component == 0.0) => {}
                    Ok(impulse) => {
                        host.apply_impulse(id, &impulse, &application_point);
                        self.stats.impulses_applied += 1;
                    }
                    Err(err) => {
                        warn!("Skipping body in explosion: {err}");
                        self.stats.bodies_skipped += 1;
                    }
                }
            }
        });

        self.stats.explosions += 1;
    }
}

impl<H> AnchorObserver<H> for SessionController
where
    H: SceneHost + ?Sized,
{
    fn on_anchor_added(&mut self, host: &mut H, id: AnchorID, anchor: &PlaneAnchor) {
        match self.planes.on_anchor_added(id, anchor) {
            Ok(plane) => host.register_visual_node(plane),
            Err(err) => error!("Ignoring added anchor: {err}"),
        }
    }

    fn on_anchor_updated(&mut self, host: &mut H, id: AnchorID, anchor: &PlaneAnchor) {
        if let Some(plane) = self.planes.on_anchor_updated(id, anchor) {
            host.update_visual_node(plane);
        }
    }

    fn on_anchor_removed(&mut self, host: &mut H, id: AnchorID) {
        if self.planes.on_anchor_removed(id).is_some() {
            host.remove_visual_node(id);
        }
    }
}

impl SessionObserver for SessionController {
    fn on_session_failed(&mut self, error: &dyn Error) {
        error!("Session failed: {error}");
        self.state = SessionState::Failed;
    }

    fn on_session_interrupted(&mut self) {
        info!("Session interrupted");
        if self.state == SessionState::Running {
            self.state = SessionState::Interrupted;
        }
    }

    fn on_session_interruption_ended(&mut self) {
        info!("Session interruption ended");
        if self.state == SessionState::Interrupted {
            self.state = SessionState::Running;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::DisplayConfig, gesture::GesturePhase};
    use approx::assert_abs_diff_eq;
    use nalgebra::{point, vector};
    use planedrop_physics::{
        DynamicBody,
        quantities::{Impulse, Position},
    };
    use planedrop_scene::Plane;
    use std::{collections::HashMap, fmt};

    #[derive(Debug, Default)]
    struct TestHost {
        hit: Option<Position>,
        plane_detection: Option<bool>,
        display_configured: bool,
        registered: Vec<AnchorID>,
        updated: Vec<(AnchorID, bool)>,
        removed: Vec<AnchorID>,
        added_bodies: Vec<DynamicBody>,
        body_positions: HashMap<DynamicBodyID, Position>,
        impulses: Vec<(DynamicBodyID, Impulse, Position)>,
    }

    impl SceneHost for TestHost {
        fn configure_display(&mut self, _config: &DisplayConfig) {
            self.display_configured = true;
        }

        fn set_plane_detection(&mut self, enabled: bool) {
            self.plane_detection = Some(enabled);
        }

        fn register_visual_node(&mut self, plane: &Plane) {
            self.registered.push(plane.anchor_id());
        }

        fn update_visual_node(&mut self, plane: &Plane) {
            self.updated.push((plane.anchor_id(), plane.is_visible()));
        }

        fn remove_visual_node(&mut self, anchor_id: AnchorID) {
            self.removed.push(anchor_id);
        }

        fn add_body_to_scene(&mut self, body: &DynamicBody) {
            self.added_bodies.push(body.clone());
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
            self.impulses.push((body, *impulse, *application_point));
        }
    }

    impl HitTester for TestHost {
        fn hit_test(&self, _screen_point: &ScreenPoint) -> Option<Position> {
            self.hit
        }
    }

    #[derive(Debug)]
    struct TrackingLost;

    impl fmt::Display for TrackingLost {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "tracking lost")
        }
    }

    impl Error for TrackingLost {}

    const POINT: ScreenPoint = ScreenPoint { x: 1.0, y: 2.0 };

    fn tap() -> Gesture {
        Gesture::Tap { point: POINT }
    }

    fn long_press(phase: GesturePhase) -> Gesture {
        Gesture::LongPress {
            phase,
            point: POINT,
        }
    }

    fn double_long_press() -> Gesture {
        Gesture::DoubleLongPress {
            phase: GesturePhase::Began,
        }
    }

    fn unit_anchor() -> PlaneAnchor {
        PlaneAnchor::new(Position::origin(), vector![1.0, 0.0, 1.0])
    }

    fn running_session(host: &mut TestHost) -> SessionController {
        let mut session = SessionController::new(SessionConfig::default());
        session.start(host);
        session
    }

    #[test]
    fn starting_should_enable_plane_detection() {
        let mut host = TestHost::default();
        let session = running_session(&mut host);
        assert_eq!(session.state(), SessionState::Running);
        assert_eq!(host.plane_detection, Some(true));
        assert!(host.display_configured);
    }

    #[test]
    fn added_anchor_should_register_visual_node() {
        let mut host = TestHost::default();
        let mut session = running_session(&mut host);
        let id = AnchorID::new_random();
        session.on_anchor_added(&mut host, id, &unit_anchor());
        assert_eq!(host.registered, vec![id]);
        assert!(session.planes().contains(id));
    }

    #[test]
    fn duplicate_anchor_should_be_ignored() {
        let mut host = TestHost::default();
        let mut session = running_session(&mut host);
        let id = AnchorID::new_random();
        session.on_anchor_added(&mut host, id, &unit_anchor());
        session.on_anchor_added(&mut host, id, &unit_anchor());
        assert_eq!(host.registered, vec![id]);
        assert_eq!(session.planes().len(), 1);
    }

    #[test]
    fn unknown_anchor_events_should_not_reach_host() {
        let mut host = TestHost::default();
        let mut session = running_session(&mut host);
        let id = AnchorID::new_random();
        session.on_anchor_updated(&mut host, id, &unit_anchor());
        session.on_anchor_removed(&mut host, id);
        assert!(host.updated.is_empty());
        assert!(host.removed.is_empty());
    }

    #[test]
    fn anchor_updates_and_removals_should_reach_host() {
        let mut host = TestHost::default();
        let mut session = running_session(&mut host);
        let id = AnchorID::new_random();
        session.on_anchor_added(&mut host, id, &unit_anchor());
        session.on_anchor_updated(&mut host, id, &unit_anchor());
        session.on_anchor_removed(&mut host, id);
        assert_eq!(host.updated, vec![(id, true)]);
        assert_eq!(host.removed, vec![id]);
        assert!(session.planes().is_empty());
    }

    #[test]
    fn tap_on_plane_should_insert_raised_body() {
        let mut host = TestHost {
            hit: Some(point![0.2, 0.0, -0.5]),
            ..TestHost::default()
        };
        let mut session = running_session(&mut host);
        session.handle_gesture(&mut host, &tap());

        assert_eq!(session.bodies().len(), 1);
        assert_eq!(host.added_bodies.len(), 1);
        assert_abs_diff_eq!(
            host.added_bodies[0].position(),
            &point![0.2, 0.1, -0.5],
            epsilon = 1e-6
        );
        assert_eq!(session.stats().bodies_inserted, 1);
    }

    #[test]
    fn tap_missing_planes_should_do_nothing() {
        let mut host = TestHost::default();
        let mut session = running_session(&mut host);
        session.handle_gesture(&mut host, &tap());
        assert!(session.bodies().is_empty());
        assert!(host.added_bodies.is_empty());
        assert_eq!(session.stats().missed_hit_tests, 1);
    }

    #[test]
    fn gestures_should_be_ignored_when_not_running() {
        let mut host = TestHost {
            hit: Some(Position::origin()),
            ..TestHost::default()
        };
        let mut session = SessionController::new(SessionConfig::default());
        session.handle_gesture(&mut host, &tap());
        assert!(session.bodies().is_empty());
    }

    #[test]
    fn explosion_should_wait_for_next_update() {
        let mut host = TestHost {
            hit: Some(Position::origin()),
            ..TestHost::default()
        };
        let mut session = running_session(&mut host);
        session.handle_gesture(&mut host, &tap());
        session.handle_gesture(&mut host, &long_press(GesturePhase::Began));

        assert_eq!(session.n_pending_commands(), 1);
        assert!(host.impulses.is_empty());

        session.update(&mut host);
        assert_eq!(session.n_pending_commands(), 0);
        assert_eq!(host.impulses.len(), 1);
        assert_eq!(session.stats().explosions, 1);
    }

    #[test]
    fn explosion_should_push_body_up_at_application_point() {
        let mut host = TestHost {
            hit: Some(Position::origin()),
            ..TestHost::default()
        };
        let mut session = running_session(&mut host);
        session.handle_gesture(&mut host, &tap());
        session.handle_gesture(&mut host, &long_press(GesturePhase::Began));
        session.update(&mut host);

        // Body at y = 0.1, origin at y = -0.1, so the distance is 0.2
        let (_, impulse, application_point) = host.impulses[0];
        assert_abs_diff_eq!(impulse, vector![0.0, 6.48, 0.0], epsilon = 1e-4);
        assert_abs_diff_eq!(application_point, point![0.05, 0.05, 0.05]);
    }

    #[test]
    fn explosion_should_use_host_reported_body_position() {
        let mut host = TestHost {
            hit: Some(Position::origin()),
            ..TestHost::default()
        };
        let mut session = running_session(&mut host);
        session.handle_gesture(&mut host, &tap());
        let id = host.added_bodies[0].id();

        // The body has fallen out of range in the host's simulation
        host.body_positions.insert(id, point![0.0, -5.0, 0.0]);
        session.handle_gesture(&mut host, &long_press(GesturePhase::Began));
        session.update(&mut host);

        assert!(host.impulses.is_empty());
        assert_eq!(session.stats().impulses_applied, 0);
    }

    #[test]
    fn body_at_explosion_origin_should_be_skipped() {
        let mut host = TestHost {
            hit: Some(Position::origin()),
            ..TestHost::default()
        };
        let mut session = running_session(&mut host);
        session.handle_gesture(&mut host, &tap());
        session.handle_gesture(&mut host, &tap());
        let first = host.added_bodies[0].id();
        host.body_positions.insert(first, point![0.0, -0.1, 0.0]);

        session.handle_gesture(&mut host, &long_press(GesturePhase::Began));
        session.update(&mut host);

        assert_eq!(host.impulses.len(), 1);
        assert_eq!(host.impulses[0].0, host.added_bodies[1].id());
        assert_eq!(session.stats().bodies_skipped, 1);
    }

    #[test]
    fn long_press_should_only_explode_when_beginning() {
        let mut host = TestHost {
            hit: Some(Position::origin()),
            ..TestHost::default()
        };
        let mut session = running_session(&mut host);
        session.handle_gesture(&mut host, &long_press(GesturePhase::Changed));
        session.handle_gesture(&mut host, &long_press(GesturePhase::Ended));
        assert_eq!(session.n_pending_commands(), 0);
    }

    #[test]
    fn double_long_press_should_hide_planes_and_stop_detection() {
        let mut host = TestHost::default();
        let mut session = running_session(&mut host);
        let ids = [AnchorID::new_random(), AnchorID::new_random()];
        for id in ids {
            session.on_anchor_added(&mut host, id, &unit_anchor());
        }

        session.handle_gesture(&mut host, &double_long_press());

        assert!(session.planes().iter().all(|plane| !plane.is_visible()));
        assert_eq!(host.updated.len(), 2);
        assert!(host.updated.iter().all(|&(_, visible)| !visible));
        assert_eq!(host.plane_detection, Some(false));
    }

    #[test]
    fn stopping_should_discard_session_state() {
        let mut host = TestHost {
            hit: Some(Position::origin()),
            ..TestHost::default()
        };
        let mut session = running_session(&mut host);
        session.on_anchor_added(&mut host, AnchorID::new_random(), &unit_anchor());
        session.handle_gesture(&mut host, &tap());
        session.handle_gesture(&mut host, &long_press(GesturePhase::Began));

        session.stop(&mut host);

        assert_eq!(session.state(), SessionState::Stopped);
        assert!(session.planes().is_empty());
        assert!(session.bodies().is_empty());
        assert_eq!(session.n_pending_commands(), 0);
    }

    #[test]
    fn stopping_should_remove_every_visual_node_and_stop_detection() {
        let mut host = TestHost::default();
        let mut session = running_session(&mut host);
        let ids = [AnchorID::new_random(), AnchorID::new_random()];
        for id in ids {
            session.on_anchor_added(&mut host, id, &unit_anchor());
        }

        session.stop(&mut host);

        let mut removed = host.removed.clone();
        removed.sort();
        let mut expected = ids.to_vec();
        expected.sort();
        assert_eq!(removed, expected);
        assert_eq!(host.plane_detection, Some(false));
    }

    #[test]
    fn restarted_session_should_enable_detection_again() {
        let mut host = TestHost::default();
        let mut session = running_session(&mut host);
        session.on_anchor_added(&mut host, AnchorID::new_random(), &unit_anchor());
        session.stop(&mut host);
        session.start(&mut host);

        assert_eq!(session.state(), SessionState::Running);
        assert_eq!(host.plane_detection, Some(true));
        assert!(session.planes().is_empty());
    }

    #[test]
    fn interruption_should_suspend_and_resume_session() {
        let mut host = TestHost::default();
        let mut session = running_session(&mut host);
        session.on_session_interrupted();
        assert_eq!(session.state(), SessionState::Interrupted);
        session.on_session_interruption_ended();
        assert_eq!(session.state(), SessionState::Running);
    }

    #[test]
    fn failure_should_mark_session_failed() {
        let mut host = TestHost::default();
        let mut session = running_session(&mut host);
        session.on_session_failed(&TrackingLost);
        assert_eq!(session.state(), SessionState::Failed);
        session.on_session_interruption_ended();
        assert_eq!(session.state(), SessionState::Failed);
    }
}
