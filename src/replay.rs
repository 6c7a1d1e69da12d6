//! Scripted sessions driven through a [`HeadlessHost`].

use crate::{
    config::SessionConfig,
    gesture::Gesture,
    headless::{HeadlessCamera, HeadlessHost},
    io,
    observer::{AnchorObserver, SessionObserver},
    session::{SessionController, SessionState, SessionStats},
};
use anyhow::{Context, Result, anyhow};
use nalgebra::{Point3, Vector3};
use planedrop_physics::DynamicBodyID;
use planedrop_scene::{AnchorID, PlaneAnchor};
use serde::{Deserialize, Serialize};
use std::{fmt, path::Path};

/// A sequence of tracking, gesture and frame events to replay.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplayScript {
    pub steps: Vec<ReplayStep>,
}

/// A single event in a [`ReplayScript`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ReplayStep {
    /// A new plane anchor was detected. The anchor node is placed at
    /// `origin` in the world.
    AddAnchor {
        id: AnchorID,
        #[serde(default)]
        origin: [f32; 3],
        center: [f32; 3],
        extent: [f32; 3],
    },
    UpdateAnchor {
        id: AnchorID,
        center: [f32; 3],
        extent: [f32; 3],
    },
    RemoveAnchor {
        id: AnchorID,
    },
    Gesture(Gesture),
    /// The simulation moved a body.
    MoveBody {
        body: u64,
        position: [f32; 3],
    },
    /// A frame update.
    Update,
    /// The user left the AR view, ending the session.
    Stop,
    /// The AR view was shown again.
    Start,
    Interrupt,
    EndInterruption,
    Fail(String),
}

/// The state of a replayed session after its last step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplaySummary {
    pub state: SessionState,
    pub n_planes: usize,
    pub n_hidden_planes: usize,
    pub n_bodies: usize,
    pub plane_detection: bool,
    pub n_host_calls: usize,
    pub stats: SessionStats,
}

/// A running session wired to a headless host.
#[derive(Debug)]
pub struct Replay {
    session: SessionController,
    host: HeadlessHost,
}

impl ReplayScript {
    /// Parses a script from the RON file at the given path.
    pub fn from_ron_file(file_path: impl AsRef<Path>) -> Result<Self> {
        io::parse_ron_file(file_path)
    }
}

impl Replay {
    /// Creates a headless host and starts a session on it.
    pub fn start(config: SessionConfig) -> Self {
        let mut host = HeadlessHost::new(HeadlessCamera::new(&config.headless_camera));
        let mut session = SessionController::new(config);
        session.start(&mut host);
        Self { session, host }
    }

    pub fn session(&self) -> &SessionController {
        &self.session
    }

    pub fn host(&self) -> &HeadlessHost {
        &self.host
    }

    /// Feeds the given step to the session.
    pub fn apply_step(&mut self, step: &ReplayStep) {
        match step {
            ReplayStep::AddAnchor {
                id,
                origin,
                center,
                extent,
            } => {
                self.host.place_anchor(*id, Point3::from(*origin));
                self.session
                    .on_anchor_added(&mut self.host, *id, &plane_anchor(center, extent));
            }
            ReplayStep::UpdateAnchor { id, center, extent } => {
                self.session
                    .on_anchor_updated(&mut self.host, *id, &plane_anchor(center, extent));
            }
            ReplayStep::RemoveAnchor { id } => {
                self.session.on_anchor_removed(&mut self.host, *id);
            }
            ReplayStep::Gesture(gesture) => {
                self.session.handle_gesture(&mut self.host, gesture);
            }
            ReplayStep::MoveBody { body, position } => {
                self.host
                    .move_body(DynamicBodyID::from_u64(*body), Point3::from(*position));
            }
            ReplayStep::Update => {
                self.session.update(&mut self.host);
            }
            ReplayStep::Stop => {
                self.session.stop(&mut self.host);
            }
            ReplayStep::Start => {
                self.session.start(&mut self.host);
            }
            ReplayStep::Interrupt => {
                self.session.on_session_interrupted();
            }
            ReplayStep::EndInterruption => {
                self.session.on_session_interruption_ended();
            }
            ReplayStep::Fail(message) => {
                let failure = anyhow!("{message}");
                self.session.on_session_failed(&*failure);
            }
        }
    }

    pub fn summary(&self) -> ReplaySummary {
        let planes = self.session.planes();
        ReplaySummary {
            state: self.session.state(),
            n_planes: planes.len(),
            n_hidden_planes: planes.iter().filter(|plane| !plane.is_visible()).count(),
            n_bodies: self.session.bodies().len(),
            plane_detection: self.host.plane_detection_enabled(),
            n_host_calls: self.host.calls().len(),
            stats: self.session.stats().clone(),
        }
    }
}

/// Validates the configuration, replays the script on a fresh headless
/// session and summarizes the outcome.
pub fn run_replay(config: SessionConfig, script: &ReplayScript) -> Result<ReplaySummary> {
    config
        .validate()
        .context("Can not replay with invalid configuration")?;

    let mut replay = Replay::start(config);

    planedrop_log::with_timing_debug_logging!(
        "Replaying {} steps", script.steps.len(); {
        for step in &script.steps {
            planedrop_log::trace!("Replaying {:?}", step);
            replay.apply_step(step);
        }
    });

    Ok(replay.summary())
}

impl fmt::Display for ReplaySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Session state:      {:?}", self.state)?;
        writeln!(
            f,
            "Planes:             {} ({} hidden)",
            self.n_planes, self.n_hidden_planes
        )?;
        writeln!(
            f,
            "Plane detection:    {}",
            if self.plane_detection { "on" } else { "off" }
        )?;
        writeln!(f, "Bodies:             {}", self.n_bodies)?;
        writeln!(f, "Missed hit tests:   {}", self.stats.missed_hit_tests)?;
        writeln!(f, "Explosions:         {}", self.stats.explosions)?;
        writeln!(
            f,
            "Impulses applied:   {} ({} bodies skipped)",
            self.stats.impulses_applied, self.stats.bodies_skipped
        )?;
        write!(f, "Host calls:         {}", self.n_host_calls)
    }
}

fn plane_anchor(center: &[f32; 3], extent: &[f32; 3]) -> PlaneAnchor {
    PlaneAnchor::new(Point3::from(*center), Vector3::from(*extent))
}
