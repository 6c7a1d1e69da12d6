//! User gestures and the session actions they trigger.

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

/// A point in screen coordinates, with the origin in the top left corner
/// and the y-axis pointing down.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
}

/// Stage of a continuous gesture.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GesturePhase {
    Began,
    Changed,
    Ended,
    Cancelled,
}

/// A recognized gesture as reported by the host.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Gesture {
    Tap {
        point: ScreenPoint,
    },
    LongPress {
        phase: GesturePhase,
        point: ScreenPoint,
    },
    /// A press held after a tap, with two touches in total.
    DoubleLongPress {
        phase: GesturePhase,
    },
}

/// What a gesture asks the session to do.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum GestureAction {
    InsertBody { at: ScreenPoint },
    Explode { at: ScreenPoint },
    HidePlanes,
}

/// Parameters for the gesture recognizers the host should install.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Number of taps required to insert a body.
    pub insert_tap_count: u32,
    /// How long a press must be held to trigger an explosion, in seconds.
    pub explosion_press_duration: f64,
    /// How long the second press must be held to hide the planes, in seconds.
    pub hide_press_duration: f64,
    /// Number of touches (taps plus the final press) required to hide the
    /// planes.
    pub hide_touch_count: u32,
}

impl Gesture {
    /// Returns the action this gesture triggers, or [`None`] if it triggers
    /// nothing. Long presses only act when they begin.
    pub fn action(&self) -> Option<GestureAction> {
        match *self {
            Self::Tap { point } => Some(GestureAction::InsertBody { at: point }),
            Self::LongPress {
                phase: GesturePhase::Began,
                point,
            } => Some(GestureAction::Explode { at: point }),
            Self::DoubleLongPress {
                phase: GesturePhase::Began,
            } => Some(GestureAction::HidePlanes),
            Self::LongPress { .. } | Self::DoubleLongPress { .. } => None,
        }
    }
}

impl GestureConfig {
    pub fn validate(&self) -> Result<()> {
        if self.insert_tap_count == 0 {
            bail!("Insertion tap count must be at least one");
        }
        if self.hide_touch_count < 2 {
            bail!(
                "Plane hiding touch count must be at least two, got {}",
                self.hide_touch_count
            );
        }
        for (name, duration) in [
            ("explosion", self.explosion_press_duration),
            ("hide", self.hide_press_duration),
        ] {
            if !(duration.is_finite() && duration >= 0.0) {
                bail!("Invalid {name} press duration: {duration}");
            }
        }
        Ok(())
    }
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            insert_tap_count: 1,
            explosion_press_duration: 0.5,
            hide_press_duration: 1.0,
            hide_touch_count: 2,
        }
    }
}
