//! Callbacks the host invokes on the session controller.
//!
//! All callbacks for a session are expected on a single thread, or otherwise
//! serialized by the host. The host is passed back into each callback so the
//! controller can issue scene operations in response.

use planedrop_scene::{AnchorID, PlaneAnchor};
use std::error::Error;

/// Receives plane anchor lifecycle events from the tracking engine.
pub trait AnchorObserver<H: ?Sized> {
    fn on_anchor_added(&mut self, host: &mut H, id: AnchorID, anchor: &PlaneAnchor);

    fn on_anchor_updated(&mut self, host: &mut H, id: AnchorID, anchor: &PlaneAnchor);

    fn on_anchor_removed(&mut self, host: &mut H, id: AnchorID);
}

/// Receives session lifecycle events from the tracking engine.
pub trait SessionObserver {
    /// The session stopped because of the given error.
    fn on_session_failed(&mut self, error: &dyn Error);

    /// The session was interrupted, for example because the app moved to the
    /// background. Tracking is suspended until the interruption ends.
    fn on_session_interrupted(&mut self);

    fn on_session_interruption_ended(&mut self);
}
