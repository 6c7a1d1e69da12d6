//! Registry of the planes for the currently tracked anchors.

use crate::{
    PlaneVisualConfig,
    anchor::{AnchorID, PlaneAnchor},
    plane::Plane,
};
use rustc_hash::FxHashMap;
use std::collections::hash_map::Entry;
use thiserror::Error;

/// Maps each tracked plane anchor to the [`Plane`] visualizing it.
///
/// There is at most one plane per anchor. An anchor missing from the registry
/// has either not been detected yet or has already been removed.
#[derive(Debug)]
pub struct PlaneRegistry {
    config: PlaneVisualConfig,
    planes: FxHashMap<AnchorID, Plane>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("A plane for anchor {id} is already registered")]
    DuplicateAnchor { id: AnchorID },
}

impl PlaneRegistry {
    /// Creates a new empty registry that will visualize planes according to
    /// the given configuration.
    pub fn new(config: PlaneVisualConfig) -> Self {
        Self {
            config,
            planes: FxHashMap::default(),
        }
    }

    pub fn config(&self) -> &PlaneVisualConfig {
        &self.config
    }

    /// Creates and registers a visible plane for the newly detected anchor
    /// with the given ID.
    ///
    /// # Errors
    /// Returns [`RegistryError::DuplicateAnchor`] if a plane for the anchor
    /// already exists. The existing plane is left untouched.
    pub fn on_anchor_added(
        &mut self,
        id: AnchorID,
        anchor: &PlaneAnchor,
    ) -> Result<&Plane, RegistryError> {
        match self.planes.entry(id) {
            Entry::Occupied(_) => Err(RegistryError::DuplicateAnchor { id }),
            Entry::Vacant(entry) => {
                planedrop_log::debug!(
                    "Adding plane for anchor {} with extent {:.2} x {:.2}",
                    id,
                    anchor.extent.x,
                    anchor.extent.z
                );
                Ok(&*entry.insert(Plane::new(id, anchor, &self.config)))
            }
        }
    }

    /// Updates the plane for the anchor with the given ID to the refined
    /// estimate. Does nothing if the anchor is not registered, since updates
    /// can race with removal.
    ///
    /// Returns the updated plane, or [`None`] if there was nothing to update.
    pub fn on_anchor_updated(&mut self, id: AnchorID, anchor: &PlaneAnchor) -> Option<&Plane> {
        let Some(plane) = self.planes.get_mut(&id) else {
            planedrop_log::trace!("Ignoring update for unregistered anchor {}", id);
            return None;
        };
        plane.update(anchor);
        Some(plane)
    }

    /// Removes the plane for the anchor with the given ID if it exists.
    ///
    /// Returns the removed plane, or [`None`] if the anchor was not
    /// registered.
    pub fn on_anchor_removed(&mut self, id: AnchorID) -> Option<Plane> {
        let removed = self.planes.remove(&id);
        if removed.is_some() {
            planedrop_log::debug!("Removed plane for anchor {}", id);
        }
        removed
    }

    /// Hides every registered plane by making all its faces transparent.
    ///
    /// There is no way to show the planes again, and later updates leave them
    /// hidden.
    pub fn hide_all(&mut self) {
        planedrop_log::debug!("Hiding {} planes", self.planes.len());
        for plane in self.planes.values_mut() {
            plane.hide(&self.config);
        }
    }

    /// Returns the plane for the anchor with the given ID, or [`None`] if it
    /// does not exist.
    pub fn get(&self, id: AnchorID) -> Option<&Plane> {
        self.planes.get(&id)
    }

    pub fn contains(&self, id: AnchorID) -> bool {
        self.planes.contains_key(&id)
    }

    /// The number of registered planes.
    pub fn len(&self) -> usize {
        self.planes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.planes.is_empty()
    }

    /// Returns an iterator over all registered planes, in no particular
    /// order.
    pub fn iter(&self) -> impl Iterator<Item = &Plane> {
        self.planes.values()
    }

    /// Returns an iterator over the IDs of all registered anchors, in no
    /// particular order.
    pub fn anchor_ids(&self) -> impl Iterator<Item = AnchorID> + '_ {
        self.planes.keys().copied()
    }

    /// Removes all planes.
    pub fn clear(&mut self) {
        self.planes.clear();
    }
}
