//! Frame-to-frame diffing of placed markers.
//!
//! Every update classifies the markers kept on screen against the previous
//! update:
//!
//! ```text
//!   absent ──► new ──► updated ──► absent
//!                └──────────────────┘
//! ```
//!
//! A marker seen for the first time is *new*, a marker that was already on
//! screen is *updated* (its position may have changed), and a marker that
//! disappeared is *removed*. A marker never goes from absent straight to
//! updated.

use std::mem;

use indexmap::IndexMap;

use crate::{identity::MarkerId, marker::AbstractMarker};

/// Markers keyed by id, in placement order.
pub type MarkerMap = IndexMap<MarkerId, AbstractMarker>;

/// Changes of the marker set since the previous update.
///
/// The three maps are disjoint. `new` and `updated` together hold exactly
/// the markers currently on screen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkerStatus {
    new: MarkerMap,
    updated: MarkerMap,
    removed: MarkerMap,
}

/// Popups share the status type of markers.
pub type PopupStatus = MarkerStatus;

impl MarkerStatus {
    /// Returns the markers added since the previous update
    pub fn new_markers(&self) -> &MarkerMap {
        &self.new
    }

    /// Returns the markers that were already present in the previous update
    pub fn updated(&self) -> &MarkerMap {
        &self.updated
    }

    /// Returns the markers that are no longer present
    pub fn removed(&self) -> &MarkerMap {
        &self.removed
    }

    /// Iterates over the markers currently on screen: new ones, then updated ones
    pub fn present(&self) -> impl Iterator<Item = &AbstractMarker> {
        self.new.values().chain(self.updated.values())
    }

    /// Returns the number of markers currently on screen
    pub fn present_len(&self) -> usize {
        self.new.len() + self.updated.len()
    }

    /// Returns true if the marker is currently on screen
    pub fn is_present(&self, id: MarkerId) -> bool {
        self.new.contains_key(&id) || self.updated.contains_key(&id)
    }

    /// Returns true if no marker is on screen and none was removed
    pub fn is_empty(&self) -> bool {
        self.new.is_empty() && self.updated.is_empty() && self.removed.is_empty()
    }

    fn present_mut(&mut self) -> impl Iterator<Item = &mut AbstractMarker> {
        self.new.values_mut().chain(self.updated.values_mut())
    }
}

/// Persistent identity table of a layout engine.
///
/// Only the last status is stored: the previously present set is its `new`
/// and `updated` maps.
#[derive(Debug, Clone, Default)]
pub(crate) struct DiffState {
    last_status: MarkerStatus,
}

impl DiffState {
    /// Classifies the markers placed by this update and makes them the
    /// reference for the next one.
    pub(crate) fn apply(&mut self, placed: MarkerMap) -> &MarkerStatus {
        let previous = mem::take(&mut self.last_status);
        let mut last_present: MarkerMap =
            previous.new.into_iter().chain(previous.updated).collect();

        let mut new = MarkerMap::new();
        let mut updated = MarkerMap::new();
        for (id, marker) in placed {
            if last_present.contains_key(&id) {
                updated.insert(id, marker);
            } else {
                new.insert(id, marker);
            }
        }
        last_present.retain(|id, _| !updated.contains_key(id));

        self.last_status = MarkerStatus {
            new,
            updated,
            removed: last_present,
        };
        &self.last_status
    }

    pub(crate) fn status(&self) -> &MarkerStatus {
        &self.last_status
    }

    pub(crate) fn present_mut(&mut self) -> impl Iterator<Item = &mut AbstractMarker> {
        self.last_status.present_mut()
    }

    pub(crate) fn reset(&mut self) {
        self.last_status = MarkerStatus::default();
    }
}
