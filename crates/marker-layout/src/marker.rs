//! Abstract markers, the output of a layout engine.
//!
//! An [`AbstractMarker`] carries everything needed to draw a marker (where,
//! how big, which features) without drawing anything. The same type serves
//! markers and popups; the [`UnitKind`] of an engine only names what is being
//! laid out.

use std::fmt;

use marker_layout_core::{
    feature::Feature,
    geometry::{Bounds, Point, Size},
};

use crate::identity::MarkerId;

/// Kind of element a layout engine places.
pub trait UnitKind {
    /// Name used in logs
    const NAME: &'static str;
}

/// Markers: small labels pinned to map features.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {}

impl UnitKind for Marker {
    const NAME: &'static str = "marker";
}

/// Popups: larger information boxes pinned to map features.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Popup {}

impl UnitKind for Popup {
    const NAME: &'static str = "popup";
}

/// Minimal description of a laid out marker.
#[derive(Debug, Clone, PartialEq)]
pub struct AbstractMarker {
    id: MarkerId,
    position: Point,
    size: Size,
    internal_element_size: Size,
    features: Vec<Feature>,
}

/// Popups are described exactly like markers.
pub type AbstractPopup = AbstractMarker;

impl AbstractMarker {
    pub(crate) fn new(
        id: MarkerId,
        position: Point,
        size: Size,
        internal_element_size: Size,
        features: Vec<Feature>,
    ) -> Self {
        Self {
            id,
            position,
            size,
            internal_element_size,
            features,
        }
    }

    /// Returns the id, stable for the same set of features
    pub fn id(&self) -> MarkerId {
        self.id
    }

    /// Returns the screen-space position of the top-left corner
    pub fn position(&self) -> Point {
        self.position
    }

    /// Returns the screen-space size of the whole marker
    pub fn size(&self) -> Size {
        self.size
    }

    /// Returns the size of one entry of the marker
    pub fn internal_element_size(&self) -> Size {
        self.internal_element_size
    }

    /// Returns the features shown by the marker, anchor feature first
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Returns the feature the marker is pinned to
    pub fn anchor_feature(&self) -> Option<&Feature> {
        self.features.first()
    }

    /// Returns the screen-space bounding box
    pub fn bounds(&self) -> Bounds {
        self.position.to_bounds(self.size)
    }

    /// Returns true if the bounding boxes of the two markers overlap or touch
    pub fn collides_with(&self, other: &Self) -> bool {
        self.bounds().overlaps(&other.bounds())
    }

    pub(crate) fn set_position(&mut self, position: Point) {
        self.position = position;
    }
}

impl fmt::Display for AbstractMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} at ({:.1}, {:.1}) size {:.1}x{:.1} [",
            self.id,
            self.position.x(),
            self.position.y(),
            self.size.width(),
            self.size.height()
        )?;
        for (i, feature) in self.features.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", feature.id())?;
        }
        f.write_str("]")
    }
}
