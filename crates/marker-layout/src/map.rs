//! The map renderer as seen by the layout engine.
//!
//! The engine never renders anything and never owns the map. It asks a
//! [`MapView`] for the features currently drawn in the viewport and for the
//! screen position of geographic coordinates, and that is all.

use marker_layout_core::{
    feature::{Feature, LngLat},
    geometry::Point,
};

/// Read-only access to a map renderer for the current viewport state.
///
/// Implementations are expected to be cheap to query and deterministic for a
/// given viewport: calling [`MapView::project`] twice with the same
/// coordinates between two viewport changes must return the same point.
pub trait MapView {
    /// Returns the features rendered in the viewport.
    ///
    /// When `layers` is provided only features drawn by these style layers
    /// are returned. Returns `None` while the map is not ready to be queried
    /// (style not loaded, no viewport yet).
    fn rendered_features(&self, layers: Option<&[String]>) -> Option<Vec<Feature>>;

    /// Projects geographic coordinates to a screen-space point.
    fn project(&self, coordinates: LngLat) -> Point;
}

impl<T: MapView + ?Sized> MapView for &T {
    fn rendered_features(&self, layers: Option<&[String]>) -> Option<Vec<Feature>> {
        (**self).rendered_features(layers)
    }

    fn project(&self, coordinates: LngLat) -> Point {
        (**self).project(coordinates)
    }
}
