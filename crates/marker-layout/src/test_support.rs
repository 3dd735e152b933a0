//! In-memory map used by unit tests.

use std::cell::Cell;

use marker_layout_core::{
    feature::{Feature, LngLat},
    geometry::Point,
};

use crate::map::MapView;

/// Flat map projecting one degree to 100 pixels, origin at `(0, 0)`.
#[derive(Debug, Default)]
pub(crate) struct GridMap {
    features: Vec<Feature>,
    pan: Point,
    not_ready: bool,
    queries: Cell<usize>,
}

impl GridMap {
    pub(crate) fn with_features(features: Vec<Feature>) -> Self {
        Self {
            features,
            ..Self::default()
        }
    }

    pub(crate) fn not_ready() -> Self {
        Self {
            not_ready: true,
            ..Self::default()
        }
    }

    /// Shifts every projected point by `delta`.
    pub(crate) fn pan(&mut self, delta: Point) {
        self.pan = self.pan.add_point(delta);
    }

    pub(crate) fn set_features(&mut self, features: Vec<Feature>) {
        self.features = features;
    }

    pub(crate) fn queries(&self) -> usize {
        self.queries.get()
    }
}

impl MapView for GridMap {
    fn rendered_features(&self, layers: Option<&[String]>) -> Option<Vec<Feature>> {
        self.queries.set(self.queries.get() + 1);
        if self.not_ready {
            return None;
        }
        let features = self
            .features
            .iter()
            .filter(|feature| match (layers, feature.layer()) {
                (None, _) => true,
                (Some(layers), Some(layer)) => layers.iter().any(|l| l == layer),
                (Some(_), None) => false,
            })
            .cloned()
            .collect();
        Some(features)
    }

    fn project(&self, coordinates: LngLat) -> Point {
        let point = Point::new(
            (coordinates.lng() * 100.0) as f32,
            (coordinates.lat() * 100.0) as f32,
        );
        point.add_point(self.pan)
    }
}
