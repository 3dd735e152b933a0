//! Marker Layout - collision-free placement of map markers and popups.
//!
//! A layout engine turns the features a map renderer draws in its viewport
//! into a set of non-overlapping screen-space markers, and reports on every
//! update which markers are new, which were already shown, and which must be
//! removed. The engine never draws anything; callers render the markers they
//! are given.
//!
//! One update runs the following pipeline:
//!
//! 1. query the rendered features of the configured layers,
//! 2. filter and sort them into priority order,
//! 3. group them into markers,
//! 4. place the markers greedily, rejecting those that collide,
//! 5. diff the placed markers against the previous update.
//!
//! # Example
//!
//! ```
//! use marker_layout::{
//!     MapView, MarkerLayout,
//!     config::{LayoutConfig, LayoutOptions},
//!     feature::{Feature, LngLat},
//!     geometry::Point,
//! };
//!
//! struct Flat(Vec<Feature>);
//!
//! impl MapView for Flat {
//!     fn rendered_features(&self, _layers: Option<&[String]>) -> Option<Vec<Feature>> {
//!         Some(self.0.clone())
//!     }
//!
//!     fn project(&self, coordinates: LngLat) -> Point {
//!         Point::new(coordinates.lng() as f32, coordinates.lat() as f32)
//!     }
//! }
//!
//! let map = Flat(vec![
//!     Feature::new_point(1, LngLat::new(0.0, 0.0)),
//!     Feature::new_point(2, LngLat::new(10.0, 0.0)),
//!     Feature::new_point(3, LngLat::new(500.0, 0.0)),
//! ]);
//!
//! let config = LayoutConfig::default().with_unit_size([40.0, 70.0]);
//! let mut layout = MarkerLayout::new(LayoutOptions::new(config)).unwrap();
//!
//! let status = layout.update(&map).unwrap();
//! // Feature 2 is too close to feature 1
//! assert_eq!(status.new_markers().len(), 2);
//!
//! let status = layout.update(&map).unwrap();
//! assert_eq!(status.updated().len(), 2);
//! ```

pub mod config;
pub mod diff;
pub mod group;
pub mod identity;
pub mod map;
pub mod marker;

mod error;
mod placement;
mod select;

#[cfg(test)]
mod test_support;

pub use marker_layout_core::{feature, geometry};

pub use diff::{MarkerMap, MarkerStatus, PopupStatus};
pub use error::LayoutError;
pub use identity::MarkerId;
pub use map::MapView;
pub use marker::{AbstractMarker, AbstractPopup, Marker, Popup, UnitKind};

use std::{fmt, marker::PhantomData};

use log::{debug, info, trace};

use config::{Anchor, LayoutOptions, SortingOrder};
use diff::DiffState;
use group::{GroupBy, Grouping};
use placement::Placement;
use select::{Selection, SortKey};

/// Layout engine for markers.
pub type MarkerLayout = LayoutEngine<Marker>;

/// Layout engine for popups.
pub type PopupManager = LayoutEngine<Popup>;

/// Stateful layout engine.
///
/// An engine is created once per map and updated whenever the viewport or the
/// rendered data changes. It remembers the markers of the last update to
/// classify the markers of the next one.
pub struct LayoutEngine<K: UnitKind> {
    layers: Option<Vec<String>>,
    selection: Selection,
    grouping: Grouping,
    placement: Placement,
    state: DiffState,
    kind: PhantomData<fn() -> K>,
}

impl<K: UnitKind> LayoutEngine<K> {
    /// Creates an engine from its options.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidOption`] if an enumerated option has an
    /// unknown value or a numeric option is out of range.
    pub fn new(options: impl Into<LayoutOptions>) -> Result<Self, LayoutError> {
        let (config, filter, ranking) = options.into().into_parts();

        let anchor = match config.anchor() {
            Some(name) => name
                .parse::<Anchor>()
                .map_err(|reason| LayoutError::invalid_option("anchor", name, reason))?,
            None => Anchor::default(),
        };

        let order = match config.sorting_order() {
            Some(name) => name
                .parse::<SortingOrder>()
                .map_err(|reason| LayoutError::invalid_option("sorting_order", name, reason))?,
            None => SortingOrder::default(),
        };

        let unit_size = config.unit_size();
        if ![unit_size.width(), unit_size.height()]
            .iter()
            .all(|v| v.is_finite() && *v >= 0.0)
        {
            return Err(LayoutError::invalid_option(
                "unit_size",
                format!("[{}, {}]", unit_size.width(), unit_size.height()),
                "expected finite non-negative dimensions",
            ));
        }

        let ratio = config.max_ratio_unit_size();
        if !(ratio.is_finite() && ratio > 0.0) {
            return Err(LayoutError::invalid_option(
                "max_ratio_unit_size",
                ratio,
                "expected a finite positive number",
            ));
        }

        if config.max_features_per_marker() == Some(0) {
            return Err(LayoutError::invalid_option(
                "max_features_per_marker",
                0,
                "a marker holds at least one feature",
            ));
        }

        let group_by = match config.group_by() {
            Some("") => {
                return Err(LayoutError::invalid_option(
                    "group_by",
                    "",
                    "expected a property name or 'coordinates'",
                ));
            }
            Some(key) => Some(GroupBy::from_key(key)),
            None => None,
        };

        let sort = match (ranking, config.sorting_property()) {
            (Some(ranking), _) => Some(SortKey::Rank(ranking)),
            (None, Some("")) => {
                return Err(LayoutError::invalid_option(
                    "sorting_property",
                    "",
                    "expected a property name",
                ));
            }
            (None, Some(property)) => Some(SortKey::Property(property.to_string())),
            (None, None) => None,
        };

        info!(
            kind = K::NAME,
            anchor:% = anchor,
            sorting_order:% = order,
            grouped = group_by.is_some(),
            sorted = sort.is_some();
            "Creating layout engine"
        );

        Ok(Self {
            layers: config.layers().map(<[String]>::to_vec),
            selection: Selection::new(filter, sort, order),
            grouping: Grouping::new(group_by, config.max_features_per_marker()),
            placement: Placement::new(
                unit_size,
                anchor,
                config.offset(),
                ratio,
                config.max(),
            ),
            state: DiffState::default(),
            kind: PhantomData,
        })
    }

    /// Lays out the features currently rendered by `map`.
    ///
    /// Returns `None`, leaving the engine untouched, when the map cannot be
    /// queried yet. Otherwise returns the new, updated and removed markers
    /// relative to the previous update.
    pub fn update<M>(&mut self, map: &M) -> Option<&MarkerStatus>
    where
        M: MapView + ?Sized,
    {
        let Some(features) = map.rendered_features(self.layers.as_deref()) else {
            debug!(kind = K::NAME; "Map not ready, skipping update");
            return None;
        };
        let rendered = features.len();

        let selected = self.selection.apply(features);
        let selected_count = selected.len();
        let groups = self.grouping.apply(selected);
        let group_count = groups.len();
        let placed = self.placement.place(map, groups);

        let status = self.state.apply(placed);
        debug!(
            kind = K::NAME,
            rendered = rendered,
            selected = selected_count,
            groups = group_count,
            new = status.new_markers().len(),
            updated = status.updated().len(),
            removed = status.removed().len();
            "Layout updated"
        );
        Some(status)
    }

    /// Returns the status computed by the last update.
    pub fn status(&self) -> &MarkerStatus {
        self.state.status()
    }

    /// Moves a marker to follow the map, without re-running the layout.
    ///
    /// Only the position changes: collisions are not checked again. Meant for
    /// continuous camera movement between two full updates.
    pub fn soft_update<M>(&self, map: &M, marker: &mut AbstractMarker)
    where
        M: MapView + ?Sized,
    {
        self.placement.reposition(map, marker);
        trace!(kind = K::NAME, marker_id = marker.id(); "Soft updated marker");
    }

    /// Soft updates every marker currently on screen.
    pub fn soft_update_present<M>(&mut self, map: &M)
    where
        M: MapView + ?Sized,
    {
        let placement = &self.placement;
        for marker in self.state.present_mut() {
            placement.reposition(map, marker);
        }
    }

    /// Forgets every marker: the next update reports all of its markers as new.
    pub fn reset(&mut self) {
        debug!(kind = K::NAME; "Resetting layout state");
        self.state.reset();
    }
}

impl<K: UnitKind> fmt::Debug for LayoutEngine<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutEngine")
            .field("kind", &K::NAME)
            .field("layers", &self.layers)
            .field("placement", &self.placement)
            .field("status", self.state.status())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use marker_layout_core::{
        feature::{Feature, LngLat},
        geometry::Point,
    };

    use super::*;
    use crate::{config::LayoutConfig, test_support::GridMap};

    fn config() -> LayoutConfig {
        LayoutConfig::default().with_unit_size([40.0, 70.0])
    }

    fn city(id: i64, lng: f64, lat: f64) -> Feature {
        Feature::new_point(id, LngLat::new(lng, lat))
            .with_layer("City labels")
            .with_property("class", "city")
    }

    #[test]
    fn test_new_rejects_invalid_options() {
        let cases = [
            (config().with_anchor_name("middle"), "anchor"),
            (config().with_sorting_order_name("sideways"), "sorting_order"),
            (config().with_max_ratio_unit_size(0.0), "max_ratio_unit_size"),
            (config().with_max_ratio_unit_size(f32::NAN), "max_ratio_unit_size"),
            (config().with_max_features_per_marker(0), "max_features_per_marker"),
            (config().with_unit_size([-1.0, 10.0]), "unit_size"),
            (config().with_group_by(""), "group_by"),
            (config().with_sorting_property(""), "sorting_property"),
        ];
        for (config, option) in cases {
            let err = MarkerLayout::new(config).unwrap_err();
            assert_eq!(err.option(), option);
        }
    }

    #[test]
    fn test_invalid_sorting_order_message() {
        let err = PopupManager::new(config().with_sorting_order_name("sideways")).unwrap_err();
        assert_eq!(
            err.to_string(),
            concat!(
                "Invalid value `sideways` for option `sorting_order`: ",
                "expected 'ascending' or 'descending'"
            )
        );
    }

    #[test]
    fn test_update_not_ready_keeps_state() {
        let mut layout = MarkerLayout::new(config()).unwrap();
        let map = GridMap::with_features(vec![city(1, 0.0, 0.0)]);
        layout.update(&map).unwrap();

        assert!(layout.update(&GridMap::not_ready()).is_none());
        assert_eq!(layout.status().new_markers().len(), 1);

        let status = layout.update(&map).unwrap();
        assert_eq!(status.updated().len(), 1);
        assert!(status.new_markers().is_empty());
    }

    #[test]
    fn test_update_queries_configured_layers() {
        let mut layout = MarkerLayout::new(config().with_layers(["City labels"])).unwrap();
        let map = GridMap::with_features(vec![
            city(1, 0.0, 0.0),
            Feature::new_point(2, LngLat::new(5.0, 0.0)).with_layer("Roads"),
        ]);

        let status = layout.update(&map).unwrap();
        assert_eq!(status.new_markers().len(), 1);
        assert_eq!(map.queries(), 1);
    }

    #[test]
    fn test_update_applies_filter() {
        let options = LayoutOptions::new(config()).with_filter(|feature| {
            feature.property("class").and_then(|v| v.as_str()) == Some("city")
        });
        let mut layout = MarkerLayout::new(options).unwrap();
        let map = GridMap::with_features(vec![
            city(1, 0.0, 0.0),
            Feature::new_point(2, LngLat::new(5.0, 0.0)).with_property("class", "hamlet"),
        ]);

        let status = layout.update(&map).unwrap();
        let ids: Vec<_> = status.present().map(|m| m.features()[0].id().to_string()).collect();
        assert_eq!(ids, vec!["1"]);
    }

    #[test]
    fn test_removed_then_forgotten() {
        let mut layout = MarkerLayout::new(config()).unwrap();
        let mut map = GridMap::with_features(vec![city(1, 0.0, 0.0), city(2, 5.0, 0.0)]);
        layout.update(&map).unwrap();

        map.set_features(vec![city(2, 5.0, 0.0)]);
        let status = layout.update(&map).unwrap();
        assert_eq!(status.removed().len(), 1);
        assert_eq!(status.updated().len(), 1);

        let status = layout.update(&map).unwrap();
        assert!(status.removed().is_empty());
    }

    #[test]
    fn test_reset_reports_everything_new() {
        let mut layout = MarkerLayout::new(config()).unwrap();
        let map = GridMap::with_features(vec![city(1, 0.0, 0.0), city(2, 5.0, 0.0)]);
        layout.update(&map).unwrap();

        layout.reset();
        assert!(layout.status().is_empty());
        let status = layout.update(&map).unwrap();
        assert_eq!(status.new_markers().len(), 2);
        assert!(status.updated().is_empty());
        assert!(status.removed().is_empty());
    }

    #[test]
    fn test_soft_update_moves_without_layout() {
        let mut layout = MarkerLayout::new(config()).unwrap();
        let mut map = GridMap::with_features(vec![city(1, 1.0, 1.0)]);
        let mut marker = layout
            .update(&map)
            .unwrap()
            .present()
            .next()
            .cloned()
            .unwrap();
        assert_eq!(marker.position(), Point::new(80.0, 65.0));

        map.pan(Point::new(-30.0, 12.0));
        layout.soft_update(&map, &mut marker);
        assert_eq!(marker.position(), Point::new(50.0, 77.0));
        // Stored markers are untouched
        assert_eq!(
            layout.status().present().next().map(AbstractMarker::position),
            Some(Point::new(80.0, 65.0))
        );
    }

    #[test]
    fn test_soft_update_present() {
        let mut layout = MarkerLayout::new(config()).unwrap();
        let mut map = GridMap::with_features(vec![city(1, 1.0, 1.0), city(2, 3.0, 1.0)]);
        layout.update(&map).unwrap();

        map.pan(Point::new(0.0, 100.0));
        layout.soft_update_present(&map);
        let ys: Vec<_> = layout.status().present().map(|m| m.position().y()).collect();
        assert_eq!(ys, vec![165.0, 165.0]);
    }

    #[test]
    fn test_debug_names_kind() {
        let layout = PopupManager::new(config()).unwrap();
        assert!(format!("{layout:?}").contains("\"popup\""));
    }
}
