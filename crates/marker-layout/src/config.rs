//! Configuration types for marker layout engines.
//!
//! This module provides the options that control how features are selected,
//! grouped and placed on screen.
//!
//! # Overview
//!
//! - [`LayoutConfig`] - Plain data options, deserializable with [`serde`].
//! - [`LayoutOptions`] - A [`LayoutConfig`] together with the filter and
//!   ranking callbacks, which cannot come from a configuration file.
//! - [`Anchor`] and [`SortingOrder`] - The enumerated option values.
//!
//! Enumerated options are kept as strings in [`LayoutConfig`] and validated
//! when an engine is created, so that a bad value fails engine creation
//! rather than configuration loading.
//!
//! # Example
//!
//! ```
//! # use marker_layout::config::{Anchor, LayoutConfig, LayoutOptions};
//! let config = LayoutConfig::default()
//!     .with_unit_size([40.0, 70.0])
//!     .with_anchor(Anchor::Bottom)
//!     .with_sorting_property("rank");
//!
//! let options = LayoutOptions::new(config)
//!     .with_filter(|feature| feature.property("class").is_some());
//! assert!(options.filter().is_some());
//! ```

use std::{fmt, str::FromStr};

use serde::Deserialize;

use marker_layout_core::{
    feature::Feature,
    geometry::{Point, Size},
};

/// Predicate deciding whether a feature may get a marker.
pub type FeatureFilter = Box<dyn Fn(&Feature) -> bool>;

/// Function returning the sorting value (rank) of a feature.
pub type RankingFn = Box<dyn Fn(&Feature) -> f64>;

/// Value of `group_by` that groups features sharing the same coordinates.
pub const GROUP_BY_COORDINATES: &str = "coordinates";

/// How a marker is anchored to the projected point of its feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Anchor {
    /// The marker is centered on the point (default)
    #[default]
    Center,
    /// The marker sits above the point, its bottom edge on the point
    Top,
    /// The marker hangs below the point, its top edge on the point
    Bottom,
    /// The marker sits left of the point, its right edge on the point
    Left,
    /// The marker sits right of the point, its left edge on the point and
    /// its top edge one unit height above it
    Right,
}

impl FromStr for Anchor {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "center" => Ok(Self::Center),
            "top" => Ok(Self::Top),
            "bottom" => Ok(Self::Bottom),
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            _ => Err("expected 'center', 'top', 'bottom', 'left' or 'right'"),
        }
    }
}

impl From<Anchor> for &'static str {
    fn from(val: Anchor) -> Self {
        match val {
            Anchor::Center => "center",
            Anchor::Top => "top",
            Anchor::Bottom => "bottom",
            Anchor::Left => "left",
            Anchor::Right => "right",
        }
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str((*self).into())
    }
}

/// Direction in which sorted features are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortingOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortingOrder {
    /// Applies the direction to an ordering computed in ascending order.
    pub fn apply(self, ordering: std::cmp::Ordering) -> std::cmp::Ordering {
        match self {
            SortingOrder::Ascending => ordering,
            SortingOrder::Descending => ordering.reverse(),
        }
    }
}

impl FromStr for SortingOrder {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ascending" => Ok(Self::Ascending),
            "descending" => Ok(Self::Descending),
            _ => Err("expected 'ascending' or 'descending'"),
        }
    }
}

impl From<SortingOrder> for &'static str {
    fn from(val: SortingOrder) -> Self {
        match val {
            SortingOrder::Ascending => "ascending",
            SortingOrder::Descending => "descending",
        }
    }
}

impl fmt::Display for SortingOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str((*self).into())
    }
}

/// Data options of a layout engine.
///
/// Field names are snake_case; the camelCase names used by map SDK plugins
/// (`markerSize`, `maxNbFeaturesPerMarker`, ...) are accepted as aliases.
/// Every field is optional and falls back to the defaults documented on the
/// accessors.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    /// Style layers to query. `None` queries every layer.
    layers: Option<Vec<String>>,

    /// Size of one unit of a marker on screen.
    #[serde(alias = "markerSize", alias = "popupSize", alias = "marker_size", alias = "popup_size")]
    unit_size: Size,

    /// Maximum number of markers kept per update.
    max: Option<usize>,

    /// Anchor name, validated on engine creation.
    #[serde(alias = "markerAnchor", alias = "popupAnchor")]
    anchor: Option<String>,

    /// Offset in pixels applied after anchoring.
    offset: Point,

    /// Property to sort the features by.
    #[serde(alias = "sortingProperty")]
    sorting_property: Option<String>,

    /// Sorting direction name, validated on engine creation.
    #[serde(alias = "sortingOrder")]
    sorting_order: Option<String>,

    /// Property to group the features by, or `"coordinates"`.
    #[serde(alias = "groupBy")]
    group_by: Option<String>,

    /// Maximum number of features in a single marker.
    #[serde(
        alias = "maxNbFeaturesPerMarker",
        alias = "maxNbFeaturesPerPopup",
        alias = "max_features_per_popup"
    )]
    max_features_per_marker: Option<usize>,

    /// Maximum height of a marker, in units.
    #[serde(alias = "maxRatioUnitSize")]
    max_ratio_unit_size: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            layers: None,
            unit_size: Size::new(150.0, 50.0),
            max: None,
            anchor: None,
            offset: Point::default(),
            sorting_property: None,
            sorting_order: None,
            group_by: None,
            max_features_per_marker: None,
            max_ratio_unit_size: 2.5,
        }
    }
}

impl LayoutConfig {
    /// Restricts feature queries to the given style layers
    pub fn with_layers<I, S>(mut self, layers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.layers = Some(layers.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the size of one marker unit
    pub fn with_unit_size(mut self, size: impl Into<Size>) -> Self {
        self.unit_size = size.into();
        self
    }

    /// Sets the maximum number of markers kept per update. Zero means no
    /// maximum
    pub fn with_max(mut self, max: usize) -> Self {
        self.max = Some(max);
        self
    }

    /// Sets the anchor of the markers
    pub fn with_anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = Some(anchor.to_string());
        self
    }

    /// Sets the anchor from its name; the name is validated on engine creation
    pub fn with_anchor_name(mut self, anchor: impl Into<String>) -> Self {
        self.anchor = Some(anchor.into());
        self
    }

    /// Sets the pixel offset applied after anchoring
    pub fn with_offset(mut self, offset: impl Into<Point>) -> Self {
        self.offset = offset.into();
        self
    }

    /// Sorts features by the given property
    pub fn with_sorting_property(mut self, property: impl Into<String>) -> Self {
        self.sorting_property = Some(property.into());
        self
    }

    /// Sets the sorting direction
    pub fn with_sorting_order(mut self, order: SortingOrder) -> Self {
        self.sorting_order = Some(order.to_string());
        self
    }

    /// Sets the sorting direction from its name; the name is validated on engine creation
    pub fn with_sorting_order_name(mut self, order: impl Into<String>) -> Self {
        self.sorting_order = Some(order.into());
        self
    }

    /// Groups features by the given property, or by coordinates with [`GROUP_BY_COORDINATES`]
    pub fn with_group_by(mut self, key: impl Into<String>) -> Self {
        self.group_by = Some(key.into());
        self
    }

    /// Sets the maximum number of features in a single marker
    pub fn with_max_features_per_marker(mut self, max: usize) -> Self {
        self.max_features_per_marker = Some(max);
        self
    }

    /// Sets the maximum height of a marker, in units
    pub fn with_max_ratio_unit_size(mut self, ratio: f32) -> Self {
        self.max_ratio_unit_size = ratio;
        self
    }

    /// Returns the style layers to query, `None` for all layers
    pub fn layers(&self) -> Option<&[String]> {
        self.layers.as_deref()
    }

    /// Returns the size of one marker unit. Default: `[150, 50]`
    pub fn unit_size(&self) -> Size {
        self.unit_size
    }

    /// Returns the maximum number of markers. Default: no maximum
    ///
    /// A maximum of zero is accepted and also places no limit.
    pub fn max(&self) -> Option<usize> {
        self.max
    }

    /// Returns the raw anchor name. Default: `"center"`
    pub fn anchor(&self) -> Option<&str> {
        self.anchor.as_deref()
    }

    /// Returns the pixel offset. Default: `[0, 0]`
    pub fn offset(&self) -> Point {
        self.offset
    }

    /// Returns the sorting property. Default: no sorting
    pub fn sorting_property(&self) -> Option<&str> {
        self.sorting_property.as_deref()
    }

    /// Returns the raw sorting direction name. Default: `"ascending"`
    pub fn sorting_order(&self) -> Option<&str> {
        self.sorting_order.as_deref()
    }

    /// Returns the grouping key. Default: no grouping
    pub fn group_by(&self) -> Option<&str> {
        self.group_by.as_deref()
    }

    /// Returns the maximum number of features per marker. Default: no maximum
    pub fn max_features_per_marker(&self) -> Option<usize> {
        self.max_features_per_marker
    }

    /// Returns the maximum marker height in units. Default: `2.5`
    ///
    /// Intentionally non-integer so that a partly visible last entry hints
    /// that the marker holds more features than it shows.
    pub fn max_ratio_unit_size(&self) -> f32 {
        self.max_ratio_unit_size
    }
}

/// Complete options of a layout engine: data options plus callbacks.
#[derive(Default)]
pub struct LayoutOptions {
    config: LayoutConfig,
    filter: Option<FeatureFilter>,
    ranking: Option<RankingFn>,
}

impl LayoutOptions {
    /// Creates options from data options, without callbacks.
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            filter: None,
            ranking: None,
        }
    }

    /// Keeps only the features for which `filter` returns `true`.
    pub fn with_filter(mut self, filter: impl Fn(&Feature) -> bool + 'static) -> Self {
        self.filter = Some(Box::new(filter));
        self
    }

    /// Sorts features by the value returned by `ranking`.
    ///
    /// Takes precedence over the sorting property of the [`LayoutConfig`].
    pub fn with_ranking(mut self, ranking: impl Fn(&Feature) -> f64 + 'static) -> Self {
        self.ranking = Some(Box::new(ranking));
        self
    }

    /// Returns the data options
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Returns the filter callback, if any
    pub fn filter(&self) -> Option<&FeatureFilter> {
        self.filter.as_ref()
    }

    /// Returns the ranking callback, if any
    pub fn ranking(&self) -> Option<&RankingFn> {
        self.ranking.as_ref()
    }

    pub(crate) fn into_parts(self) -> (LayoutConfig, Option<FeatureFilter>, Option<RankingFn>) {
        (self.config, self.filter, self.ranking)
    }
}

impl From<LayoutConfig> for LayoutOptions {
    fn from(config: LayoutConfig) -> Self {
        Self::new(config)
    }
}

impl fmt::Debug for LayoutOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutOptions")
            .field("config", &self.config)
            .field("filter", &self.filter.is_some())
            .field("ranking", &self.ranking.is_some())
            .finish()
    }
}
