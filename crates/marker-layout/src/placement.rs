//! Screen placement and collision avoidance.
//!
//! Groups are turned into candidate markers in priority order. A candidate is
//! kept only if its bounding box stays clear of every marker kept before it
//! in the same update; otherwise it is dropped until the next update. The
//! result depends on the order of the groups and is not globally optimal.

use log::{debug, trace};

use marker_layout_core::{
    feature::Feature,
    geometry::{Point, Size},
};

use crate::{
    config::Anchor,
    diff::MarkerMap,
    group::FeatureGroup,
    identity,
    map::MapView,
    marker::AbstractMarker,
};

/// Placement stage of the layout pipeline.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Placement {
    unit_size: Size,
    anchor: Anchor,
    offset: Point,
    max_ratio_unit_size: f32,
    max_markers: Option<usize>,
}

impl Placement {
    pub(crate) fn new(
        unit_size: Size,
        anchor: Anchor,
        offset: Point,
        max_ratio_unit_size: f32,
        max_markers: Option<usize>,
    ) -> Self {
        Self {
            unit_size,
            anchor,
            offset,
            max_ratio_unit_size,
            max_markers: max_markers.filter(|max| *max > 0),
        }
    }

    /// Number of units shown for a marker of `feature_count` features.
    ///
    /// May be fractional once the cap is reached.
    pub(crate) fn displayed_units(&self, feature_count: usize) -> f32 {
        (feature_count as f32).min(self.max_ratio_unit_size)
    }

    /// Offset from the projected anchor point to the top-left corner.
    ///
    /// Center, top and left anchors scale with the marker height so that
    /// taller markers stay anchored at the same point. The right anchor lifts
    /// the marker by a single unit whatever its height.
    pub(crate) fn anchor_offset(&self, displayed_units: f32) -> Point {
        let width = self.unit_size.width();
        let height = self.unit_size.height() * displayed_units;

        let anchor_offset = match self.anchor {
            Anchor::Center => Point::new(-width / 2.0, -height / 2.0),
            Anchor::Top => Point::new(-width / 2.0, -height),
            Anchor::Bottom => Point::new(-width / 2.0, 0.0),
            Anchor::Left => Point::new(-width, -height / 2.0),
            Anchor::Right => Point::new(0.0, -self.unit_size.height()),
        };

        anchor_offset.add_point(self.offset)
    }

    /// Screen position of a marker showing `features`, or `None` when the
    /// anchor feature is not a point or does not project to a finite point.
    fn position_of<M>(&self, map: &M, features: &[Feature]) -> Option<Point>
    where
        M: MapView + ?Sized,
    {
        let anchor = features.first()?;
        let offset = self.anchor_offset(self.displayed_units(features.len()));
        let position = map.project(anchor.point()?).add_point(offset);

        if !(position.x().is_finite() && position.y().is_finite()) {
            trace!(feature_id:% = anchor.id(); "Skipping feature with non-finite position");
            return None;
        }
        Some(position)
    }

    /// Recomputes the position of an existing marker for the current viewport.
    pub(crate) fn reposition<M>(&self, map: &M, marker: &mut AbstractMarker)
    where
        M: MapView + ?Sized,
    {
        if let Some(position) = self.position_of(map, marker.features()) {
            marker.set_position(position);
        }
    }

    /// Greedily places groups, in order, keeping only non-colliding markers.
    pub(crate) fn place<M>(&self, map: &M, groups: Vec<FeatureGroup>) -> MarkerMap
    where
        M: MapView + ?Sized,
    {
        let mut accepted = MarkerMap::new();

        for group in groups {
            if self.max_markers.is_some_and(|max| accepted.len() >= max) {
                debug!(max = accepted.len(); "Marker limit reached");
                break;
            }

            let features = group.into_features();
            let Some(position) = self.position_of(map, &features) else {
                continue;
            };

            let id = identity::compute_group_id(features.iter().map(Feature::id));
            if accepted.contains_key(&id) {
                trace!(marker_id = id; "Skipping duplicate marker");
                continue;
            }

            let size = self
                .unit_size
                .scale_height(self.displayed_units(features.len()));
            let marker = AbstractMarker::new(id, position, size, self.unit_size, features);

            if accepted.values().any(|placed| placed.collides_with(&marker)) {
                trace!(marker_id = id; "Rejecting colliding marker");
                continue;
            }

            accepted.insert(id, marker);
        }

        accepted
    }
}
