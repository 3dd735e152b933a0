//! Feature selection: filtering and priority ordering.
//!
//! Selection decides which features compete for screen space and in which
//! order. Placement is greedy, so the order produced here is the priority of
//! the features: earlier features win contested areas.

use log::trace;

use marker_layout_core::feature::Feature;

use crate::config::{FeatureFilter, RankingFn, SortingOrder};

/// How features are ordered before grouping.
pub(crate) enum SortKey {
    /// Natural ordering of a property. Features without it are dropped.
    Property(String),
    /// Value returned by a ranking callback.
    Rank(RankingFn),
}

/// Filtering and ordering stage of the layout pipeline.
pub(crate) struct Selection {
    filter: Option<FeatureFilter>,
    sort: Option<SortKey>,
    order: SortingOrder,
}

impl Selection {
    pub(crate) fn new(
        filter: Option<FeatureFilter>,
        sort: Option<SortKey>,
        order: SortingOrder,
    ) -> Self {
        Self {
            filter,
            sort,
            order,
        }
    }

    /// Keeps the point features accepted by the filter, in priority order.
    ///
    /// Sorting is stable: features with equal keys keep the order in which
    /// the map reported them.
    pub(crate) fn apply(&self, features: Vec<Feature>) -> Vec<Feature> {
        let candidates = features.into_iter().filter(|feature| {
            if !feature.is_point() {
                trace!(feature_id:% = feature.id(); "Skipping non-point feature");
                return false;
            }
            self.filter.as_ref().is_none_or(|filter| filter(feature))
        });

        match &self.sort {
            None => candidates.collect(),
            Some(SortKey::Property(name)) => {
                let mut keyed: Vec<_> = candidates
                    .filter_map(|feature| match feature.property(name) {
                        Some(value) => Some((value.clone(), feature)),
                        None => {
                            trace!(
                                feature_id:% = feature.id(),
                                property = name.as_str();
                                "Skipping feature without sorting property"
                            );
                            None
                        }
                    })
                    .collect();
                keyed.sort_by(|(a, _), (b, _)| self.order.apply(a.natural_cmp(b)));
                keyed.into_iter().map(|(_, feature)| feature).collect()
            }
            Some(SortKey::Rank(ranking)) => {
                let mut keyed: Vec<_> = candidates
                    .map(|feature| (ranking(&feature), feature))
                    .collect();
                keyed.sort_by(|(a, _), (b, _)| self.order.apply(a.total_cmp(b)));
                keyed.into_iter().map(|(_, feature)| feature).collect()
            }
        }
    }
}
