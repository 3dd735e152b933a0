//! Grouping of features into markers.
//!
//! Each group becomes one marker. Groups are keyed by a property value, by
//! the exact coordinates of the features, or by the feature itself when no
//! grouping is configured. Groups keep the order in which their key first
//! appeared, so the priority established by selection carries over.

use indexmap::{IndexMap, map::Entry};
use log::trace;

use marker_layout_core::feature::{Feature, FeatureId, PropertyValue};

use crate::{config::GROUP_BY_COORDINATES, identity};

/// What features are grouped by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupBy {
    /// The value of a named property
    Property(String),
    /// The coordinates of point features
    Coordinates,
}

impl GroupBy {
    /// Interprets a `group_by` option value.
    pub fn from_key(key: &str) -> Self {
        if key == GROUP_BY_COORDINATES {
            GroupBy::Coordinates
        } else {
            GroupBy::Property(key.to_string())
        }
    }
}

/// Key identifying a group within one update.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GroupKey {
    /// Ungrouped: the id of the single feature
    Feature(FeatureId),
    /// Bit-exact coordinates of the features
    Coordinates(u64, u64),
    /// Boolean property value
    Bool(bool),
    /// Numeric property value, by bit pattern
    Number(u64),
    /// String property value
    Text(String),
}

impl GroupKey {
    fn from_property(value: &PropertyValue) -> Self {
        match value {
            PropertyValue::Bool(b) => GroupKey::Bool(*b),
            // 0.0 and -0.0 are one key
            PropertyValue::Number(n) if *n == 0.0 => GroupKey::Number(0),
            PropertyValue::Number(n) => GroupKey::Number(n.to_bits()),
            PropertyValue::String(s) => GroupKey::Text(s.clone()),
        }
    }
}

/// Features rendered together as a single marker.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureGroup {
    key: GroupKey,
    features: Vec<Feature>,
}

impl FeatureGroup {
    /// Returns the key of the group
    pub fn key(&self) -> &GroupKey {
        &self.key
    }

    /// Returns the features of the group, in discovery order
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Returns the first feature, which anchors the marker
    pub fn anchor_feature(&self) -> Option<&Feature> {
        self.features.first()
    }

    pub(crate) fn into_features(self) -> Vec<Feature> {
        self.features
    }
}

/// Grouping stage of the layout pipeline.
#[derive(Debug, Clone, Default)]
pub(crate) struct Grouping {
    group_by: Option<GroupBy>,
    max_features: Option<usize>,
}

impl Grouping {
    pub(crate) fn new(group_by: Option<GroupBy>, max_features: Option<usize>) -> Self {
        Self {
            group_by,
            max_features,
        }
    }

    /// Partitions features into groups.
    ///
    /// A feature that would overflow a full group is dropped; it is never moved
    /// to another group. Features lacking the grouping property are dropped.
    pub(crate) fn apply(&self, features: Vec<Feature>) -> Vec<FeatureGroup> {
        let Some(group_by) = &self.group_by else {
            return features
                .into_iter()
                .map(|feature| FeatureGroup {
                    key: GroupKey::Feature(feature.id().clone()),
                    features: vec![feature],
                })
                .collect();
        };

        let mut groups: IndexMap<GroupKey, Vec<Feature>> = IndexMap::new();
        for feature in features {
            let Some(key) = Self::key_of(group_by, &feature) else {
                trace!(feature_id:% = feature.id(); "Skipping feature without grouping key");
                continue;
            };

            match groups.entry(key) {
                Entry::Vacant(entry) => {
                    entry.insert(vec![feature]);
                }
                Entry::Occupied(mut entry) => {
                    let members = entry.get_mut();
                    if self.max_features.is_none_or(|max| members.len() < max) {
                        members.push(feature);
                    } else {
                        trace!(feature_id:% = feature.id(); "Dropping feature from full group");
                    }
                }
            }
        }

        groups
            .into_iter()
            .map(|(key, features)| FeatureGroup { key, features })
            .collect()
    }

    fn key_of(group_by: &GroupBy, feature: &Feature) -> Option<GroupKey> {
        match group_by {
            GroupBy::Coordinates => feature.point().map(|coordinates| {
                let (lng, lat) = identity::coordinate_key(coordinates);
                GroupKey::Coordinates(lng, lat)
            }),
            GroupBy::Property(name) => feature.property(name).map(GroupKey::from_property),
        }
    }
}
