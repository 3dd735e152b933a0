//! Map features as reported by a map renderer.
//!
//! A [`Feature`] is a read-only record describing one rendered vector feature:
//! a stable identifier, a GeoJSON-like geometry, the style layer it was drawn
//! from, and an open set of named properties. The layout engine only places
//! [`Geometry::Point`] features; other geometries are carried so that a map
//! renderer can hand over its query results untouched.
//!
//! All types deserialize from the GeoJSON-shaped structures used in scene
//! files:
//!
//! ```
//! # use marker_layout_core::feature::{Feature, FeatureId, LngLat};
//! let feature: Feature = toml::from_str(r#"
//!     id = 42
//!     layer = "City labels"
//!     geometry = { type = "Point", coordinates = [2.35, 48.85] }
//!     properties = { class = "city", rank = 1 }
//! "#).unwrap();
//!
//! assert_eq!(feature.id(), &FeatureId::Number(42));
//! assert_eq!(feature.point(), Some(LngLat::new(2.35, 48.85)));
//! ```

use std::{cmp::Ordering, collections::BTreeMap, fmt};

use serde::Deserialize;

/// Identifier of a feature, numeric for vector tile features and textual
/// for features from GeoJSON sources with string ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(untagged)]
pub enum FeatureId {
    Number(i64),
    Text(String),
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureId::Number(n) => write!(f, "{n}"),
            FeatureId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for FeatureId {
    fn from(value: i64) -> Self {
        FeatureId::Number(value)
    }
}

impl From<i32> for FeatureId {
    fn from(value: i32) -> Self {
        FeatureId::Number(i64::from(value))
    }
}

impl From<&str> for FeatureId {
    fn from(value: &str) -> Self {
        FeatureId::Text(value.to_string())
    }
}

/// A geographic coordinate pair in degrees.
///
/// Deserializes from a GeoJSON position `[lng, lat, ...]`; any altitude
/// component is ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(try_from = "Vec<f64>")]
pub struct LngLat {
    lng: f64,
    lat: f64,
}

impl LngLat {
    /// Creates a new coordinate from longitude and latitude in degrees
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    /// Returns the longitude in degrees
    pub fn lng(self) -> f64 {
        self.lng
    }

    /// Returns the latitude in degrees
    pub fn lat(self) -> f64 {
        self.lat
    }
}

impl TryFrom<Vec<f64>> for LngLat {
    type Error = String;

    fn try_from(position: Vec<f64>) -> Result<Self, Self::Error> {
        match position.as_slice() {
            [lng, lat, ..] => Ok(Self::new(*lng, *lat)),
            _ => Err(format!(
                "a position needs at least 2 components, found {}",
                position.len()
            )),
        }
    }
}

/// Geometry of a feature.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    Point(LngLat),
    LineString(Vec<LngLat>),
    Polygon(Vec<Vec<LngLat>>),
}

/// Value of a feature property.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Number(f64),
    String(String),
}

impl PropertyValue {
    /// Returns the numeric value, if this is a number
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PropertyValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the string value, if this is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the boolean value, if this is a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Total ordering used when sorting features by a property.
    ///
    /// Values of the same kind compare naturally (numbers with
    /// [`f64::total_cmp`]). Values of different kinds order as
    /// `Bool < Number < String`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use std::cmp::Ordering;
    /// # use marker_layout_core::feature::PropertyValue;
    /// let low = PropertyValue::from(2.0);
    /// let high = PropertyValue::from(10.0);
    /// assert_eq!(low.natural_cmp(&high), Ordering::Less);
    ///
    /// let text = PropertyValue::from("2");
    /// assert_eq!(high.natural_cmp(&text), Ordering::Less);
    /// ```
    pub fn natural_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (PropertyValue::Bool(a), PropertyValue::Bool(b)) => a.cmp(b),
            (PropertyValue::Number(a), PropertyValue::Number(b)) => a.total_cmp(b),
            (PropertyValue::String(a), PropertyValue::String(b)) => a.cmp(b),
            _ => self.kind_rank().cmp(&other.kind_rank()),
        }
    }

    fn kind_rank(&self) -> u8 {
        match self {
            PropertyValue::Bool(_) => 0,
            PropertyValue::Number(_) => 1,
            PropertyValue::String(_) => 2,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Bool(b) => write!(f, "{b}"),
            PropertyValue::Number(n) => write!(f, "{n}"),
            PropertyValue::String(s) => f.write_str(s),
        }
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::Number(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::String(value.to_string())
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

/// A rendered map feature.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Feature {
    id: FeatureId,

    /// Style layer the feature was rendered from.
    #[serde(default)]
    layer: Option<String>,

    geometry: Geometry,

    #[serde(default)]
    properties: BTreeMap<String, PropertyValue>,
}

impl Feature {
    /// Creates a feature with the given id and geometry and no properties.
    pub fn new(id: impl Into<FeatureId>, geometry: Geometry) -> Self {
        Self {
            id: id.into(),
            layer: None,
            geometry,
            properties: BTreeMap::new(),
        }
    }

    /// Creates a point feature.
    ///
    /// # Examples
    ///
    /// ```
    /// # use marker_layout_core::feature::{Feature, LngLat};
    /// let paris = Feature::new_point(1, LngLat::new(2.35, 48.85))
    ///     .with_layer("City labels")
    ///     .with_property("rank", 1.0);
    ///
    /// assert!(paris.is_point());
    /// assert_eq!(paris.property("rank").and_then(|v| v.as_f64()), Some(1.0));
    /// ```
    pub fn new_point(id: impl Into<FeatureId>, coordinates: LngLat) -> Self {
        Self::new(id, Geometry::Point(coordinates))
    }

    /// Sets the style layer of the feature
    pub fn with_layer(mut self, layer: impl Into<String>) -> Self {
        self.layer = Some(layer.into());
        self
    }

    /// Sets a property of the feature
    pub fn with_property(
        mut self,
        name: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    /// Returns the identifier of the feature
    pub fn id(&self) -> &FeatureId {
        &self.id
    }

    /// Returns the style layer the feature was rendered from, if known
    pub fn layer(&self) -> Option<&str> {
        self.layer.as_deref()
    }

    /// Returns the geometry of the feature
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Returns all properties of the feature
    pub fn properties(&self) -> &BTreeMap<String, PropertyValue> {
        &self.properties
    }

    /// Returns a single property by name
    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    /// Returns true if the feature has a point geometry
    pub fn is_point(&self) -> bool {
        matches!(self.geometry, Geometry::Point(_))
    }

    /// Returns the coordinates of a point feature
    pub fn point(&self) -> Option<LngLat> {
        match self.geometry {
            Geometry::Point(coordinates) => Some(coordinates),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_id_display() {
        assert_eq!(FeatureId::Number(-17).to_string(), "-17");
        assert_eq!(FeatureId::from("poi_3").to_string(), "poi_3");
    }

    #[test]
    fn test_feature_id_deserialize() {
        #[derive(Deserialize)]
        struct Ids {
            ids: Vec<FeatureId>,
        }

        let parsed: Ids = toml::from_str(r#"ids = [7, "seven"]"#).unwrap();
        assert_eq!(
            parsed.ids,
            vec![FeatureId::Number(7), FeatureId::Text("seven".to_string())]
        );
    }

    #[test]
    fn test_lng_lat_ignores_altitude() {
        let coordinates = LngLat::try_from(vec![1.0, 2.0, 300.0]).unwrap();
        assert_eq!(coordinates, LngLat::new(1.0, 2.0));
    }

    #[test]
    fn test_lng_lat_rejects_short_position() {
        assert!(LngLat::try_from(vec![1.0]).is_err());
        assert!(LngLat::try_from(Vec::new()).is_err());
    }

    #[test]
    fn test_deserialize_non_point_geometries() {
        let line: Feature = toml::from_str(
            r#"
            id = "road"
            geometry = { type = "LineString", coordinates = [[0.0, 0.0], [1.0, 1.0]] }
            "#,
        )
        .unwrap();
        assert!(!line.is_point());
        assert_eq!(line.point(), None);
        assert!(line.properties().is_empty());
        assert_eq!(line.layer(), None);

        let polygon: Feature = toml::from_str(
            r#"
            id = 9
            [geometry]
            type = "Polygon"
            coordinates = [[[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [0.0, 0.0]]]
            "#,
        )
        .unwrap();
        assert!(matches!(polygon.geometry(), Geometry::Polygon(rings) if rings[0].len() == 4));
    }

    #[test]
    fn test_property_values_deserialize() {
        let feature: Feature = toml::from_str(
            r#"
            id = 1
            geometry = { type = "Point", coordinates = [0.0, 0.0] }
            properties = { name = "Lyon", rank = 3, capital = false, population = 513275.5 }
            "#,
        )
        .unwrap();

        assert_eq!(feature.property("name").and_then(PropertyValue::as_str), Some("Lyon"));
        assert_eq!(feature.property("rank").and_then(PropertyValue::as_f64), Some(3.0));
        assert_eq!(feature.property("capital").and_then(PropertyValue::as_bool), Some(false));
        assert_eq!(
            feature.property("population").and_then(PropertyValue::as_f64),
            Some(513275.5)
        );
        assert_eq!(feature.property("missing"), None);
    }

    #[test]
    fn test_natural_cmp_same_kind() {
        assert_eq!(
            PropertyValue::from(1.0).natural_cmp(&PropertyValue::from(1.0)),
            Ordering::Equal
        );
        assert_eq!(
            PropertyValue::from("b").natural_cmp(&PropertyValue::from("a")),
            Ordering::Greater
        );
        assert_eq!(
            PropertyValue::from(false).natural_cmp(&PropertyValue::from(true)),
            Ordering::Less
        );
    }

    #[test]
    fn test_natural_cmp_mixed_kinds() {
        let boolean = PropertyValue::from(true);
        let number = PropertyValue::from(-5.0);
        let string = PropertyValue::from("");

        assert_eq!(boolean.natural_cmp(&number), Ordering::Less);
        assert_eq!(number.natural_cmp(&string), Ordering::Less);
        assert_eq!(string.natural_cmp(&boolean), Ordering::Greater);
    }
}
