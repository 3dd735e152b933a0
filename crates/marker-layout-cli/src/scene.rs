//! Scenes: recorded map sessions replayed through a layout engine.
//!
//! A scene lists the features of a map and a sequence of frames. Each frame
//! moves the camera; the tool then runs a full or a soft update against a
//! Web Mercator [`MapView`] of that camera.
//!
//! ```toml
//! [viewport]
//! width = 800
//! height = 600
//!
//! [[features]]
//! id = 1
//! layer = "City labels"
//! geometry = { type = "Point", coordinates = [2.35, 48.85] }
//! properties = { class = "city", rank = 1 }
//!
//! [[frames]]
//! center = [2.35, 48.85]
//! zoom = 5
//! ```

use std::f64::consts::PI;

use serde::Deserialize;

use marker_layout::{
    MapView,
    config::LayoutConfig,
    feature::{Feature, LngLat, PropertyValue},
    geometry::{Point, Size},
};

use crate::error::CliError;

/// Side of a map tile in pixels at zoom 0.
const TILE_SIZE: f64 = 512.0;

/// Latitude limit of the Web Mercator projection.
const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

fn default_ready() -> bool {
    true
}

/// Screen size of the map.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ViewportSize {
    width: f32,
    height: f32,
}

impl ViewportSize {
    pub fn size(self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// Keeps features whose property takes one of the listed values.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilterSpec {
    property: String,
    values: Vec<PropertyValue>,
}

impl FilterSpec {
    /// Returns true if the feature passes the filter
    pub fn accepts(&self, feature: &Feature) -> bool {
        feature
            .property(&self.property)
            .is_some_and(|value| self.values.contains(value))
    }
}

/// One camera position of a scene.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Frame {
    center: LngLat,
    zoom: f64,
    /// Only move the markers already shown
    #[serde(default)]
    soft: bool,
    /// `false` simulates a map whose style is not loaded yet
    #[serde(default = "default_ready")]
    ready: bool,
}

impl Frame {
    pub fn center(&self) -> LngLat {
        self.center
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn is_soft(&self) -> bool {
        self.soft
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }
}

/// A recorded map session.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scene {
    viewport: ViewportSize,

    /// Layout options, replacing the `[layout]` section of the configuration.
    #[serde(default)]
    layout: Option<LayoutConfig>,

    #[serde(default)]
    filter: Option<FilterSpec>,

    #[serde(default)]
    features: Vec<Feature>,

    frames: Vec<Frame>,
}

impl Scene {
    /// Parses and validates a scene.
    ///
    /// # Errors
    ///
    /// Returns `CliError::SceneParse` for malformed TOML, with the span of
    /// the error, and `CliError::SceneInvalid` for out of range values.
    pub fn parse(source: &str, name: &str) -> Result<Self, CliError> {
        let scene: Scene = toml::from_str(source)
            .map_err(|err| CliError::new_scene_parse_error(&err, name, source))?;
        scene.validate()?;
        Ok(scene)
    }

    fn validate(&self) -> Result<(), CliError> {
        let ViewportSize { width, height } = self.viewport;
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(CliError::SceneInvalid(format!(
                "viewport must have a positive size, got {width}x{height}"
            )));
        }
        if self.frames.is_empty() {
            return Err(CliError::SceneInvalid("a scene needs at least one frame".to_string()));
        }
        for (index, frame) in self.frames.iter().enumerate() {
            if !frame.zoom.is_finite() || frame.zoom < 0.0 {
                return Err(CliError::SceneInvalid(format!(
                    "frame {index}: zoom must be a non-negative number, got {}",
                    frame.zoom
                )));
            }
        }
        Ok(())
    }

    pub fn viewport(&self) -> ViewportSize {
        self.viewport
    }

    pub fn layout(&self) -> Option<&LayoutConfig> {
        self.layout.as_ref()
    }

    pub fn filter(&self) -> Option<&FilterSpec> {
        self.filter.as_ref()
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Returns the map as seen through the camera of `frame`.
    pub fn view<'a>(&'a self, frame: &Frame) -> WebMercatorView<'a> {
        WebMercatorView::new(
            &self.features,
            self.viewport.size(),
            frame.center,
            frame.zoom,
            frame.ready,
        )
    }
}

/// Position in Web Mercator world pixels at zoom 0, in `[0, 1]` on both axes.
fn mercator_unit(coordinates: LngLat) -> (f64, f64) {
    let lat = coordinates.lat().clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    let x = (coordinates.lng() + 180.0) / 360.0;
    let y = (1.0 - (PI / 4.0 + lat / 2.0).tan().ln() / PI) / 2.0;
    (x, y)
}

/// A Web Mercator camera over the features of a scene.
#[derive(Debug, Clone)]
pub struct WebMercatorView<'a> {
    features: &'a [Feature],
    size: Size,
    center_world: (f64, f64),
    world_size: f64,
    ready: bool,
}

impl<'a> WebMercatorView<'a> {
    pub fn new(
        features: &'a [Feature],
        size: Size,
        center: LngLat,
        zoom: f64,
        ready: bool,
    ) -> Self {
        let world_size = TILE_SIZE * zoom.exp2();
        let (x, y) = mercator_unit(center);
        Self {
            features,
            size,
            center_world: (x * world_size, y * world_size),
            world_size,
            ready,
        }
    }

    fn is_visible(&self, point: Point) -> bool {
        (0.0..=self.size.width()).contains(&point.x())
            && (0.0..=self.size.height()).contains(&point.y())
    }
}

impl MapView for WebMercatorView<'_> {
    fn rendered_features(&self, layers: Option<&[String]>) -> Option<Vec<Feature>> {
        if !self.ready {
            return None;
        }

        let features = self
            .features
            .iter()
            .filter(|feature| match layers {
                Some(layers) => feature
                    .layer()
                    .is_some_and(|layer| layers.iter().any(|l| l == layer)),
                None => true,
            })
            .filter(|feature| {
                feature
                    .point()
                    .is_none_or(|coordinates| self.is_visible(self.project(coordinates)))
            })
            .cloned()
            .collect();
        Some(features)
    }

    fn project(&self, coordinates: LngLat) -> Point {
        let (x, y) = mercator_unit(coordinates);
        let half_width = f64::from(self.size.width()) / 2.0;
        let half_height = f64::from(self.size.height()) / 2.0;
        let screen_x = x * self.world_size - self.center_world.0 + half_width;
        let screen_y = y * self.world_size - self.center_world.1 + half_height;
        Point::new(screen_x as f32, screen_y as f32)
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;

    use super::*;

    const SCENE: &str = r#"
        [viewport]
        width = 800
        height = 600

        [filter]
        property = "class"
        values = ["city", "town"]

        [[features]]
        id = 1
        layer = "City labels"
        geometry = { type = "Point", coordinates = [0.0, 0.0] }
        properties = { class = "city" }

        [[features]]
        id = 2
        layer = "Place labels"
        geometry = { type = "Point", coordinates = [170.0, 0.0] }
        properties = { class = "hamlet" }

        [[frames]]
        center = [0.0, 0.0]
        zoom = 1

        [[frames]]
        center = [10.0, 0.0]
        zoom = 1
        soft = true

        [[frames]]
        center = [0.0, 0.0]
        zoom = 1
        ready = false
    "#;

    fn view(center: LngLat, zoom: f64) -> WebMercatorView<'static> {
        WebMercatorView::new(&[], Size::new(800.0, 600.0), center, zoom, true)
    }

    #[test]
    fn test_parse_scene() {
        let scene = Scene::parse(SCENE, "scene.toml").unwrap();
        assert_eq!(scene.viewport().size(), Size::new(800.0, 600.0));
        assert_eq!(scene.features().len(), 2);
        assert_eq!(scene.frames().len(), 3);
        assert!(!scene.frames()[0].is_soft());
        assert!(scene.frames()[0].is_ready());
        assert!(scene.frames()[1].is_soft());
        assert!(!scene.frames()[2].is_ready());
        assert!(scene.layout().is_none());

        let filter = scene.filter().unwrap();
        assert!(filter.accepts(&scene.features()[0]));
        assert!(!filter.accepts(&scene.features()[1]));
    }

    #[test]
    fn test_parse_reports_span() {
        let source = "[viewport]\nwidth = 800\nheight = \"tall\"\n";
        let err = Scene::parse(source, "bad.toml").unwrap_err();
        assert!(matches!(err, CliError::SceneParse { span: Some(_), .. }));
    }

    #[test]
    fn test_validate_rejects_empty_frames() {
        let source = "frames = []\n[viewport]\nwidth = 10\nheight = 10\n";
        let err = Scene::parse(source, "s").unwrap_err();
        assert!(matches!(err, CliError::SceneInvalid(_)));
    }

    #[test]
    fn test_validate_rejects_negative_zoom() {
        let source =
            "[viewport]\nwidth = 10\nheight = 10\n[[frames]]\ncenter = [0, 0]\nzoom = -1\n";
        let err = Scene::parse(source, "s").unwrap_err();
        assert!(matches!(err, CliError::SceneInvalid(message) if message.contains("frame 0")));
    }

    #[test]
    fn test_center_projects_to_viewport_center() {
        let center = LngLat::new(2.35, 48.85);
        let point = view(center, 5.0).project(center);
        assert!(approx_eq!(f32, point.x(), 400.0, epsilon = 1e-3));
        assert!(approx_eq!(f32, point.y(), 300.0, epsilon = 1e-3));
    }

    #[test]
    fn test_projection_scale() {
        // At zoom 0 the world is 512 pixels wide
        let view = view(LngLat::new(0.0, 0.0), 0.0);
        let east = view.project(LngLat::new(90.0, 0.0));
        assert!(approx_eq!(f32, east.x(), 528.0, epsilon = 1e-3));
        assert!(approx_eq!(f32, east.y(), 300.0, epsilon = 1e-3));

        let north = view.project(LngLat::new(0.0, 45.0));
        assert!(north.y() < 300.0);
    }

    #[test]
    fn test_zoom_doubles_distances() {
        let origin = LngLat::new(0.0, 0.0);
        let east = LngLat::new(10.0, 0.0);
        let at = |zoom| view(origin, zoom).project(east).x() - 400.0;
        assert!(approx_eq!(f32, at(4.0), 2.0 * at(3.0), epsilon = 1e-3));
    }

    #[test]
    fn test_rendered_features_by_layer_and_visibility() {
        let scene = Scene::parse(SCENE, "scene.toml").unwrap();
        let view = scene.view(&scene.frames()[0]);

        // At zoom 1 the world is 1024 pixels wide: 170 degrees east is off screen
        let all = view.rendered_features(None).unwrap();
        assert_eq!(all.len(), 1);

        let places = view.rendered_features(Some(&["Place labels".to_string()])).unwrap();
        assert!(places.is_empty());
    }

    #[test]
    fn test_not_ready_view() {
        let scene = Scene::parse(SCENE, "scene.toml").unwrap();
        let view = scene.view(&scene.frames()[2]);
        assert!(view.rendered_features(None).is_none());
    }
}
