//! Geometric primitives for screen-space marker placement.
//!
//! This module provides the geometric types used by the layout engine to
//! position markers on screen and to test them against each other.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate in screen space
//! - [`Size`] - Width and height dimensions
//! - [`Bounds`] - An axis-aligned bounding box defined by minimum and maximum coordinates
//!
//! # Coordinate System
//!
//! Screen space follows the convention of every map canvas:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! - **Origin**: Top-left corner of the viewport at `(0, 0)`
//! - **X-axis**: Increases rightward
//! - **Y-axis**: Increases downward
//!
//! Geographic coordinates live in [`crate::feature::LngLat`]; converting them
//! to screen space is the job of the map renderer.

use serde::Deserialize;

/// A 2D point representing a position in screen space.
///
/// Points use `f32` coordinates and provide operations for basic vector math.
/// Deserializes from a two-element array `[x, y]`.
///
/// # Examples
///
/// ```
/// # use marker_layout_core::geometry::Point;
/// let projected = Point::new(10.0, 20.0);
/// let offset = Point::new(-5.0, 5.0);
///
/// let moved = projected.add_point(offset);
/// assert_eq!(moved.x(), 5.0);
/// assert_eq!(moved.y(), 25.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(from = "[f32; 2]")]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f32 {
        self.y
    }

    /// Adds another point to this point, returning a new point.
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Builds the bounding box whose top-left corner is this point
    pub fn to_bounds(self, size: Size) -> Bounds {
        Bounds::new_from_top_left(self, size)
    }
}

impl From<[f32; 2]> for Point {
    fn from([x, y]: [f32; 2]) -> Self {
        Self { x, y }
    }
}

/// Represents the dimensions of an element with width and height.
///
/// Deserializes from a two-element array `[width, height]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(from = "[f32; 2]")]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    /// Creates a new size with the specified dimensions
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns the width dimension of this size
    pub fn width(self) -> f32 {
        self.width
    }

    /// Returns the height dimension of this size
    pub fn height(self) -> f32 {
        self.height
    }

    /// Returns a new size with the height multiplied by `factor`.
    ///
    /// Markers stack their entries vertically, so only the height grows
    /// with the number of entries shown.
    ///
    /// # Examples
    ///
    /// ```
    /// # use marker_layout_core::geometry::Size;
    /// let unit = Size::new(150.0, 50.0);
    ///
    /// let stacked = unit.scale_height(2.5);
    /// assert_eq!(stacked.width(), 150.0);
    /// assert_eq!(stacked.height(), 125.0);
    /// ```
    pub fn scale_height(self, factor: f32) -> Self {
        Self {
            width: self.width,
            height: self.height * factor,
        }
    }
}

impl From<[f32; 2]> for Size {
    fn from([width, height]: [f32; 2]) -> Self {
        Self { width, height }
    }
}

/// Represents an axis-aligned bounding box with minimum and maximum coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    /// Creates a new bounds from a top-left point and a size
    pub fn new_from_top_left(top_left: Point, size: Size) -> Self {
        Self {
            min_x: top_left.x,
            min_y: top_left.y,
            max_x: top_left.x + size.width,
            max_y: top_left.y + size.height,
        }
    }

    /// Returns the minimum x-coordinate of the bounds
    pub fn min_x(self) -> f32 {
        self.min_x
    }

    /// Returns the minimum y-coordinate of the bounds
    pub fn min_y(self) -> f32 {
        self.min_y
    }

    /// Returns the maximum x-coordinate of the bounds
    pub fn max_x(self) -> f32 {
        self.max_x
    }

    /// Returns the maximum y-coordinate of the bounds
    pub fn max_y(self) -> f32 {
        self.max_y
    }

    /// Returns true if the two boxes are strictly separated along an axis.
    ///
    /// Boxes that merely touch along an edge are not separated.
    pub fn is_separated_from(&self, other: &Self) -> bool {
        other.min_x > self.max_x
            || other.max_x < self.min_x
            || other.min_y > self.max_y
            || other.max_y < self.min_y
    }

    /// Returns true if the two boxes overlap or touch.
    ///
    /// # Examples
    ///
    /// ```
    /// # use marker_layout_core::geometry::{Bounds, Point, Size};
    /// let a = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(10.0, 10.0));
    /// let touching = Bounds::new_from_top_left(Point::new(10.0, 0.0), Size::new(10.0, 10.0));
    /// let apart = Bounds::new_from_top_left(Point::new(10.5, 0.0), Size::new(10.0, 10.0));
    ///
    /// assert!(a.overlaps(&touching));
    /// assert!(!a.overlaps(&apart));
    /// ```
    pub fn overlaps(&self, other: &Self) -> bool {
        !self.is_separated_from(other)
    }
}


#[cfg(test)]
mod proptest_tests {
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    use super::*;

    // ===================
    // Strategies
    // ===================

    fn bounds_strategy() -> impl Strategy<Value = Bounds> {
        (point_strategy(), size_strategy()).prop_map(|(top_left, size)| top_left.to_bounds(size))
    }

    /// Integer-valued points, so that additions stay exact.
    fn point_strategy() -> impl Strategy<Value = Point> {
        (-1000i16..1000, -1000i16..1000).prop_map(|(x, y)| Point::new(f32::from(x), f32::from(y)))
    }

    fn size_strategy() -> impl Strategy<Value = Size> {
        (1u16..500, 1u16..500).prop_map(|(w, h)| Size::new(f32::from(w), f32::from(h)))
    }

    // ===================
    // Property Test Functions
    // ===================

    /// Overlap is a symmetric relation.
    fn check_overlap_is_symmetric(b1: Bounds, b2: Bounds) -> Result<(), TestCaseError> {
        prop_assert_eq!(b1.overlaps(&b2), b2.overlaps(&b1));
        Ok(())
    }

    /// Every non-degenerate box overlaps itself.
    fn check_overlap_is_reflexive(b: Bounds) -> Result<(), TestCaseError> {
        prop_assert!(b.overlaps(&b));
        Ok(())
    }

    /// Offsetting both boxes by the same exact amount leaves their relation
    /// unchanged.
    fn check_overlap_offset_invariant(
        (p1, s1): (Point, Size),
        (p2, s2): (Point, Size),
        offset: Point,
    ) -> Result<(), TestCaseError> {
        prop_assert_eq!(
            p1.to_bounds(s1).overlaps(&p2.to_bounds(s2)),
            p1.add_point(offset)
                .to_bounds(s1)
                .overlaps(&p2.add_point(offset).to_bounds(s2))
        );
        Ok(())
    }

    /// A stacked box keeps its top-left corner and width and still overlaps
    /// whatever the single unit overlapped.
    fn check_scale_height_extends_downward(
        top_left: Point,
        unit: Size,
        factor: f32,
        other: Bounds,
    ) -> Result<(), TestCaseError> {
        let stacked = unit.scale_height(factor);
        prop_assert_eq!(stacked.width(), unit.width());
        prop_assert!(approx_eq!(
            f32,
            stacked.height(),
            unit.height() * factor,
            epsilon = 0.001
        ));

        let single = top_left.to_bounds(unit);
        let tall = top_left.to_bounds(stacked);
        prop_assert_eq!(tall.min_y(), single.min_y());
        if single.overlaps(&other) {
            prop_assert!(tall.overlaps(&other));
        }
        Ok(())
    }

    // ===================
    // Proptest Wrappers
    // ===================

    proptest! {
        #[test]
        fn overlap_is_symmetric(b1 in bounds_strategy(), b2 in bounds_strategy()) {
            check_overlap_is_symmetric(b1, b2)?;
        }

        #[test]
        fn overlap_is_reflexive(b in bounds_strategy()) {
            check_overlap_is_reflexive(b)?;
        }

        #[test]
        fn overlap_offset_invariant(
            a in (point_strategy(), size_strategy()),
            b in (point_strategy(), size_strategy()),
            offset in point_strategy(),
        ) {
            check_overlap_offset_invariant(a, b, offset)?;
        }

        #[test]
        fn scale_height_extends_downward(
            top_left in point_strategy(),
            unit in size_strategy(),
            factor in 1.0f32..2.5,
            other in bounds_strategy(),
        ) {
            check_scale_height_extends_downward(top_left, unit, factor, other)?;
        }
    }
}
