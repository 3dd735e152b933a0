//! Marker Layout Core Types
//!
//! This crate provides the foundational types shared by the marker layout
//! engine and its tools. It includes:
//!
//! - **Geometry**: Screen-space primitives ([`geometry`] module)
//! - **Features**: Map features as reported by a map renderer ([`feature`] module)

pub mod feature;
pub mod geometry;
