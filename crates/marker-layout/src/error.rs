//! Error types for marker layout operations.
//!
//! Layout engines only fail when they are built: an update against a live map
//! never errors, and a map that is not ready yet is reported as `None` by
//! [`LayoutEngine::update`](crate::LayoutEngine::update).

use thiserror::Error;

/// The error type returned when a layout engine cannot be created.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("Invalid value `{value}` for option `{option}`: {reason}")]
    InvalidOption {
        option: &'static str,
        value: String,
        reason: &'static str,
    },
}

impl LayoutError {
    /// Create a new `InvalidOption` error.
    pub fn invalid_option(
        option: &'static str,
        value: impl ToString,
        reason: &'static str,
    ) -> Self {
        Self::InvalidOption {
            option,
            value: value.to_string(),
            reason,
        }
    }

    /// Returns the name of the offending option.
    pub fn option(&self) -> &'static str {
        match self {
            Self::InvalidOption { option, .. } => option,
        }
    }
}
