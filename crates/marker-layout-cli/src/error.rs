//! Error types for the replay tool.
//!
//! Every fatal error is a [`CliError`]. All variants carry a
//! [`miette::Diagnostic`] code, and scene parse errors also carry the scene
//! source and the span of the offending TOML so that `main` can point at it.

use std::{io, path::PathBuf};

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use marker_layout::LayoutError;

/// Configuration file errors.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration: {0}")]
    #[diagnostic(code(marker_layout::config::parse))]
    Parse(String),

    #[error("Missing configuration file: {0}")]
    #[diagnostic(
        code(marker_layout::config::missing),
        help("check the path given to --config")
    )]
    MissingFile(PathBuf),
}

/// The main error type of the replay tool.
#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    #[error("I/O error: {0}")]
    #[diagnostic(code(marker_layout::io))]
    Io(#[from] io::Error),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid scene: {message}")]
    #[diagnostic(code(marker_layout::scene::parse))]
    SceneParse {
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("here")]
        span: Option<SourceSpan>,
    },

    #[error("Invalid scene: {0}")]
    #[diagnostic(code(marker_layout::scene::invalid))]
    SceneInvalid(String),

    #[error("Layout error: {0}")]
    #[diagnostic(
        code(marker_layout::layout),
        help("fix the [layout] section of the configuration or the scene")
    )]
    Layout(#[from] LayoutError),
}

impl CliError {
    /// Create a new `SceneParse` error from a TOML error and the scene source.
    pub fn new_scene_parse_error(
        err: &toml::de::Error,
        name: impl AsRef<str>,
        src: impl Into<String>,
    ) -> Self {
        Self::SceneParse {
            message: err.message().to_string(),
            src: NamedSource::new(name, src.into()),
            span: err.span().map(SourceSpan::from),
        }
    }
}
