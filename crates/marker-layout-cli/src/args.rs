//! Command-line argument definitions for the replay tool.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments select the scene to replay, where the report
//! goes, which configuration file to load, and how verbose logging is.

use clap::{Parser, ValueEnum};

/// Which layout engine replays the scene
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Kind {
    /// Lay out markers
    #[default]
    Marker,
    /// Lay out popups
    Popup,
}

/// Command-line arguments for the marker layout replay tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input scene file
    #[arg(help = "Path to the scene file (TOML)")]
    pub input: String,

    /// Path to the report file, standard output when omitted
    #[arg(short, long)]
    pub output: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Layout engine to use
    #[arg(short, long, value_enum, default_value_t = Kind::Marker)]
    pub kind: Kind,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
