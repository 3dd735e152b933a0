//! Configuration file loading for the replay tool.
//!
//! This module handles finding and loading TOML configuration files
//! from various locations (explicit path, local directory, system directory).

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use serde::Deserialize;

use marker_layout::config::LayoutConfig;

use crate::error::{CliError, ConfigError};

/// Top-level configuration of the replay tool.
///
/// ```toml
/// [layout]
/// unit_size = [40, 70]
/// anchor = "bottom"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Layout engine options.
    #[serde(default)]
    layout: LayoutConfig,
}

impl AppConfig {
    /// Creates a configuration with the given layout options.
    pub fn new(layout: LayoutConfig) -> Self {
        Self { layout }
    }

    /// Returns the layout options.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }
}

/// Find and load configuration from various locations
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Local project directory (marker-layout/config.toml)
/// 3. Platform-specific config directory
/// 4. Default config if none found
///
/// # Errors
///
/// Returns error if:
/// - Explicit path is provided but file doesn't exist
/// - Config file exists but cannot be parsed
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, CliError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    let local_config = Path::new("marker-layout/config.toml");
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading configuration from local path");
        return load_config_file(local_config);
    }

    if let Some(proj_dirs) = ProjectDirs::from("com", "marker-layout", "marker-layout") {
        let system_config = proj_dirs.config_dir().join("config.toml");

        if system_config.exists() {
            info!(
                path = system_config.display().to_string();
                "Loading configuration from system path"
            );
            return load_config_file(system_config);
        }

        debug!(path = system_config.display().to_string(); "System configuration file not found");
    } else {
        debug!("Could not determine platform-specific config directory");
    }

    debug!("No configuration file found, using default configuration");
    Ok(AppConfig::default())
}

fn load_config_file(path: impl AsRef<Path>) -> Result<AppConfig, CliError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::MissingFile(PathBuf::from(path)).into());
    }

    let content = fs::read_to_string(path)?;
    let config: AppConfig =
        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use marker_layout::geometry::Size;
    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn test_load_explicit_path() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[layout]\nmarkerSize = [40, 70]\nmax = 3").unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.layout().unit_size(), Size::new(40.0, 70.0));
        assert_eq!(config.layout().max(), Some(3));
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let err = load_config(Some("does/not/exist.toml")).unwrap_err();
        assert!(matches!(err, CliError::Config(ConfigError::MissingFile(_))));
    }

    #[test]
    fn test_load_rejects_unknown_section() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[style]\nbackground = \"white\"").unwrap();

        let err = load_config(Some(file.path())).unwrap_err();
        assert!(matches!(err, CliError::Config(ConfigError::Parse(_))));
    }

    #[test]
    fn test_empty_file_is_default() {
        let file = NamedTempFile::new().unwrap();
        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config, AppConfig::default());
    }
}
