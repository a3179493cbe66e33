//! Optional settings file.
//!
//! ```toml
//! staging_name = "PluginInstaller"
//! installer_policy = "continue"   # or "abort"
//! elevate = true
//! owner = "alice"
//! ```
pub mod toml_loader;

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::engine::InstallerPolicy;
use crate::error::ConfigError;
use crate::layout::DEFAULT_STAGING_NAME;

/// Environment variable naming an explicit settings file.
pub const CONFIG_ENV: &str = "PLUGIN_INSTALLER_CONFIG";

/// User settings. Every key is optional.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Name of the staging root created by `provision`.
    pub staging_name: String,
    /// Whether an installer failure stops the rest of the batch.
    pub installer_policy: InstallerPolicy,
    /// Wrap privileged commands in `sudo`; defaults per platform.
    pub elevate: Option<bool>,
    /// User that copied system entries are handed to; defaults to the
    /// invoking user.
    pub owner: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            staging_name: DEFAULT_STAGING_NAME.to_string(),
            installer_policy: InstallerPolicy::default(),
            elevate: None,
            owner: None,
        }
    }
}

impl Settings {
    /// Load settings from `path`; a missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid TOML, or
    /// contains unknown keys.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        toml_loader::load_config(path)
    }
}

/// Settings file location: `explicit`, else `$PLUGIN_INSTALLER_CONFIG`, else
/// `$XDG_CONFIG_HOME/plugin-installer/config.toml` (`~/.config` fallback).
#[must_use]
pub fn settings_path(explicit: Option<&Path>) -> PathBuf {
    resolve_settings_path(
        explicit,
        std::env::var_os(CONFIG_ENV).map(PathBuf::from),
        std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        crate::platform::home_dir().ok(),
    )
}

fn resolve_settings_path(
    explicit: Option<&Path>,
    from_env: Option<PathBuf>,
    xdg_config_home: Option<PathBuf>,
    home: Option<PathBuf>,
) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    if let Some(path) = from_env.filter(|p| !p.as_os_str().is_empty()) {
        return path;
    }
    let config_home = xdg_config_home
        .filter(|p| !p.as_os_str().is_empty())
        .or_else(|| home.map(|h| h.join(".config")))
        .unwrap_or_else(|| PathBuf::from(".config"));
    config_home.join("plugin-installer").join("config.toml")
}
