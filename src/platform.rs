//! Target platform detection and host environment lookups.
use std::fmt;
use std::path::PathBuf;

use crate::error::PlatformError;

/// Host operating system family the deployment targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Os {
    /// macOS: `/Library/...` destinations, `installer` packages, sudo elevation.
    #[value(name = "macos")]
    MacOs,
    /// Windows: `Program Files` destinations, `.exe`/`.msi` installers.
    Windows,
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MacOs => write!(f, "macos"),
            Self::Windows => write!(f, "windows"),
        }
    }
}

/// Platform information for the current run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Platform {
    /// Target OS family.
    pub os: Os,
}

impl Platform {
    /// Detect the current platform.
    ///
    /// Other Unix-like systems get the macOS behaviour (sudo-based elevation,
    /// `installer` packages), which is the closest fit.
    #[must_use]
    pub const fn detect() -> Self {
        if cfg!(target_os = "windows") {
            Self { os: Os::Windows }
        } else {
            Self { os: Os::MacOs }
        }
    }

    /// Create a platform with an explicit OS (used by `--platform` and tests).
    #[must_use]
    pub const fn new(os: Os) -> Self {
        Self { os }
    }

    /// Whether the target is macOS.
    #[must_use]
    pub fn is_macos(&self) -> bool {
        self.os == Os::MacOs
    }

    /// Whether the target is Windows.
    #[must_use]
    pub fn is_windows(&self) -> bool {
        self.os == Os::Windows
    }

    /// Whether privileged commands are wrapped in `sudo` by default.
    ///
    /// Windows has no equivalent wrapper; the process itself must be elevated.
    #[must_use]
    pub fn elevates_by_default(&self) -> bool {
        self.is_macos()
    }
}

/// User's home directory, from `HOME` (or `USERPROFILE` on Windows).
///
/// # Errors
///
/// Returns [`PlatformError::HomeUnavailable`] if neither variable is set.
pub fn home_dir() -> Result<PathBuf, PlatformError> {
    let home = if cfg!(target_os = "windows") {
        std::env::var("USERPROFILE").or_else(|_| std::env::var("HOME"))
    } else {
        std::env::var("HOME").or_else(|_| std::env::var("USERPROFILE"))
    };
    home.map(PathBuf::from)
        .map_err(|_| PlatformError::HomeUnavailable)
}

/// Name of the user who invoked the tool, looking through `sudo`.
///
/// Checks `SUDO_USER`, `USER`, `LOGNAME` and `USERNAME` in that order.
#[must_use]
pub fn invoking_user() -> Option<String> {
    ["SUDO_USER", "USER", "LOGNAME", "USERNAME"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|name| !name.trim().is_empty())
}
