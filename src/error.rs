//! Domain-specific error types for the plugin installer.
//!
//! Internal modules return these typed errors while command handlers at the
//! CLI boundary convert them to [`anyhow::Error`] via the standard `?`
//! operator.
//!
//! # Error hierarchy
//!
//! ```text
//! ProvisioningError: staging layout could not be created (fatal)
//! DeployError: per-category / per-installer failures, rendered as outcomes
//! ConfigError: settings file unreadable or invalid
//! PlatformError: host environment is missing something we need
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the structure provisioner.
///
/// Any variant is fatal to provisioning: no later step can succeed without
/// the staging root.
#[derive(Error, Debug)]
pub enum ProvisioningError {
    /// The base directory handed to the provisioner is not an existing directory.
    #[error("base directory {} does not exist or is not a directory", .path.display())]
    BaseMissing {
        /// The base path that was supplied.
        path: PathBuf,
    },

    /// A directory could not be created for a reason other than "already exists".
    #[error("cannot create directory {}: {source}", .path.display())]
    CreateDir {
        /// The directory that failed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

impl ProvisioningError {
    /// The path the failure refers to.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::BaseMissing { path } | Self::CreateDir { path, .. } => path,
        }
    }
}

/// Errors that arise while deploying a staging root.
///
/// Apart from [`DeployError::StagingRootMissing`], these never escape a run:
/// the engine renders them into report outcomes at the point of occurrence.
#[derive(Error, Debug)]
pub enum DeployError {
    /// The staging root does not exist, so nothing can be deployed.
    #[error("staging root {} does not exist", .path.display())]
    StagingRootMissing {
        /// The staging root that was supplied.
        path: PathBuf,
    },

    /// A category's source folder is absent. Informational, not a failure.
    #[error("source folder {} does not exist", .path.display())]
    SourceAbsent {
        /// The missing source folder.
        path: PathBuf,
    },

    /// Destination creation, copy or ownership normalization failed.
    #[error("{category}: {reason}")]
    CopyFailure {
        /// Category being deployed.
        category: String,
        /// Human-readable cause.
        reason: String,
    },

    /// An installer exited non-zero or could not be launched.
    #[error("{}: {reason}", .file.display())]
    InstallerFailure {
        /// The installer file.
        file: PathBuf,
        /// Human-readable cause.
        reason: String,
    },
}

/// Errors that arise from loading the settings file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The settings file exists but could not be read.
    #[error("IO error reading config file {}: {source}", .path.display())]
    Io {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The settings file is not valid TOML or has unknown keys.
    #[error("invalid config file {}: {source}", .path.display())]
    Parse {
        /// Path to the offending file.
        path: PathBuf,
        /// Underlying parse error.
        source: toml::de::Error,
    },
}

/// Errors that arise from inspecting the host platform.
#[derive(Error, Debug)]
pub enum PlatformError {
    /// Neither `HOME` nor `USERPROFILE` is set.
    #[error("cannot determine the home directory: neither HOME nor USERPROFILE is set")]
    HomeUnavailable,
}
