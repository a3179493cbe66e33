//! Audio plug-in deployment.
//!
//! Provisions a staging folder with one subfolder per plug-in format, then
//! copies each folder's contents into the platform's plug-in directory and
//! runs any package installers dropped into `INSTALLERS`.
//!
//! The public API is organised into four layers:
//!
//! - **[`layout`]** / **[`provision`]**: staging folders and destination tables
//! - **[`privileged`]** / **[`exec`]**: elevated filesystem operations and subprocesses
//! - **[`engine`]**: the copy and installer phases producing a [`report::DeploymentReport`]
//! - **[`commands`]**: top-level subcommand orchestration (`provision`, `install`, `check`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod engine;
pub mod error;
pub mod exec;
pub mod fs;
pub mod layout;
pub mod logging;
pub mod platform;
pub mod privileged;
pub mod provision;
pub mod report;
