//! Subcommand handlers.
pub mod check;
pub mod completions;
pub mod install;
pub mod provision;
pub mod version;

use anyhow::{Context as _, Result};
use std::path::Path;

use crate::cli::GlobalOpts;
use crate::config::{Settings, settings_path};
use crate::logging::Logger;
use crate::platform::Platform;
use crate::report::DeploymentReport;

/// Shared state produced by the common command setup sequence.
#[derive(Debug)]
pub struct CommandSetup {
    /// Target platform (`--platform` or the host).
    pub platform: Platform,
    /// Loaded settings file, or the defaults.
    pub settings: Settings,
}

impl CommandSetup {
    /// Resolve the target platform and load the settings file.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings file exists but cannot be read or
    /// parsed.
    pub fn init(global: &GlobalOpts, log: &Logger) -> Result<Self> {
        let platform = global.platform.map_or_else(Platform::detect, Platform::new);
        log.debug(&format!("platform: {}", platform.os));

        let path = settings_path(global.config.as_deref());
        let settings = Settings::load(&path)?;
        log.debug(&format!("settings: {} ({settings:?})", path.display()));

        Ok(Self { platform, settings })
    }
}

/// Write the optional JSON report, print the summary, and bail if any
/// operation failed.
///
/// Each outcome was already printed as it happened, so the report lines only
/// go to the log file.
///
/// # Errors
///
/// Returns an error if the JSON file cannot be written or if one or more
/// outcomes in `report` failed.
pub fn finish_report(report: &DeploymentReport, json: Option<&Path>, log: &Logger) -> Result<()> {
    if let Some(path) = json {
        let body = report.to_json().context("serializing report")?;
        std::fs::write(path, body)
            .with_context(|| format!("writing report to {}", path.display()))?;
        log.info(&format!("report written to {}", path.display()));
    }

    for line in report.to_text().lines() {
        log.debug(&format!("report: {line}"));
    }

    log.print_summary();

    let count = report.failure_count();
    if count > 0 {
        anyhow::bail!("{count} operation(s) failed");
    }
    Ok(())
}
