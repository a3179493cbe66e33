//! Command: inspect a staging root without changing anything.
use anyhow::Result;
use std::path::PathBuf;

use super::CommandSetup;
use crate::cli::{CheckOpts, GlobalOpts};
use crate::engine::InstallerBatch;
use crate::exec::{Executor, SystemExecutor};
use crate::layout::{Category, RunConfig};
use crate::logging::Log;
use crate::platform::{Os, home_dir};

/// State of one category's source folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceState {
    /// Folder missing; the category will be skipped.
    Absent,
    /// Folder present with this many files.
    Present(usize),
    /// Something other than a folder occupies the path.
    NotADirectory,
}

/// One category line of the check report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCheck {
    /// Category inspected.
    pub category: Category,
    /// Source folder in the staging root.
    pub source: PathBuf,
    /// Where the contents would be copied.
    pub destination: PathBuf,
    /// What was found at `source`.
    pub state: SourceState,
}

/// Result of inspecting a staging root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    /// One entry per category mapping, in deployment order.
    pub categories: Vec<CategoryCheck>,
    /// Installers that would run, in invocation order.
    pub batch: InstallerBatch,
    /// Required programs not found on `PATH`.
    pub missing_tools: Vec<&'static str>,
}

/// Programs a real run on `os` depends on.
#[must_use]
pub const fn required_tools(os: Os, elevate: bool) -> &'static [&'static str] {
    match (os, elevate) {
        (Os::MacOs, true) => &["installer", "sudo"],
        (Os::MacOs, false) => &["installer"],
        (Os::Windows, _) => &["msiexec"],
    }
}

/// Inspect `run` without modifying anything.
///
/// # Errors
///
/// Returns an error if the installer folder exists but cannot be read.
pub fn inspect(
    run: &RunConfig,
    os: Os,
    elevate: bool,
    executor: &dyn Executor,
) -> Result<CheckReport> {
    let categories = run
        .mappings
        .iter()
        .map(|m| {
            let state = if !m.source.exists() {
                SourceState::Absent
            } else if m.source.is_dir() {
                crate::fs::count_files(&m.source)
                    .map_or(SourceState::NotADirectory, SourceState::Present)
            } else {
                SourceState::NotADirectory
            };
            CategoryCheck {
                category: m.category,
                source: m.source.clone(),
                destination: m.destination.clone(),
                state,
            }
        })
        .collect();
    let batch = InstallerBatch::discover(&run.installer_folder, &run.installer_kinds)?;
    let missing_tools = required_tools(os, elevate)
        .iter()
        .copied()
        .filter(|tool| !executor.which(tool))
        .collect();
    Ok(CheckReport {
        categories,
        batch,
        missing_tools,
    })
}

impl CheckReport {
    /// Human-readable warnings.
    #[must_use]
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings: Vec<String> = self
            .categories
            .iter()
            .filter(|c| c.state == SourceState::NotADirectory)
            .map(|c| format!("{} is not a readable directory", c.source.display()))
            .collect();
        warnings.extend(
            self.batch.unrecognized.iter().map(|p| {
                format!(
                    "{} is not a recognised installer and will be ignored",
                    p.display()
                )
            }),
        );
        warnings.extend(
            self.missing_tools
                .iter()
                .map(|tool| format!("{tool} not found on PATH")),
        );
        warnings
    }

    /// Log the report.
    pub fn log(&self, log: &dyn Log) {
        log.stage("Categories");
        for c in &self.categories {
            let state = match c.state {
                SourceState::Absent => "absent, will be skipped".to_string(),
                SourceState::Present(n) => format!("{n} file(s)"),
                SourceState::NotADirectory => "not a directory".to_string(),
            };
            log.info(&format!(
                "{:<10} {state} -> {}",
                c.category.folder_name(),
                c.destination.display()
            ));
        }

        log.stage("Installers");
        if self.batch.is_empty() {
            log.info("none");
        }
        for file in &self.batch.files {
            log.info(&file.name());
        }

        for warning in self.warnings() {
            log.warn(&warning);
        }
    }
}

/// Run the check command.
///
/// # Errors
///
/// Returns an error if settings cannot be loaded or the staging root does
/// not exist.
pub fn run(global: &GlobalOpts, opts: &CheckOpts, log: &crate::logging::Logger) -> Result<()> {
    let setup = CommandSetup::init(global, log)?;
    let home = home_dir()?;
    let run = RunConfig::for_platform(&opts.staging_root, &setup.platform, &home)?;
    let elevate = setup
        .settings
        .elevate
        .unwrap_or_else(|| setup.platform.elevates_by_default());
    let report = inspect(&run, setup.platform.os, elevate, &SystemExecutor)?;
    report.log(log);
    Ok(())
}
