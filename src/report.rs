//! Per-operation outcomes and the deployment report.
//!
//! A [`DeploymentReport`] is built fresh for every run: one [`Outcome`] per
//! category copy attempt followed by one per installer file. It renders to
//! the newline-joined text the tool has always shown, and to a structured
//! `(subject, success, detail)` sequence for automation.
use std::path::PathBuf;

use serde::Serialize;

/// Which engine phase produced an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Category copy phase.
    Copy,
    /// Installer invocation phase.
    Install,
}

/// What happened to one category or installer file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    /// Source contents were copied to the destination.
    Copied {
        /// Source folder.
        source: PathBuf,
        /// Destination folder.
        destination: PathBuf,
        /// Number of files in the source tree, counted without following links
        /// (zero for an empty source).
        files: usize,
    },
    /// The installer exited with status zero.
    Installed {
        /// Installer file.
        file: PathBuf,
    },
    /// Nothing was done; not a failure.
    Skipped {
        /// Full human-readable line.
        reason: String,
    },
    /// Dry run: what would have been done.
    DryRun {
        /// Human-readable action.
        action: String,
    },
    /// The operation failed.
    Failed {
        /// Full human-readable line.
        reason: String,
    },
}

/// One reported result for a single category or installer file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Category name or installer file name.
    pub subject: String,
    /// Phase that produced this outcome.
    pub phase: Phase,
    /// Result.
    pub status: Status,
}

impl Outcome {
    /// Create an outcome.
    #[must_use]
    pub fn new(subject: impl Into<String>, phase: Phase, status: Status) -> Self {
        Self {
            subject: subject.into(),
            phase,
            status,
        }
    }

    /// Whether the operation counts as a success (anything but `Failed`).
    #[must_use]
    pub const fn success(&self) -> bool {
        !matches!(self.status, Status::Failed { .. })
    }

    /// Human-readable report line.
    #[must_use]
    pub fn line(&self) -> String {
        match &self.status {
            Status::Copied {
                source,
                destination,
                files,
            } => format!(
                "Copied files from {} to {} ({files} file(s))",
                source.display(),
                destination.display()
            ),
            Status::Installed { file } => format!("Installed {}", file.display()),
            Status::Skipped { reason } | Status::Failed { reason } => reason.clone(),
            Status::DryRun { action } => action.clone(),
        }
    }
}

/// Structured view of one outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportEntry {
    /// Category name or installer file name.
    pub subject: String,
    /// Phase that produced this entry.
    pub phase: Phase,
    /// Whether the operation succeeded.
    pub success: bool,
    /// Human-readable detail line.
    pub detail: String,
}

/// Ordered outcomes of one deployment run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeploymentReport {
    outcomes: Vec<Outcome>,
}

impl DeploymentReport {
    /// Start an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one outcome.
    pub fn push(&mut self, outcome: Outcome) {
        self.outcomes.push(outcome);
    }

    /// All outcomes in the order they were produced.
    #[must_use]
    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    /// Outcomes that failed.
    pub fn failures(&self) -> impl Iterator<Item = &Outcome> {
        self.outcomes.iter().filter(|o| !o.success())
    }

    /// Number of failed outcomes.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }

    /// Whether any outcome failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }

    /// Whether the report is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Structured `(subject, success, detail)` entries.
    #[must_use]
    pub fn entries(&self) -> Vec<ReportEntry> {
        self.outcomes
            .iter()
            .map(|o| ReportEntry {
                subject: o.subject.clone(),
                phase: o.phase,
                success: o.success(),
                detail: o.line(),
            })
            .collect()
    }

    /// Newline-joined report lines.
    #[must_use]
    pub fn to_text(&self) -> String {
        self.outcomes
            .iter()
            .map(Outcome::line)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Pretty-printed JSON array of [`ReportEntry`].
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.entries())
    }
}

impl Extend<Outcome> for DeploymentReport {
    fn extend<T: IntoIterator<Item = Outcome>>(&mut self, iter: T) {
        self.outcomes.extend(iter);
    }
}
