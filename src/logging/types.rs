//! Core logging types: summary entries, status, and the [`Log`] trait.

/// One operation's result for summary reporting.
#[derive(Debug, Clone)]
pub struct SummaryEntry {
    /// Category or installer file name.
    pub name: String,
    /// Final status of the operation.
    pub status: EntryStatus,
    /// Optional detail message (e.g. skip reason or error description).
    pub message: Option<String>,
}

/// Status of a completed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryStatus {
    /// Copied or installed.
    Ok,
    /// Nothing to do (source absent, batch aborted).
    Skipped,
    /// Dry run; nothing was changed.
    DryRun,
    /// The operation failed.
    Failed,
}

/// Abstraction over logging backends.
///
/// The engine logs through this trait so tests can swap in a recorder
/// without installing a global subscriber.
pub trait Log: Send + Sync {
    /// Log a stage header (major section).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (may be suppressed on console).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Log a dry-run action message.
    fn dry_run(&self, msg: &str);
    /// Record an operation result for the summary.
    fn record(&self, name: &str, status: EntryStatus, message: Option<&str>);
}
