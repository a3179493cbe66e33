//! Run context shared by both engine phases.
use std::sync::Arc;

use super::installers::InstallerPolicy;
use crate::config::Settings;
use crate::exec::Executor;
use crate::layout::Scope;
use crate::logging::{EntryStatus, Log};
use crate::platform::{Platform, invoking_user};
use crate::privileged::{NativeOps, PrivilegedOps, SudoOps};
use crate::report::{Outcome, Status};

/// Everything the engine needs besides the [`RunConfig`](crate::layout::RunConfig).
pub struct Context {
    /// Target platform.
    pub platform: Platform,
    /// Logger for progress output and summary entries.
    pub log: Arc<dyn Log>,
    /// Report what would happen without touching anything.
    pub dry_run: bool,
    /// Launches installer processes.
    pub executor: Arc<dyn Executor>,
    /// Operations for [`Scope::System`] destinations.
    pub system_ops: Arc<dyn PrivilegedOps>,
    /// Operations for [`Scope::User`] destinations.
    pub user_ops: Arc<dyn PrivilegedOps>,
    /// Prefix installer commands with `sudo`.
    pub elevate: bool,
    /// What to do after an installer fails.
    pub installer_policy: InstallerPolicy,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("platform", &self.platform)
            .field("log", &"<dyn Log>")
            .field("dry_run", &self.dry_run)
            .field("executor", &"<dyn Executor>")
            .field("system_ops", &self.system_ops.label())
            .field("user_ops", &self.user_ops.label())
            .field("elevate", &self.elevate)
            .field("installer_policy", &self.installer_policy)
            .finish()
    }
}

impl Context {
    /// Build the context for `platform` from the loaded settings.
    ///
    /// On macOS, system destinations go through [`SudoOps`] and are handed
    /// back to `settings.owner` (or the invoking user). On Windows every
    /// destination uses [`NativeOps`].
    #[must_use]
    pub fn new(
        platform: Platform,
        log: Arc<dyn Log>,
        executor: Arc<dyn Executor>,
        dry_run: bool,
        settings: &Settings,
    ) -> Self {
        let elevate = settings
            .elevate
            .unwrap_or_else(|| platform.elevates_by_default());
        let system_ops: Arc<dyn PrivilegedOps> = if platform.is_windows() {
            Arc::new(NativeOps)
        } else {
            let owner = settings.owner.clone().or_else(invoking_user);
            Arc::new(SudoOps::new(Arc::clone(&executor), elevate, owner))
        };
        Self {
            platform,
            log,
            dry_run,
            executor,
            system_ops,
            user_ops: Arc::new(NativeOps),
            elevate,
            installer_policy: settings.installer_policy,
        }
    }

    /// Replace the operations used for system destinations.
    #[must_use]
    pub fn with_system_ops(mut self, ops: Arc<dyn PrivilegedOps>) -> Self {
        self.system_ops = ops;
        self
    }

    /// Stop launching installers after the first failure when `fail_fast` is
    /// set; otherwise keep the policy from the settings file.
    #[must_use]
    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        if fail_fast {
            self.installer_policy = InstallerPolicy::Abort;
        }
        self
    }

    /// Replace the operations used for user destinations.
    #[must_use]
    pub fn with_user_ops(mut self, ops: Arc<dyn PrivilegedOps>) -> Self {
        self.user_ops = ops;
        self
    }

    /// Operations backend for a destination scope.
    #[must_use]
    pub fn ops_for(&self, scope: Scope) -> &dyn PrivilegedOps {
        match scope {
            Scope::System => self.system_ops.as_ref(),
            Scope::User => self.user_ops.as_ref(),
        }
    }

    /// Log an outcome line and record it for the summary.
    pub fn log_outcome(&self, outcome: &Outcome) {
        let line = outcome.line();
        match &outcome.status {
            Status::Copied { .. } | Status::Installed { .. } => {
                self.log.info(&line);
                self.log.record(&outcome.subject, EntryStatus::Ok, None);
            }
            Status::Skipped { .. } => {
                self.log.info(&line);
                self.log
                    .record(&outcome.subject, EntryStatus::Skipped, Some(&line));
            }
            Status::DryRun { .. } => {
                self.log.dry_run(&line);
                self.log.record(&outcome.subject, EntryStatus::DryRun, None);
            }
            Status::Failed { .. } => {
                self.log.error(&line);
                self.log
                    .record(&outcome.subject, EntryStatus::Failed, Some(&line));
            }
        }
    }
}

/// Context over a recording executor with a throwaway logger.
#[cfg(test)]
pub(crate) fn test_context(platform: Platform, executor: Arc<dyn Executor>) -> Context {
    let settings = Settings {
        owner: Some("tester".to_string()),
        ..Settings::default()
    };
    Context::new(
        platform,
        Arc::new(crate::logging::Logger::with_log_file(None)),
        executor,
        false,
        &settings,
    )
}
