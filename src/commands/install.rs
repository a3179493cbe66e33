//! Command: deploy a staging root.
use anyhow::Result;
use std::sync::Arc;

use super::{CommandSetup, finish_report};
use crate::cli::{GlobalOpts, InstallOpts};
use crate::engine::{self, Context};
use crate::exec::SystemExecutor;
use crate::layout::RunConfig;
use crate::logging::{Log, Logger};
use crate::platform::home_dir;

/// Run the install command.
///
/// # Errors
///
/// Returns an error if settings cannot be loaded, the staging root or home
/// directory is missing, or any copy or installer failed.
pub fn run(global: &GlobalOpts, opts: &InstallOpts, log: &Arc<Logger>) -> Result<()> {
    let setup = CommandSetup::init(global, log)?;
    log.info(&format!("plugin-installer {}", super::version::version()));

    let home = home_dir()?;
    let run = RunConfig::for_platform(&opts.staging_root, &setup.platform, &home)?;
    log.info(&format!("staging root: {}", run.staging_root.display()));

    let ctx = Context::new(
        setup.platform,
        Arc::clone(log) as Arc<dyn Log>,
        Arc::new(SystemExecutor),
        global.dry_run,
        &setup.settings,
    )
    .with_fail_fast(opts.fail_fast);
    log.debug(&format!("{ctx:?}"));

    let report = engine::deploy(&run, &ctx);
    finish_report(&report, opts.json.as_deref(), log)
}
