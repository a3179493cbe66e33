//! Deployment engine.
//!
//! A run is two strictly sequential phases over one [`RunConfig`]: every
//! category mapping is copied in order, then every installer in the staging
//! root's installer folder is invoked in order. Nothing here returns an
//! error; each problem is captured as an outcome in the returned
//! [`DeploymentReport`].
pub mod context;
pub mod copy;
pub mod installers;

pub use context::Context;
pub use copy::deploy_category;
pub use installers::{InstallerBatch, InstallerKind, InstallerPolicy, run_installers};

use crate::layout::RunConfig;
use crate::report::DeploymentReport;

/// Run both phases and return the combined report.
#[must_use]
pub fn deploy(run: &RunConfig, ctx: &Context) -> DeploymentReport {
    let mut report = DeploymentReport::new();

    ctx.log.stage("Copying plug-ins");
    for mapping in &run.mappings {
        report.push(deploy_category(mapping, ctx));
    }

    ctx.log.stage("Running installers");
    report.extend(run_installers(
        &run.installer_folder,
        &run.installer_kinds,
        ctx,
    ));

    report
}
