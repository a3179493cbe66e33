//! Category copy phase.
use anyhow::{Result, bail};

use super::context::Context;
use crate::error::DeployError;
use crate::layout::{CategoryMapping, Scope};
use crate::report::{Outcome, Phase, Status};

/// Deploy one category: copy the contents of its source folder into its
/// destination and, for system destinations, hand the copied entries back
/// to the invoking user.
///
/// Never fails outright; every problem becomes the returned outcome.
#[must_use]
pub fn deploy_category(mapping: &CategoryMapping, ctx: &Context) -> Outcome {
    let subject = mapping.category.folder_name();
    let status = if mapping.source.exists() {
        match copy_category(mapping, ctx) {
            Ok(status) => status,
            Err(e) => {
                let err = DeployError::CopyFailure {
                    category: subject.to_string(),
                    reason: format!("{e:#}"),
                };
                Status::Failed {
                    reason: format!("Failed to copy {err}"),
                }
            }
        }
    } else {
        let err = DeployError::SourceAbsent {
            path: mapping.source.clone(),
        };
        ctx.log.debug(&err.to_string());
        Status::Skipped {
            reason: format!(
                "Source folder {} does not exist. Skipping.",
                mapping.source.display()
            ),
        }
    };
    let outcome = Outcome::new(subject, Phase::Copy, status);
    ctx.log_outcome(&outcome);
    outcome
}

fn copy_category(mapping: &CategoryMapping, ctx: &Context) -> Result<Status> {
    let source = &mapping.source;
    let destination = &mapping.destination;
    if !source.is_dir() {
        bail!("source {} is not a directory", source.display());
    }
    let files = crate::fs::count_files(source)?;

    if ctx.dry_run {
        return Ok(Status::DryRun {
            action: format!(
                "Would copy {files} file(s) from {} to {}",
                source.display(),
                destination.display()
            ),
        });
    }

    let ops = ctx.ops_for(mapping.scope);
    ctx.log.debug(&format!(
        "copying {} to {} via {}",
        source.display(),
        destination.display(),
        ops.label()
    ));
    if !destination.exists() {
        ops.create_dir_all(destination)?;
    }
    ops.copy_contents(source, destination)?;
    if mapping.scope == Scope::System {
        let entries = crate::fs::top_level_entries(source)?;
        ops.normalize_ownership(destination, &entries)?;
    }

    Ok(Status::Copied {
        source: source.clone(),
        destination: destination.clone(),
        files,
    })
}
