//! Structure provisioner: creates the staging layout.
use std::io;
use std::path::{Path, PathBuf};

use crate::error::ProvisioningError;

/// Ensure `base/staging_name` and each of `folders` below it exist.
///
/// Idempotent: existing directories are left untouched, so running it twice
/// is the same as running it once. Returns the staging root.
///
/// # Errors
///
/// Returns [`ProvisioningError::BaseMissing`] if `base` is not an existing
/// directory, or [`ProvisioningError::CreateDir`] for the first directory
/// that cannot be created (including when a file occupies the path).
pub fn provision(
    base: &Path,
    staging_name: &str,
    folders: &[&str],
) -> Result<PathBuf, ProvisioningError> {
    if !base.is_dir() {
        return Err(ProvisioningError::BaseMissing {
            path: base.to_path_buf(),
        });
    }
    let root = base.join(staging_name);
    ensure_dir(&root)?;
    for folder in folders {
        ensure_dir(&root.join(folder))?;
    }
    Ok(root)
}

fn ensure_dir(path: &Path) -> Result<(), ProvisioningError> {
    match std::fs::create_dir(path) {
        Ok(()) => {
            tracing::debug!("created {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists && path.is_dir() => Ok(()),
        Err(source) => Err(ProvisioningError::CreateDir {
            path: path.to_path_buf(),
            source,
        }),
    }
}
