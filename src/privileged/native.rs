use anyhow::{Context as _, Result};
use std::ffi::OsString;
use std::path::Path;

use super::PrivilegedOps;

/// In-process filesystem operations.
///
/// Used for home-directory destinations everywhere and for system
/// destinations on Windows, where the process must already run elevated and
/// inherited ACLs make an ownership change unnecessary.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeOps;

impl PrivilegedOps for NativeOps {
    fn label(&self) -> &'static str {
        "native"
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        std::fs::create_dir_all(path).with_context(|| format!("creating {}", path.display()))
    }

    fn copy_contents(&self, src: &Path, dst: &Path) -> Result<()> {
        crate::fs::copy_dir_contents(src, dst).map(|_| ())
    }

    fn normalize_ownership(&self, _dst: &Path, _entries: &[OsString]) -> Result<()> {
        Ok(())
    }
}
