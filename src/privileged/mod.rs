//! Filesystem operations that may need elevated rights.
//!
//! The deployment engine drives every destination through [`PrivilegedOps`];
//! only the implementation differs per platform and destination scope:
//!
//! - [`SudoOps`] shells out to `mkdir`/`cp`/`chown`, wrapped in `sudo` when
//!   elevation is enabled (macOS system plug-in folders).
//! - [`NativeOps`] uses in-process `std::fs` calls (Windows, where the
//!   process itself runs elevated, and home-directory destinations).
mod native;
mod sudo;

pub use native::NativeOps;
pub use sudo::SudoOps;

use anyhow::Result;
use std::ffi::OsString;
use std::path::Path;

/// Directory creation, content copy and ownership change at a destination.
#[cfg_attr(test, mockall::automock)]
pub trait PrivilegedOps: Send + Sync {
    /// Short name used in logs (e.g. `"sudo"`, `"native"`).
    fn label(&self) -> &'static str;

    /// Create `path` and any missing ancestors.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    fn create_dir_all(&self, path: &Path) -> Result<()>;

    /// Copy the contents of `src` into `dst`, merging with what is there.
    ///
    /// # Errors
    ///
    /// Returns an error if any file cannot be copied.
    fn copy_contents(&self, src: &Path, dst: &Path) -> Result<()>;

    /// Hand `entries` (names directly below `dst`) back to the invoking user.
    ///
    /// # Errors
    ///
    /// Returns an error if ownership cannot be changed.
    fn normalize_ownership(&self, dst: &Path, entries: &[OsString]) -> Result<()>;
}

/// Prefix `program args…` with `sudo` when `elevate` is set.
#[must_use]
pub fn elevate_command(elevate: bool, program: &str, args: &[String]) -> (String, Vec<String>) {
    if elevate {
        let mut full = Vec::with_capacity(args.len() + 1);
        full.push(program.to_string());
        full.extend(args.iter().cloned());
        ("sudo".to_string(), full)
    } else {
        (program.to_string(), args.to_vec())
    }
}
