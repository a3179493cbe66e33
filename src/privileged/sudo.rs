use anyhow::{Result, bail};
use std::ffi::OsString;
use std::path::Path;
use std::sync::Arc;

use super::{PrivilegedOps, elevate_command};
use crate::exec::Executor;

/// Unix privileged operations via `mkdir -p`, `cp -R` and `chown -R`,
/// prefixed with `sudo` when `elevate` is set.
pub struct SudoOps {
    executor: Arc<dyn Executor>,
    elevate: bool,
    owner: Option<String>,
}

impl std::fmt::Debug for SudoOps {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SudoOps")
            .field("executor", &"<dyn Executor>")
            .field("elevate", &self.elevate)
            .field("owner", &self.owner)
            .finish()
    }
}

impl SudoOps {
    /// Create the backend. `owner` is the user that copied entries are
    /// handed back to; without one, ownership normalization fails.
    #[must_use]
    pub fn new(executor: Arc<dyn Executor>, elevate: bool, owner: Option<String>) -> Self {
        Self {
            executor,
            elevate,
            owner,
        }
    }

    fn run(&self, program: &str, args: Vec<String>) -> Result<()> {
        let (program, args) = elevate_command(self.elevate, program, &args);
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        self.executor.run(&program, &args)?;
        Ok(())
    }
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

impl PrivilegedOps for SudoOps {
    fn label(&self) -> &'static str {
        if self.elevate { "sudo" } else { "shell" }
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        self.run("mkdir", vec!["-p".to_string(), path_arg(path)])
    }

    fn copy_contents(&self, src: &Path, dst: &Path) -> Result<()> {
        // `src/.` makes cp merge the contents rather than nest `src` itself.
        self.run(
            "cp",
            vec!["-R".to_string(), path_arg(&src.join(".")), path_arg(dst)],
        )
    }

    fn normalize_ownership(&self, dst: &Path, entries: &[OsString]) -> Result<()> {
        if entries.is_empty() {
            return Ok(());
        }
        let Some(owner) = &self.owner else {
            bail!(
                "cannot determine the invoking user to own {}; set `owner` in the config file",
                dst.display()
            );
        };
        let mut args = vec!["-R".to_string(), owner.clone()];
        args.extend(entries.iter().map(|name| path_arg(&dst.join(name))));
        self.run("chown", args)
    }
}
