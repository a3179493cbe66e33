//! Installer invocation phase.
//!
//! Package files dropped into the staging root's `INSTALLERS` folder are
//! handed to the host installer one at a time, in a stable order: the
//! platform's extension groups in turn, then file name within a group.
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use serde::{Deserialize, Serialize};

use super::context::Context;
use crate::error::DeployError;
use crate::platform::Os;
use crate::privileged::elevate_command;
use crate::report::{Outcome, Phase, Status};

/// Package format recognised in the installer folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstallerKind {
    /// macOS flat or bundle package.
    Pkg,
    /// macOS metapackage.
    Mpkg,
    /// Windows executable installer.
    Exe,
    /// Windows Installer package.
    Msi,
}

impl InstallerKind {
    /// File extension, without the dot.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Pkg => "pkg",
            Self::Mpkg => "mpkg",
            Self::Exe => "exe",
            Self::Msi => "msi",
        }
    }

    /// Kinds invoked on `os`, in group order.
    #[must_use]
    pub const fn for_os(os: Os) -> &'static [Self] {
        match os {
            Os::MacOs => &[Self::Pkg, Self::Mpkg],
            Os::Windows => &[Self::Exe, Self::Msi],
        }
    }

    /// macOS packages may be bundle directories rather than flat files.
    #[must_use]
    pub const fn may_be_directory(self) -> bool {
        matches!(self, Self::Pkg | Self::Mpkg)
    }

    /// Whether `path` has this kind's extension (ASCII case-insensitive).
    #[must_use]
    pub fn matches(self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(self.extension()))
    }

    /// Program and arguments that install `file`.
    #[must_use]
    pub fn command(self, file: &Path, elevate: bool) -> (String, Vec<String>) {
        let file = file.to_string_lossy().into_owned();
        match self {
            Self::Pkg | Self::Mpkg => elevate_command(
                elevate,
                "installer",
                &["-pkg".to_string(), file, "-target".to_string(), "/".to_string()],
            ),
            Self::Exe => (file, Vec::new()),
            Self::Msi => ("msiexec".to_string(), vec!["/i".to_string(), file]),
        }
    }
}

/// Whether an installer failure stops the rest of the batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallerPolicy {
    /// Attempt every installer and aggregate the failures.
    #[default]
    Continue,
    /// Stop at the first failure; report the remaining files as skipped.
    Abort,
}

/// One package file queued for installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallerFile {
    /// Package format.
    pub kind: InstallerKind,
    /// Full path to the package.
    pub path: PathBuf,
}

impl InstallerFile {
    /// File name used as the report subject.
    #[must_use]
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map_or_else(|| self.path.display().to_string(), |n| n.to_string_lossy().into_owned())
    }
}

/// The installers found in one folder, in invocation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallerBatch {
    /// Recognised packages, in invocation order.
    pub files: Vec<InstallerFile>,
    /// Regular files whose extension matched no kind, sorted.
    pub unrecognized: Vec<PathBuf>,
}

impl InstallerBatch {
    /// Scan `folder` for packages of the given `kinds`.
    ///
    /// A missing folder yields an empty batch. Hidden entries are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if `folder` exists but cannot be read.
    pub fn discover(folder: &Path, kinds: &[InstallerKind]) -> Result<Self> {
        if !folder.is_dir() {
            return Ok(Self::default());
        }
        let mut files = Vec::new();
        let mut unrecognized = Vec::new();
        for entry in std::fs::read_dir(folder)
            .with_context(|| format!("reading directory {}", folder.display()))?
        {
            let entry = entry.with_context(|| format!("reading entry in {}", folder.display()))?;
            if entry.file_name().to_string_lossy().starts_with('.') {
                continue;
            }
            let path = entry.path();
            let is_dir = path.is_dir();
            match kinds.iter().copied().find(|k| k.matches(&path)) {
                Some(kind) if !is_dir || kind.may_be_directory() => {
                    files.push(InstallerFile { kind, path });
                }
                Some(_) => {}
                None if !is_dir => unrecognized.push(path),
                None => {}
            }
        }
        files.sort_by(|a, b| {
            let group = |k: InstallerKind| kinds.iter().position(|&x| x == k);
            group(a.kind)
                .cmp(&group(b.kind))
                .then_with(|| a.path.file_name().cmp(&b.path.file_name()))
        });
        unrecognized.sort();
        Ok(Self {
            files,
            unrecognized,
        })
    }

    /// Whether no installers were found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

fn command_line(program: &str, args: &[String]) -> String {
    std::iter::once(program)
        .chain(args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Invoke one installer and wait for it.
fn install(file: &InstallerFile, ctx: &Context) -> Status {
    let (program, args) = file.kind.command(&file.path, ctx.elevate);
    let line = command_line(&program, &args);
    if ctx.dry_run {
        return Status::DryRun {
            action: format!("Would run {line}"),
        };
    }
    ctx.log.debug(&format!("running {line}"));
    let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
    let failure = match ctx.executor.run_unchecked(&program, &arg_refs) {
        Ok(result) if result.success => {
            return Status::Installed {
                file: file.path.clone(),
            };
        }
        Ok(result) => result.failure_detail(),
        Err(e) => format!("{e:#}"),
    };
    let err = DeployError::InstallerFailure {
        file: file.path.clone(),
        reason: failure,
    };
    Status::Failed {
        reason: format!("Failed to install {err}"),
    }
}

/// Run every installer in `folder` matching `kinds`, in batch order.
///
/// Each outcome is logged as it is produced. Under
/// [`InstallerPolicy::Abort`] the files after the first failure are reported
/// as skipped without being launched.
#[must_use]
pub fn run_installers(folder: &Path, kinds: &[InstallerKind], ctx: &Context) -> Vec<Outcome> {
    let batch = match InstallerBatch::discover(folder, kinds) {
        Ok(batch) => batch,
        Err(e) => {
            let err = DeployError::InstallerFailure {
                file: folder.to_path_buf(),
                reason: format!("{e:#}"),
            };
            let outcome = Outcome::new(
                crate::layout::INSTALLERS_FOLDER,
                Phase::Install,
                Status::Failed {
                    reason: format!("Failed to install {err}"),
                },
            );
            ctx.log_outcome(&outcome);
            return vec![outcome];
        }
    };
    if batch.is_empty() {
        ctx.log
            .debug(&format!("no installers found in {}", folder.display()));
        return Vec::new();
    }

    let mut outcomes = Vec::with_capacity(batch.files.len());
    let mut aborted = false;
    for file in &batch.files {
        let status = if aborted {
            Status::Skipped {
                reason: format!(
                    "Skipped {}: installer batch aborted after an earlier failure",
                    file.path.display()
                ),
            }
        } else {
            install(file, ctx)
        };
        if matches!(status, Status::Failed { .. })
            && ctx.installer_policy == InstallerPolicy::Abort
        {
            aborted = true;
        }
        let outcome = Outcome::new(file.name(), Phase::Install, status);
        ctx.log_outcome(&outcome);
        outcomes.push(outcome);
    }
    outcomes
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::engine::context::test_context;
    use crate::exec::test_helpers::RecordingExecutor;
    use crate::platform::{Os, Platform};
    use std::fs;
    use std::sync::Arc;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, b"pkg").unwrap();
        path
    }

    #[test]
    fn kinds_per_platform() {
        assert_eq!(
            InstallerKind::for_os(Os::MacOs),
            &[InstallerKind::Pkg, InstallerKind::Mpkg]
        );
        assert_eq!(
            InstallerKind::for_os(Os::Windows),
            &[InstallerKind::Exe, InstallerKind::Msi]
        );
    }

    #[test]
    fn extension_match_ignores_case() {
        assert!(InstallerKind::Pkg.matches(Path::new("Synth.PKG")));
        assert!(InstallerKind::Msi.matches(Path::new("setup.msi")));
        assert!(!InstallerKind::Pkg.matches(Path::new("Synth.mpkg")));
        assert!(!InstallerKind::Exe.matches(Path::new("README")));
    }

    #[test]
    fn pkg_command_is_elevated() {
        let (program, args) = InstallerKind::Pkg.command(Path::new("/s/a.pkg"), true);
        assert_eq!(program, "sudo");
        assert_eq!(args, vec!["installer", "-pkg", "/s/a.pkg", "-target", "/"]);
    }

    #[test]
    fn exe_and_msi_commands() {
        let (program, args) = InstallerKind::Exe.command(Path::new("C:/s/setup.exe"), false);
        assert_eq!(program, "C:/s/setup.exe");
        assert!(args.is_empty());
        let (program, args) = InstallerKind::Msi.command(Path::new("C:/s/a.msi"), false);
        assert_eq!(program, "msiexec");
        assert_eq!(args, vec!["/i", "C:/s/a.msi"]);
    }

    #[test]
    fn policy_deserializes_lowercase() {
        #[derive(Deserialize)]
        struct Wrapper {
            policy: InstallerPolicy,
        }
        let w: Wrapper = toml::from_str("policy = \"abort\"").unwrap();
        assert_eq!(w.policy, InstallerPolicy::Abort);
        assert_eq!(InstallerPolicy::default(), InstallerPolicy::Continue);
    }

    #[test]
    fn discover_orders_by_group_then_name() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "b.mpkg");
        touch(dir.path(), "z.pkg");
        touch(dir.path(), "A.PKG");
        touch(dir.path(), "notes.txt");
        touch(dir.path(), ".DS_Store");
        fs::create_dir(dir.path().join("Bundle.pkg")).unwrap();
        fs::create_dir(dir.path().join("folder")).unwrap();

        let batch =
            InstallerBatch::discover(dir.path(), InstallerKind::for_os(Os::MacOs)).unwrap();
        let names: Vec<String> = batch.files.iter().map(InstallerFile::name).collect();
        assert_eq!(names, vec!["A.PKG", "Bundle.pkg", "z.pkg", "b.mpkg"]);
        assert_eq!(batch.unrecognized, vec![dir.path().join("notes.txt")]);
    }

    #[test]
    fn discover_ignores_exe_directories() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("weird.exe")).unwrap();
        touch(dir.path(), "setup.msi");
        let batch =
            InstallerBatch::discover(dir.path(), InstallerKind::for_os(Os::Windows)).unwrap();
        assert_eq!(batch.files.len(), 1);
        assert_eq!(batch.files[0].kind, InstallerKind::Msi);
    }

    #[test]
    fn missing_folder_yields_no_outcomes() {
        let dir = tempfile::tempdir().unwrap();
        let exec = Arc::new(RecordingExecutor::new());
        let ctx = test_context(Platform::new(Os::MacOs), exec.clone());
        let outcomes = run_installers(
            &dir.path().join("INSTALLERS"),
            InstallerKind::for_os(Os::MacOs),
            &ctx,
        );
        assert!(outcomes.is_empty());
        assert!(exec.command_lines().is_empty());
    }

    #[test]
    fn continue_policy_attempts_every_file() {
        let dir = tempfile::tempdir().unwrap();
        let good = touch(dir.path(), "good.pkg");
        let bad = touch(dir.path(), "bad.pkg");
        // bad.pkg sorts first
        let exec = Arc::new(RecordingExecutor::with_exit_codes(&[1, 0]));
        let ctx = test_context(Platform::new(Os::MacOs), exec.clone());

        let outcomes = run_installers(dir.path(), InstallerKind::for_os(Os::MacOs), &ctx);

        assert_eq!(outcomes.len(), 2);
        assert!(!outcomes[0].success());
        assert!(
            outcomes[0]
                .line()
                .starts_with(&format!("Failed to install {}: exit 1", bad.display()))
        );
        assert_eq!(outcomes[1].status, Status::Installed { file: good });
        assert_eq!(exec.command_lines().len(), 2);
    }

    #[test]
    fn abort_policy_skips_the_rest() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "a.pkg");
        let c = touch(dir.path(), "c.pkg");
        touch(dir.path(), "b.pkg");
        let exec = Arc::new(RecordingExecutor::with_exit_codes(&[0, 2]));
        let mut ctx = test_context(Platform::new(Os::MacOs), exec.clone());
        ctx.installer_policy = InstallerPolicy::Abort;

        let outcomes = run_installers(dir.path(), InstallerKind::for_os(Os::MacOs), &ctx);

        assert_eq!(outcomes.len(), 3);
        assert!(matches!(outcomes[0].status, Status::Installed { .. }));
        assert!(matches!(outcomes[1].status, Status::Failed { .. }));
        assert_eq!(
            outcomes[2].line(),
            format!(
                "Skipped {}: installer batch aborted after an earlier failure",
                c.display()
            )
        );
        assert!(outcomes[2].success());
        assert_eq!(exec.command_lines().len(), 2);
    }

    #[test]
    fn dry_run_launches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let pkg = touch(dir.path(), "a.pkg");
        let exec = Arc::new(RecordingExecutor::new());
        let mut ctx = test_context(Platform::new(Os::MacOs), exec.clone());
        ctx.dry_run = true;

        let outcomes = run_installers(dir.path(), InstallerKind::for_os(Os::MacOs), &ctx);

        assert_eq!(
            outcomes[0].line(),
            format!("Would run sudo installer -pkg {} -target /", pkg.display())
        );
        assert!(exec.command_lines().is_empty());
    }
}
