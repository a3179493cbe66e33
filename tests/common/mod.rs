// Shared helpers for integration tests.
//
// Provides a temporary staging root plus a temporary destination tree, a
// fluent builder for populating them, and fakes for the subprocess and
// privileged-operation seams so deployments run entirely inside temp dirs.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use plugin_installer::config::Settings;
use plugin_installer::engine::{Context, InstallerKind};
use plugin_installer::exec::{ExecResult, Executor};
use plugin_installer::layout::{Category, CategoryMapping, RunConfig};
use plugin_installer::logging::Logger;
use plugin_installer::platform::{Os, Platform};
use plugin_installer::privileged::{NativeOps, PrivilegedOps};

/// Executor that records every invocation and fails any command whose
/// arguments mention one of `failing`.
#[derive(Debug, Default)]
pub struct FakeExecutor {
    calls: Mutex<Vec<String>>,
    failing: Vec<String>,
}

impl FakeExecutor {
    /// Executor whose every command succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Executor that fails commands naming any of `names`.
    pub fn failing_on(names: &[&str]) -> Self {
        Self {
            failing: names.iter().map(ToString::to_string).collect(),
            ..Self::default()
        }
    }

    /// Recorded command lines, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, program: &str, args: &[&str]) -> ExecResult {
        let line = std::iter::once(program)
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ");
        let fails = self.failing.iter().any(|name| line.contains(name.as_str()));
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(line);
        }
        ExecResult {
            stdout: String::new(),
            stderr: if fails {
                "installer: package is damaged".to_string()
            } else {
                String::new()
            },
            success: !fails,
            code: Some(i32::from(fails)),
        }
    }
}

impl Executor for FakeExecutor {
    fn run(&self, program: &str, args: &[&str]) -> anyhow::Result<ExecResult> {
        let result = self.record(program, args);
        if !result.success {
            anyhow::bail!("{program} failed ({})", result.failure_detail());
        }
        Ok(result)
    }

    fn run_unchecked(&self, program: &str, args: &[&str]) -> anyhow::Result<ExecResult> {
        Ok(self.record(program, args))
    }

    fn which(&self, _: &str) -> bool {
        true
    }
}

/// In-process operations that refuse to touch the `denied` destination,
/// simulating a permission failure for that category only.
#[derive(Debug)]
pub struct DenyingOps {
    pub denied: PathBuf,
}

impl DenyingOps {
    fn check(&self, path: &Path) -> anyhow::Result<()> {
        if path == self.denied {
            anyhow::bail!("permission denied: {}", path.display());
        }
        Ok(())
    }
}

impl PrivilegedOps for DenyingOps {
    fn label(&self) -> &'static str {
        "denying"
    }

    fn create_dir_all(&self, path: &Path) -> anyhow::Result<()> {
        self.check(path)?;
        NativeOps.create_dir_all(path)
    }

    fn copy_contents(&self, src: &Path, dst: &Path) -> anyhow::Result<()> {
        self.check(dst)?;
        NativeOps.copy_contents(src, dst)
    }

    fn normalize_ownership(&self, dst: &Path, entries: &[OsString]) -> anyhow::Result<()> {
        NativeOps.normalize_ownership(dst, entries)
    }
}

/// A staging root and a destination tree, both backed by
/// [`tempfile::TempDir`] and deleted on drop.
pub struct Staging {
    /// Staging root (holds `VST/`, `INSTALLERS/`, ...).
    pub stage: tempfile::TempDir,
    /// Stand-in for the system plug-in folders.
    pub dest: tempfile::TempDir,
}

impl Staging {
    /// Path to the staging root.
    pub fn stage_path(&self) -> &Path {
        self.stage.path()
    }

    /// Destination folder used for `category`.
    pub fn dest_for(&self, category: Category) -> PathBuf {
        self.dest.path().join(category.folder_name())
    }

    /// Mappings for `categories` into the temporary destination tree.
    pub fn mappings(&self, categories: &[Category]) -> Vec<CategoryMapping> {
        categories
            .iter()
            .map(|&c| CategoryMapping::new(c, self.stage_path(), self.dest_for(c)))
            .collect()
    }

    /// Run configuration for `categories` with macOS installer kinds.
    pub fn run_config(&self, categories: &[Category]) -> RunConfig {
        RunConfig::with_mappings(
            self.stage_path(),
            self.mappings(categories),
            InstallerKind::for_os(Os::MacOs).to_vec(),
        )
        .expect("staging root exists")
    }

    /// macOS context over `executor`; every destination uses in-process ops.
    pub fn context(&self, executor: Arc<dyn Executor>) -> Context {
        let settings = Settings {
            owner: Some("tester".to_string()),
            ..Settings::default()
        };
        Context::new(
            Platform::new(Os::MacOs),
            Arc::new(Logger::with_log_file(None)),
            executor,
            false,
            &settings,
        )
        .with_system_ops(Arc::new(NativeOps))
    }

    /// Replace both temp paths in `text` with stable placeholders.
    pub fn redact(&self, text: &str) -> String {
        text.replace(&self.run_config(&[]).staging_root.display().to_string(), "[STAGE]")
            .replace(&self.dest.path().display().to_string(), "[DEST]")
    }
}

/// Relative paths of every file below `root`, sorted, with contents.
pub fn snapshot_tree(root: &Path) -> Vec<(String, Vec<u8>)> {
    fn walk(root: &Path, dir: &Path, out: &mut Vec<(String, Vec<u8>)>) {
        for entry in std::fs::read_dir(dir).expect("read dir") {
            let path = entry.expect("dir entry").path();
            if path.is_dir() {
                walk(root, &path, out);
            } else {
                let rel = path
                    .strip_prefix(root)
                    .expect("below root")
                    .to_string_lossy()
                    .replace('\\', "/");
                out.push((rel, std::fs::read(&path).expect("read file")));
            }
        }
    }
    let mut out = Vec::new();
    if root.exists() {
        walk(root, root, &mut out);
    }
    out.sort();
    out
}

/// Fluent builder for [`Staging`].
pub struct StagingBuilder {
    staging: Staging,
}

impl StagingBuilder {
    /// Begin with an empty staging root and destination tree.
    pub fn new() -> Self {
        Self {
            staging: Staging {
                stage: tempfile::tempdir().expect("create stage dir"),
                dest: tempfile::tempdir().expect("create dest dir"),
            },
        }
    }

    /// Create an (empty) staging subfolder.
    pub fn with_folder(self, folder: &str) -> Self {
        std::fs::create_dir_all(self.staging.stage.path().join(folder)).expect("create folder");
        self
    }

    /// Write `contents` to `<stage>/<folder>/<rel>`.
    pub fn with_file(self, folder: &str, rel: &str, contents: &str) -> Self {
        let path = self.staging.stage.path().join(folder).join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent");
        }
        std::fs::write(&path, contents).expect("write staged file");
        self
    }

    /// Write `contents` to `<dest>/<category>/<rel>` before the run.
    pub fn with_existing(self, category: Category, rel: &str, contents: &str) -> Self {
        let path = self.staging.dest_for(category).join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent");
        }
        std::fs::write(&path, contents).expect("write existing file");
        self
    }

    /// Drop an installer package into `INSTALLERS/`.
    pub fn with_installer(self, name: &str) -> Self {
        self.with_file("INSTALLERS", name, "")
    }

    /// Finish building.
    pub fn build(self) -> Staging {
        self.staging
    }
}
