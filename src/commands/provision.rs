//! Command: create the staging folder layout.
use anyhow::Result;

use super::CommandSetup;
use crate::cli::{GlobalOpts, ProvisionOpts};
use crate::layout::staging_folders;
use crate::logging::Logger;

/// Run the provision command.
///
/// # Errors
///
/// Returns an error if settings cannot be loaded or the layout cannot be
/// created.
pub fn run(global: &GlobalOpts, opts: &ProvisionOpts, log: &Logger) -> Result<()> {
    let setup = CommandSetup::init(global, log)?;
    let folders = staging_folders(setup.platform.os);
    let root = opts.base.join(&setup.settings.staging_name);

    log.stage("Provisioning staging folders");
    if global.dry_run {
        log.dry_run(&format!(
            "Would create {} with {}",
            root.display(),
            folders.join(", ")
        ));
        return Ok(());
    }

    let root = crate::provision::provision(&opts.base, &setup.settings.staging_name, &folders)?;
    for folder in &folders {
        log.debug(&format!("{}", root.join(folder).display()));
    }
    log.info(&format!("staging root ready: {}", root.display()));
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::platform::Os;

    fn global(dry_run: bool, dir: &std::path::Path) -> GlobalOpts {
        GlobalOpts {
            dry_run,
            platform: Some(Os::Windows),
            config: Some(dir.join("absent.toml")),
        }
    }

    #[test]
    fn creates_default_layout() {
        let base = tempfile::tempdir().unwrap();
        let opts = ProvisionOpts {
            base: base.path().to_path_buf(),
        };
        run(&global(false, base.path()), &opts, &Logger::with_log_file(None)).unwrap();
        let root = base.path().join("PluginInstaller");
        assert!(root.join("INSTALLERS").is_dir());
        assert!(root.join("VST3").is_dir());
        assert!(!root.join("AU").exists());
    }

    #[test]
    fn dry_run_creates_nothing() {
        let base = tempfile::tempdir().unwrap();
        let opts = ProvisionOpts {
            base: base.path().to_path_buf(),
        };
        run(&global(true, base.path()), &opts, &Logger::with_log_file(None)).unwrap();
        assert!(!base.path().join("PluginInstaller").exists());
    }
}
