//! Staging layout and per-platform destination tables.
//!
//! A staging root holds one folder per [`Category`] plus an `INSTALLERS`
//! folder. Each category maps to a fixed, platform-native destination; those
//! tables live here and are not configurable at runtime.
use std::fmt;
use std::path::{Component, Path, PathBuf};

use crate::engine::installers::InstallerKind;
use crate::error::DeployError;
use crate::platform::{Os, Platform};

/// Name of the staging subfolder scanned for package installers.
pub const INSTALLERS_FOLDER: &str = "INSTALLERS";

/// Default name of the staging root created by the provisioner.
pub const DEFAULT_STAGING_NAME: &str = "PluginInstaller";

/// Plug-in format classification; each maps to one destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    /// VST 2 plug-ins.
    Vst,
    /// VST 3 plug-ins.
    Vst3,
    /// Audio Unit components (macOS only).
    Au,
    /// Avid AAX plug-ins.
    Aax,
    /// Manuals and other documents, copied to the user's Documents folder.
    Documents,
}

impl Category {
    /// Staging subfolder name for this category.
    #[must_use]
    pub const fn folder_name(self) -> &'static str {
        match self {
            Self::Vst => "VST",
            Self::Vst3 => "VST3",
            Self::Au => "AU",
            Self::Aax => "AAX",
            Self::Documents => "DOCUMENTS",
        }
    }

    /// Categories deployed on `os`, in deployment order.
    #[must_use]
    pub const fn for_os(os: Os) -> &'static [Self] {
        match os {
            Os::MacOs => &[Self::Vst, Self::Vst3, Self::Au, Self::Aax, Self::Documents],
            Os::Windows => &[Self::Vst, Self::Vst3, Self::Aax, Self::Documents],
        }
    }

    /// Where this category is installed on `os`, or `None` if the format does
    /// not exist there. `home` is only consulted for [`Category::Documents`].
    #[must_use]
    pub fn destination(self, os: Os, home: &Path) -> Option<PathBuf> {
        let fixed = match (os, self) {
            (_, Self::Documents) => return Some(home.join("Documents")),
            (Os::MacOs, Self::Vst) => "/Library/Audio/Plug-Ins/VST",
            (Os::MacOs, Self::Vst3) => "/Library/Audio/Plug-Ins/VST3",
            (Os::MacOs, Self::Au) => "/Library/Audio/Plug-Ins/Components",
            (Os::MacOs, Self::Aax) => "/Library/Application Support/Avid/Audio/Plug-Ins",
            (Os::Windows, Self::Vst) => "C:/Program Files/VSTPlugins",
            (Os::Windows, Self::Vst3) => "C:/Program Files/Common Files/VST3",
            (Os::Windows, Self::Aax) => "C:/Program Files/Common Files/Avid/Audio/Plug-Ins",
            (Os::Windows, Self::Au) => return None,
        };
        Some(PathBuf::from(fixed))
    }

    /// Whether the destination is a system location or inside the user's home.
    #[must_use]
    pub const fn scope(self) -> Scope {
        match self {
            Self::Documents => Scope::User,
            Self::Vst | Self::Vst3 | Self::Au | Self::Aax => Scope::System,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.folder_name())
    }
}

/// Write scope of a destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Outside the caller's normal write scope; needs elevated operations and
    /// ownership normalization afterwards.
    System,
    /// Already owned by the user (home directory).
    User,
}

/// Staging subfolders created by the provisioner on `os`, sorted by name.
#[must_use]
pub fn staging_folders(os: Os) -> Vec<&'static str> {
    let mut folders: Vec<&str> = Category::for_os(os)
        .iter()
        .map(|c| c.folder_name())
        .chain(std::iter::once(INSTALLERS_FOLDER))
        .collect();
    folders.sort_unstable();
    folders
}

/// One category's source folder and install destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryMapping {
    /// The category being deployed.
    pub category: Category,
    /// Source folder relative to the staging root.
    pub source_subpath: PathBuf,
    /// Absolute source folder (`staging_root/source_subpath`).
    pub source: PathBuf,
    /// Absolute, platform-native destination.
    pub destination: PathBuf,
    /// Whether the destination needs elevated operations.
    pub scope: Scope,
}

impl CategoryMapping {
    /// Build a mapping for `category` rooted at `staging_root`.
    #[must_use]
    pub fn new(category: Category, staging_root: &Path, destination: PathBuf) -> Self {
        let source_subpath = PathBuf::from(category.folder_name());
        Self {
            category,
            source: staging_root.join(&source_subpath),
            source_subpath,
            destination: normalize(&destination),
            scope: category.scope(),
        }
    }

    /// Override the scope (used when redirecting destinations in tests).
    #[must_use]
    pub const fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }
}

/// Everything one deployment run needs, passed explicitly into the engine.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Existing staging root.
    pub staging_root: PathBuf,
    /// Categories to deploy, in order.
    pub mappings: Vec<CategoryMapping>,
    /// Folder scanned for package installers.
    pub installer_folder: PathBuf,
    /// Installer kinds recognised on this platform, in invocation order.
    pub installer_kinds: Vec<InstallerKind>,
}

impl RunConfig {
    /// Build the run configuration for `platform` from the fixed destination
    /// tables.
    ///
    /// # Errors
    ///
    /// Returns [`DeployError::StagingRootMissing`] if `staging_root` is not an
    /// existing directory.
    pub fn for_platform(
        staging_root: &Path,
        platform: &Platform,
        home: &Path,
    ) -> Result<Self, DeployError> {
        let staging_root = resolve_staging_root(staging_root)?;
        let mappings = Category::for_os(platform.os)
            .iter()
            .filter_map(|&category| {
                category
                    .destination(platform.os, home)
                    .map(|dest| CategoryMapping::new(category, &staging_root, dest))
            })
            .collect();
        Ok(Self {
            installer_folder: staging_root.join(INSTALLERS_FOLDER),
            installer_kinds: InstallerKind::for_os(platform.os).to_vec(),
            mappings,
            staging_root,
        })
    }

    /// Build a run configuration with explicit mappings.
    ///
    /// Each mapping's source is rebased onto the canonical staging root, so
    /// sources match [`RunConfig::staging_root`] even when `staging_root` is
    /// reached through a link.
    ///
    /// # Errors
    ///
    /// Returns [`DeployError::StagingRootMissing`] if `staging_root` is not an
    /// existing directory.
    pub fn with_mappings(
        staging_root: &Path,
        mappings: Vec<CategoryMapping>,
        installer_kinds: Vec<InstallerKind>,
    ) -> Result<Self, DeployError> {
        let staging_root = resolve_staging_root(staging_root)?;
        let mappings = mappings
            .into_iter()
            .map(|m| CategoryMapping {
                source: staging_root.join(&m.source_subpath),
                ..m
            })
            .collect();
        Ok(Self {
            installer_folder: staging_root.join(INSTALLERS_FOLDER),
            installer_kinds,
            mappings,
            staging_root,
        })
    }
}

/// Canonicalize an existing staging root.
fn resolve_staging_root(path: &Path) -> Result<PathBuf, DeployError> {
    if !path.is_dir() {
        return Err(DeployError::StagingRootMissing {
            path: path.to_path_buf(),
        });
    }
    dunce::canonicalize(path).map_err(|_| DeployError::StagingRootMissing {
        path: path.to_path_buf(),
    })
}

/// Drop trailing separators and `.` components so that `dest/` and `dest`
/// name the same directory.
#[must_use]
pub fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn macos_staging_folders() {
        assert_eq!(
            staging_folders(Os::MacOs),
            vec!["AAX", "AU", "DOCUMENTS", "INSTALLERS", "VST", "VST3"]
        );
    }

    #[test]
    fn windows_staging_folders() {
        assert_eq!(
            staging_folders(Os::Windows),
            vec!["AAX", "DOCUMENTS", "INSTALLERS", "VST", "VST3"]
        );
    }

    #[test]
    fn macos_destinations() {
        let home = Path::new("/Users/sam");
        assert_eq!(
            Category::Au.destination(Os::MacOs, home),
            Some(PathBuf::from("/Library/Audio/Plug-Ins/Components"))
        );
        assert_eq!(
            Category::Aax.destination(Os::MacOs, home),
            Some(PathBuf::from(
                "/Library/Application Support/Avid/Audio/Plug-Ins"
            ))
        );
        assert_eq!(
            Category::Documents.destination(Os::MacOs, home),
            Some(PathBuf::from("/Users/sam/Documents"))
        );
    }

    #[test]
    fn windows_has_no_au_destination() {
        let home = Path::new("C:/Users/sam");
        assert_eq!(Category::Au.destination(Os::Windows, home), None);
        assert_eq!(
            Category::Vst.destination(Os::Windows, home),
            Some(PathBuf::from("C:/Program Files/VSTPlugins"))
        );
    }

    #[test]
    fn documents_is_user_scope() {
        assert_eq!(Category::Documents.scope(), Scope::User);
        assert_eq!(Category::Vst3.scope(), Scope::System);
    }

    #[test]
    fn normalize_strips_trailing_separator() {
        assert_eq!(
            normalize(Path::new("/Library/Audio/Plug-Ins/VST/")),
            PathBuf::from("/Library/Audio/Plug-Ins/VST")
        );
        assert_eq!(normalize(Path::new("/a/./b")), PathBuf::from("/a/b"));
    }

    #[test]
    fn mapping_source_is_relative_to_staging_root() {
        let m = CategoryMapping::new(
            Category::Vst3,
            Path::new("/stage"),
            PathBuf::from("/dest/VST3/"),
        );
        assert_eq!(m.source_subpath, PathBuf::from("VST3"));
        assert_eq!(m.source, PathBuf::from("/stage/VST3"));
        assert_eq!(m.destination, PathBuf::from("/dest/VST3"));
        assert_eq!(m.scope, Scope::System);
    }

    #[test]
    fn run_config_for_macos_follows_mapping_order() {
        let stage = tempfile::tempdir().unwrap();
        let run = RunConfig::for_platform(
            stage.path(),
            &Platform::new(Os::MacOs),
            Path::new("/Users/sam"),
        )
        .unwrap();
        let order: Vec<Category> = run.mappings.iter().map(|m| m.category).collect();
        assert_eq!(
            order,
            vec![
                Category::Vst,
                Category::Vst3,
                Category::Au,
                Category::Aax,
                Category::Documents
            ]
        );
        assert!(run.installer_folder.ends_with(INSTALLERS_FOLDER));
        assert_eq!(
            run.installer_kinds,
            vec![InstallerKind::Pkg, InstallerKind::Mpkg]
        );
    }

    #[test]
    fn run_config_for_windows_skips_au() {
        let stage = tempfile::tempdir().unwrap();
        let run = RunConfig::for_platform(
            stage.path(),
            &Platform::new(Os::Windows),
            Path::new("C:/Users/sam"),
        )
        .unwrap();
        assert_eq!(run.mappings.len(), 4);
        assert!(run.mappings.iter().all(|m| m.category != Category::Au));
    }

    #[test]
    fn run_config_requires_existing_staging_root() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        let err = RunConfig::for_platform(
            &missing,
            &Platform::new(Os::MacOs),
            Path::new("/Users/sam"),
        )
        .unwrap_err();
        assert!(matches!(err, DeployError::StagingRootMissing { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn explicit_mappings_are_rebased_on_canonical_root() {
        let dir = tempfile::tempdir().unwrap();
        let real = dir.path().join("PluginInstaller");
        std::fs::create_dir(&real).unwrap();
        let linked = dir.path().join("Staging");
        std::os::unix::fs::symlink(&real, &linked).unwrap();
        let mapping = CategoryMapping::new(Category::Vst3, &linked, dir.path().join("dest"));
        assert_eq!(mapping.source, linked.join("VST3"));

        let run = RunConfig::with_mappings(&linked, vec![mapping], Vec::new()).unwrap();

        let canonical = dunce::canonicalize(&real).unwrap();
        assert_eq!(run.staging_root, canonical);
        assert_eq!(run.mappings[0].source, canonical.join("VST3"));
        assert_eq!(run.mappings[0].source_subpath, PathBuf::from("VST3"));
    }
}
