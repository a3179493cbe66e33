//! Directory-content helpers shared by the privileged-operation backends.
use anyhow::{Context as _, Result, bail};
use std::ffi::OsString;
use std::path::Path;

/// Recursively copy the *contents* of `src` into `dst`, merging.
///
/// `dst` is created if needed. Files already at `dst` are never removed;
/// files with the same relative path are overwritten. Symlinks are never
/// followed: each link is recreated at the destination with the same target,
/// matching what `cp -R` does, so a link cycle such as `loop -> .` is copied
/// as a single link.
///
/// Returns the number of files copied, counting each link as one file; this
/// always equals [`count_files`] of `src`.
///
/// # Errors
///
/// Returns an error if a directory cannot be created, a source entry cannot
/// be read, a file cannot be copied, or a link cannot be recreated.
pub fn copy_dir_contents(src: &Path, dst: &Path) -> Result<usize> {
    std::fs::create_dir_all(dst)
        .with_context(|| format!("creating directory {}", dst.display()))?;
    let mut copied = 0;
    for entry in
        std::fs::read_dir(src).with_context(|| format!("reading directory {}", src.display()))?
    {
        let entry = entry.with_context(|| format!("reading entry in {}", src.display()))?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());
        let file_type = entry
            .file_type()
            .with_context(|| format!("reading file type of {}", src_path.display()))?;
        if file_type.is_symlink() {
            copy_link(&src_path, &dst_path)?;
            copied += 1;
        } else if file_type.is_dir() {
            copied += copy_dir_contents(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path).with_context(|| {
                format!("copying {} to {}", src_path.display(), dst_path.display())
            })?;
            copied += 1;
        }
    }
    Ok(copied)
}

/// Recreate the link at `src` as `dst`, replacing a file or link already
/// there.
fn copy_link(src: &Path, dst: &Path) -> Result<()> {
    let target =
        std::fs::read_link(src).with_context(|| format!("reading link {}", src.display()))?;
    if let Ok(meta) = std::fs::symlink_metadata(dst) {
        if meta.is_dir() {
            bail!(
                "cannot replace directory {} with link {}",
                dst.display(),
                src.display()
            );
        }
        // Directory links on Windows only go away with `remove_dir`.
        std::fs::remove_file(dst)
            .or_else(|_| std::fs::remove_dir(dst))
            .with_context(|| format!("removing existing {}", dst.display()))?;
    }
    create_symlink(src, &target, dst)
        .with_context(|| format!("linking {} to {}", dst.display(), target.display()))
}

#[cfg(unix)]
fn create_symlink(_src: &Path, target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn create_symlink(src: &Path, target: &Path, link: &Path) -> std::io::Result<()> {
    if src.is_dir() {
        std::os::windows::fs::symlink_dir(target, link)
    } else {
        std::os::windows::fs::symlink_file(target, link)
    }
}

/// Count the files below `dir`, without following links. A link counts as
/// one file whatever it points at.
///
/// # Errors
///
/// Returns an error if any directory in the tree cannot be read.
pub fn count_files(dir: &Path) -> Result<usize> {
    let mut count = 0;
    for entry in
        std::fs::read_dir(dir).with_context(|| format!("reading directory {}", dir.display()))?
    {
        let entry = entry.with_context(|| format!("reading entry in {}", dir.display()))?;
        let file_type = entry
            .file_type()
            .with_context(|| format!("reading file type of {}", entry.path().display()))?;
        if file_type.is_dir() {
            count += count_files(&entry.path())?;
        } else {
            count += 1;
        }
    }
    Ok(count)
}

/// Names of the immediate children of `dir`, sorted.
///
/// # Errors
///
/// Returns an error if `dir` cannot be read.
pub fn top_level_entries(dir: &Path) -> Result<Vec<OsString>> {
    let mut names = std::fs::read_dir(dir)
        .with_context(|| format!("reading directory {}", dir.display()))?
        .map(|e| e.map(|entry| entry.file_name()).map_err(Into::into))
        .collect::<Result<Vec<_>>>()?;
    names.sort();
    Ok(names)
}
