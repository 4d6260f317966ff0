//! Filesystem utilities.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::WalkDir;

/// Remove a directory and all its contents, if it exists.
pub fn remove_dir_all_if_exists(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_dir_all(path)
            .with_context(|| format!("failed to remove directory: {}", path.display()))?;
    }
    Ok(())
}

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("failed to create directory: {}", path.display()))?;
    }
    Ok(())
}

/// Replace a directory with a fresh, empty one.
pub fn clean_dir(path: &Path) -> Result<()> {
    remove_dir_all_if_exists(path)?;
    fs::create_dir_all(path)
        .with_context(|| format!("failed to create directory: {}", path.display()))
}

/// Copy a file into a directory, keeping its file name.
pub fn copy_into(src: &Path, dir: &Path) -> Result<PathBuf> {
    let name = src
        .file_name()
        .with_context(|| format!("path has no file name: {}", src.display()))?;
    let dst = dir.join(name);
    fs::copy(src, &dst).with_context(|| {
        format!("failed to copy {} to {}", src.display(), dst.display())
    })?;
    Ok(dst)
}

/// Names of the regular files directly inside `dir`, sorted by name.
///
/// Subdirectories and their contents are not included.
pub fn list_files(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry =
            entry.with_context(|| format!("failed to read directory: {}", dir.display()))?;
        if entry.file_type().is_file() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }

    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_list_files_skips_directories() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("b.tgz"), "b").unwrap();
        fs::write(tmp.path().join("a.txt"), "a").unwrap();
        fs::create_dir_all(tmp.path().join("nested")).unwrap();
        fs::write(tmp.path().join("nested/c.txt"), "c").unwrap();

        let files = list_files(tmp.path()).unwrap();
        assert_eq!(files, vec!["a.txt".to_string(), "b.tgz".to_string()]);
    }

    #[test]
    fn test_clean_dir_empties_existing() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("dist");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("stale.tgz"), "old").unwrap();

        clean_dir(&dir).unwrap();

        assert!(dir.is_dir());
        assert!(list_files(&dir).unwrap().is_empty());
    }

    #[test]
    fn test_copy_into() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("artifact.tgz");
        let dst_dir = tmp.path().join("context");
        fs::write(&src, "content").unwrap();
        fs::create_dir_all(&dst_dir).unwrap();

        let dst = copy_into(&src, &dst_dir).unwrap();

        assert_eq!(dst, dst_dir.join("artifact.tgz"));
        assert_eq!(fs::read_to_string(dst).unwrap(), "content");
    }
}
