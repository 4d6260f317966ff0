//! Global context for Quay operations.
//!
//! Provides centralized access to the working directory, project file
//! discovery and settings locations.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use crate::util::config::{self, Config};

/// Canonical project file name.
pub const PROJECT_FILE: &str = "Quay.toml";

/// Failure to locate a project file.
#[derive(Debug, Error)]
pub enum ProjectFileError {
    #[error("no Quay.toml found in `{}` or any parent directory", searched_from.display())]
    NotFound { searched_from: PathBuf },
}

/// Find `Quay.toml` in `start` or its ancestors.
pub fn find_project_file(start: &Path) -> Result<PathBuf, ProjectFileError> {
    start
        .ancestors()
        .map(|dir| dir.join(PROJECT_FILE))
        .find(|candidate| candidate.is_file())
        .ok_or_else(|| ProjectFileError::NotFound {
            searched_from: start.to_path_buf(),
        })
}

/// Global context containing configuration and paths.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,
}

impl GlobalContext {
    /// Create a new GlobalContext rooted at the process working directory.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        Ok(GlobalContext { cwd })
    }

    /// Create a GlobalContext with a specific working directory.
    pub fn with_cwd(cwd: PathBuf) -> Self {
        GlobalContext { cwd }
    }

    /// Create a GlobalContext for `dir`, resolved against the process
    /// working directory when relative.
    pub fn for_dir(dir: &Path) -> Result<Self> {
        let ctx = GlobalContext::new()?;
        Ok(GlobalContext::with_cwd(ctx.cwd.join(dir)))
    }

    /// Get the current working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Locate the project file from the working directory upwards.
    pub fn find_project_file(&self) -> Result<PathBuf, ProjectFileError> {
        find_project_file(&self.cwd)
    }

    /// Load settings, with the project directory's `.quay/config.toml`
    /// overriding the global one.
    pub fn load_config(&self, project_root: &Path) -> Config {
        let global = config::global_config_path();
        config::load_config(global.as_deref(), &config::project_config_path(project_root))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_find_project_file_in_parent() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join(PROJECT_FILE), "").unwrap();
        let nested = tmp.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        let ctx = GlobalContext::with_cwd(nested);
        assert_eq!(
            ctx.find_project_file().unwrap(),
            tmp.path().join(PROJECT_FILE)
        );
    }

    #[test]
    fn test_for_relative_dir_is_absolute() {
        let ctx = GlobalContext::for_dir(Path::new("sub/project")).unwrap();
        assert!(ctx.cwd().is_absolute());
        assert!(ctx.cwd().ends_with("sub/project"));
    }

    #[test]
    fn test_find_project_file_missing() {
        let tmp = TempDir::new().unwrap();
        let err = find_project_file(tmp.path()).unwrap_err();
        assert!(err.to_string().contains("no Quay.toml found"));
    }
}
