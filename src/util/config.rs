//! User settings for Quay.
//!
//! Quay reads settings from two locations:
//! - Global: `~/.quay/config.toml` - User-wide defaults
//! - Project: `.quay/config.toml` - Project-specific overrides
//!
//! Project settings take precedence over global settings. Settings tune how
//! a run executes; what gets packaged is described by `Quay.toml`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::util::shell::ColorChoice;

/// Quay settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Dist settings
    pub dist: DistSettings,

    /// Terminal settings
    pub term: TermSettings,
}

/// Dist-related settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DistSettings {
    /// Products processed concurrently within one dependency level
    pub jobs: Option<usize>,
}

/// Terminal-related settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TermSettings {
    /// Color output mode
    pub color: Option<ColorChoice>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.dist.jobs.is_some() {
            self.dist.jobs = other.dist.jobs;
        }
        if other.term.color.is_some() {
            self.term.color = other.term.color;
        }
    }

    /// Effective job count; zero is treated as one.
    pub fn jobs(&self) -> usize {
        self.dist.jobs.unwrap_or(1).max(1)
    }
}

/// Get the global quay config directory (~/.quay).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".quay"))
}

/// Get the global config path (~/.quay/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.quay/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".quay").join("config.toml")
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.quay/config.toml)
/// 2. Global config (~/.quay/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        config.merge(Config::load_or_default(global_path));
    }

    config.merge(Config::load_or_default(project_path));

    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.dist.jobs.is_none());
        assert_eq!(config.jobs(), 1);
        assert!(config.term.color.is_none());
    }

    #[test]
    fn test_config_load() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");

        std::fs::write(
            &config_path,
            r#"
[dist]
jobs = 4

[term]
color = "never"
"#,
        )
        .unwrap();

        let config = Config::load(&config_path).unwrap();
        assert_eq!(config.dist.jobs, Some(4));
        assert_eq!(config.term.color, Some(ColorChoice::Never));
    }

    #[test]
    fn test_config_merge() {
        let tmp = TempDir::new().unwrap();
        let global = tmp.path().join("global.toml");
        let project = tmp.path().join("project.toml");
        std::fs::write(&global, "[dist]\njobs = 8\n[term]\ncolor = \"always\"\n").unwrap();
        std::fs::write(&project, "[dist]\njobs = 2\n").unwrap();

        let config = load_config(Some(&global), &project);

        assert_eq!(config.jobs(), 2);
        assert_eq!(config.term.color, Some(ColorChoice::Always)); // Not overridden
    }

    #[test]
    fn test_zero_jobs_means_sequential() {
        let mut config = Config::default();
        config.dist.jobs = Some(0);
        assert_eq!(config.jobs(), 1);
    }

    #[test]
    fn test_invalid_config_falls_back_to_default() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[dist]\njobs = \"many\"\n").unwrap();

        let config = Config::load_or_default(&path);
        assert!(config.dist.jobs.is_none());
    }
}
