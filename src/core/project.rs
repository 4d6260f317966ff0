//! Project - a loaded `Quay.toml` and the directory it lives in.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::config::{ConfigError, ProjectConfig};
use crate::core::param::{ProjectInfo, ProjectParam};
use crate::core::version::VersionResolver;
use crate::dist::DisterFactory;
use crate::docker::DockerBuilderFactory;

/// A project loaded from its `Quay.toml`.
#[derive(Debug)]
pub struct Project {
    root: PathBuf,
    config: ProjectConfig,
}

impl Project {
    /// Load the project whose file is at `project_file`.
    pub fn load(project_file: &Path) -> Result<Self, ConfigError> {
        let config = ProjectConfig::load(project_file)?;
        let root = project_file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        // Scripts run from the project root, so every derived path must be absolute.
        let root = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()
                .map_err(|source| ConfigError::Read {
                    path: project_file.to_path_buf(),
                    source,
                })?
                .join(root)
        };

        tracing::debug!(
            "loaded {} with {} products",
            project_file.display(),
            config.products.len()
        );

        Ok(Project { root, config })
    }

    /// Directory holding `Quay.toml`.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    /// Validate against the built-in dister and docker builder types.
    pub fn param(&self) -> Result<ProjectParam, ConfigError> {
        let disters = DisterFactory::new()?;
        let docker_builders = DockerBuilderFactory::new()?;
        self.config.to_param(&self.root, &disters, &docker_builders)
    }

    /// Resolve the project version.
    pub fn info(&self, resolver: &dyn VersionResolver) -> Result<ProjectInfo> {
        let version = resolver
            .resolve(&self.root)
            .context("failed to determine project version")?;
        Ok(ProjectInfo::new(&self.root, version))
    }
}
