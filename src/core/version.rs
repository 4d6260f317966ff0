//! Project version resolution.

use std::path::Path;

use anyhow::{Context, Result};
use git2::{DescribeFormatOptions, DescribeOptions, Repository};

/// Version reported when the repository has no tags to describe from.
pub const UNSPECIFIED_VERSION: &str = "unspecified";

/// Yields the version string for a project.
pub trait VersionResolver: Send + Sync {
    fn resolve(&self, project_dir: &Path) -> Result<String>;
}

/// Version derived from git tags, `git describe --tags` style.
///
/// - on a tag: `1.2.0`
/// - after a tag: `1.2.0-3-gabc1234`
/// - uncommitted changes: `.dirty` appended
/// - no reachable tag: [`UNSPECIFIED_VERSION`]
#[derive(Debug, Clone, Copy, Default)]
pub struct GitVersionResolver;

impl VersionResolver for GitVersionResolver {
    fn resolve(&self, project_dir: &Path) -> Result<String> {
        let repo = Repository::discover(project_dir).with_context(|| {
            format!(
                "failed to open git repository at {}; use --version-override to set a version",
                project_dir.display()
            )
        })?;

        let describe = match repo.describe(DescribeOptions::new().describe_tags()) {
            Ok(describe) => describe,
            Err(e) => {
                tracing::debug!("git describe failed: {}", e.message());
                return Ok(UNSPECIFIED_VERSION.to_string());
            }
        };

        let version = describe
            .format(Some(DescribeFormatOptions::new().dirty_suffix(".dirty")))
            .context("failed to format git describe output")?;

        tracing::debug!("resolved version {} from git", version);
        Ok(version)
    }
}

/// A version supplied up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedVersion(pub String);

impl VersionResolver for FixedVersion {
    fn resolve(&self, _project_dir: &Path) -> Result<String> {
        Ok(self.0.clone())
    }
}
