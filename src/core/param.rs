//! Resolved, validated project parameters.
//!
//! Everything here is produced by [`ProjectConfig::to_param`] and is never
//! mutated afterwards. Dister and docker builder instances are already
//! constructed, so operations never look up a type name again.
//!
//! [`ProjectConfig::to_param`]: crate::core::config::ProjectConfig::to_param

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::core::os_arch::OsArch;
use crate::core::outputs::OutputLocator;
use crate::core::{DistId, DockerId, ProductId};
use crate::dist::Dister;
use crate::docker::DockerBuilder;
use crate::resolver::{ProductGraph, ResolveError};

/// Project-wide facts that are not specific to a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectInfo {
    /// Directory holding `Quay.toml`
    pub project_dir: PathBuf,

    /// Resolved version string
    pub version: String,
}

impl ProjectInfo {
    pub fn new(project_dir: impl Into<PathBuf>, version: impl Into<String>) -> Self {
        ProjectInfo {
            project_dir: project_dir.into(),
            version: version.into(),
        }
    }
}

/// The validated project.
#[derive(Debug)]
pub struct ProjectParam {
    pub project_dir: PathBuf,

    /// Shell prologue spliced into every custom script
    pub script_includes: String,

    /// Absolute build root
    pub build_root: PathBuf,

    /// Absolute dist root
    pub dist_root: PathBuf,

    pub products: BTreeMap<ProductId, ProductParam>,

    pub graph: ProductGraph,
}

impl ProjectParam {
    pub fn product(&self, id: &ProductId) -> Option<&ProductParam> {
        self.products.get(id)
    }

    /// Output locator for a resolved version.
    pub fn locator(&self, version: &str) -> OutputLocator {
        OutputLocator::new(&self.build_root, &self.dist_root, version)
    }

    /// Processing order for `requested` (empty = all products).
    pub fn ordered_products(
        &self,
        requested: &[ProductId],
    ) -> Result<Vec<&ProductParam>, ResolveError> {
        Ok(self
            .graph
            .order(requested)?
            .iter()
            .filter_map(|id| self.products.get(id))
            .collect())
    }

    /// Processing order grouped into mutually independent levels.
    pub fn product_levels(
        &self,
        requested: &[ProductId],
    ) -> Result<Vec<Vec<&ProductParam>>, ResolveError> {
        Ok(self
            .graph
            .levels(requested)?
            .iter()
            .map(|level| {
                level
                    .iter()
                    .filter_map(|id| self.products.get(id))
                    .collect()
            })
            .collect())
    }
}

/// One validated product.
#[derive(Debug)]
pub struct ProductParam {
    pub id: ProductId,
    pub build: BuildParam,

    /// Disters in configured order
    pub dist: Vec<DisterParam>,

    /// Docker builders in configured order
    pub docker: Vec<DockerBuilderParam>,

    /// Direct dependencies in declared order
    pub dependencies: Vec<ProductId>,
}

impl ProductParam {
    pub fn dister(&self, id: &DistId) -> Option<&DisterParam> {
        self.dist.iter().find(|d| &d.id == id)
    }
}

/// Build settings the packaging pipeline relies on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildParam {
    pub script: Option<String>,
    pub os_archs: Vec<OsArch>,
    pub output_name: String,
}

impl BuildParam {
    /// Directory for one target's build output.
    pub fn os_arch_dir(&self, build_dir: &Path, os_arch: &OsArch) -> PathBuf {
        build_dir.join(os_arch.to_string())
    }

    /// Where the builder leaves the executable for `os_arch`.
    pub fn executable_path(&self, build_dir: &Path, os_arch: &OsArch) -> PathBuf {
        self.os_arch_dir(build_dir, os_arch)
            .join(os_arch.executable_name(&self.output_name))
    }
}

/// One configured dister, ready to run.
#[derive(Debug, Clone)]
pub struct DisterParam {
    pub id: DistId,
    pub type_name: String,

    /// Non-empty override script
    pub script: Option<String>,

    pub dister: Arc<dyn Dister>,
}

/// One configured docker builder, ready to run.
#[derive(Debug, Clone)]
pub struct DockerBuilderParam {
    pub id: DockerId,
    pub type_name: String,
    pub script: Option<String>,

    /// Absolute build context directory
    pub context_dir: PathBuf,

    /// Dister IDs whose artifacts are staged into the context
    pub input_dists: Vec<DistId>,

    pub tag_templates: Vec<String>,

    pub builder: Arc<dyn DockerBuilder>,
}

impl DockerBuilderParam {
    /// Tags with `{{Product}}` and `{{Version}}` substituted.
    pub fn tags(&self, product: &ProductId, version: &str) -> Vec<String> {
        self.tag_templates
            .iter()
            .map(|t| {
                t.replace("{{Product}}", product.as_str())
                    .replace("{{Version}}", version)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docker::registry::DockerBuilderFactory;

    #[test]
    fn test_executable_path() {
        let build = BuildParam {
            script: None,
            os_archs: vec![],
            output_name: "foo".to_string(),
        };
        let dir = Path::new("/out/build/foo/1.0.0");

        assert_eq!(
            build.executable_path(dir, &OsArch::new("linux", "amd64")),
            PathBuf::from("/out/build/foo/1.0.0/linux-amd64/foo")
        );
        assert_eq!(
            build.executable_path(dir, &OsArch::new("windows", "amd64")),
            PathBuf::from("/out/build/foo/1.0.0/windows-amd64/foo.exe")
        );
    }

    #[test]
    fn test_docker_tags_substituted() {
        let factory = DockerBuilderFactory::new().unwrap();
        let param = DockerBuilderParam {
            id: DockerId::from("image"),
            type_name: "default".to_string(),
            script: None,
            context_dir: PathBuf::from("/ctx"),
            input_dists: vec![],
            tag_templates: vec![
                "example/{{Product}}:{{Version}}".to_string(),
                "example/{{Product}}:latest".to_string(),
            ],
            builder: factory.create("default", None).unwrap(),
        };

        assert_eq!(
            param.tags(&ProductId::from("foo"), "1.2.0"),
            vec!["example/foo:1.2.0", "example/foo:latest"]
        );
    }
}
