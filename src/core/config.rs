//! `Quay.toml` schema and validation.
//!
//! [`ProjectConfig`] is the raw, deserialized form of the project file.
//! [`ProjectConfig::to_param`] validates it against the dister and docker
//! builder registries and the dependency graph, producing the resolved
//! [`ProjectParam`] that every operation works from. All configuration
//! errors surface here, before anything is built or written.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::core::os_arch::OsArch;
use crate::core::param::{
    BuildParam, DisterParam, DockerBuilderParam, ProductParam, ProjectParam,
};
use crate::core::registry::RegistryError;
use crate::core::{DistId, DockerId, ProductId};
use crate::dist::registry::{DisterFactory, OS_ARCH_BIN_TYPE};
use crate::docker::registry::DockerBuilderFactory;
use crate::resolver::{ProductGraph, ResolveError};
use crate::util::diagnostic::{suggestions, Diagnostic};
use crate::util::OrderedMap;

/// Default build output root, relative to the project directory.
pub const DEFAULT_BUILD_ROOT: &str = "out/build";

/// Default dist output root, relative to the project directory.
pub const DEFAULT_DIST_ROOT: &str = "out/dist";

/// The parsed `Quay.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct ProjectConfig {
    /// Shell fragment spliced into every custom script
    pub script_includes: String,

    /// Output directory roots
    pub output: OutputConfig,

    /// Blocks applied to products that do not declare their own
    pub product_defaults: ProductDefaults,

    /// Products by ID
    pub products: BTreeMap<ProductId, ProductConfig>,
}

/// `[output]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct OutputConfig {
    pub build_root: PathBuf,
    pub dist_root: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            build_root: PathBuf::from(DEFAULT_BUILD_ROOT),
            dist_root: PathBuf::from(DEFAULT_DIST_ROOT),
        }
    }
}

/// `[product-defaults]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct ProductDefaults {
    pub build: Option<BuildConfig>,
    pub dist: Option<DistConfig>,
    pub docker: Option<DockerConfig>,
}

/// `[products.<id>]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct ProductConfig {
    pub build: Option<BuildConfig>,
    pub dist: Option<DistConfig>,
    pub docker: Option<DockerConfig>,

    /// Products whose outputs this product consumes, in declared order
    pub dependencies: Vec<ProductId>,
}

/// Build settings. Only the pieces the packaging pipeline needs are typed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct BuildConfig {
    /// Script that populates the build directory
    pub script: Option<String>,

    /// Target platforms (empty = current host)
    pub os_archs: Vec<OsArch>,

    /// Executable name (default = product ID)
    pub output_name: Option<String>,
}

/// Dist settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct DistConfig {
    pub disters: OrderedMap<DistId, DisterConfig>,
}

/// One configured dister.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct DisterConfig {
    /// Registered dister type name
    #[serde(rename = "type")]
    pub type_name: String,

    /// Type-specific settings
    #[serde(default)]
    pub config: Option<toml::Value>,

    /// Replaces the built-in generator when non-empty
    #[serde(default)]
    pub script: Option<String>,
}

impl DisterConfig {
    /// The configuration used when a product declares no disters.
    pub fn default_dister() -> (DistId, DisterConfig) {
        (
            DistId::from(OS_ARCH_BIN_TYPE),
            DisterConfig {
                type_name: OS_ARCH_BIN_TYPE.to_string(),
                config: None,
                script: None,
            },
        )
    }
}

/// Docker settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct DockerConfig {
    pub docker_builders: OrderedMap<DockerId, DockerBuilderConfig>,
}

/// One configured docker builder.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct DockerBuilderConfig {
    #[serde(rename = "type")]
    pub type_name: String,

    #[serde(default)]
    pub config: Option<toml::Value>,

    #[serde(default)]
    pub script: Option<String>,

    /// Build context, relative to the project directory
    pub context_dir: PathBuf,

    /// Dister IDs whose artifacts are copied into the context directory
    #[serde(default)]
    pub input_dists: Vec<DistId>,

    /// Tag templates; `{{Product}}` and `{{Version}}` are substituted
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Error loading or validating project configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read `{}`", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse `{}`: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("product `{product}`, dister `{dist_id}`: {reason}")]
    Dister {
        product: String,
        dist_id: String,
        reason: RegistryError,
    },

    #[error("product `{product}`, docker builder `{docker_id}`: {reason}")]
    DockerBuilder {
        product: String,
        docker_id: String,
        reason: RegistryError,
    },

    #[error("product `{product}`, dister `{dist_id}`: type `{type_name}` requires a script")]
    ScriptRequired {
        product: String,
        dist_id: String,
        type_name: String,
    },

    #[error("product `{product}`, docker builder `{docker_id}`: input dist `{dist_id}` is not a dister of this product")]
    UnknownInputDist {
        product: String,
        docker_id: String,
        dist_id: String,
    },

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

impl ConfigError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ConfigError::Resolve(err) => err.to_diagnostic(),
            ConfigError::Dister {
                reason: RegistryError::UnknownType { .. },
                ..
            }
            | ConfigError::DockerBuilder {
                reason: RegistryError::UnknownType { .. },
                ..
            } => Diagnostic::error(self.to_string()).with_suggestion(suggestions::UNKNOWN_TYPE),
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => {
                Diagnostic::error(self.to_string()).with_location(path)
            }
            _ => Diagnostic::error(self.to_string()),
        }
    }
}

/// Normalize an optional script: blank bodies count as absent.
fn non_empty(script: &Option<String>) -> Option<String> {
    script.as_ref().filter(|s| !s.trim().is_empty()).cloned()
}

impl ProjectConfig {
    /// Load and parse a project file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents, path)
    }

    /// Parse project file contents; `path` is only used for messages.
    pub fn parse(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Validate and resolve the configuration for `project_dir`.
    pub fn to_param(
        &self,
        project_dir: &Path,
        disters: &DisterFactory,
        docker_builders: &DockerBuilderFactory,
    ) -> Result<ProjectParam, ConfigError> {
        let graph = ProductGraph::new(
            self.products
                .iter()
                .map(|(id, product)| (id, product.dependencies.as_slice())),
        )?;

        let mut products = BTreeMap::new();
        for (id, product) in &self.products {
            let dependencies = graph.dependencies(id).to_vec();
            let param = self.product_param(
                id,
                product,
                dependencies,
                project_dir,
                disters,
                docker_builders,
            )?;
            products.insert(id.clone(), param);
        }

        tracing::debug!("validated {} products", products.len());

        Ok(ProjectParam {
            project_dir: project_dir.to_path_buf(),
            script_includes: self.script_includes.clone(),
            build_root: project_dir.join(&self.output.build_root),
            dist_root: project_dir.join(&self.output.dist_root),
            products,
            graph,
        })
    }

    fn product_param(
        &self,
        id: &ProductId,
        product: &ProductConfig,
        dependencies: Vec<ProductId>,
        project_dir: &Path,
        disters: &DisterFactory,
        docker_builders: &DockerBuilderFactory,
    ) -> Result<ProductParam, ConfigError> {
        let defaults = &self.product_defaults;

        let build = product
            .build
            .as_ref()
            .or(defaults.build.as_ref())
            .cloned()
            .unwrap_or_default();

        let build = BuildParam {
            script: non_empty(&build.script),
            os_archs: if build.os_archs.is_empty() {
                vec![OsArch::current()]
            } else {
                build.os_archs
            },
            output_name: build.output_name.unwrap_or_else(|| id.to_string()),
        };

        let mut dister_configs: Vec<(DistId, DisterConfig)> = product
            .dist
            .as_ref()
            .or(defaults.dist.as_ref())
            .map(|dist| {
                dist.disters
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect()
            })
            .unwrap_or_default();
        if dister_configs.is_empty() {
            dister_configs.push(DisterConfig::default_dister());
        }

        let mut dist = Vec::with_capacity(dister_configs.len());
        for (dist_id, cfg) in dister_configs {
            let dister = disters
                .create(&cfg.type_name, cfg.config.as_ref())
                .map_err(|reason| ConfigError::Dister {
                    product: id.to_string(),
                    dist_id: dist_id.to_string(),
                    reason,
                })?;

            let script = non_empty(&cfg.script);
            if script.is_none() && dister.requires_script() {
                return Err(ConfigError::ScriptRequired {
                    product: id.to_string(),
                    dist_id: dist_id.to_string(),
                    type_name: cfg.type_name,
                });
            }

            dist.push(DisterParam {
                id: dist_id,
                type_name: cfg.type_name,
                script,
                dister,
            });
        }

        let mut docker = Vec::new();
        if let Some(docker_cfg) = product.docker.as_ref().or(defaults.docker.as_ref()) {
            for (docker_id, cfg) in docker_cfg.docker_builders.iter() {
                let builder = docker_builders
                    .create(&cfg.type_name, cfg.config.as_ref())
                    .map_err(|reason| ConfigError::DockerBuilder {
                        product: id.to_string(),
                        docker_id: docker_id.to_string(),
                        reason,
                    })?;

                if let Some(missing) = cfg
                    .input_dists
                    .iter()
                    .find(|input| !dist.iter().any(|d| &d.id == *input))
                {
                    return Err(ConfigError::UnknownInputDist {
                        product: id.to_string(),
                        docker_id: docker_id.to_string(),
                        dist_id: missing.to_string(),
                    });
                }

                docker.push(DockerBuilderParam {
                    id: docker_id.clone(),
                    type_name: cfg.type_name.clone(),
                    script: non_empty(&cfg.script),
                    context_dir: project_dir.join(&cfg.context_dir),
                    input_dists: cfg.input_dists.clone(),
                    tag_templates: cfg.tags.clone(),
                    builder,
                });
            }
        }

        Ok(ProductParam {
            id: id.clone(),
            build,
            dist,
            docker,
            dependencies,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn to_param(toml: &str) -> Result<ProjectParam, ConfigError> {
        let config = ProjectConfig::parse(toml, Path::new("Quay.toml"))?;
        config.to_param(
            Path::new("/work"),
            &DisterFactory::new().unwrap(),
            &DockerBuilderFactory::new().unwrap(),
        )
    }

    #[test]
    fn test_defaults_applied() {
        let param = to_param("[products.foo]\n").unwrap();

        assert_eq!(param.build_root, PathBuf::from("/work/out/build"));
        assert_eq!(param.dist_root, PathBuf::from("/work/out/dist"));

        let foo = param.product(&ProductId::from("foo")).unwrap();
        assert_eq!(foo.build.os_archs, vec![OsArch::current()]);
        assert_eq!(foo.build.output_name, "foo");
        assert_eq!(foo.dist.len(), 1);
        assert_eq!(foo.dist[0].id.as_str(), "os-arch-bin");
        assert_eq!(foo.dist[0].type_name, "os-arch-bin");
        assert!(foo.dist[0].script.is_none());
    }

    #[test]
    fn test_dister_order_follows_document() {
        let param = to_param(
            r#"
[products.foo.dist.disters.zz-last]
type = "bin"

[products.foo.dist.disters.aa-first]
type = "os-arch-bin"
"#,
        )
        .unwrap();

        let foo = param.product(&ProductId::from("foo")).unwrap();
        let ids: Vec<_> = foo.dist.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["zz-last", "aa-first"]);
    }

    #[test]
    fn test_product_defaults_fill_missing_blocks() {
        let param = to_param(
            r#"
[product-defaults.build]
os-archs = [{ os = "linux", arch = "arm64" }]

[product-defaults.dist.disters.bundle]
type = "bin"

[products.foo]

[products.bar.dist.disters.own]
type = "os-arch-bin"
"#,
        )
        .unwrap();

        let foo = param.product(&ProductId::from("foo")).unwrap();
        assert_eq!(foo.build.os_archs, vec![OsArch::new("linux", "arm64")]);
        assert_eq!(foo.dist[0].id.as_str(), "bundle");

        let bar = param.product(&ProductId::from("bar")).unwrap();
        assert_eq!(bar.dist[0].id.as_str(), "own");
    }

    #[test]
    fn test_blank_script_counts_as_absent() {
        let param = to_param(
            r#"
[products.foo.dist.disters.os-arch-bin]
type = "os-arch-bin"
script = "   "
"#,
        )
        .unwrap();

        let foo = param.product(&ProductId::from("foo")).unwrap();
        assert!(foo.dist[0].script.is_none());
    }

    #[test]
    fn test_unknown_dister_type() {
        let err = to_param(
            r#"
[products.foo.dist.disters.pkg]
type = "rpm"
"#,
        )
        .unwrap_err();

        assert!(matches!(
            err,
            ConfigError::Dister {
                reason: RegistryError::UnknownType { .. },
                ..
            }
        ));
        let msg = err.to_string();
        assert!(msg.contains("foo"));
        assert!(msg.contains("pkg"));
        assert!(msg.contains("rpm"));
    }

    #[test]
    fn test_malformed_dister_config() {
        let err = to_param(
            r#"
[products.foo.dist.disters.os-arch-bin]
type = "os-arch-bin"
config = { compression = "zstd" }
"#,
        )
        .unwrap_err();

        assert!(matches!(
            err,
            ConfigError::Dister {
                reason: RegistryError::InvalidConfig { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_manual_dister_requires_script() {
        let err = to_param(
            r#"
[products.foo.dist.disters.custom]
type = "manual"
"#,
        )
        .unwrap_err();

        assert!(matches!(err, ConfigError::ScriptRequired { .. }));
    }

    #[test]
    fn test_repeated_dependency_listed_once() {
        let param = to_param(
            r#"
[products.foo]
dependencies = ["bar", "baz", "bar"]

[products.bar]

[products.baz]
"#,
        )
        .unwrap();

        let foo = param.product(&ProductId::from("foo")).unwrap();
        let deps: Vec<&str> = foo.dependencies.iter().map(|d| d.as_str()).collect();
        assert_eq!(deps, ["bar", "baz"]);
    }

    #[test]
    fn test_unknown_dependency_fails_validation() {
        let err = to_param(
            r#"
[products.foo]
dependencies = ["baz"]
"#,
        )
        .unwrap_err();

        assert!(matches!(
            err,
            ConfigError::Resolve(ResolveError::UnknownDependency { .. })
        ));
        assert!(err.to_string().contains("baz"));
    }

    #[test]
    fn test_cycle_fails_validation() {
        let err = to_param(
            r#"
[products.a]
dependencies = ["b"]

[products.b]
dependencies = ["a"]
"#,
        )
        .unwrap_err();

        let msg = err.to_string();
        assert!(matches!(
            err,
            ConfigError::Resolve(ResolveError::CyclicDependency { .. })
        ));
        assert!(msg.contains('a') && msg.contains('b'));
    }

    #[test]
    fn test_docker_input_dist_must_exist() {
        let err = to_param(
            r#"
[products.foo.docker.docker-builders.image]
type = "default"
context-dir = "docker"
input-dists = ["bin"]
"#,
        )
        .unwrap_err();

        assert!(matches!(err, ConfigError::UnknownInputDist { .. }));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = ProjectConfig::parse("[products.foo]\ndeps = []\n", Path::new("Quay.toml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
