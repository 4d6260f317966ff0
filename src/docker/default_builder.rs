//! `default`: `docker build` on the context directory.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::core::registry::parse_config;
use crate::docker::trait_def::{DockerBuilder, DockerContext};
use crate::util::process::{find_executable, ProcessBuilder};
use crate::util::EnvVars;

pub const TYPE_NAME: &str = "default";

const DOCKER: &str = "docker";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
struct DefaultConfig {
    /// Passed as `--build-arg KEY=VALUE`
    build_args: BTreeMap<String, String>,

    /// Pass `--pull`
    pull: bool,
}

#[derive(Debug, Clone, Default)]
pub struct DefaultDockerBuilder {
    build_args: BTreeMap<String, String>,
    pull: bool,
}

impl DefaultDockerBuilder {
    pub fn create(config: &toml::Value) -> Result<Arc<dyn DockerBuilder>> {
        let cfg: DefaultConfig = parse_config(config)?;
        Ok(Arc::new(DefaultDockerBuilder {
            build_args: cfg.build_args,
            pull: cfg.pull,
        }))
    }

    /// Arguments after `docker`.
    pub fn build_args(&self, ctx: &DockerContext<'_>) -> Vec<String> {
        let mut args = vec!["build".to_string()];
        if self.pull {
            args.push("--pull".to_string());
        }
        for tag in ctx.tags {
            args.push("-t".to_string());
            args.push(tag.clone());
        }
        for (key, value) in &self.build_args {
            args.push("--build-arg".to_string());
            args.push(format!("{}={}", key, value));
        }
        args.push(ctx.context_dir.display().to_string());
        args
    }
}

impl DockerBuilder for DefaultDockerBuilder {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn run(&self, ctx: &DockerContext<'_>, env: &EnvVars) -> Result<()> {
        if ctx.tags.is_empty() {
            bail!("no tags configured");
        }

        let docker = find_executable(DOCKER).context("`docker` not found in PATH")?;

        ProcessBuilder::new(docker)
            .args(self.build_args(ctx))
            .cwd(ctx.context_dir)
            .envs(env)
            .exec_and_check()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::fixtures::{product_param, BuiltProduct};
    use std::path::Path;

    #[test]
    fn test_build_args() {
        let config = toml::Value::Table(
            toml::from_str("pull = true\nbuild-args = { FOO = \"1\" }").unwrap(),
        );
        let cfg: DefaultConfig = parse_config(&config).unwrap();
        let builder = DefaultDockerBuilder {
            build_args: cfg.build_args,
            pull: cfg.pull,
        };

        let built = BuiltProduct::unbuilt(product_param("foo", vec![]), "1.0.0");
        let tags = vec!["example/foo:1.0.0".to_string()];
        let ctx = DockerContext {
            product: &built.product,
            project: &built.project,
            context_dir: Path::new("/ctx"),
            tags: &tags,
        };

        assert_eq!(
            builder.build_args(&ctx),
            vec![
                "build",
                "--pull",
                "-t",
                "example/foo:1.0.0",
                "--build-arg",
                "FOO=1",
                "/ctx"
            ]
        );
    }

    #[test]
    fn test_rejects_unknown_config() {
        let config = toml::Value::Table(toml::from_str("platform = \"linux\"").unwrap());
        assert!(DefaultDockerBuilder::create(&config).is_err());
    }
}
