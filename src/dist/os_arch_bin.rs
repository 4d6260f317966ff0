//! `os-arch-bin`: one archive per target platform.
//!
//! Produces `<product>-<version>-<os>-<arch>.tgz` for every target, each
//! holding the product executable at the archive root.

use std::sync::Arc;

use anyhow::{bail, Result};
use serde::Deserialize;

use crate::core::os_arch::OsArch;
use crate::core::registry::parse_config;
use crate::dist::archive::{write_tgz, ArchiveEntry, TGZ_EXTENSION};
use crate::dist::trait_def::{DistContext, Dister};
use crate::util::EnvVars;

pub const TYPE_NAME: &str = "os-arch-bin";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
struct OsArchBinConfig {
    /// Targets to package; empty = the product's build targets
    os_archs: Vec<OsArch>,
}

#[derive(Debug, Clone, Default)]
pub struct OsArchBinDister {
    os_archs: Vec<OsArch>,
}

impl OsArchBinDister {
    pub fn new(os_archs: Vec<OsArch>) -> Self {
        OsArchBinDister { os_archs }
    }

    pub fn create(config: &toml::Value) -> Result<Arc<dyn Dister>> {
        let cfg: OsArchBinConfig = parse_config(config)?;
        Ok(Arc::new(OsArchBinDister::new(cfg.os_archs)))
    }

    /// Archive file name for one target.
    pub fn archive_name(product: &str, version: &str, os_arch: &OsArch) -> String {
        format!(
            "{}-{}-{}-{}.{}",
            product, version, os_arch.os, os_arch.arch, TGZ_EXTENSION
        )
    }
}

impl Dister for OsArchBinDister {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn run(&self, ctx: &DistContext<'_>, _env: &EnvVars) -> Result<Vec<String>> {
        let product = ctx.product;
        let os_archs = if self.os_archs.is_empty() {
            &product.build.os_archs
        } else {
            &self.os_archs
        };

        let mut artifacts = Vec::with_capacity(os_archs.len());
        for os_arch in os_archs {
            let exe = product.build.executable_path(ctx.build_dir, os_arch);
            if !exe.is_file() {
                bail!(
                    "executable for {} not found at {}",
                    os_arch,
                    exe.display()
                );
            }

            let name = Self::archive_name(product.id.as_str(), &ctx.project.version, os_arch);
            let entry_name = os_arch.executable_name(&product.build.output_name);
            write_tgz(
                &ctx.dist_dir.join(&name),
                &[ArchiveEntry::new(exe, entry_name)],
            )?;

            tracing::debug!("wrote {}", name);
            artifacts.push(name);
        }

        Ok(artifacts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dist::archive::read_tgz_entries;
    use crate::test_support::fixtures::{product_param, BuiltProduct};

    #[test]
    fn test_archive_name() {
        assert_eq!(
            OsArchBinDister::archive_name("foo", "1.0.0", &OsArch::new("darwin", "arm64")),
            "foo-1.0.0-darwin-arm64.tgz"
        );
    }

    #[test]
    fn test_one_archive_per_target() {
        let targets = vec![OsArch::new("linux", "amd64"), OsArch::new("windows", "amd64")];
        let built = BuiltProduct::new(product_param("foo", targets.clone()), "1.0.0");

        let artifacts = OsArchBinDister::default()
            .run(&built.context(), &EnvVars::new())
            .unwrap();

        assert_eq!(
            artifacts,
            vec!["foo-1.0.0-linux-amd64.tgz", "foo-1.0.0-windows-amd64.tgz"]
        );

        let linux = read_tgz_entries(&built.dist_dir().join(&artifacts[0]));
        assert_eq!(linux.len(), 1);
        assert_eq!(linux[0].0, "foo");

        let windows = read_tgz_entries(&built.dist_dir().join(&artifacts[1]));
        assert_eq!(windows[0].0, "foo.exe");
    }

    #[test]
    fn test_configured_targets_override_build_targets() {
        let built = BuiltProduct::new(
            product_param(
                "foo",
                vec![OsArch::new("linux", "amd64"), OsArch::new("linux", "arm64")],
            ),
            "1.0.0",
        );

        let artifacts = OsArchBinDister::new(vec![OsArch::new("linux", "arm64")])
            .run(&built.context(), &EnvVars::new())
            .unwrap();

        assert_eq!(artifacts, vec!["foo-1.0.0-linux-arm64.tgz"]);
    }

    #[test]
    fn test_missing_executable() {
        let built = BuiltProduct::unbuilt(
            product_param("foo", vec![OsArch::new("linux", "amd64")]),
            "1.0.0",
        );

        let err = OsArchBinDister::default()
            .run(&built.context(), &EnvVars::new())
            .unwrap_err();
        assert!(err.to_string().contains("linux-amd64"));
    }
}
