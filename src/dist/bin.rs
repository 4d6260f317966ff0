//! `bin`: a single archive holding every target's executable.
//!
//! Layout of `<product>-<version>.tgz`:
//!
//! ```text
//! <product>-<version>/bin/<os>-<arch>/<executable>
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Result};
use serde::Deserialize;

use crate::core::os_arch::OsArch;
use crate::core::registry::parse_config;
use crate::dist::archive::{write_tgz, ArchiveEntry, TGZ_EXTENSION};
use crate::dist::trait_def::{DistContext, Dister};
use crate::util::EnvVars;

pub const TYPE_NAME: &str = "bin";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
struct BinConfig {
    os_archs: Vec<OsArch>,
}

#[derive(Debug, Clone, Default)]
pub struct BinDister {
    os_archs: Vec<OsArch>,
}

impl BinDister {
    pub fn create(config: &toml::Value) -> Result<Arc<dyn Dister>> {
        let cfg: BinConfig = parse_config(config)?;
        Ok(Arc::new(BinDister {
            os_archs: cfg.os_archs,
        }))
    }
}

impl Dister for BinDister {
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

        let top = format!("{}-{}", product.id, ctx.project.version);
        let mut entries = Vec::with_capacity(os_archs.len());
        for os_arch in os_archs {
            let exe = product.build.executable_path(ctx.build_dir, os_arch);
            if !exe.is_file() {
                bail!(
                    "executable for {} not found at {}",
                    os_arch,
                    exe.display()
                );
            }
            let archive_path = PathBuf::from(&top)
                .join("bin")
                .join(os_arch.to_string())
                .join(os_arch.executable_name(&product.build.output_name));
            entries.push(ArchiveEntry::new(exe, archive_path));
        }

        let name = format!("{}.{}", top, TGZ_EXTENSION);
        write_tgz(&ctx.dist_dir.join(&name), &entries)?;
        Ok(vec![name])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dist::archive::read_tgz_entries;
    use crate::test_support::fixtures::{product_param, BuiltProduct};

    #[test]
    fn test_single_archive_with_all_targets() {
        let built = BuiltProduct::new(
            product_param(
                "foo",
                vec![OsArch::new("darwin", "arm64"), OsArch::new("linux", "amd64")],
            ),
            "2.1.0",
        );

        let artifacts = BinDister::default()
            .run(&built.context(), &EnvVars::new())
            .unwrap();
        assert_eq!(artifacts, vec!["foo-2.1.0.tgz"]);

        let names: Vec<String> = read_tgz_entries(&built.dist_dir().join("foo-2.1.0.tgz"))
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(
            names,
            vec![
                "foo-2.1.0/bin/darwin-arm64/foo",
                "foo-2.1.0/bin/linux-amd64/foo"
            ]
        );
    }
}
