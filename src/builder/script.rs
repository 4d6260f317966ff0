//! Builder that runs each product's configured build script.

use anyhow::{bail, Result};

use crate::builder::context::{BuildContext, Builder};
use crate::util::fs::ensure_dir;
use crate::util::script::{self, ScriptError};
use crate::util::EnvVars;

/// Runs `build.script` once per target platform.
///
/// The script sees `PRODUCT_ID`, `VERSION`, `BUILD_DIR`, `OS`, `ARCH` and
/// `OUTPUT_DIR` (the per-target directory the executable goes into) and runs
/// from the project directory. Products without a build script only get
/// their directories created.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptBuilder;

impl Builder for ScriptBuilder {
    fn build(&self, ctx: &BuildContext<'_>) -> Result<()> {
        let product = ctx.product;

        for os_arch in &product.build.os_archs {
            let output_dir = product.build.os_arch_dir(ctx.build_dir, os_arch);
            ensure_dir(&output_dir)?;

            let Some(body) = &product.build.script else {
                continue;
            };

            let mut env = EnvVars::new();
            env.insert("PRODUCT_ID".to_string(), product.id.to_string());
            env.insert("VERSION".to_string(), ctx.project.version.clone());
            env.insert("BUILD_DIR".to_string(), ctx.build_dir.display().to_string());
            env.insert("OS".to_string(), os_arch.os.clone());
            env.insert("ARCH".to_string(), os_arch.arch.clone());
            env.insert("OUTPUT_DIR".to_string(), output_dir.display().to_string());

            tracing::debug!("running build script of `{}` for {}", product.id, os_arch);

            // Script includes belong to dist and docker scripts only.
            match script::run(body, &ctx.project.project_dir, &env) {
                Ok(_) => {}
                Err(ScriptError::Failed { code, output }) => bail!(
                    "build script for {} exited with {}\n{}",
                    os_arch,
                    code.map_or_else(|| "a signal".to_string(), |c| format!("code {}", c)),
                    output.trim_end()
                ),
                Err(err) => return Err(err.into()),
            }
        }

        Ok(())
    }
}
