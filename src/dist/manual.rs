//! `manual`: packaging is entirely up to the configured script.

use std::sync::Arc;

use anyhow::{bail, Result};
use serde::Deserialize;

use crate::core::registry::parse_config;
use crate::dist::trait_def::{DistContext, Dister};
use crate::util::EnvVars;

pub const TYPE_NAME: &str = "manual";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ManualConfig {}

#[derive(Debug, Clone, Default)]
pub struct ManualDister;

impl ManualDister {
    pub fn create(config: &toml::Value) -> Result<Arc<dyn Dister>> {
        let _: ManualConfig = parse_config(config)?;
        Ok(Arc::new(ManualDister))
    }
}

impl Dister for ManualDister {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn requires_script(&self) -> bool {
        true
    }

    fn run(&self, ctx: &DistContext<'_>, _env: &EnvVars) -> Result<Vec<String>> {
        bail!(
            "`{}` disters have no built-in generator; product `{}` must configure a script",
            TYPE_NAME,
            ctx.product.id
        )
    }
}
