//! Dister trait definition.
//!
//! A dister turns a product's build output into distributable files. The
//! orchestrator owns everything around a dister run: it creates and cleans
//! the dist directory, builds the environment, and decides whether the
//! built-in generator or the product's override script runs. A dister only
//! generates.

use std::fmt;
use std::path::Path;

use anyhow::Result;

use crate::core::param::{ProductParam, ProjectInfo};
use crate::util::EnvVars;

/// Inputs of one dister run.
#[derive(Debug, Clone, Copy)]
pub struct DistContext<'a> {
    pub product: &'a ProductParam,
    pub project: &'a ProjectInfo,

    /// The product's build directory, already populated
    pub build_dir: &'a Path,

    /// This dister's output directory, freshly created and empty
    pub dist_dir: &'a Path,
}

/// A pluggable artifact generator.
pub trait Dister: fmt::Debug + Send + Sync {
    /// Registered type name.
    fn type_name(&self) -> &'static str;

    /// Whether configurations of this type must carry an override script.
    fn requires_script(&self) -> bool {
        false
    }

    /// Generate artifacts into `ctx.dist_dir`.
    ///
    /// `env` is the full variable overlay for this run; built-ins that shell
    /// out pass it on. Returns the artifact file names, relative to the dist
    /// directory, in production order.
    fn run(&self, ctx: &DistContext<'_>, env: &EnvVars) -> Result<Vec<String>>;
}
