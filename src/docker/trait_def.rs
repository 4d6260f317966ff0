//! DockerBuilder trait definition.

use std::fmt;
use std::path::Path;

use anyhow::Result;

use crate::core::param::{ProductParam, ProjectInfo};
use crate::util::EnvVars;

/// Inputs of one image build.
#[derive(Debug, Clone, Copy)]
pub struct DockerContext<'a> {
    pub product: &'a ProductParam,
    pub project: &'a ProjectInfo,

    /// Build context with input dist artifacts already staged
    pub context_dir: &'a Path,

    /// Fully substituted image tags
    pub tags: &'a [String],
}

/// A pluggable container image builder.
pub trait DockerBuilder: fmt::Debug + Send + Sync {
    fn type_name(&self) -> &'static str;

    /// Build and tag the image described by `ctx`.
    fn run(&self, ctx: &DockerContext<'_>, env: &EnvVars) -> Result<()>;
}
