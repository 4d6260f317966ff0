//! Build context and the Builder trait.

use std::path::Path;

use anyhow::Result;

use crate::core::param::{ProductParam, ProjectInfo};

/// Inputs of one product build.
#[derive(Debug, Clone, Copy)]
pub struct BuildContext<'a> {
    pub product: &'a ProductParam,
    pub project: &'a ProjectInfo,

    /// `<build-root>/<product>/<version>`, already created
    pub build_dir: &'a Path,
}

/// Populates a product's build directory.
///
/// After a successful build every configured target's executable must exist
/// at [`BuildParam::executable_path`].
///
/// [`BuildParam::executable_path`]: crate::core::param::BuildParam::executable_path
pub trait Builder: Send + Sync {
    fn build(&self, ctx: &BuildContext<'_>) -> Result<()>;
}
