//! Errors that abort a packaging run.

use thiserror::Error;

use crate::core::ConfigError;
use crate::resolver::ResolveError;
use crate::util::diagnostic::{suggestions, Diagnostic};
use crate::util::script::ScriptError;

/// First failure of a dist, build or docker run.
///
/// Every variant that happens after resolution names the product and, where
/// relevant, the dister or docker builder.
#[derive(Debug, Error)]
pub enum DistError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("failed to build product `{product}`: {message}")]
    BuilderFailure { product: String, message: String },

    #[error("script for product `{product}`, {stage} `{id}` failed with {}", exit_code_text(*code))]
    ScriptExecution {
        product: String,
        /// "dister" or "docker builder"
        stage: &'static str,
        id: String,
        code: Option<i32>,
        output: String,
    },

    #[error("dister `{dist_id}` of product `{product}` failed: {message}")]
    DisterGeneration {
        product: String,
        dist_id: String,
        message: String,
    },

    #[error("docker builder `{docker_id}` of product `{product}` failed: {message}")]
    DockerBuild {
        product: String,
        docker_id: String,
        message: String,
    },

    #[error("product `{product}`: {message}")]
    Io { product: String, message: String },
}

fn exit_code_text(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "no exit code".to_string(),
    }
}

impl DistError {
    /// A custom script of `product` failed; `stage` names what it overrides.
    pub fn script_failed(product: &str, stage: &'static str, id: &str, err: ScriptError) -> Self {
        let (code, output) = match err {
            ScriptError::Failed { code, output } => (code, output),
            ScriptError::Spawn(e) => (None, format!("{:#}", e)),
        };
        DistError::ScriptExecution {
            product: product.to_string(),
            stage,
            id: id.to_string(),
            code,
            output,
        }
    }

    /// Product the failure belongs to, if any.
    pub fn product(&self) -> Option<&str> {
        match self {
            DistError::Config(_) | DistError::Resolve(_) => None,
            DistError::BuilderFailure { product, .. }
            | DistError::ScriptExecution { product, .. }
            | DistError::DisterGeneration { product, .. }
            | DistError::DockerBuild { product, .. }
            | DistError::Io { product, .. } => Some(product),
        }
    }

    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            DistError::Config(err) => err.to_diagnostic(),
            DistError::Resolve(err) => err.to_diagnostic(),
            DistError::ScriptExecution { output, .. } => {
                let mut diag = Diagnostic::error(self.to_string());
                let output = output.trim_end();
                if !output.is_empty() {
                    diag = diag.with_context(format!("script output:\n{}", output));
                }
                diag
            }
            _ => Diagnostic::error(self.to_string()).with_suggestion(suggestions::STEP_FAILED),
        }
    }
}
