//! Resolution error types and diagnostics.

use thiserror::Error;

use crate::util::diagnostic::{suggestions, Diagnostic};

/// Error while resolving the product dependency graph.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("dependency cycle detected: {}", cycle.join(" -> "))]
    CyclicDependency {
        /// Products on the cycle, first and last entries equal
        cycle: Vec<String>,
    },

    #[error("product `{referrer}` depends on unknown product `{product}`")]
    UnknownDependency { product: String, referrer: String },

    #[error("product `{product}` is not defined in the project")]
    UnknownProduct {
        product: String,
        available: Vec<String>,
    },
}

impl ResolveError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ResolveError::CyclicDependency { cycle } => {
                Diagnostic::error("dependency cycle detected between products")
                    .with_context(format!("cycle: {}", cycle.join(" -> ")))
                    .with_suggestion(
                        "Break the cycle by removing one of the `dependencies` entries",
                    )
            }

            ResolveError::UnknownDependency { product, referrer } => Diagnostic::error(format!(
                "product `{}` depends on unknown product `{}`",
                referrer, product
            ))
            .with_suggestion(format!(
                "Define `[products.{}]` or remove it from `{}`'s dependencies",
                product, referrer
            )),

            ResolveError::UnknownProduct { product, available } => {
                let mut diag = Diagnostic::error(format!("could not find product `{}`", product));

                if !available.is_empty() {
                    diag = diag.with_context(format!("available products: {}", available.join(", ")));
                }

                diag.with_suggestion(suggestions::PRODUCT_NOT_FOUND)
            }
        }
    }
}
