//! Quay - a release packaging orchestrator for multi-product repositories
//!
//! This crate provides the core library functionality for Quay: product
//! dependency resolution, output layout, pluggable disters and docker
//! builders, and the environment contract exposed to custom scripts.

pub mod builder;
pub mod core;
pub mod dist;
pub mod docker;
pub mod ops;
pub mod resolver;
pub mod util;

/// Test utilities and mocks for Quay unit tests.
#[cfg(test)]
pub mod test_support;

pub use core::{
    config::ProjectConfig, param::ProjectInfo, param::ProjectParam, product_id::ProductId,
    project::Project,
};

pub use resolver::ProductGraph;
pub use util::context::GlobalContext;
