//! Container image builds.
//!
//! Mirrors the dist path: builders are selected by type name, run in
//! dependency order, and see their dependencies' image tags through an
//! environment contract.

pub mod default_builder;
pub mod env;
pub mod registry;
pub mod trait_def;

pub use registry::DockerBuilderFactory;
pub use trait_def::{DockerBuilder, DockerContext};
