//! High-level operations.
//!
//! This module contains the implementation of Quay commands.

pub mod quay_build;
pub mod quay_dist;
pub mod quay_docker;

pub use quay_build::build_products;
pub use quay_dist::{products, products_with_builder, DistOptions};
pub use quay_docker::{docker_images, DockerOptions};
