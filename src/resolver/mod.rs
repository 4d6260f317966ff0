//! Product dependency resolution.
//!
//! Computes the order in which products are built and packaged. Resolution
//! is pure and deterministic: no I/O, and ties between independent products
//! are broken lexically rather than by map iteration order.

pub mod errors;
pub mod graph;

pub use errors::ResolveError;
pub use graph::ProductGraph;
