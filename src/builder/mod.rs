//! Product builds.
//!
//! Packaging consumes whatever a [`Builder`] leaves in a product's build
//! directory; how executables get there is up to the builder.

pub mod context;
pub mod script;

pub use context::{BuildContext, Builder};
pub use script::ScriptBuilder;
