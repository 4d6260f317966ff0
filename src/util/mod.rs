//! Shared utilities

pub mod config;
pub mod context;
pub mod diagnostic;
pub mod fs;
pub mod hash;
pub mod ordered;
pub mod process;
pub mod script;
pub mod shell;

pub use config::Config;
pub use context::GlobalContext;
pub use diagnostic::Diagnostic;
pub use ordered::OrderedMap;
pub use process::{EnvVars, ProcessBuilder};
