//! Distribution artifact generation.
//!
//! Disters are pluggable generators selected by type name. This module holds
//! the trait, the built-in types, the archive writer they share, and the
//! environment contract exposed to every dister run.

pub mod archive;
pub mod bin;
pub mod env;
pub mod errors;
pub mod events;
pub mod manual;
pub mod os_arch_bin;
pub mod registry;
pub mod trait_def;

pub use errors::DistError;
pub use events::{DistEvent, DistReport};
pub use registry::DisterFactory;
pub use trait_def::{DistContext, Dister};
