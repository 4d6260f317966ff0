//! Core data model for Quay.
//!
//! - Identifiers (ProductId, DistId, DockerId) and target platforms
//! - `Quay.toml` configuration and its validated form
//! - Output locations and per-run output records
//! - Version resolution and the type registry behind disters and docker
//!   builders

pub mod config;
pub mod os_arch;
pub mod outputs;
pub mod param;
pub mod project;
pub mod product_id;
pub mod registry;
pub mod version;

pub use config::{ConfigError, ProjectConfig};
pub use os_arch::OsArch;
pub use outputs::{
    BuildOutputInfo, DistOutputInfo, DockerOutputInfo, OutputLocator, OutputRecords,
    ProductImages, ProductOutputs,
};
pub use param::{ProductParam, ProjectInfo, ProjectParam};
pub use project::Project;
pub use product_id::{DistId, DockerId, ProductId};
pub use version::{FixedVersion, GitVersionResolver, VersionResolver};
