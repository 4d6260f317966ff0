//! Dister type registry.

use crate::core::registry::{RegistryError, TypeEntry, TypeRegistry};
use crate::dist::trait_def::Dister;
use crate::dist::{bin, manual, os_arch_bin};

pub use crate::dist::os_arch_bin::TYPE_NAME as OS_ARCH_BIN_TYPE;

/// Maps dister type names to creators.
pub type DisterFactory = TypeRegistry<dyn Dister>;

/// Built-in dister types.
pub fn builtin_disters() -> Vec<TypeEntry<dyn Dister>> {
    vec![
        TypeEntry::new(os_arch_bin::TYPE_NAME, os_arch_bin::OsArchBinDister::create),
        TypeEntry::new(bin::TYPE_NAME, bin::BinDister::create),
        TypeEntry::new(manual::TYPE_NAME, manual::ManualDister::create),
    ]
}

impl TypeRegistry<dyn Dister> {
    /// Registry of the built-in dister types.
    pub fn new() -> Result<Self, RegistryError> {
        Self::with_types("dister", builtin_disters())
    }
}
