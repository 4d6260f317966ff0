//! Docker builder type registry.

use crate::core::registry::{RegistryError, TypeEntry, TypeRegistry};
use crate::docker::default_builder;
use crate::docker::trait_def::DockerBuilder;

/// Maps docker builder type names to creators.
pub type DockerBuilderFactory = TypeRegistry<dyn DockerBuilder>;

pub fn builtin_docker_builders() -> Vec<TypeEntry<dyn DockerBuilder>> {
    vec![TypeEntry::new(
        default_builder::TYPE_NAME,
        default_builder::DefaultDockerBuilder::create,
    )]
}

impl TypeRegistry<dyn DockerBuilder> {
    /// Registry of the built-in docker builder types.
    pub fn new() -> Result<Self, RegistryError> {
        Self::with_types("docker builder", builtin_docker_builders())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_types() {
        let factory = DockerBuilderFactory::new().unwrap();
        assert_eq!(factory.type_names().collect::<Vec<_>>(), vec!["default"]);
        assert_eq!(
            factory.create("default", None).unwrap().type_name(),
            "default"
        );
    }
}
