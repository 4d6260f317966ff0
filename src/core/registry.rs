//! Named factory tables for pluggable implementations.
//!
//! Disters and docker builders are selected by a `type` string in
//! `Quay.toml`. A [`TypeRegistry`] maps each type name to a creator that
//! parses the type-specific `config` table and returns a ready instance.
//! Dispatch happens once, at configuration time, through the trait object.

use std::collections::BTreeMap;
use std::sync::Arc;

use thiserror::Error;

/// Parses a type-specific config table into an instance.
pub type Creator<T> = fn(&toml::Value) -> anyhow::Result<Arc<T>>;

/// Registration of one implementation type.
pub struct TypeEntry<T: ?Sized> {
    pub name: &'static str,
    pub create: Creator<T>,
}

impl<T: ?Sized> TypeEntry<T> {
    pub fn new(name: &'static str, create: Creator<T>) -> Self {
        TypeEntry { name, create }
    }
}

/// Registry construction or lookup failure.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("{kind} type `{name}` is registered more than once")]
    DuplicateType { kind: &'static str, name: String },

    #[error("{kind} type `{name}` rejects its own default configuration: {message}")]
    InvalidDefault {
        kind: &'static str,
        name: String,
        message: String,
    },

    #[error("unknown {kind} type `{name}` (available: {})", available.join(", "))]
    UnknownType {
        kind: &'static str,
        name: String,
        available: Vec<String>,
    },

    #[error("invalid config for {kind} type `{name}`: {message}")]
    InvalidConfig {
        kind: &'static str,
        name: String,
        message: String,
    },
}

/// A name -> creator table.
pub struct TypeRegistry<T: ?Sized> {
    kind: &'static str,
    creators: BTreeMap<&'static str, Creator<T>>,
}

impl<T: ?Sized> TypeRegistry<T> {
    /// Build a registry from `entries`.
    ///
    /// Type names must be unique, and every creator must accept an empty
    /// config table, which is what a configuration without `config` gets.
    pub fn with_types(
        kind: &'static str,
        entries: Vec<TypeEntry<T>>,
    ) -> Result<Self, RegistryError> {
        let mut creators = BTreeMap::new();

        for entry in entries {
            if creators.contains_key(entry.name) {
                return Err(RegistryError::DuplicateType {
                    kind,
                    name: entry.name.to_string(),
                });
            }

            (entry.create)(&empty_config()).map_err(|e| RegistryError::InvalidDefault {
                kind,
                name: entry.name.to_string(),
                message: format!("{:#}", e),
            })?;

            creators.insert(entry.name, entry.create);
        }

        Ok(TypeRegistry { kind, creators })
    }

    /// Create an instance of `name` from its config table (absent = empty).
    pub fn create(&self, name: &str, config: Option<&toml::Value>) -> Result<Arc<T>, RegistryError> {
        let create = self
            .creators
            .get(name)
            .ok_or_else(|| RegistryError::UnknownType {
                kind: self.kind,
                name: name.to_string(),
                available: self.type_names().map(str::to_string).collect(),
            })?;

        let empty = empty_config();
        create(config.unwrap_or(&empty)).map_err(|e| RegistryError::InvalidConfig {
            kind: self.kind,
            name: name.to_string(),
            message: format!("{:#}", e),
        })
    }

    /// Registered type names in lexical order.
    pub fn type_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.creators.keys().copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.creators.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.creators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.creators.is_empty()
    }
}

fn empty_config() -> toml::Value {
    toml::Value::Table(toml::Table::new())
}

/// Deserialize a type-specific config table.
pub fn parse_config<C: serde::de::DeserializeOwned>(config: &toml::Value) -> anyhow::Result<C> {
    Ok(config.clone().try_into()?)
}
