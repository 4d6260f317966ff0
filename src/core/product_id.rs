//! Identifier newtypes.
//!
//! Products, disters and docker builders are all keyed by user-chosen
//! strings. Distinct types keep a dister ID from being passed where a
//! product ID is expected.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                $name(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                $name(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                $name(s)
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(
    /// Identity of a product within a project.
    ProductId
);

string_id!(
    /// Identity of one dister configured on a product. Also the name of the
    /// dister's output directory.
    DistId
);

string_id!(
    /// Identity of one docker builder configured on a product.
    DockerId
);

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_ids_order_lexically() {
        let mut ids = vec![ProductId::from("foo"), ProductId::from("bar")];
        ids.sort();
        assert_eq!(ids, vec![ProductId::from("bar"), ProductId::from("foo")]);
    }

    #[test]
    fn test_borrow_lookup() {
        let mut map = BTreeMap::new();
        map.insert(ProductId::from("bar"), 1);
        assert_eq!(map.get("bar"), Some(&1));
    }

    #[test]
    fn test_deserializes_transparently() {
        let ids: Vec<DistId> = serde_json::from_str(r#"["os-arch-bin","bin"]"#).unwrap();
        assert_eq!(ids[0].as_str(), "os-arch-bin");
        assert_eq!(ids[1].to_string(), "bin");
    }
}
