//! Tagged configuration tree.
//!
//! The validator needs to tell a symbolic identifier (`default: !id tv`)
//! apart from a plain string, which neither JSON nor untagged YAML can
//! express. Parsed documents are therefore converted into [`ConfigValue`],
//! whose mappings also keep file order.

use indexmap::IndexMap;
use serde::Serialize;

/// Ordered mapping used for every configuration object.
pub type Mapping = IndexMap<String, ConfigValue>;

/// A parsed configuration value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ConfigValue {
    /// Explicit null (`~`, `null`).
    Null,
    /// Boolean scalar.
    Bool(bool),
    /// Numeric scalar.
    Number(serde_yaml::Number),
    /// Plain string scalar.
    String(String),
    /// Symbolic reference to another key in the same document.
    Identifier(String),
    /// Ordered list.
    Sequence(Vec<ConfigValue>),
    /// Ordered mapping.
    Mapping(Mapping),
}

impl ConfigValue {
    /// Builds an identifier value.
    #[must_use]
    pub fn identifier(name: impl Into<String>) -> Self {
        Self::Identifier(name.into())
    }

    /// Builds a plain string value.
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self::String(value.into())
    }

    /// Returns the mapping, if this value is one.
    #[must_use]
    pub const fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Self::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the text of a string or identifier.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) | Self::Identifier(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the identifier name, if this value is an identifier.
    #[must_use]
    pub fn as_identifier(&self) -> Option<&str> {
        match self {
            Self::Identifier(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_identifier(&self) -> bool {
        matches!(self, Self::Identifier(_))
    }

    #[must_use]
    pub const fn is_sequence(&self) -> bool {
        matches!(self, Self::Sequence(_))
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Looks up a key when this value is a mapping.
    ///
    /// Returns `None` for non-mappings, absent keys, and keys bound to null,
    /// so callers can treat "present" uniformly.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Self> {
        self.as_mapping()
            .and_then(|map| map.get(key))
            .filter(|value| !value.is_null())
    }

    /// Iterates the entries of a mapping in file order, skipping `default`.
    ///
    /// Non-mappings yield nothing.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Self)> {
        self.as_mapping()
            .into_iter()
            .flat_map(|map| map.iter())
            .filter(|(key, _)| key.as_str() != DEFAULT_KEY)
            .map(|(key, value)| (key.as_str(), value))
    }

    /// Short type name for diagnostics.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Identifier(_) => "identifier",
            Self::Sequence(_) => "sequence",
            Self::Mapping(_) => "mapping",
        }
    }
}

/// Key holding the reference to the preferred entry of a section.
pub const DEFAULT_KEY: &str = "default";

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<Mapping> for ConfigValue {
    fn from(map: Mapping) -> Self {
        Self::Mapping(map)
    }
}

impl From<Vec<Self>> for ConfigValue {
    fn from(items: Vec<Self>) -> Self {
        Self::Sequence(items)
    }
}
