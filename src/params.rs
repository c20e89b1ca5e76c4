//! Parameter mapping - name → value table placeholders resolve against
//!
//! Uses FxHashMap for faster hashing on small string keys.

use std::path::Path;

use rustc_hash::FxHashMap;

use crate::binding::is_valid_name;
use crate::error::{ParamError, Result};
use crate::value::DocumentValue;

/// Resolved parameter values (name → value)
///
/// Names are case-sensitive; setting a name twice keeps the last value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parameters {
    values: FxHashMap<String, DocumentValue>,
}

impl Parameters {
    /// Create empty parameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value without checking the name
    ///
    /// A malformed name can never be referenced by a placeholder, so it is
    /// harmless, just unreachable.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<DocumentValue>) {
        self.values.insert(name.into(), value.into());
    }

    /// Set a value, rejecting names a placeholder could not reference
    pub fn try_set(&mut self, name: impl Into<String>, value: impl Into<DocumentValue>) -> Result<()> {
        let name = name.into();
        if !is_valid_name(&name) {
            return Err(ParamError::InvalidName { name });
        }
        self.values.insert(name, value.into());
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&DocumentValue> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DocumentValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Build from a document whose root is a mapping
    pub fn from_document(doc: DocumentValue) -> Result<Self> {
        let map = match doc {
            DocumentValue::Mapping(map) => map,
            other => {
                return Err(ParamError::InvalidParameters {
                    details: format!("expected a mapping at the root, found {}", other.type_name()),
                })
            }
        };

        let mut params = Self::new();
        for (name, value) in map {
            params.try_set(name, value)?;
        }
        Ok(params)
    }

    /// Parse a YAML mapping of `name: value`
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let doc: DocumentValue = serde_yaml::from_str(yaml)?;
        Self::from_document(doc)
    }

    /// Parse a JSON object of `"name": value`
    pub fn from_json_str(json: &str) -> Result<Self> {
        let doc: DocumentValue = serde_json::from_str(json)?;
        Self::from_document(doc)
    }

    /// Load from a file; `.json` files are read as JSON, anything else as YAML
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        if path.extension().is_some_and(|ext| ext == "json") {
            Self::from_json_str(&text)
        } else {
            Self::from_yaml_str(&text)
        }
    }
}

impl<K, V> FromIterator<(K, V)> for Parameters
where
    K: Into<String>,
    V: Into<DocumentValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        params.extend(iter);
        params
    }
}

impl<K, V> Extend<(K, V)> for Parameters
where
    K: Into<String>,
    V: Into<DocumentValue>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.set(name, value);
        }
    }
}
