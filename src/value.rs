//! Document values - the closed set of nodes a command document is built from
//!
//! Documents enter and leave through serde (JSON or YAML). Native records that
//! must travel through a document without being inspected are wrapped in an
//! [`OpaqueRecord`]; the walker never looks inside them.

use std::any::type_name;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::ser::{self, SerializeMap};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Number, Value};

/// Insertion-ordered string-keyed mapping
pub type Mapping = IndexMap<String, DocumentValue>;

/// A node of a command document
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DocumentValue {
    /// Absent / nil
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Sequence(Vec<DocumentValue>),
    Mapping(Mapping),
    /// Native record carried through untouched
    Opaque(OpaqueRecord),
}

impl DocumentValue {
    /// Short type label used in errors and diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            DocumentValue::Null => "null",
            DocumentValue::Bool(_) => "bool",
            DocumentValue::Number(_) => "number",
            DocumentValue::String(_) => "string",
            DocumentValue::Sequence(_) => "sequence",
            DocumentValue::Mapping(_) => "mapping",
            DocumentValue::Opaque(_) => "opaque",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, DocumentValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            DocumentValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[DocumentValue]> {
        match self {
            DocumentValue::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            DocumentValue::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Encode as a JSON value.
    ///
    /// Fails only when an opaque record (at any depth) refuses to serialize.
    pub fn to_json(&self) -> Result<Value, serde_json::Error> {
        Ok(match self {
            DocumentValue::Null => Value::Null,
            DocumentValue::Bool(b) => Value::Bool(*b),
            DocumentValue::Number(n) => Value::Number(n.clone()),
            DocumentValue::String(s) => Value::String(s.clone()),
            DocumentValue::Sequence(items) => Value::Array(
                items
                    .iter()
                    .map(DocumentValue::to_json)
                    .collect::<Result<_, _>>()?,
            ),
            DocumentValue::Mapping(map) => {
                let mut object = serde_json::Map::with_capacity(map.len());
                for (key, value) in map {
                    object.insert(key.clone(), value.to_json()?);
                }
                Value::Object(object)
            }
            DocumentValue::Opaque(record) => record.to_json()?,
        })
    }
}

impl From<Value> for DocumentValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => DocumentValue::Null,
            Value::Bool(b) => DocumentValue::Bool(b),
            Value::Number(n) => DocumentValue::Number(n),
            Value::String(s) => DocumentValue::String(s),
            Value::Array(items) => {
                DocumentValue::Sequence(items.into_iter().map(DocumentValue::from).collect())
            }
            Value::Object(object) => DocumentValue::Mapping(
                object
                    .into_iter()
                    .map(|(key, value)| (key, DocumentValue::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for DocumentValue {
    fn from(s: &str) -> Self {
        DocumentValue::String(s.to_string())
    }
}

impl From<String> for DocumentValue {
    fn from(s: String) -> Self {
        DocumentValue::String(s)
    }
}

impl From<bool> for DocumentValue {
    fn from(b: bool) -> Self {
        DocumentValue::Bool(b)
    }
}

impl From<i64> for DocumentValue {
    fn from(n: i64) -> Self {
        DocumentValue::Number(n.into())
    }
}

impl From<u64> for DocumentValue {
    fn from(n: u64) -> Self {
        DocumentValue::Number(n.into())
    }
}

/// Non-finite floats have no document form and become `Null`.
impl From<f64> for DocumentValue {
    fn from(n: f64) -> Self {
        Number::from_f64(n).map_or(DocumentValue::Null, DocumentValue::Number)
    }
}

impl<T: Into<DocumentValue>> From<Vec<T>> for DocumentValue {
    fn from(items: Vec<T>) -> Self {
        DocumentValue::Sequence(items.into_iter().map(Into::into).collect())
    }
}

impl From<Mapping> for DocumentValue {
    fn from(map: Mapping) -> Self {
        DocumentValue::Mapping(map)
    }
}

impl From<OpaqueRecord> for DocumentValue {
    fn from(record: OpaqueRecord) -> Self {
        DocumentValue::Opaque(record)
    }
}

impl Serialize for DocumentValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DocumentValue::Null => serializer.serialize_unit(),
            DocumentValue::Bool(b) => serializer.serialize_bool(*b),
            DocumentValue::Number(n) => n.serialize(serializer),
            DocumentValue::String(s) => serializer.serialize_str(s),
            DocumentValue::Sequence(items) => items.serialize(serializer),
            DocumentValue::Mapping(map) => {
                let mut state = serializer.serialize_map(Some(map.len()))?;
                for (key, value) in map {
                    state.serialize_entry(key, value)?;
                }
                state.end()
            }
            DocumentValue::Opaque(record) => record
                .to_json()
                .map_err(<S::Error as ser::Error>::custom)?
                .serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for DocumentValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // serde_json is built with preserve_order, so key order survives.
        Value::deserialize(deserializer).map(DocumentValue::from)
    }
}

/// Object-safe view of a serializable native record
trait ErasedRecord: fmt::Debug + Send + Sync {
    fn to_json(&self) -> Result<Value, serde_json::Error>;
}

impl<T> ErasedRecord for T
where
    T: Serialize + fmt::Debug + Send + Sync,
{
    fn to_json(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// A native record embedded in a document.
///
/// Substitution passes it through unchanged; stringifying it renders its
/// `Serialize` output as compact JSON, which may fail.
#[derive(Clone)]
pub struct OpaqueRecord {
    type_name: &'static str,
    inner: Arc<dyn ErasedRecord>,
}

impl OpaqueRecord {
    pub fn new<T>(record: T) -> Self
    where
        T: Serialize + fmt::Debug + Send + Sync + 'static,
    {
        Self {
            type_name: type_name::<T>(),
            inner: Arc::new(record),
        }
    }

    /// Rust type name of the wrapped record
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn to_json(&self) -> Result<Value, serde_json::Error> {
        self.inner.to_json()
    }
}

impl fmt::Debug for OpaqueRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("OpaqueRecord").field(&self.inner).finish()
    }
}

/// Same allocation, or same type with equal JSON encodings.
impl PartialEq for OpaqueRecord {
    fn eq(&self, other: &Self) -> bool {
        if Arc::ptr_eq(&self.inner, &other.inner) {
            return true;
        }
        self.type_name == other.type_name
            && matches!((self.to_json(), other.to_json()), (Ok(a), Ok(b)) if a == b)
    }
}
