//! Value conversions used around substitution
//!
//! - `to_text`: canonical text for a value embedded in surrounding text
//! - `to_bool`: strict boolean coercion for callers that need a flag

use crate::error::{ParamError, Result};
use crate::value::DocumentValue;

/// Render a value as the text that replaces an embedded placeholder
///
/// Strings come back verbatim (no quotes, no escaping). Scalars use their
/// JSON spelling; sequences, mappings and opaque records become compact JSON.
pub fn to_text(value: &DocumentValue) -> Result<String> {
    match value {
        DocumentValue::String(s) => Ok(s.clone()),
        DocumentValue::Null => Ok("null".to_string()),
        DocumentValue::Bool(b) => Ok(b.to_string()),
        DocumentValue::Number(n) => Ok(n.to_string()),
        DocumentValue::Opaque(record) => record
            .to_json()
            .map(|json| json.to_string())
            .map_err(|e| ParamError::Serialization {
                type_name: record.type_name().to_string(),
                details: e.to_string(),
            }),
        other => serde_json::to_string(other).map_err(|e| ParamError::Serialization {
            type_name: other.type_name().to_string(),
            details: e.to_string(),
        }),
    }
}

/// Coerce a value to bool without any truthiness guessing
///
/// - absent / null → false
/// - bool → itself
/// - `"true"` → true, `""` → false
/// - anything else → [`ParamError::Conversion`]
pub fn to_bool(value: Option<&DocumentValue>) -> Result<bool> {
    match value {
        None | Some(DocumentValue::Null) => Ok(false),
        Some(DocumentValue::Bool(b)) => Ok(*b),
        Some(DocumentValue::String(s)) => match s.as_str() {
            "true" => Ok(true),
            "" => Ok(false),
            other => Err(ParamError::Conversion {
                found: "string".to_string(),
                details: format!("{other:?} is neither \"true\" nor empty"),
            }),
        },
        Some(other) => Err(ParamError::Conversion {
            found: other.type_name().to_string(),
            details: "only booleans and strings convert".to_string(),
        }),
    }
}
