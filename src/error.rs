//! Error types with fix suggestions
//!
//! Error code ranges:
//! - PARAM-001-009: Substitution errors
//! - PARAM-010-019: Configuration errors
//! - PARAM-020-029: Input/IO errors

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ParamError>;

/// Trait for errors that provide fix suggestions
pub trait FixSuggestion {
    fn fix_suggestion(&self) -> Option<&str>;
}

/// All error variants are part of the public API.
///
/// An unresolved placeholder is never an error: it is left in place.
#[derive(Error, Debug)]
pub enum ParamError {
    // ─────────────────────────────────────────────────────────────
    // Substitution errors (PARAM-001 to PARAM-009)
    // ─────────────────────────────────────────────────────────────
    #[error("[PARAM-001] Cannot render {type_name} value as text: {details}")]
    Serialization { type_name: String, details: String },

    #[error("[PARAM-002] Cannot convert {found} to bool: {details}")]
    Conversion { found: String, details: String },

    #[error("[PARAM-003] Invalid parameter name '{name}'")]
    InvalidName { name: String },

    #[error("[PARAM-004] Invalid parameter source: {details}")]
    InvalidParameters { details: String },

    #[error("[PARAM-005] Document nesting exceeds the maximum depth of {max_depth}")]
    DepthExceeded { max_depth: usize },

    // ─────────────────────────────────────────────────────────────
    // Configuration errors (PARAM-010 to PARAM-019)
    // ─────────────────────────────────────────────────────────────
    #[error("[PARAM-010] Invalid configuration: {details}")]
    Config { details: String },

    // ─────────────────────────────────────────────────────────────
    // Input errors (PARAM-020 to PARAM-029)
    // ─────────────────────────────────────────────────────────────
    #[error("[PARAM-020] IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("[PARAM-021] YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("[PARAM-022] JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ParamError {
    /// Stable error code, e.g. `PARAM-001`
    pub fn code(&self) -> &'static str {
        match self {
            ParamError::Serialization { .. } => "PARAM-001",
            ParamError::Conversion { .. } => "PARAM-002",
            ParamError::InvalidName { .. } => "PARAM-003",
            ParamError::InvalidParameters { .. } => "PARAM-004",
            ParamError::DepthExceeded { .. } => "PARAM-005",
            ParamError::Config { .. } => "PARAM-010",
            ParamError::Io(_) => "PARAM-020",
            ParamError::Yaml(_) => "PARAM-021",
            ParamError::Json(_) => "PARAM-022",
        }
    }
}

impl FixSuggestion for ParamError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            ParamError::Serialization { .. } => {
                Some("Parameter values must serialize to JSON (string map keys, no failing Serialize impls)")
            }
            ParamError::Conversion { .. } => Some("Use a boolean, \"true\", or \"\" for this parameter"),
            ParamError::InvalidName { .. } => {
                Some("Parameter names may only contain ASCII letters, digits and '_'")
            }
            ParamError::InvalidParameters { .. } => {
                Some("The parameter file must contain a top-level mapping of name: value")
            }
            ParamError::DepthExceeded { .. } => Some("Raise max_depth or flatten the document"),
            ParamError::Config { .. } => Some("Check the config keys: max_depth, cache_templates, output"),
            ParamError::Io(_) => Some("Check file path and permissions"),
            ParamError::Yaml(_) => Some("Check YAML syntax: indentation and quoting"),
            ParamError::Json(_) => Some("Check JSON syntax (try parsing with jq)"),
        }
    }
}
