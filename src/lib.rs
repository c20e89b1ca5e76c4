//! docparams - typed `{{ name }}` parameter substitution for command documents
//!
//! ```
//! use docparams::{substitute_in_value, DocumentValue, Parameters};
//! use serde_json::json;
//!
//! let doc = DocumentValue::from(json!({
//!     "runCommand": "{{ runCommand }}",
//!     "comment": "runs in {{ workingDirectory }}",
//! }));
//! let params: Parameters = [
//!     ("runCommand", DocumentValue::from(vec!["echo hello"])),
//!     ("workingDirectory", DocumentValue::from("/tmp")),
//! ]
//! .into_iter()
//! .collect();
//!
//! let out = substitute_in_value(&doc, &params).unwrap();
//! assert_eq!(out, DocumentValue::from(json!({
//!     "runCommand": ["echo hello"],
//!     "comment": "runs in /tmp",
//! })));
//! ```

pub mod binding;
pub mod config;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod params;
pub mod value;

pub use binding::{
    collect_refs, extract_refs, is_single_placeholder, is_valid_name, substitute_in_string,
    substitute_in_string_with, substitute_in_value, substitute_in_value_with, to_bool, to_text,
};
pub use config::{Config, OutputFormat};
pub use diagnostics::{DiagnosticSink, Level, MemorySink, NoopSink, TracingSink};
pub use engine::Substitutor;
pub use error::{FixSuggestion, ParamError, Result};
pub use params::Parameters;
pub use value::{DocumentValue, Mapping, OpaqueRecord};
