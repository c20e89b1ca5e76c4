//! Binding Module - `{{ name }}` parameter substitution
//!
//! - `name`: which names a placeholder may reference
//! - `convert`: value → text for embedding, value → strict bool
//! - `template`: substitution inside one string
//! - `walk`: substitution over a whole document
//!
//! Data flow:
//! ```text
//! document string leaf
//!        ↓
//!  exactly one resolvable placeholder? ──yes──→ parameter's typed value
//!        │ no
//!        ↓
//!  tokenize → [Literal | Placeholder] → to_text + `$$` unescape → String
//! ```

mod convert;
mod name;
pub(crate) mod template;
mod walk;

// Re-export public types
pub use convert::{to_bool, to_text};
pub use name::is_valid_name;
pub use template::{
    extract_refs, is_single_placeholder, single_placeholder, substitute_in_string,
    substitute_in_string_with, tokenize, Segment, TemplateCache,
};
pub use walk::{collect_refs, substitute_in_value, substitute_in_value_with};
