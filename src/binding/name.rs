//! Parameter name validation
//!
//! Names are non-empty and contain only ASCII letters, digits and underscores.
//! Manual byte check, no regex: this runs for every placeholder candidate.

/// Check whether `name` can be referenced by a `{{ name }}` placeholder
///
/// Valid: `runCommand`, `runComand12`, `_x`, `2fast`
/// Invalid: `run+Command`, `run Command`, `runCommand??`, `co!mmand`, ``
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|byte| byte.is_ascii_alphanumeric() || byte == b'_')
}
