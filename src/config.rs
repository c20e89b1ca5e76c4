//! Engine and CLI configuration
//!
//! ```yaml
//! max_depth: 64          # optional nesting limit (none by default)
//! cache_templates: true  # reuse tokenized templates
//! output: json           # yaml (default) or json
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ParamError, Result};

/// Overrides `max_depth`
pub const MAX_DEPTH_ENV: &str = "DOCPARAMS_MAX_DEPTH";

/// Configuration file contents
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Maximum number of nested containers a document may have
    pub max_depth: Option<usize>,

    /// Give the engine a template cache
    pub cache_templates: bool,

    /// Rendering format for the CLI
    pub output: OutputFormat,
}

/// Output format enum
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// YAML output (default)
    #[default]
    Yaml,

    /// Pretty JSON output
    Json,
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty file is an empty config.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).map_err(|e| ParamError::Config {
            details: e.to_string(),
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml(&yaml)
    }

    /// Apply `DOCPARAMS_MAX_DEPTH` from the process environment
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(raw) = lookup(MAX_DEPTH_ENV) {
            let depth = raw.trim().parse::<usize>().map_err(|_| ParamError::Config {
                details: format!("{MAX_DEPTH_ENV}={raw:?} is not a non-negative integer"),
            })?;
            self.max_depth = Some(depth);
        }
        Ok(self)
    }
}
