//! Substitution engine
//!
//! [`Substitutor`] bundles the knobs a caller may want around substitution:
//! a diagnostic sink, an optional nesting limit and an optional template
//! cache. The free functions in [`crate::binding`] use a default engine.

use std::borrow::Cow;

use crate::binding::template::{render, tokenize, TemplateCache};
use crate::config::Config;
use crate::diagnostics::{DiagnosticSink, NoopSink};
use crate::error::Result;
use crate::params::Parameters;
use crate::value::DocumentValue;

/// Configurable substitution engine
///
/// Holds no per-call state; one engine can serve many threads.
pub struct Substitutor<'s> {
    pub(crate) sink: &'s dyn DiagnosticSink,
    pub(crate) max_depth: Option<usize>,
    cache: Option<TemplateCache>,
}

impl Default for Substitutor<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl Substitutor<'static> {
    /// Engine with no sink, no depth limit and no cache
    pub fn new() -> Self {
        Self {
            sink: &NoopSink,
            max_depth: None,
            cache: None,
        }
    }

    /// Engine configured from a [`Config`]
    pub fn from_config(config: &Config) -> Self {
        let mut engine = Self::new();
        engine.max_depth = config.max_depth;
        if config.cache_templates {
            engine.cache = Some(TemplateCache::new());
        }
        engine
    }
}

impl<'s> Substitutor<'s> {
    /// Report through `sink`
    pub fn with_sink<'t>(self, sink: &'t dyn DiagnosticSink) -> Substitutor<'t> {
        Substitutor {
            sink,
            max_depth: self.max_depth,
            cache: self.cache,
        }
    }

    /// Refuse documents with more than `max_depth` nested containers
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Keep tokenized templates between calls
    pub fn with_cache(mut self) -> Self {
        self.cache.get_or_insert_with(TemplateCache::new);
        self
    }

    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    pub fn cache(&self) -> Option<&TemplateCache> {
        self.cache.as_ref()
    }

    /// Substitute placeholders inside one string
    pub fn substitute_string<'t>(&self, template: &'t str, params: &Parameters) -> Result<Cow<'t, str>> {
        if !template.contains("{{") {
            return Ok(Cow::Borrowed(template));
        }
        match &self.cache {
            Some(cache) => render(template, &cache.tokenize(template), params, self.sink),
            None => render(template, &tokenize(template), params, self.sink),
        }
    }

    /// Substitute placeholders throughout a document
    pub fn substitute_value(&self, doc: &DocumentValue, params: &Parameters) -> Result<DocumentValue> {
        self.walk(doc, params, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{Level, MemorySink};
    use serde_json::json;

    fn params() -> Parameters {
        [("p1", "p1-value"), ("p2", "p2-value")].into_iter().collect()
    }

    #[test]
    fn cached_and_uncached_agree() {
        let plain = Substitutor::new();
        let cached = Substitutor::new().with_cache();
        let doc = DocumentValue::from(json!(["{{p1}} and {{p2}}", "{{p1}} and {{p2}}", "{{ p3 }}"]));

        assert_eq!(
            plain.substitute_value(&doc, &params()).unwrap(),
            cached.substitute_value(&doc, &params()).unwrap()
        );
        // Unresolved whole-field placeholders fall back to the text path.
        assert_eq!(cached.cache().map(TemplateCache::len), Some(2));
    }

    #[test]
    fn from_config_applies_settings() {
        let config = Config {
            max_depth: Some(4),
            cache_templates: true,
            ..Config::default()
        };
        let engine = Substitutor::from_config(&config);
        assert_eq!(engine.max_depth(), Some(4));
        assert!(engine.cache().is_some());
    }

    #[test]
    fn with_sink_keeps_settings() {
        let sink = MemorySink::new();
        let engine = Substitutor::new().with_max_depth(1).with_cache().with_sink(&sink);
        assert_eq!(engine.max_depth(), Some(1));
        assert!(engine.cache().is_some());

        engine.substitute_string("{{p1}}", &params()).unwrap();
        assert_eq!(sink.messages_at_least(Level::Debug), vec!["resolved placeholder 'p1'"]);
    }

    #[test]
    fn engine_is_shareable_across_threads() {
        fn assert_sync<T: Send + Sync>() {}
        assert_sync::<Substitutor<'static>>();
        assert_sync::<Parameters>();
        assert_sync::<DocumentValue>();
    }
}
