//! Template substitution - `{{ name }}` placeholders inside one string
//!
//! Single pass over the original template: it is cut into literal and
//! placeholder segments once, then the output is assembled by concatenation.
//! Parameter text is pushed as-is and never goes through a replacement
//! grammar, so a `$` in a value cannot act as a backreference.
//!
//! The one rewrite applied to parameter text is the `$$` escape: each `$$`
//! pair, scanned left to right, collapses to a single `$`.

use std::borrow::Cow;
use std::ops::Range;
use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::diagnostics::{diag, DiagnosticSink, Level, NoopSink};
use crate::error::Result;
use crate::params::Parameters;

use super::convert::to_text;
use super::name::is_valid_name;

/// `{{` ws* token ws* `}}`; the token is validated separately
static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{\s*([^{}]*?)\s*\}\}").unwrap());

/// A whole (already trimmed) string that is exactly one placeholder
static SINGLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\{\{\s*([^{}]*?)\s*\}\}$").unwrap());

/// Parsed template fragment
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Literal text (range in the original template)
    Literal(Range<usize>),
    /// `{{ name }}` with a valid name; `span` covers the braces
    Placeholder { name: String, span: Range<usize> },
}

/// Cut a template into segments
///
/// Brace groups whose token is not a valid name stay part of the literal text.
pub fn tokenize(template: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut literal_start = 0;

    for cap in PLACEHOLDER_RE.captures_iter(template) {
        let (Some(whole), Some(token)) = (cap.get(0), cap.get(1)) else {
            continue;
        };
        if !is_valid_name(token.as_str()) {
            continue;
        }

        if whole.start() > literal_start {
            segments.push(Segment::Literal(literal_start..whole.start()));
        }
        segments.push(Segment::Placeholder {
            name: token.as_str().to_string(),
            span: whole.range(),
        });
        literal_start = whole.end();
    }

    if literal_start < template.len() {
        segments.push(Segment::Literal(literal_start..template.len()));
    }

    segments
}

/// Tokenized templates, keyed by template text
///
/// Results are identical with or without the cache; it only saves re-scanning
/// templates that repeat across documents.
#[derive(Debug, Default)]
pub struct TemplateCache {
    cache: DashMap<String, Arc<Vec<Segment>>>,
}

impl TemplateCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse template into segments (with caching)
    pub fn tokenize(&self, template: &str) -> Arc<Vec<Segment>> {
        if let Some(cached) = self.cache.get(template) {
            return Arc::clone(&cached);
        }

        let segments = Arc::new(tokenize(template));
        self.cache.insert(template.to_string(), Arc::clone(&segments));
        segments
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn clear(&self) {
        self.cache.clear();
    }
}

/// Assemble the output for pre-parsed segments
///
/// Returns Cow::Borrowed when no placeholder resolves.
pub(crate) fn render<'t>(
    template: &'t str,
    segments: &[Segment],
    params: &Parameters,
    sink: &dyn DiagnosticSink,
) -> Result<Cow<'t, str>> {
    let resolvable = segments.iter().any(|segment| {
        matches!(segment, Segment::Placeholder { name, .. } if params.contains(name))
    });
    if !resolvable {
        return Ok(Cow::Borrowed(template));
    }

    let mut result = String::with_capacity(template.len() + 64);

    for segment in segments {
        match segment {
            Segment::Literal(range) => result.push_str(&template[range.clone()]),
            Segment::Placeholder { name, span } => match params.get(name) {
                Some(value) => {
                    let text = match to_text(value) {
                        Ok(text) => text,
                        Err(e) => {
                            diag!(sink, Level::Warn, "parameter '{}' cannot be rendered: {}", name, e);
                            return Err(e);
                        }
                    };
                    diag!(sink, Level::Debug, "resolved placeholder '{}'", name);
                    result.push_str(&unescape_dollars(&text));
                }
                None => {
                    diag!(sink, Level::Trace, "no parameter '{}', placeholder kept", name);
                    result.push_str(&template[span.clone()]);
                }
            },
        }
    }

    Ok(Cow::Owned(result))
}

/// Collapse each `$$` pair to one `$`; a lone `$` is kept
///
/// `$$$` → `$$`, `$$$$` → `$$`.
fn unescape_dollars(text: &str) -> Cow<'_, str> {
    if !text.contains("$$") {
        return Cow::Borrowed(text);
    }

    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        result.push(ch);
        if ch == '$' && chars.peek() == Some(&'$') {
            chars.next();
        }
    }
    Cow::Owned(result)
}

/// Replace every resolvable `{{ name }}` in `template`
///
/// Unknown names and malformed tokens are left byte-for-byte. Values are
/// inserted once and never rescanned.
///
/// Example: `"A {{ p1 }}"` with `p1 = "name"` → `"A name"`
pub fn substitute_in_string<'t>(template: &'t str, params: &Parameters) -> Result<Cow<'t, str>> {
    substitute_in_string_with(template, params, &NoopSink)
}

/// [`substitute_in_string`] reporting to `sink`
pub fn substitute_in_string_with<'t>(
    template: &'t str,
    params: &Parameters,
    sink: &dyn DiagnosticSink,
) -> Result<Cow<'t, str>> {
    if !template.contains("{{") {
        return Ok(Cow::Borrowed(template));
    }
    render(template, &tokenize(template), params, sink)
}

/// Name of the placeholder when the trimmed input is exactly one placeholder
///
/// `"{{ p1 }}"` → `Some("p1")`; `"a {{ p1 }}"` and `"{{ p1 }} {{ p1 }}"` → `None`
pub fn single_placeholder(input: &str) -> Option<&str> {
    let cap = SINGLE_RE.captures(input.trim())?;
    let name = cap.get(1)?.as_str();
    is_valid_name(name).then_some(name)
}

/// Check whether `input` is exactly the placeholder `{{ name }}`
pub fn is_single_placeholder(input: &str, name: &str) -> bool {
    single_placeholder(input) == Some(name)
}

/// Placeholder names referenced by a template, in order of appearance
///
/// Example: "{{a}} and {{ b }} and {{a}}" → ["a", "b", "a"]
pub fn extract_refs(template: &str) -> Vec<String> {
    tokenize(template)
        .into_iter()
        .filter_map(|segment| match segment {
            Segment::Placeholder { name, .. } => Some(name),
            Segment::Literal(_) => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::MemorySink;
    use crate::value::DocumentValue;
    use serde_json::json;

    fn params(pairs: &[(&str, DocumentValue)]) -> Parameters {
        pairs.iter().cloned().collect()
    }

    #[test]
    fn tokenize_literal_only() {
        let segments = tokenize("simple text");
        assert_eq!(segments, vec![Segment::Literal(0..11)]);
    }

    #[test]
    fn tokenize_placeholder_with_spaces() {
        let segments = tokenize("A {{ p1 }}!");
        assert_eq!(
            segments,
            vec![
                Segment::Literal(0..2),
                Segment::Placeholder {
                    name: "p1".to_string(),
                    span: 2..10
                },
                Segment::Literal(10..11),
            ]
        );
    }

    #[test]
    fn tokenize_skips_invalid_tokens() {
        let segments = tokenize("{{ co!mmand }} {{ run Command }} {{}}");
        assert_eq!(segments, vec![Segment::Literal(0..37)]);
    }

    #[test]
    fn tokenize_inner_braces() {
        // The outer braces are literal text around a valid placeholder.
        let refs = extract_refs("{{{p1}}}");
        assert_eq!(refs, vec!["p1"]);
    }

    #[test]
    fn substitute_single_occurrence() {
        let p = params(&[("p1", "name".into())]);
        assert_eq!(substitute_in_string("A {{ p1 }}", &p).unwrap(), "A name");
    }

    #[test]
    fn substitute_multiple_occurrences() {
        let p = params(&[("p1", "name".into())]);
        assert_eq!(
            substitute_in_string("A {{p1 }} is a {{ p1}}", &p).unwrap(),
            "A name is a name"
        );
    }

    #[test]
    fn substitute_no_placeholder_is_borrowed() {
        let p = params(&[("p1", "p1-value".into())]);
        let result = substitute_in_string("there is no parameter", &p).unwrap();
        assert_eq!(result, "there is no parameter");
        assert!(matches!(result, Cow::Borrowed(_)));
    }

    #[test]
    fn substitute_only_unresolved_is_borrowed() {
        let result = substitute_in_string("keep {{ p3 }}", &Parameters::new()).unwrap();
        assert!(matches!(result, Cow::Borrowed("keep {{ p3 }}")));
    }

    #[test]
    fn substitute_keeps_exact_unresolved_text() {
        let p = params(&[("p1", "x".into())]);
        assert_eq!(
            substitute_in_string("{{p1}} {{  missing   }} {{bad name}}", &p).unwrap(),
            "x {{  missing   }} {{bad name}}"
        );
    }

    #[test]
    fn substitute_structured_values_as_json() {
        let p = params(&[
            ("list", DocumentValue::from(vec!["a", "plane"])),
            ("n", DocumentValue::from(5_i64)),
            ("flag", DocumentValue::Bool(false)),
            ("obj", DocumentValue::from(json!({"S": "p2-string", "I": 10}))),
        ]);
        assert_eq!(
            substitute_in_string("{{list}} {{n}} {{flag}} {{obj}}", &p).unwrap(),
            r#"["a","plane"] 5 false {"S":"p2-string","I":10}"#
        );
    }

    #[test]
    fn dollar_in_value_is_literal() {
        let p = params(&[("Path", r"C:\$Recycle.Bin".into())]);
        assert_eq!(
            substitute_in_string("Write-Host '{{Path}}'", &p).unwrap(),
            r"Write-Host 'C:\$Recycle.Bin'"
        );
    }

    #[test]
    fn doubled_dollar_in_value_collapses() {
        let p = params(&[("Path", r"C:\$$Recycle.Bin".into())]);
        assert_eq!(
            substitute_in_string("Write-Host '{{ Path }}'", &p).unwrap(),
            r"Write-Host 'C:\$Recycle.Bin'"
        );
    }

    #[test]
    fn backreference_lookalikes_stay_literal() {
        let p = params(&[("v", "$1 ${0} $name".into())]);
        assert_eq!(substitute_in_string("[{{v}}]", &p).unwrap(), "[$1 ${0} $name]");
    }

    #[test]
    fn dollar_runs_collapse_pairwise() {
        assert_eq!(unescape_dollars("$"), "$");
        assert_eq!(unescape_dollars("$$"), "$");
        assert_eq!(unescape_dollars("$$$"), "$$");
        assert_eq!(unescape_dollars("$$$$"), "$$");
        assert_eq!(unescape_dollars("é$$ü"), "é$ü");
    }

    #[test]
    fn template_dollars_are_untouched() {
        let p = params(&[("price", DocumentValue::from(89_i64))]);
        assert_eq!(
            substitute_in_string("Price: $${{price}}", &p).unwrap(),
            "Price: $$89"
        );
    }

    #[test]
    fn resolved_value_is_not_rescanned() {
        let p = params(&[("p1", "{{p2}}".into()), ("p2", "p2-value".into())]);
        assert_eq!(
            substitute_in_string("{{p1}} and {{p2}}", &p).unwrap(),
            "{{p2}} and p2-value"
        );
    }

    #[test]
    fn sink_sees_resolved_and_missing() {
        let sink = MemorySink::new();
        let p = params(&[("p1", "v".into())]);
        substitute_in_string_with("{{p1}} {{p2}}", &p, &sink).unwrap();

        let lines = sink.lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], (Level::Debug, "resolved placeholder 'p1'".to_string()));
        assert_eq!(lines[1].0, Level::Trace);
    }

    #[test]
    fn single_placeholder_detection() {
        let cases = [
            ("{{ command}}", "command", true),
            ("{{ comm}}", "command", false),
            ("{{ command }}", "com", false),
            ("a {{ command}}", "command", false),
            ("{{ command }} {{ command }}", "command", false),
            ("{{ co!mmand}}", "co!mmand", false),
            ("  {{command}}\n", "command", true),
        ];
        for (input, name, expected) in cases {
            assert_eq!(is_single_placeholder(input, name), expected, "{input:?} / {name}");
        }
    }

    #[test]
    fn cache_reuse() {
        let cache = TemplateCache::new();
        let template = "{{p1}} and {{p2}}";

        let first = cache.tokenize(template);
        let second = cache.tokenize(template);

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
        cache.clear();
        assert!(cache.is_empty());
    }
}
