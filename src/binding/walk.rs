//! Structural walk - substitution over a whole document
//!
//! Sequences and mappings are rebuilt with the same shape; only string leaves
//! change. A string that is exactly one resolvable placeholder becomes the
//! parameter's own typed value, so a field bound to a list stays a list.

use std::collections::BTreeSet;

use crate::diagnostics::{diag, DiagnosticSink, Level};
use crate::engine::Substitutor;
use crate::error::{ParamError, Result};
use crate::params::Parameters;
use crate::value::{DocumentValue, Mapping};

use super::template::{extract_refs, single_placeholder};

impl Substitutor<'_> {
    /// `depth` is the number of containers enclosing `doc`
    pub(crate) fn walk(
        &self,
        doc: &DocumentValue,
        params: &Parameters,
        depth: usize,
    ) -> Result<DocumentValue> {
        match doc {
            DocumentValue::String(s) => {
                if let Some(name) = single_placeholder(s) {
                    if let Some(value) = params.get(name) {
                        diag!(
                            self.sink,
                            Level::Debug,
                            "field is exactly '{}', keeping its {} value",
                            name,
                            value.type_name()
                        );
                        return Ok(value.clone());
                    }
                }
                Ok(DocumentValue::String(
                    self.substitute_string(s, params)?.into_owned(),
                ))
            }
            DocumentValue::Sequence(items) => {
                self.enter(depth)?;
                items
                    .iter()
                    .map(|item| self.walk(item, params, depth + 1))
                    .collect::<Result<Vec<_>>>()
                    .map(DocumentValue::Sequence)
            }
            DocumentValue::Mapping(map) => {
                self.enter(depth)?;
                map.iter()
                    .map(|(key, value)| -> Result<(String, DocumentValue)> {
                        Ok((key.clone(), self.walk(value, params, depth + 1)?))
                    })
                    .collect::<Result<Mapping>>()
                    .map(DocumentValue::Mapping)
            }
            // Null, Bool, Number and Opaque are never substitution targets.
            other => Ok(other.clone()),
        }
    }

    fn enter(&self, depth: usize) -> Result<()> {
        match self.max_depth {
            Some(max_depth) if depth >= max_depth => Err(ParamError::DepthExceeded { max_depth }),
            _ => Ok(()),
        }
    }
}

/// Substitute placeholders throughout a document
///
/// Inputs are borrowed and never modified; the first error aborts the walk.
pub fn substitute_in_value(doc: &DocumentValue, params: &Parameters) -> Result<DocumentValue> {
    Substitutor::new().substitute_value(doc, params)
}

/// [`substitute_in_value`] reporting to `sink`
pub fn substitute_in_value_with(
    doc: &DocumentValue,
    params: &Parameters,
    sink: &dyn DiagnosticSink,
) -> Result<DocumentValue> {
    Substitutor::new().with_sink(sink).substitute_value(doc, params)
}

/// Every placeholder name referenced anywhere in a document
///
/// Mapping keys and opaque records are not searched.
pub fn collect_refs(doc: &DocumentValue) -> BTreeSet<String> {
    let mut refs = BTreeSet::new();
    collect_into(doc, &mut refs);
    refs
}

fn collect_into(doc: &DocumentValue, refs: &mut BTreeSet<String>) {
    match doc {
        DocumentValue::String(s) => refs.extend(extract_refs(s)),
        DocumentValue::Sequence(items) => items.iter().for_each(|item| collect_into(item, refs)),
        DocumentValue::Mapping(map) => map.values().for_each(|value| collect_into(value, refs)),
        _ => {}
    }
}
