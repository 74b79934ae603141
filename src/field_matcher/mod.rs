//! Binds stored fields to DOM form fields.
//!
//! A field's first `Custom` matcher decides, in order:
//! 1. `querySelector`, when present, is authoritative and nothing else is tried
//! 2. ids, in list order
//! 3. names, in list order
//! 4. `htmlType` compatibility, when no id or name found a candidate
//!
//! Without a custom matcher only the standard username/password references
//! can bind, to the page's recognized username/password field.
//! When several candidates qualify the first one in page order wins.

mod selector;

use serde::{Deserialize, Serialize};

pub use selector::{SelectorEngine, SimpleSelectorEngine};

use crate::entry_config::{CustomMatcher, Field, StandardField};
use crate::error::{AutomationResult, Diagnostic};

const DEFAULT_HTML_TYPE: &str = "text";
const DEFAULT_TAG_NAME: &str = "input";
const TEXT_LIKE_TYPES: &[&str] = &["text", "email", "tel", "url", "search"];

/// A form field found on the page by the automation client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomField {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub html_type: Option<String>,
    #[serde(default)]
    pub tag_name: Option<String>,
    /// Unique selector reported by the client for this element
    #[serde(default)]
    pub selector: Option<String>,
    /// Set when the page analysis recognized this as the login username/password
    #[serde(default)]
    pub recognized_as: Option<StandardField>,
}

impl DomField {
    pub fn effective_html_type(&self) -> &str {
        self.html_type
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_HTML_TYPE)
    }

    pub fn tag_name(&self) -> &str {
        self.tag_name
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_TAG_NAME)
    }
}

/// Which rule produced a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BindingRule {
    QuerySelector,
    Id,
    Name,
    HtmlType,
    StandardUsername,
    StandardPassword,
    Unbound,
}

/// Binding of one field to the candidate list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldBinding {
    pub field_uuid: String,
    /// Index into the candidate list
    pub candidate_index: Option<usize>,
    pub rule: BindingRule,
    pub diagnostics: Vec<Diagnostic>,
}

/// Pick the DOM field `field` should fill, if any.
pub fn resolve_binding<'a>(field: &Field, candidates: &'a [DomField]) -> Option<&'a DomField> {
    bind_field(field, candidates, &SimpleSelectorEngine)
        .candidate_index
        .map(|i| &candidates[i])
}

/// Bind a field using the given selector engine, reporting how it bound.
pub fn bind_field(
    field: &Field,
    candidates: &[DomField],
    engine: &dyn SelectorEngine,
) -> FieldBinding {
    let mut binding = FieldBinding {
        field_uuid: field.uuid.clone(),
        candidate_index: None,
        rule: BindingRule::Unbound,
        diagnostics: Vec::new(),
    };

    let hits_and_rule = match field.custom_matcher() {
        Some(custom) => custom_hits(custom, candidates, engine),
        None => standard_hits(field, candidates),
    };

    if let Some((hits, rule)) = hits_and_rule {
        if hits.len() > 1 {
            binding.diagnostics.push(
                Diagnostic::MatcherResolutionAmbiguous {
                    field_uuid: field.uuid.clone(),
                    candidates: hits.len(),
                }
                .emit(),
            );
        }
        if let Some(&first) = hits.first() {
            binding.candidate_index = Some(first);
            binding.rule = rule;
        }
    }

    binding
}

fn indices_where(candidates: &[DomField], pred: impl Fn(&DomField) -> bool) -> Vec<usize> {
    candidates
        .iter()
        .enumerate()
        .filter(|(_, c)| pred(c))
        .map(|(i, _)| i)
        .collect()
}

fn html_type_compatible(expected: &str, candidate: &DomField) -> bool {
    let expected = expected.to_ascii_lowercase();
    let actual = candidate.effective_html_type().to_ascii_lowercase();
    expected == actual
        || (TEXT_LIKE_TYPES.contains(&expected.as_str()) && TEXT_LIKE_TYPES.contains(&actual.as_str()))
}

fn custom_hits(
    custom: &CustomMatcher,
    candidates: &[DomField],
    engine: &dyn SelectorEngine,
) -> Option<(Vec<usize>, BindingRule)> {
    if let Some(selector) = custom.query_selector.as_deref().filter(|s| !s.trim().is_empty()) {
        let hits = indices_where(candidates, |c| engine.matches(c, selector));
        return Some((hits, BindingRule::QuerySelector));
    }

    for id in custom.ids.iter().filter(|id| !id.is_empty()) {
        let hits = indices_where(candidates, |c| c.id.as_deref() == Some(id.as_str()));
        if !hits.is_empty() {
            return Some((hits, BindingRule::Id));
        }
    }

    for name in custom.names.iter().filter(|name| !name.is_empty()) {
        let hits = indices_where(candidates, |c| c.name.as_deref() == Some(name.as_str()));
        if !hits.is_empty() {
            return Some((hits, BindingRule::Name));
        }
    }

    let html_type = custom.html_type.as_deref().filter(|t| !t.is_empty())?;
    let hits = indices_where(candidates, |c| html_type_compatible(html_type, c));
    Some((hits, BindingRule::HtmlType))
}

fn standard_hits(field: &Field, candidates: &[DomField]) -> Option<(Vec<usize>, BindingRule)> {
    match field.standard_reference()? {
        StandardField::Username => {
            let hits = indices_where(candidates, |c| c.recognized_as == Some(StandardField::Username));
            Some((hits, BindingRule::StandardUsername))
        }
        StandardField::Password => {
            let mut hits = indices_where(candidates, |c| c.recognized_as == Some(StandardField::Password));
            if hits.is_empty() {
                hits = indices_where(candidates, |c| {
                    c.recognized_as.is_none() && c.effective_html_type().eq_ignore_ascii_case("password")
                });
            }
            Some((hits, BindingRule::StandardPassword))
        }
    }
}

/// Input for binding several fields at once.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMatcherInput {
    pub fields: Vec<Field>,
    pub candidates: Vec<DomField>,
}

/// Output from binding several fields at once.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMatcherOutput {
    pub bindings: Vec<FieldBinding>,
}

/// Bind every field of an entry against the page's candidates.
pub fn bind_fields(input: &FieldMatcherInput, engine: &dyn SelectorEngine) -> FieldMatcherOutput {
    FieldMatcherOutput {
        bindings: input
            .fields
            .iter()
            .map(|field| bind_field(field, &input.candidates, engine))
            .collect(),
    }
}

/// Bind fields from JSON input (convenience function for FFI).
pub fn bind_fields_json(input_json: &str) -> AutomationResult<String> {
    let input: FieldMatcherInput = serde_json::from_str(input_json)?;
    let output = bind_fields(&input, &SimpleSelectorEngine);
    Ok(serde_json::to_string(&output)?)
}

#[cfg(test)]
mod tests;
