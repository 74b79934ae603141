//! Field value resolution.
//!
//! Turns a stored [`Field`] into a [`ResolvedField`] carrying the value that
//! will actually be placed on the page:
//! - literal fields (`valuePath = "."`) use their own value
//! - any other value path reads the entry's key/value store
//! - placeholders are expanded when the effective handling is `Enabled`,
//!   falling back to the raw value if expansion fails
//! - toggles must end up as one of the two toggle tokens

mod display;
mod placeholder;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub use display::{describe_field, FieldSummary};
pub use placeholder::{EntryPlaceholderExpander, ExpansionError, PlaceholderExpander};

use crate::defaults::AutomationDefaults;
use crate::entry_config::{Field, FieldType, PlaceholderHandling};
use crate::error::{AutomationError, AutomationResult, Diagnostic};

/// Toggle value meaning "checked".
pub const TOGGLE_ENABLED: &str = "KEEFOX_CHECKED_FLAG_TRUE";
/// Toggle value meaning "unchecked".
pub const TOGGLE_DISABLED: &str = "KEEFOX_CHECKED_FLAG_FALSE";

/// An entry's own key/value store (username, password, title, custom strings).
pub type EntryValues = HashMap<String, String>;

/// A field together with its final runtime value.
///
/// Equality covers the whole field as well as the resolved value: two
/// resolved fields producing the same output for different fields differ.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedField {
    #[serde(flatten)]
    pub field: Field,
    pub resolved_value: Option<String>,
}

/// Resolve one field. Expansion failures are logged and fall back to the raw value.
pub fn resolve_field(
    field: &Field,
    values: &EntryValues,
    expander: &dyn PlaceholderExpander,
    defaults: &AutomationDefaults,
) -> AutomationResult<ResolvedField> {
    resolve_collecting(field, values, expander, defaults, &mut Vec::new())
}

fn resolve_collecting(
    field: &Field,
    values: &EntryValues,
    expander: &dyn PlaceholderExpander,
    defaults: &AutomationDefaults,
    diagnostics: &mut Vec<Diagnostic>,
) -> AutomationResult<ResolvedField> {
    let raw = if field.is_literal() {
        field.value.clone()
    } else {
        values.get(&field.value_path).cloned()
    };

    let handling = defaults.placeholder_handling_for(field.field_type, field.placeholder_handling);
    let value = match raw {
        Some(raw) if handling == PlaceholderHandling::Enabled => {
            match expander.expand(&raw, values) {
                Ok(expanded) => Some(expanded),
                Err(e) => {
                    diagnostics.push(
                        Diagnostic::PlaceholderExpansion {
                            field_uuid: field.uuid.clone(),
                            message: e.to_string(),
                        }
                        .emit(),
                    );
                    Some(raw)
                }
            }
        }
        other => other,
    };

    let resolved_value = match (field.field_type, value) {
        (FieldType::Toggle, None) => Some(TOGGLE_DISABLED.to_string()),
        (FieldType::Toggle, Some(v)) if v == TOGGLE_ENABLED || v == TOGGLE_DISABLED => Some(v),
        (FieldType::Toggle, Some(other)) => {
            return Err(AutomationError::InvalidFieldValue {
                uuid: field.uuid.clone(),
                value: other,
            })
        }
        (_, value) => value,
    };

    Ok(ResolvedField {
        field: field.clone(),
        resolved_value,
    })
}

/// Input for resolving all fields of an entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveInput {
    pub fields: Vec<Field>,
    #[serde(default)]
    pub entry_values: EntryValues,
    #[serde(default)]
    pub defaults: AutomationDefaults,
}

/// A field that could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldFailure {
    pub field_uuid: String,
    pub message: String,
}

/// Output from resolving all fields of an entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveOutput {
    /// Successfully resolved fields, in input order
    pub resolved: Vec<ResolvedField>,
    /// Fields that failed; siblings are unaffected
    pub failures: Vec<FieldFailure>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Resolve every field, isolating per-field failures.
pub fn resolve_fields(input: &ResolveInput, expander: &dyn PlaceholderExpander) -> ResolveOutput {
    let mut output = ResolveOutput::default();
    for field in &input.fields {
        match resolve_collecting(
            field,
            &input.entry_values,
            expander,
            &input.defaults,
            &mut output.diagnostics,
        ) {
            Ok(resolved) => output.resolved.push(resolved),
            Err(e) => output.failures.push(FieldFailure {
                field_uuid: field.uuid.clone(),
                message: e.to_string(),
            }),
        }
    }
    output
}

/// Resolve fields from JSON input (convenience function for FFI).
pub fn resolve_fields_json(input_json: &str) -> AutomationResult<String> {
    let input: ResolveInput = serde_json::from_str(input_json)?;
    let output = resolve_fields(&input, &EntryPlaceholderExpander);
    Ok(serde_json::to_string(&output)?)
}
