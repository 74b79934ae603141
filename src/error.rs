//! Error and diagnostic types for the entry automation core.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that abort a single operation.
///
/// None of these leave the configuration half-edited: an operation that fails
/// returns before touching the config or any sibling field.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AutomationError {
    /// Error serializing/deserializing JSON
    #[error("JSON error: {0}")]
    JsonError(String),

    /// A toggle field holds something other than the two toggle tokens
    #[error("Invalid value for field {uuid}: {value:?}")]
    InvalidFieldValue { uuid: String, value: String },

    /// A stored field has no identity and cannot be edited
    #[error("Corrupt entry: field has no identity")]
    MissingFieldIdentity,

    /// No field with the given uuid exists in the config
    #[error("Field not found: {0}")]
    FieldNotFound(String),

    /// Standard username/password references cannot be removed
    #[error("Field {0} is a standard reference and cannot be removed")]
    ProtectedField(String),

    /// The edit session was opened read-only
    #[error("Edit session is read-only")]
    ReadOnlySession,

    /// General error
    #[error("Error: {0}")]
    General(String),
}

impl From<serde_json::Error> for AutomationError {
    fn from(err: serde_json::Error) -> Self {
        AutomationError::JsonError(err.to_string())
    }
}

/// Result type alias for automation operations.
pub type AutomationResult<T> = Result<T, AutomationError>;

/// Non-fatal conditions reported alongside a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Diagnostic {
    /// A stored RegEx URL pattern failed to compile and was skipped
    PatternCompilation { pattern: String, message: String },
    /// A URL could not be parsed
    MalformedUrl { url: String, message: String },
    /// More than one DOM candidate satisfied a field's matcher
    MatcherResolutionAmbiguous { field_uuid: String, candidates: usize },
    /// Placeholder expansion failed and the raw value was used
    PlaceholderExpansion { field_uuid: String, message: String },
}

impl Diagnostic {
    /// Log this diagnostic at warn level.
    pub(crate) fn emit(self) -> Self {
        match &self {
            Diagnostic::PatternCompilation { pattern, message } => {
                tracing::warn!(%pattern, %message, "skipping RegEx URL pattern that does not compile");
            }
            Diagnostic::MalformedUrl { url, message } => {
                tracing::warn!(%url, %message, "malformed URL treated as non-match");
            }
            Diagnostic::MatcherResolutionAmbiguous { field_uuid, candidates } => {
                tracing::warn!(%field_uuid, candidates, "field matcher is ambiguous, using first candidate");
            }
            Diagnostic::PlaceholderExpansion { field_uuid, message } => {
                tracing::warn!(%field_uuid, %message, "placeholder expansion failed, using raw value");
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_json_is_camel_case() {
        let diagnostic = Diagnostic::MatcherResolutionAmbiguous {
            field_uuid: "f1".to_string(),
            candidates: 2,
        };
        let value = serde_json::to_value(&diagnostic).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"kind": "matcherResolutionAmbiguous", "fieldUuid": "f1", "candidates": 2})
        );

        let back: Diagnostic = serde_json::from_value(value).unwrap();
        assert_eq!(back, diagnostic);
    }
}
