//! Placeholder expansion for field values.

use thiserror::Error;

use super::EntryValues;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExpansionError {
    /// A `{` without a closing `}`
    #[error("unterminated placeholder at offset {0}")]
    Unterminated(usize),

    /// `{S:key}` naming a value the entry does not have
    #[error("unknown entry value reference {0:?}")]
    UnknownReference(String),
}

/// Substitutes placeholder tokens inside a raw field value.
pub trait PlaceholderExpander {
    fn expand(&self, raw: &str, values: &EntryValues) -> Result<String, ExpansionError>;
}

/// Expands the standard entry placeholders.
///
/// `{USERNAME}`, `{PASSWORD}`, `{TITLE}`, `{URL}` and `{NOTES}` (any case)
/// read the matching entry value, `{S:key}` reads an arbitrary entry value.
/// Unrecognized tokens are left untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct EntryPlaceholderExpander;

const STANDARD_TOKENS: &[(&str, &str)] = &[
    ("USERNAME", "username"),
    ("PASSWORD", "password"),
    ("TITLE", "title"),
    ("URL", "url"),
    ("NOTES", "notes"),
];

impl PlaceholderExpander for EntryPlaceholderExpander {
    fn expand(&self, raw: &str, values: &EntryValues) -> Result<String, ExpansionError> {
        let mut out = String::with_capacity(raw.len());
        let mut rest = raw;

        while let Some(start) = rest.find('{') {
            out.push_str(&rest[..start]);
            let after = &rest[start + 1..];
            let end = after
                .find('}')
                .ok_or(ExpansionError::Unterminated(raw.len() - rest.len() + start))?;
            let token = &after[..end];

            if let Some(key) = token.strip_prefix("S:") {
                let value = values
                    .get(key)
                    .ok_or_else(|| ExpansionError::UnknownReference(key.to_string()))?;
                out.push_str(value);
            } else if let Some((_, key)) = STANDARD_TOKENS
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(token))
            {
                out.push_str(values.get(*key).map(String::as_str).unwrap_or(""));
            } else {
                out.push('{');
                out.push_str(token);
                out.push('}');
            }

            rest = &after[end + 1..];
        }

        out.push_str(rest);
        Ok(out)
    }
}
