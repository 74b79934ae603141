//! Selector evaluation for `querySelector` matchers.

use super::DomField;

/// Decides whether a DOM candidate satisfies a CSS selector.
///
/// Hosts with access to a real DOM can answer this themselves; the built-in
/// [`SimpleSelectorEngine`] only sees the candidate descriptor.
pub trait SelectorEngine {
    fn matches(&self, candidate: &DomField, selector: &str) -> bool;
}

/// Evaluates the subset of CSS that a field descriptor can answer.
///
/// Supported: selector lists (`a, b`), compound selectors made of an optional
/// tag name or `*`, `#id`, and `[attr]` / `[attr=value]` for `id`, `name`
/// and `type`. A selector identical to the candidate's reported unique
/// selector always matches. Anything else never matches.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleSelectorEngine;

impl SelectorEngine for SimpleSelectorEngine {
    fn matches(&self, candidate: &DomField, selector: &str) -> bool {
        let selector = selector.trim();
        if candidate.selector.as_deref().map(str::trim) == Some(selector) {
            return true;
        }

        selector.split(',').map(str::trim).any(|compound| {
            match compound_matches(candidate, compound) {
                Some(matched) => matched,
                None => {
                    tracing::debug!(%compound, "unsupported selector, only exact selector equality applies");
                    false
                }
            }
        })
    }
}

fn is_ident(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn unquote(value: &str) -> &str {
    let value = value.trim();
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|v| v.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

/// `None` when the compound uses syntax outside the supported subset.
fn compound_matches(candidate: &DomField, compound: &str) -> Option<bool> {
    if compound.is_empty() {
        return None;
    }

    let tag_end = compound.find(['#', '[']).unwrap_or(compound.len());
    let (tag, mut rest) = compound.split_at(tag_end);
    let mut matched = match tag {
        "" | "*" => true,
        tag if is_ident(tag) => tag.eq_ignore_ascii_case(candidate.tag_name()),
        _ => return None,
    };

    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix('#') {
            let end = after.find(['#', '[']).unwrap_or(after.len());
            let (id, tail) = after.split_at(end);
            if !is_ident(id) {
                return None;
            }
            matched &= candidate.id.as_deref() == Some(id);
            rest = tail;
        } else if let Some(after) = rest.strip_prefix('[') {
            let end = after.find(']')?;
            let (body, tail) = (&after[..end], &after[end + 1..]);
            let (attr, expected) = match body.split_once('=') {
                Some((attr, value)) => (attr.trim(), Some(unquote(value))),
                None => (body.trim(), None),
            };
            let actual = match attr.to_ascii_lowercase().as_str() {
                "id" => candidate.id.as_deref(),
                "name" => candidate.name.as_deref(),
                "type" => Some(candidate.effective_html_type()),
                _ => return None,
            };
            matched &= match (expected, actual) {
                (None, actual) => actual.is_some(),
                (Some(expected), Some(actual)) if attr.eq_ignore_ascii_case("type") => {
                    expected.eq_ignore_ascii_case(actual)
                }
                (Some(expected), actual) => actual == Some(expected),
            };
            rest = tail;
        } else {
            return None;
        }
    }

    Some(matched)
}
