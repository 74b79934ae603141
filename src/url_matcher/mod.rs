//! Decides whether an entry is offered on a page.
//!
//! Algorithm Structure (Priority Order with Early Returns):
//! 1. `Hide` matcher present: never matches
//! 2. Block lists (literal, then RegEx): no match
//! 3. Allow lists (literal, then RegEx): match
//! 4. Accuracy fallback on the entry's own URL (Exact, Hostname or Domain)
//!
//! Literal and pattern lists always outrank the accuracy fallback, even when
//! a literal entry is also the entry's own URL.

mod domain;

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use url::Url;

pub use domain::registrable_domain;
use domain::{same_domain, same_hostname};

use crate::entry_config::{EntryConfig, MatchAccuracyMethod};
use crate::error::{AutomationResult, Diagnostic};

/// Why a URL did or did not match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchReason {
    Hidden,
    MalformedUrl,
    Blocked,
    RegExBlocked,
    Listed,
    RegExListed,
    Accuracy(MatchAccuracyMethod),
    NoMatch,
}

/// Result of evaluating one entry against one URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlMatchOutcome {
    pub matched: bool,
    pub reason: MatchReason,
    pub diagnostics: Vec<Diagnostic>,
}

impl UrlMatchOutcome {
    fn new(matched: bool, reason: MatchReason, diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            matched,
            reason,
            diagnostics,
        }
    }

    /// Lower is a stronger match.
    fn strength(&self) -> u8 {
        match self.reason {
            MatchReason::Listed | MatchReason::RegExListed => 0,
            MatchReason::Accuracy(MatchAccuracyMethod::Exact) => 1,
            MatchReason::Accuracy(MatchAccuracyMethod::Hostname) => 2,
            MatchReason::Accuracy(MatchAccuracyMethod::Domain) => 3,
            _ => u8::MAX,
        }
    }
}

/// Whether the entry should be offered on `candidate_url`.
pub fn matches(config: &EntryConfig, entry_url: Option<&str>, candidate_url: &str) -> bool {
    evaluate(config, entry_url, candidate_url).matched
}

/// Evaluate the entry against `candidate_url`, collecting diagnostics.
///
/// Never fails: malformed URLs and broken patterns count as non-matches.
pub fn evaluate(
    config: &EntryConfig,
    entry_url: Option<&str>,
    candidate_url: &str,
) -> UrlMatchOutcome {
    let mut diagnostics = Vec::new();

    if config.is_hidden() {
        return UrlMatchOutcome::new(false, MatchReason::Hidden, diagnostics);
    }

    let candidate = match Url::parse(candidate_url) {
        Ok(url) => url,
        Err(e) => {
            diagnostics.push(malformed(candidate_url, e));
            return UrlMatchOutcome::new(false, MatchReason::MalformedUrl, diagnostics);
        }
    };

    if config.blocked_urls.iter().any(|u| u == candidate_url) {
        return UrlMatchOutcome::new(false, MatchReason::Blocked, diagnostics);
    }
    if any_pattern_matches(&config.reg_ex_blocked_urls, candidate_url, &mut diagnostics) {
        return UrlMatchOutcome::new(false, MatchReason::RegExBlocked, diagnostics);
    }

    if config.alt_urls.iter().any(|u| u == candidate_url) {
        return UrlMatchOutcome::new(true, MatchReason::Listed, diagnostics);
    }
    if any_pattern_matches(&config.reg_ex_urls, candidate_url, &mut diagnostics) {
        return UrlMatchOutcome::new(true, MatchReason::RegExListed, diagnostics);
    }

    let Some(entry_url) = entry_url.filter(|u| !u.is_empty()) else {
        return UrlMatchOutcome::new(false, MatchReason::NoMatch, diagnostics);
    };

    let method = config.url_match_method();
    let matched = match method {
        MatchAccuracyMethod::Exact => entry_url == candidate_url,
        MatchAccuracyMethod::Hostname | MatchAccuracyMethod::Domain => {
            match Url::parse(entry_url) {
                Ok(stored) if method == MatchAccuracyMethod::Hostname => {
                    same_hostname(&stored, &candidate)
                }
                Ok(stored) => same_domain(&stored, &candidate),
                Err(e) => {
                    diagnostics.push(malformed(entry_url, e));
                    false
                }
            }
        }
    };

    let reason = if matched {
        MatchReason::Accuracy(method)
    } else {
        MatchReason::NoMatch
    };
    UrlMatchOutcome::new(matched, reason, diagnostics)
}

fn malformed(url: &str, err: url::ParseError) -> Diagnostic {
    Diagnostic::MalformedUrl {
        url: url.to_string(),
        message: err.to_string(),
    }
    .emit()
}

/// Check patterns in order. Patterns that fail to compile are skipped.
fn any_pattern_matches(patterns: &[String], candidate: &str, diagnostics: &mut Vec<Diagnostic>) -> bool {
    for pattern in patterns {
        match Regex::new(pattern) {
            Ok(re) if re.is_match(candidate) => return true,
            Ok(_) => {}
            Err(e) => diagnostics.push(
                Diagnostic::PatternCompilation {
                    pattern: pattern.clone(),
                    message: e.to_string(),
                }
                .emit(),
            ),
        }
    }
    false
}

/// An entry offered for matching.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryCandidate {
    pub id: String,
    /// The entry's own URL
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub config: EntryConfig,
}

/// Input for multi-entry URL matching.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlMatcherInput {
    pub entries: Vec<EntryCandidate>,
    /// URL of the page being automated
    pub current_url: String,
}

/// Output from multi-entry URL matching.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlMatcherOutput {
    /// IDs of matched entries, strongest match first
    pub matched_ids: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Filter entries for the current URL, ordered by match strength.
///
/// Explicitly listed URLs come first, then Exact, Hostname and Domain
/// accuracy matches. Entries keep their input order within a strength.
pub fn match_entries(input: &UrlMatcherInput) -> UrlMatcherOutput {
    let mut diagnostics = Vec::new();
    let mut matched: Vec<(u8, &str)> = Vec::new();

    for entry in &input.entries {
        let outcome = evaluate(&entry.config, entry.url.as_deref(), &input.current_url);
        if outcome.matched {
            matched.push((outcome.strength(), entry.id.as_str()));
        }
        diagnostics.extend(outcome.diagnostics);
    }

    matched.sort_by_key(|(strength, _)| *strength);
    let mut seen_ids: HashSet<&str> = HashSet::new();
    let matched_ids = matched
        .into_iter()
        .filter(|(_, id)| seen_ids.insert(*id))
        .map(|(_, id)| id.to_string())
        .collect();

    UrlMatcherOutput {
        matched_ids,
        diagnostics,
    }
}

/// Match entries from JSON input (convenience function for FFI).
pub fn match_entries_json(input_json: &str) -> AutomationResult<String> {
    let input: UrlMatcherInput = serde_json::from_str(input_json)?;
    let output = match_entries(&input);
    Ok(serde_json::to_string(&output)?)
}
