//! Change detection for persisting an entry's configuration.
//!
//! Untouched entries are never given boilerplate JSON, identical JSON is
//! never rewritten, and any write migrates the entry off the legacy
//! string-based slot.

use serde::{Deserialize, Serialize};

use crate::defaults::AutomationDefaults;
use crate::entry_config::{EntryConfig, MatchAccuracyMethod, StoredEntryConfig};
use crate::error::AutomationResult;

/// Key of the storage slot holding the configuration JSON.
pub const CONFIG_STORAGE_KEY: &str = "KPRPC JSON";

/// What the host should do with its stored configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum WriteDecision {
    Skip,
    Write {
        json: String,
        /// Remove the legacy string slot in the same operation
        remove_legacy: bool,
    },
}

impl WriteDecision {
    /// Apply the decision to a set of storage slots.
    pub fn apply(&self, stored: &mut StoredEntryConfig) {
        if let WriteDecision::Write {
            json,
            remove_legacy,
        } = self
        {
            stored.current_json = Some(json.clone());
            if *remove_legacy {
                stored.legacy_json = None;
            }
        }
    }
}

/// Decide whether `new_config` needs to be written.
pub fn maybe_persist(
    new_config: &EntryConfig,
    previously_persisted_json: Option<&str>,
    had_legacy_string_storage: bool,
    default_accuracy: MatchAccuracyMethod,
) -> AutomationResult<WriteDecision> {
    if previously_persisted_json.is_none() && new_config.is_untouched(default_accuracy) {
        tracing::debug!("config is untouched and was never stored, skipping write");
        return Ok(WriteDecision::Skip);
    }

    let json = serde_json::to_string(new_config)?;
    if previously_persisted_json == Some(json.as_str()) {
        return Ok(WriteDecision::Skip);
    }

    tracing::debug!(remove_legacy = had_legacy_string_storage, "config changed, writing");
    Ok(WriteDecision::Write {
        json,
        remove_legacy: had_legacy_string_storage,
    })
}

/// Input for JSON change detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistInput {
    pub config: EntryConfig,
    #[serde(default)]
    pub previous_json: Option<String>,
    #[serde(default)]
    pub has_legacy_storage: bool,
    #[serde(default)]
    pub defaults: AutomationDefaults,
}

/// Decide on a write from JSON input (convenience function for FFI).
pub fn maybe_persist_json(input_json: &str) -> AutomationResult<String> {
    let input: PersistInput = serde_json::from_str(input_json)?;
    let decision = maybe_persist(
        &input.config,
        input.previous_json.as_deref(),
        input.has_legacy_storage,
        input.defaults.default_match_accuracy,
    )?;
    Ok(serde_json::to_string(&decision)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry_config::EntryAutomationBehaviour;

    const ACCURACY: MatchAccuracyMethod = MatchAccuracyMethod::Domain;

    #[test]
    fn test_default_config_without_prior_json_is_skipped() {
        let empty = EntryConfig::default();
        assert_eq!(maybe_persist(&empty, None, false, ACCURACY).unwrap(), WriteDecision::Skip);

        let synthetic = EntryConfig::default_for(ACCURACY);
        assert_eq!(maybe_persist(&synthetic, None, true, ACCURACY).unwrap(), WriteDecision::Skip);
    }

    #[test]
    fn test_default_config_with_prior_json_is_written() {
        let empty = EntryConfig::default();
        let previous = r#"{"matcherConfigs":[{"matcherType":"Hide"}]}"#;
        let decision = maybe_persist(&empty, Some(previous), false, ACCURACY).unwrap();
        assert_eq!(
            decision,
            WriteDecision::Write {
                json: serde_json::to_string(&empty).unwrap(),
                remove_legacy: false,
            }
        );
    }

    #[test]
    fn test_identical_json_is_skipped() {
        let mut config = EntryConfig::default_for(ACCURACY);
        config.set_behaviour(EntryAutomationBehaviour::AlwaysAutoFill);
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(maybe_persist(&config, Some(&json), true, ACCURACY).unwrap(), WriteDecision::Skip);
    }

    #[test]
    fn test_write_migrates_legacy_slot() {
        let mut config = EntryConfig::default_for(ACCURACY);
        config.http_realm = Some("Router".to_string());
        let decision = maybe_persist(&config, None, true, ACCURACY).unwrap();

        let mut stored = StoredEntryConfig {
            current_json: None,
            legacy_json: Some("{}".to_string()),
        };
        decision.apply(&mut stored);
        assert_eq!(stored.current_json, Some(serde_json::to_string(&config).unwrap()));
        assert_eq!(stored.legacy_json, None);
    }

    #[test]
    fn test_non_default_accuracy_is_not_untouched() {
        let config = EntryConfig::default_for(MatchAccuracyMethod::Exact);
        assert!(matches!(
            maybe_persist(&config, None, false, ACCURACY).unwrap(),
            WriteDecision::Write { .. }
        ));
    }

    #[test]
    fn test_maybe_persist_json_api() {
        let input = serde_json::json!({
            "config": {"matcherConfigs": [{"matcherType": "Url", "urlMatchMethod": "Domain"}]},
            "previousJson": null,
            "hasLegacyStorage": false
        });
        let output = maybe_persist_json(&input.to_string()).unwrap();
        assert_eq!(output, r#"{"decision":"skip"}"#);
    }
}
