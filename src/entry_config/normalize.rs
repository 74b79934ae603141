//! Turns whatever is stored for an entry into a canonical [`EntryConfig`].

use serde::{Deserialize, Serialize};

use super::{new_field_uuid, EntryConfig, EntryConfigV1, EntryMatcherType, MatchAccuracyMethod};
use crate::defaults::AutomationDefaults;
use crate::error::AutomationResult;

/// The two storage slots an entry may carry its configuration in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoredEntryConfig {
    /// JSON of the current shape
    pub current_json: Option<String>,
    /// JSON of the legacy shape, kept in the older string-based slot
    pub legacy_json: Option<String>,
}

/// A configuration in any supported shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawEntryConfig {
    Current(EntryConfig),
    Legacy(EntryConfigV1),
    Absent,
}

impl RawEntryConfig {
    /// Decode stored slots. The current slot wins over the legacy one.
    pub fn from_stored(stored: &StoredEntryConfig) -> AutomationResult<Self> {
        if let Some(json) = stored.current_json.as_deref() {
            return Ok(RawEntryConfig::Current(serde_json::from_str(json)?));
        }
        if let Some(json) = stored.legacy_json.as_deref() {
            return Ok(RawEntryConfig::Legacy(serde_json::from_str(json)?));
        }
        Ok(RawEntryConfig::Absent)
    }
}

/// Produce the canonical configuration for `raw`.
///
/// Deterministic apart from identities generated for fields that lack one.
pub fn normalize(raw: RawEntryConfig, default_accuracy: MatchAccuracyMethod) -> EntryConfig {
    match raw {
        RawEntryConfig::Current(config) => normalize_config(config),
        RawEntryConfig::Legacy(legacy) => {
            tracing::debug!("upgrading legacy entry configuration");
            normalize_config(legacy.into_current(default_accuracy))
        }
        RawEntryConfig::Absent => EntryConfig::default_for(default_accuracy),
    }
}

/// Canonicalize a config that is already in the current shape.
pub fn normalize_config(mut config: EntryConfig) -> EntryConfig {
    let mut seen_hide = false;
    let mut seen_url = false;
    config.matcher_configs.retain(|mc| {
        let seen = match mc.matcher_type {
            EntryMatcherType::Hide => &mut seen_hide,
            EntryMatcherType::Url => &mut seen_url,
        };
        !std::mem::replace(seen, true)
    });

    for field in &mut config.fields {
        if !field.has_identity() {
            field.uuid = new_field_uuid();
        }
        field.page = field.page.max(1);
    }

    let behaviour = config.effective_behaviour();
    config.set_behaviour(behaviour);

    if config.http_realm.as_deref() == Some("") {
        config.http_realm = None;
    }

    config
}

/// Input for JSON normalization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizeInput {
    #[serde(default)]
    pub stored: StoredEntryConfig,
    #[serde(default)]
    pub defaults: AutomationDefaults,
}

/// Output from JSON normalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizeOutput {
    pub config: EntryConfig,
    /// Whether the config came from the legacy slot
    pub upgraded_from_legacy: bool,
}

/// Normalize stored slots from JSON input (convenience function for FFI).
pub fn normalize_json(input_json: &str) -> AutomationResult<String> {
    let input: NormalizeInput = serde_json::from_str(input_json)?;
    let raw = RawEntryConfig::from_stored(&input.stored)?;
    let upgraded_from_legacy = matches!(raw, RawEntryConfig::Legacy(_));
    let output = NormalizeOutput {
        config: normalize(raw, input.defaults.default_match_accuracy),
        upgraded_from_legacy,
    };
    Ok(serde_json::to_string(&output)?)
}
