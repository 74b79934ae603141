//! Entry automation configuration model.
//!
//! An [`EntryConfig`] describes how one stored entry takes part in browser
//! automation: which pages it is offered on, which form fields it fills and
//! how aggressively it fills and submits. The shape mirrors the JSON stored
//! alongside each entry (camelCase keys, struct declaration order), so two
//! equal configs always serialize to the same bytes.

mod legacy;
mod normalize;

use base64::{engine::general_purpose, Engine as _};
use rand::RngCore;
use serde::{Deserialize, Serialize};

pub use legacy::{EntryConfigV1, LegacyFieldType, LegacyFormField};
pub use normalize::{
    normalize, normalize_config, normalize_json, NormalizeInput, NormalizeOutput, RawEntryConfig,
    StoredEntryConfig,
};

/// Value path meaning "use the field's own literal value".
pub const VALUE_PATH_LITERAL: &str = ".";
/// Value path referencing the entry's username.
pub const VALUE_PATH_USERNAME: &str = "username";
/// Value path referencing the entry's password.
pub const VALUE_PATH_PASSWORD: &str = "password";

/// How closely a page URL must resemble the entry's URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchAccuracyMethod {
    /// Same registrable domain (eTLD+1)
    Domain,
    /// Same scheme, host and port
    Hostname,
    /// Identical URL
    Exact,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryMatcherType {
    Hide,
    Url,
}

/// One entry-level matcher.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryMatcherConfig {
    pub matcher_type: EntryMatcherType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_match_method: Option<MatchAccuracyMethod>,
}

impl EntryMatcherConfig {
    pub fn hide() -> Self {
        Self {
            matcher_type: EntryMatcherType::Hide,
            url_match_method: None,
        }
    }

    pub fn url(method: MatchAccuracyMethod) -> Self {
        Self {
            matcher_type: EntryMatcherType::Url,
            url_match_method: Some(method),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldMatcherType {
    Custom,
    UsernameDefaultHeuristic,
    PasswordDefaultHeuristic,
}

/// Explicit description of the DOM element a field should bind to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomMatcher {
    pub ids: Vec<String>,
    pub names: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_selector: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldMatcherConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matcher_type: Option<FieldMatcherType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_matcher: Option<CustomMatcher>,
}

impl FieldMatcherConfig {
    /// An unset matcher type counts as `Custom`.
    pub fn is_custom(&self) -> bool {
        self.matcher_type.unwrap_or(FieldMatcherType::Custom) == FieldMatcherType::Custom
    }

    /// Build a custom matcher targeting a single element. Empty inputs are left out.
    pub fn for_single_client_match(
        id: Option<&str>,
        name: Option<&str>,
        html_type: Option<&str>,
        query_selector: Option<&str>,
    ) -> Self {
        let non_empty = |s: Option<&str>| s.filter(|s| !s.is_empty()).map(String::from);
        Self {
            matcher_type: Some(FieldMatcherType::Custom),
            custom_matcher: Some(CustomMatcher {
                ids: non_empty(id).into_iter().collect(),
                names: non_empty(name).into_iter().collect(),
                html_type: non_empty(html_type),
                query_selector: non_empty(query_selector),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    Text,
    Password,
    Existing,
    Toggle,
    Otp,
    SomeChars,
}

impl FieldType {
    /// Human readable label used in field summaries.
    pub fn label(self) -> &'static str {
        match self {
            FieldType::Text => "Text",
            FieldType::Password => "Password",
            FieldType::Existing => "Existing",
            FieldType::Toggle => "Checkbox",
            FieldType::Otp => "One-time password",
            FieldType::SomeChars => "Some characters",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PlaceholderHandling {
    #[default]
    Default,
    Enabled,
    Disabled,
}

/// The two value paths with a fixed meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StandardField {
    Username,
    Password,
}

/// A form field the entry knows how to fill.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    /// Stable identity; empty when the stored data never had one
    #[serde(default)]
    pub uuid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default = "default_value_path")]
    pub value_path: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default = "default_page")]
    pub page: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder_handling: Option<PlaceholderHandling>,
    #[serde(default)]
    pub matcher_configs: Vec<FieldMatcherConfig>,
}

fn default_value_path() -> String {
    VALUE_PATH_LITERAL.to_string()
}

fn default_page() -> i32 {
    1
}

impl Field {
    pub fn has_identity(&self) -> bool {
        !self.uuid.is_empty()
    }

    pub fn standard_reference(&self) -> Option<StandardField> {
        match self.value_path.as_str() {
            VALUE_PATH_USERNAME => Some(StandardField::Username),
            VALUE_PATH_PASSWORD => Some(StandardField::Password),
            _ => None,
        }
    }

    pub fn is_literal(&self) -> bool {
        self.value_path == VALUE_PATH_LITERAL
    }

    /// First matcher config that is (or defaults to) `Custom`.
    pub fn custom_matcher(&self) -> Option<&CustomMatcher> {
        self.matcher_configs
            .iter()
            .find(|fmc| fmc.is_custom())
            .and_then(|fmc| fmc.custom_matcher.as_ref())
    }
}

/// Combined autofill/autosubmit policy for an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum EntryAutomationBehaviour {
    #[default]
    Default,
    AlwaysAutoFill,
    NeverAutoSubmit,
    AlwaysAutoFillAlwaysAutoSubmit,
    NeverAutoFillNeverAutoSubmit,
    AlwaysAutoFillNeverAutoSubmit,
}

/// The four independent URL list roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UrlListRole {
    Match,
    Block,
    RegExMatch,
    RegExBlock,
}

/// Current (v2) configuration shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EntryConfig {
    pub matcher_configs: Vec<EntryMatcherConfig>,
    pub fields: Vec<Field>,
    #[serde(skip_serializing_if = "is_default_behaviour")]
    pub behaviour: Option<EntryAutomationBehaviour>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_realm: Option<String>,
    pub alt_urls: Vec<String>,
    pub blocked_urls: Vec<String>,
    pub reg_ex_urls: Vec<String>,
    pub reg_ex_blocked_urls: Vec<String>,
}

fn is_default_behaviour(behaviour: &Option<EntryAutomationBehaviour>) -> bool {
    behaviour.unwrap_or_default() == EntryAutomationBehaviour::Default
}

// Null and `Default` behaviour are the same state.
impl PartialEq for EntryConfig {
    fn eq(&self, other: &Self) -> bool {
        self.matcher_configs == other.matcher_configs
            && self.fields == other.fields
            && self.effective_behaviour() == other.effective_behaviour()
            && self.http_realm == other.http_realm
            && self.alt_urls == other.alt_urls
            && self.blocked_urls == other.blocked_urls
            && self.reg_ex_urls == other.reg_ex_urls
            && self.reg_ex_blocked_urls == other.reg_ex_blocked_urls
    }
}

impl Eq for EntryConfig {}

impl EntryConfig {
    /// The config an untouched entry gets in a database with the given default accuracy.
    pub fn default_for(accuracy: MatchAccuracyMethod) -> Self {
        Self {
            matcher_configs: vec![EntryMatcherConfig::url(accuracy)],
            ..Self::default()
        }
    }

    /// Whether this config carries nothing beyond the defaults.
    ///
    /// Both the empty config and [`EntryConfig::default_for`] count.
    pub fn is_untouched(&self, accuracy: MatchAccuracyMethod) -> bool {
        *self == Self::default() || *self == Self::default_for(accuracy)
    }

    pub fn effective_behaviour(&self) -> EntryAutomationBehaviour {
        self.behaviour.unwrap_or_default()
    }

    pub fn set_behaviour(&mut self, behaviour: EntryAutomationBehaviour) {
        self.behaviour = match behaviour {
            EntryAutomationBehaviour::Default => None,
            other => Some(other),
        };
    }

    pub fn is_hidden(&self) -> bool {
        self.matcher_configs
            .iter()
            .any(|mc| mc.matcher_type == EntryMatcherType::Hide)
    }

    pub fn url_matcher(&self) -> Option<&EntryMatcherConfig> {
        self.matcher_configs
            .iter()
            .find(|mc| mc.matcher_type == EntryMatcherType::Url)
    }

    /// Accuracy used for the entry's own URL. A missing matcher means `Exact`.
    pub fn url_match_method(&self) -> MatchAccuracyMethod {
        self.url_matcher()
            .and_then(|mc| mc.url_match_method)
            .unwrap_or(MatchAccuracyMethod::Exact)
    }

    pub fn url_list(&self, role: UrlListRole) -> &[String] {
        match role {
            UrlListRole::Match => &self.alt_urls,
            UrlListRole::Block => &self.blocked_urls,
            UrlListRole::RegExMatch => &self.reg_ex_urls,
            UrlListRole::RegExBlock => &self.reg_ex_blocked_urls,
        }
    }

    pub fn url_list_mut(&mut self, role: UrlListRole) -> &mut Vec<String> {
        match role {
            UrlListRole::Match => &mut self.alt_urls,
            UrlListRole::Block => &mut self.blocked_urls,
            UrlListRole::RegExMatch => &mut self.reg_ex_urls,
            UrlListRole::RegExBlock => &mut self.reg_ex_blocked_urls,
        }
    }

    pub fn field(&self, uuid: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.uuid == uuid)
    }
}

/// Generate a new field identity: 128 random bits, base64 encoded.
pub fn new_field_uuid() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    general_purpose::STANDARD.encode(bytes)
}
