//! Legacy (v1) configuration shape and its upgrade to the current shape.

use serde::{Deserialize, Serialize};

use super::{
    new_field_uuid, EntryConfig, EntryMatcherConfig, Field, FieldMatcherConfig, FieldType,
    MatchAccuracyMethod, PlaceholderHandling, VALUE_PATH_LITERAL, VALUE_PATH_PASSWORD,
    VALUE_PATH_USERNAME,
};
use crate::behaviour::{derive_state, AutomationPreference};

const USERNAME_TOKEN: &str = "{USERNAME}";
const PASSWORD_TOKEN: &str = "{PASSWORD}";

/// Form field types of the legacy shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LegacyFieldType {
    #[serde(rename = "FFTradio")]
    Radio,
    #[serde(rename = "FFTusername")]
    Username,
    #[serde(rename = "FFTtext")]
    Text,
    #[serde(rename = "FFTpassword")]
    Password,
    #[serde(rename = "FFTselect")]
    Select,
    #[serde(rename = "FFTcheckbox")]
    Checkbox,
}

impl LegacyFieldType {
    fn field_type(self) -> FieldType {
        match self {
            LegacyFieldType::Username | LegacyFieldType::Text => FieldType::Text,
            LegacyFieldType::Password => FieldType::Password,
            LegacyFieldType::Checkbox => FieldType::Toggle,
            LegacyFieldType::Radio | LegacyFieldType::Select => FieldType::Existing,
        }
    }

    fn html_type(self) -> &'static str {
        match self {
            LegacyFieldType::Username | LegacyFieldType::Text => "text",
            LegacyFieldType::Password => "password",
            LegacyFieldType::Checkbox => "checkbox",
            LegacyFieldType::Radio => "radio",
            LegacyFieldType::Select => "select-one",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyFormField {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(rename = "type")]
    pub field_type: LegacyFieldType,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default = "default_page")]
    pub page: i32,
    #[serde(default)]
    pub placeholder_handling: Option<PlaceholderHandling>,
}

fn default_page() -> i32 {
    1
}

/// Legacy (v1) configuration shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EntryConfigV1 {
    pub hide: bool,
    pub block_hostname_only_match: Option<bool>,
    pub block_domain_only_match: Option<bool>,
    pub always_auto_fill: bool,
    pub never_auto_fill: bool,
    pub always_auto_submit: bool,
    pub never_auto_submit: bool,
    pub form_field_list: Vec<LegacyFormField>,
    pub alt_urls: Vec<String>,
    pub blocked_urls: Vec<String>,
    pub reg_ex_urls: Vec<String>,
    pub reg_ex_blocked_urls: Vec<String>,
    pub http_realm: Option<String>,
}

impl EntryConfigV1 {
    /// Accuracy implied by the legacy block flags, if they say anything.
    fn stored_accuracy(&self) -> Option<MatchAccuracyMethod> {
        match (self.block_hostname_only_match, self.block_domain_only_match) {
            (Some(true), _) => Some(MatchAccuracyMethod::Exact),
            (_, Some(true)) => Some(MatchAccuracyMethod::Hostname),
            (Some(false), Some(false)) => Some(MatchAccuracyMethod::Domain),
            _ => None,
        }
    }

    fn preferences(&self) -> (AutomationPreference, AutomationPreference) {
        let pick = |never: bool, always: bool| match (never, always) {
            (true, _) => AutomationPreference::Never,
            (false, true) => AutomationPreference::Always,
            (false, false) => AutomationPreference::UseDefault,
        };
        (
            pick(self.never_auto_fill, self.always_auto_fill),
            pick(self.never_auto_submit, self.always_auto_submit),
        )
    }

    /// Upgrade to the current shape. Every field gets a fresh identity.
    pub fn into_current(self, default_accuracy: MatchAccuracyMethod) -> EntryConfig {
        let mut matcher_configs = vec![EntryMatcherConfig::url(
            self.stored_accuracy().unwrap_or(default_accuracy),
        )];
        if self.hide {
            matcher_configs.push(EntryMatcherConfig::hide());
        }

        let (autofill, autosubmit) = self.preferences();
        let mut config = EntryConfig {
            matcher_configs,
            fields: self.form_field_list.into_iter().map(upgrade_field).collect(),
            behaviour: None,
            http_realm: self.http_realm.filter(|realm| !realm.is_empty()),
            alt_urls: self.alt_urls,
            blocked_urls: self.blocked_urls,
            reg_ex_urls: self.reg_ex_urls,
            reg_ex_blocked_urls: self.reg_ex_blocked_urls,
        };
        config.set_behaviour(derive_state(autofill, autosubmit));
        config
    }
}

fn upgrade_field(legacy: LegacyFormField) -> Field {
    let standard_path = match (legacy.field_type, legacy.value.as_deref()) {
        (LegacyFieldType::Username, Some(USERNAME_TOKEN)) => Some(VALUE_PATH_USERNAME),
        (LegacyFieldType::Password, Some(PASSWORD_TOKEN)) => Some(VALUE_PATH_PASSWORD),
        _ => None,
    };

    let matcher = FieldMatcherConfig::for_single_client_match(
        legacy.id.as_deref(),
        legacy.name.as_deref(),
        Some(legacy.field_type.html_type()),
        None,
    );

    let (name, value, value_path) = match standard_path {
        Some(path) => (None, None, path.to_string()),
        None => (
            legacy.display_name.or(legacy.name),
            legacy.value.filter(|v| !v.is_empty()),
            VALUE_PATH_LITERAL.to_string(),
        ),
    };

    Field {
        uuid: new_field_uuid(),
        name,
        value,
        value_path,
        field_type: legacy.field_type.field_type(),
        page: legacy.page.max(1),
        placeholder_handling: legacy
            .placeholder_handling
            .filter(|ph| *ph != PlaceholderHandling::Default),
        matcher_configs: vec![matcher],
    }
}
