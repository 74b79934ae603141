//! Field summaries for list views.

use serde::{Deserialize, Serialize};

use super::TOGGLE_ENABLED;
use crate::entry_config::{Field, FieldType, StandardField};

const MASKED_VALUE: &str = "********";

/// One row of an entry's field list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSummary {
    /// First name of the field's custom matcher
    pub name: String,
    /// Value as shown to the user, secrets masked
    pub display_value: String,
    /// First id of the field's custom matcher
    pub id: String,
    pub type_label: String,
    pub page: i32,
}

pub fn describe_field(field: &Field) -> FieldSummary {
    let display_value = match (field.standard_reference(), field.field_type) {
        (Some(StandardField::Username), _) => "KeePass username".to_string(),
        (Some(StandardField::Password), _) => "KeePass password".to_string(),
        (None, FieldType::Toggle) => {
            if field.value.as_deref() == Some(TOGGLE_ENABLED) {
                "Enabled".to_string()
            } else {
                "Disabled".to_string()
            }
        }
        (None, FieldType::Password) => MASKED_VALUE.to_string(),
        (None, _) => field.value.clone().unwrap_or_default(),
    };

    let custom = field.custom_matcher();
    let first = |list: Option<&Vec<String>>| {
        list.and_then(|l| l.first()).cloned().unwrap_or_default()
    };

    FieldSummary {
        name: first(custom.map(|c| &c.names)),
        display_value,
        id: first(custom.map(|c| &c.ids)),
        type_label: field.field_type.label().to_string(),
        page: field.page,
    }
}
