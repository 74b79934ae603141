//! Database-wide defaults consumed by the normalizer and the value resolver.

use serde::{Deserialize, Serialize};

use crate::entry_config::{FieldType, MatchAccuracyMethod, PlaceholderHandling};

/// Defaults supplied by the host for the database an entry lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutomationDefaults {
    /// Accuracy given to entries that have never chosen one
    #[serde(default = "default_match_accuracy")]
    pub default_match_accuracy: MatchAccuracyMethod,
    /// Placeholder handling for fields left at `Default`
    #[serde(default = "default_placeholder_handling")]
    pub default_placeholder_handling: PlaceholderHandling,
}

fn default_match_accuracy() -> MatchAccuracyMethod {
    MatchAccuracyMethod::Domain
}

fn default_placeholder_handling() -> PlaceholderHandling {
    PlaceholderHandling::Enabled
}

impl Default for AutomationDefaults {
    fn default() -> Self {
        Self {
            default_match_accuracy: default_match_accuracy(),
            default_placeholder_handling: default_placeholder_handling(),
        }
    }
}

impl AutomationDefaults {
    /// Effective placeholder handling for a field, never `Default`.
    ///
    /// Password and toggle fields only expand when explicitly enabled so that
    /// templated secrets are not substituted by accident.
    pub fn placeholder_handling_for(
        &self,
        field_type: FieldType,
        stored: Option<PlaceholderHandling>,
    ) -> PlaceholderHandling {
        match stored.unwrap_or_default() {
            PlaceholderHandling::Default => match field_type {
                FieldType::Password | FieldType::Toggle => PlaceholderHandling::Disabled,
                _ => match self.default_placeholder_handling {
                    PlaceholderHandling::Default => PlaceholderHandling::Enabled,
                    explicit => explicit,
                },
            },
            explicit => explicit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_json() {
        let defaults: AutomationDefaults = serde_json::from_str("{}").unwrap();
        assert_eq!(defaults, AutomationDefaults::default());
        assert_eq!(defaults.default_match_accuracy, MatchAccuracyMethod::Domain);
    }

    #[test]
    fn test_secret_fields_default_to_disabled() {
        let defaults = AutomationDefaults::default();
        assert_eq!(
            defaults.placeholder_handling_for(FieldType::Password, None),
            PlaceholderHandling::Disabled
        );
        assert_eq!(
            defaults.placeholder_handling_for(FieldType::Toggle, Some(PlaceholderHandling::Default)),
            PlaceholderHandling::Disabled
        );
        assert_eq!(
            defaults.placeholder_handling_for(FieldType::Password, Some(PlaceholderHandling::Enabled)),
            PlaceholderHandling::Enabled
        );
    }

    #[test]
    fn test_text_fields_follow_database_default() {
        let mut defaults = AutomationDefaults::default();
        assert_eq!(
            defaults.placeholder_handling_for(FieldType::Text, None),
            PlaceholderHandling::Enabled
        );

        defaults.default_placeholder_handling = PlaceholderHandling::Disabled;
        assert_eq!(
            defaults.placeholder_handling_for(FieldType::Text, None),
            PlaceholderHandling::Disabled
        );
        assert_eq!(
            defaults.placeholder_handling_for(FieldType::Text, Some(PlaceholderHandling::Enabled)),
            PlaceholderHandling::Enabled
        );
    }
}
