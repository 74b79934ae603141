//! Autofill/autosubmit behaviour combinator.
//!
//! Two independent three-valued preferences project onto one stored
//! [`EntryAutomationBehaviour`] and back. Two promotion rules keep the pair
//! consistent before it is projected:
//! - autofill `Never` forces autosubmit to `Never`
//! - autosubmit `Always` with autofill `UseDefault` promotes autofill to `Always`

use serde::{Deserialize, Serialize};

use crate::entry_config::EntryAutomationBehaviour;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AutomationPreference {
    #[default]
    UseDefault,
    Never,
    Always,
}

use AutomationPreference::{Always, Never, UseDefault};

/// The two preferences as presented to the user for a given behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BehaviourInputs {
    pub autofill: AutomationPreference,
    pub autosubmit: AutomationPreference,
    /// Autofill cannot be changed while autosubmit is forced on
    pub autofill_locked: bool,
    /// Autosubmit cannot be changed while autofill is forced off
    pub autosubmit_locked: bool,
}

/// Apply the promotion rules to a raw preference pair.
pub fn promote(
    autofill: AutomationPreference,
    autosubmit: AutomationPreference,
) -> (AutomationPreference, AutomationPreference) {
    match (autofill, autosubmit) {
        (Never, _) => (Never, Never),
        (UseDefault, Always) => (Always, Always),
        pair => pair,
    }
}

/// Project a preference pair onto the stored behaviour.
pub fn derive_state(
    autofill: AutomationPreference,
    autosubmit: AutomationPreference,
) -> EntryAutomationBehaviour {
    match promote(autofill, autosubmit) {
        (UseDefault, UseDefault) => EntryAutomationBehaviour::Default,
        (UseDefault, Never) => EntryAutomationBehaviour::NeverAutoSubmit,
        (Always, UseDefault) => EntryAutomationBehaviour::AlwaysAutoFill,
        (Always, Always) => EntryAutomationBehaviour::AlwaysAutoFillAlwaysAutoSubmit,
        (Always, Never) => EntryAutomationBehaviour::AlwaysAutoFillNeverAutoSubmit,
        // promote() rewrites every other pair
        (Never, _) => EntryAutomationBehaviour::NeverAutoFillNeverAutoSubmit,
        (UseDefault, Always) => EntryAutomationBehaviour::AlwaysAutoFillAlwaysAutoSubmit,
    }
}

/// Render a stored behaviour back into both preferences.
pub fn derive_inputs(state: EntryAutomationBehaviour) -> BehaviourInputs {
    let (autofill, autosubmit) = match state {
        EntryAutomationBehaviour::Default => (UseDefault, UseDefault),
        EntryAutomationBehaviour::AlwaysAutoFill => (Always, UseDefault),
        EntryAutomationBehaviour::NeverAutoSubmit => (UseDefault, Never),
        EntryAutomationBehaviour::AlwaysAutoFillAlwaysAutoSubmit => (Always, Always),
        EntryAutomationBehaviour::NeverAutoFillNeverAutoSubmit => (Never, Never),
        EntryAutomationBehaviour::AlwaysAutoFillNeverAutoSubmit => (Always, Never),
    };
    BehaviourInputs {
        autofill,
        autosubmit,
        autofill_locked: state == EntryAutomationBehaviour::AlwaysAutoFillAlwaysAutoSubmit,
        autosubmit_locked: state == EntryAutomationBehaviour::NeverAutoFillNeverAutoSubmit,
    }
}

impl BehaviourInputs {
    pub fn from_state(state: EntryAutomationBehaviour) -> Self {
        derive_inputs(state)
    }

    pub fn state(&self) -> EntryAutomationBehaviour {
        derive_state(self.autofill, self.autosubmit)
    }

    /// State after the user changes the autofill preference.
    ///
    /// Leaving `Always` drops a forced autosubmit back to `UseDefault`.
    pub fn with_autofill(&self, autofill: AutomationPreference) -> EntryAutomationBehaviour {
        let autosubmit = match (autofill, self.autosubmit) {
            (UseDefault, Always) => UseDefault,
            (_, current) => current,
        };
        derive_state(autofill, autosubmit)
    }

    /// State after the user changes the autosubmit preference.
    pub fn with_autosubmit(&self, autosubmit: AutomationPreference) -> EntryAutomationBehaviour {
        let autofill = match (self.autofill, autosubmit) {
            (_, Always) => Always,
            (Never, UseDefault) => UseDefault,
            (current, _) => current,
        };
        derive_state(autofill, autosubmit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_STATES: [EntryAutomationBehaviour; 6] = [
        EntryAutomationBehaviour::Default,
        EntryAutomationBehaviour::AlwaysAutoFill,
        EntryAutomationBehaviour::NeverAutoSubmit,
        EntryAutomationBehaviour::AlwaysAutoFillAlwaysAutoSubmit,
        EntryAutomationBehaviour::NeverAutoFillNeverAutoSubmit,
        EntryAutomationBehaviour::AlwaysAutoFillNeverAutoSubmit,
    ];

    #[test]
    fn test_projection_round_trips_every_state() {
        for state in ALL_STATES {
            let inputs = derive_inputs(state);
            assert_eq!(derive_state(inputs.autofill, inputs.autosubmit), state);
            assert_eq!(inputs.state(), state);
        }
    }

    #[test]
    fn test_direct_mapping() {
        assert_eq!(derive_state(UseDefault, UseDefault), EntryAutomationBehaviour::Default);
        assert_eq!(derive_state(UseDefault, Never), EntryAutomationBehaviour::NeverAutoSubmit);
        assert_eq!(derive_state(Always, UseDefault), EntryAutomationBehaviour::AlwaysAutoFill);
        assert_eq!(derive_state(Always, Always), EntryAutomationBehaviour::AlwaysAutoFillAlwaysAutoSubmit);
        assert_eq!(derive_state(Never, Never), EntryAutomationBehaviour::NeverAutoFillNeverAutoSubmit);
        assert_eq!(derive_state(Always, Never), EntryAutomationBehaviour::AlwaysAutoFillNeverAutoSubmit);
    }

    #[test]
    fn test_promotion_rules() {
        // Autosubmit cannot be offered without autofill
        assert_eq!(promote(Never, UseDefault), (Never, Never));
        assert_eq!(promote(Never, Always), (Never, Never));
        assert_eq!(derive_state(Never, UseDefault), EntryAutomationBehaviour::NeverAutoFillNeverAutoSubmit);

        // Autosubmit implies autofill
        assert_eq!(promote(UseDefault, Always), (Always, Always));
        assert_eq!(derive_state(UseDefault, Always), EntryAutomationBehaviour::AlwaysAutoFillAlwaysAutoSubmit);
    }

    #[test]
    fn test_locked_inputs() {
        let forced_on = derive_inputs(EntryAutomationBehaviour::AlwaysAutoFillAlwaysAutoSubmit);
        assert!(forced_on.autofill_locked);
        assert!(!forced_on.autosubmit_locked);

        let forced_off = derive_inputs(EntryAutomationBehaviour::NeverAutoFillNeverAutoSubmit);
        assert!(!forced_off.autofill_locked);
        assert!(forced_off.autosubmit_locked);

        let plain = derive_inputs(EntryAutomationBehaviour::Default);
        assert!(!plain.autofill_locked && !plain.autosubmit_locked);
    }

    #[test]
    fn test_autofill_edits() {
        let never_submit = derive_inputs(EntryAutomationBehaviour::NeverAutoSubmit);
        assert_eq!(never_submit.with_autofill(Always), EntryAutomationBehaviour::AlwaysAutoFillNeverAutoSubmit);
        assert_eq!(never_submit.with_autofill(Never), EntryAutomationBehaviour::NeverAutoFillNeverAutoSubmit);

        let always_both = derive_inputs(EntryAutomationBehaviour::AlwaysAutoFillAlwaysAutoSubmit);
        assert_eq!(always_both.with_autofill(UseDefault), EntryAutomationBehaviour::Default);

        let always_fill_never_submit = derive_inputs(EntryAutomationBehaviour::AlwaysAutoFillNeverAutoSubmit);
        assert_eq!(always_fill_never_submit.with_autofill(UseDefault), EntryAutomationBehaviour::NeverAutoSubmit);
    }

    #[test]
    fn test_autosubmit_edits() {
        let default = derive_inputs(EntryAutomationBehaviour::Default);
        assert_eq!(default.with_autosubmit(Always), EntryAutomationBehaviour::AlwaysAutoFillAlwaysAutoSubmit);
        assert_eq!(default.with_autosubmit(Never), EntryAutomationBehaviour::NeverAutoSubmit);

        let always_fill = derive_inputs(EntryAutomationBehaviour::AlwaysAutoFill);
        assert_eq!(always_fill.with_autosubmit(Never), EntryAutomationBehaviour::AlwaysAutoFillNeverAutoSubmit);
        assert_eq!(always_fill.with_autosubmit(UseDefault), EntryAutomationBehaviour::AlwaysAutoFill);

        let never_both = derive_inputs(EntryAutomationBehaviour::NeverAutoFillNeverAutoSubmit);
        assert_eq!(never_both.with_autosubmit(UseDefault), EntryAutomationBehaviour::Default);
        assert_eq!(never_both.with_autosubmit(Always), EntryAutomationBehaviour::AlwaysAutoFillAlwaysAutoSubmit);
    }
}
