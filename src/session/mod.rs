//! Editing an entry's configuration.
//!
//! An [`EditSession`] owns a normalized copy of one entry's config together
//! with staged storage slots. Each mutation re-runs change detection against
//! the staged slots, so a host can inspect what would be written at any
//! point. Nothing reaches the host's real storage until [`EditSession::commit`]
//! hands the slots back.

use serde::{Deserialize, Serialize};

use crate::behaviour::{derive_inputs, AutomationPreference, BehaviourInputs};
use crate::defaults::AutomationDefaults;
use crate::entry_config::{
    new_field_uuid, normalize, EntryAutomationBehaviour, EntryConfig, EntryMatcherConfig,
    EntryMatcherType, Field, FieldMatcherConfig, FieldType, MatchAccuracyMethod,
    PlaceholderHandling, RawEntryConfig, StoredEntryConfig, UrlListRole, VALUE_PATH_LITERAL,
};
use crate::error::{AutomationError, AutomationResult};
use crate::persistence::{maybe_persist, WriteDecision};

/// User input describing a field, as collected by a field editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDraft {
    /// DOM name attribute to match
    #[serde(default)]
    pub name: Option<String>,
    /// DOM id attribute to match
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub html_type: Option<String>,
    #[serde(default)]
    pub query_selector: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default = "default_draft_page")]
    pub page: i32,
    #[serde(default)]
    pub placeholder_handling: PlaceholderHandling,
}

fn default_draft_page() -> i32 {
    1
}

impl FieldDraft {
    fn stored_value(&self) -> Option<String> {
        self.value.clone().filter(|v| !v.is_empty())
    }

    fn stored_placeholder_handling(&self) -> Option<PlaceholderHandling> {
        Some(self.placeholder_handling).filter(|h| *h != PlaceholderHandling::Default)
    }

    fn matcher(&self) -> FieldMatcherConfig {
        FieldMatcherConfig::for_single_client_match(
            self.id.as_deref(),
            self.name.as_deref(),
            self.html_type.as_deref(),
            self.query_selector.as_deref(),
        )
    }
}

/// Result of closing a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitOutcome {
    /// Slots the host should store for the entry
    pub stored: StoredEntryConfig,
    /// What changed relative to the slots the session was opened with
    pub decision: WriteDecision,
}

pub struct EditSession {
    config: EntryConfig,
    original: StoredEntryConfig,
    staged: StoredEntryConfig,
    defaults: AutomationDefaults,
    read_only: bool,
    last_decision: WriteDecision,
}

impl EditSession {
    /// Open a session over an entry's stored slots.
    pub fn open(stored: StoredEntryConfig, defaults: AutomationDefaults) -> AutomationResult<Self> {
        let raw = RawEntryConfig::from_stored(&stored)?;
        let config = normalize(raw, defaults.default_match_accuracy);
        Ok(Self {
            config,
            staged: stored.clone(),
            original: stored,
            defaults,
            read_only: false,
            last_decision: WriteDecision::Skip,
        })
    }

    /// Open a session that only allows inspection.
    pub fn open_read_only(
        stored: StoredEntryConfig,
        defaults: AutomationDefaults,
    ) -> AutomationResult<Self> {
        let mut session = Self::open(stored, defaults)?;
        session.read_only = true;
        Ok(session)
    }

    pub fn config(&self) -> &EntryConfig {
        &self.config
    }

    pub fn staged(&self) -> &StoredEntryConfig {
        &self.staged
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Decision taken by the most recent change detection run.
    pub fn last_decision(&self) -> &WriteDecision {
        &self.last_decision
    }

    pub fn behaviour_inputs(&self) -> BehaviourInputs {
        derive_inputs(self.config.effective_behaviour())
    }

    /// Run `edit` against the config, then refresh the staged slots.
    ///
    /// `edit` must validate before changing anything: an error leaves the
    /// config as it was.
    fn mutate<R>(
        &mut self,
        edit: impl FnOnce(&mut EntryConfig) -> AutomationResult<R>,
    ) -> AutomationResult<R> {
        if self.read_only {
            return Err(AutomationError::ReadOnlySession);
        }
        let result = edit(&mut self.config)?;
        self.sync()?;
        Ok(result)
    }

    fn sync(&mut self) -> AutomationResult<()> {
        let decision = maybe_persist(
            &self.config,
            self.staged.current_json.as_deref(),
            self.staged.legacy_json.is_some(),
            self.defaults.default_match_accuracy,
        )?;
        decision.apply(&mut self.staged);
        self.last_decision = decision;
        Ok(())
    }

    /// Add or remove the entry's `Hide` matcher.
    pub fn set_hidden(&mut self, hidden: bool) -> AutomationResult<()> {
        self.mutate(|config| {
            config
                .matcher_configs
                .retain(|mc| mc.matcher_type != EntryMatcherType::Hide);
            if hidden {
                config.matcher_configs.push(EntryMatcherConfig::hide());
            }
            Ok(())
        })
    }

    pub fn set_url_match_method(&mut self, method: MatchAccuracyMethod) -> AutomationResult<()> {
        self.mutate(|config| {
            match config
                .matcher_configs
                .iter_mut()
                .find(|mc| mc.matcher_type == EntryMatcherType::Url)
            {
                Some(matcher) => matcher.url_match_method = Some(method),
                None => config.matcher_configs.push(EntryMatcherConfig::url(method)),
            }
            Ok(())
        })
    }

    /// Set the HTTP auth realm. An empty realm clears it.
    pub fn set_http_realm(&mut self, realm: Option<&str>) -> AutomationResult<()> {
        let realm = realm.filter(|r| !r.is_empty()).map(String::from);
        self.mutate(|config| {
            config.http_realm = realm;
            Ok(())
        })
    }

    /// Add `url` to every list in `roles`, skipping lists that already hold it.
    pub fn add_url(&mut self, url: &str, roles: &[UrlListRole]) -> AutomationResult<()> {
        let url = checked_url(url)?;
        self.mutate(|config| {
            for role in roles {
                let list = config.url_list_mut(*role);
                if !list.iter().any(|u| u == url) {
                    list.push(url.to_string());
                }
            }
            Ok(())
        })
    }

    /// Remove `url` from one list. Returns whether it was present.
    pub fn remove_url(&mut self, role: UrlListRole, url: &str) -> AutomationResult<bool> {
        self.mutate(|config| {
            let list = config.url_list_mut(role);
            let before = list.len();
            list.retain(|u| u != url);
            Ok(list.len() != before)
        })
    }

    /// Replace `old` in one list with `new_url` placed in `new_roles`.
    pub fn replace_url(
        &mut self,
        role: UrlListRole,
        old: &str,
        new_url: &str,
        new_roles: &[UrlListRole],
    ) -> AutomationResult<()> {
        let new_url = checked_url(new_url)?;
        self.mutate(|config| {
            if !config.url_list(role).iter().any(|u| u == old) {
                return Err(AutomationError::General(format!("URL not listed: {}", old)));
            }
            config.url_list_mut(role).retain(|u| u != old);
            for new_role in new_roles {
                let list = config.url_list_mut(*new_role);
                if !list.iter().any(|u| u == new_url) {
                    list.push(new_url.to_string());
                }
            }
            Ok(())
        })
    }

    /// Add a literal field. Returns the new field's uuid.
    pub fn add_field(&mut self, draft: FieldDraft) -> AutomationResult<String> {
        self.mutate(|config| {
            let uuid = new_field_uuid();
            config.fields.push(Field {
                uuid: uuid.clone(),
                name: Some(uuid.clone()),
                value: draft.stored_value(),
                value_path: VALUE_PATH_LITERAL.to_string(),
                field_type: draft.field_type,
                page: draft.page.max(1),
                placeholder_handling: draft.stored_placeholder_handling(),
                matcher_configs: vec![draft.matcher()],
            });
            Ok(uuid)
        })
    }

    /// Replace a field's settings, keeping its identity and value path.
    pub fn edit_field(&mut self, uuid: &str, draft: FieldDraft) -> AutomationResult<()> {
        if uuid.is_empty() {
            return Err(AutomationError::MissingFieldIdentity);
        }
        self.mutate(|config| {
            let field = config
                .fields
                .iter_mut()
                .find(|f| f.uuid == uuid)
                .ok_or_else(|| AutomationError::FieldNotFound(uuid.to_string()))?;

            let name = match field.standard_reference() {
                Some(_) => None,
                None => Some(
                    field
                        .name
                        .clone()
                        .filter(|n| !n.is_empty())
                        .unwrap_or_else(|| field.uuid.clone()),
                ),
            };

            field.name = name;
            field.value = draft.stored_value();
            field.field_type = draft.field_type;
            field.page = draft.page.max(1);
            field.placeholder_handling = draft.stored_placeholder_handling();
            field.matcher_configs = vec![draft.matcher()];
            Ok(())
        })
    }

    /// Remove a field. The standard username and password fields are protected.
    pub fn remove_field(&mut self, uuid: &str) -> AutomationResult<()> {
        if uuid.is_empty() {
            return Err(AutomationError::MissingFieldIdentity);
        }
        self.mutate(|config| {
            let index = config
                .fields
                .iter()
                .position(|f| f.uuid == uuid)
                .ok_or_else(|| AutomationError::FieldNotFound(uuid.to_string()))?;
            if config.fields[index].standard_reference().is_some() {
                return Err(AutomationError::ProtectedField(uuid.to_string()));
            }
            config.fields.remove(index);
            Ok(())
        })
    }

    /// Change the autofill preference. Returns the resulting behaviour.
    pub fn set_autofill(
        &mut self,
        autofill: AutomationPreference,
    ) -> AutomationResult<EntryAutomationBehaviour> {
        let state = self.behaviour_inputs().with_autofill(autofill);
        self.set_behaviour(state)?;
        Ok(state)
    }

    /// Change the autosubmit preference. Returns the resulting behaviour.
    pub fn set_autosubmit(
        &mut self,
        autosubmit: AutomationPreference,
    ) -> AutomationResult<EntryAutomationBehaviour> {
        let state = self.behaviour_inputs().with_autosubmit(autosubmit);
        self.set_behaviour(state)?;
        Ok(state)
    }

    pub fn set_behaviour(&mut self, behaviour: EntryAutomationBehaviour) -> AutomationResult<()> {
        self.mutate(|config| {
            config.set_behaviour(behaviour);
            Ok(())
        })
    }

    /// Close the session and hand back the slots to store.
    ///
    /// A final change detection run upgrades entries opened from the legacy
    /// slot even when nothing was edited.
    pub fn commit(mut self) -> AutomationResult<CommitOutcome> {
        if self.read_only {
            return Ok(CommitOutcome {
                stored: self.original,
                decision: WriteDecision::Skip,
            });
        }
        self.sync()?;

        let decision = match &self.staged.current_json {
            Some(json) if self.staged.current_json != self.original.current_json => {
                WriteDecision::Write {
                    json: json.clone(),
                    remove_legacy: self.original.legacy_json.is_some()
                        && self.staged.legacy_json.is_none(),
                }
            }
            _ => WriteDecision::Skip,
        };
        tracing::debug!(?decision, "edit session committed");
        Ok(CommitOutcome {
            stored: self.staged,
            decision,
        })
    }

    /// Drop every staged change.
    pub fn discard(self) {
        tracing::debug!("edit session discarded");
    }
}

fn checked_url(url: &str) -> AutomationResult<&str> {
    let url = url.trim();
    if url.is_empty() {
        return Err(AutomationError::General("URL must not be empty".to_string()));
    }
    Ok(url)
}
