//! Entry Automation Core Library
//!
//! Configuration engine deciding how a stored password entry takes part in
//! browser form automation:
//! - **entry_config**: the per-entry config model, legacy upgrade and normalization
//! - **url_matcher**: whether an entry applies to a page URL
//! - **field_matcher**: which DOM element each configured field binds to
//! - **behaviour**: autofill/autosubmit preferences and their combined state
//! - **field_value**: the runtime value of each field
//! - **persistence**: whether a changed config needs to be written back
//! - **session**: staged editing of one entry's config
//!
//! This library accepts data as JSON and returns results as JSON. Hosts own
//! the entry storage and the page DOM; they hand snapshots in and get
//! decisions back.
//!
//! # Example (conceptual)
//! ```ignore
//! // Which entries apply to this page?
//! let entries = read_entry_configs_as_json(db);
//! let matches = match_entries_json(entries_for("https://accounts.example.com"));
//!
//! // Which inputs do they fill, and with what?
//! let bindings = bind_fields_json(fields_and_page_inputs);
//! let values = resolve_fields_json(fields_and_entry_values);
//! ```

pub mod behaviour;
pub mod defaults;
pub mod entry_config;
pub mod error;
pub mod field_matcher;
pub mod field_value;
pub mod persistence;
pub mod session;
pub mod url_matcher;

pub use behaviour::{derive_inputs, derive_state, AutomationPreference, BehaviourInputs};
pub use defaults::AutomationDefaults;
pub use entry_config::{
    normalize, normalize_json, EntryAutomationBehaviour, EntryConfig, Field, MatchAccuracyMethod,
    RawEntryConfig, StoredEntryConfig, UrlListRole,
};
pub use error::{AutomationError, AutomationResult, Diagnostic};
pub use field_matcher::{
    bind_field, bind_fields, bind_fields_json, resolve_binding, DomField, FieldBinding,
    SelectorEngine, SimpleSelectorEngine,
};
pub use field_value::{
    describe_field, resolve_field, resolve_fields, resolve_fields_json, EntryPlaceholderExpander,
    PlaceholderExpander, ResolvedField,
};
pub use persistence::{maybe_persist, maybe_persist_json, WriteDecision, CONFIG_STORAGE_KEY};
pub use session::{CommitOutcome, EditSession, FieldDraft};
pub use url_matcher::{match_entries, match_entries_json, matches, UrlMatchOutcome};

// WASM bindings
#[cfg(feature = "wasm")]
pub mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::*;

// C FFI exports for native hosts
#[cfg(feature = "ffi")]
pub mod ffi;
