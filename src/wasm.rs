//! WASM bindings for browser extension hosts.

use wasm_bindgen::prelude::*;

use crate::entry_config::{normalize, NormalizeInput, NormalizeOutput, RawEntryConfig};
use crate::field_matcher::{bind_fields, FieldMatcherInput, SimpleSelectorEngine};
use crate::field_value::{resolve_fields, EntryPlaceholderExpander, ResolveInput};
use crate::url_matcher::{match_entries, UrlMatcherInput};

/// Initialize panic hook for better error messages.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

fn parse<T: serde::de::DeserializeOwned>(input: JsValue) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(input)
        .map_err(|e| JsValue::from_str(&format!("Failed to parse input: {}", e)))
}

fn render<T: serde::Serialize>(output: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(output)
        .map_err(|e| JsValue::from_str(&format!("Failed to serialize output: {}", e)))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Entry Config WASM Bindings
// ═══════════════════════════════════════════════════════════════════════════════

/// Normalize an entry's stored slots.
///
/// Takes a JsValue (NormalizeInput) and returns a JsValue (NormalizeOutput).
#[wasm_bindgen(js_name = normalizeEntryConfig)]
pub fn normalize_entry_config_js(input: JsValue) -> Result<JsValue, JsValue> {
    let input: NormalizeInput = parse(input)?;
    let raw = RawEntryConfig::from_stored(&input.stored)
        .map_err(|e| JsValue::from_str(&format!("Normalize failed: {}", e)))?;
    let upgraded_from_legacy = matches!(raw, RawEntryConfig::Legacy(_));
    render(&NormalizeOutput {
        config: normalize(raw, input.defaults.default_match_accuracy),
        upgraded_from_legacy,
    })
}

/// Normalize using JSON strings (alternative API).
#[wasm_bindgen(js_name = normalizeEntryConfigJson)]
pub fn normalize_entry_config_json_js(input_json: &str) -> Result<String, JsValue> {
    crate::entry_config::normalize_json(input_json)
        .map_err(|e| JsValue::from_str(&format!("Normalize failed: {}", e)))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Matching WASM Bindings
// ═══════════════════════════════════════════════════════════════════════════════

/// Filter entries for a page URL.
///
/// Takes a JsValue (UrlMatcherInput) and returns a JsValue (UrlMatcherOutput).
#[wasm_bindgen(js_name = matchEntries)]
pub fn match_entries_js(input: JsValue) -> Result<JsValue, JsValue> {
    let input: UrlMatcherInput = parse(input)?;
    render(&match_entries(&input))
}

#[wasm_bindgen(js_name = matchEntriesJson)]
pub fn match_entries_json_js(input_json: &str) -> Result<String, JsValue> {
    crate::url_matcher::match_entries_json(input_json)
        .map_err(|e| JsValue::from_str(&format!("Match failed: {}", e)))
}

/// Bind configured fields to page inputs.
///
/// Takes a JsValue (FieldMatcherInput) and returns a JsValue (FieldMatcherOutput).
#[wasm_bindgen(js_name = bindFields)]
pub fn bind_fields_js(input: JsValue) -> Result<JsValue, JsValue> {
    let input: FieldMatcherInput = parse(input)?;
    render(&bind_fields(&input, &SimpleSelectorEngine))
}

#[wasm_bindgen(js_name = bindFieldsJson)]
pub fn bind_fields_json_js(input_json: &str) -> Result<String, JsValue> {
    crate::field_matcher::bind_fields_json(input_json)
        .map_err(|e| JsValue::from_str(&format!("Binding failed: {}", e)))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Field Value & Persistence WASM Bindings
// ═══════════════════════════════════════════════════════════════════════════════

/// Resolve the runtime values of an entry's fields.
///
/// Takes a JsValue (ResolveInput) and returns a JsValue (ResolveOutput).
#[wasm_bindgen(js_name = resolveFields)]
pub fn resolve_fields_js(input: JsValue) -> Result<JsValue, JsValue> {
    let input: ResolveInput = parse(input)?;
    render(&resolve_fields(&input, &EntryPlaceholderExpander))
}

#[wasm_bindgen(js_name = resolveFieldsJson)]
pub fn resolve_fields_json_js(input_json: &str) -> Result<String, JsValue> {
    crate::field_value::resolve_fields_json(input_json)
        .map_err(|e| JsValue::from_str(&format!("Resolve failed: {}", e)))
}

/// Decide whether an edited config must be written back.
///
/// Takes a JSON string (PersistInput) and returns a JSON string (WriteDecision).
#[wasm_bindgen(js_name = maybePersistJson)]
pub fn maybe_persist_json_js(input_json: &str) -> Result<String, JsValue> {
    crate::persistence::maybe_persist_json(input_json)
        .map_err(|e| JsValue::from_str(&format!("Change detection failed: {}", e)))
}

/// Key of the entry storage slot holding the config JSON.
#[wasm_bindgen(js_name = configStorageKey)]
pub fn config_storage_key() -> String {
    crate::persistence::CONFIG_STORAGE_KEY.to_string()
}
