//! C FFI exports for native hosts.
//!
//! These functions provide a C-compatible interface for calling Rust functions
//! from a password manager plugin. All functions use JSON strings for
//! input/output to simplify marshalling.

use std::ffi::{c_char, CStr, CString};
use std::ptr;

use crate::entry_config::normalize_json;
use crate::error::AutomationResult;
use crate::field_matcher::bind_fields_json;
use crate::field_value::resolve_fields_json;
use crate::persistence::{maybe_persist_json, CONFIG_STORAGE_KEY};
use crate::url_matcher::match_entries_json;

/// Shared body of every JSON-in/JSON-out export.
///
/// # Safety
///
/// `input_json` must be null or a valid null-terminated C string.
unsafe fn call_json(
    input_json: *const c_char,
    operation: &str,
    run: fn(&str) -> AutomationResult<String>,
) -> *mut c_char {
    if input_json.is_null() {
        return ptr::null_mut();
    }

    let c_str = match CStr::from_ptr(input_json).to_str() {
        Ok(s) => s,
        Err(_) => return ptr::null_mut(),
    };

    match run(c_str) {
        Ok(json) => string_to_c_char(json),
        Err(e) => create_error_response(&format!("{} failed: {}", operation, e)),
    }
}

/// Normalize an entry's stored config slots.
///
/// # Safety
///
/// - `input_json` must be a valid null-terminated C string
/// - The returned pointer must be freed by calling `free_string`
///
/// # Returns
///
/// A null-terminated C string containing the JSON result (NormalizeOutput).
/// Returns null on error.
#[no_mangle]
pub unsafe extern "C" fn normalize_entry_config_ffi(input_json: *const c_char) -> *mut c_char {
    call_json(input_json, "Normalize", normalize_json)
}

/// Filter entries for a page URL.
///
/// # Safety
///
/// - `input_json` must be a valid null-terminated C string
/// - The returned pointer must be freed by calling `free_string`
///
/// # Returns
///
/// A null-terminated C string containing the JSON result (UrlMatcherOutput).
/// Returns null on error.
#[no_mangle]
pub unsafe extern "C" fn match_entries_ffi(input_json: *const c_char) -> *mut c_char {
    call_json(input_json, "Match", match_entries_json)
}

/// Bind configured fields to page inputs.
///
/// # Safety
///
/// - `input_json` must be a valid null-terminated C string
/// - The returned pointer must be freed by calling `free_string`
#[no_mangle]
pub unsafe extern "C" fn bind_fields_ffi(input_json: *const c_char) -> *mut c_char {
    call_json(input_json, "Binding", bind_fields_json)
}

/// Resolve the runtime values of an entry's fields.
///
/// # Safety
///
/// - `input_json` must be a valid null-terminated C string
/// - The returned pointer must be freed by calling `free_string`
#[no_mangle]
pub unsafe extern "C" fn resolve_fields_ffi(input_json: *const c_char) -> *mut c_char {
    call_json(input_json, "Resolve", resolve_fields_json)
}

/// Decide whether an edited config must be written back.
///
/// # Safety
///
/// - `input_json` must be a valid null-terminated C string
/// - The returned pointer must be freed by calling `free_string`
///
/// # Returns
///
/// A null-terminated C string containing the JSON result (WriteDecision).
#[no_mangle]
pub unsafe extern "C" fn maybe_persist_ffi(input_json: *const c_char) -> *mut c_char {
    call_json(input_json, "Change detection", maybe_persist_json)
}

/// Get the key of the entry storage slot holding the config JSON.
///
/// # Safety
///
/// - The returned pointer must be freed by calling `free_string`
#[no_mangle]
pub extern "C" fn config_storage_key_ffi() -> *mut c_char {
    string_to_c_char(CONFIG_STORAGE_KEY.to_string())
}

/// Free a string that was allocated by Rust.
///
/// # Safety
///
/// - `s` must be a pointer that was returned by one of the FFI functions
/// - This function must only be called once per pointer
/// - After calling this function, the pointer is invalid
#[no_mangle]
pub unsafe extern "C" fn free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}

/// Convert a Rust string to a C string pointer.
fn string_to_c_char(s: String) -> *mut c_char {
    match CString::new(s) {
        Ok(c_string) => c_string.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

/// Create an error response JSON string.
fn create_error_response(message: &str) -> *mut c_char {
    let error_json = serde_json::json!({ "success": false, "error": message }).to_string();
    string_to_c_char(error_json)
}
