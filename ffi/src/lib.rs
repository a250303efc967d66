//! C-ABI wrapper around `social-core`.
//!
//! # Overview
//! Exposes the request builder, the response parser and the password
//! validation engine through `extern "C"` functions, so a presentation layer
//! written in any language with a C FFI can drive the social API without
//! linking to Rust's async runtime.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - The four verbs (`fetch`, `submit`, `replace`, `remove`) plus `upload`
//!   mirror `ApiClient` 1:1. Query maps and bodies come in as JSON text.
//! - `social_parse_response` returns one `FfiApiResult` envelope whose
//!   payload is JSON text.
//! - The C caller owns all returned pointers and must call the matching
//!   `social_free_*` function to release them.

pub mod types;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::catch_unwind;

use serde_json::Value;
use social_core::{ApiClient, HttpResponse, QueryParams, QueryValue};

use types::*;

/// Borrow a C string as UTF-8. `None` for null or invalid UTF-8.
fn c_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(ptr) }.to_str().ok()
}

/// Decode a JSON object of scalars into query parameters.
fn query_from_json(raw: &str) -> Option<QueryParams> {
    let map: serde_json::Map<String, Value> = serde_json::from_str(raw).ok()?;
    let mut params = QueryParams::new();
    for (key, value) in map {
        let value = match value {
            Value::String(s) => QueryValue::from(s),
            Value::Bool(b) => QueryValue::from(b),
            Value::Number(n) => match (n.as_i64(), n.as_u64()) {
                (Some(i), _) => QueryValue::from(i),
                (None, Some(u)) => QueryValue::from(u),
                _ => QueryValue::Text(n.to_string()),
            },
            _ => return None,
        };
        params.set(key, value);
    }
    Some(params)
}

/// Decode an optional JSON body. `Ok(None)` for a null pointer.
fn body_from_json(ptr: *const c_char) -> Result<Option<Value>, ()> {
    if ptr.is_null() {
        return Ok(None);
    }
    let raw = c_str(ptr).ok_or(())?;
    serde_json::from_str(raw).map(Some).map_err(|_| ())
}

fn into_c_string(s: String) -> *mut c_char {
    CString::new(s)
        .map(CString::into_raw)
        .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a new `ApiClient` bound to `base_url`.
///
/// Returns null if `base_url` is null, empty, not an absolute URL, or if an
/// internal panic occurs. The caller must free the returned pointer with
/// `social_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn social_client_new(base_url: *const c_char) -> *mut FfiApiClient {
    catch_unwind(|| {
        let Some(url) = c_str(base_url) else {
            return std::ptr::null_mut();
        };
        match ApiClient::new(url) {
            Ok(client) => Box::into_raw(Box::new(FfiApiClient { inner: client })),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a client created by `social_client_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn social_client_free(client: *mut FfiApiClient) {
    if !client.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(client) });
        });
    }
}

// ---------------------------------------------------------------------------
// Build request functions
// ---------------------------------------------------------------------------

/// Build a GET request for `path`.
///
/// `query_json` may be null (no query string) or a JSON object whose values
/// are strings, numbers or booleans. Returns null if `client` or `path` is
/// null, or if `query_json` is not such an object.
/// The caller must free the returned pointer with `social_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn social_build_fetch(
    client: *const FfiApiClient,
    path: *const c_char,
    query_json: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let Some(path) = c_str(path) else {
            return std::ptr::null_mut();
        };
        let params = if query_json.is_null() {
            None
        } else {
            match c_str(query_json).and_then(query_from_json) {
                Some(p) => Some(p),
                None => return std::ptr::null_mut(),
            }
        };
        FfiHttpRequest::from_core(client.inner.build_fetch(path, params.as_ref()))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build a POST request. A null `body_json` sends `{}`.
///
/// Returns null if `client` or `path` is null or `body_json` is not JSON.
#[unsafe(no_mangle)]
pub extern "C" fn social_build_submit(
    client: *const FfiApiClient,
    path: *const c_char,
    body_json: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let (Some(path), Ok(body)) = (c_str(path), body_from_json(body_json)) else {
            return std::ptr::null_mut();
        };
        match client.inner.build_submit(path, body.as_ref()) {
            Ok(req) => FfiHttpRequest::from_core(req),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build a PUT request. A null `body_json` sends `{}`.
///
/// Returns null if `client` or `path` is null or `body_json` is not JSON.
#[unsafe(no_mangle)]
pub extern "C" fn social_build_replace(
    client: *const FfiApiClient,
    path: *const c_char,
    body_json: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let (Some(path), Ok(body)) = (c_str(path), body_from_json(body_json)) else {
            return std::ptr::null_mut();
        };
        match client.inner.build_replace(path, body.as_ref()) {
            Ok(req) => FfiHttpRequest::from_core(req),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build a DELETE request.
///
/// Returns null if `client` or `path` is null.
#[unsafe(no_mangle)]
pub extern "C" fn social_build_remove(
    client: *const FfiApiClient,
    path: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        match c_str(path) {
            Some(path) => FfiHttpRequest::from_core(client.inner.build_remove(path)),
            None => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build a raw PUT of `content_len` bytes to an absolute upload URL.
///
/// `content` may be null only when `content_len` is 0. `content_type` may be
/// null, in which case `application/octet-stream` is sent.
#[unsafe(no_mangle)]
pub extern "C" fn social_build_upload(
    target_url: *const c_char,
    content: *const u8,
    content_len: u32,
    content_type: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        let Some(url) = c_str(target_url) else {
            return std::ptr::null_mut();
        };
        let bytes = if content_len == 0 {
            Vec::new()
        } else if content.is_null() {
            return std::ptr::null_mut();
        } else {
            unsafe { std::slice::from_raw_parts(content, content_len as usize) }.to_vec()
        };
        let req = social_core::client::build_upload(url, bytes, c_str(content_type));
        FfiHttpRequest::from_core(req)
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Parse response
// ---------------------------------------------------------------------------

/// Convert an `FfiHttpResponse` to a core `HttpResponse`.
fn ffi_response_to_core(resp: &FfiHttpResponse) -> HttpResponse {
    HttpResponse {
        status: resp.status,
        headers: Vec::new(),
        body: c_str(resp.body).unwrap_or("").to_string(),
    }
}

/// Interpret an HTTP response.
///
/// Any 2xx status succeeds; the body is returned as compact JSON in `data`
/// (`data_tag = Json`), or `data_tag = None` when the body is empty.
#[unsafe(no_mangle)]
pub extern "C" fn social_parse_response(response: *const FfiHttpResponse) -> *mut FfiApiResult {
    catch_unwind(|| {
        if response.is_null() {
            return FfiApiResult::null_arg("response");
        }
        let resp = unsafe { &*response };
        let status = resp.status;
        match social_core::client::parse_response::<Value>(ffi_response_to_core(resp)) {
            Ok(value) => FfiApiResult::ok_json(value, status),
            Err(e) => FfiApiResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiApiResult::panic("panic in social_parse_response"))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a password candidate against the default policy.
///
/// Returns JSON: `null` when valid, otherwise an object mapping each failed
/// rule to `true` or, for `minLength`, `{"requiredLength","actualLength"}`.
/// A null or non-UTF-8 `candidate` is treated as empty. Free with
/// `social_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn social_validate_password(candidate: *const c_char) -> *mut c_char {
    catch_unwind(|| {
        let outcome = social_core::validate_password(c_str(candidate).unwrap_or(""));
        match serde_json::to_string(&outcome) {
            Ok(json) => into_c_string(json),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// The password rule catalog as a JSON array of `{"key","label"}`.
/// Free with `social_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn social_password_rules() -> *mut c_char {
    catch_unwind(|| match serde_json::to_string(&social_core::password_rules()) {
        Ok(json) => into_c_string(json),
        Err(_) => std::ptr::null_mut(),
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiHttpRequest` returned by any `social_build_*` function.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn social_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let req = unsafe { Box::from_raw(req) };
        if !req.url.is_null() {
            drop(unsafe { CString::from_raw(req.url) });
        }
        if !req.body.is_null() {
            drop(unsafe {
                Box::from_raw(std::ptr::slice_from_raw_parts_mut(req.body, req.body_len as usize))
            });
        }
        if !req.headers.is_null() && req.headers_len > 0 {
            let headers = unsafe {
                Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                    req.headers,
                    req.headers_len as usize,
                ))
            };
            for h in headers.iter() {
                if !h.key.is_null() {
                    drop(unsafe { CString::from_raw(h.key) });
                }
                if !h.value.is_null() {
                    drop(unsafe { CString::from_raw(h.value) });
                }
            }
        }
    });
}

/// Free an `FfiApiResult` returned by `social_parse_response`.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn social_free_result(result: *mut FfiApiResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        if !result.error_message.is_null() {
            drop(unsafe { CString::from_raw(result.error_message) });
        }
        if !result.data.is_null() {
            drop(unsafe { CString::from_raw(result.data) });
        }
    });
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn social_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { CString::from_raw(s) });
        });
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
