//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type but uses C-compatible representations:
//! `*mut c_char` instead of `String`, pointer plus length instead of `Vec`,
//! and tagged enums with explicit discriminants. Parsed payloads cross the
//! boundary as JSON text so the C side picks its own decoder. Conversion
//! functions live here to keep `lib.rs` focused on the `extern "C"` surface.

use std::ffi::CString;
use std::os::raw::c_char;

use social_core::{HttpMethod, TransportError};

/// Opaque handle to an `ApiClient`. C callers receive a pointer to this
/// and pass it back into every build function.
pub struct FfiApiClient {
    pub(crate) inner: social_core::ApiClient,
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
#[repr(C)]
#[derive(Debug, PartialEq, Eq)]
pub enum FfiHttpMethod {
    Get = 0,
    Post = 1,
    Put = 2,
    Delete = 3,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
            HttpMethod::Post => FfiHttpMethod::Post,
            HttpMethod::Put => FfiHttpMethod::Put,
            HttpMethod::Delete => FfiHttpMethod::Delete,
        }
    }
}

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// An HTTP request described as C-compatible plain data.
///
/// `url` is absolute and includes the query string. `body` is null when the
/// request has no body; otherwise it points at `body_len` bytes (JSON text
/// for submit/replace, raw content for uploads).
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub url: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    pub body: *mut u8,
    pub body_len: u32,
}

/// A length as carried across the boundary. `None` if it exceeds `u32`.
pub(crate) fn c_len(len: usize) -> Option<u32> {
    u32::try_from(len).ok()
}

impl FfiHttpRequest {
    /// Convert a core `HttpRequest` into a heap-allocated `FfiHttpRequest`.
    ///
    /// Returns null when the body length or header count does not fit in
    /// `u32`, or a string contains an interior NUL. Nothing leaks in that case.
    pub(crate) fn from_core(req: social_core::HttpRequest) -> *mut Self {
        let body_len = match req.body.as_ref().map(|b| c_len(b.len())) {
            Some(Some(len)) => len,
            Some(None) => return std::ptr::null_mut(),
            None => 0,
        };
        let Some(headers_len) = c_len(req.headers.len()) else {
            return std::ptr::null_mut();
        };
        let Ok(url) = CString::new(req.url) else {
            return std::ptr::null_mut();
        };
        let Ok(header_strings) = req
            .headers
            .into_iter()
            .map(|(k, v)| Ok((CString::new(k)?, CString::new(v)?)))
            .collect::<Result<Vec<_>, std::ffi::NulError>>()
        else {
            return std::ptr::null_mut();
        };

        let body = match req.body {
            Some(b) => Box::into_raw(b.into_boxed_slice()) as *mut u8,
            None => std::ptr::null_mut(),
        };

        let headers = if header_strings.is_empty() {
            std::ptr::null_mut()
        } else {
            let ffi_headers: Box<[FfiHeader]> = header_strings
                .into_iter()
                .map(|(k, v)| FfiHeader {
                    key: k.into_raw(),
                    value: v.into_raw(),
                })
                .collect();
            Box::into_raw(ffi_headers) as *mut FfiHeader
        };

        Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            url: url.into_raw(),
            headers,
            headers_len,
            body,
            body_len,
        }))
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// An HTTP response described as C-compatible plain data.
///
/// The C caller constructs this on the stack after executing an HTTP request,
/// then passes a pointer to `social_parse_response`. The FFI layer reads
/// but does not free these fields.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Error codes returned in `FfiApiResult`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    Http = 1,
    Network = 2,
    Deserialization = 3,
    Serialization = 4,
    Panic = 5,
    NullArg = 6,
}

/// Tag that tells the caller whether `FfiApiResult::data` is set.
#[repr(C)]
#[derive(Debug, PartialEq, Eq)]
pub enum FfiDataTag {
    None = 0,
    Json = 1,
}

/// Result envelope for `social_parse_response`.
///
/// On success `error_code` is `Ok`, `error_message` is null, and `data`
/// holds the response payload re-encoded as compact JSON (or null with
/// `data_tag = None` for an empty body).
/// On failure `error_code` describes the category, `error_message` is a
/// human-readable C string, and `data` is null.
#[repr(C)]
pub struct FfiApiResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub http_status: u16,
    pub data_tag: FfiDataTag,
    pub data: *mut c_char,
}

impl FfiApiResult {
    fn boxed(self) -> *mut Self {
        Box::into_raw(Box::new(self))
    }

    /// Build a success result from a decoded payload.
    pub(crate) fn ok_json(value: serde_json::Value, http_status: u16) -> *mut Self {
        let (data_tag, data) = if value.is_null() {
            (FfiDataTag::None, std::ptr::null_mut())
        } else {
            (FfiDataTag::Json, CString::new(value.to_string()).unwrap().into_raw())
        };
        FfiApiResult {
            error_code: FfiErrorCode::Ok,
            error_message: std::ptr::null_mut(),
            http_status,
            data_tag,
            data,
        }
        .boxed()
    }

    /// Build an error result from a `TransportError`.
    pub(crate) fn from_error(err: TransportError) -> *mut Self {
        let error_code = match &err {
            TransportError::Http { .. } => FfiErrorCode::Http,
            TransportError::Network(_) => FfiErrorCode::Network,
            TransportError::Deserialization(_) => FfiErrorCode::Deserialization,
            TransportError::Serialization(_) => FfiErrorCode::Serialization,
        };
        FfiApiResult {
            error_code,
            error_message: CString::new(err.to_string()).unwrap_or_default().into_raw(),
            http_status: err.status().unwrap_or(0),
            data_tag: FfiDataTag::None,
            data: std::ptr::null_mut(),
        }
        .boxed()
    }

    /// Build an error result for a null argument.
    pub(crate) fn null_arg(name: &str) -> *mut Self {
        FfiApiResult {
            error_code: FfiErrorCode::NullArg,
            error_message: CString::new(format!("null argument: {name}")).unwrap().into_raw(),
            http_status: 0,
            data_tag: FfiDataTag::None,
            data: std::ptr::null_mut(),
        }
        .boxed()
    }

    /// Build an error result for a caught panic.
    pub(crate) fn panic(msg: &str) -> *mut Self {
        FfiApiResult {
            error_code: FfiErrorCode::Panic,
            error_message: CString::new(msg).unwrap_or_default().into_raw(),
            http_status: 0,
            data_tag: FfiDataTag::None,
            data: std::ptr::null_mut(),
        }
        .boxed()
    }
}
