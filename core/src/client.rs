//! Stateless HTTP request builder and response parser for the social API.
//!
//! # Design
//! `ApiClient` holds only the normalized base address and carries no mutable
//! state between calls. Every operation is split into a `build_*` method that
//! produces an `HttpRequest` and a generic `parse` that consumes an
//! `HttpResponse`. Executing the round-trip is someone else's job: the async
//! `TransportClient`, a test harness, or a host language across the FFI.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::{normalize_base_url, ClientConfig};
use crate::error::{ConfigError, TransportError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, CONTENT_TYPE, JSON_CONTENT_TYPE, OCTET_STREAM};
use crate::query::QueryParams;

/// Body sent by `submit`/`replace` when the caller has none.
const EMPTY_OBJECT: &str = "{}";

/// Pass as the body argument of `build_submit`/`build_replace` (and the
/// async `submit`/`replace`) when an action endpoint takes no payload.
pub const NO_BODY: Option<&'static ()> = None;

/// Synchronous, stateless client for the social API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiClient {
    base_url: String,
}

impl ApiClient {
    /// Bind a client to `base_url`. Trailing slashes are dropped so the
    /// path join always produces exactly one separating slash.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ConfigError> {
        Self::new(&config.base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Join `path` onto the base address. Paths with and without a leading
    /// slash resolve to the same URL.
    pub fn build_url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// GET `path`, with `params` encoded as the query string when present.
    pub fn build_fetch(&self, path: &str, params: Option<&QueryParams>) -> HttpRequest {
        let mut url = self.build_url(path);
        if let Some(params) = params.filter(|p| !p.is_empty()) {
            url.push('?');
            url.push_str(&params.encode());
        }
        HttpRequest {
            method: HttpMethod::Get,
            url,
            headers: Vec::new(),
            body: None,
        }
    }

    /// POST `body` as JSON; an absent body is sent as `{}`.
    pub fn build_submit<B>(&self, path: &str, body: Option<&B>) -> Result<HttpRequest, TransportError>
    where
        B: Serialize + ?Sized,
    {
        self.build_json(HttpMethod::Post, path, body)
    }

    /// PUT `body` as JSON; an absent body is sent as `{}`.
    pub fn build_replace<B>(&self, path: &str, body: Option<&B>) -> Result<HttpRequest, TransportError>
    where
        B: Serialize + ?Sized,
    {
        self.build_json(HttpMethod::Put, path, body)
    }

    pub fn build_remove(&self, path: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            url: self.build_url(path),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Raw PUT of `content` to an absolute upload target such as a presigned
    /// URL. The base address is not applied.
    ///
    /// `content_type` falls back to `application/octet-stream` when absent or
    /// blank.
    pub fn build_upload(&self, target_url: &str, content: Vec<u8>, content_type: Option<&str>) -> HttpRequest {
        build_upload(target_url, content, content_type)
    }

    /// Interpret a response: any 2xx is success and its body is decoded as
    /// `T`, anything else becomes `TransportError::Http`.
    ///
    /// An empty success body decodes as JSON `null`, so `()` and `Option<_>`
    /// work for endpoints that return nothing.
    pub fn parse<T: DeserializeOwned>(&self, response: HttpResponse) -> Result<T, TransportError> {
        parse_response(response)
    }

    fn build_json<B>(&self, method: HttpMethod, path: &str, body: Option<&B>) -> Result<HttpRequest, TransportError>
    where
        B: Serialize + ?Sized,
    {
        Ok(HttpRequest {
            method,
            url: self.build_url(path),
            headers: vec![(CONTENT_TYPE.to_string(), JSON_CONTENT_TYPE.to_string())],
            body: Some(encode_body(body)?.into_bytes()),
        })
    }
}

/// Serialize a JSON body. `None` and values that serialize to `null` both
/// become `{}`, never an absent or null body.
fn encode_body<B>(body: Option<&B>) -> Result<String, TransportError>
where
    B: Serialize + ?Sized,
{
    let Some(body) = body else {
        return Ok(EMPTY_OBJECT.to_string());
    };
    let value = serde_json::to_value(body).map_err(|e| TransportError::Serialization(e.to_string()))?;
    if value.is_null() {
        return Ok(EMPTY_OBJECT.to_string());
    }
    serde_json::to_string(&value).map_err(|e| TransportError::Serialization(e.to_string()))
}

/// See `ApiClient::build_upload`.
pub fn build_upload(target_url: &str, content: Vec<u8>, content_type: Option<&str>) -> HttpRequest {
    let content_type = content_type
        .map(str::trim)
        .filter(|ct| !ct.is_empty())
        .unwrap_or(OCTET_STREAM);
    HttpRequest {
        method: HttpMethod::Put,
        url: target_url.to_string(),
        headers: vec![(CONTENT_TYPE.to_string(), content_type.to_string())],
        body: Some(content),
    }
}

/// See `ApiClient::parse`.
pub fn parse_response<T: DeserializeOwned>(response: HttpResponse) -> Result<T, TransportError> {
    if !response.is_success() {
        return Err(TransportError::Http {
            status: response.status,
            body: response.body,
        });
    }
    let body = response.body.trim();
    let body = if body.is_empty() { "null" } else { body };
    serde_json::from_str(body).map_err(|e| TransportError::Deserialization(e.to_string()))
}
