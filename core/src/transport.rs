//! Async execution of requests built by `ApiClient`.
//!
//! # Design
//! `Transport` is the only I/O seam: it takes an `HttpRequest` and returns an
//! `HttpResponse`, reporting non-2xx statuses as data. `TransportClient`
//! pairs one `ApiClient` with one shared `Transport` and exposes the four
//! verbs as single-shot futures. Each call builds, executes once, and parses.
//! Nothing is retried or cached, and no state is shared between calls.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::client::ApiClient;
use crate::config::ClientConfig;
use crate::error::{ConfigError, TransportError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::query::QueryParams;

pub const USER_AGENT: &str = concat!("social-core/", env!("CARGO_PKG_VERSION"));

/// Executes one HTTP round-trip.
///
/// Implementations must return non-2xx responses as `Ok(HttpResponse)`;
/// `Err` is reserved for failures that produced no response at all.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Network transport backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout()?)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ConfigError::Client(e.to_string()))?;
        Ok(Self { client })
    }

    /// Wrap an already configured `reqwest::Client`.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

fn to_reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Delete => reqwest::Method::DELETE,
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self
            .client
            .request(to_reqwest_method(request.method), &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Network(format!("failed to read response body: {e}")))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// Async client for the social API.
///
/// Cheap to clone; clones share the same transport. Resource facades hold one
/// of these, passed to them at construction.
#[derive(Clone)]
pub struct TransportClient {
    api: ApiClient,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for TransportClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportClient")
            .field("base_url", &self.api.base_url())
            .finish_non_exhaustive()
    }
}

/// Build the production client from startup configuration.
pub fn init(config: ClientConfig) -> Result<TransportClient, ConfigError> {
    let api = ApiClient::from_config(&config)?;
    let transport = ReqwestTransport::new(&config)?;
    Ok(TransportClient::with_transport(api, Arc::new(transport)))
}

impl TransportClient {
    pub fn with_transport(api: ApiClient, transport: Arc<dyn Transport>) -> Self {
        Self { api, transport }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// GET `path`, optionally with query parameters.
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        path: &str,
        params: Option<&QueryParams>,
    ) -> Result<T, TransportError> {
        let request = self.api.build_fetch(path, params);
        self.dispatch(request).await
    }

    /// POST `body` (or `{}` when `None`).
    pub async fn submit<T, B>(&self, path: &str, body: Option<&B>) -> Result<T, TransportError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.api.build_submit(path, body)?;
        self.dispatch(request).await
    }

    /// PUT `body` (or `{}` when `None`).
    pub async fn replace<T, B>(&self, path: &str, body: Option<&B>) -> Result<T, TransportError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.api.build_replace(path, body)?;
        self.dispatch(request).await
    }

    /// DELETE `path`.
    pub async fn remove<T: DeserializeOwned>(&self, path: &str) -> Result<T, TransportError> {
        let request = self.api.build_remove(path);
        self.dispatch(request).await
    }

    /// Raw PUT of `content` to an absolute upload target. Returns the
    /// response body as text.
    pub async fn upload(
        &self,
        target_url: &str,
        content: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<String, TransportError> {
        let request = self.api.build_upload(target_url, content, content_type);
        let response = self.execute(request).await?;
        if response.is_success() {
            Ok(response.body)
        } else {
            debug!(status = response.status, "upload rejected");
            Err(TransportError::Http {
                status: response.status,
                body: response.body,
            })
        }
    }

    async fn dispatch<T: DeserializeOwned>(&self, request: HttpRequest) -> Result<T, TransportError> {
        let response = self.execute(request).await?;
        let status = response.status;
        self.api.parse(response).inspect_err(|e| {
            debug!(status, error = %e, "request failed");
        })
    }

    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        debug!(method = %request.method, url = %request.url, "dispatching request");
        self.transport.execute(request).await.inspect_err(|e| {
            debug!(error = %e, "transport failure");
        })
    }
}
