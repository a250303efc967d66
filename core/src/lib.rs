//! Client core for the social API.
//!
//! # Overview
//! Two independent pieces:
//! - the transport: `ApiClient` builds `HttpRequest` values and parses
//!   `HttpResponse` values without touching the network (host-does-IO), and
//!   `TransportClient` runs them through an async `Transport`;
//! - the validation engine: `validate_password` reports every failing rule
//!   at once, with `password_rules` as the catalog for rendering guidance.
//!
//! # Design
//! - `ApiClient` holds only the normalized base address. Paths may be given
//!   with or without a leading slash.
//! - `submit`/`replace` never send an absent or `null` body; `{}` stands in.
//! - No retries, no caching, no status classification. Every failure is a
//!   `TransportError`.
//! - Resource facades are built by callers on top of a `TransportClient`
//!   passed to them explicitly.

pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod http;
pub mod query;
pub mod transport;
pub mod validation;

pub use client::{ApiClient, NO_BODY};
pub use config::ClientConfig;
pub use error::{ConfigError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use query::{PageRequest, QueryParams, QueryValue};
pub use transport::{init, ReqwestTransport, Transport, TransportClient};
pub use validation::{
    password_rules, validate_password, FailureDetail, PasswordPolicy, RuleDescriptor, RuleKey,
    ValidationOutcome,
};
