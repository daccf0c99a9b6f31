//! # jsonapi-sdk
//!
//! Client SDK for JSON:API-speaking CMS backends. The crate covers the
//! request plumbing every decoupled frontend ends up rebuilding:
//! authentication, OAuth token caching, URL and path construction, header
//! merging, and translation of failed responses into typed errors.
//!
//! ## Features
//!
//! - **Authentication**: HTTP Basic, pre-acquired tokens, verbatim
//!   headers, per-request callbacks, and the OAuth2 client-credentials
//!   grant with token caching ([`AuthConfig`]).
//! - **URL building**: base URL plus JSON:API prefix, locale segments,
//!   nested query parameters, and router-segment path construction
//!   ([`UrlBuilder`]).
//! - **Pluggable transport**: every request goes through a [`Transport`],
//!   so retries, instrumentation, and test doubles slot in without
//!   touching client code.
//! - **Error translation**: failed responses become [`Error::Upstream`]
//!   values carrying either a server message or JSON:API error objects
//!   ([`ErrorDetail`]).
//!
//! ## Quick start
//!
//! ```no_run
//! use jsonapi_sdk::{JsonApiClient, RequestOptions};
//!
//! # async fn run() -> Result<(), jsonapi_sdk::Error> {
//! let client = JsonApiClient::builder()
//!     .base_url("https://cms.example.com")
//!     .build()?;
//!
//! let url = client.urls().build_url_with(
//!     "/jsonapi/node/article",
//!     &[("fields[node--article]", "title,path")],
//! )?;
//! let response = client.fetch(url.as_str(), RequestOptions::new()).await?;
//! let checked = jsonapi_sdk::check_response(response, "Error fetching articles").await?;
//! println!("status: {}", checked.status());
//! # Ok(())
//! # }
//! ```
//!
//! ## Authentication
//!
//! ```no_run
//! use jsonapi_sdk::{AuthConfig, ClientCredentials, JsonApiClient, RequestOptions};
//!
//! # async fn run() -> Result<(), jsonapi_sdk::Error> {
//! let client = JsonApiClient::builder()
//!     .base_url("https://cms.example.com")
//!     .client_credentials(
//!         ClientCredentials::new("client-id", "client-secret").with_scope("editor"),
//!     )
//!     .with_auth(true)
//!     .build()?;
//!
//! // The bearer token is fetched once and reused until it expires.
//! let response = client
//!     .fetch("/jsonapi/node/article", RequestOptions::new())
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! Per-request overrides switch auth on, off, or to a different method
//! entirely; see [`AuthOverride`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod auth;
pub mod client;
pub mod error;
pub mod models;
pub mod query;
pub mod urls;

pub use auth::{AuthConfig, ClientCredentials, HeaderCallback};
pub use client::{
    AuthOverride, JsonApiClient, JsonApiClientBuilder, JsonApiConfig, RequestBody,
    RequestOptions, ReqwestTransport, Transport,
};
pub use error::{Error, ErrorDetail, Result, check_response};
pub use models::{JsonApiError, JsonApiErrorSource, TokenResponse};
pub use query::SearchParams;
pub use urls::{IntoSegments, PathOptions, UrlBuilder};

/// SDK version, taken from the crate metadata.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// `User-Agent` header value sent by the default transport.
pub const USER_AGENT: &str = concat!("jsonapi-sdk/", env!("CARGO_PKG_VERSION"));
