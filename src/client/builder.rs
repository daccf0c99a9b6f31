//! Builder for [`JsonApiClient`](crate::JsonApiClient).

use std::fmt;
use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::auth::{AuthConfig, ClientCredentials};
use crate::client::{JsonApiClient, JsonApiConfig, Transport};
use crate::error::{Error, Result};
use crate::models::TokenResponse;

/// Builder for [`JsonApiClient`].
///
/// Only `base_url` is required; everything else keeps the documented
/// defaults. Configuration problems, including incomplete credentials,
/// surface from [`build`](Self::build) before any request is made.
#[derive(Default)]
pub struct JsonApiClientBuilder {
    base_url: Option<String>,
    api_prefix: Option<String>,
    front_page: Option<String>,
    auth: Option<AuthConfig>,
    access_token: Option<TokenResponse>,
    with_auth: bool,
    debug: bool,
    headers: Option<HeaderMap>,
    extra_headers: Vec<(String, String)>,
    transport: Option<Arc<dyn Transport>>,
}

impl JsonApiClientBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the backend base URL. Required.
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the JSON:API prefix, e.g. `/jsonapi`.
    #[must_use]
    pub fn api_prefix(mut self, api_prefix: impl Into<String>) -> Self {
        self.api_prefix = Some(api_prefix.into());
        self
    }

    /// Sets the front page path, e.g. `/home`.
    #[must_use]
    pub fn front_page(mut self, front_page: impl Into<String>) -> Self {
        self.front_page = Some(front_page.into());
        self
    }

    /// Sets the authentication method.
    #[must_use]
    pub fn auth(mut self, auth: AuthConfig) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Shorthand for HTTP Basic authentication.
    #[must_use]
    pub fn basic_auth(self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.auth(AuthConfig::username_password(username, password))
    }

    /// Shorthand for the OAuth2 client-credentials grant.
    #[must_use]
    pub fn client_credentials(self, credentials: ClientCredentials) -> Self {
        self.auth(AuthConfig::ClientCredentials(credentials))
    }

    /// Sets a pre-acquired access token that bypasses the token endpoint.
    #[must_use]
    pub fn access_token(mut self, token: TokenResponse) -> Self {
        self.access_token = Some(token);
        self
    }

    /// Sets whether requests attach auth by default.
    #[must_use]
    pub fn with_auth(mut self, with_auth: bool) -> Self {
        self.with_auth = with_auth;
        self
    }

    /// Enables request-level diagnostics.
    #[must_use]
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Replaces the default request headers wholesale.
    #[must_use]
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = Some(headers);
        self
    }

    /// Adds a single header on top of the defaults. Validated at build
    /// time.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.push((name.into(), value.into()));
        self
    }

    /// Replaces the default transport, e.g. with a recording double or a
    /// client that applies retries.
    #[must_use]
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] when `base_url` is missing or
    /// invalid, when a header does not parse, or when the configured auth
    /// is incomplete.
    pub fn build(self) -> Result<JsonApiClient> {
        let base_url = self
            .base_url
            .ok_or_else(|| Error::config("base_url is required"))?;

        let mut config = JsonApiConfig::new(base_url);
        if let Some(api_prefix) = self.api_prefix {
            config = config.with_api_prefix(api_prefix);
        }
        if let Some(front_page) = self.front_page {
            config = config.with_front_page(front_page);
        }
        if let Some(auth) = self.auth {
            config = config.with_auth(auth);
        }
        if let Some(token) = self.access_token {
            config = config.with_access_token(token);
        }
        config = config
            .with_auth_enabled(self.with_auth)
            .with_debug(self.debug);
        if let Some(headers) = self.headers {
            config.headers = headers;
        }
        for (name, value) in self.extra_headers {
            let parsed_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| Error::config(format!("invalid header name `{name}`")))?;
            let parsed_value = HeaderValue::from_str(&value)
                .map_err(|_| Error::config(format!("invalid value for header `{name}`")))?;
            config.headers.insert(parsed_name, parsed_value);
        }

        JsonApiClient::with_transport(config, self.transport)
    }
}

impl fmt::Debug for JsonApiClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonApiClientBuilder")
            .field("base_url", &self.base_url)
            .field("api_prefix", &self.api_prefix)
            .field("with_auth", &self.with_auth)
            .field("debug", &self.debug)
            .finish_non_exhaustive()
    }
}
