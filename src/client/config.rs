//! Client configuration.

use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};

use crate::auth::AuthConfig;
use crate::models::TokenResponse;
use crate::urls::{normalize_path, normalize_prefix};

/// Configuration for a [`JsonApiClient`](crate::JsonApiClient).
///
/// Values not set explicitly keep their defaults: no auth, no JSON:API
/// prefix, `/home` as the front page, and JSON request headers.
#[derive(Debug, Clone)]
pub struct JsonApiConfig {
    /// Backend base URL, stored without a trailing slash.
    pub base_url: String,
    /// Prefix inserted between locale and path when building endpoint
    /// URLs, e.g. `/jsonapi`. Empty by default.
    pub api_prefix: String,
    /// Path substituted when a path lookup targets the front page.
    pub front_page: String,
    /// Authentication method used when a request wants auth.
    pub auth: Option<AuthConfig>,
    /// Pre-acquired access token. When set, token fetches short-circuit
    /// and return this token without touching the network.
    pub access_token: Option<TokenResponse>,
    /// Whether requests attach auth when the caller does not say
    /// otherwise.
    pub with_auth: bool,
    /// Whether the client emits request-level diagnostics.
    pub debug: bool,
    /// Headers applied to every request. Per-request headers with the
    /// same name override these.
    pub headers: HeaderMap,
}

impl JsonApiConfig {
    /// Creates a configuration with defaults for the given base URL.
    /// A trailing slash on the base URL is trimmed.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_prefix: String::new(),
            front_page: "/home".to_string(),
            auth: None,
            access_token: None,
            with_auth: false,
            debug: false,
            headers: default_headers(),
        }
    }

    /// Sets the JSON:API prefix, normalized to a single leading slash.
    #[must_use]
    pub fn with_api_prefix(mut self, api_prefix: impl Into<String>) -> Self {
        self.api_prefix = normalize_prefix(&api_prefix.into());
        self
    }

    /// Sets the front page path, normalized to a single leading slash.
    #[must_use]
    pub fn with_front_page(mut self, front_page: impl Into<String>) -> Self {
        self.front_page = normalize_path(&front_page.into());
        self
    }

    /// Sets the authentication method.
    #[must_use]
    pub fn with_auth(mut self, auth: AuthConfig) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Sets whether requests attach auth by default.
    #[must_use]
    pub fn with_auth_enabled(mut self, enabled: bool) -> Self {
        self.with_auth = enabled;
        self
    }

    /// Sets a pre-acquired access token.
    #[must_use]
    pub fn with_access_token(mut self, token: TokenResponse) -> Self {
        self.access_token = Some(token);
        self
    }

    /// Enables or disables request-level diagnostics.
    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Replaces the default request headers.
    #[must_use]
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }
}

/// The headers every client starts with: JSON in, JSON out.
pub(crate) fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_trailing_slash_from_base_url() {
        let config = JsonApiConfig::new("https://example.com/");
        assert_eq!(config.base_url, "https://example.com");
    }

    #[test]
    fn applies_documented_defaults() {
        let config = JsonApiConfig::new("https://example.com");
        assert_eq!(config.api_prefix, "");
        assert_eq!(config.front_page, "/home");
        assert!(!config.with_auth);
        assert!(!config.debug);
        assert!(config.auth.is_none());
        assert!(config.access_token.is_none());
        assert_eq!(
            config.headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()),
            Some("application/json")
        );
        assert_eq!(
            config.headers.get(ACCEPT).and_then(|v| v.to_str().ok()),
            Some("application/json")
        );
    }

    #[test]
    fn normalizes_prefix_and_front_page() {
        let config = JsonApiConfig::new("https://example.com")
            .with_api_prefix("jsonapi/")
            .with_front_page("start");
        assert_eq!(config.api_prefix, "/jsonapi");
        assert_eq!(config.front_page, "/start");
    }
}
