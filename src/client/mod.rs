//! The JSON:API client: request dispatch, auth resolution, and token
//! fetching.

mod builder;
mod config;
mod options;
mod transport;

pub use builder::JsonApiClientBuilder;
pub use config::JsonApiConfig;
pub use options::{AuthOverride, RequestBody, RequestOptions};
pub use transport::{ReqwestTransport, Transport};

use std::fmt;
use std::sync::Arc;

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Method, Request, Response};
use secrecy::ExposeSecret;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::auth::{AuthConfig, ClientCredentials, TokenCache, TokenRequestKey, basic_header};
use crate::error::{Error, Result, check_response};
use crate::models::TokenResponse;
use crate::urls::UrlBuilder;

/// Token endpoint used when the credentials do not name one.
const DEFAULT_TOKEN_PATH: &str = "/oauth/token";

/// Draft preview validation endpoint exposed by the backend.
const DRAFT_URL_VALIDATION_PATH: &str = "/next/draft-url";

/// Client for a JSON:API-speaking CMS backend.
///
/// The client owns URL building, header merging, authentication, and
/// error translation; actual network traffic goes through a pluggable
/// [`Transport`]. Cloning is cheap and clones share the token cache.
#[derive(Clone)]
pub struct JsonApiClient {
    config: Arc<JsonApiConfig>,
    urls: Arc<UrlBuilder>,
    transport: Arc<dyn Transport>,
    custom_transport: bool,
    token_cache: Arc<TokenCache>,
}

impl JsonApiClient {
    /// Creates a builder for configuring a client.
    #[must_use]
    pub fn builder() -> JsonApiClientBuilder {
        JsonApiClientBuilder::new()
    }

    /// Creates a client from a configuration, using the default
    /// transport.
    pub fn new(config: JsonApiConfig) -> Result<Self> {
        Self::with_transport(config, None)
    }

    pub(crate) fn with_transport(
        config: JsonApiConfig,
        transport: Option<Arc<dyn Transport>>,
    ) -> Result<Self> {
        if let Some(auth) = &config.auth {
            auth.validate()?;
        }
        let urls = UrlBuilder::new(&config.base_url)?
            .with_api_prefix(&config.api_prefix)
            .with_front_page(&config.front_page);
        let custom_transport = transport.is_some();
        let transport: Arc<dyn Transport> = match transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new()?),
        };
        Ok(Self {
            config: Arc::new(config),
            urls: Arc::new(urls),
            transport,
            custom_transport,
            token_cache: Arc::new(TokenCache::default()),
        })
    }

    /// The client's configuration.
    #[must_use]
    pub fn config(&self) -> &JsonApiConfig {
        &self.config
    }

    /// The backend base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// URL and path building against the configured backend.
    #[must_use]
    pub fn urls(&self) -> &UrlBuilder {
        &self.urls
    }

    /// Sends a request to the backend.
    ///
    /// `input` is either an absolute URL or a path with a leading `/`
    /// that resolves against the base URL. Client default headers apply
    /// first, then per-request headers override by name, then the
    /// `Authorization` header is attached according to the auth override.
    ///
    /// The raw response comes back regardless of its status code; use
    /// [`check_response`](crate::check_response) to turn failures into
    /// errors.
    #[instrument(skip(self, options))]
    pub async fn fetch(&self, input: &str, options: RequestOptions) -> Result<Response> {
        let RequestOptions {
            method,
            headers,
            body,
            with_auth,
        } = options;
        let mut request = self.prepare_request(input, method, &headers, body)?;
        if let Some(auth) = self.effective_auth(&with_auth)? {
            let value = self.authorization_header(auth).await?;
            request
                .headers_mut()
                .insert(AUTHORIZATION, HeaderValue::from_str(&value)?);
        }
        self.dispatch(request).await
    }

    /// Sends a prepared [`reqwest::Request`] through the client's
    /// transport. Client default headers fill in where the request has
    /// none of the same name; the URL and everything else pass through
    /// untouched.
    pub async fn execute(&self, mut request: Request) -> Result<Response> {
        let headers = request.headers_mut();
        for (name, value) in &self.config.headers {
            if !headers.contains_key(name) {
                headers.insert(name.clone(), value.clone());
            }
        }
        self.dispatch(request).await
    }

    /// Resolves an auth method to an `Authorization` header value.
    ///
    /// Static variants resolve locally;
    /// [`AuthConfig::ClientCredentials`] goes through the token cache and
    /// fetches from the token endpoint on a miss.
    pub async fn authorization_header(&self, auth: &AuthConfig) -> Result<String> {
        auth.validate()?;
        match auth {
            AuthConfig::UsernamePassword { username, password } => {
                Ok(basic_header(username, password.expose_secret()))
            }
            AuthConfig::AccessToken {
                access_token,
                token_type,
            } => Ok(format!("{token_type} {access_token}")),
            AuthConfig::ClientCredentials(credentials) => {
                let token = self.get_access_token(Some(credentials)).await?;
                Ok(token.authorization_value())
            }
            AuthConfig::Header(value) => Ok(value.clone()),
            AuthConfig::Callback(callback) => Ok(callback()),
        }
    }

    /// Fetches an access token via the OAuth2 client-credentials grant.
    ///
    /// Explicit `credentials` take precedence over the configured ones. A
    /// pre-acquired token from the configuration is returned as-is, and a
    /// cached token is reused while it is unexpired and was fetched with
    /// the same credentials and scope. Concurrent callers that miss the
    /// cache share a single token request.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] when no usable credentials are
    /// available and [`Error::Upstream`] when the token endpoint answers
    /// with a failure.
    #[instrument(skip_all)]
    pub async fn get_access_token(
        &self,
        credentials: Option<&ClientCredentials>,
    ) -> Result<TokenResponse> {
        if let Some(token) = &self.config.access_token {
            return Ok(token.clone());
        }
        let credentials = match credentials {
            Some(credentials) => credentials,
            None => match &self.config.auth {
                Some(AuthConfig::ClientCredentials(credentials)) => credentials,
                _ => {
                    return Err(Error::config(
                        "client credentials are required to fetch an access token",
                    ));
                }
            },
        };
        credentials.validate()?;

        let key = TokenRequestKey::from_credentials(credentials);
        if let Some(token) = self.token_cache.lookup(&key) {
            self.debug("Using cached access token.");
            return Ok(token);
        }

        // Serialize fetches; whoever got here first has probably already
        // stored a token by the time the guard is acquired.
        let _refresh = self.token_cache.refresh_guard().await;
        if let Some(token) = self.token_cache.lookup(&key) {
            self.debug("Using cached access token.");
            return Ok(token);
        }

        self.debug("Fetching new access token.");
        let token_url = credentials
            .token_url
            .as_deref()
            .unwrap_or(DEFAULT_TOKEN_PATH);
        let url = self.urls.build_url(token_url)?;

        let mut form = vec![(
            "grant_type".to_string(),
            "client_credentials".to_string(),
        )];
        if let Some(scope) = &credentials.scope {
            form.push(("scope".to_string(), scope.clone()));
        }

        let basic = basic_header(
            &credentials.client_id,
            credentials.client_secret.expose_secret(),
        );
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(&basic)?);
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded"),
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let request = self.prepare_request(
            url.as_str(),
            Method::POST,
            &headers,
            Some(RequestBody::Form(form)),
        )?;
        let response = self.dispatch(request).await?;
        let response = check_response(response, "Error fetching OAuth token").await?;

        let body = response.text().await?;
        let token: TokenResponse = serde_json::from_str(&body)?;

        self.token_cache.store(token.clone(), key);
        Ok(token)
    }

    /// Validates a draft preview URL by posting the payload to the
    /// backend's validation endpoint, authenticated.
    ///
    /// The raw response comes back whatever its status. When the request
    /// fails in transport, a synthesized `401` response with a JSON
    /// `{"message"}` body is returned instead so callers always have a
    /// response to inspect.
    pub async fn validate_draft_url(&self, payload: &Value) -> Result<Response> {
        let path = payload
            .get("path")
            .and_then(Value::as_str)
            .unwrap_or("<unknown>");
        self.debug(&format!("Validating draft url for {path}."));

        let options = RequestOptions::new()
            .method(Method::POST)
            .json(payload.clone())
            .with_auth(AuthOverride::Enabled);

        match self.fetch(DRAFT_URL_VALIDATION_PATH, options).await {
            Ok(response) => Ok(response),
            Err(Error::Transport(error)) => {
                self.debug(&format!("Draft url validation failed in transport: {error}."));
                Ok(unauthorized_draft_response())
            }
            Err(error) => Err(error),
        }
    }

    fn prepare_request(
        &self,
        input: &str,
        method: Method,
        headers: &HeaderMap,
        body: Option<RequestBody>,
    ) -> Result<Request> {
        let url = self.urls.resolve_input(input)?;
        let mut request = Request::new(method, url);
        let request_headers = request.headers_mut();
        for (name, value) in &self.config.headers {
            request_headers.insert(name.clone(), value.clone());
        }
        for (name, value) in headers {
            request_headers.insert(name.clone(), value.clone());
        }
        if let Some(body) = body {
            *request.body_mut() = Some(body.into_body()?);
        }
        Ok(request)
    }

    fn effective_auth<'a>(
        &'a self,
        with_auth: &'a AuthOverride,
    ) -> Result<Option<&'a AuthConfig>> {
        match with_auth {
            AuthOverride::Disabled => Ok(None),
            AuthOverride::Default if !self.config.with_auth => Ok(None),
            AuthOverride::Custom(auth) => {
                auth.validate()?;
                Ok(Some(auth))
            }
            AuthOverride::Default | AuthOverride::Enabled => match &self.config.auth {
                Some(auth) => Ok(Some(auth)),
                None => Err(Error::config(
                    "authentication was requested but no auth is configured",
                )),
            },
        }
    }

    async fn dispatch(&self, request: Request) -> Result<Response> {
        if self.custom_transport {
            self.debug(&format!("Using custom transport, fetching {}.", request.url()));
        } else {
            self.debug(&format!("Fetching {}.", request.url()));
        }
        self.transport.send(request).await
    }

    fn debug(&self, message: &str) {
        if self.config.debug {
            debug!("{message}");
        }
    }
}

impl fmt::Debug for JsonApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonApiClient")
            .field("base_url", &self.config.base_url)
            .field("with_auth", &self.config.with_auth)
            .field("custom_transport", &self.custom_transport)
            .finish_non_exhaustive()
    }
}

fn unauthorized_draft_response() -> Response {
    let body = serde_json::json!({"message": "Bad response from backend"}).to_string();
    let mut response = http::Response::new(body);
    *response.status_mut() = http::StatusCode::UNAUTHORIZED;
    response.headers_mut().insert(
        http::header::CONTENT_TYPE,
        http::HeaderValue::from_static("application/json"),
    );
    Response::from(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> JsonApiClient {
        JsonApiClient::builder()
            .base_url("https://example.com")
            .build()
            .unwrap()
    }

    fn client_with_auth(with_auth: bool) -> JsonApiClient {
        JsonApiClient::builder()
            .base_url("https://example.com")
            .basic_auth("admin", "pw")
            .with_auth(with_auth)
            .build()
            .unwrap()
    }

    #[test]
    fn default_override_follows_instance_toggle() {
        let off = client_with_auth(false);
        assert!(off.effective_auth(&AuthOverride::Default).unwrap().is_none());

        let on = client_with_auth(true);
        assert!(on.effective_auth(&AuthOverride::Default).unwrap().is_some());
    }

    #[test]
    fn enabled_override_requires_configured_auth() {
        let without = client();
        assert!(matches!(
            without.effective_auth(&AuthOverride::Enabled),
            Err(Error::Configuration { .. })
        ));

        let with = client_with_auth(false);
        assert!(with.effective_auth(&AuthOverride::Enabled).unwrap().is_some());
    }

    #[test]
    fn disabled_override_suppresses_configured_auth() {
        let client = client_with_auth(true);
        assert!(client
            .effective_auth(&AuthOverride::Disabled)
            .unwrap()
            .is_none());
    }

    #[test]
    fn custom_override_is_validated_before_use() {
        let client = client();
        let invalid = AuthOverride::Custom(AuthConfig::username_password("", ""));
        assert!(matches!(
            client.effective_auth(&invalid),
            Err(Error::Configuration { .. })
        ));

        let valid = AuthOverride::Custom(AuthConfig::bearer("token"));
        assert!(client.effective_auth(&valid).unwrap().is_some());
    }

    #[tokio::test]
    async fn static_auth_variants_resolve_locally() {
        let client = client();

        let basic = client
            .authorization_header(&AuthConfig::username_password("a", "b"))
            .await
            .unwrap();
        assert_eq!(basic, "Basic YTpi");

        let bearer = client
            .authorization_header(&AuthConfig::bearer("abc123"))
            .await
            .unwrap();
        assert_eq!(bearer, "Bearer abc123");

        let verbatim = client
            .authorization_header(&AuthConfig::header("Custom xyz"))
            .await
            .unwrap();
        assert_eq!(verbatim, "Custom xyz");

        let from_callback = client
            .authorization_header(&AuthConfig::callback(|| "Bearer computed".to_string()))
            .await
            .unwrap();
        assert_eq!(from_callback, "Bearer computed");
    }

    #[tokio::test]
    async fn preconfigured_token_bypasses_the_grant() {
        let client = JsonApiClient::builder()
            .base_url("https://example.com")
            .access_token(TokenResponse::new("preset", "Bearer", 3600))
            .build()
            .unwrap();

        let token = client.get_access_token(None).await.unwrap();
        assert_eq!(token.access_token, "preset");
    }

    #[tokio::test]
    async fn token_fetch_without_credentials_is_a_configuration_error() {
        let client = client();
        let error = client.get_access_token(None).await.unwrap_err();
        assert!(matches!(error, Error::Configuration { .. }));
    }

    #[tokio::test]
    async fn synthesized_draft_response_is_json_unauthorized() {
        let response = unauthorized_draft_response();
        assert_eq!(response.status(), reqwest::StatusCode::UNAUTHORIZED);

        let body: Value = serde_json::from_str(&response.text().await.unwrap()).unwrap();
        assert_eq!(body["message"], "Bad response from backend");
    }

    #[test]
    fn debug_output_hides_internals() {
        let client = client_with_auth(true);
        let debug = format!("{client:?}");
        assert!(debug.contains("example.com"));
        assert!(!debug.contains("pw"));
    }
}
