//! Authentication methods accepted by the client.

use std::fmt;
use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use secrecy::{ExposeSecret, SecretString};

use crate::error::{Error, Result};

/// Callback producing a ready-to-use `Authorization` header value.
pub type HeaderCallback = Arc<dyn Fn() -> String + Send + Sync>;

/// How the client authenticates against the backend.
///
/// Every variant ultimately resolves to an `Authorization` header value.
/// Only [`AuthConfig::ClientCredentials`] requires a network round-trip;
/// the other variants resolve locally.
///
/// Secrets are held as [`SecretString`] and never appear in `Debug`
/// output.
#[derive(Clone)]
pub enum AuthConfig {
    /// HTTP Basic authentication from a username and password.
    UsernamePassword {
        /// Account username.
        username: String,
        /// Account password.
        password: SecretString,
    },
    /// A pre-acquired access token used verbatim.
    AccessToken {
        /// The token value.
        access_token: String,
        /// Token type placed before the value, e.g. `Bearer`.
        token_type: String,
    },
    /// OAuth2 client-credentials grant against the backend's token
    /// endpoint, with the resulting bearer token cached until expiry.
    ClientCredentials(ClientCredentials),
    /// A complete `Authorization` header value used verbatim.
    Header(String),
    /// A callback invoked per request to produce the header value.
    Callback(HeaderCallback),
}

impl AuthConfig {
    /// Basic authentication from a username and password.
    pub fn username_password(
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self::UsernamePassword {
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }

    /// A pre-acquired access token with an explicit token type.
    pub fn access_token(
        access_token: impl Into<String>,
        token_type: impl Into<String>,
    ) -> Self {
        Self::AccessToken {
            access_token: access_token.into(),
            token_type: token_type.into(),
        }
    }

    /// A pre-acquired bearer token.
    pub fn bearer(access_token: impl Into<String>) -> Self {
        Self::access_token(access_token, "Bearer")
    }

    /// OAuth2 client credentials.
    pub fn client_credentials(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self::ClientCredentials(ClientCredentials::new(client_id, client_secret))
    }

    /// A verbatim `Authorization` header value.
    pub fn header(value: impl Into<String>) -> Self {
        Self::Header(value.into())
    }

    /// A callback producing the header value per request.
    pub fn callback<F>(callback: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        Self::Callback(Arc::new(callback))
    }

    /// Checks that the variant carries everything it needs to resolve.
    ///
    /// Called when a client is built and again before each resolution, so
    /// incomplete credentials fail before any request goes out.
    pub(crate) fn validate(&self) -> Result<()> {
        match self {
            Self::UsernamePassword { username, password } => {
                if username.is_empty() || password.expose_secret().is_empty() {
                    return Err(Error::config(
                        "basic auth requires both username and password",
                    ));
                }
                Ok(())
            }
            Self::AccessToken {
                access_token,
                token_type,
            } => {
                if access_token.is_empty() || token_type.is_empty() {
                    return Err(Error::config(
                        "access token auth requires both access_token and token_type",
                    ));
                }
                Ok(())
            }
            Self::ClientCredentials(credentials) => credentials.validate(),
            Self::Header(_) | Self::Callback(_) => Ok(()),
        }
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UsernamePassword { username, .. } => f
                .debug_struct("UsernamePassword")
                .field("username", username)
                .field("password", &"[REDACTED]")
                .finish(),
            Self::AccessToken { token_type, .. } => f
                .debug_struct("AccessToken")
                .field("access_token", &"[REDACTED]")
                .field("token_type", token_type)
                .finish(),
            Self::ClientCredentials(credentials) => {
                write!(f, "ClientCredentials({credentials:?})")
            }
            Self::Header(_) => f.write_str("Header([REDACTED])"),
            Self::Callback(_) => f.write_str("Callback"),
        }
    }
}

/// Credentials for the OAuth2 client-credentials grant.
#[derive(Clone)]
pub struct ClientCredentials {
    /// OAuth client identifier.
    pub client_id: String,
    /// OAuth client secret.
    pub client_secret: SecretString,
    /// Scope requested from the token endpoint.
    pub scope: Option<String>,
    /// Token endpoint path or absolute URL. Defaults to `/oauth/token`
    /// when unset.
    pub token_url: Option<String>,
}

impl ClientCredentials {
    /// Creates credentials with the default token endpoint and no scope.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: SecretString::from(client_secret.into()),
            scope: None,
            token_url: None,
        }
    }

    /// Sets the scope to request.
    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Sets the token endpoint path or absolute URL.
    #[must_use]
    pub fn with_token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = Some(token_url.into());
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.client_id.is_empty() || self.client_secret.expose_secret().is_empty() {
            return Err(Error::config(
                "client credentials auth requires both client_id and client_secret",
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("scope", &self.scope)
            .field("token_url", &self.token_url)
            .finish()
    }
}

/// Builds a `Basic` authorization header value from an id/secret pair.
pub(crate) fn basic_header(id: &str, secret: &str) -> String {
    format!("Basic {}", BASE64.encode(format!("{id}:{secret}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_header_encodes_id_and_secret() {
        assert_eq!(basic_header("a", "b"), "Basic YTpi");
    }

    #[test]
    fn debug_output_redacts_password() {
        let auth = AuthConfig::username_password("admin", "super-secret");
        let debug = format!("{auth:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[REDACTED]"));
        assert!(debug.contains("admin"));
    }

    #[test]
    fn debug_output_redacts_client_secret() {
        let auth = AuthConfig::ClientCredentials(
            ClientCredentials::new("client-id", "client-secret").with_scope("read"),
        );
        let debug = format!("{auth:?}");
        assert!(!debug.contains("client-secret"));
        assert!(debug.contains("client-id"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn debug_output_redacts_verbatim_header() {
        let auth = AuthConfig::header("Bearer super-secret");
        let debug = format!("{auth:?}");
        assert!(!debug.contains("super-secret"));
    }

    #[test]
    fn validate_rejects_incomplete_basic_auth() {
        let auth = AuthConfig::username_password("admin", "");
        assert!(matches!(
            auth.validate(),
            Err(Error::Configuration { .. })
        ));
    }

    #[test]
    fn validate_rejects_incomplete_client_credentials() {
        let auth = AuthConfig::client_credentials("", "secret");
        assert!(matches!(
            auth.validate(),
            Err(Error::Configuration { .. })
        ));
    }

    #[test]
    fn validate_accepts_complete_variants() {
        assert!(AuthConfig::username_password("admin", "pw").validate().is_ok());
        assert!(AuthConfig::bearer("token").validate().is_ok());
        assert!(AuthConfig::client_credentials("id", "secret").validate().is_ok());
        assert!(AuthConfig::header("Basic YTpi").validate().is_ok());
        assert!(AuthConfig::callback(|| "Bearer t".to_string()).validate().is_ok());
    }
}
