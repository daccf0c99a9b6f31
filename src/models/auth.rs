//! OAuth token models.

use serde::{Deserialize, Serialize};

/// Access token returned by the backend's OAuth token endpoint.
///
/// The token endpoint responds with the standard client-credentials grant
/// body. Anything beyond the fields below is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    /// The bearer token value.
    pub access_token: String,
    /// Token type reported by the server, almost always `Bearer`.
    pub token_type: String,
    /// Lifetime of the token in seconds, counted from the moment it was
    /// issued.
    pub expires_in: u64,
    /// Scope granted by the server, when it reports one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

impl TokenResponse {
    /// Creates a token response with the given value, type, and lifetime.
    pub fn new(
        access_token: impl Into<String>,
        token_type: impl Into<String>,
        expires_in: u64,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: token_type.into(),
            expires_in,
            scope: None,
        }
    }

    /// Formats the token as an `Authorization` header value,
    /// e.g. `Bearer abc123`.
    #[must_use]
    pub fn authorization_value(&self) -> String {
        format!("{} {}", self.token_type, self.access_token)
    }
}
