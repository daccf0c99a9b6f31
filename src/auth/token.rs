//! Bearer token caching for the client-credentials grant.

use std::time::{Duration, Instant};

use parking_lot::RwLock;
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::{Mutex, MutexGuard};

use super::provider::ClientCredentials;
use crate::models::TokenResponse;

/// The request parameters a cached token was fetched with. A cached token
/// is only reused while these match the current request exactly; changing
/// the scope or credentials forces a fresh fetch.
#[derive(Clone)]
pub(crate) struct TokenRequestKey {
    client_id: String,
    client_secret: SecretString,
    scope: Option<String>,
}

impl TokenRequestKey {
    pub(crate) fn from_credentials(credentials: &ClientCredentials) -> Self {
        Self {
            client_id: credentials.client_id.clone(),
            client_secret: credentials.client_secret.clone(),
            scope: credentials.scope.clone(),
        }
    }

    fn matches(&self, other: &Self) -> bool {
        self.client_id == other.client_id
            && self.client_secret.expose_secret() == other.client_secret.expose_secret()
            && self.scope == other.scope
    }
}

struct CachedToken {
    token: TokenResponse,
    /// `None` means the expiry overflowed the clock and the token is
    /// treated as never expiring.
    expires_at: Option<Instant>,
    request: TokenRequestKey,
}

impl CachedToken {
    fn is_fresh(&self, now: Instant, key: &TokenRequestKey) -> bool {
        self.expires_at.is_none_or(|expires_at| now < expires_at) && self.request.matches(key)
    }
}

/// Holds at most one access token together with the key it was fetched
/// with.
///
/// `refresh_guard` serializes token fetches so concurrent callers that
/// miss the cache produce a single network request; callers re-check the
/// cache after acquiring the guard.
#[derive(Default)]
pub(crate) struct TokenCache {
    state: RwLock<Option<CachedToken>>,
    refresh_lock: Mutex<()>,
}

impl TokenCache {
    /// Returns the cached token if it is unexpired and was fetched with a
    /// matching key.
    pub(crate) fn lookup(&self, key: &TokenRequestKey) -> Option<TokenResponse> {
        let state = self.state.read();
        state
            .as_ref()
            .filter(|cached| cached.is_fresh(Instant::now(), key))
            .map(|cached| cached.token.clone())
    }

    /// Stores a freshly fetched token, replacing whatever was cached.
    pub(crate) fn store(&self, token: TokenResponse, key: TokenRequestKey) {
        let expires_at = Instant::now().checked_add(Duration::from_secs(token.expires_in));
        *self.state.write() = Some(CachedToken {
            token,
            expires_at,
            request: key,
        });
    }

    pub(crate) async fn refresh_guard(&self) -> MutexGuard<'_, ()> {
        self.refresh_lock.lock().await
    }
}
