//! Transport seam between the client and the network.

use async_trait::async_trait;
use reqwest::{Client, Request, Response};

use crate::error::{Error, Result};

/// Carries a prepared request to the network and returns the raw response.
///
/// The client calls the transport exactly once per request and applies no
/// retry or redirect policy of its own; custom agents, instrumentation,
/// and test doubles plug in here.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends the request and resolves with the raw response.
    async fn send(&self, request: Request) -> Result<Response>;
}

/// Default transport backed by a shared [`reqwest::Client`].
///
/// The cookie store is always enabled so session and preview cookies
/// travel with every request.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Creates a transport with the SDK's default `reqwest` client.
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(crate::USER_AGENT)
            .cookie_store(true)
            .build()
            .map_err(|error| Error::config(format!("failed to build HTTP client: {error}")))?;
        Ok(Self { client })
    }

    /// Wraps an existing `reqwest` client, keeping its configuration.
    #[must_use]
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: Request) -> Result<Response> {
        Ok(self.client.execute(request).await?)
    }
}
