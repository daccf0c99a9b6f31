//! Per-request options.

use reqwest::Method;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;

use crate::auth::AuthConfig;
use crate::error::Result;
use crate::query::form_encoded;

/// Auth behavior for a single request.
#[derive(Debug, Clone, Default)]
pub enum AuthOverride {
    /// Follow the client's `with_auth` setting.
    #[default]
    Default,
    /// Attach auth using the client's configured method.
    Enabled,
    /// Send the request without auth.
    Disabled,
    /// Attach auth using this method instead of the configured one.
    Custom(AuthConfig),
}

/// Body payload for a request.
#[derive(Debug, Clone)]
pub enum RequestBody {
    /// A JSON document.
    Json(Value),
    /// `application/x-www-form-urlencoded` pairs, encoded in order.
    Form(Vec<(String, String)>),
    /// Raw text sent as-is.
    Text(String),
}

impl RequestBody {
    pub(crate) fn into_body(self) -> Result<reqwest::Body> {
        Ok(match self {
            Self::Json(value) => reqwest::Body::from(serde_json::to_vec(&value)?),
            Self::Form(pairs) => reqwest::Body::from(form_encoded(&pairs)),
            Self::Text(text) => reqwest::Body::from(text),
        })
    }
}

/// Options for a single [`fetch`](crate::JsonApiClient::fetch) call.
///
/// The body carries no implied headers; the client's default
/// `Content-Type` applies unless a per-request header overrides it.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// HTTP method. Defaults to `GET`.
    pub method: Method,
    /// Headers merged over the client defaults; same-name headers win.
    pub headers: HeaderMap,
    /// Request body, if any.
    pub body: Option<RequestBody>,
    /// Auth behavior for this request.
    pub with_auth: AuthOverride,
}

impl RequestOptions {
    /// Creates options for a plain `GET` without auth override.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the HTTP method.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Adds a header, replacing a previously set value of the same name.
    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Adds all headers from the given map.
    #[must_use]
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Sets a JSON body.
    #[must_use]
    pub fn json(mut self, value: Value) -> Self {
        self.body = Some(RequestBody::Json(value));
        self
    }

    /// Sets a form-encoded body.
    #[must_use]
    pub fn form(mut self, pairs: Vec<(String, String)>) -> Self {
        self.body = Some(RequestBody::Form(pairs));
        self
    }

    /// Sets a raw text body.
    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.body = Some(RequestBody::Text(text.into()));
        self
    }

    /// Sets the auth behavior.
    #[must_use]
    pub fn with_auth(mut self, with_auth: AuthOverride) -> Self {
        self.with_auth = with_auth;
        self
    }

    /// Shorthand for [`AuthOverride::Enabled`].
    #[must_use]
    pub fn authenticated(self) -> Self {
        self.with_auth(AuthOverride::Enabled)
    }
}
