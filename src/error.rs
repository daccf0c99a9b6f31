//! Error types for the SDK.

use std::fmt;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Response, StatusCode};
use serde::Deserialize;

use crate::models::JsonApiError;

/// Result type alias using the SDK's [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when talking to the backend.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The client or a request was misconfigured. Raised before any network
    /// traffic happens.
    #[error("configuration error: {message}")]
    Configuration {
        /// What was wrong with the configuration.
        message: String,
    },

    /// The backend answered with a non-success status code.
    #[error("{prefix}: {detail}")]
    Upstream {
        /// HTTP status code of the failed response.
        status: StatusCode,
        /// Context describing which operation failed.
        prefix: String,
        /// Error detail extracted from the response body.
        detail: ErrorDetail,
    },

    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A body could not be serialized or deserialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A URL could not be parsed or resolved.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A resolved header value contained characters that are not valid in
    /// an HTTP header.
    #[error("invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}

impl Error {
    /// Creates a configuration error with the given message.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Returns the HTTP status code associated with this error, if any.
    #[must_use]
    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            Self::Upstream { status, .. } => Some(*status),
            Self::Transport(error) => error.status(),
            _ => None,
        }
    }

    /// Returns true if retrying the operation could plausibly succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Upstream { status, .. } => {
                *status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
            }
            Self::Transport(error) => error.is_timeout() || error.is_connect(),
            _ => false,
        }
    }
}

/// Error detail extracted from a failed response body.
///
/// The shape depends on what the server sent. Plain JSON bodies carry a
/// single `message` string, JSON:API bodies carry a list of error objects,
/// and anything else falls back to the status line.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorDetail {
    /// A single human-readable message.
    Message(String),
    /// Error objects from a JSON:API error document.
    Errors(Vec<JsonApiError>),
}

impl ErrorDetail {
    /// Extracts error detail from a failed response, consuming its body.
    ///
    /// The translation is driven by the `Content-Type` header:
    ///
    /// * `application/json` bodies are parsed as `{"message": "..."}`,
    /// * `application/vnd.api+json` bodies are parsed as JSON:API error
    ///   documents (`{"errors": [...]}`),
    /// * everything else, including bodies that fail to parse, falls back
    ///   to the status reason phrase.
    pub async fn from_response(response: Response) -> Self {
        let status = response.status();
        let media_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| {
                value
                    .split(';')
                    .next()
                    .unwrap_or(value)
                    .trim()
                    .to_ascii_lowercase()
            });

        let Some(media_type) = media_type else {
            return Self::Message(status_text(status));
        };
        let Ok(body) = response.text().await else {
            return Self::Message(status_text(status));
        };

        match media_type.as_str() {
            "application/json" => {
                #[derive(Deserialize)]
                struct MessageBody {
                    message: Option<String>,
                }

                match serde_json::from_str::<MessageBody>(&body) {
                    Ok(MessageBody {
                        message: Some(message),
                    }) => Self::Message(message),
                    _ => Self::Message(status_text(status)),
                }
            }
            "application/vnd.api+json" => {
                #[derive(Deserialize)]
                struct ErrorDocument {
                    #[serde(default)]
                    errors: Vec<JsonApiError>,
                }

                match serde_json::from_str::<ErrorDocument>(&body) {
                    Ok(document) if !document.errors.is_empty() => {
                        Self::Errors(document.errors)
                    }
                    _ => Self::Message(status_text(status)),
                }
            }
            _ => Self::Message(status_text(status)),
        }
    }
}

impl fmt::Display for ErrorDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Message(message) => f.write_str(message),
            Self::Errors(errors) => {
                let joined = errors
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; ");
                f.write_str(&joined)
            }
        }
    }
}

/// Passes successful responses through unchanged and converts anything else
/// into an [`Error::Upstream`], consuming the failed response's body.
///
/// `prefix` names the operation for the error message, e.g.
/// `"Error fetching resource"`.
pub async fn check_response(response: Response, prefix: &str) -> Result<Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let detail = ErrorDetail::from_response(response).await;
    Err(Error::Upstream {
        status,
        prefix: prefix.to_string(),
        detail,
    })
}

fn status_text(status: StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or_else(|| status.as_str())
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response_with(status: u16, content_type: Option<&str>, body: &str) -> Response {
        let mut response = http::Response::new(body.to_string());
        *response.status_mut() = http::StatusCode::from_u16(status).unwrap();
        if let Some(value) = content_type {
            response
                .headers_mut()
                .insert(http::header::CONTENT_TYPE, value.parse().unwrap());
        }
        Response::from(response)
    }

    #[tokio::test]
    async fn json_api_body_yields_error_objects() {
        let response = response_with(
            422,
            Some("application/vnd.api+json; charset=utf-8"),
            r#"{"errors": [{"title": "Invalid"}]}"#,
        );

        let detail = ErrorDetail::from_response(response).await;

        assert_eq!(
            detail,
            ErrorDetail::Errors(vec![JsonApiError {
                title: Some("Invalid".to_string()),
                ..JsonApiError::default()
            }])
        );
    }

    #[tokio::test]
    async fn plain_json_body_yields_message() {
        let response = response_with(
            403,
            Some("application/json"),
            r#"{"message": "Forbidden by policy"}"#,
        );

        let detail = ErrorDetail::from_response(response).await;

        assert_eq!(detail, ErrorDetail::Message("Forbidden by policy".to_string()));
    }

    #[tokio::test]
    async fn unparseable_json_falls_back_to_status_text() {
        let response = response_with(500, Some("application/json"), "not json at all");

        let detail = ErrorDetail::from_response(response).await;

        assert_eq!(
            detail,
            ErrorDetail::Message("Internal Server Error".to_string())
        );
    }

    #[tokio::test]
    async fn non_json_content_type_falls_back_to_status_text() {
        let response = response_with(503, Some("text/html"), "<html>down</html>");

        let detail = ErrorDetail::from_response(response).await;

        assert_eq!(
            detail,
            ErrorDetail::Message("Service Unavailable".to_string())
        );
    }

    #[tokio::test]
    async fn missing_content_type_falls_back_to_status_text() {
        let response = response_with(404, None, "");

        let detail = ErrorDetail::from_response(response).await;

        assert_eq!(detail, ErrorDetail::Message("Not Found".to_string()));
    }

    #[tokio::test]
    async fn unknown_status_code_falls_back_to_its_number() {
        let response = response_with(599, Some("text/plain"), "");

        let detail = ErrorDetail::from_response(response).await;

        assert_eq!(detail, ErrorDetail::Message("599".to_string()));
    }

    #[tokio::test]
    async fn check_response_passes_success_through() {
        let response = response_with(200, Some("application/json"), "{}");

        let checked = check_response(response, "Error fetching resource").await;

        assert!(checked.is_ok());
    }

    #[tokio::test]
    async fn check_response_raises_upstream_with_prefix() {
        let response = response_with(
            422,
            Some("application/vnd.api+json"),
            r#"{"errors": [{"title": "Unprocessable Entity", "detail": "title is required"}]}"#,
        );

        let error = check_response(response, "Error creating resource")
            .await
            .unwrap_err();

        assert_eq!(error.status_code(), Some(StatusCode::UNPROCESSABLE_ENTITY));
        assert_eq!(
            error.to_string(),
            "Error creating resource: Unprocessable Entity: title is required"
        );
    }

    #[test]
    fn retryable_classification() {
        let upstream = Error::Upstream {
            status: StatusCode::TOO_MANY_REQUESTS,
            prefix: "Error fetching resource".to_string(),
            detail: ErrorDetail::Message("slow down".to_string()),
        };
        assert!(upstream.is_retryable());

        let config = Error::config("base_url is required");
        assert!(!config.is_retryable());
        assert!(config.status_code().is_none());
    }
}
