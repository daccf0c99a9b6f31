//! JSON:API error document models.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single error object from a JSON:API error document.
///
/// All members are optional per the JSON:API specification; servers populate
/// whichever subset applies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonApiError {
    /// Unique identifier for this occurrence of the problem.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// HTTP status code, expressed as a string as JSON:API requires.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Application-specific error code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Short, human-readable summary of the problem.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Human-readable explanation specific to this occurrence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Reference to the source of the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<JsonApiErrorSource>,
    /// Non-standard meta-information about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
}

/// The `source` member of a JSON:API error object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonApiErrorSource {
    /// JSON Pointer to the offending document member.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pointer: Option<String>,
    /// Query parameter that caused the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameter: Option<String>,
    /// Request header that caused the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
}

impl fmt::Display for JsonApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.title, &self.detail) {
            (Some(title), Some(detail)) => write!(f, "{title}: {detail}"),
            (Some(title), None) => f.write_str(title),
            (None, Some(detail)) => f.write_str(detail),
            (None, None) => f.write_str("unknown error"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_sparse_error_object() {
        let error: JsonApiError =
            serde_json::from_str(r#"{"title": "Invalid"}"#).unwrap();

        assert_eq!(
            error,
            JsonApiError {
                title: Some("Invalid".to_string()),
                ..JsonApiError::default()
            }
        );
    }

    #[test]
    fn deserializes_full_error_object() {
        let error: JsonApiError = serde_json::from_str(
            r#"{
                "status": "422",
                "code": "validation_failed",
                "title": "Unprocessable Entity",
                "detail": "title: this field cannot be empty",
                "source": {"pointer": "/data/attributes/title"}
            }"#,
        )
        .unwrap();

        assert_eq!(error.status.as_deref(), Some("422"));
        assert_eq!(
            error.source,
            Some(JsonApiErrorSource {
                pointer: Some("/data/attributes/title".to_string()),
                ..JsonApiErrorSource::default()
            })
        );
    }

    #[test]
    fn displays_available_members() {
        let error = JsonApiError {
            title: Some("Unprocessable Entity".to_string()),
            detail: Some("title is required".to_string()),
            ..JsonApiError::default()
        };
        assert_eq!(error.to_string(), "Unprocessable Entity: title is required");

        let title_only = JsonApiError {
            title: Some("Forbidden".to_string()),
            ..JsonApiError::default()
        };
        assert_eq!(title_only.to_string(), "Forbidden");

        assert_eq!(JsonApiError::default().to_string(), "unknown error");
    }
}
