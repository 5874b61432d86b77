//! API Error Types
//!
//! Every backend failure is normalized into [`ApiError`] before it leaves the
//! API layer, so pages never see raw transport errors.

use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// Key used for errors that do not belong to a single form field
pub const GENERAL_FIELD: &str = "general";

/// Fallback message for error payloads we cannot interpret
pub const UNKNOWN_ERROR: &str = "Unknown error occurred";

/// API error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// The request never produced a response
    #[error("Network error: {0}")]
    Network(String),

    /// The backend rejected the access credential (HTTP 401)
    #[error("Unauthorized")]
    Unauthorized,

    /// The credential could not be renewed
    #[error("Session expired")]
    SessionExpired,

    /// The backend rejected the submitted data (HTTP 400)
    #[error("Validation error: {0}")]
    Validation(FieldErrors),

    /// Any other non-success status
    #[error("Backend error {status}: {message}")]
    Backend { status: u16, message: String },

    /// The response body did not have the expected shape
    #[error("Parse error: {0}")]
    Decode(String),
}

impl ApiError {
    /// Build an error from a non-success status and its raw body
    pub fn from_status(status: u16, body: &str) -> Self {
        match status {
            401 => ApiError::Unauthorized,
            400 => {
                let payload = serde_json::from_str(body).unwrap_or(Value::Null);
                ApiError::Validation(FieldErrors::from_payload(&payload))
            }
            _ => ApiError::Backend {
                status,
                message: backend_message(body),
            },
        }
    }

    /// Human-readable detail supplied by the backend, if any
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Validation(fields) => fields.general(),
            ApiError::Backend { message, .. } if !message.is_empty() => Some(message),
            _ => None,
        }
    }

    /// Whether this error should trigger the refresh-and-retry path
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }
}

/// Pull a message out of an error body (`detail`, then `error`, then raw text)
fn backend_message(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => ["detail", "error"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str))
            .map(str::to_string)
            .unwrap_or_default(),
        _ => body.trim().to_string(),
    }
}

/// Mapping from form field name to the first error reported for it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Errors holding only a general message
    pub fn general_only(message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.insert(GENERAL_FIELD, message);
        errors
    }

    /// Unpack a backend validation payload.
    ///
    /// A top-level `error` string becomes the general message. Otherwise each
    /// key maps to the first element of its array, or to the value itself.
    /// Anything unrecognized falls back to [`UNKNOWN_ERROR`].
    pub fn from_payload(payload: &Value) -> Self {
        let Value::Object(map) = payload else {
            return Self::general_only(UNKNOWN_ERROR);
        };

        if let Some(error) = map.get("error") {
            return Self::general_only(value_text(error));
        }

        let mut errors = Self::new();
        for (field, value) in map {
            let message = match value {
                Value::Array(items) => match items.first() {
                    Some(first) => value_text(first),
                    None => continue,
                },
                other => value_text(other),
            };
            errors.insert(field.clone(), message);
        }

        if errors.is_empty() {
            return Self::general_only(UNKNOWN_ERROR);
        }
        errors
    }

    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.insert(field.into(), message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn general(&self) -> Option<&str> {
        self.get(GENERAL_FIELD)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.iter().map(|(k, v)| format!("{}: {}", k, v)).collect();
        write!(f, "{}", parts.join(", "))
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_401_is_unauthorized() {
        let err = ApiError::from_status(401, r#"{"error": "Invalid credentials"}"#);
        assert_eq!(err, ApiError::Unauthorized);
        assert!(err.is_unauthorized());
    }

    #[test]
    fn test_status_400_unpacks_fields() {
        let body = r#"{"username": ["A user with that username already exists."], "email": "bad"}"#;
        let ApiError::Validation(fields) = ApiError::from_status(400, body) else {
            panic!("expected validation error");
        };
        assert_eq!(
            fields.get("username"),
            Some("A user with that username already exists.")
        );
        assert_eq!(fields.get("email"), Some("bad"));
        assert_eq!(fields.general(), None);
    }

    #[test]
    fn test_error_key_becomes_general() {
        let fields = FieldErrors::from_payload(&json!({"error": "This password is too common."}));
        assert_eq!(fields.len(), 1);
        assert_eq!(fields.general(), Some("This password is too common."));
    }

    #[test]
    fn test_unrecognized_payload_falls_back() {
        assert_eq!(FieldErrors::from_payload(&json!("oops")).general(), Some(UNKNOWN_ERROR));
        assert_eq!(FieldErrors::from_payload(&json!({})).general(), Some(UNKNOWN_ERROR));

        let ApiError::Validation(fields) = ApiError::from_status(400, "<html>Bad Request</html>")
        else {
            panic!("expected validation error");
        };
        assert_eq!(fields.general(), Some(UNKNOWN_ERROR));
    }

    #[test]
    fn test_backend_message_extraction() {
        let err = ApiError::from_status(500, r#"{"error": "Failed to generate text"}"#);
        assert_eq!(err.detail(), Some("Failed to generate text"));

        let err = ApiError::from_status(403, r#"{"detail": "Forbidden"}"#);
        assert_eq!(err.detail(), Some("Forbidden"));

        let err = ApiError::from_status(502, "Bad Gateway\n");
        assert_eq!(
            err,
            ApiError::Backend {
                status: 502,
                message: "Bad Gateway".to_string()
            }
        );
    }

    #[test]
    fn test_network_has_no_detail() {
        assert_eq!(ApiError::Network("refused".into()).detail(), None);
        assert_eq!(ApiError::Unauthorized.detail(), None);
    }
}
