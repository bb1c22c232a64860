//! Response body decoding.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure to decode a body under its declared content type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The response declared JSON but the body is not valid JSON.
    #[error("invalid JSON response body: {0}")]
    InvalidJson(String),
}

/// A decoded response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ResponseData {
    /// Structured body from a JSON content type.
    Json(serde_json::Value),
    /// Any other body, captured as text.
    Text(String),
}

/// Coarse description of a JSON payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    /// A JSON array with its element count.
    Array(usize),
    /// A JSON object.
    Object,
    /// A string, number, boolean or null.
    Scalar,
}

/// Returns true when a `Content-Type` value denotes JSON.
///
/// Accepts `application/json` with any parameters and `+json` suffix types
/// such as `application/problem+json`.
#[must_use]
pub fn is_json_content_type(content_type: &str) -> bool {
    match content_type.parse::<mime::Mime>() {
        Ok(parsed) => {
            parsed.subtype() == mime::JSON || parsed.suffix() == Some(mime::JSON)
        }
        Err(_) => content_type
            .to_ascii_lowercase()
            .contains("application/json"),
    }
}

impl ResponseData {
    /// Decodes a body, choosing JSON or text from the content type.
    ///
    /// # Errors
    ///
    /// Returns `DecodeError::InvalidJson` when a JSON content type carries
    /// an unparseable body. An empty JSON body is an error as well.
    pub fn decode(content_type: Option<&str>, body: &[u8]) -> Result<Self, DecodeError> {
        if content_type.is_some_and(is_json_content_type) {
            serde_json::from_slice(body)
                .map(Self::Json)
                .map_err(|e| DecodeError::InvalidJson(e.to_string()))
        } else {
            Ok(Self::Text(String::from_utf8_lossy(body).into_owned()))
        }
    }

    /// Returns the payload shape for JSON data.
    #[must_use]
    pub fn shape(&self) -> Option<PayloadShape> {
        match self {
            Self::Json(serde_json::Value::Array(items)) => Some(PayloadShape::Array(items.len())),
            Self::Json(serde_json::Value::Object(_)) => Some(PayloadShape::Object),
            Self::Json(_) => Some(PayloadShape::Scalar),
            Self::Text(_) => None,
        }
    }

    /// Returns at most `limit` characters of the body for display.
    #[must_use]
    pub fn preview(&self, limit: usize) -> String {
        match self {
            Self::Text(text) => text.chars().take(limit).collect(),
            Self::Json(value) => value.to_string().chars().take(limit).collect(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_json_content_types() {
        assert!(is_json_content_type("application/json"));
        assert!(is_json_content_type("application/json; charset=utf-8"));
        assert!(is_json_content_type("application/problem+json"));
        assert!(is_json_content_type("APPLICATION/JSON"));
        assert!(!is_json_content_type("text/html"));
        assert!(!is_json_content_type("text/plain; charset=utf-8"));
    }

    #[test]
    fn test_decode_json() {
        let data = ResponseData::decode(Some("application/json"), br#"[{"name":"a"}]"#).unwrap();
        assert_eq!(data, ResponseData::Json(json!([{"name": "a"}])));
        assert_eq!(data.shape(), Some(PayloadShape::Array(1)));
    }

    #[test]
    fn test_decode_text_without_content_type() {
        let data = ResponseData::decode(None, b"Unauthorized").unwrap();
        assert_eq!(data, ResponseData::Text("Unauthorized".to_string()));
        assert_eq!(data.shape(), None);
    }

    #[test]
    fn test_decode_invalid_json_is_an_error() {
        let result = ResponseData::decode(Some("application/json"), b"<html>");
        assert!(matches!(result, Err(DecodeError::InvalidJson(_))));

        let empty = ResponseData::decode(Some("application/json"), b"");
        assert!(empty.is_err());
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        let data = ResponseData::Text("héllo wörld".to_string());
        assert_eq!(data.preview(5), "héllo");

        let json = ResponseData::Json(json!({"a": 1}));
        assert_eq!(json.preview(200), r#"{"a":1}"#);
        assert_eq!(json.shape(), Some(PayloadShape::Object));
    }
}
