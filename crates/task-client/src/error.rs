//! Client Errors
//!
//! Every failure renders as a single human-readable message through `Display`,
//! which is what the views show inline.

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request never produced a response
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx response, message already normalized from the body
    #[error("{message}")]
    Http { status: u16, message: String },

    /// A successful response lacked a field the client needs
    #[error("{0}")]
    MissingField(&'static str),

    #[error("Unexpected response from server: {0}")]
    Decode(String),

    #[error("{0}")]
    Validation(String),

    #[error("Could not access browser storage: {0}")]
    Storage(String),
}

impl ApiError {
    /// Build an `Http` error from a failed response.
    pub fn from_response(status: u16, status_text: &str, body: &str) -> Self {
        ApiError::Http {
            status,
            message: message_from_body(status, status_text, body),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Extract a readable message from an error response body.
///
/// Looks at `detail`, `message` and `error` first, then bare strings, arrays
/// and `errors` maps. Falls back to the status text when the body is not JSON.
/// Never returns an empty string.
pub fn message_from_body(status: u16, status_text: &str, body: &str) -> String {
    let fallback = || {
        if status_text.trim().is_empty() {
            format!("HTTP error! status: {}", status)
        } else {
            status_text.trim().to_string()
        }
    };

    let parsed: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(_) => return fallback(),
    };

    let message = match &parsed {
        Value::Object(map) => ["detail", "message", "error"]
            .iter()
            .find_map(|key| map.get(*key).and_then(describe))
            .or_else(|| map.get("errors").and_then(flatten_errors))
            .or_else(|| Some(parsed.to_string())),
        Value::Null => None,
        other => describe(other),
    };

    message.filter(|m| !m.trim().is_empty()).unwrap_or_else(fallback)
}

/// Render one JSON value as text, `None` when it carries nothing to show.
fn describe(value: &Value) -> Option<String> {
    let text = match value {
        Value::Null => return None,
        Value::Bool(false) => return None,
        Value::String(s) => s.trim().to_string(),
        Value::Array(items) => items
            .iter()
            .filter_map(describe_item)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    };
    (!text.is_empty()).then_some(text)
}

/// Array entries: plain strings or validation objects like `{"loc": [...], "msg": "..."}`.
fn describe_item(item: &Value) -> Option<String> {
    match item {
        Value::Object(map) => ["msg", "message", "detail"]
            .iter()
            .find_map(|key| map.get(*key).and_then(describe))
            .or_else(|| Some(item.to_string())),
        other => describe(other),
    }
}

/// `{"errors": {"title": ["too long"], "email": "taken"}}` -> "too long, taken"
fn flatten_errors(errors: &Value) -> Option<String> {
    match errors {
        Value::Object(map) => {
            let joined = map
                .values()
                .filter_map(describe)
                .collect::<Vec<_>>()
                .join(", ");
            (!joined.is_empty()).then_some(joined)
        }
        other => describe(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_string() {
        let msg = message_from_body(401, "Unauthorized", r#"{"detail":"Incorrect email or password"}"#);
        assert_eq!(msg, "Incorrect email or password");
    }

    #[test]
    fn test_message_and_error_fields() {
        assert_eq!(message_from_body(400, "", r#"{"message":"Bad title"}"#), "Bad title");
        assert_eq!(message_from_body(500, "", r#"{"error":"boom"}"#), "boom");
        // detail wins over message
        assert_eq!(
            message_from_body(400, "", r#"{"message":"second","detail":"first"}"#),
            "first"
        );
    }

    #[test]
    fn test_bare_string_body() {
        assert_eq!(message_from_body(409, "Conflict", r#""already exists""#), "already exists");
    }

    #[test]
    fn test_array_body() {
        assert_eq!(message_from_body(400, "", r#"["a","b"]"#), "a, b");
    }

    #[test]
    fn test_errors_map() {
        let msg = message_from_body(
            422,
            "Unprocessable Entity",
            r#"{"errors":{"title":["is required","too short"],"email":"taken"}}"#,
        );
        assert!(msg.contains("is required, too short"));
        assert!(msg.contains("taken"));
    }

    #[test]
    fn test_validation_detail_array() {
        let body = r#"{"detail":[{"loc":["body","email"],"msg":"field required","type":"value_error.missing"}]}"#;
        assert_eq!(message_from_body(422, "", body), "field required");
    }

    #[test]
    fn test_unknown_object_is_stringified() {
        assert_eq!(message_from_body(400, "", r#"{"code":7}"#), r#"{"code":7}"#);
    }

    #[test]
    fn test_unparseable_body_uses_status_text() {
        assert_eq!(message_from_body(502, "Bad Gateway", "<html>oops</html>"), "Bad Gateway");
        assert_eq!(message_from_body(502, "", "<html>oops</html>"), "HTTP error! status: 502");
    }

    #[test]
    fn test_never_empty() {
        for body in ["", "null", r#""""#, "[]", r#"{"detail":""}"#, r#"{"errors":{}}"#] {
            let msg = message_from_body(500, "", body);
            assert!(!msg.trim().is_empty(), "empty message for body {:?}", body);
        }
    }

    #[test]
    fn test_http_error_display() {
        let err = ApiError::from_response(404, "Not Found", r#"{"detail":"Task not found"}"#);
        assert_eq!(err.to_string(), "Task not found");
        assert_eq!(err.status(), Some(404));
    }
}
