//! Error type for the posts API client.
//!
//! # Design
//! There is exactly one error kind. Whatever went wrong (a non-2xx status, a
//! transport failure, an unexpected body) is reduced to a human-readable
//! message, and the message is all a caller gets.
//!
//! Error bodies come in three shapes: `{"error": "..."}`, `{"errors": [...]}`,
//! or something else entirely (empty, not JSON, unrelated JSON). `ErrorBody`
//! names those shapes once, at the boundary, and `ApiError::from_status` turns
//! them into the message.

use serde_json::Value;

/// The single error returned by every client operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    message: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Build the error for a non-success response.
    ///
    /// Precedence: `error`, then `errors` joined with `", "`, then a fallback
    /// naming the status code.
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = match ErrorBody::parse(body) {
            ErrorBody::Message(message) => message,
            ErrorBody::Messages(messages) => messages.join(", "),
            ErrorBody::Absent => format!("Request failed: {status}"),
        };
        Self { message }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// The recognised shapes of a non-success response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorBody {
    Message(String),
    Messages(Vec<String>),
    /// Empty, unparsable, or carrying neither usable field.
    Absent,
}

impl ErrorBody {
    /// Each field is judged on its own, so a malformed sibling never hides a
    /// usable one.
    pub fn parse(body: &str) -> Self {
        let Ok(Value::Object(fields)) = serde_json::from_str::<Value>(body) else {
            return ErrorBody::Absent;
        };
        if let Some(Value::String(error)) = fields.get("error") {
            if !error.is_empty() {
                return ErrorBody::Message(error.clone());
            }
        }
        if let Some(Value::Array(items)) = fields.get("errors") {
            let errors: Option<Vec<String>> = items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect();
            // an empty list, or a list of empty strings, joins to nothing
            if let Some(errors) = errors.filter(|e| e.iter().any(|m| !m.is_empty())) {
                return ErrorBody::Messages(errors);
            }
        }
        ErrorBody::Absent
    }
}
