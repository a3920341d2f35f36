//! The error envelope a peer node returns in place of a normal body.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body returned by a peer node when it refuses a request.
///
/// The node answers with HTTP 200 and this body rather than an error status:
///
/// ```json
/// { "status": "error", "message": "Topic not hosted here" }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorEnvelope {
    /// Always [`ErrorEnvelope::STATUS`].
    pub status: String,

    /// Human-readable reason.
    #[serde(default)]
    pub message: String,
}

impl ErrorEnvelope {
    /// The `status` value that marks a body as an error.
    pub const STATUS: &'static str = "error";

    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: Self::STATUS.to_string(),
            message: message.into(),
        }
    }

    /// Recognise an error envelope inside an already-parsed JSON body.
    ///
    /// Returns `None` for any body whose `status` is not `"error"`.
    pub fn detect(body: &Value) -> Option<Self> {
        if body.get("status").and_then(Value::as_str) != Some(Self::STATUS) {
            return None;
        }
        Some(Self::new(
            body.get("message")
                .and_then(Value::as_str)
                .unwrap_or_default(),
        ))
    }
}

/// Status strings a peer node attaches to successful responses.
pub mod statuses {
    pub const INITIALIZED: &str = "initialized";
    pub const CREATED: &str = "created";
    pub const PUBLISHED: &str = "published";
    pub const SUBSCRIBED: &str = "subscribed";
    pub const SUCCESS: &str = "success";
    pub const REGISTERED: &str = "registered";
    pub const UNREGISTERED: &str = "unregistered";
    pub const UPDATED: &str = "updated";
    pub const METRICS_REPORTED: &str = "metrics_reported";
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn detects_error_status() {
        let body = json!({ "status": "error", "message": "Topic not found" });
        let env = ErrorEnvelope::detect(&body).unwrap();
        assert_eq!(env.message, "Topic not found");
    }

    #[test]
    fn ignores_success_status() {
        let body = json!({ "status": statuses::PUBLISHED, "topic": "news" });
        assert!(ErrorEnvelope::detect(&body).is_none());
    }

    #[test]
    fn ignores_bodies_without_status() {
        assert!(ErrorEnvelope::detect(&json!({ "topic": "news" })).is_none());
        assert!(ErrorEnvelope::detect(&json!("error")).is_none());
    }

    #[test]
    fn missing_message_is_empty() {
        let env = ErrorEnvelope::detect(&json!({ "status": "error" })).unwrap();
        assert_eq!(env, ErrorEnvelope::new(""));
    }
}
