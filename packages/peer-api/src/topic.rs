//! Topic types — create, publish, subscribe, pull and query.
//!
//! `POST /create_topic` has no request type: its body is the topic name
//! encoded as a bare JSON string (`"news"`), not an object.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request body for `POST /publish`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PublishRequest {
    pub topic: String,
    pub message: String,
}

/// Response naming the topic an operation acted on.
///
/// Returned by `POST /create_topic`, `POST /publish` and
/// `GET /subscribe/{topic}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TopicAck {
    pub topic: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Response body for `GET /pull_messages/{topic}`.
///
/// Pulling drains the topic on the node; an empty list is a valid answer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessagesResponse {
    pub messages: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Response body for `GET /query_topic/{topic}`.
///
/// `result` is whatever the node reports (typically the id of the hosting
/// node) and is kept as raw JSON.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueryResponse {
    pub result: Value,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_message_list_is_valid() {
        let resp: MessagesResponse = serde_json::from_str(r#"{"messages":[]}"#).unwrap();
        assert!(resp.messages.is_empty());
    }

    #[test]
    fn messages_field_is_required() {
        let err = serde_json::from_str::<MessagesResponse>(r#"{"status":"success"}"#);
        assert!(err.is_err());
    }

    #[test]
    fn query_result_keeps_raw_json() {
        let resp: QueryResponse =
            serde_json::from_str(r#"{"result":{"node_id":"peer2"},"status":"found"}"#).unwrap();
        assert_eq!(resp.result["node_id"], "peer2");
        assert_eq!(resp.status.as_deref(), Some("found"));
    }

    #[test]
    fn query_result_must_be_present() {
        assert!(serde_json::from_str::<QueryResponse>(r#"{"status":"found"}"#).is_err());
    }

    #[test]
    fn publish_request_shape() {
        let req = PublishRequest {
            topic: "news".into(),
            message: "hello".into(),
        };
        assert_eq!(
            serde_json::to_string(&req).unwrap(),
            r#"{"topic":"news","message":"hello"}"#
        );
    }
}
