//! Node lifecycle types — initialize, register, unregister, update topics,
//! and the node's event log.

use serde::{Deserialize, Serialize};

/// Query string for `POST /initialize`.
///
/// Both values are forwarded as typed by the user; the node is responsible
/// for validating the port.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InitializeQuery {
    #[serde(rename = "indexServerIp")]
    pub index_server_ip: String,

    #[serde(rename = "indexServerPort")]
    pub index_server_port: String,
}

/// Response carrying a node identifier.
///
/// Returned by `POST /initialize`, `POST /register_with_indexing_server` and
/// `POST /unregister`.
///
/// ```json
/// { "status": "initialized", "node_id": "peer1" }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NodeAck {
    pub node_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Request body for `POST /unregister`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UnregisterRequest {
    pub node_id: String,
}

/// Request body for `POST /update_topics`: replace the topics a node hosts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateTopicsRequest {
    pub node_id: String,
    pub topics: Vec<String>,
}

/// Response body for `POST /update_topics`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TopicsResponse {
    pub topics: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Response body for `GET /event_log`.
///
/// Each entry is a preformatted line such as
/// `"2026-10-18T09:12:01 - Event: Created Topic, Details: news"`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventLogResponse {
    pub event_log: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initialize_query_uses_camel_case_names() {
        let q = InitializeQuery {
            index_server_ip: "127.0.0.1".into(),
            index_server_port: "8080".into(),
        };
        let json = serde_json::to_value(&q).unwrap();
        assert_eq!(json["indexServerIp"], "127.0.0.1");
        assert_eq!(json["indexServerPort"], "8080");
    }

    #[test]
    fn node_ack_status_is_optional() {
        let ack: NodeAck = serde_json::from_str(r#"{"node_id":"peer1"}"#).unwrap();
        assert_eq!(ack.node_id, "peer1");
        assert!(ack.status.is_none());
        assert!(!serde_json::to_string(&ack).unwrap().contains("status"));
    }

    #[test]
    fn node_ack_requires_node_id() {
        assert!(serde_json::from_str::<NodeAck>(r#"{"status":"registered"}"#).is_err());
    }

    #[test]
    fn update_topics_keeps_topic_order_and_whitespace() {
        let req = UpdateTopicsRequest {
            node_id: "n1".into(),
            topics: vec!["a".into(), " b ".into(), "c".into()],
        };
        let json = serde_json::to_string(&req).unwrap();
        assert_eq!(json, r#"{"node_id":"n1","topics":["a"," b ","c"]}"#);
    }
}
