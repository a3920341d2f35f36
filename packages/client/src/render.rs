//! One-line text summaries of peer API responses.
//!
//! These are the lines a front end shows after a successful call. They are a
//! presentation concern only; the JSON wire format is what the client
//! returns.

use pubsub_peer_api::{
    EventLogResponse, MessagesResponse, MetricsResponse, NodeAck, QueryResponse, TopicAck,
    TopicsResponse,
};
use serde_json::Value;

pub fn initialized(ack: &NodeAck) -> String {
    format!("Peer initialized with ID: {}", ack.node_id)
}

pub fn topic_created(ack: &TopicAck) -> String {
    format!("Topic created: {}", ack.topic)
}

pub fn published(ack: &TopicAck) -> String {
    format!("Message published to {}", ack.topic)
}

pub fn subscribed(ack: &TopicAck) -> String {
    format!("Subscribed to {}", ack.topic)
}

/// `Messages: m1, m2`. An empty pull renders as `Messages: ` with no content.
pub fn messages(resp: &MessagesResponse) -> String {
    format!("Messages: {}", resp.messages.join(", "))
}

pub fn registered(ack: &NodeAck) -> String {
    format!("Node registered: {}", ack.node_id)
}

pub fn unregistered(ack: &NodeAck) -> String {
    format!("Node unregistered: {}", ack.node_id)
}

pub fn topics_updated(resp: &TopicsResponse) -> String {
    format!("Topics updated: {}", resp.topics.join(", "))
}

pub fn query_result(resp: &QueryResponse) -> String {
    format!("Query result: {}", display_value(&resp.result))
}

pub fn metrics_reported(resp: &MetricsResponse) -> String {
    format!("Metrics reported: {}", metric_pair(resp))
}

pub fn metrics(resp: &MetricsResponse) -> String {
    format!("Metrics: {}", metric_pair(resp))
}

pub fn event_log(resp: &EventLogResponse) -> String {
    format!("Event log: {}", resp.event_log.join(", "))
}

fn metric_pair(resp: &MetricsResponse) -> String {
    format!(
        "Latency - {}ms, Bandwidth - {}Mbps",
        display_value(&resp.latency),
        display_value(&resp.bandwidth)
    )
}

/// Render a raw JSON value for display.
///
/// Strings appear without quotes; everything else uses its JSON text.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_pull_renders_empty_content() {
        let resp = MessagesResponse {
            messages: vec![],
            status: None,
        };
        assert_eq!(messages(&resp), "Messages: ");
    }

    #[test]
    fn messages_are_comma_joined() {
        let resp = MessagesResponse {
            messages: vec!["hello".into(), "world".into()],
            status: Some("success".into()),
        };
        assert_eq!(messages(&resp), "Messages: hello, world");
    }

    #[test]
    fn metrics_accept_numbers_and_strings() {
        let resp = MetricsResponse {
            latency: json!(12),
            bandwidth: json!("100"),
            status: None,
        };
        assert_eq!(metrics(&resp), "Metrics: Latency - 12ms, Bandwidth - 100Mbps");
        assert_eq!(
            metrics_reported(&resp),
            "Metrics reported: Latency - 12ms, Bandwidth - 100Mbps"
        );
    }

    #[test]
    fn query_result_strings_are_unquoted() {
        let resp = QueryResponse {
            result: json!("peer2"),
            status: None,
        };
        assert_eq!(query_result(&resp), "Query result: peer2");

        let resp = QueryResponse {
            result: json!({ "node_id": "peer2" }),
            status: None,
        };
        assert_eq!(query_result(&resp), r#"Query result: {"node_id":"peer2"}"#);
    }

    #[test]
    fn node_lines() {
        let ack = NodeAck {
            node_id: "peer1".into(),
            status: None,
        };
        assert_eq!(initialized(&ack), "Peer initialized with ID: peer1");
        assert_eq!(registered(&ack), "Node registered: peer1");
        assert_eq!(unregistered(&ack), "Node unregistered: peer1");
    }

    #[test]
    fn topic_lines() {
        let ack = TopicAck {
            topic: "news".into(),
            status: None,
        };
        assert_eq!(topic_created(&ack), "Topic created: news");
        assert_eq!(published(&ack), "Message published to news");
        assert_eq!(subscribed(&ack), "Subscribed to news");
    }

    #[test]
    fn updated_topics_keep_whitespace() {
        let resp = TopicsResponse {
            topics: vec!["a".into(), " b ".into(), "c".into()],
            status: None,
        };
        assert_eq!(topics_updated(&resp), "Topics updated: a,  b , c");
    }
}
