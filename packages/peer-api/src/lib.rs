//! Request and response types for the peer node management API.
//!
//! A peer node exposes its management surface under a single base path
//! (conventionally `http://<host>:<port>/peer`). This crate encodes that
//! contract as Rust types so the client and the test stub agree on it.
//!
//! # Endpoints covered
//!
//! | Method | Path | Type |
//! |--------|------|------|
//! | POST | `/initialize` | [`InitializeQuery`] → [`NodeAck`] |
//! | POST | `/create_topic` | bare JSON string → [`TopicAck`] |
//! | POST | `/publish` | [`PublishRequest`] → [`TopicAck`] |
//! | GET | `/subscribe/{topic}` | → [`TopicAck`] |
//! | GET | `/pull_messages/{topic}` | → [`MessagesResponse`] |
//! | POST | `/register_with_indexing_server` | → [`NodeAck`] |
//! | POST | `/unregister` | [`UnregisterRequest`] → [`NodeAck`] |
//! | POST | `/update_topics` | [`UpdateTopicsRequest`] → [`TopicsResponse`] |
//! | GET | `/query_topic/{topic}` | → [`QueryResponse`] |
//! | POST | `/report_metrics` | [`MetricsReport`] → [`MetricsResponse`] |
//! | GET | `/get_metrics` | → [`MetricsResponse`] |
//! | GET | `/event_log` | → [`EventLogResponse`] |
//!
//! Any endpoint may instead answer with an [`ErrorEnvelope`] and a 200 status.

pub mod error;
pub mod metrics;
pub mod node;
pub mod topic;

pub use error::ErrorEnvelope;
pub use metrics::{MetricsReport, MetricsResponse};
pub use node::{
    EventLogResponse, InitializeQuery, NodeAck, TopicsResponse, UnregisterRequest,
    UpdateTopicsRequest,
};
pub use topic::{MessagesResponse, PublishRequest, QueryResponse, TopicAck};
