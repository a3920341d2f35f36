//! The peer API client.
//!
//! [`PeerApiClient`] maps each management endpoint of a peer node to one
//! async method. Calls are independent: the client keeps no per-call state,
//! never retries, and never orders or de-duplicates concurrent calls.
//!
//! Response handling is the same for every endpoint:
//! 1. A transport failure becomes [`ClientError::Network`].
//! 2. A non-2xx status becomes [`ClientError::Backend`] with the raw body.
//! 3. A body that is not JSON becomes [`ClientError::Parse`].
//! 4. The node's `{"status":"error"}` envelope becomes [`ClientError::Rejected`].
//! 5. Otherwise the body is decoded into the endpoint's response type; a
//!    missing documented field is a [`ClientError::Parse`].

use pubsub_peer_api::{
    ErrorEnvelope, EventLogResponse, InitializeQuery, MessagesResponse, MetricsReport,
    MetricsResponse, NodeAck, PublishRequest, QueryResponse, TopicAck, TopicsResponse,
    UnregisterRequest, UpdateTopicsRequest,
};
use reqwest::{header, Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::ClientError;

/// Split a comma-separated topic list the way the management page does.
///
/// Entries are not trimmed: `"a, b ,c"` becomes `["a", " b ", "c"]`.
pub fn split_topics(raw: &str) -> Vec<String> {
    raw.split(',').map(str::to_owned).collect()
}

/// HTTP client for one peer node.
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct PeerApiClient {
    http: Client,
    base_url: String,
}

impl PeerApiClient {
    /// Build a client with its own `reqwest::Client`, applying the configured
    /// timeout.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(ClientError::Network)?;
        Self::with_http_client(http, config)
    }

    /// Build a client around a pre-configured `reqwest::Client`.
    ///
    /// The config's timeout is ignored; configure it on `http` instead.
    pub fn with_http_client(http: Client, config: &ClientConfig) -> Result<Self, ClientError> {
        config.validate()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // -----------------------------------------------------------------------
    // Node lifecycle
    // -----------------------------------------------------------------------

    /// `POST /initialize?indexServerIp=..&indexServerPort=..`: point the node
    /// at an indexing server and have it assign itself an id.
    pub async fn initialize(
        &self,
        index_server_ip: &str,
        index_server_port: &str,
    ) -> Result<NodeAck, ClientError> {
        let query = InitializeQuery {
            index_server_ip: index_server_ip.to_string(),
            index_server_port: index_server_port.to_string(),
        };
        self.execute(self.request(Method::POST, "/initialize").query(&query))
            .await
    }

    /// `POST /register_with_indexing_server`
    pub async fn register_node(&self) -> Result<NodeAck, ClientError> {
        self.execute(self.request(Method::POST, "/register_with_indexing_server"))
            .await
    }

    /// `POST /unregister`
    pub async fn unregister_node(&self, node_id: &str) -> Result<NodeAck, ClientError> {
        let body = UnregisterRequest {
            node_id: node_id.to_string(),
        };
        self.execute(self.request(Method::POST, "/unregister").json(&body))
            .await
    }

    /// `POST /update_topics`: replace the node's hosted topics.
    ///
    /// `topics` is sent verbatim; use [`split_topics`] to build it from user
    /// input.
    pub async fn update_topics(
        &self,
        node_id: &str,
        topics: Vec<String>,
    ) -> Result<TopicsResponse, ClientError> {
        let body = UpdateTopicsRequest {
            node_id: node_id.to_string(),
            topics,
        };
        self.execute(self.request(Method::POST, "/update_topics").json(&body))
            .await
    }

    /// `GET /event_log`
    pub async fn event_log(&self) -> Result<EventLogResponse, ClientError> {
        self.execute(self.request(Method::GET, "/event_log")).await
    }

    // -----------------------------------------------------------------------
    // Topics
    // -----------------------------------------------------------------------

    /// `POST /create_topic`.
    ///
    /// The body is the topic name as a bare JSON string (`"news"`), which is
    /// what the node's handler expects. Every other POST sends an object.
    pub async fn create_topic(&self, topic: &str) -> Result<TopicAck, ClientError> {
        self.execute(self.request(Method::POST, "/create_topic").json(topic))
            .await
    }

    /// `POST /publish`
    pub async fn publish(&self, topic: &str, message: &str) -> Result<TopicAck, ClientError> {
        let body = PublishRequest {
            topic: topic.to_string(),
            message: message.to_string(),
        };
        self.execute(self.request(Method::POST, "/publish").json(&body))
            .await
    }

    /// `GET /subscribe/{topic}`
    pub async fn subscribe(&self, topic: &str) -> Result<TopicAck, ClientError> {
        let path = format!("/subscribe/{}", urlencoding::encode(topic));
        self.execute(self.request(Method::GET, &path)).await
    }

    /// `GET /pull_messages/{topic}`: drain the messages queued on `topic`.
    pub async fn pull_messages(&self, topic: &str) -> Result<MessagesResponse, ClientError> {
        let path = format!("/pull_messages/{}", urlencoding::encode(topic));
        self.execute(self.request(Method::GET, &path)).await
    }

    /// `GET /query_topic/{topic}`
    pub async fn query_topic(&self, topic: &str) -> Result<QueryResponse, ClientError> {
        let path = format!("/query_topic/{}", urlencoding::encode(topic));
        self.execute(self.request(Method::GET, &path)).await
    }

    // -----------------------------------------------------------------------
    // Metrics
    // -----------------------------------------------------------------------

    /// `POST /report_metrics`
    pub async fn report_metrics(
        &self,
        latency: &str,
        bandwidth: &str,
    ) -> Result<MetricsResponse, ClientError> {
        let body = MetricsReport {
            latency: latency.to_string(),
            bandwidth: bandwidth.to_string(),
        };
        self.execute(self.request(Method::POST, "/report_metrics").json(&body))
            .await
    }

    /// `GET /get_metrics`
    pub async fn get_metrics(&self) -> Result<MetricsResponse, ClientError> {
        self.execute(self.request(Method::GET, "/get_metrics")).await
    }

    // -----------------------------------------------------------------------
    // Private helpers
    // -----------------------------------------------------------------------

    /// Start a request for `{base_url}{path}`.
    ///
    /// Every non-GET request declares a JSON body, including the ones that
    /// send none.
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{path}", self.base_url);
        debug!("peer_api: {method} {url}");
        let builder = self.http.request(method.clone(), &url);
        if method == Method::GET {
            builder
        } else {
            builder.header(header::CONTENT_TYPE, "application/json")
        }
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = request.send().await.map_err(ClientError::Network)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(ClientError::Network)?;

        if !status.is_success() {
            return Err(ClientError::Backend {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        decode(&bytes)
    }
}

/// Decode a 2xx body into `T`, recognising the node's error envelope first.
///
/// Bytes that are not valid UTF-8 make the body invalid JSON.
fn decode<T: DeserializeOwned>(raw: &[u8]) -> Result<T, ClientError> {
    let body: Value = serde_json::from_slice(raw)?;
    if let Some(envelope) = ErrorEnvelope::detect(&body) {
        return Err(ClientError::Rejected {
            message: envelope.message,
        });
    }
    Ok(serde_json::from_value(body)?)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
