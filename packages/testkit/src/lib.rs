//! Shared helpers for the peer API client test suite.
//!
//! Provides [`spawn_stub_peer`], which binds a `TcpListener` on an ephemeral
//! port and serves a small in-memory imitation of a peer node's management
//! API. Every request it receives is captured in a [`RequestLog`] so tests can
//! assert on exactly what went over the wire.
//!
//! The stub behaves like a single peer node:
//! - `initialize` assigns ids `peer1`, `peer2`, … in call order.
//! - Only topics created (or set via `update_topics`) are hosted; publishing,
//!   subscribing or pulling on any other topic yields the node's error
//!   envelope.
//! - `pull_messages` drains the topic and may return an empty list.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use axum::{
    body::Body,
    extract::{Path, Query, Request, State},
    http::{header::CONTENT_TYPE, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use pubsub_peer_api::{
    error::statuses, ErrorEnvelope, MetricsReport, PublishRequest, UnregisterRequest,
    UpdateTopicsRequest,
};
use serde_json::{json, Value};

// ---------------------------------------------------------------------------
// Request capture
// ---------------------------------------------------------------------------

/// One HTTP request as received by a stub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    /// Path as sent, still percent-encoded.
    pub path: String,
    pub query: Option<String>,
    pub content_type: Option<String>,
    pub body: String,
}

impl RecordedRequest {
    /// The body parsed as JSON.
    ///
    /// # Panics
    ///
    /// Panics if the body is not valid JSON.
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).expect("recorded body is not JSON")
    }
}

/// Shared, append-only list of received requests.
#[derive(Debug, Clone, Default)]
pub struct RequestLog {
    inner: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl RequestLog {
    pub fn all(&self) -> Vec<RecordedRequest> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The most recent request whose path ends with `suffix`.
    pub fn last_to(&self, suffix: &str) -> Option<RecordedRequest> {
        self.all().into_iter().rev().find(|r| r.path.ends_with(suffix))
    }

    fn push(&self, request: RecordedRequest) {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);
    }
}

async fn record(State(log): State<RequestLog>, req: Request, next: Next) -> Response {
    let (parts, body) = req.into_parts();
    let bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(b) => b,
        Err(_) => return StatusCode::BAD_REQUEST.into_response(),
    };
    log.push(RecordedRequest {
        method: parts.method.to_string(),
        path: parts.uri.path().to_string(),
        query: parts.uri.query().map(str::to_owned),
        content_type: parts
            .headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned),
        body: String::from_utf8_lossy(&bytes).into_owned(),
    });
    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

// ---------------------------------------------------------------------------
// Servers
// ---------------------------------------------------------------------------

/// Serve `router` on an ephemeral loopback port and return `http://127.0.0.1:PORT`.
///
/// # Panics
///
/// Panics if the TCP listener cannot be bound.
pub async fn spawn_router(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("get local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("stub server error");
    });
    format!("http://{addr}")
}

/// A running stub peer node.
pub struct StubPeer {
    /// Base URL of the peer API, e.g. `http://127.0.0.1:51234/peer`.
    pub base_url: String,
    pub requests: RequestLog,
}

/// Start a stub peer node in a background task.
pub async fn spawn_stub_peer() -> StubPeer {
    let requests = RequestLog::default();
    let root = spawn_router(stub_peer_router(requests.clone())).await;
    StubPeer {
        base_url: format!("{root}/peer"),
        requests,
    }
}

/// A router that answers every request with `status` and a fixed body.
pub fn failing_router(status: StatusCode, body: &'static str) -> Router {
    Router::new().fallback(move || async move { (status, body) })
}

// ---------------------------------------------------------------------------
// Stub peer node
// ---------------------------------------------------------------------------

#[derive(Default)]
struct Node {
    next_id: u32,
    node_id: Option<String>,
    topics: Vec<String>,
    queues: HashMap<String, Vec<String>>,
    metrics: Option<MetricsReport>,
    events: Vec<String>,
}

impl Node {
    fn log(&mut self, event: &str, details: impl AsRef<str>) {
        self.events
            .push(format!("Event: {event}, Details: {}", details.as_ref()));
    }

    fn hosts(&self, topic: &str) -> bool {
        self.topics.iter().any(|t| t == topic)
    }
}

type Shared = Arc<Mutex<Node>>;

fn lock(node: &Shared) -> std::sync::MutexGuard<'_, Node> {
    node.lock().unwrap_or_else(PoisonError::into_inner)
}

fn envelope(message: &str) -> Json<Value> {
    Json(json!(ErrorEnvelope::new(message)))
}

/// Build the stub peer router, capturing requests into `log`.
pub fn stub_peer_router(log: RequestLog) -> Router {
    let node: Shared = Arc::new(Mutex::new(Node {
        next_id: 1,
        ..Node::default()
    }));

    Router::new()
        .route("/peer/initialize", post(initialize))
        .route("/peer/create_topic", post(create_topic))
        .route("/peer/publish", post(publish))
        .route("/peer/subscribe/{topic}", get(subscribe))
        .route("/peer/pull_messages/{topic}", get(pull_messages))
        .route("/peer/register_with_indexing_server", post(register))
        .route("/peer/unregister", post(unregister))
        .route("/peer/update_topics", post(update_topics))
        .route("/peer/query_topic/{topic}", get(query_topic))
        .route("/peer/report_metrics", post(report_metrics))
        .route("/peer/get_metrics", get(get_metrics))
        .route("/peer/event_log", get(event_log))
        .with_state(node)
        .layer(middleware::from_fn_with_state(log, record))
}

async fn initialize(
    State(node): State<Shared>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let (Some(ip), Some(port)) = (params.get("indexServerIp"), params.get("indexServerPort"))
    else {
        return (
            StatusCode::BAD_REQUEST,
            envelope("indexServerIp and indexServerPort are required"),
        )
            .into_response();
    };

    let mut node = lock(&node);
    let id = format!("peer{}", node.next_id);
    node.next_id += 1;
    node.node_id = Some(id.clone());
    node.log("Peer Initialized", format!("ID: {id}, Indexing Server: {ip}:{port}"));
    Json(json!({ "status": statuses::INITIALIZED, "node_id": id })).into_response()
}

async fn create_topic(State(node): State<Shared>, body: String) -> Response {
    let Ok(topic) = serde_json::from_str::<String>(&body) else {
        return (
            StatusCode::BAD_REQUEST,
            envelope("topic name must be a JSON string"),
        )
            .into_response();
    };

    let mut node = lock(&node);
    if !node.hosts(&topic) {
        node.topics.push(topic.clone());
    }
    node.log("Created Topic", &topic);
    Json(json!({ "status": statuses::CREATED, "topic": topic })).into_response()
}

async fn publish(State(node): State<Shared>, Json(req): Json<PublishRequest>) -> Json<Value> {
    let mut node = lock(&node);
    if !node.hosts(&req.topic) {
        return envelope("Topic not hosted here");
    }
    node.queues
        .entry(req.topic.clone())
        .or_default()
        .push(req.message.clone());
    node.log(
        "Message Published",
        format!("Topic: {}, Message: {}", req.topic, req.message),
    );
    Json(json!({ "status": statuses::PUBLISHED, "topic": req.topic }))
}

async fn subscribe(State(node): State<Shared>, Path(topic): Path<String>) -> Json<Value> {
    let mut node = lock(&node);
    if !node.hosts(&topic) {
        return envelope("Topic not found");
    }
    node.log("Subscribed to Topic", format!("Topic: {topic}"));
    Json(json!({ "status": statuses::SUBSCRIBED, "topic": topic }))
}

async fn pull_messages(State(node): State<Shared>, Path(topic): Path<String>) -> Json<Value> {
    let mut node = lock(&node);
    if !node.hosts(&topic) {
        return envelope("Topic not hosted here");
    }
    let messages = node.queues.remove(&topic).unwrap_or_default();
    node.log("Messages Pulled", format!("Topic: {topic}"));
    Json(json!({ "status": statuses::SUCCESS, "messages": messages }))
}

async fn register(State(node): State<Shared>) -> Json<Value> {
    let mut node = lock(&node);
    let Some(id) = node.node_id.clone() else {
        return envelope("Peer not initialized");
    };
    node.log("Registered with Indexing Server", format!("Node ID: {id}"));
    Json(json!({ "status": statuses::REGISTERED, "node_id": id }))
}

async fn unregister(
    State(node): State<Shared>,
    Json(req): Json<UnregisterRequest>,
) -> Json<Value> {
    let mut node = lock(&node);
    node.log("Unregistered", &req.node_id);
    Json(json!({ "status": statuses::UNREGISTERED, "node_id": req.node_id }))
}

async fn update_topics(
    State(node): State<Shared>,
    Json(req): Json<UpdateTopicsRequest>,
) -> Json<Value> {
    let mut node = lock(&node);
    node.topics = req.topics.clone();
    node.log(
        "Topics Updated",
        format!("Node: {}, Topics: {}", req.node_id, req.topics.join(",")),
    );
    Json(json!({
        "status": statuses::UPDATED,
        "node_id": req.node_id,
        "topics": req.topics,
    }))
}

async fn query_topic(State(node): State<Shared>, Path(topic): Path<String>) -> Json<Value> {
    let node = lock(&node);
    if node.hosts(&topic) {
        Json(json!({ "status": "found", "result": node.node_id }))
    } else {
        Json(json!({ "status": "not_found", "result": Value::Null }))
    }
}

async fn report_metrics(
    State(node): State<Shared>,
    Json(report): Json<MetricsReport>,
) -> Json<Value> {
    let mut node = lock(&node);
    node.log(
        "Metrics Reported",
        format!("latency={}, bandwidth={}", report.latency, report.bandwidth),
    );
    let body = json!({
        "status": statuses::METRICS_REPORTED,
        "latency": report.latency,
        "bandwidth": report.bandwidth,
    });
    node.metrics = Some(report);
    Json(body)
}

async fn get_metrics(State(node): State<Shared>) -> Json<Value> {
    let node = lock(&node);
    match &node.metrics {
        Some(m) => Json(json!({
            "status": statuses::SUCCESS,
            "latency": m.latency,
            "bandwidth": m.bandwidth,
        })),
        None => Json(json!({ "status": statuses::SUCCESS, "latency": 0, "bandwidth": 0 })),
    }
}

async fn event_log(State(node): State<Shared>) -> Json<Value> {
    Json(json!({ "event_log": lock(&node).events }))
}
