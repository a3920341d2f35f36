//! Display surfaces for interactive front ends.
//!
//! A [`Dashboard`] wraps a [`PeerApiClient`] and owns one text surface per
//! [`Operation`]. Running an operation through it either replaces that
//! operation's surface with the rendered response, or records a
//! [`Diagnostic`] and logs it. Failures never reach the caller and never
//! touch any surface.
//!
//! Operations may run concurrently through a shared `&Dashboard`; each one
//! writes only its own surface, and the lock is held only for the write.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{PoisonError, RwLock};

use tracing::warn;

use crate::client::{split_topics, PeerApiClient};
use crate::error::ClientError;
use crate::render;

/// One operation of the peer API, naming the surface it writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Operation {
    Initialize,
    CreateTopic,
    Publish,
    Subscribe,
    PullMessages,
    RegisterNode,
    UnregisterNode,
    UpdateTopics,
    QueryTopic,
    ReportMetrics,
    GetMetrics,
    EventLog,
}

impl Operation {
    pub const ALL: [Operation; 12] = [
        Operation::Initialize,
        Operation::CreateTopic,
        Operation::Publish,
        Operation::Subscribe,
        Operation::PullMessages,
        Operation::RegisterNode,
        Operation::UnregisterNode,
        Operation::UpdateTopics,
        Operation::QueryTopic,
        Operation::ReportMetrics,
        Operation::GetMetrics,
        Operation::EventLog,
    ];

    /// Stable surface name, e.g. `init` for the `init-response` element.
    pub fn surface_name(self) -> &'static str {
        match self {
            Operation::Initialize => "init",
            Operation::CreateTopic => "create",
            Operation::Publish => "publish",
            Operation::Subscribe => "subscribe",
            Operation::PullMessages => "messages",
            Operation::RegisterNode => "register",
            Operation::UnregisterNode => "unregister",
            Operation::UpdateTopics => "update",
            Operation::QueryTopic => "query",
            Operation::ReportMetrics => "metrics",
            Operation::GetMetrics => "get-metrics",
            Operation::EventLog => "event-log",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.surface_name())
    }
}

/// A failed operation, as recorded by the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub operation: Operation,
    pub message: String,
}

/// Text surfaces fed by a [`PeerApiClient`].
pub struct Dashboard {
    client: PeerApiClient,
    surfaces: RwLock<BTreeMap<Operation, String>>,
    diagnostics: RwLock<Vec<Diagnostic>>,
}

impl Dashboard {
    pub fn new(client: PeerApiClient) -> Self {
        Self {
            client,
            surfaces: RwLock::new(BTreeMap::new()),
            diagnostics: RwLock::new(Vec::new()),
        }
    }

    /// Current text of `operation`'s surface; `None` until it first succeeds.
    pub fn surface(&self, operation: Operation) -> Option<String> {
        self.surfaces
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&operation)
            .cloned()
    }

    /// Every diagnostic recorded so far, oldest first.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Remove and return every diagnostic recorded so far, oldest first.
    pub fn take_diagnostics(&self) -> Vec<Diagnostic> {
        std::mem::take(
            &mut *self
                .diagnostics
                .write()
                .unwrap_or_else(PoisonError::into_inner),
        )
    }

    // Each method below returns `true` when its surface was updated.

    pub async fn initialize(&self, index_server_ip: &str, index_server_port: &str) -> bool {
        let outcome = self
            .client
            .initialize(index_server_ip, index_server_port)
            .await;
        self.settle(Operation::Initialize, outcome.map(|r| render::initialized(&r)))
    }

    pub async fn create_topic(&self, topic: &str) -> bool {
        let outcome = self.client.create_topic(topic).await;
        self.settle(Operation::CreateTopic, outcome.map(|r| render::topic_created(&r)))
    }

    pub async fn publish(&self, topic: &str, message: &str) -> bool {
        let outcome = self.client.publish(topic, message).await;
        self.settle(Operation::Publish, outcome.map(|r| render::published(&r)))
    }

    pub async fn subscribe(&self, topic: &str) -> bool {
        let outcome = self.client.subscribe(topic).await;
        self.settle(Operation::Subscribe, outcome.map(|r| render::subscribed(&r)))
    }

    pub async fn pull_messages(&self, topic: &str) -> bool {
        let outcome = self.client.pull_messages(topic).await;
        self.settle(Operation::PullMessages, outcome.map(|r| render::messages(&r)))
    }

    pub async fn register_node(&self) -> bool {
        let outcome = self.client.register_node().await;
        self.settle(Operation::RegisterNode, outcome.map(|r| render::registered(&r)))
    }

    pub async fn unregister_node(&self, node_id: &str) -> bool {
        let outcome = self.client.unregister_node(node_id).await;
        self.settle(Operation::UnregisterNode, outcome.map(|r| render::unregistered(&r)))
    }

    /// `raw_topics` is the comma-separated list as typed; see [`split_topics`].
    pub async fn update_topics(&self, node_id: &str, raw_topics: &str) -> bool {
        let outcome = self
            .client
            .update_topics(node_id, split_topics(raw_topics))
            .await;
        self.settle(Operation::UpdateTopics, outcome.map(|r| render::topics_updated(&r)))
    }

    pub async fn query_topic(&self, topic: &str) -> bool {
        let outcome = self.client.query_topic(topic).await;
        self.settle(Operation::QueryTopic, outcome.map(|r| render::query_result(&r)))
    }

    pub async fn report_metrics(&self, latency: &str, bandwidth: &str) -> bool {
        let outcome = self.client.report_metrics(latency, bandwidth).await;
        self.settle(Operation::ReportMetrics, outcome.map(|r| render::metrics_reported(&r)))
    }

    pub async fn get_metrics(&self) -> bool {
        let outcome = self.client.get_metrics().await;
        self.settle(Operation::GetMetrics, outcome.map(|r| render::metrics(&r)))
    }

    pub async fn event_log(&self) -> bool {
        let outcome = self.client.event_log().await;
        self.settle(Operation::EventLog, outcome.map(|r| render::event_log(&r)))
    }

    fn settle(&self, operation: Operation, outcome: Result<String, ClientError>) -> bool {
        match outcome {
            Ok(text) => {
                self.surfaces
                    .write()
                    .unwrap_or_else(PoisonError::into_inner)
                    .insert(operation, text);
                true
            }
            Err(e) => {
                warn!("dashboard: {operation} failed: {e}");
                self.diagnostics
                    .write()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(Diagnostic {
                        operation,
                        message: e.to_string(),
                    });
                false
            }
        }
    }
}
