//! Load generator for `peerctl bench`.
//!
//! Fires `clients` concurrent calls of one operation at a node, one call per
//! simulated client, and reports the mean per-call latency and the overall
//! throughput. Calls are independent; failed calls are counted and logged but
//! still contribute their latency.

use std::fmt;
use std::time::{Duration, Instant};

use clap::ValueEnum;
use pubsub_peer_client::{ClientError, PeerApiClient};
use tokio::task::JoinSet;
use tracing::warn;

/// Operations `peerctl bench` can exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BenchOp {
    Initialize,
    CreateTopic,
    Publish,
    Subscribe,
    Pull,
    Register,
    ReportMetrics,
    EventLog,
}

impl fmt::Display for BenchOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self
            .to_possible_value()
            .map(|v| v.get_name().to_string())
            .unwrap_or_default();
        f.write_str(&name)
    }
}

/// Inputs shared by every simulated client.
#[derive(Debug, Clone)]
pub struct BenchParams {
    pub op: BenchOp,
    pub clients: usize,
    pub topic: String,
    pub message: String,
}

/// Outcome of one benchmark run.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchReport {
    pub op: BenchOp,
    pub clients: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub mean_latency: Duration,
    pub elapsed: Duration,
}

impl BenchReport {
    /// Completed calls per second of wall-clock time.
    pub fn requests_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs == 0.0 {
            return 0.0;
        }
        (self.succeeded + self.failed) as f64 / secs
    }
}

impl fmt::Display for BenchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} clients, {} ok, {} failed, mean latency {:.3} ms, {:.1} req/s",
            self.op,
            self.clients,
            self.succeeded,
            self.failed,
            self.mean_latency.as_secs_f64() * 1000.0,
            self.requests_per_second()
        )
    }
}

/// Run `params.clients` concurrent calls and wait for all of them.
pub async fn run(client: &PeerApiClient, params: &BenchParams) -> BenchReport {
    let started = Instant::now();
    let mut calls = JoinSet::new();

    for _ in 0..params.clients {
        let client = client.clone();
        let params = params.clone();
        calls.spawn(async move {
            let t0 = Instant::now();
            let outcome = call_once(&client, &params).await;
            (t0.elapsed(), outcome)
        });
    }

    let mut total = Duration::ZERO;
    let mut succeeded = 0;
    let mut failed = 0;
    while let Some(joined) = calls.join_next().await {
        match joined {
            Ok((latency, Ok(()))) => {
                total += latency;
                succeeded += 1;
            }
            Ok((latency, Err(e))) => {
                warn!("bench: {} call failed: {e}", params.op);
                total += latency;
                failed += 1;
            }
            Err(e) => {
                warn!("bench: {} task aborted: {e}", params.op);
                failed += 1;
            }
        }
    }

    let mean_latency = if params.clients == 0 {
        Duration::ZERO
    } else {
        total / params.clients as u32
    };

    BenchReport {
        op: params.op,
        clients: params.clients,
        succeeded,
        failed,
        mean_latency,
        elapsed: started.elapsed(),
    }
}

async fn call_once(client: &PeerApiClient, params: &BenchParams) -> Result<(), ClientError> {
    let topic = params.topic.as_str();
    match params.op {
        BenchOp::Initialize => client.initialize("127.0.0.1", "8080").await.map(drop),
        BenchOp::CreateTopic => client.create_topic(topic).await.map(drop),
        BenchOp::Publish => client.publish(topic, &params.message).await.map(drop),
        BenchOp::Subscribe => client.subscribe(topic).await.map(drop),
        BenchOp::Pull => client.pull_messages(topic).await.map(drop),
        BenchOp::Register => client.register_node().await.map(drop),
        BenchOp::ReportMetrics => client.report_metrics("1", "1").await.map(drop),
        BenchOp::EventLog => client.event_log().await.map(drop),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pubsub_peer_client::ClientConfig;
    use pubsub_peer_testkit::{failing_router, spawn_router, spawn_stub_peer};

    fn params(op: BenchOp, clients: usize) -> BenchParams {
        BenchParams {
            op,
            clients,
            topic: "topic1".into(),
            message: "benchmark message".into(),
        }
    }

    fn client_for(base_url: &str) -> PeerApiClient {
        PeerApiClient::new(&ClientConfig::new(base_url)).unwrap()
    }

    #[tokio::test]
    async fn publish_bench_delivers_every_message() {
        let stub = spawn_stub_peer().await;
        let client = client_for(&stub.base_url);
        client.create_topic("topic1").await.unwrap();

        let report = run(&client, &params(BenchOp::Publish, 8)).await;
        assert_eq!(report.clients, 8);
        assert_eq!(report.succeeded, 8);
        assert_eq!(report.failed, 0);
        assert!(report.requests_per_second() > 0.0);

        let pulled = client.pull_messages("topic1").await.unwrap();
        assert_eq!(pulled.messages.len(), 8);
    }

    #[tokio::test]
    async fn initialize_bench_issues_one_call_per_client() {
        let stub = spawn_stub_peer().await;
        let report = run(&client_for(&stub.base_url), &params(BenchOp::Initialize, 5)).await;

        assert_eq!(report.succeeded, 5);
        let inits = stub
            .requests
            .all()
            .into_iter()
            .filter(|r| r.path.ends_with("/initialize"))
            .count();
        assert_eq!(inits, 5);
    }

    #[tokio::test]
    async fn failures_are_counted_not_fatal() {
        let root = spawn_router(failing_router(
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            "down",
        ))
        .await;
        let client = client_for(&format!("{root}/peer"));

        let report = run(&client, &params(BenchOp::EventLog, 3)).await;
        assert_eq!(report.succeeded, 0);
        assert_eq!(report.failed, 3);
    }

    #[tokio::test]
    async fn zero_clients_reports_nothing() {
        let stub = spawn_stub_peer().await;
        let report = run(&client_for(&stub.base_url), &params(BenchOp::Register, 0)).await;
        assert_eq!(report.succeeded + report.failed, 0);
        assert_eq!(report.mean_latency, Duration::ZERO);
        assert!(stub.requests.all().is_empty());
    }

    #[test]
    fn report_line() {
        let report = BenchReport {
            op: BenchOp::ReportMetrics,
            clients: 4,
            succeeded: 4,
            failed: 0,
            mean_latency: Duration::from_millis(2),
            elapsed: Duration::from_secs(2),
        };
        assert_eq!(
            report.to_string(),
            "report-metrics: 4 clients, 4 ok, 0 failed, mean latency 2.000 ms, 2.0 req/s"
        );
    }
}
