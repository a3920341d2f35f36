//! `peerctl` — command-line client for a pub/sub peer node.
//!
//! One subcommand per management endpoint. Each invocation sends exactly one
//! request and prints the node's answer as a one-line summary, or as pretty
//! JSON with `--json`.
//!
//! ```sh
//! peerctl init 127.0.0.1 8080
//! peerctl create-topic news
//! peerctl publish news "hello"
//! PEER_API_BASE=http://10.0.0.2:8081/peer peerctl pull news
//! peerctl bench publish --clients 8 --topic news
//! ```
//!
//! `PEER_API_BASE` and `PEER_API_TIMEOUT_SECS` are read through
//! [`ClientConfig::from_env`]; `--base-url` and `--timeout-secs` override them.
//!
//! Exit codes: 0 on success, 1 when the request fails, 2 for configuration
//! errors.

mod bench;

use std::process;
use std::time::Duration;

use clap::{Parser, Subcommand};
use pubsub_peer_client::{render, split_topics, ClientConfig, ClientError, PeerApiClient};
use serde::Serialize;
use tracing::debug;

/// peerctl — pub/sub peer node CLI
///
/// Create topics, publish and pull messages, and manage a node's
/// registration with its indexing server.
#[derive(Parser)]
#[command(name = "peerctl", version, about, long_about = None)]
struct Cli {
    /// Base URL of the peer API [default: $PEER_API_BASE or http://localhost:8080/peer].
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Per-request timeout in seconds [default: $PEER_API_TIMEOUT_SECS, else none].
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    /// Print the response as pretty JSON instead of a summary line.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Point the node at an indexing server and assign it an id.
    Init {
        /// Indexing server IP address.
        ip: String,
        /// Indexing server port.
        port: String,
    },

    /// Create a topic hosted on this node.
    CreateTopic { topic: String },

    /// Publish a message to a hosted topic.
    Publish { topic: String, message: String },

    /// Subscribe to a topic.
    Subscribe { topic: String },

    /// Pull (and drain) the messages queued on a topic.
    Pull { topic: String },

    /// Register the node with its indexing server.
    Register,

    /// Unregister a node.
    Unregister {
        #[arg(value_name = "NODE_ID")]
        node_id: String,
    },

    /// Replace the topics a node hosts.
    ///
    /// TOPICS is a comma-separated list; entries are sent untrimmed.
    UpdateTopics {
        #[arg(value_name = "NODE_ID")]
        node_id: String,
        topics: String,
    },

    /// Ask which node hosts a topic.
    Query { topic: String },

    /// Report latency (ms) and bandwidth (Mbps) measurements.
    ReportMetrics { latency: String, bandwidth: String },

    /// Show the node's metrics.
    Metrics,

    /// Show the node's event log.
    EventLog,

    /// Measure latency and throughput of one operation under concurrent load.
    ///
    /// Sends one call per simulated client, all at once, and prints the mean
    /// per-call latency and requests per second.
    Bench {
        #[arg(value_enum)]
        op: bench::BenchOp,

        /// Number of concurrent clients.
        #[arg(long, default_value_t = 8)]
        clients: usize,

        /// Topic used by topic operations.
        #[arg(long, default_value = "topic1")]
        topic: String,

        /// Message used by `publish`.
        #[arg(long, default_value = "benchmark message")]
        message: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pubsub_peer_client=info,peerctl=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = client_config(ClientConfig::from_env(), cli.base_url, cli.timeout_secs);
    let client = PeerApiClient::new(&config).unwrap_or_else(|e| fatal(&e.to_string(), 2));
    debug!("peerctl: using {}", client.base_url());

    match run(&client, cli.command, cli.json).await {
        Ok(out) => println!("{out}"),
        Err(e) => fatal(&e.to_string(), 1),
    }
}

/// Apply command-line overrides on top of the environment configuration.
fn client_config(
    env: ClientConfig,
    base_url: Option<String>,
    timeout_secs: Option<u64>,
) -> ClientConfig {
    let mut config = match base_url {
        Some(url) => ClientConfig {
            timeout: env.timeout,
            ..ClientConfig::new(url)
        },
        None => env,
    };
    if let Some(secs) = timeout_secs {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    config
}

/// Execute one subcommand and produce the text to print.
async fn run(client: &PeerApiClient, command: Command, json: bool) -> Result<String, ClientError> {
    match command {
        Command::Init { ip, port } => {
            output(&client.initialize(&ip, &port).await?, json, render::initialized)
        }
        Command::CreateTopic { topic } => {
            output(&client.create_topic(&topic).await?, json, render::topic_created)
        }
        Command::Publish { topic, message } => {
            output(&client.publish(&topic, &message).await?, json, render::published)
        }
        Command::Subscribe { topic } => {
            output(&client.subscribe(&topic).await?, json, render::subscribed)
        }
        Command::Pull { topic } => {
            output(&client.pull_messages(&topic).await?, json, render::messages)
        }
        Command::Register => output(&client.register_node().await?, json, render::registered),
        Command::Unregister { node_id } => {
            output(&client.unregister_node(&node_id).await?, json, render::unregistered)
        }
        Command::UpdateTopics { node_id, topics } => output(
            &client.update_topics(&node_id, split_topics(&topics)).await?,
            json,
            render::topics_updated,
        ),
        Command::Query { topic } => {
            output(&client.query_topic(&topic).await?, json, render::query_result)
        }
        Command::ReportMetrics { latency, bandwidth } => output(
            &client.report_metrics(&latency, &bandwidth).await?,
            json,
            render::metrics_reported,
        ),
        Command::Metrics => output(&client.get_metrics().await?, json, render::metrics),
        Command::EventLog => output(&client.event_log().await?, json, render::event_log),
        Command::Bench {
            op,
            clients,
            topic,
            message,
        } => {
            let params = bench::BenchParams {
                op,
                clients,
                topic,
                message,
            };
            Ok(bench::run(client, &params).await.to_string())
        }
    }
}

fn output<T: Serialize>(
    response: &T,
    json: bool,
    summary: fn(&T) -> String,
) -> Result<String, ClientError> {
    if json {
        Ok(serde_json::to_string_pretty(response)?)
    } else {
        Ok(summary(response))
    }
}

/// Print an error message to stderr and exit with `code`.
fn fatal(msg: &str, code: i32) -> ! {
    eprintln!("peerctl: {}", msg);
    process::exit(code);
}
