//! Async client for the pub/sub peer node management API.
//!
//! The crate is split into a pure client and a presentation layer:
//!
//! - [`PeerApiClient`] issues one HTTP request per call and returns the
//!   parsed response or a [`ClientError`]. It holds no state besides its
//!   configuration and connection pool.
//! - [`render`] turns responses into the one-line summaries shown to users.
//! - [`Dashboard`] keeps one display surface per [`Operation`] and reduces
//!   failures to logged diagnostics, for front ends that never want to see
//!   an error value.
//!
//! ```no_run
//! # async fn demo() -> Result<(), pubsub_peer_client::ClientError> {
//! use pubsub_peer_client::{ClientConfig, PeerApiClient};
//!
//! let client = PeerApiClient::new(&ClientConfig::new("http://localhost:8080/peer"))?;
//! let ack = client.create_topic("news").await?;
//! assert_eq!(ack.topic, "news");
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod render;

pub use client::{split_topics, PeerApiClient};
pub use config::ClientConfig;
pub use dashboard::{Dashboard, Diagnostic, Operation};
pub use error::ClientError;
