//! Errors a single client call can produce.

/// Why a call to the peer node did not yield a response value.
///
/// Every variant is local to the call that produced it; no error leaves the
/// client in a different state.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request could not be sent, or the response body could not be read.
    #[error("network failure: {0}")]
    Network(#[source] reqwest::Error),

    /// The body is not JSON, or lacks a field the operation needs.
    #[error("invalid response body: {0}")]
    Parse(#[from] serde_json::Error),

    /// The node answered with a non-2xx status code.
    #[error("peer returned status {status}: {body}")]
    Backend { status: u16, body: String },

    /// The node answered 200 with its `{"status":"error"}` envelope.
    #[error("peer rejected request: {message}")]
    Rejected { message: String },

    /// The client configuration is unusable.
    #[error("configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// HTTP status code, for errors that carry one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Backend { status, .. } => Some(*status),
            ClientError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_error_reports_status() {
        let err = ClientError::Backend {
            status: 500,
            body: "boom".into(),
        };
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.to_string(), "peer returned status 500: boom");
    }

    #[test]
    fn parse_error_converts_from_serde() {
        let serde_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: ClientError = serde_err.into();
        assert!(matches!(err, ClientError::Parse(_)));
        assert!(err.status().is_none());
    }
}
