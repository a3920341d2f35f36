//! Metrics types — `POST /report_metrics` and `GET /get_metrics`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request body for `POST /report_metrics`.
///
/// Values are sent exactly as entered (latency in milliseconds, bandwidth in
/// Mbps, by convention); the client does not parse them.
///
/// ```json
/// { "latency": "12", "bandwidth": "100" }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MetricsReport {
    pub latency: String,
    pub bandwidth: String,
}

/// Response body for both metrics endpoints.
///
/// Nodes answer with either numbers or strings, so both fields are kept as
/// raw JSON and passed through unmodified.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricsResponse {
    pub latency: Value,
    pub bandwidth: Value,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_and_string_values_both_parse() {
        let a: MetricsResponse =
            serde_json::from_str(r#"{"latency":12,"bandwidth":"100"}"#).unwrap();
        assert_eq!(a.latency, Value::from(12));
        assert_eq!(a.bandwidth, Value::from("100"));
    }

    #[test]
    fn both_fields_required() {
        assert!(serde_json::from_str::<MetricsResponse>(r#"{"latency":12}"#).is_err());
    }
}
