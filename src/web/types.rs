//! Request and response bodies for the HTTP API.

use serde::{Deserialize, Serialize};

/// Body of POST /convert.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConvertRequest {
    /// Raw Prometheus metric samples
    #[serde(default)]
    pub metrics: String,
}

/// Body of GET /health.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    /// Models in fallback order
    pub models: Vec<String>,
}
