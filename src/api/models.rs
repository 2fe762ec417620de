use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// POST /query request body.
#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    /// Question in natural language.
    pub query: String,
    /// Optional per-request override of the few-shot similarity cutoff.
    pub similarity_threshold: Option<f64>,
}

/// Error payload for both 4xx and 5xx responses.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// GET /health response body.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub database_connected: bool,
    pub model_configured: bool,
}

/// A canned example question, served by GET /examples.
#[derive(Debug, Clone, Serialize)]
pub struct ExampleQuery {
    pub query: &'static str,
    pub description: &'static str,
}
