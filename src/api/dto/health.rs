use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of `GET /health`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "status": "healthy",
    "version": "0.1.0",
    "timestamp": "2024-06-05T12:00:00Z",
    "activeSessions": 3,
    "checks": {
        "database": { "status": "healthy", "message": "Connected", "latencyMs": 5 }
    }
}))]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    #[schema(value_type = String, format = DateTime)]
    pub timestamp: String,
    /// Sessions opened minus sessions closed since this process started.
    pub active_sessions: i64,
    pub checks: BTreeMap<String, ComponentHealth>,
}

impl HealthResponse {
    /// The worst status among `checks`; healthy when there are none.
    pub fn overall(checks: &BTreeMap<String, ComponentHealth>) -> HealthStatus {
        checks
            .values()
            .map(|check| check.status)
            .max()
            .unwrap_or(HealthStatus::Healthy)
    }
}

/// Ordered from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComponentHealth {
    pub status: HealthStatus,
    pub message: Option<String>,
    pub latency_ms: Option<u64>,
}
