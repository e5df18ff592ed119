//! Health check endpoint handlers.
//!
//! Health checks go straight to the connection pool rather than through
//! the service layer. `/health/metrics` exposes the in-process counters.

use std::collections::BTreeMap;

use axum::{Json, extract::State, http::StatusCode};
use diesel_async::RunQueryDsl;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::HEALTH_TAG;
use crate::api::dto::{ComponentHealth, HealthResponse, HealthStatus};
use crate::metrics::MetricsSnapshot;
use crate::state::AppState;

/// Creates health check routes.
///
/// # Routes
/// - `GET /` - Health with component checks
/// - `GET /ready` - Readiness probe
/// - `GET /live` - Liveness probe
/// - `GET /metrics` - Counter snapshot
pub fn health_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(health_check))
        .routes(routes!(readiness_check))
        .routes(routes!(liveness_check))
        .routes(routes!(metrics_snapshot))
}

/// Overall health with a database check.
///
/// Answers 503 with the same body when the database is unreachable.
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Service is unhealthy", body = HealthResponse)
    ),
    tag = HEALTH_TAG
)]
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let mut checks = BTreeMap::new();
    checks.insert("database".to_string(), check_database(&state).await);
    checks.insert("pool".to_string(), check_pool(&state));
    let status = HealthResponse::overall(&checks);

    let response = HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: jiff::Timestamp::now().to_string(),
        active_sessions: state.metrics.snapshot().active_sessions,
        checks,
    };

    let code = match status {
        HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };
    (code, Json(response))
}

/// Readiness probe: the pool hands out a working connection.
#[utoipa::path(
    get,
    path = "/ready",
    responses(
        (status = 200, description = "Service is ready"),
        (status = 503, description = "Service is not ready")
    ),
    tag = HEALTH_TAG
)]
pub async fn readiness_check(State(state): State<AppState>) -> StatusCode {
    match check_database(&state).await.status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Degraded | HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    }
}

#[utoipa::path(
    get,
    path = "/live",
    responses((status = 200, description = "Service is alive")),
    tag = HEALTH_TAG
)]
pub async fn liveness_check() -> StatusCode {
    StatusCode::OK
}

#[utoipa::path(
    get,
    path = "/metrics",
    responses((status = 200, description = "Counter snapshot", body = MetricsSnapshot)),
    tag = HEALTH_TAG
)]
pub async fn metrics_snapshot(State(state): State<AppState>) -> Json<MetricsSnapshot> {
    Json(state.metrics.snapshot())
}

async fn check_database(state: &AppState) -> ComponentHealth {
    let start_time = std::time::Instant::now();
    let elapsed = || Some(start_time.elapsed().as_millis() as u64);

    match state.db_pool.get().await {
        Ok(mut conn) => match diesel::sql_query("SELECT 1").execute(&mut conn).await {
            Ok(_) => ComponentHealth {
                status: HealthStatus::Healthy,
                message: Some("Connected".to_string()),
                latency_ms: elapsed(),
            },
            Err(e) => ComponentHealth {
                status: HealthStatus::Unhealthy,
                message: Some(format!("Query failed: {e}")),
                latency_ms: elapsed(),
            },
        },
        Err(e) => ComponentHealth {
            status: HealthStatus::Unhealthy,
            message: Some(format!("Connection failed: {e}")),
            latency_ms: elapsed(),
        },
    }
}

/// Every open connection checked out means requests are queueing.
fn check_pool(state: &AppState) -> ComponentHealth {
    let pool = state.db_pool.state();
    let status = if pool.connections > 0 && pool.idle_connections == 0 {
        HealthStatus::Degraded
    } else {
        HealthStatus::Healthy
    };
    ComponentHealth {
        status,
        message: Some(format!(
            "{} open, {} idle",
            pool.connections, pool.idle_connections
        )),
        latency_ms: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_liveness_check() {
        assert_eq!(liveness_check().await, StatusCode::OK);
    }
}
