use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::metrics::MetricsRecorder;
use crate::state::AppState;

/// Counts every request by HTTP method.
pub async fn metrics_middleware(State(state): State<AppState>, request: Request, next: Next) -> Response {
    state.metrics.http_request(request.method().as_str());
    next.run(request).await
}
