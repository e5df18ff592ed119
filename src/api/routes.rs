//! Router configuration for the API.
//!
//! Route registration, OpenAPI document assembly and the middleware stack.

use axum::{
    Router,
    http::{Method, header},
    middleware,
};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::doc::ApiDoc;
use crate::api::handlers;
use crate::api::middleware::{
    error_context_middleware, logging_middleware, metrics_middleware, request_id_middleware,
    session_middleware,
};
use crate::state::AppState;

/// Creates the main application router with all routes and middleware.
///
/// # Middleware Order
/// Last added runs first:
/// 1. Compression and CORS
/// 2. Request ID - generates or propagates `x-request-id`
/// 3. Logging - one span per request, tagged with the request id
/// 4. Error context - stamps the request id into JSON error bodies
/// 5. Metrics - counts requests by method
/// 6. Session - attaches the caller's `Principal` for a valid token
///
/// # Routes
/// - `/api/auth`, `/api/user`, `/api/order`, `/api/franchise`
/// - `/health` - health, readiness, liveness and metrics
/// - `/swagger-ui` and `/api-docs/openapi.json`
pub fn create_router(state: AppState) -> Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .nest("/api/auth", handlers::auth::auth_routes())
        .nest("/api/user", handlers::user::user_routes())
        .nest("/api/order", handlers::order::order_routes())
        .nest("/api/franchise", handlers::franchise::franchise_routes())
        .nest("/health", handlers::health::health_routes())
        .split_for_parts();

    router
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api))
        .layer(middleware::from_fn_with_state(state.clone(), session_middleware))
        .layer(middleware::from_fn_with_state(state.clone(), metrics_middleware))
        .layer(middleware::from_fn(error_context_middleware))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors_layer())
        .layer(CompressionLayer::new())
        .with_state(state)
}

/// Mirrors the caller's origin so browser clients can send credentials.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}
