//! Middleware components for request processing.

mod auth;
mod error_handler;
mod logging;
mod metrics;
mod request_id;

pub use auth::{bearer_token, session_middleware};
pub use error_handler::{error_context_middleware, error_to_code, error_to_status_code};
pub use logging::logging_middleware;
pub use metrics::metrics_middleware;
pub use request_id::{REQUEST_ID_HEADER, RequestId, request_id_middleware};
