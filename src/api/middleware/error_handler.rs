//! Error handler for converting AppError to HTTP responses.
//!
//! `AppError` renders itself as an `ErrorResponse` JSON body and stashes the
//! same value in the response extensions. [`error_context_middleware`] then
//! stamps the request id into it, and turns bare framework errors (unknown
//! route, wrong method) into the same JSON shape.

use axum::{
    Json,
    body::Body,
    extract::Request,
    http::{HeaderValue, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;

use super::RequestId;
use crate::api::dto::ErrorResponse;
use crate::error::AppError;

/// Maps an AppError variant to its HTTP status code.
pub fn error_to_status_code(error: &AppError) -> StatusCode {
    match error {
        AppError::NotFound { .. } => StatusCode::NOT_FOUND,
        AppError::Duplicate { .. } => StatusCode::CONFLICT,
        AppError::Validation { .. } | AppError::ValidationErrors { .. } => StatusCode::BAD_REQUEST,
        AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
        AppError::Forbidden { .. } => StatusCode::FORBIDDEN,
        AppError::ExternalService { .. } => StatusCode::BAD_GATEWAY,
        AppError::ConnectionPool { .. } => StatusCode::SERVICE_UNAVAILABLE,
        AppError::Database { .. } | AppError::Configuration { .. } | AppError::Internal { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Maps an AppError variant to its error code string.
pub fn error_to_code(error: &AppError) -> &'static str {
    match error {
        AppError::NotFound { .. } => "NOT_FOUND",
        AppError::Duplicate { .. } => "DUPLICATE_ENTRY",
        AppError::Validation { .. } | AppError::ValidationErrors { .. } => "VALIDATION_ERROR",
        AppError::BadRequest { .. } => "BAD_REQUEST",
        AppError::Unauthorized { .. } => "UNAUTHORIZED",
        AppError::Forbidden { .. } => "FORBIDDEN",
        AppError::ExternalService { .. } => "EXTERNAL_SERVICE_ERROR",
        AppError::Database { .. } => "DATABASE_ERROR",
        AppError::Configuration { .. } => "CONFIGURATION_ERROR",
        AppError::ConnectionPool { .. } => "SERVICE_UNAVAILABLE",
        AppError::Internal { .. } => "INTERNAL_ERROR",
    }
}

/// Client-facing body. Infrastructure failures never expose their source.
pub fn error_to_body(error: &AppError) -> ErrorResponse {
    let code = error_to_code(error);
    match error {
        AppError::NotFound { entity, field, value } => {
            ErrorResponse::new(code, format!("{entity} not found"))
                .with_details(json!({ "entity": entity, "field": field, "value": value }))
        }
        AppError::Duplicate { entity, field, value } => {
            ErrorResponse::new(code, format!("{entity} with this {field} already exists"))
                .with_details(json!({ "entity": entity, "field": field, "value": value }))
        }
        AppError::Validation { field, reason } => {
            ErrorResponse::new(code, reason.clone()).with_details(json!({ "field": field }))
        }
        AppError::ValidationErrors { errors } => ErrorResponse::new(code, "Request validation failed")
            .with_details(json!({ "errors": errors })),
        AppError::BadRequest { message }
        | AppError::Unauthorized { message }
        | AppError::Forbidden { message } => ErrorResponse::new(code, message.clone()),
        AppError::ExternalService { service, report_url, .. } => {
            ErrorResponse::new(code, format!("{service} is unavailable"))
                .with_details(json!({ "service": service, "reportUrl": report_url }))
        }
        AppError::Database { .. } => ErrorResponse::new(code, "Database operation failed"),
        AppError::Configuration { key, .. } => {
            ErrorResponse::new(code, format!("Configuration error: {key}"))
        }
        AppError::ConnectionPool { .. } => ErrorResponse::new(code, "Database connection unavailable"),
        AppError::Internal { .. } => ErrorResponse::new(code, "An internal error occurred"),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = error_to_status_code(&self);
        if status.is_server_error() {
            tracing::error!(error = ?self, "Request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }

        let body = error_to_body(&self);
        let mut response = (status, Json(body.clone())).into_response();
        response.extensions_mut().insert(body);
        response
    }
}

/// Adds the request id to error bodies and converts non-JSON error responses.
///
/// Must run inside `request_id_middleware`.
pub async fn error_context_middleware(request: Request, next: Next) -> Response {
    let request_id = request.extensions().get::<RequestId>().map(|id| id.0.clone());
    let response = next.run(request).await;

    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let body = match response.extensions().get::<ErrorResponse>() {
        Some(body) => body.clone(),
        None if is_json(&response) => return response,
        None => fallback_body(status),
    };
    let body = match &request_id {
        Some(id) => body.with_request_id(id),
        None => body,
    };

    let (mut parts, _) = response.into_parts();
    let bytes = match serde_json::to_vec(&body) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize error body");
            return Response::from_parts(parts, Body::empty());
        }
    };
    parts.headers.remove(header::CONTENT_LENGTH);
    parts
        .headers
        .insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Response::from_parts(parts, Body::from(bytes))
}

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.contains("application/json"))
}

fn fallback_body(status: StatusCode) -> ErrorResponse {
    let code = match status {
        StatusCode::NOT_FOUND => "NOT_FOUND",
        StatusCode::METHOD_NOT_ALLOWED => "METHOD_NOT_ALLOWED",
        StatusCode::UNSUPPORTED_MEDIA_TYPE => "UNSUPPORTED_MEDIA_TYPE",
        StatusCode::PAYLOAD_TOO_LARGE => "PAYLOAD_TOO_LARGE",
        StatusCode::BAD_REQUEST => "BAD_REQUEST",
        s if s.is_server_error() => "INTERNAL_ERROR",
        _ => "UNKNOWN_ERROR",
    };
    ErrorResponse::new(code, status.canonical_reason().unwrap_or("Request failed"))
}
