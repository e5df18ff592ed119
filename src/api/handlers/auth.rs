//! Registration, login, logout and account updates.

use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::AUTH_TAG;
use crate::api::dto::{AuthResponse, LoginRequest, MessageResponse, RegisterRequest, UpdateUserRequest};
use crate::api::middleware::bearer_token;
use crate::error::{AppError, AppResult};
use crate::models::UserProfile;
use crate::policy::Principal;
use crate::state::AppState;
use crate::utils::validate::ValidatedJson;

/// Creates the authentication routes
///
/// # Routes
/// - `POST /` - Register a diner and open a session
/// - `PUT /` - Log in
/// - `DELETE /` - Log out the presented token
/// - `PUT /{id}` - Update a user's name, email or password
pub fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(register, login, logout))
        .routes(routes!(update_user))
}

/// POST /api/auth - Register new diner
#[utoipa::path(
    post,
    path = "/",
    tag = AUTH_TAG,
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = AuthResponse),
        (status = 400, description = "Invalid request data", body = crate::api::dto::ErrorResponse),
        (status = 409, description = "Email already registered", body = crate::api::dto::ErrorResponse)
    )
)]
async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let ticket = state.services.auth.register(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(ticket.into())))
}

/// PUT /api/auth - Log in
#[utoipa::path(
    put,
    path = "/",
    tag = AUTH_TAG,
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Unknown user or wrong password", body = crate::api::dto::ErrorResponse)
    )
)]
async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let ticket = state.services.auth.login(&payload.email, &payload.password).await?;
    Ok(Json(ticket.into()))
}

/// DELETE /api/auth - Log out
///
/// Revokes only the presented token; other sessions of the same user stay open.
#[utoipa::path(
    delete,
    path = "/",
    tag = AUTH_TAG,
    responses(
        (status = 200, description = "Session closed", body = MessageResponse),
        (status = 401, description = "No valid session", body = crate::api::dto::ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn logout(
    State(state): State<AppState>,
    _principal: Principal,
    headers: HeaderMap,
) -> AppResult<Json<MessageResponse>> {
    let token = bearer_token(&headers).ok_or_else(|| AppError::unauthorized("unauthorized"))?;
    state.services.auth.logout(token).await?;
    Ok(Json(MessageResponse::new("logout successful")))
}

/// PUT /api/auth/{id} - Update user
#[utoipa::path(
    put,
    path = "/{id}",
    tag = AUTH_TAG,
    params(("id" = i32, Path, description = "User id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated user", body = UserProfile),
        (status = 403, description = "Neither self nor admin", body = crate::api::dto::ErrorResponse),
        (status = 404, description = "User not found", body = crate::api::dto::ErrorResponse),
        (status = 409, description = "Email already registered", body = crate::api::dto::ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn update_user(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<UpdateUserRequest>,
) -> AppResult<Json<UserProfile>> {
    let grant = principal.authorize_user(id)?;
    let user = state.services.auth.update_user(&grant, payload.into()).await?;
    Ok(Json(user))
}
