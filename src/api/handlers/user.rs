//! Current user and account deletion endpoints.

use axum::{
    Json,
    extract::{Path, State},
};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::USER_TAG;
use crate::api::dto::MessageResponse;
use crate::error::AppResult;
use crate::models::UserProfile;
use crate::policy::Principal;
use crate::state::AppState;

pub fn user_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(get_me))
        .routes(routes!(delete_user))
}

/// GET /api/user/me - Current user with roles
#[utoipa::path(
    get,
    path = "/me",
    tag = USER_TAG,
    responses(
        (status = 200, description = "Current user information", body = UserProfile),
        (status = 401, description = "Missing, invalid or revoked token", body = crate::api::dto::ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn get_me(State(state): State<AppState>, principal: Principal) -> AppResult<Json<UserProfile>> {
    let user = state.services.users.get_user(principal.id()).await?;
    Ok(Json(user))
}

/// DELETE /api/user/{id} - Delete a user and close all their sessions
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = USER_TAG,
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 403, description = "Neither self nor admin", body = crate::api::dto::ErrorResponse),
        (status = 404, description = "User not found", body = crate::api::dto::ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn delete_user(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<i32>,
) -> AppResult<Json<MessageResponse>> {
    state.services.users.delete_user(&principal, id).await?;
    Ok(Json(MessageResponse::new("user deleted")))
}
