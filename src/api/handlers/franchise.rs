//! Franchise and store endpoints.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::FRANCHISE_TAG;
use crate::api::dto::{CreateFranchiseRequest, CreateStoreRequest, FranchiseListParams, MessageResponse};
use crate::error::AppResult;
use crate::models::{FranchisePage, FranchiseQuery, FranchiseView, Store};
use crate::policy::Principal;
use crate::state::AppState;
use crate::utils::validate::ValidatedJson;

/// Creates the franchise routes
///
/// # Routes
/// - `GET /` - Paged listing; admins also see admins and revenue
/// - `POST /` - Create a franchise (admin)
/// - `GET /{id}` - Franchises administered by user `id`
/// - `DELETE /{id}` - Delete a franchise with its stores (admin)
/// - `POST /{id}/store` - Create a store
/// - `DELETE /{id}/store/{store_id}` - Delete a store
pub fn franchise_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_franchises, create_franchise))
        .routes(routes!(user_franchises, delete_franchise))
        .routes(routes!(create_store))
        .routes(routes!(delete_store))
}

/// GET /api/franchise
#[utoipa::path(
    get,
    path = "/",
    tag = FRANCHISE_TAG,
    params(FranchiseListParams),
    responses((status = 200, description = "Franchise page", body = FranchisePage))
)]
async fn list_franchises(
    State(state): State<AppState>,
    principal: Option<Principal>,
    Query(params): Query<FranchiseListParams>,
) -> AppResult<Json<FranchisePage>> {
    let query = FranchiseQuery {
        page: params.page.unwrap_or(1),
        name: params.name,
        admin_user_id: params.admin,
    };
    let page = state.services.franchises.list(principal.as_ref(), query).await?;
    Ok(Json(page))
}

/// GET /api/franchise/{id}
///
/// Empty unless the caller is user `id` or an admin.
#[utoipa::path(
    get,
    path = "/{id}",
    tag = FRANCHISE_TAG,
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "Franchises the user administers", body = Vec<FranchiseView>),
        (status = 401, description = "Missing, invalid or revoked token", body = crate::api::dto::ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn user_franchises(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<FranchiseView>>> {
    let franchises = state.services.franchises.list_for_user(&principal, id).await?;
    Ok(Json(franchises))
}

/// POST /api/franchise
#[utoipa::path(
    post,
    path = "/",
    tag = FRANCHISE_TAG,
    request_body = CreateFranchiseRequest,
    responses(
        (status = 200, description = "Created franchise", body = FranchiseView),
        (status = 403, description = "Caller is not an admin", body = crate::api::dto::ErrorResponse),
        (status = 409, description = "Franchise name taken", body = crate::api::dto::ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn create_franchise(
    State(state): State<AppState>,
    principal: Principal,
    ValidatedJson(payload): ValidatedJson<CreateFranchiseRequest>,
) -> AppResult<Json<FranchiseView>> {
    let franchise = state.services.franchises.create(&principal, payload.into()).await?;
    Ok(Json(franchise))
}

/// DELETE /api/franchise/{id}
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = FRANCHISE_TAG,
    params(("id" = i32, Path, description = "Franchise id")),
    responses(
        (status = 200, description = "Franchise deleted", body = MessageResponse),
        (status = 403, description = "Caller is not an admin", body = crate::api::dto::ErrorResponse),
        (status = 404, description = "Franchise not found", body = crate::api::dto::ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn delete_franchise(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<i32>,
) -> AppResult<Json<MessageResponse>> {
    state.services.franchises.delete(&principal, id).await?;
    Ok(Json(MessageResponse::new("franchise deleted")))
}

/// POST /api/franchise/{id}/store
#[utoipa::path(
    post,
    path = "/{id}/store",
    tag = FRANCHISE_TAG,
    params(("id" = i32, Path, description = "Franchise id")),
    request_body = CreateStoreRequest,
    responses(
        (status = 200, description = "Created store", body = Store),
        (status = 403, description = "Not an admin of this franchise", body = crate::api::dto::ErrorResponse),
        (status = 404, description = "Franchise not found", body = crate::api::dto::ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn create_store(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<CreateStoreRequest>,
) -> AppResult<Json<Store>> {
    let store = state.services.franchises.create_store(&principal, id, payload.name).await?;
    Ok(Json(store))
}

/// DELETE /api/franchise/{id}/store/{store_id}
#[utoipa::path(
    delete,
    path = "/{id}/store/{store_id}",
    tag = FRANCHISE_TAG,
    params(
        ("id" = i32, Path, description = "Franchise id"),
        ("store_id" = i32, Path, description = "Store id")
    ),
    responses(
        (status = 200, description = "Store deleted", body = MessageResponse),
        (status = 403, description = "Not an admin of this franchise", body = crate::api::dto::ErrorResponse),
        (status = 404, description = "Store not found in this franchise", body = crate::api::dto::ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn delete_store(
    State(state): State<AppState>,
    principal: Principal,
    Path((id, store_id)): Path<(i32, i32)>,
) -> AppResult<Json<MessageResponse>> {
    state.services.franchises.delete_store(&principal, id, store_id).await?;
    Ok(Json(MessageResponse::new("store deleted")))
}
