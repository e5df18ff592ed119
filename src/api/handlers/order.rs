//! Menu and order endpoints.

use axum::{
    Json,
    extract::{Query, State},
};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::ORDER_TAG;
use crate::api::dto::{AddMenuItemRequest, PageParams, PlaceOrderRequest};
use crate::error::AppResult;
use crate::models::{MenuItem, OrderPage, OrderReceipt};
use crate::policy::Principal;
use crate::state::AppState;
use crate::utils::validate::ValidatedJson;

/// Creates the order routes
///
/// # Routes
/// - `GET /menu` - Public menu
/// - `PUT /menu` - Append a menu item (admin)
/// - `GET /` - Caller's order history, 10 per page
/// - `POST /` - Place an order
pub fn order_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(get_menu, add_menu_item))
        .routes(routes!(get_orders, place_order))
}

/// GET /api/order/menu
#[utoipa::path(
    get,
    path = "/menu",
    tag = ORDER_TAG,
    responses((status = 200, description = "Menu ordered by id", body = Vec<MenuItem>))
)]
async fn get_menu(State(state): State<AppState>) -> AppResult<Json<Vec<MenuItem>>> {
    Ok(Json(state.services.menu.menu().await?))
}

/// PUT /api/order/menu
#[utoipa::path(
    put,
    path = "/menu",
    tag = ORDER_TAG,
    request_body = AddMenuItemRequest,
    responses(
        (status = 200, description = "Menu after the append", body = Vec<MenuItem>),
        (status = 400, description = "Invalid menu item", body = crate::api::dto::ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = crate::api::dto::ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn add_menu_item(
    State(state): State<AppState>,
    principal: Principal,
    ValidatedJson(payload): ValidatedJson<AddMenuItemRequest>,
) -> AppResult<Json<Vec<MenuItem>>> {
    let menu = state.services.menu.add_item(&principal, payload.into()).await?;
    Ok(Json(menu))
}

/// GET /api/order
#[utoipa::path(
    get,
    path = "/",
    tag = ORDER_TAG,
    params(PageParams),
    responses(
        (status = 200, description = "Order history page", body = OrderPage),
        (status = 401, description = "Missing, invalid or revoked token", body = crate::api::dto::ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn get_orders(
    State(state): State<AppState>,
    principal: Principal,
    Query(params): Query<PageParams>,
) -> AppResult<Json<OrderPage>> {
    let page = state.services.orders.orders(&principal, params.page()).await?;
    Ok(Json(page))
}

/// POST /api/order
///
/// The order is stored before the factory is asked to verify it. A factory
/// failure still answers 200 with a top-level `"verification": "unavailable"`.
#[utoipa::path(
    post,
    path = "/",
    tag = ORDER_TAG,
    request_body = PlaceOrderRequest,
    responses(
        (status = 200, description = "Stored order and verification outcome", body = OrderReceipt),
        (status = 400, description = "Invalid order", body = crate::api::dto::ErrorResponse),
        (status = 404, description = "Store does not belong to franchise", body = crate::api::dto::ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn place_order(
    State(state): State<AppState>,
    principal: Principal,
    ValidatedJson(payload): ValidatedJson<PlaceOrderRequest>,
) -> AppResult<Json<OrderReceipt>> {
    let receipt = state.services.orders.place_order(&principal, payload.into()).await?;
    Ok(Json(receipt))
}
