//! Menu and order DTOs.

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::models::price::check_price;
use crate::models::{NewMenuItem, OrderLine, OrderRequest};

fn validate_price(price: &BigDecimal) -> Result<(), ValidationError> {
    check_price(price).map_err(|reason| ValidationError::new("price").with_message(reason.into()))
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct AddMenuItemRequest {
    #[validate(length(min = 1, max = 255, message = "title is required"))]
    #[schema(example = "Student")]
    pub title: String,
    #[validate(length(min = 1, message = "description is required"))]
    #[schema(example = "No topping, no sauce, just carbs")]
    pub description: String,
    #[validate(length(min = 1, max = 1024, message = "image is required"))]
    #[schema(example = "pizza9.png")]
    pub image: String,
    #[serde(with = "crate::models::price")]
    #[validate(custom(function = "validate_price"))]
    #[schema(value_type = f64, example = 0.0001)]
    pub price: BigDecimal,
}

impl From<AddMenuItemRequest> for NewMenuItem {
    fn from(request: AddMenuItemRequest) -> Self {
        Self {
            title: request.title,
            description: request.description,
            image: request.image,
            price: request.price,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineRequest {
    #[schema(example = 1)]
    pub menu_id: i32,
    #[validate(length(min = 1, max = 255, message = "description is required"))]
    #[schema(example = "Veggie")]
    pub description: String,
    #[serde(with = "crate::models::price")]
    #[validate(custom(function = "validate_price"))]
    #[schema(value_type = f64, example = 0.05)]
    pub price: BigDecimal,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    #[schema(example = 1)]
    pub franchise_id: i32,
    #[schema(example = 1)]
    pub store_id: i32,
    #[validate(length(min = 1, message = "at least one item is required"), nested)]
    pub items: Vec<OrderLineRequest>,
}

impl From<PlaceOrderRequest> for OrderRequest {
    fn from(request: PlaceOrderRequest) -> Self {
        Self {
            franchise_id: request.franchise_id,
            store_id: request.store_id,
            items: request
                .items
                .into_iter()
                .map(|line| OrderLine {
                    menu_id: line.menu_id,
                    description: line.description,
                    price: line.price,
                })
                .collect(),
        }
    }
}
