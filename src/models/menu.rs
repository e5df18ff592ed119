use bigdecimal::BigDecimal;
use diesel::prelude::*;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Queryable, Selectable, Clone, PartialEq, Serialize, ToSchema)]
#[diesel(table_name = crate::schema::menu_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MenuItem {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub image: String,
    #[serde(with = "crate::models::price")]
    #[schema(value_type = f64)]
    pub price: BigDecimal,
}

#[derive(Debug, Insertable, Clone)]
#[diesel(table_name = crate::schema::menu_items)]
pub struct NewMenuItem {
    pub title: String,
    pub description: String,
    pub image: String,
    pub price: BigDecimal,
}
