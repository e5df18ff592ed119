use bigdecimal::BigDecimal;
use diesel::prelude::*;
use jiff_diesel::DateTime;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Queryable, Selectable, Clone)]
#[diesel(table_name = crate::schema::franchises)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Franchise {
    pub id: i32,
    pub name: String,
    pub created_at: DateTime,
}

#[derive(Debug, Insertable, Clone)]
#[diesel(table_name = crate::schema::franchises)]
pub struct NewFranchise {
    pub name: String,
}

#[derive(Debug, Queryable, Selectable, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[diesel(table_name = crate::schema::stores)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub id: i32,
    pub franchise_id: i32,
    pub name: String,
}

#[derive(Debug, Insertable, Clone)]
#[diesel(table_name = crate::schema::stores)]
pub struct NewStore {
    pub franchise_id: i32,
    pub name: String,
}

/// Input for franchise creation.
#[derive(Debug, Clone)]
pub struct CreateFranchise {
    pub name: String,
    pub admin_emails: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FranchiseAdmin {
    pub id: i32,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoreSummary {
    pub id: i32,
    pub name: String,
    /// Present on detailed views only.
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_revenue"
    )]
    #[schema(value_type = Option<f64>)]
    pub total_revenue: Option<BigDecimal>,
}

fn serialize_revenue<S>(value: &Option<BigDecimal>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match value {
        Some(revenue) => crate::models::price::serialize(revenue, serializer),
        None => serializer.serialize_none(),
    }
}

/// A franchise with its stores; `admins` is only filled on detailed views.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct FranchiseView {
    pub id: i32,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admins: Option<Vec<FranchiseAdmin>>,
    pub stores: Vec<StoreSummary>,
}

/// Listing filter. `page` is 1-based.
#[derive(Debug, Clone, Default)]
pub struct FranchiseQuery {
    pub page: u32,
    /// Case-insensitive name pattern where `*` matches any run of characters.
    pub name: Option<String>,
    /// Restrict to franchises this user administers.
    pub admin_user_id: Option<i32>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FranchisePage {
    pub franchises: Vec<FranchiseView>,
    pub page: u32,
    pub more: bool,
}
