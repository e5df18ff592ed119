use bigdecimal::{BigDecimal, Zero};
use diesel::prelude::*;
use jiff_diesel::DateTime;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Queryable, Selectable, Clone)]
#[diesel(table_name = crate::schema::diner_orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DinerOrder {
    pub id: i32,
    pub diner_id: i32,
    pub franchise_id: i32,
    pub store_id: i32,
    pub date: DateTime,
}

#[derive(Debug, Insertable, Clone)]
#[diesel(table_name = crate::schema::diner_orders)]
pub struct NewDinerOrder {
    pub diner_id: i32,
    pub franchise_id: i32,
    pub store_id: i32,
}

#[derive(Debug, Queryable, Selectable, Clone)]
#[diesel(table_name = crate::schema::order_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderItemRow {
    pub id: i32,
    pub order_id: i32,
    pub menu_id: i32,
    pub description: String,
    pub price: BigDecimal,
}

#[derive(Debug, Insertable, Clone)]
#[diesel(table_name = crate::schema::order_items)]
pub struct NewOrderItem {
    pub order_id: i32,
    pub menu_id: i32,
    pub description: String,
    pub price: BigDecimal,
}

/// One requested line of an order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    pub menu_id: i32,
    pub description: String,
    pub price: BigDecimal,
}

/// A diner's request to place an order at a store.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRequest {
    pub franchise_id: i32,
    pub store_id: i32,
    pub items: Vec<OrderLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: i32,
    pub menu_id: i32,
    pub description: String,
    #[serde(with = "crate::models::price")]
    #[schema(value_type = f64)]
    pub price: BigDecimal,
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        Self {
            id: row.id,
            menu_id: row.menu_id,
            description: row.description,
            price: row.price,
        }
    }
}

/// A persisted order. Orders are immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i32,
    pub diner_id: i32,
    pub franchise_id: i32,
    pub store_id: i32,
    #[schema(value_type = String)]
    pub date: jiff::civil::DateTime,
    pub items: Vec<OrderItem>,
}

impl Order {
    pub fn from_rows(order: DinerOrder, items: Vec<OrderItemRow>) -> Self {
        Self {
            id: order.id,
            diner_id: order.diner_id,
            franchise_id: order.franchise_id,
            store_id: order.store_id,
            date: order.date.to_jiff(),
            items: items.into_iter().map(OrderItem::from).collect(),
        }
    }

    pub fn total_price(&self) -> BigDecimal {
        self.items
            .iter()
            .fold(BigDecimal::zero(), |total, item| total + &item.price)
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderPage {
    pub diner_id: i32,
    pub orders: Vec<Order>,
    pub page: u32,
    pub more: bool,
}

/// What the verification service returns for an accepted order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationTicket {
    pub jwt: String,
    pub report_url: Option<String>,
}

/// Outcome of the post-commit verification step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "verification", rename_all = "lowercase")]
pub enum Verification {
    Verified {
        jwt: String,
        #[serde(rename = "reportUrl", skip_serializing_if = "Option::is_none")]
        report_url: Option<String>,
    },
    Unavailable {
        message: String,
        #[serde(rename = "reportUrl", skip_serializing_if = "Option::is_none")]
        report_url: Option<String>,
    },
}

impl Verification {
    pub fn is_verified(&self) -> bool {
        matches!(self, Verification::Verified { .. })
    }
}

/// The persisted order merged with its verification outcome.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrderReceipt {
    pub order: Order,
    #[serde(flatten)]
    pub verification: Verification,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn order() -> Order {
        Order {
            id: 12,
            diner_id: 3,
            franchise_id: 1,
            store_id: 4,
            date: jiff::civil::date(2024, 6, 5).at(12, 0, 0, 0),
            items: vec![
                OrderItem {
                    id: 1,
                    menu_id: 2,
                    description: "Veggie".into(),
                    price: BigDecimal::from_str("0.0038").unwrap(),
                },
                OrderItem {
                    id: 2,
                    menu_id: 3,
                    description: "Pepperoni".into(),
                    price: BigDecimal::from_str("0.0042").unwrap(),
                },
            ],
        }
    }

    #[test]
    fn test_total_price_sums_items() {
        assert_eq!(order().total_price(), BigDecimal::from_str("0.008").unwrap());
    }

    #[test]
    fn test_verified_receipt_shape() {
        let receipt = OrderReceipt {
            order: order(),
            verification: Verification::Verified {
                jwt: "signed".into(),
                report_url: Some("https://factory/report/1".into()),
            },
        };
        let json = serde_json::to_value(&receipt).unwrap();
        assert_eq!(json["verification"], "verified");
        assert_eq!(json["jwt"], "signed");
        assert_eq!(json["reportUrl"], "https://factory/report/1");
        assert_eq!(json["order"]["storeId"], 4);
        assert_eq!(json["order"]["items"][0]["menuId"], 2);
    }

    #[test]
    fn test_unavailable_receipt_keeps_order() {
        let receipt = OrderReceipt {
            order: order(),
            verification: Verification::Unavailable {
                message: "Failed to fulfill order at factory".into(),
                report_url: None,
            },
        };
        let json = serde_json::to_value(&receipt).unwrap();
        assert_eq!(json["verification"], "unavailable");
        assert_eq!(json["order"]["id"], 12);
        assert!(json.get("jwt").is_none());
        assert!(json.get("reportUrl").is_none());
    }
}
