//! Diner orders and their line items.

use std::collections::{HashMap, HashSet};

use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};

use super::{PAGE_SIZE, page_offset};
use crate::db::AsyncDbPool;
use crate::error::{AppError, AppResult};
use crate::models::{DinerOrder, NewDinerOrder, NewOrderItem, Order, OrderItemRow, OrderRequest};
use crate::schema::{diner_orders, menu_items, order_items, stores};

#[derive(Clone)]
pub struct OrderRepository {
    pool: AsyncDbPool,
}

impl OrderRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }

    /// Persists the order and its items atomically for `diner_id`.
    ///
    /// # Errors
    /// `AppError::NotFound` when the store is not part of the requested
    /// franchise or a line names a menu item that does not exist; nothing
    /// is written in either case.
    pub async fn create(&self, diner_id: i32, request: OrderRequest) -> AppResult<Order> {
        let mut pooled = self.pool.get().await?;
        let conn: &mut AsyncPgConnection = &mut pooled;

        conn.transaction::<_, AppError, _>(|conn| {
            async move {
                let store_matches: Option<i32> = stores::table
                    .filter(stores::id.eq(request.store_id))
                    .filter(stores::franchise_id.eq(request.franchise_id))
                    .select(stores::id)
                    .first(conn)
                    .await
                    .optional()?;
                if store_matches.is_none() {
                    return Err(AppError::not_found("store", "id", request.store_id));
                }

                let requested: Vec<i32> = request.items.iter().map(|line| line.menu_id).collect();
                let known: HashSet<i32> = menu_items::table
                    .filter(menu_items::id.eq_any(&requested))
                    .select(menu_items::id)
                    .load::<i32>(conn)
                    .await?
                    .into_iter()
                    .collect();
                if let Some(missing) = requested.iter().find(|id| !known.contains(id)) {
                    return Err(AppError::not_found("menu_item", "id", *missing));
                }

                let order: DinerOrder = diesel::insert_into(diner_orders::table)
                    .values(&NewDinerOrder {
                        diner_id,
                        franchise_id: request.franchise_id,
                        store_id: request.store_id,
                    })
                    .returning(DinerOrder::as_returning())
                    .get_result(conn)
                    .await?;

                let rows: Vec<NewOrderItem> = request
                    .items
                    .into_iter()
                    .map(|line| NewOrderItem {
                        order_id: order.id,
                        menu_id: line.menu_id,
                        description: line.description,
                        price: line.price,
                    })
                    .collect();
                let items: Vec<OrderItemRow> = diesel::insert_into(order_items::table)
                    .values(&rows)
                    .returning(OrderItemRow::as_returning())
                    .get_results(conn)
                    .await?;

                Ok(Order::from_rows(order, items))
            }
            .scope_boxed()
        })
        .await
    }

    /// One page of the diner's orders, oldest first, and whether more follow.
    pub async fn list_for_diner(&self, diner_id: i32, page: u32) -> AppResult<(Vec<Order>, bool)> {
        let mut conn = self.pool.get().await?;

        let mut orders: Vec<DinerOrder> = diner_orders::table
            .filter(diner_orders::diner_id.eq(diner_id))
            .order(diner_orders::id.asc())
            .limit(PAGE_SIZE + 1)
            .offset(page_offset(page))
            .select(DinerOrder::as_select())
            .load(&mut conn)
            .await?;
        let more = orders.len() as i64 > PAGE_SIZE;
        orders.truncate(PAGE_SIZE as usize);

        if orders.is_empty() {
            return Ok((Vec::new(), more));
        }

        let order_ids: Vec<i32> = orders.iter().map(|order| order.id).collect();
        let item_rows: Vec<OrderItemRow> = order_items::table
            .filter(order_items::order_id.eq_any(&order_ids))
            .order(order_items::id.asc())
            .select(OrderItemRow::as_select())
            .load(&mut conn)
            .await?;

        let mut items_by_order: HashMap<i32, Vec<OrderItemRow>> = HashMap::new();
        for row in item_rows {
            items_by_order.entry(row.order_id).or_default().push(row);
        }

        let orders = orders
            .into_iter()
            .map(|order| {
                let items = items_by_order.remove(&order.id).unwrap_or_default();
                Order::from_rows(order, items)
            })
            .collect();
        Ok((orders, more))
    }
}
