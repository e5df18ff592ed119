use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::AsyncDbPool;
use crate::error::{AppError, AppResult};
use crate::models::{MenuItem, NewMenuItem};
use crate::policy::AdminGrant;
use crate::schema::menu_items;

/// Menu catalog. Reads always hit storage, so an append is visible to the next read.
#[derive(Clone)]
pub struct MenuRepository {
    pool: AsyncDbPool,
}

impl MenuRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }

    /// The full menu in insertion order.
    pub async fn list(&self) -> AppResult<Vec<MenuItem>> {
        let mut conn = self.pool.get().await?;

        menu_items::table
            .order(menu_items::id.asc())
            .select(MenuItem::as_select())
            .load(&mut conn)
            .await
            .map_err(AppError::from)
    }

    pub async fn add(&self, grant: &AdminGrant, item: NewMenuItem) -> AppResult<MenuItem> {
        let mut conn = self.pool.get().await?;

        let created = diesel::insert_into(menu_items::table)
            .values(&item)
            .returning(MenuItem::as_returning())
            .get_result(&mut conn)
            .await?;
        tracing::info!(menu_id = created.id, actor_id = grant.actor_id(), "Menu item added");
        Ok(created)
    }
}
