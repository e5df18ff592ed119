use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::AsyncDbPool;
use crate::error::{AppError, AppResult};
use crate::models::NewAuthSession;
use crate::schema::auth_sessions;

/// Active sessions, keyed by token digest. A user may hold many at once.
#[derive(Clone)]
pub struct SessionRepository {
    pool: AsyncDbPool,
}

impl SessionRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, token_hash: &str, user_id: i32) -> AppResult<()> {
        let mut conn = self.pool.get().await?;

        diesel::insert_into(auth_sessions::table)
            .values(&NewAuthSession {
                token_hash: token_hash.to_string(),
                user_id,
            })
            .execute(&mut conn)
            .await?;
        Ok(())
    }

    pub async fn exists(&self, token_hash: &str) -> AppResult<bool> {
        let mut conn = self.pool.get().await?;

        diesel::select(diesel::dsl::exists(
            auth_sessions::table.filter(auth_sessions::token_hash.eq(token_hash)),
        ))
        .get_result(&mut conn)
        .await
        .map_err(AppError::from)
    }

    /// Removes one session. Returns whether a row existed; a missing row is not an error.
    pub async fn delete(&self, token_hash: &str) -> AppResult<bool> {
        let mut conn = self.pool.get().await?;

        let deleted = diesel::delete(auth_sessions::table.filter(auth_sessions::token_hash.eq(token_hash)))
            .execute(&mut conn)
            .await?;
        Ok(deleted > 0)
    }
}
