use diesel::prelude::*;

/// Active session, keyed by the SHA-256 digest of the bearer token.
#[derive(Debug, Insertable, Clone)]
#[diesel(table_name = crate::schema::auth_sessions)]
pub struct NewAuthSession {
    pub token_hash: String,
    pub user_id: i32,
}
