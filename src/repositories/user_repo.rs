//! User repository for async database operations.
//!
//! Covers the `users` and `user_roles` tables.

use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};

use crate::db::AsyncDbPool;
use crate::error::{AppError, AppResult};
use crate::models::{NewUser, Role, RoleAssignment, UpdateUser, User, UserProfile, UserRole};
use crate::policy::UserGrant;
use crate::schema::{auth_sessions, user_roles, users};

/// User repository holding an async connection pool.
///
/// `AsyncDbPool` is reference counted, so cloning is cheap.
#[derive(Clone)]
pub struct UserRepository {
    pool: AsyncDbPool,
}

impl UserRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }

    /// Inserts the user and its role assignments in one transaction.
    ///
    /// # Arguments
    /// * `new_user` - Row to insert; the password must already be hashed
    /// * `roles` - Assignments granted at creation
    ///
    /// # Returns
    /// The stored profile, without the password hash
    ///
    /// # Errors
    /// `AppError::Duplicate` when the email is taken; nothing is written then.
    pub async fn create(&self, new_user: NewUser, roles: &[RoleAssignment]) -> AppResult<UserProfile> {
        let mut pooled = self.pool.get().await?;
        let conn: &mut AsyncPgConnection = &mut pooled;
        let roles = roles.to_vec();

        conn.transaction::<_, AppError, _>(|conn| {
            async move {
                let user = insert_user(conn, &new_user).await?;
                insert_roles(conn, user.id, &roles).await?;
                Ok(UserProfile::new(&user, roles))
            }
            .scope_boxed()
        })
        .await
    }

    pub async fn find_by_id(&self, user_id: i32) -> AppResult<Option<User>> {
        let mut conn = self.pool.get().await?;

        users::table
            .filter(users::id.eq(user_id))
            .select(User::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    pub async fn find_by_email(&self, user_email: &str) -> AppResult<Option<User>> {
        let mut pooled = self.pool.get().await?;
        find_by_email(&mut pooled, user_email).await
    }

    /// Role assignments of a user, in insertion order.
    pub async fn roles_for(&self, user_id: i32) -> AppResult<Vec<RoleAssignment>> {
        let mut conn = self.pool.get().await?;

        let rows = user_roles::table
            .filter(user_roles::user_id.eq(user_id))
            .order(user_roles::id.asc())
            .select(UserRole::as_select())
            .load(&mut conn)
            .await?;
        Ok(rows.iter().map(RoleAssignment::from).collect())
    }

    /// User and roles together, or `None` when the user does not exist.
    pub async fn profile(&self, user_id: i32) -> AppResult<Option<UserProfile>> {
        let Some(user) = self.find_by_id(user_id).await? else {
            return Ok(None);
        };
        let roles = self.roles_for(user.id).await?;
        Ok(Some(UserProfile::new(&user, roles)))
    }

    /// Applies the provided fields to the granted user.
    pub async fn update(&self, grant: &UserGrant, changes: UpdateUser) -> AppResult<User> {
        let user_id = grant.user_id();
        let mut conn = self.pool.get().await?;

        diesel::update(users::table.filter(users::id.eq(user_id)))
            .set(&changes)
            .returning(User::as_returning())
            .get_result(&mut conn)
            .await
            .optional()?
            .ok_or_else(|| AppError::not_found("user", "id", user_id))
    }

    /// Deletes sessions, role assignments and the user row in one transaction.
    /// Returns how many sessions were revoked.
    ///
    /// Orders are kept: they reference the diner id without a foreign key.
    pub async fn delete(&self, grant: &UserGrant) -> AppResult<usize> {
        let user_id = grant.user_id();
        let mut pooled = self.pool.get().await?;
        let conn: &mut AsyncPgConnection = &mut pooled;

        conn.transaction::<_, AppError, _>(|conn| {
            async move {
                let revoked = diesel::delete(auth_sessions::table.filter(auth_sessions::user_id.eq(user_id)))
                    .execute(conn)
                    .await?;
                diesel::delete(user_roles::table.filter(user_roles::user_id.eq(user_id)))
                    .execute(conn)
                    .await?;
                let deleted = diesel::delete(users::table.filter(users::id.eq(user_id)))
                    .execute(conn)
                    .await?;
                if deleted == 0 {
                    return Err(AppError::not_found("user", "id", user_id));
                }
                Ok(revoked)
            }
            .scope_boxed()
        })
        .await
    }

    /// Does the user hold `role`? `scope` of `None` checks the platform-wide assignment.
    pub async fn holds_role(&self, user_id: i32, role: Role, scope: Option<i32>) -> AppResult<bool> {
        let mut conn = self.pool.get().await?;

        let count: i64 = user_roles::table
            .filter(user_roles::user_id.eq(user_id))
            .filter(user_roles::role.eq(role))
            .filter(user_roles::object_id.eq(scope.unwrap_or(0)))
            .count()
            .get_result(&mut conn)
            .await?;
        Ok(count > 0)
    }
}

pub(crate) async fn find_by_email(conn: &mut AsyncPgConnection, user_email: &str) -> AppResult<Option<User>> {
    users::table
        .filter(users::email.eq(user_email))
        .select(User::as_select())
        .first(conn)
        .await
        .optional()
        .map_err(AppError::from)
}

pub(crate) async fn insert_user(conn: &mut AsyncPgConnection, new_user: &NewUser) -> AppResult<User> {
    diesel::insert_into(users::table)
        .values(new_user)
        .returning(User::as_returning())
        .get_result(conn)
        .await
        .map_err(AppError::from)
}

async fn insert_roles(conn: &mut AsyncPgConnection, user_id: i32, roles: &[RoleAssignment]) -> AppResult<()> {
    if roles.is_empty() {
        return Ok(());
    }
    let rows: Vec<_> = roles.iter().map(|role| role.into_row(user_id)).collect();
    diesel::insert_into(user_roles::table)
        .values(&rows)
        .execute(conn)
        .await?;
    Ok(())
}
