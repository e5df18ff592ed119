//! Franchise and store persistence.

use std::collections::HashMap;

use bigdecimal::{BigDecimal, Zero};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};

use super::user_repo::{find_by_email, insert_user};
use super::{PAGE_SIZE, page_offset};
use crate::db::AsyncDbPool;
use crate::error::{AppError, AppResult};
use crate::models::{
    CreateFranchise, Franchise, FranchiseAdmin, FranchiseQuery, FranchiseView, NewFranchise,
    NewStore, NewUser, NewUserRole, Role, Store, StoreSummary,
};
use crate::policy::{AdminGrant, FranchiseGrant};
use crate::schema::{diner_orders, franchises, order_items, stores, user_roles, users};

#[derive(Clone)]
pub struct FranchiseRepository {
    pool: AsyncDbPool,
}

impl FranchiseRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }

    /// Creates a franchise and makes every listed email a franchisee of it.
    ///
    /// Unknown emails get a placeholder account whose password hash is
    /// `placeholder_password`. All rows are written in one transaction: a
    /// duplicate franchise name or a malformed email leaves nothing behind.
    pub async fn create(
        &self,
        grant: &AdminGrant,
        input: CreateFranchise,
        placeholder_password: String,
    ) -> AppResult<FranchiseView> {
        let actor_id = grant.actor_id();
        let emails = dedup_emails(&input.admin_emails);
        let mut pooled = self.pool.get().await?;
        let conn: &mut AsyncPgConnection = &mut pooled;

        let view = conn
            .transaction::<_, AppError, _>(|conn| {
                async move {
                    let franchise: Franchise = diesel::insert_into(franchises::table)
                        .values(&NewFranchise { name: input.name })
                        .returning(Franchise::as_returning())
                        .get_result(conn)
                        .await?;

                    let mut admins = Vec::with_capacity(emails.len());
                    for email in emails {
                        let admin = resolve_admin(conn, &email, &placeholder_password).await?;
                        diesel::insert_into(user_roles::table)
                            .values(&NewUserRole {
                                user_id: admin.id,
                                role: Role::Franchisee,
                                object_id: franchise.id,
                            })
                            .execute(conn)
                            .await?;
                        admins.push(admin);
                    }

                    Ok(FranchiseView {
                        id: franchise.id,
                        name: franchise.name,
                        admins: Some(admins),
                        stores: Vec::new(),
                    })
                }
                .scope_boxed()
            })
            .await?;

        tracing::info!(franchise_id = view.id, actor_id, "Franchise created");
        Ok(view)
    }

    /// Removes the franchise, its stores and every franchisee role scoped to it.
    pub async fn delete(&self, grant: &AdminGrant, franchise_id: i32) -> AppResult<()> {
        let actor_id = grant.actor_id();
        let mut pooled = self.pool.get().await?;
        let conn: &mut AsyncPgConnection = &mut pooled;

        conn.transaction::<_, AppError, _>(|conn| {
            async move {
                ensure_franchise(conn, franchise_id).await?;
                diesel::delete(stores::table.filter(stores::franchise_id.eq(franchise_id)))
                    .execute(conn)
                    .await?;
                diesel::delete(
                    user_roles::table
                        .filter(user_roles::role.eq(Role::Franchisee))
                        .filter(user_roles::object_id.eq(franchise_id)),
                )
                .execute(conn)
                .await?;
                diesel::delete(franchises::table.filter(franchises::id.eq(franchise_id)))
                    .execute(conn)
                    .await?;
                Ok(())
            }
            .scope_boxed()
        })
        .await?;

        tracing::info!(franchise_id, actor_id, "Franchise deleted");
        Ok(())
    }

    pub async fn create_store(&self, grant: &FranchiseGrant, name: String) -> AppResult<Store> {
        let franchise_id = grant.franchise_id();
        let mut pooled = self.pool.get().await?;
        let conn: &mut AsyncPgConnection = &mut pooled;

        ensure_franchise(conn, franchise_id).await?;
        // The foreign key still guards a franchise deleted between the check and the insert.
        diesel::insert_into(stores::table)
            .values(&NewStore { franchise_id, name })
            .returning(Store::as_returning())
            .get_result(conn)
            .await
            .map_err(|e| match e {
                diesel::result::Error::DatabaseError(
                    diesel::result::DatabaseErrorKind::ForeignKeyViolation,
                    _,
                ) => AppError::not_found("franchise", "id", franchise_id),
                other => AppError::from(other),
            })
    }

    /// Deletes a store only if it belongs to the granted franchise.
    pub async fn delete_store(&self, grant: &FranchiseGrant, store_id: i32) -> AppResult<()> {
        let franchise_id = grant.franchise_id();
        let mut conn = self.pool.get().await?;

        let deleted = diesel::delete(
            stores::table
                .filter(stores::id.eq(store_id))
                .filter(stores::franchise_id.eq(franchise_id)),
        )
        .execute(&mut conn)
        .await?;
        if deleted == 0 {
            return Err(AppError::not_found("store", "id", store_id));
        }
        Ok(())
    }

    /// One page of franchises ordered by id. Returns the page and whether more rows follow.
    pub async fn list(&self, query: &FranchiseQuery, detailed: bool) -> AppResult<(Vec<FranchiseView>, bool)> {
        let mut pooled = self.pool.get().await?;
        let conn: &mut AsyncPgConnection = &mut pooled;

        let mut rows_query = franchises::table.into_boxed();
        if let Some(name) = query.name.as_deref().filter(|name| !name.is_empty()) {
            rows_query = rows_query.filter(franchises::name.ilike(name_pattern(name)));
        }
        if let Some(user_id) = query.admin_user_id {
            rows_query = rows_query.filter(
                franchises::id.eq_any(
                    user_roles::table
                        .filter(user_roles::user_id.eq(user_id))
                        .filter(user_roles::role.eq(Role::Franchisee))
                        .select(user_roles::object_id),
                ),
            );
        }

        let mut rows: Vec<Franchise> = rows_query
            .order(franchises::id.asc())
            .limit(PAGE_SIZE + 1)
            .offset(page_offset(query.page))
            .select(Franchise::as_select())
            .load(conn)
            .await?;

        let more = rows.len() as i64 > PAGE_SIZE;
        rows.truncate(PAGE_SIZE as usize);
        let views = load_views(conn, rows, detailed).await?;
        Ok((views, more))
    }

    /// Every franchise the user administers, with admins and store revenue.
    pub async fn list_for_admin(&self, user_id: i32) -> AppResult<Vec<FranchiseView>> {
        let mut pooled = self.pool.get().await?;
        let conn: &mut AsyncPgConnection = &mut pooled;

        let rows: Vec<Franchise> = franchises::table
            .filter(
                franchises::id.eq_any(
                    user_roles::table
                        .filter(user_roles::user_id.eq(user_id))
                        .filter(user_roles::role.eq(Role::Franchisee))
                        .select(user_roles::object_id),
                ),
            )
            .order(franchises::id.asc())
            .select(Franchise::as_select())
            .load(conn)
            .await?;
        load_views(conn, rows, true).await
    }
}

/// Trims, drops empties and collapses repeats while keeping the first-seen order.
fn dedup_emails(emails: &[String]) -> Vec<String> {
    let mut seen = Vec::with_capacity(emails.len());
    for email in emails.iter().map(|email| email.trim()).filter(|email| !email.is_empty()) {
        if !seen.iter().any(|known: &String| known.eq_ignore_ascii_case(email)) {
            seen.push(email.to_string());
        }
    }
    seen
}

/// Turns a `*` wildcard filter into an `ILIKE` pattern. Literal `%`, `_` and `\\` are escaped.
fn name_pattern(filter: &str) -> String {
    let mut pattern = String::with_capacity(filter.len());
    for c in filter.chars() {
        match c {
            '*' => pattern.push('%'),
            '%' | '_' | '\\' => {
                pattern.push('\\');
                pattern.push(c);
            }
            _ => pattern.push(c),
        }
    }
    pattern
}

fn placeholder_name(email: &str) -> String {
    email.split('@').next().unwrap_or(email).to_string()
}

async fn ensure_franchise(conn: &mut AsyncPgConnection, franchise_id: i32) -> AppResult<()> {
    let found = franchises::table
        .filter(franchises::id.eq(franchise_id))
        .select(franchises::id)
        .first::<i32>(conn)
        .await
        .optional()?;
    found
        .map(|_| ())
        .ok_or_else(|| AppError::not_found("franchise", "id", franchise_id))
}

async fn resolve_admin(
    conn: &mut AsyncPgConnection,
    email: &str,
    placeholder_password: &str,
) -> AppResult<FranchiseAdmin> {
    if !email.contains('@') {
        return Err(AppError::validation(
            "admins",
            format!("'{email}' is not a valid email address"),
        ));
    }

    let user = match find_by_email(conn, email).await? {
        Some(user) => user,
        None => {
            let placeholder = NewUser {
                name: placeholder_name(email),
                email: email.to_string(),
                password: placeholder_password.to_string(),
            };
            let user = insert_user(conn, &placeholder).await?;
            tracing::info!(user_id = user.id, "Placeholder franchise admin created");
            user
        }
    };

    Ok(FranchiseAdmin {
        id: user.id,
        name: user.name,
        email: user.email,
    })
}

/// Attaches stores, and for detailed views the admins and per-store revenue.
async fn load_views(
    conn: &mut AsyncPgConnection,
    rows: Vec<Franchise>,
    detailed: bool,
) -> AppResult<Vec<FranchiseView>> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<i32> = rows.iter().map(|franchise| franchise.id).collect();

    let store_rows: Vec<Store> = stores::table
        .filter(stores::franchise_id.eq_any(&ids))
        .order(stores::id.asc())
        .select(Store::as_select())
        .load(conn)
        .await?;

    let (mut admins_by_franchise, revenue_by_store) = if detailed {
        let admin_rows: Vec<(i32, i32, String, String)> = user_roles::table
            .inner_join(users::table)
            .filter(user_roles::role.eq(Role::Franchisee))
            .filter(user_roles::object_id.eq_any(&ids))
            .order((user_roles::object_id.asc(), users::id.asc()))
            .select((user_roles::object_id, users::id, users::name, users::email))
            .load(conn)
            .await?;

        let mut admins: HashMap<i32, Vec<FranchiseAdmin>> = HashMap::new();
        for (franchise_id, id, name, email) in admin_rows {
            admins
                .entry(franchise_id)
                .or_default()
                .push(FranchiseAdmin { id, name, email });
        }

        let store_ids: Vec<i32> = store_rows.iter().map(|store| store.id).collect();
        let revenue: HashMap<i32, BigDecimal> = if store_ids.is_empty() {
            HashMap::new()
        } else {
            diner_orders::table
                .inner_join(order_items::table)
                .filter(diner_orders::store_id.eq_any(&store_ids))
                .group_by(diner_orders::store_id)
                .select((diner_orders::store_id, diesel::dsl::sum(order_items::price)))
                .load::<(i32, Option<BigDecimal>)>(conn)
                .await?
                .into_iter()
                .map(|(store_id, total)| (store_id, total.unwrap_or_else(BigDecimal::zero)))
                .collect()
        };
        (admins, Some(revenue))
    } else {
        (HashMap::new(), None)
    };

    let mut stores_by_franchise: HashMap<i32, Vec<StoreSummary>> = HashMap::new();
    for store in store_rows {
        let total_revenue = revenue_by_store.as_ref().map(|revenue| {
            revenue
                .get(&store.id)
                .cloned()
                .unwrap_or_else(BigDecimal::zero)
        });
        stores_by_franchise
            .entry(store.franchise_id)
            .or_default()
            .push(StoreSummary {
                id: store.id,
                name: store.name,
                total_revenue,
            });
    }

    Ok(rows
        .into_iter()
        .map(|franchise| FranchiseView {
            id: franchise.id,
            admins: detailed.then(|| admins_by_franchise.remove(&franchise.id).unwrap_or_default()),
            stores: stores_by_franchise.remove(&franchise.id).unwrap_or_default(),
            name: franchise.name,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_emails_keeps_first_spelling() {
        let emails = vec![
            " a@jwt.com ".to_string(),
            "b@jwt.com".to_string(),
            "A@jwt.com".to_string(),
            "".to_string(),
        ];
        assert_eq!(dedup_emails(&emails), vec!["a@jwt.com", "b@jwt.com"]);
    }

    #[test]
    fn test_placeholder_name_is_local_part() {
        assert_eq!(placeholder_name("franchisee@jwt.com"), "franchisee");
    }

    #[test]
    fn test_name_pattern_only_star_is_wildcard() {
        assert_eq!(name_pattern("pizza*"), "pizza%");
        assert_eq!(name_pattern("*pocket*"), "%pocket%");
        assert_eq!(name_pattern("100%_real"), "100\\%\\_real");
        assert_eq!(name_pattern("back\\slash"), "back\\\\slash");
    }
}
