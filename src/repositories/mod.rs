//! Repository layer for data access operations.
//!
//! Every repository holds the async pool. Operations that change more than one
//! row take a single pooled connection and run inside one transaction.
//! Mutations that need authorization take a grant from [`crate::policy`] as
//! their first argument.

mod franchise_repo;
mod menu_repo;
mod order_repo;
mod session_repo;
mod user_repo;

pub use franchise_repo::FranchiseRepository;
pub use menu_repo::MenuRepository;
pub use order_repo::OrderRepository;
pub use session_repo::SessionRepository;
pub use user_repo::UserRepository;

use crate::db::AsyncDbPool;

/// Fixed page size for franchise and order listings.
pub const PAGE_SIZE: i64 = 10;

/// Offset for a 1-based page number; page 0 is read as page 1.
pub(crate) fn page_offset(page: u32) -> i64 {
    (i64::from(page.max(1)) - 1) * PAGE_SIZE
}

/// Aggregates all repositories. Cloning only bumps the pool's reference count.
#[derive(Clone)]
pub struct Repositories {
    pub users: UserRepository,
    pub sessions: SessionRepository,
    pub franchises: FranchiseRepository,
    pub menu: MenuRepository,
    pub orders: OrderRepository,
}

impl Repositories {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            sessions: SessionRepository::new(pool.clone()),
            franchises: FranchiseRepository::new(pool.clone()),
            menu: MenuRepository::new(pool.clone()),
            orders: OrderRepository::new(pool),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_offset() {
        assert_eq!(page_offset(0), 0);
        assert_eq!(page_offset(1), 0);
        assert_eq!(page_offset(3), 20);
    }
}
