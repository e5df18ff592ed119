//! Service layer for business logic operations.
//!
//! Services check authorization, coordinate repositories and record
//! domain events. Handlers only talk to services.

mod auth_service;
mod franchise_service;
mod menu_service;
mod order_service;
mod user_service;

pub use auth_service::{AccountChanges, AuthService, NewAccount, SessionTicket};
pub use franchise_service::FranchiseService;
pub use menu_service::MenuService;
pub use order_service::{FACTORY_FAILURE_MESSAGE, OrderService};
pub use user_service::UserService;

use std::sync::Arc;

use crate::external::OrderVerifier;
use crate::metrics::MetricsRecorder;
use crate::repositories::Repositories;

/// Aggregates all services. Cloning is cheap since every member shares the pool.
#[derive(Clone)]
pub struct Services {
    pub auth: AuthService,
    pub users: UserService,
    pub franchises: FranchiseService,
    pub menu: MenuService,
    pub orders: OrderService,
}

impl Services {
    /// Wires every service from the repositories and injected collaborators.
    ///
    /// # Arguments
    /// * `repos` - Repositories sharing one pool
    /// * `verifier` - Post-commit order verification
    /// * `metrics` - Counter sink shared with the HTTP layer
    /// * `session_secret` - Key used to sign session tokens
    pub fn new(
        repos: Repositories,
        verifier: Arc<dyn OrderVerifier>,
        metrics: Arc<dyn MetricsRecorder>,
        session_secret: &str,
    ) -> Self {
        let auth = AuthService::new(
            repos.users.clone(),
            repos.sessions,
            Arc::clone(&metrics),
            session_secret,
        );
        Self {
            users: UserService::new(repos.users, auth.clone(), Arc::clone(&metrics)),
            auth,
            franchises: FranchiseService::new(repos.franchises),
            menu: MenuService::new(repos.menu),
            orders: OrderService::new(repos.orders, verifier, metrics),
        }
    }
}
