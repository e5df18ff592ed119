//! Application state for Axum web framework.
//!
//! Contains shared services and resources that are accessible
//! across all request handlers.

use std::sync::Arc;

use crate::config::Settings;
use crate::db::AsyncDbPool;
use crate::external::{FactoryClient, OrderVerifier};
use crate::metrics::InMemoryMetrics;
use crate::repositories::Repositories;
use crate::services::Services;

/// Application state containing all shared services and resources.
///
/// Cloning is cheap: services, pool and metrics are all reference counted.
#[derive(Clone)]
pub struct AppState {
    pub services: Services,
    /// Direct pool access for health checks
    pub db_pool: AsyncDbPool,
    /// Counters shared by the HTTP middleware and the services
    pub metrics: Arc<InMemoryMetrics>,
}

impl AppState {
    /// Wires the production state: orders are verified by the configured factory.
    pub fn new(pool: AsyncDbPool, settings: &Settings) -> Self {
        let verifier: Arc<dyn OrderVerifier> = Arc::new(FactoryClient::new(&settings.factory));
        Self::with_verifier(pool, &settings.session.secret, verifier)
    }

    /// Wires the state around an injected order verifier.
    pub fn with_verifier(pool: AsyncDbPool, session_secret: &str, verifier: Arc<dyn OrderVerifier>) -> Self {
        let metrics = Arc::new(InMemoryMetrics::new());
        let repos = Repositories::new(pool.clone());
        let services = Services::new(repos, verifier, metrics.clone(), session_secret);
        Self {
            services,
            db_pool: pool,
            metrics,
        }
    }
}
