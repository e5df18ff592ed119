//! In-process counters.
//!
//! Services record domain events through [`MetricsRecorder`]; an external
//! telemetry pusher can read [`InMemoryMetrics::snapshot`].

use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::time::Duration;

use bigdecimal::{BigDecimal, ToPrimitive};
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::price::PRICE_SCALE;

pub trait MetricsRecorder: Send + Sync {
    fn http_request(&self, method: &str);
    fn session_opened(&self);
    fn session_closed(&self);
    fn auth_attempt(&self, success: bool);
    fn order_completed(&self, items: usize, total: &BigDecimal, latency: Duration);
    fn order_failed(&self, latency: Duration);
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RequestCounts {
    pub get: u64,
    pub post: u64,
    pub put: u64,
    pub delete: u64,
    pub other: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub requests: RequestCounts,
    pub active_sessions: i64,
    pub auth_success: u64,
    pub auth_failure: u64,
    pub pizzas_sold: u64,
    pub creation_failures: u64,
    /// Revenue in whole units, derived from the 1e-8 counter.
    pub revenue: f64,
    pub orders_timed: u64,
    pub order_latency_ms_total: u64,
}

#[derive(Debug, Default)]
pub struct InMemoryMetrics {
    get: AtomicU64,
    post: AtomicU64,
    put: AtomicU64,
    delete: AtomicU64,
    other: AtomicU64,
    active_sessions: AtomicI64,
    auth_success: AtomicU64,
    auth_failure: AtomicU64,
    pizzas_sold: AtomicU64,
    creation_failures: AtomicU64,
    revenue_units: AtomicU64,
    orders_timed: AtomicU64,
    latency_ms: AtomicU64,
}

impl InMemoryMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requests: RequestCounts {
                get: self.get.load(Ordering::Relaxed),
                post: self.post.load(Ordering::Relaxed),
                put: self.put.load(Ordering::Relaxed),
                delete: self.delete.load(Ordering::Relaxed),
                other: self.other.load(Ordering::Relaxed),
            },
            active_sessions: self.active_sessions.load(Ordering::Relaxed),
            auth_success: self.auth_success.load(Ordering::Relaxed),
            auth_failure: self.auth_failure.load(Ordering::Relaxed),
            pizzas_sold: self.pizzas_sold.load(Ordering::Relaxed),
            creation_failures: self.creation_failures.load(Ordering::Relaxed),
            revenue: self.revenue_units.load(Ordering::Relaxed) as f64 / 1e8,
            orders_timed: self.orders_timed.load(Ordering::Relaxed),
            order_latency_ms_total: self.latency_ms.load(Ordering::Relaxed),
        }
    }

    fn record_latency(&self, latency: Duration) {
        let millis = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
        self.orders_timed.fetch_add(1, Ordering::Relaxed);
        self.latency_ms.fetch_add(millis, Ordering::Relaxed);
    }
}

/// Converts a price total to integer 1e-8 units; negative or oversized values count as zero.
fn to_units(total: &BigDecimal) -> u64 {
    (total.clone() * BigDecimal::from(10i64.pow(PRICE_SCALE as u32)))
        .round(0)
        .to_u64()
        .unwrap_or(0)
}

impl MetricsRecorder for InMemoryMetrics {
    fn http_request(&self, method: &str) {
        let counter = match method {
            "GET" => &self.get,
            "POST" => &self.post,
            "PUT" => &self.put,
            "DELETE" => &self.delete,
            _ => &self.other,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn session_opened(&self) {
        self.active_sessions.fetch_add(1, Ordering::Relaxed);
    }

    fn session_closed(&self) {
        self.active_sessions.fetch_sub(1, Ordering::Relaxed);
    }

    fn auth_attempt(&self, success: bool) {
        if success {
            self.auth_success.fetch_add(1, Ordering::Relaxed);
        } else {
            self.auth_failure.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn order_completed(&self, items: usize, total: &BigDecimal, latency: Duration) {
        self.pizzas_sold.fetch_add(items as u64, Ordering::Relaxed);
        self.revenue_units.fetch_add(to_units(total), Ordering::Relaxed);
        self.record_latency(latency);
    }

    fn order_failed(&self, latency: Duration) {
        self.creation_failures.fetch_add(1, Ordering::Relaxed);
        self.record_latency(latency);
    }
}
