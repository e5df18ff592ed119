//! Order placement and history.
//!
//! Placing an order commits it locally first and only then asks the factory
//! to verify it. A verification failure never undoes the commit: the diner
//! gets the stored order with `verification: "unavailable"`.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::{AppError, AppResult};
use crate::external::{DinerInfo, OrderVerifier};
use crate::metrics::MetricsRecorder;
use crate::models::price::check_price;
use crate::models::{Order, OrderPage, OrderReceipt, OrderRequest, Verification, VerificationTicket};
use crate::policy::Principal;
use crate::repositories::OrderRepository;

pub const FACTORY_FAILURE_MESSAGE: &str = "Failed to fulfill order at factory";

#[derive(Clone)]
pub struct OrderService {
    repo: OrderRepository,
    verifier: Arc<dyn OrderVerifier>,
    metrics: Arc<dyn MetricsRecorder>,
}

impl OrderService {
    pub fn new(
        repo: OrderRepository,
        verifier: Arc<dyn OrderVerifier>,
        metrics: Arc<dyn MetricsRecorder>,
    ) -> Self {
        Self {
            repo,
            verifier,
            metrics,
        }
    }

    pub async fn orders(&self, caller: &Principal, page: u32) -> AppResult<OrderPage> {
        let (orders, more) = self.repo.list_for_diner(caller.id(), page).await?;
        Ok(OrderPage {
            diner_id: caller.id(),
            orders,
            page: page.max(1),
            more,
        })
    }

    /// Stores the order, then verifies it.
    ///
    /// # Errors
    /// Validation and storage failures are returned. Verification failures
    /// are not: they are logged, counted and folded into the receipt.
    pub async fn place_order(&self, caller: &Principal, request: OrderRequest) -> AppResult<OrderReceipt> {
        validate_request(&request)?;
        let started = Instant::now();

        // Detached so a dropped client connection cannot cancel the transaction midway.
        let repo = self.repo.clone();
        let diner_id = caller.id();
        let order = tokio::spawn(async move { repo.create(diner_id, request).await }).await??;
        tracing::info!(order_id = order.id, diner_id, items = order.items.len(), "Order placed");

        let diner = DinerInfo {
            id: caller.id(),
            name: caller.name().to_string(),
            email: caller.email().to_string(),
        };
        let outcome = self.verifier.verify(&diner, &order).await;
        let verification = settle(
            self.metrics.as_ref(),
            self.verifier.name(),
            &order,
            outcome,
            started.elapsed(),
        );
        Ok(OrderReceipt { order, verification })
    }
}

fn validate_request(request: &OrderRequest) -> AppResult<()> {
    if request.items.is_empty() {
        return Err(AppError::validation("items", "at least one item is required"));
    }
    for (index, line) in request.items.iter().enumerate() {
        check_price(&line.price)
            .map_err(|reason| AppError::validation(&format!("items[{index}].price"), reason))?;
    }
    Ok(())
}

/// Turns the verifier outcome into the receipt's verification part and records metrics.
fn settle(
    metrics: &dyn MetricsRecorder,
    verifier: &str,
    order: &Order,
    outcome: AppResult<VerificationTicket>,
    latency: Duration,
) -> Verification {
    match outcome {
        Ok(ticket) => {
            metrics.order_completed(order.items.len(), &order.total_price(), latency);
            Verification::Verified {
                jwt: ticket.jwt,
                report_url: ticket.report_url,
            }
        }
        Err(e) => {
            tracing::warn!(order_id = order.id, verifier, error = %e, "Order verification failed");
            metrics.order_failed(latency);
            let report_url = match e {
                AppError::ExternalService { report_url, .. } => report_url,
                _ => None,
            };
            Verification::Unavailable {
                message: FACTORY_FAILURE_MESSAGE.to_string(),
                report_url,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::InMemoryMetrics;
    use crate::models::{OrderItem, OrderLine};
    use bigdecimal::BigDecimal;
    use std::str::FromStr;

    fn price(value: &str) -> BigDecimal {
        BigDecimal::from_str(value).unwrap()
    }

    fn order() -> Order {
        Order {
            id: 7,
            diner_id: 2,
            franchise_id: 1,
            store_id: 1,
            date: jiff::civil::date(2024, 6, 5).at(12, 0, 0, 0),
            items: vec![OrderItem {
                id: 1,
                menu_id: 2,
                description: "Veggie".into(),
                price: price("1.23"),
            }],
        }
    }

    fn request(items: Vec<OrderLine>) -> OrderRequest {
        OrderRequest {
            franchise_id: 1,
            store_id: 1,
            items,
        }
    }

    #[test]
    fn test_empty_order_rejected() {
        assert!(matches!(
            validate_request(&request(Vec::new())),
            Err(AppError::Validation { field, .. }) if field == "items"
        ));
    }

    #[test]
    fn test_negative_line_price_rejected() {
        let lines = vec![
            OrderLine {
                menu_id: 1,
                description: "Veggie".into(),
                price: price("0.0038"),
            },
            OrderLine {
                menu_id: 2,
                description: "Pepperoni".into(),
                price: price("-1"),
            },
        ];
        assert!(matches!(
            validate_request(&request(lines)),
            Err(AppError::Validation { field, .. }) if field == "items[1].price"
        ));
    }

    #[test]
    fn test_verified_outcome_records_sale() {
        let metrics = InMemoryMetrics::new();
        let ticket = VerificationTicket {
            jwt: "signed".into(),
            report_url: None,
        };
        let verification = settle(&metrics, "test", &order(), Ok(ticket), Duration::from_millis(12));

        assert!(verification.is_verified());
        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.pizzas_sold, 1);
        assert_eq!(snapshot.creation_failures, 0);
        assert!((snapshot.revenue - 1.23).abs() < 1e-9);
    }

    #[test]
    fn test_failed_outcome_degrades_and_keeps_report_url() {
        let metrics = InMemoryMetrics::new();
        let failure = AppError::ExternalService {
            service: "pizza-factory".into(),
            reason: "status 500".into(),
            report_url: Some("https://factory/report/7".into()),
        };
        let verification = settle(&metrics, "test", &order(), Err(failure), Duration::from_millis(3));

        assert_eq!(
            verification,
            Verification::Unavailable {
                message: FACTORY_FAILURE_MESSAGE.into(),
                report_url: Some("https://factory/report/7".into()),
            }
        );
        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.creation_failures, 1);
        assert_eq!(snapshot.pizzas_sold, 0);
    }
}
