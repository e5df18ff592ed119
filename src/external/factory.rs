//! Order verification against the pizza factory.
//!
//! The factory attests an order and returns a signed token plus an optional
//! report link. Any response other than a 2xx JSON body with a `jwt` is an
//! `AppError::ExternalService`.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::FactoryConfig;
use crate::error::{AppError, AppResult};
use crate::external::client::HTTP_CLIENT;
use crate::models::{Order, VerificationTicket};

const SERVICE_NAME: &str = "pizza-factory";

/// Identity of the diner sent alongside the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DinerInfo {
    pub id: i32,
    pub name: String,
    pub email: String,
}

/// Post-commit order verification.
///
/// Implementations must not retry: a failure is reported once and the caller
/// degrades the response.
#[async_trait]
pub trait OrderVerifier: Send + Sync {
    async fn verify(&self, diner: &DinerInfo, order: &Order) -> AppResult<VerificationTicket>;

    /// Name used in logs and error payloads.
    fn name(&self) -> &'static str;
}

#[derive(Serialize)]
struct FactoryRequest<'a> {
    diner: &'a DinerInfo,
    order: &'a Order,
}

#[derive(Deserialize)]
struct FactoryResponse {
    jwt: String,
    #[serde(rename = "reportUrl")]
    report_url: Option<String>,
}

#[derive(Deserialize, Default)]
struct FactoryFailure {
    message: Option<String>,
    #[serde(rename = "reportUrl")]
    report_url: Option<String>,
}

/// HTTP verifier backed by the shared client.
#[derive(Debug, Clone)]
pub struct FactoryClient {
    endpoint: String,
    api_key: String,
    timeout: Duration,
}

impl FactoryClient {
    pub fn new(config: &FactoryConfig) -> Self {
        Self {
            endpoint: format!("{}/api/order", config.url.trim_end_matches('/')),
            api_key: config.api_key.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    fn failure(reason: impl Into<String>, report_url: Option<String>) -> AppError {
        AppError::ExternalService {
            service: SERVICE_NAME.to_string(),
            reason: reason.into(),
            report_url,
        }
    }
}

#[async_trait]
impl OrderVerifier for FactoryClient {
    async fn verify(&self, diner: &DinerInfo, order: &Order) -> AppResult<VerificationTicket> {
        let response = HTTP_CLIENT
            .post(&self.endpoint)
            .timeout(self.timeout)
            .bearer_auth(&self.api_key)
            .json(&FactoryRequest { diner, order })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Self::failure(format!("timed out after {}s", self.timeout.as_secs()), None)
                } else {
                    Self::failure(format!("request failed: {e}"), None)
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Self::failure(format!("failed to read response: {e}"), None))?;

        if !status.is_success() {
            let failure: FactoryFailure = serde_json::from_str(&body).unwrap_or_default();
            let reason = match failure.message {
                Some(message) => format!("status {status}: {message}"),
                None => format!("status {status}"),
            };
            return Err(Self::failure(reason, failure.report_url));
        }

        let accepted: FactoryResponse = serde_json::from_str(&body)
            .map_err(|e| Self::failure(format!("malformed response: {e}"), None))?;
        Ok(VerificationTicket {
            jwt: accepted.jwt,
            report_url: accepted.report_url,
        })
    }

    fn name(&self) -> &'static str {
        SERVICE_NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, StatusCode, header};
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{Value, json};

    async fn spawn_factory(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{address}")
    }

    fn client(url: String, timeout_secs: u64) -> FactoryClient {
        FactoryClient::new(&FactoryConfig {
            url,
            api_key: "factory-key".to_string(),
            timeout_secs,
        })
    }

    fn diner() -> DinerInfo {
        DinerInfo {
            id: 3,
            name: "pizza diner".into(),
            email: "d@jwt.com".into(),
        }
    }

    fn order() -> Order {
        Order {
            id: 41,
            diner_id: 3,
            franchise_id: 1,
            store_id: 1,
            date: jiff::civil::date(2024, 6, 5).at(12, 0, 0, 0),
            items: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_accepted_order_returns_ticket() {
        let router = Router::new().route(
            "/api/order",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                assert_eq!(
                    headers.get(header::AUTHORIZATION).unwrap(),
                    "Bearer factory-key"
                );
                assert_eq!(body["diner"]["email"], "d@jwt.com");
                assert_eq!(body["order"]["id"], 41);
                Json(json!({ "jwt": "signed-order", "reportUrl": "https://factory/report/41" }))
            }),
        );
        let url = spawn_factory(router).await;

        let ticket = client(url, 5).verify(&diner(), &order()).await.unwrap();
        assert_eq!(ticket.jwt, "signed-order");
        assert_eq!(ticket.report_url.as_deref(), Some("https://factory/report/41"));
    }

    #[tokio::test]
    async fn test_error_status_keeps_report_url() {
        let router = Router::new().route(
            "/api/order",
            post(|| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "message": "oven on fire", "reportUrl": "https://factory/report/9" })),
                )
            }),
        );
        let url = spawn_factory(router).await;

        match client(url, 5).verify(&diner(), &order()).await {
            Err(AppError::ExternalService { reason, report_url, .. }) => {
                assert!(reason.contains("oven on fire"));
                assert_eq!(report_url.as_deref(), Some("https://factory/report/9"));
            }
            other => panic!("expected ExternalService, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_success_body_is_failure() {
        let router = Router::new().route("/api/order", post(|| async { "not json" }));
        let url = spawn_factory(router).await;

        assert!(matches!(
            client(url, 5).verify(&diner(), &order()).await,
            Err(AppError::ExternalService { .. })
        ));
    }

    #[tokio::test]
    async fn test_slow_factory_times_out() {
        let router = Router::new().route(
            "/api/order",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(3)).await;
                Json(json!({ "jwt": "late" }))
            }),
        );
        let url = spawn_factory(router).await;

        match client(url, 1).verify(&diner(), &order()).await {
            Err(AppError::ExternalService { reason, .. }) => assert!(reason.contains("timed out")),
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unreachable_factory_is_failure() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        drop(listener);

        assert!(matches!(
            client(format!("http://{address}/"), 2).verify(&diner(), &order()).await,
            Err(AppError::ExternalService { .. })
        ));
    }

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let factory = client("https://factory.example/".into(), 5);
        assert_eq!(factory.endpoint, "https://factory.example/api/order");
        assert_eq!(factory.name(), "pizza-factory");
    }
}
