//! Payment gateway client (REST API, no SDK dependency)
//!
//! The gateway is authoritative: a confirm/cancel call happens before any
//! local mutation, and its failure aborts the whole operation.

use async_trait::async_trait;
use serde_json::Value;
use shared::{AppError, ErrorCode};

/// Result of a confirmed payment
#[derive(Debug, Clone)]
pub struct GatewayConfirmation {
    pub method: Option<String>,
    /// Gateway approval time (epoch millis), when it sent one
    pub approved_at: Option<i64>,
}

/// Result of a cancelled payment
#[derive(Debug, Clone)]
pub struct GatewayCancellation {
    pub cancelled_at: Option<i64>,
}

/// Outbound payment gateway contract
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn confirm(
        &self,
        payment_key: &str,
        order_id: &str,
        amount: i64,
    ) -> Result<GatewayConfirmation, AppError>;

    async fn cancel(
        &self,
        payment_key: &str,
        reason: &str,
        amount: Option<i64>,
    ) -> Result<GatewayCancellation, AppError>;
}

/// REST implementation against the real gateway
pub struct HttpPaymentGateway {
    client: reqwest::Client,
    base_url: String,
    secret_key: String,
}

impl HttpPaymentGateway {
    pub fn new(base_url: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            secret_key: secret_key.into(),
        }
    }

    async fn post_json(&self, url: &str, payload: &Value) -> Result<Value, AppError> {
        let resp = self
            .client
            .post(url)
            .basic_auth(&self.secret_key, None::<&str>)
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                AppError::with_message(
                    ErrorCode::GatewayRejected,
                    format!("payment gateway unreachable: {e}"),
                )
            })?;

        let status = resp.status();
        let body: Value = resp.json().await.map_err(|e| {
            AppError::with_message(
                ErrorCode::GatewayRejected,
                format!("payment gateway returned malformed response: {e}"),
            )
        })?;

        if !status.is_success() {
            let msg = body["message"]
                .as_str()
                .unwrap_or("payment gateway rejected the request");
            return Err(AppError::with_message(ErrorCode::GatewayRejected, msg));
        }

        Ok(body)
    }
}

fn parse_gateway_timestamp(value: &Value) -> Option<i64> {
    value
        .as_str()
        .and_then(|s| chrono::DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.timestamp_millis())
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn confirm(
        &self,
        payment_key: &str,
        order_id: &str,
        amount: i64,
    ) -> Result<GatewayConfirmation, AppError> {
        let url = format!("{}/v1/payments/confirm", self.base_url);
        let payload = serde_json::json!({
            "paymentKey": payment_key,
            "orderId": order_id,
            "amount": amount,
        });
        let body = self.post_json(&url, &payload).await?;

        Ok(GatewayConfirmation {
            method: body["method"].as_str().map(String::from),
            approved_at: parse_gateway_timestamp(&body["approvedAt"]),
        })
    }

    async fn cancel(
        &self,
        payment_key: &str,
        reason: &str,
        amount: Option<i64>,
    ) -> Result<GatewayCancellation, AppError> {
        let url = format!("{}/v1/payments/{}/cancel", self.base_url, payment_key);
        let mut payload = serde_json::json!({ "cancelReason": reason });
        if let Some(amount) = amount {
            payload["cancelAmount"] = Value::from(amount);
        }
        let body = self.post_json(&url, &payload).await?;

        Ok(GatewayCancellation {
            cancelled_at: parse_gateway_timestamp(&body["canceledAt"]),
        })
    }
}
