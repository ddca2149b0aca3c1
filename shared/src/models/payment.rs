//! Payment Models

use serde::{Deserialize, Serialize};

/// Payment lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum PaymentStatus {
    Confirmed,
    Cancelled,
}

/// Record of a gateway-confirmed payment
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Payment {
    pub id: i64,
    pub order_id: String,
    pub payment_key: String,
    pub user_id: String,
    pub amount: i64,
    /// Event time the payment is for (epoch millis); feeds the refund policy
    pub event_at: i64,
    pub status: PaymentStatus,
    pub method: Option<String>,
    pub approved_at: Option<i64>,
    pub cancelled_at: Option<i64>,
    pub refund_amount: Option<i64>,
    pub created_at: i64,
}
