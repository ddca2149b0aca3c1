//! Coupon Models

use serde::{Deserialize, Serialize};

/// Discount type for coupons
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum DiscountType {
    Percent,
    Amount,
}

/// Coupon entity
///
/// Created by privileged issuance; mutated exactly once by redemption
/// (`is_used` false→true), otherwise immutable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Coupon {
    pub id: i64,
    pub owner_id: String,
    pub title: String,
    pub discount: f64,
    pub discount_type: DiscountType,
    pub min_amount: i64,
    pub is_used: bool,
    pub expires_at: i64,
    pub used_at: Option<i64>,
    pub created_at: i64,
}

/// Discount terms returned by a successful redemption
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedeemedCoupon {
    pub coupon_id: i64,
    pub discount: f64,
    pub discount_type: DiscountType,
    pub min_amount: i64,
    pub used_at: i64,
}
