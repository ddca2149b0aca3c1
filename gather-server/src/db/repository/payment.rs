//! Payment Repository

use super::RepoResult;
use shared::models::Payment;
use shared::util;
use sqlx::{SqliteExecutor, SqlitePool};

const PAYMENT_SELECT: &str = "SELECT id, order_id, payment_key, user_id, amount, event_at, status, method, approved_at, cancelled_at, refund_amount, created_at FROM payment";

pub struct NewPayment<'a> {
    pub order_id: &'a str,
    pub payment_key: &'a str,
    pub user_id: &'a str,
    pub amount: i64,
    pub event_at: i64,
    pub method: Option<&'a str>,
    pub approved_at: Option<i64>,
}

pub async fn insert(pool: &SqlitePool, data: NewPayment<'_>) -> RepoResult<Payment> {
    let now = util::now_millis();
    let id = util::snowflake_id();
    sqlx::query(
        "INSERT INTO payment (id, order_id, payment_key, user_id, amount, event_at, status, method, approved_at, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 'confirmed', ?7, ?8, ?9)",
    )
    .bind(id)
    .bind(data.order_id)
    .bind(data.payment_key)
    .bind(data.user_id)
    .bind(data.amount)
    .bind(data.event_at)
    .bind(data.method)
    .bind(data.approved_at)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_order(pool, data.order_id)
        .await?
        .ok_or_else(|| super::RepoError::Database("Failed to record payment".into()))
}

pub async fn find_by_order(
    ex: impl SqliteExecutor<'_>,
    order_id: &str,
) -> RepoResult<Option<Payment>> {
    let sql = format!("{} WHERE order_id = ?", PAYMENT_SELECT);
    let row = sqlx::query_as::<_, Payment>(&sql)
        .bind(order_id)
        .fetch_optional(ex)
        .await?;
    Ok(row)
}

/// Conditioned cancellation — only a still-confirmed payment can move
pub async fn cancel_if_confirmed(
    pool: &SqlitePool,
    order_id: &str,
    refund_amount: i64,
    now: i64,
) -> RepoResult<u64> {
    let res = sqlx::query(
        "UPDATE payment SET status = 'cancelled', cancelled_at = ?1, refund_amount = ?2 WHERE order_id = ?3 AND status = 'confirmed'",
    )
    .bind(now)
    .bind(refund_amount)
    .bind(order_id)
    .execute(pool)
    .await?;
    Ok(res.rows_affected())
}
