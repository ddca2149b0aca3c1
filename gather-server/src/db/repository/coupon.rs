//! Coupon Repository

use super::RepoResult;
use shared::models::{Coupon, DiscountType};
use shared::util;
use sqlx::{SqliteExecutor, SqlitePool};

const COUPON_SELECT: &str = "SELECT id, owner_id, title, discount, discount_type, min_amount, is_used, expires_at, used_at, created_at FROM coupon";

pub struct NewCoupon<'a> {
    pub owner_id: &'a str,
    pub title: &'a str,
    pub discount: f64,
    pub discount_type: DiscountType,
    pub min_amount: i64,
    pub expires_at: i64,
}

pub async fn insert(pool: &SqlitePool, data: NewCoupon<'_>) -> RepoResult<Coupon> {
    let now = util::now_millis();
    let id = util::snowflake_id();
    sqlx::query(
        "INSERT INTO coupon (id, owner_id, title, discount, discount_type, min_amount, is_used, expires_at, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, ?7, ?8)",
    )
    .bind(id)
    .bind(data.owner_id)
    .bind(data.title)
    .bind(data.discount)
    .bind(data.discount_type)
    .bind(data.min_amount)
    .bind(data.expires_at)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| super::RepoError::Database("Failed to create coupon".into()))
}

pub async fn find_by_id(ex: impl SqliteExecutor<'_>, id: i64) -> RepoResult<Option<Coupon>> {
    let sql = format!("{} WHERE id = ?", COUPON_SELECT);
    let row = sqlx::query_as::<_, Coupon>(&sql)
        .bind(id)
        .fetch_optional(ex)
        .await?;
    Ok(row)
}

pub async fn list_for_owner(pool: &SqlitePool, owner_id: &str) -> RepoResult<Vec<Coupon>> {
    let sql = format!(
        "{} WHERE owner_id = ? ORDER BY created_at DESC",
        COUPON_SELECT
    );
    let rows = sqlx::query_as::<_, Coupon>(&sql)
        .bind(owner_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Flip `is_used` exactly once — the `AND is_used = 0` guard means a lost
/// race reports zero affected rows instead of double-redeeming
pub async fn mark_used(
    ex: impl SqliteExecutor<'_>,
    id: i64,
    now: i64,
) -> RepoResult<u64> {
    let res = sqlx::query("UPDATE coupon SET is_used = 1, used_at = ?1 WHERE id = ?2 AND is_used = 0")
        .bind(now)
        .bind(id)
        .execute(ex)
        .await?;
    Ok(res.rows_affected())
}
