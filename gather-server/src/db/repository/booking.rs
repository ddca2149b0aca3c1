//! Booking & Participation Request Repository

use super::RepoResult;
use shared::models::{Booking, BookingStatus, ParticipationRequest, RequestStatus};
use shared::util;
use sqlx::{SqliteExecutor, SqlitePool};

const BOOKING_SELECT: &str = "SELECT id, host_id, title, max_capacity, current_capacity, status, cancel_reason, event_at, created_at, updated_at FROM booking";

const REQUEST_SELECT: &str = "SELECT id, booking_id, user_id, status, created_at, updated_at FROM participation_request";

/// New booking parameters (bookings are created by the host flow, which
/// lives outside this service; this insert backs tooling and tests)
pub struct NewBooking<'a> {
    pub host_id: &'a str,
    pub title: &'a str,
    pub max_capacity: i64,
    pub event_at: Option<i64>,
}

pub async fn insert(pool: &SqlitePool, data: NewBooking<'_>) -> RepoResult<Booking> {
    let now = util::now_millis();
    let id = util::snowflake_id();
    sqlx::query(
        "INSERT INTO booking (id, host_id, title, max_capacity, current_capacity, status, event_at, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, 0, 'open', ?5, ?6, ?6)",
    )
    .bind(id)
    .bind(data.host_id)
    .bind(data.title)
    .bind(data.max_capacity)
    .bind(data.event_at)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| super::RepoError::Database("Failed to create booking".into()))
}

pub async fn find_by_id(
    ex: impl SqliteExecutor<'_>,
    id: i64,
) -> RepoResult<Option<Booking>> {
    let sql = format!("{} WHERE id = ?", BOOKING_SELECT);
    let row = sqlx::query_as::<_, Booking>(&sql)
        .bind(id)
        .fetch_optional(ex)
        .await?;
    Ok(row)
}

/// Update the capacity counter and status together (the full/open flip is
/// always derived from the counter)
pub async fn update_capacity(
    ex: impl SqliteExecutor<'_>,
    booking_id: i64,
    current_capacity: i64,
    status: BookingStatus,
    now: i64,
) -> RepoResult<()> {
    sqlx::query("UPDATE booking SET current_capacity = ?1, status = ?2, updated_at = ?3 WHERE id = ?4")
        .bind(current_capacity)
        .bind(status)
        .bind(now)
        .bind(booking_id)
        .execute(ex)
        .await?;
    Ok(())
}

/// Conditioned cancellation — the `status <> 'cancelled'` guard makes a
/// duplicate cancel a no-op reported back via the affected-row count
pub async fn cancel_if_not_cancelled(
    pool: &SqlitePool,
    booking_id: i64,
    reason: &str,
    now: i64,
) -> RepoResult<u64> {
    let res = sqlx::query(
        "UPDATE booking SET status = 'cancelled', cancel_reason = ?1, updated_at = ?2 WHERE id = ?3 AND status <> 'cancelled'",
    )
    .bind(reason)
    .bind(now)
    .bind(booking_id)
    .execute(pool)
    .await?;
    Ok(res.rows_affected())
}

// ==================== Members ====================

pub async fn list_members(
    ex: impl SqliteExecutor<'_>,
    booking_id: i64,
) -> RepoResult<Vec<String>> {
    let rows = sqlx::query_scalar::<_, String>(
        "SELECT user_id FROM booking_member WHERE booking_id = ? ORDER BY joined_at",
    )
    .bind(booking_id)
    .fetch_all(ex)
    .await?;
    Ok(rows)
}

pub async fn count_members(ex: impl SqliteExecutor<'_>, booking_id: i64) -> RepoResult<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM booking_member WHERE booking_id = ?",
    )
    .bind(booking_id)
    .fetch_one(ex)
    .await?;
    Ok(count)
}

pub async fn insert_member(
    ex: impl SqliteExecutor<'_>,
    booking_id: i64,
    user_id: &str,
    now: i64,
) -> RepoResult<()> {
    sqlx::query("INSERT INTO booking_member (booking_id, user_id, joined_at) VALUES (?1, ?2, ?3)")
        .bind(booking_id)
        .bind(user_id)
        .bind(now)
        .execute(ex)
        .await?;
    Ok(())
}

pub async fn remove_member(
    ex: impl SqliteExecutor<'_>,
    booking_id: i64,
    user_id: &str,
) -> RepoResult<u64> {
    let res = sqlx::query("DELETE FROM booking_member WHERE booking_id = ?1 AND user_id = ?2")
        .bind(booking_id)
        .bind(user_id)
        .execute(ex)
        .await?;
    Ok(res.rows_affected())
}

// ==================== Participation Requests ====================

pub async fn insert_request(
    pool: &SqlitePool,
    booking_id: i64,
    user_id: &str,
) -> RepoResult<ParticipationRequest> {
    let now = util::now_millis();
    let id = util::snowflake_id();
    sqlx::query(
        "INSERT INTO participation_request (id, booking_id, user_id, status, created_at, updated_at) VALUES (?1, ?2, ?3, 'pending', ?4, ?4)",
    )
    .bind(id)
    .bind(booking_id)
    .bind(user_id)
    .bind(now)
    .execute(pool)
    .await?;
    find_request(pool, id)
        .await?
        .ok_or_else(|| super::RepoError::Database("Failed to create participation request".into()))
}

pub async fn find_request(
    ex: impl SqliteExecutor<'_>,
    id: i64,
) -> RepoResult<Option<ParticipationRequest>> {
    let sql = format!("{} WHERE id = ?", REQUEST_SELECT);
    let row = sqlx::query_as::<_, ParticipationRequest>(&sql)
        .bind(id)
        .fetch_optional(ex)
        .await?;
    Ok(row)
}

pub async fn list_requests(
    ex: impl SqliteExecutor<'_>,
    booking_id: i64,
) -> RepoResult<Vec<ParticipationRequest>> {
    let sql = format!("{} WHERE booking_id = ? ORDER BY created_at", REQUEST_SELECT);
    let rows = sqlx::query_as::<_, ParticipationRequest>(&sql)
        .bind(booking_id)
        .fetch_all(ex)
        .await?;
    Ok(rows)
}

pub async fn update_request_status(
    ex: impl SqliteExecutor<'_>,
    request_id: i64,
    status: RequestStatus,
    now: i64,
) -> RepoResult<()> {
    sqlx::query("UPDATE participation_request SET status = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(status)
        .bind(now)
        .bind(request_id)
        .execute(ex)
        .await?;
    Ok(())
}

/// Conditioned transition out of `pending` (used by reject, which never
/// touches the capacity counter and so needs no transaction)
pub async fn update_request_if_pending(
    pool: &SqlitePool,
    request_id: i64,
    status: RequestStatus,
    now: i64,
) -> RepoResult<u64> {
    let res = sqlx::query(
        "UPDATE participation_request SET status = ?1, updated_at = ?2 WHERE id = ?3 AND status = 'pending'",
    )
    .bind(status)
    .bind(now)
    .bind(request_id)
    .execute(pool)
    .await?;
    Ok(res.rows_affected())
}

/// Follow-up after a successful withdraw: the member's approved request
/// moves to `withdrawn` outside the capacity transaction
pub async fn mark_request_withdrawn(
    pool: &SqlitePool,
    booking_id: i64,
    user_id: &str,
    now: i64,
) -> RepoResult<u64> {
    let res = sqlx::query(
        "UPDATE participation_request SET status = 'withdrawn', updated_at = ?1 WHERE booking_id = ?2 AND user_id = ?3 AND status = 'approved'",
    )
    .bind(now)
    .bind(booking_id)
    .bind(user_id)
    .execute(pool)
    .await?;
    Ok(res.rows_affected())
}

/// Batched fan-out after cancellation: every non-terminal request moves to
/// `cancelled`
pub async fn cancel_active_requests(
    pool: &SqlitePool,
    booking_id: i64,
    now: i64,
) -> RepoResult<u64> {
    let res = sqlx::query(
        "UPDATE participation_request SET status = 'cancelled', updated_at = ?1 WHERE booking_id = ?2 AND status IN ('pending', 'approved')",
    )
    .bind(now)
    .bind(booking_id)
    .execute(pool)
    .await?;
    Ok(res.rows_affected())
}
