//! Attendance Record & User Stats Repository

use super::RepoResult;
use shared::models::{AttendanceRecord, UserStats};
use sqlx::{SqliteExecutor, SqlitePool};

pub async fn record_exists(ex: impl SqliteExecutor<'_>, id: &str) -> RepoResult<bool> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM attendance_record WHERE id = ?")
        .bind(id)
        .fetch_one(ex)
        .await?;
    Ok(count > 0)
}

pub async fn find_record(
    ex: impl SqliteExecutor<'_>,
    id: &str,
) -> RepoResult<Option<AttendanceRecord>> {
    let row = sqlx::query_as::<_, AttendanceRecord>(
        "SELECT id, user_id, date, points_awarded, consecutive_days, created_at FROM attendance_record WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(ex)
    .await?;
    Ok(row)
}

/// Insert today's record; the primary key doubles as the idempotency
/// guard, so a duplicate day surfaces as `RepoError::Duplicate`
pub async fn insert_record(
    ex: impl SqliteExecutor<'_>,
    record: &AttendanceRecord,
) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO attendance_record (id, user_id, date, points_awarded, consecutive_days, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )
    .bind(&record.id)
    .bind(&record.user_id)
    .bind(&record.date)
    .bind(record.points_awarded)
    .bind(record.consecutive_days)
    .bind(record.created_at)
    .execute(ex)
    .await?;
    Ok(())
}

pub async fn count_records(pool: &SqlitePool, user_id: &str) -> RepoResult<i64> {
    let count =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM attendance_record WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(pool)
            .await?;
    Ok(count)
}

pub async fn find_stats(
    ex: impl SqliteExecutor<'_>,
    user_id: &str,
) -> RepoResult<Option<UserStats>> {
    let row = sqlx::query_as::<_, UserStats>(
        "SELECT user_id, consecutive_attendance, longest_streak, total_attendance, last_attendance_at FROM user_stats WHERE user_id = ?",
    )
    .bind(user_id)
    .fetch_optional(ex)
    .await?;
    Ok(row)
}

pub async fn upsert_stats(
    ex: impl SqliteExecutor<'_>,
    stats: &UserStats,
) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO user_stats (user_id, consecutive_attendance, longest_streak, total_attendance, last_attendance_at) VALUES (?1, ?2, ?3, ?4, ?5) ON CONFLICT(user_id) DO UPDATE SET consecutive_attendance = ?2, longest_streak = ?3, total_attendance = ?4, last_attendance_at = ?5",
    )
    .bind(&stats.user_id)
    .bind(stats.consecutive_attendance)
    .bind(stats.longest_streak)
    .bind(stats.total_attendance)
    .bind(stats.last_attendance_at)
    .execute(ex)
    .await?;
    Ok(())
}
