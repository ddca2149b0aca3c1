//! Attendance Models

use serde::{Deserialize, Serialize};

/// One check-in per user per calendar day
///
/// `id` is the deterministic composite key `"{user_id}:{yyyy-mm-dd}"` and
/// doubles as the idempotency token — the row is never mutated after
/// creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct AttendanceRecord {
    pub id: String,
    pub user_id: String,
    pub date: String,
    pub points_awarded: i64,
    pub consecutive_days: i64,
    pub created_at: i64,
}

/// Per-user attendance aggregates, mutated only by check-in
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct UserStats {
    pub user_id: String,
    pub consecutive_attendance: i64,
    pub longest_streak: i64,
    pub total_attendance: i64,
    pub last_attendance_at: Option<i64>,
}

/// Result of a successful check-in
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckInResult {
    pub record: AttendanceRecord,
    pub stats: UserStats,
    /// Present when the follow-up ledger credit succeeded
    pub ledger_entry_id: Option<i64>,
}
