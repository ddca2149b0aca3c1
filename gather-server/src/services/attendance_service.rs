//! Attendance Streak Service
//!
//! Daily idempotent check-in with streak bonuses. The check-in is a
//! two-step saga: the attendance record and user stats commit in one
//! transaction, then the points credit runs as a second, independent
//! transaction. A crash between the two leaves a record without its
//! ledger credit — an accepted, documented window.

use crate::db::repository::{RepoError, attendance as attendance_repo};
use crate::db::with_txn_retry;
use crate::services::points_service::PointsService;
use chrono::NaiveDate;
use shared::models::{AdjustDirection, AttendanceRecord, CheckInResult, UserStats};
use shared::util;
use shared::{AppError, AppResult, ErrorCode};
use sqlx::SqlitePool;

/// Bonus schedule, first matching rule wins
pub fn streak_bonus(consecutive_days: i64) -> i64 {
    if consecutive_days == 7 {
        500
    } else if consecutive_days == 30 {
        2000
    } else if consecutive_days % 7 == 0 {
        300
    } else {
        100
    }
}

/// Deterministic record id — one per (user, calendar day)
pub fn attendance_record_id(user_id: &str, date: NaiveDate) -> String {
    format!("{user_id}:{date}")
}

#[derive(Clone)]
pub struct AttendanceService {
    pool: SqlitePool,
    points: PointsService,
}

impl AttendanceService {
    pub fn new(pool: SqlitePool, points: PointsService) -> Self {
        Self { pool, points }
    }

    /// Check in for `today`. A second call for the same user/day fails
    /// with AlreadyCheckedIn and performs no side effects.
    pub async fn check_in(&self, user_id: &str, today: NaiveDate) -> AppResult<CheckInResult> {
        let pool = &self.pool;
        let (record, stats) = with_txn_retry("attendance_check_in", || {
            Self::check_in_txn(pool, user_id, today)
        })
        .await?;

        // Second, independent transaction: the bonus credit. The record
        // above already committed, so a failure here is logged and the
        // missing credit reported back instead of unwinding the check-in.
        let ledger_entry_id = match self
            .points
            .adjust(user_id, record.points_awarded, AdjustDirection::Add, "attendance bonus")
            .await
        {
            Ok(res) => Some(res.ledger_entry_id),
            Err(err) => {
                tracing::error!(
                    user_id,
                    date = %today,
                    error = %err,
                    "attendance bonus credit failed after check-in"
                );
                None
            }
        };

        Ok(CheckInResult {
            record,
            stats,
            ledger_entry_id,
        })
    }

    async fn check_in_txn(
        pool: &SqlitePool,
        user_id: &str,
        today: NaiveDate,
    ) -> AppResult<(AttendanceRecord, UserStats)> {
        let record_id = attendance_record_id(user_id, today);
        let yesterday = today
            .pred_opt()
            .ok_or_else(|| AppError::validation("date out of range"))?;
        let yesterday_id = attendance_record_id(user_id, yesterday);
        let now = util::now_millis();

        let mut txn = pool.begin().await.map_err(RepoError::from)?;

        if attendance_repo::record_exists(&mut *txn, &record_id).await? {
            return Err(AppError::new(ErrorCode::AlreadyCheckedIn));
        }

        let stats = attendance_repo::find_stats(&mut *txn, user_id).await?;

        // Streak continues only when yesterday's record exists
        let prior_streak = if attendance_repo::record_exists(&mut *txn, &yesterday_id).await? {
            stats.as_ref().map(|s| s.consecutive_attendance).unwrap_or(0)
        } else {
            0
        };
        let consecutive_days = prior_streak + 1;
        let points_awarded = streak_bonus(consecutive_days);

        let record = AttendanceRecord {
            id: record_id,
            user_id: user_id.to_string(),
            date: today.to_string(),
            points_awarded,
            consecutive_days,
            created_at: now,
        };
        match attendance_repo::insert_record(&mut *txn, &record).await {
            // Race fallback: the deterministic id makes the duplicate
            // insert the real idempotency guard
            Err(RepoError::Duplicate(_)) => {
                return Err(AppError::new(ErrorCode::AlreadyCheckedIn));
            }
            other => other?,
        }

        let updated_stats = UserStats {
            user_id: user_id.to_string(),
            consecutive_attendance: consecutive_days,
            longest_streak: stats
                .as_ref()
                .map(|s| s.longest_streak.max(consecutive_days))
                .unwrap_or(consecutive_days),
            total_attendance: stats.as_ref().map(|s| s.total_attendance).unwrap_or(0) + 1,
            last_attendance_at: Some(now),
        };
        attendance_repo::upsert_stats(&mut *txn, &updated_stats).await?;

        txn.commit().await.map_err(RepoError::from)?;

        Ok((record, updated_stats))
    }

    pub async fn stats(&self, user_id: &str) -> AppResult<UserStats> {
        attendance_repo::find_stats(&self.pool, user_id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::StatsNotFound))
    }
}
