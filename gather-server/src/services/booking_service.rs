//! Booking Capacity Service
//!
//! Join/approve/reject/withdraw/cancel state machine over capacity-limited
//! bookings. Approve and withdraw read-then-write the capacity counter and
//! therefore run inside a retried transaction; reject and cancel are
//! single-row conditioned writes. Request fan-out and notifications happen
//! after the primary transition and never roll it back.

use crate::db::repository::{RepoError, booking as booking_repo};
use crate::db::with_txn_retry;
use crate::services::notifier::NotificationService;
use shared::models::{Booking, BookingStatus, ParticipationRequest, RequestStatus};
use shared::util;
use shared::{AppError, AppResult, ErrorCode};
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct BookingService {
    pool: SqlitePool,
    notifier: NotificationService,
}

/// Booking detail with its member set
#[derive(Debug, Clone, serde::Serialize)]
pub struct BookingDetail {
    #[serde(flatten)]
    pub booking: Booking,
    pub member_ids: Vec<String>,
}

impl BookingService {
    pub fn new(pool: SqlitePool, notifier: NotificationService) -> Self {
        Self { pool, notifier }
    }

    pub async fn detail(&self, booking_id: i64) -> AppResult<BookingDetail> {
        let booking = booking_repo::find_by_id(&self.pool, booking_id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::BookingNotFound))?;
        let member_ids = booking_repo::list_members(&self.pool, booking_id).await?;
        Ok(BookingDetail {
            booking,
            member_ids,
        })
    }

    /// Create a PENDING participation request for the caller.
    pub async fn request_join(
        &self,
        booking_id: i64,
        caller: &str,
    ) -> AppResult<ParticipationRequest> {
        let booking = booking_repo::find_by_id(&self.pool, booking_id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::BookingNotFound))?;
        if booking.status == BookingStatus::Cancelled {
            return Err(AppError::new(ErrorCode::BookingCancelled));
        }
        if booking.host_id == caller {
            return Err(AppError::new(ErrorCode::HostCannotJoin));
        }

        // The partial unique index enforces one active request per
        // (booking, user); a duplicate insert surfaces here
        let request = match booking_repo::insert_request(&self.pool, booking_id, caller).await {
            Err(RepoError::Duplicate(_)) => {
                return Err(AppError::new(ErrorCode::RequestAlreadyActive));
            }
            other => other?,
        };

        self.notifier
            .notify(
                &booking.host_id,
                "join_requested",
                "New join request",
                &format!("Someone asked to join \"{}\"", booking.title),
                serde_json::json!({ "bookingId": booking_id, "requestId": request.id }),
            )
            .await;

        Ok(request)
    }

    /// Approve a pending request, consuming one capacity slot.
    ///
    /// Runs inside the retried transaction: two concurrent approvals
    /// against the last open slot both re-read the counter, and exactly
    /// one passes the capacity check.
    pub async fn approve(
        &self,
        booking_id: i64,
        request_id: i64,
        caller: &str,
    ) -> AppResult<Booking> {
        let pool = &self.pool;
        let (booking, request) = with_txn_retry("booking_approve", || {
            Self::approve_txn(pool, booking_id, request_id, caller)
        })
        .await?;

        self.notifier
            .notify(
                &request.user_id,
                "request_approved",
                "Join request approved",
                &format!("You're in! \"{}\" confirmed your spot", booking.title),
                serde_json::json!({ "bookingId": booking_id }),
            )
            .await;

        Ok(booking)
    }

    async fn approve_txn(
        pool: &SqlitePool,
        booking_id: i64,
        request_id: i64,
        caller: &str,
    ) -> AppResult<(Booking, ParticipationRequest)> {
        let now = util::now_millis();
        let mut txn = pool.begin().await.map_err(RepoError::from)?;

        let booking = booking_repo::find_by_id(&mut *txn, booking_id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::BookingNotFound))?;
        if booking.host_id != caller {
            return Err(AppError::new(ErrorCode::NotBookingHost));
        }
        if booking.status == BookingStatus::Cancelled {
            return Err(AppError::new(ErrorCode::BookingCancelled));
        }

        let request = booking_repo::find_request(&mut *txn, request_id)
            .await?
            .filter(|r| r.booking_id == booking_id)
            .ok_or_else(|| AppError::new(ErrorCode::RequestNotFound))?;
        if request.status != RequestStatus::Pending {
            return Err(AppError::new(ErrorCode::RequestNotPending));
        }

        if booking.current_capacity >= booking.max_capacity {
            return Err(AppError::new(ErrorCode::BookingFull));
        }

        booking_repo::update_request_status(&mut *txn, request_id, RequestStatus::Approved, now)
            .await?;
        booking_repo::insert_member(&mut *txn, booking_id, &request.user_id, now).await?;

        let new_capacity = booking.current_capacity + 1;
        let new_status = if new_capacity == booking.max_capacity {
            BookingStatus::Full
        } else {
            booking.status
        };
        booking_repo::update_capacity(&mut *txn, booking_id, new_capacity, new_status, now).await?;

        txn.commit().await.map_err(RepoError::from)?;

        let mut updated = booking;
        updated.current_capacity = new_capacity;
        updated.status = new_status;
        updated.updated_at = now;
        let mut request = request;
        request.status = RequestStatus::Approved;
        request.updated_at = now;
        Ok((updated, request))
    }

    /// Reject a pending request. Never touches the capacity counter, so a
    /// conditioned single-row write is enough.
    pub async fn reject(
        &self,
        booking_id: i64,
        request_id: i64,
        caller: &str,
    ) -> AppResult<()> {
        let booking = booking_repo::find_by_id(&self.pool, booking_id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::BookingNotFound))?;
        if booking.host_id != caller {
            return Err(AppError::new(ErrorCode::NotBookingHost));
        }

        let request = booking_repo::find_request(&self.pool, request_id)
            .await?
            .filter(|r| r.booking_id == booking_id)
            .ok_or_else(|| AppError::new(ErrorCode::RequestNotFound))?;

        let rows = booking_repo::update_request_if_pending(
            &self.pool,
            request_id,
            RequestStatus::Rejected,
            util::now_millis(),
        )
        .await?;
        if rows == 0 {
            return Err(AppError::new(ErrorCode::RequestNotPending));
        }

        self.notifier
            .notify(
                &request.user_id,
                "request_rejected",
                "Join request declined",
                &format!("\"{}\" declined your join request", booking.title),
                serde_json::json!({ "bookingId": booking_id }),
            )
            .await;

        Ok(())
    }

    /// Withdraw the caller from a booking they participate in, freeing one
    /// capacity slot. Hosts must cancel instead.
    pub async fn withdraw(&self, booking_id: i64, caller: &str) -> AppResult<Booking> {
        let pool = &self.pool;
        let booking = with_txn_retry("booking_withdraw", || {
            Self::withdraw_txn(pool, booking_id, caller)
        })
        .await?;

        // The request transition is a best-effort follow-up: it is not
        // part of the capacity invariant
        let now = util::now_millis();
        if let Err(err) =
            booking_repo::mark_request_withdrawn(&self.pool, booking_id, caller, now).await
        {
            tracing::warn!(booking_id, user_id = caller, error = %err, "failed to mark request withdrawn");
        }

        self.notifier
            .notify(
                &booking.host_id,
                "participant_withdrew",
                "Participant withdrew",
                &format!("A participant left \"{}\"", booking.title),
                serde_json::json!({ "bookingId": booking_id }),
            )
            .await;

        Ok(booking)
    }

    async fn withdraw_txn(
        pool: &SqlitePool,
        booking_id: i64,
        caller: &str,
    ) -> AppResult<Booking> {
        let now = util::now_millis();
        let mut txn = pool.begin().await.map_err(RepoError::from)?;

        let booking = booking_repo::find_by_id(&mut *txn, booking_id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::BookingNotFound))?;
        if booking.host_id == caller {
            return Err(AppError::new(ErrorCode::HostCannotWithdraw));
        }
        if booking.status == BookingStatus::Cancelled {
            return Err(AppError::new(ErrorCode::BookingCancelled));
        }

        let removed = booking_repo::remove_member(&mut *txn, booking_id, caller).await?;
        if removed == 0 {
            return Err(AppError::new(ErrorCode::NotParticipant));
        }

        let new_capacity = booking.current_capacity - 1;
        let new_status = if booking.status == BookingStatus::Full {
            BookingStatus::Open
        } else {
            booking.status
        };
        booking_repo::update_capacity(&mut *txn, booking_id, new_capacity, new_status, now).await?;

        txn.commit().await.map_err(RepoError::from)?;

        let mut updated = booking;
        updated.current_capacity = new_capacity;
        updated.status = new_status;
        updated.updated_at = now;
        Ok(updated)
    }

    /// Cancel a booking. CANCELLED is terminal, so the idempotency guard
    /// is a conditioned write; the request fan-out and member
    /// notifications follow as best-effort steps.
    pub async fn cancel(
        &self,
        booking_id: i64,
        caller: &str,
        reason: &str,
    ) -> AppResult<()> {
        let booking = booking_repo::find_by_id(&self.pool, booking_id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::BookingNotFound))?;
        if booking.host_id != caller {
            return Err(AppError::new(ErrorCode::NotBookingHost));
        }

        let now = util::now_millis();
        let rows =
            booking_repo::cancel_if_not_cancelled(&self.pool, booking_id, reason, now).await?;
        if rows == 0 {
            return Err(AppError::new(ErrorCode::BookingCancelled));
        }

        match booking_repo::cancel_active_requests(&self.pool, booking_id, now).await {
            Ok(count) => {
                tracing::debug!(booking_id, count, "cancelled participation requests");
            }
            Err(err) => {
                tracing::warn!(booking_id, error = %err, "failed to cancel participation requests");
            }
        }

        let members = booking_repo::list_members(&self.pool, booking_id)
            .await
            .unwrap_or_default();
        for member_id in members {
            self.notifier
                .notify(
                    &member_id,
                    "booking_cancelled",
                    "Booking cancelled",
                    &format!("\"{}\" was cancelled: {}", booking.title, reason),
                    serde_json::json!({ "bookingId": booking_id }),
                )
                .await;
        }

        Ok(())
    }
}
