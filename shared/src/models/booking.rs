//! Booking & Participation Request Models

use serde::{Deserialize, Serialize};

/// Booking lifecycle status
///
/// `open ⇄ full → cancelled` — cancelled is terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum BookingStatus {
    Open,
    Full,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            BookingStatus::Open => "open",
            BookingStatus::Full => "full",
            BookingStatus::Cancelled => "cancelled",
        }
    }
}

/// Booking entity
///
/// Invariants maintained by the booking service:
/// `current_capacity == |members| <= max_capacity`, and
/// `status == full ⇔ current_capacity == max_capacity` while not cancelled.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Booking {
    pub id: i64,
    pub host_id: String,
    pub title: String,
    pub max_capacity: i64,
    pub current_capacity: i64,
    pub status: BookingStatus,
    pub cancel_reason: Option<String>,
    /// Scheduled event time (epoch millis), used by the refund policy
    pub event_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Participation request lifecycle status
///
/// `pending → approved | rejected`; `approved → withdrawn`;
/// any non-terminal state moves to `cancelled` when the host cancels.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
    Withdrawn,
    Cancelled,
}

impl RequestStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
            RequestStatus::Withdrawn => "withdrawn",
            RequestStatus::Cancelled => "cancelled",
        }
    }

    /// Terminal states never transition again
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            RequestStatus::Rejected | RequestStatus::Withdrawn | RequestStatus::Cancelled
        )
    }
}

/// Participation request entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ParticipationRequest {
    pub id: i64,
    pub booking_id: i64,
    pub user_id: String,
    pub status: RequestStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_names() {
        assert_eq!(BookingStatus::Open.as_str(), "open");
        assert_eq!(BookingStatus::Full.as_str(), "full");
        assert_eq!(BookingStatus::Cancelled.as_str(), "cancelled");
        assert_eq!(
            serde_json::to_string(&BookingStatus::Cancelled).unwrap(),
            "\"cancelled\""
        );

        assert_eq!(RequestStatus::Pending.as_str(), "pending");
        assert_eq!(
            serde_json::from_str::<RequestStatus>("\"withdrawn\"").unwrap(),
            RequestStatus::Withdrawn
        );
    }

    #[test]
    fn test_terminal_request_states() {
        assert!(!RequestStatus::Pending.is_terminal());
        assert!(!RequestStatus::Approved.is_terminal());
        assert!(RequestStatus::Rejected.is_terminal());
        assert!(RequestStatus::Withdrawn.is_terminal());
        assert!(RequestStatus::Cancelled.is_terminal());
    }
}
