//! Unified error codes for the Gather platform
//!
//! Error codes are shared between the server and its clients and are
//! organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Booking errors
//! - 4xxx: Points errors
//! - 5xxx: Payment errors
//! - 6xxx: Coupon errors
//! - 7xxx: Attendance errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Token has expired
    TokenExpired = 1002,
    /// Token is invalid
    TokenInvalid = 1003,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Admin role required
    AdminRequired = 2002,
    /// Caller is not the booking host
    NotBookingHost = 2003,

    // ==================== 3xxx: Booking ====================
    /// Booking not found
    BookingNotFound = 3001,
    /// Booking has no remaining capacity
    BookingFull = 3002,
    /// Booking has already been cancelled
    BookingCancelled = 3003,
    /// Participation request not found
    RequestNotFound = 3004,
    /// Participation request is no longer pending
    RequestNotPending = 3005,
    /// An active participation request already exists
    RequestAlreadyActive = 3006,
    /// Caller is not a participant of the booking
    NotParticipant = 3007,
    /// The host cannot withdraw from their own booking
    HostCannotWithdraw = 3008,
    /// The host cannot request to join their own booking
    HostCannotJoin = 3009,

    // ==================== 4xxx: Points ====================
    /// Points account not found
    AccountNotFound = 4001,
    /// Insufficient points balance
    InsufficientBalance = 4002,

    // ==================== 5xxx: Payment ====================
    /// Payment not found
    PaymentNotFound = 5001,
    /// Payment has already been cancelled
    PaymentAlreadyCancelled = 5002,
    /// A payment with this order id already exists
    DuplicateOrder = 5003,
    /// Payment gateway rejected or failed the request
    GatewayRejected = 5004,

    // ==================== 6xxx: Coupon ====================
    /// Coupon not found
    CouponNotFound = 6001,
    /// Coupon has already been used
    CouponAlreadyUsed = 6002,
    /// Coupon has expired
    CouponExpired = 6003,
    /// Discount type is not one of percent|amount
    InvalidDiscountType = 6004,

    // ==================== 7xxx: Attendance ====================
    /// Already checked in today
    AlreadyCheckedIn = 7001,
    /// Attendance stats not found
    StatsNotFound = 7002,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Network error
    NetworkError = 9003,
    /// Operation timeout
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
    /// Write conflict persisted past the retry budget
    WriteConflict = 9006,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::AdminRequired => "Administrator role is required",
            ErrorCode::NotBookingHost => "Only the booking host may perform this action",

            // Booking
            ErrorCode::BookingNotFound => "Booking not found",
            ErrorCode::BookingFull => "Booking has no remaining capacity",
            ErrorCode::BookingCancelled => "Booking has already been cancelled",
            ErrorCode::RequestNotFound => "Participation request not found",
            ErrorCode::RequestNotPending => "Participation request is no longer pending",
            ErrorCode::RequestAlreadyActive => "An active participation request already exists",
            ErrorCode::NotParticipant => "Caller is not a participant of the booking",
            ErrorCode::HostCannotWithdraw => "The host cannot withdraw from their own booking",
            ErrorCode::HostCannotJoin => "The host cannot request to join their own booking",

            // Points
            ErrorCode::AccountNotFound => "Points account not found",
            ErrorCode::InsufficientBalance => "Insufficient points balance",

            // Payment
            ErrorCode::PaymentNotFound => "Payment not found",
            ErrorCode::PaymentAlreadyCancelled => "Payment has already been cancelled",
            ErrorCode::DuplicateOrder => "A payment with this order id already exists",
            ErrorCode::GatewayRejected => "Payment gateway rejected the request",

            // Coupon
            ErrorCode::CouponNotFound => "Coupon not found",
            ErrorCode::CouponAlreadyUsed => "Coupon has already been used",
            ErrorCode::CouponExpired => "Coupon has expired",
            ErrorCode::InvalidDiscountType => "Discount type must be percent or amount",

            // Attendance
            ErrorCode::AlreadyCheckedIn => "Already checked in today",
            ErrorCode::StatsNotFound => "Attendance stats not found",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::WriteConflict => "Concurrent update conflict, please retry",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::TokenExpired),
            1003 => Ok(ErrorCode::TokenInvalid),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::AdminRequired),
            2003 => Ok(ErrorCode::NotBookingHost),

            // Booking
            3001 => Ok(ErrorCode::BookingNotFound),
            3002 => Ok(ErrorCode::BookingFull),
            3003 => Ok(ErrorCode::BookingCancelled),
            3004 => Ok(ErrorCode::RequestNotFound),
            3005 => Ok(ErrorCode::RequestNotPending),
            3006 => Ok(ErrorCode::RequestAlreadyActive),
            3007 => Ok(ErrorCode::NotParticipant),
            3008 => Ok(ErrorCode::HostCannotWithdraw),
            3009 => Ok(ErrorCode::HostCannotJoin),

            // Points
            4001 => Ok(ErrorCode::AccountNotFound),
            4002 => Ok(ErrorCode::InsufficientBalance),

            // Payment
            5001 => Ok(ErrorCode::PaymentNotFound),
            5002 => Ok(ErrorCode::PaymentAlreadyCancelled),
            5003 => Ok(ErrorCode::DuplicateOrder),
            5004 => Ok(ErrorCode::GatewayRejected),

            // Coupon
            6001 => Ok(ErrorCode::CouponNotFound),
            6002 => Ok(ErrorCode::CouponAlreadyUsed),
            6003 => Ok(ErrorCode::CouponExpired),
            6004 => Ok(ErrorCode::InvalidDiscountType),

            // Attendance
            7001 => Ok(ErrorCode::AlreadyCheckedIn),
            7002 => Ok(ErrorCode::StatsNotFound),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::NetworkError),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),
            9006 => Ok(ErrorCode::WriteConflict),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        // General
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::NotFound.code(), 3);
        assert_eq!(ErrorCode::AlreadyExists.code(), 4);

        // Auth
        assert_eq!(ErrorCode::NotAuthenticated.code(), 1001);
        assert_eq!(ErrorCode::TokenExpired.code(), 1002);
        assert_eq!(ErrorCode::TokenInvalid.code(), 1003);

        // Permission
        assert_eq!(ErrorCode::PermissionDenied.code(), 2001);
        assert_eq!(ErrorCode::AdminRequired.code(), 2002);
        assert_eq!(ErrorCode::NotBookingHost.code(), 2003);

        // Booking
        assert_eq!(ErrorCode::BookingNotFound.code(), 3001);
        assert_eq!(ErrorCode::BookingFull.code(), 3002);
        assert_eq!(ErrorCode::BookingCancelled.code(), 3003);
        assert_eq!(ErrorCode::RequestNotFound.code(), 3004);
        assert_eq!(ErrorCode::RequestNotPending.code(), 3005);
        assert_eq!(ErrorCode::RequestAlreadyActive.code(), 3006);
        assert_eq!(ErrorCode::NotParticipant.code(), 3007);
        assert_eq!(ErrorCode::HostCannotWithdraw.code(), 3008);
        assert_eq!(ErrorCode::HostCannotJoin.code(), 3009);

        // Points
        assert_eq!(ErrorCode::AccountNotFound.code(), 4001);
        assert_eq!(ErrorCode::InsufficientBalance.code(), 4002);

        // Payment
        assert_eq!(ErrorCode::PaymentNotFound.code(), 5001);
        assert_eq!(ErrorCode::PaymentAlreadyCancelled.code(), 5002);
        assert_eq!(ErrorCode::DuplicateOrder.code(), 5003);
        assert_eq!(ErrorCode::GatewayRejected.code(), 5004);

        // Coupon
        assert_eq!(ErrorCode::CouponNotFound.code(), 6001);
        assert_eq!(ErrorCode::CouponAlreadyUsed.code(), 6002);
        assert_eq!(ErrorCode::CouponExpired.code(), 6003);
        assert_eq!(ErrorCode::InvalidDiscountType.code(), 6004);

        // Attendance
        assert_eq!(ErrorCode::AlreadyCheckedIn.code(), 7001);

        // System
        assert_eq!(ErrorCode::InternalError.code(), 9001);
        assert_eq!(ErrorCode::DatabaseError.code(), 9002);
        assert_eq!(ErrorCode::WriteConflict.code(), 9006);
    }

    #[test]
    fn test_is_success() {
        assert!(ErrorCode::Success.is_success());
        assert!(!ErrorCode::Unknown.is_success());
        assert!(!ErrorCode::BookingFull.is_success());
    }

    #[test]
    fn test_try_from_valid() {
        assert_eq!(ErrorCode::try_from(0), Ok(ErrorCode::Success));
        assert_eq!(ErrorCode::try_from(1001), Ok(ErrorCode::NotAuthenticated));
        assert_eq!(ErrorCode::try_from(3002), Ok(ErrorCode::BookingFull));
        assert_eq!(ErrorCode::try_from(6002), Ok(ErrorCode::CouponAlreadyUsed));
        assert_eq!(ErrorCode::try_from(7001), Ok(ErrorCode::AlreadyCheckedIn));
        assert_eq!(ErrorCode::try_from(9001), Ok(ErrorCode::InternalError));
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(999), Err(InvalidErrorCode(999)));
        assert_eq!(ErrorCode::try_from(8001), Err(InvalidErrorCode(8001)));
        assert_eq!(ErrorCode::try_from(10000), Err(InvalidErrorCode(10000)));
    }

    #[test]
    fn test_serialize_as_number() {
        let json = serde_json::to_string(&ErrorCode::NotFound).unwrap();
        assert_eq!(json, "3");

        let json = serde_json::to_string(&ErrorCode::BookingFull).unwrap();
        assert_eq!(json, "3002");
    }

    #[test]
    fn test_deserialize_from_number() {
        let code: ErrorCode = serde_json::from_str("4002").unwrap();
        assert_eq!(code, ErrorCode::InsufficientBalance);

        let result: Result<ErrorCode, _> = serde_json::from_str("1234");
        assert!(result.is_err());
    }

    #[test]
    fn test_roundtrip() {
        let codes = [
            ErrorCode::Success,
            ErrorCode::NotAuthenticated,
            ErrorCode::BookingFull,
            ErrorCode::CouponExpired,
            ErrorCode::InternalError,
        ];

        for code in codes {
            let json = serde_json::to_string(&code).unwrap();
            let parsed: ErrorCode = serde_json::from_str(&json).unwrap();
            assert_eq!(code, parsed);
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", ErrorCode::Success), "0");
        assert_eq!(format!("{}", ErrorCode::BookingFull), "3002");
    }

    #[test]
    fn test_message() {
        assert_eq!(
            ErrorCode::BookingFull.message(),
            "Booking has no remaining capacity"
        );
        assert_eq!(
            ErrorCode::InsufficientBalance.message(),
            "Insufficient points balance"
        );
    }
}
