//! Domain models shared between the server and clients

mod attendance;
mod booking;
mod coupon;
mod payment;
mod points;

pub use attendance::{AttendanceRecord, CheckInResult, UserStats};
pub use booking::{
    Booking, BookingStatus, ParticipationRequest, RequestStatus,
};
pub use coupon::{Coupon, DiscountType, RedeemedCoupon};
pub use payment::{Payment, PaymentStatus};
pub use points::{AdjustDirection, AdjustResult, LedgerEntry, LedgerKind, PointsAccount};
