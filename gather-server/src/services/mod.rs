//! Domain services
//!
//! Each service owns its slice of the data model and receives its
//! collaborators (pool, notifier, gateway) at construction. Transaction
//! boundaries are a per-operation design decision: anything that
//! read-then-writes a shared counter or flag goes through
//! [`crate::db::with_txn_retry`].

pub mod attendance_service;
pub mod booking_service;
pub mod coupon_service;
pub mod gateway;
pub mod notifier;
pub mod payment_service;
pub mod points_service;
pub mod refund;

pub use attendance_service::AttendanceService;
pub use booking_service::BookingService;
pub use coupon_service::CouponService;
pub use gateway::{HttpPaymentGateway, PaymentGateway};
pub use notifier::NotificationService;
pub use payment_service::PaymentService;
pub use points_service::PointsService;
