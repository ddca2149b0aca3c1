//! Unified error handling for the Gather platform
//!
//! - [`ErrorCode`] - stable numeric error codes shared with clients
//! - [`ErrorCategory`] - code range classification
//! - [`AppError`] - application error carrying code + message + details
//! - [`ApiResponse`] - unified API response envelope

pub mod category;
pub mod codes;
pub mod http;
pub mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult};
