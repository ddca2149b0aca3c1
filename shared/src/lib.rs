//! Shared types for the Gather platform
//!
//! Common types used by the server and tooling: domain models, the
//! unified error code system and API response envelope, and small
//! ID/time utilities.

pub mod error;
pub mod models;
pub mod util;

// Re-export error types at the crate root for convenient `shared::AppError` use
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
