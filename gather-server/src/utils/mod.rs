//! 工具模块
//!
//! - [`AppError`] / [`ApiResponse`] - 统一错误与响应类型 (from shared::error)
//! - [`logger`] - 日志初始化

pub mod logger;

// Re-export error types from shared
pub use shared::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
