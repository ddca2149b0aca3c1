//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`bookings`] - 预约参与接口 (申请/批准/拒绝/退出/取消)
//! - [`points`] - 积分余额与账本接口
//! - [`coupons`] - 优惠券发放与核销接口
//! - [`attendance`] - 出席打卡接口
//! - [`payments`] - 支付确认/取消接口
//! - [`notifications`] - 管理员群发通知接口

pub mod attendance;
pub mod bookings;
pub mod coupons;
pub mod health;
pub mod notifications;
pub mod payments;
pub mod points;

// Re-export common types for handlers
pub use crate::utils::AppResult;
