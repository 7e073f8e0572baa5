//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`tables`] - 桌台列表、可用性查询、桌台预约
//! - [`menu`] - 菜单列表
//! - [`bookings`] - 订座 (创建、查询、状态流转、改期)

pub mod extractor;

pub mod health;

// Catalog API (read-only)
pub mod menu;
pub mod tables;

// Booking API
pub mod bookings;

use std::sync::Arc;

use crate::bookings::{BookingManager, BookingResult};
use crate::utils::{AppError, AppResult};

// Re-export common types for handlers
pub use extractor::AuthenticatedUser;

/// Run a blocking engine call off the async runtime
///
/// redb transactions block; handlers never call the manager directly.
pub(crate) async fn run_blocking<T, F>(manager: Arc<BookingManager>, f: F) -> AppResult<T>
where
    T: Send + 'static,
    F: FnOnce(&BookingManager) -> BookingResult<T> + Send + 'static,
{
    tokio::task::spawn_blocking(move || f(&manager))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Blocking booking task failed");
            AppError::internal("Booking task failed")
        })?
        .map_err(AppError::from)
}
