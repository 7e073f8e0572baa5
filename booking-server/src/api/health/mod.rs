//! 健康检查路由
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /health | GET | 健康检查 + 计数 | 无 |
//!
//! # 响应示例
//!
//! ```json
//! {
//!   "status": "ok",
//!   "version": "0.1.0",
//!   "tables": 12,
//!   "menu_items": 40,
//!   "bookings": 318
//! }
//! ```

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::core::ServerState;
use crate::services::CatalogStore;
use crate::utils::AppResult;

/// 健康检查路由 - 公共路由 (无需认证)
pub fn router() -> Router<ServerState> {
    Router::new().route("/health", get(health))
}

/// 健康检查响应
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// 状态 (ok | error)
    status: &'static str,
    /// 版本号
    version: &'static str,
    /// 可预约桌台数
    tables: usize,
    /// 菜单项数
    menu_items: usize,
    /// 已存储的预约数
    bookings: u64,
}

/// GET /health
async fn health(State(state): State<ServerState>) -> AppResult<Json<HealthResponse>> {
    let bookings = super::run_blocking(state.bookings(), |m| Ok(m.storage().len()?)).await?;

    Ok(Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        tables: state.catalog.list_tables().len(),
        menu_items: state.catalog.menu_item_count(),
        bookings,
    }))
}
