//! Booking API 模块
//!
//! | 路径 | 方法 | 说明 | 权限 |
//! |------|------|------|------|
//! | /api/bookings | POST | 创建预约 | 用户 |
//! | /api/bookings | GET | 我的预约 | 用户 |
//! | /api/bookings/{id} | GET | 预约详情 | 本人 |
//! | /api/bookings/{id}/transition | POST | 取消 / 状态流转 | 本人 (仅取消) / operator |
//! | /api/bookings/{id}/payment-status | POST | 支付状态 | operator |
//! | /api/bookings/{id}/reschedule | POST | 改期 | 本人 |

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/bookings", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/transition", post(handler::transition))
        .route("/{id}/payment-status", post(handler::payment_status))
        .route("/{id}/reschedule", post(handler::reschedule))
}
