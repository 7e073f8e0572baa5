//! Booking API Handlers
//!
//! Diners only ever see their own bookings: a foreign booking id answers
//! exactly like a missing one. Operators act on any booking.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use shared::models::{
    Booking, BookingCreate, BookingReschedule, BookingStatus, BookingTransition,
    PaymentStatusUpdate,
};

use crate::api::{AuthenticatedUser, run_blocking};
use crate::bookings::{BookingError, BookingManager, BookingResult};
use crate::core::ServerState;
use crate::utils::{AppError, AppResult};

/// Load a booking owned by `user_id`
///
/// The owner never changes, so checking before the write is race-free.
fn owned(manager: &BookingManager, booking_id: &str, user_id: &str) -> BookingResult<Booking> {
    let booking = manager.get(booking_id)?;
    if booking.user_id != user_id {
        tracing::warn!(booking_id, user_id, "Access to foreign booking");
        return Err(BookingError::NotFound(booking_id.to_string()));
    }
    Ok(booking)
}

/// Diners may only cancel; confirming and completing are operator actions
fn check_status_target(user: &AuthenticatedUser, target: BookingStatus) -> AppResult<()> {
    if target == BookingStatus::Cancelled || user.is_operator() {
        return Ok(());
    }
    tracing::warn!(user_id = %user.user_id, %target, "Diner status change denied");
    Err(AppError::permission_denied(format!(
        "Only operators may set status {target}"
    )))
}

/// POST /api/bookings - 创建预约
pub async fn create(
    State(state): State<ServerState>,
    user: AuthenticatedUser,
    Json(payload): Json<BookingCreate>,
) -> AppResult<(StatusCode, Json<Booking>)> {
    let booking = run_blocking(state.bookings(), move |m| {
        m.create_booking_with_retry(&user.user_id, payload)
    })
    .await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

/// GET /api/bookings - 我的预约 (按日期、时间排序)
pub async fn list(
    State(state): State<ServerState>,
    user: AuthenticatedUser,
) -> AppResult<Json<Vec<Booking>>> {
    let bookings = run_blocking(state.bookings(), move |m| m.list_for_user(&user.user_id)).await?;
    Ok(Json(bookings))
}

/// GET /api/bookings/:id - 预约详情
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<Booking>> {
    let booking = run_blocking(state.bookings(), move |m| owned(m, &id, &user.user_id)).await?;
    Ok(Json(booking))
}

/// POST /api/bookings/:id/transition - 状态流转
///
/// 用户只能取消自己的预约；operator 可确认/取消/完成任意预约
pub async fn transition(
    State(state): State<ServerState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    Json(payload): Json<BookingTransition>,
) -> AppResult<Json<Booking>> {
    check_status_target(&user, payload.status)?;
    let booking = run_blocking(state.bookings(), move |m| {
        if !user.is_operator() {
            owned(m, &id, &user.user_id)?;
        }
        m.transition(&id, payload.status)
    })
    .await?;
    Ok(Json(booking))
}

/// POST /api/bookings/:id/payment-status - 支付状态 (operator)
pub async fn payment_status(
    State(state): State<ServerState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    Json(payload): Json<PaymentStatusUpdate>,
) -> AppResult<Json<Booking>> {
    user.require_operator()?;
    let booking = run_blocking(state.bookings(), move |m| {
        m.set_payment_status(&id, payload.payment_status)
    })
    .await?;
    Ok(Json(booking))
}

/// POST /api/bookings/:id/reschedule - 改期 (同一桌台)
pub async fn reschedule(
    State(state): State<ServerState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    Json(payload): Json<BookingReschedule>,
) -> AppResult<Json<Booking>> {
    let booking = run_blocking(state.bookings(), move |m| {
        owned(m, &id, &user.user_id)?;
        m.reschedule(&id, payload)
    })
    .await?;
    Ok(Json(booking))
}
