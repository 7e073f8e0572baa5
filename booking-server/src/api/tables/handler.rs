//! Dining Table API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use shared::models::{Booking, DiningTable};

use crate::api::{AuthenticatedUser, run_blocking};
use crate::core::ServerState;
use crate::services::CatalogStore;
use crate::utils::AppResult;
use crate::utils::time::{parse_date, parse_time};

/// GET /api/tables - 获取所有可预约桌台 (按桌号排序)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<DiningTable>>> {
    Ok(Json(state.catalog.list_tables()))
}

/// Query params for the availability check
#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub date: String,
    pub time: String,
    pub duration_minutes: Option<u32>,
    /// Booking to ignore (checking a reschedule)
    pub exclude: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    pub table_id: i64,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub duration_minutes: u32,
    pub available: bool,
}

/// GET /api/tables/:id/availability - 查询时段是否空闲
pub async fn availability(
    State(state): State<ServerState>,
    Path(table_id): Path<i64>,
    Query(query): Query<AvailabilityQuery>,
) -> AppResult<Json<AvailabilityResponse>> {
    let date = parse_date(&query.date)?;
    let time = parse_time(&query.time)?;
    let duration_minutes = query
        .duration_minutes
        .unwrap_or(state.bookings.policy().default_seating_minutes);

    let available = run_blocking(state.bookings(), move |m| {
        m.is_available(
            table_id,
            date,
            time,
            Some(duration_minutes),
            query.exclude.as_deref(),
        )
    })
    .await?;

    Ok(Json(AvailabilityResponse {
        table_id,
        date,
        time,
        duration_minutes,
        available,
    }))
}

/// Query params for the table booking list (inclusive dates)
#[derive(Debug, Deserialize)]
pub struct TableBookingsQuery {
    pub from: String,
    pub to: String,
}

/// GET /api/tables/:id/bookings - 桌台预约列表 (operator)
pub async fn bookings(
    State(state): State<ServerState>,
    user: AuthenticatedUser,
    Path(table_id): Path<i64>,
    Query(query): Query<TableBookingsQuery>,
) -> AppResult<Json<Vec<Booking>>> {
    user.require_operator()?;
    let from = parse_date(&query.from)?;
    let to = parse_date(&query.to)?;

    let bookings =
        run_blocking(state.bookings(), move |m| m.list_for_table(table_id, from, to)).await?;
    Ok(Json(bookings))
}
