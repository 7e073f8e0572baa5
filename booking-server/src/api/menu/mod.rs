//! Menu API 模块 (只读)

use axum::{Json, Router, extract::State, routing::get};
use shared::models::MenuItem;

use crate::core::ServerState;
use crate::services::CatalogStore;
use crate::utils::AppResult;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/menu", get(list))
}

/// GET /api/menu - 菜单 (按分类、名称排序)
async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<MenuItem>>> {
    Ok(Json(state.catalog.list_menu_items()))
}
