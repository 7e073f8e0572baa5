//! Dining Table Repository

use super::RepoResult;
use shared::models::DiningTable;
use sqlx::SqlitePool;

const COLUMNS: &str = "id, table_number, capacity, is_active";

/// All tables, active or not, ordered by display number
pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<DiningTable>> {
    let tables = sqlx::query_as::<_, DiningTable>(&format!(
        "SELECT {COLUMNS} FROM dining_table ORDER BY table_number"
    ))
    .fetch_all(pool)
    .await?;
    Ok(tables)
}
