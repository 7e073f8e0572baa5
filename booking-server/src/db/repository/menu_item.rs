//! Menu Item Repository
//!
//! Prices live in the database as integer cents and leave this module as
//! 2-dp `Decimal`.

use super::{RepoError, RepoResult};
use shared::models::{MenuCategory, MenuItem, cents_to_decimal};
use sqlx::SqlitePool;

#[derive(Debug, sqlx::FromRow)]
struct MenuItemRow {
    id: i64,
    name: String,
    description: Option<String>,
    category: String,
    price_cents: i64,
    is_available: bool,
}

impl TryFrom<MenuItemRow> for MenuItem {
    type Error = RepoError;

    fn try_from(row: MenuItemRow) -> Result<Self, Self::Error> {
        let category: MenuCategory = row
            .category
            .parse()
            .map_err(|e| RepoError::Validation(format!("menu_item {}: {e}", row.id)))?;
        if row.price_cents < 0 {
            return Err(RepoError::Validation(format!(
                "menu_item {}: negative price",
                row.id
            )));
        }
        Ok(MenuItem {
            id: row.id,
            name: row.name,
            description: row.description,
            category,
            price: cents_to_decimal(row.price_cents),
            is_available: row.is_available,
        })
    }
}

const COLUMNS: &str = "id, name, description, category, price_cents, is_available";

/// All menu items, available or not, ordered by id
pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<MenuItem>> {
    let rows = sqlx::query_as::<_, MenuItemRow>(&format!(
        "SELECT {COLUMNS} FROM menu_item ORDER BY id"
    ))
    .fetch_all(pool)
    .await?;
    rows.into_iter().map(MenuItem::try_from).collect()
}
