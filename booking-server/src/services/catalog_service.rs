//! Catalog Service - dining tables and menu items with in-memory caching
//!
//! The catalog is read-shared reference data. It is loaded from SQLite at
//! startup (`load`) and can be reloaded (`refresh`); the booking engine only
//! ever reads it through [`CatalogStore`].

use crate::db::repository::{RepoResult, dining_table, menu_item};
use parking_lot::RwLock;
use shared::models::{DiningTable, MenuItem};
use sqlx::SqlitePool;
use std::collections::HashMap;

/// Read-only catalog access used by the booking engine
pub trait CatalogStore: Send + Sync {
    /// Table by id, active or not
    fn get_table(&self, id: i64) -> Option<DiningTable>;

    /// Menu item by id, available or not
    fn get_menu_item(&self, id: i64) -> Option<MenuItem>;

    /// Active tables ordered by display number
    fn list_tables(&self) -> Vec<DiningTable>;

    /// All menu items ordered by category, then name
    fn list_menu_items(&self) -> Vec<MenuItem>;
}

/// Catalog service backed by SQLite, cached in memory
pub struct CatalogService {
    /// Tables cache: id -> DiningTable
    tables: RwLock<HashMap<i64, DiningTable>>,
    /// Menu cache: id -> MenuItem
    menu_items: RwLock<HashMap<i64, MenuItem>>,
}

impl std::fmt::Debug for CatalogService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogService")
            .field("tables_count", &self.table_count())
            .field("menu_items_count", &self.menu_item_count())
            .finish()
    }
}

impl CatalogService {
    /// Build a catalog from already-loaded parts (tests, fixtures)
    pub fn from_parts(tables: Vec<DiningTable>, menu_items: Vec<MenuItem>) -> Self {
        Self {
            tables: RwLock::new(tables.into_iter().map(|t| (t.id, t)).collect()),
            menu_items: RwLock::new(menu_items.into_iter().map(|m| (m.id, m)).collect()),
        }
    }

    /// Load the whole catalog from SQLite
    pub async fn load(pool: &SqlitePool) -> RepoResult<Self> {
        let service = Self::from_parts(Vec::new(), Vec::new());
        service.refresh(pool).await?;
        Ok(service)
    }

    /// Reload both caches from SQLite
    ///
    /// Both queries finish before either cache is swapped, so a failed
    /// refresh leaves the previous snapshot in place.
    pub async fn refresh(&self, pool: &SqlitePool) -> RepoResult<()> {
        let tables = dining_table::find_all(pool).await?;
        let items = menu_item::find_all(pool).await?;
        self.replace(tables, items);

        tracing::info!(
            tables = self.table_count(),
            menu_items = self.menu_item_count(),
            "CatalogService: cache refreshed"
        );
        Ok(())
    }

    /// Swap both caches for a new snapshot
    pub fn replace(&self, tables: Vec<DiningTable>, menu_items: Vec<MenuItem>) {
        *self.tables.write() = tables.into_iter().map(|t| (t.id, t)).collect();
        *self.menu_items.write() = menu_items.into_iter().map(|m| (m.id, m)).collect();
    }

    pub fn table_count(&self) -> usize {
        self.tables.read().len()
    }

    pub fn menu_item_count(&self) -> usize {
        self.menu_items.read().len()
    }
}

impl CatalogStore for CatalogService {
    fn get_table(&self, id: i64) -> Option<DiningTable> {
        self.tables.read().get(&id).cloned()
    }

    fn get_menu_item(&self, id: i64) -> Option<MenuItem> {
        self.menu_items.read().get(&id).cloned()
    }

    fn list_tables(&self) -> Vec<DiningTable> {
        let cache = self.tables.read();
        let mut tables: Vec<_> = cache.values().filter(|t| t.is_active).cloned().collect();
        tables.sort_by_key(|t| t.table_number);
        tables
    }

    fn list_menu_items(&self) -> Vec<MenuItem> {
        let cache = self.menu_items.read();
        let mut items: Vec<_> = cache.values().cloned().collect();
        items.sort_by(|a, b| {
            a.category
                .cmp(&b.category)
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.id.cmp(&b.id))
        });
        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{MenuCategory, cents_to_decimal};

    fn table(id: i64, number: i32, active: bool) -> DiningTable {
        DiningTable {
            id,
            table_number: number,
            capacity: 4,
            is_active: active,
        }
    }

    fn item(id: i64, name: &str, category: MenuCategory) -> MenuItem {
        MenuItem {
            id,
            name: name.to_string(),
            description: None,
            category,
            price: cents_to_decimal(500),
            is_available: true,
        }
    }

    #[test]
    fn test_list_tables_sorted_and_active_only() {
        let catalog = CatalogService::from_parts(
            vec![table(1, 7, true), table(2, 3, true), table(3, 1, false)],
            vec![],
        );
        let numbers: Vec<i32> = catalog.list_tables().iter().map(|t| t.table_number).collect();
        assert_eq!(numbers, vec![3, 7]);
        // Inactive tables are still resolvable by id
        assert!(catalog.get_table(3).is_some());
    }

    #[test]
    fn test_list_menu_sorted_by_category_then_name() {
        let catalog = CatalogService::from_parts(
            vec![],
            vec![
                item(1, "Lassi", MenuCategory::Drinks),
                item(2, "Samosa", MenuCategory::Appetizers),
                item(3, "Biryani", MenuCategory::MainCourse),
                item(4, "Bhaji", MenuCategory::Appetizers),
            ],
        );
        let names: Vec<String> = catalog
            .list_menu_items()
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(names, vec!["Bhaji", "Samosa", "Biryani", "Lassi"]);
    }
}
