//! Data models
//!
//! Shared between booking-server and the UI shell (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! Catalog IDs are `i64` (SQLite INTEGER PRIMARY KEY), booking IDs are UUIDs.

pub mod booking;
pub mod dining_table;
pub mod menu_item;

// Re-exports
pub use booking::*;
pub use dining_table::*;
pub use menu_item::*;
