//! Dining Table Model

use serde::{Deserialize, Serialize};

/// Dining table entity (桌台)
///
/// Catalog data; the booking engine only reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct DiningTable {
    pub id: i64,
    /// Display number, unique per restaurant
    pub table_number: i32,
    /// Maximum guests, always positive
    pub capacity: i32,
    pub is_active: bool,
}

impl DiningTable {
    /// Whether a party of `guest_count` fits at this table
    pub fn seats(&self, guest_count: i32) -> bool {
        guest_count <= self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seats_boundary() {
        let table = DiningTable {
            id: 1,
            table_number: 5,
            capacity: 4,
            is_active: true,
        };
        assert!(table.seats(4));
        assert!(!table.seats(5));
    }
}
