//! Pricing calculator
//!
//! Resolves selections against the current catalog, freezes unit prices and
//! sums line totals in fixed-point. Pure: no I/O, no side effects.

use rust_decimal::Decimal;
use shared::models::{BookingItem, ItemSelection};
use std::collections::HashMap;

use super::error::{BookingError, BookingResult};
use crate::services::CatalogStore;

/// Maximum quantity per line
pub const MAX_QUANTITY: i32 = 9999;

/// Maximum distinct lines per booking
pub const MAX_LINES: usize = 100;

/// A selection resolved against the catalog, price frozen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrozenLine {
    pub menu_item_id: i64,
    pub name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
}

impl FrozenLine {
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }

    /// Attach to a booking
    pub fn into_item(self, booking_id: &str) -> BookingItem {
        BookingItem {
            booking_id: booking_id.to_string(),
            menu_item_id: self.menu_item_id,
            name: self.name,
            quantity: self.quantity,
            unit_price: self.unit_price,
        }
    }
}

/// Result of [`compute_total`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedOrder {
    pub total: Decimal,
    pub lines: Vec<FrozenLine>,
}

/// Merge repeated menu items, keeping first-seen order
///
/// Every raw quantity must be positive; merged quantities are bounded by
/// [`MAX_QUANTITY`].
fn merge_selections(selections: &[ItemSelection]) -> BookingResult<Vec<(i64, i32)>> {
    let mut merged: Vec<(i64, i64)> = Vec::with_capacity(selections.len());
    let mut positions: HashMap<i64, usize> = HashMap::new();

    for sel in selections {
        if sel.quantity <= 0 {
            return Err(BookingError::InvalidQuantity {
                menu_item_id: sel.menu_item_id,
                quantity: i64::from(sel.quantity),
            });
        }
        match positions.get(&sel.menu_item_id) {
            Some(&idx) => merged[idx].1 += i64::from(sel.quantity),
            None => {
                positions.insert(sel.menu_item_id, merged.len());
                merged.push((sel.menu_item_id, i64::from(sel.quantity)));
            }
        }
    }

    if merged.len() > MAX_LINES {
        return Err(BookingError::InvalidRequest(format!(
            "too many order lines ({}, max {MAX_LINES})",
            merged.len()
        )));
    }

    merged
        .into_iter()
        .map(|(id, qty)| {
            i32::try_from(qty)
                .ok()
                .filter(|q| *q <= MAX_QUANTITY)
                .map(|q| (id, q))
                .ok_or(BookingError::InvalidQuantity {
                    menu_item_id: id,
                    quantity: qty,
                })
        })
        .collect()
}

/// Price a selection list against the catalog
///
/// Unavailable menu items resolve as `UnknownMenuItem`. An empty selection
/// list is a table-only booking with total zero.
pub fn compute_total(
    catalog: &dyn CatalogStore,
    selections: &[ItemSelection],
) -> BookingResult<PricedOrder> {
    let merged = merge_selections(selections)?;

    let mut lines = Vec::with_capacity(merged.len());
    for (menu_item_id, quantity) in merged {
        let item = catalog
            .get_menu_item(menu_item_id)
            .filter(|m| m.is_available)
            .ok_or(BookingError::UnknownMenuItem(menu_item_id))?;
        lines.push(FrozenLine {
            menu_item_id,
            name: item.name,
            quantity,
            unit_price: item.price,
        });
    }

    let total = lines.iter().map(FrozenLine::line_total).sum();
    Ok(PricedOrder { total, lines })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::CatalogService;
    use shared::models::{MenuCategory, MenuItem, cents_to_decimal};

    fn menu_item(id: i64, cents: i64, available: bool) -> MenuItem {
        MenuItem {
            id,
            name: format!("Item {id}"),
            description: None,
            category: MenuCategory::MainCourse,
            price: cents_to_decimal(cents),
            is_available: available,
        }
    }

    fn catalog() -> CatalogService {
        CatalogService::from_parts(
            vec![],
            vec![
                menu_item(1, 1000, true),
                menu_item(2, 333, true),
                menu_item(3, 10, true),
                menu_item(9, 500, false),
            ],
        )
    }

    fn sel(id: i64, quantity: i32) -> ItemSelection {
        ItemSelection {
            menu_item_id: id,
            quantity,
        }
    }

    #[test]
    fn test_total_is_exact_sum() {
        let priced = compute_total(&catalog(), &[sel(1, 2), sel(2, 3)]).unwrap();
        // 2 × 10.00 + 3 × 3.33
        assert_eq!(priced.total, Decimal::new(2999, 2));
        assert_eq!(priced.lines.len(), 2);
        assert_eq!(priced.lines[1].unit_price, Decimal::new(333, 2));
    }

    #[test]
    fn test_no_float_drift() {
        // 0.10 × 3 must be exactly 0.30
        let priced = compute_total(&catalog(), &[sel(3, 3)]).unwrap();
        assert_eq!(priced.total, Decimal::new(30, 2));
    }

    #[test]
    fn test_duplicates_merged_in_first_seen_order() {
        let priced = compute_total(&catalog(), &[sel(2, 1), sel(1, 1), sel(2, 4)]).unwrap();
        let lines: Vec<(i64, i32)> = priced
            .lines
            .iter()
            .map(|l| (l.menu_item_id, l.quantity))
            .collect();
        assert_eq!(lines, vec![(2, 5), (1, 1)]);
    }

    #[test]
    fn test_zero_and_negative_quantity_rejected() {
        assert!(matches!(
            compute_total(&catalog(), &[sel(1, 0)]),
            Err(BookingError::InvalidQuantity { menu_item_id: 1, quantity: 0 })
        ));
        assert!(matches!(
            compute_total(&catalog(), &[sel(1, -2)]),
            Err(BookingError::InvalidQuantity { .. })
        ));
    }

    #[test]
    fn test_merged_quantity_over_limit_rejected() {
        let result = compute_total(&catalog(), &[sel(1, MAX_QUANTITY), sel(1, 1)]);
        assert!(matches!(
            result,
            Err(BookingError::InvalidQuantity { quantity: 10000, .. })
        ));
    }

    #[test]
    fn test_unknown_and_unavailable_items() {
        assert!(matches!(
            compute_total(&catalog(), &[sel(42, 1)]),
            Err(BookingError::UnknownMenuItem(42))
        ));
        assert!(matches!(
            compute_total(&catalog(), &[sel(9, 1)]),
            Err(BookingError::UnknownMenuItem(9))
        ));
    }

    #[test]
    fn test_empty_selection_is_zero_total() {
        let priced = compute_total(&catalog(), &[]).unwrap();
        assert_eq!(priced.total, Decimal::ZERO);
        assert!(priced.lines.is_empty());
    }

    #[test]
    fn test_too_many_lines() {
        let selections: Vec<ItemSelection> =
            (0..=MAX_LINES as i64).map(|id| sel(id + 100, 1)).collect();
        assert!(matches!(
            compute_total(&catalog(), &selections),
            Err(BookingError::InvalidRequest(_))
        ));
    }
}
