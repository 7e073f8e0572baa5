use super::*;
use crate::services::CatalogService;
use rust_decimal::Decimal;
use shared::models::{ItemSelection, MenuCategory, MenuItem, cents_to_decimal};

/// Table 1 = number 5 seats 4, table 2 = number 8 seats 2, table 3 inactive
fn test_catalog() -> Arc<CatalogService> {
    Arc::new(CatalogService::from_parts(
        vec![
            DiningTable {
                id: 1,
                table_number: 5,
                capacity: 4,
                is_active: true,
            },
            DiningTable {
                id: 2,
                table_number: 8,
                capacity: 2,
                is_active: true,
            },
            DiningTable {
                id: 3,
                table_number: 9,
                capacity: 6,
                is_active: false,
            },
        ],
        vec![
            menu_item(10, "Paneer Tikka", MenuCategory::Appetizers, 1000, true),
            menu_item(11, "Biryani", MenuCategory::MainCourse, 1450, true),
            menu_item(12, "Lassi", MenuCategory::Drinks, 350, true),
            menu_item(13, "Kulfi", MenuCategory::Desserts, 500, false),
        ],
    ))
}

fn menu_item(
    id: i64,
    name: &str,
    category: MenuCategory,
    cents: i64,
    is_available: bool,
) -> MenuItem {
    MenuItem {
        id,
        name: name.to_string(),
        description: None,
        category,
        price: cents_to_decimal(cents),
        is_available,
    }
}

fn create_test_manager() -> BookingManager {
    create_test_manager_with_policy(BookingPolicy::default())
}

fn create_test_manager_with_policy(policy: BookingPolicy) -> BookingManager {
    let storage = BookingStorage::open_in_memory().unwrap();
    BookingManager::new(storage, test_catalog(), policy)
}

fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2099, 6, d).unwrap()
}

fn hm(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

/// Fixed "now" well before every test slot
fn now() -> NaiveDateTime {
    date(1).and_time(hm(9, 0))
}

fn sel(menu_item_id: i64, quantity: i32) -> ItemSelection {
    ItemSelection {
        menu_item_id,
        quantity,
    }
}

fn booking_req(table_id: i64, time: NaiveTime, guest_count: i32) -> BookingCreate {
    BookingCreate {
        table_id,
        date: date(1),
        time,
        guest_count,
        duration_minutes: None,
        selections: vec![],
    }
}

/// Create on table 1 at `time` for 2 guests, must succeed
fn book(manager: &BookingManager, user: &str, time: NaiveTime) -> Booking {
    manager
        .create_booking_at(user, booking_req(1, time, 2), now())
        .expect("booking should succeed")
}
