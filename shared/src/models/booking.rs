//! Booking Model
//!
//! A booking reserves one table for one slot and carries the food order
//! placed with it. Bookings are created only by the booking engine.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Booking status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    /// Open bookings hold their slot
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Cancelled | Self::Completed)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Cancelled => "CANCELLED",
            Self::Completed => "COMPLETED",
        };
        f.write_str(s)
    }
}

/// Payment status (tracked only, no payment processing)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    #[default]
    Unpaid,
    Paid,
    Refunded,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Unpaid => "UNPAID",
            Self::Paid => "PAID",
            Self::Refunded => "REFUNDED",
        };
        f.write_str(s)
    }
}

/// Order line attached to a booking
///
/// `unit_price` is frozen at booking time and never rewritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingItem {
    pub booking_id: String,
    pub menu_item_id: i64,
    /// Menu name at booking time (display only)
    pub name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
}

impl BookingItem {
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Booking entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    /// Booking ID (UUID, assigned by server)
    pub id: String,
    /// Human-readable number, e.g. BK2026101510001
    pub booking_number: String,
    /// Owner (already authenticated upstream)
    pub user_id: String,
    pub table_id: i64,
    /// Table display number at booking time
    pub table_number: i32,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub duration_minutes: u32,
    pub guest_count: i32,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub total_amount: Decimal,
    pub items: Vec<BookingItem>,
    /// Unix millis
    pub created_at: i64,
    /// Unix millis
    pub updated_at: i64,
}

impl Booking {
    /// Slot start (business-local wall clock)
    pub fn start(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }

    /// Slot end, exclusive
    pub fn end(&self) -> NaiveDateTime {
        self.start() + Duration::minutes(i64::from(self.duration_minutes))
    }

    /// Sum of frozen line totals
    pub fn items_total(&self) -> Decimal {
        self.items.iter().map(BookingItem::line_total).sum()
    }
}

/// One menu selection in a booking request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSelection {
    pub menu_item_id: i64,
    pub quantity: i32,
}

/// Create booking payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingCreate {
    pub table_id: i64,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub guest_count: i32,
    /// Seating window; server default when absent
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub selections: Vec<ItemSelection>,
}

/// Status transition payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingTransition {
    pub status: BookingStatus,
}

/// Payment status update payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentStatusUpdate {
    pub payment_status: PaymentStatus,
}

/// Reschedule payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingReschedule {
    pub date: NaiveDate,
    pub time: NaiveTime,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_booking() -> Booking {
        Booking {
            id: "b1".to_string(),
            booking_number: "BK2099010110001".to_string(),
            user_id: "u1".to_string(),
            table_id: 1,
            table_number: 5,
            date: NaiveDate::from_ymd_opt(2099, 1, 1).unwrap(),
            time: NaiveTime::from_hms_opt(23, 0, 0).unwrap(),
            duration_minutes: 120,
            guest_count: 2,
            status: BookingStatus::Pending,
            payment_status: PaymentStatus::Unpaid,
            total_amount: Decimal::new(2000, 2),
            items: vec![BookingItem {
                booking_id: "b1".to_string(),
                menu_item_id: 7,
                name: "Samosa".to_string(),
                quantity: 2,
                unit_price: Decimal::new(1000, 2),
            }],
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_slot_end_crosses_midnight() {
        let booking = sample_booking();
        assert_eq!(
            booking.end(),
            NaiveDate::from_ymd_opt(2099, 1, 2)
                .unwrap()
                .and_hms_opt(1, 0, 0)
                .unwrap()
        );
    }

    #[test]
    fn test_items_total() {
        assert_eq!(sample_booking().items_total(), Decimal::new(2000, 2));
    }

    #[test]
    fn test_status_serde() {
        let json = serde_json::to_string(&BookingStatus::Confirmed).unwrap();
        assert_eq!(json, "\"CONFIRMED\"");
        let status: PaymentStatus = serde_json::from_str("\"REFUNDED\"").unwrap();
        assert_eq!(status, PaymentStatus::Refunded);
    }

    #[test]
    fn test_open_statuses() {
        assert!(BookingStatus::Pending.is_open());
        assert!(BookingStatus::Confirmed.is_open());
        assert!(!BookingStatus::Cancelled.is_open());
        assert!(!BookingStatus::Completed.is_open());
    }

    #[test]
    fn test_create_payload_defaults() {
        let payload: BookingCreate = serde_json::from_str(
            r#"{"table_id":1,"date":"2099-01-01","time":"19:00:00","guest_count":2}"#,
        )
        .unwrap();
        assert!(payload.duration_minutes.is_none());
        assert!(payload.selections.is_empty());
    }
}
