//! Bookings - table reservations with pre-ordered menu items
//!
//! - [`availability`] - slot arithmetic and overlap detection
//! - [`pricing`] - frozen unit prices and exact totals
//! - [`lifecycle`] - status / payment-status graphs
//! - [`storage`] - redb persistence and slot index
//! - [`BookingManager`] - transactional create, transition, reschedule

pub mod availability;
pub mod error;
pub mod lifecycle;
pub mod manager;
pub mod pricing;
pub mod storage;

pub use availability::{Slot, SlotEntry};
pub use error::{BookingError, BookingResult};
pub use manager::{BookingManager, BookingPolicy};
pub use pricing::{PricedOrder, compute_total};
pub use storage::{BookingStorage, StorageError};
