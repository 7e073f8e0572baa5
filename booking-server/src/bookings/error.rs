use super::storage::StorageError;
use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Booking engine errors
///
/// Every operation returns exactly one of these kinds; nothing is partially
/// committed when one is returned.
#[derive(Debug, Error)]
pub enum BookingError {
    #[error("Unknown table: {0}")]
    UnknownTable(i64),

    #[error("Unknown menu item: {0}")]
    UnknownMenuItem(i64),

    #[error("Party of {guest_count} exceeds table capacity {capacity}")]
    CapacityExceeded { capacity: i32, guest_count: i32 },

    #[error("Invalid slot: {0}")]
    InvalidSlot(String),

    #[error("Table {table_id} is already booked for an overlapping slot")]
    SlotConflict { table_id: i64 },

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Invalid transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Booking not found: {0}")]
    NotFound(String),

    #[error("Invalid quantity {quantity} for menu item {menu_item_id}")]
    InvalidQuantity { menu_item_id: i64, quantity: i64 },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl BookingError {
    /// Only transient store failures may be retried, and only as a whole
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_))
    }

    pub fn invalid_transition(from: impl ToString, to: impl ToString) -> Self {
        Self::InvalidTransition {
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

/// 存储层错误统一折叠为 StoreUnavailable（保留技术细节用于日志）
impl From<StorageError> for BookingError {
    fn from(err: StorageError) -> Self {
        tracing::error!(error = %err, "Booking storage error");
        BookingError::StoreUnavailable(err.to_string())
    }
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        let message = err.to_string();
        match err {
            BookingError::UnknownTable(id) => {
                AppError::with_message(ErrorCode::TableNotFound, message).with_detail("table_id", id)
            }
            BookingError::UnknownMenuItem(id) => {
                AppError::with_message(ErrorCode::MenuItemNotFound, message)
                    .with_detail("menu_item_id", id)
            }
            BookingError::CapacityExceeded {
                capacity,
                guest_count,
            } => AppError::with_message(ErrorCode::CapacityExceeded, message)
                .with_detail("capacity", capacity)
                .with_detail("guest_count", guest_count),
            BookingError::InvalidSlot(_) => AppError::with_message(ErrorCode::InvalidSlot, message),
            BookingError::SlotConflict { table_id } => {
                AppError::with_message(ErrorCode::SlotConflict, message)
                    .with_detail("table_id", table_id)
            }
            // 技术细节只进日志，不返回给客户端
            BookingError::StoreUnavailable(_) => AppError::new(ErrorCode::StoreUnavailable),
            BookingError::InvalidTransition { from, to } => {
                AppError::with_message(ErrorCode::InvalidTransition, message)
                    .with_detail("from", from)
                    .with_detail("to", to)
            }
            BookingError::NotFound(id) => AppError::with_message(ErrorCode::BookingNotFound, message)
                .with_detail("booking_id", id),
            BookingError::InvalidQuantity {
                menu_item_id,
                quantity,
            } => AppError::with_message(ErrorCode::InvalidQuantity, message)
                .with_detail("menu_item_id", menu_item_id)
                .with_detail("quantity", quantity),
            BookingError::InvalidRequest(_) => {
                AppError::with_message(ErrorCode::InvalidRequest, message)
            }
        }
    }
}

pub type BookingResult<T> = Result<T, BookingError>;
