//! redb-based storage layer for bookings
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `bookings` | `booking_id` | `Booking` (JSON, items inline) | Source of truth |
//! | `table_slots` | `(table_id, start_minute, booking_id)` | `end_minute` | Occupied slots (open bookings only) |
//! | `table_bookings` | `(table_id, start_minute, booking_id)` | `()` | Every booking of a table |
//! | `user_bookings` | `(user_id, start_minute, booking_id)` | `()` | Every booking of a user |
//! | `sequence_counter` | `&str` | `u64` | Booking number counter |
//!
//! # Atomicity
//!
//! redb allows a single write transaction at a time and commits with a
//! copy-on-write pointer swap. Reading the slot index and inserting the new
//! booking inside the same `WriteTransaction` is therefore serializable:
//! a transaction dropped before `commit()` leaves no trace.

use redb::{
    Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition,
    WriteTransaction,
};
use shared::models::Booking;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

use super::availability::{MAX_SLOT_SPAN_MINUTES, SlotEntry};

/// Table for bookings: key = booking_id, value = JSON-serialized Booking
const BOOKINGS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("bookings");

/// Occupied slots: key = (table_id, start_minute, booking_id), value = end_minute
const TABLE_SLOTS_TABLE: TableDefinition<(i64, i64, &str), i64> =
    TableDefinition::new("table_slots");

/// All bookings per table: key = (table_id, start_minute, booking_id)
const TABLE_BOOKINGS_TABLE: TableDefinition<(i64, i64, &str), ()> =
    TableDefinition::new("table_bookings");

/// All bookings per user: key = (user_id, start_minute, booking_id)
const USER_BOOKINGS_TABLE: TableDefinition<(&str, i64, &str), ()> =
    TableDefinition::new("user_bookings");

/// Table for counters: key = counter name, value = u64
const SEQUENCE_TABLE: TableDefinition<&str, u64> = TableDefinition::new("sequence_counter");

const BOOKING_COUNT_KEY: &str = "booking_count";

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Booking storage backed by redb
#[derive(Clone)]
pub struct BookingStorage {
    db: Arc<Database>,
}

impl std::fmt::Debug for BookingStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookingStorage").finish_non_exhaustive()
    }
}

impl BookingStorage {
    /// Open or create the database at the given path
    ///
    /// redb commits with `Durability::Immediate` by default: once `commit()`
    /// returns the booking survives a crash or power loss.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open an in-memory database (tests, demos)
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StorageResult<Self> {
        let write_txn = db.begin_write()?;
        {
            // Create all tables if they don't exist
            let _ = write_txn.open_table(BOOKINGS_TABLE)?;
            let _ = write_txn.open_table(TABLE_SLOTS_TABLE)?;
            let _ = write_txn.open_table(TABLE_BOOKINGS_TABLE)?;
            let _ = write_txn.open_table(USER_BOOKINGS_TABLE)?;

            let mut seq_table = write_txn.open_table(SEQUENCE_TABLE)?;
            if seq_table.get(BOOKING_COUNT_KEY)?.is_none() {
                seq_table.insert(BOOKING_COUNT_KEY, 0u64)?;
            }
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Begin a write transaction
    ///
    /// Blocks until any other writer has committed or aborted.
    pub fn begin_write(&self) -> StorageResult<WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    // ========== Booking Counter (for booking number) ==========

    /// Increment and return the booking counter (within transaction)
    ///
    /// Rolled back together with the booking if the transaction is dropped.
    pub fn next_booking_count(&self, txn: &WriteTransaction) -> StorageResult<u64> {
        let mut table = txn.open_table(SEQUENCE_TABLE)?;
        let current = table
            .get(BOOKING_COUNT_KEY)?
            .map(|guard| guard.value())
            .unwrap_or(0);
        let next = current + 1;
        table.insert(BOOKING_COUNT_KEY, next)?;
        Ok(next)
    }

    /// Current booking counter (read-only)
    pub fn booking_count(&self) -> StorageResult<u64> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SEQUENCE_TABLE)?;
        Ok(table
            .get(BOOKING_COUNT_KEY)?
            .map(|guard| guard.value())
            .unwrap_or(0))
    }

    /// Number of stored bookings
    pub fn len(&self) -> StorageResult<u64> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(BOOKINGS_TABLE)?;
        Ok(table.len()?)
    }

    pub fn is_empty(&self) -> StorageResult<bool> {
        Ok(self.len()? == 0)
    }

    // ========== Booking Operations ==========

    /// Store (insert or overwrite) a booking document
    pub fn store_booking(&self, txn: &WriteTransaction, booking: &Booking) -> StorageResult<()> {
        let mut table = txn.open_table(BOOKINGS_TABLE)?;
        let value = serde_json::to_vec(booking)?;
        table.insert(booking.id.as_str(), value.as_slice())?;
        Ok(())
    }

    /// Get a booking by ID
    pub fn get_booking(&self, booking_id: &str) -> StorageResult<Option<Booking>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(BOOKINGS_TABLE)?;

        match table.get(booking_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Get a booking by ID (within transaction)
    pub fn get_booking_txn(
        &self,
        txn: &WriteTransaction,
        booking_id: &str,
    ) -> StorageResult<Option<Booking>> {
        let table = txn.open_table(BOOKINGS_TABLE)?;

        match table.get(booking_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    // ========== Index Operations ==========

    /// Add a booking to the table/user indexes, and to the slot index if open
    pub fn index_booking(&self, txn: &WriteTransaction, booking: &Booking) -> StorageResult<()> {
        let (start, end) = minutes_of(booking);
        let id = booking.id.as_str();

        {
            let mut table = txn.open_table(TABLE_BOOKINGS_TABLE)?;
            table.insert((booking.table_id, start, id), ())?;
        }
        {
            let mut table = txn.open_table(USER_BOOKINGS_TABLE)?;
            table.insert((booking.user_id.as_str(), start, id), ())?;
        }
        if booking.status.is_open() {
            let mut table = txn.open_table(TABLE_SLOTS_TABLE)?;
            table.insert((booking.table_id, start, id), end)?;
        }
        Ok(())
    }

    /// Remove a booking from every index (before moving it to a new slot)
    pub fn unindex_booking(&self, txn: &WriteTransaction, booking: &Booking) -> StorageResult<()> {
        let (start, _) = minutes_of(booking);
        let id = booking.id.as_str();

        {
            let mut table = txn.open_table(TABLE_BOOKINGS_TABLE)?;
            table.remove((booking.table_id, start, id))?;
        }
        {
            let mut table = txn.open_table(USER_BOOKINGS_TABLE)?;
            table.remove((booking.user_id.as_str(), start, id))?;
        }
        self.release_slot(txn, booking)
    }

    /// Free the slot held by a booking (cancel / complete)
    pub fn release_slot(&self, txn: &WriteTransaction, booking: &Booking) -> StorageResult<()> {
        let (start, _) = minutes_of(booking);
        let mut table = txn.open_table(TABLE_SLOTS_TABLE)?;
        table.remove((booking.table_id, start, booking.id.as_str()))?;
        Ok(())
    }

    /// Occupied slots of a table that may overlap `[start_minute, end_minute)` (within transaction)
    pub fn slot_candidates_txn(
        &self,
        txn: &WriteTransaction,
        table_id: i64,
        start_minute: i64,
        end_minute: i64,
    ) -> StorageResult<Vec<SlotEntry>> {
        let table = txn.open_table(TABLE_SLOTS_TABLE)?;
        scan_slots(&table, table_id, start_minute, end_minute)
    }

    /// Occupied slots of a table that may overlap `[start_minute, end_minute)` (read-only)
    pub fn slot_candidates(
        &self,
        table_id: i64,
        start_minute: i64,
        end_minute: i64,
    ) -> StorageResult<Vec<SlotEntry>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(TABLE_SLOTS_TABLE)?;
        scan_slots(&table, table_id, start_minute, end_minute)
    }

    /// Bookings of a user, ordered by slot start
    pub fn list_for_user(&self, user_id: &str) -> StorageResult<Vec<Booking>> {
        let read_txn = self.db.begin_read()?;
        let index = read_txn.open_table(USER_BOOKINGS_TABLE)?;
        let bookings = read_txn.open_table(BOOKINGS_TABLE)?;

        let mut result = Vec::new();
        for entry in index.range((user_id, i64::MIN, "")..(user_id, i64::MAX, ""))? {
            let (key, _) = entry?;
            let (_, _, booking_id) = key.value();
            if let Some(value) = bookings.get(booking_id)? {
                result.push(serde_json::from_slice(value.value())?);
            }
        }
        Ok(result)
    }

    /// Bookings of a table starting in `[from_minute, to_minute)`, ordered by slot start
    pub fn list_for_table(
        &self,
        table_id: i64,
        from_minute: i64,
        to_minute: i64,
    ) -> StorageResult<Vec<Booking>> {
        let read_txn = self.db.begin_read()?;
        let index = read_txn.open_table(TABLE_BOOKINGS_TABLE)?;
        let bookings = read_txn.open_table(BOOKINGS_TABLE)?;

        let mut result = Vec::new();
        for entry in index.range((table_id, from_minute, "")..(table_id, to_minute, ""))? {
            let (key, _) = entry?;
            let (_, _, booking_id) = key.value();
            if let Some(value) = bookings.get(booking_id)? {
                result.push(serde_json::from_slice(value.value())?);
            }
        }
        Ok(result)
    }
}

/// (start_minute, end_minute) of a booking's slot
fn minutes_of(booking: &Booking) -> (i64, i64) {
    let start = super::availability::to_minute(booking.start());
    (start, start + i64::from(booking.duration_minutes))
}

/// Slots starting in `[start - MAX_SLOT_SPAN, end)` for one table
///
/// Anything starting earlier than the lookback window has already ended.
fn scan_slots(
    table: &impl ReadableTable<(i64, i64, &'static str), i64>,
    table_id: i64,
    start_minute: i64,
    end_minute: i64,
) -> StorageResult<Vec<SlotEntry>> {
    let lower = start_minute.saturating_sub(MAX_SLOT_SPAN_MINUTES);
    let mut entries = Vec::new();
    for entry in table.range((table_id, lower, "")..(table_id, end_minute, ""))? {
        let (key, value) = entry?;
        let (_, start, booking_id) = key.value();
        entries.push(SlotEntry {
            booking_id: booking_id.to_string(),
            start_minute: start,
            end_minute: value.value(),
        });
    }
    Ok(entries)
}
