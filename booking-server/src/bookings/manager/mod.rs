//! BookingManager - reservation engine and lifecycle manager
//!
//! # Create Flow
//!
//! ```text
//! create_booking(user, request)
//!     ├─ 1. Shape checks (user id, guest count)
//!     ├─ 2. Table lookup (UnknownTable) + capacity (CapacityExceeded)
//!     ├─ 3. Slot: whole minute, duration bound, not in the past (InvalidSlot)
//!     ├─ 4. Pricing against catalog snapshot (UnknownMenuItem / InvalidQuantity)
//!     ├─ 5. Begin write transaction (serializes all writers) + deadline check
//!     ├─ 6. Slot index scan (SlotConflict)
//!     ├─ 7. Booking number + persist booking, items and indexes
//!     ├─ 8. Deadline check
//!     └─ 9. Commit
//! ```
//!
//! All methods are blocking; async callers go through `spawn_blocking`.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Utc};
use chrono_tz::Tz;
use rand::Rng;
use redb::WriteTransaction;
use shared::models::{
    Booking, BookingCreate, BookingReschedule, BookingStatus, DiningTable, PaymentStatus,
};
use shared::util::now_millis;
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::availability::{Slot, find_conflict, to_minute};
use super::error::{BookingError, BookingResult};
use super::lifecycle;
use super::pricing::compute_total;
use super::storage::{BookingStorage, StorageError};
use crate::core::Config;
use crate::services::CatalogStore;
use crate::utils::validation::{MAX_USER_ID_LEN, check_required_text};

/// Backoff base for `create_booking_with_retry`
const RETRY_BASE_DELAY: Duration = Duration::from_millis(50);

/// Backoff cap for `create_booking_with_retry`
const RETRY_MAX_DELAY: Duration = Duration::from_secs(1);

/// Engine knobs derived from [`Config`]
#[derive(Debug, Clone)]
pub struct BookingPolicy {
    /// 业务时区
    pub tz: Tz,
    pub default_seating_minutes: u32,
    pub max_seating_minutes: u32,
    /// Write budget of one operation; `create_booking_with_retry` spends it
    /// across all attempts
    pub write_timeout: Duration,
    /// Attempts for `create_booking_with_retry` (>= 1)
    pub retry_attempts: u32,
}

impl BookingPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            tz: config.business_timezone,
            default_seating_minutes: config.default_seating_minutes,
            max_seating_minutes: config.max_seating_minutes,
            write_timeout: Duration::from_millis(config.write_budget_ms()),
            retry_attempts: config.store_retry_attempts,
        }
    }
}

impl Default for BookingPolicy {
    fn default() -> Self {
        Self {
            tz: Tz::UTC,
            default_seating_minutes: 120,
            max_seating_minutes: 360,
            write_timeout: Duration::from_secs(5),
            retry_attempts: 3,
        }
    }
}

/// Reservation & order engine plus lifecycle manager
///
/// Shared across handlers as `Arc<BookingManager>`. redb serializes writers,
/// so no extra locking is needed here.
pub struct BookingManager {
    storage: BookingStorage,
    catalog: Arc<dyn CatalogStore>,
    policy: BookingPolicy,
}

impl std::fmt::Debug for BookingManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookingManager")
            .field("storage", &self.storage)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl BookingManager {
    pub fn new(
        storage: BookingStorage,
        catalog: Arc<dyn CatalogStore>,
        policy: BookingPolicy,
    ) -> Self {
        Self {
            storage,
            catalog,
            policy,
        }
    }

    /// Get the underlying storage
    pub fn storage(&self) -> &BookingStorage {
        &self.storage
    }

    pub fn policy(&self) -> &BookingPolicy {
        &self.policy
    }

    /// Current wall-clock time in the business timezone
    pub fn business_now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.policy.tz).naive_local()
    }

    // =========================================================================
    // Create
    // =========================================================================

    /// Create a booking with its order lines, atomically
    pub fn create_booking(&self, user_id: &str, req: BookingCreate) -> BookingResult<Booking> {
        self.create_booking_at(user_id, req, self.business_now())
    }

    /// Create a booking as of `now` (business-local wall clock)
    pub fn create_booking_at(
        &self,
        user_id: &str,
        req: BookingCreate,
        now: NaiveDateTime,
    ) -> BookingResult<Booking> {
        let deadline = Instant::now() + self.policy.write_timeout;
        self.create_booking_before(user_id, req, now, deadline)
    }

    fn create_booking_before(
        &self,
        user_id: &str,
        req: BookingCreate,
        now: NaiveDateTime,
        deadline: Instant,
    ) -> BookingResult<Booking> {
        check_required_text(user_id, "user_id", MAX_USER_ID_LEN)
            .map_err(BookingError::InvalidRequest)?;
        if req.guest_count < 1 {
            return Err(BookingError::InvalidRequest(format!(
                "guest_count must be at least 1 (got {})",
                req.guest_count
            )));
        }

        let table = self.resolve_table(req.table_id)?;
        if !table.seats(req.guest_count) {
            return Err(BookingError::CapacityExceeded {
                capacity: table.capacity,
                guest_count: req.guest_count,
            });
        }

        let slot = self.build_slot(req.date, req.time, req.duration_minutes)?;
        slot.ensure_not_past(now)?;

        let priced = compute_total(self.catalog.as_ref(), &req.selections)?;

        // 1. Check-and-insert inside one write transaction
        let txn = self.storage.begin_write()?;
        ensure_before(deadline)?;

        if let Some(conflict) = self.first_conflict(&txn, table.id, &slot, None)? {
            tracing::warn!(
                table_id = table.id,
                conflicting_booking_id = %conflict,
                start = %slot.start(),
                "Slot conflict on create"
            );
            return Err(BookingError::SlotConflict { table_id: table.id });
        }

        // 2. Build the booking
        let booking_id = uuid::Uuid::new_v4().to_string();
        let count = self.storage.next_booking_count(&txn)?;
        let now_ms = now_millis();
        let items = priced
            .lines
            .into_iter()
            .map(|line| line.into_item(&booking_id))
            .collect();
        let booking = Booking {
            id: booking_id,
            booking_number: format!("BK{}{}", now.format("%Y%m%d"), 10000 + count),
            user_id: user_id.to_string(),
            table_id: table.id,
            table_number: table.table_number,
            date: slot.date,
            time: slot.time,
            duration_minutes: slot.duration_minutes,
            guest_count: req.guest_count,
            status: BookingStatus::Pending,
            payment_status: PaymentStatus::Unpaid,
            total_amount: priced.total,
            items,
            created_at: now_ms,
            updated_at: now_ms,
        };

        // 3. Persist + commit
        self.storage.store_booking(&txn, &booking)?;
        self.storage.index_booking(&txn, &booking)?;
        commit_before(txn, deadline)?;

        tracing::info!(
            booking_id = %booking.id,
            booking_number = %booking.booking_number,
            table_id = booking.table_id,
            user_id = %booking.user_id,
            total = %booking.total_amount,
            "Booking created"
        );
        Ok(booking)
    }

    /// `create_booking` retried on `StoreUnavailable` with exponential backoff
    ///
    /// All attempts share one deadline: no attempt commits after
    /// `write_timeout` has elapsed since the call began. Validation, conflict
    /// and lifecycle errors are returned immediately.
    pub fn create_booking_with_retry(
        &self,
        user_id: &str,
        req: BookingCreate,
    ) -> BookingResult<Booking> {
        let deadline = Instant::now() + self.policy.write_timeout;
        let attempts = self.policy.retry_attempts.max(1);
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.create_booking_before(user_id, req.clone(), self.business_now(), deadline) {
                Err(err) if err.is_retryable() && attempt < attempts => {
                    let delay = backoff_delay(attempt);
                    if Instant::now() + delay >= deadline {
                        tracing::warn!(attempt, error = %err, "Write budget spent, giving up");
                        return Err(err);
                    }
                    tracing::warn!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Retrying booking creation"
                    );
                    std::thread::sleep(delay);
                }
                result => return result,
            }
        }
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Move a booking along the status graph
    ///
    /// Leaving an open status frees the slot in the same transaction.
    pub fn transition(&self, booking_id: &str, target: BookingStatus) -> BookingResult<Booking> {
        self.transition_at(booking_id, target, self.business_now())
    }

    pub fn transition_at(
        &self,
        booking_id: &str,
        target: BookingStatus,
        now: NaiveDateTime,
    ) -> BookingResult<Booking> {
        let booking = self.update_booking(booking_id, |storage, txn, booking| {
            let was_open = booking.status.is_open();
            lifecycle::apply_transition(booking, target, now)?;
            if was_open && !booking.status.is_open() {
                storage.release_slot(txn, booking)?;
            }
            Ok(())
        })?;

        tracing::info!(booking_id = %booking.id, status = %booking.status, "Booking status changed");
        Ok(booking)
    }

    /// Update the payment status (Paid also confirms a Pending booking)
    pub fn set_payment_status(
        &self,
        booking_id: &str,
        target: PaymentStatus,
    ) -> BookingResult<Booking> {
        let booking = self.update_booking(booking_id, |_, _, booking| {
            lifecycle::apply_payment(booking, target)
        })?;

        tracing::info!(
            booking_id = %booking.id,
            payment_status = %booking.payment_status,
            status = %booking.status,
            "Booking payment status changed"
        );
        Ok(booking)
    }

    /// Move an open booking to another slot on the same table
    ///
    /// Items and total are unchanged. The booking's own slot never conflicts
    /// with itself.
    pub fn reschedule(&self, booking_id: &str, req: BookingReschedule) -> BookingResult<Booking> {
        self.reschedule_at(booking_id, req, self.business_now())
    }

    pub fn reschedule_at(
        &self,
        booking_id: &str,
        req: BookingReschedule,
        now: NaiveDateTime,
    ) -> BookingResult<Booking> {
        let booking = self.update_booking(booking_id, |storage, txn, booking| {
            if !booking.status.is_open() {
                return Err(BookingError::invalid_transition(
                    booking.status,
                    "RESCHEDULED",
                ));
            }
            let duration = req.duration_minutes.unwrap_or(booking.duration_minutes);
            let slot = self.build_slot(req.date, req.time, Some(duration))?;
            slot.ensure_not_past(now)?;

            if let Some(conflict) =
                self.first_conflict(txn, booking.table_id, &slot, Some(&booking.id))?
            {
                tracing::warn!(
                    booking_id = %booking.id,
                    conflicting_booking_id = %conflict,
                    "Slot conflict on reschedule"
                );
                return Err(BookingError::SlotConflict {
                    table_id: booking.table_id,
                });
            }

            storage.unindex_booking(txn, booking)?;
            booking.date = slot.date;
            booking.time = slot.time;
            booking.duration_minutes = slot.duration_minutes;
            storage.index_booking(txn, booking)?;
            Ok(())
        })?;

        tracing::info!(booking_id = %booking.id, start = %booking.start(), "Booking rescheduled");
        Ok(booking)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn get(&self, booking_id: &str) -> BookingResult<Booking> {
        self.storage
            .get_booking(booking_id)?
            .ok_or_else(|| BookingError::NotFound(booking_id.to_string()))
    }

    /// Bookings of a user, ordered by date then time
    pub fn list_for_user(&self, user_id: &str) -> BookingResult<Vec<Booking>> {
        Ok(self.storage.list_for_user(user_id)?)
    }

    /// Bookings of a table whose date falls in `from..=to`, all statuses
    pub fn list_for_table(
        &self,
        table_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> BookingResult<Vec<Booking>> {
        if from > to {
            return Err(BookingError::InvalidRequest(format!(
                "empty date range: {from} > {to}"
            )));
        }
        if self.catalog.get_table(table_id).is_none() {
            return Err(BookingError::UnknownTable(table_id));
        }
        let from_minute = to_minute(from.and_time(NaiveTime::MIN));
        let to_minute = to_minute(to.and_time(NaiveTime::MIN)) + 24 * 60;
        Ok(self
            .storage
            .list_for_table(table_id, from_minute, to_minute)?)
    }

    /// Whether the slot is free on the table
    ///
    /// `excluding` ignores one booking, used when checking a reschedule.
    pub fn is_available(
        &self,
        table_id: i64,
        date: NaiveDate,
        time: NaiveTime,
        duration_minutes: Option<u32>,
        excluding: Option<&str>,
    ) -> BookingResult<bool> {
        self.resolve_table(table_id)?;
        let slot = self.build_slot(date, time, duration_minutes)?;
        let (start, end) = (slot.start_minute(), slot.end_minute());
        let candidates = self.storage.slot_candidates(table_id, start, end)?;
        Ok(find_conflict(&candidates, start, end, excluding).is_none())
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Active table or `UnknownTable`
    fn resolve_table(&self, table_id: i64) -> BookingResult<DiningTable> {
        self.catalog
            .get_table(table_id)
            .filter(|t| t.is_active)
            .ok_or(BookingError::UnknownTable(table_id))
    }

    fn build_slot(
        &self,
        date: NaiveDate,
        time: NaiveTime,
        duration_minutes: Option<u32>,
    ) -> BookingResult<Slot> {
        Slot::new(
            date,
            time,
            duration_minutes.unwrap_or(self.policy.default_seating_minutes),
            self.policy.max_seating_minutes,
        )
    }

    /// Id of the first open booking overlapping `slot`, read inside `txn`
    fn first_conflict(
        &self,
        txn: &WriteTransaction,
        table_id: i64,
        slot: &Slot,
        exclude: Option<&str>,
    ) -> BookingResult<Option<String>> {
        let (start, end) = (slot.start_minute(), slot.end_minute());
        let candidates = self.storage.slot_candidates_txn(txn, table_id, start, end)?;
        Ok(find_conflict(&candidates, start, end, exclude).map(|e| e.booking_id.clone()))
    }

    /// Load → mutate → store in one write transaction
    fn update_booking<F>(&self, booking_id: &str, mutate: F) -> BookingResult<Booking>
    where
        F: FnOnce(&BookingStorage, &WriteTransaction, &mut Booking) -> BookingResult<()>,
    {
        let deadline = Instant::now() + self.policy.write_timeout;
        let txn = self.storage.begin_write()?;
        ensure_before(deadline)?;

        let mut booking = self
            .storage
            .get_booking_txn(&txn, booking_id)?
            .ok_or_else(|| BookingError::NotFound(booking_id.to_string()))?;

        mutate(&self.storage, &txn, &mut booking)?;
        booking.updated_at = now_millis();
        self.storage.store_booking(&txn, &booking)?;

        commit_before(txn, deadline)?;
        Ok(booking)
    }
}

/// `StoreUnavailable` once the deadline has passed
///
/// Callers holding a transaction drop it on error, which aborts it.
fn ensure_before(deadline: Instant) -> BookingResult<()> {
    if Instant::now() < deadline {
        return Ok(());
    }
    tracing::error!("Write transaction exceeded deadline, aborted");
    Err(BookingError::StoreUnavailable(
        "write transaction deadline exceeded".to_string(),
    ))
}

/// Commit unless the deadline has passed, in which case abort
///
/// Nothing written in an aborted transaction becomes visible.
fn commit_before(txn: WriteTransaction, deadline: Instant) -> BookingResult<()> {
    if let Err(err) = ensure_before(deadline) {
        if let Err(e) = txn.abort() {
            tracing::error!(error = %e, "Failed to abort timed-out transaction");
        }
        return Err(err);
    }
    txn.commit().map_err(StorageError::from)?;
    Ok(())
}

/// 50ms, 100ms, 200ms ... capped at 1s, plus up to 25% jitter
fn backoff_delay(attempt: u32) -> Duration {
    let factor = 1u32 << attempt.saturating_sub(1).min(16);
    let capped = RETRY_BASE_DELAY.saturating_mul(factor).min(RETRY_MAX_DELAY);
    let jitter_ms = rand::thread_rng().gen_range(0..=capped.as_millis() as u64 / 4);
    capped + Duration::from_millis(jitter_ms)
}

#[cfg(test)]
mod tests;
