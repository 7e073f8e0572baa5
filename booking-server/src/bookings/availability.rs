//! Slot arithmetic and overlap detection
//!
//! Slots are half-open minute intervals `[start, start + duration)` on the
//! business-local wall clock. Two slots overlap iff `s1 < e2 && s2 < e1`,
//! so back-to-back bookings (one ends at 21:00, next starts at 21:00) are
//! allowed.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use super::error::{BookingError, BookingResult};

/// Upper bound on any stored slot length, used as the lookback window when
/// scanning the slot index for bookings that started before a new slot.
pub const MAX_SLOT_SPAN_MINUTES: i64 = 24 * 60;

/// Wall-clock minute number (minutes since 1970-01-01T00:00, no timezone)
pub fn to_minute(dt: NaiveDateTime) -> i64 {
    dt.and_utc().timestamp().div_euclid(60)
}

/// Half-open interval overlap
pub fn overlaps(s1: i64, e1: i64, s2: i64, e2: i64) -> bool {
    s1 < e2 && s2 < e1
}

/// A (date, time, duration) interval a booking occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub duration_minutes: u32,
}

impl Slot {
    /// Build a slot, rejecting sub-minute start times and out-of-range durations
    pub fn new(
        date: NaiveDate,
        time: NaiveTime,
        duration_minutes: u32,
        max_minutes: u32,
    ) -> BookingResult<Self> {
        if time.second() != 0 || time.nanosecond() != 0 {
            return Err(BookingError::InvalidSlot(format!(
                "start time {time} must be on a whole minute"
            )));
        }
        if duration_minutes == 0 || duration_minutes > max_minutes {
            return Err(BookingError::InvalidSlot(format!(
                "duration {duration_minutes} min outside 1..={max_minutes}"
            )));
        }
        Ok(Self {
            date,
            time,
            duration_minutes,
        })
    }

    pub fn start(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }

    pub fn end(&self) -> NaiveDateTime {
        self.start() + Duration::minutes(i64::from(self.duration_minutes))
    }

    pub fn start_minute(&self) -> i64 {
        to_minute(self.start())
    }

    pub fn end_minute(&self) -> i64 {
        self.start_minute() + i64::from(self.duration_minutes)
    }

    /// Reject a slot that starts before `now` (minute precision)
    pub fn ensure_not_past(&self, now: NaiveDateTime) -> BookingResult<()> {
        if self.start_minute() < to_minute(now) {
            return Err(BookingError::InvalidSlot(format!(
                "slot {} is in the past (now {})",
                self.start(),
                now.format("%Y-%m-%d %H:%M")
            )));
        }
        Ok(())
    }
}

/// One entry of the per-table slot index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotEntry {
    pub booking_id: String,
    pub start_minute: i64,
    pub end_minute: i64,
}

/// First entry overlapping `[start, end)`, ignoring `exclude`
pub fn find_conflict<'a>(
    entries: &'a [SlotEntry],
    start_minute: i64,
    end_minute: i64,
    exclude: Option<&str>,
) -> Option<&'a SlotEntry> {
    entries.iter().find(|e| {
        exclude != Some(e.booking_id.as_str())
            && overlaps(e.start_minute, e.end_minute, start_minute, end_minute)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2099, 6, 1).unwrap()
    }

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn entry(id: &str, start: i64, end: i64) -> SlotEntry {
        SlotEntry {
            booking_id: id.to_string(),
            start_minute: start,
            end_minute: end,
        }
    }

    #[test]
    fn test_touching_slots_do_not_overlap() {
        assert!(!overlaps(0, 120, 120, 240));
        assert!(!overlaps(120, 240, 0, 120));
        assert!(overlaps(0, 121, 120, 240));
    }

    #[test]
    fn test_contained_slot_overlaps() {
        assert!(overlaps(0, 240, 60, 90));
        assert!(overlaps(60, 90, 0, 240));
    }

    #[test]
    fn test_slot_minutes() {
        let slot = Slot::new(date(), hm(19, 0), 120, 360).unwrap();
        assert_eq!(slot.end_minute() - slot.start_minute(), 120);
        assert_eq!(slot.end(), date().and_time(hm(21, 0)));
    }

    #[test]
    fn test_slot_rejects_bad_duration() {
        assert!(matches!(
            Slot::new(date(), hm(19, 0), 0, 360),
            Err(BookingError::InvalidSlot(_))
        ));
        assert!(matches!(
            Slot::new(date(), hm(19, 0), 361, 360),
            Err(BookingError::InvalidSlot(_))
        ));
        assert!(Slot::new(date(), hm(19, 0), 360, 360).is_ok());
    }

    #[test]
    fn test_slot_rejects_seconds() {
        let t = NaiveTime::from_hms_opt(19, 0, 30).unwrap();
        assert!(matches!(
            Slot::new(date(), t, 60, 360),
            Err(BookingError::InvalidSlot(_))
        ));
    }

    #[test]
    fn test_past_check_minute_precision() {
        let slot = Slot::new(date(), hm(19, 0), 60, 360).unwrap();
        let same_minute = date().and_hms_opt(19, 0, 45).unwrap();
        assert!(slot.ensure_not_past(same_minute).is_ok());
        let later = date().and_hms_opt(19, 1, 0).unwrap();
        assert!(slot.ensure_not_past(later).is_err());
    }

    #[test]
    fn test_find_conflict_honours_exclude() {
        let entries = vec![entry("a", 100, 200), entry("b", 300, 400)];
        assert_eq!(find_conflict(&entries, 150, 250, None).unwrap().booking_id, "a");
        assert!(find_conflict(&entries, 150, 250, Some("a")).is_none());
        assert!(find_conflict(&entries, 200, 300, None).is_none());
    }

    #[test]
    fn test_to_minute_before_epoch_floors() {
        let dt = NaiveDate::from_ymd_opt(1969, 12, 31)
            .unwrap()
            .and_hms_opt(23, 59, 30)
            .unwrap();
        assert_eq!(to_minute(dt), -1);
    }
}
