//! Booking lifecycle: status and payment-status graphs
//!
//! ```text
//! Pending ──► Confirmed ──► Completed   (start time reached)
//!    │            │
//!    └────────────┴──► Cancelled
//!
//! Unpaid ──► Paid ──► Refunded
//! ```
//!
//! Cancelled, Completed and Refunded are terminal. Same-state moves are
//! rejected.

use chrono::NaiveDateTime;
use shared::models::{Booking, BookingStatus, PaymentStatus};

use super::availability::to_minute;
use super::error::{BookingError, BookingResult};

/// Whether the status graph has an edge `from -> to`
pub fn can_transition(from: BookingStatus, to: BookingStatus) -> bool {
    use BookingStatus::*;
    matches!(
        (from, to),
        (Pending, Confirmed) | (Pending, Cancelled) | (Confirmed, Cancelled) | (Confirmed, Completed)
    )
}

/// Validate and apply a status transition in place
///
/// Confirmed → Completed additionally requires `now` to have reached the
/// booking start.
pub fn apply_transition(
    booking: &mut Booking,
    target: BookingStatus,
    now: NaiveDateTime,
) -> BookingResult<()> {
    if !can_transition(booking.status, target) {
        return Err(BookingError::invalid_transition(booking.status, target));
    }
    if target == BookingStatus::Completed && to_minute(now) < to_minute(booking.start()) {
        return Err(BookingError::InvalidTransition {
            from: booking.status.to_string(),
            to: format!("{target} (before start {})", booking.start()),
        });
    }
    booking.status = target;
    Ok(())
}

/// Validate and apply a payment-status update in place
///
/// Marking a Pending booking Paid also confirms it.
pub fn apply_payment(booking: &mut Booking, target: PaymentStatus) -> BookingResult<()> {
    use PaymentStatus::*;
    let allowed = match (booking.payment_status, target) {
        (Unpaid, Paid) => booking.status.is_open(),
        (Paid, Refunded) => booking.status != BookingStatus::Completed,
        _ => false,
    };
    if !allowed {
        return Err(BookingError::InvalidTransition {
            from: format!("{}/{}", booking.status, booking.payment_status),
            to: target.to_string(),
        });
    }

    booking.payment_status = target;
    if target == Paid && booking.status == BookingStatus::Pending {
        booking.status = BookingStatus::Confirmed;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use rust_decimal::Decimal;

    fn booking(status: BookingStatus, payment: PaymentStatus) -> Booking {
        Booking {
            id: "b1".into(),
            booking_number: "BK2099060110001".into(),
            user_id: "alice".into(),
            table_id: 1,
            table_number: 5,
            date: NaiveDate::from_ymd_opt(2099, 6, 1).unwrap(),
            time: NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
            duration_minutes: 120,
            guest_count: 2,
            status,
            payment_status: payment,
            total_amount: Decimal::ZERO,
            items: vec![],
            created_at: 0,
            updated_at: 0,
        }
    }

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2099, 6, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_status_graph() {
        use BookingStatus::*;
        let all = [Pending, Confirmed, Cancelled, Completed];
        let allowed: Vec<(BookingStatus, BookingStatus)> = all
            .iter()
            .flat_map(|&a| all.iter().map(move |&b| (a, b)))
            .filter(|&(a, b)| can_transition(a, b))
            .collect();
        assert_eq!(
            allowed,
            vec![
                (Pending, Confirmed),
                (Pending, Cancelled),
                (Confirmed, Cancelled),
                (Confirmed, Completed),
            ]
        );
    }

    #[test]
    fn test_cancel_twice_is_invalid() {
        let mut b = booking(BookingStatus::Pending, PaymentStatus::Unpaid);
        apply_transition(&mut b, BookingStatus::Cancelled, at(12, 0)).unwrap();
        let err = apply_transition(&mut b, BookingStatus::Cancelled, at(12, 0)).unwrap_err();
        assert!(matches!(err, BookingError::InvalidTransition { .. }));
        assert_eq!(b.status, BookingStatus::Cancelled);
    }

    #[test]
    fn test_complete_requires_start_reached() {
        let mut b = booking(BookingStatus::Confirmed, PaymentStatus::Paid);
        assert!(apply_transition(&mut b, BookingStatus::Completed, at(18, 59)).is_err());
        assert_eq!(b.status, BookingStatus::Confirmed);
        apply_transition(&mut b, BookingStatus::Completed, at(19, 0)).unwrap();
        assert_eq!(b.status, BookingStatus::Completed);
    }

    #[test]
    fn test_pending_cannot_complete() {
        let mut b = booking(BookingStatus::Pending, PaymentStatus::Unpaid);
        assert!(apply_transition(&mut b, BookingStatus::Completed, at(22, 0)).is_err());
    }

    #[test]
    fn test_payment_confirms_pending() {
        let mut b = booking(BookingStatus::Pending, PaymentStatus::Unpaid);
        apply_payment(&mut b, PaymentStatus::Paid).unwrap();
        assert_eq!(b.payment_status, PaymentStatus::Paid);
        assert_eq!(b.status, BookingStatus::Confirmed);
    }

    #[test]
    fn test_refund_after_cancel() {
        let mut b = booking(BookingStatus::Cancelled, PaymentStatus::Paid);
        apply_payment(&mut b, PaymentStatus::Refunded).unwrap();
        assert_eq!(b.payment_status, PaymentStatus::Refunded);
        assert_eq!(b.status, BookingStatus::Cancelled);
    }

    #[test]
    fn test_payment_rejections() {
        let mut cancelled = booking(BookingStatus::Cancelled, PaymentStatus::Unpaid);
        assert!(apply_payment(&mut cancelled, PaymentStatus::Paid).is_err());

        let mut completed = booking(BookingStatus::Completed, PaymentStatus::Paid);
        assert!(apply_payment(&mut completed, PaymentStatus::Refunded).is_err());

        let mut unpaid = booking(BookingStatus::Pending, PaymentStatus::Unpaid);
        assert!(apply_payment(&mut unpaid, PaymentStatus::Refunded).is_err());
        assert!(apply_payment(&mut unpaid, PaymentStatus::Unpaid).is_err());
        assert_eq!(unpaid.status, BookingStatus::Pending);
    }
}
