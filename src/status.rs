//! Lapse-date calculation and supporter status determination
//!
//! A payment is presumed to cover exactly one cadence period; the supporter
//! stays current through the end of the month containing the coverage-period
//! end and lapses on the 1st of the following month. Status is then inferred
//! from how far past that lapse date the as-of date sits, plus whether the
//! supporter's first or latest payment falls in the current month window.
//!
//! Every operation here is a pure function of (payment slice, as-of date);
//! callers may evaluate supporters in parallel freely.

use crate::calendar::MonthDate;
use crate::payment::{cadence_of, Cadence, Payment};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Days past the lapse date at which a supporter counts as Lost
pub const LOST_THRESHOLD_DAYS: i64 = 365;

/// Days past the lapse date at which a supporter counts as Lapsed
pub const LAPSED_THRESHOLD_DAYS: i64 = 0;

/// Supporter lifecycle state as of a query date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    /// First payment happened within the current month window
    New,
    /// Current on payments (or paid ahead)
    Active,
    /// Past the lapse date but less than a year overdue
    Lapsed,
    /// A year or more past the lapse date
    Lost,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::New => "New",
            Status::Active => "Active",
            Status::Lapsed => "Lapsed",
            Status::Lost => "Lost",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Precondition violations in status-engine queries
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatusError {
    /// An operation assuming a longer history was invoked on a short one
    #[error("payment history has {actual} payment(s), operation requires at least {required}")]
    TooFewPayments { required: usize, actual: usize },
}

/// Date on which a payment's coverage lapses
///
/// Monthly coverage runs one month, Annual (or Unknown) one year; either way
/// the supporter is current through the end of the month the coverage ends
/// in, so the result is always the 1st of the following month.
pub fn lapse_date(last_payment_date: MonthDate, cadence: Cadence) -> MonthDate {
    let coverage_end = match cadence {
        Cadence::Monthly => last_payment_date.next_month(),
        Cadence::Annual | Cadence::Unknown => last_payment_date.next_year(),
    };
    coverage_end.round_month_up()
}

/// Whether `date` falls in the month window ending at `as_of`
///
/// The window is `(first of the month before as_of, as_of]`, matching the
/// reference report, which always evaluates months at their 1st: for an
/// as-of of the 1st this selects exactly the preceding calendar month.
fn in_current_month_window(date: MonthDate, as_of: MonthDate) -> bool {
    as_of.adjust_month_to_day(-1, 1) < date && date <= as_of
}

fn history_lapse_date(payments: &[Payment]) -> Option<MonthDate> {
    let last = payments.last()?;
    Some(lapse_date(last.date, cadence_of(payments)))
}

/// Lapse date computed from the second-to-last payment
///
/// Cadence is still derived from the full history's most recent label, not
/// re-derived as of the second-to-last payment; this mirrors the production
/// behavior for supporters who changed cadence between their last two
/// payments.
pub fn second_last_lapse_date(payments: &[Payment]) -> Result<MonthDate, StatusError> {
    if payments.len() < 2 {
        return Err(StatusError::TooFewPayments {
            required: 2,
            actual: payments.len(),
        });
    }
    let second_last = &payments[payments.len() - 2];
    Ok(lapse_date(second_last.date, cadence_of(payments)))
}

/// Determine a supporter's lifecycle state
///
/// `payments` must be the supporter's payments with date <= `as_of`,
/// ascending by date. Returns `None` for a supporter with no history yet —
/// that is a valid result, not an error.
pub fn status(payments: &[Payment], as_of: MonthDate) -> Option<Status> {
    let first = payments.first()?;
    let lapse = history_lapse_date(payments)?;
    let days_past_due = as_of.days_since(lapse);

    if days_past_due >= LOST_THRESHOLD_DAYS {
        Some(Status::Lost)
    } else if days_past_due >= LAPSED_THRESHOLD_DAYS {
        Some(Status::Lapsed)
    } else if in_current_month_window(first.date, as_of) {
        Some(Status::New)
    } else {
        Some(Status::Active)
    }
}

/// How many months overdue a returning supporter was when they paid this month
///
/// Returns 0 for: empty histories, brand-new supporters (first payment in the
/// current month window), on-time renewals, and supporters whose latest
/// activity was not this month (currently lapsed/lost, or an annual supporter
/// who last paid in an earlier month).
///
/// For an overdue return the result is the ceiling of months lapsed: the
/// month-index difference between the returning payment and the old lapse
/// date, plus one, since paying in the lapse month itself still means the
/// supporter lapsed.
pub fn months_expired_at_return(
    payments: &[Payment],
    as_of: MonthDate,
) -> Result<u32, StatusError> {
    let (first, last) = match (payments.first(), payments.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Ok(0),
    };

    if in_current_month_window(first.date, as_of) {
        // Started paying this month, so not "returning"
        return Ok(0);
    }

    if in_current_month_window(last.date, as_of) {
        // At least 2 payments exist here: the first is outside the window,
        // the last inside, so they cannot be the same record
        let past_lapse_date = second_last_lapse_date(payments)?;

        if last.date <= past_lapse_date {
            // This month's payment arrived on time: an ordinary renewal
            return Ok(0);
        }

        let months = last.date.month_index() - past_lapse_date.month_index() + 1;
        return Ok(months.max(0) as u32);
    }

    // Supporter lapsed/lost, or an annual supporter who paid 2-12 months ago
    Ok(0)
}
