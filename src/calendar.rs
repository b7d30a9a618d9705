//! Month-oriented calendar arithmetic
//!
//! `MonthDate` is the date type the status engine runs on. Month shifts clamp
//! the day-of-month to a fixed month-length table (February is always 28 —
//! matching the reference report, which never looks at leap years when
//! clamping). Day *differences* use the real calendar via chrono, since
//! "days past due" is an actual elapsed-day count.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum day for each month, index 0 = January
/// February is fixed at 28; clamping is deliberately not leap-aware
const MONTH_MAXDAY: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// A calendar date supporting whole-month shifts with day clamping
///
/// Fields are private: every constructor clamps the day against the month
/// table, so an out-of-range day is unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonthDate {
    year: i32,
    month: u32,
    day: u32,
}

/// Error parsing a `YYYY-MM` or `YYYY-MM-DD` string
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid date '{input}': expected {expected}")]
pub struct ParseDateError {
    input: String,
    expected: &'static str,
}

impl MonthDate {
    /// Create a date, clamping `day` to the month's table maximum
    ///
    /// `month` must be in 1..=12.
    pub fn new(year: i32, month: u32, day: u32) -> Self {
        debug_assert!((1..=12).contains(&month), "month out of range: {}", month);
        let day = day.max(1).min(MONTH_MAXDAY[(month - 1) as usize]);
        Self { year, month, day }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    /// Today's local date
    pub fn today() -> Self {
        chrono::Local::now().date_naive().into()
    }

    /// Parse a full `YYYY-MM-DD` date
    pub fn parse_date(s: &str) -> Result<Self, ParseDateError> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Self::from)
            .map_err(|_| ParseDateError {
                input: s.to_string(),
                expected: "YYYY-MM-DD",
            })
    }

    /// Parse a `YYYY-MM` month, yielding the first day of that month
    pub fn parse_month(s: &str) -> Result<Self, ParseDateError> {
        NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d")
            .map(Self::from)
            .map_err(|_| ParseDateError {
                input: s.to_string(),
                expected: "YYYY-MM",
            })
    }

    /// Shift by `delta` whole months, keeping the current day (clamped)
    pub fn adjust_month(self, delta: i32) -> Self {
        self.adjust_month_to_day(delta, self.day)
    }

    /// Shift by `delta` whole months, landing on `day` (clamped)
    pub fn adjust_month_to_day(self, delta: i32, day: u32) -> Self {
        let index = self.year * 12 + (self.month as i32 - 1) + delta;
        let year = index.div_euclid(12);
        let month = index.rem_euclid(12) as u32 + 1;
        Self::new(year, month, day)
    }

    /// Same day one month later (clamped to the shorter month if needed)
    pub fn next_month(self) -> Self {
        self.adjust_month(1)
    }

    /// Same day twelve months later
    pub fn next_year(self) -> Self {
        self.adjust_month(12)
    }

    /// First day of the following month
    ///
    /// Used to express "through the end of this month" boundaries as an
    /// exclusive start of the next month.
    pub fn round_month_up(self) -> Self {
        self.adjust_month_to_day(1, 1)
    }

    /// Zero-based month index since year 0, for month-difference arithmetic
    pub fn month_index(self) -> i32 {
        self.year * 12 + self.month as i32
    }

    /// Signed number of real calendar days since `earlier`
    ///
    /// Unlike month shifts this is leap-aware: elapsed days are counted on
    /// the actual calendar.
    pub fn days_since(self, earlier: MonthDate) -> i64 {
        (self.to_naive() - earlier.to_naive()).num_days()
    }

    /// Format as `YYYY-MM`
    pub fn format_month(self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }

    fn to_naive(self) -> NaiveDate {
        // Clamped days never exceed the real month length (Feb caps at 28)
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
            .expect("clamped MonthDate is always a valid calendar date")
    }
}

impl From<NaiveDate> for MonthDate {
    fn from(d: NaiveDate) -> Self {
        Self::new(d.year(), d.month(), d.day())
    }
}

impl fmt::Display for MonthDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_to_fixed_february() {
        let d = MonthDate::new(2024, 1, 31).adjust_month(1);
        // 2024 is a leap year but the table caps February at 28
        assert_eq!(d, MonthDate::new(2024, 2, 28));
    }

    #[test]
    fn test_adjust_month_across_year_boundaries() {
        let d = MonthDate::new(2024, 1, 15);
        assert_eq!(d.adjust_month(-1), MonthDate::new(2023, 12, 15));
        assert_eq!(d.adjust_month(12), MonthDate::new(2025, 1, 15));
        assert_eq!(d.adjust_month(-13), MonthDate::new(2022, 12, 15));
        assert_eq!(MonthDate::new(2024, 11, 5).adjust_month(3), MonthDate::new(2025, 2, 5));
    }

    #[test]
    fn test_adjust_month_to_day() {
        let d = MonthDate::new(2024, 4, 10);
        assert_eq!(d.adjust_month_to_day(-1, 1), MonthDate::new(2024, 3, 1));
        assert_eq!(d.adjust_month_to_day(0, 31), MonthDate::new(2024, 4, 30));
    }

    #[test]
    fn test_round_month_up() {
        let d = MonthDate::new(2024, 3, 15);
        let up = d.round_month_up();
        assert_eq!(up, MonthDate::new(2024, 4, 1));
        assert_eq!(up.day(), 1);
        assert!(up > d);

        // Rounding twice lands exactly one month after the first rounding
        assert_eq!(up.round_month_up(), MonthDate::new(2024, 5, 1));
        assert_eq!(MonthDate::new(2024, 12, 31).round_month_up(), MonthDate::new(2025, 1, 1));
    }

    #[test]
    fn test_days_since_uses_real_calendar() {
        // Spans the leap day 2024-02-29
        let a = MonthDate::new(2024, 2, 28);
        let b = MonthDate::new(2024, 3, 1);
        assert_eq!(b.days_since(a), 2);
        assert_eq!(a.days_since(b), -2);

        let y0 = MonthDate::new(2024, 5, 1);
        let y1 = MonthDate::new(2025, 5, 1);
        assert_eq!(y1.days_since(y0), 365);
    }

    #[test]
    fn test_parse_and_format() {
        assert_eq!(
            MonthDate::parse_date("2024-03-15").unwrap(),
            MonthDate::new(2024, 3, 15)
        );
        assert_eq!(
            MonthDate::parse_month("2024-03").unwrap(),
            MonthDate::new(2024, 3, 1)
        );
        assert!(MonthDate::parse_month("March 2024").is_err());
        assert!(MonthDate::parse_date("2024-13-01").is_err());

        let d = MonthDate::new(2024, 3, 5);
        assert_eq!(d.to_string(), "2024-03-05");
        assert_eq!(d.format_month(), "2024-03");
    }

    #[test]
    fn test_ordering() {
        assert!(MonthDate::new(2024, 1, 31) < MonthDate::new(2024, 2, 1));
        assert!(MonthDate::new(2023, 12, 31) < MonthDate::new(2024, 1, 1));
    }
}
