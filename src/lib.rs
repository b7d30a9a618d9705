//! Supporter Lifecycle - classification engine for recurring donors
//!
//! This library provides:
//! - Month-oriented calendar arithmetic with day clamping
//! - Lapse-date calculation for Monthly and Annual payment cadences
//! - Status determination (New / Active / Lapsed / Lost) per supporter
//! - Returning-supporter metrics bucketed by months expired
//! - Monthly report aggregation with CSV output

pub mod calendar;
pub mod payment;
pub mod report;
pub mod status;

// Re-export commonly used types
pub use calendar::MonthDate;
pub use payment::{cadence_of, Cadence, Payment, PaymentStore};
pub use report::{ReportRow, StatusCounts};
pub use status::{lapse_date, months_expired_at_return, status, Status, StatusError};
