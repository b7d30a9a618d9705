//! Monthly reporting over the payment store
//!
//! Walks a range of report months, evaluates every Annual and Monthly
//! supporter through the status engine, and aggregates the results into
//! per-month rows: total brand-new supporters plus returning supporters
//! bucketed by how long they had been expired.

use crate::calendar::MonthDate;
use crate::payment::{Cadence, PaymentStore};
use crate::status::{self, Status, StatusError};
use rayon::prelude::*;
use serde::Serialize;
use std::io::Write;

/// Highest expiry bucket: anything over a year collapses into it
const MAX_EXPIRED_BUCKET: u32 = 5;

/// The cadences the reports cover
const REPORT_CADENCES: [Cadence; 2] = [Cadence::Annual, Cadence::Monthly];

/// One row of the returning-supporters report
///
/// Field renames produce the exact CSV header of the reference report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    #[serde(rename = "Month")]
    pub month: String,
    #[serde(rename = "Total New")]
    pub total_new: u32,
    #[serde(rename = "Were 0-3mo expired")]
    pub expired_0_3: u32,
    #[serde(rename = "Were 3-6mo expired")]
    pub expired_3_6: u32,
    #[serde(rename = "Were 6-9mo expired")]
    pub expired_6_9: u32,
    #[serde(rename = "Were 9-12mo expired")]
    pub expired_9_12: u32,
    #[serde(rename = "Were >1yr expired")]
    pub expired_over_year: u32,
}

/// Per-month lifecycle-state counts, for the status report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    #[serde(rename = "Month")]
    pub month: String,
    #[serde(rename = "New")]
    pub new: u32,
    #[serde(rename = "Active")]
    pub active: u32,
    #[serde(rename = "Lapsed")]
    pub lapsed: u32,
    #[serde(rename = "Lost")]
    pub lost: u32,
}

/// Quarter bucket for a months-expired count: 0 for not-a-return, 1..=4 for
/// each quarter of the first year, 5 for anything longer
pub fn expired_bucket(months_expired: u32) -> u32 {
    ((months_expired + 2) / 3).min(MAX_EXPIRED_BUCKET)
}

/// Report months from `start` through `end`, inclusive
///
/// Steps by `round_month_up`, so every month after the first is evaluated at
/// its 1st regardless of `start`'s day.
pub fn month_range(start: MonthDate, end: MonthDate) -> Vec<MonthDate> {
    let mut months = Vec::new();
    let mut month = start;
    while month <= end {
        months.push(month);
        month = month.round_month_up();
    }
    months
}

fn report_entities(store: &PaymentStore) -> Vec<String> {
    // Annual and Monthly populations are evaluated separately and summed,
    // so an entity appearing under both labels is counted in each
    REPORT_CADENCES
        .iter()
        .flat_map(|&c| store.entities(&[c]))
        .collect()
}

/// Build the returning-supporters row for one report month
pub fn report_month(store: &PaymentStore, month: MonthDate) -> Result<ReportRow, StatusError> {
    let entities = report_entities(store);

    let per_entity: Vec<(Option<Status>, u32)> = entities
        .par_iter()
        .map(|entity| {
            let payments = store.payments_as_of(entity, month);
            let status = status::status(&payments, month);
            let expired = status::months_expired_at_return(&payments, month)?;
            Ok((status, expired_bucket(expired)))
        })
        .collect::<Result<_, StatusError>>()?;

    let mut row = ReportRow {
        month: month.format_month(),
        total_new: 0,
        expired_0_3: 0,
        expired_3_6: 0,
        expired_6_9: 0,
        expired_9_12: 0,
        expired_over_year: 0,
    };
    for (status, bucket) in per_entity {
        if status == Some(Status::New) {
            row.total_new += 1;
        }
        match bucket {
            1 => row.expired_0_3 += 1,
            2 => row.expired_3_6 += 1,
            3 => row.expired_6_9 += 1,
            4 => row.expired_9_12 += 1,
            5 => row.expired_over_year += 1,
            _ => {}
        }
    }

    Ok(row)
}

/// Build returning-supporters rows for every month in the range
pub fn report_range(
    store: &PaymentStore,
    start: MonthDate,
    end: MonthDate,
) -> Result<Vec<ReportRow>, StatusError> {
    month_range(start, end)
        .into_iter()
        .map(|month| report_month(store, month))
        .collect()
}

/// Count lifecycle states across Annual and Monthly supporters for one month
///
/// "New" here matches "Total New" in the returning report for the same month.
pub fn status_counts(store: &PaymentStore, month: MonthDate) -> StatusCounts {
    let entities = report_entities(store);

    let statuses: Vec<Option<Status>> = entities
        .par_iter()
        .map(|entity| status::status(&store.payments_as_of(entity, month), month))
        .collect();

    let mut counts = StatusCounts {
        month: month.format_month(),
        ..StatusCounts::default()
    };
    for status in statuses.into_iter().flatten() {
        match status {
            Status::New => counts.new += 1,
            Status::Active => counts.active += 1,
            Status::Lapsed => counts.lapsed += 1,
            Status::Lost => counts.lost += 1,
        }
    }
    counts
}

/// Write rows as CSV, header included
pub fn write_csv<W: Write, S: Serialize>(rows: &[S], writer: W) -> csv::Result<()> {
    let mut out = csv::Writer::from_writer(writer);
    for row in rows {
        out.serialize(row)?;
    }
    out.flush()?;
    Ok(())
}
